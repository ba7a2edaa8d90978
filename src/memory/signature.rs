//! Byte signatures with wildcards and the anchor-accelerated matcher
//!
//! A pattern such as `"48 8B ?? ?? 89"` is parsed once into a [`Signature`]
//! which is then reused against every buffer or region being searched. The
//! last fixed byte acts as the anchor: candidates are located with `memchr`
//! on that byte and only then verified against every fixed offset.

use crate::core::types::{MemoryError, MemoryResult, Offset};
use std::fmt;
use std::str::FromStr;

/// Parsed signature: window size, fixed offsets and their expected bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    bytes: Vec<u8>,
    mask: Vec<bool>,
    fixed: Vec<Offset>,
    anchor: Option<(Offset, u8)>,
}

impl Signature {
    /// Parses a whitespace separated token stream.
    ///
    /// Each token is either a wildcard (`?` or `??`) or a byte literal of one
    /// or two hex digits in either case. Anything else is rejected. A blank
    /// string parses to the empty signature, which never matches.
    pub fn parse(pattern: &str) -> MemoryResult<Self> {
        let tokens = pattern
            .split_ascii_whitespace()
            .enumerate()
            .map(|(index, token)| parse_token(index, token))
            .collect::<MemoryResult<Vec<_>>>()?;

        Ok(Signature::from_masked(tokens))
    }

    /// Builds a signature from explicit bytes, `None` marking a wildcard
    pub fn from_masked(pattern: Vec<Option<u8>>) -> Self {
        let bytes: Vec<u8> = pattern.iter().map(|b| b.unwrap_or(0)).collect();
        let mask: Vec<bool> = pattern.iter().map(Option::is_some).collect();
        let fixed: Vec<Offset> = mask
            .iter()
            .enumerate()
            .filter_map(|(offset, &fixed)| fixed.then_some(offset))
            .collect();
        let anchor = fixed.last().map(|&offset| (offset, bytes[offset]));

        Signature {
            bytes,
            mask,
            fixed,
            anchor,
        }
    }

    /// Builds a signature with every byte fixed
    pub fn exact(bytes: &[u8]) -> Self {
        Signature::from_masked(bytes.iter().copied().map(Some).collect())
    }

    /// Length of the match window in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the signature has no tokens at all
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether every position is a wildcard (and there is at least one)
    pub fn is_wildcard_only(&self) -> bool {
        !self.is_empty() && self.anchor.is_none()
    }

    /// Offsets whose byte value is constrained, ascending
    pub fn fixed_offsets(&self) -> &[Offset] {
        &self.fixed
    }

    /// Expected byte at `offset`, `None` for wildcards and out-of-range offsets
    pub fn byte_at(&self, offset: Offset) -> Option<u8> {
        match self.mask.get(offset) {
            Some(true) => Some(self.bytes[offset]),
            _ => None,
        }
    }

    /// Last fixed offset and its byte
    pub fn anchor(&self) -> Option<(Offset, u8)> {
        self.anchor
    }

    /// Checks every fixed offset against the start of `window`
    pub fn matches_at(&self, window: &[u8]) -> bool {
        window.len() >= self.size()
            && self
                .fixed
                .iter()
                .all(|&offset| window[offset] == self.bytes[offset])
    }

    /// Iterates the start offsets of every match in `haystack`, ascending.
    ///
    /// A wildcard-only signature matches at every offset where the window fits.
    pub fn matches<'s, 'h>(&'s self, haystack: &'h [u8]) -> Matches<'s, 'h> {
        Matches {
            signature: self,
            haystack,
            position: 0,
        }
    }
}

fn parse_token(index: usize, token: &str) -> MemoryResult<Option<u8>> {
    if token == "?" || token == "??" {
        return Ok(None);
    }

    let padded = match token.len() {
        1 => format!("0{}", token),
        2 => token.to_string(),
        _ => {
            return Err(MemoryError::invalid_pattern(format!(
                "token '{}' at position {} must be one or two hex digits or a wildcard",
                token, index
            )))
        }
    };

    let mut byte = [0u8; 1];
    hex::decode_to_slice(&padded, &mut byte).map_err(|e| {
        MemoryError::invalid_pattern(format!(
            "token '{}' at position {} is not hex: {}",
            token, index, e
        ))
    })?;
    Ok(Some(byte[0]))
}

impl FromStr for Signature {
    type Err = MemoryError;

    fn from_str(s: &str) -> MemoryResult<Self> {
        Signature::parse(s)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for offset in 0..self.size() {
            if offset > 0 {
                f.write_str(" ")?;
            }
            match self.byte_at(offset) {
                Some(byte) => write!(f, "{:02X}", byte)?,
                None => f.write_str("??")?,
            }
        }
        Ok(())
    }
}

/// Iterator over match offsets produced by [`Signature::matches`]
#[derive(Debug, Clone)]
pub struct Matches<'s, 'h> {
    signature: &'s Signature,
    haystack: &'h [u8],
    position: usize,
}

impl Iterator for Matches<'_, '_> {
    type Item = Offset;

    fn next(&mut self) -> Option<Offset> {
        let size = self.signature.size();
        if size == 0 || self.haystack.len() < size {
            return None;
        }
        let last = self.haystack.len() - size;

        let Some((anchor, byte)) = self.signature.anchor else {
            if self.position > last {
                return None;
            }
            self.position += 1;
            return Some(self.position - 1);
        };

        while self.position <= last {
            let from = self.position + anchor;
            let to = last + anchor + 1;
            let Some(hit) = memchr::memchr(byte, &self.haystack[from..to]) else {
                self.position = last + 1;
                return None;
            };

            let candidate = from + hit - anchor;
            self.position = candidate + 1;
            if self
                .signature
                .matches_at(&self.haystack[candidate..candidate + size])
            {
                return Some(candidate);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_parse_masked_pattern() {
        let sig = Signature::parse("48 8B ?? ? 89").unwrap();
        assert_eq!(sig.size(), 5);
        assert_eq!(sig.fixed_offsets(), &[0, 1, 4]);
        assert_eq!(sig.byte_at(0), Some(0x48));
        assert_eq!(sig.byte_at(1), Some(0x8B));
        assert_eq!(sig.byte_at(2), None);
        assert_eq!(sig.byte_at(3), None);
        assert_eq!(sig.byte_at(4), Some(0x89));
        assert_eq!(sig.byte_at(5), None);
        assert_eq!(sig.anchor(), Some((4, 0x89)));
    }

    #[test]
    fn test_anchor_is_last_fixed_byte() {
        let sig = Signature::parse("E8 ?? ?? ?? ?? C3 ?? ??").unwrap();
        assert_eq!(sig.size(), 8);
        assert_eq!(sig.anchor(), Some((5, 0xC3)));
    }

    #[test]
    fn test_parse_case_and_short_tokens() {
        let sig = Signature::parse("a ff 0B F").unwrap();
        assert_eq!(sig.to_string(), "0A FF 0B 0F");
    }

    #[test]
    fn test_parse_whitespace() {
        let sig = Signature::parse("  48\t8B   ??\n").unwrap();
        assert_eq!(sig.to_string(), "48 8B ??");
    }

    #[test]
    fn test_empty_pattern() {
        for blank in ["", "   ", "\t"] {
            let sig = Signature::parse(blank).unwrap();
            assert!(sig.is_empty());
            assert_eq!(sig.size(), 0);
            assert_eq!(sig.anchor(), None);
            assert!(!sig.is_wildcard_only());
            assert_eq!(sig.matches(&[0, 1, 2]).count(), 0);
        }
    }

    #[test]
    fn test_wildcard_only_pattern() {
        let sig = Signature::parse("?? ? ??").unwrap();
        assert_eq!(sig.size(), 3);
        assert!(sig.fixed_offsets().is_empty());
        assert_eq!(sig.anchor(), None);
        assert!(sig.is_wildcard_only());
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        for bad in ["GG", "48 8G", "123", "0x48", "???", "48 - 8B", "4 8B ?x"] {
            let err = Signature::parse(bad).unwrap_err();
            assert!(
                matches!(err, MemoryError::InvalidPattern(_)),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_error_names_offending_token() {
        let err = Signature::parse("48 ZZ 89").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'ZZ'"));
        assert!(msg.contains("position 1"));
    }

    #[test]
    fn test_from_str_and_display() {
        let sig: Signature = "48 8b ? ? 89".parse().unwrap();
        assert_eq!(sig.to_string(), "48 8B ?? ?? 89");
        assert_eq!(Signature::parse(&sig.to_string()).unwrap(), sig);
    }

    #[test]
    fn test_exact_signature() {
        let sig = Signature::exact(&[0xDE, 0xAD]);
        assert_eq!(sig.fixed_offsets(), &[0, 1]);
        assert_eq!(sig.anchor(), Some((1, 0xAD)));
    }

    #[test]
    fn test_matches_at() {
        let sig = Signature::parse("48 8B ?? ?? 89").unwrap();
        assert!(sig.matches_at(&[0x48, 0x8B, 0x00, 0xFF, 0x89]));
        assert!(sig.matches_at(&[0x48, 0x8B, 0xC1, 0xFF, 0x89, 0x00]));
        assert!(!sig.matches_at(&[0x48, 0x8C, 0x00, 0xFF, 0x89]));
        assert!(!sig.matches_at(&[0x48, 0x8B, 0x00, 0xFF]));
    }

    #[test]
    fn test_matches_in_buffer() {
        let sig = Signature::parse("AA ?? CC").unwrap();
        let data = [0xAA, 0x00, 0xCC, 0xAA, 0xCC, 0xCC, 0xAA, 0xBB];
        let found: Vec<_> = sig.matches(&data).collect();
        assert_eq!(found, vec![0, 3]);
    }

    #[test]
    fn test_matches_overlapping() {
        let sig = Signature::parse("AA AA").unwrap();
        let found: Vec<_> = sig.matches(&[0xAA; 4]).collect();
        assert_eq!(found, vec![0, 1, 2]);
    }

    #[test]
    fn test_match_at_buffer_edges() {
        let sig = Signature::parse("01 ?? 03").unwrap();
        let data = [0x01, 0x02, 0x03, 0x00, 0x01, 0xFF, 0x03];
        let found: Vec<_> = sig.matches(&data).collect();
        assert_eq!(found, vec![0, 4]);
    }

    #[test]
    fn test_anchor_hit_past_last_window_ignored() {
        // 0x03 at index 1 would be the anchor of a window starting at -1
        let sig = Signature::parse("01 ?? 03").unwrap();
        assert_eq!(sig.matches(&[0x00, 0x03, 0x01]).count(), 0);
    }

    #[test]
    fn test_haystack_shorter_than_signature() {
        let sig = Signature::parse("01 02 03").unwrap();
        assert_eq!(sig.matches(&[0x01, 0x02]).count(), 0);
    }

    #[test]
    fn test_wildcard_only_matches_every_window() {
        let sig = Signature::parse("?? ??").unwrap();
        let found: Vec<_> = sig.matches(&[1, 2, 3, 4]).collect();
        assert_eq!(found, vec![0, 1, 2]);
    }

    fn naive_matches(pattern: &[Option<u8>], haystack: &[u8]) -> Vec<usize> {
        if pattern.is_empty() || haystack.len() < pattern.len() {
            return Vec::new();
        }
        (0..=haystack.len() - pattern.len())
            .filter(|&start| {
                pattern
                    .iter()
                    .enumerate()
                    .all(|(i, b)| b.map_or(true, |b| haystack[start + i] == b))
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_anchor_search_equals_exhaustive_search(
            pattern in proptest::collection::vec(proptest::option::weighted(0.7, 0u8..4), 1..6),
            haystack in proptest::collection::vec(0u8..4, 0..256),
        ) {
            let sig = Signature::from_masked(pattern.clone());
            let found: Vec<_> = sig.matches(&haystack).collect();
            prop_assert_eq!(found, naive_matches(&pattern, &haystack));
        }
    }
}
