use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sigscan::core::types::{Address, MemoryRegion, MemoryResult};
use sigscan::memory::scanner::{scan_local_regions, scan_remote_regions, WindowOptions};
use sigscan::memory::MemoryRead;
use sigscan::Signature;

const HAYSTACK_SIZE: usize = 16 << 20;

/// Pseudo-random bytes with a single occurrence of the needle near the end
fn haystack(needle: &[u8]) -> Vec<u8> {
    let mut state = 0x2545F4914F6CDD1Du64;
    let mut bytes: Vec<u8> = (0..HAYSTACK_SIZE)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state as u8
        })
        .collect();
    let at = HAYSTACK_SIZE - 4096;
    bytes[at..at + needle.len()].copy_from_slice(needle);
    bytes
}

struct InMemory<'a>(&'a [u8]);

impl MemoryRead for InMemory<'_> {
    fn read_memory(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        let start = address.as_usize();
        let count = buffer.len().min(self.0.len() - start);
        buffer[..count].copy_from_slice(&self.0[start..start + count]);
        Ok(count)
    }
}

fn benchmark_parse(c: &mut Criterion) {
    c.bench_function("parse_signature", |b| {
        b.iter(|| Signature::parse(black_box("48 8B 05 ?? ?? ?? ?? 48 85 C0 74 ?? 48 8B 40 ??")))
    });
}

fn benchmark_local_scan(c: &mut Criterion) {
    let needle = [0x48, 0x8B, 0x05, 0x11, 0x22, 0x33, 0x44, 0x48, 0x85, 0xC0];
    let bytes = haystack(&needle);
    let region = MemoryRegion::from_base_size(Address::from(bytes.as_ptr()), bytes.len());

    let mut group = c.benchmark_group("local_scan");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    for pattern in ["48 8B 05 ?? ?? ?? ?? 48 85 C0", "48 8B 05 11 22 33 44 48 85 ??"] {
        let signature = Signature::parse(pattern).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(pattern), &signature, |b, sig| {
            b.iter(|| unsafe { scan_local_regions([region], black_box(sig), 0) })
        });
    }
    group.finish();
}

fn benchmark_remote_scan(c: &mut Criterion) {
    let needle = [0xE8, 0x01, 0x02, 0x03, 0x04, 0xC3];
    let bytes = haystack(&needle);
    let region = MemoryRegion::from_base_size(Address::new(0), bytes.len());
    let signature = Signature::parse("E8 ?? ?? ?? ?? C3").unwrap();

    let mut group = c.benchmark_group("remote_scan");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    for chunk in [64 << 10, 1 << 20] {
        let options = WindowOptions::new(chunk, 4096);
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &options, |b, &options| {
            b.iter(|| scan_remote_regions([region], InMemory(&bytes), &signature, 0, options))
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_parse, benchmark_local_scan, benchmark_remote_scan);
criterion_main!(benches);
