//! Linux backend: procfs region snapshots and `process_vm_readv` reads

pub mod maps;
pub mod vm;

pub use maps::{load_maps, parse_maps};
pub use vm::{page_size, read_process_memory};
