// Domain models: raw counter samples and the published snapshot

mod sample;
mod snapshot;

pub use sample::{
    AddressFamily, ByteCounters, CpuTicks, Domain, InterfaceEntry, MemoryPages, Stamped,
};
pub use snapshot::Snapshot;
