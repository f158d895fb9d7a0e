// Host resource sampler: raw OS counters in, normalized metrics snapshots out.

pub mod clock;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod interfaces;
pub mod models;
pub mod scheduler;
pub mod source;
pub mod store;
pub mod sysinfo_repo;
