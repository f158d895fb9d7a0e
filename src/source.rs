// Per-platform counter access behind a small trait

use crate::error::ReadError;
use crate::models::{CpuTicks, InterfaceEntry, MemoryPages};

/// Blocking host queries producing raw, unit-less counters.
///
/// Implementations are called from a blocking worker thread, one domain at a
/// time, and never concurrently with themselves while the sampler is the only
/// caller.
pub trait CounterSource: Send + Sync + 'static {
    fn read_cpu(&self) -> Result<CpuTicks, ReadError>;

    fn read_memory(&self) -> Result<MemoryPages, ReadError>;

    /// Every interface entry the host reports, eligible or not. Filtering is
    /// done by [`crate::interfaces::InterfaceFilter`].
    fn read_interfaces(&self) -> Result<Vec<InterfaceEntry>, ReadError>;
}
