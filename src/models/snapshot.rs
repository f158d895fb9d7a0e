// Published metrics snapshot

use serde::{Deserialize, Serialize};

/// Normalized metrics derived from one sampling cycle.
///
/// Percentages lie in `[0, 100]`, rates are never negative. `timestamp` is the
/// cycle's wall-clock time in milliseconds since the Unix epoch (0 before the
/// first publication).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub cpu_usage_percent: f64,
    pub memory_usage_percent: f64,
    pub used_memory_bytes: u64,
    pub total_memory_bytes: u64,
    pub network_in_rate_kbs: f64,
    pub network_out_rate_kbs: f64,
    pub timestamp: u64,
}
