// Rate engine: turns consecutive raw samples into a normalized Snapshot.
// Platform-agnostic; the sampler feeds it one CycleReading per cycle.

use crate::models::{ByteCounters, CpuTicks, MemoryPages, Snapshot, Stamped};
use std::time::{Duration, Instant};

/// Network rates are not computed over intervals shorter than this.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Raw readings of one cycle. A `None` domain means its read failed.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReading {
    pub taken_at: Instant,
    /// Wall-clock milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub cpu: Option<CpuTicks>,
    pub memory: Option<MemoryPages>,
    pub network: Option<ByteCounters>,
}

/// Latest raw sample per domain. Empty until the first successful read.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SamplingState {
    pub cpu: Option<Stamped<CpuTicks>>,
    pub memory: Option<Stamped<MemoryPages>>,
    pub network: Option<Stamped<ByteCounters>>,
}

/// What happened to one domain during a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainOutcome {
    /// Fields were recomputed from this cycle's reading.
    Updated,
    /// First successful read; stored as baseline, fields untouched.
    Bootstrapped,
    /// Read failed; previous fields retained.
    ReadFailed,
    /// Elapsed time since the baseline was too small; previous fields retained.
    DegenerateInterval,
}

impl DomainOutcome {
    fn is_fresh(self) -> bool {
        matches!(self, DomainOutcome::Updated | DomainOutcome::Bootstrapped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub snapshot: Snapshot,
    pub cpu: DomainOutcome,
    pub memory: DomainOutcome,
    pub network: DomainOutcome,
    /// Number of counters that went backwards and were clamped to a zero delta.
    pub counter_regressions: u32,
}

impl CycleReport {
    /// A snapshot is worth publishing when at least one domain read succeeded.
    pub fn has_fresh_data(&self) -> bool {
        self.cpu.is_fresh() || self.memory.is_fresh() || self.network.is_fresh()
    }
}

/// Owns the sampling state and replaces it wholesale once per cycle.
#[derive(Debug)]
pub struct RateEngine {
    state: SamplingState,
    min_interval: Duration,
}

impl Default for RateEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl RateEngine {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            state: SamplingState::default(),
            min_interval,
        }
    }

    pub fn state(&self) -> &SamplingState {
        &self.state
    }

    pub fn advance(&mut self, previous: &Snapshot, reading: &CycleReading) -> CycleReport {
        let (report, next) = derive(&self.state, previous, reading, self.min_interval);
        self.state = next;
        report
    }
}

/// Pure cycle computation: same inputs, same outputs.
pub fn derive(
    state: &SamplingState,
    previous: &Snapshot,
    reading: &CycleReading,
    min_interval: Duration,
) -> (CycleReport, SamplingState) {
    let mut snapshot = Snapshot {
        timestamp: reading.timestamp,
        ..*previous
    };
    let mut next = *state;
    let mut counter_regressions = 0;

    let cpu = match (state.cpu, reading.cpu) {
        (_, None) => DomainOutcome::ReadFailed,
        (None, Some(ticks)) => {
            next.cpu = Some(Stamped::new(ticks, reading.taken_at));
            DomainOutcome::Bootstrapped
        }
        (Some(prev), Some(ticks)) => match elapsed(prev.taken_at, reading.taken_at) {
            None => DomainOutcome::DegenerateInterval,
            Some(_) => {
                let usage = cpu_usage(&prev.sample, &ticks);
                snapshot.cpu_usage_percent = usage.percent;
                counter_regressions += usage.regressions;
                next.cpu = Some(Stamped::new(ticks, reading.taken_at));
                DomainOutcome::Updated
            }
        },
    };

    let memory = match reading.memory {
        None => DomainOutcome::ReadFailed,
        Some(pages) => {
            let usage = memory_usage(&pages);
            snapshot.used_memory_bytes = usage.used_bytes;
            snapshot.total_memory_bytes = usage.total_bytes;
            snapshot.memory_usage_percent = usage.percent;
            next.memory = Some(Stamped::new(pages, reading.taken_at));
            DomainOutcome::Updated
        }
    };

    let network = match (state.network, reading.network) {
        (_, None) => DomainOutcome::ReadFailed,
        (None, Some(counters)) => {
            next.network = Some(Stamped::new(counters, reading.taken_at));
            DomainOutcome::Bootstrapped
        }
        (Some(prev), Some(counters)) => match elapsed(prev.taken_at, reading.taken_at) {
            Some(dt) if dt >= min_interval => {
                let rates = network_rates(&prev.sample, &counters, dt);
                snapshot.network_in_rate_kbs = rates.in_kbs;
                snapshot.network_out_rate_kbs = rates.out_kbs;
                counter_regressions += rates.regressions;
                next.network = Some(Stamped::new(counters, reading.taken_at));
                DomainOutcome::Updated
            }
            // Baseline kept so the next cycle measures over a longer interval.
            _ => DomainOutcome::DegenerateInterval,
        },
    };

    let report = CycleReport {
        snapshot,
        cpu,
        memory,
        network,
        counter_regressions,
    };
    (report, next)
}

/// Strictly positive elapsed time, or `None`.
fn elapsed(from: Instant, to: Instant) -> Option<Duration> {
    to.checked_duration_since(from).filter(|d| !d.is_zero())
}

/// Counter delta; a decrease counts as a reset and yields 0.
fn counter_delta(prev: u64, cur: u64) -> (u64, u32) {
    match cur.checked_sub(prev) {
        Some(d) => (d, 0),
        None => (0, 1),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuUsage {
    pub percent: f64,
    pub regressions: u32,
}

pub fn cpu_usage(prev: &CpuTicks, cur: &CpuTicks) -> CpuUsage {
    let (user, r1) = counter_delta(prev.user, cur.user);
    let (system, r2) = counter_delta(prev.system, cur.system);
    let (nice, r3) = counter_delta(prev.nice, cur.nice);
    let (idle, r4) = counter_delta(prev.idle, cur.idle);

    let used = user.saturating_add(system).saturating_add(nice);
    let total = used.saturating_add(idle);
    let percent = if total > 0 {
        (used as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    CpuUsage {
        percent,
        regressions: r1 + r2 + r3 + r4,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryUsage {
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub percent: f64,
}

pub fn memory_usage(pages: &MemoryPages) -> MemoryUsage {
    let total = pages.total_bytes;
    // Free can transiently exceed total while the host updates its counters.
    let used = total.saturating_sub(pages.free_bytes());
    let percent = if total > 0 {
        (used as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    MemoryUsage {
        used_bytes: used,
        total_bytes: total,
        percent,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkRates {
    pub in_kbs: f64,
    pub out_kbs: f64,
    pub regressions: u32,
}

/// KiB/s over `dt`. Callers guarantee `dt` is non-zero.
pub fn network_rates(prev: &ByteCounters, cur: &ByteCounters, dt: Duration) -> NetworkRates {
    let (bytes_in, r1) = counter_delta(prev.bytes_in, cur.bytes_in);
    let (bytes_out, r2) = counter_delta(prev.bytes_out, cur.bytes_out);
    let secs = dt.as_secs_f64();
    NetworkRates {
        in_kbs: bytes_in as f64 / secs / 1024.0,
        out_kbs: bytes_out as f64 / secs / 1024.0,
        regressions: r1 + r2,
    }
}
