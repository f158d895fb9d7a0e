// Sampler diagnostics: counters of skipped work and tolerated failures

use crate::engine::{CycleReport, DomainOutcome};
use crate::models::Domain;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Diagnostics {
    cycles_completed: AtomicU64,
    cycles_aborted: AtomicU64,
    ticks_skipped: AtomicU64,
    cpu_read_failures: AtomicU64,
    memory_read_failures: AtomicU64,
    network_read_failures: AtomicU64,
    domains_unsupported: AtomicU64,
    degenerate_intervals: AtomicU64,
    counter_regressions: AtomicU64,
}

/// Point-in-time copy of [`Diagnostics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticsSnapshot {
    pub cycles_completed: u64,
    pub cycles_aborted: u64,
    pub ticks_skipped: u64,
    pub cpu_read_failures: u64,
    pub memory_read_failures: u64,
    pub network_read_failures: u64,
    /// Domains disabled because the platform cannot provide them.
    pub domains_unsupported: u64,
    pub degenerate_intervals: u64,
    pub counter_regressions: u64,
}

impl Diagnostics {
    pub fn record_read_failure(&self, domain: Domain) {
        let counter = match domain {
            Domain::Cpu => &self.cpu_read_failures,
            Domain::Memory => &self.memory_read_failures,
            Domain::Network => &self.network_read_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unsupported(&self) {
        self.domains_unsupported.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cycle(&self, report: &CycleReport) {
        let degenerate = [report.cpu, report.memory, report.network]
            .into_iter()
            .filter(|o| *o == DomainOutcome::DegenerateInterval)
            .count() as u64;
        self.degenerate_intervals
            .fetch_add(degenerate, Ordering::Relaxed);
        self.counter_regressions
            .fetch_add(u64::from(report.counter_regressions), Ordering::Relaxed);
        self.cycles_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_aborted(&self) {
        self.cycles_aborted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped_ticks(&self, n: u64) {
        self.ticks_skipped.fetch_add(n, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            cycles_completed: self.cycles_completed.load(Ordering::Relaxed),
            cycles_aborted: self.cycles_aborted.load(Ordering::Relaxed),
            ticks_skipped: self.ticks_skipped.load(Ordering::Relaxed),
            cpu_read_failures: self.cpu_read_failures.load(Ordering::Relaxed),
            memory_read_failures: self.memory_read_failures.load(Ordering::Relaxed),
            network_read_failures: self.network_read_failures.load(Ordering::Relaxed),
            domains_unsupported: self.domains_unsupported.load(Ordering::Relaxed),
            degenerate_intervals: self.degenerate_intervals.load(Ordering::Relaxed),
            counter_regressions: self.counter_regressions.load(Ordering::Relaxed),
        }
    }

    pub fn log(&self) {
        let s = self.snapshot();
        tracing::info!(
            cycles_completed = s.cycles_completed,
            cycles_aborted = s.cycles_aborted,
            ticks_skipped = s.ticks_skipped,
            cpu_read_failures = s.cpu_read_failures,
            memory_read_failures = s.memory_read_failures,
            network_read_failures = s.network_read_failures,
            domains_unsupported = s.domains_unsupported,
            degenerate_intervals = s.degenerate_intervals,
            counter_regressions = s.counter_regressions,
            "sampler stats"
        );
    }
}
