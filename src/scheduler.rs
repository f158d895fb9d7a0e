// Fixed-interval sampler: reads counters, runs the rate engine, publishes.
// One cycle at a time; ticks that fire during a cycle are dropped.

use crate::clock::Clock;
use crate::diagnostics::Diagnostics;
use crate::engine::{CycleReading, RateEngine};
use crate::error::ReadError;
use crate::interfaces::InterfaceFilter;
use crate::models::Domain;
use crate::source::CounterSource;
use crate::store::MetricsStore;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior, interval, interval_at};
use tracing::Instrument;

/// Collaborators the sampler reads from and publishes to.
pub struct SchedulerDeps {
    pub source: Arc<dyn CounterSource>,
    pub clock: Arc<dyn Clock>,
    pub store: MetricsStore,
    pub diagnostics: Arc<Diagnostics>,
}

/// Sampler timing and interface selection.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub interval: Duration,
    /// Shortest interval network rates are computed over.
    pub min_interval: Duration,
    /// How often diagnostics are logged at INFO.
    pub stats_log_interval: Duration,
    pub interface_filter: InterfaceFilter,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            min_interval: crate::engine::DEFAULT_MIN_INTERVAL,
            stats_log_interval: Duration::from_secs(60),
            interface_filter: InterfaceFilter::default(),
        }
    }
}

/// Cloneable stop trigger.
#[derive(Debug, Clone)]
pub struct StopSignal(Arc<watch::Sender<bool>>);

impl StopSignal {
    pub fn stop(&self) {
        self.0.send_replace(true);
    }
}

pub struct Scheduler {
    deps: SchedulerDeps,
    config: SchedulerConfig,
}

/// Running sampler. Dropping every [`StopSignal`] (including the one held
/// here) stops it as well.
pub struct SchedulerHandle {
    stop: StopSignal,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Halts future ticks. A cycle in flight finishes its current read and
    /// is discarded.
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Stops the sampler and waits for its task to exit.
    pub async fn shutdown(self) {
        self.stop();
        if let Err(e) = self.join.await {
            tracing::warn!(error = %e, "sampler task failed");
        }
    }
}

struct Stopped;

impl Scheduler {
    pub fn new(deps: SchedulerDeps, config: SchedulerConfig) -> Self {
        Self { deps, config }
    }

    /// Spawns the sampling loop on the current tokio runtime.
    pub fn start(self) -> SchedulerHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let span = tracing::debug_span!(
            "scheduler",
            interval_ms = self.config.interval.as_millis() as u64
        );
        let join = tokio::spawn(self.run(stop_rx).instrument(span));
        SchedulerHandle {
            stop: StopSignal(Arc::new(stop_tx)),
            join,
        }
    }

    async fn run(self, mut stop_rx: watch::Receiver<bool>) {
        let Scheduler { deps, config } = self;
        let filter = Arc::new(config.interface_filter.clone());
        let mut engine = RateEngine::new(config.min_interval);
        let mut unsupported = HashSet::new();

        let mut tick = interval(config.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut stats_log_tick = interval_at(
            Instant::now() + config.stats_log_interval,
            config.stats_log_interval,
        );
        stats_log_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        tracing::debug!("Scheduler shutting down");
                        break;
                    }
                }
                _ = tick.tick() => {
                    let started = Instant::now();
                    let cycle = run_cycle(&deps, &mut engine, &filter, &mut unsupported, &stop_rx);
                    if cycle.await.is_err() {
                        deps.diagnostics.record_aborted();
                        tracing::debug!("Cycle aborted by stop request");
                        break;
                    }
                    let overrun = started.elapsed().as_nanos() / config.interval.as_nanos().max(1);
                    if overrun > 0 {
                        deps.diagnostics.record_skipped_ticks(overrun as u64);
                        tracing::debug!(ticks_skipped = overrun as u64, "sampling cycle overran interval");
                    }
                }
                _ = stats_log_tick.tick() => {
                    deps.diagnostics.log();
                }
            }
        }
    }
}

async fn run_cycle(
    deps: &SchedulerDeps,
    engine: &mut RateEngine,
    filter: &Arc<InterfaceFilter>,
    unsupported: &mut HashSet<Domain>,
    stop_rx: &watch::Receiver<bool>,
) -> Result<(), Stopped> {
    let taken_at = deps.clock.now();
    let timestamp = deps.clock.unix_millis();

    let cpu = read_domain(deps, unsupported, stop_rx, Domain::Cpu, |s| s.read_cpu()).await?;
    let memory =
        read_domain(deps, unsupported, stop_rx, Domain::Memory, |s| s.read_memory()).await?;
    let filter = filter.clone();
    let network = read_domain(deps, unsupported, stop_rx, Domain::Network, move |s| {
        s.read_interfaces().map(|entries| filter.aggregate(&entries))
    })
    .await?;

    let reading = CycleReading {
        taken_at,
        timestamp,
        cpu,
        memory,
        network,
    };
    let previous = deps.store.latest();
    let report = engine.advance(&previous, &reading);
    deps.diagnostics.record_cycle(&report);

    if report.has_fresh_data() {
        deps.store.publish(report.snapshot);
        tracing::debug!(
            cpu = ?report.cpu,
            memory = ?report.memory,
            network = ?report.network,
            counter_regressions = report.counter_regressions,
            "snapshot published"
        );
    } else {
        tracing::debug!("no domain produced data; snapshot not published");
    }
    Ok(())
}

/// Runs one domain read on the blocking pool. A failed read is logged and
/// becomes `None`; only a pending stop request short-circuits the cycle.
/// A domain the platform cannot provide is reported once and never read again.
async fn read_domain<T, F>(
    deps: &SchedulerDeps,
    unsupported: &mut HashSet<Domain>,
    stop_rx: &watch::Receiver<bool>,
    domain: Domain,
    read: F,
) -> Result<Option<T>, Stopped>
where
    T: Send + 'static,
    F: FnOnce(&dyn CounterSource) -> Result<T, ReadError> + Send + 'static,
{
    if *stop_rx.borrow() {
        return Err(Stopped);
    }
    if unsupported.contains(&domain) {
        return Ok(None);
    }
    let source = deps.source.clone();
    let result = tokio::task::spawn_blocking(move || read(source.as_ref()))
        .await
        .map_err(ReadError::from)
        .and_then(|r| r);
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e @ ReadError::Unsupported(_)) => {
            tracing::warn!(
                error = %e,
                domain = %domain,
                "domain disabled; its fields stay at their last value"
            );
            deps.diagnostics.record_unsupported();
            unsupported.insert(domain);
            Ok(None)
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                domain = %domain,
                operation = "read_counters",
                "counter read failed"
            );
            deps.diagnostics.record_read_failure(domain);
            Ok(None)
        }
    }
}
