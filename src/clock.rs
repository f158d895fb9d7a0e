// Injectable clock for elapsed-time measurement

use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Source of the monotonic instant used for rate computation and of the
/// wall-clock timestamp stamped onto snapshots.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
    /// Milliseconds since the Unix epoch.
    fn unix_millis(&self) -> u64;
}

/// Clock backed by tokio's timer, so paused-time tests advance it together
/// with the sampling interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    fn unix_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
                0
            })
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    base_unix_millis: u64,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new(base_unix_millis: u64) -> Self {
        Self {
            base: Instant::now(),
            base_unix_millis,
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|p| p.into_inner());
        *offset += by;
    }

    fn offset(&self) -> Duration {
        *self.offset.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset()
    }

    fn unix_millis(&self) -> u64 {
        self.base_unix_millis + self.offset().as_millis() as u64
    }
}
