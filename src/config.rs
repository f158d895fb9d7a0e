use crate::interfaces::{DEFAULT_EXCLUDE_PATTERNS, DEFAULT_INCLUDE_PREFIXES, InterfaceFilter};
use crate::scheduler::SchedulerConfig;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sampling: SamplingConfig,
    pub network: NetworkConfig,
    pub monitoring: MonitoringConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub interval_ms: u64,
    /// Cycles closer together than this do not update network rates.
    pub min_interval_ms: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            min_interval_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub include_prefixes: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            include_prefixes: DEFAULT_INCLUDE_PREFIXES.iter().map(|s| s.to_string()).collect(),
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// How often to log sampler stats at INFO level.
    pub stats_log_interval_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            stats_log_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print every published snapshot to stdout as one JSON line.
    pub json: bool,
}

impl AppConfig {
    /// Loads `$CONFIG_FILE` (default `config.toml`). A missing file yields the defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        if !std::path::Path::new(&path).exists() {
            tracing::info!(path = %path, "config file not found; using defaults");
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.sampling.interval_ms > 0,
            "sampling.interval_ms must be > 0, got {}",
            self.sampling.interval_ms
        );
        anyhow::ensure!(
            self.sampling.min_interval_ms > 0,
            "sampling.min_interval_ms must be > 0, got {}",
            self.sampling.min_interval_ms
        );
        anyhow::ensure!(
            self.sampling.min_interval_ms <= self.sampling.interval_ms,
            "sampling.min_interval_ms ({}) must not exceed sampling.interval_ms ({})",
            self.sampling.min_interval_ms,
            self.sampling.interval_ms
        );
        anyhow::ensure!(
            !self.network.include_prefixes.is_empty(),
            "network.include_prefixes must be non-empty"
        );
        anyhow::ensure!(
            self.network.include_prefixes.iter().all(|p| !p.is_empty()),
            "network.include_prefixes must not contain empty strings"
        );
        anyhow::ensure!(
            self.network.exclude_patterns.iter().all(|p| !p.is_empty()),
            "network.exclude_patterns must not contain empty strings"
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        Ok(())
    }

    pub fn interface_filter(&self) -> InterfaceFilter {
        InterfaceFilter::new(
            self.network.include_prefixes.iter().cloned(),
            self.network.exclude_patterns.iter().cloned(),
        )
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            interval: Duration::from_millis(self.sampling.interval_ms),
            min_interval: Duration::from_millis(self.sampling.min_interval_ms),
            stats_log_interval: Duration::from_secs(self.monitoring.stats_log_interval_secs),
            interface_filter: self.interface_filter(),
        }
    }
}
