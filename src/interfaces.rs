// Network interface eligibility and byte-counter aggregation

use crate::models::{AddressFamily, ByteCounters, InterfaceEntry};

/// `wlp` covers systemd's predictable Wi-Fi names (`wlp2s0`). Onboard Wi-Fi
/// named `wlo*` still contains `lo` and stays excluded.
pub const DEFAULT_INCLUDE_PREFIXES: &[&str] = &["en", "eth", "wlan", "wlp", "bridge"];
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["lo", "utun"];

/// Decides which interfaces count toward the host throughput.
///
/// A name is eligible when it starts with one of the include prefixes and
/// contains none of the exclude patterns. Exclusion wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceFilter {
    include_prefixes: Vec<String>,
    exclude_patterns: Vec<String>,
}

impl Default for InterfaceFilter {
    fn default() -> Self {
        Self::new(
            DEFAULT_INCLUDE_PREFIXES.iter().copied(),
            DEFAULT_EXCLUDE_PATTERNS.iter().copied(),
        )
    }
}

impl InterfaceFilter {
    pub fn new<I, E>(include_prefixes: I, exclude_patterns: E) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            include_prefixes: include_prefixes.into_iter().map(Into::into).collect(),
            exclude_patterns: exclude_patterns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_eligible(&self, name: &str) -> bool {
        if self.exclude_patterns.iter().any(|p| name.contains(p.as_str())) {
            return false;
        }
        self.include_prefixes
            .iter()
            .any(|p| name.starts_with(p.as_str()))
    }

    /// Counters this entry contributes, if any. Entries without an address,
    /// with a non link-level family, or without a counter payload are skipped.
    pub fn contribution(&self, entry: &InterfaceEntry) -> Option<ByteCounters> {
        if entry.family != Some(AddressFamily::Link) {
            return None;
        }
        let counters = entry.counters?;
        self.is_eligible(&entry.name).then_some(counters)
    }

    /// Sums the counters of every eligible entry.
    pub fn aggregate(&self, entries: &[InterfaceEntry]) -> ByteCounters {
        entries
            .iter()
            .filter_map(|e| self.contribution(e))
            .fold(ByteCounters::default(), ByteCounters::saturating_add)
    }
}
