// Raw cumulative counters as read from the host, before any rate computation

use std::fmt;
use std::time::Instant;

/// The three sampled resource domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Cpu,
    Memory,
    Network,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Cpu => "cpu",
            Domain::Memory => "memory",
            Domain::Network => "network",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host-wide cumulative CPU time per category, in ticks since boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuTicks {
    pub user: u64,
    pub system: u64,
    pub idle: u64,
    pub nice: u64,
}

/// Virtual-memory page counts at one instant.
///
/// `page_size` is the byte size of one counted unit; `total_bytes` is the
/// physical memory size, stable for the lifetime of a boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryPages {
    pub free: u64,
    pub active: u64,
    pub inactive: u64,
    pub wired: u64,
    pub compressed: u64,
    pub page_size: u64,
    pub total_bytes: u64,
}

impl MemoryPages {
    pub fn free_bytes(&self) -> u64 {
        self.free.saturating_mul(self.page_size)
    }
}

/// Cumulative inbound/outbound byte counters, for one interface or summed
/// across several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ByteCounters {
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl ByteCounters {
    pub fn saturating_add(self, other: ByteCounters) -> ByteCounters {
        ByteCounters {
            bytes_in: self.bytes_in.saturating_add(other.bytes_in),
            bytes_out: self.bytes_out.saturating_add(other.bytes_out),
        }
    }
}

/// Address family of an enumerated interface entry. Only link-level entries
/// carry byte counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    Link,
    Inet,
    Inet6,
}

/// One row of a host interface enumeration. An interface usually shows up
/// several times: once per address family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceEntry {
    pub name: String,
    /// `None` when the entry has no address attached.
    pub family: Option<AddressFamily>,
    pub counters: Option<ByteCounters>,
}

impl InterfaceEntry {
    pub fn link(name: impl Into<String>, counters: ByteCounters) -> Self {
        Self {
            name: name.into(),
            family: Some(AddressFamily::Link),
            counters: Some(counters),
        }
    }
}

/// A raw sample paired with the monotonic instant it was captured at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamped<T> {
    pub sample: T,
    pub taken_at: Instant,
}

impl<T> Stamped<T> {
    pub fn new(sample: T, taken_at: Instant) -> Self {
        Self { sample, taken_at }
    }
}
