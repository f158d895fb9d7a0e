// Shared test helpers: scripted counter source and sample builders

#![allow(dead_code)]

use hostmeter::error::ReadError;
use hostmeter::models::*;
use hostmeter::scheduler::StopSignal;
use hostmeter::source::CounterSource;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

pub const CPU_T0: CpuTicks = CpuTicks {
    user: 100,
    system: 50,
    idle: 800,
    nice: 0,
};

/// Added to the CPU counters on every read: 15 busy ticks out of 55.
pub const CPU_STEP: CpuTicks = CpuTicks {
    user: 10,
    system: 5,
    idle: 40,
    nice: 0,
};

/// Added to en0's inbound counter on every read: 10 KiB.
pub const NET_STEP_IN: u64 = 10_240;
pub const NET_STEP_OUT: u64 = 2_048;

/// 16 GB total, 4 GB free.
pub fn memory_75_percent() -> MemoryPages {
    MemoryPages {
        free: 1_000_000,
        active: 2_000_000,
        inactive: 500_000,
        wired: 300_000,
        compressed: 100_000,
        page_size: 4_000,
        total_bytes: 16_000_000_000,
    }
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

/// Counter source whose counters advance by a fixed step on every read.
pub struct FakeSource {
    cpu: Mutex<CpuTicks>,
    en0: Mutex<ByteCounters>,
    memory: MemoryPages,
    failing: Mutex<HashSet<Domain>>,
    unsupported: Mutex<HashSet<Domain>>,
    delay: Duration,
    stop_on_cpu_read: Mutex<Option<StopSignal>>,
    pub cpu_reads: AtomicU64,
    pub memory_reads: AtomicU64,
    pub network_reads: AtomicU64,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl Default for FakeSource {
    fn default() -> Self {
        Self::with_delay(Duration::ZERO)
    }
}

impl FakeSource {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            cpu: Mutex::new(CPU_T0),
            en0: Mutex::new(ByteCounters {
                bytes_in: 100_000,
                bytes_out: 50_000,
            }),
            memory: memory_75_percent(),
            failing: Mutex::new(HashSet::new()),
            unsupported: Mutex::new(HashSet::new()),
            delay,
            stop_on_cpu_read: Mutex::new(None),
            cpu_reads: AtomicU64::new(0),
            memory_reads: AtomicU64::new(0),
            network_reads: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn set_failing(&self, domain: Domain, failing: bool) {
        let mut set = self.failing.lock().unwrap();
        if failing {
            set.insert(domain);
        } else {
            set.remove(&domain);
        }
    }

    /// Reads of `domain` report that the platform cannot provide it.
    pub fn set_unsupported(&self, domain: Domain) {
        self.unsupported.lock().unwrap().insert(domain);
    }

    /// The next CPU read triggers `signal` before returning.
    pub fn stop_on_cpu_read(&self, signal: StopSignal) {
        *self.stop_on_cpu_read.lock().unwrap() = Some(signal);
    }

    pub fn total_reads(&self) -> u64 {
        self.cpu_reads.load(Ordering::SeqCst)
            + self.memory_reads.load(Ordering::SeqCst)
            + self.network_reads.load(Ordering::SeqCst)
    }

    fn enter(&self, domain: Domain) -> Result<(), ReadError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        let failing = self.failing.lock().unwrap().contains(&domain);
        let unsupported = self.unsupported.lock().unwrap().contains(&domain);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if unsupported {
            return Err(ReadError::Unsupported(domain));
        }
        if failing {
            return Err(ReadError::Parse {
                what: "fake",
                detail: format!("{domain} read scripted to fail"),
            });
        }
        Ok(())
    }
}

impl CounterSource for FakeSource {
    fn read_cpu(&self) -> Result<CpuTicks, ReadError> {
        self.cpu_reads.fetch_add(1, Ordering::SeqCst);
        if let Some(signal) = self.stop_on_cpu_read.lock().unwrap().take() {
            signal.stop();
        }
        self.enter(Domain::Cpu)?;
        let mut cpu = self.cpu.lock().unwrap();
        let current = *cpu;
        cpu.user += CPU_STEP.user;
        cpu.system += CPU_STEP.system;
        cpu.idle += CPU_STEP.idle;
        cpu.nice += CPU_STEP.nice;
        Ok(current)
    }

    fn read_memory(&self) -> Result<MemoryPages, ReadError> {
        self.memory_reads.fetch_add(1, Ordering::SeqCst);
        self.enter(Domain::Memory)?;
        Ok(self.memory)
    }

    fn read_interfaces(&self) -> Result<Vec<InterfaceEntry>, ReadError> {
        self.network_reads.fetch_add(1, Ordering::SeqCst);
        self.enter(Domain::Network)?;
        let mut en0 = self.en0.lock().unwrap();
        let current = *en0;
        en0.bytes_in += NET_STEP_IN;
        en0.bytes_out += NET_STEP_OUT;
        Ok(vec![
            InterfaceEntry::link("en0", current),
            InterfaceEntry {
                name: "en0".into(),
                family: Some(AddressFamily::Inet),
                counters: None,
            },
            InterfaceEntry::link(
                "lo0",
                ByteCounters {
                    bytes_in: 9_999_999,
                    bytes_out: 9_999_999,
                },
            ),
            InterfaceEntry::link(
                "utun3",
                ByteCounters {
                    bytes_in: 777,
                    bytes_out: 777,
                },
            ),
            InterfaceEntry::link("bridge0", ByteCounters::default()),
        ])
    }
}
