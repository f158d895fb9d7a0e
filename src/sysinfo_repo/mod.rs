// Host counters via sysinfo, with procfs for the raw tick and page counts
// sysinfo does not expose

mod linux;

use crate::error::ReadError;
use crate::models::*;
use crate::source::CounterSource;
use std::sync::Mutex;
use sysinfo::{MemoryRefreshKind, Networks, System};
use tracing::instrument;

pub struct SysinfoRepo {
    sys: Mutex<System>,
    networks: Mutex<Networks>,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoRepo {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory_specifics(MemoryRefreshKind::nothing().with_ram());
        let networks = Networks::new_with_refreshed_list();
        Self {
            sys: Mutex::new(sys),
            networks: Mutex::new(networks),
        }
    }
}

impl CounterSource for SysinfoRepo {
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "read_cpu"))]
    fn read_cpu(&self) -> Result<CpuTicks, ReadError> {
        linux::read_cpu_ticks()
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "read_memory"))]
    fn read_memory(&self) -> Result<MemoryPages, ReadError> {
        let mut sys = self
            .sys
            .lock()
            .map_err(|_| ReadError::LockPoisoned("sysinfo"))?;
        sys.refresh_memory_specifics(MemoryRefreshKind::nothing().with_ram());
        let total = sys.total_memory();

        match linux::read_memory_pages(total) {
            Err(ReadError::Unsupported(_)) => Ok(MemoryPages {
                free: sys.free_memory(),
                page_size: 1,
                total_bytes: total,
                ..Default::default()
            }),
            other => other,
        }
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "read_interfaces"))]
    fn read_interfaces(&self) -> Result<Vec<InterfaceEntry>, ReadError> {
        let mut networks = self
            .networks
            .lock()
            .map_err(|_| ReadError::LockPoisoned("sysinfo networks"))?;
        networks.refresh(true);

        let mut entries = Vec::with_capacity(networks.list().len() * 2);
        for (name, data) in networks.list() {
            entries.push(InterfaceEntry::link(
                name.clone(),
                ByteCounters {
                    bytes_in: data.total_received(),
                    bytes_out: data.total_transmitted(),
                },
            ));
            entries.extend(data.ip_networks().iter().map(|n| InterfaceEntry {
                name: name.clone(),
                family: Some(if n.addr.is_ipv4() {
                    AddressFamily::Inet
                } else {
                    AddressFamily::Inet6
                }),
                counters: None,
            }));
        }
        Ok(entries)
    }
}
