// Linux-specific helpers: raw CPU ticks from /proc/stat, page counts from /proc/meminfo.

use crate::error::ReadError;
#[cfg(not(target_os = "linux"))]
use crate::models::Domain;
use crate::models::{CpuTicks, MemoryPages};

const PROC_STAT: &str = "/proc/stat";
const PROC_MEMINFO: &str = "/proc/meminfo";

/// /proc/meminfo reports kB; that is the unit counted as one page here.
const MEMINFO_UNIT: u64 = 1024;

/// Aggregate CPU ticks since boot (Linux).
pub(super) fn read_cpu_ticks() -> Result<CpuTicks, ReadError> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string(PROC_STAT).map_err(|source| ReadError::Io {
            path: PROC_STAT,
            source,
        })?;
        parse_proc_stat(&content)
    }
    #[cfg(not(target_os = "linux"))]
    Err(ReadError::Unsupported(Domain::Cpu))
}

/// Memory page counts (Linux). `total_bytes` comes from the caller.
pub(super) fn read_memory_pages(total_bytes: u64) -> Result<MemoryPages, ReadError> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string(PROC_MEMINFO).map_err(|source| ReadError::Io {
            path: PROC_MEMINFO,
            source,
        })?;
        parse_meminfo(&content, total_bytes)
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = total_bytes;
        Err(ReadError::Unsupported(Domain::Memory))
    }
}

/// Parses the aggregate `cpu` line. iowait counts as idle; irq, softirq and
/// steal count as system time.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub(super) fn parse_proc_stat(content: &str) -> Result<CpuTicks, ReadError> {
    let line = content
        .lines()
        .find(|l| l.split_whitespace().next() == Some("cpu"))
        .ok_or_else(|| ReadError::Parse {
            what: PROC_STAT,
            detail: "no aggregate cpu line".into(),
        })?;

    let fields = line
        .split_whitespace()
        .skip(1)
        .map(|f| f.parse::<u64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ReadError::Parse {
            what: PROC_STAT,
            detail: e.to_string(),
        })?;
    if fields.len() < 4 {
        return Err(ReadError::Parse {
            what: PROC_STAT,
            detail: format!("expected at least 4 cpu fields, got {}", fields.len()),
        });
    }
    let field = |i: usize| fields.get(i).copied().unwrap_or(0);

    Ok(CpuTicks {
        user: field(0),
        nice: field(1),
        system: field(2)
            .saturating_add(field(5))
            .saturating_add(field(6))
            .saturating_add(field(7)),
        idle: field(3).saturating_add(field(4)),
    })
}

/// Parses page counts out of /proc/meminfo. `MemAvailable` is used as free
/// memory when present (kernels >= 3.14), otherwise `MemFree`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub(super) fn parse_meminfo(content: &str, total_bytes: u64) -> Result<MemoryPages, ReadError> {
    let value = |key: &str| -> Option<u64> {
        content.lines().find_map(|line| {
            let rest = line.strip_prefix(key)?.strip_prefix(':')?;
            rest.split_whitespace().next()?.parse().ok()
        })
    };

    let free = value("MemAvailable")
        .or_else(|| value("MemFree"))
        .ok_or_else(|| ReadError::Parse {
            what: PROC_MEMINFO,
            detail: "missing MemAvailable and MemFree".into(),
        })?;

    Ok(MemoryPages {
        free,
        active: value("Active").unwrap_or(0),
        inactive: value("Inactive").unwrap_or(0),
        wired: value("Unevictable").unwrap_or(0),
        compressed: value("Zswap").unwrap_or(0),
        page_size: MEMINFO_UNIT,
        total_bytes,
    })
}
