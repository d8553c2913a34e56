use std::net::IpAddr;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use sysinfo::{Components, Disks, System};

use super::net::{local_ip_toward, tcp_connection_count, PUBLIC_PROBE_ADDR};
use super::{DiskUsage, LoadAverage, MemoryUsage, MetricsSource, Sensor};
use crate::error::MetricsError;

/// Reads metrics from the running system through `sysinfo`, the kernel TCP
/// tables and a UDP route probe.
#[derive(Debug, Default)]
pub struct SystemSource;

impl SystemSource {
    pub fn new() -> Self {
        Self
    }
}

impl MetricsSource for SystemSource {
    fn now(&self) -> Result<u64, MetricsError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|e| MetricsError::Other(e.to_string()))
    }

    fn boot_time(&self) -> Result<u64, MetricsError> {
        match System::boot_time() {
            0 => Err(MetricsError::Other("boot time unknown".to_string())),
            t => Ok(t),
        }
    }

    fn load_average(&self) -> Result<LoadAverage, MetricsError> {
        let load = System::load_average();
        Ok(LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        })
    }

    fn memory(&self) -> Result<MemoryUsage, MetricsError> {
        let mut system = System::new();
        system.refresh_memory();
        let total_bytes = system.total_memory();
        if total_bytes == 0 {
            return Err(MetricsError::Other("memory size unknown".to_string()));
        }
        Ok(MemoryUsage {
            used_bytes: system.used_memory(),
            total_bytes,
        })
    }

    fn root_disk(&self) -> Result<DiskUsage, MetricsError> {
        let disks = Disks::new_with_refreshed_list();
        let root = Path::new("/");
        let disk = disks
            .list()
            .iter()
            .find(|d| d.mount_point() == root)
            .or_else(|| disks.list().first())
            .ok_or_else(|| MetricsError::NoDisk(root.display().to_string()))?;

        let stats = fs2::statvfs(disk.mount_point())?;
        Ok(DiskUsage::from_space(stats.total_space(), stats.free_space()))
    }

    fn sensors(&self) -> Result<Vec<Sensor>, MetricsError> {
        let components = Components::new_with_refreshed_list();
        Ok(components
            .list()
            .iter()
            .map(|c| Sensor {
                label: c.label().to_string(),
                celsius: c.temperature(),
            })
            .collect())
    }

    fn local_ip(&self) -> Result<IpAddr, MetricsError> {
        local_ip_toward(PUBLIC_PROBE_ADDR)
    }

    fn tcp_connections(&self) -> Result<usize, MetricsError> {
        tcp_connection_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_after_boot() {
        let source = SystemSource::new();
        let now = source.now().unwrap();
        if let Ok(boot) = source.boot_time() {
            assert!(boot <= now);
        }
    }

    #[test]
    fn memory_used_within_total() {
        if let Ok(mem) = SystemSource::new().memory() {
            assert!(mem.used_bytes <= mem.total_bytes);
        }
    }

    #[test]
    fn disk_used_within_total() {
        if let Ok(disk) = SystemSource::new().root_disk() {
            assert!(disk.used_bytes <= disk.total_bytes);
        }
    }
}
