//! Live system metrics, collected once per run.
//!
//! Every metric is a [`Reading`]: a failed query only degrades that metric to
//! [`Reading::Unavailable`], which renders as [`NOT_AVAILABLE`].

mod net;
mod source;

use std::fmt;
use std::net::IpAddr;

use riceshine_config::DisplayConfig;

use crate::error::MetricsError;

pub use net::{count_tcp_entries, local_ip_toward, PUBLIC_PROBE_ADDR};
pub use source::SystemSource;

/// Sentinel shown for a metric that could not be collected.
pub const NOT_AVAILABLE: &str = "N/A";

const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading<T> {
    Available(T),
    /// The query failed; rendered as [`NOT_AVAILABLE`].
    Unavailable,
    /// Hidden by the display flags, never queried.
    Skipped,
}

impl<T> Reading<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Reading::Available(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Reading::Available(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Reading<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Available(v) => v.fmt(f),
            Reading::Unavailable | Reading::Skipped => f.write_str(NOT_AVAILABLE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uptime {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
}

impl Uptime {
    pub fn from_seconds(secs: u64) -> Self {
        Self {
            days: secs / 86_400,
            hours: secs % 86_400 / 3_600,
            minutes: secs % 3_600 / 60,
        }
    }
}

impl fmt::Display for Uptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "up {} days, {} hours, {} minutes",
            self.days, self.hours, self.minutes
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

impl fmt::Display for LoadAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}, {:.2}, {:.2}", self.one, self.five, self.fifteen)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryUsage {
    pub used_bytes: u64,
    pub total_bytes: u64,
}

impl fmt::Display for MemoryUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Mi/{:.1}Gi",
            self.used_bytes / MIB,
            self.total_bytes as f64 / GIB as f64
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    pub used_bytes: u64,
    pub total_bytes: u64,
}

impl DiskUsage {
    /// Usage from filesystem totals. Free space includes blocks reserved for
    /// root, so those are not counted as used.
    pub fn from_space(total_bytes: u64, free_bytes: u64) -> Self {
        Self {
            used_bytes: total_bytes.saturating_sub(free_bytes),
            total_bytes,
        }
    }
}

impl fmt::Display for DiskUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}G/{}G", self.used_bytes / GIB, self.total_bytes / GIB)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature {
    pub celsius: f32,
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{:.1}°C", self.celsius)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    pub label: String,
    pub celsius: f32,
}

/// Prefers the CPU package sensor (`coretemp*`), else the first readable one.
pub fn pick_temperature(sensors: &[Sensor]) -> Option<Temperature> {
    let readable = || sensors.iter().filter(|s| s.celsius.is_finite());
    readable()
        .find(|s| s.label.to_ascii_lowercase().starts_with("coretemp"))
        .or_else(|| readable().next())
        .map(|s| Temperature { celsius: s.celsius })
}

/// Where readings come from. [`SystemSource`] talks to the OS.
pub trait MetricsSource {
    /// Current wall-clock time, seconds since the Unix epoch.
    fn now(&self) -> Result<u64, MetricsError>;
    /// Boot time, seconds since the Unix epoch.
    fn boot_time(&self) -> Result<u64, MetricsError>;
    fn load_average(&self) -> Result<LoadAverage, MetricsError>;
    fn memory(&self) -> Result<MemoryUsage, MetricsError>;
    fn root_disk(&self) -> Result<DiskUsage, MetricsError>;
    fn sensors(&self) -> Result<Vec<Sensor>, MetricsError>;
    fn local_ip(&self) -> Result<IpAddr, MetricsError>;
    fn tcp_connections(&self) -> Result<usize, MetricsError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub uptime: Reading<Uptime>,
    pub load: Reading<LoadAverage>,
    pub memory: Reading<MemoryUsage>,
    pub disk: Reading<DiskUsage>,
    pub temperature: Reading<Temperature>,
    pub local_ip: Reading<IpAddr>,
    pub tcp_connections: Reading<usize>,
}

pub fn collect(source: &dyn MetricsSource, display: &DisplayConfig) -> MetricsSnapshot {
    MetricsSnapshot {
        uptime: read(display.show_uptime, "uptime", || {
            let now = source.now()?;
            let boot_time = source.boot_time()?;
            if boot_time > now {
                return Err(MetricsError::ClockSkew { boot_time, now });
            }
            Ok(Uptime::from_seconds(now - boot_time))
        }),
        load: read(display.show_load, "load", || source.load_average()),
        memory: read(display.show_memory, "memory", || source.memory()),
        disk: read(display.show_disk, "disk", || source.root_disk()),
        temperature: read(display.show_temp, "temperature", || {
            pick_temperature(&source.sensors()?).ok_or(MetricsError::NoSensors)
        }),
        local_ip: read(display.show_ip, "local_ip", || source.local_ip()),
        tcp_connections: read(display.show_tcp, "tcp", || source.tcp_connections()),
    }
}

fn read<T>(
    enabled: bool,
    metric: &'static str,
    query: impl FnOnce() -> Result<T, MetricsError>,
) -> Reading<T> {
    if !enabled {
        return Reading::Skipped;
    }
    match query() {
        Ok(v) => Reading::Available(v),
        Err(e) => {
            tracing::debug!(metric, error = %e, "Metric unavailable");
            Reading::Unavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::net::Ipv4Addr;

    struct FakeSource {
        now: u64,
        boot_time: u64,
        sensors: Vec<Sensor>,
        network_up: bool,
        calls: Cell<usize>,
    }

    impl Default for FakeSource {
        fn default() -> Self {
            Self {
                now: 1_700_000_000,
                boot_time: 1_700_000_000 - 90_061,
                sensors: vec![Sensor {
                    label: "acpitz temp1".to_string(),
                    celsius: 41.0,
                }],
                network_up: true,
                calls: Cell::new(0),
            }
        }
    }

    impl FakeSource {
        fn tick(&self) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    impl MetricsSource for FakeSource {
        fn now(&self) -> Result<u64, MetricsError> {
            Ok(self.now)
        }

        fn boot_time(&self) -> Result<u64, MetricsError> {
            self.tick();
            Ok(self.boot_time)
        }

        fn load_average(&self) -> Result<LoadAverage, MetricsError> {
            self.tick();
            Ok(LoadAverage {
                one: 0.5,
                five: 0.25,
                fifteen: 1.0 / 3.0,
            })
        }

        fn memory(&self) -> Result<MemoryUsage, MetricsError> {
            self.tick();
            Ok(MemoryUsage {
                used_bytes: 3 * GIB + MIB / 2,
                total_bytes: 16 * GIB,
            })
        }

        fn root_disk(&self) -> Result<DiskUsage, MetricsError> {
            self.tick();
            Ok(DiskUsage {
                used_bytes: 120 * GIB + GIB - 1,
                total_bytes: 476 * GIB,
            })
        }

        fn sensors(&self) -> Result<Vec<Sensor>, MetricsError> {
            self.tick();
            Ok(self.sensors.clone())
        }

        fn local_ip(&self) -> Result<IpAddr, MetricsError> {
            self.tick();
            if self.network_up {
                Ok(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 23)))
            } else {
                Err(MetricsError::Io(std::io::Error::new(
                    std::io::ErrorKind::NetworkUnreachable,
                    "network is unreachable",
                )))
            }
        }

        fn tcp_connections(&self) -> Result<usize, MetricsError> {
            self.tick();
            Ok(17)
        }
    }

    #[test]
    fn uptime_floors_each_unit() {
        let snapshot = collect(&FakeSource::default(), &DisplayConfig::default());
        assert_eq!(
            snapshot.uptime.to_string(),
            "up 1 days, 1 hours, 1 minutes"
        );
    }

    #[test]
    fn uptime_decomposition() {
        assert_eq!(
            Uptime::from_seconds(59),
            Uptime { days: 0, hours: 0, minutes: 0 }
        );
        assert_eq!(
            Uptime::from_seconds(2 * 86_400 + 23 * 3_600 + 59 * 60 + 59),
            Uptime { days: 2, hours: 23, minutes: 59 }
        );
    }

    #[test]
    fn boot_time_after_now_is_unavailable() {
        let source = FakeSource {
            boot_time: 1_800_000_000,
            ..Default::default()
        };
        let snapshot = collect(&source, &DisplayConfig::default());
        assert_eq!(snapshot.uptime, Reading::Unavailable);
    }

    #[test]
    fn formatting_rules() {
        let snapshot = collect(&FakeSource::default(), &DisplayConfig::default());
        assert_eq!(snapshot.load.to_string(), "0.50, 0.25, 0.33");
        assert_eq!(snapshot.memory.to_string(), "3072Mi/16.0Gi");
        assert_eq!(snapshot.disk.to_string(), "120G/476G");
        assert_eq!(snapshot.temperature.to_string(), "+41.0°C");
        assert_eq!(snapshot.local_ip.to_string(), "192.168.1.23");
        assert_eq!(snapshot.tcp_connections.to_string(), "17");
    }

    #[test]
    fn disk_used_excludes_reserved_blocks() {
        // statvfs of a 251G ext4 root: f_frsize, f_blocks, f_bfree, f_bavail
        let (frsize, blocks, bfree, bavail): (u64, u64, u64, u64) =
            (4096, 66_053_998, 61_633_423, 58_266_000);
        let disk = DiskUsage::from_space(blocks * frsize, bfree * frsize);
        assert_eq!(disk.used_bytes, (blocks - bfree) * frsize);
        assert_eq!(disk.to_string(), "16G/251G");
        assert_ne!(
            DiskUsage::from_space(blocks * frsize, bavail * frsize).to_string(),
            disk.to_string()
        );
        assert_eq!(DiskUsage::from_space(10, 20).used_bytes, 0);
    }

    #[test]
    fn no_sensors_is_sentinel() {
        let source = FakeSource {
            sensors: Vec::new(),
            ..Default::default()
        };
        let snapshot = collect(&source, &DisplayConfig::default());
        assert_eq!(snapshot.temperature, Reading::Unavailable);
        assert_eq!(snapshot.temperature.to_string(), "N/A");
        assert!(snapshot.memory.is_available());
    }

    #[test]
    fn network_failure_is_sentinel() {
        let source = FakeSource {
            network_up: false,
            ..Default::default()
        };
        let snapshot = collect(&source, &DisplayConfig::default());
        assert_eq!(snapshot.local_ip.to_string(), "N/A");
        assert_eq!(snapshot.tcp_connections.value(), Some(&17));
    }

    #[test]
    fn coretemp_preferred() {
        let sensors = vec![
            Sensor {
                label: "acpitz temp1".to_string(),
                celsius: 27.8,
            },
            Sensor {
                label: "coretemp Package id 0".to_string(),
                celsius: 52.3,
            },
        ];
        assert_eq!(
            pick_temperature(&sensors).unwrap().to_string(),
            "+52.3°C"
        );
    }

    #[test]
    fn unreadable_sensors_skipped() {
        let sensors = vec![
            Sensor {
                label: "coretemp Core 0".to_string(),
                celsius: f32::NAN,
            },
            Sensor {
                label: "nvme Composite".to_string(),
                celsius: 38.0,
            },
        ];
        assert_eq!(pick_temperature(&sensors), Some(Temperature { celsius: 38.0 }));
        assert_eq!(pick_temperature(&[]), None);
    }

    #[test]
    fn disabled_metrics_are_not_queried() {
        let display = DisplayConfig {
            show_uptime: false,
            show_load: false,
            show_memory: false,
            show_disk: false,
            show_temp: false,
            show_ip: false,
            show_tcp: false,
            ..Default::default()
        };
        let source = FakeSource::default();
        let snapshot = collect(&source, &display);
        assert_eq!(source.calls.get(), 0);
        assert_eq!(snapshot.uptime, Reading::Skipped);
        assert_eq!(snapshot.local_ip, Reading::Skipped);
    }
}
