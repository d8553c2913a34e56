#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("No temperature sensors found")]
    NoSensors,

    #[error("No disk mounted at {0}")]
    NoDisk(String),

    #[error("Boot time is in the future ({boot_time}s > {now}s)")]
    ClockSkew { boot_time: u64, now: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported on this platform: {0}")]
    Unsupported(&'static str),

    #[error("{0}")]
    Other(String),
}
