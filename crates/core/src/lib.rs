pub mod art;
pub mod error;
pub mod metrics;

pub use art::{expand_art, load_art, DEFAULT_ART};
pub use error::MetricsError;
pub use metrics::{collect, MetricsSnapshot, MetricsSource, Reading, SystemSource, NOT_AVAILABLE};
