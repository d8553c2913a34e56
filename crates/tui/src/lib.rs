pub mod render;
pub mod style;
pub mod text;

pub use render::{compose, format_date, Renderer};
pub use style::parse_style;
pub use text::StyledText;
