//! Reusable widget components.

pub mod detail;
pub mod progress;
pub mod status;
pub mod tabs;

pub use detail::DetailPanel;
pub use progress::ProgressBar;
pub use status::StatusIndicator;
pub use tabs::{TabBar, TabOption};
