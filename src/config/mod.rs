//! Configuration module for the charting core.

mod debug;
mod indicator;
mod types;

// Accessed by full path (config::plot::PLOT_STYLE), not re-exported
pub mod plot;

// Re-export commonly used items
pub use debug::DEBUG_FLAGS;
pub use indicator::{AverageKind, IndicatorConfig, PriceField};
pub use types::DisplayScale;
