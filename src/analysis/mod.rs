// Indicator engine: recurrences, fit pass, and the derived source.
pub mod average;
pub mod fit;
mod indicator;

pub use indicator::{IndicatorSample, IndicatorSource};
