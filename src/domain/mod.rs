// Domain types and value objects
mod period;
mod point;

// Re-export commonly used types to the world
pub use period::{Period, PeriodUnit};
pub use point::{CH_CLOSE, CH_HIGH, CH_LOW, CH_OPEN, CH_VOLUME, TimedPoint};
