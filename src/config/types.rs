//! Small value types shared across the crate.

use serde::{Deserialize, Serialize};

use crate::utils::round_to_decimals;

/// Decimal-place rounding precision for displaying an instrument's price
/// (pip/tick scale). Used only for display rounding and axis formatting,
/// never by merge or compute logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayScale(u32);

impl DisplayScale {
    pub const fn new(decimals: u32) -> Self {
        // Anything past 12 decimals is noise for price display
        let d = if decimals > 12 { 12 } else { decimals };
        Self(d)
    }

    #[inline]
    pub fn decimals(self) -> u32 {
        self.0
    }

    /// Rounds a value to this scale.
    pub fn round(self, value: f64) -> f64 {
        round_to_decimals(value, self.0)
    }
}

impl Default for DisplayScale {
    fn default() -> Self {
        Self(2)
    }
}

impl std::fmt::Display for DisplayScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}dp", self.0)
    }
}
