//! Indicator configuration (Immutable Blueprints)
//!
//! Replaces callback-driven mutable parameter objects with a plain config
//! struct validated and resolved once at the start of each calculation.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::domain::{CH_CLOSE, CH_HIGH, CH_LOW, CH_OPEN};

/// Selects the moving-average recurrence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString, Default,
)]
#[strum(ascii_case_insensitive)]
pub enum AverageKind {
    #[default]
    Sma,
    Ema,
    Wma,
}

/// Which OHLC channel feeds the average.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString, Default,
)]
#[strum(ascii_case_insensitive)]
pub enum PriceField {
    Open,
    High,
    Low,
    #[default]
    Close,
    Median,
}

impl PriceField {
    /// Projects one drawable-channel vector to a single input value.
    ///
    /// Sources with fewer than four channels (e.g. an indicator feeding
    /// another indicator) expose their sole result channel regardless of
    /// the configured field.
    pub fn project(&self, values: &[f64]) -> Option<f64> {
        if values.len() < 4 {
            return values.first().copied();
        }
        match self {
            Self::Open => values.get(CH_OPEN).copied(),
            Self::High => values.get(CH_HIGH).copied(),
            Self::Low => values.get(CH_LOW).copied(),
            Self::Close => values.get(CH_CLOSE).copied(),
            Self::Median => Some((values[CH_HIGH] + values[CH_LOW]) / 2.0),
        }
    }
}

/// Full configuration of one derived (indicator) source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub kind: AverageKind,
    /// Window length (bars) for the primary average.
    pub periods: usize,
    /// Second-pass window applied to the primary output. 0 disables.
    #[serde(default)]
    pub smooth_periods: usize,
    #[serde(default)]
    pub field: PriceField,
    /// Post-process horizontal least-squared-error alignment pass.
    #[serde(default)]
    pub fit: bool,
}

impl IndicatorConfig {
    pub fn new(kind: AverageKind, periods: usize) -> Self {
        Self {
            kind,
            periods,
            smooth_periods: 0,
            field: PriceField::Close,
            fit: false,
        }
    }

    pub fn with_smoothing(mut self, smooth_periods: usize) -> Self {
        self.smooth_periods = smooth_periods;
        self
    }

    pub fn with_field(mut self, field: PriceField) -> Self {
        self.field = field;
        self
    }

    pub fn with_fit(mut self, fit: bool) -> Self {
        self.fit = fit;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.periods == 0 {
            bail!("indicator periods must be at least 1");
        }
        Ok(())
    }
}

impl std::fmt::Display for IndicatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}, {})", self.kind, self.periods, self.field)?;
        if self.smooth_periods > 0 {
            write!(f, "+smooth{}", self.smooth_periods)?;
        }
        if self.fit {
            write!(f, "+fit")?;
        }
        Ok(())
    }
}
