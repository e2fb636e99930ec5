use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum_macros::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Default)]
pub enum PeriodUnit {
    Second,
    #[default]
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

impl PeriodUnit {
    fn base_secs(&self) -> u64 {
        match self {
            Self::Second => 1,
            Self::Minute => 60,
            Self::Hour => 60 * 60,
            Self::Day => 24 * 60 * 60,
            Self::Week => 7 * 24 * 60 * 60,
            Self::Month => 30 * 24 * 60 * 60, // approx
        }
    }

    // Largest multiplier that still reads as this unit. A "90 minute" period
    // should be configured as hours, not minutes.
    fn max_multiplier(&self) -> u32 {
        match self {
            Self::Second => 59,
            Self::Minute => 59,
            Self::Hour => 23,
            Self::Day => 31,
            Self::Week => 52,
            Self::Month => 12,
        }
    }

    fn short_code(&self) -> &'static str {
        match self {
            Self::Second => "s",
            Self::Minute => "m",
            Self::Hour => "h",
            Self::Day => "D",
            Self::Week => "W",
            Self::Month => "M",
        }
    }
}

/// Sampling granularity shared by sources being merged, e.g. "5 minutes".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    unit: PeriodUnit,
    multiplier: u32,
}

impl Period {
    pub fn new(unit: PeriodUnit, multiplier: u32) -> Result<Self> {
        if multiplier == 0 {
            bail!("period multiplier must be at least 1");
        }
        if multiplier > unit.max_multiplier() {
            bail!(
                "invalid period: {}x {:?} exceeds maximum of {}",
                multiplier,
                unit,
                unit.max_multiplier()
            );
        }
        Ok(Self { unit, multiplier })
    }

    pub fn minutes(multiplier: u32) -> Result<Self> {
        Self::new(PeriodUnit::Minute, multiplier)
    }

    pub fn days(multiplier: u32) -> Result<Self> {
        Self::new(PeriodUnit::Day, multiplier)
    }

    #[inline]
    pub fn unit(&self) -> PeriodUnit {
        self.unit
    }

    #[inline]
    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.unit.base_secs() * u64::from(self.multiplier))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.multiplier, self.unit.short_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_combinations() {
        assert!(Period::minutes(5).is_ok());
        assert!(Period::new(PeriodUnit::Hour, 4).is_ok());
        assert!(Period::days(1).is_ok());
    }

    #[test]
    fn zero_multiplier_rejected() {
        assert!(Period::minutes(0).is_err());
    }

    #[test]
    fn oversized_multiplier_rejected() {
        assert!(Period::minutes(60).is_err());
        assert!(Period::new(PeriodUnit::Hour, 24).is_err());
        assert!(Period::new(PeriodUnit::Month, 13).is_err());
    }

    #[test]
    fn duration_and_display() {
        let p = Period::minutes(5).unwrap();
        assert_eq!(p.duration(), Duration::from_secs(300));
        assert_eq!(p.to_string(), "5m");
        assert_eq!(Period::days(3).unwrap().to_string(), "3D");
    }

    #[test]
    fn equality_across_construction() {
        assert_eq!(Period::minutes(15).unwrap(), Period::minutes(15).unwrap());
        assert_ne!(Period::minutes(15).unwrap(), Period::minutes(5).unwrap());
    }
}
