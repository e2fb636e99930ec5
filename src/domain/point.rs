use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

// Channel layout for OHLCV points. Indicator sources carry their own
// named-field samples instead of packed channels.
pub const CH_OPEN: usize = 0;
pub const CH_HIGH: usize = 1;
pub const CH_LOW: usize = 2;
pub const CH_CLOSE: usize = 3;
pub const CH_VOLUME: usize = 4;

/// One timed sample flowing through the pipeline.
///
/// The timestamp is fixed at construction. The payload length is fixed too,
/// but individual slots may be overwritten in place by the producing
/// component. `valid` marks draw-eligibility: producers clear it on edge
/// samples that consumers must skip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedPoint {
    time: i64, // epoch seconds
    values: Vec<f64>,
    valid: bool,
}

impl TimedPoint {
    pub fn new(time: i64, values: Vec<f64>) -> Self {
        Self {
            time,
            values,
            valid: true,
        }
    }

    /// Convenience constructor for an OHLCV bar.
    pub fn ohlcv(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self::new(time, vec![open, high, low, close, volume])
    }

    #[inline]
    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn value(&self, index: usize) -> Result<f64> {
        self.values
            .get(index)
            .copied()
            .ok_or_else(|| anyhow!("value index {} out of range (len {})", index, self.values.len()))
    }

    pub fn set_value(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or_else(|| anyhow!("value index {} out of range (len {})", index, len))?;
        *slot = value;
        Ok(())
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    // OHLCV accessors. Panic-free: a short payload just reads as 0.
    pub fn open(&self) -> f64 {
        self.values.get(CH_OPEN).copied().unwrap_or(0.0)
    }
    pub fn high(&self) -> f64 {
        self.values.get(CH_HIGH).copied().unwrap_or(0.0)
    }
    pub fn low(&self) -> f64 {
        self.values.get(CH_LOW).copied().unwrap_or(0.0)
    }
    pub fn close(&self) -> f64 {
        self.values.get(CH_CLOSE).copied().unwrap_or(0.0)
    }
    pub fn volume(&self) -> f64 {
        self.values.get(CH_VOLUME).copied().unwrap_or(0.0)
    }

    pub fn is_bullish(&self) -> bool {
        self.close() >= self.open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_is_immutable_and_values_mutate_in_place() {
        let mut p = TimedPoint::new(1_700_000_000, vec![1.0, 2.0]);
        assert_eq!(p.time(), 1_700_000_000);
        p.set_value(1, 5.0).unwrap();
        assert_eq!(p.value(1).unwrap(), 5.0);
        assert_eq!(p.value(0).unwrap(), 1.0);
    }

    #[test]
    fn out_of_range_access_fails() {
        let mut p = TimedPoint::new(0, vec![1.0]);
        assert!(p.value(1).is_err());
        assert!(p.set_value(3, 0.0).is_err());
    }

    #[test]
    fn valid_flag_defaults_true_and_toggles() {
        let mut p = TimedPoint::new(0, vec![]);
        assert!(p.is_valid());
        p.set_valid(false);
        assert!(!p.is_valid());
    }

    #[test]
    fn ohlcv_accessors_and_direction() {
        let up = TimedPoint::ohlcv(10, 1.0, 3.0, 0.5, 2.0, 100.0);
        assert_eq!(up.open(), 1.0);
        assert_eq!(up.high(), 3.0);
        assert_eq!(up.low(), 0.5);
        assert_eq!(up.close(), 2.0);
        assert_eq!(up.volume(), 100.0);
        assert!(up.is_bullish());

        let down = TimedPoint::ohlcv(11, 2.0, 2.5, 1.0, 1.5, 50.0);
        assert!(!down.is_bullish());
    }
}
