use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};

use crate::config::DisplayScale;
use crate::domain::{Period, TimedPoint};

/// Descriptive metadata for a data source. Used only for display rounding
/// and axis formatting, never by merge or compute logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMeta {
    pub id: String,
    pub period: Period,
    pub instrument: Option<String>,
    pub display_scale: DisplayScale,
}

impl SourceMeta {
    pub fn new(id: impl Into<String>, period: Period) -> Self {
        Self {
            id: id.into(),
            period,
            instrument: None,
            display_scale: DisplayScale::default(),
        }
    }

    pub fn with_instrument(mut self, instrument: impl Into<String>) -> Self {
        self.instrument = Some(instrument.into());
        self
    }

    pub fn with_display_scale(mut self, scale: DisplayScale) -> Self {
        self.display_scale = scale;
        self
    }
}

/// Ordered, time-indexed sequence of samples. List-backed sources grow by
/// appending; computed sources are rebuilt by their engine. Size never
/// shrinks between calls.
pub trait DataSource: Send + Sync {
    fn meta(&self) -> &SourceMeta;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Timestamp (epoch seconds) at a local index.
    fn time_at(&self, index: usize) -> Result<i64>;

    /// Drawable channels at a local index. OHLCV sources return five
    /// channels; indicator sources return their single result channel,
    /// or an empty vector where no result exists.
    fn values_at(&self, index: usize) -> Result<Vec<f64>>;

    /// Draw-eligibility of the sample at a local index. Out-of-range
    /// indexes read as not valid (skip, don't fail).
    fn is_valid_at(&self, index: usize) -> bool;
}

/// List-backed OHLCV source. Append-only: points arrive from an external
/// loader already validated field-wise; only time ordering is enforced here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarSeries {
    meta: SourceMeta,
    points: Vec<TimedPoint>,
}

impl BarSeries {
    pub fn new(meta: SourceMeta) -> Self {
        Self {
            meta,
            points: Vec::new(),
        }
    }

    pub fn from_points(meta: SourceMeta, points: Vec<TimedPoint>) -> Result<Self> {
        let mut series = Self::new(meta);
        for point in points {
            series.push(point)?;
        }
        Ok(series)
    }

    /// Appends a point. Times must be strictly increasing; an equal or
    /// earlier timestamp is an ingestion bug surfaced to the caller.
    pub fn push(&mut self, point: TimedPoint) -> Result<()> {
        if let Some(last) = self.points.last() {
            if point.time() <= last.time() {
                bail!(
                    "out-of-order point for source '{}': {} <= {}",
                    self.meta.id,
                    point.time(),
                    last.time()
                );
            }
        }
        self.points.push(point);
        Ok(())
    }

    pub fn point_at(&self, index: usize) -> Result<&TimedPoint> {
        self.points.get(index).ok_or_else(|| {
            anyhow!(
                "index {} out of range for source '{}' (len {})",
                index,
                self.meta.id,
                self.points.len()
            )
        })
    }
}

impl DataSource for BarSeries {
    fn meta(&self) -> &SourceMeta {
        &self.meta
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn time_at(&self, index: usize) -> Result<i64> {
        Ok(self.point_at(index)?.time())
    }

    fn values_at(&self, index: usize) -> Result<Vec<f64>> {
        Ok(self.point_at(index)?.values().to_vec())
    }

    fn is_valid_at(&self, index: usize) -> bool {
        self.points.get(index).is_some_and(TimedPoint::is_valid)
    }
}
