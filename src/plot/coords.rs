//! Column/value to pixel mapping for one plot pass.
//!
//! X is a linear interpolation of the column index over the horizontal
//! plot area; Y supports linear and logarithmic value scales. All
//! conversions are total: degenerate ranges normalize to a zero relative
//! offset instead of propagating NaN into the draw phase.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::config::DisplayScale;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString, Default,
)]
#[strum(ascii_case_insensitive)]
pub enum ScaleKind {
    #[default]
    Linear,
    /// `ln(1 + v)` on values and bounds, so zero and near-zero values
    /// stay finite.
    Logarithmic,
    /// TODO: rebase values to percent change from the first visible
    /// column; behaves as Linear until then.
    Percentage,
}

impl ScaleKind {
    #[inline]
    fn forward(&self, v: f64) -> f64 {
        match self {
            Self::Linear | Self::Percentage => v,
            Self::Logarithmic => v.ln_1p(),
        }
    }

    #[inline]
    fn inverse(&self, v: f64) -> f64 {
        match self {
            Self::Linear | Self::Percentage => v,
            Self::Logarithmic => v.exp_m1(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    pub start_index: usize,
    pub end_index: usize,
    pub min_value: f64,
    pub max_value: f64,

    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,

    pub scale: ScaleKind,
    pub display_scale: DisplayScale,
}

impl CoordinateMapper {
    // .max(1.0) keeps every later division finite when margins swallow
    // the whole canvas.
    #[inline]
    fn plot_width(&self) -> f64 {
        (self.width - self.margin_left - self.margin_right).max(1.0)
    }

    #[inline]
    fn plot_height(&self) -> f64 {
        (self.height - self.margin_top - self.margin_bottom).max(1.0)
    }

    #[inline]
    fn index_span(&self) -> f64 {
        self.end_index.saturating_sub(self.start_index) as f64
    }

    /// Horizontal pixel width of one column.
    pub fn column_width(&self) -> f64 {
        let span = self.index_span();
        if span > 0.0 { self.plot_width() / span } else { self.plot_width() }
    }

    /// Column index to horizontal pixel coordinate.
    pub fn index_to_x(&self, index: usize) -> f64 {
        let span = self.index_span();
        if span == 0.0 {
            return self.margin_left;
        }
        let rel = (index as f64 - self.start_index as f64) / span;
        self.margin_left + rel * self.plot_width()
    }

    /// Data value to vertical pixel coordinate (screen y grows downward).
    pub fn value_to_y(&self, value: f64) -> f64 {
        let lo = self.scale.forward(self.min_value);
        let hi = self.scale.forward(self.max_value);
        let mut rel = (self.scale.forward(value) - lo) / (hi - lo);
        if !rel.is_finite() {
            rel = 0.0; // degenerate min==max range
        }
        self.height - self.margin_bottom - rel * self.plot_height()
    }

    /// Pixel x back to the nearest column index, clamped to the visible
    /// range when outside the margins.
    pub fn x_to_index(&self, x: f64) -> usize {
        let left = self.margin_left;
        let right = self.width - self.margin_right;
        if x <= left {
            return self.start_index;
        }
        if x >= right {
            return self.end_index;
        }
        let rel = (x - left) / self.plot_width();
        self.start_index + (rel * self.index_span()).round() as usize
    }

    /// Pixel y back to a data value rounded to the display scale, clamped
    /// to the value bounds when outside the margins.
    pub fn y_to_value(&self, y: f64) -> f64 {
        let top = self.margin_top;
        let bottom = self.height - self.margin_bottom;
        if y <= top {
            return self.display_scale.round(self.max_value);
        }
        if y >= bottom {
            return self.display_scale.round(self.min_value);
        }
        let rel = (bottom - y) / self.plot_height();
        let lo = self.scale.forward(self.min_value);
        let hi = self.scale.forward(self.max_value);
        let value = self.scale.inverse(lo + rel * (hi - lo));
        self.display_scale.round(value)
    }
}
