#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::too_many_arguments)]

// Core modules
pub mod analysis;
pub mod config;
pub mod domain;
pub mod models;
pub mod plot;
pub mod utils;

// Re-export commonly used types outside of crate (render_demo.rs uses them)
pub use crate::analysis::{IndicatorSample, IndicatorSource};
pub use crate::config::{AverageKind, IndicatorConfig, PriceField};
pub use crate::domain::{Period, PeriodUnit, TimedPoint};
pub use crate::models::{BarSeries, DataSource, MergedTimeline, SourceMeta, merge};
pub use crate::plot::{
    CoordinateMapper, DrawSink, PlotKind, PlotPass, RecordingSink, ScaleKind, SegmentedEvaluator,
};
