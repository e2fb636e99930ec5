mod coords;
mod evaluator;
mod primitives;

pub use coords::{CoordinateMapper, ScaleKind};
pub use evaluator::{PlotKind, PlotPass, PlotSegment, SegmentedEvaluator};
pub use primitives::{Color, DrawOp, DrawSink, RecordingSink};
