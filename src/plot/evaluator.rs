//! Segmented parallel plot evaluation.
//!
//! A plot pass over a visible column range is either computed in one
//! sequential sweep or split into contiguous segments computed on the
//! rayon pool. Segments only read shared immutable inputs and write their
//! own private op list, so the parallel region needs no locking. Replay
//! walks segments in creation order, which pins the draw order to
//! left-to-right regardless of which worker finished first.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::plot::{PLOT_STYLE, PlotStyle};
use crate::models::DataSource;
use crate::plot::coords::CoordinateMapper;
use crate::plot::primitives::{DrawOp, DrawSink};

/// What to draw for each visible column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlotKind {
    /// Connect consecutive samples of one drawable channel.
    Line { channel: usize },
    /// OHLC bars: high-low spine with open/close ticks.
    Bars,
}

/// Read-only inputs for one plot pass.
pub struct PlotPass<'a> {
    pub source: &'a dyn DataSource,
    /// Column index to local index row from the merged timeline, or
    /// `None` when the source is already globally aligned (indicator
    /// sources).
    pub index_map: Option<&'a [i64]>,
    pub mapper: &'a CoordinateMapper,
    pub kind: PlotKind,
    pub style: &'a PlotStyle,
}

impl PlotPass<'_> {
    /// Global column to local source index. Absent or out-of-range
    /// columns resolve to `None` (skip, don't fail).
    fn resolve_local(&self, column: usize) -> Option<usize> {
        let local = match self.index_map {
            Some(row) => {
                let mapped = *row.get(column)?;
                if mapped < 0 {
                    return None;
                }
                mapped as usize
            }
            None => column,
        };
        (local < self.source.len()).then_some(local)
    }

    /// Local index plus the drawable channel value for one column.
    fn channel_value(&self, column: usize, channel: usize) -> Option<(usize, f64)> {
        let local = self.resolve_local(column)?;
        let values = self.source.values_at(local).ok()?;
        values.get(channel).copied().map(|v| (local, v))
    }

    /// Nearest earlier column carrying a value for this channel. Only
    /// walked once per segment to seed the carried predecessor; the
    /// per-column loop never rescans.
    fn previous_column(&self, column: usize, channel: usize) -> Option<(usize, usize, f64)> {
        (0..column)
            .rev()
            .find_map(|c| self.channel_value(c, channel).map(|(l, v)| (c, l, v)))
    }

    /// Line op for one column given the carried predecessor. Returns the
    /// predecessor for the next column: this column if it carries a value
    /// (valid or not), otherwise the old one.
    fn line_ops(
        &self,
        column: usize,
        channel: usize,
        prev: Option<(usize, usize, f64)>,
        ops: &mut Vec<DrawOp>,
    ) -> Option<(usize, usize, f64)> {
        let Some((local, value)) = self.channel_value(column, channel) else {
            return prev;
        };
        if self.source.is_valid_at(local) {
            if let Some((prev_column, prev_local, prev_value)) = prev {
                // Invalid predecessors still advance the carry but never
                // get a continuity line drawn into them.
                if self.source.is_valid_at(prev_local) {
                    ops.push(DrawOp::Line {
                        x1: self.mapper.index_to_x(prev_column),
                        y1: self.mapper.value_to_y(prev_value),
                        x2: self.mapper.index_to_x(column),
                        y2: self.mapper.value_to_y(value),
                    });
                }
            }
        }
        Some((column, local, value))
    }

    fn bar_ops(&self, column: usize, ops: &mut Vec<DrawOp>) {
        let Some(local) = self.resolve_local(column) else {
            return;
        };
        if !self.source.is_valid_at(local) {
            return;
        }
        let Ok(values) = self.source.values_at(local) else {
            return;
        };
        if values.len() < 4 {
            return; // not an OHLC source
        }
        let (open, high, low, close) = (values[0], values[1], values[2], values[3]);

        let color = if close >= open {
            self.style.bar_bullish_color
        } else {
            self.style.bar_bearish_color
        };
        let x = self.mapper.index_to_x(column);
        let half_tick = self.mapper.column_width() * self.style.bar_tick_width_pct / 2.0;

        ops.push(DrawOp::Stroke {
            color,
            width: self.style.bar_line_width,
        });
        // High-low spine
        ops.push(DrawOp::Line {
            x1: x,
            y1: self.mapper.value_to_y(high),
            x2: x,
            y2: self.mapper.value_to_y(low),
        });
        // Open tick to the left, close tick to the right
        let y_open = self.mapper.value_to_y(open);
        ops.push(DrawOp::Line {
            x1: x - half_tick,
            y1: y_open,
            x2: x,
            y2: y_open,
        });
        let y_close = self.mapper.value_to_y(close);
        ops.push(DrawOp::Line {
            x1: x,
            y1: y_close,
            x2: x + half_tick,
            y2: y_close,
        });
    }
}

/// Contiguous sub-range of columns and its computed ops. Consumed once by
/// the replay pass.
#[derive(Debug)]
pub struct PlotSegment {
    pub start: usize,
    pub end: usize,
    pub ops: Vec<DrawOp>,
}

/// Splits a column range into segments and decides between the sequential
/// and parallel compute paths.
pub struct SegmentedEvaluator {
    pub parallelism: usize,
    /// Minimum columns per segment before going parallel.
    pub segment_min: usize,
}

impl Default for SegmentedEvaluator {
    fn default() -> Self {
        Self {
            parallelism: rayon::current_num_threads(),
            segment_min: PLOT_STYLE.parallel_segment_min,
        }
    }
}

impl SegmentedEvaluator {
    /// Computes ordered segments for `[start, end]` (inclusive columns).
    /// The parallel and sequential paths produce identical op streams.
    pub fn evaluate(&self, pass: &PlotPass<'_>, start: usize, end: usize) -> Vec<PlotSegment> {
        if end < start {
            return Vec::new();
        }
        let periods = end - start + 1;
        let workers = self.parallelism.max(1);
        let per_segment = periods / workers;

        let ranges = if workers > 1 && per_segment > self.segment_min {
            split_ranges(start, end, per_segment)
        } else {
            vec![(start, end)]
        };

        if crate::config::DEBUG_FLAGS.log_plot {
            log::debug!(
                "plot pass '{}': {} columns, {} segment(s) ({} workers)",
                pass.source.meta().id,
                periods,
                ranges.len(),
                workers
            );
        }

        crate::trace_time!("plot segment evaluation", 5000, {
            if ranges.len() > 1 {
                // Ordered collect reassembles segments in creation order,
                // not completion order.
                ranges
                    .into_par_iter()
                    .map(|(s, e)| compute_segment(pass, s, e))
                    .collect()
            } else {
                ranges
                    .into_iter()
                    .map(|(s, e)| compute_segment(pass, s, e))
                    .collect()
            }
        })
    }

    /// Evaluates and replays the pass into the drawing sink: segments in
    /// creation order, ops in column order.
    pub fn plot(&self, pass: &PlotPass<'_>, start: usize, end: usize, sink: &mut dyn DrawSink) {
        if let PlotKind::Line { .. } = pass.kind {
            sink.set_stroke(pass.style.line_color, pass.style.line_width);
        }
        for segment in self.evaluate(pass, start, end) {
            for op in &segment.ops {
                match *op {
                    DrawOp::Stroke { color, width } => sink.set_stroke(color, width),
                    DrawOp::Line { x1, y1, x2, y2 } => sink.line(x1, y1, x2, y2),
                }
            }
        }
    }
}

fn split_ranges(start: usize, end: usize, per_segment: usize) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut s = start;
    while s <= end {
        let e = (s + per_segment - 1).min(end);
        ranges.push((s, e));
        s = e + 1;
    }
    ranges
}

fn compute_segment(pass: &PlotPass<'_>, start: usize, end: usize) -> PlotSegment {
    let mut ops = Vec::new();
    match pass.kind {
        PlotKind::Line { channel } => {
            let mut prev = pass.previous_column(start, channel);
            for column in start..=end {
                prev = pass.line_ops(column, channel, prev, &mut ops);
            }
        }
        PlotKind::Bars => {
            for column in start..=end {
                pass.bar_ops(column, &mut ops);
            }
        }
    }
    PlotSegment { start, end, ops }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayScale;
    use crate::domain::{Period, TimedPoint};
    use crate::models::{BarSeries, SourceMeta, merge};
    use crate::plot::coords::ScaleKind;
    use crate::plot::primitives::RecordingSink;

    fn wave_series(len: usize) -> BarSeries {
        let meta = SourceMeta::new("wave", Period::minutes(5).unwrap());
        let points = (0..len)
            .map(|i| {
                let v = 100.0 + (i as f64 * 0.05).sin() * 10.0;
                TimedPoint::ohlcv(i as i64 * 300, v, v + 1.0, v - 1.0, v + 0.5, 1.0)
            })
            .collect();
        BarSeries::from_points(meta, points).unwrap()
    }

    fn mapper(end_index: usize) -> CoordinateMapper {
        CoordinateMapper {
            start_index: 0,
            end_index,
            min_value: 85.0,
            max_value: 115.0,
            width: 1200.0,
            height: 700.0,
            margin_left: 40.0,
            margin_right: 60.0,
            margin_top: 10.0,
            margin_bottom: 30.0,
            scale: ScaleKind::Linear,
            display_scale: DisplayScale::new(2),
        }
    }

    fn flatten(segments: Vec<PlotSegment>) -> Vec<DrawOp> {
        segments.into_iter().flat_map(|s| s.ops).collect()
    }

    #[test]
    fn parallel_and_sequential_paths_match() {
        let series = wave_series(1000);
        let m = mapper(999);

        for kind in [PlotKind::Line { channel: 3 }, PlotKind::Bars] {
            let pass = PlotPass {
                source: &series,
                index_map: None,
                mapper: &m,
                kind,
                style: &PLOT_STYLE,
            };

            let sequential = SegmentedEvaluator {
                parallelism: 1,
                segment_min: 0,
            };
            let parallel = SegmentedEvaluator {
                parallelism: 4,
                segment_min: 10,
            };

            let seq_ops = flatten(sequential.evaluate(&pass, 0, 999));
            let par_ops = flatten(parallel.evaluate(&pass, 0, 999));
            assert!(!seq_ops.is_empty());
            assert_eq!(seq_ops, par_ops, "kind {:?}", kind);
        }
    }

    #[test]
    fn small_ranges_stay_sequential() {
        let series = wave_series(50);
        let m = mapper(49);
        let pass = PlotPass {
            source: &series,
            index_map: None,
            mapper: &m,
            kind: PlotKind::Line { channel: 3 },
            style: &PLOT_STYLE,
        };
        let evaluator = SegmentedEvaluator {
            parallelism: 8,
            segment_min: 200,
        };
        let segments = evaluator.evaluate(&pass, 0, 49);
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn segments_cover_range_contiguously() {
        assert_eq!(
            split_ranges(0, 9, 4),
            vec![(0, 3), (4, 7), (8, 9)]
        );
        assert_eq!(split_ranges(5, 5, 3), vec![(5, 5)]);
    }

    #[test]
    fn absent_columns_are_skipped() {
        // Source b fills t=600 where source a has a hole.
        let a = sparse_series("a", &[0, 300, 900, 1200]);
        let b = sparse_series("b", &[0, 300, 600, 900, 1200]);
        let timeline = merge(&[&a, &b]).unwrap();

        let m = mapper(timeline.len() - 1);
        let pass = PlotPass {
            source: &a,
            index_map: Some(timeline.index_map(0)),
            mapper: &m,
            kind: PlotKind::Bars,
            style: &PLOT_STYLE,
        };
        let ops = flatten(SegmentedEvaluator::default().evaluate(&pass, 0, timeline.len() - 1));
        // 4 bars drawn, 4 ops each; the hole produces nothing
        assert_eq!(ops.len(), 16);
    }

    #[test]
    fn lines_into_invalid_samples_are_suppressed() {
        let meta = SourceMeta::new("gappy", Period::minutes(5).unwrap());
        let mut points: Vec<TimedPoint> = (0..5)
            .map(|i| TimedPoint::ohlcv(i as i64 * 300, 1.0, 1.0, 1.0, 1.0, 0.0))
            .collect();
        points[2].set_valid(false);
        let series = BarSeries::from_points(meta, points).unwrap();

        let m = mapper(4);
        let pass = PlotPass {
            source: &series,
            index_map: None,
            mapper: &m,
            kind: PlotKind::Line { channel: 3 },
            style: &PLOT_STYLE,
        };
        let ops = flatten(SegmentedEvaluator::default().evaluate(&pass, 0, 4));
        // Columns: 0 has no predecessor; 1 connects to 0; 2 is invalid;
        // 3 would connect to invalid 2 (suppressed); 4 connects to 3.
        assert_eq!(ops.len(), 2);
    }

    #[test]
    fn sparse_line_pass_matches_sequential_across_segments() {
        // Every third column of the required source is a hole; segment
        // seeds must carry the predecessor across absent prefixes.
        let own: Vec<i64> = (0..900i64).filter(|i| i % 3 != 2).map(|i| i * 300).collect();
        let full: Vec<i64> = (0..900i64).map(|i| i * 300).collect();
        let a = sparse_series("a", &own);
        let b = sparse_series("b", &full);
        let timeline = merge(&[&a, &b]).unwrap();

        let m = mapper(timeline.len() - 1);
        let pass = PlotPass {
            source: &a,
            index_map: Some(timeline.index_map(0)),
            mapper: &m,
            kind: PlotKind::Line { channel: 3 },
            style: &PLOT_STYLE,
        };
        let sequential = SegmentedEvaluator {
            parallelism: 1,
            segment_min: 0,
        };
        let parallel = SegmentedEvaluator {
            parallelism: 4,
            segment_min: 10,
        };
        let seq_ops = flatten(sequential.evaluate(&pass, 0, timeline.len() - 1));
        let par_ops = flatten(parallel.evaluate(&pass, 0, timeline.len() - 1));
        assert!(!seq_ops.is_empty());
        assert_eq!(seq_ops, par_ops);
    }

    #[test]
    fn replay_prefixes_line_passes_with_a_stroke() {
        let series = wave_series(10);
        let m = mapper(9);
        let pass = PlotPass {
            source: &series,
            index_map: None,
            mapper: &m,
            kind: PlotKind::Line { channel: 3 },
            style: &PLOT_STYLE,
        };
        let mut sink = RecordingSink::default();
        SegmentedEvaluator::default().plot(&pass, 0, 9, &mut sink);
        assert!(matches!(sink.ops.first(), Some(DrawOp::Stroke { .. })));
        assert_eq!(sink.ops.len(), 10); // stroke + 9 connecting lines
    }

    fn sparse_series(id: &str, times: &[i64]) -> BarSeries {
        let meta = SourceMeta::new(id, Period::minutes(5).unwrap());
        let points = times
            .iter()
            .map(|&t| TimedPoint::ohlcv(t, 1.0, 2.0, 0.5, 1.5, 1.0))
            .collect();
        BarSeries::from_points(meta, points).unwrap()
    }
}
