//! Draw primitives and the drawing-sink boundary.
//!
//! The core never touches pixels itself: it emits an ordered stream of
//! primitive ops that a rendering collaborator consumes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// One primitive draw call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DrawOp {
    /// Set the current stroke color and width.
    Stroke { color: Color, width: f32 },
    /// Stroke a line between two pixel points.
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
}

/// Consumed drawing capability. Called once per op, in left-to-right
/// column order.
pub trait DrawSink {
    fn set_stroke(&mut self, color: Color, width: f32);
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);
}

/// Records ops in call order. Used by tests and the demo binary.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub ops: Vec<DrawOp>,
}

impl DrawSink for RecordingSink {
    fn set_stroke(&mut self, color: Color, width: f32) {
        self.ops.push(DrawOp::Stroke { color, width });
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.ops.push(DrawOp::Line { x1, y1, x2, y2 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_preserves_call_order() {
        let mut sink = RecordingSink::default();
        sink.set_stroke(Color::rgb(1, 2, 3), 2.0);
        sink.line(0.0, 0.0, 1.0, 1.0);
        sink.line(1.0, 1.0, 2.0, 0.5);

        assert_eq!(sink.ops.len(), 3);
        assert!(matches!(sink.ops[0], DrawOp::Stroke { .. }));
        assert_eq!(
            sink.ops[1],
            DrawOp::Line {
                x1: 0.0,
                y1: 0.0,
                x2: 1.0,
                y2: 1.0
            }
        );
    }
}
