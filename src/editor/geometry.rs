//! Wire curve geometry.
//!
//! Wires are cubic Bezier curves leaving the output horizontally to the
//! right and entering the input horizontally from the left.

use serde::Serialize;

use crate::model::{ConnectionDetails, Point};

/// Cubic curve between two ports, in unzoomed wire space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WirePath {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl WirePath {
    /// Curve from `start` to `end`. The control points are pushed out
    /// horizontally by `|dx| / curve_divisor`.
    pub fn between(start: Point, end: Point, curve_divisor: f64) -> Self {
        let dif = (start.x - end.x).abs() / curve_divisor;
        Self {
            start,
            control1: Point::new(start.x + dif, start.y),
            control2: Point::new(end.x - dif, end.y),
            end,
        }
    }

    /// SVG path data for the curve.
    pub fn to_svg(&self) -> String {
        format!(
            "M{},{}C{},{}, {},{} {},{}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        )
    }
}

/// A drawable connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wire {
    pub output: ConnectionDetails,
    pub input: ConnectionDetails,
    pub path: WirePath,
    /// Stroke colour, taken from the output port.
    pub color: String,
}
