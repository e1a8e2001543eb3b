//! Arc decomposition
//!
//! Renderers describe arcs by end point, radii, sweep direction and a
//! small/large flag. That form is ambiguous for sweeps at or near 180 and
//! 360 degrees, so every center/angle arc is split at its angular midpoint
//! into two halves, both tagged [`ArcSize::Small`].
//!
//! Angles are in degrees and measured with the Y axis pointing down: angle
//! `a` maps to `(cos(-a) * rx + cx, sin(-a) * ry + cy)`, so positive sweeps
//! run counter-clockwise on screen.

use crate::device::{ArcSegment, ArcSize, SweepDirection};
use crate::path::Point;

/// Distance under which two points are considered equal
pub const TOLERANCE: f64 = 1e-5;

/// Result of splitting an arc into two renderer arcs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcDecomposition {
    pub start: Point,
    pub mid: Point,
    pub end: Point,
    /// Arc from `start` to `mid`
    pub first: ArcSegment,
    /// Arc from `mid` to `end`
    pub second: ArcSegment,
    /// Signed sweep of each half, in degrees
    pub half_sweep: f64,
}

/// Limit a sweep to one full turn in either direction
pub fn clamp_sweep(sweep_angle: f64) -> f64 {
    sweep_angle.clamp(-360.0, 360.0)
}

/// Point on the ellipse at `angle` degrees
pub fn point_at(center: Point, rx: f64, ry: f64, angle: f64) -> Point {
    let (sin, cos) = (-angle).to_radians().sin_cos();
    Point::new(cos * rx + center.x, sin * ry + center.y)
}

/// Renderer sweep direction for a signed sweep
pub fn direction(sweep_angle: f64) -> SweepDirection {
    if sweep_angle > 0.0 {
        SweepDirection::CounterClockwise
    } else {
        SweepDirection::Clockwise
    }
}

/// Split the arc around `center` into two small renderer arcs
pub fn decompose(center: Point, rx: f64, ry: f64, start_angle: f64, sweep_angle: f64) -> ArcDecomposition {
    let sweep = clamp_sweep(sweep_angle);
    let half_sweep = sweep / 2.0;

    let start = point_at(center, rx, ry, start_angle);
    let mid = point_at(center, rx, ry, start_angle + half_sweep);
    let end = point_at(center, rx, ry, start_angle + sweep);

    let half = |point| ArcSegment {
        point,
        rx,
        ry,
        rotation: 0.0,
        direction: direction(sweep),
        size: ArcSize::Small,
    };

    ArcDecomposition {
        start,
        mid,
        end,
        first: half(mid),
        second: half(end),
        half_sweep,
    }
}
