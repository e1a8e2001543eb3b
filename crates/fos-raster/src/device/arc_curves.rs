//! Endpoint arcs to cubic Beziers
//!
//! tiny-skia has no arc primitive, so renderer arcs (end point, radii,
//! direction, size) are converted to the center parametrisation and emitted
//! as at most four cubic segments, one per quarter turn.

use std::f64::consts::{FRAC_PI_2, TAU};

use super::{ArcSegment, ArcSize, SweepDirection};
use crate::path::Point;

/// Emit the cubics approximating `arc` starting at `from`.
///
/// A zero radius degrades to a straight line, a zero length arc emits nothing.
pub(crate) fn arc_to_cubics(from: Point, arc: &ArcSegment, mut emit: impl FnMut(Point, Point, Point)) {
    let to = arc.point;
    let (sinphi, cosphi) = arc.rotation.to_radians().sin_cos();
    let pxp = cosphi * (from.x - to.x) / 2.0 + sinphi * (from.y - to.y) / 2.0;
    let pyp = -sinphi * (from.x - to.x) / 2.0 + cosphi * (from.y - to.y) / 2.0;
    if pxp == 0.0 && pyp == 0.0 {
        return;
    }

    let mut rx = arc.rx.abs();
    let mut ry = arc.ry.abs();
    if rx < f64::EPSILON || ry < f64::EPSILON {
        emit(from, to, to);
        return;
    }
    let lambda = pxp.powi(2) / rx.powi(2) + pyp.powi(2) / ry.powi(2);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    // Counter-clockwise on a Y-down screen is the negative angle direction
    let large_arc = arc.size == ArcSize::Large;
    let positive = arc.direction == SweepDirection::Clockwise;

    let rxsq = rx * rx;
    let rysq = ry * ry;
    let pxpsq = pxp * pxp;
    let pypsq = pyp * pyp;
    let mut radicant = ((rxsq * rysq) - (rxsq * pypsq) - (rysq * pxpsq)).max(0.0);
    radicant /= (rxsq * pypsq) + (rysq * pxpsq);
    radicant = radicant.sqrt() * if large_arc == positive { -1.0 } else { 1.0 };

    let cxp = radicant * rx / ry * pyp;
    let cyp = radicant * -ry / rx * pxp;
    let cx = cosphi * cxp - sinphi * cyp + (from.x + to.x) / 2.0;
    let cy = sinphi * cxp + cosphi * cyp + (from.y + to.y) / 2.0;

    let vx1 = (pxp - cxp) / rx;
    let vy1 = (pyp - cyp) / ry;
    let vx2 = (-pxp - cxp) / rx;
    let vy2 = (-pyp - cyp) / ry;
    let mut ang1 = vec_angle(1.0, 0.0, vx1, vy1);
    let mut sweep = vec_angle(vx1, vy1, vx2, vy2);
    if !positive && sweep > 0.0 {
        sweep -= TAU;
    }
    if positive && sweep < 0.0 {
        sweep += TAU;
    }

    let mut ratio = sweep.abs() / FRAC_PI_2;
    if (1.0 - ratio).abs() < 1e-7 {
        ratio = 1.0;
    }
    let segments = ratio.ceil().max(1.0);
    let step = sweep / segments;
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let place = |x: f64, y: f64| {
        Point::new(
            cx + (cosphi * x * rx - sinphi * y * ry),
            cy + (sinphi * x * rx + cosphi * y * ry),
        )
    };

    for _ in 0..segments as usize {
        let (y1, x1) = ang1.sin_cos();
        let (y2, x2) = (ang1 + step).sin_cos();
        let c1 = place(x1 - y1 * k, y1 + x1 * k);
        let c2 = place(x2 + y2 * k, y2 - x2 * k);
        let end = place(x2, y2);
        emit(c1, c2, end);
        ang1 += step;
    }
}

fn vec_angle(ux: f64, uy: f64, vx: f64, vy: f64) -> f64 {
    let sign = if (ux * vy - uy * vx) < 0.0 { -1.0 } else { 1.0 };
    let dot = (ux * vx + uy * vy).clamp(-1.0, 1.0);
    sign * dot.acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc;

    fn collect(from: Point, segment: &ArcSegment) -> Vec<(Point, Point, Point)> {
        let mut out = Vec::new();
        arc_to_cubics(from, segment, |c1, c2, end| out.push((c1, c2, end)));
        out
    }

    #[test]
    fn test_quarter_arcs_follow_decomposition() {
        let split = arc::decompose(Point::ORIGIN, 10.0, 10.0, 0.0, 180.0);
        let first = collect(split.start, &split.first);
        assert_eq!(first.len(), 1);
        let end = first[0].2;
        assert!((end.x - split.mid.x).abs() < 1e-9 && (end.y - split.mid.y).abs() < 1e-9);

        // Counter-clockwise from (10, 0) passes above the center (negative y)
        let (c1, _, _) = first[0];
        assert!(c1.y < 0.0);
    }

    #[test]
    fn test_clockwise_half_passes_below() {
        let split = arc::decompose(Point::ORIGIN, 10.0, 10.0, 0.0, -180.0);
        let first = collect(split.start, &split.first);
        assert!(first[0].0.y > 0.0);
        assert!((split.mid.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_semicircle_half_stays_on_circle() {
        // Each half of a full turn is exactly 180 degrees
        let split = arc::decompose(Point::ORIGIN, 10.0, 10.0, 0.0, 360.0);
        let first = collect(split.start, &split.first);
        assert_eq!(first.len(), 2);
        let mid = first[0].2;
        assert!((mid.x.hypot(mid.y) - 10.0).abs() < 1e-6);
        assert!(mid.y < 0.0);
    }

    #[test]
    fn test_degenerate_arcs() {
        let segment = ArcSegment {
            point: Point::new(5.0, 0.0),
            rx: 0.0,
            ry: 0.0,
            rotation: 0.0,
            direction: SweepDirection::Clockwise,
            size: ArcSize::Small,
        };
        assert_eq!(collect(Point::ORIGIN, &segment).len(), 1);
        assert!(collect(Point::new(5.0, 0.0), &segment).is_empty());
    }
}
