//! Affine transforms
//!
//! World, combined and clip-path transforms of the painter.

use crate::path::Point;

/// 2D transformation matrix (3x3 homogeneous)
///
/// | m11 m21 dx |
/// | m12 m22 dy |
/// |  0   0   1 |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub m11: f64,
    pub m12: f64,
    pub m21: f64,
    pub m22: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Identity transform (no transformation)
    pub const fn identity() -> Self {
        Self {
            m11: 1.0, m12: 0.0,
            m21: 0.0, m22: 1.0,
            dx: 0.0, dy: 0.0,
        }
    }

    pub const fn new(m11: f64, m12: f64, m21: f64, m22: f64, dx: f64, dy: f64) -> Self {
        Self { m11, m12, m21, m22, dx, dy }
    }

    /// Translation transform
    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Scale transform
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation in degrees (clockwise on screen, Y axis down)
    pub fn rotate_deg(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Returns `other` applied first, then `self`
    pub fn multiply(&self, other: &Transform) -> Self {
        Self {
            m11: self.m11 * other.m11 + self.m21 * other.m12,
            m12: self.m12 * other.m11 + self.m22 * other.m12,
            m21: self.m11 * other.m21 + self.m21 * other.m22,
            m22: self.m12 * other.m21 + self.m22 * other.m22,
            dx: self.m11 * other.dx + self.m21 * other.dy + self.dx,
            dy: self.m12 * other.dx + self.m22 * other.dy + self.dy,
        }
    }

    /// Chain another transform: `self` first, then `other`
    pub fn then(self, other: Transform) -> Self {
        other.multiply(&self)
    }

    /// Apply transform to a point
    pub fn map_point(&self, p: Point) -> Point {
        Point::new(
            self.m11 * p.x + self.m21 * p.y + self.dx,
            self.m12 * p.x + self.m22 * p.y + self.dy,
        )
    }

    /// Get the inverse transform (if possible)
    pub fn inverse(&self) -> Option<Self> {
        let det = self.m11 * self.m22 - self.m12 * self.m21;
        if det.abs() < 1e-12 {
            return None; // Singular matrix
        }
        let inv_det = 1.0 / det;
        Some(Self {
            m11: self.m22 * inv_det,
            m12: -self.m12 * inv_det,
            m21: -self.m21 * inv_det,
            m22: self.m11 * inv_det,
            dx: (self.m21 * self.dy - self.m22 * self.dx) * inv_det,
            dy: (self.m12 * self.dx - self.m11 * self.dy) * inv_det,
        })
    }

    /// Check if this is the identity transform
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Lengths of the transformed unit vectors (x scale, y scale)
    pub fn scale_factors(&self) -> (f64, f64) {
        (self.m11.hypot(self.m12), self.m21.hypot(self.m22))
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_row(
            self.m11 as f32,
            self.m12 as f32,
            self.m21 as f32,
            self.m22 as f32,
            self.dx as f32,
            self.dy as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_then_order() {
        let t = Transform::scale(2.0, 2.0).then(Transform::translate(10.0, 0.0));
        assert!(close(t.map_point(Point::new(1.0, 1.0)), Point::new(12.0, 2.0)));
    }

    #[test]
    fn test_inverse_round_trip() {
        let t = Transform::rotate_deg(30.0).then(Transform::translate(5.0, -3.0));
        let inv = t.inverse().unwrap();
        let p = Point::new(7.0, 11.0);
        assert!(close(inv.map_point(t.map_point(p)), p));
        assert!(Transform::scale(0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn test_scale_factors_ignore_rotation() {
        let t = Transform::rotate_deg(45.0).then(Transform::scale(3.0, 3.0));
        let (sx, sy) = t.scale_factors();
        assert!((sx - 3.0).abs() < 1e-9);
        assert!((sy - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_is_clockwise_on_screen() {
        let p = Transform::rotate_deg(90.0).map_point(Point::new(1.0, 0.0));
        assert!(close(p, Point::new(0.0, 1.0)));
    }
}
