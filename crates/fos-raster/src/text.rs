//! Text placement helpers

use bitflags::bitflags;
use fos_text::{FontMetrics, OutlineBuilder};

use crate::path::{PainterPath, Point, Rect};

bitflags! {
    /// Horizontal and vertical alignment of text inside its box
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Alignment: u8 {
        const LEFT = 1;
        const CENTER = 1 << 1;
        const RIGHT = 1 << 2;
        const TOP = 1 << 3;
        const MIDDLE = 1 << 4;
        const BOTTOM = 1 << 5;

        const HORIZONTAL = Self::LEFT.bits() | Self::CENTER.bits() | Self::RIGHT.bits();
        const VERTICAL = Self::TOP.bits() | Self::MIDDLE.bits() | Self::BOTTOM.bits();
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Alignment::LEFT | Alignment::TOP
    }
}

/// Baseline origin of a line of `width` pixels aligned inside `rect`.
///
/// Missing flags on an axis mean left and top.
pub fn text_origin(rect: Rect, align: Alignment, metrics: &FontMetrics, width: f64) -> Point {
    let x = if align.contains(Alignment::RIGHT) {
        rect.right() - width
    } else if align.contains(Alignment::CENTER) {
        rect.center().x - width / 2.0
    } else {
        rect.left()
    };

    let ascent = metrics.ascent as f64;
    let descent = metrics.descent as f64;
    let y = if align.contains(Alignment::BOTTOM) {
        rect.bottom() - descent
    } else if align.contains(Alignment::MIDDLE) {
        rect.center().y - (ascent + descent) / 2.0 + ascent
    } else {
        rect.top() + ascent
    };

    Point::new(x, y)
}

/// Collects glyph outlines into a path
#[derive(Default)]
pub(crate) struct OutlinePath {
    path: PainterPath,
}

impl OutlinePath {
    pub(crate) fn into_path(self) -> PainterPath {
        self.path
    }
}

impl OutlineBuilder for OutlinePath {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(x as f64, y as f64);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.path.quad_to(x1 as f64, y1 as f64, x as f64, y as f64);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.path
            .cubic_to(x1 as f64, y1 as f64, x2 as f64, y2 as f64, x as f64, y as f64);
    }

    fn close(&mut self) {
        self.path.close_subpath();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathSegment;

    fn metrics() -> FontMetrics {
        FontMetrics {
            size: 10.0,
            ascent: 8.0,
            descent: 2.0,
            leading: 0.0,
            units_per_em: 1000,
        }
    }

    #[test]
    fn test_default_is_left_top() {
        let origin = text_origin(Rect::new(10.0, 20.0, 100.0, 40.0), Alignment::default(), &metrics(), 30.0);
        assert_eq!(origin, Point::new(10.0, 28.0));
    }

    #[test]
    fn test_right_bottom() {
        let align = Alignment::RIGHT | Alignment::BOTTOM;
        let origin = text_origin(Rect::new(10.0, 20.0, 100.0, 40.0), align, &metrics(), 30.0);
        assert_eq!(origin, Point::new(80.0, 58.0));
    }

    #[test]
    fn test_center_middle() {
        let align = Alignment::CENTER | Alignment::MIDDLE;
        let origin = text_origin(Rect::new(0.0, 0.0, 100.0, 40.0), align, &metrics(), 30.0);
        // Box of ascent + descent centered on y = 20
        assert_eq!(origin, Point::new(35.0, 23.0));
    }

    #[test]
    fn test_outline_collects_segments() {
        let mut outline = OutlinePath::default();
        outline.move_to(0.0, 0.0);
        outline.line_to(4.0, 0.0);
        outline.quad_to(4.0, 4.0, 0.0, 4.0);
        outline.close();
        let path = outline.into_path();
        assert_eq!(path.segments().len(), 4);
        assert!(matches!(path.segments()[2], PathSegment::QuadraticBezier { .. }));
        assert_eq!(path.current_position(), Point::ORIGIN);
    }
}
