//! Glyph outline placement
//!
//! Converts font-unit outlines (y up) into pixel coordinates (y down) and
//! forwards them to the caller's sink.

use ttf_parser::OutlineBuilder;

/// Forwards outline commands scaled and positioned for one glyph
pub(crate) struct PlacedOutline<'a> {
    sink: &'a mut dyn OutlineBuilder,
    scale: f32,
    origin_x: f32,
    baseline: f32,
}

impl<'a> PlacedOutline<'a> {
    pub(crate) fn new(sink: &'a mut dyn OutlineBuilder, scale: f32, origin_x: f32, baseline: f32) -> Self {
        Self {
            sink,
            scale,
            origin_x,
            baseline,
        }
    }

    fn x(&self, x: f32) -> f32 {
        self.origin_x + x * self.scale
    }

    fn y(&self, y: f32) -> f32 {
        self.baseline - y * self.scale // Flip Y axis
    }
}

impl OutlineBuilder for PlacedOutline<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = (self.x(x), self.y(y));
        self.sink.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = (self.x(x), self.y(y));
        self.sink.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1, x, y) = (self.x(x1), self.y(y1), self.x(x), self.y(y));
        self.sink.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = (self.x(x1), self.y(y1));
        let (x2, y2) = (self.x(x2), self.y(y2));
        let (x, y) = (self.x(x), self.y(y));
        self.sink.curve_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.sink.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Points(Vec<(f32, f32)>);

    impl OutlineBuilder for Points {
        fn move_to(&mut self, x: f32, y: f32) {
            self.0.push((x, y));
        }
        fn line_to(&mut self, x: f32, y: f32) {
            self.0.push((x, y));
        }
        fn quad_to(&mut self, _: f32, _: f32, x: f32, y: f32) {
            self.0.push((x, y));
        }
        fn curve_to(&mut self, _: f32, _: f32, _: f32, _: f32, x: f32, y: f32) {
            self.0.push((x, y));
        }
        fn close(&mut self) {}
    }

    #[test]
    fn test_placement_flips_y() {
        let mut points = Points::default();
        {
            let mut placed = PlacedOutline::new(&mut points, 0.5, 10.0, 20.0);
            placed.move_to(0.0, 0.0);
            placed.line_to(100.0, 40.0);
        }
        assert_eq!(points.0, vec![(10.0, 20.0), (60.0, 0.0)]);
    }
}
