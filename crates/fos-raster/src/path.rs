//! Abstract painter paths
//!
//! Device independent path model: an ordered list of segments that the
//! geometry builder later turns into renderer figures.

use crate::arc;
use crate::transform::Transform;

/// A point in user space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Equal within the 1e-5 tolerance used for joining arcs
    pub fn fuzzy_eq(&self, other: &Point) -> bool {
        (self.x - other.x).abs() < arc::TOLERANCE && (self.y - other.y).abs() < arc::TOLERANCE
    }
}

/// Axis aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// One element of a painter path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    CubicBezier { c1: Point, c2: Point, end: Point },
    QuadraticBezier { c: Point, end: Point },
    /// Elliptical arc given by center, radii, start angle and sweep (degrees)
    ArcTo {
        center: Point,
        rx: f64,
        ry: f64,
        start_angle: f64,
        sweep_angle: f64,
    },
}

impl PathSegment {
    /// Point the pen rests on after this segment
    pub fn end_point(&self) -> Point {
        match *self {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => p,
            PathSegment::CubicBezier { end, .. } | PathSegment::QuadraticBezier { end, .. } => end,
            PathSegment::ArcTo {
                center,
                rx,
                ry,
                start_angle,
                sweep_angle,
            } => arc::decompose(center, rx, ry, start_angle, sweep_angle).end,
        }
    }
}

/// A painter path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PainterPath {
    segments: Vec<PathSegment>,
}

impl PainterPath {
    /// Create an empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a path starting at `start`
    pub fn starting_at(start: Point) -> Self {
        let mut path = Self::new();
        path.move_to(start.x, start.y);
        path
    }

    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Point the pen rests on, the origin for an empty path
    pub fn current_position(&self) -> Point {
        self.segments
            .last()
            .map(PathSegment::end_point)
            .unwrap_or(Point::ORIGIN)
    }

    /// Start of the current sub-path
    fn subpath_start(&self) -> Point {
        self.segments
            .iter()
            .rev()
            .find_map(|s| match s {
                PathSegment::MoveTo(p) => Some(*p),
                _ => None,
            })
            .unwrap_or(Point::ORIGIN)
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.segments.push(PathSegment::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.segments.push(PathSegment::LineTo(Point::new(x, y)));
        self
    }

    pub fn cubic_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, ex: f64, ey: f64) -> &mut Self {
        self.segments.push(PathSegment::CubicBezier {
            c1: Point::new(c1x, c1y),
            c2: Point::new(c2x, c2y),
            end: Point::new(ex, ey),
        });
        self
    }

    pub fn quad_to(&mut self, cx: f64, cy: f64, ex: f64, ey: f64) -> &mut Self {
        self.segments.push(PathSegment::QuadraticBezier {
            c: Point::new(cx, cy),
            end: Point::new(ex, ey),
        });
        self
    }

    /// Circular arc around (cx, cy), angles in degrees
    pub fn arc_to(&mut self, cx: f64, cy: f64, radius: f64, start_angle: f64, sweep_angle: f64) -> &mut Self {
        self.arc_to_ellipse(cx, cy, radius, radius, start_angle, sweep_angle)
    }

    /// Elliptical arc around (cx, cy), angles in degrees
    pub fn arc_to_ellipse(
        &mut self,
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        start_angle: f64,
        sweep_angle: f64,
    ) -> &mut Self {
        self.segments.push(PathSegment::ArcTo {
            center: Point::new(cx, cy),
            rx,
            ry,
            start_angle,
            sweep_angle,
        });
        self
    }

    /// Draw a line back to the start of the current sub-path
    pub fn close_subpath(&mut self) -> &mut Self {
        let start = self.subpath_start();
        if !self.is_empty() && !self.current_position().fuzzy_eq(&start) {
            self.line_to(start.x, start.y);
        }
        self
    }

    /// Add a closed rectangle as a new sub-path
    pub fn add_rect(&mut self, rect: Rect) -> &mut Self {
        self.move_to(rect.left(), rect.top())
            .line_to(rect.right(), rect.top())
            .line_to(rect.right(), rect.bottom())
            .line_to(rect.left(), rect.bottom())
            .close_subpath()
    }

    /// Add an ellipse inscribed in `rect` as a new sub-path
    pub fn add_ellipse(&mut self, rect: Rect) -> &mut Self {
        let c = rect.center();
        self.move_to(rect.right(), c.y)
            .arc_to_ellipse(c.x, c.y, rect.width / 2.0, rect.height / 2.0, 0.0, 360.0)
    }

    /// Flatten into polylines, one per sub-path, mapped through `transform`
    pub fn flatten(&self, transform: &Transform) -> Vec<Vec<Point>> {
        const CURVE_STEPS: usize = 16;

        let mut polylines: Vec<Vec<Point>> = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        let mut pen = Point::ORIGIN;

        for segment in &self.segments {
            match *segment {
                PathSegment::MoveTo(p) => {
                    if current.len() > 1 {
                        polylines.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(p);
                }
                PathSegment::LineTo(p) => {
                    if current.is_empty() {
                        current.push(pen);
                    }
                    current.push(p);
                }
                PathSegment::QuadraticBezier { c, end } => {
                    if current.is_empty() {
                        current.push(pen);
                    }
                    let start = pen;
                    current.extend((1..=CURVE_STEPS).map(|i| {
                        let t = i as f64 / CURVE_STEPS as f64;
                        let mt = 1.0 - t;
                        Point::new(
                            mt * mt * start.x + 2.0 * mt * t * c.x + t * t * end.x,
                            mt * mt * start.y + 2.0 * mt * t * c.y + t * t * end.y,
                        )
                    }));
                }
                PathSegment::CubicBezier { c1, c2, end } => {
                    if current.is_empty() {
                        current.push(pen);
                    }
                    let start = pen;
                    current.extend((1..=CURVE_STEPS).map(|i| {
                        let t = i as f64 / CURVE_STEPS as f64;
                        let mt = 1.0 - t;
                        let (a, b, c, d) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
                        Point::new(
                            a * start.x + b * c1.x + c * c2.x + d * end.x,
                            a * start.y + b * c1.y + c * c2.y + d * end.y,
                        )
                    }));
                }
                PathSegment::ArcTo {
                    center,
                    rx,
                    ry,
                    start_angle,
                    sweep_angle,
                } => {
                    if current.is_empty() {
                        current.push(pen);
                    }
                    let sweep = arc::clamp_sweep(sweep_angle);
                    let steps = ((sweep.abs() / 10.0).ceil() as usize).max(1);
                    current.extend((0..=steps).map(|i| {
                        let angle = start_angle + sweep * i as f64 / steps as f64;
                        arc::point_at(center, rx, ry, angle)
                    }));
                }
            }
            pen = segment.end_point();
        }
        if current.len() > 1 {
            polylines.push(current);
        }

        for polyline in &mut polylines {
            for p in polyline.iter_mut() {
                *p = transform.map_point(*p);
            }
        }
        polylines
    }

    /// Non-zero winding hit test of `point` against this path mapped through
    /// `transform`. Every sub-path is treated as implicitly closed.
    pub fn contains_point(&self, point: Point, transform: &Transform) -> bool {
        let mut winding = 0i32;
        for polyline in self.flatten(transform) {
            let n = polyline.len();
            for i in 0..n {
                let a = polyline[i];
                let b = polyline[(i + 1) % n];
                let cross = (b.x - a.x) * (point.y - a.y) - (point.x - a.x) * (b.y - a.y);
                if a.y <= point.y {
                    if b.y > point.y && cross > 0.0 {
                        winding += 1;
                    }
                } else if b.y <= point.y && cross < 0.0 {
                    winding -= 1;
                }
            }
        }
        winding != 0
    }
}
