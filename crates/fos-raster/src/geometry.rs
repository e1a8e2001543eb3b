//! Painter path to renderer geometry
//!
//! Walks the segment list of a [`PainterPath`] and replays it as figures on
//! a [`GeometrySink`]. Every `MoveTo` ends the open figure (left open, never
//! joined back to its start) and the next drawing segment opens a new one at
//! the remembered point. Arcs go through [`arc::decompose`].

use crate::arc;
use crate::device::{FigureBegin, FigureEnd, GeometrySink, RenderDevice};
use crate::error::DeviceError;
use crate::path::{PainterPath, PathSegment, Point};

/// Replay `segments` on `sink`
pub fn build_into<S: GeometrySink>(sink: &mut S, segments: &[PathSegment], filled: bool) {
    let begin = if filled {
        FigureBegin::Filled
    } else {
        FigureBegin::Hollow
    };

    let mut start = Point::ORIGIN;
    let mut pen = Point::ORIGIN;
    let mut open = false;

    for segment in segments {
        if !open && !matches!(segment, PathSegment::MoveTo(_)) {
            sink.begin_figure(start, begin);
            open = true;
        }

        match *segment {
            PathSegment::MoveTo(p) => {
                if open {
                    sink.end_figure(FigureEnd::Open);
                    open = false;
                }
                start = p;
            }
            PathSegment::LineTo(p) => sink.add_line(p),
            PathSegment::CubicBezier { c1, c2, end } => sink.add_bezier(c1, c2, end),
            PathSegment::QuadraticBezier { c, end } => sink.add_quadratic_bezier(c, end),
            PathSegment::ArcTo {
                center,
                rx,
                ry,
                start_angle,
                sweep_angle,
            } => {
                let split = arc::decompose(center, rx, ry, start_angle, sweep_angle);
                if !split.start.fuzzy_eq(&pen) {
                    sink.add_line(split.start);
                }
                sink.add_arc(&split.first);
                sink.add_arc(&split.second);
            }
        }
        pen = segment.end_point();
    }

    if open {
        sink.end_figure(FigureEnd::Open);
    }
}

/// Build a renderer geometry for `path` on `device`
pub fn build<D: RenderDevice>(device: &mut D, path: &PainterPath, filled: bool) -> Result<D::Geometry, DeviceError> {
    let _span = tracing::trace_span!("build_geometry", segments = path.segments().len(), filled).entered();
    let mut sink = device.create_path_geometry();
    build_into(&mut sink, path.segments(), filled);
    sink.close()
}

/// Build the single open figure of an ellipse slice: the ellipse inscribed
/// in the box around `center` with radii `rx`, `ry`, from `start_angle`
/// over `sweep_angle` degrees
pub fn build_arc<D: RenderDevice>(
    device: &mut D,
    center: Point,
    rx: f64,
    ry: f64,
    start_angle: f64,
    sweep_angle: f64,
    filled: bool,
) -> Result<D::Geometry, DeviceError> {
    let split = arc::decompose(center, rx, ry, start_angle, sweep_angle);
    let mut sink = device.create_path_geometry();
    sink.begin_figure(
        split.start,
        if filled {
            FigureBegin::Filled
        } else {
            FigureBegin::Hollow
        },
    );
    sink.add_arc(&split.first);
    sink.add_arc(&split.second);
    sink.end_figure(FigureEnd::Open);
    sink.close()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{ArcSize, RecordingDevice, SinkCall, SweepDirection};

    fn calls(path: &PainterPath, filled: bool) -> Vec<SinkCall> {
        let mut device = RecordingDevice::new(10, 10).unwrap();
        build(&mut device, path, filled).unwrap().calls().to_vec()
    }

    fn figure_count(calls: &[SinkCall]) -> usize {
        calls.iter().filter(|c| matches!(c, SinkCall::BeginFigure(..))).count()
    }

    #[test]
    fn test_closed_rect() {
        let mut path = PainterPath::new();
        path.move_to(0.0, 0.0)
            .line_to(10.0, 0.0)
            .line_to(10.0, 10.0)
            .line_to(0.0, 10.0)
            .close_subpath();
        let calls = calls(&path, true);
        assert_eq!(calls.first(), Some(&SinkCall::BeginFigure(Point::ORIGIN, FigureBegin::Filled)));
        assert_eq!(calls.last(), Some(&SinkCall::EndFigure(FigureEnd::Open)));
        assert_eq!(calls.iter().filter(|c| matches!(c, SinkCall::Line(_))).count(), 4);
    }

    #[test]
    fn test_one_figure_per_move_run() {
        let mut path = PainterPath::new();
        path.move_to(0.0, 0.0)
            .line_to(1.0, 0.0)
            .move_to(5.0, 5.0)
            .move_to(6.0, 6.0)
            .line_to(7.0, 6.0)
            .quad_to(8.0, 8.0, 9.0, 6.0)
            .move_to(3.0, 3.0);
        let calls = calls(&path, false);
        assert_eq!(figure_count(&calls), 2);
        assert_eq!(calls[0], SinkCall::BeginFigure(Point::ORIGIN, FigureBegin::Hollow));
        assert_eq!(calls[3], SinkCall::BeginFigure(Point::new(6.0, 6.0), FigureBegin::Hollow));
        let ends = calls.iter().filter(|c| matches!(c, SinkCall::EndFigure(FigureEnd::Open))).count();
        assert_eq!(ends, 2);
    }

    #[test]
    fn test_leading_segment_starts_at_origin() {
        let mut path = PainterPath::new();
        path.line_to(4.0, 4.0);
        let calls = calls(&path, true);
        assert_eq!(calls[0], SinkCall::BeginFigure(Point::ORIGIN, FigureBegin::Filled));
    }

    #[test]
    fn test_arc_adds_connecting_line_only_when_needed() {
        // Pen already on the arc start: no line
        let mut path = PainterPath::new();
        path.move_to(10.0, 0.0).arc_to(0.0, 0.0, 10.0, 0.0, 180.0);
        let joined = calls(&path, false);
        assert!(!joined.iter().any(|c| matches!(c, SinkCall::Line(_))));
        let arcs: Vec<_> = joined
            .iter()
            .filter_map(|c| match c {
                SinkCall::Arc(a) => Some(*a),
                _ => None,
            })
            .collect();
        assert_eq!(arcs.len(), 2);
        assert!(arcs.iter().all(|a| a.size == ArcSize::Small));
        assert!(arcs.iter().all(|a| a.direction == SweepDirection::CounterClockwise));

        // Pen elsewhere: a line to the arc start first
        let mut path = PainterPath::new();
        path.move_to(0.0, 0.0).arc_to(0.0, 0.0, 10.0, 0.0, -90.0);
        let detached = calls(&path, false);
        assert!(matches!(detached[1], SinkCall::Line(p) if p.fuzzy_eq(&Point::new(10.0, 0.0))));
        assert!(matches!(detached[2], SinkCall::Arc(a) if a.direction == SweepDirection::Clockwise));
    }

    #[test]
    fn test_pen_follows_previous_arc() {
        // Second arc starts where the first ended
        let mut path = PainterPath::new();
        path.move_to(10.0, 0.0)
            .arc_to(0.0, 0.0, 10.0, 0.0, 90.0)
            .arc_to(0.0, 0.0, 10.0, 90.0, 90.0);
        let calls = calls(&path, true);
        assert!(!calls.iter().any(|c| matches!(c, SinkCall::Line(_))));
        assert_eq!(calls.iter().filter(|c| matches!(c, SinkCall::Arc(_))).count(), 4);
    }

    #[test]
    fn test_empty_path() {
        assert!(calls(&PainterPath::new(), true).is_empty());
    }

    #[test]
    fn test_arc_figure() {
        let mut device = RecordingDevice::new(10, 10).unwrap();
        let geometry = build_arc(&mut device, Point::ORIGIN, 10.0, 10.0, 0.0, 180.0, false).unwrap();
        let calls = geometry.calls();
        assert_eq!(calls.len(), 4);
        assert!(matches!(calls[0], SinkCall::BeginFigure(p, FigureBegin::Hollow) if p.fuzzy_eq(&Point::new(10.0, 0.0))));
        assert!(matches!(calls[1], SinkCall::Arc(a) if a.point.fuzzy_eq(&Point::new(0.0, -10.0))));
        assert!(matches!(calls[2], SinkCall::Arc(a) if a.point.fuzzy_eq(&Point::new(-10.0, 0.0))));
        assert_eq!(calls[3], SinkCall::EndFigure(FigureEnd::Open));
    }
}
