//! Painter front end
//!
//! A [`Painter`] attaches to a [`PaintDevice`] for as long as it lives. It
//! owns the abstract drawing state (pen, brush, font, transforms, clip) and
//! tells the device which parts of it changed; the device turns that into
//! renderer resources.

use bitflags::bitflags;
use fos_text::{FontMetrics, FontRequest};

use crate::error::Result;
use crate::path::{PainterPath, Point, Rect};
use crate::style::{Brush, Pen};
use crate::text::Alignment;
use crate::transform::Transform;

bitflags! {
    /// Parts of the painter state that changed since the device last looked
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChangeFlags: u8 {
        const CLIPPING = 1;
        const TRANSFORM = 1 << 1;
        const PEN = 1 << 2;
        const BRUSH = 1 << 3;
        const FONT = 1 << 4;
        const HINTS = 1 << 5;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RenderHints: u8 {
        const ANTIALIASING = 1;
    }
}

/// Everything a device needs to know about the painter
#[derive(Debug, Clone, PartialEq)]
pub struct PainterState {
    pub pen: Pen,
    pub brush: Brush,
    pub font: FontRequest,
    pub world_transform: Transform,
    pub clip_path: PainterPath,
    /// World transform at the time the clip path was set
    pub clip_path_transform: Transform,
    pub clipping: bool,
    pub hints: RenderHints,
}

impl PainterState {
    pub fn new(hints: RenderHints) -> Self {
        Self {
            pen: Pen::default(),
            brush: Brush::None,
            font: FontRequest::default(),
            world_transform: Transform::identity(),
            clip_path: PainterPath::new(),
            clip_path_transform: Transform::identity(),
            clipping: false,
            hints,
        }
    }

    /// Transform from user space to device pixels
    pub fn combined_transform(&self) -> Transform {
        self.world_transform
    }

    /// Flags for the parts that differ between `self` and `other`
    fn diff(&self, other: &PainterState) -> ChangeFlags {
        let mut flags = ChangeFlags::empty();
        if self.clipping != other.clipping
            || self.clip_path != other.clip_path
            || self.clip_path_transform != other.clip_path_transform
        {
            flags |= ChangeFlags::CLIPPING;
        }
        if self.world_transform != other.world_transform {
            flags |= ChangeFlags::TRANSFORM;
        }
        if self.pen != other.pen {
            flags |= ChangeFlags::PEN;
        }
        if self.brush != other.brush {
            flags |= ChangeFlags::BRUSH;
        }
        if self.font != other.font {
            flags |= ChangeFlags::FONT;
        }
        if self.hints != other.hints {
            flags |= ChangeFlags::HINTS;
        }
        flags
    }
}

impl Default for PainterState {
    fn default() -> Self {
        Self::new(RenderHints::empty())
    }
}

/// A surface a [`Painter`] can draw on
pub trait PaintDevice {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Hints a fresh painter starts with
    fn default_render_hints(&self) -> RenderHints {
        RenderHints::empty()
    }

    /// A painter attaches; the device starts drawing and takes over `state`
    fn init(&mut self, state: &PainterState) -> Result<()>;

    /// The painter detaches
    fn done(&mut self);

    /// Parts of `state` named by `flags` changed
    fn set_changed(&mut self, state: &PainterState, flags: ChangeFlags);

    fn draw_path(&mut self, state: &PainterState, path: &PainterPath) -> Result<()>;

    /// Slice of the ellipse inscribed in `rect`, angles in degrees
    fn draw_arc(&mut self, state: &PainterState, rect: Rect, start_angle: f64, span_angle: f64) -> Result<()>;

    fn draw_line(&mut self, state: &PainterState, from: Point, to: Point) -> Result<()>;

    /// Draw the `source` part of the image at `uri` into `dest`
    fn draw_image(&mut self, state: &PainterState, dest: Rect, uri: &str, source: Rect) -> Result<()>;

    /// Draw one line of text aligned inside `rect`.
    ///
    /// With a `clip_point` the text is skipped unless that point lies inside
    /// the clip path.
    fn draw_text(
        &mut self,
        state: &PainterState,
        rect: Rect,
        align: Alignment,
        text: &str,
        clip_point: Option<Point>,
    ) -> Result<()>;

    /// Width of `text`, word wrapped at `max_width` when given
    fn measure_text(&mut self, state: &PainterState, text: &str, max_width: Option<f64>) -> Result<f64>;

    fn font_metrics(&mut self, state: &PainterState) -> Result<FontMetrics>;
}

/// Draws on a [`PaintDevice`] until dropped or [`end`](Painter::end)ed
pub struct Painter<'a, D: PaintDevice> {
    device: &'a mut D,
    state: PainterState,
    saved: Vec<PainterState>,
    active: bool,
}

impl<'a, D: PaintDevice> Painter<'a, D> {
    /// Attach to `device`
    pub fn begin(device: &'a mut D) -> Result<Self> {
        let state = PainterState::new(device.default_render_hints());
        device.init(&state)?;
        Ok(Self {
            device,
            state,
            saved: Vec::new(),
            active: true,
        })
    }

    /// Detach from the device
    pub fn end(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if self.active {
            self.active = false;
            self.device.done();
        }
    }

    pub fn device(&mut self) -> &mut D {
        self.device
    }

    pub fn state(&self) -> &PainterState {
        &self.state
    }

    fn changed(&mut self, flags: ChangeFlags) {
        if !flags.is_empty() {
            self.device.set_changed(&self.state, flags);
        }
    }

    pub fn pen(&self) -> &Pen {
        &self.state.pen
    }

    pub fn set_pen(&mut self, pen: Pen) {
        if self.state.pen != pen {
            self.state.pen = pen;
            self.changed(ChangeFlags::PEN);
        }
    }

    pub fn brush(&self) -> &Brush {
        &self.state.brush
    }

    pub fn set_brush(&mut self, brush: Brush) {
        if self.state.brush != brush {
            self.state.brush = brush;
            self.changed(ChangeFlags::BRUSH);
        }
    }

    pub fn font(&self) -> &FontRequest {
        &self.state.font
    }

    pub fn set_font(&mut self, font: FontRequest) {
        if self.state.font != font {
            self.state.font = font;
            self.changed(ChangeFlags::FONT);
        }
    }

    pub fn render_hints(&self) -> RenderHints {
        self.state.hints
    }

    pub fn set_render_hint(&mut self, hint: RenderHints, on: bool) {
        let mut hints = self.state.hints;
        hints.set(hint, on);
        if hints != self.state.hints {
            self.state.hints = hints;
            self.changed(ChangeFlags::HINTS);
        }
    }

    pub fn world_transform(&self) -> Transform {
        self.state.world_transform
    }

    /// Replace the world transform, or apply `transform` before it when
    /// `combine` is set
    pub fn set_world_transform(&mut self, transform: Transform, combine: bool) {
        let transform = if combine {
            transform.then(self.state.world_transform)
        } else {
            transform
        };
        if transform != self.state.world_transform {
            self.state.world_transform = transform;
            self.changed(ChangeFlags::TRANSFORM);
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.set_world_transform(Transform::translate(dx, dy), true);
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.set_world_transform(Transform::scale(sx, sy), true);
    }

    pub fn rotate(&mut self, degrees: f64) {
        self.set_world_transform(Transform::rotate_deg(degrees), true);
    }

    pub fn reset_transform(&mut self) {
        self.set_world_transform(Transform::identity(), false);
    }

    pub fn clip_path(&self) -> &PainterPath {
        &self.state.clip_path
    }

    /// Set the clip path in current user coordinates
    pub fn set_clip_path(&mut self, path: PainterPath) {
        self.state.clip_path = path;
        self.state.clip_path_transform = self.state.combined_transform();
        if self.state.clipping {
            self.changed(ChangeFlags::CLIPPING);
        }
    }

    pub fn has_clipping(&self) -> bool {
        self.state.clipping
    }

    pub fn set_clipping(&mut self, enabled: bool) {
        if self.state.clipping != enabled {
            self.state.clipping = enabled;
            self.changed(ChangeFlags::CLIPPING);
        }
    }

    /// Push a copy of the state
    pub fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    /// Go back to the last saved state
    pub fn restore(&mut self) {
        let Some(previous) = self.saved.pop() else {
            tracing::warn!("Painter restored more often than saved");
            return;
        };
        let flags = self.state.diff(&previous);
        self.state = previous;
        self.changed(flags);
    }

    pub fn draw_path(&mut self, path: &PainterPath) -> Result<()> {
        self.device.draw_path(&self.state, path)
    }

    /// Fill `path` with `brush` and no outline
    pub fn fill_path(&mut self, path: &PainterPath, brush: Brush) -> Result<()> {
        self.with_style(Pen::none(), brush, |painter| painter.draw_path(path))
    }

    /// Outline `path` with `pen` and no fill
    pub fn stroke_path(&mut self, path: &PainterPath, pen: Pen) -> Result<()> {
        self.with_style(pen, Brush::None, |painter| painter.draw_path(path))
    }

    fn with_style<R>(&mut self, pen: Pen, brush: Brush, f: impl FnOnce(&mut Self) -> R) -> R {
        self.save();
        self.set_pen(pen);
        self.set_brush(brush);
        let result = f(self);
        self.restore();
        result
    }

    pub fn draw_arc(&mut self, rect: Rect, start_angle: f64, span_angle: f64) -> Result<()> {
        self.device.draw_arc(&self.state, rect, start_angle, span_angle)
    }

    pub fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        self.device
            .draw_line(&self.state, Point::new(x1, y1), Point::new(x2, y2))
    }

    pub fn draw_rect(&mut self, rect: Rect) -> Result<()> {
        let mut path = PainterPath::new();
        path.add_rect(rect);
        self.draw_path(&path)
    }

    pub fn draw_ellipse(&mut self, rect: Rect) -> Result<()> {
        let mut path = PainterPath::new();
        path.add_ellipse(rect);
        self.draw_path(&path)
    }

    pub fn draw_image(&mut self, dest: Rect, uri: &str, source: Rect) -> Result<()> {
        self.device.draw_image(&self.state, dest, uri, source)
    }

    pub fn draw_text(&mut self, rect: Rect, align: Alignment, text: &str) -> Result<()> {
        self.device.draw_text(&self.state, rect, align, text, None)
    }

    /// Like [`draw_text`](Self::draw_text), skipped when `clip_point` falls
    /// outside the clip path
    pub fn draw_text_clipped(&mut self, rect: Rect, align: Alignment, text: &str, clip_point: Point) -> Result<()> {
        self.device
            .draw_text(&self.state, rect, align, text, Some(clip_point))
    }

    pub fn measure_text(&mut self, text: &str, max_width: Option<f64>) -> Result<f64> {
        self.device.measure_text(&self.state, text, max_width)
    }

    pub fn font_metrics(&mut self) -> Result<FontMetrics> {
        self.device.font_metrics(&self.state)
    }
}

impl<D: PaintDevice> Drop for Painter<'_, D> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    /// Device that only records what the painter tells it
    #[derive(Default)]
    struct Probe {
        events: Vec<String>,
        changes: Vec<ChangeFlags>,
    }

    impl PaintDevice for Probe {
        fn width(&self) -> u32 {
            1
        }

        fn height(&self) -> u32 {
            1
        }

        fn init(&mut self, _state: &PainterState) -> Result<()> {
            self.events.push("init".into());
            Ok(())
        }

        fn done(&mut self) {
            self.events.push("done".into());
        }

        fn set_changed(&mut self, _state: &PainterState, flags: ChangeFlags) {
            self.changes.push(flags);
        }

        fn draw_path(&mut self, state: &PainterState, _path: &PainterPath) -> Result<()> {
            self.events
                .push(format!("path pen={} brush={}", state.pen.is_visible(), state.brush.is_visible()));
            Ok(())
        }

        fn draw_arc(&mut self, _: &PainterState, _: Rect, _: f64, _: f64) -> Result<()> {
            self.events.push("arc".into());
            Ok(())
        }

        fn draw_line(&mut self, _: &PainterState, _: Point, _: Point) -> Result<()> {
            self.events.push("line".into());
            Ok(())
        }

        fn draw_image(&mut self, _: &PainterState, _: Rect, uri: &str, _: Rect) -> Result<()> {
            self.events.push(format!("image {uri}"));
            Ok(())
        }

        fn draw_text(&mut self, _: &PainterState, _: Rect, _: Alignment, text: &str, clip: Option<Point>) -> Result<()> {
            self.events.push(format!("text {text} {}", clip.is_some()));
            Ok(())
        }

        fn measure_text(&mut self, _: &PainterState, text: &str, _: Option<f64>) -> Result<f64> {
            Ok(text.len() as f64)
        }

        fn font_metrics(&mut self, _: &PainterState) -> Result<FontMetrics> {
            Ok(FontMetrics::default())
        }
    }

    #[test]
    fn test_attach_and_detach() {
        let mut probe = Probe::default();
        {
            let _painter = Painter::begin(&mut probe).unwrap();
        }
        assert_eq!(probe.events, ["init", "done"]);

        let painter = Painter::begin(&mut probe).unwrap();
        painter.end();
        assert_eq!(probe.events, ["init", "done", "init", "done"]);
    }

    #[test]
    fn test_unchanged_setters_stay_quiet() {
        let mut probe = Probe::default();
        let mut painter = Painter::begin(&mut probe).unwrap();
        painter.set_pen(Pen::default());
        painter.set_brush(Brush::None);
        painter.set_clipping(false);
        painter.set_brush(Brush::Solid(Color::RED));
        painter.end();
        assert_eq!(probe.changes, [ChangeFlags::BRUSH]);
    }

    #[test]
    fn test_transform_combines() {
        let mut probe = Probe::default();
        let mut painter = Painter::begin(&mut probe).unwrap();
        painter.translate(10.0, 0.0);
        painter.scale(2.0, 2.0);
        // Scale applies first, then the earlier translation
        let p = painter.world_transform().map_point(Point::new(1.0, 1.0));
        assert_eq!(p, Point::new(12.0, 2.0));
    }

    #[test]
    fn test_clip_path_keeps_transform_at_set_time() {
        let mut probe = Probe::default();
        let mut painter = Painter::begin(&mut probe).unwrap();
        painter.translate(5.0, 5.0);
        painter.set_clip_path(PainterPath::new());
        painter.reset_transform();
        assert_eq!(painter.state().clip_path_transform, Transform::translate(5.0, 5.0));
        painter.set_clipping(true);
        painter.end();
        assert_eq!(
            probe.changes,
            [ChangeFlags::TRANSFORM, ChangeFlags::TRANSFORM, ChangeFlags::CLIPPING]
        );
    }

    #[test]
    fn test_fill_path_restores_style() {
        let mut probe = Probe::default();
        let mut painter = Painter::begin(&mut probe).unwrap();
        painter.fill_path(&PainterPath::new(), Brush::Solid(Color::RED)).unwrap();
        assert_eq!(painter.pen(), &Pen::default());
        assert_eq!(painter.brush(), &Brush::None);
        painter.end();
        assert!(probe.events.contains(&"path pen=false brush=true".to_string()));
        assert_eq!(probe.changes.last(), Some(&(ChangeFlags::PEN | ChangeFlags::BRUSH)));
    }

    #[test]
    fn test_unbalanced_restore_is_ignored() {
        let mut probe = Probe::default();
        let mut painter = Painter::begin(&mut probe).unwrap();
        painter.restore();
        painter.end();
        assert!(probe.changes.is_empty());
    }
}
