//! Rendering device seam
//!
//! The paint device drives a renderer through [`RenderDevice`]: frame
//! begin/end, transforms, path geometries built through a [`GeometrySink`],
//! fill and stroke resources, layers and raw pixel access. Handles are
//! associated types owned by the caller and released by dropping them.

mod arc_curves;
pub mod recording;
pub mod skia;

use std::fmt;

pub use recording::{DeviceCall, HandleKind, RecordingDevice, SinkCall};
pub use skia::SkiaDevice;

use crate::color::Color;
use crate::error::{DeviceError, FrameError};
use crate::path::{Point, Rect};
use crate::transform::Transform;

/// Renderer arc direction, as seen on a Y-down screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    Clockwise,
    CounterClockwise,
}

/// Which of the two arcs joining two points is meant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcSize {
    /// An arc of <= 180 degrees
    Small,
    /// An arc of >= 180 degrees
    Large,
}

/// Renderer arc from the current point to `point`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    pub point: Point,
    pub rx: f64,
    pub ry: f64,
    /// Ellipse rotation in degrees
    pub rotation: f64,
    pub direction: SweepDirection,
    pub size: ArcSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureBegin {
    Filled,
    Hollow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureEnd {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AntialiasMode {
    Aliased,
    #[default]
    PerPrimitive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Flat,
    Square,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Bevel,
    Round,
}

/// Stroke style properties that cannot change after creation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeProperties {
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f32,
}

impl Default for StrokeProperties {
    fn default() -> Self {
        Self {
            cap: LineCap::Flat,
            join: LineJoin::Miter,
            miter_limit: 10.0,
        }
    }
}

/// Gradient stop, position in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub position: f64,
    pub color: Color,
}

/// Diagnostic tag naming the operation in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawTag {
    DrawLine,
    DrawPath,
    DrawClipPath,
    Clear,
    PushLayer,
    PopLayer,
    DrawBitmap,
    SetAntialiasMode,
    ApplyTransform,
    SetTransform,
    DrawPlainPath,
    DrawText,
    DrawArc,
}

impl fmt::Display for DrawTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DrawTag::DrawLine => "draw-line",
            DrawTag::DrawPath => "draw-path",
            DrawTag::DrawClipPath => "draw-clip-path",
            DrawTag::Clear => "clear",
            DrawTag::PushLayer => "push-layer",
            DrawTag::PopLayer => "pop-layer",
            DrawTag::DrawBitmap => "draw-bitmap",
            DrawTag::SetAntialiasMode => "set-antialias-mode",
            DrawTag::ApplyTransform => "apply-transform",
            DrawTag::SetTransform => "set-transform",
            DrawTag::DrawPlainPath => "draw-plain-path",
            DrawTag::DrawText => "draw-text",
            DrawTag::DrawArc => "draw-arc",
        };
        f.write_str(name)
    }
}

/// The pair of tags a device reports with frame errors.
///
/// `outer` names the paint device operation, `inner` the helper it was in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawTags {
    pub outer: Option<DrawTag>,
    pub inner: Option<DrawTag>,
}

impl fmt::Display for DrawTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |tag: Option<DrawTag>| tag.map_or_else(|| "none".to_string(), |t| t.to_string());
        write!(f, "tag1: {}, tag2: {}", name(self.outer), name(self.inner))
    }
}

/// Run `f` inside a tracing span named after `tag`.
///
/// With `push` set the tag also goes to the device (as the outer tag, or the
/// inner one for helpers) so a failing frame reports it.
pub(crate) fn tagged<D: RenderDevice, R>(
    device: &mut D,
    push: bool,
    tag: DrawTag,
    inner: bool,
    f: impl FnOnce(&mut D) -> R,
) -> R {
    let _span = tracing::trace_span!("draw", tag = %tag).entered();
    if !push {
        return f(device);
    }
    let saved = device.tags();
    let mut tags = saved;
    if inner {
        tags.inner = Some(tag);
    } else {
        tags.outer = Some(tag);
    }
    device.set_tags(tags);
    let result = f(device);
    device.set_tags(saved);
    result
}

/// Integer pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Whether the rectangle lies inside a `width` x `height` buffer
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.x.checked_add(self.width).is_some_and(|r| r <= width)
            && self.y.checked_add(self.height).is_some_and(|b| b <= height)
    }
}

/// Receives the figures of one path geometry
pub trait GeometrySink {
    type Geometry;

    fn begin_figure(&mut self, start: Point, begin: FigureBegin);
    fn add_line(&mut self, to: Point);
    fn add_bezier(&mut self, c1: Point, c2: Point, end: Point);
    fn add_quadratic_bezier(&mut self, c: Point, end: Point);
    fn add_arc(&mut self, arc: &ArcSegment);
    fn end_figure(&mut self, end: FigureEnd);

    /// Finish the geometry
    fn close(self) -> Result<Self::Geometry, DeviceError>;
}

/// A concrete 2D renderer over a single pixel buffer.
///
/// Single threaded and synchronous. Drawing calls are only valid between
/// [`begin_draw`](Self::begin_draw) and [`end_draw`](Self::end_draw);
/// failures inside a frame are reported by `end_draw`. Pixel store access
/// is only valid outside a frame.
pub trait RenderDevice {
    type Geometry;
    type Sink: GeometrySink<Geometry = Self::Geometry>;
    type Brush;
    type StrokeStyle;
    type Layer;
    type Bitmap;

    fn width(&self) -> u32;
    fn height(&self) -> u32;

    // Frame

    fn begin_draw(&mut self);
    fn end_draw(&mut self) -> Result<(), FrameError>;

    fn transform(&self) -> Transform;
    fn set_transform(&mut self, transform: Transform);
    fn set_antialias_mode(&mut self, mode: AntialiasMode);

    fn tags(&self) -> DrawTags;
    fn set_tags(&mut self, tags: DrawTags);

    fn clear(&mut self, color: Color);

    // Geometry and drawing

    fn create_path_geometry(&mut self) -> Self::Sink;
    fn fill_geometry(&mut self, geometry: &Self::Geometry, brush: &Self::Brush);
    fn draw_geometry(&mut self, geometry: &Self::Geometry, brush: &Self::Brush, width: f32, style: &Self::StrokeStyle);
    fn draw_line(&mut self, from: Point, to: Point, brush: &Self::Brush, width: f32, style: &Self::StrokeStyle);
    fn draw_bitmap(&mut self, bitmap: &Self::Bitmap, dest: Rect, opacity: f32, source: Rect);

    // Layers

    fn create_layer(&mut self) -> Result<Self::Layer, DeviceError>;
    /// Restrict drawing to `geometry` (under the current transform) over
    /// the whole target
    fn push_layer(&mut self, geometry: &Self::Geometry, layer: &Self::Layer);
    fn pop_layer(&mut self);

    // Resources

    fn create_solid_color_brush(&mut self, color: Color) -> Result<Self::Brush, DeviceError>;
    /// Change the color of a solid color brush in place
    fn set_brush_color(&mut self, brush: &mut Self::Brush, color: Color);
    fn create_linear_gradient_brush(
        &mut self,
        start: Point,
        end: Point,
        stops: &[GradientStop],
    ) -> Result<Self::Brush, DeviceError>;
    /// Radial gradient; `origin_offset` is the focal point relative to `center`
    fn create_radial_gradient_brush(
        &mut self,
        center: Point,
        origin_offset: Point,
        radius: f64,
        stops: &[GradientStop],
    ) -> Result<Self::Brush, DeviceError>;
    /// Dash lengths are multiples of the stroke width
    fn create_stroke_style(&mut self, properties: &StrokeProperties, dashes: &[f32]) -> Result<Self::StrokeStyle, DeviceError>;
    /// Bitmap from premultiplied RGBA rows
    fn create_bitmap(&mut self, width: u32, height: u32, data: &[u8]) -> Result<Self::Bitmap, DeviceError>;

    // Pixel store

    /// Copy `rect` (the whole buffer when `None`) into `out`, rows `stride`
    /// bytes apart, 4 bytes per premultiplied RGBA pixel
    fn copy_pixels(&self, rect: Option<PixelRect>, stride: usize, out: &mut [u8]) -> Result<(), DeviceError>;
    /// Overwrite `rect` with tightly packed premultiplied RGBA rows
    fn write_pixels(&mut self, rect: PixelRect, data: &[u8]) -> Result<(), DeviceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_rect_fits() {
        assert!(PixelRect::new(0, 0, 10, 10).fits(10, 10));
        assert!(PixelRect::new(9, 9, 1, 1).fits(10, 10));
        assert!(!PixelRect::new(10, 0, 1, 1).fits(10, 10));
        assert!(!PixelRect::new(u32::MAX, 0, 2, 1).fits(10, 10));
    }

    #[test]
    fn test_tags_display() {
        let tags = DrawTags {
            outer: Some(DrawTag::DrawPath),
            inner: None,
        };
        assert_eq!(tags.to_string(), "tag1: draw-path, tag2: none");
    }
}
