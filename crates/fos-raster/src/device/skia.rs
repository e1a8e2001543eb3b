//! tiny-skia rendering device
//!
//! Draws into a [`tiny_skia::Pixmap`]. Clip layers are rasterised into a
//! [`tiny_skia::Mask`] when pushed; endpoint arcs become cubic Beziers.

use tiny_skia::{
    FillRule, FilterQuality, IntSize, Mask, Paint, PathBuilder, Pattern, Pixmap, Shader, SpreadMode, Stroke,
    StrokeDash,
};

use super::arc_curves::arc_to_cubics;
use super::{
    AntialiasMode, ArcSegment, DrawTags, FigureBegin, FigureEnd, GeometrySink, GradientStop, LineCap, LineJoin,
    PixelRect, RenderDevice, StrokeProperties,
};
use crate::color::Color;
use crate::error::{DeviceError, FrameError};
use crate::path::{Point, Rect};
use crate::transform::Transform;

const BYTES_PER_PIXEL: usize = 4;

/// Fill or stroke source
#[derive(Debug, Clone)]
pub enum SkiaBrush {
    Solid(Color),
    Shader(Shader<'static>),
}

/// Stroke style: fixed cap, join and dash pattern
#[derive(Debug, Clone)]
pub struct SkiaStrokeStyle {
    properties: StrokeProperties,
    /// Dash lengths in multiples of the stroke width
    dashes: Vec<f32>,
}

impl SkiaStrokeStyle {
    fn stroke(&self, width: f32) -> Stroke {
        let dash = if self.dashes.is_empty() {
            None
        } else {
            // A hairline still needs non-zero dash lengths
            let unit = if width > 0.0 { width } else { 1.0 };
            StrokeDash::new(self.dashes.iter().map(|d| d * unit).collect(), 0.0)
        };
        Stroke {
            width,
            miter_limit: self.properties.miter_limit,
            line_cap: match self.properties.cap {
                LineCap::Flat => tiny_skia::LineCap::Butt,
                LineCap::Square => tiny_skia::LineCap::Square,
                LineCap::Round => tiny_skia::LineCap::Round,
            },
            line_join: match self.properties.join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
                LineJoin::Round => tiny_skia::LineJoin::Round,
            },
            dash,
        }
    }
}

/// Built path geometry.
///
/// Filled figures make up the fill path; every figure is stroked.
#[derive(Debug, Clone, Default)]
pub struct SkiaGeometry {
    fill: Option<tiny_skia::Path>,
    stroke: Option<tiny_skia::Path>,
}

impl SkiaGeometry {
    pub fn is_empty(&self) -> bool {
        self.stroke.is_none()
    }
}

/// Clip layer handle, the mask is created on push
#[derive(Debug, Clone, Copy, Default)]
pub struct SkiaLayer;

/// Geometry sink producing a [`SkiaGeometry`]
#[derive(Debug, Default)]
pub struct SkiaSink {
    fill: PathBuilder,
    stroke: PathBuilder,
    current: Point,
    filled: bool,
    in_figure: bool,
    invalid: bool,
}

impl SkiaSink {
    fn check(&mut self, p: Point) -> bool {
        if p.x.is_finite() && p.y.is_finite() {
            true
        } else {
            self.invalid = true;
            false
        }
    }

    fn cubic(&mut self, c1: Point, c2: Point, end: Point) {
        let (c1x, c1y, c2x, c2y, ex, ey) = (c1.x as f32, c1.y as f32, c2.x as f32, c2.y as f32, end.x as f32, end.y as f32);
        if self.filled {
            self.fill.cubic_to(c1x, c1y, c2x, c2y, ex, ey);
        }
        self.stroke.cubic_to(c1x, c1y, c2x, c2y, ex, ey);
    }
}

impl GeometrySink for SkiaSink {
    type Geometry = SkiaGeometry;

    fn begin_figure(&mut self, start: Point, begin: FigureBegin) {
        if !self.check(start) {
            return;
        }
        self.filled = begin == FigureBegin::Filled;
        self.in_figure = true;
        self.current = start;
        if self.filled {
            self.fill.move_to(start.x as f32, start.y as f32);
        }
        self.stroke.move_to(start.x as f32, start.y as f32);
    }

    fn add_line(&mut self, to: Point) {
        if !self.in_figure || !self.check(to) {
            return;
        }
        if self.filled {
            self.fill.line_to(to.x as f32, to.y as f32);
        }
        self.stroke.line_to(to.x as f32, to.y as f32);
        self.current = to;
    }

    fn add_bezier(&mut self, c1: Point, c2: Point, end: Point) {
        if !self.in_figure || !(self.check(c1) && self.check(c2) && self.check(end)) {
            return;
        }
        self.cubic(c1, c2, end);
        self.current = end;
    }

    fn add_quadratic_bezier(&mut self, c: Point, end: Point) {
        if !self.in_figure || !(self.check(c) && self.check(end)) {
            return;
        }
        if self.filled {
            self.fill.quad_to(c.x as f32, c.y as f32, end.x as f32, end.y as f32);
        }
        self.stroke.quad_to(c.x as f32, c.y as f32, end.x as f32, end.y as f32);
        self.current = end;
    }

    fn add_arc(&mut self, arc: &ArcSegment) {
        if !self.in_figure || !self.check(arc.point) || !arc.rx.is_finite() || !arc.ry.is_finite() {
            self.invalid |= !arc.rx.is_finite() || !arc.ry.is_finite();
            return;
        }
        let mut cubics = Vec::with_capacity(4);
        arc_to_cubics(self.current, arc, |c1, c2, end| cubics.push((c1, c2, end)));
        for (c1, c2, end) in cubics {
            self.cubic(c1, c2, end);
        }
        self.current = arc.point;
    }

    fn end_figure(&mut self, end: FigureEnd) {
        if !self.in_figure {
            return;
        }
        if end == FigureEnd::Closed {
            if self.filled {
                self.fill.close();
            }
            self.stroke.close();
        }
        self.in_figure = false;
    }

    fn close(self) -> Result<SkiaGeometry, DeviceError> {
        if self.invalid {
            return Err(DeviceError::InvalidGeometry);
        }
        Ok(SkiaGeometry {
            fill: self.fill.finish(),
            stroke: self.stroke.finish(),
        })
    }
}

/// Rendering device over a tiny-skia pixmap
pub struct SkiaDevice {
    pixmap: Pixmap,
    transform: Transform,
    anti_alias: bool,
    in_frame: bool,
    layer: Option<Mask>,
    tags: DrawTags,
    /// First failure of the current frame
    frame_error: Option<FrameError>,
}

impl std::fmt::Debug for SkiaDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkiaDevice")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("in_frame", &self.in_frame)
            .field("layer", &self.layer.is_some())
            .finish()
    }
}

impl SkiaDevice {
    /// Create a device over a transparent `width` x `height` buffer
    pub fn new(width: u32, height: u32) -> Result<Self, DeviceError> {
        let pixmap = Pixmap::new(width, height).ok_or(DeviceError::InvalidSize { width, height })?;
        Ok(Self {
            pixmap,
            transform: Transform::identity(),
            anti_alias: true,
            in_frame: false,
            layer: None,
            tags: DrawTags::default(),
            frame_error: None,
        })
    }

    /// Whether a frame is open
    pub fn in_frame(&self) -> bool {
        self.in_frame
    }

    /// Whether a clip layer is pushed
    pub fn has_layer(&self) -> bool {
        self.layer.is_some()
    }

    fn fail(&mut self, message: &str) {
        tracing::trace!(tags = %self.tags, "device error: {message}");
        if self.frame_error.is_none() {
            self.frame_error = Some(FrameError::new(message, self.tags));
        }
    }

    /// Refuse drawing outside a frame
    fn drawable(&mut self, operation: &str) -> bool {
        if !self.in_frame {
            self.fail(&format!("{operation} outside of a frame"));
        }
        self.in_frame
    }

    fn paint(&self, brush: &SkiaBrush) -> Paint<'static> {
        let mut paint = Paint::default();
        match brush {
            SkiaBrush::Solid(color) => paint.set_color(color.to_skia()),
            SkiaBrush::Shader(shader) => paint.shader = shader.clone(),
        }
        paint.anti_alias = self.anti_alias;
        paint
    }

    fn stops(stops: &[GradientStop]) -> Vec<tiny_skia::GradientStop> {
        stops
            .iter()
            .map(|s| tiny_skia::GradientStop::new(s.position.clamp(0.0, 1.0) as f32, s.color.to_skia()))
            .collect()
    }

    fn check_pixels(&self, rect: PixelRect, data: &[u8]) -> Result<(), DeviceError> {
        if self.in_frame {
            return Err(DeviceError::WrongState("pixel access inside a frame"));
        }
        if !rect.fits(self.pixmap.width(), self.pixmap.height()) {
            return Err(DeviceError::OutOfBounds);
        }
        let expected = rect.width as usize * rect.height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(DeviceError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(())
    }
}

fn premultiplied(data: &[u8]) -> bool {
    data.chunks_exact(BYTES_PER_PIXEL)
        .all(|p| p[0] <= p[3] && p[1] <= p[3] && p[2] <= p[3])
}

fn skia_point(p: Point) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(p.x as f32, p.y as f32)
}

fn skia_rect(r: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(r.x as f32, r.y as f32, r.width as f32, r.height as f32)
}

impl RenderDevice for SkiaDevice {
    type Geometry = SkiaGeometry;
    type Sink = SkiaSink;
    type Brush = SkiaBrush;
    type StrokeStyle = SkiaStrokeStyle;
    type Layer = SkiaLayer;
    type Bitmap = Pixmap;

    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn begin_draw(&mut self) {
        if self.in_frame {
            self.fail("begin_draw inside a frame");
        }
        self.in_frame = true;
    }

    fn end_draw(&mut self) -> Result<(), FrameError> {
        if !self.in_frame {
            return Err(FrameError::new("end_draw without begin_draw", self.tags));
        }
        if self.layer.take().is_some() {
            self.fail("layer still pushed at end of frame");
        }
        self.in_frame = false;
        match self.frame_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn set_antialias_mode(&mut self, mode: AntialiasMode) {
        self.anti_alias = mode == AntialiasMode::PerPrimitive;
    }

    fn tags(&self) -> DrawTags {
        self.tags
    }

    fn set_tags(&mut self, tags: DrawTags) {
        self.tags = tags;
    }

    fn clear(&mut self, color: Color) {
        if !self.drawable("clear") {
            return;
        }
        match &self.layer {
            None => self.pixmap.fill(color.to_skia()),
            Some(mask) => {
                let mut paint = Paint::default();
                paint.set_color(color.to_skia());
                paint.blend_mode = tiny_skia::BlendMode::Source;
                if let Some(rect) = tiny_skia::Rect::from_xywh(0.0, 0.0, self.pixmap.width() as f32, self.pixmap.height() as f32) {
                    self.pixmap.fill_rect(rect, &paint, tiny_skia::Transform::identity(), Some(mask));
                }
            }
        }
    }

    fn create_path_geometry(&mut self) -> SkiaSink {
        SkiaSink::default()
    }

    fn fill_geometry(&mut self, geometry: &SkiaGeometry, brush: &SkiaBrush) {
        if !self.drawable("fill_geometry") {
            return;
        }
        if let Some(path) = &geometry.fill {
            let paint = self.paint(brush);
            self.pixmap
                .fill_path(path, &paint, FillRule::Winding, self.transform.to_skia(), self.layer.as_ref());
        }
    }

    fn draw_geometry(&mut self, geometry: &SkiaGeometry, brush: &SkiaBrush, width: f32, style: &SkiaStrokeStyle) {
        if !self.drawable("draw_geometry") {
            return;
        }
        if let Some(path) = &geometry.stroke {
            let paint = self.paint(brush);
            let stroke = style.stroke(width);
            self.pixmap
                .stroke_path(path, &paint, &stroke, self.transform.to_skia(), self.layer.as_ref());
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, brush: &SkiaBrush, width: f32, style: &SkiaStrokeStyle) {
        if !self.drawable("draw_line") {
            return;
        }
        let mut builder = PathBuilder::new();
        builder.move_to(from.x as f32, from.y as f32);
        builder.line_to(to.x as f32, to.y as f32);
        let Some(path) = builder.finish() else {
            return;
        };
        let paint = self.paint(brush);
        let stroke = style.stroke(width);
        self.pixmap
            .stroke_path(&path, &paint, &stroke, self.transform.to_skia(), self.layer.as_ref());
    }

    fn draw_bitmap(&mut self, bitmap: &Pixmap, dest: Rect, opacity: f32, source: Rect) {
        if !self.drawable("draw_bitmap") {
            return;
        }
        let (Some(dest_rect), false) = (skia_rect(dest), source.is_empty()) else {
            return;
        };
        // Map the source rectangle of the bitmap onto the destination
        let sx = (dest.width / source.width) as f32;
        let sy = (dest.height / source.height) as f32;
        let pattern_ts = tiny_skia::Transform::from_row(
            sx,
            0.0,
            0.0,
            sy,
            dest.x as f32 - source.x as f32 * sx,
            dest.y as f32 - source.y as f32 * sy,
        );
        let quality = if self.anti_alias {
            FilterQuality::Bilinear
        } else {
            FilterQuality::Nearest
        };
        let mut paint = Paint::default();
        paint.shader = Pattern::new(bitmap.as_ref(), SpreadMode::Pad, quality, opacity.clamp(0.0, 1.0), pattern_ts);
        paint.anti_alias = self.anti_alias;
        self.pixmap
            .fill_rect(dest_rect, &paint, self.transform.to_skia(), self.layer.as_ref());
    }

    fn create_layer(&mut self) -> Result<SkiaLayer, DeviceError> {
        Ok(SkiaLayer)
    }

    fn push_layer(&mut self, geometry: &SkiaGeometry, _layer: &SkiaLayer) {
        if !self.drawable("push_layer") {
            return;
        }
        if self.layer.is_some() {
            self.fail("push_layer with a layer already pushed");
            return;
        }
        let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
            self.fail("mask allocation failed");
            return;
        };
        if let Some(path) = &geometry.fill {
            mask.fill_path(path, FillRule::Winding, self.anti_alias, self.transform.to_skia());
        }
        self.layer = Some(mask);
    }

    fn pop_layer(&mut self) {
        if !self.drawable("pop_layer") {
            return;
        }
        if self.layer.take().is_none() {
            self.fail("pop_layer without a pushed layer");
        }
    }

    fn create_solid_color_brush(&mut self, color: Color) -> Result<SkiaBrush, DeviceError> {
        Ok(SkiaBrush::Solid(color))
    }

    fn set_brush_color(&mut self, brush: &mut SkiaBrush, color: Color) {
        match brush {
            SkiaBrush::Solid(current) => *current = color,
            SkiaBrush::Shader(_) => self.fail("set_brush_color on a gradient brush"),
        }
    }

    fn create_linear_gradient_brush(
        &mut self,
        start: Point,
        end: Point,
        stops: &[GradientStop],
    ) -> Result<SkiaBrush, DeviceError> {
        tiny_skia::LinearGradient::new(
            skia_point(start),
            skia_point(end),
            Self::stops(stops),
            SpreadMode::Pad,
            tiny_skia::Transform::identity(),
        )
        .map(SkiaBrush::Shader)
        .ok_or(DeviceError::InvalidGradient)
    }

    fn create_radial_gradient_brush(
        &mut self,
        center: Point,
        origin_offset: Point,
        radius: f64,
        stops: &[GradientStop],
    ) -> Result<SkiaBrush, DeviceError> {
        let focal = Point::new(center.x + origin_offset.x, center.y + origin_offset.y);
        tiny_skia::RadialGradient::new(
            skia_point(focal),
            skia_point(center),
            radius as f32,
            Self::stops(stops),
            SpreadMode::Pad,
            tiny_skia::Transform::identity(),
        )
        .map(SkiaBrush::Shader)
        .ok_or(DeviceError::InvalidGradient)
    }

    fn create_stroke_style(&mut self, properties: &StrokeProperties, dashes: &[f32]) -> Result<SkiaStrokeStyle, DeviceError> {
        if dashes.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(DeviceError::InvalidStrokeStyle(format!("dash lengths {dashes:?}")));
        }
        if !dashes.is_empty() && dashes.iter().sum::<f32>() <= 0.0 {
            return Err(DeviceError::InvalidStrokeStyle("dash pattern has no length".into()));
        }
        let mut dashes = dashes.to_vec();
        if dashes.len() % 2 == 1 {
            dashes.extend_from_within(..);
        }
        Ok(SkiaStrokeStyle {
            properties: *properties,
            dashes,
        })
    }

    fn create_bitmap(&mut self, width: u32, height: u32, data: &[u8]) -> Result<Pixmap, DeviceError> {
        let size = IntSize::from_wh(width, height).ok_or(DeviceError::InvalidSize { width, height })?;
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(DeviceError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        if !premultiplied(data) {
            return Err(DeviceError::NotPremultiplied);
        }
        Pixmap::from_vec(data.to_vec(), size).ok_or(DeviceError::InvalidSize { width, height })
    }

    fn copy_pixels(&self, rect: Option<PixelRect>, stride: usize, out: &mut [u8]) -> Result<(), DeviceError> {
        if self.in_frame {
            return Err(DeviceError::WrongState("pixel access inside a frame"));
        }
        let rect = rect.unwrap_or(PixelRect::new(0, 0, self.pixmap.width(), self.pixmap.height()));
        if !rect.fits(self.pixmap.width(), self.pixmap.height()) {
            return Err(DeviceError::OutOfBounds);
        }
        if rect.width == 0 || rect.height == 0 {
            return Ok(());
        }
        let row_bytes = rect.width as usize * BYTES_PER_PIXEL;
        let required = stride * (rect.height as usize - 1) + row_bytes;
        if stride < row_bytes || out.len() < required {
            return Err(DeviceError::DataLength {
                expected: required.max(row_bytes * rect.height as usize),
                actual: out.len(),
            });
        }

        let src_stride = self.pixmap.width() as usize * BYTES_PER_PIXEL;
        let data = self.pixmap.data();
        for row in 0..rect.height as usize {
            let src = (rect.y as usize + row) * src_stride + rect.x as usize * BYTES_PER_PIXEL;
            let dst = row * stride;
            out[dst..dst + row_bytes].copy_from_slice(&data[src..src + row_bytes]);
        }
        Ok(())
    }

    fn write_pixels(&mut self, rect: PixelRect, data: &[u8]) -> Result<(), DeviceError> {
        self.check_pixels(rect, data)?;
        if !premultiplied(data) {
            return Err(DeviceError::NotPremultiplied);
        }

        let row_bytes = rect.width as usize * BYTES_PER_PIXEL;
        let dst_stride = self.pixmap.width() as usize * BYTES_PER_PIXEL;
        let target = self.pixmap.data_mut();
        for (row, chunk) in data.chunks_exact(row_bytes.max(1)).enumerate().take(rect.height as usize) {
            let dst = (rect.y as usize + row) * dst_stride + rect.x as usize * BYTES_PER_PIXEL;
            target[dst..dst + row_bytes].copy_from_slice(chunk);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DrawTag;

    fn square(device: &mut SkiaDevice, rect: Rect, begin: FigureBegin) -> SkiaGeometry {
        let mut sink = device.create_path_geometry();
        sink.begin_figure(Point::new(rect.left(), rect.top()), begin);
        sink.add_line(Point::new(rect.right(), rect.top()));
        sink.add_line(Point::new(rect.right(), rect.bottom()));
        sink.add_line(Point::new(rect.left(), rect.bottom()));
        sink.end_figure(FigureEnd::Closed);
        sink.close().unwrap()
    }

    fn pixel(device: &SkiaDevice, x: u32, y: u32) -> [u8; 4] {
        let mut out = [0u8; 4];
        device.copy_pixels(Some(PixelRect::new(x, y, 1, 1)), 4, &mut out).unwrap();
        out
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(SkiaDevice::new(0, 10), Err(DeviceError::InvalidSize { .. })));
    }

    #[test]
    fn test_fill_square() {
        let mut device = SkiaDevice::new(20, 20).unwrap();
        let geometry = square(&mut device, Rect::new(0.0, 0.0, 10.0, 10.0), FigureBegin::Filled);
        let brush = device.create_solid_color_brush(Color::RED).unwrap();
        device.begin_draw();
        device.fill_geometry(&geometry, &brush);
        device.end_draw().unwrap();
        assert_eq!(pixel(&device, 5, 5), [255, 0, 0, 255]);
        assert_eq!(pixel(&device, 15, 15), [0, 0, 0, 0]);
    }

    #[test]
    fn test_hollow_figure_is_not_filled() {
        let mut device = SkiaDevice::new(20, 20).unwrap();
        let geometry = square(&mut device, Rect::new(0.0, 0.0, 10.0, 10.0), FigureBegin::Hollow);
        let brush = device.create_solid_color_brush(Color::RED).unwrap();
        device.begin_draw();
        device.fill_geometry(&geometry, &brush);
        device.end_draw().unwrap();
        assert_eq!(pixel(&device, 5, 5), [0, 0, 0, 0]);
    }

    #[test]
    fn test_layer_masks_drawing() {
        let mut device = SkiaDevice::new(20, 20).unwrap();
        let clip = square(&mut device, Rect::new(0.0, 0.0, 10.0, 20.0), FigureBegin::Filled);
        let all = square(&mut device, Rect::new(0.0, 0.0, 20.0, 20.0), FigureBegin::Filled);
        let brush = device.create_solid_color_brush(Color::BLUE).unwrap();
        let layer = device.create_layer().unwrap();

        device.begin_draw();
        device.push_layer(&clip, &layer);
        device.fill_geometry(&all, &brush);
        device.pop_layer();
        device.end_draw().unwrap();

        assert_eq!(pixel(&device, 5, 5), [0, 0, 255, 255]);
        assert_eq!(pixel(&device, 15, 5), [0, 0, 0, 0]);
    }

    #[test]
    fn test_frame_errors_are_latched_with_tags() {
        let mut device = SkiaDevice::new(4, 4).unwrap();
        device.begin_draw();
        device.set_tags(DrawTags {
            outer: Some(DrawTag::PopLayer),
            inner: None,
        });
        device.pop_layer();
        let error = device.end_draw().unwrap_err();
        assert_eq!(error.tags.outer, Some(DrawTag::PopLayer));

        // The next frame starts clean
        device.begin_draw();
        assert!(device.end_draw().is_ok());
        assert!(device.end_draw().is_err());
    }

    #[test]
    fn test_pixel_access_refused_inside_frame() {
        let mut device = SkiaDevice::new(4, 4).unwrap();
        device.begin_draw();
        let mut out = [0u8; 64];
        assert_eq!(
            device.copy_pixels(None, 16, &mut out),
            Err(DeviceError::WrongState("pixel access inside a frame"))
        );
        device.end_draw().unwrap();
        assert!(device.copy_pixels(None, 16, &mut out).is_ok());
    }

    #[test]
    fn test_write_pixels_validates() {
        let mut device = SkiaDevice::new(4, 4).unwrap();
        let rect = PixelRect::new(1, 1, 1, 1);
        assert_eq!(device.write_pixels(rect, &[200, 0, 0, 100]), Err(DeviceError::NotPremultiplied));
        assert_eq!(
            device.write_pixels(PixelRect::new(4, 0, 1, 1), &[0, 0, 0, 0]),
            Err(DeviceError::OutOfBounds)
        );
        device.write_pixels(rect, &[10, 20, 30, 40]).unwrap();
        assert_eq!(pixel(&device, 1, 1), [10, 20, 30, 40]);
        assert_eq!(pixel(&device, 0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_non_finite_geometry() {
        let mut device = SkiaDevice::new(4, 4).unwrap();
        let mut sink = device.create_path_geometry();
        sink.begin_figure(Point::ORIGIN, FigureBegin::Filled);
        sink.add_line(Point::new(f64::NAN, 1.0));
        sink.end_figure(FigureEnd::Open);
        assert_eq!(sink.close().unwrap_err(), DeviceError::InvalidGeometry);
    }

    #[test]
    fn test_stroke_style_rejects_negative_dash() {
        let mut device = SkiaDevice::new(4, 4).unwrap();
        assert!(device.create_stroke_style(&StrokeProperties::default(), &[4.0, -2.0]).is_err());
        assert!(device.create_stroke_style(&StrokeProperties::default(), &[4.0, 2.0, 1.0, 2.0]).is_ok());
    }
}
