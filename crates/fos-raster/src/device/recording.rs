//! Recording rendering device
//!
//! Keeps a log of every primitive call and every handle release. Pixels live
//! in a plain buffer that is never rasterised into; only `clear` and
//! `write_pixels` change it.

use std::cell::RefCell;
use std::rc::Rc;

use super::{
    AntialiasMode, ArcSegment, DrawTags, FigureBegin, FigureEnd, GeometrySink, GradientStop, PixelRect, RenderDevice,
    StrokeProperties,
};
use crate::color::Color;
use crate::error::{DeviceError, FrameError};
use crate::path::{Point, Rect};
use crate::transform::Transform;

type Log = Rc<RefCell<Vec<DeviceCall>>>;

/// Kind of a released handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Geometry,
    Brush,
    StrokeStyle,
    Layer,
    Bitmap,
}

/// One recorded geometry sink call
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    BeginFigure(Point, FigureBegin),
    Line(Point),
    Bezier(Point, Point, Point),
    QuadraticBezier(Point, Point),
    Arc(ArcSegment),
    EndFigure(FigureEnd),
}

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    BeginDraw,
    EndDraw,
    SetTransform(Transform),
    SetAntialiasMode(AntialiasMode),
    SetTags(DrawTags),
    Clear(Color),
    CreateGeometry(usize),
    FillGeometry { geometry: usize, brush: usize },
    DrawGeometry { geometry: usize, brush: usize, width: f32, style: usize },
    DrawLine { from: Point, to: Point, brush: usize, width: f32 },
    DrawBitmap { bitmap: usize, dest: Rect, opacity: f32, source: Rect },
    CreateLayer(usize),
    PushLayer { geometry: usize, layer: usize },
    PopLayer,
    CreateSolidBrush { id: usize, color: Color },
    SetBrushColor { brush: usize, color: Color },
    CreateLinearGradient { id: usize, start: Point, end: Point, stops: Vec<GradientStop> },
    CreateRadialGradient { id: usize, center: Point, origin_offset: Point, radius: f64, stops: Vec<GradientStop> },
    CreateStrokeStyle { id: usize, properties: StrokeProperties, dashes: Vec<f32> },
    CreateBitmap { id: usize, width: u32, height: u32 },
    CopyPixels(Option<PixelRect>),
    WritePixels(PixelRect),
    Release(HandleKind, usize),
}

/// Handle that logs its own release
#[derive(Debug)]
pub struct Recorded {
    id: usize,
    kind: HandleKind,
    log: Log,
}

impl Recorded {
    pub fn id(&self) -> usize {
        self.id
    }
}

impl Drop for Recorded {
    fn drop(&mut self) {
        self.log.borrow_mut().push(DeviceCall::Release(self.kind, self.id));
    }
}

/// Geometry with the sink calls that built it
#[derive(Debug)]
pub struct RecordedGeometry {
    handle: Recorded,
    calls: Vec<SinkCall>,
}

impl RecordedGeometry {
    pub fn id(&self) -> usize {
        self.handle.id
    }

    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }
}

/// Sink collecting [`SinkCall`]s
#[derive(Debug)]
pub struct RecordingSink {
    handle: Recorded,
    calls: Vec<SinkCall>,
}

impl GeometrySink for RecordingSink {
    type Geometry = RecordedGeometry;

    fn begin_figure(&mut self, start: Point, begin: FigureBegin) {
        self.calls.push(SinkCall::BeginFigure(start, begin));
    }

    fn add_line(&mut self, to: Point) {
        self.calls.push(SinkCall::Line(to));
    }

    fn add_bezier(&mut self, c1: Point, c2: Point, end: Point) {
        self.calls.push(SinkCall::Bezier(c1, c2, end));
    }

    fn add_quadratic_bezier(&mut self, c: Point, end: Point) {
        self.calls.push(SinkCall::QuadraticBezier(c, end));
    }

    fn add_arc(&mut self, arc: &ArcSegment) {
        self.calls.push(SinkCall::Arc(*arc));
    }

    fn end_figure(&mut self, end: FigureEnd) {
        self.calls.push(SinkCall::EndFigure(end));
    }

    fn close(self) -> Result<RecordedGeometry, DeviceError> {
        Ok(RecordedGeometry {
            handle: self.handle,
            calls: self.calls,
        })
    }
}

/// Brush handle; gradients keep their color fixed
#[derive(Debug)]
pub struct RecordedBrush {
    handle: Recorded,
    color: Option<Color>,
}

impl RecordedBrush {
    pub fn id(&self) -> usize {
        self.handle.id
    }

    /// Current color of a solid brush
    pub fn color(&self) -> Option<Color> {
        self.color
    }
}

/// Device that records calls instead of drawing
#[derive(Debug)]
pub struct RecordingDevice {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    transform: Transform,
    tags: DrawTags,
    in_frame: bool,
    layer_pushed: bool,
    frame_error: Option<FrameError>,
    next_id: usize,
    log: Log,
    /// Fail every resource creation, for error path tests
    fail_resources: bool,
}

impl RecordingDevice {
    pub fn new(width: u32, height: u32) -> Result<Self, DeviceError> {
        if width == 0 || height == 0 {
            return Err(DeviceError::InvalidSize { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
            transform: Transform::identity(),
            tags: DrawTags::default(),
            in_frame: false,
            layer_pushed: false,
            frame_error: None,
            next_id: 0,
            log: Rc::new(RefCell::new(Vec::new())),
            fail_resources: false,
        })
    }

    /// Copy of the call log
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.log.borrow().clone()
    }

    /// Shared handle on the call log, usable after the device moved
    pub fn log(&self) -> Rc<RefCell<Vec<DeviceCall>>> {
        Rc::clone(&self.log)
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }

    /// Make every following resource creation fail
    pub fn set_fail_resources(&mut self, fail: bool) {
        self.fail_resources = fail;
    }

    pub fn in_frame(&self) -> bool {
        self.in_frame
    }

    pub fn layer_pushed(&self) -> bool {
        self.layer_pushed
    }

    fn record(&self, call: DeviceCall) {
        self.log.borrow_mut().push(call);
    }

    fn handle(&mut self, kind: HandleKind) -> Recorded {
        self.next_id += 1;
        Recorded {
            id: self.next_id,
            kind,
            log: Rc::clone(&self.log),
        }
    }

    fn resource(&mut self, kind: HandleKind) -> Result<Recorded, DeviceError> {
        if self.fail_resources {
            return Err(DeviceError::WrongState("resource creation disabled"));
        }
        Ok(self.handle(kind))
    }

    fn fail(&mut self, message: &str) {
        if self.frame_error.is_none() {
            self.frame_error = Some(FrameError::new(message, self.tags));
        }
    }

    fn drawing(&mut self, operation: &str) {
        if !self.in_frame {
            self.fail(&format!("{operation} outside of a frame"));
        }
    }
}

impl RenderDevice for RecordingDevice {
    type Geometry = RecordedGeometry;
    type Sink = RecordingSink;
    type Brush = RecordedBrush;
    type StrokeStyle = Recorded;
    type Layer = Recorded;
    type Bitmap = Recorded;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn begin_draw(&mut self) {
        self.record(DeviceCall::BeginDraw);
        if self.in_frame {
            self.fail("begin_draw inside a frame");
        }
        self.in_frame = true;
    }

    fn end_draw(&mut self) -> Result<(), FrameError> {
        self.record(DeviceCall::EndDraw);
        if !self.in_frame {
            return Err(FrameError::new("end_draw without begin_draw", self.tags));
        }
        if self.layer_pushed {
            self.layer_pushed = false;
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
        self.record(DeviceCall::SetTransform(transform));
    }

    fn set_antialias_mode(&mut self, mode: AntialiasMode) {
        self.record(DeviceCall::SetAntialiasMode(mode));
    }

    fn tags(&self) -> DrawTags {
        self.tags
    }

    fn set_tags(&mut self, tags: DrawTags) {
        self.tags = tags;
        self.record(DeviceCall::SetTags(tags));
    }

    fn clear(&mut self, color: Color) {
        self.drawing("clear");
        self.record(DeviceCall::Clear(color));
        let p = color.premultiplied();
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&[p.r, p.g, p.b, p.a]);
        }
    }

    fn create_path_geometry(&mut self) -> RecordingSink {
        let handle = self.handle(HandleKind::Geometry);
        self.record(DeviceCall::CreateGeometry(handle.id));
        RecordingSink {
            handle,
            calls: Vec::new(),
        }
    }

    fn fill_geometry(&mut self, geometry: &RecordedGeometry, brush: &RecordedBrush) {
        self.drawing("fill_geometry");
        self.record(DeviceCall::FillGeometry {
            geometry: geometry.id(),
            brush: brush.id(),
        });
    }

    fn draw_geometry(&mut self, geometry: &RecordedGeometry, brush: &RecordedBrush, width: f32, style: &Recorded) {
        self.drawing("draw_geometry");
        self.record(DeviceCall::DrawGeometry {
            geometry: geometry.id(),
            brush: brush.id(),
            width,
            style: style.id,
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, brush: &RecordedBrush, width: f32, _style: &Recorded) {
        self.drawing("draw_line");
        self.record(DeviceCall::DrawLine {
            from,
            to,
            brush: brush.id(),
            width,
        });
    }

    fn draw_bitmap(&mut self, bitmap: &Recorded, dest: Rect, opacity: f32, source: Rect) {
        self.drawing("draw_bitmap");
        self.record(DeviceCall::DrawBitmap {
            bitmap: bitmap.id,
            dest,
            opacity,
            source,
        });
    }

    fn create_layer(&mut self) -> Result<Recorded, DeviceError> {
        let layer = self.resource(HandleKind::Layer)?;
        self.record(DeviceCall::CreateLayer(layer.id));
        Ok(layer)
    }

    fn push_layer(&mut self, geometry: &RecordedGeometry, layer: &Recorded) {
        self.drawing("push_layer");
        self.record(DeviceCall::PushLayer {
            geometry: geometry.id(),
            layer: layer.id,
        });
        if self.layer_pushed {
            self.fail("push_layer with a layer already pushed");
        }
        self.layer_pushed = true;
    }

    fn pop_layer(&mut self) {
        self.drawing("pop_layer");
        self.record(DeviceCall::PopLayer);
        if !self.layer_pushed {
            self.fail("pop_layer without a pushed layer");
        }
        self.layer_pushed = false;
    }

    fn create_solid_color_brush(&mut self, color: Color) -> Result<RecordedBrush, DeviceError> {
        let handle = self.resource(HandleKind::Brush)?;
        self.record(DeviceCall::CreateSolidBrush { id: handle.id, color });
        Ok(RecordedBrush {
            handle,
            color: Some(color),
        })
    }

    fn set_brush_color(&mut self, brush: &mut RecordedBrush, color: Color) {
        self.record(DeviceCall::SetBrushColor { brush: brush.id(), color });
        match brush.color.as_mut() {
            Some(current) => *current = color,
            None => self.fail("set_brush_color on a gradient brush"),
        }
    }

    fn create_linear_gradient_brush(
        &mut self,
        start: Point,
        end: Point,
        stops: &[GradientStop],
    ) -> Result<RecordedBrush, DeviceError> {
        let handle = self.resource(HandleKind::Brush)?;
        self.record(DeviceCall::CreateLinearGradient {
            id: handle.id,
            start,
            end,
            stops: stops.to_vec(),
        });
        Ok(RecordedBrush { handle, color: None })
    }

    fn create_radial_gradient_brush(
        &mut self,
        center: Point,
        origin_offset: Point,
        radius: f64,
        stops: &[GradientStop],
    ) -> Result<RecordedBrush, DeviceError> {
        let handle = self.resource(HandleKind::Brush)?;
        self.record(DeviceCall::CreateRadialGradient {
            id: handle.id,
            center,
            origin_offset,
            radius,
            stops: stops.to_vec(),
        });
        Ok(RecordedBrush { handle, color: None })
    }

    fn create_stroke_style(&mut self, properties: &StrokeProperties, dashes: &[f32]) -> Result<Recorded, DeviceError> {
        let handle = self.resource(HandleKind::StrokeStyle)?;
        self.record(DeviceCall::CreateStrokeStyle {
            id: handle.id,
            properties: *properties,
            dashes: dashes.to_vec(),
        });
        Ok(handle)
    }

    fn create_bitmap(&mut self, width: u32, height: u32, data: &[u8]) -> Result<Recorded, DeviceError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(DeviceError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        let handle = self.resource(HandleKind::Bitmap)?;
        self.record(DeviceCall::CreateBitmap {
            id: handle.id,
            width,
            height,
        });
        Ok(handle)
    }

    fn copy_pixels(&self, rect: Option<PixelRect>, stride: usize, out: &mut [u8]) -> Result<(), DeviceError> {
        self.record(DeviceCall::CopyPixels(rect));
        if self.in_frame {
            return Err(DeviceError::WrongState("pixel access inside a frame"));
        }
        let rect = rect.unwrap_or(PixelRect::new(0, 0, self.width, self.height));
        if !rect.fits(self.width, self.height) {
            return Err(DeviceError::OutOfBounds);
        }
        let row_bytes = rect.width as usize * 4;
        let available = out.len();
        for row in 0..rect.height as usize {
            let src = ((rect.y as usize + row) * self.width as usize + rect.x as usize) * 4;
            let dst = row * stride;
            let target = out.get_mut(dst..dst + row_bytes).ok_or(DeviceError::DataLength {
                expected: stride * rect.height as usize,
                actual: available,
            })?;
            target.copy_from_slice(&self.pixels[src..src + row_bytes]);
        }
        Ok(())
    }

    fn write_pixels(&mut self, rect: PixelRect, data: &[u8]) -> Result<(), DeviceError> {
        self.record(DeviceCall::WritePixels(rect));
        if self.in_frame {
            return Err(DeviceError::WrongState("pixel access inside a frame"));
        }
        if !rect.fits(self.width, self.height) {
            return Err(DeviceError::OutOfBounds);
        }
        let row_bytes = rect.width as usize * 4;
        if data.len() != row_bytes * rect.height as usize {
            return Err(DeviceError::DataLength {
                expected: row_bytes * rect.height as usize,
                actual: data.len(),
            });
        }
        for row in 0..rect.height as usize {
            let dst = ((rect.y as usize + row) * self.width as usize + rect.x as usize) * 4;
            self.pixels[dst..dst + row_bytes].copy_from_slice(&data[row * row_bytes..(row + 1) * row_bytes]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_log_release() {
        let mut device = RecordingDevice::new(2, 2).unwrap();
        let brush = device.create_solid_color_brush(Color::RED).unwrap();
        let id = brush.id();
        drop(brush);
        assert_eq!(device.calls().last(), Some(&DeviceCall::Release(HandleKind::Brush, id)));
    }

    #[test]
    fn test_unbalanced_layers_fail_frame() {
        let mut device = RecordingDevice::new(2, 2).unwrap();
        let geometry = device.create_path_geometry().close().unwrap();
        let layer = device.create_layer().unwrap();
        device.begin_draw();
        device.push_layer(&geometry, &layer);
        assert!(device.end_draw().is_err());
        assert!(!device.layer_pushed());
    }

    #[test]
    fn test_copy_into_short_buffer() {
        let device = RecordingDevice::new(2, 2).unwrap();
        let mut out = [0u8; 12];
        assert!(matches!(
            device.copy_pixels(None, 8, &mut out),
            Err(DeviceError::DataLength { expected: 16, actual: 12 })
        ));

        let mut out = [0u8; 16];
        assert!(device.copy_pixels(None, 8, &mut out).is_ok());
    }

    #[test]
    fn test_failing_resources() {
        let mut device = RecordingDevice::new(2, 2).unwrap();
        device.set_fail_resources(true);
        assert!(device.create_solid_color_brush(Color::RED).is_err());
        assert!(device.create_layer().is_err());
    }
}
