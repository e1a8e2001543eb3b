//! Raster paint device
//!
//! [`RasterImage`] renders painter operations into an in-memory pixel buffer
//! through a [`RenderDevice`]. It ties the drawing session, the clip slot and
//! the stroke/fill cache together, offers direct pixel access and encodes the
//! result as PNG or JPEG.

use std::io::Write;

use fos_text::{FontHandle, FontMetrics, FontRequest, SystemFonts, TextService};

use crate::clip::ClipRegion;
use crate::codec;
use crate::color::Color;
use crate::config::{ImageFormat, RasterConfig};
use crate::device::{self, AntialiasMode, DrawTag, RenderDevice, SkiaDevice};
use crate::error::{Error, Result};
use crate::geometry;
use crate::painter::{ChangeFlags, PaintDevice, PainterState, RenderHints};
use crate::path::{PainterPath, Point, Rect};
use crate::pixels::PixelAccessor;
use crate::session::DrawingSession;
use crate::style::StyleCache;
use crate::text::{self, Alignment, OutlinePath};

/// An image painted in memory
pub struct RasterImage<D: RenderDevice = SkiaDevice> {
    device: D,
    session: DrawingSession,
    clip: ClipRegion<D>,
    styles: StyleCache<D>,
    text: Box<dyn TextService>,
    font: Option<FontHandle>,
    config: RasterConfig,
    painter_active: bool,
}

impl RasterImage<SkiaDevice> {
    /// Create a `width` x `height` image that [`write`](Self::write)s `format`
    pub fn new(format: ImageFormat, width: u32, height: u32) -> Result<Self> {
        Self::with_config(RasterConfig::default().with_format(format), width, height)
    }

    /// Create an image from a full configuration
    pub fn with_config(config: RasterConfig, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyDevice { width, height });
        }
        let device = SkiaDevice::new(width, height)?;
        let fonts = SystemFonts::from_config(&config.fonts)?;
        Self::with_device(device, config, Box::new(fonts))
    }
}

impl<D: RenderDevice> RasterImage<D> {
    /// Wrap an existing device and text service
    pub fn with_device(mut device: D, config: RasterConfig, mut text: Box<dyn TextService>) -> Result<Self> {
        let (width, height) = (device.width(), device.height());
        if width == 0 || height == 0 {
            return Err(Error::EmptyDevice { width, height });
        }

        let styles = StyleCache::new(&mut device)?;
        let clip = ClipRegion::new(&mut device, config.trace_draw_tags)?;
        let font = match text.resolve(&FontRequest::default()) {
            Ok(font) => Some(font),
            Err(error) => {
                tracing::warn!("No default font, text drawing disabled: {error}");
                None
            }
        };
        tracing::debug!(width, height, format = config.format.name(), "Created raster image");

        Ok(Self {
            device,
            session: DrawingSession::new(),
            clip,
            styles,
            text,
            font,
            config,
            painter_active: false,
        })
    }

    pub fn format(&self) -> ImageFormat {
        self.config.format
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Whether a painter is attached
    pub fn is_painting(&self) -> bool {
        self.painter_active
    }

    /// MIME type of what [`write`](Self::write) produces
    pub fn mime_type(&self) -> &'static str {
        self.config.format.mime_type()
    }

    fn ensure_drawing(&self) -> Result<()> {
        if self.session.is_active() {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    fn font(&self) -> Result<&FontHandle> {
        self.font.as_ref().ok_or(Error::NoFont)
    }

    fn apply_font(&mut self, request: &FontRequest) {
        match self.text.resolve(request) {
            Ok(font) => {
                tracing::trace!(family = font.family(), size = font.size(), "Font resolved");
                self.font = Some(font);
            }
            Err(error) => {
                tracing::warn!("Could not resolve font: {error}");
                self.font = None;
            }
        }
    }

    /// Clear the whole buffer to transparent black
    pub fn clear(&mut self) {
        self.session.enter(&mut self.device);
        device::tagged(&mut self.device, self.config.trace_draw_tags, DrawTag::Clear, false, |device| {
            device.clear(Color::TRANSPARENT)
        });
        self.session.leave(&mut self.device);
    }

    fn pixels(&mut self) -> PixelAccessor<'_, D> {
        PixelAccessor::new(&mut self.device, &self.session, &self.clip)
    }

    /// Premultiplied color at (`x`, `y`)
    pub fn get_pixel(&mut self, x: u32, y: u32) -> Result<Color> {
        self.pixels().get_pixel(x, y)
    }

    /// Copy the whole buffer as premultiplied RGBA rows into `out`
    pub fn get_pixels(&mut self, out: &mut [u8]) -> Result<()> {
        self.pixels().get_pixels(out)
    }

    /// Overwrite one pixel; refused while a painter is attached
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) -> Result<()> {
        let painter_active = self.painter_active;
        self.pixels().set_pixel(x, y, color, painter_active)
    }

    /// Encode the buffer in the configured format into `sink`
    pub fn write(&mut self, sink: &mut dyn Write) -> Result<()> {
        let (width, height) = (self.device.width(), self.device.height());
        let mut data = vec![0u8; width as usize * height as usize * 4];
        self.get_pixels(&mut data)?;
        codec::encode(self.config.format, width, height, &data, self.config.jpeg_quality, sink)
    }
}

impl<D: RenderDevice> PaintDevice for RasterImage<D> {
    fn width(&self) -> u32 {
        self.device.width()
    }

    fn height(&self) -> u32 {
        self.device.height()
    }

    fn default_render_hints(&self) -> RenderHints {
        if self.config.antialias {
            RenderHints::ANTIALIASING
        } else {
            RenderHints::empty()
        }
    }

    fn init(&mut self, state: &PainterState) -> Result<()> {
        let (width, height) = (self.device.width(), self.device.height());
        if width == 0 || height == 0 {
            return Err(Error::EmptyDevice { width, height });
        }
        self.painter_active = true;
        self.session.enter(&mut self.device);
        self.set_changed(state, ChangeFlags::all());
        Ok(())
    }

    fn done(&mut self) {
        self.clip.release(&mut self.device);
        self.session.leave(&mut self.device);
        self.painter_active = false;
    }

    fn set_changed(&mut self, state: &PainterState, flags: ChangeFlags) {
        if !self.session.is_active() {
            tracing::warn!(?flags, "State change outside a drawing session ignored");
            return;
        }
        let push = self.config.trace_draw_tags;
        let combined = state.combined_transform();
        let mut flags = flags;

        if flags.contains(ChangeFlags::CLIPPING) {
            let clip = state.clipping.then_some(&state.clip_path);
            self.clip
                .set_clip(&mut self.device, clip, state.clip_path_transform, combined);
        }

        if flags.contains(ChangeFlags::TRANSFORM) {
            device::tagged(&mut self.device, push, DrawTag::SetTransform, false, |device| {
                device.set_transform(combined)
            });
            flags = ChangeFlags::PEN | ChangeFlags::BRUSH | ChangeFlags::FONT | ChangeFlags::HINTS;
        }

        if flags.contains(ChangeFlags::HINTS) {
            let mode = if state.hints.contains(RenderHints::ANTIALIASING) {
                AntialiasMode::PerPrimitive
            } else {
                AntialiasMode::Aliased
            };
            device::tagged(&mut self.device, push, DrawTag::SetAntialiasMode, false, |device| {
                device.set_antialias_mode(mode)
            });
        }

        if flags.contains(ChangeFlags::PEN) {
            self.styles.apply_pen(&mut self.device, &state.pen, &combined);
        }

        if flags.contains(ChangeFlags::BRUSH) {
            self.styles.apply_brush(&mut self.device, &state.brush);
        }

        if flags.contains(ChangeFlags::FONT) {
            self.apply_font(&state.font);
        }
    }

    fn draw_path(&mut self, state: &PainterState, path: &PainterPath) -> Result<()> {
        self.ensure_drawing()?;
        if path.is_empty() {
            return Ok(());
        }
        let (fill, stroke) = (state.brush.is_visible(), state.pen.is_visible());
        let Self {
            device,
            styles,
            config,
            ..
        } = self;
        device::tagged(device, config.trace_draw_tags, DrawTag::DrawPath, false, |device| {
            match geometry::build(device, path, fill) {
                Ok(geometry) => styles.paint(device, &geometry, fill, stroke),
                Err(error) => tracing::error!("Failed to build path geometry: {error}"),
            }
        });
        Ok(())
    }

    fn draw_arc(&mut self, state: &PainterState, rect: Rect, start_angle: f64, span_angle: f64) -> Result<()> {
        self.ensure_drawing()?;
        let (fill, stroke) = (state.brush.is_visible(), state.pen.is_visible());
        let center = rect.center();
        let (rx, ry) = (rect.width / 2.0, rect.height / 2.0);
        let Self {
            device,
            styles,
            config,
            ..
        } = self;
        device::tagged(device, config.trace_draw_tags, DrawTag::DrawArc, false, |device| {
            match geometry::build_arc(device, center, rx, ry, start_angle, span_angle, fill) {
                Ok(geometry) => styles.paint(device, &geometry, fill, stroke),
                Err(error) => tracing::error!("Failed to build arc geometry: {error}"),
            }
        });
        Ok(())
    }

    fn draw_line(&mut self, state: &PainterState, from: Point, to: Point) -> Result<()> {
        self.ensure_drawing()?;
        if !state.pen.is_visible() {
            return Ok(());
        }
        let Self {
            device,
            styles,
            config,
            ..
        } = self;
        device::tagged(device, config.trace_draw_tags, DrawTag::DrawLine, false, |device| {
            if let Some(style) = styles.stroke_style() {
                device.draw_line(from, to, styles.stroke_brush(), styles.line_width(), style);
            }
        });
        Ok(())
    }

    fn draw_image(&mut self, _state: &PainterState, dest: Rect, uri: &str, source: Rect) -> Result<()> {
        self.ensure_drawing()?;
        let image = codec::load(uri)?;
        let bitmap = self.device.create_bitmap(image.width, image.height, &image.data)?;
        device::tagged(
            &mut self.device,
            self.config.trace_draw_tags,
            DrawTag::DrawBitmap,
            false,
            |device| device.draw_bitmap(&bitmap, dest, 1.0, source),
        );
        Ok(())
    }

    fn draw_text(
        &mut self,
        state: &PainterState,
        rect: Rect,
        align: Alignment,
        text: &str,
        clip_point: Option<Point>,
    ) -> Result<()> {
        self.ensure_drawing()?;
        if let Some(point) = clip_point {
            let point = state.world_transform.map_point(point);
            if !state.clip_path.is_empty() && !state.clip_path.contains_point(point, &state.clip_path_transform) {
                return Ok(());
            }
        }

        let font = self.font()?;
        let metrics = self.text.metrics(font)?;
        let width = self.text.measure(font, text, None)? as f64;
        let origin = text::text_origin(rect, align, &metrics, width);
        let mut outline = OutlinePath::default();
        self.text
            .outline(font, text, (origin.x as f32, origin.y as f32), &mut outline)?;
        let path = outline.into_path();
        if path.is_empty() {
            return Ok(());
        }

        // Glyphs are painted with the pen color
        let Self {
            device,
            styles,
            config,
            ..
        } = self;
        device::tagged(device, config.trace_draw_tags, DrawTag::DrawText, false, |device| {
            match geometry::build(device, &path, true) {
                Ok(geometry) => device.fill_geometry(&geometry, styles.stroke_brush()),
                Err(error) => tracing::error!("Failed to build text geometry: {error}"),
            }
        });
        Ok(())
    }

    fn measure_text(&mut self, _state: &PainterState, text: &str, max_width: Option<f64>) -> Result<f64> {
        let font = self.font()?;
        let width = self.text.measure(font, text, max_width.map(|w| w as f32))?;
        Ok(width as f64)
    }

    fn font_metrics(&mut self, _state: &PainterState) -> Result<FontMetrics> {
        let font = self.font()?;
        Ok(self.text.metrics(font)?)
    }
}
