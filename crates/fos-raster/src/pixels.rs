//! Direct pixel access
//!
//! Reads suspend the drawing session, copy straight from the pixel store and
//! resume it, so they see everything drawn so far. Writes bypass the renderer
//! and are refused while a painter is attached.

use crate::clip::ClipRegion;
use crate::color::Color;
use crate::device::{PixelRect, RenderDevice};
use crate::error::{Error, Result};
use crate::session::DrawingSession;

/// Pixel access over a device and its session state
pub struct PixelAccessor<'a, D: RenderDevice> {
    device: &'a mut D,
    session: &'a DrawingSession,
    clip: &'a ClipRegion<D>,
}

impl<'a, D: RenderDevice> PixelAccessor<'a, D> {
    pub fn new(device: &'a mut D, session: &'a DrawingSession, clip: &'a ClipRegion<D>) -> Self {
        Self { device, session, clip }
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<()> {
        let (width, height) = (self.device.width(), self.device.height());
        if x >= width || y >= height {
            return Err(Error::OutOfBounds { x, y, width, height });
        }
        Ok(())
    }

    /// Run `f` with the session suspended
    fn suspended<R>(&mut self, f: impl FnOnce(&mut D) -> R) -> R {
        self.session.suspend(&mut *self.device, self.clip);
        let result = f(&mut *self.device);
        self.session.resume(&mut *self.device, self.clip);
        result
    }

    /// Premultiplied color of one pixel
    pub fn get_pixel(&mut self, x: u32, y: u32) -> Result<Color> {
        self.check_bounds(x, y)?;
        let mut data = [0u8; 4];
        self.suspended(|device| device.copy_pixels(Some(PixelRect::new(x, y, 1, 1)), 4, &mut data))?;
        Ok(Color::rgba(data[0], data[1], data[2], data[3]))
    }

    /// Copy the whole buffer, row-major premultiplied RGBA with a stride of
    /// `width * 4`
    pub fn get_pixels(&mut self, out: &mut [u8]) -> Result<()> {
        let stride = self.device.width() as usize * 4;
        let required = stride * self.device.height() as usize;
        if out.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                actual: out.len(),
            });
        }
        self.suspended(|device| device.copy_pixels(None, stride, &mut out[..required]))?;
        Ok(())
    }

    /// Overwrite one pixel with `color` (straight alpha)
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color, painter_active: bool) -> Result<()> {
        if painter_active {
            return Err(Error::PainterActive);
        }
        self.check_bounds(x, y)?;
        let p = color.premultiplied();
        self.suspended(|device| device.write_pixels(PixelRect::new(x, y, 1, 1), &[p.r, p.g, p.b, p.a]))?;
        Ok(())
    }
}
