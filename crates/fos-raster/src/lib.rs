//! fOS Raster - Vector drawing into an in-memory pixel buffer
//!
//! Painter operations (paths, arcs, lines, images, text under a pen, brush,
//! transform and clip) are turned into renderer primitives and rasterised:
//! - Path to geometry conversion with arc decomposition
//! - Reference counted drawing sessions that pixel access can suspend
//! - A single clip layer slot
//! - Cached stroke and fill resources
//! - PNG/JPEG output
//!
//! ```no_run
//! use fos_raster::{Brush, Color, ImageFormat, Painter, PainterPath, RasterImage, Rect};
//!
//! # fn main() -> fos_raster::Result<()> {
//! let mut image = RasterImage::new(ImageFormat::Png, 20, 20)?;
//! {
//!     let mut painter = Painter::begin(&mut image)?;
//!     painter.set_brush(Brush::Solid(Color::RED));
//!     let mut path = PainterPath::new();
//!     path.add_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
//!     painter.draw_path(&path)?;
//! }
//! assert_eq!(image.get_pixel(5, 5)?, Color::RED);
//! # Ok(())
//! # }
//! ```

pub mod arc;
pub mod clip;
pub mod codec;
mod color;
pub mod config;
pub mod device;
mod error;
pub mod geometry;
pub mod painter;
mod path;
pub mod pixels;
mod raster;
pub mod session;
pub mod style;
pub mod text;
mod transform;

pub use color::Color;
pub use config::{ImageFormat, RasterConfig};
pub use error::{DeviceError, Error, FrameError, Result};
pub use painter::{ChangeFlags, PaintDevice, Painter, PainterState, RenderHints};
pub use path::{PainterPath, PathSegment, Point, Rect};
pub use raster::RasterImage;
pub use style::{Brush, Gradient, Pen, PenStyle};
pub use text::Alignment;
pub use transform::Transform;

pub use fos_text::{FontMetrics, FontRequest, FontStyle, FontWeight, GenericFamily};
