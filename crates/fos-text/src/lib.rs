//! fOS Text - Font services for the raster backend
//!
//! This crate provides the text capability the paint device consumes:
//! - Font loading and matching (fontdb)
//! - Family fallback chains and generic families
//! - Font metrics scaled to pixels
//! - Text shaping and measurement (rustybuzz)
//! - Glyph outlines (ttf-parser)
//!
//! The raster core only ever sees [`FontHandle`] and [`FontMetrics`]; how a
//! family is found or a string is shaped stays behind [`TextService`].

pub mod font;
mod database;
mod matching;
mod outline;

pub use database::SystemFonts;
pub use font::{FontConfig, FontHandle, FontMetrics, FontRequest, FontStyle, FontWeight, GenericFamily};
pub use matching::{generic_fallbacks, split_families};
pub use ttf_parser::OutlineBuilder;

/// Text service error types
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("Could not locate font {0}")]
    FontNotFound(String),

    #[error("Failed to parse font: {0}")]
    FontParsing(String),

    #[error("Shaping failed: {0}")]
    ShapingFailed(String),

    #[error("Failed to load font file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, TextError>;

/// Opaque text capability used by the paint device.
///
/// Implementations resolve abstract font attributes into a handle, report
/// pixel metrics for it and turn strings into measured widths or outlines.
pub trait TextService {
    /// Resolve a font request into a handle.
    fn resolve(&mut self, request: &FontRequest) -> Result<FontHandle>;

    /// Pixel metrics of a resolved font.
    fn metrics(&self, font: &FontHandle) -> Result<FontMetrics>;

    /// Advance width of `text`. With `max_width` the text is word wrapped and
    /// the width of the widest line is returned.
    fn measure(&self, font: &FontHandle, text: &str, max_width: Option<f32>) -> Result<f32>;

    /// Emit glyph outlines for `text` with its baseline starting at `origin`,
    /// in pixel coordinates with the y axis pointing down.
    fn outline(
        &self,
        font: &FontHandle,
        text: &str,
        origin: (f32, f32),
        sink: &mut dyn OutlineBuilder,
    ) -> Result<()>;
}
