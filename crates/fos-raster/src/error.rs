//! Error types

use crate::device::DrawTags;

/// Paint device error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Paint device has no pixels ({width}x{height})")]
    EmptyDevice { width: u32, height: u32 },

    #[error("Paint device used before init()")]
    NotInitialized,

    #[error("Cannot write pixels while a painter is active")]
    PainterActive,

    #[error("Pixel ({x}, {y}) is outside the {width}x{height} buffer")]
    OutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    #[error("Buffer of {actual} bytes is too small, {required} required")]
    BufferTooSmall { required: usize, actual: usize },

    #[error("No font available for text drawing")]
    NoFont,

    #[error("Image not found: {0}")]
    ImageNotFound(String),

    #[error("Failed to decode image {uri}: {reason}")]
    ImageDecode { uri: String, reason: String },

    #[error("Failed to encode image: {0}")]
    ImageEncode(String),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Text error: {0}")]
    Text(#[from] fos_text::TextError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned synchronously by a rendering device
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeviceError {
    #[error("Invalid device size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Operation not allowed in the current frame state: {0}")]
    WrongState(&'static str),

    #[error("Region does not fit the pixel buffer")]
    OutOfBounds,

    #[error("Pixel data is {actual} bytes, {expected} expected")]
    DataLength { expected: usize, actual: usize },

    #[error("Pixel data is not premultiplied")]
    NotPremultiplied,

    #[error("Geometry could not be built")]
    InvalidGeometry,

    #[error("Gradient could not be created")]
    InvalidGradient,

    #[error("Invalid stroke style: {0}")]
    InvalidStrokeStyle(String),
}

/// Failure reported when a frame ends, with the diagnostic tags that were
/// active when it happened
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} ({tags})")]
pub struct FrameError {
    pub message: String,
    pub tags: DrawTags,
}

impl FrameError {
    pub fn new(message: impl Into<String>, tags: DrawTags) -> Self {
        Self {
            message: message.into(),
            tags,
        }
    }
}
