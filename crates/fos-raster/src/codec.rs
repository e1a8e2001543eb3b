//! Image codec glue
//!
//! Decodes files and `data:` URIs into premultiplied RGBA and encodes the
//! pixel buffer as PNG or JPEG.

use std::io::Write;
use std::path::Path;

use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::color::Color;
use crate::config::ImageFormat;
use crate::error::{Error, Result};

const DATA_URI_PREFIX: &str = "data:";

/// Decoded image, rows of premultiplied RGBA
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Payload of a `data:` URI (RFC 2397)
#[derive(Debug, Clone, PartialEq)]
pub struct DataUri {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl DataUri {
    pub fn is_data_uri(uri: &str) -> bool {
        uri.get(..DATA_URI_PREFIX.len())
            .is_some_and(|p| p.eq_ignore_ascii_case(DATA_URI_PREFIX))
    }

    pub fn parse(uri: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::ImageDecode {
            uri: abbreviate(uri),
            reason: reason.to_string(),
        };
        if !Self::is_data_uri(uri) {
            return Err(invalid("not a data URI"));
        }
        let rest = &uri[DATA_URI_PREFIX.len()..];
        let (metadata, payload) = rest.split_once(',').ok_or_else(|| invalid("missing comma"))?;

        let mut params = metadata.split(';');
        let mime_type = match params.next().map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => "text/plain".to_string(),
        };
        let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

        let data = if is_base64 {
            let cleaned: Vec<u8> = payload.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
            base64::engine::general_purpose::STANDARD
                .decode(cleaned)
                .map_err(|e| invalid(&format!("invalid base64: {e}")))?
        } else {
            percent_decode(payload).ok_or_else(|| invalid("invalid percent escape"))?
        };

        Ok(Self { mime_type, data })
    }
}

fn percent_decode(input: &str) -> Option<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Some(out)
}

/// Keep error messages readable for large inline images
fn abbreviate(uri: &str) -> String {
    const MAX: usize = 64;
    match uri.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &uri[..cut]),
        None => uri.to_string(),
    }
}

/// Load an image from a file path or a `data:` URI
pub fn load(uri: &str) -> Result<DecodedImage> {
    let decoded = if DataUri::is_data_uri(uri) {
        let data = DataUri::parse(uri)?;
        image::load_from_memory(&data.data)
    } else {
        let path = Path::new(uri);
        if !path.exists() {
            return Err(Error::ImageNotFound(uri.to_string()));
        }
        image::open(path)
    };

    let rgba = decoded
        .map_err(|e| Error::ImageDecode {
            uri: abbreviate(uri),
            reason: e.to_string(),
        })?
        .to_rgba8();
    tracing::debug!(width = rgba.width(), height = rgba.height(), "decoded image");
    Ok(premultiply(rgba))
}

fn premultiply(image: RgbaImage) -> DecodedImage {
    let (width, height) = image.dimensions();
    let mut data = image.into_raw();
    for pixel in data.chunks_exact_mut(4) {
        let c = Color::rgba(pixel[0], pixel[1], pixel[2], pixel[3]).premultiplied();
        pixel.copy_from_slice(&[c.r, c.g, c.b, c.a]);
    }
    DecodedImage { width, height, data }
}

/// Undo alpha premultiplication of RGBA rows
pub fn demultiply(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    for pixel in out.chunks_exact_mut(4) {
        let a = pixel[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut pixel[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

/// Encode premultiplied RGBA rows into `sink`
pub fn encode(
    format: ImageFormat,
    width: u32,
    height: u32,
    premultiplied: &[u8],
    jpeg_quality: u8,
    sink: &mut dyn Write,
) -> Result<()> {
    let straight = demultiply(premultiplied);
    let mut buffer = Vec::new();
    let result = match format {
        ImageFormat::Png => PngEncoder::new(&mut buffer).write_image(&straight, width, height, ExtendedColorType::Rgba8),
        ImageFormat::Jpg => {
            let rgb: Vec<u8> = straight.chunks_exact(4).flat_map(|p| [p[0], p[1], p[2]]).collect();
            JpegEncoder::new_with_quality(&mut buffer, jpeg_quality.clamp(1, 100)).write_image(
                &rgb,
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
    };
    result.map_err(|e| Error::ImageEncode(e.to_string()))?;
    sink.write_all(&buffer)?;
    Ok(())
}
