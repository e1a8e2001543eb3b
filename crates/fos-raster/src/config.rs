//! Raster paint device configuration (fos-raster.toml)

use std::fs;
use std::path::Path;

use fos_text::FontConfig;
use serde::Deserialize;

use crate::error::Result;

/// Encoded output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    #[serde(alias = "jpeg")]
    Jpg,
}

impl ImageFormat {
    /// Parse a format name, unknown names fall back to PNG
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => ImageFormat::Jpg,
            _ => ImageFormat::Png,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpg => "image/jpg",
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    /// Format used by `write`
    pub format: ImageFormat,
    /// Antialiasing when the painter does not say otherwise
    pub antialias: bool,
    /// Push draw tags to the device so frame errors name the failing operation
    pub trace_draw_tags: bool,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    pub fonts: FontConfig,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            antialias: true,
            trace_draw_tags: cfg!(debug_assertions),
            jpeg_quality: 90,
            fonts: FontConfig::default(),
        }
    }
}

impl RasterConfig {
    /// Parse from TOML text, missing fields take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = RasterConfig::from_toml_str("").unwrap();
        assert_eq!(config.format, ImageFormat::Png);
        assert!(config.antialias);
        assert_eq!(config.jpeg_quality, 90);
        assert!(config.fonts.load_system_fonts);
    }

    #[test]
    fn test_parse_full() {
        let config = RasterConfig::from_toml_str(
            r#"
            format = "jpeg"
            antialias = false
            trace_draw_tags = true
            jpeg_quality = 75

            [fonts]
            load_system_fonts = false
            required_family = "DejaVu Sans"
            "#,
        )
        .unwrap();
        assert_eq!(config.format, ImageFormat::Jpg);
        assert!(!config.antialias);
        assert!(config.trace_draw_tags);
        assert_eq!(config.jpeg_quality, 75);
        assert!(!config.fonts.load_system_fonts);
        assert_eq!(config.fonts.required_family.as_deref(), Some("DejaVu Sans"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(RasterConfig::from_toml_str("format = 3").is_err());
    }

    #[test]
    fn test_format_names() {
        assert_eq!(ImageFormat::from_name("JPG"), ImageFormat::Jpg);
        assert_eq!(ImageFormat::from_name("bmp"), ImageFormat::Png);
        assert_eq!(ImageFormat::Jpg.mime_type(), "image/jpg");
    }
}
