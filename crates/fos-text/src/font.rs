//! Font request, handle and metrics types

use std::path::PathBuf;

use serde::Deserialize;

use crate::matching::split_families;

/// Generic family used when none of the specific families is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenericFamily {
    #[default]
    Default,
    Serif,
    SansSerif,
    Monospace,
    Cursive,
    Fantasy,
}

impl GenericFamily {
    pub(crate) fn to_fontdb(self) -> fontdb::Family<'static> {
        match self {
            GenericFamily::Default | GenericFamily::Serif => fontdb::Family::Serif,
            GenericFamily::SansSerif => fontdb::Family::SansSerif,
            GenericFamily::Monospace => fontdb::Family::Monospace,
            GenericFamily::Cursive => fontdb::Family::Cursive,
            GenericFamily::Fantasy => fontdb::Family::Fantasy,
        }
    }
}

/// Font weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    Lighter,
    #[default]
    Normal,
    Bold,
    Bolder,
    /// Numeric weight (100-900)
    Value(u16),
}

impl FontWeight {
    /// Numeric weight on the 100-900 scale
    pub fn numeric(self) -> u16 {
        match self {
            FontWeight::Lighter => 300,
            FontWeight::Normal => 400,
            FontWeight::Bold => 700,
            FontWeight::Bolder => 800,
            FontWeight::Value(v) => v.clamp(100, 900),
        }
    }
}

/// Font style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl From<FontStyle> for fontdb::Style {
    fn from(style: FontStyle) -> Self {
        match style {
            FontStyle::Normal => fontdb::Style::Normal,
            FontStyle::Italic => fontdb::Style::Italic,
            FontStyle::Oblique => fontdb::Style::Oblique,
        }
    }
}

/// Abstract font attributes as set on a painter
#[derive(Debug, Clone, PartialEq)]
pub struct FontRequest {
    /// Comma separated list of specific families, tried in order
    pub families: String,
    /// Fallback when no specific family is installed
    pub generic: GenericFamily,
    pub weight: FontWeight,
    pub style: FontStyle,
    /// Size in pixels
    pub size: f32,
}

impl FontRequest {
    pub const DEFAULT_SIZE: f32 = 12.0;

    /// Create a request for the default family at `size` pixels
    pub fn new(size: f32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Set the specific families
    pub fn families(mut self, families: impl Into<String>) -> Self {
        self.families = families.into();
        self
    }

    /// Set the generic family
    pub fn generic(mut self, generic: GenericFamily) -> Self {
        self.generic = generic;
        self
    }

    /// Set font weight
    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Set font style
    pub fn style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    /// Specific family names in the order they should be tried
    pub fn candidates(&self) -> Vec<String> {
        split_families(&self.families)
    }
}

impl Default for FontRequest {
    fn default() -> Self {
        Self {
            families: String::new(),
            generic: GenericFamily::Default,
            weight: FontWeight::Normal,
            style: FontStyle::Normal,
            size: Self::DEFAULT_SIZE,
        }
    }
}

/// A resolved font
#[derive(Debug, Clone, PartialEq)]
pub struct FontHandle {
    pub(crate) id: fontdb::ID,
    family: String,
    size: f32,
    weight: u16,
    style: FontStyle,
}

impl FontHandle {
    pub(crate) fn new(id: fontdb::ID, family: String, size: f32, weight: u16, style: FontStyle) -> Self {
        Self {
            id,
            family,
            size,
            weight,
            style,
        }
    }

    /// Family name the request resolved to
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Size in pixels
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn weight(&self) -> u16 {
        self.weight
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }
}

/// Font metrics in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FontMetrics {
    pub size: f32,
    /// Distance from baseline to the top of the em box
    pub ascent: f32,
    /// Distance from baseline to the bottom of the em box (positive)
    pub descent: f32,
    /// Line gap
    pub leading: f32,
    pub units_per_em: u16,
}

impl FontMetrics {
    /// Recommended distance between consecutive baselines
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent + self.leading
    }
}

/// Font loading configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Load the fonts installed on the system
    pub load_system_fonts: bool,
    /// Extra directories scanned for font files
    pub font_dirs: Vec<PathBuf>,
    /// Family that must be present, construction fails otherwise
    pub required_family: Option<String>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            load_system_fonts: true,
            font_dirs: Vec::new(),
            required_family: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_mapping() {
        assert_eq!(FontWeight::Lighter.numeric(), 300);
        assert_eq!(FontWeight::Normal.numeric(), 400);
        assert_eq!(FontWeight::Bold.numeric(), 700);
        assert_eq!(FontWeight::Bolder.numeric(), 800);
        assert_eq!(FontWeight::Value(50).numeric(), 100);
        assert_eq!(FontWeight::Value(650).numeric(), 650);
    }

    #[test]
    fn test_request_candidates() {
        let request = FontRequest::new(16.0).families("\"Fira Sans\", 'Noto Sans' ,Arial");
        assert_eq!(request.candidates(), vec!["Fira Sans", "Noto Sans", "Arial"]);
        assert_eq!(request.size, 16.0);
    }

    #[test]
    fn test_metrics_line_height() {
        let metrics = FontMetrics {
            size: 10.0,
            ascent: 8.0,
            descent: 2.0,
            leading: 1.0,
            units_per_em: 1000,
        };
        assert_eq!(metrics.line_height(), 11.0);
    }
}
