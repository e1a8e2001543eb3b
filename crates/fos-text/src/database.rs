//! Font database backed text service

use std::path::Path;

use fontdb::{Database, Query, Stretch, Weight};

use crate::font::{FontConfig, FontHandle, FontMetrics, FontRequest};
use crate::matching::generic_fallbacks;
use crate::outline::PlacedOutline;
use crate::{OutlineBuilder, Result, TextError, TextService};

/// Text service over a fontdb database
pub struct SystemFonts {
    db: Database,
}

/// One shaped glyph, in font units
struct ShapedGlyph {
    glyph_id: u16,
    x_advance: f32,
    x_offset: f32,
    y_offset: f32,
}

impl SystemFonts {
    /// Create an empty font database
    pub fn new() -> Self {
        Self { db: Database::new() }
    }

    /// Create a font database with system fonts loaded
    pub fn with_system_fonts() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        Self { db }
    }

    /// Build the database described by `config`.
    ///
    /// Fails when the configured required family is not installed.
    pub fn from_config(config: &FontConfig) -> Result<Self> {
        let mut fonts = Self::new();
        if config.load_system_fonts {
            fonts.db.load_system_fonts();
        }
        for dir in &config.font_dirs {
            fonts.db.load_fonts_dir(dir);
        }
        if let Some(family) = &config.required_family {
            if fonts.installed_family(family).is_none() {
                return Err(TextError::FontNotFound(family.clone()));
            }
        }
        tracing::debug!("Loaded {} font faces", fonts.len());
        Ok(fonts)
    }

    /// Load a font from file
    pub fn load_font_file(&mut self, path: &Path) -> Result<()> {
        self.db.load_font_file(path).map_err(|source| TextError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load a font from memory
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
    }

    /// Number of loaded faces
    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.len() == 0
    }

    /// Canonical name of an installed family, matched case-insensitively
    pub fn installed_family(&self, name: &str) -> Option<String> {
        self.db.faces().find_map(|face| {
            face.families
                .iter()
                .find(|(family, _)| family.eq_ignore_ascii_case(name))
                .map(|(family, _)| family.clone())
        })
    }

    fn resolve_family(&self, request: &FontRequest) -> Result<String> {
        if let Some(family) = request
            .candidates()
            .iter()
            .find_map(|candidate| self.installed_family(candidate))
        {
            return Ok(family);
        }

        let generic_name = self.db.family_name(&request.generic.to_fontdb()).to_string();
        self.installed_family(&generic_name)
            .or_else(|| {
                generic_fallbacks(request.generic)
                    .iter()
                    .find_map(|family| self.installed_family(family))
            })
            .ok_or(TextError::FontNotFound(generic_name))
    }

    fn with_face<R>(&self, font: &FontHandle, f: impl FnOnce(&[u8], u32) -> Result<R>) -> Result<R> {
        self.db
            .with_face_data(font.id, f)
            .ok_or_else(|| TextError::FontNotFound(font.family().to_string()))?
    }
}

impl Default for SystemFonts {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_face(data: &[u8], index: u32) -> Result<ttf_parser::Face<'_>> {
    ttf_parser::Face::parse(data, index).map_err(|e| TextError::FontParsing(e.to_string()))
}

fn shape(data: &[u8], index: u32, text: &str) -> Result<Vec<ShapedGlyph>> {
    let face = rustybuzz::Face::from_slice(data, index)
        .ok_or_else(|| TextError::ShapingFailed("face not supported by shaper".to_string()))?;
    let mut buffer = rustybuzz::UnicodeBuffer::new();
    buffer.push_str(text);
    let output = rustybuzz::shape(&face, &[], buffer);

    Ok(output
        .glyph_infos()
        .iter()
        .zip(output.glyph_positions())
        .map(|(info, pos)| ShapedGlyph {
            glyph_id: info.glyph_id as u16,
            x_advance: pos.x_advance as f32,
            x_offset: pos.x_offset as f32,
            y_offset: pos.y_offset as f32,
        })
        .collect())
}

fn advance(data: &[u8], index: u32, text: &str) -> Result<f32> {
    Ok(shape(data, index, text)?.iter().map(|g| g.x_advance).sum())
}

impl TextService for SystemFonts {
    fn resolve(&mut self, request: &FontRequest) -> Result<FontHandle> {
        let family = self.resolve_family(request)?;
        let weight = request.weight.numeric();

        let id = self
            .db
            .query(&Query {
                families: &[fontdb::Family::Name(&family)],
                weight: Weight(weight),
                stretch: Stretch::Normal,
                style: request.style.into(),
            })
            .ok_or_else(|| TextError::FontNotFound(family.clone()))?;

        tracing::debug!("Resolved font {} ({}, {:?})", family, weight, request.style);
        Ok(FontHandle::new(id, family, request.size, weight, request.style))
    }

    fn metrics(&self, font: &FontHandle) -> Result<FontMetrics> {
        self.with_face(font, |data, index| {
            let face = parse_face(data, index)?;
            let units_per_em = face.units_per_em();
            let scale = font.size() / units_per_em as f32;
            Ok(FontMetrics {
                size: font.size(),
                ascent: face.ascender() as f32 * scale,
                descent: -(face.descender() as f32) * scale,
                leading: face.line_gap() as f32 * scale,
                units_per_em,
            })
        })
    }

    fn measure(&self, font: &FontHandle, text: &str, max_width: Option<f32>) -> Result<f32> {
        self.with_face(font, |data, index| {
            let scale = font.size() / parse_face(data, index)?.units_per_em() as f32;
            let Some(max_width) = max_width else {
                return Ok(advance(data, index, text)? * scale);
            };

            let space = advance(data, index, " ")? * scale;
            let mut widest = 0.0f32;
            let mut line = 0.0f32;
            for word in text.split_whitespace() {
                let width = advance(data, index, word)? * scale;
                if line == 0.0 {
                    line = width;
                } else if line + space + width > max_width {
                    widest = widest.max(line);
                    line = width;
                } else {
                    line += space + width;
                }
            }
            Ok(widest.max(line))
        })
    }

    fn outline(
        &self,
        font: &FontHandle,
        text: &str,
        origin: (f32, f32),
        sink: &mut dyn OutlineBuilder,
    ) -> Result<()> {
        self.with_face(font, |data, index| {
            let face = parse_face(data, index)?;
            let scale = font.size() / face.units_per_em() as f32;

            let mut pen_x = origin.0;
            for glyph in shape(data, index, text)? {
                let mut placed = PlacedOutline::new(
                    &mut *sink,
                    scale,
                    pen_x + glyph.x_offset * scale,
                    origin.1 - glyph.y_offset * scale,
                );
                face.outline_glyph(ttf_parser::GlyphId(glyph.glyph_id), &mut placed);
                pen_x += glyph.x_advance * scale;
            }
            Ok(())
        })
    }
}
