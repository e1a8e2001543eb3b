//! Font service integration tests
//!
//! Tests that need installed fonts return early on hosts without any.

use fos_text::{
    FontConfig, FontRequest, GenericFamily, OutlineBuilder, SystemFonts, TextError, TextService,
};

#[derive(Default)]
struct Bounds {
    commands: usize,
    min_y: f32,
    max_y: f32,
}

impl Bounds {
    fn point(&mut self, y: f32) {
        if self.commands == 0 {
            self.min_y = y;
            self.max_y = y;
        }
        self.commands += 1;
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }
}

impl OutlineBuilder for Bounds {
    fn move_to(&mut self, _x: f32, y: f32) {
        self.point(y);
    }
    fn line_to(&mut self, _x: f32, y: f32) {
        self.point(y);
    }
    fn quad_to(&mut self, _x1: f32, _y1: f32, _x: f32, y: f32) {
        self.point(y);
    }
    fn curve_to(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32, _x: f32, y: f32) {
        self.point(y);
    }
    fn close(&mut self) {}
}

fn system_fonts() -> Option<SystemFonts> {
    let fonts = SystemFonts::from_config(&FontConfig::default()).ok()?;
    (!fonts.is_empty()).then_some(fonts)
}

// ============================================================================
// RESOLUTION
// ============================================================================

#[test]
fn test_unknown_family_falls_back_to_generic() {
    let Some(mut fonts) = system_fonts() else {
        return;
    };
    let request = FontRequest::new(16.0)
        .families("'No Such Family', \"Another Missing One\"")
        .generic(GenericFamily::SansSerif);
    let Ok(font) = fonts.resolve(&request) else {
        return;
    };
    assert_ne!(font.family(), "No Such Family");
    assert_eq!(font.size(), 16.0);
}

#[test]
fn test_no_system_fonts_means_no_font() {
    let config = FontConfig {
        load_system_fonts: false,
        ..FontConfig::default()
    };
    let mut fonts = SystemFonts::from_config(&config).unwrap();
    assert!(fonts.is_empty());
    assert!(matches!(
        fonts.resolve(&FontRequest::default()),
        Err(TextError::FontNotFound(_))
    ));
}

// ============================================================================
// MEASUREMENT
// ============================================================================

#[test]
fn test_wrapped_width_never_exceeds_unwrapped() {
    let Some(mut fonts) = system_fonts() else {
        return;
    };
    let Ok(font) = fonts.resolve(&FontRequest::new(14.0)) else {
        return;
    };
    let text = "the quick brown fox jumps over the lazy dog";
    let full = fonts.measure(&font, text, None).unwrap();
    let wrapped = fonts.measure(&font, text, Some(full / 3.0)).unwrap();
    assert!(wrapped > 0.0);
    assert!(wrapped < full);
}

#[test]
fn test_empty_text_has_no_width() {
    let Some(mut fonts) = system_fonts() else {
        return;
    };
    let Ok(font) = fonts.resolve(&FontRequest::new(14.0)) else {
        return;
    };
    assert_eq!(fonts.measure(&font, "", None).unwrap(), 0.0);
}

// ============================================================================
// OUTLINES
// ============================================================================

#[test]
fn test_outline_sits_above_baseline() {
    let Some(mut fonts) = system_fonts() else {
        return;
    };
    let Ok(font) = fonts.resolve(&FontRequest::new(32.0)) else {
        return;
    };
    let mut bounds = Bounds::default();
    fonts.outline(&font, "H", (10.0, 50.0), &mut bounds).unwrap();

    assert!(bounds.commands > 0);
    // Capital letters rise from the baseline toward smaller y
    assert!(bounds.min_y < 50.0);
    assert!(bounds.max_y <= 50.5);
}
