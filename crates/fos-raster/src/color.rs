//! Color (RGBA, straight alpha)

/// Color (RGBA)
///
/// Painter-facing colors carry straight alpha. Pixels read back from the
/// buffer are premultiplied and returned as-is in the same struct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create from hex string (e.g., "#ff0000")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();

        match hex.len() {
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Some(Color::rgb(r * 17, g * 17, b * 17))
            }
            6 => Some(Color::rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            8 => Some(Color::rgba(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Premultiply the color channels by alpha
    pub fn premultiplied(self) -> Self {
        let mul = |c: u8| ((c as u16 * self.a as u16 + 127) / 255) as u8;
        Self {
            r: mul(self.r),
            g: mul(self.g),
            b: mul(self.b),
            a: self.a,
        }
    }

    /// Whether the channels are valid premultiplied values
    pub fn is_premultiplied(self) -> bool {
        self.r <= self.a && self.g <= self.a && self.b <= self.a
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_constants() {
        assert_eq!(Color::WHITE.r, 255);
        assert_eq!(Color::BLACK.r, 0);
        assert_eq!(Color::TRANSPARENT.a, 0);
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#ff0000"), Some(Color::RED));
        assert_eq!(Color::from_hex("00ff00"), Some(Color::GREEN));
        assert_eq!(Color::from_hex("#f00"), Some(Color::RED));
        assert_eq!(Color::from_hex("#0000ff80"), Some(Color::rgba(0, 0, 255, 128)));
        assert_eq!(Color::from_hex("#zz0000"), None);
    }

    #[test]
    fn test_premultiply() {
        assert_eq!(Color::RED.premultiplied(), Color::RED);
        assert_eq!(Color::rgba(255, 100, 0, 0).premultiplied(), Color::TRANSPARENT);
        assert_eq!(Color::rgba(255, 0, 0, 128).premultiplied(), Color::rgba(128, 0, 0, 128));
        assert!(!Color::rgba(200, 0, 0, 100).is_premultiplied());
    }
}
