use image::Rgba;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ColorSpec {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSpec {
    /// Fallback used whenever a colour string cannot be parsed.
    pub const DEFAULT: ColorSpec = ColorSpec { r: 0, g: 255, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse six hex digits with an optional leading `#`, case-insensitive.
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// Like [`ColorSpec::parse_hex`] but never fails: malformed input yields
    /// [`ColorSpec::DEFAULT`].
    pub fn from_hex_or_default(hex: &str) -> Self {
        Self::parse_hex(hex).unwrap_or_else(|| {
            warn!(color = hex, "malformed colour string, using default");
            Self::DEFAULT
        })
    }

    pub fn to_rgba(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, alpha])
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// `floor(255 * opacity)`, with opacity clamped to `[0, 1]` (NaN maps to 0).
pub fn alpha_from_opacity(opacity: f32) -> u8 {
    if opacity.is_nan() {
        return 0;
    }
    (255.0 * opacity.clamp(0.0, 1.0)).floor() as u8
}
