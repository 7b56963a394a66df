//! RGB colors and CSS formatting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Simple RGB color. Deserializes from `{"r", "g", "b"}` or a hex string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RgbRepr")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }

    /// Neutral gray used for regions without data.
    pub const NO_DATA: Rgb = Rgb::new(204, 204, 204);

    /// `0xRRGGBB` literal, for palettes written as hex.
    pub const fn from_u32(hex: u32) -> Self {
        Self::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Parse `#rgb` or `#rrggbb` (leading `#` optional).
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.trim().trim_start_matches('#');
        let digits = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => hex.to_string(),
            _ => return None,
        };
        u32::from_str_radix(&digits, 16).ok().map(Self::from_u32)
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(self) -> String { format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b) }

    /// Relative luminance in [0, 1] (sRGB weights, no gamma correction).
    #[cfg(test)]
    pub(crate) fn luminance(self) -> f64 {
        (0.2126 * self.r as f64 + 0.7152 * self.g as f64 + 0.0722 * self.b as f64) / 255.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RgbRepr {
    Hex(String),
    Channels { r: u8, g: u8, b: u8 },
}

impl TryFrom<RgbRepr> for Rgb {
    type Error = String;

    fn try_from(repr: RgbRepr) -> Result<Self, Self::Error> {
        match repr {
            RgbRepr::Hex(text) => Rgb::from_hex(&text).ok_or_else(|| format!("invalid hex color {text:?}")),
            RgbRepr::Channels { r, g, b } => Ok(Rgb::new(r, g, b)),
        }
    }
}

impl fmt::Display for Rgb {
    /// Format as CSS: rgb(r,g,b)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing_and_formatting() {
        assert_eq!(Rgb::from_hex("#fff5f0"), Some(Rgb::new(0xff, 0xf5, 0xf0)));
        assert_eq!(Rgb::from_hex("ccc"), Some(Rgb::NO_DATA));
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
        assert_eq!(Rgb::from_u32(0x67001f).to_hex(), "#67001f");
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "rgb(1,2,3)");
    }

    #[test]
    fn deserializes_from_hex_or_channels() {
        assert_eq!(serde_json::from_str::<Rgb>(r##""#67001f""##).unwrap(), Rgb::from_u32(0x67001f));
        assert_eq!(serde_json::from_str::<Rgb>(r#"{"r": 1, "g": 2, "b": 3}"#).unwrap(), Rgb::new(1, 2, 3));
        assert!(serde_json::from_str::<Rgb>(r#""nope""#).is_err());
    }
}
