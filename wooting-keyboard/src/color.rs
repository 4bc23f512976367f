//! RGB colour type and the 5-6-5 wire encoding

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::KeyboardError;

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB colour
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create colour from HSV values
    pub fn from_hsv(h: f32, s: f32, v: f32) -> Self {
        let h = h.rem_euclid(360.0);
        let s = s.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        let c = v * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match (h / 60.0) as i32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self {
            r: ((r + m) * 255.0) as u8,
            g: ((g + m) * 255.0) as u8,
            b: ((b + m) * 255.0) as u8,
        }
    }

    /// Reduced-depth 16-bit form, see [`encode_rgb`]
    pub fn to_565(self) -> u16 {
        encode_rgb(self)
    }

    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };
    pub const RED: Self = Self { r: 255, g: 0, b: 0 };
    pub const GREEN: Self = Self { r: 0, g: 255, b: 0 };
    pub const BLUE: Self = Self { r: 0, g: 0, b: 255 };
}

/// Encode to 5-6-5: top 5 bits of red, top 6 of green, top 5 of blue
pub fn encode_rgb(rgb: Rgb) -> u16 {
    ((rgb.r as u16 & 0xF8) << 8) | ((rgb.g as u16 & 0xFC) << 3) | ((rgb.b as u16 & 0xF8) >> 3)
}

/// Decode a 5-6-5 value; the low bits of each component come back as zero
pub fn decode_rgb(colour: u16) -> Rgb {
    Rgb {
        r: ((colour >> 8) & 0xF8) as u8,
        g: ((colour >> 3) & 0xFC) as u8,
        b: ((colour << 3) & 0xF8) as u8,
    }
}

/// Parse `#RRGGBB` or `RRGGBB`, case-insensitive
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, KeyboardError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(KeyboardError::InvalidHexColour(hex.to_string()));
    }

    let component = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| KeyboardError::InvalidHexColour(hex.to_string()))
    };
    Ok(Rgb {
        r: component(0)?,
        g: component(2)?,
        b: component(4)?,
    })
}

impl FromStr for Rgb {
    type Err = KeyboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_to_rgb(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// Colours appear in config files as hex strings
impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        hex_to_rgb(&s).map_err(serde::de::Error::custom)
    }
}
