//! Colour parsing and HSL shifting for stored paint values.

use std::fmt;
use std::str::FromStr;

use palette::{Hsl, IntoColor, Srgb};

use crate::error::{Result, SwatchError};

use super::state::HslShift;

/// An RGBA colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a CSS colour in one of the forms icons are exported with.
    ///
    /// Supports `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()` and `rgba()`.
    /// Named colours are not resolved.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::from_hex(hex);
        }

        let lower = s.to_ascii_lowercase();
        let args = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'));
        match args {
            Some(args) => Self::from_functional(args),
            None => Err(parse_error(s)),
        }
    }

    fn from_hex(hex: &str) -> Result<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(parse_error(hex));
        }
        let nibble = |i: usize| parse_hex(&hex[i..i + 1]).map(|d| d << 4 | d);
        let byte = |i: usize| parse_hex(&hex[i..i + 2]);

        match hex.len() {
            3 => Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            4 => Ok(Self::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(SwatchError::Parse {
                message: format!("Invalid hex colour: #{}", hex),
                help: Some("Use #RGB, #RGBA, #RRGGBB, or #RRGGBBAA format".to_string()),
            }),
        }
    }

    /// `r, g, b[, a]` or `r g b [/ a]`.
    fn from_functional(args: &str) -> Result<Self> {
        let parts: Vec<&str> = args
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();

        let channel = |p: &str| -> Result<u8> {
            let value = match p.strip_suffix('%') {
                Some(pct) => pct.parse::<f32>().map(|v| v / 100.0 * 255.0),
                None => p.parse::<f32>(),
            }
            .map_err(|_| parse_error(p))?;
            Ok(value.clamp(0.0, 255.0).round() as u8)
        };
        let alpha = |p: &str| -> Result<u8> {
            let value = match p.strip_suffix('%') {
                Some(pct) => pct.parse::<f32>().map(|v| v / 100.0),
                None => p.parse::<f32>(),
            }
            .map_err(|_| parse_error(p))?;
            Ok((value.clamp(0.0, 1.0) * 255.0).round() as u8)
        };

        match parts.as_slice() {
            [r, g, b] => Ok(Self::rgb(channel(r)?, channel(g)?, channel(b)?)),
            [r, g, b, a] => Ok(Self::new(channel(r)?, channel(g)?, channel(b)?, alpha(a)?)),
            _ => Err(parse_error(args)),
        }
    }

    /// Apply a hue/saturation/lightness shift in HSL space. Alpha is kept.
    pub fn shifted(self, shift: &HslShift) -> Self {
        let rgb: Srgb<f32> = Srgb::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        );
        let mut hsl: Hsl = rgb.into_color();

        hsl.hue += shift.hue;
        hsl.saturation = (hsl.saturation + shift.saturation / 100.0).clamp(0.0, 1.0);
        hsl.lightness = (hsl.lightness + shift.lightness / 100.0).clamp(0.0, 1.0);

        let out: Srgb<f32> = hsl.into_color();
        Colour::new(to_byte(out.red), to_byte(out.green), to_byte(out.blue), self.a)
    }
}

impl FromStr for Colour {
    type Err = SwatchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Shift a stored colour string.
///
/// A zero shift and unparseable input (named colours, `currentColor`)
/// both return the input unchanged.
pub fn apply_hsl_shift(color: &str, shift: &HslShift) -> String {
    if shift.is_zero() {
        return color.to_string();
    }
    match Colour::parse(color) {
        Ok(colour) => colour.shifted(shift).to_string(),
        Err(_) => color.to_string(),
    }
}

fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_hex(s: &str) -> Result<u8> {
    u8::from_str_radix(s, 16).map_err(|_| parse_error(s))
}

fn parse_error(s: &str) -> SwatchError {
    SwatchError::Parse {
        message: format!("Invalid colour: {}", s),
        help: None,
    }
}
