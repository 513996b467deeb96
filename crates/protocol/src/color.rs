//! Color values picked in the editor.
//!
//! Only the hex string is persisted. The RGBA and HSVA components are
//! derived for display.

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

/// Red, green, blue and alpha components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red, 0-255.
    pub r: u8,
    /// Green, 0-255.
    pub g: u8,
    /// Blue, 0-255.
    pub b: u8,
    /// Alpha, 0-1.
    pub a: f64,
}

/// Hue, saturation, value and alpha components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsva {
    /// Hue in degrees, 0-360.
    pub h: f64,
    /// Saturation, 0-100.
    pub s: f64,
    /// Value, 0-100.
    pub v: f64,
    /// Alpha, 0-1.
    pub a: f64,
}

/// A color with its hex form and derived components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Lower-case hex string with a leading `#`.
    pub hex: String,
    /// Derived RGBA components.
    pub rgba: Rgba,
    /// Derived HSVA components.
    pub hsva: Hsva,
}

impl Color {
    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidColor`] for any other input.
    ///
    /// # Examples
    ///
    /// ```
    /// use wawidget_protocol::Color;
    ///
    /// let color = Color::from_hex("#25D366").unwrap();
    /// assert_eq!(color.hex, "#25d366");
    /// assert_eq!((color.rgba.r, color.rgba.g, color.rgba.b), (37, 211, 102));
    ///
    /// let short = Color::from_hex("fff").unwrap();
    /// assert_eq!(short.hex, "#ffffff");
    /// ```
    pub fn from_hex(input: &str) -> Result<Self> {
        let digits = input.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ProtocolError::InvalidColor(input.to_string()));
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_string(),
            _ => return Err(ProtocolError::InvalidColor(input.to_string())),
        }
        .to_ascii_lowercase();

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|_| ProtocolError::InvalidColor(input.to_string()))
        };
        let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
        let a = if expanded.len() == 8 {
            round2(f64::from(channel(6)?) / 255.0)
        } else {
            1.0
        };

        let rgba = Rgba { r, g, b, a };
        Ok(Self {
            hex: format!("#{expanded}"),
            rgba,
            hsva: rgba_to_hsva(rgba),
        })
    }
}

fn rgba_to_hsva(rgba: Rgba) -> Hsva {
    let r = f64::from(rgba.r) / 255.0;
    let g = f64::from(rgba.g) / 255.0;
    let b = f64::from(rgba.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let s = if max == 0.0 { 0.0 } else { delta / max * 100.0 };

    Hsva {
        h: round2(h),
        s: round2(s),
        v: round2(max * 100.0),
        a: rgba.a,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
