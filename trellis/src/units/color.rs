//! Color values and conversions.
//!
//! Colors are stored as RGB channels in `0..=255` with alpha in `0..=1`.
//! Every constructor validates its input; an out-of-range channel is the one
//! hard failure of node construction.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// A validated RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Hue in degrees, saturation and lightness in percent, alpha in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

/// An authored color: `[r, g, b, a]`, `"#rrggbb"` style hex, or `"hsl(...)"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Rgba([f32; 4]),
    Text(String),
}

impl From<[f32; 4]> for ColorSpec {
    fn from(channels: [f32; 4]) -> Self {
        ColorSpec::Rgba(channels)
    }
}

impl From<&str> for ColorSpec {
    fn from(text: &str) -> Self {
        ColorSpec::Text(text.to_string())
    }
}

/// Resolve an authored color, validating every channel.
pub fn resolve_color(spec: &ColorSpec) -> Result<Color> {
    match spec {
        ColorSpec::Rgba([r, g, b, a]) => Color::rgba(*r, *g, *b, *a),
        ColorSpec::Text(text) => {
            let text = text.trim();
            if text.starts_with('#') {
                Color::from_hex(text)
            } else if text.starts_with("hsl") {
                let [h, s, l, a] = parse_hsl_function(text)?;
                Color::from_hsla(h, s, l, a)
            } else {
                Err(LayoutError::InvalidColorFormat(text.to_string()))
            }
        }
    }
}

fn check(channel: &'static str, value: f32, max: f32) -> Result<f32> {
    if (0.0..=max).contains(&value) {
        Ok(value)
    } else {
        Err(LayoutError::InvalidColor {
            channel,
            value,
            min: 0.0,
            max,
        })
    }
}

impl Color {
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Self = Self {
        r: 255.0,
        g: 255.0,
        b: 255.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Create a color, rejecting channels outside `0..=255` or alpha outside `0..=1`.
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Result<Self> {
        Ok(Self {
            r: check("red", r, 255.0)?,
            g: check("green", g, 255.0)?,
            b: check("blue", b, 255.0)?,
            a: check("alpha", a, 1.0)?,
        })
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || LayoutError::InvalidColorFormat(format!("{hex:?} is not #RGB, #RGBA, #RRGGBB or #RRGGBBAA"));
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let expanded: String = match digits.len() {
            3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_string(),
            _ => return Err(invalid()),
        };
        let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if expanded.len() == 8 {
            byte(6)? as f32 / 255.0
        } else {
            1.0
        };
        Self::rgba(byte(0)? as f32, byte(2)? as f32, byte(4)? as f32, alpha)
    }

    /// Convert from hue (degrees), saturation and lightness (percent).
    pub fn from_hsla(h: f32, s: f32, l: f32, a: f32) -> Result<Self> {
        let h = h / 360.0;
        let s = s / 100.0;
        let l = l / 100.0;

        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_to_rgb(p, q, h + 1.0 / 3.0),
                hue_to_rgb(p, q, h),
                hue_to_rgb(p, q, h - 1.0 / 3.0),
            )
        };

        Self::rgba(
            (r * 255.0).round(),
            (g * 255.0).round(),
            (b * 255.0).round(),
            a,
        )
    }

    /// Format as `#rrggbb`, appending an alpha byte only when translucent.
    pub fn to_hex(&self) -> String {
        let mut hex = format!(
            "#{:02x}{:02x}{:02x}",
            self.r.round() as u8,
            self.g.round() as u8,
            self.b.round() as u8
        );
        if self.a < 1.0 {
            hex.push_str(&format!("{:02x}", (self.a * 255.0).round() as u8));
        }
        hex
    }

    pub fn to_hsla(&self) -> Hsla {
        let r = self.r / 255.0;
        let g = self.g / 255.0;
        let b = self.b / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let (mut h, mut s) = (0.0, 0.0);

        if max != min {
            let d = max - min;
            s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
            h = if max == r {
                (g - b) / d + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / d + 2.0
            } else {
                (r - g) / d + 4.0
            };
            h /= 6.0;
        }

        Hsla {
            h: h * 360.0,
            s: s * 100.0,
            l: l * 100.0,
            a: self.a,
        }
    }

    /// Channels normalized to `0..=1`, as most rasterizers expect.
    pub fn to_unit_rgba(&self) -> [f32; 4] {
        [self.r / 255.0, self.g / 255.0, self.b / 255.0, self.a]
    }
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

/// Parse `hsl(h, s%, l%)` or `hsla(h, s%, l%, a)`.
fn parse_hsl_function(text: &str) -> Result<[f32; 4]> {
    let invalid = || LayoutError::InvalidColorFormat(text.to_string());
    let body = text
        .strip_prefix("hsla(")
        .or_else(|| text.strip_prefix("hsl("))
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(invalid)?;

    let parts: Vec<f32> = body
        .split(|c: char| c == ',' || c.is_whitespace() || c == '/')
        .filter(|part| !part.is_empty())
        .map(|part| part.trim_end_matches('%').trim_end_matches("deg").parse::<f32>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| invalid())?;

    match parts.as_slice() {
        [h, s, l] => Ok([*h, *s, *l, 1.0]),
        [h, s, l, a] => Ok([*h, *s, *l, *a]),
        _ => Err(invalid()),
    }
}
