//! Length parsing: plain numbers, `px`, `%`, `vw` and `vh`.

use serde::{Deserialize, Serialize};

use crate::primitives::Size;

/// An authored length: a bare number of pixels or a string with a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LengthSpec {
    Px(f32),
    Unit(String),
}

impl From<f32> for LengthSpec {
    fn from(px: f32) -> Self {
        LengthSpec::Px(px)
    }
}

impl From<&str> for LengthSpec {
    fn from(text: &str) -> Self {
        LengthSpec::Unit(text.to_string())
    }
}

/// Resolve a length to pixels.
///
/// Percentages need `relative_to`, viewport units need `viewport`; when the
/// context is missing the length resolves to 0. Unknown units fall back to
/// the numeric prefix. Both cases are logged, never fatal.
pub fn resolve_length(spec: &LengthSpec, relative_to: Option<f32>, viewport: Option<Size>) -> f32 {
    let text = match spec {
        LengthSpec::Px(px) => return *px,
        LengthSpec::Unit(text) => text.trim(),
    };

    let (value, unit) = split_number(text);
    let Some(value) = value else {
        tracing::warn!("length {:?} has no numeric value, using 0", text);
        return 0.0;
    };

    match unit {
        "" | "px" => value,
        "%" => match relative_to {
            Some(base) => value / 100.0 * base,
            None => {
                tracing::warn!("percentage length {:?} has no relative value, using 0", text);
                0.0
            }
        },
        "vh" | "vw" => match viewport {
            Some(viewport) => {
                let base = if unit == "vh" { viewport.height } else { viewport.width };
                value / 100.0 * base
            }
            None => {
                tracing::warn!("viewport length {:?} used without a viewport, using 0", text);
                0.0
            }
        },
        other => {
            tracing::warn!("unknown unit {:?} in {:?}, reading it as pixels", other, text);
            value
        }
    }
}

/// Split `"12.5px"` into `(Some(12.5), "px")`.
fn split_number(text: &str) -> (Option<f32>, &str) {
    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(end);
    (number.parse::<f32>().ok(), unit.trim())
}
