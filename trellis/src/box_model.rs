//! Box model geometry.
//!
//! Spacing shorthands resolve the way CSS `margin`/`padding` do:
//!
//! ```text
//! 5              -> all sides 5
//! [1, 2]         -> top/bottom 1, left/right 2
//! [1, 2, 3]      -> top 1, left/right 2, bottom 3
//! [1, 2, 3, 4]   -> top, right, bottom, left
//! ```
//!
//! A box occupies `content + padding + 2 * border + margin` on each axis.
//! The border stroke is centered on the border edge, so the content origin
//! sits half a border width inside it.

use serde::{Deserialize, Serialize};

use crate::primitives::{Point, Size};

/// Authored spacing: a scalar or a 1-4 value shorthand.
///
/// Shorthand slots may be `null` in JSON; they resolve to 0 with a warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoxSpacing {
    Uniform(f32),
    Shorthand(Vec<Option<f32>>),
}

impl Default for BoxSpacing {
    fn default() -> Self {
        BoxSpacing::Uniform(0.0)
    }
}

impl From<f32> for BoxSpacing {
    fn from(value: f32) -> Self {
        BoxSpacing::Uniform(value)
    }
}

impl<const N: usize> From<[f32; N]> for BoxSpacing {
    fn from(values: [f32; N]) -> Self {
        BoxSpacing::Shorthand(values.into_iter().map(Some).collect())
    }
}

/// Resolved per-side spacing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self { top, right, bottom, left }
    }

    pub fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Left + right.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Top + bottom.
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Both sides on each axis, as a size.
    pub fn total(&self) -> Size {
        Size::new(self.horizontal(), self.vertical())
    }
}

/// Resolved corner radii, CSS order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CornerRadii {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl CornerRadii {
    pub fn is_zero(&self) -> bool {
        self.top_left == 0.0 && self.top_right == 0.0 && self.bottom_right == 0.0 && self.bottom_left == 0.0
    }
}

/// Expand a shorthand into four values in clockwise order from the first slot.
fn expand(spec: &BoxSpacing, what: &str) -> [f32; 4] {
    let values = match spec {
        BoxSpacing::Uniform(v) => return [*v; 4],
        BoxSpacing::Shorthand(values) => values,
    };

    let missing: Vec<usize> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.is_none().then_some(i))
        .collect();
    if !missing.is_empty() {
        tracing::warn!("{}: undefined value(s) at {:?} in {:?}, using 0", what, missing, values);
    }
    if values.len() > 4 {
        tracing::warn!("{}: {} values given, only the first 4 are used", what, values.len());
    }

    let slot = |i: usize| values.get(i).copied().flatten().unwrap_or(0.0);
    let (a, b, c, d) = (slot(0), slot(1), slot(2), slot(3));
    match values.len() {
        0 => [0.0; 4],
        1 => [a; 4],
        2 => [a, b, a, b],
        3 => [a, b, c, b],
        _ => [a, b, c, d],
    }
}

/// Resolve a spacing shorthand into per-side values.
pub fn resolve_spacing(spec: &BoxSpacing) -> Edges {
    let [top, right, bottom, left] = expand(spec, "spacing");
    Edges { top, right, bottom, left }
}

/// Resolve a border-radius shorthand (top-left, top-right, bottom-right, bottom-left).
pub fn resolve_corner_radii(spec: &BoxSpacing) -> CornerRadii {
    let [top_left, top_right, bottom_right, bottom_left] = expand(spec, "border radius");
    CornerRadii {
        top_left,
        top_right,
        bottom_right,
        bottom_left,
    }
}

/// Space a box adds around its content: padding, border on both sides, margin.
pub fn box_extras(padding: &Edges, border_width: f32, margin: &Edges) -> Size {
    padding.total() + margin.total() + Size::new(border_width * 2.0, border_width * 2.0)
}

/// Total occupied size for a given content size.
pub fn outer_size(content: Size, padding: &Edges, border_width: f32, margin: &Edges) -> Size {
    content + box_extras(padding, border_width, margin)
}

/// Offset of the content origin from the box's outer top-left corner.
pub fn content_offset(padding: &Edges, margin: &Edges, border_width: f32) -> Point {
    Point::new(
        padding.left + margin.left + border_width / 2.0,
        padding.top + margin.top + border_width / 2.0,
    )
}
