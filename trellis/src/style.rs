//! Authored styles and their resolved form.
//!
//! A `Style` is what the application writes (every field optional or
//! defaulted, JSON-friendly). `Style::resolve` turns it into a fully
//! populated `ResolvedStyle` once, at construction: spacing shorthands are
//! expanded, lengths converted to pixels and colors validated. Layout passes
//! read only the resolved form and never write back into either.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::box_model::{self, BoxSpacing, CornerRadii, Edges};
use crate::error::Result;
use crate::paint::LineStyle;
use crate::primitives::{Axis, Point, Size};
use crate::units::{Color, ColorSpec, LengthSpec, resolve_color, resolve_length};

// =========================================================================
// Enumerated properties
// =========================================================================

/// Which arrangement a node applies to its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutAlgorithm {
    /// A plain box. Cannot hold or arrange children.
    Leaf,
    /// Row/column flexbox with wrap, grow, align and justify.
    #[default]
    RowColumnFlex,
    /// Top-to-bottom stack that wraps into side-by-side columns.
    StackedColumn,
}

impl fmt::Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayoutAlgorithm::Leaf => "leaf",
            LayoutAlgorithm::RowColumnFlex => "row-column-flex",
            LayoutAlgorithm::StackedColumn => "stacked-column",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

impl FlexDirection {
    pub fn main_axis(self) -> Axis {
        match self {
            FlexDirection::Row => Axis::Horizontal,
            FlexDirection::Column => Axis::Vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexWrap {
    #[default]
    Nowrap,
    Wrap,
}

/// Cross-axis placement of the whole set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

/// Main-axis distribution within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Justify {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientDirection {
    Top,
    TopLeft,
    TopRight,
    Bottom,
    BottomLeft,
    BottomRight,
    Left,
    Right,
}

// =========================================================================
// Authored style
// =========================================================================

/// Optional width/height pair of authored lengths.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeSpec {
    pub width: Option<LengthSpec>,
    pub height: Option<LengthSpec>,
}

impl SizeSpec {
    pub fn new(width: impl Into<LengthSpec>, height: impl Into<LengthSpec>) -> Self {
        Self {
            width: Some(width.into()),
            height: Some(height.into()),
        }
    }

    pub fn width(width: impl Into<LengthSpec>) -> Self {
        Self {
            width: Some(width.into()),
            height: None,
        }
    }

    pub fn height(height: impl Into<LengthSpec>) -> Self {
        Self {
            width: None,
            height: Some(height.into()),
        }
    }
}

/// A border or outline stroke as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderSpec {
    pub width: f32,
    #[serde(default)]
    pub style: LineStyle,
    pub color: ColorSpec,
    /// Dash/dot spacing for non-solid strokes.
    #[serde(default)]
    pub gap: Option<f32>,
}

impl BorderSpec {
    pub fn solid(width: f32, color: impl Into<ColorSpec>) -> Self {
        Self {
            width,
            style: LineStyle::Solid,
            color: color.into(),
            gap: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStopSpec {
    pub color: ColorSpec,
    /// 0 to 1 along the gradient.
    pub offset: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GradientSpec {
    Linear {
        stops: Vec<GradientStopSpec>,
        #[serde(default)]
        to: Option<GradientDirection>,
    },
    Radial {
        /// Normalized 0-1.
        radius: f32,
        /// Normalized 0-1.
        center: Point,
        stops: Vec<GradientStopSpec>,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundSpec {
    pub color: Option<ColorSpec>,
    pub image_src: Option<String>,
    pub image_size: Option<Size>,
    pub gradient: Option<GradientSpec>,
}

/// Authored style of a box. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Style {
    pub name: Option<String>,
    pub algorithm: LayoutAlgorithm,
    /// Initial position; only meaningful for a root, children are placed by their parent.
    pub position: Option<Point>,

    pub size: SizeSpec,
    pub min: SizeSpec,
    pub max: SizeSpec,

    pub margin: BoxSpacing,
    pub padding: BoxSpacing,
    pub border: Option<BorderSpec>,
    pub outline: Option<BorderSpec>,
    pub border_radius: BoxSpacing,
    pub background: BackgroundSpec,

    pub flex_direction: FlexDirection,
    pub flex_wrap: FlexWrap,
    pub gap: f32,
    pub align: Align,
    pub justify: Justify,
    pub grows: bool,

    pub visible: bool,
    pub hidden: bool,
    pub scrollable: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            name: None,
            algorithm: LayoutAlgorithm::default(),
            position: None,
            size: SizeSpec::default(),
            min: SizeSpec::default(),
            max: SizeSpec::default(),
            margin: BoxSpacing::default(),
            padding: BoxSpacing::default(),
            border: None,
            outline: None,
            border_radius: BoxSpacing::default(),
            background: BackgroundSpec::default(),
            flex_direction: FlexDirection::default(),
            flex_wrap: FlexWrap::default(),
            gap: 0.0,
            align: Align::default(),
            justify: Justify::default(),
            grows: false,
            visible: true,
            hidden: false,
            scrollable: false,
        }
    }
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// A leaf box with a fixed content size.
    pub fn leaf(width: f32, height: f32) -> Self {
        Self::new().algorithm(LayoutAlgorithm::Leaf).size(width, height)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn algorithm(mut self, algorithm: LayoutAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.position = Some(Point::new(x, y));
        self
    }

    /// Set explicit content width and height in pixels.
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.size = SizeSpec::new(width, height);
        self
    }

    pub fn size_spec(mut self, size: SizeSpec) -> Self {
        self.size = size;
        self
    }

    pub fn min(mut self, min: SizeSpec) -> Self {
        self.min = min;
        self
    }

    pub fn max(mut self, max: SizeSpec) -> Self {
        self.max = max;
        self
    }

    pub fn margin(mut self, margin: impl Into<BoxSpacing>) -> Self {
        self.margin = margin.into();
        self
    }

    pub fn padding(mut self, padding: impl Into<BoxSpacing>) -> Self {
        self.padding = padding.into();
        self
    }

    pub fn border(mut self, border: BorderSpec) -> Self {
        self.border = Some(border);
        self
    }

    pub fn outline(mut self, outline: BorderSpec) -> Self {
        self.outline = Some(outline);
        self
    }

    pub fn border_radius(mut self, radius: impl Into<BoxSpacing>) -> Self {
        self.border_radius = radius.into();
        self
    }

    pub fn background(mut self, color: impl Into<ColorSpec>) -> Self {
        self.background.color = Some(color.into());
        self
    }

    pub fn direction(mut self, direction: FlexDirection) -> Self {
        self.flex_direction = direction;
        self
    }

    pub fn wrap(mut self, wrap: FlexWrap) -> Self {
        self.flex_wrap = wrap;
        self
    }

    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    pub fn grows(mut self, grows: bool) -> Self {
        self.grows = grows;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn scrollable(mut self, scrollable: bool) -> Self {
        self.scrollable = scrollable;
        self
    }

    /// Expand this style into its fully populated form.
    ///
    /// Fails only on an invalid color.
    pub fn resolve(&self, ctx: &ResolveContext) -> Result<ResolvedStyle> {
        let border = self.border.as_ref().map(Stroke::resolve).transpose()?;
        let outline = self.outline.as_ref().map(Stroke::resolve).transpose()?;
        let background = Background::resolve(&self.background)?;

        let explicit = OptionalSize::resolve(&self.size, ctx);
        if self.grows && (explicit.width.is_some() || explicit.height.is_some()) {
            tracing::warn!(
                "{}: grows is set alongside an explicit size; the explicit size wins on its axis",
                self.name.as_deref().unwrap_or("unnamed box")
            );
        }

        Ok(ResolvedStyle {
            name: self.name.clone(),
            algorithm: self.algorithm,
            position: self.position.unwrap_or(Point::ORIGIN),
            explicit,
            min: OptionalSize::resolve(&self.min, ctx),
            max: OptionalSize::resolve(&self.max, ctx),
            margin: box_model::resolve_spacing(&self.margin),
            padding: box_model::resolve_spacing(&self.padding),
            border,
            outline,
            radii: box_model::resolve_corner_radii(&self.border_radius),
            background,
            direction: self.flex_direction,
            wrap: self.flex_wrap == FlexWrap::Wrap,
            gap: self.gap,
            align: self.align,
            justify: self.justify,
            grows: self.grows,
            visible: self.visible && !self.hidden,
            scrollable: self.scrollable,
        })
    }
}

// =========================================================================
// Resolved style
// =========================================================================

/// Inputs that lengths are resolved against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveContext {
    pub viewport: Size,
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self {
            viewport: crate::config::LayoutConfig::default().viewport,
        }
    }
}

/// Width/height that may each be unset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OptionalSize {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl OptionalSize {
    /// Percentages resolve against the viewport on the same axis.
    fn resolve(spec: &SizeSpec, ctx: &ResolveContext) -> Self {
        let viewport = Some(ctx.viewport);
        Self {
            width: spec
                .width
                .as_ref()
                .map(|w| resolve_length(w, Some(ctx.viewport.width), viewport)),
            height: spec
                .height
                .as_ref()
                .map(|h| resolve_length(h, Some(ctx.viewport.height), viewport)),
        }
    }

    pub fn get(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// A validated border or outline stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub width: f32,
    pub style: LineStyle,
    pub color: Color,
    pub gap: f32,
}

impl Stroke {
    fn resolve(spec: &BorderSpec) -> Result<Self> {
        Ok(Self {
            width: spec.width,
            style: spec.style,
            color: resolve_color(&spec.color)?,
            gap: spec.gap.unwrap_or(spec.width),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    pub color: Color,
    pub offset: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Gradient {
    Linear {
        stops: Vec<GradientStop>,
        to: Option<GradientDirection>,
    },
    Radial {
        radius: f32,
        center: Point,
        stops: Vec<GradientStop>,
    },
}

fn resolve_stops(stops: &[GradientStopSpec]) -> Result<Vec<GradientStop>> {
    stops
        .iter()
        .map(|stop| {
            Ok(GradientStop {
                color: resolve_color(&stop.color)?,
                offset: stop.offset,
            })
        })
        .collect()
}

/// Background fill handed to the painter untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Background {
    pub color: Option<Color>,
    pub image_src: Option<String>,
    pub image_size: Option<Size>,
    pub gradient: Option<Gradient>,
}

impl Background {
    fn resolve(spec: &BackgroundSpec) -> Result<Self> {
        let gradient = match &spec.gradient {
            None => None,
            Some(GradientSpec::Linear { stops, to }) => Some(Gradient::Linear {
                stops: resolve_stops(stops)?,
                to: *to,
            }),
            Some(GradientSpec::Radial { radius, center, stops }) => Some(Gradient::Radial {
                radius: *radius,
                center: *center,
                stops: resolve_stops(stops)?,
            }),
        };
        Ok(Self {
            color: spec.color.as_ref().map(resolve_color).transpose()?,
            image_src: spec.image_src.clone(),
            image_size: spec.image_size,
            gradient,
        })
    }
}

/// Fully populated style read by the layout passes.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub name: Option<String>,
    pub algorithm: LayoutAlgorithm,
    pub position: Point,
    /// Authored `size`, in pixels.
    pub explicit: OptionalSize,
    pub min: OptionalSize,
    pub max: OptionalSize,
    pub margin: Edges,
    pub padding: Edges,
    pub border: Option<Stroke>,
    pub outline: Option<Stroke>,
    pub radii: CornerRadii,
    pub background: Background,
    pub direction: FlexDirection,
    pub wrap: bool,
    pub gap: f32,
    pub align: Align,
    pub justify: Justify,
    pub grows: bool,
    pub visible: bool,
    pub scrollable: bool,
}

impl ResolvedStyle {
    pub fn border_width(&self) -> f32 {
        self.border.map(|b| b.width).unwrap_or(0.0)
    }

    pub fn main_axis(&self) -> Axis {
        match self.algorithm {
            LayoutAlgorithm::StackedColumn => Axis::Vertical,
            _ => self.direction.main_axis(),
        }
    }

    /// Outer size minus content size.
    pub fn extras(&self) -> Size {
        box_model::box_extras(&self.padding, self.border_width(), &self.margin)
    }

    pub fn outer_size(&self, content: Size) -> Size {
        box_model::outer_size(content, &self.padding, self.border_width(), &self.margin)
    }

    pub fn content_offset(&self) -> Point {
        box_model::content_offset(&self.padding, &self.margin, self.border_width())
    }

    /// Whether this box takes a share of leftover space along `axis`.
    ///
    /// An explicit size on that axis overrides `grows`.
    pub fn grows_along(&self, axis: Axis) -> bool {
        self.grows && self.explicit.get(axis).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;

    #[test]
    fn defaults_are_fully_populated() {
        let resolved = Style::default().resolve(&ResolveContext::default()).unwrap();
        assert_eq!(resolved.algorithm, LayoutAlgorithm::RowColumnFlex);
        assert_eq!(resolved.margin, Edges::ZERO);
        assert_eq!(resolved.border_width(), 0.0);
        assert!(resolved.visible);
        assert!(!resolved.wrap);
        assert_eq!(resolved.position, Point::ORIGIN);
    }

    #[test]
    fn invalid_background_fails_resolution() {
        let style = Style::new().background([300.0_f32, 0.0, 0.0, 1.0]);
        let err = style.resolve(&ResolveContext::default()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidColor { channel: "red", .. }));

        let style = Style::new().background([0.0_f32, 0.0, 0.0, 1.0]);
        assert!(style.resolve(&ResolveContext::default()).is_ok());
    }

    #[test]
    fn invalid_border_and_gradient_colors_fail() {
        let style = Style::new().border(BorderSpec::solid(1.0, [0.0_f32, 0.0, 0.0, 3.0]));
        assert!(style.resolve(&ResolveContext::default()).is_err());

        let json = r##"{ "background": { "gradient": { "kind": "linear", "to": "top-left",
            "stops": [ { "color": "#fff", "offset": 0 }, { "color": [0, 0, 999, 1], "offset": 1 } ] } } }"##;
        let style: Style = serde_json::from_str(json).unwrap();
        assert!(style.resolve(&ResolveContext::default()).is_err());
    }

    #[test]
    fn lengths_resolve_against_viewport() {
        let ctx = ResolveContext {
            viewport: Size::new(1000.0, 600.0),
        };
        let style = Style::new().size_spec(SizeSpec::new("50%", "10vh"));
        let resolved = style.resolve(&ctx).unwrap();
        assert_eq!(resolved.explicit.width, Some(500.0));
        assert_eq!(resolved.explicit.height, Some(60.0));
    }

    #[test]
    fn hidden_overrides_visible() {
        let resolved = Style::new().hidden(true).resolve(&ResolveContext::default()).unwrap();
        assert!(!resolved.visible);
    }

    #[test]
    fn explicit_size_overrides_grow_on_its_axis() {
        let style = Style::new().grows(true).size_spec(SizeSpec::width(80.0_f32));
        let resolved = style.resolve(&ResolveContext::default()).unwrap();
        assert!(!resolved.grows_along(Axis::Horizontal));
        assert!(resolved.grows_along(Axis::Vertical));
    }

    #[test]
    fn deserializes_camel_case_json() {
        let json = r##"{
            "flexDirection": "column",
            "flexWrap": "wrap",
            "justify": "space-evenly",
            "algorithm": "stacked-column",
            "borderRadius": [4, 8],
            "border": { "width": 2, "style": "dashed", "color": "#000", "gap": 3 }
        }"##;
        let style: Style = serde_json::from_str(json).unwrap();
        assert_eq!(style.flex_direction, FlexDirection::Column);
        assert_eq!(style.justify, Justify::SpaceEvenly);
        assert_eq!(style.algorithm, LayoutAlgorithm::StackedColumn);
        assert!(style.visible);

        let resolved = style.resolve(&ResolveContext::default()).unwrap();
        let border = resolved.border.unwrap();
        assert_eq!(border.style, LineStyle::Dashed);
        assert_eq!(border.gap, 3.0);
        assert_eq!(resolved.radii.top_right, 8.0);
    }
}
