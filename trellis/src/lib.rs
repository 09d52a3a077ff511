//! Trellis: a flexbox-style layout engine.
//!
//! Trellis computes a position and size for every box in a tree of nested
//! boxes, then hands the resolved rectangles to a painter and uses the same
//! rectangles to route pointer input.
//!
//! # Architecture
//!
//! ```text
//! Style -> resolve -> LayoutNode tree -> measure (bottom-up) -> arrange (top-down) -> Painter
//!                                                                      \-> hit testing
//! ```
//!
//! Authored styles are immutable. Passes write into each node's `Geometry`,
//! and only dirty subtrees are re-measured.
//!
//! # Usage
//!
//! ```ignore
//! use trellis::{DisplayList, LayoutNode, LayoutTree, Style};
//!
//! let root = LayoutNode::new(Style::new().size(400.0, 300.0).gap(8.0))?
//!     .child(LayoutNode::new(Style::leaf(100.0, 40.0))?)?
//!     .child(LayoutNode::new(Style::new().grows(true))?)?;
//! let mut tree = LayoutTree::new(root)?;
//! let mut painter = DisplayList::new();
//! tree.draw(&mut painter)?;
//! ```

// Core primitives
pub mod primitives;
pub mod error;
pub mod config;
pub mod units;

// Styles and box geometry
pub mod box_model;
pub mod style;

// Node tree and passes
pub mod node;
pub mod layout;
pub mod tree;

// Input
pub mod event;
pub mod scroll_state;

// Output
pub mod paint;

// Re-export core types
pub use primitives::{Axis, Point, Rect, Size};
pub use error::{LayoutError, Result};
pub use config::LayoutConfig;
pub use units::{Color, ColorSpec, LengthSpec, resolve_color, resolve_length};
pub use box_model::{BoxSpacing, CornerRadii, Edges};
pub use style::{
    Align, BorderSpec, FlexDirection, FlexWrap, Justify, LayoutAlgorithm, ResolveContext, ResolvedStyle,
    SizeSpec, Style,
};
pub use node::{Geometry, LayoutNode, NodeId, NodeSnapshot, NodeSpec};
pub use tree::LayoutTree;
pub use event::{MouseButton, PointerEvent, ScrollDelta};
pub use scroll_state::ScrollState;
pub use paint::{BoxPaint, DisplayList, LineStyle, PaintCommand, Painter};
