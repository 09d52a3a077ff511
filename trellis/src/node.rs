//! Layout nodes.
//!
//! A `LayoutNode` owns its authored `Style`, the `ResolvedStyle` derived from
//! it, the mutable `Geometry` written by the layout passes, an optional
//! `ScrollState`, and its children. Nodes form a strict tree: a parent owns
//! its children outright and a node is destroyed by detaching it.
//!
//! # Invalidation
//!
//! Measure skips clean subtrees. Every structural or style edit marks the
//! edited node dirty, and edits made through `LayoutTree` also mark every
//! ancestor, so a dirty node never sits below a clean one.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::primitives::{Point, Rect, Size};
use crate::scroll_state::ScrollState;
use crate::style::{LayoutAlgorithm, ResolveContext, ResolvedStyle, Style};

/// Counter for generating unique node IDs.
static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a node, stable for the node's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Each call returns a different ID.
    pub fn new() -> Self {
        Self(NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output of the layout passes. All sizes are outer sizes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Geometry {
    /// Top-left of the outer box, global coordinates.
    pub position: Point,
    /// Final size, after grow.
    pub size: Size,
    /// Size computed by measure. Arrange starts from this on every pass.
    pub measured: Size,
    /// Extent of the arranged children, before scrolling.
    pub content_extent: Size,
}

#[derive(Debug)]
pub struct LayoutNode {
    id: NodeId,
    style: Style,
    resolved: ResolvedStyle,
    pub(crate) geometry: Geometry,
    scroll: Option<ScrollState>,
    children: Vec<LayoutNode>,
    pub(crate) dirty: bool,
}

impl LayoutNode {
    /// Create a node, resolving viewport-relative lengths against the default viewport.
    ///
    /// `LayoutTree` re-resolves against its own viewport when it takes the node.
    pub fn new(style: Style) -> Result<Self> {
        Self::with_context(style, &ResolveContext::default())
    }

    pub fn with_context(style: Style, ctx: &ResolveContext) -> Result<Self> {
        let resolved = style.resolve(ctx)?;
        let scroll = resolved.scrollable.then(ScrollState::new);
        Ok(Self {
            id: NodeId::new(),
            geometry: Geometry {
                position: resolved.position,
                ..Geometry::default()
            },
            style,
            resolved,
            scroll,
            children: Vec::new(),
            dirty: true,
        })
    }

    /// Build a node and its subtree from a spec.
    pub fn from_spec(spec: NodeSpec, ctx: &ResolveContext) -> Result<Self> {
        let mut node = Self::with_context(spec.style, ctx)?;
        for child in spec.children {
            node.add_child(Self::from_spec(child, ctx)?)?;
        }
        Ok(node)
    }

    /// Builder form of `add_child`.
    pub fn child(mut self, child: LayoutNode) -> Result<Self> {
        self.add_child(child)?;
        Ok(self)
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.resolved.name.as_deref()
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn resolved(&self) -> &ResolvedStyle {
        &self.resolved
    }

    pub fn algorithm(&self) -> LayoutAlgorithm {
        self.resolved.algorithm
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn position(&self) -> Point {
        self.geometry.position
    }

    pub fn size(&self) -> Size {
        self.geometry.size
    }

    /// Outer box.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.geometry.position, self.geometry.size)
    }

    /// Outer box without its margin.
    pub fn border_box(&self) -> Rect {
        let margin = &self.resolved.margin;
        Rect::new(
            self.geometry.position.x + margin.left,
            self.geometry.position.y + margin.top,
            (self.geometry.size.width - margin.horizontal()).max(0.0),
            (self.geometry.size.height - margin.vertical()).max(0.0),
        )
    }

    /// Region children are arranged in.
    pub fn content_box(&self) -> Rect {
        let origin = self.geometry.position + self.resolved.content_offset();
        let extras = self.resolved.extras();
        Rect::from_origin_size(
            origin,
            Size::new(
                (self.geometry.size.width - extras.width).max(0.0),
                (self.geometry.size.height - extras.height).max(0.0),
            ),
        )
    }

    pub fn is_visible(&self) -> bool {
        self.resolved.visible
    }

    pub fn is_scrollable(&self) -> bool {
        self.scroll.is_some()
    }

    pub fn scroll_state(&self) -> Option<&ScrollState> {
        self.scroll.as_ref()
    }

    pub(crate) fn scroll_state_mut(&mut self) -> Option<&mut ScrollState> {
        self.scroll.as_mut()
    }

    /// Current scroll offset, or the origin for non-scrollable nodes.
    pub fn scroll_offset(&self) -> Point {
        self.scroll.map(|s| s.offset).unwrap_or(Point::ORIGIN)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn children(&self) -> &[LayoutNode] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [LayoutNode] {
        &mut self.children
    }

    // =====================================================================
    // Structure
    // =====================================================================

    /// Append a child. Leaf nodes cannot hold children.
    pub fn add_child(&mut self, child: LayoutNode) -> Result<NodeId> {
        if self.algorithm() == LayoutAlgorithm::Leaf {
            return Err(LayoutError::NotImplemented {
                operation: "add_child",
                algorithm: LayoutAlgorithm::Leaf,
            });
        }
        let id = child.id;
        self.children.push(child);
        self.dirty = true;
        Ok(id)
    }

    /// Detach a direct child, handing ownership back to the caller.
    pub fn remove_child(&mut self, id: NodeId) -> Result<LayoutNode> {
        let index = self
            .children
            .iter()
            .position(|c| c.id == id)
            .ok_or(LayoutError::NodeNotFound(id))?;
        self.dirty = true;
        Ok(self.children.remove(index))
    }

    /// Replace the authored style.
    pub fn set_style(&mut self, style: Style, ctx: &ResolveContext) -> Result<()> {
        let resolved = style.resolve(ctx)?;
        if resolved.algorithm == LayoutAlgorithm::Leaf && !self.children.is_empty() {
            return Err(LayoutError::NotImplemented {
                operation: "add_child",
                algorithm: LayoutAlgorithm::Leaf,
            });
        }
        self.style = style;
        self.apply_resolved(resolved);
        Ok(())
    }

    /// Re-resolve every style in the subtree and mark it all dirty.
    pub(crate) fn restyle_all(&mut self, ctx: &ResolveContext) -> Result<()> {
        let resolved = self.style.resolve(ctx)?;
        self.apply_resolved(resolved);
        for child in &mut self.children {
            child.restyle_all(ctx)?;
        }
        Ok(())
    }

    /// Install a freshly resolved style. Scroll state is kept while the node
    /// stays scrollable.
    fn apply_resolved(&mut self, resolved: ResolvedStyle) {
        self.scroll = match (resolved.scrollable, self.scroll) {
            (true, Some(existing)) => Some(existing),
            (true, None) => Some(ScrollState::new()),
            (false, _) => None,
        };
        self.resolved = resolved;
        self.dirty = true;
    }

    /// Mark `id` and each of its ancestors dirty. Returns whether `id` was found.
    pub(crate) fn invalidate(&mut self, id: NodeId) -> bool {
        if self.id == id || self.children.iter_mut().any(|c| c.invalidate(id)) {
            self.dirty = true;
            return true;
        }
        false
    }

    // =====================================================================
    // Lookup
    // =====================================================================

    pub fn find(&self, id: NodeId) -> Option<&LayoutNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    pub(crate) fn find_mut(&mut self, id: NodeId) -> Option<&mut LayoutNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// First node in depth-first order with this name.
    pub fn find_by_name(&self, name: &str) -> Option<&LayoutNode> {
        if self.name() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_name(name))
    }

    /// Depth-first, parent before children.
    pub fn descendants(&self) -> Vec<&LayoutNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    // =====================================================================
    // Layout
    // =====================================================================

    /// Bottom-up size pass. See `layout::measure`.
    pub fn measure(&mut self, config: &LayoutConfig) -> Size {
        crate::layout::measure(self, config)
    }

    /// Top-down position pass over the whole subtree. See `layout::arrange`.
    pub fn arrange(&mut self, config: &LayoutConfig) -> Result<()> {
        crate::layout::arrange(self, config)
    }

    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            id: self.id,
            name: self.resolved.name.clone(),
            x: self.geometry.position.x,
            y: self.geometry.position.y,
            width: self.geometry.size.width,
            height: self.geometry.size.height,
            scroll: self.scroll.map(|s| s.offset),
            children: self.children.iter().map(LayoutNode::snapshot).collect(),
        }
    }
}

/// Serializable description of a node tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSpec {
    pub style: Style,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Resolved geometry of a subtree, for inspection and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub name: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll: Option<Point>,
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn find(&self, name: &str) -> Option<&NodeSnapshot> {
        if self.name.as_deref() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str) -> LayoutNode {
        LayoutNode::new(Style::leaf(10.0, 10.0).name(name)).unwrap()
    }

    #[test]
    fn restyling_keeps_scroll_state_in_step_with_the_style() {
        let ctx = ResolveContext::default();
        let mut list = LayoutNode::new(Style::new().size(50.0, 50.0).scrollable(true)).unwrap();
        list.scroll_state_mut().unwrap().offset = Point::new(0.0, 12.0);

        list.restyle_all(&ctx).unwrap();
        assert_eq!(list.scroll_offset(), Point::new(0.0, 12.0));
        assert!(list.is_dirty());

        list.set_style(Style::new().size(50.0, 50.0), &ctx).unwrap();
        assert!(list.scroll_state().is_none());
        list.set_style(Style::new().scrollable(true), &ctx).unwrap();
        assert_eq!(list.scroll_offset(), Point::ORIGIN);
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(NodeId::new(), NodeId::new());
        assert_ne!(leaf("a").id(), leaf("a").id());
    }

    #[test]
    fn leaf_rejects_children() {
        let mut node = leaf("a");
        let err = node.add_child(leaf("b")).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::NotImplemented {
                operation: "add_child",
                algorithm: LayoutAlgorithm::Leaf
            }
        ));
    }

    #[test]
    fn initial_position_comes_from_style() {
        let node = LayoutNode::new(Style::new().position(5.0, 7.0)).unwrap();
        assert_eq!(node.position(), Point::new(5.0, 7.0));
        assert!(node.is_dirty());
    }

    #[test]
    fn scroll_state_only_on_scrollable_nodes() {
        assert!(LayoutNode::new(Style::new().scrollable(true)).unwrap().scroll_state().is_some());
        assert!(LayoutNode::new(Style::new()).unwrap().scroll_state().is_none());
    }

    #[test]
    fn remove_child_returns_ownership() {
        let mut parent = LayoutNode::new(Style::new()).unwrap();
        let id = parent.add_child(leaf("a")).unwrap();
        parent.dirty = false;

        let removed = parent.remove_child(id).unwrap();
        assert_eq!(removed.id(), id);
        assert!(parent.children().is_empty());
        assert!(parent.is_dirty());
        assert!(matches!(parent.remove_child(id), Err(LayoutError::NodeNotFound(_))));
    }

    #[test]
    fn invalidate_marks_the_ancestor_chain() {
        let inner = LayoutNode::new(Style::new()).unwrap().child(leaf("x")).unwrap();
        let mut root = LayoutNode::new(Style::new()).unwrap().child(inner).unwrap().child(leaf("y")).unwrap();
        root.measure(&LayoutConfig::default());
        assert!(root.descendants().iter().all(|n| !n.is_dirty()));

        let x = root.find_by_name("x").unwrap().id();
        assert!(root.invalidate(x));
        assert!(root.is_dirty());
        assert!(root.children()[0].is_dirty());
        assert!(!root.children()[1].is_dirty());
    }

    #[test]
    fn boxes_nest() {
        let style = Style::new().margin(2.0).padding(3.0).border(crate::style::BorderSpec::solid(2.0, "#000"));
        let mut node = LayoutNode::new(style).unwrap();
        node.geometry.size = Size::new(100.0, 100.0);

        assert_eq!(node.border_box(), Rect::new(2.0, 2.0, 96.0, 96.0));
        let content = node.content_box();
        assert_eq!(content.origin(), Point::new(6.0, 6.0));
        assert_eq!(content.size(), Size::new(100.0 - 14.0, 100.0 - 14.0));
    }

    #[test]
    fn spec_builds_a_tree() {
        let spec = NodeSpec::from_json(
            r#"{ "style": { "name": "root" }, "children": [
                { "style": { "name": "a", "algorithm": "leaf" } },
                { "children": [ { "style": { "name": "b" } } ] }
            ] }"#,
        )
        .unwrap();
        let root = LayoutNode::from_spec(spec, &ResolveContext::default()).unwrap();
        assert_eq!(root.descendants().len(), 4);
        assert!(root.find_by_name("b").is_some());

        let bad = NodeSpec::from_json(r#"{ "style": { "algorithm": "leaf" }, "children": [ {} ] }"#).unwrap();
        assert!(LayoutNode::from_spec(bad, &ResolveContext::default()).is_err());
    }
}
