//! Layout tree: the root node plus the configuration every pass shares.
//!
//! # Example
//!
//! ```ignore
//! let mut tree = LayoutTree::from_json(json)?;
//! let mut list = DisplayList::new();
//! tree.draw(&mut list)?;
//! if tree.dispatch(&event)? {
//!     tree.draw(&mut list)?; // scroll offsets changed
//! }
//! ```

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::event::PointerEvent;
use crate::hit_test;
use crate::layout::{arrange, arrange_children, measure};
use crate::node::{LayoutNode, NodeId, NodeSnapshot, NodeSpec};
use crate::paint::{BoxPaint, Painter};
use crate::primitives::{Point, Size};
use crate::scroll_state::ScrollState;
use crate::style::{LayoutAlgorithm, ResolveContext, Style};

#[derive(Debug)]
pub struct LayoutTree {
    root: LayoutNode,
    config: LayoutConfig,
}

impl LayoutTree {
    pub fn new(root: LayoutNode) -> Result<Self> {
        Self::with_config(root, LayoutConfig::default())
    }

    /// Take ownership of `root`, re-resolving its styles against `config.viewport`.
    pub fn with_config(mut root: LayoutNode, config: LayoutConfig) -> Result<Self> {
        root.restyle_all(&Self::context(&config))?;
        Ok(Self { root, config })
    }

    pub fn from_spec(spec: NodeSpec, config: LayoutConfig) -> Result<Self> {
        let root = LayoutNode::from_spec(spec, &Self::context(&config))?;
        Ok(Self { root, config })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_spec(NodeSpec::from_json(json)?, LayoutConfig::default())
    }

    fn context(config: &LayoutConfig) -> ResolveContext {
        ResolveContext {
            viewport: config.viewport,
        }
    }

    pub fn root(&self) -> &LayoutNode {
        &self.root
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn find(&self, id: NodeId) -> Option<&LayoutNode> {
        self.root.find(id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&LayoutNode> {
        self.root.find_by_name(name)
    }

    pub fn scroll_state(&self, id: NodeId) -> Option<&ScrollState> {
        self.find(id).and_then(LayoutNode::scroll_state)
    }

    // =====================================================================
    // Edits
    // =====================================================================

    /// Append `child` under `parent`, invalidating `parent` and its ancestors.
    pub fn add_child(&mut self, parent: NodeId, mut child: LayoutNode) -> Result<NodeId> {
        child.restyle_all(&Self::context(&self.config))?;
        let id = self
            .root
            .find_mut(parent)
            .ok_or(LayoutError::NodeNotFound(parent))?
            .add_child(child)?;
        self.root.invalidate(parent);
        Ok(id)
    }

    /// Detach `child` from `parent` and return it.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<LayoutNode> {
        let removed = self
            .root
            .find_mut(parent)
            .ok_or(LayoutError::NodeNotFound(parent))?
            .remove_child(child)?;
        self.root.invalidate(parent);
        Ok(removed)
    }

    pub fn set_style(&mut self, id: NodeId, style: Style) -> Result<()> {
        let ctx = Self::context(&self.config);
        self.root
            .find_mut(id)
            .ok_or(LayoutError::NodeNotFound(id))?
            .set_style(style, &ctx)?;
        self.root.invalidate(id);
        Ok(())
    }

    /// Change the viewport. Every style is re-resolved and every node re-measured.
    pub fn resize(&mut self, viewport: Size) -> Result<()> {
        tracing::debug!("resize to {}x{}", viewport.width, viewport.height);
        self.config.viewport = viewport;
        self.root.restyle_all(&Self::context(&self.config))
    }

    // =====================================================================
    // Passes
    // =====================================================================

    pub fn measure(&mut self) -> Size {
        measure(&mut self.root, &self.config)
    }

    /// Measure, then arrange the whole tree.
    pub fn layout(&mut self) -> Result<()> {
        self.measure();
        arrange(&mut self.root, &self.config)
    }

    /// Measure, then arrange and paint depth first.
    ///
    /// Each container is arranged right after its own box is painted, so a
    /// child's geometry is final by the time it is painted.
    pub fn draw(&mut self, painter: &mut dyn Painter) -> Result<()> {
        self.measure();
        draw_node(&mut self.root, painter, &self.config)
    }

    /// Route a pointer event. A consumed wheel event re-runs layout so
    /// positions reflect the new scroll offset.
    pub fn dispatch(&mut self, event: &PointerEvent) -> Result<bool> {
        let handled = hit_test::dispatch(event, &mut self.root, &self.config);
        if handled && matches!(event, PointerEvent::WheelScrolled { .. }) {
            self.layout()?;
        }
        Ok(handled)
    }

    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        hit_test::hit_test(&self.root, point)
    }

    pub fn snapshot(&self) -> NodeSnapshot {
        self.root.snapshot()
    }
}

fn draw_node(node: &mut LayoutNode, painter: &mut dyn Painter, config: &LayoutConfig) -> Result<()> {
    if !node.is_visible() {
        // Geometry stays current for hidden subtrees; they are just not painted.
        return arrange(node, config);
    }

    let style = node.resolved();
    painter.draw_box(&BoxPaint {
        id: node.id(),
        name: style.name.clone(),
        rect: node.border_box(),
        background: style.background.clone(),
        border: style.border,
        outline: style.outline,
        radii: style.radii,
    });

    if node.algorithm() == LayoutAlgorithm::Leaf {
        return Ok(());
    }
    arrange_children(node, config)?;

    let clip = node.is_scrollable().then(|| node.content_box());
    if let Some(rect) = clip {
        painter.push_clip(rect);
    }
    for child in node.children_mut() {
        draw_node(child, painter, config)?;
    }
    if clip.is_some() {
        painter.pop_clip();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ScrollDelta;
    use crate::paint::{DisplayList, PaintCommand};
    use crate::style::{FlexDirection, SizeSpec};

    fn leaf(name: &str, width: f32, height: f32) -> LayoutNode {
        LayoutNode::new(Style::leaf(width, height).name(name)).unwrap()
    }

    #[test]
    fn add_child_invalidates_ancestors() {
        let inner = LayoutNode::new(Style::new().name("inner")).unwrap().child(leaf("a", 10.0, 10.0)).unwrap();
        let inner_id = inner.id();
        let mut tree = LayoutTree::new(LayoutNode::new(Style::new()).unwrap().child(inner).unwrap()).unwrap();
        assert_eq!(tree.measure(), Size::new(10.0, 10.0));

        tree.add_child(inner_id, leaf("b", 15.0, 10.0)).unwrap();
        assert!(tree.root().is_dirty());
        assert_eq!(tree.measure(), Size::new(25.0, 10.0));

        let b = tree.find_by_name("b").unwrap().id();
        tree.remove_child(inner_id, b).unwrap();
        assert_eq!(tree.measure(), Size::new(10.0, 10.0));
    }

    #[test]
    fn edits_on_unknown_nodes_fail() {
        let mut tree = LayoutTree::new(LayoutNode::new(Style::new()).unwrap()).unwrap();
        let stray = NodeId::new();
        assert!(matches!(
            tree.add_child(stray, leaf("a", 1.0, 1.0)),
            Err(LayoutError::NodeNotFound(id)) if id == stray
        ));
        assert!(tree.set_style(stray, Style::new()).is_err());
    }

    #[test]
    fn draw_paints_in_tree_order_and_clips_scrollers() {
        let list = LayoutNode::new(Style::new().name("list").size(50.0, 50.0).scrollable(true))
            .unwrap()
            .child(leaf("item", 80.0, 20.0))
            .unwrap();
        let root = LayoutNode::new(Style::new().name("root").margin(5.0))
            .unwrap()
            .child(list)
            .unwrap()
            .child(LayoutNode::new(Style::leaf(10.0, 10.0).name("hidden").hidden(true)).unwrap())
            .unwrap();
        let mut tree = LayoutTree::new(root).unwrap();
        let mut painter = DisplayList::new();
        tree.draw(&mut painter).unwrap();

        let names: Vec<_> = painter.boxes().filter_map(|b| b.name.as_deref()).collect();
        assert_eq!(names, vec!["root", "list", "item"]);
        assert!(matches!(painter.commands()[2], PaintCommand::PushClip(_)));
        assert!(matches!(painter.commands().last(), Some(PaintCommand::PopClip)));

        let root_box = painter.boxes().next().unwrap();
        assert_eq!(root_box.rect.origin(), Point::new(5.0, 5.0));
    }

    #[test]
    fn resize_re_resolves_viewport_lengths() {
        let root = LayoutNode::new(Style::new().size_spec(SizeSpec::new("50vw", "10%"))).unwrap();
        let config = LayoutConfig::default().with_viewport(Size::new(1000.0, 500.0));
        let mut tree = LayoutTree::with_config(root, config).unwrap();
        assert_eq!(tree.measure(), Size::new(500.0, 50.0));

        tree.resize(Size::new(400.0, 200.0)).unwrap();
        assert_eq!(tree.measure(), Size::new(200.0, 20.0));
    }

    #[test]
    fn wheel_dispatch_rearranges() {
        let mut list = LayoutNode::new(
            Style::new()
                .name("list")
                .direction(FlexDirection::Column)
                .size(100.0, 100.0)
                .scrollable(true),
        )
        .unwrap();
        for i in 0..4 {
            list.add_child(leaf(&format!("item{i}"), 100.0, 50.0)).unwrap();
        }
        let mut tree = LayoutTree::new(list).unwrap();
        tree.layout().unwrap();

        let wheel = PointerEvent::wheel(10.0, 10.0, ScrollDelta::Pixels { x: 0.0, y: 30.0 });
        assert!(tree.dispatch(&wheel).unwrap());
        assert_eq!(tree.find_by_name("item1").unwrap().position().y, 20.0);
        assert_eq!(tree.snapshot().scroll, Some(Point::new(0.0, 30.0)));
    }
}
