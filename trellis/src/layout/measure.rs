//! Measure pass: bottom-up outer sizes.
//!
//! Children are measured before their parent. A node with no children
//! measures like a leaf: explicit size, else `min`, else the configured
//! default. A container aggregates its children on every axis it has no
//! explicit size for. Clean nodes return their cached size without
//! descending.

use crate::config::LayoutConfig;
use crate::node::LayoutNode;
use crate::primitives::{Axis, Size};
use crate::style::{LayoutAlgorithm, ResolvedStyle};

use super::flex::{line_extent, partition_lines};

/// Measure `node` and its dirty descendants, returning its outer size.
///
/// Writes `geometry.measured` and `geometry.size`.
pub fn measure(node: &mut LayoutNode, config: &LayoutConfig) -> Size {
    if !node.dirty {
        return node.geometry.measured;
    }

    let child_sizes: Vec<Size> = node
        .children_mut()
        .iter_mut()
        .map(|child| measure(child, config))
        .collect();

    let style = node.resolved();
    let content = if child_sizes.is_empty() {
        leaf_content(style, config)
    } else {
        container_content(style, &child_sizes)
    };
    let outer = style.outer_size(content);

    tracing::debug!(
        "measured {} ({}): content {}x{}, outer {}x{}",
        node.id(),
        node.name().unwrap_or("-"),
        content.width,
        content.height,
        outer.width,
        outer.height
    );

    node.geometry.measured = outer;
    node.geometry.size = outer;
    node.dirty = false;
    outer
}

/// Content size of a box without children.
fn leaf_content(style: &ResolvedStyle, config: &LayoutConfig) -> Size {
    let pick = |axis: Axis| {
        style
            .explicit
            .get(axis)
            .or(style.min.get(axis))
            .unwrap_or(config.default_size.main(axis))
    };
    Size::new(pick(Axis::Horizontal), pick(Axis::Vertical))
}

/// Main-axis extent after which children wrap, if the container wraps.
pub(crate) fn wrap_limit(style: &ResolvedStyle) -> Option<f32> {
    if !style.wrap {
        return None;
    }
    match style.algorithm {
        LayoutAlgorithm::StackedColumn => style.max.height.or(style.explicit.height),
        _ => {
            let axis = style.main_axis();
            style.explicit.get(axis).or(style.max.get(axis))
        }
    }
}

/// Content size of a container from its children's outer sizes.
fn container_content(style: &ResolvedStyle, children: &[Size]) -> Size {
    let axis = style.main_axis();
    let gap = style.gap;

    let mains: Vec<f32> = children.iter().map(|s| s.main(axis)).collect();
    let lines = partition_lines(&mains, gap, wrap_limit(style));

    let main = lines
        .iter()
        .map(|line| line_extent(mains[line.clone()].iter().copied(), gap))
        .fold(0.0, f32::max);
    let cross = line_extent(
        lines
            .iter()
            .map(|line| children[line.clone()].iter().map(|s| s.cross(axis)).fold(0.0, f32::max)),
        gap,
    );
    let aggregate = Size::from_axes(axis, main, cross);

    let resolve = |a: Axis| match style.explicit.get(a) {
        Some(explicit) => explicit,
        None => {
            let mut value = aggregate.main(a);
            if let Some(max) = style.max.get(a) {
                value = value.min(max);
            }
            if let Some(min) = style.min.get(a) {
                value = value.max(min);
            }
            value
        }
    };
    Size::new(resolve(Axis::Horizontal), resolve(Axis::Vertical))
}
