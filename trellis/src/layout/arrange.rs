//! Arrange pass: top-down positions.
//!
//! `arrange_children` places the direct children of one container inside
//! its content box; `arrange` does that and recurses. A child is arranged
//! only after its own position and size are fixed.
//!
//! Every pass starts from `geometry.measured`, so running it twice yields
//! the same geometry as running it once.

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::node::LayoutNode;
use crate::primitives::{Axis, Point, Size};
use crate::style::LayoutAlgorithm;

use super::flex::{
    FlexItem, GrowLimits, align_offset, distribute_grow, justify_offsets, line_cross, line_extent,
    partition_lines,
};
use super::measure::wrap_limit;

/// Arrange `node`'s children, then recurse into each of them.
///
/// Leaf nodes have nothing to arrange and are skipped.
pub fn arrange(node: &mut LayoutNode, config: &LayoutConfig) -> Result<()> {
    if node.algorithm() == LayoutAlgorithm::Leaf {
        return Ok(());
    }
    arrange_children(node, config)?;
    for child in node.children_mut() {
        arrange(child, config)?;
    }
    Ok(())
}

/// Position and size the direct children of `node`.
pub fn arrange_children(node: &mut LayoutNode, config: &LayoutConfig) -> Result<()> {
    match node.algorithm() {
        LayoutAlgorithm::Leaf => Err(LayoutError::NotImplemented {
            operation: "arrange",
            algorithm: LayoutAlgorithm::Leaf,
        }),
        LayoutAlgorithm::RowColumnFlex => {
            arrange_flex(node, config);
            Ok(())
        }
        LayoutAlgorithm::StackedColumn => {
            arrange_stacked(node);
            Ok(())
        }
    }
}

fn grow_limits(child: &LayoutNode, axis: Axis, config: &LayoutConfig) -> GrowLimits {
    let style = child.resolved();
    GrowLimits {
        min: style.min.get(axis).unwrap_or(config.min_grow_size),
        max: style.max.get(axis),
        extras: style.extras().main(axis),
    }
}

/// Store the children's extent and refresh scroll bounds; returns the offset to apply.
fn update_scroll(node: &mut LayoutNode, content_extent: Size, viewport: Size) -> Point {
    node.geometry.content_extent = content_extent;
    match node.scroll_state_mut() {
        Some(scroll) => {
            scroll.set_bounds(content_extent, viewport);
            scroll.offset
        }
        None => Point::ORIGIN,
    }
}

fn arrange_flex(node: &mut LayoutNode, config: &LayoutConfig) {
    let style = node.resolved();
    let axis = style.main_axis();
    let (gap, align, justify) = (style.gap, style.align, style.justify);
    let wraps = style.wrap;
    // Overflow in a scroller has to stay within the scrollable range.
    let scrollable = node.is_scrollable();
    let leftover = |space: f32| if scrollable { space.max(0.0) } else { space };
    let content = node.content_box();
    let main_extent = content.size().main(axis);
    let cross_extent = content.size().cross(axis);

    let mut items: Vec<FlexItem> = node
        .children()
        .iter()
        .map(|child| {
            let measured = child.geometry().measured;
            FlexItem {
                main: measured.main(axis),
                cross: measured.cross(axis),
                grows: child.resolved().grows_along(axis),
                limits: grow_limits(child, axis, config),
            }
        })
        .collect();

    let mains: Vec<f32> = items.iter().map(|item| item.main).collect();
    let lines = partition_lines(&mains, gap, wraps.then_some(main_extent));

    for line in &lines {
        distribute_grow(&mut items[line.clone()], main_extent, gap);
    }

    let crosses: Vec<f32> = lines.iter().map(|line| line_cross(&items[line.clone()])).collect();
    let extents: Vec<f32> = lines
        .iter()
        .map(|line| line_extent(items[line.clone()].iter().map(|item| item.main), gap))
        .collect();
    let total_cross = line_extent(crosses.iter().copied(), gap);
    let widest = extents.iter().copied().fold(0.0, f32::max);

    let scroll = update_scroll(node, Size::from_axes(axis, widest, total_cross), content.size());

    let origin = content.origin();
    let mut cross_cursor = origin.cross(axis) + align_offset(align, leftover(cross_extent - total_cross));
    let children = node.children_mut();

    for ((line, &cross), &extent) in lines.iter().zip(&crosses).zip(&extents) {
        let (start, spacing) = justify_offsets(justify, leftover(main_extent - extent), gap, line.len());
        let mut main_cursor = origin.main(axis) + start;

        for index in line.clone() {
            let item = items[index];
            let child = &mut children[index];
            child.geometry.size = Size::from_axes(axis, item.main, item.cross);
            child.geometry.position = Point::from_axes(
                axis,
                main_cursor - scroll.main(axis),
                cross_cursor - scroll.cross(axis),
            );
            main_cursor += item.main + spacing;
        }
        cross_cursor += cross + gap;
    }

    tracing::debug!(
        "arranged {} children of {} in {} line(s)",
        items.len(),
        node.id(),
        lines.len()
    );
}

/// Column-major stacking that starts a new column when the next child would
/// pass the wrap height.
fn arrange_stacked(node: &mut LayoutNode) {
    let gap = node.resolved().gap;
    let limit = wrap_limit(node.resolved());
    let content = node.content_box();

    let sizes: Vec<Size> = node.children().iter().map(|c| c.geometry().measured).collect();
    let heights: Vec<f32> = sizes.iter().map(|s| s.height).collect();
    let columns = partition_lines(&heights, gap, limit);

    let widths: Vec<f32> = columns
        .iter()
        .map(|column| sizes[column.clone()].iter().map(|s| s.width).fold(0.0, f32::max))
        .collect();
    let tallest = columns
        .iter()
        .map(|column| line_extent(heights[column.clone()].iter().copied(), gap))
        .fold(0.0, f32::max);
    let extent = Size::new(line_extent(widths.iter().copied(), gap), tallest);

    let scroll = update_scroll(node, extent, content.size());
    let children = node.children_mut();

    let mut x = content.x;
    for (column, width) in columns.iter().zip(&widths) {
        let mut y = content.y;
        for index in column.clone() {
            let child = &mut children[index];
            child.geometry.size = sizes[index];
            child.geometry.position = Point::new(x - scroll.x, y - scroll.y);
            y += sizes[index].height + gap;
        }
        x += width + gap;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Align, FlexDirection, FlexWrap, Justify, SizeSpec, Style};

    fn leaf(width: f32, height: f32) -> LayoutNode {
        LayoutNode::new(Style::leaf(width, height)).unwrap()
    }

    fn layout(mut root: LayoutNode) -> LayoutNode {
        let config = LayoutConfig::default();
        root.measure(&config);
        root.arrange(&config).unwrap();
        root
    }

    fn positions(node: &LayoutNode) -> Vec<Point> {
        node.children().iter().map(|c| c.position()).collect()
    }

    #[test]
    fn wraps_into_lines() {
        let mut row = LayoutNode::new(Style::new().size(220.0, 200.0).wrap(FlexWrap::Wrap).gap(10.0)).unwrap();
        for _ in 0..3 {
            row.add_child(leaf(100.0, 50.0)).unwrap();
        }
        let row = layout(row);
        assert_eq!(
            positions(&row),
            vec![Point::new(0.0, 0.0), Point::new(110.0, 0.0), Point::new(0.0, 60.0)]
        );
    }

    #[test]
    fn grow_fills_and_respects_max() {
        let grower = || LayoutNode::new(Style::new().grows(true).min(SizeSpec::height(20.0_f32))).unwrap();

        let row = LayoutNode::new(Style::new().size(400.0, 50.0))
            .unwrap()
            .child(leaf(100.0, 20.0))
            .unwrap()
            .child(grower())
            .unwrap();
        let row = layout(row);
        assert_eq!(row.children()[1].size().width, 300.0);
        assert_eq!(row.children()[1].position().x, 100.0);

        let capped = LayoutNode::new(Style::new().grows(true).max(SizeSpec::width(250.0_f32))).unwrap();
        let row = LayoutNode::new(Style::new().size(400.0, 50.0))
            .unwrap()
            .child(leaf(100.0, 20.0))
            .unwrap()
            .child(capped)
            .unwrap();
        let row = layout(row);
        assert_eq!(row.children()[1].size().width, 250.0);
    }

    #[test]
    fn explicit_size_beats_grow() {
        let fixed = LayoutNode::new(Style::new().grows(true).size(60.0, 20.0)).unwrap();
        let row = LayoutNode::new(Style::new().size(400.0, 50.0)).unwrap().child(fixed).unwrap();
        let row = layout(row);
        assert_eq!(row.children()[0].size().width, 60.0);
    }

    #[test]
    fn repeated_passes_are_idempotent() {
        let grower = LayoutNode::new(Style::new().grows(true).padding(3.0)).unwrap();
        let mut row = LayoutNode::new(Style::new().size(400.0, 50.0).justify(Justify::SpaceEvenly))
            .unwrap()
            .child(leaf(50.0, 20.0))
            .unwrap()
            .child(grower)
            .unwrap();
        let config = LayoutConfig::default();
        row.measure(&config);
        row.arrange(&config).unwrap();
        let first = row.snapshot();
        row.arrange(&config).unwrap();
        row.arrange(&config).unwrap();
        assert_eq!(row.snapshot(), first);
    }

    #[test]
    fn justify_and_align_in_a_column() {
        let column = LayoutNode::new(
            Style::new()
                .direction(FlexDirection::Column)
                .size(100.0, 100.0)
                .justify(Justify::End)
                .align(Align::Center),
        )
        .unwrap()
        .child(leaf(20.0, 30.0))
        .unwrap();
        let column = layout(column);
        assert_eq!(positions(&column), vec![Point::new(40.0, 70.0)]);
    }

    #[test]
    fn space_between_with_one_child_stays_at_start() {
        let row = LayoutNode::new(Style::new().size(300.0, 50.0).justify(Justify::SpaceBetween))
            .unwrap()
            .child(leaf(20.0, 20.0))
            .unwrap();
        let row = layout(row);
        assert_eq!(positions(&row), vec![Point::ORIGIN]);
    }

    #[test]
    fn children_start_at_the_content_origin() {
        let row = LayoutNode::new(Style::new().position(10.0, 20.0).padding([1.0, 2.0]).margin(4.0))
            .unwrap()
            .child(leaf(20.0, 20.0))
            .unwrap();
        let row = layout(row);
        assert_eq!(positions(&row), vec![Point::new(10.0 + 2.0 + 4.0, 20.0 + 1.0 + 4.0)]);
    }

    #[test]
    fn stacked_column_places_columns_side_by_side() {
        let mut stack = LayoutNode::new(
            Style::new()
                .algorithm(LayoutAlgorithm::StackedColumn)
                .wrap(FlexWrap::Wrap)
                .gap(10.0)
                .max(SizeSpec::height(100.0_f32)),
        )
        .unwrap();
        for width in [30.0, 40.0, 50.0] {
            stack.add_child(leaf(width, 45.0)).unwrap();
        }
        let stack = layout(stack);
        assert_eq!(
            positions(&stack),
            vec![Point::new(0.0, 0.0), Point::new(0.0, 55.0), Point::new(50.0, 0.0)]
        );
        assert_eq!(stack.geometry().content_extent, Size::new(100.0, 100.0));
    }

    #[test]
    fn stacked_column_without_wrap_overflows_downward() {
        let mut stack = LayoutNode::new(
            Style::new()
                .algorithm(LayoutAlgorithm::StackedColumn)
                .size(100.0, 100.0)
                .gap(10.0),
        )
        .unwrap();
        for _ in 0..3 {
            stack.add_child(leaf(30.0, 45.0)).unwrap();
        }
        let stack = layout(stack);
        assert_eq!(
            positions(&stack),
            vec![Point::new(0.0, 0.0), Point::new(0.0, 55.0), Point::new(0.0, 110.0)]
        );
    }

    fn wrapped_row(align: Align) -> LayoutNode {
        let mut row = LayoutNode::new(
            Style::new()
                .size(220.0, 300.0)
                .wrap(FlexWrap::Wrap)
                .gap(10.0)
                .align(align),
        )
        .unwrap();
        for _ in 0..3 {
            row.add_child(leaf(100.0, 50.0)).unwrap();
        }
        layout(row)
    }

    #[test]
    fn align_shifts_all_wrapped_lines_together() {
        // lines take 50 + 10 + 50 = 110 of 300
        let centered = wrapped_row(Align::Center);
        assert_eq!(
            positions(&centered),
            vec![Point::new(0.0, 95.0), Point::new(110.0, 95.0), Point::new(0.0, 155.0)]
        );

        let ended = wrapped_row(Align::End);
        assert_eq!(
            positions(&ended),
            vec![Point::new(0.0, 190.0), Point::new(110.0, 190.0), Point::new(0.0, 250.0)]
        );
    }

    #[test]
    fn overflowing_scroller_keeps_every_child_reachable() {
        let mut list = LayoutNode::new(
            Style::new()
                .direction(FlexDirection::Column)
                .size(100.0, 100.0)
                .justify(Justify::End)
                .align(Align::End)
                .scrollable(true),
        )
        .unwrap();
        for _ in 0..4 {
            list.add_child(leaf(200.0, 50.0)).unwrap();
        }
        let config = LayoutConfig::default();
        let mut list = layout(list);
        assert_eq!(list.children()[0].position(), Point::ORIGIN);

        list.scroll_state_mut().unwrap().scroll_by(500.0, 500.0);
        list.arrange(&config).unwrap();
        assert_eq!(list.scroll_offset(), Point::new(100.0, 100.0));
        assert_eq!(list.children()[3].position(), Point::new(-100.0, 50.0));
    }

    #[test]
    fn leaf_cannot_arrange() {
        let mut node = leaf(10.0, 10.0);
        let err = arrange_children(&mut node, &LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, LayoutError::NotImplemented { operation: "arrange", .. }));
        assert!(arrange(&mut node, &LayoutConfig::default()).is_ok());
    }
}
