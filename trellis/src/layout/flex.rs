//! Shared flex math for rows, columns and stacked columns.
//!
//! Everything here is axis-agnostic: callers project child sizes onto the
//! main/cross axes, run the distribution, and project the results back. No
//! function here touches a node.

use std::ops::Range;

use crate::style::{Align, Justify};

/// Grow bounds for one child along the main axis, in content terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowLimits {
    pub min: f32,
    pub max: Option<f32>,
    /// Padding, border and margin along the main axis.
    pub extras: f32,
}

impl GrowLimits {
    /// Apply the bounds to a share of leftover space. `max` wins over `min`.
    pub fn apply(&self, share: f32) -> f32 {
        let grown = share.max(self.min + self.extras);
        match self.max {
            Some(max) => grown.min(max + self.extras),
            None => grown,
        }
    }
}

/// One child projected onto the container's axes. Sizes are outer sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexItem {
    pub main: f32,
    pub cross: f32,
    pub grows: bool,
    pub limits: GrowLimits,
}

impl FlexItem {
    pub fn fixed(main: f32, cross: f32) -> Self {
        Self {
            main,
            cross,
            grows: false,
            limits: GrowLimits {
                min: 0.0,
                max: None,
                extras: 0.0,
            },
        }
    }
}

/// Split children into lines.
///
/// With a `limit`, a line closes when the next child would push the running
/// extent past it. The first child of a line is always accepted, so no line
/// is empty and an oversized child gets a line of its own.
pub fn partition_lines(mains: &[f32], gap: f32, limit: Option<f32>) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut running = 0.0;

    for (i, &main) in mains.iter().enumerate() {
        if i == start {
            running = main;
            continue;
        }
        if let Some(limit) = limit {
            if running + gap + main > limit {
                lines.push(start..i);
                start = i;
                running = main;
                continue;
            }
        }
        running += gap + main;
    }
    if start < mains.len() {
        lines.push(start..mains.len());
    }
    lines
}

/// Sum of extents plus a gap between each pair.
pub fn line_extent(sizes: impl IntoIterator<Item = f32>, gap: f32) -> f32 {
    let (sum, count) = sizes.into_iter().fold((0.0, 0usize), |(sum, n), s| (sum + s, n + 1));
    sum + gap * count.saturating_sub(1) as f32
}

/// Cross size of a line: its tallest item.
pub fn line_cross(items: &[FlexItem]) -> f32 {
    items.iter().map(|item| item.cross).fold(0.0, f32::max)
}

/// Hand leftover main-axis space to the growing items of one line.
///
/// Returns false, leaving the items untouched, when the space to share is
/// not finite and positive.
pub fn distribute_grow(items: &mut [FlexItem], main_extent: f32, gap: f32) -> bool {
    let growing = items.iter().filter(|item| item.grows).count();
    if growing == 0 {
        return true;
    }

    let fixed: f32 = items.iter().filter(|item| !item.grows).map(|item| item.main).sum();
    let available = main_extent - fixed - gap * (items.len() - 1) as f32;
    if !available.is_finite() || available <= 0.0 {
        tracing::warn!("no space to grow into (available {}), keeping measured sizes", available);
        return false;
    }

    let share = available / growing as f32;
    for item in items.iter_mut().filter(|item| item.grows) {
        item.main = item.limits.apply(share);
    }
    true
}

/// Start offset and spacing between items for a line.
///
/// `leftover` is the container's main extent minus the line's extent.
/// Distribution modes ignore negative leftover; `center` and `end` do not.
pub fn justify_offsets(justify: Justify, leftover: f32, gap: f32, count: usize) -> (f32, f32) {
    let free = leftover.max(0.0);
    let n = count as f32;
    match justify {
        Justify::Start => (0.0, gap),
        Justify::Center => (leftover / 2.0, gap),
        Justify::End => (leftover, gap),
        Justify::SpaceBetween if count > 1 => (0.0, gap + free / (n - 1.0)),
        Justify::SpaceBetween => (0.0, gap),
        Justify::SpaceAround if count > 0 => {
            let extra = free / n;
            (extra / 2.0, gap + extra)
        }
        Justify::SpaceEvenly => {
            let extra = free / (n + 1.0);
            (extra, gap + extra)
        }
        Justify::SpaceAround => (0.0, gap),
    }
}

/// Cross-axis shift of the whole set of lines.
pub fn align_offset(align: Align, leftover: f32) -> f32 {
    match align {
        Align::Start => 0.0,
        Align::Center => leftover / 2.0,
        Align::End => leftover,
    }
}
