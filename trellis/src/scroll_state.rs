//! Scroll State
//!
//! Offset and bounds for a single scroll container. The offset is clamped
//! per axis to `0..=max(0, content - viewport)`; content that fits its
//! viewport never scrolls.

use serde::Serialize;

use crate::primitives::{Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollState {
    /// Current offset (0 = start of the content).
    pub offset: Point,
    /// Extent of the arranged children.
    pub content: Size,
    /// Visible content box of the container.
    pub viewport: Size,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest valid offset on each axis.
    pub fn max_offset(&self) -> Point {
        Point::new(
            (self.content.width - self.viewport.width).max(0.0),
            (self.content.height - self.viewport.height).max(0.0),
        )
    }

    /// Scroll by a pixel delta (positive = toward the end of the content).
    pub fn scroll_by(&mut self, dx: f32, dy: f32) {
        let max = self.max_offset();
        self.offset = Point::new(
            (self.offset.x + dx).clamp(0.0, max.x),
            (self.offset.y + dy).clamp(0.0, max.y),
        );
    }

    pub fn scroll_to(&mut self, offset: Point) {
        self.offset = offset;
        self.clamp();
    }

    /// Refresh bounds after arrange, keeping the offset valid.
    pub fn set_bounds(&mut self, content: Size, viewport: Size) {
        self.content = content;
        self.viewport = viewport;
        self.clamp();
    }

    fn clamp(&mut self) {
        let max = self.max_offset();
        self.offset = Point::new(self.offset.x.clamp(0.0, max.x), self.offset.y.clamp(0.0, max.y));
    }

    pub fn can_scroll(&self) -> bool {
        let max = self.max_offset();
        max.x > 0.0 || max.y > 0.0
    }
}
