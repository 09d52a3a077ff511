//! Painting interface.
//!
//! Layout does not rasterize anything. During `LayoutTree::draw` each
//! visible node hands a `BoxPaint` to a `Painter`; scrollable containers
//! bracket their children with `push_clip`/`pop_clip`. `DisplayList` records
//! the calls, which is what tests and headless callers use.

use serde::{Deserialize, Serialize};

use crate::box_model::CornerRadii;
use crate::node::NodeId;
use crate::primitives::Rect;
use crate::style::{Background, Stroke};

/// Line style for borders and outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    /// Repeating dash-gap pattern.
    Dashed,
    /// Repeating dot-gap pattern.
    Dotted,
}

/// Everything needed to draw one box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPaint {
    pub id: NodeId,
    pub name: Option<String>,
    /// Border box: the outer box without its margin.
    pub rect: Rect,
    pub background: Background,
    pub border: Option<Stroke>,
    pub outline: Option<Stroke>,
    pub radii: CornerRadii,
}

impl BoxPaint {
    /// Centerline of the border stroke.
    pub fn border_stroke_rect(&self) -> Option<Rect> {
        self.border.map(|b| self.rect.inset(b.width / 2.0))
    }

    /// Centerline of the outline stroke, drawn just outside the border box.
    pub fn outline_stroke_rect(&self) -> Option<Rect> {
        self.outline.map(|o| self.rect.inset(-o.width / 2.0))
    }
}

/// Receiver of draw calls, in paint order.
pub trait Painter {
    fn draw_box(&mut self, paint: &BoxPaint);

    /// Clip every following call until the matching `pop_clip`.
    fn push_clip(&mut self, rect: Rect);

    fn pop_clip(&mut self);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PaintCommand {
    Box(BoxPaint),
    PushClip(Rect),
    PopClip,
}

/// A `Painter` that records every call.
#[derive(Debug, Default)]
pub struct DisplayList {
    commands: Vec<PaintCommand>,
    clip_stack: Vec<Rect>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Painted boxes in paint order.
    pub fn boxes(&self) -> impl Iterator<Item = &BoxPaint> {
        self.commands.iter().filter_map(|cmd| match cmd {
            PaintCommand::Box(paint) => Some(paint),
            _ => None,
        })
    }

    pub fn find(&self, id: NodeId) -> Option<&BoxPaint> {
        self.boxes().find(|paint| paint.id == id)
    }

    /// Intersection of the active clips, if any.
    pub fn current_clip(&self) -> Option<Rect> {
        let mut stack = self.clip_stack.iter();
        let first = *stack.next()?;
        Some(stack.fold(first, |acc, rect| {
            let x = acc.x.max(rect.x);
            let y = acc.y.max(rect.y);
            let right = acc.right().min(rect.right());
            let bottom = acc.bottom().min(rect.bottom());
            Rect::new(x, y, (right - x).max(0.0), (bottom - y).max(0.0))
        }))
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.clip_stack.clear();
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(&self.commands)?)
    }
}

impl Painter for DisplayList {
    fn draw_box(&mut self, paint: &BoxPaint) {
        self.commands.push(PaintCommand::Box(paint.clone()));
    }

    fn push_clip(&mut self, rect: Rect) {
        self.clip_stack.push(rect);
        self.commands.push(PaintCommand::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        if self.clip_stack.pop().is_none() {
            tracing::warn!("pop_clip without a matching push_clip");
            return;
        }
        self.commands.push(PaintCommand::PopClip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Color;

    fn paint(rect: Rect, border: Option<Stroke>) -> BoxPaint {
        BoxPaint {
            id: NodeId::new(),
            name: None,
            rect,
            background: Background::default(),
            border,
            outline: None,
            radii: CornerRadii::default(),
        }
    }

    #[test]
    fn records_in_order() {
        let mut list = DisplayList::new();
        let a = paint(Rect::new(0.0, 0.0, 10.0, 10.0), None);
        list.draw_box(&a);
        list.push_clip(Rect::new(0.0, 0.0, 5.0, 5.0));
        list.pop_clip();

        assert_eq!(list.commands().len(), 3);
        assert!(matches!(list.commands()[1], PaintCommand::PushClip(_)));
        assert_eq!(list.find(a.id), Some(&a));
    }

    #[test]
    fn nested_clips_intersect() {
        let mut list = DisplayList::new();
        assert_eq!(list.current_clip(), None);
        list.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
        list.push_clip(Rect::new(50.0, 50.0, 100.0, 100.0));
        assert_eq!(list.current_clip(), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));
        list.pop_clip();
        list.pop_clip();
        list.pop_clip();
        assert_eq!(list.commands().len(), 4);
    }

    #[test]
    fn border_stroke_is_centered_inside_the_box() {
        let stroke = Stroke {
            width: 4.0,
            style: LineStyle::Dotted,
            color: Color::BLACK,
            gap: 4.0,
        };
        let p = paint(Rect::new(10.0, 10.0, 100.0, 50.0), Some(stroke));
        assert_eq!(p.border_stroke_rect(), Some(Rect::new(12.0, 12.0, 96.0, 46.0)));
        assert_eq!(p.outline_stroke_rect(), None);
    }
}
