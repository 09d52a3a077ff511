//! Pointer input routed through the hit tester.

use serde::{Deserialize, Serialize};

use crate::primitives::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Wheel delta. Positive values move the content toward its end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScrollDelta {
    /// Discrete wheel notches.
    Lines { x: f32, y: f32 },

    /// Smooth scrolling, e.g. a trackpad.
    Pixels { x: f32, y: f32 },
}

impl ScrollDelta {
    /// Delta in pixels, converting lines with `line_height`.
    pub fn to_pixels(self, line_height: f32) -> Point {
        match self {
            ScrollDelta::Lines { x, y } => Point::new(x * line_height, y * line_height),
            ScrollDelta::Pixels { x, y } => Point::new(x, y),
        }
    }
}

/// Pointer events with absolute canvas positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    ButtonPressed { button: MouseButton, position: Point },

    ButtonReleased { button: MouseButton, position: Point },

    CursorMoved { position: Point },

    WheelScrolled { delta: ScrollDelta, position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::ButtonPressed { position, .. }
            | PointerEvent::ButtonReleased { position, .. }
            | PointerEvent::CursorMoved { position }
            | PointerEvent::WheelScrolled { position, .. } => *position,
        }
    }

    pub fn wheel(x: f32, y: f32, delta: ScrollDelta) -> Self {
        PointerEvent::WheelScrolled {
            delta,
            position: Point::new(x, y),
        }
    }

    pub fn click(x: f32, y: f32) -> Self {
        PointerEvent::ButtonPressed {
            button: MouseButton::Left,
            position: Point::new(x, y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_scale_by_line_height() {
        let delta = ScrollDelta::Lines { x: 0.0, y: 2.0 };
        assert_eq!(delta.to_pixels(40.0), Point::new(0.0, 80.0));
        let delta = ScrollDelta::Pixels { x: 3.0, y: -5.0 };
        assert_eq!(delta.to_pixels(40.0), Point::new(3.0, -5.0));
    }

    #[test]
    fn every_event_has_a_position() {
        let wheel = PointerEvent::wheel(4.0, 5.0, ScrollDelta::Pixels { x: 0.0, y: 1.0 });
        assert_eq!(wheel.position(), Point::new(4.0, 5.0));
        let moved = PointerEvent::CursorMoved {
            position: Point::new(1.0, 2.0),
        };
        assert_eq!(moved.position(), Point::new(1.0, 2.0));
    }
}
