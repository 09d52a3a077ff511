//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::primitives::Size;

/// Tunables shared by every pass over a tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Content size of a box with neither `size` nor `min` set.
    pub default_size: Size,

    /// Floor for a growing child's main-axis size when it has no `min`.
    pub min_grow_size: f32,

    /// Pixels scrolled per wheel line.
    pub wheel_line_height: f32,

    /// Canvas size used for `vw`/`vh` and percentage lengths.
    pub viewport: Size,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_size: Size::new(100.0, 100.0),
            min_grow_size: 1.0,
            wheel_line_height: 40.0,
            viewport: Size::new(1200.0, 800.0),
        }
    }
}

impl LayoutConfig {
    /// Parse a config, filling absent fields from `Default`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }
}
