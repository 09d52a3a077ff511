//! Layout error types.

use thiserror::Error;

use crate::node::NodeId;
use crate::style::LayoutAlgorithm;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid color: {channel} channel {value} is outside {min}..={max}")]
    InvalidColor {
        channel: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("invalid color format: {0}")]
    InvalidColorFormat(String),

    #[error("{operation} is not implemented for {algorithm} nodes")]
    NotImplemented {
        operation: &'static str,
        algorithm: LayoutAlgorithm,
    },

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
