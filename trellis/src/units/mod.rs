//! Value providers consumed by style resolution: colors and lengths.

pub mod color;
pub mod length;

pub use color::{Color, ColorSpec, Hsla, resolve_color};
pub use length::{LengthSpec, resolve_length};
