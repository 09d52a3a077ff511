//! Layout passes.
//!
//! ```text
//! measure (bottom-up sizes) -> arrange (top-down positions, per container) -> paint
//! ```
//!
//! Measure caches per node and only revisits dirty subtrees. Arrange runs
//! every pass and always restarts from the measured sizes.

pub mod arrange;
pub mod flex;
pub mod measure;

pub use arrange::{arrange, arrange_children};
pub use flex::{FlexItem, GrowLimits};
pub use measure::measure;
