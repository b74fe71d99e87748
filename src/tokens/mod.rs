//! Design-token normalization.
//!
//! Converts a nested token tree into a [`NormalizedTokenSet`]: colors grouped
//! by palette and shade, spacing, typography, and border radius.

pub mod classify;
pub mod model;
pub mod normalizer;

pub use classify::Category;
pub use model::{NormalizedTokenSet, Scalar, TokenLeaf, TokenMap, Typography};
pub use normalizer::{DropReason, DroppedLeaf, Normalized, normalize, normalize_with_report};
