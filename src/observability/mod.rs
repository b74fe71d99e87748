//! Observability module
//!
//! Logging setup and the per-run summary.

pub mod logging;
pub mod summary;

pub use logging::init_logging;
pub use summary::{RunSummary, SectionStatus, SectionSummary};
