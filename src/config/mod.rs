//! Configuration module
//!
//! Loading and validation of the optional `tokenjack.yaml` project file.

pub mod loader;
pub mod schema;

pub use loader::{ConfigLoader, LoadResult, LoadWarning};
pub use schema::*;
