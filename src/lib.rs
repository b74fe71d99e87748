//! `TokenJack` - design-token compiler
//!
//! Reads a nested design-token tree (legacy `value`/`type` or W3C
//! `$value`/`$type` dialect, optionally wrapped in a theme mode), sorts its
//! leaves into colors, spacing, typography, and border radius, and writes one
//! flat JSON file per section to a local directory or a hosted repository.

pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod observability;
pub mod output;
pub mod source;
pub mod tokens;
