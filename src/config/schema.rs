//! Configuration schema types
//!
//! Deserialized from the optional project configuration file
//! (`tokenjack.yaml`). Every field is optional; command-line flags fill in or
//! override what the file leaves out.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default GitHub REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Default timeout for a single remote request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default local output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "tokens";

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root of a project configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct ProjectConfig {
    /// Where the token source comes from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceConfig>,

    /// Where normalized artifacts go.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,

    /// Hosted repository API settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<GitHubConfig>,
}

// ============================================================================
// Source
// ============================================================================

/// Token source location. Exactly one of `file` or `github` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct SourceConfig {
    /// Local JSON file, relative to the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// File inside a hosted repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<RepoFileConfig>,
}

/// A file inside a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct RepoFileConfig {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub repo: String,

    /// Path of the file within the repository.
    pub path: String,

    /// Branch, tag, or commit. Defaults to the repository's default branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

// ============================================================================
// Output
// ============================================================================

/// Output destinations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct OutputConfig {
    /// Local directory for `normalize`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Repository directory for `push`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<RepoDirConfig>,
}

/// A directory inside a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct RepoDirConfig {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub repo: String,

    /// Directory within the repository; empty means the repository root.
    #[serde(default)]
    pub dir: String,

    /// Branch to commit to. Defaults to the repository's default branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

// ============================================================================
// GitHub
// ============================================================================

/// Hosted repository API settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct GitHubConfig {
    /// Access token. Usually `${GITHUB_TOKEN}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}
