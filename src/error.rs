//! Error types for `TokenJack`
//!
//! Source acquisition errors abort a run before normalization. Output errors
//! are collected per section. Normalization itself never fails.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `TokenJack` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, missing env var, bad value)
    pub const CONFIG_ERROR: i32 = 2;

    /// Output error (one or more sections failed to persist)
    pub const OUTPUT_ERROR: i32 = 3;

    /// Token source could not be fetched
    pub const FETCH_ERROR: i32 = 4;

    /// Token source is not valid JSON or its root is not an object
    pub const PARSE_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `TokenJack` operations.
#[derive(Debug, Error)]
pub enum TokenJackError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Token source could not be obtained or parsed
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Output destination could not be prepared
    #[error(transparent)]
    Output(#[from] OutputError),

    /// One or more output sections failed to persist
    #[error("{failed} of {total} output sections failed: {}", .sections.join(", "))]
    PartialWrite {
        /// Number of failed sections
        failed: usize,
        /// Number of sections attempted
        total: usize,
        /// Names of the failed sections
        sections: Vec<String>,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TokenJackError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Source(err) => err.exit_code(),
            Self::Output(_) | Self::PartialWrite { .. } => ExitCode::OUTPUT_ERROR,
            Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Required setting is missing from both flags and configuration
    #[error("missing required setting '{field}' ({hint})")]
    MissingRequired {
        /// Name of the missing setting
        field: String,
        /// How to supply it
        hint: String,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Environment variable referenced in configuration is not set
    #[error("environment variable '{var}' not set ({message})")]
    EnvVarNotSet {
        /// Name of the environment variable
        var: String,
        /// Message supplied with the `${VAR:?message}` reference
        message: String,
    },
}

// ============================================================================
// Remote Errors
// ============================================================================

/// Classified failure of a hosted-repository request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFailure {
    /// No access token was configured
    MissingCredential,
    /// The token was rejected (401/403)
    Auth,
    /// The repository, reference, or file does not exist (404)
    NotFound,
    /// Any other non-success HTTP status
    Status(u16),
    /// Connection, DNS, or TLS failure
    Network,
    /// The request did not finish in time
    Timeout,
    /// The response body was not in the expected shape
    InvalidResponse,
}

impl RemoteFailure {
    /// Classifies a non-success HTTP status code.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Auth,
            404 => Self::NotFound,
            other => Self::Status(other),
        }
    }
}

impl std::fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredential => f.write_str("missing credential"),
            Self::Auth => f.write_str("authentication failed"),
            Self::NotFound => f.write_str("not found"),
            Self::Status(code) => write!(f, "HTTP {code}"),
            Self::Network => f.write_str("network error"),
            Self::Timeout => f.write_str("timed out"),
            Self::InvalidResponse => f.write_str("invalid response"),
        }
    }
}

/// A failed hosted-repository request.
#[derive(Debug, Clone, Error)]
#[error("{failure}: {detail}")]
pub struct RemoteError {
    /// What kind of failure occurred
    pub failure: RemoteFailure,
    /// Detail from the HTTP client or the server
    pub detail: String,
}

impl RemoteError {
    /// Creates a new remote error.
    pub fn new(failure: RemoteFailure, detail: impl Into<String>) -> Self {
        Self {
            failure,
            detail: detail.into(),
        }
    }
}

// ============================================================================
// Source Errors
// ============================================================================

/// Failures obtaining or parsing the token source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The remote source could not be fetched
    #[error("failed to fetch {location}: {error}")]
    Remote {
        /// Human-readable source location
        location: String,
        /// Classified remote failure
        error: RemoteError,
    },

    /// The local source file does not exist
    #[error("token source not found: {}", .path.display())]
    FileNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The local source file could not be read
    #[error("failed to read {}: {error}", .path.display())]
    Read {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        error: std::io::Error,
    },

    /// The source was obtained but is not a JSON object
    #[error("failed to parse {origin}: {message}")]
    Parse {
        /// Human-readable source location
        origin: String,
        /// What was wrong with the document
        message: String,
    },
}

impl SourceError {
    /// Returns `true` for acquisition failures, `false` for parse failures.
    #[must_use]
    pub const fn is_fetch(&self) -> bool {
        !matches!(self, Self::Parse { .. })
    }

    /// Returns the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.is_fetch() {
            ExitCode::FETCH_ERROR
        } else {
            ExitCode::PARSE_ERROR
        }
    }
}

// ============================================================================
// Output Errors
// ============================================================================

/// Failure persisting one output section.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Local file system failure
    #[error("failed to write {}: {error}", .path.display())]
    Io {
        /// Target path
        path: PathBuf,
        /// Underlying I/O error
        error: std::io::Error,
    },

    /// Section could not be serialized
    #[error("failed to serialize section: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Remote push failure
    #[error("failed to push {path}: {error}")]
    Remote {
        /// Target path within the repository
        path: String,
        /// Classified remote failure
        error: RemoteError,
    },
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `TokenJack` operations.
pub type Result<T> = std::result::Result<T, TokenJackError>;

// ============================================================================
// Tests
// ============================================================================
