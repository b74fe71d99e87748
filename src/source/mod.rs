//! Token source acquisition.
//!
//! A [`SourceReader`] produces the raw bytes of the token document; [`load`]
//! parses them into a [`TokenSource`]. Both steps run to completion before
//! normalization starts, and any failure aborts the run.

pub mod file;
pub mod github;

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SourceError;
use crate::github::{GitHubClient, GitHubSettings, RepoFile};

pub use file::FileSource;
pub use github::GitHubSource;

/// A parsed token document. Its root is always a JSON object.
pub type TokenSource = Value;

/// Where to read the token document from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// Local JSON file.
    File {
        /// Path to the file.
        path: PathBuf,
    },
    /// File inside a hosted repository.
    GitHub(RepoFile),
}

impl std::fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File { path } => write!(f, "{}", path.display()),
            Self::GitHub(file) => write!(f, "github:{file}"),
        }
    }
}

impl SourceSpec {
    /// Builds the reader for this location.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Remote` if the HTTP client cannot be built.
    pub fn open(&self, github: &GitHubSettings) -> Result<Box<dyn SourceReader>, SourceError> {
        match self {
            Self::File { path } => Ok(Box::new(FileSource::new(path.clone()))),
            Self::GitHub(file) => {
                let client =
                    GitHubClient::new(github.clone()).map_err(|error| SourceError::Remote {
                        location: self.to_string(),
                        error,
                    })?;
                Ok(Box::new(GitHubSource::new(client, file.clone())))
            }
        }
    }
}

/// Something that can produce the raw token document.
#[async_trait]
pub trait SourceReader: Send + Sync {
    /// Human-readable location, used in logs and errors.
    fn origin(&self) -> String;

    /// Reads the whole document.
    ///
    /// # Errors
    ///
    /// Returns a fetch-class [`SourceError`] when the document cannot be
    /// obtained.
    async fn read_raw(&self) -> Result<Vec<u8>, SourceError>;
}

/// Reads and parses a token document.
///
/// # Errors
///
/// Returns the reader's fetch error, or `SourceError::Parse` when the bytes
/// are not JSON or the root is not an object.
pub async fn load(reader: &dyn SourceReader) -> Result<TokenSource, SourceError> {
    let origin = reader.origin();
    tracing::info!(source = %origin, "reading token source");
    let bytes = reader.read_raw().await?;
    tracing::debug!(source = %origin, bytes = bytes.len(), "token source read");
    parse(&bytes, &origin)
}

/// Parses raw bytes into a token source.
///
/// # Errors
///
/// Returns `SourceError::Parse` for invalid JSON or a non-object root.
pub fn parse(bytes: &[u8], origin: &str) -> Result<TokenSource, SourceError> {
    let bytes = bytes.strip_prefix("\u{feff}".as_bytes()).unwrap_or(bytes);
    let value: Value = serde_json::from_slice(bytes).map_err(|e| SourceError::Parse {
        origin: origin.to_string(),
        message: e.to_string(),
    })?;

    if !value.is_object() {
        return Err(SourceError::Parse {
            origin: origin.to_string(),
            message: format!("root must be an object, found {}", json_kind(&value)),
        });
    }
    Ok(value)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
