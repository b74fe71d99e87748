//! Local file token source.

use std::path::PathBuf;

use async_trait::async_trait;

use super::SourceReader;
use crate::error::SourceError;

/// Reads the token document from disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Creates a reader for `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl SourceReader for FileSource {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    async fn read_raw(&self) -> Result<Vec<u8>, SourceError> {
        tokio::fs::read(&self.path).await.map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                SourceError::FileNotFound {
                    path: self.path.clone(),
                }
            } else {
                SourceError::Read {
                    path: self.path.clone(),
                    error,
                }
            }
        })
    }
}
