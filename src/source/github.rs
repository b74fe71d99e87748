//! Hosted repository token source.

use async_trait::async_trait;

use super::SourceReader;
use crate::error::{RemoteError, RemoteFailure, SourceError};
use crate::github::{GitHubClient, RepoFile};

/// Reads the token document through the repository contents API.
#[derive(Debug, Clone)]
pub struct GitHubSource {
    client: GitHubClient,
    file: RepoFile,
}

impl GitHubSource {
    /// Creates a reader for `file`.
    #[must_use]
    pub const fn new(client: GitHubClient, file: RepoFile) -> Self {
        Self { client, file }
    }
}

#[async_trait]
impl SourceReader for GitHubSource {
    fn origin(&self) -> String {
        format!("github:{}", self.file)
    }

    async fn read_raw(&self) -> Result<Vec<u8>, SourceError> {
        let fetched = self
            .client
            .get_file(&self.file)
            .await
            .and_then(|file| {
                file.ok_or_else(|| {
                    RemoteError::new(RemoteFailure::NotFound, "file does not exist")
                })
            })
            .map_err(|error| SourceError::Remote {
                location: self.origin(),
                error,
            })?;
        Ok(fetched.content)
    }
}
