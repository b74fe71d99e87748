//! Hosted repository sink.
//!
//! Pushes each section artifact as its own commit through the contents API.

use async_trait::async_trait;
use chrono::Utc;

use super::{OutputSink, Section, WriteStatus};
use crate::error::OutputError;
use crate::github::{GitHubClient, RepoFile};

/// A directory inside a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDir {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Directory within the repository; empty for the root.
    pub dir: String,
    /// Target branch; `None` for the default branch.
    pub branch: Option<String>,
}

impl RepoDir {
    /// The repository file for `section` inside this directory.
    #[must_use]
    pub fn file_for(&self, section: Section) -> RepoFile {
        let dir = self.dir.trim_matches('/');
        let path = if dir.is_empty() {
            section.file_name().to_string()
        } else {
            format!("{dir}/{}", section.file_name())
        };
        RepoFile {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            path,
            reference: self.branch.clone(),
        }
    }
}

impl std::fmt::Display for RepoDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "github:{}/{}/{}", self.owner, self.repo, self.dir.trim_matches('/'))?;
        if let Some(branch) = &self.branch {
            write!(f, "@{branch}")?;
        }
        Ok(())
    }
}

/// Pushes section artifacts to a repository directory.
#[derive(Debug, Clone)]
pub struct GitHubSink {
    client: GitHubClient,
    target: RepoDir,
    message: Option<String>,
}

impl GitHubSink {
    /// Creates a sink. `message` overrides the default commit message.
    #[must_use]
    pub const fn new(client: GitHubClient, target: RepoDir, message: Option<String>) -> Self {
        Self {
            client,
            target,
            message,
        }
    }

    fn commit_message(&self, section: Section) -> String {
        self.message.clone().unwrap_or_else(|| {
            format!(
                "chore(tokens): update {} ({})",
                section.file_name(),
                Utc::now().format("%Y-%m-%d")
            )
        })
    }
}

#[async_trait]
impl OutputSink for GitHubSink {
    fn describe(&self) -> String {
        self.target.to_string()
    }

    async fn write_section(
        &self,
        section: Section,
        contents: &[u8],
    ) -> Result<WriteStatus, OutputError> {
        let file = self.target.file_for(section);
        let remote_err = |error| OutputError::Remote {
            path: file.path.clone(),
            error,
        };

        let existing = self.client.get_file(&file).await.map_err(remote_err)?;
        if existing.as_ref().is_some_and(|e| e.content == contents) {
            return Ok(WriteStatus::Unchanged);
        }

        let sha = existing.as_ref().map(|e| e.sha.as_str());
        self.client
            .put_file(&file, contents, &self.commit_message(section), sha)
            .await
            .map_err(remote_err)?;
        Ok(WriteStatus::Written)
    }
}
