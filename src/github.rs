//! Hosted repository client (GitHub contents API).
//!
//! Used both to fetch the token source and to push normalized artifacts.
//! Every request is bounded by the configured timeout, and failures are
//! classified into [`RemoteFailure`] so callers can tell authentication
//! problems from missing files and network trouble.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::schema::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};
use crate::error::{RemoteError, RemoteFailure};

/// Maximum number of characters of an error body kept in error details.
const MAX_ERROR_DETAIL: usize = 200;

/// Connection settings for [`GitHubClient`].
#[derive(Debug, Clone)]
pub struct GitHubSettings {
    /// Access token; required for every request.
    pub token: Option<String>,
    /// REST API base URL.
    pub api_base: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// A file inside a hosted repository, optionally pinned to a ref.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFile {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Path within the repository.
    pub path: String,
    /// Branch, tag, or commit.
    pub reference: Option<String>,
}

impl std::fmt::Display for RepoFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}:{}", self.owner, self.repo, self.path)?;
        if let Some(reference) = &self.reference {
            write!(f, "@{reference}")?;
        }
        Ok(())
    }
}

/// Parses `owner/repo` into its two parts.
///
/// # Errors
///
/// Returns a message when the string is not exactly two non-empty parts.
pub fn parse_repo_slug(slug: &str) -> Result<(String, String), String> {
    match slug.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(format!("expected 'owner/repo', got '{slug}'")),
    }
}

/// A file fetched from the contents API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Blob SHA, needed to update the file.
    pub sha: String,
    /// Decoded file contents.
    pub content: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    encoding: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

/// Thin client over the repository contents endpoints.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    settings: GitHubSettings,
}

impl GitHubClient {
    /// Builds a client.
    ///
    /// # Errors
    ///
    /// Returns `RemoteFailure::Network` if the HTTP client cannot be built.
    pub fn new(settings: GitHubSettings) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::new(RemoteFailure::Network, e.to_string()))?;
        Ok(Self { http, settings })
    }

    /// Fetches a file. A missing file yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns a classified [`RemoteError`] for missing credentials, rejected
    /// credentials, non-success statuses, network failures, timeouts, and
    /// responses that are not a base64-encoded file.
    pub async fn get_file(&self, file: &RepoFile) -> Result<Option<RemoteFile>, RemoteError> {
        let token = self.token()?;
        let mut url = self.contents_url(file)?;
        if let Some(reference) = &file.reference {
            url.query_pairs_mut().append_pair("ref", reference);
        }

        debug!(%url, "fetching repository file");
        let request = self.authorized(self.http.get(url), token);
        let response = self.send(request).await?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        let body = self.read_success(response).await?;

        let contents: ContentsResponse = serde_json::from_slice(&body).map_err(|e| {
            RemoteError::new(
                RemoteFailure::InvalidResponse,
                format!("{file} is not a file: {e}"),
            )
        })?;
        if contents.kind != "file" || contents.encoding != "base64" {
            return Err(RemoteError::new(
                RemoteFailure::InvalidResponse,
                format!(
                    "{file}: unsupported content (type '{}', encoding '{}')",
                    contents.kind, contents.encoding
                ),
            ));
        }

        let content = decode_content(&contents.content)?;
        Ok(Some(RemoteFile {
            sha: contents.sha,
            content,
        }))
    }

    /// Creates or updates a file with a single commit.
    ///
    /// `sha` must be the current blob SHA when the file already exists.
    /// The file's `reference` is used as the target branch.
    ///
    /// # Errors
    ///
    /// Returns a classified [`RemoteError`] on any failure.
    pub async fn put_file(
        &self,
        file: &RepoFile,
        content: &[u8],
        message: &str,
        sha: Option<&str>,
    ) -> Result<(), RemoteError> {
        let token = self.token()?;
        let url = self.contents_url(file)?;
        let body = PutContentsRequest {
            message,
            content: STANDARD.encode(content),
            sha,
            branch: file.reference.as_deref(),
        };

        debug!(%url, bytes = content.len(), "pushing repository file");
        let request = self.authorized(self.http.put(url), token).json(&body);
        let response = self.send(request).await?;
        self.read_success(response).await?;
        Ok(())
    }

    fn token(&self) -> Result<&str, RemoteError> {
        self.settings
            .token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                RemoteError::new(
                    RemoteFailure::MissingCredential,
                    "set GITHUB_TOKEN, --token, or github.token",
                )
            })
    }

    fn contents_url(&self, file: &RepoFile) -> Result<Url, RemoteError> {
        let invalid = |detail: String| RemoteError::new(RemoteFailure::Network, detail);
        let mut url = Url::parse(&self.settings.api_base)
            .map_err(|e| invalid(format!("invalid API base '{}': {e}", self.settings.api_base)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| invalid(format!("invalid API base '{}'", self.settings.api_base)))?;
            segments
                .pop_if_empty()
                .extend(["repos", file.owner.as_str(), file.repo.as_str(), "contents"])
                .extend(file.path.split('/').filter(|s| !s.is_empty()));
        }
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request
            .bearer_auth(token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .timeout(self.settings.timeout)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        tokio::time::timeout(self.settings.timeout, request.send())
            .await
            .map_err(|_| timed_out(self.settings.timeout))?
            .map_err(classify_transport)
    }

    async fn read_success(&self, response: Response) -> Result<Vec<u8>, RemoteError> {
        let status = response.status();
        let body = tokio::time::timeout(self.settings.timeout, response.bytes())
            .await
            .map_err(|_| timed_out(self.settings.timeout))?
            .map_err(classify_transport)?;

        if !status.is_success() {
            return Err(RemoteError::new(
                RemoteFailure::from_status(status.as_u16()),
                error_detail(&body),
            ));
        }
        Ok(body.to_vec())
    }
}

fn timed_out(timeout: Duration) -> RemoteError {
    RemoteError::new(
        RemoteFailure::Timeout,
        format!("no response within {}s", timeout.as_secs()),
    )
}

fn classify_transport(err: reqwest::Error) -> RemoteError {
    let failure = if err.is_timeout() {
        RemoteFailure::Timeout
    } else {
        RemoteFailure::Network
    };
    RemoteError::new(failure, err.to_string())
}

/// Extracts the API's `message` field, or a prefix of the raw body.
fn error_detail(body: &[u8]) -> String {
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string));
    let text = message.unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());
    text.chars().take(MAX_ERROR_DETAIL).collect()
}

/// Decodes the contents API's line-wrapped base64.
fn decode_content(encoded: &str) -> Result<Vec<u8>, RemoteError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| RemoteError::new(RemoteFailure::InvalidResponse, format!("bad base64: {e}")))
}
