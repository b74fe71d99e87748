//! Repository source and sink against an in-process mock of the contents API.

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::{Value, json};

use common::{TokenJackProcess, assert_exit, path_str, read_json};
use tokenjack::error::{RemoteFailure, SourceError};
use tokenjack::github::{GitHubClient, GitHubSettings, RepoFile};
use tokenjack::output::github::RepoDir;
use tokenjack::output::{GitHubSink, Section, WriteStatus, write_all};
use tokenjack::source::{self, GitHubSource};
use tokenjack::tokens::normalize;

const TOKEN: &str = "test-token";

// ============================================================================
// Mock contents API
// ============================================================================

#[derive(Debug, Clone)]
struct StoredFile {
    sha: String,
    content: Vec<u8>,
}

#[derive(Debug, Clone)]
struct Commit {
    path: String,
    message: String,
    branch: Option<String>,
    had_sha: bool,
}

#[derive(Default)]
struct Repo {
    files: HashMap<String, StoredFile>,
    commits: Vec<Commit>,
    next_sha: u32,
}

type Shared = Arc<Mutex<Repo>>;

#[derive(Deserialize)]
struct RefQuery {
    #[serde(rename = "ref")]
    reference: Option<String>,
}

#[derive(Deserialize)]
struct PutBody {
    message: String,
    content: String,
    sha: Option<String>,
    branch: Option<String>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Bad credentials"})),
    )
        .into_response()
}

async fn get_contents(
    State(repo): State<Shared>,
    Path((owner, name, path)): Path<(String, String, String)>,
    Query(query): Query<RefQuery>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if query.reference.as_deref() == Some("missing-branch") {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "No commit found"})))
            .into_response();
    }
    let key = format!("{owner}/{name}/{path}");
    let repo = repo.lock().unwrap();
    match repo.files.get(&key) {
        Some(file) => {
            // The real API wraps base64 at 60 columns.
            let encoded = STANDARD.encode(&file.content);
            let wrapped: Vec<String> = encoded
                .as_bytes()
                .chunks(60)
                .map(|c| String::from_utf8_lossy(c).into_owned())
                .collect();
            Json(json!({
                "type": "file",
                "encoding": "base64",
                "sha": file.sha,
                "content": wrapped.join("\n"),
            }))
            .into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"}))).into_response(),
    }
}

async fn put_contents(
    State(repo): State<Shared>,
    Path((owner, name, path)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<PutBody>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let key = format!("{owner}/{name}/{path}");
    let mut repo = repo.lock().unwrap();

    let current = repo.files.get(&key).map(|f| f.sha.clone());
    if current != body.sha {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "sha does not match"})),
        )
            .into_response();
    }

    repo.next_sha += 1;
    let sha = format!("sha-{}", repo.next_sha);
    let content = STANDARD.decode(&body.content).unwrap();
    repo.files.insert(
        key,
        StoredFile {
            sha: sha.clone(),
            content,
        },
    );
    repo.commits.push(Commit {
        path,
        message: body.message,
        branch: body.branch,
        had_sha: body.sha.is_some(),
    });

    let status = if current.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    (status, Json(json!({"content": {"sha": sha}}))).into_response()
}

async fn start_mock(repo: Shared) -> String {
    let app = Router::new()
        .route(
            "/repos/{owner}/{repo}/contents/{*path}",
            get(get_contents).put(put_contents),
        )
        .with_state(repo);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn seed(repo: &Shared, key: &str, content: &[u8]) {
    let mut repo = repo.lock().unwrap();
    repo.next_sha += 1;
    let sha = format!("sha-{}", repo.next_sha);
    repo.files.insert(
        key.to_string(),
        StoredFile {
            sha,
            content: content.to_vec(),
        },
    );
}

fn settings(api_base: &str, token: Option<&str>) -> GitHubSettings {
    GitHubSettings {
        token: token.map(str::to_string),
        api_base: api_base.to_string(),
        timeout: Duration::from_secs(5),
    }
}

fn source_file() -> RepoFile {
    RepoFile {
        owner: "acme".to_string(),
        repo: "tokens".to_string(),
        path: "tokens/core.json".to_string(),
        reference: None,
    }
}

fn fixture_bytes(name: &str) -> Vec<u8> {
    std::fs::read(TokenJackProcess::fixture_path(name)).unwrap()
}

async fn fetch(api_base: &str, token: Option<&str>, file: RepoFile) -> Result<Value, SourceError> {
    let client = GitHubClient::new(settings(api_base, token)).unwrap();
    let reader = GitHubSource::new(client, file);
    source::load(&reader).await
}

fn remote_failure(err: SourceError) -> RemoteFailure {
    match err {
        SourceError::Remote { error, .. } => error.failure,
        other => panic!("expected remote error, got {other:?}"),
    }
}

// ============================================================================
// Source
// ============================================================================

#[tokio::test]
async fn fetches_and_parses_repository_source() {
    let repo = Shared::default();
    seed(&repo, "acme/tokens/tokens/core.json", &fixture_bytes("legacy.json"));
    let base = start_mock(repo).await;

    let tree = fetch(&base, Some(TOKEN), source_file()).await.unwrap();
    let set = normalize(&tree);
    assert_eq!(set.colors["bleu"]["500"].value.to_string(), "#1a70ef");
    assert_eq!(set.spacing.len(), 2);
}

#[tokio::test]
async fn rejected_credentials_are_auth_failures() {
    let repo = Shared::default();
    seed(&repo, "acme/tokens/tokens/core.json", b"{}");
    let base = start_mock(repo).await;

    let err = fetch(&base, Some("wrong"), source_file()).await.unwrap_err();
    assert!(err.is_fetch());
    assert_eq!(remote_failure(err), RemoteFailure::Auth);
}

#[tokio::test]
async fn missing_credentials_fail_before_any_request() {
    // Nothing listens here; a request would be a network failure.
    let err = fetch("http://127.0.0.1:9", None, source_file())
        .await
        .unwrap_err();
    assert_eq!(remote_failure(err), RemoteFailure::MissingCredential);
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let base = start_mock(Shared::default()).await;
    let err = fetch(&base, Some(TOKEN), source_file()).await.unwrap_err();
    assert_eq!(remote_failure(err), RemoteFailure::NotFound);
}

#[tokio::test]
async fn missing_ref_is_not_found() {
    let repo = Shared::default();
    seed(&repo, "acme/tokens/tokens/core.json", b"{}");
    let base = start_mock(repo).await;

    let mut file = source_file();
    file.reference = Some("missing-branch".to_string());
    let err = fetch(&base, Some(TOKEN), file).await.unwrap_err();
    assert_eq!(remote_failure(err), RemoteFailure::NotFound);
}

#[tokio::test]
async fn unreachable_host_is_network_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = fetch(&format!("http://{addr}"), Some(TOKEN), source_file())
        .await
        .unwrap_err();
    assert_eq!(remote_failure(err), RemoteFailure::Network);
}

#[tokio::test]
async fn non_json_remote_source_is_parse_error() {
    let repo = Shared::default();
    seed(&repo, "acme/tokens/tokens/core.json", b"not json");
    let base = start_mock(repo).await;

    let err = fetch(&base, Some(TOKEN), source_file()).await.unwrap_err();
    assert!(!err.is_fetch());
    assert!(matches!(err, SourceError::Parse { .. }));
}

// ============================================================================
// Sink
// ============================================================================

fn target() -> RepoDir {
    RepoDir {
        owner: "acme".to_string(),
        repo: "site".to_string(),
        dir: "src/tokens".to_string(),
        branch: Some("design".to_string()),
    }
}

#[tokio::test]
async fn pushes_sections_and_skips_unchanged() {
    let repo = Shared::default();
    let base = start_mock(repo.clone()).await;
    let tree: Value = serde_json::from_slice(&fixture_bytes("legacy.json")).unwrap();
    let set = normalize(&tree);

    let client = GitHubClient::new(settings(&base, Some(TOKEN))).unwrap();
    let sink = GitHubSink::new(client, target(), None);

    let first = write_all(&set, &sink).await;
    assert!(first.is_success());
    assert_eq!(first.outcomes.len(), 4);
    {
        let repo = repo.lock().unwrap();
        assert_eq!(repo.commits.len(), 4);
        let paths: Vec<&str> = repo.commits.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "src/tokens/colors.json",
                "src/tokens/spacing.json",
                "src/tokens/typography.json",
                "src/tokens/border-radius.json",
            ]
        );
        assert!(repo.commits.iter().all(|c| !c.had_sha));
        assert!(
            repo.commits
                .iter()
                .all(|c| c.branch.as_deref() == Some("design"))
        );
        assert!(repo.commits[0].message.starts_with("chore(tokens): update colors.json"));

        let pushed = &repo.files["acme/site/src/tokens/colors.json"].content;
        assert_eq!(
            pushed,
            &Section::Colors.render(&set).unwrap().unwrap(),
            "pushed bytes must equal the rendered artifact"
        );
    }

    let second = write_all(&set, &sink).await;
    assert!(second.is_success());
    assert!(
        second
            .outcomes
            .iter()
            .all(|o| matches!(o.result, Ok(WriteStatus::Unchanged)))
    );
    assert_eq!(repo.lock().unwrap().commits.len(), 4);
}

#[tokio::test]
async fn updates_existing_file_with_its_sha() {
    let repo = Shared::default();
    seed(&repo, "acme/site/src/tokens/colors.json", b"{\"color\": {}}\n");
    let base = start_mock(repo.clone()).await;
    let tree: Value = serde_json::from_slice(&fixture_bytes("colors-only.json")).unwrap();
    let set = normalize(&tree);

    let client = GitHubClient::new(settings(&base, Some(TOKEN))).unwrap();
    let sink = GitHubSink::new(client, target(), Some("sync tokens".to_string()));

    let report = write_all(&set, &sink).await;
    assert!(report.is_success());
    let repo = repo.lock().unwrap();
    assert_eq!(repo.commits.len(), 1);
    assert!(repo.commits[0].had_sha);
    assert_eq!(repo.commits[0].message, "sync tokens");
}

#[tokio::test]
async fn rejected_push_is_recorded_per_section() {
    let base = start_mock(Shared::default()).await;
    let tree: Value = serde_json::from_slice(&fixture_bytes("legacy.json")).unwrap();
    let set = normalize(&tree);

    let client = GitHubClient::new(settings(&base, Some("wrong"))).unwrap();
    let sink = GitHubSink::new(client, target(), None);

    let report = write_all(&set, &sink).await;
    assert!(!report.is_success());
    assert_eq!(report.failed().len(), 4);
}

// ============================================================================
// CLI end to end
// ============================================================================

async fn run_cli(args: Vec<String>, env: Vec<(String, String)>) -> std::process::Output {
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let env: Vec<(&str, &str)> = env.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        TokenJackProcess::spawn_with_env(&args, &env)
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn cli_normalizes_repository_source() {
    let repo = Shared::default();
    seed(&repo, "acme/tokens/tokens/core.json", &fixture_bytes("standard.json"));
    let base = start_mock(repo).await;
    let out = tempfile::tempdir().unwrap();

    let output = run_cli(
        vec![
            "normalize".into(),
            "--repo".into(),
            "acme/tokens".into(),
            "--path".into(),
            "tokens/core.json".into(),
            "--api-base".into(),
            base,
            "--out".into(),
            path_str(out.path()).into(),
        ],
        vec![("GITHUB_TOKEN".into(), TOKEN.into())],
    )
    .await;
    assert_exit(&output, 0);

    assert_eq!(
        read_json(&out.path().join("border-radius.json")),
        json!({"borderRadius": {"md": {"value": "8px", "type": "dimension"}}})
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn cli_repository_auth_failure_exits_with_fetch_error() {
    let repo = Shared::default();
    seed(&repo, "acme/tokens/tokens/core.json", b"{}");
    let base = start_mock(repo).await;
    let out = tempfile::tempdir().unwrap();

    let output = run_cli(
        vec![
            "normalize".into(),
            "--repo".into(),
            "acme/tokens".into(),
            "--path".into(),
            "tokens/core.json".into(),
            "--api-base".into(),
            base,
            "--token".into(),
            "wrong".into(),
            "--out".into(),
            path_str(out.path()).into(),
        ],
        Vec::new(),
    )
    .await;
    assert_exit(&output, 4);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("authentication"), "stderr: {stderr}");
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn cli_push_commits_sections() {
    let repo = Shared::default();
    let base = start_mock(repo.clone()).await;
    let source = TokenJackProcess::fixture_path("colors-only.json");

    let output = run_cli(
        vec![
            "push".into(),
            "--source".into(),
            path_str(&source).into(),
            "--target-repo".into(),
            "acme/site".into(),
            "--target-dir".into(),
            "tokens".into(),
            "--api-base".into(),
            base,
            "--format".into(),
            "json".into(),
        ],
        vec![("GITHUB_TOKEN".into(), TOKEN.into())],
    )
    .await;
    assert_exit(&output, 0);

    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["palettes"], 1);
    let repo = repo.lock().unwrap();
    assert_eq!(repo.commits.len(), 1);
    assert_eq!(repo.commits[0].path, "tokens/colors.json");
    assert_eq!(repo.commits[0].branch, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn cli_push_failure_exits_with_output_error() {
    let base = start_mock(Shared::default()).await;
    let source = TokenJackProcess::fixture_path("legacy.json");

    let output = run_cli(
        vec![
            "push".into(),
            "--source".into(),
            path_str(&source).into(),
            "--target-repo".into(),
            "acme/site".into(),
            "--api-base".into(),
            base,
            "--token".into(),
            "wrong".into(),
        ],
        Vec::new(),
    )
    .await;
    assert_exit(&output, 3);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("FAILED"), "stdout: {stdout}");
}
