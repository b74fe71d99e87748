//! `push`: source → normalized section files committed to a repository.

use crate::cli::args::PushArgs;
use crate::config::schema::ProjectConfig;
use crate::error::{ConfigError, OutputError, TokenJackError};
use crate::github::{GitHubClient, GitHubSettings, parse_repo_slug};
use crate::observability::RunSummary;
use crate::output::github::RepoDir;
use crate::output::{GitHubSink, write_all};

use super::{acquire, finish, resolve};

/// Normalize the token source and push section files to the target repository.
///
/// # Errors
///
/// Returns a config error when no target is configured, a source error when
/// the tokens cannot be read, an output error when the target client cannot
/// be built, or `PartialWrite` if any section push failed.
pub async fn run(args: &PushArgs) -> Result<(), TokenJackError> {
    let resolved = resolve(&args.source)?;
    let target = resolve_target(args, &resolved.config)?;

    let (origin, normalized) = acquire(&resolved).await?;

    let client = target_client(resolved.github.clone(), &target)?;
    let sink = GitHubSink::new(client, target, args.message.clone());
    let report = write_all(&normalized.tokens, &sink).await;

    let summary = RunSummary::new(origin, &normalized).with_report(&report);
    finish(&summary, &report, args.format)
}

/// Client for the push target. A failure here is on the output side.
fn target_client(settings: GitHubSettings, target: &RepoDir) -> Result<GitHubClient, OutputError> {
    GitHubClient::new(settings).map_err(|error| OutputError::Remote {
        path: target.to_string(),
        error,
    })
}

/// Target directory: `--target-repo` (with `--target-dir`/`--branch`), else
/// `output.github` from the configuration file. Flags for dir and branch
/// override the file even when the repository comes from it.
fn resolve_target(args: &PushArgs, config: &ProjectConfig) -> Result<RepoDir, ConfigError> {
    let from_file = config.output.as_ref().and_then(|o| o.github.as_ref());

    let mut target = if let Some(slug) = &args.target_repo {
        let (owner, repo) = parse_repo_slug(slug).map_err(|expected| ConfigError::InvalidValue {
            field: "--target-repo".to_string(),
            value: slug.clone(),
            expected,
        })?;
        RepoDir {
            owner,
            repo,
            dir: String::new(),
            branch: None,
        }
    } else if let Some(file) = from_file {
        RepoDir {
            owner: file.owner.clone(),
            repo: file.repo.clone(),
            dir: file.dir.clone(),
            branch: file.branch.clone(),
        }
    } else {
        return Err(ConfigError::MissingRequired {
            field: "output.github".to_string(),
            hint: "pass --target-repo or set output.github in --config".to_string(),
        });
    };

    if let Some(dir) = &args.target_dir {
        target.dir.clone_from(dir);
    }
    if let Some(branch) = &args.branch {
        target.branch = Some(branch.clone());
    }
    Ok(target)
}
