//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler and holds
//! the steps shared by every token command: settings resolution, source
//! acquisition, and normalization.

pub mod completions;
pub mod inspect;
pub mod normalize;
pub mod push;
pub mod version;

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::args::{Cli, Commands, OutputFormat, SourceArgs};
use crate::config::loader::ConfigLoader;
use crate::config::schema::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS, ProjectConfig};
use crate::error::{ConfigError, TokenJackError};
use crate::github::{GitHubSettings, RepoFile, parse_repo_slug};
use crate::observability::RunSummary;
use crate::output::WriteReport;
use crate::source::{self, SourceSpec};
use crate::tokens::{Normalized, normalize_with_report};

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), TokenJackError> {
    match cli.command {
        Commands::Normalize(args) => normalize::run(&args).await,
        Commands::Inspect(args) => inspect::run(&args).await,
        Commands::Push(args) => push::run(&args).await,
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Settings resolved from flags, the configuration file, and defaults.
#[derive(Debug)]
pub struct Resolved {
    /// The project configuration file contents (default if none given).
    pub config: ProjectConfig,
    /// Token source location.
    pub source: SourceSpec,
    /// Repository API settings.
    pub github: GitHubSettings,
}

/// Loads the configuration file (if any) and merges it with flags.
///
/// # Errors
///
/// Returns a config error if the file fails to load, or if no token source
/// is given by either flags or the file.
pub fn resolve(args: &SourceArgs) -> Result<Resolved, ConfigError> {
    let config = match &args.config {
        Some(path) => {
            tracing::info!(config = %path.display(), "loading configuration");
            let loaded = ConfigLoader::default().load(path)?;
            for warning in &loaded.warnings {
                tracing::warn!(
                    location = warning.location.as_deref().unwrap_or("<unknown>"),
                    "{}",
                    warning.message
                );
            }
            loaded.config
        }
        None => ProjectConfig::default(),
    };

    let source = resolve_source(args, &config)?;
    let github = resolve_github(args, &config);
    Ok(Resolved {
        config,
        source,
        github,
    })
}

fn resolve_source(args: &SourceArgs, config: &ProjectConfig) -> Result<SourceSpec, ConfigError> {
    if let Some(path) = &args.source {
        return Ok(SourceSpec::File { path: path.clone() });
    }

    if let (Some(slug), Some(path)) = (&args.repo, &args.path) {
        let (owner, repo) = parse_repo_slug(slug).map_err(|expected| ConfigError::InvalidValue {
            field: "--repo".to_string(),
            value: slug.clone(),
            expected,
        })?;
        return Ok(SourceSpec::GitHub(RepoFile {
            owner,
            repo,
            path: path.clone(),
            reference: args.reference.clone(),
        }));
    }

    match &config.source {
        Some(source) => match (&source.file, &source.github) {
            (Some(path), _) => Ok(SourceSpec::File { path: path.clone() }),
            (None, Some(repo)) => Ok(SourceSpec::GitHub(RepoFile {
                owner: repo.owner.clone(),
                repo: repo.repo.clone(),
                path: repo.path.clone(),
                reference: repo.reference.clone(),
            })),
            (None, None) => Err(missing_source()),
        },
        None => Err(missing_source()),
    }
}

fn missing_source() -> ConfigError {
    ConfigError::MissingRequired {
        field: "source".to_string(),
        hint: "pass --source or --repo/--path, or set source in --config".to_string(),
    }
}

fn resolve_github(args: &SourceArgs, config: &ProjectConfig) -> GitHubSettings {
    let file = config.github.clone().unwrap_or_default();
    GitHubSettings {
        token: args.token.clone().or(file.token),
        api_base: args
            .api_base
            .clone()
            .or(file.api_base)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        timeout: Duration::from_secs(
            args.timeout_secs
                .or(file.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        ),
    }
}

/// Reads, parses, and normalizes the token source.
///
/// # Errors
///
/// Returns a source error if the document cannot be fetched or parsed;
/// normalization itself does not fail.
pub async fn acquire(resolved: &Resolved) -> Result<(String, Normalized), TokenJackError> {
    let reader = resolved.source.open(&resolved.github)?;
    let origin = reader.origin();
    let tree = source::load(reader.as_ref()).await?;
    let normalized = normalize_with_report(&tree);
    Ok((origin, normalized))
}

/// Returns the local output directory: flag, then config file, then default.
#[must_use]
pub fn output_dir(flag: Option<&PathBuf>, config: &ProjectConfig) -> PathBuf {
    flag.cloned()
        .or_else(|| config.output.as_ref().and_then(|o| o.dir.clone()))
        .unwrap_or_else(|| PathBuf::from(crate::config::schema::DEFAULT_OUTPUT_DIR))
}

/// Prints the run summary and turns section failures into an error.
///
/// # Errors
///
/// Returns `TokenJackError::PartialWrite` if any section failed, or a JSON
/// error if the summary cannot be serialized.
pub fn finish(
    summary: &RunSummary,
    report: &WriteReport,
    format: OutputFormat,
) -> Result<(), TokenJackError> {
    tracing::info!(summary = %summary, "normalization complete");
    match format {
        OutputFormat::Human => print!("{}", summary.render_human()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
    }

    if summary.palettes == 0 && summary.colors == 0 && summary.dropped > 0 {
        tracing::warn!(
            dropped = summary.dropped,
            "no color palettes found; check the token source schema"
        );
    }

    let failed = report.failed();
    if failed.is_empty() {
        Ok(())
    } else {
        Err(TokenJackError::PartialWrite {
            failed: failed.len(),
            total: report.outcomes.len(),
            sections: failed.iter().map(ToString::to_string).collect(),
        })
    }
}
