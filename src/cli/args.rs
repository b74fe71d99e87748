//! CLI argument definitions
//!
//! All Clap derive structs for `TokenJack` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::output::Section;

// ============================================================================
// Root CLI
// ============================================================================

/// Design-token compiler: normalizes nested token trees into flat token files.
#[derive(Parser, Debug)]
#[command(name = "tokenjack", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "TOKENJACK_COLOR")]
    pub color: ColorChoice,

    /// Log line format.
    #[arg(long, default_value = "human", global = true, env = "TOKENJACK_LOG_FORMAT")]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize a token source and write section files to a directory.
    Normalize(NormalizeArgs),

    /// Normalize a token source and print the result to stdout.
    Inspect(InspectArgs),

    /// Normalize a token source and push section files to a repository.
    Push(PushArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version and build information.
    Version(VersionArgs),
}

// ============================================================================
// Shared Source Arguments
// ============================================================================

/// Where to read the token source from and how to reach the repository API.
///
/// Flags override the configuration file.
#[derive(Args, Debug, Default)]
#[command(group = clap::ArgGroup::new("input").multiple(false))]
pub struct SourceArgs {
    /// Path to a `tokenjack.yaml` project configuration file.
    #[arg(short, long, env = "TOKENJACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Local token source JSON file.
    #[arg(short, long, group = "input")]
    pub source: Option<PathBuf>,

    /// Repository holding the token source, as `owner/repo`.
    #[arg(long, group = "input", value_name = "OWNER/REPO", requires = "path")]
    pub repo: Option<String>,

    /// Path of the token source within `--repo`.
    #[arg(long, requires = "repo")]
    pub path: Option<String>,

    /// Branch, tag, or commit of `--repo` to read.
    #[arg(long = "ref", value_name = "REF", requires = "repo")]
    pub reference: Option<String>,

    /// Repository access token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository REST API base URL.
    #[arg(long, env = "TOKENJACK_GITHUB_API")]
    pub api_base: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,
}

// ============================================================================
// Normalize / Inspect / Push
// ============================================================================

/// Arguments for `normalize`.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Token source selection.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output directory for section files.
    #[arg(short, long, env = "TOKENJACK_OUT_DIR")]
    pub out: Option<PathBuf>,

    /// Summary format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Token source selection.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print only this section's artifact.
    #[arg(long)]
    pub section: Option<SectionArg>,
}

/// Arguments for `push`.
#[derive(Args, Debug)]
pub struct PushArgs {
    /// Token source selection.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Repository to push section files to, as `owner/repo`.
    #[arg(long, value_name = "OWNER/REPO")]
    pub target_repo: Option<String>,

    /// Directory within the target repository.
    #[arg(long)]
    pub target_dir: Option<String>,

    /// Branch to commit to.
    #[arg(long)]
    pub branch: Option<String>,

    /// Commit message for every pushed file.
    #[arg(short, long)]
    pub message: Option<String>,

    /// Summary format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with optional ANSI colors.
    #[default]
    Human,
    /// Newline-delimited JSON for machine consumption.
    Json,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Section selector for `inspect --section`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SectionArg {
    /// `colors.json`
    Colors,
    /// `spacing.json`
    Spacing,
    /// `typography.json`
    Typography,
    /// `border-radius.json`
    BorderRadius,
}

impl From<SectionArg> for Section {
    fn from(arg: SectionArg) -> Self {
        match arg {
            SectionArg::Colors => Self::Colors,
            SectionArg::Spacing => Self::Spacing,
            SectionArg::Typography => Self::Typography,
            SectionArg::BorderRadius => Self::BorderRadius,
        }
    }
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_with_local_source() {
        let cli = Cli::try_parse_from([
            "tokenjack",
            "normalize",
            "--source",
            "tokens.json",
            "--out",
            "dist",
        ]);
        assert!(cli.is_ok(), "Failed to parse: {cli:?}");
    }

    #[test]
    fn test_normalize_with_repo_source() {
        let cli = Cli::try_parse_from([
            "tokenjack",
            "normalize",
            "--repo",
            "acme/tokens",
            "--path",
            "tokens.json",
            "--ref",
            "main",
        ])
        .unwrap();
        let Commands::Normalize(args) = cli.command else {
            panic!("Expected NormalizeArgs");
        };
        assert_eq!(args.source.repo.as_deref(), Some("acme/tokens"));
        assert_eq!(args.source.reference.as_deref(), Some("main"));
    }

    #[test]
    fn test_source_and_repo_mutually_exclusive() {
        let cli = Cli::try_parse_from([
            "tokenjack",
            "normalize",
            "--source",
            "tokens.json",
            "--repo",
            "acme/tokens",
            "--path",
            "tokens.json",
        ]);
        assert!(cli.is_err(), "Expected mutual exclusion error");
    }

    #[test]
    fn test_repo_requires_path() {
        let cli = Cli::try_parse_from(["tokenjack", "normalize", "--repo", "acme/tokens"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let cli = Cli::try_parse_from([
            "tokenjack",
            "inspect",
            "--source",
            "t.json",
            "--timeout-secs",
            "0",
        ]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_inspect_section_parses() {
        let cli = Cli::try_parse_from([
            "tokenjack",
            "inspect",
            "--source",
            "t.json",
            "--section",
            "border-radius",
        ])
        .unwrap();
        let Commands::Inspect(args) = cli.command else {
            panic!("Expected InspectArgs");
        };
        assert_eq!(args.section, Some(SectionArg::BorderRadius));
        assert_eq!(Section::from(SectionArg::BorderRadius), Section::BorderRadius);
    }

    #[test]
    fn test_push_args() {
        let cli = Cli::try_parse_from([
            "tokenjack",
            "push",
            "--source",
            "t.json",
            "--target-repo",
            "acme/site",
            "--target-dir",
            "src/tokens",
            "--branch",
            "tokens",
        ])
        .unwrap();
        let Commands::Push(args) = cli.command else {
            panic!("Expected PushArgs");
        };
        assert_eq!(args.target_repo.as_deref(), Some("acme/site"));
        assert_eq!(args.format, OutputFormat::Human);
    }

    #[test]
    fn test_help_output() {
        let err = Cli::try_parse_from(["tokenjack", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_output() {
        let err = Cli::try_parse_from(["tokenjack", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tokenjack",
            "inspect",
            "--source",
            "t.json",
            "-vv",
            "--log-format",
            "json",
            "--color",
            "never",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
