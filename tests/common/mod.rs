//! Shared integration-test harness for running the `tokenjack` binary.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Environment variables that would leak host settings into a test run.
const SCRUBBED_ENV: &[&str] = &[
    "TOKENJACK_CONFIG",
    "TOKENJACK_OUT_DIR",
    "TOKENJACK_GITHUB_API",
    "TOKENJACK_LOG_LEVEL",
    "TOKENJACK_LOG_FORMAT",
    "TOKENJACK_COLOR",
    "GITHUB_TOKEN",
];

/// Runs the `tokenjack` binary to completion.
pub struct TokenJackProcess;

impl TokenJackProcess {
    /// Runs `tokenjack` with `args` and a scrubbed environment.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn spawn_command(args: &[&str]) -> Output {
        Self::spawn_with_env(args, &[])
    }

    /// Runs `tokenjack` with `args` and extra environment variables.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn spawn_with_env(args: &[&str], env: &[(&str, &str)]) -> Output {
        let bin = env!("CARGO_BIN_EXE_tokenjack");
        let mut cmd = Command::new(bin);
        for var in SCRUBBED_ENV {
            cmd.env_remove(var);
        }
        cmd.args(args)
            .envs(env.iter().copied())
            .output()
            .expect("failed to run tokenjack")
    }

    /// Returns the path to a test fixture.
    #[must_use]
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }
}

/// Path as `&str`, panicking on non-UTF-8.
#[must_use]
pub fn path_str(path: &Path) -> &str {
    path.to_str().expect("non-UTF-8 path")
}

/// Reads and parses a JSON file.
#[must_use]
pub fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("invalid JSON in {}: {e}", path.display()))
}

/// Asserts the process exited with `code`, showing stderr on failure.
pub fn assert_exit(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "unexpected exit status\nstdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}
