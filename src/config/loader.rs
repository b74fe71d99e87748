//! Configuration loader
//!
//! Loading pipeline:
//! 1. Size check and raw read (UTF-8 BOM stripped)
//! 2. Environment variable expansion (pre-parse, on raw text)
//! 3. YAML parsing
//! 4. Deserialization to [`ProjectConfig`]
//! 5. Validation

use std::path::{Path, PathBuf};

use crate::config::schema::ProjectConfig;
use crate::error::ConfigError;

// ============================================================================
// Public API
// ============================================================================

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated configuration.
    pub config: ProjectConfig,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

/// Configuration loader.
#[derive(Debug)]
pub struct ConfigLoader {
    max_config_size: usize,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            max_config_size: env_or("TOKENJACK_MAX_CONFIG_SIZE", 1024 * 1024),
        }
    }
}

impl ConfigLoader {
    /// Creates a loader with an explicit size limit in bytes.
    #[must_use]
    pub const fn with_max_size(max_config_size: usize) -> Self {
        Self { max_config_size }
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - A `${VAR:?message}` reference names an unset variable
    /// - YAML parsing or deserialization fails
    /// - Validation fails
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > self.max_config_size {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{file_size} bytes"),
                expected: format!("at most {} bytes", self.max_config_size),
            });
        }

        let raw_content = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        let raw_content = raw_content.strip_prefix('\u{feff}').unwrap_or(&raw_content);

        let mut env_sub = EnvSubstitution::new();
        let substituted = env_sub.substitute(raw_content, path)?;
        warnings.extend(env_sub.warnings);

        let root: serde_yaml::Value =
            serde_yaml::from_str(&substituted).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        if root.is_null() {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: "Configuration file is empty".to_string(),
            });
        }

        let config: ProjectConfig =
            serde_yaml::from_value(root).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: format!("Failed to deserialize configuration: {e}"),
            })?;

        validate(&config)?;

        Ok(LoadResult { config, warnings })
    }
}

/// Checks cross-field constraints serde cannot express.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` when a source names both a file and a
/// repository, or neither, or when a repository field is blank.
pub fn validate(config: &ProjectConfig) -> Result<(), ConfigError> {
    if let Some(source) = &config.source {
        match (&source.file, &source.github) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::InvalidValue {
                    field: "source".to_string(),
                    value: "file and github".to_string(),
                    expected: "exactly one of 'file' or 'github'".to_string(),
                });
            }
            (None, None) => {
                return Err(ConfigError::InvalidValue {
                    field: "source".to_string(),
                    value: "{}".to_string(),
                    expected: "exactly one of 'file' or 'github'".to_string(),
                });
            }
            (None, Some(repo)) => {
                require_non_blank("source.github.owner", &repo.owner)?;
                require_non_blank("source.github.repo", &repo.repo)?;
                require_non_blank("source.github.path", &repo.path)?;
            }
            (Some(_), None) => {}
        }
    }

    if let Some(target) = config.output.as_ref().and_then(|o| o.github.as_ref()) {
        require_non_blank("output.github.owner", &target.owner)?;
        require_non_blank("output.github.repo", &target.repo)?;
    }

    if config.github.as_ref().and_then(|g| g.timeout_secs) == Some(0) {
        return Err(ConfigError::InvalidValue {
            field: "github.timeout_secs".to_string(),
            value: "0".to_string(),
            expected: "a positive number of seconds".to_string(),
        });
    }

    Ok(())
}

fn require_non_blank(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            expected: "a non-empty string".to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// Environment Variable Substitution
// ============================================================================

/// Pre-parse environment variable substitution.
///
/// Runs on raw YAML text before parsing to preserve type inference.
struct EnvSubstitution {
    warnings: Vec<LoadWarning>,
}

impl EnvSubstitution {
    const fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    /// Substitutes environment variables in raw YAML text.
    ///
    /// Supports:
    /// - `${VAR}` - expand to value (empty string if unset with warning)
    /// - `${VAR:-default}` - expand to default if unset
    /// - `${VAR:?message}` - fail if unset
    /// - `$$` - literal `$`
    fn substitute(&mut self, raw_yaml: &str, source_path: &Path) -> Result<String, ConfigError> {
        let mut result = String::with_capacity(raw_yaml.len());
        let mut chars = raw_yaml.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' {
                result.push(c);
                continue;
            }
            match chars.peek() {
                Some('$') => {
                    chars.next();
                    result.push('$');
                }
                Some('{') => {
                    chars.next();
                    let spec = parse_var_spec(&mut chars, source_path)?;
                    match std::env::var(&spec.name) {
                        Ok(value) => result.push_str(&value),
                        Err(_) => match (spec.default, spec.error_message) {
                            (Some(default), _) => result.push_str(&default),
                            (None, Some(message)) => {
                                return Err(ConfigError::EnvVarNotSet {
                                    var: spec.name,
                                    message,
                                });
                            }
                            (None, None) => self.warnings.push(LoadWarning {
                                message: format!(
                                    "Environment variable '{}' is not set, using empty string",
                                    spec.name
                                ),
                                location: Some(source_path.display().to_string()),
                            }),
                        },
                    }
                }
                _ => result.push(c),
            }
        }

        Ok(result)
    }
}

/// A parsed `${...}` reference.
struct VarSpec {
    name: String,
    default: Option<String>,
    error_message: Option<String>,
}

/// Parses a variable specification after the opening `${`.
fn parse_var_spec(
    chars: &mut std::iter::Peekable<std::str::Chars>,
    source_path: &Path,
) -> Result<VarSpec, ConfigError> {
    let mut name = String::new();

    while let Some(c) = chars.next() {
        match c {
            '}' => {
                return Ok(VarSpec {
                    name,
                    default: None,
                    error_message: None,
                });
            }
            ':' => match chars.peek() {
                Some('-') => {
                    chars.next();
                    let default = read_until_close(chars, source_path)?;
                    return Ok(VarSpec {
                        name,
                        default: Some(default),
                        error_message: None,
                    });
                }
                Some('?') => {
                    chars.next();
                    let message = read_until_close(chars, source_path)?;
                    return Ok(VarSpec {
                        name,
                        default: None,
                        error_message: Some(message),
                    });
                }
                _ => name.push(':'),
            },
            _ => name.push(c),
        }
    }

    Err(ConfigError::ParseError {
        path: source_path.to_path_buf(),
        line: None,
        message: format!("Unclosed environment variable reference: ${{{name}"),
    })
}

/// Reads content until the matching `}`, allowing nested braces.
fn read_until_close(
    chars: &mut std::iter::Peekable<std::str::Chars>,
    source_path: &Path,
) -> Result<String, ConfigError> {
    let mut value = String::new();
    let mut depth = 1;

    for c in chars.by_ref() {
        match c {
            '{' => {
                depth += 1;
                value.push(c);
            }
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(value);
                }
                value.push(c);
            }
            _ => value.push(c),
        }
    }

    Err(ConfigError::ParseError {
        path: PathBuf::from(source_path),
        line: None,
        message: "Unclosed environment variable reference".to_string(),
    })
}

/// Parses an environment variable, falling back to `default`.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Tests
// ============================================================================
