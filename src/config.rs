use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

const DEFAULT_APPLICATION_DIR: &str = "/Applications";
const DEFAULT_OUTPUT_PATH: &str = "applications.json";
const DEFAULT_BATCH_SIZE: usize = crate::catalog::DEFAULT_BATCH_SIZE;
const DEFAULT_TOOL: &str = "goose";
const DEFAULT_TOOL_ARGS: &[&str] = &["run", "-t"];
const DEFAULT_TIMEOUT_SECS: u64 = 300;
const DEFAULT_LOG_LEVEL: &str = "info";

const MAX_BATCH_SIZE: usize = 100;
const MAX_TIMEOUT_SECS: u64 = 3600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to read prompt template {path}: {error}")]
    TemplateUnreadable { path: PathBuf, error: String },

    #[error("Invalid prompt template: {0}")]
    InvalidTemplate(String),

    #[error("Prompt template does not reference {0}")]
    MissingPlaceholder(&'static str),
}

/// Settings for a catalog run
#[derive(Debug, Clone)]
pub struct AppscribeConfig {
    /// Directories scanned for `.app` bundles, in priority order
    pub application_dirs: Vec<PathBuf>,
    /// Where the catalog document is written
    pub output_path: PathBuf,
    pub batch_size: usize,
    /// Generation tool executable
    pub tool_command: String,
    /// Arguments placed before the prompt
    pub tool_args: Vec<String>,
    pub timeout_secs: u64,
    pub disable_output_buffering: bool,
    pub prompt_template: Option<PathBuf>,
    pub transcript_path: Option<PathBuf>,
    pub log_level: String,
    /// Only describe the first N applications
    pub limit: Option<usize>,
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse::<T>().ok())
}

/// Reads a boolean switch such as `1`, `yes`, `on` or `true` (and their negatives).
///
/// ```
/// use appscribe::config::parse_flag;
///
/// assert_eq!(parse_flag("1"), Some(true));
/// assert_eq!(parse_flag(" No "), Some(false));
/// assert_eq!(parse_flag("maybe"), None);
/// ```
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let value = env::var(name).ok()?;
    let flag = parse_flag(&value);
    if flag.is_none() {
        warn!(var = name, value = %value, "Unrecognized boolean value, ignoring");
    }
    flag
}

impl Default for AppscribeConfig {
    fn default() -> Self {
        let application_dirs = env::var("APPSCRIBE_APPLICATION_DIRS")
            .ok()
            .map(|dirs| {
                env::split_paths(&dirs)
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(|p| expand_home(&p))
                    .collect::<Vec<_>>()
            })
            .filter(|dirs| !dirs.is_empty())
            .unwrap_or_else(|| vec![PathBuf::from(DEFAULT_APPLICATION_DIR)]);

        let output_path = env::var("APPSCRIBE_OUTPUT")
            .ok()
            .map(|p| expand_home(Path::new(&p)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));

        let batch_size = env_parsed("APPSCRIBE_BATCH_SIZE").unwrap_or(DEFAULT_BATCH_SIZE);

        let tool_command = env::var("APPSCRIBE_TOOL").unwrap_or_else(|_| DEFAULT_TOOL.to_string());

        let tool_args = env::var("APPSCRIBE_TOOL_ARGS")
            .ok()
            .map(|args| args.split_whitespace().map(str::to_string).collect())
            .unwrap_or_else(|| DEFAULT_TOOL_ARGS.iter().map(|a| a.to_string()).collect());

        let timeout_secs = env_parsed("APPSCRIBE_TIMEOUT").unwrap_or(DEFAULT_TIMEOUT_SECS);

        let disable_output_buffering = env_flag("APPSCRIBE_UNBUFFERED").unwrap_or(false);

        let prompt_template = env::var("APPSCRIBE_PROMPT_TEMPLATE")
            .ok()
            .map(|p| expand_home(Path::new(&p)));

        let transcript_path = env::var("APPSCRIBE_TRANSCRIPT")
            .ok()
            .map(|p| expand_home(Path::new(&p)));

        let log_level = env::var("APPSCRIBE_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            application_dirs,
            output_path,
            batch_size,
            tool_command,
            tool_args,
            timeout_secs,
            disable_output_buffering,
            prompt_template,
            transcript_path,
            log_level,
            limit: None,
        }
    }
}

impl AppscribeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application_dirs.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "At least one application directory is required".to_string(),
            ));
        }

        if self.batch_size == 0 {
            return Err(ConfigError::ValidationFailed(
                "Batch size must be at least 1".to_string(),
            ));
        }
        if self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::ValidationFailed(format!(
                "Batch size cannot exceed {}",
                MAX_BATCH_SIZE
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Timeout must be at least 1 second".to_string(),
            ));
        }
        if self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(
                "Timeout cannot exceed 1 hour".to_string(),
            ));
        }

        if self.tool_command.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Generation tool command cannot be empty".to_string(),
            ));
        }

        if self.limit == Some(0) {
            return Err(ConfigError::ValidationFailed(
                "Limit must be at least 1 when set".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }
}

impl fmt::Display for AppscribeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Appscribe Configuration:")?;
        for dir in &self.application_dirs {
            writeln!(f, "  Application Dir: {}", dir.display())?;
        }
        writeln!(f, "  Output: {}", self.output_path.display())?;
        writeln!(f, "  Batch Size: {}", self.batch_size)?;
        writeln!(
            f,
            "  Tool: {} {}",
            self.tool_command,
            self.tool_args.join(" ")
        )?;
        writeln!(f, "  Timeout: {}s", self.timeout_secs)?;
        writeln!(f, "  Unbuffered Output: {}", self.disable_output_buffering)?;
        if let Some(ref template) = self.prompt_template {
            writeln!(f, "  Prompt Template: {}", template.display())?;
        }
        if let Some(ref transcript) = self.transcript_path {
            writeln!(f, "  Transcript: {}", transcript.display())?;
        }
        if let Some(limit) = self.limit {
            writeln!(f, "  Limit: {}", limit)?;
        }
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
