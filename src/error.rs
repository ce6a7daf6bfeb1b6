use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why a generation tool call produced no usable output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvokeError {
    /// The tool could not be started
    Spawn { program: String, message: String },

    /// The tool exited unsuccessfully
    Failed {
        status: Option<i32>,
        stderr: String,
    },

    /// The tool ran past its deadline and was killed
    Timeout { seconds: u64 },

    /// Generic error for other cases
    Other { message: String },
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvokeError::Spawn { program, message } => {
                write!(f, "Failed to start {}: {}", program, message)
            }
            InvokeError::Failed { status, stderr } => {
                match status {
                    Some(code) => write!(f, "Generation tool exited with status {}", code)?,
                    None => write!(f, "Generation tool was terminated by a signal")?,
                }
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    write!(f, ": {}", stderr)?;
                }
                Ok(())
            }
            InvokeError::Timeout { seconds } => {
                write!(f, "Generation tool timed out after {} seconds", seconds)
            }
            InvokeError::Other { message } => {
                write!(f, "Error: {}", message)
            }
        }
    }
}

impl std::error::Error for InvokeError {}

/// Failures that abort a catalog run
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("No applications found to describe")]
    EmptyInventory,

    #[error("Failed to collect applications: {0:#}")]
    Inventory(anyhow::Error),

    #[error("Failed to persist catalog: {0:#}")]
    Persist(anyhow::Error),
}
