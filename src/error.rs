use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodescribeError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Included path not found: {path}")]
    IncludePathNotFound { path: String },

    #[error("Cannot write output file {}: {source}", path.display())]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Failed to serialize metadata: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for CodescribeError {
    fn user_message(&self) -> String {
        match self {
            CodescribeError::Config { message } => {
                format!("Error loading config file: {}", message)
            }
            CodescribeError::IncludePathNotFound { path } => {
                format!("Included path not found: {}", path)
            }
            CodescribeError::OutputFile { path, source } => {
                format!("Error during extraction: cannot write {}: {}", path.display(), source)
            }
            CodescribeError::InvalidPath { path } => {
                format!("Invalid base directory: {}", path)
            }
            _ => format!("Error during extraction: {}", self),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            CodescribeError::Config { .. } => Some(
                "Check that the configuration file exists and is valid JSON (or TOML for .toml files). Run with --generate-config to create a sample.".to_string()
            ),
            CodescribeError::IncludePathNotFound { .. } => Some(
                "Include paths are resolved relative to --base-dir.".to_string()
            ),
            CodescribeError::OutputFile { .. } => Some(
                "Ensure the output directory exists and is writable, or choose another location with --output.".to_string()
            ),
            CodescribeError::InvalidPath { .. } => Some(
                "Pass an existing directory with --base-dir.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for CodescribeError {
    fn from(error: toml::de::Error) -> Self {
        CodescribeError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodescribeError>;

pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
