use miette::Diagnostic;
use thiserror::Error;

use crate::fetch::FetchError;

/// Main error type for swatch operations
#[derive(Error, Diagnostic, Debug)]
pub enum SwatchError {
    #[error("IO error: {0}")]
    #[diagnostic(code(swatch::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(swatch::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(swatch::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(swatch::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Document API error: {0}")]
    #[diagnostic(code(swatch::fetch))]
    Fetch(#[from] FetchError),

    #[error("Validation error: {message}")]
    #[diagnostic(code(swatch::validate))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Build error: {message}")]
    #[diagnostic(code(swatch::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl SwatchError {
    /// Shorthand for a configuration error with a help line.
    pub fn config(message: impl Into<String>, help: impl Into<String>) -> Self {
        SwatchError::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SwatchError>;
