use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Generator environment not ready: {0}")]
    Setup(String),

    #[error("{0}")]
    Invoke(#[from] InvokeError),

    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

impl AppError {
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        AppError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("Prompt catalog is empty")]
    EmptyCatalog,

    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Invalid day of year {input} (expected 1-366)")]
    InvalidDay { input: u32 },

    #[error("Invalid settings file {}: {message}", path.display())]
    Settings { path: PathBuf, message: String },
}

#[derive(Debug, Error)]
pub(crate) enum InvokeError {
    #[error("Failed to create output pipe: {0}")]
    Pipe(std::io::Error),

    #[error("Failed to start generator {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read generator output: {0}")]
    Read(std::io::Error),

    #[error("Failed to wait for generator: {0}")]
    Wait(std::io::Error),
}

#[derive(Debug, Error)]
pub(crate) enum NotifyError {
    #[error("{provider} request failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: ureq::Error,
    },

    #[error("{provider} request could not be signed: {message}")]
    Signing {
        provider: &'static str,
        message: String,
    },
}
