use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum AppError {
    #[error("TOML config file error: {0}")]
    TomlConfig(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Render worker failed: {0}")]
    Worker(String),
}

/// Fatal failures of a scan request. Each one aborts the whole request.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("file/directory does not exist: {path:?}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot inspect {path:?}: {source}")]
    AccessError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading directory {path:?}: {source}")]
    DirectoryReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    pub fn path(&self) -> &Path {
        match self {
            ScanError::NotFound { path, .. }
            | ScanError::AccessError { path, .. }
            | ScanError::DirectoryReadError { path, .. } => path,
        }
    }
}

/// Per-image thumbnail rendering failures
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("cannot decode image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot encode thumbnail {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Result type with default AppError
pub type Result<T, E = AppError> = std::result::Result<T, E>;
