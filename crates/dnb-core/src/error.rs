//! Error types for dnb.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level result type for dnb operations.
pub type Result<T> = std::result::Result<T, DnbError>;

/// Top-level error type for dnb.
///
/// [`DnbError::Copy`] and [`DnbError::HeaderWrite`] are non-fatal: the
/// rollover engine reports them alongside a usable daily file instead of
/// returning them as `Err`.
#[derive(Debug, Error)]
pub enum DnbError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot create directory {}: {source}", .path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot scan notebook root {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write date header to {}: {source}", .path.display())]
    HeaderWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to loading and interpreting the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot resolve the current user's home directory")]
    HomeUnavailable,

    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file: {0}")]
    Parse(String),

    #[error("notebook '{name}' doesn't exist; configured notebooks are {known:?}")]
    UnknownNotebook { name: String, known: Vec<String> },
}
