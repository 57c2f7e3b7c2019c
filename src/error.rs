use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions of a contamination run.
///
/// Soft conditions (tied classifications, calls without depth) never show up here; they are
/// resolved where they occur and only logged.
#[derive(Debug, Error)]
pub enum HaplocheckError {
    /// The caller handed us something we refuse to run on.
    #[error("Invalid input: {0}")]
    Input(String),

    /// The phylogeny or its weight table cannot be used.
    #[error("Reference data error: {0}")]
    ReferenceData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {source} ({path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("VCF error: {0}")]
    Vcf(#[from] rust_htslib::errors::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A worker died without reporting a result.
    #[error("Analysis error: {0}")]
    Analysis(String),
}

pub type Result<T> = std::result::Result<T, HaplocheckError>;

impl HaplocheckError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    pub fn reference(message: impl Into<String>) -> Self {
        Self::ReferenceData(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Wraps an `io::Error` with the path it came from.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}

impl From<std::io::Error> for HaplocheckError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            source: err,
            path: PathBuf::from("<unknown>"),
        }
    }
}
