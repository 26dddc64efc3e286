use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for tarsau operations
pub type Result<T> = std::result::Result<T, SauError>;

/// Unified error type for all tarsau operations
#[derive(Debug, Error)]
pub enum SauError {
    // Invocation errors
    #[error("{0}")]
    Usage(String),

    #[error("Exceeded the maximum number of input files: {count} given (max {max})")]
    TooManyFiles { count: usize, max: usize },

    #[error("Not a regular archive file: {}", .0.display())]
    NotAnArchive(PathBuf),

    // Format errors
    #[error("Archive header too short: {0} bytes (need at least 10)")]
    HeaderTooShort(usize),

    #[error("Invalid entry count field: {0:?}")]
    InvalidCount(String),

    #[error("Invalid archive format: {0}")]
    InvalidFormat(String),

    #[error("Archive payload truncated while reading entry: {name}")]
    TruncatedPayload { name: String },

    #[error("Missing end-of-archive marker")]
    MissingSentinel,

    // Name errors
    #[error("Invalid entry name: {0}")]
    InvalidName(String),

    #[error("Refusing to extract unsafe path: {0}")]
    UnsafePath(String),

    // I/O errors
    #[error("I/O error on '{}': {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SauError {
    /// Wrap an I/O error with the path it happened on
    pub fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SauError::File {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by a malformed archive rather than the environment
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            SauError::HeaderTooShort(_)
                | SauError::InvalidCount(_)
                | SauError::InvalidFormat(_)
                | SauError::TruncatedPayload { .. }
                | SauError::MissingSentinel
        )
    }
}

