use std::path::PathBuf;

use thiserror::Error;

/// Library error type for photo-board operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The photo directory could not be walked; the whole scan is abandoned.
    #[error("failed to scan {root}: {source}")]
    Scan {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A configured extension pattern is not a valid glob.
    #[error("invalid extension pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// The configured time zone is neither `Local` nor a known IANA name.
    #[error("unknown time zone '{0}'")]
    UnknownTimezone(String),

    /// The blocking scan worker panicked or was cancelled.
    #[error("refresh worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Why a filename carries no usable leading date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("filename has no leading date token")]
    MissingToken,

    #[error("'{0}' is not a YYYY-MM-DD date")]
    Malformed(String),
}
