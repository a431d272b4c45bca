//! Error types for the musicdb host.

/// Top-level error type for the host application.
#[derive(Debug, thiserror::Error)]
pub enum MusicDbError {
    /// Configuration file could not be parsed or is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// Command-line arguments were missing or malformed.
    #[error("usage: {0}")]
    Usage(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Lookup pipeline construction failed.
    #[error(transparent)]
    Lookup(#[from] musicdb_lookup::LookupError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, MusicDbError>;
