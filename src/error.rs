// Error taxonomy for the read layer
//
// Store failures are surfaced verbatim. Decode faults are not represented
// here: a raw column that breaks its fixed layout panics in `decode`.

use std::path::PathBuf;

/// Errors returned by the query services and the CLI plumbing.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Query execution failed (connectivity, malformed SQL, locked database).
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// A snapshot file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot file is not valid JSON for the expected layout.
    #[error("snapshot format error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// The configured database file does not exist.
    #[error("database not found at {}", .0.display())]
    DatabaseNotFound(PathBuf),

    /// An environment override could not be applied.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
