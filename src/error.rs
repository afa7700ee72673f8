//! Error types.
//!
//! Nothing in the sheet is fatal. Rolling never fails (a busy stat is a
//! [`Resolution::Busy`](crate::Resolution::Busy), not an error), and
//! out-of-range adjustments clamp. What remains are storage, document and
//! remote failures, which callers log or surface as transient notices.

use thiserror::Error;

/// Errors from a local key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file does not hold a valid key-value map.
    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors from authentication or the remote document store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Sign-in was refused.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The operation needs a signed-in user.
    #[error("Not signed in")]
    NotSignedIn,

    /// The remote store rejected or failed the request.
    #[error("Remote store error: {0}")]
    Store(String),
}

/// Top-level error type for sheet persistence.
///
/// # Examples
///
/// ```rust
/// use diesheet::{RemoteError, SheetError};
///
/// let err = SheetError::from(RemoteError::NotSignedIn);
/// assert_eq!(err.to_string(), "Not signed in");
/// ```
#[derive(Debug, Error)]
pub enum SheetError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A stored document could not be parsed.
    #[error("Malformed sheet document: {0}")]
    Document(#[from] serde_json::Error),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}
