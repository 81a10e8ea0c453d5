use thiserror::Error;

use verbum_shared::VerseKeyError;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A user-scoped operation was attempted with nobody signed in.
    #[error("Not signed in")]
    Unauthenticated,

    /// The auth service rejected the supplied credentials.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Transport-level failure talking to the backend.
    #[error("Backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    /// A query expected exactly one row but found none.
    #[error("Record not found")]
    NotFound,

    /// The backend answered with a body we could not decode.
    #[error("Unexpected backend response: {0}")]
    Decode(String),

    /// A stored verse key failed to parse.
    #[error("Verse key error: {0}")]
    Key(#[from] VerseKeyError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
