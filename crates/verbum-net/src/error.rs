use thiserror::Error;

/// Errors produced when talking to the upstream content services.
#[derive(Error, Debug)]
pub enum NetError {
    /// Transport failure, non-success status, or a body that does not match
    /// the endpoint's schema.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The catalog is not loaded or does not list this book.
    #[error("Unknown book: {0}")]
    UnknownBook(String),

    /// The HTTP client itself could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, NetError>;
