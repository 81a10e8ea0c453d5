use thiserror::Error;

use verbum_net::NetError;
use verbum_shared::VerseKeyError;
use verbum_store::StoreError;

/// Errors surfaced by the view layer.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Net(#[from] NetError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Key(#[from] VerseKeyError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Short text for a user-visible notice.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Net(NetError::UpstreamUnavailable(_)) => {
                "The scripture service is unavailable. Try again later.".to_string()
            }
            ClientError::Net(NetError::UnknownBook(book)) => format!("Unknown book: {book}"),
            ClientError::Net(NetError::Client(e)) => {
                format!("Network error: {}", verbum_net::http::describe_transport_error(e))
            }
            ClientError::Store(StoreError::Unauthenticated) => {
                "Sign in to save bookmarks, highlights and plans.".to_string()
            }
            ClientError::Store(StoreError::InvalidCredentials) => {
                "Invalid email or password.".to_string()
            }
            ClientError::Store(StoreError::Http(e)) => {
                format!("Network error: {}", verbum_net::http::describe_transport_error(e))
            }
            ClientError::Store(_) => "Could not save your changes. Try again.".to_string(),
            ClientError::Key(e) => e.to_string(),
            ClientError::Config(msg) => msg.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
