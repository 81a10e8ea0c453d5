use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerseKeyError {
    #[error("Malformed verse key {key:?}: {reason}")]
    MalformedKey { key: String, reason: &'static str },

    #[error("Invalid verse reference: {0}")]
    InvalidRef(&'static str),
}

impl VerseKeyError {
    pub(crate) fn malformed(key: &str, reason: &'static str) -> Self {
        Self::MalformedKey {
            key: key.to_string(),
            reason,
        }
    }
}
