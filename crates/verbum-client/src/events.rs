//! Non-blocking user-visible notices.
//!
//! Views never fail loudly: every error is logged and turned into a
//! [`Notice`] pushed on an unbounded channel that the front end drains at
//! its own pace.

use serde::Serialize;
use tokio::sync::mpsc;

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Sending half of the notice channel.  Cheap to clone.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: Option<mpsc::UnboundedSender<Notice>>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A notifier that drops every notice.
    pub fn silent() -> Self {
        Self { tx: None }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.emit(NoticeLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(NoticeLevel::Error, message.into());
    }

    /// Log `err` against `action` and raise its user message.
    pub fn failure(&self, action: &str, err: &ClientError) {
        tracing::error!(action, error = %err, "operation failed");
        self.error(err.user_message());
    }

    fn emit(&self, level: NoticeLevel, message: String) {
        let Some(tx) = &self.tx else {
            return;
        };
        if let Err(e) = tx.send(Notice { level, message }) {
            tracing::debug!(error = %e, "notice receiver dropped");
        }
    }
}
