//! Verse of the day.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use verbum_net::{DailyVerse, VerseApiSource};
use verbum_shared::VerseKey;

use crate::annotations::{SyncState, Tracked};
use crate::error::ClientError;
use crate::views::ViewContext;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySnapshot {
    pub loading: bool,
    pub reference: Option<String>,
    pub text: Option<String>,
    pub key: Option<VerseKey>,
    pub bookmarked: bool,
    pub pending: bool,
}

#[derive(Default)]
struct DailyState {
    loading: bool,
    verse: Option<DailyVerse>,
    bookmarked: Tracked<bool>,
    next_ticket: u64,
}

pub struct DailyVerseView {
    ctx: ViewContext,
    verses: Arc<VerseApiSource>,
    translation: String,
    state: Mutex<DailyState>,
}

impl DailyVerseView {
    pub fn new(ctx: ViewContext, verses: Arc<VerseApiSource>, translation: impl Into<String>) -> Self {
        Self {
            ctx,
            verses,
            translation: translation.into(),
            state: Mutex::new(DailyState::default()),
        }
    }

    /// Fetch a new random verse and, when signed in, whether it is
    /// bookmarked.
    pub async fn refresh(&self) {
        self.state.lock().await.loading = true;

        let result = self.verses.random_verse(&self.translation).await;
        let verse = match result {
            Ok(v) => v,
            Err(e) => {
                self.state.lock().await.loading = false;
                self.ctx.notifier.failure("load daily verse", &ClientError::from(e));
                return;
            }
        };

        let key = verse.verse.key();
        let bookmarked = match self.ctx.session.current() {
            Some(session) => match self.ctx.annotations.get_bookmark(&session, &key).await {
                Ok(found) => found.is_some(),
                Err(e) => {
                    self.ctx
                        .notifier
                        .failure("load daily verse bookmark", &ClientError::from(e));
                    false
                }
            },
            None => false,
        };

        info!(verse = %key, "daily verse shown");
        let mut state = self.state.lock().await;
        state.loading = false;
        state.verse = Some(verse);
        state.bookmarked = Tracked::confirmed(bookmarked);
    }

    pub async fn toggle_bookmark(&self) {
        let session = match self.ctx.session.require() {
            Ok(s) => s,
            Err(e) => {
                self.ctx
                    .notifier
                    .failure("toggle bookmark", &ClientError::from(e));
                return;
            }
        };

        let (key, target, ticket) = {
            let mut state = self.state.lock().await;
            let Some(key) = state.verse.as_ref().map(|v| v.verse.key()) else {
                return;
            };
            let target = !*state.bookmarked.shown();
            state.next_ticket += 1;
            let ticket = state.next_ticket;
            state.bookmarked.begin(target, ticket);
            (key, target, ticket)
        };

        let store = &self.ctx.annotations;
        let result = if target {
            store.set_bookmark(&session, &key).await.map(|_| ())
        } else {
            store.clear_bookmark(&session, &key).await
        };

        {
            let mut state = self.state.lock().await;
            // A refresh in between replaced the verse; its state is fresh.
            if state.verse.as_ref().map(|v| v.verse.key()) == Some(key) {
                state.bookmarked.settle(ticket, target, result.is_ok());
            }
        }

        match result {
            Ok(()) if target => self.ctx.notifier.success("Bookmark added"),
            Ok(()) => self.ctx.notifier.success("Bookmark removed"),
            Err(e) => self
                .ctx
                .notifier
                .failure("toggle bookmark", &ClientError::from(e)),
        }
    }

    pub async fn snapshot(&self) -> DailySnapshot {
        let state = self.state.lock().await;
        DailySnapshot {
            loading: state.loading,
            reference: state.verse.as_ref().map(|v| v.reference.clone()),
            text: state.verse.as_ref().map(|v| v.verse.text.clone()),
            key: state.verse.as_ref().map(|v| v.verse.key()),
            bookmarked: *state.bookmarked.shown(),
            pending: state.bookmarked.state() == SyncState::Pending,
        }
    }
}
