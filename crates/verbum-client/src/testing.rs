//! Fixtures shared by the view tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::mpsc;

use verbum_net::{BookCatalog, VerseApiSource};
use verbum_shared::{HighlightColor, VerseKey};
use verbum_store::{
    AnnotationStore, Bookmark, Highlight, MemoryStore, Session, SessionContext, StoreError,
};

use crate::events::{Notice, Notifier};
use crate::views::ViewContext;

pub fn session() -> Session {
    Session {
        user_id: "reader-1".into(),
        access_token: "jwt".into(),
        email: None,
    }
}

/// `GET /{book}+{chapter}` body with verses `1..=count`.
pub fn passage(book: &str, chapter: u32, count: u32) -> serde_json::Value {
    let verses: Vec<serde_json::Value> = (1..=count)
        .map(|v| {
            json!({
                "book_id": "XXX",
                "book_name": book,
                "chapter": chapter,
                "verse": v,
                "text": format!("{book} {chapter}:{v} text\n"),
            })
        })
        .collect();
    json!({
        "reference": format!("{book} {chapter}"),
        "verses": verses,
        "text": "",
        "translation_id": "kjv",
    })
}

pub fn context(
    verse_api: &str,
    annotations: Arc<dyn AnnotationStore>,
    signed_in: bool,
) -> (ViewContext, mpsc::UnboundedReceiver<Notice>) {
    let (notifier, rx) = Notifier::channel();
    let session = SessionContext::new();
    if signed_in {
        session.set(self::session());
    }
    let ctx = ViewContext {
        catalog: Arc::new(BookCatalog::static_canon()),
        source: Arc::new(VerseApiSource::new(verse_api, http())),
        annotations,
        session,
        notifier,
    };
    (ctx, rx)
}

pub fn http() -> reqwest::Client {
    verbum_net::build_http_client(Duration::from_secs(5)).unwrap()
}

pub fn drain(rx: &mut mpsc::UnboundedReceiver<Notice>) -> Vec<Notice> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

/// Delegates reads and bookmark writes to a [`MemoryStore`]; every
/// highlight write fails with a 500.
#[derive(Debug, Default)]
pub struct FailingHighlights {
    pub inner: MemoryStore,
}

#[async_trait]
impl AnnotationStore for FailingHighlights {
    async fn get_bookmark(
        &self,
        session: &Session,
        key: &VerseKey,
    ) -> verbum_store::Result<Option<Bookmark>> {
        self.inner.get_bookmark(session, key).await
    }

    async fn list_bookmarks(&self, session: &Session) -> verbum_store::Result<Vec<Bookmark>> {
        self.inner.list_bookmarks(session).await
    }

    async fn set_bookmark(&self, session: &Session, key: &VerseKey) -> verbum_store::Result<Bookmark> {
        self.inner.set_bookmark(session, key).await
    }

    async fn clear_bookmark(&self, session: &Session, key: &VerseKey) -> verbum_store::Result<()> {
        self.inner.clear_bookmark(session, key).await
    }

    async fn get_highlight(
        &self,
        session: &Session,
        key: &VerseKey,
    ) -> verbum_store::Result<Option<HighlightColor>> {
        self.inner.get_highlight(session, key).await
    }

    async fn set_highlight(
        &self,
        _session: &Session,
        _key: &VerseKey,
        _color: Option<HighlightColor>,
    ) -> verbum_store::Result<()> {
        Err(StoreError::Backend {
            status: 500,
            body: "upsert failed".into(),
        })
    }

    async fn bookmarks_for(
        &self,
        session: &Session,
        keys: &[VerseKey],
    ) -> verbum_store::Result<Vec<Bookmark>> {
        self.inner.bookmarks_for(session, keys).await
    }

    async fn highlights_for(
        &self,
        session: &Session,
        keys: &[VerseKey],
    ) -> verbum_store::Result<Vec<Highlight>> {
        self.inner.highlights_for(session, keys).await
    }
}
