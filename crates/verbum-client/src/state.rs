//! Application state shared by every view.
//!
//! [`App`] is the composition root: it builds the HTTP client, the chapter
//! source and catalog selected by [`ClientConfig`], the annotation backend
//! and the session context, then hands views their collaborators.

use std::sync::Arc;

use tracing::{info, warn};

use verbum_net::{build_http_client, BookCatalog, BooksApiSource, ChapterSource, VerseApiSource};
use verbum_shared::constants::DEFAULT_BOOK;
use verbum_store::{AnnotationStore, MemoryStore, PlanStore, RestStore, Session, SessionContext};

use crate::config::{ChapterSourceKind, ClientConfig};
use crate::error::{ClientError, Result};
use crate::events::Notifier;
use crate::views::{BibleReaderView, BookmarksListView, DailyVerseView, ReadingPlansView, ViewContext};

pub struct App {
    config: ClientConfig,
    catalog: Arc<BookCatalog>,
    source: Arc<dyn ChapterSource>,
    verse_api: Arc<VerseApiSource>,
    annotations: Arc<dyn AnnotationStore>,
    plans: Arc<dyn PlanStore>,
    /// `None` when no backend is configured; annotations then live in
    /// memory for the session and sign-in is unavailable.
    backend: Option<RestStore>,
    session: SessionContext,
    notifier: Notifier,
}

impl App {
    pub fn new(config: ClientConfig, notifier: Notifier) -> Result<Self> {
        let http = build_http_client(config.http_timeout)?;

        let verse_api = Arc::new(VerseApiSource::new(config.verse_api_url.as_str(), http.clone()));

        let catalog = match &config.books_api_url {
            Some(url) => BookCatalog::from_api(url.as_str(), http.clone()),
            None => BookCatalog::static_canon(),
        };

        let source: Arc<dyn ChapterSource> = match (config.chapter_source, &config.books_api_url) {
            (ChapterSourceKind::BooksApi, Some(url)) => {
                Arc::new(BooksApiSource::new(url.as_str(), http.clone()))
            }
            _ => verse_api.clone(),
        };

        let (annotations, plans, backend): (Arc<dyn AnnotationStore>, Arc<dyn PlanStore>, _) =
            match config.backend() {
                Some((url, key)) => {
                    let rest = RestStore::new(url, key, http);
                    let shared = Arc::new(rest.clone());
                    (shared.clone(), shared, Some(rest))
                }
                None => {
                    warn!("no backend configured, annotations are kept in memory");
                    let memory = Arc::new(MemoryStore::new());
                    (memory.clone(), memory, None)
                }
            };

        info!(
            source = ?config.chapter_source,
            translation = %config.translation,
            backend = backend.is_some(),
            "client ready"
        );

        Ok(Self {
            config,
            catalog: Arc::new(catalog),
            source,
            verse_api,
            annotations,
            plans,
            backend,
            session: SessionContext::new(),
            notifier,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let backend = self.require_backend()?;
        match backend.sign_in_with_password(email, password).await {
            Ok(session) => {
                self.session.set(session.clone());
                self.notifier.success("Signed in");
                Ok(session)
            }
            Err(e) => {
                let err = ClientError::from(e);
                self.notifier.failure("sign in", &err);
                Err(err)
            }
        }
    }

    /// Clear the local session.  A failed remote logout is logged only:
    /// the token is forgotten either way.
    pub async fn sign_out(&self) {
        let Some(session) = self.session.clear() else {
            return;
        };
        if let Some(backend) = &self.backend {
            if let Err(e) = backend.sign_out(&session).await {
                warn!(error = %e, "remote sign-out failed");
            }
        }
        self.notifier.success("Signed out");
    }

    fn require_backend(&self) -> Result<&RestStore> {
        self.backend
            .as_ref()
            .ok_or_else(|| ClientError::Config("No backend is configured.".to_string()))
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    fn view_context(&self) -> ViewContext {
        ViewContext {
            catalog: self.catalog.clone(),
            source: self.source.clone(),
            annotations: self.annotations.clone(),
            session: self.session.clone(),
            notifier: self.notifier.clone(),
        }
    }

    /// Reader opened on chapter 1 of the first book.
    pub fn reader(&self) -> BibleReaderView {
        self.reader_at(DEFAULT_BOOK, 1)
    }

    pub fn reader_at(&self, book: &str, chapter: u32) -> BibleReaderView {
        BibleReaderView::new(self.view_context(), book, chapter, self.config.translation.as_str())
    }

    pub fn bookmarks(&self) -> BookmarksListView {
        BookmarksListView::new(self.view_context(), self.config.translation.as_str())
    }

    pub fn daily(&self) -> DailyVerseView {
        DailyVerseView::new(
            self.view_context(),
            self.verse_api.clone(),
            self.config.translation.as_str(),
        )
    }

    pub fn plans(&self) -> ReadingPlansView {
        ReadingPlansView::new(self.plans.clone(), self.session.clone(), self.notifier.clone())
    }
}
