//! Chapter reader.
//!
//! Chapter loads are last-request-wins: each load takes a new generation
//! number before it goes to the network, and a result whose generation is
//! no longer current is dropped.  Bookmark and highlight writes go through
//! the [`AnnotationCache`] so the verse row updates at once and rolls back
//! if the backend refuses the write.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use verbum_shared::constants::FALLBACK_CHAPTER_BOUND;
use verbum_shared::{Catalog, HighlightColor, Verse, VerseKey};
use verbum_store::Session;

use crate::annotations::AnnotationCache;
use crate::error::{ClientError, Result};
use crate::navigator::{Cursor, ReadingNavigator};
use crate::views::ViewContext;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseRow {
    pub number: u32,
    pub key: VerseKey,
    pub text: String,
    pub bookmarked: bool,
    pub highlight: Option<HighlightColor>,
    /// A write for this verse is still in flight.
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderSnapshot {
    pub book: String,
    pub chapter: u32,
    pub chapter_count: u32,
    pub translation: String,
    pub loading: bool,
    pub error: Option<String>,
    pub verses: Vec<VerseRow>,
}

struct ReaderState {
    navigator: ReadingNavigator,
    translation: String,
    verses: Vec<Verse>,
    marks: AnnotationCache,
    loading: bool,
    generation: u64,
    error: Option<String>,
}

type Marks = Vec<(VerseKey, bool, Option<HighlightColor>)>;

pub struct BibleReaderView {
    ctx: ViewContext,
    state: Mutex<ReaderState>,
}

impl BibleReaderView {
    pub fn new(
        ctx: ViewContext,
        book: impl Into<String>,
        chapter: u32,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            ctx,
            state: Mutex::new(ReaderState {
                navigator: ReadingNavigator::new(book, chapter),
                translation: translation.into(),
                verses: Vec::new(),
                marks: AnnotationCache::new(),
                loading: false,
                generation: 0,
                error: None,
            }),
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Load the chapter under the cursor, first clamping it into the
    /// book's chapter range.
    pub async fn open(&self) {
        self.move_cursor(|nav, catalog| {
            nav.clamp(catalog);
            true
        })
        .await;
    }

    pub async fn reload(&self) {
        self.load_current().await;
    }

    pub async fn next(&self) {
        self.move_cursor(|nav, catalog| nav.next(catalog)).await;
    }

    pub async fn previous(&self) {
        self.move_cursor(|nav, catalog| nav.previous(catalog)).await;
    }

    pub async fn go_to(&self, book: &str, chapter: u32) {
        self.move_cursor(|nav, catalog| nav.go_to(catalog, book, chapter))
            .await;
    }

    pub async fn set_translation(&self, code: &str) {
        {
            let mut state = self.state.lock().await;
            state.translation = code.trim().to_ascii_lowercase();
        }
        self.load_current().await;
    }

    async fn move_cursor<F>(&self, step: F)
    where
        F: FnOnce(&mut ReadingNavigator, &Catalog) -> bool,
    {
        let empty = Catalog::default();
        let catalog = match self.ctx.catalog.list_books().await {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "catalog unavailable, using fallback bounds");
                &empty
            }
        };

        let moved = {
            let mut state = self.state.lock().await;
            step(&mut state.navigator, catalog)
        };

        if moved {
            self.load_current().await;
        } else {
            debug!("cursor unchanged");
        }
    }

    async fn load_current(&self) {
        let (generation, cursor, translation) = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.loading = true;
            (
                state.generation,
                state.navigator.cursor().clone(),
                state.translation.clone(),
            )
        };

        let session = self.ctx.session.current();
        let result = self
            .fetch_chapter(&cursor, &translation, session.as_ref())
            .await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            debug!(
                book = %cursor.book,
                chapter = cursor.chapter,
                "discarding stale chapter load"
            );
            return;
        }
        state.loading = false;

        match result {
            Ok((verses, marks)) => {
                info!(
                    book = %cursor.book,
                    chapter = cursor.chapter,
                    verses = verses.len(),
                    "chapter shown"
                );
                state.verses = verses;
                state.marks.reset(marks);
                state.error = None;
            }
            Err(e) => {
                state.verses.clear();
                state.marks.clear();
                state.error = Some(e.user_message());
                drop(state);
                self.ctx.notifier.failure("load chapter", &e);
            }
        }
    }

    async fn fetch_chapter(
        &self,
        cursor: &Cursor,
        translation: &str,
        session: Option<&Session>,
    ) -> Result<(Vec<Verse>, Marks)> {
        let book = self.ctx.resolve_book(&cursor.book).await?;
        let verses = self
            .ctx
            .source
            .load_chapter(&book, cursor.chapter, translation)
            .await?;

        let marks = match session {
            Some(s) if !verses.is_empty() => self.fetch_marks(s, &verses).await,
            _ => Vec::new(),
        };
        Ok((verses, marks))
    }

    /// Bookmark and highlight state for every verse of a chapter, in two
    /// bulk reads.  A failure here still shows the chapter, unmarked.
    async fn fetch_marks(&self, session: &Session, verses: &[Verse]) -> Marks {
        let keys: Vec<VerseKey> = verses.iter().map(Verse::key).collect();
        let store = &self.ctx.annotations;

        let (bookmarks, highlights) = futures::join!(
            store.bookmarks_for(session, &keys),
            store.highlights_for(session, &keys)
        );

        let (bookmarks, highlights) = match (bookmarks, highlights) {
            (Ok(b), Ok(h)) => (b, h),
            (Err(e), _) | (_, Err(e)) => {
                self.ctx
                    .notifier
                    .failure("load annotations", &ClientError::from(e));
                return keys.into_iter().map(|k| (k, false, None)).collect();
            }
        };

        let bookmarked: HashSet<VerseKey> = bookmarks.into_iter().map(|b| b.verse_key).collect();
        let colors: HashMap<VerseKey, Option<HighlightColor>> = highlights
            .into_iter()
            .map(|h| (h.verse_key, h.color))
            .collect();

        keys.into_iter()
            .map(|k| {
                let color = colors.get(&k).copied().flatten();
                (k.clone(), bookmarked.contains(&k), color)
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Annotations
    // ------------------------------------------------------------------

    /// Flip the bookmark on `key`.
    pub async fn toggle_bookmark(&self, key: &VerseKey) {
        let session = match self.ctx.session.require() {
            Ok(s) => s,
            Err(e) => {
                self.ctx
                    .notifier
                    .failure("toggle bookmark", &ClientError::from(e));
                return;
            }
        };

        let ticket = {
            let mut state = self.state.lock().await;
            let target = !state.marks.is_bookmarked(key);
            state.marks.begin_bookmark(key, target)
        };
        let adding = ticket.value;

        let store = &self.ctx.annotations;
        let result = if adding {
            store.set_bookmark(&session, key).await.map(|_| ())
        } else {
            store.clear_bookmark(&session, key).await
        };

        self.state
            .lock()
            .await
            .marks
            .settle_bookmark(ticket, result.is_ok());

        match result {
            Ok(()) if adding => self.ctx.notifier.success("Bookmark added"),
            Ok(()) => self.ctx.notifier.success("Bookmark removed"),
            Err(e) => self
                .ctx
                .notifier
                .failure("toggle bookmark", &ClientError::from(e)),
        }
    }

    /// Set or clear (`None`) the highlight on `key`.
    pub async fn set_highlight(&self, key: &VerseKey, color: Option<HighlightColor>) {
        let session = match self.ctx.session.require() {
            Ok(s) => s,
            Err(e) => {
                self.ctx
                    .notifier
                    .failure("set highlight", &ClientError::from(e));
                return;
            }
        };

        let ticket = self.state.lock().await.marks.begin_highlight(key, color);

        let result = self
            .ctx
            .annotations
            .set_highlight(&session, key, color)
            .await;

        self.state
            .lock()
            .await
            .marks
            .settle_highlight(ticket, result.is_ok());

        if let Err(e) = result {
            self.ctx
                .notifier
                .failure("set highlight", &ClientError::from(e));
        }
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    pub async fn snapshot(&self) -> ReaderSnapshot {
        let state = self.state.lock().await;
        let cursor = state.navigator.cursor();
        let chapter_count = self
            .ctx
            .catalog
            .loaded()
            .map(|c| ReadingNavigator::bound(c, &cursor.book))
            .unwrap_or(FALLBACK_CHAPTER_BOUND);

        let verses = state
            .verses
            .iter()
            .map(|v| {
                let key = v.key();
                let marks = state.marks.get(&key);
                VerseRow {
                    number: v.number(),
                    text: v.text.clone(),
                    bookmarked: state.marks.is_bookmarked(&key),
                    highlight: state.marks.highlight(&key),
                    pending: marks.map(|m| m.is_pending()).unwrap_or(false),
                    key,
                }
            })
            .collect();

        ReaderSnapshot {
            book: cursor.book.clone(),
            chapter: cursor.chapter,
            chapter_count,
            translation: state.translation.clone(),
            loading: state.loading,
            error: state.error.clone(),
            verses,
        }
    }
}
