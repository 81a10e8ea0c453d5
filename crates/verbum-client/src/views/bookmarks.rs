//! The user's saved verses.
//!
//! Bookmarks are grouped by chapter before any text is fetched, so the
//! number of upstream requests equals the number of distinct chapters
//! referenced, not the number of bookmarks.  Chapters are fetched
//! concurrently and joined before the list is published.

use std::cmp::Ordering;
use std::collections::HashMap;

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use verbum_shared::{Catalog, Verse, VerseKey, VerseRef};
use verbum_store::{Bookmark, Session};

use crate::error::{ClientError, Result};
use crate::views::ViewContext;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkEntry {
    pub bookmark: Bookmark,
    pub reference: VerseRef,
    /// `None` when the chapter could not be fetched or no longer has the
    /// verse.
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarksSnapshot {
    pub loading: bool,
    pub entries: Vec<BookmarkEntry>,
}

/// Bookmarks that share one `(book, chapter)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterGroup {
    pub book: String,
    pub chapter: u32,
    pub items: Vec<(Bookmark, VerseRef)>,
}

/// Group bookmarks by the chapter their key addresses, in first-seen
/// order.  Malformed keys are logged and skipped.
pub fn group_by_chapter(bookmarks: Vec<Bookmark>) -> Vec<ChapterGroup> {
    let mut groups: Vec<ChapterGroup> = Vec::new();
    let mut index: HashMap<(String, u32), usize> = HashMap::new();

    for bookmark in bookmarks {
        let reference = match bookmark.verse_key.to_ref() {
            Ok(r) => r,
            Err(e) => {
                warn!(key = %bookmark.verse_key, error = %e, "skipping bookmark with malformed key");
                continue;
            }
        };

        let slot = (reference.book().to_string(), reference.chapter());
        let i = *index.entry(slot).or_insert_with(|| {
            groups.push(ChapterGroup {
                book: reference.book().to_string(),
                chapter: reference.chapter(),
                items: Vec::new(),
            });
            groups.len() - 1
        });
        groups[i].items.push((bookmark, reference));
    }

    groups
}

/// Order by catalog position, then chapter, then verse.  Books the catalog
/// does not list go last, by name.
pub fn sort_entries(entries: &mut [BookmarkEntry], catalog: &Catalog) {
    let rank = |r: &VerseRef| catalog.position(r.book()).unwrap_or(usize::MAX);
    entries.sort_by(|a, b| {
        let (ra, rb) = (&a.reference, &b.reference);
        rank(ra)
            .cmp(&rank(rb))
            .then_with(|| match (catalog.position(ra.book()), catalog.position(rb.book())) {
                (None, None) => ra.book().cmp(rb.book()),
                _ => Ordering::Equal,
            })
            .then(ra.chapter().cmp(&rb.chapter()))
            .then(ra.verse().cmp(&rb.verse()))
    });
}

pub struct BookmarksListView {
    ctx: ViewContext,
    translation: String,
    state: Mutex<BookmarksSnapshot>,
}

impl BookmarksListView {
    pub fn new(ctx: ViewContext, translation: impl Into<String>) -> Self {
        Self {
            ctx,
            translation: translation.into(),
            state: Mutex::new(BookmarksSnapshot::default()),
        }
    }

    pub async fn refresh(&self) {
        let session = match self.ctx.session.require() {
            Ok(s) => s,
            Err(e) => {
                self.state.lock().await.entries.clear();
                self.ctx
                    .notifier
                    .failure("list bookmarks", &ClientError::from(e));
                return;
            }
        };

        self.state.lock().await.loading = true;
        let result = self.load(&session).await;

        let mut state = self.state.lock().await;
        state.loading = false;
        match result {
            Ok(entries) => {
                info!(count = entries.len(), "bookmark list refreshed");
                state.entries = entries;
            }
            Err(e) => {
                drop(state);
                self.ctx.notifier.failure("list bookmarks", &e);
            }
        }
    }

    async fn load(&self, session: &Session) -> Result<Vec<BookmarkEntry>> {
        let bookmarks = self.ctx.annotations.list_bookmarks(session).await?;
        let groups = group_by_chapter(bookmarks);
        debug!(chapters = groups.len(), "fetching bookmarked chapters");

        let fetches = groups.iter().map(|g| self.fetch_chapter(&g.book, g.chapter));
        let chapters = join_all(fetches).await;

        let mut entries = Vec::new();
        let mut failed = 0usize;
        for (group, chapter) in groups.into_iter().zip(chapters) {
            let texts: HashMap<u32, String> = match chapter {
                Ok(verses) => verses.into_iter().map(|v| (v.number(), v.text)).collect(),
                Err(e) => {
                    warn!(book = %group.book, chapter = group.chapter, error = %e, "bookmarked chapter unavailable");
                    failed += 1;
                    HashMap::new()
                }
            };
            entries.extend(group.items.into_iter().map(|(bookmark, reference)| BookmarkEntry {
                text: texts.get(&reference.verse()).cloned(),
                bookmark,
                reference,
            }));
        }

        if failed > 0 {
            self.ctx
                .notifier
                .error(format!("Could not load the text of {failed} chapter(s)."));
        }

        // An unavailable catalog still sorts in scriptural order.
        let canonical;
        let catalog = match self.ctx.catalog.loaded() {
            Some(c) => c,
            None => {
                canonical = Catalog::canonical();
                &canonical
            }
        };
        sort_entries(&mut entries, catalog);
        Ok(entries)
    }

    async fn fetch_chapter(&self, book: &str, chapter: u32) -> Result<Vec<Verse>> {
        let book = self.ctx.resolve_book(book).await?;
        self.ctx
            .source
            .load_chapter(&book, chapter, &self.translation)
            .await
            .map_err(ClientError::from)
    }

    /// Remove one bookmark from the backend and the list.
    pub async fn remove(&self, key: &VerseKey) {
        let session = match self.ctx.session.require() {
            Ok(s) => s,
            Err(e) => {
                self.ctx
                    .notifier
                    .failure("remove bookmark", &ClientError::from(e));
                return;
            }
        };

        match self.ctx.annotations.clear_bookmark(&session, key).await {
            Ok(()) => {
                self.state
                    .lock()
                    .await
                    .entries
                    .retain(|e| &e.bookmark.verse_key != key);
                self.ctx.notifier.success("Bookmark removed");
            }
            Err(e) => self
                .ctx
                .notifier
                .failure("remove bookmark", &ClientError::from(e)),
        }
    }

    pub async fn snapshot(&self) -> BookmarksSnapshot {
        self.state.lock().await.clone()
    }
}
