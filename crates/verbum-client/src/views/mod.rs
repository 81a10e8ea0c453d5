//! Headless view-models.
//!
//! Each view owns its state behind a `tokio::sync::Mutex` that is held only
//! for short critical sections, never across a network call.  Operations
//! never return errors: failures are logged and raised as notices, and the
//! loading flag is cleared on every exit path.  Front ends render from
//! `snapshot()`.

pub mod bookmarks;
pub mod daily;
pub mod plans;
pub mod reader;

pub use bookmarks::{BookmarkEntry, BookmarksListView, BookmarksSnapshot};
pub use daily::{DailySnapshot, DailyVerseView};
pub use plans::{PlanProgress, PlansSnapshot, ReadingPlansView};
pub use reader::{BibleReaderView, ReaderSnapshot, VerseRow};

use std::sync::Arc;

use tracing::{debug, warn};

use verbum_net::{BookCatalog, ChapterSource, NetError};
use verbum_shared::{Book, BookAddressing};
use verbum_store::{AnnotationStore, SessionContext};

use crate::error::Result;
use crate::events::Notifier;

/// Collaborators shared by the scripture views.
#[derive(Clone)]
pub struct ViewContext {
    pub catalog: Arc<BookCatalog>,
    pub source: Arc<dyn ChapterSource>,
    pub annotations: Arc<dyn AnnotationStore>,
    pub session: SessionContext,
    pub notifier: Notifier,
}

impl ViewContext {
    /// Catalog entry for `name`.
    ///
    /// A name-addressed source can still fetch a book the catalog does not
    /// list (or while the catalog is unavailable); an abbreviation-addressed
    /// one cannot.
    pub(crate) async fn resolve_book(&self, name: &str) -> Result<Book> {
        match self.catalog.list_books().await {
            Ok(catalog) => {
                if let Some(book) = catalog.get(name) {
                    return Ok(book.clone());
                }
            }
            Err(e) if self.source.addressing() == BookAddressing::Abbreviation => {
                return Err(e.into());
            }
            Err(e) => warn!(error = %e, "catalog unavailable, addressing book by name"),
        }

        match self.source.addressing() {
            BookAddressing::Name => {
                debug!(book = %name, "book not in catalog");
                Ok(Book::new(name, name, 0))
            }
            BookAddressing::Abbreviation => Err(NetError::UnknownBook(name.to_string()).into()),
        }
    }
}
