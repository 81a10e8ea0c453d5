//! Reading cursor over the book catalog.
//!
//! Bounds come from the catalog's chapter counts; a book the catalog does
//! not list is bounded by [`FALLBACK_CHAPTER_BOUND`].  Moving past either
//! end of a book crosses into its neighbour in catalog order.

use serde::Serialize;

use verbum_shared::constants::FALLBACK_CHAPTER_BOUND;
use verbum_shared::Catalog;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub book: String,
    pub chapter: u32,
}

#[derive(Debug, Clone)]
pub struct ReadingNavigator {
    cursor: Cursor,
}

impl ReadingNavigator {
    pub fn new(book: impl Into<String>, chapter: u32) -> Self {
        Self {
            cursor: Cursor {
                book: book.into(),
                chapter: chapter.max(1),
            },
        }
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Last chapter of `book`.
    pub fn bound(catalog: &Catalog, book: &str) -> u32 {
        match catalog.chapter_count(book) {
            0 => FALLBACK_CHAPTER_BOUND,
            n => n,
        }
    }

    /// Returns `true` if the cursor moved.
    pub fn next(&mut self, catalog: &Catalog) -> bool {
        if self.cursor.chapter < Self::bound(catalog, &self.cursor.book) {
            self.cursor.chapter += 1;
            return true;
        }
        match catalog.next_after(&self.cursor.book) {
            Some(book) => {
                self.cursor = Cursor {
                    book: book.name.clone(),
                    chapter: 1,
                };
                true
            }
            None => false,
        }
    }

    /// Returns `true` if the cursor moved.
    pub fn previous(&mut self, catalog: &Catalog) -> bool {
        if self.cursor.chapter > 1 {
            self.cursor.chapter -= 1;
            return true;
        }
        match catalog.previous_before(&self.cursor.book) {
            Some(book) => {
                self.cursor = Cursor {
                    chapter: Self::bound(catalog, &book.name),
                    book: book.name.clone(),
                };
                true
            }
            None => false,
        }
    }

    /// Pull the chapter into `[1, bound]` for the current book.  Returns
    /// `true` if the cursor moved.
    pub fn clamp(&mut self, catalog: &Catalog) -> bool {
        let chapter = self
            .cursor
            .chapter
            .clamp(1, Self::bound(catalog, &self.cursor.book));
        if chapter == self.cursor.chapter {
            return false;
        }
        self.cursor.chapter = chapter;
        true
    }

    /// Jump to `book`, with `chapter` clamped into `[1, bound]`.
    pub fn go_to(&mut self, catalog: &Catalog, book: &str, chapter: u32) -> bool {
        let target = Cursor {
            book: book.to_string(),
            chapter: chapter.clamp(1, Self::bound(catalog, book)),
        };
        if target == self.cursor {
            return false;
        }
        self.cursor = target;
        true
    }
}
