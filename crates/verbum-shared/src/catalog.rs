//! Book catalog data.
//!
//! The two upstream content services disagree on how a book is addressed:
//! the verse service takes the free-form book name, the books service a
//! fixed abbreviation code.  A [`Book`] carries both and hands out whichever
//! one a source asks for via [`BookAddressing`].

use serde::{Deserialize, Serialize};

use crate::canon::CANON;

/// How an upstream source addresses a book in its URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookAddressing {
    Name,
    Abbreviation,
}

/// Catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub name: String,
    pub abbreviation: String,
    pub chapter_count: u32,
}

impl Book {
    pub fn new(name: impl Into<String>, abbreviation: impl Into<String>, chapter_count: u32) -> Self {
        Self {
            name: name.into(),
            abbreviation: abbreviation.into(),
            chapter_count,
        }
    }

    /// The identifier a source with the given addressing scheme expects.
    pub fn identifier(&self, addressing: BookAddressing) -> &str {
        match addressing {
            BookAddressing::Name => &self.name,
            BookAddressing::Abbreviation => &self.abbreviation,
        }
    }
}

/// Books in canonical scriptural order.
///
/// Order matters: cross-book navigation and the bookmark list both use a
/// book's position here, never alphabetical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// The built-in 66-book table.
    pub fn canonical() -> Self {
        Self::new(
            CANON
                .iter()
                .map(|(name, abbr, chapters)| Book::new(*name, *abbr, *chapters))
                .collect(),
        )
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn first(&self) -> Option<&Book> {
        self.books.first()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.books.iter().position(|b| b.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.name == name)
    }

    /// Chapter count for `name`, or 0 when the book is not listed.
    pub fn chapter_count(&self, name: &str) -> u32 {
        self.get(name).map(|b| b.chapter_count).unwrap_or(0)
    }

    pub fn next_after(&self, name: &str) -> Option<&Book> {
        self.position(name).and_then(|i| self.books.get(i + 1))
    }

    pub fn previous_before(&self, name: &str) -> Option<&Book> {
        self.position(name)
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.books.get(i))
    }
}
