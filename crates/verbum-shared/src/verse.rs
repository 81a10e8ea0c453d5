//! Verse identity.
//!
//! A [`VerseRef`] addresses one verse by book name, chapter and verse number.
//! Its [`VerseKey`] is the canonical `"<book>.<chapter>.<verse>"` string used
//! as the join key for every annotation stored in the backend, so the same
//! verse must produce the same key whether it was reached by navigation, by
//! the daily verse or by reading back a stored bookmark.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::VERSE_KEY_DELIMITER;
use crate::error::VerseKeyError;

// ---------------------------------------------------------------------------
// VerseRef
// ---------------------------------------------------------------------------

/// Structured (book, chapter, verse) address.
///
/// Fields are private: a `VerseRef` can only be built through [`VerseRef::new`]
/// or [`VerseRef::parse`], which guarantees the book is non-empty and free of
/// the key delimiter and both numbers are at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VerseRef {
    book: String,
    chapter: u32,
    verse: u32,
}

impl VerseRef {
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32) -> Result<Self, VerseKeyError> {
        let book = book.into();
        if book.trim().is_empty() {
            return Err(VerseKeyError::InvalidRef("book name is empty"));
        }
        if book.contains(VERSE_KEY_DELIMITER) {
            return Err(VerseKeyError::InvalidRef("book name contains the key delimiter"));
        }
        if chapter == 0 {
            return Err(VerseKeyError::InvalidRef("chapter must be at least 1"));
        }
        if verse == 0 {
            return Err(VerseKeyError::InvalidRef("verse must be at least 1"));
        }
        Ok(Self {
            book,
            chapter,
            verse,
        })
    }

    pub fn book(&self) -> &str {
        &self.book
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn verse(&self) -> u32 {
        self.verse
    }

    /// Canonical key for this verse.
    pub fn key(&self) -> VerseKey {
        VerseKey(format!(
            "{}{d}{}{d}{}",
            self.book,
            self.chapter,
            self.verse,
            d = VERSE_KEY_DELIMITER
        ))
    }

    /// Parse a canonical key back into a reference.
    ///
    /// Only keys that [`VerseRef::key`] could have produced are accepted:
    /// exactly three non-empty parts, and chapter/verse written as plain
    /// ASCII digits with no sign and no leading zero.
    pub fn parse(key: &str) -> Result<Self, VerseKeyError> {
        let mut parts = key.split(VERSE_KEY_DELIMITER);
        let (Some(book), Some(chapter), Some(verse), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(VerseKeyError::malformed(key, "expected exactly three parts"));
        };

        if book.is_empty() || chapter.is_empty() || verse.is_empty() {
            return Err(VerseKeyError::malformed(key, "empty component"));
        }
        if book.trim().is_empty() {
            return Err(VerseKeyError::malformed(key, "blank book name"));
        }

        let chapter = parse_positive(chapter)
            .ok_or_else(|| VerseKeyError::malformed(key, "chapter is not a positive integer"))?;
        let verse = parse_positive(verse)
            .ok_or_else(|| VerseKeyError::malformed(key, "verse is not a positive integer"))?;

        Ok(Self {
            book: book.to_string(),
            chapter,
            verse,
        })
    }
}

fn parse_positive(s: &str) -> Option<u32> {
    if !s.bytes().all(|b| b.is_ascii_digit()) || s.starts_with('0') {
        return None;
    }
    s.parse::<u32>().ok().filter(|n| *n >= 1)
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

impl FromStr for VerseRef {
    type Err = VerseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for VerseRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            book: String,
            chapter: u32,
            verse: u32,
        }
        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.book, raw.chapter, raw.verse).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// VerseKey
// ---------------------------------------------------------------------------

/// Canonical string form of a [`VerseRef`], stored as `verse_id` in the
/// backend.
///
/// A key read back from storage is not re-validated until it is parsed;
/// rows written by older clients may hold keys that no longer parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerseKey(String);

impl VerseKey {
    /// Wrap a raw stored key without validating it.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_ref(&self) -> Result<VerseRef, VerseKeyError> {
        VerseRef::parse(&self.0)
    }
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&VerseRef> for VerseKey {
    fn from(r: &VerseRef) -> Self {
        r.key()
    }
}

// ---------------------------------------------------------------------------
// Verse
// ---------------------------------------------------------------------------

/// A fetched verse.  Transient: created per chapter load, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub reference: VerseRef,
    pub text: String,
}

impl Verse {
    pub fn number(&self) -> u32 {
        self.reference.verse()
    }

    pub fn key(&self) -> VerseKey {
        self.reference.key()
    }
}
