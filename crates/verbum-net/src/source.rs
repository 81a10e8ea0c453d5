//! Chapter data sources.
//!
//! Both upstreams are normalised into a plain `Vec<Verse>`.  Verses come back
//! in whatever order the upstream delivered them: the verse service sends
//! them presorted, the books service makes no promise, and neither is
//! re-sorted here.  Callers that need a specific order sort themselves.

use async_trait::async_trait;
use tracing::{debug, warn};

use verbum_shared::{Book, BookAddressing, Verse, VerseRef};

use crate::error::Result;
use crate::http::{get_json, normalize_base};
use crate::schema::{ChapterResponse, PassageResponse};

#[async_trait]
pub trait ChapterSource: std::fmt::Debug + Send + Sync {
    /// Which book identifier this source puts in its URLs.
    fn addressing(&self) -> BookAddressing;

    /// Fetch one chapter.  One network call; chapter `0` and chapters the
    /// upstream does not have yield an empty list.
    ///
    /// Returned verses carry `book.name` as their book, whatever the
    /// upstream calls it, so verse keys stay identical across sources.
    async fn load_chapter(&self, book: &Book, chapter: u32, translation: &str)
        -> Result<Vec<Verse>>;
}

fn to_verse(book: &Book, chapter: u32, verse: u32, text: &str) -> Option<Verse> {
    match VerseRef::new(book.name.as_str(), chapter, verse) {
        Ok(reference) => Some(Verse {
            reference,
            text: text.trim().to_string(),
        }),
        Err(e) => {
            warn!(book = %book.name, chapter, verse, error = %e, "dropping upstream verse");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// VerseApiSource
// ---------------------------------------------------------------------------

/// Verse-by-reference service, addressed by book name:
/// `GET {base}/{book}+{chapter}?translation={code}`.
#[derive(Debug, Clone)]
pub struct VerseApiSource {
    base_url: String,
    pub(crate) http: reqwest::Client,
}

impl VerseApiSource {
    pub fn new(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: normalize_base(base_url),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn chapter_url(&self, book_name: &str, chapter: u32) -> String {
        let book = book_name.split_whitespace().collect::<Vec<_>>().join("+");
        format!("{}/{}+{}", self.base_url, book, chapter)
    }
}

#[async_trait]
impl ChapterSource for VerseApiSource {
    fn addressing(&self) -> BookAddressing {
        BookAddressing::Name
    }

    async fn load_chapter(
        &self,
        book: &Book,
        chapter: u32,
        translation: &str,
    ) -> Result<Vec<Verse>> {
        if chapter == 0 {
            return Ok(Vec::new());
        }

        let url = self.chapter_url(book.identifier(self.addressing()), chapter);
        let Some(passage) =
            get_json::<PassageResponse>(&self.http, &url, &[("translation", translation)]).await?
        else {
            debug!(book = %book.name, chapter, translation, "chapter not found upstream");
            return Ok(Vec::new());
        };

        let verses: Vec<Verse> = passage
            .verses
            .iter()
            .filter(|v| v.chapter == chapter)
            .filter_map(|v| to_verse(book, chapter, v.verse, &v.text))
            .collect();

        debug!(
            book = %book.name,
            chapter,
            translation,
            reference = %passage.reference,
            count = verses.len(),
            "chapter loaded"
        );
        Ok(verses)
    }
}

// ---------------------------------------------------------------------------
// BooksApiSource
// ---------------------------------------------------------------------------

/// Books/chapters service, addressed by abbreviation:
/// `GET {base}/books/{abbreviation}/chapters/{n}`.
///
/// The service serves a single translation, so the `translation` argument
/// does not reach the request.
#[derive(Debug, Clone)]
pub struct BooksApiSource {
    base_url: String,
    http: reqwest::Client,
}

impl BooksApiSource {
    pub fn new(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: normalize_base(base_url),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChapterSource for BooksApiSource {
    fn addressing(&self) -> BookAddressing {
        BookAddressing::Abbreviation
    }

    async fn load_chapter(
        &self,
        book: &Book,
        chapter: u32,
        translation: &str,
    ) -> Result<Vec<Verse>> {
        if chapter == 0 {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/books/{}/chapters/{}",
            self.base_url,
            book.identifier(self.addressing()),
            chapter
        );
        debug!(translation, "books service ignores the translation parameter");

        let Some(resp) = get_json::<ChapterResponse>(&self.http, &url, &[]).await? else {
            debug!(book = %book.name, chapter, "chapter not found upstream");
            return Ok(Vec::new());
        };

        let verses: Vec<Verse> = resp
            .data
            .verses
            .iter()
            .filter_map(|v| to_verse(book, chapter, v.verse, &v.text))
            .collect();

        debug!(book = %book.name, chapter, count = verses.len(), "chapter loaded");
        Ok(verses)
    }
}
