//! Wire schemas, one per upstream endpoint.
//!
//! Upstream payloads are decoded into these structs at the boundary and
//! normalised into [`verbum_shared::Verse`] / [`verbum_shared::Book`] before
//! anything else sees them.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Verse-by-reference service
// ---------------------------------------------------------------------------

/// `GET /{book}+{chapter}?translation={code}`
#[derive(Debug, Clone, Deserialize)]
pub struct PassageResponse {
    pub reference: String,
    pub verses: Vec<PassageVerse>,
    /// Whole passage as one string.
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PassageVerse {
    pub book_name: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

/// `GET /random?translation={code}`
#[derive(Debug, Clone, Deserialize)]
pub struct RandomVerseResponse {
    #[serde(alias = "book")]
    pub book_name: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
    #[serde(default)]
    pub reference: Option<String>,
}

// ---------------------------------------------------------------------------
// Books/chapters service
// ---------------------------------------------------------------------------

/// `GET /books`
#[derive(Debug, Clone, Deserialize)]
pub struct BooksResponse {
    pub data: Vec<BookEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookEntry {
    pub name: String,
    pub chapters: u32,
    pub abbreviation: String,
}

/// `GET /books/{abbreviation}/chapters/{n}`
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterResponse {
    pub data: ChapterData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChapterData {
    #[serde(default)]
    pub verses: Vec<ChapterVerse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChapterVerse {
    pub verse: u32,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passage_ignores_unknown_fields() {
        let json = r#"{
            "reference": "John 3:16",
            "verses": [{"book_id":"JHN","book_name":"John","chapter":3,"verse":16,"text":"For God so loved the world\n"}],
            "text": "For God so loved the world\n",
            "translation_id": "kjv"
        }"#;
        let p: PassageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(p.verses.len(), 1);
        assert_eq!(p.verses[0].verse, 16);
    }

    #[test]
    fn random_accepts_book_alias() {
        let json = r#"{"book":"Psalms","chapter":23,"verse":1,"text":"The LORD is my shepherd"}"#;
        let r: RandomVerseResponse = serde_json::from_str(json).unwrap();
        assert_eq!(r.book_name, "Psalms");
        assert!(r.reference.is_none());
    }

    #[test]
    fn chapter_without_verses_decodes_empty() {
        let c: ChapterResponse = serde_json::from_str(r#"{"data":{}}"#).unwrap();
        assert!(c.data.verses.is_empty());
    }
}
