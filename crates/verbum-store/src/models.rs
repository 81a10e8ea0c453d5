//! Rows persisted in the backend tables.
//!
//! Field names follow the table columns (`verse_id` holds the verse key) so
//! the structs decode straight from the REST interface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use verbum_shared::{HighlightColor, VerseKey};

// ---------------------------------------------------------------------------
// Bookmark
// ---------------------------------------------------------------------------

/// A bookmarked verse.  Presence of the row is the whole payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bookmark {
    pub id: Uuid,
    pub user_id: String,
    #[serde(rename = "verse_id")]
    pub verse_key: VerseKey,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Highlight
// ---------------------------------------------------------------------------

/// A highlight row.  `color: None` is the tombstone and renders exactly like
/// a missing row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Highlight {
    pub user_id: String,
    #[serde(rename = "verse_id")]
    pub verse_key: VerseKey,
    pub color: Option<HighlightColor>,
}

/// Raw highlight row: the colour column may hold legacy values that are
/// normalised by [`HighlightColor::from_stored`].
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HighlightRow {
    pub user_id: String,
    pub verse_id: VerseKey,
    pub color: Option<String>,
}

impl From<HighlightRow> for Highlight {
    fn from(row: HighlightRow) -> Self {
        Self {
            color: HighlightColor::from_stored(row.color.as_deref()),
            user_id: row.user_id,
            verse_key: row.verse_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Reading plans
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadingPlan {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration_days: u32,
    pub is_public: bool,
}

/// A user's position in one plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadingProgress {
    pub user_id: String,
    pub plan_id: Uuid,
    pub day_completed: u32,
}
