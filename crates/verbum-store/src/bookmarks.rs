//! CRUD operations for [`Bookmark`] rows.

use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use verbum_shared::constants::TABLE_BOOKMARKS;
use verbum_shared::VerseKey;

use crate::error::{Result, StoreError};
use crate::models::Bookmark;
use crate::rest::{eq, in_keys, RestStore};
use crate::session::Session;

const BOOKMARK_COLUMNS: &str = "id,user_id,verse_id,created_at";

impl RestStore {
    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch the caller's bookmark for one verse, if any.
    pub async fn fetch_bookmark(&self, session: &Session, key: &VerseKey) -> Result<Option<Bookmark>> {
        let url = self.table_url(TABLE_BOOKMARKS);
        let req = self
            .request(Method::GET, &url, Some(session))
            .query(&[
                ("select", BOOKMARK_COLUMNS.to_string()),
                ("user_id", eq(&session.user_id)),
                ("verse_id", eq(key.as_str())),
                ("limit", "1".to_string()),
            ]);
        let rows: Vec<Bookmark> = self.send_json(req).await?;
        Ok(rows.into_iter().next())
    }

    /// List the caller's bookmarks, newest first.
    pub async fn fetch_bookmarks(&self, session: &Session) -> Result<Vec<Bookmark>> {
        let url = self.table_url(TABLE_BOOKMARKS);
        let req = self
            .request(Method::GET, &url, Some(session))
            .query(&[
                ("select", BOOKMARK_COLUMNS.to_string()),
                ("user_id", eq(&session.user_id)),
                ("order", "created_at.desc".to_string()),
            ]);
        let rows: Vec<Bookmark> = self.send_json(req).await?;
        debug!(count = rows.len(), "bookmarks listed");
        Ok(rows)
    }

    /// Bookmarks among `keys` (one round trip for a whole chapter).
    pub async fn fetch_bookmarks_for(
        &self,
        session: &Session,
        keys: &[VerseKey],
    ) -> Result<Vec<Bookmark>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.table_url(TABLE_BOOKMARKS);
        let req = self
            .request(Method::GET, &url, Some(session))
            .query(&[
                ("select", BOOKMARK_COLUMNS.to_string()),
                ("user_id", eq(&session.user_id)),
                ("verse_id", in_keys(keys)),
            ]);
        self.send_json(req).await
    }

    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Idempotent create.
    ///
    /// Inserts with `on_conflict` on the `(user_id, verse_id)` unique
    /// constraint and duplicates ignored, so a second call never creates a
    /// second row.  When the insert is ignored the backend returns no rows
    /// and the existing bookmark is read back instead.
    pub async fn insert_bookmark(&self, session: &Session, key: &VerseKey) -> Result<Bookmark> {
        let url = self.table_url(TABLE_BOOKMARKS);
        let req = self
            .request(Method::POST, &url, Some(session))
            .query(&[("on_conflict", "user_id,verse_id")])
            .header("Prefer", "resolution=ignore-duplicates,return=representation")
            .json(&json!({
                "user_id": session.user_id,
                "verse_id": key.as_str(),
            }));
        let rows: Vec<Bookmark> = self.send_json(req).await?;

        if let Some(created) = rows.into_iter().next() {
            info!(verse = %key, "bookmark created");
            return Ok(created);
        }

        debug!(verse = %key, "bookmark already present");
        self.fetch_bookmark(session, key)
            .await?
            .ok_or(StoreError::NotFound)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Idempotent delete; succeeds whether or not a row existed.
    pub async fn delete_bookmark(&self, session: &Session, key: &VerseKey) -> Result<()> {
        let url = self.table_url(TABLE_BOOKMARKS);
        let req = self
            .request(Method::DELETE, &url, Some(session))
            .query(&[
                ("user_id", eq(&session.user_id)),
                ("verse_id", eq(key.as_str())),
            ]);
        self.send_empty(req).await?;
        info!(verse = %key, "bookmark removed");
        Ok(())
    }
}
