//! Storage traits used by the views.
//!
//! Views hold an `Arc<dyn AnnotationStore>` / `Arc<dyn PlanStore>` so the
//! backend can be swapped for [`MemoryStore`](crate::MemoryStore) in tests.

use async_trait::async_trait;
use uuid::Uuid;

use verbum_shared::{HighlightColor, VerseKey};

use crate::error::Result;
use crate::models::{Bookmark, Highlight, ReadingPlan, ReadingProgress};
use crate::rest::RestStore;
use crate::session::Session;

/// Per-user bookmarks and highlights.
#[async_trait]
pub trait AnnotationStore: Send + Sync {
    async fn get_bookmark(&self, session: &Session, key: &VerseKey) -> Result<Option<Bookmark>>;

    /// Newest first.
    async fn list_bookmarks(&self, session: &Session) -> Result<Vec<Bookmark>>;

    /// Idempotent: a second call returns the existing bookmark.
    async fn set_bookmark(&self, session: &Session, key: &VerseKey) -> Result<Bookmark>;

    /// Idempotent: clearing an absent bookmark succeeds.
    async fn clear_bookmark(&self, session: &Session, key: &VerseKey) -> Result<()>;

    async fn get_highlight(
        &self,
        session: &Session,
        key: &VerseKey,
    ) -> Result<Option<HighlightColor>>;

    /// `None` clears the highlight.
    async fn set_highlight(
        &self,
        session: &Session,
        key: &VerseKey,
        color: Option<HighlightColor>,
    ) -> Result<()>;

    async fn bookmarks_for(&self, session: &Session, keys: &[VerseKey]) -> Result<Vec<Bookmark>>;

    async fn highlights_for(&self, session: &Session, keys: &[VerseKey])
        -> Result<Vec<Highlight>>;
}

/// Reading plans and the caller's progress through them.
#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn list_public_plans(&self, session: Option<&Session>) -> Result<Vec<ReadingPlan>>;

    /// Idempotent: an already started plan keeps its progress.
    async fn start_plan(&self, session: &Session, plan_id: Uuid) -> Result<ReadingProgress>;

    async fn list_progress(&self, session: &Session) -> Result<Vec<ReadingProgress>>;

    /// [`StoreError::NotFound`](crate::StoreError::NotFound) if the plan
    /// was never started.
    async fn set_day_completed(
        &self,
        session: &Session,
        plan_id: Uuid,
        day: u32,
    ) -> Result<ReadingProgress>;
}

// ---------------------------------------------------------------------------
// RestStore
// ---------------------------------------------------------------------------

#[async_trait]
impl AnnotationStore for RestStore {
    async fn get_bookmark(&self, session: &Session, key: &VerseKey) -> Result<Option<Bookmark>> {
        self.fetch_bookmark(session, key).await
    }

    async fn list_bookmarks(&self, session: &Session) -> Result<Vec<Bookmark>> {
        self.fetch_bookmarks(session).await
    }

    async fn set_bookmark(&self, session: &Session, key: &VerseKey) -> Result<Bookmark> {
        self.insert_bookmark(session, key).await
    }

    async fn clear_bookmark(&self, session: &Session, key: &VerseKey) -> Result<()> {
        self.delete_bookmark(session, key).await
    }

    async fn get_highlight(
        &self,
        session: &Session,
        key: &VerseKey,
    ) -> Result<Option<HighlightColor>> {
        self.fetch_highlight(session, key).await
    }

    async fn set_highlight(
        &self,
        session: &Session,
        key: &VerseKey,
        color: Option<HighlightColor>,
    ) -> Result<()> {
        self.upsert_highlight(session, key, color).await
    }

    async fn bookmarks_for(&self, session: &Session, keys: &[VerseKey]) -> Result<Vec<Bookmark>> {
        self.fetch_bookmarks_for(session, keys).await
    }

    async fn highlights_for(
        &self,
        session: &Session,
        keys: &[VerseKey],
    ) -> Result<Vec<Highlight>> {
        self.fetch_highlights_for(session, keys).await
    }
}

#[async_trait]
impl PlanStore for RestStore {
    async fn list_public_plans(&self, session: Option<&Session>) -> Result<Vec<ReadingPlan>> {
        self.fetch_public_plans(session).await
    }

    async fn start_plan(&self, session: &Session, plan_id: Uuid) -> Result<ReadingProgress> {
        self.insert_progress(session, plan_id).await
    }

    async fn list_progress(&self, session: &Session) -> Result<Vec<ReadingProgress>> {
        self.fetch_progress(session).await
    }

    async fn set_day_completed(
        &self,
        session: &Session,
        plan_id: Uuid,
        day: u32,
    ) -> Result<ReadingProgress> {
        self.update_progress(session, plan_id, day).await
    }
}
