//! In-process store with the same uniqueness rules as the backend tables.
//!
//! Used by the view tests and for running the client without a backend.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use verbum_shared::{HighlightColor, VerseKey};

use crate::error::{Result, StoreError};
use crate::models::{Bookmark, Highlight, ReadingPlan, ReadingProgress};
use crate::session::Session;
use crate::store::{AnnotationStore, PlanStore};

type RowKey = (String, VerseKey);

#[derive(Debug, Default)]
struct Tables {
    bookmarks: HashMap<RowKey, Bookmark>,
    highlights: HashMap<RowKey, Option<HighlightColor>>,
    plans: Vec<ReadingPlan>,
    progress: HashMap<(String, Uuid), u32>,
    /// Monotonic insertion counter so `created_at` is strictly increasing
    /// even within one clock tick.
    clock: i64,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with reading plans.
    pub fn with_plans(plans: Vec<ReadingPlan>) -> Self {
        let store = Self::default();
        store.lock().plans = plans;
        store
    }

    /// Number of bookmark rows across all users.
    pub fn bookmark_rows(&self) -> usize {
        self.lock().bookmarks.len()
    }

    /// Number of highlight rows, tombstones included.
    pub fn highlight_rows(&self) -> usize {
        self.lock().highlights.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn row_key(session: &Session, key: &VerseKey) -> RowKey {
    (session.user_id.clone(), key.clone())
}

fn timestamp(tick: i64) -> DateTime<Utc> {
    Utc::now() + chrono::Duration::microseconds(tick)
}

#[async_trait]
impl AnnotationStore for MemoryStore {
    async fn get_bookmark(&self, session: &Session, key: &VerseKey) -> Result<Option<Bookmark>> {
        Ok(self.lock().bookmarks.get(&row_key(session, key)).cloned())
    }

    async fn list_bookmarks(&self, session: &Session) -> Result<Vec<Bookmark>> {
        let mut rows: Vec<Bookmark> = self
            .lock()
            .bookmarks
            .values()
            .filter(|b| b.user_id == session.user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn set_bookmark(&self, session: &Session, key: &VerseKey) -> Result<Bookmark> {
        let mut tables = self.lock();
        tables.clock += 1;
        let tick = tables.clock;
        let row = tables
            .bookmarks
            .entry(row_key(session, key))
            .or_insert_with(|| Bookmark {
                id: Uuid::new_v4(),
                user_id: session.user_id.clone(),
                verse_key: key.clone(),
                created_at: timestamp(tick),
            });
        debug!(verse = %key, "memory bookmark set");
        Ok(row.clone())
    }

    async fn clear_bookmark(&self, session: &Session, key: &VerseKey) -> Result<()> {
        self.lock().bookmarks.remove(&row_key(session, key));
        Ok(())
    }

    async fn get_highlight(
        &self,
        session: &Session,
        key: &VerseKey,
    ) -> Result<Option<HighlightColor>> {
        Ok(self
            .lock()
            .highlights
            .get(&row_key(session, key))
            .copied()
            .flatten())
    }

    async fn set_highlight(
        &self,
        session: &Session,
        key: &VerseKey,
        color: Option<HighlightColor>,
    ) -> Result<()> {
        self.lock().highlights.insert(row_key(session, key), color);
        Ok(())
    }

    async fn bookmarks_for(&self, session: &Session, keys: &[VerseKey]) -> Result<Vec<Bookmark>> {
        let tables = self.lock();
        Ok(keys
            .iter()
            .filter_map(|k| tables.bookmarks.get(&row_key(session, k)).cloned())
            .collect())
    }

    async fn highlights_for(
        &self,
        session: &Session,
        keys: &[VerseKey],
    ) -> Result<Vec<Highlight>> {
        let tables = self.lock();
        Ok(keys
            .iter()
            .filter_map(|k| {
                tables.highlights.get(&row_key(session, k)).map(|color| Highlight {
                    user_id: session.user_id.clone(),
                    verse_key: k.clone(),
                    color: *color,
                })
            })
            .collect())
    }
}

#[async_trait]
impl PlanStore for MemoryStore {
    async fn list_public_plans(&self, _session: Option<&Session>) -> Result<Vec<ReadingPlan>> {
        let mut plans: Vec<ReadingPlan> = self
            .lock()
            .plans
            .iter()
            .filter(|p| p.is_public)
            .cloned()
            .collect();
        plans.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(plans)
    }

    async fn start_plan(&self, session: &Session, plan_id: Uuid) -> Result<ReadingProgress> {
        let mut tables = self.lock();
        let day = *tables
            .progress
            .entry((session.user_id.clone(), plan_id))
            .or_insert(0);
        Ok(ReadingProgress {
            user_id: session.user_id.clone(),
            plan_id,
            day_completed: day,
        })
    }

    async fn list_progress(&self, session: &Session) -> Result<Vec<ReadingProgress>> {
        Ok(self
            .lock()
            .progress
            .iter()
            .filter(|((user, _), _)| *user == session.user_id)
            .map(|((user, plan_id), day)| ReadingProgress {
                user_id: user.clone(),
                plan_id: *plan_id,
                day_completed: *day,
            })
            .collect())
    }

    async fn set_day_completed(
        &self,
        session: &Session,
        plan_id: Uuid,
        day: u32,
    ) -> Result<ReadingProgress> {
        let mut tables = self.lock();
        let slot = tables
            .progress
            .get_mut(&(session.user_id.clone(), plan_id))
            .ok_or(StoreError::NotFound)?;
        *slot = day;
        Ok(ReadingProgress {
            user_id: session.user_id.clone(),
            plan_id,
            day_completed: day,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(user: &str) -> Session {
        Session {
            user_id: user.into(),
            access_token: format!("jwt-{user}"),
            email: None,
        }
    }

    fn key(s: &str) -> VerseKey {
        VerseKey::from_raw(s)
    }

    #[tokio::test]
    async fn set_bookmark_twice_keeps_one_row() {
        let store = MemoryStore::new();
        let s = session("u1");

        let first = store.set_bookmark(&s, &key("John.3.16")).await.unwrap();
        let second = store.set_bookmark(&s, &key("John.3.16")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.bookmark_rows(), 1);
    }

    #[tokio::test]
    async fn clear_bookmark_is_idempotent() {
        let store = MemoryStore::new();
        let s = session("u1");
        store.set_bookmark(&s, &key("John.3.16")).await.unwrap();

        store.clear_bookmark(&s, &key("John.3.16")).await.unwrap();
        store.clear_bookmark(&s, &key("John.3.16")).await.unwrap();
        assert!(store.get_bookmark(&s, &key("John.3.16")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn bookmarks_are_per_user_and_newest_first() {
        let store = MemoryStore::new();
        let a = session("a");
        let b = session("b");

        store.set_bookmark(&a, &key("Genesis.1.1")).await.unwrap();
        store.set_bookmark(&a, &key("Genesis.1.3")).await.unwrap();
        store.set_bookmark(&b, &key("Genesis.1.1")).await.unwrap();

        let listed = store.list_bookmarks(&a).await.unwrap();
        let keys: Vec<&str> = listed.iter().map(|b| b.verse_key.as_str()).collect();
        assert_eq!(keys, ["Genesis.1.3", "Genesis.1.1"]);
        assert_eq!(store.bookmark_rows(), 3);
    }

    #[tokio::test]
    async fn highlight_set_and_clear() {
        let store = MemoryStore::new();
        let s = session("u1");
        let k = key("Psalms.23.1");

        store
            .set_highlight(&s, &k, Some(HighlightColor::Yellow))
            .await
            .unwrap();
        assert_eq!(
            store.get_highlight(&s, &k).await.unwrap(),
            Some(HighlightColor::Yellow)
        );

        store.set_highlight(&s, &k, None).await.unwrap();
        assert_eq!(store.get_highlight(&s, &k).await.unwrap(), None);
        // The tombstone replaces the row in place.
        assert_eq!(store.highlight_rows(), 1);
    }

    #[tokio::test]
    async fn bulk_reads_only_return_requested_keys() {
        let store = MemoryStore::new();
        let s = session("u1");
        store.set_bookmark(&s, &key("John.3.16")).await.unwrap();
        store.set_bookmark(&s, &key("John.4.1")).await.unwrap();
        store
            .set_highlight(&s, &key("John.3.17"), Some(HighlightColor::Blue))
            .await
            .unwrap();

        let wanted = [key("John.3.16"), key("John.3.17")];
        let bookmarks = store.bookmarks_for(&s, &wanted).await.unwrap();
        let highlights = store.highlights_for(&s, &wanted).await.unwrap();

        assert_eq!(bookmarks.len(), 1);
        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].color, Some(HighlightColor::Blue));
    }

    #[tokio::test]
    async fn plan_progress() {
        let plan = ReadingPlan {
            id: Uuid::new_v4(),
            name: "Psalms".into(),
            description: None,
            duration_days: 5,
            is_public: true,
        };
        let hidden = ReadingPlan {
            id: Uuid::new_v4(),
            name: "Draft".into(),
            description: None,
            duration_days: 3,
            is_public: false,
        };
        let store = MemoryStore::with_plans(vec![plan.clone(), hidden]);
        let s = session("u1");

        assert_eq!(store.list_public_plans(None).await.unwrap(), vec![plan.clone()]);
        assert!(matches!(
            store.set_day_completed(&s, plan.id, 1).await,
            Err(StoreError::NotFound)
        ));

        assert_eq!(store.start_plan(&s, plan.id).await.unwrap().day_completed, 0);
        store.set_day_completed(&s, plan.id, 2).await.unwrap();
        assert_eq!(store.start_plan(&s, plan.id).await.unwrap().day_completed, 2);
        assert_eq!(store.list_progress(&s).await.unwrap().len(), 1);
    }
}
