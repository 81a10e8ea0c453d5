//! Optimistic local mirror of a chapter's annotation rows.
//!
//! A write shows its value immediately as `Pending` and is reconciled when
//! the backend answers: success confirms it, failure rolls the verse back
//! to its last confirmed value.  Each write carries a ticket; only the
//! latest write on a verse may change what is shown, so an earlier
//! request finishing late cannot clobber a newer one.

use std::collections::HashMap;

use serde::Serialize;

use verbum_shared::{HighlightColor, VerseKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncState {
    Confirmed,
    Pending,
}

/// One optimistic value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracked<T> {
    confirmed: T,
    shown: T,
    state: SyncState,
    /// Ticket of the newest write, 0 when none was made.
    latest: u64,
}

impl<T: Clone> Tracked<T> {
    pub fn confirmed(value: T) -> Self {
        Self {
            confirmed: value.clone(),
            shown: value,
            state: SyncState::Confirmed,
            latest: 0,
        }
    }

    pub fn shown(&self) -> &T {
        &self.shown
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub(crate) fn begin(&mut self, value: T, ticket: u64) {
        self.shown = value;
        self.state = SyncState::Pending;
        self.latest = ticket;
    }

    pub(crate) fn settle(&mut self, ticket: u64, value: T, ok: bool) {
        if ok {
            self.confirmed = value;
        }
        if ticket != self.latest {
            return;
        }
        if !ok {
            self.shown = self.confirmed.clone();
        }
        self.state = SyncState::Confirmed;
    }
}

impl<T: Clone + Default> Default for Tracked<T> {
    fn default() -> Self {
        Self::confirmed(T::default())
    }
}

/// Bookmark and highlight state of one verse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerseMarks {
    pub bookmarked: Tracked<bool>,
    pub highlight: Tracked<Option<HighlightColor>>,
}

impl VerseMarks {
    pub fn is_pending(&self) -> bool {
        self.bookmarked.state() == SyncState::Pending
            || self.highlight.state() == SyncState::Pending
    }
}

/// Handle for an in-flight write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteTicket<T> {
    pub key: VerseKey,
    pub value: T,
    id: u64,
}

#[derive(Debug, Default)]
pub struct AnnotationCache {
    marks: HashMap<VerseKey, VerseMarks>,
    next_ticket: u64,
}

impl AnnotationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every entry with server-confirmed state.  Tickets issued
    /// before the reset settle into nothing.
    pub fn reset<I>(&mut self, confirmed: I)
    where
        I: IntoIterator<Item = (VerseKey, bool, Option<HighlightColor>)>,
    {
        self.marks = confirmed
            .into_iter()
            .map(|(key, bookmarked, highlight)| {
                (
                    key,
                    VerseMarks {
                        bookmarked: Tracked::confirmed(bookmarked),
                        highlight: Tracked::confirmed(highlight),
                    },
                )
            })
            .collect();
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    pub fn get(&self, key: &VerseKey) -> Option<&VerseMarks> {
        self.marks.get(key)
    }

    pub fn is_bookmarked(&self, key: &VerseKey) -> bool {
        self.marks
            .get(key)
            .map(|m| *m.bookmarked.shown())
            .unwrap_or(false)
    }

    pub fn highlight(&self, key: &VerseKey) -> Option<HighlightColor> {
        self.marks.get(key).and_then(|m| *m.highlight.shown())
    }

    pub fn begin_bookmark(&mut self, key: &VerseKey, value: bool) -> WriteTicket<bool> {
        let id = self.ticket();
        self.marks
            .entry(key.clone())
            .or_default()
            .bookmarked
            .begin(value, id);
        WriteTicket {
            key: key.clone(),
            value,
            id,
        }
    }

    pub fn settle_bookmark(&mut self, ticket: WriteTicket<bool>, ok: bool) {
        if let Some(m) = self.marks.get_mut(&ticket.key) {
            m.bookmarked.settle(ticket.id, ticket.value, ok);
        }
    }

    pub fn begin_highlight(
        &mut self,
        key: &VerseKey,
        value: Option<HighlightColor>,
    ) -> WriteTicket<Option<HighlightColor>> {
        let id = self.ticket();
        self.marks
            .entry(key.clone())
            .or_default()
            .highlight
            .begin(value, id);
        WriteTicket {
            key: key.clone(),
            value,
            id,
        }
    }

    pub fn settle_highlight(&mut self, ticket: WriteTicket<Option<HighlightColor>>, ok: bool) {
        if let Some(m) = self.marks.get_mut(&ticket.key) {
            m.highlight.settle(ticket.id, ticket.value, ok);
        }
    }

    fn ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> VerseKey {
        VerseKey::from_raw(s)
    }

    #[test]
    fn success_confirms_the_shown_value() {
        let mut cache = AnnotationCache::new();
        let k = key("John.3.16");

        let t = cache.begin_bookmark(&k, true);
        assert!(cache.is_bookmarked(&k));
        assert!(cache.get(&k).unwrap().is_pending());

        cache.settle_bookmark(t, true);
        assert!(cache.is_bookmarked(&k));
        assert!(!cache.get(&k).unwrap().is_pending());
    }

    #[test]
    fn failure_rolls_back_to_confirmed() {
        let mut cache = AnnotationCache::new();
        let k = key("John.3.16");
        cache.reset([(k.clone(), false, Some(HighlightColor::Green))]);

        let t = cache.begin_highlight(&k, Some(HighlightColor::Pink));
        assert_eq!(cache.highlight(&k), Some(HighlightColor::Pink));

        cache.settle_highlight(t, false);
        assert_eq!(cache.highlight(&k), Some(HighlightColor::Green));
        assert!(!cache.get(&k).unwrap().is_pending());
    }

    #[test]
    fn late_answer_to_an_older_write_does_not_clobber_newer_one() {
        let mut cache = AnnotationCache::new();
        let k = key("John.3.16");

        let first = cache.begin_highlight(&k, Some(HighlightColor::Yellow));
        let second = cache.begin_highlight(&k, Some(HighlightColor::Blue));

        cache.settle_highlight(first, false);
        assert_eq!(cache.highlight(&k), Some(HighlightColor::Blue));
        assert!(cache.get(&k).unwrap().is_pending());

        cache.settle_highlight(second, true);
        assert_eq!(cache.highlight(&k), Some(HighlightColor::Blue));
        assert!(!cache.get(&k).unwrap().is_pending());
    }

    #[test]
    fn failed_newer_write_rolls_back_to_older_success() {
        let mut cache = AnnotationCache::new();
        let k = key("John.3.16");

        let first = cache.begin_bookmark(&k, true);
        let second = cache.begin_bookmark(&k, false);
        cache.settle_bookmark(first, true);
        cache.settle_bookmark(second, false);

        assert!(cache.is_bookmarked(&k));
    }

    #[test]
    fn verses_are_independent() {
        let mut cache = AnnotationCache::new();
        let a = key("John.3.16");
        let b = key("John.3.17");

        let ta = cache.begin_bookmark(&a, true);
        let tb = cache.begin_bookmark(&b, true);
        cache.settle_bookmark(ta, false);
        cache.settle_bookmark(tb, true);

        assert!(!cache.is_bookmarked(&a));
        assert!(cache.is_bookmarked(&b));
    }

    #[test]
    fn tickets_from_before_a_reset_are_ignored() {
        let mut cache = AnnotationCache::new();
        let k = key("John.3.16");
        let t = cache.begin_bookmark(&k, true);

        cache.reset([(k.clone(), false, None)]);
        cache.settle_bookmark(t, true);

        // The fresh confirmed state stands; the old ticket is not latest.
        assert!(!cache.is_bookmarked(&k));
        assert!(!cache.get(&k).unwrap().is_pending());
    }
}
