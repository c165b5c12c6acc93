// src/chat/versions.rs
// Ordered recommendation versions plus the current-version pointer.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One rendered recommendation document. Content is fully overwritten on
/// every streaming update for its round, never appended to or diffed.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationVersion {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub user_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertion-ordered version list. The most recently created version is
/// always the current one; manual switching never reorders the list.
#[derive(Debug, Default)]
pub struct VersionStore {
    versions: Vec<RecommendationVersion>,
    current: Option<i64>,
    last_id: i64,
}

impl VersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time-derived id, bumped past the previous one when two rounds start
    /// within the same millisecond.
    fn next_id(&mut self) -> i64 {
        let id = Utc::now().timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        id
    }

    /// Create and append a new empty version, making it current.
    pub fn add_version(&mut self, title: impl Into<String>, user_feedback: Option<String>) -> i64 {
        let id = self.next_id();
        self.versions.push(RecommendationVersion {
            id,
            title: title.into(),
            content: String::new(),
            user_feedback,
            created_at: Utc::now(),
        });
        self.current = Some(id);
        id
    }

    /// Replace a version's content wholesale. A stale id (e.g. after a
    /// reset while its round was still in flight) is a silent no-op.
    pub fn update_content(&mut self, id: i64, full_text: impl Into<String>) -> bool {
        match self.versions.iter_mut().find(|v| v.id == id) {
            Some(v) => {
                v.content = full_text.into();
                true
            }
            None => false,
        }
    }

    /// Drop every version and clear the pointer (new floor-plan upload).
    pub fn reset(&mut self) {
        self.versions.clear();
        self.current = None;
    }

    /// Pointer-only change for manual tab switching.
    pub fn set_current(&mut self, id: i64) -> bool {
        if self.versions.iter().any(|v| v.id == id) {
            self.current = Some(id);
            true
        } else {
            false
        }
    }

    pub fn current_id(&self) -> Option<i64> {
        self.current
    }

    pub fn current(&self) -> Option<&RecommendationVersion> {
        self.current.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: i64) -> Option<&RecommendationVersion> {
        self.versions.iter().find(|v| v.id == id)
    }

    pub fn versions(&self) -> &[RecommendationVersion] {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_version_appends_and_becomes_current() {
        let mut store = VersionStore::new();
        let first = store.add_version("Initial plan", None);
        assert_eq!(store.current_id(), Some(first));

        let second = store.add_version("Revision 2", Some("more quiet".into()));
        assert_eq!(store.current_id(), Some(second));
        assert_eq!(store.versions().len(), 2);
        assert_eq!(store.versions()[0].id, first);
        assert_eq!(store.versions()[1].id, second);
        assert!(second > first);
    }

    #[test]
    fn test_update_content_overwrites() {
        let mut store = VersionStore::new();
        let id = store.add_version("Initial plan", None);
        assert!(store.update_content(id, "Hello"));
        assert!(store.update_content(id, "Hello world"));
        assert_eq!(store.get(id).unwrap().content, "Hello world");
    }

    #[test]
    fn test_update_content_stale_id_is_noop() {
        let mut store = VersionStore::new();
        let id = store.add_version("Initial plan", None);
        store.reset();
        assert!(!store.update_content(id, "late delta"));
        assert!(store.is_empty());
        assert_eq!(store.current_id(), None);
    }

    #[test]
    fn test_set_current_does_not_reorder() {
        let mut store = VersionStore::new();
        let first = store.add_version("Initial plan", None);
        let second = store.add_version("Revision 2", None);
        assert!(store.set_current(first));
        assert_eq!(store.current_id(), Some(first));
        assert_eq!(store.versions()[0].id, first);
        assert_eq!(store.versions()[1].id, second);
        assert!(!store.set_current(999));
        assert_eq!(store.current_id(), Some(first));
    }

    #[test]
    fn test_ids_unique_within_same_millisecond() {
        let mut store = VersionStore::new();
        let ids: Vec<i64> = (0..10).map(|_| store.add_version("v", None)).collect();
        let mut sorted = ids.clone();
        sorted.dedup();
        assert_eq!(sorted.len(), 10);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
