//! Extraction cache keyed by (path, mtime).
//!
//! Entries are written once per key and never mutated afterwards, so
//! concurrent readers are safe; two tasks racing to populate the same key
//! just duplicate the extraction work, they cannot corrupt it. A changed
//! file gets a new mtime and therefore a new key.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use dashmap::DashMap;

use crate::extract::ExtractedDoc;

#[derive(Default)]
pub struct ExtractCache {
    entries: DashMap<(PathBuf, SystemTime), Arc<ExtractedDoc>>,
}

impl ExtractCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, path: &Path, mtime: SystemTime) -> Option<Arc<ExtractedDoc>> {
        self.entries
            .get(&(path.to_path_buf(), mtime))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Insert-if-absent: the first writer wins and later writers receive
    /// the stored value.
    pub fn insert(&self, path: &Path, mtime: SystemTime, doc: ExtractedDoc) -> Arc<ExtractedDoc> {
        let entry = self
            .entries
            .entry((path.to_path_buf(), mtime))
            .or_insert_with(|| Arc::new(doc));
        Arc::clone(entry.value())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn doc(text: &str) -> ExtractedDoc {
        ExtractedDoc {
            text: text.to_string(),
            ..ExtractedDoc::default()
        }
    }

    #[test]
    fn miss_then_hit() {
        let cache = ExtractCache::new();
        let path = Path::new("/tmp/a.md");
        let mtime = SystemTime::UNIX_EPOCH;
        assert!(cache.get(path, mtime).is_none());

        cache.insert(path, mtime, doc("hello"));
        let hit = cache.get(path, mtime).expect("should hit");
        assert_eq!(hit.text, "hello");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn first_writer_wins() {
        let cache = ExtractCache::new();
        let path = Path::new("/tmp/a.md");
        let mtime = SystemTime::UNIX_EPOCH;
        cache.insert(path, mtime, doc("first"));
        let second = cache.insert(path, mtime, doc("second"));
        assert_eq!(second.text, "first");
    }

    #[test]
    fn changed_mtime_is_a_new_key() {
        let cache = ExtractCache::new();
        let path = Path::new("/tmp/a.md");
        let old = SystemTime::UNIX_EPOCH;
        let new = old + Duration::from_secs(60);
        cache.insert(path, old, doc("old"));
        cache.insert(path, new, doc("new"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(path, new).unwrap().text, "new");
    }
}
