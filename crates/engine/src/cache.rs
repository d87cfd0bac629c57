use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tankobon_core::{Chapter, ChapterId};

#[derive(Debug, Clone)]
struct CacheEntry {
    chapter: Arc<Chapter>,
    stored_at: Instant,
    fresh_for: Duration,
}

impl CacheEntry {
    fn is_fresh_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < self.fresh_for
    }
}

/// Chapter data keyed by chapter id. Readers get shared immutable handles;
/// only the fetch layer writes, and only after a successful fetch.
#[derive(Debug, Clone, Default)]
pub struct ChapterCache {
    entries: Arc<DashMap<ChapterId, CacheEntry>>,
}

impl ChapterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_fresh(&self, chapter_id: &ChapterId) -> Option<Arc<Chapter>> {
        self.get_fresh_at(chapter_id, Instant::now())
    }

    pub fn get_fresh_at(&self, chapter_id: &ChapterId, now: Instant) -> Option<Arc<Chapter>> {
        let entry = self.entries.get(chapter_id)?;
        entry.is_fresh_at(now).then(|| Arc::clone(&entry.chapter))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn store(&self, chapter: Chapter, fresh_for: Duration) -> Arc<Chapter> {
        self.store_at(chapter, fresh_for, Instant::now())
    }

    pub(crate) fn store_at(&self, chapter: Chapter, fresh_for: Duration, now: Instant) -> Arc<Chapter> {
        let chapter = Arc::new(chapter);
        self.entries.insert(
            chapter.id.clone(),
            CacheEntry {
                chapter: Arc::clone(&chapter),
                stored_at: now,
                fresh_for,
            },
        );
        chapter
    }
}
