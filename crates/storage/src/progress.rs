use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tankobon_core::{ChapterId, ReadingProgressEntry, SeriesId};

use crate::{MemoryStore, SharedStore, read_json, write_json};

const PROGRESS_KEY: &str = "reading_progress";
const PROGRESS_FORMAT_VERSION: u32 = 1;

pub const DEFAULT_PROGRESS_CAP: usize = 100;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedProgress {
    version: u32,
    entries: Vec<ReadingProgressEntry>,
}

/// Last-viewed page per (series, chapter), capped to the most recently
/// visited entries across all series.
///
/// Entries are kept oldest-first in write order, so the tail is always the
/// most recent visit. Writes are best-effort: a failing backend switches the
/// store to memory-only for the rest of the session.
#[derive(Debug)]
pub struct ProgressStore {
    backend: SharedStore,
    entries: Vec<ReadingProgressEntry>,
    cap: usize,
    last_written_at: i64,
    degraded: bool,
}

impl ProgressStore {
    pub fn open(backend: SharedStore, cap: usize) -> Self {
        let cap = cap.max(1);
        let (entries, degraded) = match read_json::<PersistedProgress>(backend.as_ref(), PROGRESS_KEY)
        {
            Ok(Some(persisted)) => (normalize_loaded(persisted.entries, cap), false),
            Ok(None) => (Vec::new(), false),
            Err(crate::StorageError::Corrupt(err)) => {
                log::warn!("discarding unreadable reading progress: {err}");
                (Vec::new(), false)
            }
            Err(err) => {
                log::warn!("reading progress unavailable, keeping it in memory: {err}");
                (Vec::new(), true)
            }
        };
        let last_written_at = entries
            .iter()
            .map(|e| e.last_visited_at)
            .max()
            .unwrap_or(i64::MIN);

        Self {
            backend,
            entries,
            cap,
            last_written_at,
            degraded,
        }
    }

    pub fn in_memory(cap: usize) -> Self {
        Self::open(Rc::new(MemoryStore::new()), cap)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Oldest visit first.
    pub fn entries(&self) -> &[ReadingProgressEntry] {
        &self.entries
    }

    pub fn upsert(&mut self, series_id: &SeriesId, chapter_id: &ChapterId, page: usize) {
        let now = chrono::Utc::now().timestamp_millis();
        self.upsert_at(series_id, chapter_id, page, now);
    }

    pub fn upsert_at(
        &mut self,
        series_id: &SeriesId,
        chapter_id: &ChapterId,
        page: usize,
        now_millis: i64,
    ) {
        if series_id.is_blank() || chapter_id.is_blank() {
            log::debug!("ignoring progress write with blank id");
            return;
        }

        let visited_at = now_millis.max(self.last_written_at);
        self.last_written_at = visited_at;

        self.entries
            .retain(|e| !(e.series_id == *series_id && e.chapter_id == *chapter_id));
        self.entries.push(ReadingProgressEntry {
            series_id: series_id.clone(),
            chapter_id: chapter_id.clone(),
            page,
            last_visited_at: visited_at,
        });

        if self.entries.len() > self.cap {
            let overflow = self.entries.len() - self.cap;
            self.entries.drain(..overflow);
        }

        self.persist();
    }

    /// Most recently visited entry of the series. Later writes win ties.
    pub fn get_latest(&self, series_id: &SeriesId) -> Option<&ReadingProgressEntry> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.series_id == *series_id)
    }

    pub fn get(&self, series_id: &SeriesId, chapter_id: &ChapterId) -> Option<&ReadingProgressEntry> {
        self.entries
            .iter()
            .find(|e| e.series_id == *series_id && e.chapter_id == *chapter_id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        if self.degraded {
            return;
        }
        if let Err(err) = self.backend.remove(PROGRESS_KEY) {
            log::warn!("failed to clear reading progress, continuing in memory: {err}");
            self.degraded = true;
        }
    }

    fn persist(&mut self) {
        if self.degraded {
            return;
        }
        let persisted = PersistedProgress {
            version: PROGRESS_FORMAT_VERSION,
            entries: self.entries.clone(),
        };
        if let Err(err) = write_json(self.backend.as_ref(), PROGRESS_KEY, &persisted) {
            log::warn!("failed to persist reading progress, continuing in memory: {err}");
            self.degraded = true;
        }
    }
}

fn normalize_loaded(mut entries: Vec<ReadingProgressEntry>, cap: usize) -> Vec<ReadingProgressEntry> {
    entries.retain(|e| !e.series_id.is_blank() && !e.chapter_id.is_blank());
    entries.sort_by_key(|e| e.last_visited_at);

    // Keep only the newest entry for a duplicated pair.
    let mut seen = std::collections::HashSet::new();
    let mut deduped: Vec<ReadingProgressEntry> = entries
        .into_iter()
        .rev()
        .filter(|e| seen.insert((e.series_id.clone(), e.chapter_id.clone())))
        .collect();
    deduped.truncate(cap);
    deduped.reverse();
    deduped
}
