//! Test helpers and fixtures.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tankobon_application::ReadingSession;
use tankobon_core::{Chapter, ChapterId, FetchError, SeriesId};
use tankobon_engine::{ChapterCache, ChapterLoader, ChapterSource, FetchConfig, FetchEvent, Prefetcher};
use tankobon_storage::{MemoryStore, PreferencesStore, ProgressStore};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

pub const SERIES: &str = "S1";

pub fn make_chapter(id: &str, number: f64, pages: usize) -> Chapter {
    Chapter {
        id: ChapterId::new(id),
        number,
        title: None,
        page_urls: (0..pages)
            .map(|i| format!("https://cdn.example/{id}/{i:03}.jpg"))
            .collect(),
        language: "en".to_string(),
    }
}

/// Chapters `c1..=cN` numbered `1..=N`, each with `pages` pages.
pub fn make_chapters(count: usize, pages: usize) -> Vec<Chapter> {
    (1..=count)
        .map(|n| make_chapter(&format!("c{n}"), n as f64, pages))
        .collect()
}

pub fn memory_backend() -> Rc<MemoryStore> {
    Rc::new(MemoryStore::new())
}

/// Progress and preferences over the same backend, as the binary wires them.
pub fn memory_stores(backend: &Rc<MemoryStore>, cap: usize) -> (ProgressStore, PreferencesStore) {
    let progress = ProgressStore::open(backend.clone(), cap);
    let preferences = PreferencesStore::open(backend.clone());
    (progress, preferences)
}

/// A session for [`SERIES`] with `chapters` already listed.
pub fn session_over(backend: &Rc<MemoryStore>, chapters: Vec<Chapter>) -> ReadingSession {
    let (progress, preferences) = memory_stores(backend, 100);
    let mut session = ReadingSession::new(SeriesId::new(SERIES), progress, preferences);
    session.on_chapter_list_loaded(chapters);
    session
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Chapter source with per-chapter delays and failures, recording every
/// request it receives.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    chapters: Mutex<HashMap<ChapterId, Chapter>>,
    lists: Mutex<HashMap<SeriesId, Vec<Chapter>>>,
    delays: Mutex<HashMap<ChapterId, Duration>>,
    failures: Mutex<HashMap<ChapterId, FetchError>>,
    calls: Mutex<Vec<ChapterId>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `chapters` individually and as the list for [`SERIES`].
    pub fn with_series(chapters: Vec<Chapter>) -> Self {
        let source = Self::new();
        for chapter in &chapters {
            source.add_chapter(chapter.clone());
        }
        source.set_list(&SeriesId::new(SERIES), chapters);
        source
    }

    pub fn add_chapter(&self, chapter: Chapter) {
        lock(&self.chapters).insert(chapter.id.clone(), chapter);
    }

    pub fn set_list(&self, series_id: &SeriesId, chapters: Vec<Chapter>) {
        lock(&self.lists).insert(series_id.clone(), chapters);
    }

    pub fn delay(&self, chapter_id: &str, delay: Duration) {
        lock(&self.delays).insert(ChapterId::new(chapter_id), delay);
    }

    pub fn fail(&self, chapter_id: &str, error: FetchError) {
        lock(&self.failures).insert(ChapterId::new(chapter_id), error);
    }

    pub fn heal(&self, chapter_id: &str) {
        lock(&self.failures).remove(&ChapterId::new(chapter_id));
    }

    pub fn calls(&self) -> Vec<ChapterId> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self, chapter_id: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|id| id.as_str() == chapter_id)
            .count()
    }
}

#[async_trait]
impl ChapterSource for ScriptedSource {
    async fn fetch_chapter(
        &self,
        chapter_id: &ChapterId,
        cancel: &CancellationToken,
    ) -> Result<Chapter, FetchError> {
        lock(&self.calls).push(chapter_id.clone());
        let delay = lock(&self.delays).get(chapter_id).copied();
        if let Some(delay) = delay {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            }
        }
        if let Some(error) = lock(&self.failures).get(chapter_id).cloned() {
            return Err(error);
        }
        lock(&self.chapters)
            .get(chapter_id)
            .cloned()
            .ok_or(FetchError::NotFound)
    }

    async fn fetch_chapter_list(
        &self,
        series_id: &SeriesId,
        _cancel: &CancellationToken,
    ) -> Result<Vec<Chapter>, FetchError> {
        lock(&self.lists)
            .get(series_id)
            .cloned()
            .ok_or(FetchError::NotFound)
    }
}

/// Fetch-layer pieces wired the way the binary wires them.
pub struct Harness {
    pub source: Arc<ScriptedSource>,
    pub cache: ChapterCache,
    pub loader: ChapterLoader<ScriptedSource>,
    pub events: UnboundedReceiver<FetchEvent>,
    pub prefetcher: Prefetcher<ScriptedSource>,
}

impl Harness {
    /// Must be called inside a tokio runtime.
    pub fn new(source: ScriptedSource) -> Self {
        let source = Arc::new(source);
        let cache = ChapterCache::new();
        let config = FetchConfig::default();
        let (loader, events) =
            ChapterLoader::new(Arc::clone(&source), cache.clone(), config, Handle::current());
        let prefetcher = Prefetcher::new(Arc::clone(&source), cache.clone(), config, Handle::current());
        Self {
            source,
            cache,
            loader,
            events,
            prefetcher,
        }
    }

    /// Waits for the next fetch event and applies it to `session` like the
    /// UI loop does. Stale events are reported, not applied.
    pub async fn pump(&mut self, session: &mut ReadingSession) -> Option<Applied> {
        let event = self.events.recv().await?;
        if !self.loader.accept(&event) {
            return Some(Applied::Stale(event.generation()));
        }
        let applied = match event {
            FetchEvent::ChapterList { result, .. } => match result {
                Ok(chapters) => {
                    let count = chapters.len();
                    session.on_chapter_list_loaded(chapters);
                    Applied::ChapterList(count)
                }
                Err(err) => Applied::ListFailed(err),
            },
            FetchEvent::Chapter {
                chapter_id, result, ..
            } => match result {
                Ok(chapter) => {
                    session.on_chapter_loaded(chapter);
                    self.prefetcher
                        .prefetch_next(&chapter_id, session.chapters());
                    Applied::Chapter(chapter_id)
                }
                Err(err) => {
                    session.on_chapter_failed(&chapter_id, err.clone());
                    Applied::Failed(chapter_id, err)
                }
            },
        };
        Some(applied)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    ChapterList(usize),
    ListFailed(FetchError),
    Chapter(ChapterId),
    Failed(ChapterId, FetchError),
    Stale(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_numbered_chapters() {
        let chapters = make_chapters(3, 4);
        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[2].id.as_str(), "c3");
        assert_eq!(chapters[2].total_pages(), 4);
    }

    #[tokio::test]
    async fn scripted_source_fails_on_request() {
        let source = ScriptedSource::with_series(make_chapters(2, 1));
        source.fail("c2", FetchError::Timeout);
        let cancel = CancellationToken::new();
        assert!(source.fetch_chapter(&ChapterId::new("c1"), &cancel).await.is_ok());
        assert_eq!(
            source.fetch_chapter(&ChapterId::new("c2"), &cancel).await,
            Err(FetchError::Timeout)
        );
        assert_eq!(
            source.fetch_chapter(&ChapterId::new("zz"), &cancel).await,
            Err(FetchError::NotFound)
        );
        assert_eq!(source.call_count("c2"), 1);
    }
}
