use std::sync::Arc;

use tankobon_core::{Chapter, ChapterId, navigator};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::FetchConfig;
use crate::cache::ChapterCache;
use crate::source::{ChapterSource, run_cancellable};

/// Handle to a background prefetch. Dropping it does not stop the fetch.
#[derive(Debug)]
pub struct PrefetchTask {
    pub chapter_id: ChapterId,
    handle: JoinHandle<()>,
}

impl PrefetchTask {
    pub async fn join(self) {
        let _ = self.handle.await;
    }
}

/// Warms the cache with the chapter after the one being read.
///
/// Prefetches never share a slot with primary fetches: they are neither
/// cancelled by a new chapter load nor able to cancel one. Failures are
/// logged and dropped.
#[derive(Debug)]
pub struct Prefetcher<S: ChapterSource> {
    source: Arc<S>,
    cache: ChapterCache,
    config: FetchConfig,
    runtime: Handle,
    shutdown: CancellationToken,
}

impl<S: ChapterSource> Prefetcher<S> {
    pub fn new(source: Arc<S>, cache: ChapterCache, config: FetchConfig, runtime: Handle) -> Self {
        Self {
            source,
            cache,
            config,
            runtime,
            shutdown: CancellationToken::new(),
        }
    }

    /// Call once per chapter load, not per page turn. A next chapter that is
    /// still fresh in the cache is not fetched again.
    pub fn prefetch_next(&self, current: &ChapterId, chapters: &[Chapter]) -> Option<PrefetchTask> {
        let next = navigator::next(chapters, current)?;
        if self.cache.get_fresh(&next.id).is_some() {
            log::debug!("chapter {} already cached, skipping prefetch", next.id);
            return None;
        }

        let source = Arc::clone(&self.source);
        let cache = self.cache.clone();
        let cancel = self.shutdown.child_token();
        let chapter_id = next.id.clone();
        let fresh_for = self.config.prefetch_ttl;

        log::debug!("prefetching chapter {chapter_id}");
        let task_id = chapter_id.clone();
        let handle = self.runtime.spawn(async move {
            match run_cancellable(&cancel, source.fetch_chapter(&task_id, &cancel)).await {
                Ok(chapter) => {
                    cache.store(chapter, fresh_for);
                }
                Err(err) if err.is_cancelled() => {}
                Err(err) => log::debug!("prefetch of chapter {task_id} failed: {err}"),
            }
        });

        Some(PrefetchTask { chapter_id, handle })
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl<S: ChapterSource> Drop for Prefetcher<S> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
