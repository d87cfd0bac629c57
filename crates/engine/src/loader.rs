use std::sync::Arc;

use tankobon_core::{Chapter, ChapterId, FetchError, SeriesId};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::FetchConfig;
use crate::cache::ChapterCache;
use crate::slot::FetchSlot;
use crate::source::{ChapterSource, run_cancellable};

/// Completed primary fetches, delivered to the thread that owns the UI.
#[derive(Debug)]
pub enum FetchEvent {
    ChapterList {
        generation: u64,
        series_id: SeriesId,
        result: Result<Vec<Chapter>, FetchError>,
    },
    Chapter {
        generation: u64,
        chapter_id: ChapterId,
        result: Result<Arc<Chapter>, FetchError>,
    },
}

impl FetchEvent {
    pub fn generation(&self) -> u64 {
        match self {
            FetchEvent::ChapterList { generation, .. } | FetchEvent::Chapter { generation, .. } => {
                *generation
            }
        }
    }
}

/// Primary fetches for the reader: the chapter list and the chapter being
/// opened. Each has its own slot, so a new request of one kind cancels only
/// the in-flight request of the same kind.
#[derive(Debug)]
pub struct ChapterLoader<S: ChapterSource> {
    source: Arc<S>,
    cache: ChapterCache,
    config: FetchConfig,
    runtime: Handle,
    chapter_slot: FetchSlot,
    list_slot: FetchSlot,
    events: UnboundedSender<FetchEvent>,
}

impl<S: ChapterSource> ChapterLoader<S> {
    pub fn new(
        source: Arc<S>,
        cache: ChapterCache,
        config: FetchConfig,
        runtime: Handle,
    ) -> (Self, UnboundedReceiver<FetchEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let loader = Self {
            source,
            cache,
            config,
            runtime,
            chapter_slot: FetchSlot::new(),
            list_slot: FetchSlot::new(),
            events,
        };
        (loader, rx)
    }

    pub fn cache(&self) -> &ChapterCache {
        &self.cache
    }

    pub fn is_loading_chapter(&self) -> bool {
        self.chapter_slot.is_in_flight()
    }

    pub fn is_loading_list(&self) -> bool {
        self.list_slot.is_in_flight()
    }

    pub fn load_chapter_list(&mut self, series_id: &SeriesId) -> u64 {
        let ticket = self.list_slot.begin();
        let generation = ticket.generation();
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        let series_id = series_id.clone();

        log::info!("loading chapter list for series {series_id}");
        self.runtime.spawn(async move {
            let cancel = ticket.token();
            let result = run_cancellable(cancel, source.fetch_chapter_list(&series_id, cancel)).await;
            let _ = events.send(FetchEvent::ChapterList {
                generation,
                series_id,
                result,
            });
        });
        generation
    }

    /// Serves a fresh cached copy (including prefetched ones) without
    /// touching the network.
    pub fn load_chapter(&mut self, chapter_id: &ChapterId) -> u64 {
        let ticket = self.chapter_slot.begin();
        let generation = ticket.generation();

        if let Some(chapter) = self.cache.get_fresh(chapter_id) {
            log::debug!("chapter {chapter_id} served from cache");
            let _ = self.events.send(FetchEvent::Chapter {
                generation,
                chapter_id: chapter_id.clone(),
                result: Ok(chapter),
            });
            return generation;
        }

        let source = Arc::clone(&self.source);
        let cache = self.cache.clone();
        let events = self.events.clone();
        let chapter_id = chapter_id.clone();
        let fresh_for = self.config.live_ttl;

        log::info!("loading chapter {chapter_id}");
        self.runtime.spawn(async move {
            let cancel = ticket.token();
            let result = run_cancellable(cancel, source.fetch_chapter(&chapter_id, cancel))
                .await
                .map(|chapter| cache.store(chapter, fresh_for));
            let _ = events.send(FetchEvent::Chapter {
                generation,
                chapter_id,
                result,
            });
        });
        generation
    }

    /// Whether a delivered event is the latest for its purpose. Stale or
    /// cancelled responses return `false` and must be dropped.
    pub fn accept(&mut self, event: &FetchEvent) -> bool {
        match event {
            FetchEvent::ChapterList { generation, .. } => self.list_slot.complete(*generation),
            FetchEvent::Chapter { generation, .. } => self.chapter_slot.complete(*generation),
        }
    }

    /// Abandons the in-flight chapter load; its result will be rejected.
    pub fn cancel_chapter(&mut self) {
        self.chapter_slot.cancel();
    }

    pub fn cancel_all(&mut self) {
        self.chapter_slot.cancel();
        self.list_slot.cancel();
    }
}

impl<S: ChapterSource> Drop for ChapterLoader<S> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
