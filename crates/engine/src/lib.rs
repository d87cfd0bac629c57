//! Fetch layer: chapter sources, cancellation slots, the shared chapter
//! cache and the background prefetcher.

use std::time::Duration;

mod cache;
mod debounce;
mod http;
mod loader;
mod prefetch;
mod slot;
mod source;

pub use cache::ChapterCache;
pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use http::{HttpSource, SourceConfigError};
pub use loader::{ChapterLoader, FetchEvent};
pub use prefetch::{PrefetchTask, Prefetcher};
pub use slot::{FetchSlot, SlotTicket};
pub use source::{ChapterSource, run_cancellable};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(12);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchConfig {
    pub timeout: Duration,
    /// Extra attempts after a network error. Timeouts and HTTP errors are
    /// never retried.
    pub retries: u32,
    /// How long a chapter fetched for reading stays fresh in the cache.
    pub live_ttl: Duration,
    /// How long a prefetched chapter stays fresh.
    pub prefetch_ttl: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
            retries: 1,
            live_ttl: Duration::from_secs(30),
            prefetch_ttl: Duration::from_secs(5 * 60),
        }
    }
}

impl FetchConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
