use std::future::Future;

use async_trait::async_trait;
use tankobon_core::{Chapter, ChapterId, FetchError, SeriesId};
use tokio_util::sync::CancellationToken;

/// Where chapters come from. Implementations must stop work and return
/// [`FetchError::Cancelled`] once `cancel` fires.
#[async_trait]
pub trait ChapterSource: std::fmt::Debug + Send + Sync + 'static {
    async fn fetch_chapter(
        &self,
        chapter_id: &ChapterId,
        cancel: &CancellationToken,
    ) -> Result<Chapter, FetchError>;

    /// Chapter summaries for a series, in whatever order the server keeps.
    async fn fetch_chapter_list(
        &self,
        series_id: &SeriesId,
        cancel: &CancellationToken,
    ) -> Result<Vec<Chapter>, FetchError>;
}

/// Races `fut` against `cancel`. The losing future is dropped, which for an
/// HTTP request aborts the underlying connection.
pub async fn run_cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    if cancel.is_cancelled() {
        return Err(FetchError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FetchError::Cancelled),
        result = fut => result,
    }
}
