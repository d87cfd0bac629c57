//! JSON REST chapter source.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tankobon_core::{Chapter, ChapterId, FetchError, SeriesId};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::FetchConfig;
use crate::source::{ChapterSource, run_cancellable};

#[derive(Error, Debug)]
pub enum SourceConfigError {
    #[error("invalid api base url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("api base url {0:?} cannot hold a path")]
    NotHierarchical(String),
    #[error("build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Accepts both `{ "data": ... }` envelopes and bare payloads.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: Url,
    retries: u32,
}

impl HttpSource {
    pub fn new(base_url: &str, config: &FetchConfig) -> Result<Self, SourceConfigError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized).map_err(|source| SourceConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SourceConfigError::NotHierarchical(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()?;

        log::info!("chapter source at {base_url}");
        Ok(Self {
            client,
            base_url,
            retries: config.retries,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn chapter_url(&self, chapter_id: &ChapterId) -> Url {
        self.endpoint(&["chapters", chapter_id.as_str()])
    }

    pub fn chapter_list_url(&self, series_id: &SeriesId) -> Url {
        self.endpoint(&["series", series_id.as_str(), "chapters"])
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let mut attempt = 0;
        loop {
            match self.get_once::<T>(url.clone()).await {
                Err(err) if err.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    log::debug!("retrying {url} after network error: {err}");
                }
                result => return result,
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let response = self.client.get(url).send().await.map_err(classify)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                message: message.trim().to_string(),
            });
        }
        let envelope: Envelope<T> = response.json().await.map_err(classify)?;
        Ok(envelope.into_inner())
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_decode() {
        FetchError::Decode(err.to_string())
    } else if let Some(status) = err.status() {
        if status == StatusCode::NOT_FOUND {
            FetchError::NotFound
        } else {
            FetchError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        }
    } else {
        FetchError::Network(err.to_string())
    }
}

#[async_trait]
impl ChapterSource for HttpSource {
    async fn fetch_chapter(
        &self,
        chapter_id: &ChapterId,
        cancel: &CancellationToken,
    ) -> Result<Chapter, FetchError> {
        let url = self.chapter_url(chapter_id);
        run_cancellable(cancel, self.get_json::<Chapter>(url)).await
    }

    async fn fetch_chapter_list(
        &self,
        series_id: &SeriesId,
        cancel: &CancellationToken,
    ) -> Result<Vec<Chapter>, FetchError> {
        let url = self.chapter_list_url(series_id);
        run_cancellable(cancel, self.get_json::<Vec<Chapter>>(url)).await
    }
}
