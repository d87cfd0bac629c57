use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use tankobon_core::SeriesId;
use tankobon_engine::DEFAULT_FETCH_TIMEOUT;
use tankobon_storage::DEFAULT_PROGRESS_CAP;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api/";
const MAX_FETCH_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub fetch_timeout: Duration,
    pub progress_cap: usize,
    /// Overrides the database under the project data dir.
    pub db_path: Option<PathBuf>,
    pub series_id: SeriesId,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_sources(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// `args` excludes the program name. The first positional argument wins
    /// over `TANKOBON_SERIES`.
    pub fn from_sources(
        mut args: impl Iterator<Item = String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let series_id = args
            .find(|arg| !arg.trim().is_empty())
            .or_else(|| var("TANKOBON_SERIES"))
            .map(|id| SeriesId::new(id.trim()))
            .context("no series given: pass a series id or set TANKOBON_SERIES")?;

        let fetch_timeout = match var("TANKOBON_FETCH_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .with_context(|| format!("TANKOBON_FETCH_TIMEOUT_SECS={raw} is not a whole number"))?;
                Duration::from_secs(secs.clamp(1, MAX_FETCH_TIMEOUT_SECS))
            }
            None => DEFAULT_FETCH_TIMEOUT,
        };

        let progress_cap = match var("TANKOBON_PROGRESS_CAP") {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("TANKOBON_PROGRESS_CAP={raw} is not a whole number"))?
                .max(1),
            None => DEFAULT_PROGRESS_CAP,
        };

        Ok(Self {
            api_url: var("TANKOBON_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            fetch_timeout,
            progress_cap,
            db_path: var("TANKOBON_DB").map(PathBuf::from),
            series_id,
        })
    }
}
