use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Context as _;
use directories::ProjectDirs;
use env_logger::{Builder, Target};
use log::LevelFilter;
use tankobon_application::ReadingSession;
use tankobon_engine::{ChapterCache, ChapterLoader, FetchConfig, HttpSource, Prefetcher};
use tankobon_storage::{MemoryStore, PreferencesStore, ProgressStore, SharedStore, SqliteStore};
use tankobon_ui::{Ui, UiExit};

mod config;

use config::Config;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let project_dirs =
        ProjectDirs::from("dev", "tankobon", "tankobon").context("resolve project dirs")?;

    let data_dir = project_dirs.data_dir();
    fs::create_dir_all(data_dir)
        .with_context(|| format!("create data dir {}", data_dir.display()))?;
    init_logger(&data_dir.join("tankobon.log"))?;

    let config = Config::from_env()?;
    log::info!(
        "starting for series {} against {}",
        config.series_id,
        config.api_url
    );

    let db_path = config
        .db_path
        .clone()
        .unwrap_or_else(|| data_dir.join("tankobon.db"));
    let backend = open_backend(&db_path);
    let progress = ProgressStore::open(Rc::clone(&backend), config.progress_cap);
    let preferences = PreferencesStore::open(backend);
    let session = ReadingSession::new(config.series_id.clone(), progress, preferences);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("tankobon-fetch")
        .enable_all()
        .build()
        .context("start async runtime")?;

    let fetch_config = FetchConfig::default().with_timeout(config.fetch_timeout);
    let source = Arc::new(
        HttpSource::new(&config.api_url, &fetch_config)
            .with_context(|| format!("configure chapter source {}", config.api_url))?,
    );
    let cache = ChapterCache::new();
    let (loader, events) = ChapterLoader::new(
        Arc::clone(&source),
        cache.clone(),
        fetch_config,
        runtime.handle().clone(),
    );
    let prefetcher = Prefetcher::new(source, cache, fetch_config, runtime.handle().clone());

    let mut ui = Ui::new(session, loader, events, prefetcher);
    let outcome = ui.run()?;
    drop(ui);

    match outcome.exit {
        UiExit::Quit => {
            if let Some(entry) = outcome.last_position {
                log::info!(
                    "stopped at chapter {} page {}",
                    entry.chapter_id,
                    entry.page + 1
                );
            }
        }
    }

    runtime.shutdown_timeout(std::time::Duration::from_secs(1));
    Ok(())
}

/// A terminal UI owns stdout, so logs go to a file. `RUST_LOG` overrides
/// the default level.
fn init_logger(path: &Path) -> anyhow::Result<()> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let mut builder = Builder::new();
    builder
        .target(Target::Pipe(Box::new(file)))
        .filter_level(LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
    Ok(())
}

/// Falls back to an in-memory store for this run when the database cannot
/// be opened.
fn open_backend(db_path: &Path) -> SharedStore {
    if let Some(parent) = db_path.parent()
        && let Err(err) = fs::create_dir_all(parent)
    {
        log::warn!("cannot create {}: {err}", parent.display());
    }

    match SqliteStore::open(db_path) {
        Ok(store) => {
            log::info!("using database {}", db_path.display());
            Rc::new(store)
        }
        Err(err) => {
            log::warn!(
                "storage unavailable ({}): {err}; progress will not be kept after exit",
                db_path.display()
            );
            Rc::new(MemoryStore::new())
        }
    }
}
