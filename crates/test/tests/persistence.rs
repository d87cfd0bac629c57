use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use tankobon_application::ReadingSession;
use tankobon_core::{ChapterId, ReadingMode, SeriesId};
use tankobon_storage::{KeyValueStore, PreferencesStore, ProgressStore, SqliteStore};
use tankobon_test::{SERIES, make_chapter, make_chapters};

struct TempDb(PathBuf);

impl TempDb {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "tankobon-{name}-{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        Self(path)
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn open_session(db: &TempDb) -> anyhow::Result<ReadingSession> {
    let backend = Rc::new(SqliteStore::open(&db.0)?);
    let progress = ProgressStore::open(backend.clone(), 100);
    let preferences = PreferencesStore::open(backend);
    let mut session = ReadingSession::new(SeriesId::new(SERIES), progress, preferences);
    session.on_chapter_list_loaded(make_chapters(3, 6));
    Ok(session)
}

#[test]
fn reading_position_survives_process_restart() -> anyhow::Result<()> {
    let db = TempDb::new("restart");
    {
        let mut session = open_session(&db)?;
        session.on_chapter_loaded(Arc::new(make_chapter("c1", 1.0, 6)));
        session.on_chapter_loaded(Arc::new(make_chapter("c2", 2.0, 6)));
        session.on_advance_requested();
        session.on_advance_requested();
        session.on_mode_toggled();
    }

    let mut session = open_session(&db)?;
    assert_eq!(session.mode(), ReadingMode::Continuous);
    let target = session
        .resume_target()
        .ok_or_else(|| anyhow::anyhow!("nothing to resume"))?;
    assert_eq!(target.chapter_id, ChapterId::new("c2"));

    session.open_chapter(&target.chapter_id);
    session.on_chapter_loaded(Arc::new(make_chapter("c2", 2.0, 6)));
    assert_eq!(session.cursor().map(|c| c.page()), Some(2));

    let entry = session
        .progress()
        .get(&SeriesId::new(SERIES), &ChapterId::new("c1"))
        .ok_or_else(|| anyhow::anyhow!("c1 progress lost"))?;
    assert_eq!(entry.page, 0);
    assert_eq!(entry.series_id.as_str(), SERIES);
    Ok(())
}

#[test]
fn retired_mode_names_fold_into_supported_ones() -> anyhow::Result<()> {
    let db = TempDb::new("retired-mode");
    {
        let backend = SqliteStore::open(&db.0)?;
        backend.set(
            "reading_preferences",
            r#"{"mode":"webtoon","autoAdvanceChapter":false}"#,
        )?;
    }

    let session = open_session(&db)?;
    assert_eq!(session.mode(), ReadingMode::Continuous);
    assert!(!session.preferences().auto_advance_chapter);
    assert!(session.preferences().show_page_indicator);
    Ok(())
}

#[test]
fn bare_legacy_mode_key_is_migrated() -> anyhow::Result<()> {
    let db = TempDb::new("legacy-key");
    {
        let backend = SqliteStore::open(&db.0)?;
        backend.set("reading_mode", "single")?;
    }

    let session = open_session(&db)?;
    assert_eq!(session.mode(), ReadingMode::Page);

    let backend = SqliteStore::open(&db.0)?;
    assert_eq!(backend.get("reading_mode")?, None);
    assert!(backend.get("reading_preferences")?.is_some());
    Ok(())
}
