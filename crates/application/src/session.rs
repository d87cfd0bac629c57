//! The reading-session controller.
//!
//! Owns the page cursor for the open chapter and is the only writer of
//! reading progress. Chapter changes are never applied directly: crossing a
//! boundary yields [`SessionOutcome::Navigate`], the host loads the chapter,
//! and the result comes back through [`ReadingSession::on_chapter_loaded`] or
//! [`ReadingSession::on_chapter_failed`].

use std::sync::Arc;

use tankobon_core::navigator;
use tankobon_core::{
    Chapter, ChapterId, CursorStep, FetchError, PageCursor, ReadingMode, ReadingPreferences,
    SeriesId,
};
use tankobon_storage::{PreferencesStore, ProgressStore};

use crate::input::{InputEvent, InputQueue};

/// Where the cursor lands when a chapter finishes loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    /// Stored progress for the chapter, or its first page.
    Resume,
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRequest {
    pub series_id: SeriesId,
    pub chapter_id: ChapterId,
    pub entry: EntryPoint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Idle,
    PageChanged(usize),
    /// Load this chapter; the session waits for it before moving.
    Navigate(ChapterRequest),
    ModeChanged(ReadingMode),
    PreferencesChanged,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub chapter_id: ChapterId,
    pub error: FetchError,
}

/// Non-blocking messages the reader shows alongside the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    LoadFailed(String),
    EmptyChapter,
    LanguageFallback(String),
}

#[derive(Debug)]
pub struct ReadingSession {
    series_id: SeriesId,
    all_chapters: Vec<Chapter>,
    chapters: Vec<Chapter>,
    language_fell_back: bool,
    current: Option<Arc<Chapter>>,
    cursor: Option<PageCursor>,
    pending: Option<ChapterRequest>,
    failure: Option<LoadFailure>,
    progress: ProgressStore,
    preferences: PreferencesStore,
}

impl ReadingSession {
    pub fn new(series_id: SeriesId, progress: ProgressStore, preferences: PreferencesStore) -> Self {
        Self {
            series_id,
            all_chapters: Vec::new(),
            chapters: Vec::new(),
            language_fell_back: false,
            current: None,
            cursor: None,
            pending: None,
            failure: None,
            progress,
            preferences,
        }
    }

    pub fn series_id(&self) -> &SeriesId {
        &self.series_id
    }

    /// Sorted chapters after the language preference is applied.
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn language_fell_back(&self) -> bool {
        self.language_fell_back
    }

    pub fn current_chapter(&self) -> Option<&Chapter> {
        self.current.as_deref()
    }

    pub fn cursor(&self) -> Option<&PageCursor> {
        self.cursor.as_ref()
    }

    pub fn pending(&self) -> Option<&ChapterRequest> {
        self.pending.as_ref()
    }

    pub fn failure(&self) -> Option<&LoadFailure> {
        self.failure.as_ref()
    }

    /// The most pressing notice, if any.
    pub fn notice(&self) -> Option<Notice> {
        if let Some(failure) = &self.failure {
            return Some(Notice::LoadFailed(failure.error.user_message()));
        }
        if self.cursor.as_ref().is_some_and(PageCursor::is_empty) {
            return Some(Notice::EmptyChapter);
        }
        if self.language_fell_back {
            let language = self
                .preferences
                .get()
                .preferred_language
                .clone()
                .unwrap_or_default();
            return Some(Notice::LanguageFallback(language));
        }
        None
    }

    pub fn preferences(&self) -> &ReadingPreferences {
        self.preferences.get()
    }

    pub fn mode(&self) -> ReadingMode {
        self.preferences.get().mode
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    pub fn has_next_chapter(&self) -> bool {
        self.cursor
            .as_ref()
            .is_some_and(|c| navigator::next(&self.chapters, c.chapter_id()).is_some())
    }

    pub fn has_previous_chapter(&self) -> bool {
        self.cursor
            .as_ref()
            .is_some_and(|c| navigator::previous(&self.chapters, c.chapter_id()).is_some())
    }

    /// Replaces the chapter list. It may arrive unsorted and may change
    /// mid-session; the cursor is left alone.
    pub fn on_chapter_list_loaded(&mut self, chapters: Vec<Chapter>) {
        self.all_chapters = navigator::sort_ascending(chapters);
        self.apply_language();
    }

    /// Languages present in the full chapter list, sorted.
    pub fn languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self
            .all_chapters
            .iter()
            .map(|c| c.language.clone())
            .filter(|language| !language.is_empty())
            .collect();
        languages.sort();
        languages.dedup();
        languages
    }

    pub fn set_preferred_language(&mut self, language: Option<String>) {
        self.preferences.update(|p| p.preferred_language = language);
        self.apply_language();
    }

    fn apply_language(&mut self) {
        let preferred = self.preferences.get().preferred_language.clone();
        let selection = navigator::select_language(self.all_chapters.clone(), preferred.as_deref());
        if selection.fell_back {
            log::info!(
                "series {} has no chapters in {preferred:?}, showing all languages",
                self.series_id
            );
        }
        self.chapters = selection.chapters;
        self.language_fell_back = selection.fell_back;
    }

    /// Chapter to continue from: the most recently visited one, else the
    /// first chapter.
    pub fn resume_target(&self) -> Option<ChapterRequest> {
        let chapter_id = self
            .progress
            .get_latest(&self.series_id)
            .map(|entry| entry.chapter_id.clone())
            .or_else(|| self.chapters.first().map(|c| c.id.clone()))?;
        Some(ChapterRequest {
            series_id: self.series_id.clone(),
            chapter_id,
            entry: EntryPoint::Resume,
        })
    }

    /// Explicit chapter pick, e.g. from the chapter list.
    pub fn open_chapter(&mut self, chapter_id: &ChapterId) -> SessionOutcome {
        self.request(chapter_id.clone(), EntryPoint::Resume)
    }

    /// Whether the last failure is worth retrying. A missing chapter is
    /// terminal.
    pub fn can_retry(&self) -> bool {
        self.failure
            .as_ref()
            .is_some_and(|failure| failure.error.is_transient())
    }

    /// Retry the chapter that last failed to load.
    pub fn retry(&mut self) -> SessionOutcome {
        if !self.can_retry() {
            return SessionOutcome::Idle;
        }
        match self.failure.take() {
            Some(failure) => self.request(failure.chapter_id, EntryPoint::Resume),
            None => SessionOutcome::Idle,
        }
    }

    fn request(&mut self, chapter_id: ChapterId, entry: EntryPoint) -> SessionOutcome {
        let request = ChapterRequest {
            series_id: self.series_id.clone(),
            chapter_id,
            entry,
        };
        self.pending = Some(request.clone());
        self.failure = None;
        SessionOutcome::Navigate(request)
    }

    pub fn on_chapter_loaded(&mut self, chapter: Arc<Chapter>) -> SessionOutcome {
        let entry = match self.pending.take() {
            Some(request) if request.chapter_id == chapter.id => request.entry,
            _ => EntryPoint::Resume,
        };

        let mut cursor = PageCursor::new(chapter.id.clone(), chapter.total_pages());
        match entry {
            EntryPoint::Resume => {
                if let Some(saved) = self.progress.get(&self.series_id, &chapter.id) {
                    cursor.set_page(saved.page);
                }
            }
            EntryPoint::Start => {}
            EntryPoint::End => {
                cursor.jump_to_end();
            }
        }

        log::info!(
            "opened chapter {} at page {} of {}",
            chapter.id,
            cursor.page(),
            cursor.total_pages()
        );
        let page = cursor.page();
        self.cursor = Some(cursor);
        self.current = Some(chapter);
        self.failure = None;
        self.on_page_changed();
        SessionOutcome::PageChanged(page)
    }

    /// The cursor and stored progress stay on the last chapter that loaded.
    /// Cancellations are superseded requests, not failures.
    pub fn on_chapter_failed(&mut self, chapter_id: &ChapterId, error: FetchError) {
        if self
            .pending
            .as_ref()
            .is_some_and(|request| &request.chapter_id == chapter_id)
        {
            self.pending = None;
        }
        if error.is_cancelled() {
            log::debug!("load of chapter {chapter_id} was superseded");
            return;
        }
        log::warn!("chapter {chapter_id} failed to load: {error}");
        self.failure = Some(LoadFailure {
            chapter_id: chapter_id.clone(),
            error,
        });
    }

    pub fn process(&mut self, queue: &mut InputQueue) -> Vec<SessionOutcome> {
        let mut outcomes = Vec::new();
        while let Some(event) = queue.pop() {
            let outcome = self.handle(event);
            let exit = outcome == SessionOutcome::Exit;
            if outcome != SessionOutcome::Idle {
                outcomes.push(outcome);
            }
            if exit {
                queue.clear();
                break;
            }
        }
        outcomes
    }

    pub fn handle(&mut self, event: InputEvent) -> SessionOutcome {
        let page_mode = self.mode() == ReadingMode::Page;
        match event {
            InputEvent::NextPage if page_mode => self.on_advance_requested(),
            InputEvent::PreviousPage if page_mode => self.on_retreat_requested(),
            InputEvent::JumpToStart if page_mode => {
                let step = self.cursor.as_mut().map(PageCursor::jump_to_start);
                self.apply_step(step)
            }
            InputEvent::JumpToEnd if page_mode => {
                let step = self.cursor.as_mut().map(PageCursor::jump_to_end);
                self.apply_step(step)
            }
            InputEvent::NextPage
            | InputEvent::PreviousPage
            | InputEvent::JumpToStart
            | InputEvent::JumpToEnd => SessionOutcome::Idle,
            InputEvent::NextChapter => self.cross(true, EntryPoint::Start),
            InputEvent::PreviousChapter => self.cross(false, EntryPoint::Start),
            InputEvent::ToggleMode => self.on_mode_toggled(),
            InputEvent::ToggleAutoAdvance => {
                self.preferences.update(ReadingPreferences::toggle_auto_advance);
                SessionOutcome::PreferencesChanged
            }
            InputEvent::TogglePageIndicator => {
                self.preferences.update(ReadingPreferences::toggle_page_indicator);
                SessionOutcome::PreferencesChanged
            }
            InputEvent::ScrolledTo(page) => self.on_scrolled_to(page),
            InputEvent::Exit => {
                self.pending = None;
                SessionOutcome::Exit
            }
        }
    }

    pub fn on_advance_requested(&mut self) -> SessionOutcome {
        let auto_advance = self.preferences.get().auto_advance_chapter;
        let has_next = self.has_next_chapter();
        let step = self
            .cursor
            .as_mut()
            .map(|cursor| cursor.advance(auto_advance, has_next));
        self.apply_step(step)
    }

    pub fn on_retreat_requested(&mut self) -> SessionOutcome {
        let has_previous = self.has_previous_chapter();
        let step = self
            .cursor
            .as_mut()
            .map(|cursor| cursor.retreat(has_previous));
        self.apply_step(step)
    }

    fn apply_step(&mut self, step: Option<CursorStep>) -> SessionOutcome {
        match step {
            Some(CursorStep::Moved(page)) => {
                self.on_page_changed();
                SessionOutcome::PageChanged(page)
            }
            Some(CursorStep::CrossToNext) => self.cross(true, EntryPoint::Start),
            // Retreating into a chapter resumes at its end.
            Some(CursorStep::CrossToPrevious) => self.cross(false, EntryPoint::End),
            Some(CursorStep::Unchanged) | None => SessionOutcome::Idle,
        }
    }

    fn cross(&mut self, forward: bool, entry: EntryPoint) -> SessionOutcome {
        let Some(current) = self.cursor.as_ref().map(|c| c.chapter_id().clone()) else {
            return SessionOutcome::Idle;
        };
        let target = if forward {
            navigator::next(&self.chapters, &current)
        } else {
            navigator::previous(&self.chapters, &current)
        };
        let Some(target) = target.map(|c| c.id.clone()) else {
            return SessionOutcome::Idle;
        };
        if self
            .pending
            .as_ref()
            .is_some_and(|p| p.chapter_id == target && p.entry == entry)
        {
            return SessionOutcome::Idle;
        }
        self.request(target, entry)
    }

    /// Mirrors the cursor into the progress store. Best effort; the store
    /// degrades to memory on its own if persistence fails.
    pub fn on_page_changed(&mut self) {
        if let Some(cursor) = &self.cursor {
            self.progress
                .upsert(&self.series_id, cursor.chapter_id(), cursor.page());
        }
    }

    /// Continuous mode only: records the furthest page scrolled into view.
    pub fn on_scrolled_to(&mut self, page: usize) -> SessionOutcome {
        if self.mode() != ReadingMode::Continuous {
            return SessionOutcome::Idle;
        }
        let step = self.cursor.as_mut().map(|cursor| cursor.reach(page));
        match step {
            Some(CursorStep::Moved(page)) => {
                self.on_page_changed();
                SessionOutcome::PageChanged(page)
            }
            _ => SessionOutcome::Idle,
        }
    }

    pub fn on_mode_toggled(&mut self) -> SessionOutcome {
        let mode = self.preferences.toggle_mode();
        log::info!("reading mode switched to {mode}");
        SessionOutcome::ModeChanged(mode)
    }

    pub fn clear_progress(&mut self) {
        self.progress.clear();
    }
}
