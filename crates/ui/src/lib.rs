//! Terminal front end: a chapter list and a reader over one
//! [`ReadingSession`].

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{event, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tankobon_application::{
    ChapterListView, InputEvent, InputQueue, Notice, ReadingSession, SessionOutcome,
    filter_chapters, visible_range,
};
use tankobon_core::{Chapter, FetchError, ReadingMode, ReadingProgressEntry};
use tankobon_engine::{ChapterLoader, ChapterSource, Debouncer, FetchEvent, Prefetcher};
use tokio::sync::mpsc::UnboundedReceiver;

mod keys;
mod text;

const ACCENT: Color = Color::Yellow;
/// Terminal rows per page in continuous mode.
const PAGE_ROWS: u16 = 3;
const LIST_OVERSCAN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiExit {
    Quit,
}

#[derive(Debug, Clone)]
pub struct UiOutcome {
    pub exit: UiExit,
    pub last_position: Option<ReadingProgressEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    ChapterList,
    Reader,
}

#[derive(Debug, Default)]
struct FilterPanel {
    open: bool,
    input: String,
    debounce: Debouncer<String>,
}

pub struct Ui<S: ChapterSource> {
    session: ReadingSession,
    loader: ChapterLoader<S>,
    prefetcher: Prefetcher<S>,
    events: UnboundedReceiver<FetchEvent>,
    input: InputQueue,
    screen: Screen,
    list: ChapterListView,
    list_viewport: u16,
    filter: FilterPanel,
    list_error: Option<FetchError>,
    continuous_top: usize,
    reader_viewport: u16,
}

impl<S: ChapterSource> Ui<S> {
    pub fn new(
        session: ReadingSession,
        loader: ChapterLoader<S>,
        events: UnboundedReceiver<FetchEvent>,
        prefetcher: Prefetcher<S>,
    ) -> Self {
        let mut ui = Self {
            session,
            loader,
            prefetcher,
            events,
            input: InputQueue::new(),
            screen: Screen::ChapterList,
            list: ChapterListView::new(1.0, LIST_OVERSCAN),
            list_viewport: 1,
            filter: FilterPanel::default(),
            list_error: None,
            continuous_top: 0,
            reader_viewport: PAGE_ROWS,
        };
        ui.reload_chapter_list();
        ui
    }

    pub fn run(&mut self) -> anyhow::Result<UiOutcome> {
        let mut terminal = setup_terminal()?;
        terminal.clear().ok();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.event_loop(&mut terminal)
        }));
        let restore_result = restore_terminal(&mut terminal);
        self.prefetcher.shutdown();
        self.loader.cancel_all();

        match (result, restore_result) {
            (Ok(Ok(outcome)), Ok(())) => Ok(outcome),
            (Ok(Ok(_)), Err(err)) => Err(err),
            (Ok(Err(err)), Ok(())) => Err(err),
            (Ok(_), Err(err)) => Err(err),
            (Err(panic), Ok(())) => Err(anyhow::anyhow!(panic_to_string(panic))),
            (Err(panic), Err(err)) => Err(anyhow::anyhow!(
                "{}\n(additionally failed to restore terminal: {err})",
                panic_to_string(panic)
            )),
        }
    }

    fn outcome(&self, exit: UiExit) -> UiOutcome {
        UiOutcome {
            exit,
            last_position: self
                .session
                .progress()
                .get_latest(self.session.series_id())
                .cloned(),
        }
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<UiOutcome> {
        let tick_rate = Duration::from_millis(100);
        let mut needs_redraw = true;

        loop {
            if self.drain_fetch_events() {
                needs_redraw = true;
            }
            if self.poll_filter(Instant::now()) {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal.draw(|frame| self.draw(frame.area(), frame))?;
                needs_redraw = false;
            }

            if !event::poll(tick_rate)? {
                continue;
            }

            match event::read()? {
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }

                    needs_redraw = true;

                    let exit = if self.filter.open {
                        self.handle_filter_key(key);
                        None
                    } else {
                        match self.screen {
                            Screen::ChapterList => self.handle_list_key(key)?,
                            Screen::Reader => self.handle_reader_key(key)?,
                        }
                    };
                    if let Some(exit) = exit {
                        return Ok(self.outcome(exit));
                    }
                }
                _ => {}
            }
        }
    }

    /// Applies completed fetches. Superseded results are dropped here.
    fn drain_fetch_events(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.events.try_recv() {
            if !self.loader.accept(&event) {
                log::debug!("dropping stale fetch result (generation {})", event.generation());
                continue;
            }
            changed = true;

            match event {
                FetchEvent::ChapterList {
                    series_id, result, ..
                } => match result {
                    Ok(chapters) => {
                        log::info!("series {series_id} has {} chapters", chapters.len());
                        self.list_error = None;
                        self.session.on_chapter_list_loaded(chapters);
                        self.select_last_read();
                    }
                    Err(err) if err.is_cancelled() => {}
                    Err(err) => {
                        log::warn!("chapter list for series {series_id} failed: {err}");
                        self.list_error = Some(err);
                    }
                },
                FetchEvent::Chapter {
                    chapter_id, result, ..
                } => match result {
                    Ok(chapter) => self.on_chapter_ready(chapter),
                    Err(err) => self.session.on_chapter_failed(&chapter_id, err),
                },
            }
        }
        changed
    }

    fn on_chapter_ready(&mut self, chapter: Arc<Chapter>) {
        let chapter_id = chapter.id.clone();
        self.session.on_chapter_loaded(chapter);
        self.continuous_top = self.session.cursor().map(|c| c.page()).unwrap_or(0);
        if let Some(task) = self
            .prefetcher
            .prefetch_next(&chapter_id, self.session.chapters())
        {
            log::debug!("prefetch started for chapter {}", task.chapter_id);
        }
        self.screen = Screen::Reader;
    }

    fn reload_chapter_list(&mut self) {
        self.list_error = None;
        let series_id = self.session.series_id().clone();
        self.loader.load_chapter_list(&series_id);
    }

    fn select_last_read(&mut self) {
        let Some(entry) = self.session.progress().get_latest(self.session.series_id()) else {
            return;
        };
        let chapter_id = entry.chapter_id.clone();
        self.list.select_chapter(
            self.session.chapters(),
            &chapter_id,
            f32::from(self.list_viewport),
        );
    }

    fn matched_count(&self) -> usize {
        filter_chapters(self.session.chapters(), self.list.query()).len()
    }

    fn process_input(&mut self) {
        for outcome in self.session.process(&mut self.input) {
            self.apply_outcome(outcome);
        }
    }

    fn apply_outcome(&mut self, outcome: SessionOutcome) {
        match outcome {
            SessionOutcome::Navigate(request) => {
                self.loader.load_chapter(&request.chapter_id);
            }
            SessionOutcome::ModeChanged(_) => {
                self.continuous_top = self.session.cursor().map(|c| c.page()).unwrap_or(0);
            }
            SessionOutcome::Exit => {
                self.loader.cancel_chapter();
                self.screen = Screen::ChapterList;
                if let Some(chapter_id) = self.session.cursor().map(|c| c.chapter_id().clone()) {
                    self.list.select_chapter(
                        self.session.chapters(),
                        &chapter_id,
                        f32::from(self.list_viewport),
                    );
                }
            }
            SessionOutcome::Idle
            | SessionOutcome::PageChanged(_)
            | SessionOutcome::PreferencesChanged => {}
        }
    }

    fn poll_filter(&mut self, now: Instant) -> bool {
        match self.filter.debounce.poll(now) {
            Some(query) => {
                self.list.set_query(query);
                true
            }
            None => false,
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.filter.open = false;
                self.filter.input.clear();
                self.filter.debounce.cancel();
                self.list.set_query("");
            }
            KeyCode::Enter => {
                self.filter.open = false;
                self.filter.debounce.cancel();
                self.list.set_query(self.filter.input.clone());
            }
            KeyCode::Backspace => {
                self.filter.input.pop();
                self.filter
                    .debounce
                    .push(self.filter.input.clone(), Instant::now());
            }
            KeyCode::Char(c) => {
                self.filter.input.push(c);
                self.filter
                    .debounce
                    .push(self.filter.input.clone(), Instant::now());
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<Option<UiExit>> {
        let matched = self.matched_count();
        let viewport = f32::from(self.list_viewport);
        let page = usize::from(self.list_viewport.max(1));

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Ok(Some(UiExit::Quit)),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_next(matched),
            KeyCode::Up | KeyCode::Char('k') => self.list.select_prev(),
            KeyCode::PageDown => self.list.select(self.list.selected() + page, matched),
            KeyCode::PageUp => self
                .list
                .select(self.list.selected().saturating_sub(page), matched),
            KeyCode::Home | KeyCode::Char('g') => self.list.select(0, matched),
            KeyCode::End | KeyCode::Char('G') => self.list.select(matched.saturating_sub(1), matched),
            KeyCode::Enter => {
                if let Some(chapter_id) = self
                    .list
                    .selected_chapter(self.session.chapters())
                    .map(|c| c.id.clone())
                {
                    let outcome = self.session.open_chapter(&chapter_id);
                    self.apply_outcome(outcome);
                    self.screen = Screen::Reader;
                }
            }
            KeyCode::Char('c') => {
                if let Some(request) = self.session.resume_target() {
                    let outcome = self.session.open_chapter(&request.chapter_id);
                    self.apply_outcome(outcome);
                    self.screen = Screen::Reader;
                }
            }
            KeyCode::Char('/') => {
                self.filter.open = true;
                self.filter.input = self.list.query().to_string();
            }
            KeyCode::Char('r') => self.reload_chapter_list(),
            KeyCode::Char('L') => self.cycle_language(),
            KeyCode::Char('X') => {
                self.session.clear_progress();
                log::info!("reading history cleared");
            }
            KeyCode::Char('m') => self.input.push(InputEvent::ToggleMode),
            KeyCode::Char('a') => self.input.push(InputEvent::ToggleAutoAdvance),
            KeyCode::Char('p') => self.input.push(InputEvent::TogglePageIndicator),
            _ => {}
        }

        self.process_input();
        self.list.ensure_selected_visible(self.matched_count(), viewport);
        Ok(None)
    }

    fn cycle_language(&mut self) {
        let languages = self.session.languages();
        let next = match self.session.preferences().preferred_language.as_deref() {
            None => languages.first().cloned(),
            Some(current) => languages
                .iter()
                .position(|l| l == current)
                .and_then(|i| languages.get(i + 1))
                .cloned(),
        };
        log::info!("preferred language set to {next:?}");
        self.session.set_preferred_language(next);
    }

    fn handle_reader_key(&mut self, key: KeyEvent) -> anyhow::Result<Option<UiExit>> {
        if key.code == KeyCode::Char('r') && self.session.can_retry() {
            let outcome = self.session.retry();
            self.apply_outcome(outcome);
            return Ok(None);
        }

        if self.session.mode() == ReadingMode::Continuous {
            if keys::is_scroll_down(&key) {
                self.scroll_continuous(1);
                return Ok(None);
            }
            if keys::is_scroll_up(&key) {
                self.scroll_continuous(-1);
                return Ok(None);
            }
        }

        if let Some(input) = keys::key_input(&key) {
            self.input.push_key(self.session.mode(), input);
        }
        self.process_input();
        Ok(None)
    }

    fn visible_page_count(&self) -> usize {
        usize::from((self.reader_viewport / PAGE_ROWS).max(1))
    }

    /// Moves the continuous view and reports the lowest page now in view.
    fn scroll_continuous(&mut self, delta: isize) {
        let total = self.session.cursor().map(|c| c.total_pages()).unwrap_or(0);
        if total == 0 {
            return;
        }
        let visible = self.visible_page_count();
        let max_top = total.saturating_sub(visible);
        self.continuous_top = self.continuous_top.saturating_add_signed(delta).min(max_top);
        let lowest = (self.continuous_top + visible).min(total) - 1;
        self.input.push(InputEvent::ScrolledTo(lowest));
        self.process_input();
    }

    fn draw(&mut self, area: Rect, frame: &mut ratatui::Frame) {
        frame.render_widget(Clear, area);
        match self.screen {
            Screen::ChapterList => self.draw_chapter_list(area, frame),
            Screen::Reader => self.draw_reader(area, frame),
        }
        if self.filter.open {
            self.draw_filter_panel(area, frame);
        }
    }

    fn draw_chapter_list(&mut self, area: Rect, frame: &mut ratatui::Frame) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area);

        let header = Paragraph::new(Text::from(self.list_header_lines()))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, layout[0]);

        let block = Block::default().borders(Borders::ALL).title("Chapters");
        let inner = block.inner(layout[1]);
        frame.render_widget(block, layout[1]);
        self.list_viewport = inner.height.max(1);

        let body = self.chapter_rows(inner);
        frame.render_widget(Paragraph::new(Text::from(body)), inner);

        let footer = Paragraph::new(Text::from(vec![Line::from(
            "Enter open · c continue · / filter · L language · m/a/p settings · X clear history · q quit",
        )]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
        frame.render_widget(footer, layout[2]);
    }

    fn list_header_lines(&self) -> Vec<Line<'static>> {
        let prefs = self.session.preferences();
        let language = prefs
            .preferred_language
            .clone()
            .unwrap_or_else(|| "all languages".to_string());
        let mut lines = vec![Line::from(Span::styled(
            format!("Series {}", self.session.series_id()),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))];
        let mut status = format!(
            "{} · auto-advance {} · {language}",
            prefs.mode,
            if prefs.auto_advance_chapter { "on" } else { "off" },
        );
        if let Some(Notice::LanguageFallback(preferred)) = self.session.notice() {
            status.push_str(&format!(" (no {preferred} chapters, showing all)"));
        }
        if !self.list.query().is_empty() {
            status.push_str(&format!(" · filter \"{}\"", self.list.query()));
        }
        lines.push(Line::from(status));
        lines
    }

    fn chapter_rows(&self, inner: Rect) -> Vec<Line<'static>> {
        let chapters = self.session.chapters();
        if chapters.is_empty() {
            let message = if let Some(err) = &self.list_error {
                format!("Could not load chapters: {}", err.user_message())
            } else if self.loader.is_loading_list() {
                "Loading chapters…".to_string()
            } else {
                "No chapters.".to_string()
            };
            return vec![Line::from(message)];
        }

        let window = self.list.render(
            chapters,
            f32::from(inner.height),
            self.session.progress(),
            self.session.series_id(),
        );
        if window.matched == 0 {
            return vec![Line::from("No chapters match the filter.")];
        }

        let first = self.list.scroll_offset().floor() as usize;
        let last = first + usize::from(inner.height);
        let now = text::unix_now_millis();
        let width = usize::from(inner.width);

        window
            .rows
            .iter()
            .filter(|row| row.index >= first && row.index < last)
            .filter_map(|row| {
                let chapter = chapters.get(row.chapter_index)?;
                let marker = if row.last_read { "▶ " } else { "  " };
                let resume = match row.resume_page {
                    Some(page) => {
                        let visited = self
                            .session
                            .progress()
                            .get(self.session.series_id(), &chapter.id)
                            .map(|e| text::format_visited(e.last_visited_at, now))
                            .unwrap_or_default();
                        format!("  p.{} · {visited}", page + 1)
                    }
                    None => String::new(),
                };
                let title_width = width.saturating_sub(marker.len() + resume.len() + 1);
                let title = text::truncate_to_width(&chapter.display_title(), title_width);
                let style = if row.index == self.list.selected() {
                    Style::default()
                        .fg(Color::Black)
                        .bg(ACCENT)
                        .add_modifier(Modifier::BOLD)
                } else if row.last_read {
                    Style::default().fg(ACCENT)
                } else {
                    Style::default()
                };
                Some(Line::from(vec![
                    Span::styled(format!("{marker}{title}"), style),
                    Span::styled(resume, Style::default().fg(Color::Gray)),
                ]))
            })
            .collect()
    }

    fn draw_filter_panel(&self, area: Rect, frame: &mut ratatui::Frame) {
        let popup_area = centered_rect(60, 20, area);
        frame.render_widget(Clear, popup_area);
        let block = Block::default().borders(Borders::ALL).title(Span::styled(
            "Filter chapters",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ));
        let body = Paragraph::new(Text::from(vec![
            Line::from(format!("> {}", self.filter.input)),
            Line::from(Span::styled(
                "Title or chapter number · Enter apply · Esc clear",
                Style::default().fg(Color::Gray),
            )),
        ]))
        .block(block);
        frame.render_widget(body, popup_area);
    }

    fn draw_reader(&mut self, area: Rect, frame: &mut ratatui::Frame) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(area);

        let title = self
            .session
            .current_chapter()
            .map(Chapter::display_title)
            .unwrap_or_else(|| "Loading…".to_string());
        let header = Paragraph::new(Line::from(Span::styled(
            text::truncate_to_width(&title, usize::from(area.width)),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, layout[0]);

        let body_area = layout[1];
        self.reader_viewport = body_area.height.max(1);
        let body = self.reader_body_lines(body_area);
        frame.render_widget(
            Paragraph::new(Text::from(body)).wrap(Wrap { trim: false }),
            body_area,
        );

        let footer = Paragraph::new(Text::from(self.reader_footer_lines()))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP));
        frame.render_widget(footer, layout[2]);
    }

    fn reader_body_lines(&self, area: Rect) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        match self.session.notice() {
            Some(Notice::LoadFailed(message)) => {
                lines.push(Line::from(Span::styled(
                    message,
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(""));
            }
            Some(Notice::LanguageFallback(preferred)) => {
                lines.push(Line::from(Span::styled(
                    format!("No chapters in {preferred}; showing all languages."),
                    Style::default().fg(Color::Gray),
                )));
            }
            Some(Notice::EmptyChapter) | None => {}
        }

        let (Some(chapter), Some(cursor)) = (self.session.current_chapter(), self.session.cursor())
        else {
            if self.session.failure().is_none() {
                lines.push(Line::from("Loading chapter…"));
            }
            return lines;
        };

        if cursor.is_empty() {
            lines.push(Line::from("This chapter has no pages."));
            lines.push(Line::from(Span::styled(
                "Use [ and ] to move between chapters.",
                Style::default().fg(Color::Gray),
            )));
            return lines;
        }

        let width = usize::from(area.width);
        match self.session.mode() {
            ReadingMode::Page => {
                let url = chapter.page_url(cursor.page()).unwrap_or_default();
                let top_pad = area.height.saturating_sub(3) / 2;
                lines.extend((0..top_pad).map(|_| Line::from("")));
                if self.session.preferences().show_page_indicator {
                    let indicator = text::page_indicator(cursor.page(), cursor.total_pages());
                    lines.push(
                        Line::from(Span::styled(
                            format!("Page {indicator}"),
                            Style::default().add_modifier(Modifier::BOLD),
                        ))
                        .alignment(Alignment::Center),
                    );
                }
                lines.push(Line::from(text::truncate_to_width(url, width)).alignment(Alignment::Center));
            }
            ReadingMode::Continuous => {
                let range = visible_range(
                    cursor.total_pages(),
                    f32::from(PAGE_ROWS),
                    f32::from(area.height),
                    (self.continuous_top * usize::from(PAGE_ROWS)) as f32,
                    0,
                );
                for page in range {
                    let label = if page == cursor.page() {
                        Span::styled(
                            format!("── page {} ──", page + 1),
                            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                        )
                    } else {
                        Span::raw(format!("── page {} ──", page + 1))
                    };
                    lines.push(Line::from(label));
                    let url = chapter.page_url(page).unwrap_or_default();
                    lines.push(Line::from(text::truncate_to_width(url, width)));
                    lines.push(Line::from(""));
                }
            }
        }
        lines
    }

    fn reader_footer_lines(&self) -> Vec<Line<'static>> {
        let prefs = self.session.preferences();
        let mut parts = Vec::new();
        if prefs.show_page_indicator
            && let Some(cursor) = self.session.cursor()
        {
            parts.push(text::page_indicator(cursor.page(), cursor.total_pages()));
        }
        if self.session.pending().is_some() || self.loader.is_loading_chapter() {
            parts.push("loading…".to_string());
        }
        let keys = match prefs.mode {
            ReadingMode::Page => "←/→ page · [ ] chapter · Home/End · m mode · a auto · Esc back",
            ReadingMode::Continuous => "j/k scroll · [ ] chapter · m mode · a auto · Esc back",
        };
        parts.push(keys.to_string());
        if self.session.can_retry() {
            parts.push("r retry".to_string());
        }
        vec![Line::from(parts.join("  ·  "))]
    }
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    terminal::enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen).context("enter alt screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("create terminal")
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    terminal::disable_raw_mode().context("disable raw mode")?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("leave alt screen")?;
    Ok(())
}

fn panic_to_string(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic: (unknown payload)".to_string()
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
