use std::ops::Range;

use tankobon_core::{Chapter, ChapterId, SeriesId};
use tankobon_storage::ProgressStore;

pub const DEFAULT_OVERSCAN: usize = 10;

/// Indices of the rows to materialize for a uniform-height list.
///
/// Covers `[scroll_offset - overscan rows, scroll_offset + viewport_height +
/// overscan rows]`, clamped to the list.
pub fn visible_range(
    total: usize,
    row_height: f32,
    viewport_height: f32,
    scroll_offset: f32,
    overscan: usize,
) -> Range<usize> {
    if total == 0 || row_height <= 0.0 || viewport_height <= 0.0 {
        return 0..0;
    }

    let first_visible = ((scroll_offset.max(0.0) / row_height).floor() as usize).min(total - 1);
    let visible_rows = (viewport_height / row_height).ceil() as usize;
    let mut last_visible = (first_visible + visible_rows).min(total);
    if last_visible <= first_visible {
        last_visible = (first_visible + 1).min(total);
    }

    let start = first_visible.saturating_sub(overscan);
    let end = (last_visible + overscan).min(total);
    start..end
}

/// Indices into `chapters` matching `query`: case-insensitive title match or
/// a prefix of the chapter number. A blank query matches everything.
pub fn filter_chapters(chapters: &[Chapter], query: &str) -> Vec<usize> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return (0..chapters.len()).collect();
    }
    chapters
        .iter()
        .enumerate()
        .filter(|(_, chapter)| {
            chapter.number_label().starts_with(&query)
                || chapter
                    .title
                    .as_deref()
                    .is_some_and(|title| title.to_lowercase().contains(&query))
        })
        .map(|(index, _)| index)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisibleRow {
    /// Position within the filtered list.
    pub index: usize,
    /// Position within the full chapter slice.
    pub chapter_index: usize,
    pub top: f32,
    pub last_read: bool,
    /// Stored page for this chapter, if it was ever opened.
    pub resume_page: Option<usize>,
}

/// Materialized rows plus the empty space standing in for everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualWindow {
    pub rows: Vec<VisibleRow>,
    pub total_height: f32,
    pub leading_space: f32,
    pub trailing_space: f32,
    pub matched: usize,
}

#[derive(Debug, Clone)]
pub struct ChapterListView {
    row_height: f32,
    overscan: usize,
    scroll_offset: f32,
    query: String,
    selected: usize,
}

impl Default for ChapterListView {
    fn default() -> Self {
        Self::new(1.0, DEFAULT_OVERSCAN)
    }
}

impl ChapterListView {
    pub fn new(row_height: f32, overscan: usize) -> Self {
        Self {
            row_height: row_height.max(f32::EPSILON),
            overscan,
            scroll_offset: 0.0,
            query: String::new(),
            selected: 0,
        }
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Index into the filtered list.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Applying a new filter resets scroll and selection.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.query {
            return;
        }
        self.query = query;
        self.scroll_offset = 0.0;
        self.selected = 0;
    }

    pub fn scroll_to(&mut self, offset: f32, matched: usize, viewport_height: f32) {
        let max = self.max_scroll(matched, viewport_height);
        self.scroll_offset = offset.clamp(0.0, max);
    }

    pub fn scroll_by(&mut self, delta: f32, matched: usize, viewport_height: f32) {
        self.scroll_to(self.scroll_offset + delta, matched, viewport_height);
    }

    fn max_scroll(&self, matched: usize, viewport_height: f32) -> f32 {
        (matched as f32 * self.row_height - viewport_height).max(0.0)
    }

    pub fn select_next(&mut self, matched: usize) {
        if matched > 0 {
            self.selected = (self.selected + 1).min(matched - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select(&mut self, index: usize, matched: usize) {
        self.selected = index.min(matched.saturating_sub(1));
    }

    /// Scrolls just enough to bring the selected row into the viewport.
    pub fn ensure_selected_visible(&mut self, matched: usize, viewport_height: f32) {
        if matched == 0 {
            self.scroll_offset = 0.0;
            return;
        }
        self.selected = self.selected.min(matched - 1);
        let top = self.selected as f32 * self.row_height;
        let bottom = top + self.row_height;
        if top < self.scroll_offset {
            self.scroll_to(top, matched, viewport_height);
        } else if bottom > self.scroll_offset + viewport_height {
            self.scroll_to(bottom - viewport_height, matched, viewport_height);
        }
    }

    pub fn selected_chapter<'a>(&self, chapters: &'a [Chapter]) -> Option<&'a Chapter> {
        filter_chapters(chapters, &self.query)
            .get(self.selected)
            .and_then(|&index| chapters.get(index))
    }

    /// Moves the selection onto `chapter_id` if it passes the current filter.
    pub fn select_chapter(&mut self, chapters: &[Chapter], chapter_id: &ChapterId, viewport_height: f32) {
        let matched = filter_chapters(chapters, &self.query);
        if let Some(position) = matched.iter().position(|&i| chapters[i].id == *chapter_id) {
            self.selected = position;
            self.ensure_selected_visible(matched.len(), viewport_height);
        }
    }

    /// Only rows near the viewport are materialized. The last-read marker is
    /// a read-only join against the progress store.
    pub fn render(
        &self,
        chapters: &[Chapter],
        viewport_height: f32,
        progress: &ProgressStore,
        series_id: &SeriesId,
    ) -> VirtualWindow {
        let matched = filter_chapters(chapters, &self.query);
        let total_height = matched.len() as f32 * self.row_height;
        let scroll_offset = self
            .scroll_offset
            .clamp(0.0, self.max_scroll(matched.len(), viewport_height));
        let range = visible_range(
            matched.len(),
            self.row_height,
            viewport_height,
            scroll_offset,
            self.overscan,
        );

        let last_read = progress
            .get_latest(series_id)
            .map(|entry| entry.chapter_id.clone());

        let rows: Vec<VisibleRow> = range
            .clone()
            .filter_map(|index| {
                let chapter_index = *matched.get(index)?;
                let chapter = chapters.get(chapter_index)?;
                Some(VisibleRow {
                    index,
                    chapter_index,
                    top: index as f32 * self.row_height,
                    last_read: last_read.as_ref() == Some(&chapter.id),
                    resume_page: progress.get(series_id, &chapter.id).map(|entry| entry.page),
                })
            })
            .collect();

        let leading_space = range.start as f32 * self.row_height;
        let trailing_space = (matched.len() - range.end) as f32 * self.row_height;

        VirtualWindow {
            rows,
            total_height,
            leading_space,
            trailing_space,
            matched: matched.len(),
        }
    }
}
