//! Page position within a single chapter.

use crate::ChapterId;

/// What a cursor operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStep {
    Moved(usize),
    Unchanged,
    /// Past the last page: open the next chapter at its first page.
    CrossToNext,
    /// Before the first page: open the previous chapter at its last page.
    CrossToPrevious,
}

/// Zero-based page cursor. A chapter without pages is the `empty` state:
/// the index is pinned at 0 and every move is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    chapter_id: ChapterId,
    page: usize,
    total_pages: usize,
}

impl PageCursor {
    pub fn new(chapter_id: ChapterId, total_pages: usize) -> Self {
        Self {
            chapter_id,
            page: 0,
            total_pages,
        }
    }

    pub fn chapter_id(&self) -> &ChapterId {
        &self.chapter_id
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.total_pages == 0
    }

    fn last_page(&self) -> usize {
        self.total_pages.saturating_sub(1)
    }

    fn move_to(&mut self, page: usize) -> CursorStep {
        if page == self.page {
            CursorStep::Unchanged
        } else {
            self.page = page;
            CursorStep::Moved(page)
        }
    }

    pub fn advance(&mut self, auto_advance: bool, has_next: bool) -> CursorStep {
        if self.is_empty() {
            return CursorStep::Unchanged;
        }
        if self.page < self.last_page() {
            return self.move_to(self.page + 1);
        }
        if auto_advance && has_next {
            CursorStep::CrossToNext
        } else {
            CursorStep::Unchanged
        }
    }

    pub fn retreat(&mut self, has_previous: bool) -> CursorStep {
        if self.is_empty() {
            return CursorStep::Unchanged;
        }
        if self.page > 0 {
            return self.move_to(self.page - 1);
        }
        if has_previous {
            CursorStep::CrossToPrevious
        } else {
            CursorStep::Unchanged
        }
    }

    pub fn jump_to_start(&mut self) -> CursorStep {
        self.move_to(0)
    }

    pub fn jump_to_end(&mut self) -> CursorStep {
        self.move_to(self.last_page())
    }

    /// Clamps into `[0, total_pages - 1]`.
    pub fn set_page(&mut self, page: usize) -> CursorStep {
        self.move_to(page.min(self.last_page()))
    }

    /// Continuous mode: keep the furthest page scrolled into view.
    pub fn reach(&mut self, page: usize) -> CursorStep {
        let page = page.min(self.last_page());
        if page > self.page {
            self.move_to(page)
        } else {
            CursorStep::Unchanged
        }
    }
}
