//! Sequencing over an ordered chapter list.
//!
//! Nothing here caches: the list can grow mid-session, so every call works
//! on whatever slice the caller hands in.

use crate::{Chapter, ChapterId};

/// Stable ascending sort by chapter number. Equal numbers keep input order.
pub fn sort_ascending(mut chapters: Vec<Chapter>) -> Vec<Chapter> {
    chapters.sort_by(|a, b| a.number.total_cmp(&b.number));
    chapters
}

pub fn index_of(chapters: &[Chapter], chapter_id: &ChapterId) -> Option<usize> {
    chapters.iter().position(|c| &c.id == chapter_id)
}

pub fn next<'a>(chapters: &'a [Chapter], chapter_id: &ChapterId) -> Option<&'a Chapter> {
    let idx = index_of(chapters, chapter_id)?;
    chapters.get(idx + 1)
}

pub fn previous<'a>(chapters: &'a [Chapter], chapter_id: &ChapterId) -> Option<&'a Chapter> {
    let idx = index_of(chapters, chapter_id)?;
    idx.checked_sub(1).and_then(|prev| chapters.get(prev))
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageSelection {
    pub chapters: Vec<Chapter>,
    /// Nothing matched the preferred language, so the full list is shown.
    pub fell_back: bool,
}

/// Keeps chapters in `preferred` when any exist; otherwise returns the
/// unfiltered list and flags the fallback.
pub fn select_language(chapters: Vec<Chapter>, preferred: Option<&str>) -> LanguageSelection {
    let Some(preferred) = preferred.map(str::trim).filter(|p| !p.is_empty()) else {
        return LanguageSelection {
            chapters,
            fell_back: false,
        };
    };

    let matching: Vec<Chapter> = chapters
        .iter()
        .filter(|c| c.language.eq_ignore_ascii_case(preferred))
        .cloned()
        .collect();

    if matching.is_empty() && !chapters.is_empty() {
        LanguageSelection {
            chapters,
            fell_back: true,
        }
    } else {
        LanguageSelection {
            chapters: matching,
            fell_back: false,
        }
    }
}
