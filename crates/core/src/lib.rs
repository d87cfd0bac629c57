//! Core domain types for Tankobon.

use serde::{Deserialize, Deserializer, Serialize};

pub mod cursor;
pub mod error;
pub mod navigator;

pub use cursor::{CursorStep, PageCursor};
pub use error::FetchError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterId(pub String);

impl SeriesId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl ChapterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for SeriesId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for ChapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A chapter as delivered by the catalog API.
///
/// Chapter-list responses usually leave `page_urls` empty; the chapter
/// endpoint fills it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: ChapterId,
    pub number: f64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub page_urls: Vec<String>,
    #[serde(default)]
    pub language: String,
}

impl Chapter {
    pub fn total_pages(&self) -> usize {
        self.page_urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.page_urls.is_empty()
    }

    pub fn page_url(&self, index: usize) -> Option<&str> {
        self.page_urls.get(index).map(String::as_str)
    }

    /// `12`, `12.5`; integral numbers drop the fraction.
    pub fn number_label(&self) -> String {
        if self.number.fract() == 0.0 && self.number.is_finite() {
            format!("{}", self.number as i64)
        } else {
            format!("{}", self.number)
        }
    }

    pub fn display_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => {
                format!("Chapter {}: {title}", self.number_label())
            }
            _ => format!("Chapter {}", self.number_label()),
        }
    }
}

/// Last page viewed within one chapter of one series. `page` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingProgressEntry {
    pub series_id: SeriesId,
    pub chapter_id: ChapterId,
    pub page: usize,
    /// Unix milliseconds.
    pub last_visited_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingMode {
    #[default]
    Page,
    Continuous,
}

impl ReadingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingMode::Page => "page",
            ReadingMode::Continuous => "continuous",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ReadingMode::Page => ReadingMode::Continuous,
            ReadingMode::Continuous => ReadingMode::Page,
        }
    }

    /// Maps a persisted mode name onto a supported mode. Names written by
    /// older builds fold into their closest current equivalent; anything
    /// unrecognised falls back to the default.
    pub fn from_persisted(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            match value.trim().to_ascii_lowercase().as_str() {
                "list" | "webtoon" | "vertical" | "scroll" | "strip" => ReadingMode::Continuous,
                "single" | "double" | "paged" | "book" => ReadingMode::Page,
                _ => ReadingMode::default(),
            }
        })
    }
}

impl std::fmt::Display for ReadingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReadingMode {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "page" => Ok(ReadingMode::Page),
            "continuous" => Ok(ReadingMode::Continuous),
            _ => Err("unknown reading mode"),
        }
    }
}

impl<'de> Deserialize<'de> for ReadingMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(ReadingMode::from_persisted(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReadingPreferences {
    pub mode: ReadingMode,
    pub auto_advance_chapter: bool,
    pub show_page_indicator: bool,
    pub preferred_language: Option<String>,
}

impl Default for ReadingPreferences {
    fn default() -> Self {
        Self {
            mode: ReadingMode::Page,
            auto_advance_chapter: true,
            show_page_indicator: true,
            preferred_language: None,
        }
    }
}

impl ReadingPreferences {
    pub fn normalize(&mut self) {
        self.preferred_language = self
            .preferred_language
            .take()
            .map(|lang| lang.trim().to_ascii_lowercase())
            .filter(|lang| !lang.is_empty());
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    pub fn toggle_auto_advance(&mut self) {
        self.auto_advance_chapter = !self.auto_advance_chapter;
    }

    pub fn toggle_page_indicator(&mut self) {
        self.show_page_indicator = !self.show_page_indicator;
    }
}
