//! Reading-session orchestration for Tankobon.
//!
//! Front ends feed key input through [`InputQueue`], hand completed fetches
//! to [`ReadingSession`], and render [`ChapterListView`] windows. Nothing
//! here touches the network or the terminal.

pub mod chapter_list;
pub mod input;
pub mod session;

pub use chapter_list::{ChapterListView, VirtualWindow, VisibleRow, filter_chapters, visible_range};
pub use input::{InputEvent, InputQueue, Key, KeyInput, map_key};
pub use session::{ChapterRequest, EntryPoint, LoadFailure, Notice, ReadingSession, SessionOutcome};
