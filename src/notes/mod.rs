//! Meeting-notes summarization.
//!
//! Reduces a stitched transcript into named sections via a hosted
//! text-generation API and renders them as a markdown document.
//! [`Summarizer`] is the API seam; [`document`] turns the sections into
//! the uploaded notes file.

pub mod chat_api;
pub mod document;
pub mod prompt;
pub mod summarizer;

pub use chat_api::ChatApiSummarizer;
pub use document::{heading_for_key, render_notes};
pub use summarizer::{MeetingNotes, MockSummarizer, NoteSection, Summarizer};
