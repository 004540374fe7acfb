use crate::error::{MemoscribeError, Result};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// One named section of the summarized notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSection {
    /// Snake_case section key as produced by the summarizer,
    /// e.g. `action_items`.
    pub key: String,
    pub text: String,
}

/// Summarized meeting notes as an ordered list of named sections.
///
/// Deserialization keeps the order keys appear in the JSON object; that
/// order drives the order of headings in the rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MeetingNotes {
    pub sections: Vec<NoteSection>,
}

impl MeetingNotes {
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            sections: pairs
                .into_iter()
                .map(|(key, text)| NoteSection {
                    key: key.to_string(),
                    text: text.to_string(),
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl<'de> Deserialize<'de> for MeetingNotes {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NotesVisitor;

        impl<'de> Visitor<'de> for NotesVisitor {
            type Value = MeetingNotes;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("a JSON object mapping section names to section text")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut sections = Vec::new();
                while let Some((key, text)) = map.next_entry::<String, String>()? {
                    sections.push(NoteSection { key, text });
                }
                Ok(MeetingNotes { sections })
            }
        }

        deserializer.deserialize_map(NotesVisitor)
    }
}

/// Trait for transcript summarization.
///
/// This trait allows swapping implementations (real API vs mock).
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    /// Reduce a full transcript into named note sections.
    async fn summarize(&self, transcript: &str) -> Result<MeetingNotes>;
}

/// Implement Summarizer for Arc<T> to allow sharing across tasks.
#[async_trait::async_trait]
impl<T: Summarizer> Summarizer for Arc<T> {
    async fn summarize(&self, transcript: &str) -> Result<MeetingNotes> {
        (**self).summarize(transcript).await
    }
}

/// Mock summarizer for testing.
#[derive(Debug, Default)]
pub struct MockSummarizer {
    notes: Option<MeetingNotes>,
    should_fail: bool,
    transcripts: Mutex<Vec<String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to return specific notes.
    pub fn with_notes(mut self, notes: MeetingNotes) -> Self {
        self.notes = Some(notes);
        self
    }

    /// Configure the mock to fail on summarize.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Transcripts passed to `summarize`, in call order.
    pub fn transcripts(&self) -> Vec<String> {
        lock(&self.transcripts).clone()
    }
}

#[async_trait::async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, transcript: &str) -> Result<MeetingNotes> {
        lock(&self.transcripts).push(transcript.to_string());

        if self.should_fail {
            return Err(MemoscribeError::Summarization {
                message: "mock summarization failure".to_string(),
            });
        }

        Ok(self
            .notes
            .clone()
            .unwrap_or_else(|| MeetingNotes::from_pairs([("overview", "mock notes")])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_deserialize_preserves_key_order() {
        let json = r#"{"overview": "A", "action_items": "B"}"#;
        let notes: MeetingNotes = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = notes.sections.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, ["overview", "action_items"]);

        let reversed = r#"{"action_items": "B", "overview": "A"}"#;
        let notes: MeetingNotes = serde_json::from_str(reversed).unwrap();
        let keys: Vec<_> = notes.sections.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, ["action_items", "overview"]);
    }

    #[test]
    fn test_notes_deserialize_keeps_section_text() {
        let json = r#"{"overview": "Weekly planning memo.", "decisions": "Ship on Friday."}"#;

        let notes: MeetingNotes = serde_json::from_str(json).unwrap();

        assert_eq!(notes.sections.len(), 2);
        assert_eq!(notes.sections[0].text, "Weekly planning memo.");
        assert_eq!(notes.sections[1].key, "decisions");
    }

    #[test]
    fn test_notes_deserialize_rejects_non_string_values() {
        let json = r#"{"overview": "A", "action_items": ["not", "a", "string"]}"#;

        let result: std::result::Result<MeetingNotes, _> = serde_json::from_str(json);

        assert!(result.is_err());
    }

    #[test]
    fn test_notes_deserialize_rejects_non_object() {
        let result: std::result::Result<MeetingNotes, _> = serde_json::from_str(r#"["a", "b"]"#);

        assert!(result.is_err());
    }

    #[test]
    fn test_empty_object_has_no_sections() {
        let notes: MeetingNotes = serde_json::from_str("{}").unwrap();

        assert!(notes.is_empty());
    }

    #[test]
    fn test_from_pairs_keeps_order() {
        let notes = MeetingNotes::from_pairs([("b", "2"), ("a", "1")]);

        let keys: Vec<_> = notes.sections.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[tokio::test]
    async fn test_mock_summarizer_returns_configured_notes() {
        let notes = MeetingNotes::from_pairs([("overview", "A"), ("action_items", "B")]);
        let summarizer = MockSummarizer::new().with_notes(notes.clone());

        let result = summarizer.summarize("full transcript").await.unwrap();

        assert_eq!(result, notes);
    }

    #[tokio::test]
    async fn test_mock_summarizer_records_transcripts() {
        let summarizer = MockSummarizer::new();

        summarizer.summarize("first transcript").await.unwrap();
        summarizer.summarize("second transcript").await.unwrap();

        assert_eq!(
            summarizer.transcripts(),
            ["first transcript", "second transcript"]
        );
    }

    #[tokio::test]
    async fn test_mock_summarizer_returns_error_when_configured() {
        let summarizer = MockSummarizer::new().with_failure();

        let result = summarizer.summarize("transcript").await;

        match result {
            Err(MemoscribeError::Summarization { message }) => {
                assert_eq!(message, "mock summarization failure");
            }
            other => panic!("Expected Summarization error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_summarizer_trait_is_object_safe() {
        let summarizer: Box<dyn Summarizer> = Box::new(MockSummarizer::new());

        let notes = summarizer.summarize("transcript").await.unwrap();

        assert!(!notes.is_empty());
    }
}
