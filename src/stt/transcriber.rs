use crate::error::{MemoscribeError, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Trait for hosted speech-to-text transcription.
///
/// This trait allows swapping implementations (real API vs mock).
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe one chunk of encoded audio to text.
    ///
    /// # Arguments
    /// * `audio` - Complete audio file bytes (WAV)
    /// * `file_name` - Name to attach to the upload
    /// * `hint` - Transcript of the preceding chunk, if any, so the model
    ///   keeps terminology consistent across chunk boundaries
    async fn transcribe(&self, audio: &[u8], file_name: &str, hint: Option<&str>)
    -> Result<String>;
}

/// Implement Transcriber for Arc<T> to allow sharing across tasks.
#[async_trait::async_trait]
impl<T: Transcriber> Transcriber for Arc<T> {
    async fn transcribe(
        &self,
        audio: &[u8],
        file_name: &str,
        hint: Option<&str>,
    ) -> Result<String> {
        (**self).transcribe(audio, file_name, hint).await
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Failure,
}

/// Arguments seen by a single `transcribe` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub file_name: String,
    pub hint: Option<String>,
}

/// Mock transcriber for testing.
///
/// Replies are queued positionally: the first call pops the first reply,
/// and so on. An exhausted queue falls back to a fixed response. Every
/// call is recorded for later inspection.
#[derive(Debug, Default)]
pub struct MockTranscriber {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTranscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response for the next unanswered call.
    pub fn with_response(self, response: &str) -> Self {
        lock(&self.replies).push_back(Reply::Text(response.to_string()));
        self
    }

    /// Queue a failure for the next unanswered call.
    pub fn with_failure(self) -> Self {
        lock(&self.replies).push_back(Reply::Failure);
        self
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Hints passed so far, in call order.
    pub fn hints(&self) -> Vec<Option<String>> {
        lock(&self.calls).iter().map(|c| c.hint.clone()).collect()
    }
}

#[async_trait::async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(
        &self,
        _audio: &[u8],
        file_name: &str,
        hint: Option<&str>,
    ) -> Result<String> {
        lock(&self.calls).push(RecordedCall {
            file_name: file_name.to_string(),
            hint: hint.map(str::to_string),
        });

        match lock(&self.replies).pop_front() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Failure) => Err(MemoscribeError::Transcription {
                message: "mock transcription failure".to_string(),
            }),
            None => Ok("mock transcription".to_string()),
        }
    }
}
