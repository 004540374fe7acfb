//! Hosted transcription API client.
//!
//! Posts chunk audio to an OpenAI-compatible `/audio/transcriptions`
//! endpoint as multipart form data. The previous chunk's transcript, when
//! present, rides along in the `prompt` field.

use crate::error::{MemoscribeError, Result};
use crate::stt::transcriber::Transcriber;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Transcriber backed by a hosted speech-to-text API.
#[derive(Debug, Clone)]
pub struct WhisperApiTranscriber {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl WhisperApiTranscriber {
    pub fn new(api_base: &str, api_key: &str, model: &str) -> Self {
        // 20-minute chunk uploads need a generous timeout.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(600))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl Transcriber for WhisperApiTranscriber {
    async fn transcribe(
        &self,
        audio: &[u8],
        file_name: &str,
        hint: Option<&str>,
    ) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(file_name.to_string())
            .mime_str("audio/wav")
            .map_err(|e| MemoscribeError::Transcription {
                message: format!("Invalid audio part: {e}"),
            })?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone());
        if let Some(hint) = hint {
            form = form.text("prompt", hint.to_string());
        }

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.api_base))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| MemoscribeError::Transcription {
                message: format!("Failed to reach transcription API: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MemoscribeError::Transcription {
                message: format!("Transcription API error {status}: {}", body.trim()),
            });
        }

        let parsed: TranscriptionResponse =
            response
                .json()
                .await
                .map_err(|e| MemoscribeError::Transcription {
                    message: format!("Failed to parse transcription response: {e}"),
                })?;

        Ok(parsed.text.trim().to_string())
    }
}
