//! Hosted chat-completion summarizer.
//!
//! Sends the stitched transcript to an OpenAI-compatible
//! `/chat/completions` endpoint and parses the JSON object the model
//! returns into [`MeetingNotes`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MemoscribeError, Result};
use crate::notes::prompt::{notes_user_prompt, NOTES_SYSTEM};
use crate::notes::summarizer::{MeetingNotes, Summarizer};

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: String,
}

/// Summarizer backed by a hosted chat-completion API.
pub struct ChatApiSummarizer {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl ChatApiSummarizer {
    pub fn new(api_base: &str, api_key: &str, model: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    fn request_for(&self, transcript: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: NOTES_SYSTEM.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: notes_user_prompt(transcript),
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object",
            },
            temperature: 0.3,
        }
    }
}

#[async_trait::async_trait]
impl Summarizer for ChatApiSummarizer {
    async fn summarize(&self, transcript: &str) -> Result<MeetingNotes> {
        let url = format!("{}/chat/completions", self.api_base);
        let request = self.request_for(transcript);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| MemoscribeError::Summarization {
                message: format!("Failed to call summarization API: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MemoscribeError::Summarization {
                message: format!("Summarization API error {status}: {}", body.trim()),
            });
        }

        let chat: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| MemoscribeError::Summarization {
                    message: format!("Failed to parse summarization response: {e}"),
                })?;

        let content = chat
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| MemoscribeError::Summarization {
                message: "Summarization API returned an empty response".to_string(),
            })?;

        serde_json::from_str(content).map_err(|e| MemoscribeError::Summarization {
            message: format!("Failed to parse notes JSON: {e}"),
        })
    }
}
