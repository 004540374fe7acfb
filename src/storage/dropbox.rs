//! Dropbox HTTP client.
//!
//! Talks to the Dropbox v2 REST API directly: an OAuth2 refresh-token
//! grant at connect time, then the `files/*` endpoints the pipeline
//! needs. Listing is paginated, downloads are streamed to disk.

use crate::error::{MemoscribeError, Result};
use crate::storage::store::{FileStore, RemoteEntry};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

const API_BASE: &str = "https://api.dropboxapi.com";
const CONTENT_BASE: &str = "https://content.dropboxapi.com";

/// Header carrying the JSON argument for content endpoints.
const API_ARG_HEADER: &str = "Dropbox-API-Arg";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct ListFolderRequest {
    path: String,
}

#[derive(Debug, Serialize)]
struct ListContinueRequest {
    cursor: String,
}

#[derive(Debug, Serialize)]
struct PathRequest {
    path: String,
}

#[derive(Debug, Serialize)]
struct UploadArg {
    path: String,
    mode: &'static str,
}

#[derive(Debug, Deserialize)]
struct ListFolderPage {
    entries: Vec<ListEntry>,
    cursor: String,
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct ListEntry {
    #[serde(rename = ".tag")]
    tag: String,
    name: String,
    /// Only present on file entries.
    #[serde(default)]
    size: u64,
}

/// Dropbox-backed [`FileStore`].
#[derive(Debug)]
pub struct DropboxStore {
    client: reqwest::Client,
    access_token: String,
    show_progress: bool,
}

impl DropboxStore {
    /// Exchanges the long-lived refresh token for a short-lived access
    /// token and returns a ready-to-use client.
    ///
    /// # Errors
    ///
    /// Returns [`MemoscribeError::Storage`] if the token endpoint rejects
    /// the app credentials or the response cannot be parsed.
    pub async fn connect(
        app_key: &str,
        app_secret: &str,
        refresh_token: &str,
        show_progress: bool,
    ) -> Result<Self> {
        let client = reqwest::Client::new();
        let response = client
            .post(format!("{API_BASE}/oauth2/token"))
            .basic_auth(app_key, Some(app_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| MemoscribeError::Storage {
                message: format!("Failed to reach token endpoint: {e}"),
            })?;
        let response = check_status("Token refresh failed", response).await?;
        let token: TokenResponse =
            response
                .json()
                .await
                .map_err(|e| MemoscribeError::Storage {
                    message: format!("Failed to parse token response: {e}"),
                })?;

        Ok(Self {
            client,
            access_token: token.access_token,
            show_progress,
        })
    }
}

#[async_trait::async_trait]
impl FileStore for DropboxStore {
    async fn list_folder(&self, folder: &str) -> Result<Vec<RemoteEntry>> {
        let request = ListFolderRequest {
            path: folder_path(folder),
        };
        let response = self
            .client
            .post(format!("{API_BASE}/2/files/list_folder"))
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| MemoscribeError::Storage {
                message: format!("Failed to list folder '{folder}': {e}"),
            })?;
        let response = check_status("Folder listing failed", response).await?;
        let mut page: ListFolderPage =
            response
                .json()
                .await
                .map_err(|e| MemoscribeError::Storage {
                    message: format!("Failed to parse folder listing: {e}"),
                })?;

        let mut entries = file_entries(std::mem::take(&mut page.entries));
        while page.has_more {
            let request = ListContinueRequest {
                cursor: page.cursor.clone(),
            };
            let response = self
                .client
                .post(format!("{API_BASE}/2/files/list_folder/continue"))
                .bearer_auth(&self.access_token)
                .json(&request)
                .send()
                .await
                .map_err(|e| MemoscribeError::Storage {
                    message: format!("Failed to continue folder listing: {e}"),
                })?;
            let response = check_status("Folder listing failed", response).await?;
            page = response
                .json()
                .await
                .map_err(|e| MemoscribeError::Storage {
                    message: format!("Failed to parse folder listing: {e}"),
                })?;
            entries.extend(file_entries(std::mem::take(&mut page.entries)));
        }

        Ok(entries)
    }

    async fn download(&self, folder: &str, name: &str, dest: &Path) -> Result<u64> {
        let arg = api_arg(&PathRequest {
            path: remote_path(folder, name),
        })?;
        let response = self
            .client
            .post(format!("{CONTENT_BASE}/2/files/download"))
            .bearer_auth(&self.access_token)
            .header(API_ARG_HEADER, arg)
            .send()
            .await
            .map_err(|e| MemoscribeError::Storage {
                message: format!("Failed to start download of '{name}': {e}"),
            })?;
        let response = check_status("Download failed", response).await?;

        let total_size = response.content_length().unwrap_or(0);

        let pb = if self.show_progress {
            let pb = ProgressBar::new(total_size);
            pb.set_style(
                // SAFETY: hardcoded template string, always valid
                #[allow(clippy::expect_used)]
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .expect("hardcoded progress bar template")
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut stream = response.bytes_stream();
        let mut file = fs::File::create(dest)?;
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| MemoscribeError::Storage {
                message: format!("Failed to read download chunk: {e}"),
            })?;

            file.write_all(&chunk)?;
            written += chunk.len() as u64;

            if let Some(ref pb) = pb {
                pb.inc(chunk.len() as u64);
            }
        }

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        Ok(written)
    }

    async fn upload(&self, folder: &str, name: &str, data: Vec<u8>) -> Result<()> {
        let arg = api_arg(&UploadArg {
            path: remote_path(folder, name),
            mode: "overwrite",
        })?;
        let response = self
            .client
            .post(format!("{CONTENT_BASE}/2/files/upload"))
            .bearer_auth(&self.access_token)
            .header(API_ARG_HEADER, arg)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .send()
            .await
            .map_err(|e| MemoscribeError::Storage {
                message: format!("Failed to upload '{name}': {e}"),
            })?;
        check_status("Upload failed", response).await?;
        Ok(())
    }

    async fn delete(&self, folder: &str, name: &str) -> Result<()> {
        let request = PathRequest {
            path: remote_path(folder, name),
        };
        let response = self
            .client
            .post(format!("{API_BASE}/2/files/delete_v2"))
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| MemoscribeError::Storage {
                message: format!("Failed to delete '{name}': {e}"),
            })?;
        check_status("Delete failed", response).await?;
        Ok(())
    }
}

/// Surface non-2xx responses with status and body for debuggable errors.
async fn check_status(context: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(MemoscribeError::Storage {
        message: format!("{context}: {status}: {}", body.trim()),
    })
}

fn folder_path(folder: &str) -> String {
    format!("/{folder}")
}

fn remote_path(folder: &str, name: &str) -> String {
    format!("/{folder}/{name}")
}

/// Serializes a value as HTTP-header-safe JSON.
///
/// The `Dropbox-API-Arg` header must be pure ASCII, so any character
/// outside the printable range is escaped as `\uXXXX`.
fn api_arg<T: Serialize>(value: &T) -> Result<String> {
    let raw = serde_json::to_string(value).map_err(|e| MemoscribeError::Storage {
        message: format!("Failed to encode API argument: {e}"),
    })?;

    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if (' '..='~').contains(&c) {
            escaped.push(c);
        } else {
            let mut buf = [0u16; 2];
            for unit in c.encode_utf16(&mut buf) {
                escaped.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    Ok(escaped)
}

fn file_entries(entries: Vec<ListEntry>) -> Vec<RemoteEntry> {
    entries
        .into_iter()
        .filter(|entry| entry.tag == "file")
        .map(|entry| RemoteEntry {
            name: entry.name,
            size: entry.size,
        })
        .collect()
}
