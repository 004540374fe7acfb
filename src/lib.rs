//! memoscribe - Transcribe and summarize voice memos from cloud storage
//!
//! Pulls pending memos from a storage folder, transcribes them in
//! fixed-duration chunks through a hosted speech API, summarizes the
//! transcript into meeting notes, and uploads the results back.

// Enforce error handling discipline in non-test code
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod app;
pub mod audio;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod diagnostics;
pub mod error;
pub mod notes;
pub mod output;
pub mod pipeline;
pub mod storage;
pub mod stt;

// Core traits (storage → transcription → summarization)
pub use notes::{MeetingNotes, Summarizer};
pub use storage::{FileStore, RemoteEntry};
pub use stt::Transcriber;

// Pipeline
pub use pipeline::{Pipeline, PipelineConfig, RunReport};

// Error handling
pub use error::{MemoscribeError, Result};

// Config
pub use config::{Config, Credentials};

/// Build version string with optional git commit hash.
///
/// Returns `"0.3.1+abc1234"` when git hash is available, `"0.3.1"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_contains_plus_when_git_hash_present() {
        let ver = version_string();
        // In a git repo build, GIT_HASH is set → expect "0.3.1+<hash>"
        // In CI without git, expect plain "0.3.1"
        if option_env!("GIT_HASH").is_some_and(|h| !h.is_empty()) {
            assert!(
                ver.contains('+'),
                "With GIT_HASH set, version should contain '+', got: {}",
                ver
            );
            let hash_part = ver.split('+').nth(1).unwrap_or("");
            assert_eq!(
                hash_part.len(),
                7,
                "Git hash should be 7 chars, got: {}",
                hash_part
            );
        } else {
            assert_eq!(ver, env!("CARGO_PKG_VERSION"));
        }
    }
}
