//! Default configuration constants for memoscribe.
//!
//! This module provides shared constants used across different configuration
//! types to ensure consistency and eliminate duplication.

/// Remote folder holding pending voice-memo audio files.
pub const AUDIO_FOLDER: &str = "voice-memos";

/// Remote folder receiving transcripts and notes documents.
pub const TEXT_FOLDER: &str = "text-transcripts";

/// Default chunk duration in minutes.
///
/// Long recordings are split into segments of this length before
/// transcription so each upload stays under the speech API's input-size
/// limit.
pub const CHUNK_MINUTES: u64 = 20;

/// Sample rate chunks are normalized to before upload, in Hz.
///
/// 16kHz is the standard for speech recognition and keeps chunk files small
/// without hurting transcription quality.
pub const SAMPLE_RATE: u32 = 16000;

/// Default hosted speech-to-text model.
pub const STT_MODEL: &str = "whisper-1";

/// Default hosted text-generation model for meeting notes.
pub const NOTES_MODEL: &str = "gpt-4o-mini";

/// Default API base for the hosted speech and text endpoints.
pub const API_BASE: &str = "https://api.openai.com/v1";

/// Environment variables that must be present at startup.
///
/// Order here is the order missing variables are reported in.
pub const REQUIRED_ENV_VARS: [&str; 4] = [
    "DROPBOX_APP_KEY",
    "DROPBOX_APP_SECRET",
    "DROPBOX_REFRESH_TOKEN",
    "OPENAI_API_KEY",
];

/// Suffix appended to a source stem for the full transcript file.
pub const TRANSCRIPT_SUFFIX: &str = ".txt";

/// Suffix appended to a source stem for the notes document.
pub const NOTES_SUFFIX: &str = "-notes.md";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_vars_cover_both_services() {
        assert!(REQUIRED_ENV_VARS.iter().any(|v| v.starts_with("DROPBOX_")));
        assert!(REQUIRED_ENV_VARS.contains(&"OPENAI_API_KEY"));
    }

    #[test]
    fn test_folders_have_no_leading_slash() {
        // Remote paths are built as "/{folder}/{name}"; a leading slash here
        // would produce a double slash the storage API rejects.
        assert!(!AUDIO_FOLDER.starts_with('/'));
        assert!(!TEXT_FOLDER.starts_with('/'));
    }
}
