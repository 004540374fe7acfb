//! Error types for memoscribe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoscribeError {
    // Configuration errors
    #[error("Missing environment variables: {}", .vars.join(", "))]
    MissingEnv { vars: Vec<String> },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio errors
    #[error("Failed to decode audio '{name}': {message}")]
    Decode { name: String, message: String },

    // Remote call errors, one variant per external collaborator
    #[error("Storage request failed: {message}")]
    Storage { message: String },

    #[error("Transcription request failed: {message}")]
    Transcription { message: String },

    #[error("Summarization request failed: {message}")]
    Summarization { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, MemoscribeError>;
