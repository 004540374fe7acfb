//! Speech-to-text.
//!
//! [`Transcriber`] is the API seam, [`whisper_api`] the hosted
//! implementation, [`sequence`] the chunk-by-chunk driver that threads
//! context hints between calls.

pub mod sequence;
pub mod transcriber;
pub mod whisper_api;

pub use sequence::{ChunkTranscript, stitch, transcribe_sequence};
pub use transcriber::{MockTranscriber, Transcriber};
pub use whisper_api::WhisperApiTranscriber;
