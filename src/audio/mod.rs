//! Audio decoding and chunking.
//!
//! Memos arrive in whatever format the recorder produced (m4a, mp3,
//! wav, ...). [`decode`] normalizes them to 16kHz mono samples,
//! [`chunker`] splits those into fixed-duration WAV files sized for the
//! transcription API.

pub mod chunker;
pub mod decode;

pub use chunker::{AudioChunk, split_into_chunks};
pub use decode::{DecodedAudio, decode_file};
