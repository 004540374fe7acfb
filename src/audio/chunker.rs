//! Fixed-duration chunk splitting.
//!
//! The transcription API caps request size, so long memos are split into
//! windows of at most the configured duration. A file of duration `D`
//! with chunk duration `C` always yields `ceil(D / C)` chunks that cover
//! the audio exactly, with only the final chunk allowed to run short.

use crate::audio::decode::DecodedAudio;
use crate::error::{MemoscribeError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One chunk of a memo, written out as a standalone mono WAV file.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    /// Zero-based position within the source file.
    pub index: usize,
    pub path: PathBuf,
    pub duration: Duration,
}

/// Split decoded audio into chunk files under `work_dir`.
///
/// Files are named `<stem>-chunk<NNN>.wav` and are left in place after
/// the run for inspection.
///
/// # Errors
///
/// Returns [`MemoscribeError::ConfigInvalidValue`] for a zero-length
/// chunk duration, or an error if a chunk file cannot be written.
pub fn split_into_chunks(
    audio: &DecodedAudio,
    stem: &str,
    chunk_duration: Duration,
    work_dir: &Path,
) -> Result<Vec<AudioChunk>> {
    let chunk_samples =
        (chunk_duration.as_secs_f64() * f64::from(audio.sample_rate)).round() as usize;
    if chunk_samples == 0 {
        return Err(MemoscribeError::ConfigInvalidValue {
            key: "chunk duration".to_string(),
            message: "must be longer than zero".to_string(),
        });
    }

    let mut chunks = Vec::with_capacity(audio.samples.len().div_ceil(chunk_samples));
    for (index, window) in audio.samples.chunks(chunk_samples).enumerate() {
        let path = work_dir.join(chunk_file_name(stem, index));
        write_chunk(&path, window, audio.sample_rate)?;
        chunks.push(AudioChunk {
            index,
            path,
            duration: Duration::from_secs_f64(
                window.len() as f64 / f64::from(audio.sample_rate),
            ),
        });
    }

    Ok(chunks)
}

fn chunk_file_name(stem: &str, index: usize) -> String {
    format!("{stem}-chunk{index:03}.wav")
}

fn write_chunk(path: &Path, samples: &[i16], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer =
        hound::WavWriter::create(path, spec).map_err(|e| chunk_write_error(path, &e))?;
    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| chunk_write_error(path, &e))?;
    }
    writer.finalize().map_err(|e| chunk_write_error(path, &e))?;

    Ok(())
}

fn chunk_write_error(path: &Path, e: &hound::Error) -> MemoscribeError {
    MemoscribeError::Other(format!("Failed to write chunk '{}': {e}", path.display()))
}
