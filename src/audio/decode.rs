//! Compressed audio decoding.
//!
//! Uses symphonia to read whatever container/codec the memo was recorded
//! in, then normalizes the result: downmix to mono, resample to 16kHz.

use crate::defaults::SAMPLE_RATE;
use crate::error::{MemoscribeError, Result};
use std::fs::File;
use std::path::Path;
use std::time::Duration;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decoded audio in the pipeline's working format: mono 16-bit samples
/// at [`SAMPLE_RATE`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / f64::from(self.sample_rate))
    }
}

/// Decode an audio file into 16kHz mono samples.
///
/// # Errors
///
/// Returns [`MemoscribeError::Decode`] if the file cannot be opened,
/// probed, or decoded, or if it contains no audio samples.
pub fn decode_file(path: &Path) -> Result<DecodedAudio> {
    let name = display_name(path);

    let file = File::open(path)
        .map_err(|e| decode_error(&name, format!("cannot open file: {e}")))?;
    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| decode_error(&name, format!("unrecognized audio format: {e}")))?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| decode_error(&name, "no audio track found".to_string()))?;
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| decode_error(&name, format!("unsupported codec: {e}")))?;

    let mut channels = 0usize;
    let mut source_rate = 0u32;
    let mut interleaved: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::ResetRequired) => break,
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(decode_error(&name, format!("failed to read packet: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Isolated corrupt packets are skipped, the rest of the file
            // still decodes.
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(decode_error(&name, format!("failed to decode packet: {e}"))),
        };

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            channels = spec.channels.count();
            source_rate = spec.rate;
            sample_buf = Some(SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
        }
        if let Some(buf) = &mut sample_buf {
            buf.copy_interleaved_ref(decoded);
            interleaved.extend_from_slice(buf.samples());
        }
    }

    if interleaved.is_empty() || channels == 0 || source_rate == 0 {
        return Err(decode_error(&name, "no audio samples in file".to_string()));
    }

    let mono = downmix(&interleaved, channels);
    let mono_i16: Vec<i16> = mono.iter().map(|&s| to_i16(s)).collect();
    let samples = if source_rate == SAMPLE_RATE {
        mono_i16
    } else {
        resample(&mono_i16, source_rate, SAMPLE_RATE)
    };

    Ok(DecodedAudio {
        samples,
        sample_rate: SAMPLE_RATE,
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn decode_error(name: &str, message: String) -> MemoscribeError {
    MemoscribeError::Decode {
        name: name.to_string(),
        message,
    }
}

/// Average interleaved channels down to mono.
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

fn to_i16(sample: f32) -> i16 {
    (sample * 32768.0).clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16
}

/// Simple linear interpolation resampling.
fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[source_idx]
            } else {
                let left = f64::from(samples[source_idx]);
                let right = f64::from(samples[source_idx + 1]);
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_decode_16khz_mono_wav_preserves_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.wav");
        let input = vec![100i16, 200, 300, -400, 500];
        write_wav(&path, 16000, 1, &input);

        let decoded = decode_file(&path).unwrap();

        assert_eq!(decoded.samples, input);
        assert_eq!(decoded.sample_rate, 16000);
    }

    #[test]
    fn test_decode_stereo_downmixes_to_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        // Pairs: (100, 200), (300, 400), (500, 600)
        write_wav(&path, 16000, 2, &[100, 200, 300, 400, 500, 600]);

        let decoded = decode_file(&path).unwrap();

        assert_eq!(decoded.samples, vec![150i16, 350, 550]);
    }

    #[test]
    fn test_decode_48khz_resamples_to_16khz() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hi-rate.wav");
        write_wav(&path, 48000, 1, &vec![1000i16; 48000]);

        let decoded = decode_file(&path).unwrap();

        assert_eq!(decoded.sample_rate, 16000);
        assert!(decoded.samples.len() >= 15900 && decoded.samples.len() <= 16100);
        assert!(decoded.samples.iter().all(|&s| (900..=1100).contains(&s)));
    }

    #[test]
    fn test_decode_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();

        let result = decode_file(&dir.path().join("ghost.wav"));

        match result {
            Err(MemoscribeError::Decode { name, .. }) => assert_eq!(name, "ghost.wav"),
            other => panic!("Expected Decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.m4a");
        let garbage: Vec<u8> = (0..500u32).map(|i| ((i * 17 + 42) % 256) as u8).collect();
        std::fs::write(&path, garbage).unwrap();

        let result = decode_file(&path);

        assert!(matches!(result, Err(MemoscribeError::Decode { .. })));
    }

    #[test]
    fn test_decode_empty_wav_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        write_wav(&path, 16000, 1, &[]);

        let result = decode_file(&path);

        match result {
            Err(MemoscribeError::Decode { message, .. }) => {
                assert!(message.contains("no audio samples"), "got: {message}");
            }
            other => panic!("Expected Decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_duration_from_sample_count() {
        let audio = DecodedAudio {
            samples: vec![0; 32000],
            sample_rate: 16000,
        };

        assert_eq!(audio.duration(), Duration::from_secs(2));
    }

    #[test]
    fn test_downmix_mono_is_identity() {
        let samples = vec![0.1f32, -0.2, 0.3];
        assert_eq!(downmix(&samples, 1), samples);
    }

    #[test]
    fn test_to_i16_clamps_out_of_range() {
        assert_eq!(to_i16(1.5), i16::MAX);
        assert_eq!(to_i16(-1.5), i16::MIN);
        assert_eq!(to_i16(0.0), 0);
    }

    #[test]
    fn test_resample_identity_same_rate() {
        let samples = vec![100i16, 200, 300];
        assert_eq!(resample(&samples, 16000, 16000), samples);
    }

    #[test]
    fn test_resample_halves_count_when_downsampling() {
        let samples = vec![0i16; 3200];
        assert_eq!(resample(&samples, 16000, 8000).len(), 1600);
    }

    #[test]
    fn test_resample_preserves_signal_amplitude() {
        let samples = vec![1000i16; 100];
        let resampled = resample(&samples, 44100, 16000);
        assert!(resampled.iter().all(|&s| (999..=1001).contains(&s)));
    }
}
