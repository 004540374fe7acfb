//! Sequential chunk transcription.
//!
//! Chunks are transcribed strictly in order, and each call receives the
//! previous chunk's transcript as its context hint. The transcript list
//! accumulates as the fold state; the hint is always whatever was
//! accumulated last, so the first chunk gets none.

use crate::audio::chunker::AudioChunk;
use crate::error::Result;
use crate::stt::transcriber::Transcriber;

/// Transcript of a single chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkTranscript {
    pub index: usize,
    pub text: String,
}

/// Transcribe `chunks` in order, one API call per chunk.
///
/// Any failed call aborts the sequence; no further chunks are sent.
pub async fn transcribe_sequence<T: Transcriber + ?Sized>(
    transcriber: &T,
    chunks: &[AudioChunk],
) -> Result<Vec<ChunkTranscript>> {
    let mut transcripts: Vec<ChunkTranscript> = Vec::with_capacity(chunks.len());

    for chunk in chunks {
        let audio = std::fs::read(&chunk.path)?;
        let file_name = chunk
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("chunk{:03}.wav", chunk.index));
        let hint = transcripts.last().map(|prev| prev.text.as_str());

        let text = transcriber.transcribe(&audio, &file_name, hint).await?;
        transcripts.push(ChunkTranscript {
            index: chunk.index,
            text,
        });
    }

    Ok(transcripts)
}

/// Join chunk transcripts into one transcript, separated by single spaces.
pub fn stitch(transcripts: &[ChunkTranscript]) -> String {
    transcripts
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stt::transcriber::MockTranscriber;
    use std::path::Path;
    use std::time::Duration;

    fn make_chunks(dir: &Path, stem: &str, count: usize) -> Vec<AudioChunk> {
        (0..count)
            .map(|index| {
                let path = dir.join(format!("{stem}-chunk{index:03}.wav"));
                std::fs::write(&path, [0u8; 4]).unwrap();
                AudioChunk {
                    index,
                    path,
                    duration: Duration::from_secs(60),
                }
            })
            .collect()
    }

    #[tokio::test]
    async fn test_first_chunk_gets_no_hint() {
        let dir = tempfile::tempdir().unwrap();
        let chunks = make_chunks(dir.path(), "memo", 1);
        let transcriber = MockTranscriber::new().with_response("hello");

        transcribe_sequence(&transcriber, &chunks).await.unwrap();

        assert_eq!(transcriber.hints(), [None]);
    }

    #[tokio::test]
    async fn test_each_hint_is_exactly_previous_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let chunks = make_chunks(dir.path(), "memo", 3);
        let transcriber = MockTranscriber::new()
            .with_response("alpha")
            .with_response("beta")
            .with_response("gamma");

        let transcripts = transcribe_sequence(&transcriber, &chunks).await.unwrap();

        assert_eq!(
            transcriber.hints(),
            [None, Some("alpha".to_string()), Some("beta".to_string())]
        );
        let texts: Vec<_> = transcripts.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["alpha", "beta", "gamma"]);
    }

    #[tokio::test]
    async fn test_one_call_per_chunk_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let chunks = make_chunks(dir.path(), "standup", 3);
        let transcriber = MockTranscriber::new();

        transcribe_sequence(&transcriber, &chunks).await.unwrap();

        let names: Vec<_> = transcriber
            .calls()
            .into_iter()
            .map(|c| c.file_name)
            .collect();
        assert_eq!(
            names,
            [
                "standup-chunk000.wav",
                "standup-chunk001.wav",
                "standup-chunk002.wav"
            ]
        );
    }

    #[tokio::test]
    async fn test_transcripts_keep_chunk_indices() {
        let dir = tempfile::tempdir().unwrap();
        let chunks = make_chunks(dir.path(), "memo", 2);
        let transcriber = MockTranscriber::new();

        let transcripts = transcribe_sequence(&transcriber, &chunks).await.unwrap();

        let indices: Vec<_> = transcripts.iter().map(|t| t.index).collect();
        assert_eq!(indices, [0, 1]);
    }

    #[tokio::test]
    async fn test_failure_stops_remaining_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let chunks = make_chunks(dir.path(), "memo", 3);
        let transcriber = MockTranscriber::new()
            .with_response("first")
            .with_failure()
            .with_response("never sent");

        let result = transcribe_sequence(&transcriber, &chunks).await;

        assert!(result.is_err());
        assert_eq!(transcriber.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_chunk_file_fails_without_any_call() {
        let dir = tempfile::tempdir().unwrap();
        let chunks = vec![AudioChunk {
            index: 0,
            path: dir.path().join("ghost-chunk000.wav"),
            duration: Duration::from_secs(60),
        }];
        let transcriber = MockTranscriber::new();

        let result = transcribe_sequence(&transcriber, &chunks).await;

        assert!(result.is_err());
        assert!(transcriber.calls().is_empty());
    }

    #[tokio::test]
    async fn test_no_chunks_makes_no_calls() {
        let transcriber = MockTranscriber::new();

        let transcripts = transcribe_sequence(&transcriber, &[]).await.unwrap();

        assert!(transcripts.is_empty());
        assert!(transcriber.calls().is_empty());
    }

    #[test]
    fn test_stitch_joins_with_single_spaces() {
        let transcripts = vec![
            ChunkTranscript {
                index: 0,
                text: "First part.".to_string(),
            },
            ChunkTranscript {
                index: 1,
                text: "Second part.".to_string(),
            },
            ChunkTranscript {
                index: 2,
                text: "Third.".to_string(),
            },
        ];

        assert_eq!(stitch(&transcripts), "First part. Second part. Third.");
    }

    #[test]
    fn test_stitch_single_transcript_is_identity() {
        let transcripts = vec![ChunkTranscript {
            index: 0,
            text: "Only part.".to_string(),
        }];

        assert_eq!(stitch(&transcripts), "Only part.");
    }

    #[test]
    fn test_stitch_empty_is_empty_string() {
        assert_eq!(stitch(&[]), "");
    }
}
