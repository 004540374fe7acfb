//! Voice memo pipeline implementation.
//!
//! Orchestrates the complete memo-to-notes flow:
//! download → chunk → transcribe → summarize → upload → delete
//!
//! Files are handled one at a time, in listing order. Each file walks a
//! straight line through the steps; the first failure abandons that file
//! and leaves its source in the audio folder untouched.

use crate::audio::{decode_file, split_into_chunks};
use crate::config::Config;
use crate::defaults::{NOTES_SUFFIX, TRANSCRIPT_SUFFIX};
use crate::error::{MemoscribeError, Result};
use crate::notes::{render_notes, Summarizer};
use crate::output::Progress;
use crate::storage::FileStore;
use crate::stt::{stitch, transcribe_sequence, Transcriber};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Remote folder holding pending audio files
    pub audio_folder: String,
    /// Remote folder receiving output documents
    pub text_folder: String,
    /// Maximum duration of one transcription chunk
    pub chunk_duration: Duration,
    /// Local directory for downloads, chunks, and output documents
    pub work_dir: PathBuf,
    /// Whether to produce a meeting-notes document after transcribing
    pub notes_enabled: bool,
}

impl PipelineConfig {
    /// Build the pipeline configuration from the application config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            audio_folder: config.storage.audio_folder.clone(),
            text_folder: config.storage.text_folder.clone(),
            chunk_duration: config.audio.chunk_duration(),
            work_dir: config.local.work_dir.clone(),
            notes_enabled: config.notes.enabled,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Files fully processed and deleted from the audio folder
    pub processed: Vec<String>,
    /// Files that failed, with the error that stopped them
    pub failed: Vec<(String, MemoscribeError)>,
}

impl RunReport {
    /// True when every pending file processed without error.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The end-to-end pipeline with its injected collaborators.
///
/// All external services arrive through the constructor so tests can
/// substitute in-memory fakes for storage and both hosted APIs.
pub struct Pipeline {
    store: Arc<dyn FileStore>,
    transcriber: Arc<dyn Transcriber>,
    summarizer: Arc<dyn Summarizer>,
    config: PipelineConfig,
    progress: Progress,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn FileStore>,
        transcriber: Arc<dyn Transcriber>,
        summarizer: Arc<dyn Summarizer>,
        config: PipelineConfig,
        progress: Progress,
    ) -> Self {
        Self {
            store,
            transcriber,
            summarizer,
            config,
            progress,
        }
    }

    /// Process every pending file, continuing past per-file failures.
    ///
    /// An empty audio folder is a clean no-op: no download, upload, or
    /// delete call is made. Failures are reported per file and collected
    /// in the returned [`RunReport`]; only a failure to list the folder
    /// itself is returned as an error.
    pub async fn run(&self) -> Result<RunReport> {
        let pending = self.list_pending().await?;

        let mut report = RunReport::default();
        for name in pending {
            self.progress.step(&format!("found: {name}"));
            match self.process_file(&name).await {
                Ok(()) => report.processed.push(name),
                Err(e) => {
                    self.progress.failure(&format!("Failed to process '{name}': {e}"));
                    report.failed.push((name, e));
                }
            }
        }

        Ok(report)
    }

    /// Process only the first pending file, propagating its failure.
    pub async fn run_single(&self) -> Result<RunReport> {
        let pending = self.list_pending().await?;

        let mut report = RunReport::default();
        let Some(name) = pending.into_iter().next() else {
            return Ok(report);
        };

        self.progress.step(&format!("found: {name}"));
        self.process_file(&name).await?;
        report.processed.push(name);
        Ok(report)
    }

    async fn list_pending(&self) -> Result<Vec<String>> {
        self.progress.step("Getting files...");
        let entries = self.store.list_folder(&self.config.audio_folder).await?;

        if entries.is_empty() {
            self.progress.step("no files found");
            return Ok(Vec::new());
        }

        Ok(entries.into_iter().map(|entry| entry.name).collect())
    }

    /// Walk one file through the whole pipeline.
    ///
    /// The source is deleted from the audio folder only after every
    /// output has been uploaded. Intermediate files (the download, the
    /// chunk WAVs, the local output copies) are left in the work
    /// directory for inspection.
    async fn process_file(&self, name: &str) -> Result<()> {
        std::fs::create_dir_all(&self.config.work_dir)?;

        let stem = file_stem(name);
        let local_audio = self.config.work_dir.join(name);

        self.progress.step(&format!("Downloading file: {name}..."));
        let bytes = self
            .store
            .download(&self.config.audio_folder, name, &local_audio)
            .await?;
        self.progress.detail(&format!("downloaded {bytes} bytes"));
        self.progress.step("Done.");

        let audio = decode_file(&local_audio)?;
        self.progress.detail(&format!(
            "decoded {:.1}s of audio at {} Hz",
            audio.duration().as_secs_f64(),
            audio.sample_rate
        ));

        let chunks =
            split_into_chunks(&audio, stem, self.config.chunk_duration, &self.config.work_dir)?;
        self.progress.detail(&format!("split into {} chunk(s)", chunks.len()));

        self.progress.step("Starting transcribe...");
        let transcripts = transcribe_sequence(self.transcriber.as_ref(), &chunks).await?;
        let transcript = stitch(&transcripts);

        let transcript_name = format!("{stem}{TRANSCRIPT_SUFFIX}");
        self.progress.step(&format!("writing to {transcript_name}..."));
        std::fs::write(self.config.work_dir.join(&transcript_name), &transcript)?;

        let notes_document = if self.config.notes_enabled {
            let notes = self.summarizer.summarize(&transcript).await?;
            let document = render_notes(&notes);
            let notes_name = format!("{stem}{NOTES_SUFFIX}");
            self.progress.step(&format!("writing to {notes_name}..."));
            std::fs::write(self.config.work_dir.join(&notes_name), &document)?;
            Some((notes_name, document))
        } else {
            None
        };

        // Outputs for one memo land in their own subfolder.
        let output_folder = format!("{}/{}", self.config.text_folder, stem);

        self.progress.step(&format!("Uploading file: {transcript_name}..."));
        self.store
            .upload(&output_folder, &transcript_name, transcript.into_bytes())
            .await?;

        if let Some((notes_name, document)) = notes_document {
            self.progress.step(&format!("Uploading file: {notes_name}..."));
            self.store
                .upload(&output_folder, &notes_name, document.into_bytes())
                .await?;
        }

        self.progress.step(&format!("Deleting file: {name}..."));
        self.store.delete(&self.config.audio_folder, name).await?;
        self.progress.done("Done.");

        Ok(())
    }
}

/// Base name used for chunk files, output documents, and the remote
/// output subfolder: everything before the first dot.
fn file_stem(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}
