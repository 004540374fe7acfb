//! Voice memo application entry point.
//!
//! Builds the concrete service clients from configuration and
//! credentials, applies CLI overrides, and runs the pipeline.

use crate::config::{Config, Credentials};
use crate::error::Result;
use crate::notes::{ChatApiSummarizer, Summarizer};
use crate::output::Progress;
use crate::pipeline::{Pipeline, PipelineConfig, RunReport};
use crate::storage::{DropboxStore, FileStore};
use crate::stt::{Transcriber, WhisperApiTranscriber};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// CLI overrides applied on top of the loaded configuration.
#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    /// Process only the first pending file
    pub single: bool,
    /// Chunk duration override
    pub chunk_duration: Option<Duration>,
    /// Skip the summarization pass
    pub skip_notes: bool,
    /// Working directory override
    pub work_dir: Option<PathBuf>,
    /// Suppress status messages
    pub quiet: bool,
    /// Verbosity level (0=steps, 1=steps + detail)
    pub verbose: u8,
}

/// Run the processing command: walk every pending memo through
/// download → transcribe → summarize → upload → delete (or just the
/// first memo with `--single`).
pub async fn run_process_command(config: Config, options: RunOptions) -> Result<RunReport> {
    config.validate()?;
    let credentials = Credentials::from_env()?;

    let progress = Progress::new(options.quiet, options.verbose);

    let store: Arc<dyn FileStore> = Arc::new(
        DropboxStore::connect(
            &credentials.dropbox_app_key,
            &credentials.dropbox_app_secret,
            &credentials.dropbox_refresh_token,
            !options.quiet,
        )
        .await?,
    );
    let transcriber: Arc<dyn Transcriber> = Arc::new(WhisperApiTranscriber::new(
        &config.stt.api_base,
        &credentials.openai_api_key,
        &config.stt.model,
    ));
    let summarizer: Arc<dyn Summarizer> = Arc::new(ChatApiSummarizer::new(
        &config.notes.api_base,
        &credentials.openai_api_key,
        &config.notes.model,
    ));

    let pipeline_config = apply_overrides(PipelineConfig::from_config(&config), &options);
    let pipeline = Pipeline::new(store, transcriber, summarizer, pipeline_config, progress);

    if options.single {
        pipeline.run_single().await
    } else {
        pipeline.run().await
    }
}

/// Run the list command: show pending memos without processing anything.
pub async fn run_list_command(config: Config) -> Result<()> {
    config.validate()?;
    let credentials = Credentials::from_env()?;

    let store = DropboxStore::connect(
        &credentials.dropbox_app_key,
        &credentials.dropbox_app_secret,
        &credentials.dropbox_refresh_token,
        false,
    )
    .await?;

    let entries = store.list_folder(&config.storage.audio_folder).await?;
    if entries.is_empty() {
        println!("no files found");
        return Ok(());
    }

    println!("Pending voice memos in /{}:", config.storage.audio_folder);
    for entry in &entries {
        println!("  {}  ({} bytes)", entry.name, entry.size);
    }

    Ok(())
}

fn apply_overrides(mut pipeline_config: PipelineConfig, options: &RunOptions) -> PipelineConfig {
    if let Some(duration) = options.chunk_duration {
        pipeline_config.chunk_duration = duration;
    }
    if options.skip_notes {
        pipeline_config.notes_enabled = false;
    }
    if let Some(dir) = &options.work_dir {
        pipeline_config.work_dir = dir.clone();
    }
    pipeline_config
}
