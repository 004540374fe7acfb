//! Command-line interface for memoscribe
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

/// Transcribe and summarize voice memos from cloud storage
#[derive(Parser, Debug)]
#[command(
    name = "memoscribe",
    version,
    about = "Transcribe and summarize voice memos from cloud storage"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: per-step detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Process only the first pending file, then exit
    #[arg(long)]
    pub single: bool,

    /// Chunk duration for long recordings (default: 20m). Examples: 90s, 10m, 1h
    #[arg(long, short = 'c', value_name = "DURATION", value_parser = parse_chunk_duration)]
    pub chunk: Option<Duration>,

    /// Transcribe only; skip the meeting-notes summarization pass
    #[arg(long)]
    pub skip_notes: bool,

    /// Local directory for downloads, chunks, and output documents
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,
}

/// Parse a chunk duration string.
///
/// Supports any duration format accepted by `humantime`: single-unit
/// (`90s`, `10m`, `1h`) and compound (`1h30m`). A bare number is read as
/// minutes, matching the config file's `chunk_minutes`.
fn parse_chunk_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    // Bare number → minutes
    if let Ok(minutes) = s.parse::<u64>() {
        return Ok(Duration::from_secs(minutes * 60));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List pending voice memos without processing anything
    List,

    /// Check credentials and configuration
    Check,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}
