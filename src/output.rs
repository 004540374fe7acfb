//! Progress rendering for pipeline runs.
//!
//! Status lines go to stderr so piped stdout stays clean.

use owo_colors::OwoColorize;

/// Quiet/verbose-aware stderr reporter handed to the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    quiet: bool,
    verbose: u8,
}

impl Progress {
    pub fn new(quiet: bool, verbose: u8) -> Self {
        Self { quiet, verbose }
    }

    /// A reporter that prints nothing except failures. Used by tests.
    pub fn silent() -> Self {
        Self {
            quiet: true,
            verbose: 0,
        }
    }

    /// One pipeline state transition ("Downloading file: x...").
    pub fn step(&self, message: &str) {
        if !self.quiet {
            eprintln!("{message}");
        }
    }

    /// Extra detail shown with -v (chunk counts, byte counts).
    pub fn detail(&self, message: &str) {
        if !self.quiet && self.verbose >= 1 {
            eprintln!("{}", message.dimmed());
        }
    }

    /// Successful completion of a file or run.
    pub fn done(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message.green());
        }
    }

    /// A per-file failure. Printed even in quiet mode; failures decide
    /// the exit code.
    pub fn failure(&self, message: &str) {
        eprintln!("{}", message.red());
    }
}
