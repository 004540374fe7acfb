//! Setup diagnostics for credentials and configuration.
//!
//! Verifies that the required secrets are present and shows the effective
//! configuration. Makes no network calls.

use crate::config::Config;
use crate::defaults;

/// Result of a single environment-variable check.
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Variable is set and non-empty
    Ok,
    /// Variable is not set
    NotFound,
    /// Variable is set but unusable
    Warning(String),
}

/// Check one environment variable without echoing its value.
fn check_env_var(name: &str) -> CheckResult {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => CheckResult::Ok,
        Ok(_) => CheckResult::Warning("set but empty".to_string()),
        Err(std::env::VarError::NotPresent) => CheckResult::NotFound,
        Err(e) => CheckResult::Warning(format!("unreadable: {e}")),
    }
}

/// Run all setup checks and print results.
///
/// Returns true when every required secret is usable.
pub fn check_setup(config: &Config) -> bool {
    println!("Checking environment...\n");

    let mut all_ok = true;
    for var in defaults::REQUIRED_ENV_VARS {
        print!("{var}: ");
        match check_env_var(var) {
            CheckResult::Ok => println!("✓ set"),
            CheckResult::NotFound => {
                println!("✗ NOT SET");
                all_ok = false;
            }
            CheckResult::Warning(msg) => {
                println!("⚠ WARNING: {msg}");
                all_ok = false;
            }
        }
    }

    println!();
    println!("Effective configuration:");
    println!("  audio folder:  /{}", config.storage.audio_folder);
    println!("  text folder:   /{}", config.storage.text_folder);
    println!("  chunk length:  {} min", config.audio.chunk_minutes);
    println!("  stt model:     {}", config.stt.model);
    if config.notes.enabled {
        println!("  notes model:   {}", config.notes.model);
    } else {
        println!("  notes:         disabled");
    }
    println!("  work dir:      {}", config.local.work_dir.display());

    println!();
    if all_ok {
        println!("✓ Ready to process voice memos.");
    } else {
        println!("⚠ Missing secrets. Export the variables above and re-run.");
    }

    all_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_equality() {
        assert_eq!(CheckResult::Ok, CheckResult::Ok);
        assert_eq!(CheckResult::NotFound, CheckResult::NotFound);
        assert_eq!(
            CheckResult::Warning("test".to_string()),
            CheckResult::Warning("test".to_string())
        );
    }

    #[test]
    fn test_check_result_inequality() {
        assert_ne!(CheckResult::Ok, CheckResult::NotFound);
        assert_ne!(
            CheckResult::Warning("a".to_string()),
            CheckResult::Warning("b".to_string())
        );
    }

    // Uses its own variable names so it can't race with the config tests,
    // which mutate the real secret variables under their lock.
    #[test]
    fn test_check_env_var_set_and_missing() {
        unsafe { std::env::set_var("MEMOSCRIBE_DIAG_TEST_SET", "value") };
        assert_eq!(check_env_var("MEMOSCRIBE_DIAG_TEST_SET"), CheckResult::Ok);
        unsafe { std::env::remove_var("MEMOSCRIBE_DIAG_TEST_SET") };

        assert_eq!(
            check_env_var("MEMOSCRIBE_DIAG_TEST_NEVER_SET_12345"),
            CheckResult::NotFound
        );
    }

    #[test]
    fn test_check_env_var_empty_is_warning() {
        unsafe { std::env::set_var("MEMOSCRIBE_DIAG_TEST_EMPTY", "") };
        assert_eq!(
            check_env_var("MEMOSCRIBE_DIAG_TEST_EMPTY"),
            CheckResult::Warning("set but empty".to_string())
        );
        unsafe { std::env::remove_var("MEMOSCRIBE_DIAG_TEST_EMPTY") };
    }

    #[test]
    fn test_check_setup_runs_without_panic() {
        // The verdict depends on the ambient environment; only the render
        // paths are under test here.
        check_setup(&Config::default());

        let mut disabled = Config::default();
        disabled.notes.enabled = false;
        check_setup(&disabled);
    }
}
