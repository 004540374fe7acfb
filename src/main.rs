use anyhow::Result;
use clap::{CommandFactory, Parser};
use memoscribe::app::{run_list_command, run_process_command, RunOptions};
use memoscribe::cli::{Cli, Commands};
use memoscribe::config::Config;
use memoscribe::diagnostics::check_setup;
use owo_colors::OwoColorize;

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up secrets from a local .env before anything reads the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        None => {
            let config = load_config(cli.config.as_deref())?;
            let options = RunOptions {
                single: cli.single,
                chunk_duration: cli.chunk,
                skip_notes: cli.skip_notes,
                work_dir: cli.work_dir,
                quiet: cli.quiet,
                verbose: cli.verbose,
            };
            match run_process_command(config, options).await {
                Ok(report) => {
                    if !report.is_clean() {
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    eprintln!("{}", format!("Error: {}", e).red());
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::List) => {
            let config = load_config(cli.config.as_deref())?;
            if let Err(e) = run_list_command(config).await {
                eprintln!("{}", format!("Error: {}", e).red());
                std::process::exit(1);
            }
        }
        Some(Commands::Check) => {
            let config = load_config(cli.config.as_deref())?;
            if !check_setup(&config) {
                std::process::exit(1);
            }
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "memoscribe",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/memoscribe/config.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&std::path::Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        // Load from custom path
        Config::load(path)?
    } else {
        // Try default path, fall back to defaults
        let default_path = Config::default_path();
        Config::load_or_default(&default_path)
    };

    // Apply environment variable overrides
    Ok(config.with_env_overrides())
}
