//! Pomodoro Cycle - a terminal Pomodoro timer
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 20 minutes of long break after 4 focus sessions

use anyhow::Result;
use clap::{CommandFactory, Parser};

use pomodoro_cycle::cli::{run_session, Cli, Commands, Display};
use pomodoro_cycle::settings::{ConfigError, Settings};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        if let Some(config_error) = e.downcast_ref::<ConfigError>() {
            Display::show_hint(config_error.suggestion());
            if config_error.is_file_error() {
                if let Some(path) = Settings::default_path() {
                    Display::show_hint(&format!("default location: {}", path.display()));
                }
            }
        }
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins over `--verbose`. Logs go to stderr.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => {
            let settings =
                Settings::load(cli.config.as_deref())?.with_overrides(&args.durations.overrides());
            run_session(&settings, &args).await?;
        }
        Some(Commands::Config { json, durations }) => {
            let settings =
                Settings::load(cli.config.as_deref())?.with_overrides(&durations.overrides());
            settings.cycle_config()?;
            Display::show_config(&settings, json)?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
