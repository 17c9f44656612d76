//! planmap CLI entry point
//!
//! Running `pm` with no subcommand launches the interactive TUI; `pm
//! generate <prompt>` performs a one-shot plan generation and prints the
//! resulting JSON.

use std::fs;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use planmap::cli::{Cli, Command, get_log_path};
use planmap::config::Config;
use planmap::domain::ProjectPlan;
use planmap::llm;
use planmap::tui;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Level priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from the config file before the full config load
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Generate { prompt, offline }) => cmd_generate(&config, &prompt, offline).await,
        None => tui::run(&config).await,
    }
}

/// One-shot generation: print the plan as JSON to stdout.
async fn cmd_generate(config: &Config, prompt: &str, offline: bool) -> Result<()> {
    let plan = if offline {
        debug!("cmd_generate: offline, using demo plan");
        ProjectPlan::demo()
    } else {
        let client = llm::create_client(&config.llm).context("Failed to create generation client")?;
        match llm::request_plan(&client, prompt).await {
            Ok(plan) => plan,
            Err(err) => {
                // Generation failure is never fatal; the demo plan stands in
                eprintln!("Generation failed ({err}); printing the demo plan instead");
                ProjectPlan::demo()
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
