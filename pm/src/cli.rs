//! Command-line interface for planmap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// planmap: terminal planning surface for project ideas
///
/// Running without a subcommand launches the interactive TUI.
#[derive(Debug, Parser)]
#[command(name = "pm", version, about)]
pub struct Cli {
    /// Path to a config file (defaults to .planmap.yml, then the user
    /// config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: TRACE, DEBUG, INFO, WARN, ERROR
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a project plan for a prompt and print it as JSON
    Generate {
        /// Free-text project description
        prompt: String,

        /// Skip the generation call and print the fixed demo plan
        #[arg(long)]
        offline: bool,
    },
}

/// Where the log file lives.
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("planmap")
        .join("logs")
        .join("planmap.log")
}
