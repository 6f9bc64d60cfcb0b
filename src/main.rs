mod app;
mod commands;
mod config;
mod dispatcher;
mod events;
mod locale;
mod session;
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::locale::Locale;

#[derive(Parser)]
#[command(name = "frankenbot")]
#[command(version)]
#[command(about = "A scripted terminal chatbot", long_about = None)]
struct Cli {
    /// Path to a config file (default: ~/.frankenbot/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the user's display name
    #[arg(long, global = true)]
    user_name: Option<String>,

    /// Override the locale (id or en)
    #[arg(long, global = true)]
    locale: Option<Locale>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the quick-reply options and the bot's answers
    Replies {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Send one message without the interactive UI
    Say { text: String },
    /// Show the effective configuration
    Config {
        /// Write the default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(name) = &cli.user_name {
        config.user.name = name.clone();
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    Ok(config)
}

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// The TUI owns stdout, so interactive sessions log to a file
fn init_file_logging(config: &Config) -> Result<()> {
    let log_path = config.log_path()?;
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.command {
        // the file being initialised may not exist yet
        Some(Commands::Config { init: true }) => Config::default(),
        _ => load_config(&cli)?,
    };

    match &cli.command {
        None => {
            init_file_logging(&config)?;
            app::run(config).await?;
        }
        Some(Commands::Replies { json }) => {
            init_stderr_logging();
            commands::list_replies(&config, *json, &mut io::stdout())?;
        }
        Some(Commands::Say { text }) => {
            init_stderr_logging();
            commands::say(&config, text, &mut io::stdout()).await?;
        }
        Some(Commands::Config { init }) => {
            init_stderr_logging();
            let path = match &cli.config {
                Some(path) => path.clone(),
                None => Config::default_path()?,
            };
            commands::show_config(&config, *init, &path, &mut io::stdout())?;
        }
    }

    Ok(())
}
