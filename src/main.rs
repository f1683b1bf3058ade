//! fca-themes CLI - generate and inspect Messenger thread themes

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use fca_themes::{
    api::{ApiError, HttpDispatcher, ThreadInfoSource, TracingLogger},
    config::Config,
    context::RequestContext,
    themes::{ThemeCreator, ThemeInfoReader},
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "fca-themes")]
#[command(about = "Generate and inspect Messenger thread themes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ~/.config/fca-themes/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate AI theme candidates from a prompt
    Create {
        /// Prompt describing the theme
        #[arg(short, long)]
        prompt: String,

        /// App state cookie file (overrides config)
        #[arg(short, long)]
        app_state: Option<PathBuf>,
    },

    /// Derive theme info from a saved thread info JSON dump
    Inspect {
        /// Thread id to report
        #[arg(short, long)]
        thread: String,

        /// File containing the raw thread info (object or array)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Check that a session is configured
    Validate,
}

/// Thread info read from a JSON file instead of the live API
struct FileThreadSource {
    path: PathBuf,
}

#[async_trait]
impl ThreadInfoSource for FileThreadSource {
    async fn get_thread_info(&self, _thread_id: &str) -> Result<Option<Value>, ApiError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ApiError::DataRetrieval(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.unwrap_or_else(Config::default_path);

    match cli.command {
        Commands::Create { prompt, app_state } => {
            run_create(config_path, &prompt, app_state).await?;
        }
        Commands::Inspect { thread, file } => {
            run_inspect(&thread, file).await?;
        }
        Commands::Config(cmd) => {
            run_config_command(config_path, cmd)?;
        }
    }

    Ok(())
}

async fn run_create(config_path: PathBuf, prompt: &str, app_state: Option<PathBuf>) -> Result<()> {
    let mut config = Config::load_from(config_path)?;
    if let Some(path) = app_state {
        config.app_state_path = Some(path);
    }
    config.validate()?;

    let ctx = Arc::new(RequestContext::from_config(&config)?);
    info!("Generating AI theme as user {}", ctx.actor_id());

    let dispatcher = HttpDispatcher::new(config.dispatch.clone())?;
    let creator = ThemeCreator::new(
        ctx,
        config.graphql.clone(),
        Arc::new(dispatcher),
        Arc::new(TracingLogger),
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("  {spinner:.cyan} {msg}")?);
    spinner.set_message("Generating theme...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    let result = creator.generate(prompt).await;
    spinner.finish_and_clear();

    let themes = result?;
    println!("Generated {} theme(s)", themes.len());
    for theme in &themes {
        println!(
            "  {} ({})",
            theme.accessibility_label().unwrap_or("unnamed"),
            theme.id().unwrap_or("no id")
        );
    }
    println!("{}", serde_json::to_string_pretty(&themes)?);

    Ok(())
}

async fn run_inspect(thread_id: &str, file: PathBuf) -> Result<()> {
    let reader = ThemeInfoReader::new(
        Arc::new(FileThreadSource { path: file }),
        Arc::new(TracingLogger),
    );

    let info = reader.read(thread_id).await?;
    println!("Thread:   {}", if info.thread_name.is_empty() { "Unnamed" } else { info.thread_name.as_str() });
    println!("Color:    {}", info.color.as_deref().unwrap_or("Default"));
    println!("Emoji:    {}", info.emoji);
    println!("Theme ID: {}", info.theme_id.as_deref().unwrap_or("Default"));
    println!("{}", serde_json::to_string_pretty(&info)?);

    Ok(())
}

fn run_config_command(path: PathBuf, cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            Config::default().save_to(path.clone())?;

            println!("Configuration file created at: {}", path.display());
            println!();
            println!("Next steps:");
            println!("  1. Point app_state_path at an exported cookie file, and");
            println!("  2. Fill in [session] fb_dtsg / lsd, or set environment variables:");
            println!("     export FCA_APP_STATE=appstate.json");
            println!("     export FCA_FB_DTSG=your_token");
        }
        ConfigCommands::Show => {
            let config = Config::load_from(path)?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
        ConfigCommands::Validate => {
            let config = Config::load_from(path.clone())?;
            config
                .validate()
                .with_context(|| format!("invalid configuration in {}", path.display()))?;
            println!("Configuration is valid");
        }
    }
    Ok(())
}
