//! Chat Command Bot - Main Entry Point
//!
//! Runs the command dispatcher over the console transport: each stdin line
//! is treated as an incoming chat message and replies are printed to stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use chat_command_bot::client::{ChatClient, ConsoleClient};
use chat_command_bot::commands::register_builtin_commands;
use chat_command_bot::config::{AppConfig, AppContext, ConfigError};
use chat_command_bot::dispatcher::{CommandDispatcher, DispatcherHooks};

/// Prefix-based chat command bot.
#[derive(Parser, Debug)]
#[command(name = "command_bot")]
#[command(about = "Dispatch prefixed chat messages to registered commands")]
#[command(version)]
struct Args {
    /// Path to the JSON configuration file.
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Author name attached to console messages.
    #[arg(long, default_value = "console")]
    author: String,

    /// Generate an example configuration file and exit.
    #[arg(long)]
    generate_config: bool,
}

/// Logs the registered commands once the client is ready.
struct ReadyBanner;

#[async_trait]
impl DispatcherHooks for ReadyBanner {
    async fn on_ready(&self, dispatcher: &CommandDispatcher) {
        let prefix = dispatcher.get_command_prefix();
        for command in dispatcher.commands() {
            info!("  {}{}", prefix, command);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Handle example config generation
    if args.generate_config {
        return generate_example_config();
    }

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    let mut config = match AppConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                "Configuration file {} not found, using environment only",
                args.config
            );
            AppConfig::new()
        }
        Err(e) => return Err(e).context("Failed to load configuration"),
    };
    config.apply_env_overrides();

    let app = Arc::new(AppContext::new("command_bot", config));
    let client = Arc::new(ConsoleClient::stdio(args.author));
    let events = client
        .take_events()
        .context("Client event stream was already taken")?;

    let dispatcher = CommandDispatcher::new(app, client.clone()).with_hooks(ReadyBanner);
    register_builtin_commands(&dispatcher).context("Failed to register commands")?;

    dispatcher
        .init()
        .await
        .context("Failed to initialize dispatcher")?;

    info!("Command prefix: {}", dispatcher.get_command_prefix());
    info!("Bot is running. Type commands, Ctrl+D or Ctrl+C to stop.");

    let dispatcher = Arc::new(dispatcher);
    tokio::select! {
        () = Arc::clone(&dispatcher).run(events) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    client.disconnect();
    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Generates an example configuration file.
fn generate_example_config() -> Result<()> {
    AppConfig::example().save_to_file("config.example.json")?;

    println!("✓ Example configuration written to: config.example.json");
    println!("\nTo use this bot:");
    println!("1. Copy config.example.json to config.json");
    println!("2. Set discord.client_id and discord.token (or DISCORD_CLIENT_ID / DISCORD_TOKEN)");
    println!("3. Run: command_bot");

    Ok(())
}
