//! Escalated Slack CLI - plugin lifecycle and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Create default settings (no-op if present)
//! slack-cli activate
//!
//! # Broadcast slack.deactivated to the host
//! slack-cli deactivate
//!
//! # Print settings with secrets masked
//! slack-cli settings show
//!
//! # Print Slack signature headers for a request body
//! slack-cli sign --body event.json
//! ```
//!
//! # Commands
//!
//! - `activate` - Ensure the settings file exists
//! - `deactivate` - Notify the host; settings are kept
//! - `settings show` - Inspect settings
//! - `sign` - Sign a webhook body with the configured signing secret

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use escalated_slack::config::settings_path_from_env;

mod commands;

#[derive(Parser)]
#[command(name = "slack-cli")]
#[command(author, version, about = "Escalated Slack integration CLI tools")]
struct Cli {
    /// Settings file (overrides `ESCALATED_SLACK_SETTINGS_PATH`)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default settings if none exist
    Activate,
    /// Notify the host that the plugin was deactivated
    Deactivate,
    /// Inspect plugin settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Print Slack signature headers for a request body
    Sign {
        /// File holding the exact request body
        #[arg(short, long)]
        body: PathBuf,

        /// Unix timestamp to sign with (default: now)
        #[arg(short, long)]
        timestamp: Option<i64>,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print settings as JSON with secrets masked
    Show,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

#[allow(clippy::print_stdout)]
async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings_path = cli.settings.unwrap_or_else(settings_path_from_env);

    match cli.command {
        Commands::Activate => {
            let activation = commands::lifecycle::activate(&settings_path)?;
            println!("{}", serde_json::to_string_pretty(&activation)?);
        }
        Commands::Deactivate => {
            let callback_url = std::env::var("ESCALATED_HOST_CALLBACK_URL")
                .ok()
                .filter(|url| !url.is_empty());
            let notice = commands::lifecycle::deactivate(callback_url.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&notice)?);
        }
        Commands::Settings { action } => match action {
            SettingsAction::Show => {
                println!("{}", commands::settings::show(&settings_path)?);
            }
        },
        Commands::Sign { body, timestamp } => {
            let headers = commands::sign::sign(&settings_path, &body, timestamp)?;
            println!("X-Slack-Request-Timestamp: {}", headers.timestamp);
            println!("X-Slack-Signature: {}", headers.signature);
        }
    }
    Ok(())
}
