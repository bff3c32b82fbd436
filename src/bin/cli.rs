//! MyBot command line tools
//!
//! Operational commands that share the server's configuration.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use mybot::{
    bot::{get_bot, setup_bot_webhook},
    config::get_settings,
    database::get_pg_storage,
    services::{get_redis_storage, get_service},
    utils::logging,
};

#[derive(Parser)]
#[command(name = "mybot-cli")]
#[command(about = "MyBot maintenance commands", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the configured webhook with Telegram if it changed
    SetupWebhook,
    /// Show the webhook Telegram currently has registered
    WebhookInfo,
    /// Check PostgreSQL and Redis connectivity
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = get_settings()?;
    let _log_guard = logging::init_logging(&settings)?;

    let code = match cli.command {
        Commands::SetupWebhook => {
            let bot = get_bot()?;
            setup_bot_webhook(&bot, &settings).await?;
            println!("Webhook: {}", settings.webhook_url());
            ExitCode::SUCCESS
        }
        Commands::WebhookInfo => {
            let info = get_bot()?.webhook_info().await?;
            let url = info.url.as_ref().map_or("<none>", |url| url.as_str());
            println!("URL: {}", url);
            println!("Pending updates: {}", info.pending_update_count);
            if let Some(ref message) = info.last_error_message {
                println!("Last error: {}", message);
            }
            ExitCode::SUCCESS
        }
        Commands::Check => {
            let status = get_service()?.health_check().await;
            for issue in status.get_issues() {
                error!(issue = %issue, "Health check issue");
                println!("FAIL: {}", issue);
            }
            if status.is_healthy() {
                info!("All services healthy");
                println!("OK");
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    };

    get_pg_storage()?.close().await;
    get_redis_storage()?.aclose().await;
    Ok(code)
}
