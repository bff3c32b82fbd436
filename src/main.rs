//! MyBot Telegram Bot
//!
//! Main application entry point: registers the webhook and serves updates.

use anyhow::Context;
use tracing::{error, info};

use mybot::{
    bot::{get_bot, setup_bot_webhook},
    config::get_settings,
    database::get_pg_storage,
    server::{self, AppState},
    services::get_redis_storage,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = get_settings().context("failed to load settings")?;

    // Initialize logging; the guard flushes the log file and Sentry on exit
    let _log_guard = logging::init_logging(&settings)?;

    info!(version = mybot::VERSION, "Starting {}...", settings.app_name);

    let pg = get_pg_storage()?;
    let redis = get_redis_storage()?;
    let bot = get_bot()?;
    info!(parse_mode = ?bot.parse_mode(), "Bot client ready");

    setup_bot_webhook(&bot, &settings)
        .await
        .context("failed to register webhook")?;

    let state = AppState::new(settings.clone(), bot);
    let served = server::serve(state, shutdown_signal()).await;

    pg.close().await;
    redis.aclose().await;

    if let Err(ref e) = served {
        error!(error = %e, "Webhook server failed");
    }
    served?;

    info!("{} has been shut down.", settings.app_name);
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
