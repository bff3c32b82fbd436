//! Webhook registration with the Telegram Bot API

use tracing::{debug, info};
use url::Url;

use crate::bot::client::BotClient;
use crate::config::Settings;
use crate::utils::errors::Result;

/// Everything `setWebhook` is called with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookParams {
    pub url: Url,
    pub certificate: Option<Vec<u8>>,
    pub secret_token: Option<String>,
}

impl WebhookParams {
    /// Build params from settings, reading the public certificate if one is configured
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let url = Url::parse(&settings.webhook_url())?;
        let certificate = match settings.webhook_sert_pub {
            Some(ref path) => {
                debug!(path = %path.display(), "Reading webhook certificate");
                Some(tokio::fs::read(path).await?)
            }
            None => None,
        };

        Ok(Self {
            url,
            certificate,
            secret_token: settings.webhook_secret.clone(),
        })
    }
}

/// Register the configured webhook unless Telegram already has it
///
/// The current registration is compared by parsed URL only, the form
/// Telegram reports it in; on mismatch the old webhook is deleted before the
/// new one is set.
pub async fn setup_bot_webhook(bot: &BotClient, settings: &Settings) -> Result<()> {
    let expected = Url::parse(&settings.webhook_url())?;
    let info = bot.webhook_info().await?;

    if info.url.as_ref() == Some(&expected) {
        info!(url = %expected, "Webhook already registered");
        return Ok(());
    }

    let current = info.url.as_ref().map(Url::as_str);
    info!(current = ?current, expected = %expected, "Webhook URL changed, re-registering");
    let params = WebhookParams::from_settings(settings).await?;
    bot.remove_webhook().await?;
    bot.set_webhook(params).await
}
