//! `drumbeat run` — Start the broadcast loop.

use std::path::PathBuf;
use std::sync::Arc;

use drumbeat_channels::DiscordClient;
use drumbeat_core::{ChannelId, MessageCatalog, Token};
use drumbeat_scheduler::{DelayConfig, DispatchScheduler};
use tracing::error;

pub async fn run(
    config_path: Option<PathBuf>,
    messages_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path.as_ref()).map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    let catalog_path = messages_path.unwrap_or_else(|| config.messages_file.clone());
    let catalog = MessageCatalog::load(&catalog_path).map_err(|e| {
        error!(error = %e, path = %catalog_path.display(), "Failed to load message catalog");
        e
    })?;

    let mut client = DiscordClient::with_timeout(config.client.request_timeout_secs)?;
    if let Some(url) = &config.client.api_url {
        client = client.with_base_url(url);
    }

    let tokens: Vec<Token> = config.token.iter().map(|t| Token::new(t.clone())).collect();
    let channels: Vec<ChannelId> = config
        .channel_id
        .iter()
        .map(|c| ChannelId::new(c.clone()))
        .collect();
    let delays = DelayConfig::from_secs(
        config.message_delay,
        config.token_delay,
        config.restart_delay,
    );

    println!("🥁 Drumbeat — Starting broadcast loop");
    println!("   Tokens:   {}", tokens.len());
    println!("   Channels: {}", channels.len());
    println!("   Messages: {}", catalog.len());
    println!(
        "   Cadence:  {}s message / {}s token / {}s restart",
        config.message_delay, config.token_delay, config.restart_delay
    );

    let scheduler =
        DispatchScheduler::new(Arc::new(client), tokens, channels, catalog, delays).map_err(
            |e| {
                error!(error = %e, "Failed to start scheduler");
                e
            },
        )?;

    // Runs forever; only a signal or a fatal panic ends the process.
    scheduler.run().await;

    Ok(())
}
