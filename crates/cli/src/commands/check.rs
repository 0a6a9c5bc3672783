//! `drumbeat check` — Validate configuration and message catalog.

use std::path::PathBuf;

use drumbeat_channels::DiscordClient;
use drumbeat_core::client::MessagingClient;
use drumbeat_core::{MessageCatalog, Token};

pub async fn run(
    config_path: Option<PathBuf>,
    probe: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Drumbeat Check — Configuration diagnostics");
    println!("=============================================\n");

    let mut issues = 0;

    let config = match super::load_config(config_path.as_ref()) {
        Ok(config) => {
            println!("  ✅ Config valid");
            println!("     Tokens:   {}", config.token.len());
            println!("     Channels: {}", config.channel_id.len());
            println!(
                "     Cadence:  {}s message / {}s token / {}s restart",
                config.message_delay, config.token_delay, config.restart_delay
            );
            Some(config)
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            issues += 1;
            None
        }
    };

    if let Some(config) = &config {
        match MessageCatalog::load(&config.messages_file) {
            Ok(catalog) => {
                println!(
                    "  ✅ Message catalog loaded ({} messages from {})",
                    catalog.len(),
                    config.messages_file.display()
                );
            }
            Err(e) => {
                println!("  ❌ Message catalog unusable: {e}");
                issues += 1;
            }
        }
    }

    if probe {
        if let Some(config) = &config {
            println!("\n  Probing tokens against the platform:");
            let mut client = DiscordClient::with_timeout(config.client.request_timeout_secs)?;
            if let Some(url) = &config.client.api_url {
                client = client.with_base_url(url);
            }

            for raw in &config.token {
                let token = Token::new(raw.clone());
                match client.identify(&token).await {
                    Ok(identity) => {
                        println!("  ✅ {} => {identity}", token.fingerprint());
                    }
                    Err(e) => {
                        println!("  ❌ {}: {e}", token.fingerprint());
                        issues += 1;
                    }
                }
            }
        } else {
            println!("\n  ⚠️  Skipping token probe — config did not load");
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
