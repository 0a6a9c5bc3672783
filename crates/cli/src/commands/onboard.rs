//! `drumbeat onboard` — First-time setup.

use drumbeat_config::AppConfig;
use std::path::Path;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🥁 Drumbeat — First-Time Setup");
    println!("==============================\n");

    let config_path = Path::new("config.toml");
    if config_path.exists() {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.");
    } else {
        std::fs::write(config_path, AppConfig::starter_toml())?;
        println!("✅ Created config.toml");
    }

    let messages_path = Path::new("chat.txt");
    if messages_path.exists() {
        println!("  Message catalog exists: {}", messages_path.display());
    } else {
        std::fs::write(
            messages_path,
            concat!(
                "Hello from Drumbeat!\n",
                "This is a scheduled broadcast.\n",
                "Stay tuned for updates.\n",
            ),
        )?;
        println!("✅ Created chat.txt with sample messages");
    }

    println!("\n📝 Next steps:");
    println!("   1. Edit config.toml and add your tokens and channel ids");
    println!("   2. Edit chat.txt — one candidate message per line");
    println!("   3. Run: drumbeat check --probe");
    println!("   4. Run: drumbeat run\n");

    Ok(())
}
