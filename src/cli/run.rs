//! Run the bot service
//!
//! Loads configuration, initializes logging, builds the Bot API client and
//! enters the event loop. Configuration failures are fatal here; the
//! process never reaches the loop with a bad credential or group id.

use super::config::{default_config_path, GroupsyncConfig};
use groupsync::sync::{BotConfig, GroupSyncBot};
use groupsync::telegram::{BotApiClient, ChatId};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Configuration loading order:
/// 1. `--config` flag if provided
/// 2. Default config at the platform config dir (e.g.
///    `~/.config/groupsync/config.toml`); generated if missing
///
/// Environment variables (BOT_TOKEN, MAIN_GROUP_ID, SECONDARY_GROUP_ID,
/// LOG_LEVEL, DECLINE_MESSAGE) override file values, so a fresh generated
/// file plus a fully-specified environment is a valid deployment.
pub async fn execute(
    config_path: Option<String>,
    token_file: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    let mut config = if config_path.exists() {
        GroupsyncConfig::load(&config_path)?
    } else {
        eprintln!(
            "No config file found. Creating default configuration at {}",
            config_path.display()
        );
        GroupsyncConfig::create_default(&config_path)?;
        GroupsyncConfig::load(&config_path)?
    };

    config.apply_env_overrides()?;
    config.validate()?;

    let token = config.resolve_token(token_file.map(PathBuf::from).as_deref())?;

    init_logging(&config.logging.level);

    let client = BotApiClient::with_api_url(&token, &config.telegram.api_url)?;
    let bot = GroupSyncBot::new(
        client,
        BotConfig {
            primary_group: ChatId(config.telegram.primary_group_id),
            secondary_group: ChatId(config.telegram.secondary_group_id),
            decline_message: config.gatekeeper.decline_message,
        },
    );

    bot.run().await?;
    Ok(())
}

/// Initialize the global tracing subscriber.
///
/// RUST_LOG takes precedence when set; otherwise the configured level is
/// used with the HTTP stack pinned to warn so idle long-poll traffic does
/// not flood the log.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},hyper=warn,hyper_util=warn,reqwest=warn", level))
    });

    // try_init: tests may install a subscriber of their own first
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_run_rejects_unconfigured_groups() {
        // An ambient BOT_TOKEN would let startup proceed into the live loop
        std::env::remove_var("BOT_TOKEN");
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        // Generated template has no group ids; startup must fail before the
        // event loop
        let result = execute(
            Some(config_path.to_string_lossy().to_string()),
            None,
        )
        .await;

        assert!(result.is_err());
        // The default file was still created for the operator to fill in
        assert!(config_path.exists());
    }

    #[tokio::test]
    async fn test_run_rejects_missing_token() {
        std::env::remove_var("BOT_TOKEN");
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let config_content = r#"
[telegram]
primary_group_id = -1001
secondary_group_id = -1002
"#;
        std::fs::write(&config_path, config_content).unwrap();

        let result = execute(
            Some(config_path.to_string_lossy().to_string()),
            None,
        )
        .await;

        // Groups are configured, so the failure is the missing credential
        assert!(result.is_err());
    }
}
