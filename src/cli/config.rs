//! Groupsync configuration file handling
//!
//! Provides default configuration generation and loading for the bot.
//! Configuration files are TOML format; every setting can also be supplied
//! through the environment (the environment wins), so container deployments
//! can run without a file at all.
//!
//! Environment variables: BOT_TOKEN, MAIN_GROUP_ID, SECONDARY_GROUP_ID,
//! LOG_LEVEL, DECLINE_MESSAGE.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default decline notification text
const DEFAULT_DECLINE_MESSAGE: &str =
    "Your join request was declined: this group is only open to members of the main group.";

/// Groupsync bot configuration
///
/// Loaded once at startup and immutable thereafter. Group identifiers and
/// the credential gate everything the bot does; there is no runtime
/// reconfiguration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupsyncConfig {
    /// Telegram credential and group identifiers
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Join gatekeeper settings
    #[serde(default)]
    pub gatekeeper: GatekeeperConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Telegram-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot credential token. Prefer the BOT_TOKEN environment variable over
    /// writing the token to disk.
    pub bot_token: Option<String>,

    /// Bot API endpoint (override for a local Bot API server)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// The group whose membership gates secondary-group entry
    #[serde(default)]
    pub primary_group_id: i64,

    /// The group being gated and kept in sync
    #[serde(default)]
    pub secondary_group_id: i64,
}

/// Join gatekeeper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatekeeperConfig {
    /// Message sent to users whose join request is declined
    #[serde(default = "default_decline_message")]
    pub decline_message: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_api_url() -> String {
    groupsync::telegram::client::DEFAULT_API_URL.to_string()
}

fn default_decline_message() -> String {
    DEFAULT_DECLINE_MESSAGE.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_url: default_api_url(),
            primary_group_id: 0,
            secondary_group_id: 0,
        }
    }
}

impl Default for GatekeeperConfig {
    fn default() -> Self {
        Self {
            decline_message: default_decline_message(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Default for GroupsyncConfig {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig::default(),
            gatekeeper: GatekeeperConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GroupsyncConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: GroupsyncConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Apply environment overrides on top of file values.
    ///
    /// A malformed group identifier is a startup error; the process must not
    /// reach the event loop with a half-read configuration.
    pub fn apply_env_overrides(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Ok(token) = std::env::var("BOT_TOKEN") {
            self.telegram.bot_token = Some(token);
        }
        if let Ok(raw) = std::env::var("MAIN_GROUP_ID") {
            self.telegram.primary_group_id = raw
                .parse()
                .map_err(|e| format!("Invalid MAIN_GROUP_ID '{}': {}", raw, e))?;
        }
        if let Ok(raw) = std::env::var("SECONDARY_GROUP_ID") {
            self.telegram.secondary_group_id = raw
                .parse()
                .map_err(|e| format!("Invalid SECONDARY_GROUP_ID '{}': {}", raw, e))?;
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(message) = std::env::var("DECLINE_MESSAGE") {
            self.gatekeeper.decline_message = message;
        }
        Ok(())
    }

    /// Check that the configuration can actually run the bot
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.telegram.primary_group_id == 0 {
            return Err("Primary group id is not configured \
                        (set [telegram] primary_group_id or MAIN_GROUP_ID)"
                .into());
        }
        if self.telegram.secondary_group_id == 0 {
            return Err("Secondary group id is not configured \
                        (set [telegram] secondary_group_id or SECONDARY_GROUP_ID)"
                .into());
        }
        if self.telegram.primary_group_id == self.telegram.secondary_group_id {
            return Err("Primary and secondary group ids must differ".into());
        }
        Ok(())
    }

    /// Resolve the bot token.
    ///
    /// Precedence: --token-file flag > BOT_TOKEN environment variable
    /// (already folded in by `apply_env_overrides`) > config file value.
    pub fn resolve_token(
        &self,
        token_file: Option<&Path>,
    ) -> Result<String, Box<dyn std::error::Error>> {
        if let Some(path) = token_file {
            let token = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read token file '{}': {}", path.display(), e))?;
            return Ok(token.trim().to_string());
        }

        match &self.telegram.bot_token {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err("Bot token is not configured \
                      (set BOT_TOKEN, --token-file, or [telegram] bot_token)"
                .into()),
        }
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml() -> String {
        format!(
            r#"# Groupsync Bot Configuration
#
# The bot gates join requests to the secondary group on membership in the
# primary group, and removes users from the secondary group when they leave
# the primary one.
#
# Every value here can be overridden from the environment:
#   BOT_TOKEN, MAIN_GROUP_ID, SECONDARY_GROUP_ID, LOG_LEVEL, DECLINE_MESSAGE

[telegram]
# Bot credential token. Prefer the BOT_TOKEN environment variable over
# storing the token on disk.
# bot_token = "123456:ABC-DEF..."

# The group whose membership is authoritative for admission decisions
primary_group_id = 0

# The gated group, kept in sync with the primary one
secondary_group_id = 0

[gatekeeper]
# Message sent to users whose join request is declined
decline_message = "{decline_message}"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"
"#,
            decline_message = DEFAULT_DECLINE_MESSAGE
        )
    }

    /// Create and save a default configuration file
    pub fn create_default(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = Self::generate_default_toml();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(config_path, contents).map_err(|e| {
            format!(
                "Failed to write config file '{}': {}",
                config_path.display(),
                e
            )
        })?;

        Ok(())
    }
}

/// Get the default config file path
///
/// e.g. ~/.config/groupsync/config.toml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("groupsync")
        .join("config.toml")
}
