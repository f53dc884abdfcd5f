use clap::{Parser, Subcommand};

pub mod config;
pub mod run;
pub mod version;

#[derive(Parser)]
#[command(name = "groupsync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Telegram bot bridging membership between two groups", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot service
    Run {
        /// Path to config file (default: ~/.config/groupsync/config.toml)
        #[arg(long)]
        config: Option<String>,

        /// Path to file containing the bot token (container-native;
        /// takes precedence over BOT_TOKEN and the config file)
        #[arg(long)]
        token_file: Option<String>,
    },

    /// Write a default config file to the given path
    InitConfig {
        /// Where to write the config file
        path: String,
    },

    /// Display version information
    Version,
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run { config, token_file } => run::execute(config, token_file).await,
        Commands::InitConfig { path } => {
            config::GroupsyncConfig::create_default(std::path::Path::new(&path))?;
            println!("Created {}", path);
            Ok(())
        }
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["groupsync", "run", "--config", "/etc/groupsync/config.toml"]);

        match cli.command {
            Commands::Run { config, token_file } => {
                assert_eq!(config, Some("/etc/groupsync/config.toml".to_string()));
                assert_eq!(token_file, None);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_run_defaults() {
        let cli = Cli::parse_from(["groupsync", "run"]);

        match cli.command {
            Commands::Run { config, token_file } => {
                assert_eq!(config, None);
                assert_eq!(token_file, None);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_run_with_token_file() {
        let cli = Cli::parse_from(["groupsync", "run", "--token-file", "/run/secrets/bot-token"]);

        match cli.command {
            Commands::Run { token_file, .. } => {
                assert_eq!(token_file, Some("/run/secrets/bot-token".to_string()));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_init_config() {
        let cli = Cli::parse_from(["groupsync", "init-config", "/tmp/config.toml"]);

        match cli.command {
            Commands::InitConfig { path } => assert_eq!(path, "/tmp/config.toml"),
            _ => panic!("Expected InitConfig command"),
        }
    }

    #[test]
    fn test_cli_parse_version() {
        let cli = Cli::parse_from(["groupsync", "version"]);
        assert!(matches!(cli.command, Commands::Version));
    }
}
