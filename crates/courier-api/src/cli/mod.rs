//! CLI command definitions for the `courier` binary.
//!
//! Uses clap derive macros for argument parsing. Every setting can come from
//! a flag, an environment variable (also read from `.env`), or `config.toml`
//! in the data directory, in that order of precedence.

pub mod message;

use clap::{Args, Parser, Subcommand};

use courier_types::config::CourierConfig;

use message::MessagesCommand;

/// Message board service, Telegram bot and operator tools.
#[derive(Parser)]
#[command(name = "courier", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings shared by every command that touches storage.
#[derive(Args, Debug, Default)]
pub struct ConfigOverrides {
    /// SQLite URL of the message store.
    #[arg(long, global = true, env = "COURIER_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Redis URL of the snapshot cache (in-process cache when unset).
    #[arg(long, global = true, env = "COURIER_CACHE_URL")]
    pub cache_url: Option<String>,

    /// Hours east of UTC used for message timestamps.
    #[arg(
        long,
        global = true,
        env = "COURIER_UTC_OFFSET_HOURS",
        allow_negative_numbers = true
    )]
    pub utc_offset_hours: Option<i32>,

    /// Base URL of the running API server (bot traffic, and CLI writes
    /// without a shared cache).
    #[arg(long, global = true, env = "COURIER_API_URL")]
    pub api_url: Option<String>,
}

impl ConfigOverrides {
    /// Overlay the values given on the command line or in the environment.
    pub fn apply(&self, config: &mut CourierConfig) {
        if let Some(url) = &self.database_url {
            config.database_url = Some(url.clone());
        }
        if let Some(url) = &self.cache_url {
            config.cache_url = Some(url.clone());
        }
        if let Some(hours) = self.utc_offset_hours {
            config.utc_offset_hours = hours;
        }
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Address to bind.
        #[arg(long, env = "COURIER_HOST")]
        host: Option<String>,

        /// Port to listen on.
        #[arg(long, env = "COURIER_PORT")]
        port: Option<u16>,
    },

    /// Run the Telegram bot against a running API server.
    Bot {
        /// Telegram Bot API token.
        #[arg(long, env = "TELEGRAM_API_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Read messages from storage and add new ones.
    ///
    /// Without a shared cache, additions go through the API server.
    #[command(alias = "msg")]
    Messages {
        #[command(subcommand)]
        action: MessagesCommand,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let mut config = CourierConfig {
            cache_url: Some("redis://file:6379".to_string()),
            ..CourierConfig::default()
        };
        let overrides = ConfigOverrides {
            database_url: Some("sqlite::memory:".to_string()),
            cache_url: None,
            utc_offset_hours: Some(-2),
            api_url: Some("http://api:9000".to_string()),
        };

        overrides.apply(&mut config);
        assert_eq!(config.database_url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(config.cache_url.as_deref(), Some("redis://file:6379"));
        assert_eq!(config.utc_offset_hours, -2);
        assert_eq!(config.api_url, "http://api:9000");
    }

    #[test]
    fn test_parse_messages_add() {
        let cli = Cli::try_parse_from(["courier", "messages", "add", "alice", "hello world"])
            .unwrap();
        match cli.command {
            Commands::Messages {
                action: MessagesCommand::Add { username, text },
            } => {
                assert_eq!(username, "alice");
                assert_eq!(text, "hello world");
            }
            _ => panic!("expected messages add"),
        }
    }

    #[test]
    fn test_parse_negative_offset() {
        let cli = Cli::try_parse_from([
            "courier",
            "--utc-offset-hours",
            "-5",
            "messages",
            "list",
            "--page",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.overrides.utc_offset_hours, Some(-5));
        assert!(matches!(
            cli.command,
            Commands::Messages {
                action: MessagesCommand::List { page: Some(2) }
            }
        ));
    }
}
