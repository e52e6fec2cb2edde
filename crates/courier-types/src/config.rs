//! Configuration types for Courier.
//!
//! `CourierConfig` represents the optional `config.toml` in the data
//! directory. Every field has a default so an empty file (or no file) is a
//! valid configuration; command-line flags and environment variables take
//! precedence over the file.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the service and the bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourierConfig {
    /// sqlx SQLite URL of the message store. `None` means `{data_dir}/courier.db`.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Redis URL of the snapshot cache. `None` selects the in-process cache.
    #[serde(default)]
    pub cache_url: Option<String>,

    /// Fixed civil time zone for message timestamps, in hours east of UTC.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL the bot uses to reach the message service.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_utc_offset_hours() -> i32 {
    3
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_api_url() -> String {
    format!("http://{}:{}", default_host(), default_port())
}

impl Default for CourierConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            cache_url: None,
            utc_offset_hours: default_utc_offset_hours(),
            host: default_host(),
            port: default_port(),
            api_url: default_api_url(),
        }
    }
}
