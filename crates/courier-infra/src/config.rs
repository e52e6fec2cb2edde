//! Configuration loader for Courier.
//!
//! Reads `config.toml` from the data directory (`~/.courier/` by default)
//! and deserializes it into [`CourierConfig`]. Falls back to defaults when
//! the file is missing or malformed.

use std::path::{Path, PathBuf};

use courier_types::config::CourierConfig;

/// Resolve the data directory: `COURIER_DATA_DIR`, else `~/.courier`,
/// else `./.courier`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("COURIER_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".courier");
    }

    PathBuf::from(".courier")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`CourierConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_config(data_dir: &Path) -> CourierConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return CourierConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return CourierConfig::default();
        }
    };

    match toml::from_str::<CourierConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            CourierConfig::default()
        }
    }
}
