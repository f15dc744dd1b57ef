use std::env;
use std::path::PathBuf;

use crate::error::HorizonsError;

/// Process configuration loaded from environment variables.
/// Host definitions and category settings live in the TOML `FileConfig`.
#[derive(Debug, Clone)]
pub struct Config {
    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Data
    pub dump_dir: PathBuf,
    pub config_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables (after reading `.env` if present).
    pub fn from_env() -> Result<Self, HorizonsError> {
        dotenvy::dotenv().ok();

        let web_port = env::var("WEB_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| HorizonsError::Config("WEB_PORT must be a number".to_string()))?;

        let config = Self {
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port,
            dump_dir: env::var("HORIZONS_DUMP_DIR")
                .unwrap_or_else(|_| "./_dump".to_string())
                .into(),
            config_path: env::var("HORIZONS_CONFIG")
                .unwrap_or_else(|_| "./config/horizons.toml".to_string())
                .into(),
        };

        tracing::info!(
            web_host = %config.web_host,
            web_port = config.web_port,
            dump_dir = %config.dump_dir.display(),
            config_path = %config.config_path.display(),
            "Config loaded"
        );
        Ok(config)
    }
}
