use anyhow::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure that can be loaded from CLI, config file, or environment
///
/// Example configuration file content
/// # Clip Gateway Configuration
///
/// # Server configuration
/// listen_on_port = 8000
///
/// # Upstream configuration
/// drive_api_base = "https://www.googleapis.com/drive/v3"
/// thumbnail_base = "https://drive.google.com/thumbnail"
/// upstream_timeout_secs = 10
///
/// # Credentials (usually provided via the environment instead)
/// api_key = "..."
/// folder_id = "..."
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(version, about, long_about = None)]
#[serde(default)]
pub struct Config {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8000)]
    #[serde(default = "default_port")]
    pub listen_on_port: u16,

    /// Google Drive API key
    #[arg(long, env = "GOOGLE_DRIVE_API_KEY", hide_env_values = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Drive folder holding the video clips
    #[arg(long, env = "GOOGLE_DRIVE_FOLDER_ID")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,

    /// Base URL of the Drive v3 API
    #[arg(long, default_value_t = default_drive_api_base())]
    #[serde(default = "default_drive_api_base")]
    pub drive_api_base: String,

    /// Base URL of the Drive thumbnail endpoint
    #[arg(long, default_value_t = default_thumbnail_base())]
    #[serde(default = "default_thumbnail_base")]
    pub thumbnail_base: String,

    /// Timeout for upstream requests, in seconds
    #[arg(long, default_value_t = 10)]
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,

    /// Configuration file path
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_on_port: default_port(),
            api_key: None,
            folder_id: None,
            drive_api_base: default_drive_api_base(),
            thumbnail_base: default_thumbnail_base(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
            config: None,
        }
    }
}

impl Config {
    /// Load configuration from CLI args and the environment, optionally merging with a config file
    pub fn load() -> Result<Self> {
        // First parse CLI args (clap also picks up the env-backed fields)
        let mut config = Config::parse();

        // If a config file is specified, load it and merge
        if let Some(config_path) = &config.config {
            let file_config = Self::from_file(Path::new(config_path))?;
            config = config.merge_with_file(file_config);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Merge with file config, CLI args take precedence
    fn merge_with_file(mut self, file_config: Config) -> Self {
        // If CLI value is default, use file value
        if self.listen_on_port == default_port() {
            self.listen_on_port = file_config.listen_on_port;
        }
        if self.drive_api_base == default_drive_api_base() {
            self.drive_api_base = file_config.drive_api_base;
        }
        if self.thumbnail_base == default_thumbnail_base() {
            self.thumbnail_base = file_config.thumbnail_base;
        }
        if self.upstream_timeout_secs == default_upstream_timeout_secs() {
            self.upstream_timeout_secs = file_config.upstream_timeout_secs;
        }

        // For Option fields, CLI/env takes precedence if Some
        if self.api_key.is_none() {
            self.api_key = file_config.api_key;
        }
        if self.folder_id.is_none() {
            self.folder_id = file_config.folder_id;
        }

        self
    }

    /// Validate the configuration
    ///
    /// Missing credentials are intentionally not an error here; handlers that
    /// need them answer 500 per request instead.
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("drive_api_base", &self.drive_api_base),
            ("thumbnail_base", &self.thumbnail_base),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(anyhow::anyhow!(
                    "{} must start with http:// or https://, got '{}'",
                    name,
                    url
                ));
            }
        }

        if self.upstream_timeout_secs == 0 {
            return Err(anyhow::anyhow!("upstream_timeout_secs must be at least 1"));
        }

        Ok(())
    }
}

// Default value functions
fn default_port() -> u16 {
    8000
}

fn default_drive_api_base() -> String {
    "https://www.googleapis.com/drive/v3".to_string()
}

fn default_thumbnail_base() -> String {
    "https://drive.google.com/thumbnail".to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    10
}
