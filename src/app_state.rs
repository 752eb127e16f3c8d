use crate::Config;
use crate::drive::DriveClient;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub drive: DriveClient,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let drive = DriveClient::new(&config)?;

        Ok(Self {
            config: Arc::new(config),
            drive,
        })
    }

    /// API key, if configured with a non-empty value
    pub fn api_key(&self) -> Option<&str> {
        self.config.api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Clip folder id, if configured with a non-empty value
    pub fn folder_id(&self) -> Option<&str> {
        self.config.folder_id.as_deref().filter(|f| !f.is_empty())
    }
}
