// JSON file store for per-guild welcome channel overrides
// Read-modify-writes are serialized and writes go through a synced temp file + rename

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::models::guild::ServerWelcomeConfig;

#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("config file {path:?} is unreadable or unwritable: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config file {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigStoreError>;

/// Welcome channel overrides persisted as a flat JSON object
pub struct ConfigStore {
    path: PathBuf,
    /// Held for every single read or write of the file
    io: Mutex<()>,
    /// Held across a whole read-modify-write
    update: Mutex<()>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io: Mutex::new(()),
            update: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted overrides. A missing or blank file is an empty config.
    pub async fn load(&self) -> Result<ServerWelcomeConfig> {
        let _io = self.io.lock().await;
        self.read().await
    }

    /// Replace the persisted overrides with `config`
    pub async fn save(&self, config: &ServerWelcomeConfig) -> Result<()> {
        let _io = self.io.lock().await;
        self.write(config).await
    }

    /// Set the welcome channel for one guild, keeping every other entry
    pub async fn set_welcome_channel(&self, guild_id: u64, channel_id: u64) -> Result<()> {
        let _update = self.update.lock().await;

        let mut config = self.load().await?;
        config.set_welcome_channel(guild_id, channel_id);
        self.save(&config).await?;

        info!("Welcome channel for guild {} set to {}", guild_id, channel_id);
        Ok(())
    }

    /// Configured welcome channel for one guild
    pub async fn welcome_channel(&self, guild_id: u64) -> Result<Option<u64>> {
        Ok(self.load().await?.welcome_channel(guild_id))
    }

    async fn read(&self) -> Result<ServerWelcomeConfig> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No config at {:?}, starting empty", self.path);
                return Ok(ServerWelcomeConfig::default());
            }
            Err(source) => {
                return Err(ConfigStoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(ServerWelcomeConfig::default());
        }

        serde_json::from_str(&content).map_err(|source| ConfigStoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn write(&self, config: &ServerWelcomeConfig) -> Result<()> {
        let io_err = |source: std::io::Error| ConfigStoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(config).map_err(ConfigStoreError::Serialize)?;

        let mut temp_name = self.path.clone().into_os_string();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        let mut file = tokio::fs::File::create(&temp_path).await.map_err(io_err)?;
        file.write_all(content.as_bytes()).await.map_err(io_err)?;
        // Contents must be on disk before the rename makes them visible
        file.sync_all().await.map_err(io_err)?;
        drop(file);

        tokio::fs::rename(&temp_path, &self.path).await.map_err(io_err)?;

        debug!("Saved {} welcome override(s) to {:?}", config.len(), self.path);
        Ok(())
    }
}
