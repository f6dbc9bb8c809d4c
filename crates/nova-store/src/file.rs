//! File-backed store: one `<slot>.json` document per slot.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use nova_core::error::NovaResult;
use nova_core::{Slot, StateRepository};
use tracing::{debug, info, warn};

use crate::codec;
use crate::error::StoreError;

/// Configuration for the file store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the slot documents. Created on open.
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./nova-data"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the configured data directory.
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        info!(data_dir = %config.data_dir.display(), "Opening file store");
        tokio::fs::create_dir_all(&config.data_dir).await?;
        Ok(Self {
            root: config.data_dir.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl StateRepository for FileStore {
    async fn load<T: Slot>(&self) -> NovaResult<T> {
        let path = self.path_for(T::KEY);
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(codec::decode_or_default(&raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(slot = T::KEY, "Slot not present, using default");
                Ok(T::default())
            }
            Err(e) => {
                warn!(slot = T::KEY, error = %e, "Unreadable slot, using default");
                Ok(T::default())
            }
        }
    }

    async fn save<T: Slot>(&self, value: &T) -> NovaResult<()> {
        let raw = codec::encode(value)?;
        let path = self.path_for(T::KEY);
        // Write to a sibling file and rename so a crash never leaves a
        // half-written document behind.
        let staging = self.path_for(&format!("{}.tmp", T::KEY));
        tokio::fs::write(&staging, raw)
            .await
            .map_err(StoreError::from)?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(StoreError::from)?;
        debug!(slot = T::KEY, "Slot saved");
        Ok(())
    }
}
