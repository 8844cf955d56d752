use async_trait::async_trait;
use log::debug;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{ Path, PathBuf };
use tokio::fs;

use super::KeyValueStore;
use crate::error::ClientError;

/// Key-value pairs persisted as a flat JSON object.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, ClientError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(e) => {
                return Err(e.into());
            }
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|e| {
            ClientError::StorageUnavailable(format!("{} is not a valid store: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&entries).map_err(|e| {
            ClientError::StorageUnavailable(e.to_string())
        })?;

        // Write next to the target and rename so a crash never leaves half a file.
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &self.path).await?;
        debug!("Saved {} to {}", key, self.path.display());
        Ok(())
    }
}
