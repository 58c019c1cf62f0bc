use crate::app_config::{DraftBackend, DraftConfig};
use crate::redis_repo::RedisDraftStorage;
use crate::StoreError;
use async_trait::async_trait;
use salon_core::DraftStorage;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Picks the storage the config asks for.
pub fn build_draft_storage(config: &DraftConfig) -> Result<Arc<dyn DraftStorage>, StoreError> {
    let storage: Arc<dyn DraftStorage> = match config.backend {
        DraftBackend::Memory => Arc::new(MemoryDraftStorage::new()),
        DraftBackend::File => {
            let dir = config
                .directory
                .as_deref()
                .ok_or(StoreError::MissingSetting("drafts.directory"))?;
            Arc::new(FileDraftStorage::new(dir)?)
        }
        DraftBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or(StoreError::MissingSetting("drafts.redis_url"))?;
            Arc::new(RedisDraftStorage::new(url, config.ttl_seconds)?)
        }
    };
    info!("Draft storage: {:?}", config.backend);
    Ok(storage)
}

/// Drafts that live as long as the process.
#[derive(Debug, Default)]
pub struct MemoryDraftStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryDraftStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftStorage for MemoryDraftStorage {
    async fn put(&self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut entries = self.entries.lock().map_err(|_| "draft map poisoned")?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let entries = self.entries.lock().map_err(|_| "draft map poisoned")?;
        Ok(entries.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut entries = self.entries.lock().map_err(|_| "draft map poisoned")?;
        entries.remove(key);
        Ok(())
    }
}

/// One JSON file per draft key inside a directory.
#[derive(Debug, Clone)]
pub struct FileDraftStorage {
    base_dir: PathBuf,
}

impl FileDraftStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Tokens come from a URL; encode so they cannot escape the directory.
        let file_stem: String = url::form_urlencoded::byte_serialize(key.as_bytes()).collect();
        self.base_dir.join(format!("{}.json", file_stem))
    }
}

#[async_trait]
impl DraftStorage for FileDraftStorage {
    async fn put(&self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
