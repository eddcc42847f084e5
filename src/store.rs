use crate::domain::InstalledAppState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Key-value persistence of the OAuth state of each installed app.
#[async_trait]
pub trait StateStore: Debug + Send + Sync {
    async fn get(&self, installed_app_id: &str) -> Result<Option<InstalledAppState>, StoreError>;

    async fn put(&self, installed_app_id: &str, state: &InstalledAppState) -> Result<(), StoreError>;

    /// Deleting an unknown installed app is not an error.
    async fn delete(&self, installed_app_id: &str) -> Result<(), StoreError>;
}

pub fn state_key(installed_app_id: &str) -> String {
    format!("lifx:{}", installed_app_id)
}

#[derive(Debug, Default)]
pub struct MemoryStateStore {
    states: RwLock<HashMap<String, InstalledAppState>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, installed_app_id: &str) -> Result<Option<InstalledAppState>, StoreError> {
        Ok(self.states.read().await.get(&state_key(installed_app_id)).cloned())
    }

    async fn put(&self, installed_app_id: &str, state: &InstalledAppState) -> Result<(), StoreError> {
        self.states.write().await.insert(state_key(installed_app_id), state.clone());
        Ok(())
    }

    async fn delete(&self, installed_app_id: &str) -> Result<(), StoreError> {
        self.states.write().await.remove(&state_key(installed_app_id));
        Ok(())
    }
}

/// Stores every installed app's state as a JSON file in `directory`.
#[derive(Debug)]
pub struct FileStateStore {
    directory: PathBuf,
}

impl FileStateStore {
    pub async fn open(directory: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let directory = directory.into();
        fs::create_dir_all(&directory).await.map_err(|source| StoreError::Io {
            source,
            path: Some(directory.clone()),
        })?;
        Ok(FileStateStore { directory })
    }

    fn path(&self, installed_app_id: &str) -> PathBuf {
        let file_name = state_key(installed_app_id)
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect::<String>();
        self.directory.join(format!("{}.json", file_name))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    #[instrument(skip(self))]
    async fn get(&self, installed_app_id: &str) -> Result<Option<InstalledAppState>, StoreError> {
        let path = self.path(installed_app_id);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { source, path: Some(path) }),
        }
    }

    #[instrument(skip(self, state))]
    async fn put(&self, installed_app_id: &str, state: &InstalledAppState) -> Result<(), StoreError> {
        let path = self.path(installed_app_id);
        let json = serde_json::to_vec(state)?;
        fs::write(&path, json).await.map_err(|source| StoreError::Io {
            source,
            path: Some(path.clone()),
        })?;
        debug!(path = %path.display(), "Stored installed app state");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, installed_app_id: &str) -> Result<(), StoreError> {
        let path = self.path(installed_app_id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { source, path: Some(path) }),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error for {path:?}: {source}")]
    Io { source: io::Error, path: Option<PathBuf> },
    #[error("invalid stored state: {0}")]
    Serde(#[from] serde_json::Error),
}
