use std::{marker::PhantomData, path::PathBuf};

use async_trait::async_trait;
use models::user::{Collection, User};
use tokio::fs;
use tracing::debug;

use super::UserStore;
use crate::errors::ServiceError;

/// Generic JSON file-backed array store.
///
/// The file holds one top-level JSON array. Nothing is cached: `load` reads
/// and parses the whole file, `save` rewrites it with 2-space indentation.
#[derive(Debug, Clone)]
pub struct JsonArrayStore<T> {
    file_path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonArrayStore<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    /// Point the store at a file. The file is not touched until the first load or save.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into(), _marker: PhantomData }
    }

    /// Read and parse the full file.
    pub async fn read_all(&self) -> Result<Vec<T>, ServiceError> {
        let bytes = fs::read(&self.file_path)
            .await
            .map_err(|e| ServiceError::storage(&format!("read {}", self.file_path.display()), e))?;
        let items: Vec<T> = serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::storage(&format!("parse {}", self.file_path.display()), e))?;
        debug!(path = %self.file_path.display(), count = items.len(), "collection loaded");
        Ok(items)
    }

    /// Serialize the full array and overwrite the file.
    pub async fn write_all(&self, items: &[T]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(items).map_err(|e| ServiceError::storage("serialize collection", e))?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::storage(&format!("write {}", self.file_path.display()), e))?;
        debug!(path = %self.file_path.display(), count = items.len(), "collection saved");
        Ok(())
    }
}

#[async_trait]
impl UserStore for JsonArrayStore<User> {
    async fn load(&self) -> Result<Collection, ServiceError> { self.read_all().await }
    async fn save(&self, users: &[User]) -> Result<(), ServiceError> { self.write_all(users).await }
}
