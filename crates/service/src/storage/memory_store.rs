use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;
use models::user::{Collection, User};
use tokio::sync::RwLock;

use super::UserStore;
use crate::errors::ServiceError;

/// In-memory stand-in for the JSON file.
///
/// Each `load` hands out a copy and each `save` replaces the whole
/// collection, mirroring the file store. `set_failing(true)` makes every call
/// fail with a storage error.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<Collection>>,
    failing: Arc<AtomicBool>,
}

impl MemoryUserStore {
    pub fn new(users: Collection) -> Self {
        Self { users: Arc::new(RwLock::new(users)), failing: Arc::default() }
    }

    /// Current contents without going through `load`.
    pub async fn snapshot(&self) -> Collection {
        self.users.read().await.clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), ServiceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ServiceError::Storage("memory store unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn load(&self) -> Result<Collection, ServiceError> {
        self.check()?;
        Ok(self.users.read().await.clone())
    }

    async fn save(&self, users: &[User]) -> Result<(), ServiceError> {
        self.check()?;
        *self.users.write().await = users.to_vec();
        Ok(())
    }
}
