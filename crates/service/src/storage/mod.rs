//! Storage abstractions for service layer
//!
//! The collection is loaded in full and saved in full. Implementations do not
//! lock across a load/save pair, so concurrent writers race and the last save
//! wins.

use async_trait::async_trait;
use models::user::{Collection, User};

use crate::errors::ServiceError;

pub mod json_array_store;
pub mod memory_store;

pub use json_array_store::JsonArrayStore;
pub use memory_store::MemoryUserStore;

/// Whole-collection persistence for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn load(&self) -> Result<Collection, ServiceError>;
    async fn save(&self, users: &[User]) -> Result<(), ServiceError>;
}
