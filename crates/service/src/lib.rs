//! Service layer for the user collection.
//! - `storage` hides where the collection lives (JSON file or memory).
//! - `user_service` implements list/get/create/update/delete on top of it.
//! - Every operation reloads the whole collection; mutations write it back.

pub mod errors;
pub mod storage;
pub mod user_service;
