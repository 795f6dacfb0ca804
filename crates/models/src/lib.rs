//! Data model of the user store: the persisted [`user::User`] record and the
//! coercion rules for ids taken from request paths.

pub mod errors;
pub mod path_id;
pub mod user;
