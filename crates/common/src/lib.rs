//! Runtime helpers shared by the server library and the `server` binary.

pub mod env;
pub mod utils;
