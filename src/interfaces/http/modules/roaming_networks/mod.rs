//! Roaming networks: list, count, create, read, delete

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
