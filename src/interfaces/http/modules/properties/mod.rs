//! Property module: schema-free values on roaming networks

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
