//! Organisations: operators, grid/parking operators, smart cities, brands

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
