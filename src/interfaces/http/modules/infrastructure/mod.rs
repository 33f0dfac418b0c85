//! Infrastructure: charging pools, stations and EVSEs

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
