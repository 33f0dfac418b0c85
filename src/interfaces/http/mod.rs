//! HTTP REST API
//!
//! - `common`: extractors, response builders and error mapping shared by all modules
//! - `modules`: request handlers per resource
//! - `router`: route table, middleware stack and Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::{create_api_router, create_app, App, AppState};
