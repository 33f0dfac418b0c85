//! # Charging infrastructure API
//!
//! In-memory registry of e-mobility roaming networks: operators, charging
//! pools, charging stations, EVSEs and socket outlets, rendered as JSON or
//! GeoJSON over a REST API.
//!
//! - **domain**: entities, identifiers, property bags, status histories
//! - **application**: the host-scoped entity store and the projection engine
//! - **interfaces**: the axum HTTP API
//! - **server**: runtime bootstrap and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod interfaces;
pub mod server;
pub mod support;

pub use config::{default_config_path, AppConfig};
pub use interfaces::http::{create_api_router, create_app, AppState};
pub use server::{init_tracing, ServerHandle};
