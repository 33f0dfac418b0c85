pub mod health;
pub mod infrastructure;
pub mod metrics;
pub mod organisations;
pub mod properties;
pub mod request_id;
pub mod roaming_networks;
