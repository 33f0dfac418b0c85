//! Application layer: the host-scoped entity store and the projection engine
//! rendering its contents.

pub mod projection;
pub mod store;

pub use projection::{
    ExpandMode, ExpansionPolicy, Projection, ProjectionEngine, PropertyCreators, Relation, StatusKind,
};
pub use store::{EntityStore, HostScope, SharedEntityStore, StoreSettings, TenancyMode};
