//! Charging infrastructure domain model
//!
//! Roaming networks own operators, operators own pools, pools own stations,
//! stations own EVSEs, EVSEs own socket outlets. Every entity carries a
//! [`PropertyBag`] of schema-free extension properties.

pub mod brand;
pub mod charging_pool;
pub mod charging_station;
pub mod data_license;
pub mod entity;
pub mod evse;
pub mod geo;
pub mod i18n;
pub mod ids;
pub mod operators;
pub mod property_bag;
pub mod registry;
pub mod roaming_network;
pub mod status;

pub use brand::{Brand, BrandDraft};
pub use charging_pool::{ChargingPool, ChargingPoolDraft};
pub use charging_station::{ChargingStation, ChargingStationDraft};
pub use data_license::DataLicense;
pub use entity::{Entity, EntityCore, EntityDraft, EntityKind};
pub use evse::{Evse, EvseDraft, PlugType, SocketOutlet, SocketOutletDraft};
pub use geo::GeoCoordinate;
pub use i18n::I18NText;
pub use ids::{
    BrandId, ChargingPoolId, ChargingStationId, ChargingStationOperatorId, EvseId, GridOperatorId,
    ParkingOperatorId, RoamingNetworkId, SmartCityId, SocketOutletId,
};
pub use operators::{
    ChargingStationOperator, ChargingStationOperatorDraft, GridOperator, ParkingOperator, SmartCityProxy,
};
pub use property_bag::{deep_equal, PropertyBag, PropertyUpdate, SetOutcome};
pub use roaming_network::{RoamingNetwork, RoamingNetworkDraft};
pub use status::{AdminStatus, OperationalStatus, StatusSchedule, Timestamped};

pub use crate::support::errors::{DomainError, DomainResult};
