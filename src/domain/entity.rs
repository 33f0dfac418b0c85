//! Capabilities shared by every infrastructure entity

use chrono::{DateTime, Utc};

use super::geo::GeoCoordinate;
use super::i18n::I18NText;
use super::property_bag::PropertyBag;
use super::status::{AdminStatus, OperationalStatus, StatusSchedule};

/// Entity variants of the charging infrastructure tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    RoamingNetwork,
    ChargingStationOperator,
    GridOperator,
    ParkingOperator,
    SmartCityProxy,
    ChargingPool,
    ChargingStation,
    Evse,
    SocketOutlet,
}

impl EntityKind {
    /// JSON key carrying the entity id
    pub fn id_field(&self) -> &'static str {
        match self {
            Self::RoamingNetwork => "RoamingNetworkId",
            Self::ChargingStationOperator => "ChargingStationOperatorId",
            Self::GridOperator => "GridOperatorId",
            Self::ParkingOperator => "ParkingOperatorId",
            Self::SmartCityProxy => "SmartCityId",
            Self::ChargingPool => "ChargingPoolId",
            Self::ChargingStation => "ChargingStationId",
            Self::Evse => "EVSEId",
            Self::SocketOutlet => "SocketOutletId",
        }
    }
}

/// Common creation parameters, filled in by plain field assignment
#[derive(Debug, Clone, Default)]
pub struct EntityDraft {
    pub name: I18NText,
    pub description: I18NText,
    pub coordinate: Option<GeoCoordinate>,
    pub admin_status: Option<AdminStatus>,
    pub status: Option<OperationalStatus>,
}

/// Fields every entity carries
#[derive(Debug)]
pub struct EntityCore {
    pub name: I18NText,
    pub description: I18NText,
    pub coordinate: Option<GeoCoordinate>,
    pub admin_status: StatusSchedule<AdminStatus>,
    pub status: StatusSchedule<OperationalStatus>,
    pub properties: PropertyBag,
    pub created: DateTime<Utc>,
    history_capacity: usize,
}

impl EntityCore {
    pub fn new(draft: EntityDraft, history_capacity: usize) -> Self {
        let created = Utc::now();
        let core = Self {
            name: draft.name,
            description: draft.description,
            coordinate: draft.coordinate,
            admin_status: StatusSchedule::new(history_capacity),
            status: StatusSchedule::new(history_capacity),
            properties: PropertyBag::new(),
            created,
            history_capacity,
        };
        if let Some(admin_status) = draft.admin_status {
            core.admin_status.insert(admin_status, created);
        }
        if let Some(status) = draft.status {
            core.status.insert(status, created);
        }
        core
    }

    /// Capacity handed down to children created below this entity
    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }
}

/// Read access to what every entity variant offers
pub trait Entity {
    fn kind(&self) -> EntityKind;

    fn id_text(&self) -> String;

    fn core(&self) -> &EntityCore;

    fn properties(&self) -> &PropertyBag {
        &self.core().properties
    }

    fn set_admin_status(&self, status: AdminStatus) -> bool {
        self.core().admin_status.insert(status, Utc::now())
    }

    fn set_status(&self, status: OperationalStatus) -> bool {
        self.core().status.insert(status, Utc::now())
    }
}
