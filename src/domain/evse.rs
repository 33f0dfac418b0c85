//! EVSEs and their socket outlets

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use super::entity::{Entity, EntityCore, EntityDraft, EntityKind};
use super::ids::{BrandId, ChargingPoolId, ChargingStationId, EvseId, RoamingNetworkId, SocketOutletId};
use super::registry::{Detach, OrderedRegistry};
use crate::support::errors::{DomainError, DomainResult};

/// Physical plug of a socket outlet
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlugType {
    TypeFSchuko,
    Type2Outlet,
    Type2Connector,
    CCSCombo2,
    CHAdeMO,
    Unspecified,
}

impl PlugType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeFSchuko => "TypeFSchuko",
            Self::Type2Outlet => "Type2Outlet",
            Self::Type2Connector => "Type2Connector",
            Self::CCSCombo2 => "CCSCombo2",
            Self::CHAdeMO => "CHAdeMO",
            Self::Unspecified => "Unspecified",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        [
            Self::TypeFSchuko,
            Self::Type2Outlet,
            Self::Type2Connector,
            Self::CCSCombo2,
            Self::CHAdeMO,
            Self::Unspecified,
        ]
        .into_iter()
        .find(|plug| plug.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| DomainError::validation("Invalid plug type!"))
    }
}

#[derive(Debug, Clone)]
pub struct SocketOutletDraft {
    pub entity: EntityDraft,
    pub plug: PlugType,
    pub cable_attached: Option<bool>,
    pub cable_length: Option<Decimal>,
}

impl Default for SocketOutletDraft {
    fn default() -> Self {
        Self {
            entity: EntityDraft::default(),
            plug: PlugType::Unspecified,
            cable_attached: None,
            cable_length: None,
        }
    }
}

#[derive(Debug)]
pub struct SocketOutlet {
    pub id: SocketOutletId,
    pub evse: EvseId,
    pub plug: PlugType,
    pub cable_attached: Option<bool>,
    pub cable_length: Option<Decimal>,
    core: EntityCore,
}

impl SocketOutlet {
    fn new(id: SocketOutletId, evse: EvseId, draft: SocketOutletDraft, history_capacity: usize) -> Self {
        Self {
            id,
            evse,
            plug: draft.plug,
            cable_attached: draft.cable_attached,
            cable_length: draft.cable_length,
            core: EntityCore::new(draft.entity, history_capacity),
        }
    }
}

impl Entity for SocketOutlet {
    fn kind(&self) -> EntityKind {
        EntityKind::SocketOutlet
    }

    fn id_text(&self) -> String {
        self.id.to_string()
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }
}

#[derive(Debug, Clone, Default)]
pub struct EvseDraft {
    pub entity: EntityDraft,
    pub brand_ids: Vec<BrandId>,
    pub max_voltage: Option<Decimal>,
    pub max_current: Option<Decimal>,
    pub max_power: Option<Decimal>,
    pub max_capacity: Option<Decimal>,
    /// Outlets linked together with the EVSE; ids must be unique
    pub socket_outlets: Vec<(SocketOutletId, SocketOutletDraft)>,
}

/// Electric Vehicle Supply Equipment: one individually addressable charge point
#[derive(Debug)]
pub struct Evse {
    pub id: EvseId,
    pub roaming_network: RoamingNetworkId,
    pub charging_pool: ChargingPoolId,
    pub charging_station: ChargingStationId,
    pub brand_ids: Vec<BrandId>,
    pub max_voltage: Option<Decimal>,
    pub max_current: Option<Decimal>,
    pub max_power: Option<Decimal>,
    pub max_capacity: Option<Decimal>,
    core: EntityCore,
    socket_outlets: OrderedRegistry<SocketOutletId, SocketOutlet>,
}

impl Evse {
    pub(crate) fn new(
        id: EvseId,
        roaming_network: RoamingNetworkId,
        charging_pool: ChargingPoolId,
        charging_station: ChargingStationId,
        draft: EvseDraft,
        history_capacity: usize,
    ) -> Self {
        let socket_outlets = OrderedRegistry::new();
        for (outlet_id, outlet) in draft.socket_outlets {
            // uniqueness checked by ChargingStation::add_evse
            let _ = socket_outlets.insert_new(outlet_id, || {
                SocketOutlet::new(outlet_id, id.clone(), outlet, history_capacity)
            });
        }

        Self {
            id,
            roaming_network,
            charging_pool,
            charging_station,
            brand_ids: draft.brand_ids,
            max_voltage: draft.max_voltage,
            max_current: draft.max_current,
            max_power: draft.max_power,
            max_capacity: draft.max_capacity,
            core: EntityCore::new(draft.entity, history_capacity),
            socket_outlets,
        }
    }

    pub fn add_socket_outlet(&self, id: SocketOutletId, draft: SocketOutletDraft) -> DomainResult<Arc<SocketOutlet>> {
        let capacity = self.core.history_capacity();
        let outlet = self
            .socket_outlets
            .insert_new(id, || SocketOutlet::new(id, self.id.clone(), draft, capacity))
            .map_err(|r| r.into_error("SocketOutletId already exists!", "Unknown EVSEId!"))?;

        debug!(evse_id = %self.id, socket_outlet_id = %id, "Socket outlet added");
        Ok(outlet)
    }

    pub fn socket_outlets(&self) -> Vec<Arc<SocketOutlet>> {
        self.socket_outlets.values()
    }
}

impl Detach for Evse {
    fn detach(&self) {
        self.socket_outlets.close();
    }
}

impl Entity for Evse {
    fn kind(&self) -> EntityKind {
        EntityKind::Evse
    }

    fn id_text(&self) -> String {
        self.id.to_string()
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }
}
