//! Charging stations

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use super::entity::{Entity, EntityCore, EntityDraft, EntityKind};
use super::evse::{Evse, EvseDraft};
use super::ids::{BrandId, ChargingPoolId, ChargingStationId, EvseId, RoamingNetworkId};
use super::registry::{Detach, OrderedRegistry};
use crate::support::errors::{DomainError, DomainResult};

#[derive(Debug, Clone, Default)]
pub struct ChargingStationDraft {
    pub entity: EntityDraft,
    pub brand_ids: Vec<BrandId>,
    pub max_power: Option<Decimal>,
}

#[derive(Debug)]
pub struct ChargingStation {
    pub id: ChargingStationId,
    pub roaming_network: RoamingNetworkId,
    pub charging_pool: ChargingPoolId,
    pub brand_ids: Vec<BrandId>,
    pub max_power: Option<Decimal>,
    core: EntityCore,
    evses: OrderedRegistry<EvseId, Evse>,
}

impl ChargingStation {
    pub(crate) fn new(
        id: ChargingStationId,
        roaming_network: RoamingNetworkId,
        charging_pool: ChargingPoolId,
        draft: ChargingStationDraft,
        history_capacity: usize,
    ) -> Self {
        Self {
            id,
            roaming_network,
            charging_pool,
            brand_ids: draft.brand_ids,
            max_power: draft.max_power,
            core: EntityCore::new(draft.entity, history_capacity),
            evses: OrderedRegistry::new(),
        }
    }

    pub fn add_evse(&self, id: EvseId, draft: EvseDraft) -> DomainResult<Arc<Evse>> {
        if id.operator_id() != self.id.operator_id() {
            return Err(DomainError::validation(
                "EVSEId does not belong to the operator of its charging station!",
            ));
        }
        let mut outlet_ids = HashSet::new();
        if !draft.socket_outlets.iter().all(|(outlet_id, _)| outlet_ids.insert(*outlet_id)) {
            return Err(DomainError::validation("Duplicate SocketOutletId!"));
        }

        let capacity = self.core.history_capacity();
        let evse = self
            .evses
            .insert_new(id.clone(), || {
                Evse::new(
                    id.clone(),
                    self.roaming_network.clone(),
                    self.charging_pool.clone(),
                    self.id.clone(),
                    draft,
                    capacity,
                )
            })
            .map_err(|r| r.into_error("EVSEId already exists!", "Unknown ChargingStationId!"))?;

        debug!(charging_station_id = %self.id, evse_id = %id, "EVSE added");
        Ok(evse)
    }

    pub fn remove_evse(&self, id: &EvseId) -> DomainResult<Arc<Evse>> {
        self.evses
            .remove(id)
            .ok_or_else(|| DomainError::not_found("Unknown EVSEId!"))
    }

    pub fn evse(&self, id: &EvseId) -> Option<Arc<Evse>> {
        self.evses.get(id)
    }

    pub fn evses(&self) -> Vec<Arc<Evse>> {
        self.evses.values()
    }
}

impl Detach for ChargingStation {
    fn detach(&self) {
        self.evses.detach_all();
    }
}

impl Entity for ChargingStation {
    fn kind(&self) -> EntityKind {
        EntityKind::ChargingStation
    }

    fn id_text(&self) -> String {
        self.id.to_string()
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }
}
