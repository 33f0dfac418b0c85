//! Charging pools: a group of stations at one location

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use super::charging_station::{ChargingStation, ChargingStationDraft};
use super::data_license::DataLicense;
use super::entity::{Entity, EntityCore, EntityDraft, EntityKind};
use super::ids::{BrandId, ChargingPoolId, ChargingStationId, RoamingNetworkId};
use super::registry::{Detach, OrderedRegistry};
use crate::support::errors::{DomainError, DomainResult};

#[derive(Debug, Clone, Default)]
pub struct ChargingPoolDraft {
    pub entity: EntityDraft,
    pub address: Option<String>,
    pub brand_ids: Vec<BrandId>,
    pub data_licenses: Vec<DataLicense>,
    pub max_power: Option<Decimal>,
}

#[derive(Debug)]
pub struct ChargingPool {
    pub id: ChargingPoolId,
    pub roaming_network: RoamingNetworkId,
    pub address: Option<String>,
    pub brand_ids: Vec<BrandId>,
    pub data_licenses: Vec<DataLicense>,
    pub max_power: Option<Decimal>,
    core: EntityCore,
    stations: OrderedRegistry<ChargingStationId, ChargingStation>,
}

impl ChargingPool {
    pub(crate) fn new(
        id: ChargingPoolId,
        roaming_network: RoamingNetworkId,
        draft: ChargingPoolDraft,
        history_capacity: usize,
    ) -> Self {
        Self {
            id,
            roaming_network,
            address: draft.address,
            brand_ids: draft.brand_ids,
            data_licenses: draft.data_licenses,
            max_power: draft.max_power,
            core: EntityCore::new(draft.entity, history_capacity),
            stations: OrderedRegistry::new(),
        }
    }

    pub fn add_charging_station(
        &self,
        id: ChargingStationId,
        draft: ChargingStationDraft,
    ) -> DomainResult<Arc<ChargingStation>> {
        if id.operator_id() != self.id.operator_id() {
            return Err(DomainError::validation(
                "ChargingStationId does not belong to the operator of its charging pool!",
            ));
        }

        let capacity = self.core.history_capacity();
        let station = self
            .stations
            .insert_new(id.clone(), || {
                ChargingStation::new(
                    id.clone(),
                    self.roaming_network.clone(),
                    self.id.clone(),
                    draft,
                    capacity,
                )
            })
            .map_err(|r| r.into_error("ChargingStationId already exists!", "Unknown ChargingPoolId!"))?;

        debug!(charging_pool_id = %self.id, charging_station_id = %id, "Charging station added");
        Ok(station)
    }

    pub fn remove_charging_station(&self, id: &ChargingStationId) -> DomainResult<Arc<ChargingStation>> {
        self.stations
            .remove(id)
            .ok_or_else(|| DomainError::not_found("Unknown ChargingStationId!"))
    }

    pub fn charging_station(&self, id: &ChargingStationId) -> Option<Arc<ChargingStation>> {
        self.stations.get(id)
    }

    pub fn charging_stations(&self) -> Vec<Arc<ChargingStation>> {
        self.stations.values()
    }
}

impl Detach for ChargingPool {
    fn detach(&self) {
        self.stations.detach_all();
    }
}

impl Entity for ChargingPool {
    fn kind(&self) -> EntityKind {
        EntityKind::ChargingPool
    }

    fn id_text(&self) -> String {
        self.id.to_string()
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }
}
