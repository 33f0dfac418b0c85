//! Operators and other organisations registered in a roaming network

use std::sync::Arc;

use tracing::debug;

use super::brand::{Brand, BrandDraft};
use super::charging_pool::{ChargingPool, ChargingPoolDraft};
use super::data_license::DataLicense;
use super::entity::{Entity, EntityCore, EntityDraft, EntityKind};
use super::ids::{
    BrandId, ChargingPoolId, ChargingStationOperatorId, GridOperatorId, ParkingOperatorId,
    RoamingNetworkId, SmartCityId,
};
use super::registry::{Detach, OrderedRegistry};
use crate::support::errors::{DomainError, DomainResult};

const UNKNOWN_OPERATOR: &str = "Unknown ChargingStationOperatorId!";

#[derive(Debug, Clone, Default)]
pub struct ChargingStationOperatorDraft {
    pub entity: EntityDraft,
    pub homepage: Option<String>,
    pub data_licenses: Vec<DataLicense>,
}

/// Naming authority for everything it operates: pools, stations, EVSEs and
/// brands all carry the operator id as their textual prefix.
#[derive(Debug)]
pub struct ChargingStationOperator {
    pub id: ChargingStationOperatorId,
    pub roaming_network: RoamingNetworkId,
    pub homepage: Option<String>,
    pub data_licenses: Vec<DataLicense>,
    core: EntityCore,
    brands: OrderedRegistry<BrandId, Brand>,
    pools: OrderedRegistry<ChargingPoolId, ChargingPool>,
}

impl ChargingStationOperator {
    pub(crate) fn new(
        id: ChargingStationOperatorId,
        roaming_network: RoamingNetworkId,
        draft: ChargingStationOperatorDraft,
        history_capacity: usize,
    ) -> Self {
        Self {
            id,
            roaming_network,
            homepage: draft.homepage,
            data_licenses: draft.data_licenses,
            core: EntityCore::new(draft.entity, history_capacity),
            brands: OrderedRegistry::new(),
            pools: OrderedRegistry::new(),
        }
    }

    pub fn add_brand(&self, id: BrandId, draft: BrandDraft) -> DomainResult<Arc<Brand>> {
        if id.operator_id() != &self.id {
            return Err(DomainError::validation("BrandId does not belong to this operator!"));
        }
        self.brands
            .insert_new(id.clone(), || Brand::new(id.clone(), draft))
            .map_err(|r| r.into_error("BrandId already exists!", UNKNOWN_OPERATOR))
    }

    pub fn brand(&self, id: &BrandId) -> Option<Arc<Brand>> {
        self.brands.get(id)
    }

    pub fn brands(&self) -> Vec<Arc<Brand>> {
        self.brands.values()
    }

    pub fn add_charging_pool(&self, id: ChargingPoolId, draft: ChargingPoolDraft) -> DomainResult<Arc<ChargingPool>> {
        if id.operator_id() != &self.id {
            return Err(DomainError::validation("ChargingPoolId does not belong to this operator!"));
        }
        self.check_brands(&draft.brand_ids)?;

        let capacity = self.core.history_capacity();
        let pool = self
            .pools
            .insert_new(id.clone(), || {
                ChargingPool::new(id.clone(), self.roaming_network.clone(), draft, capacity)
            })
            .map_err(|r| r.into_error("ChargingPoolId already exists!", UNKNOWN_OPERATOR))?;

        debug!(operator_id = %self.id, charging_pool_id = %id, "Charging pool added");
        Ok(pool)
    }

    pub fn remove_charging_pool(&self, id: &ChargingPoolId) -> DomainResult<Arc<ChargingPool>> {
        self.pools
            .remove(id)
            .ok_or_else(|| DomainError::not_found("Unknown ChargingPoolId!"))
    }

    pub fn charging_pool(&self, id: &ChargingPoolId) -> Option<Arc<ChargingPool>> {
        self.pools.get(id)
    }

    pub fn charging_pools(&self) -> Vec<Arc<ChargingPool>> {
        self.pools.values()
    }

    /// Every referenced brand must be registered with this operator.
    pub fn check_brands(&self, brand_ids: &[BrandId]) -> DomainResult<()> {
        match brand_ids.iter().find(|b| self.brands.get(b).is_none()) {
            Some(unknown) => Err(DomainError::not_found(format!("Unknown BrandId '{}'!", unknown))),
            None => Ok(()),
        }
    }
}

impl Detach for ChargingStationOperator {
    fn detach(&self) {
        self.brands.close();
        self.pools.detach_all();
    }
}

impl Entity for ChargingStationOperator {
    fn kind(&self) -> EntityKind {
        EntityKind::ChargingStationOperator
    }

    fn id_text(&self) -> String {
        self.id.to_string()
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }
}

macro_rules! organisation {
    ($(#[$meta:meta])* $name:ident, $id:ty, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            pub id: $id,
            pub roaming_network: RoamingNetworkId,
            core: EntityCore,
        }

        impl $name {
            pub(crate) fn new(
                id: $id,
                roaming_network: RoamingNetworkId,
                draft: EntityDraft,
                history_capacity: usize,
            ) -> Self {
                Self {
                    id,
                    roaming_network,
                    core: EntityCore::new(draft, history_capacity),
                }
            }
        }

        impl Entity for $name {
            fn kind(&self) -> EntityKind {
                $kind
            }

            fn id_text(&self) -> String {
                self.id.to_string()
            }

            fn core(&self) -> &EntityCore {
                &self.core
            }
        }
    };
}

organisation!(
    /// Operator of the electricity grid a roaming network's infrastructure hangs off
    GridOperator,
    GridOperatorId,
    EntityKind::GridOperator
);
organisation!(ParkingOperator, ParkingOperatorId, EntityKind::ParkingOperator);
organisation!(
    /// A municipality participating in the roaming network
    SmartCityProxy,
    SmartCityId,
    EntityKind::SmartCityProxy
);
