//! Roaming networks: the root of every infrastructure tree
//!
//! A network exclusively owns its operators and, through them, everything
//! below. Children only remember their ancestors' ids; the lookups here
//! resolve those ids back into entities.

use std::sync::Arc;

use tracing::info;

use super::brand::{Brand, BrandDraft};
use super::charging_pool::{ChargingPool, ChargingPoolDraft};
use super::charging_station::{ChargingStation, ChargingStationDraft};
use super::data_license::DataLicense;
use super::entity::{Entity, EntityCore, EntityDraft, EntityKind};
use super::evse::{Evse, EvseDraft};
use super::ids::{
    BrandId, ChargingPoolId, ChargingStationId, ChargingStationOperatorId, EvseId, GridOperatorId,
    ParkingOperatorId, RoamingNetworkId, SmartCityId,
};
use super::operators::{
    ChargingStationOperator, ChargingStationOperatorDraft, GridOperator, ParkingOperator, SmartCityProxy,
};
use super::registry::{Detach, OrderedRegistry};
use crate::support::errors::{DomainError, DomainResult};

const UNKNOWN_NETWORK: &str = "Unknown RoamingNetworkId!";

#[derive(Debug, Clone, Default)]
pub struct RoamingNetworkDraft {
    pub entity: EntityDraft,
    pub data_licenses: Vec<DataLicense>,
}

#[derive(Debug)]
pub struct RoamingNetwork {
    pub id: RoamingNetworkId,
    pub data_licenses: Vec<DataLicense>,
    core: EntityCore,
    operators: OrderedRegistry<ChargingStationOperatorId, ChargingStationOperator>,
    grid_operators: OrderedRegistry<GridOperatorId, GridOperator>,
    parking_operators: OrderedRegistry<ParkingOperatorId, ParkingOperator>,
    smart_cities: OrderedRegistry<SmartCityId, SmartCityProxy>,
}

impl RoamingNetwork {
    pub fn new(id: RoamingNetworkId, draft: RoamingNetworkDraft, history_capacity: usize) -> Self {
        Self {
            id,
            data_licenses: draft.data_licenses,
            core: EntityCore::new(draft.entity, history_capacity),
            operators: OrderedRegistry::new(),
            grid_operators: OrderedRegistry::new(),
            parking_operators: OrderedRegistry::new(),
            smart_cities: OrderedRegistry::new(),
        }
    }

    // ── Charging station operators ─────────────────────────────

    pub fn add_charging_station_operator(
        &self,
        id: ChargingStationOperatorId,
        draft: ChargingStationOperatorDraft,
    ) -> DomainResult<Arc<ChargingStationOperator>> {
        let capacity = self.core.history_capacity();
        let operator = self
            .operators
            .insert_new(id.clone(), || {
                ChargingStationOperator::new(id.clone(), self.id.clone(), draft, capacity)
            })
            .map_err(|r| r.into_error("ChargingStationOperatorId already exists!", UNKNOWN_NETWORK))?;

        info!(roaming_network_id = %self.id, operator_id = %id, "Charging station operator added");
        Ok(operator)
    }

    pub fn remove_charging_station_operator(
        &self,
        id: &ChargingStationOperatorId,
    ) -> DomainResult<Arc<ChargingStationOperator>> {
        self.operators
            .remove(id)
            .ok_or_else(|| DomainError::not_found("Unknown ChargingStationOperatorId!"))
    }

    pub fn charging_station_operator(&self, id: &ChargingStationOperatorId) -> Option<Arc<ChargingStationOperator>> {
        self.operators.get(id)
    }

    pub fn charging_station_operators(&self) -> Vec<Arc<ChargingStationOperator>> {
        self.operators.values()
    }

    fn operator_of(&self, id: &ChargingStationOperatorId) -> DomainResult<Arc<ChargingStationOperator>> {
        self.charging_station_operator(id)
            .ok_or_else(|| DomainError::not_found("Unknown ChargingStationOperatorId!"))
    }

    // ── Other organisations ────────────────────────────────────

    pub fn add_grid_operator(&self, id: GridOperatorId, draft: EntityDraft) -> DomainResult<Arc<GridOperator>> {
        let capacity = self.core.history_capacity();
        self.grid_operators
            .insert_new(id.clone(), || GridOperator::new(id.clone(), self.id.clone(), draft, capacity))
            .map_err(|r| r.into_error("GridOperatorId already exists!", UNKNOWN_NETWORK))
    }

    pub fn grid_operator(&self, id: &GridOperatorId) -> Option<Arc<GridOperator>> {
        self.grid_operators.get(id)
    }

    pub fn grid_operators(&self) -> Vec<Arc<GridOperator>> {
        self.grid_operators.values()
    }

    pub fn add_parking_operator(
        &self,
        id: ParkingOperatorId,
        draft: EntityDraft,
    ) -> DomainResult<Arc<ParkingOperator>> {
        let capacity = self.core.history_capacity();
        self.parking_operators
            .insert_new(id.clone(), || ParkingOperator::new(id.clone(), self.id.clone(), draft, capacity))
            .map_err(|r| r.into_error("ParkingOperatorId already exists!", UNKNOWN_NETWORK))
    }

    pub fn parking_operator(&self, id: &ParkingOperatorId) -> Option<Arc<ParkingOperator>> {
        self.parking_operators.get(id)
    }

    pub fn parking_operators(&self) -> Vec<Arc<ParkingOperator>> {
        self.parking_operators.values()
    }

    pub fn add_smart_city(&self, id: SmartCityId, draft: EntityDraft) -> DomainResult<Arc<SmartCityProxy>> {
        let capacity = self.core.history_capacity();
        self.smart_cities
            .insert_new(id.clone(), || SmartCityProxy::new(id.clone(), self.id.clone(), draft, capacity))
            .map_err(|r| r.into_error("SmartCityId already exists!", UNKNOWN_NETWORK))
    }

    pub fn smart_city(&self, id: &SmartCityId) -> Option<Arc<SmartCityProxy>> {
        self.smart_cities.get(id)
    }

    pub fn smart_cities(&self) -> Vec<Arc<SmartCityProxy>> {
        self.smart_cities.values()
    }

    // ── Lookups below the operators ────────────────────────────

    pub fn brand(&self, id: &BrandId) -> Option<Arc<Brand>> {
        self.charging_station_operator(id.operator_id())?.brand(id)
    }

    pub fn charging_pool(&self, id: &ChargingPoolId) -> Option<Arc<ChargingPool>> {
        self.charging_station_operator(id.operator_id())?.charging_pool(id)
    }

    pub fn charging_station(&self, id: &ChargingStationId) -> Option<Arc<ChargingStation>> {
        self.charging_station_operator(id.operator_id())?
            .charging_pools()
            .iter()
            .find_map(|pool| pool.charging_station(id))
    }

    pub fn evse(&self, id: &EvseId) -> Option<Arc<Evse>> {
        self.charging_station_operator(id.operator_id())?
            .charging_pools()
            .iter()
            .flat_map(|pool| pool.charging_stations())
            .find_map(|station| station.evse(id))
    }

    pub fn brands(&self) -> Vec<Arc<Brand>> {
        self.operators
            .values()
            .iter()
            .flat_map(|operator| operator.brands())
            .collect()
    }

    /// All pools: operator order, then creation order within each operator
    pub fn charging_pools(&self) -> Vec<Arc<ChargingPool>> {
        self.operators
            .values()
            .iter()
            .flat_map(|operator| operator.charging_pools())
            .collect()
    }

    pub fn charging_stations(&self) -> Vec<Arc<ChargingStation>> {
        self.charging_pools()
            .iter()
            .flat_map(|pool| pool.charging_stations())
            .collect()
    }

    pub fn evses(&self) -> Vec<Arc<Evse>> {
        self.charging_stations()
            .iter()
            .flat_map(|station| station.evses())
            .collect()
    }

    // ── Creation/removal addressed by full child ids ───────────

    pub fn add_brand(&self, id: BrandId, draft: BrandDraft) -> DomainResult<Arc<Brand>> {
        self.operator_of(id.operator_id())?.add_brand(id, draft)
    }

    pub fn create_charging_pool(&self, id: ChargingPoolId, draft: ChargingPoolDraft) -> DomainResult<Arc<ChargingPool>> {
        self.operator_of(id.operator_id())?.add_charging_pool(id, draft)
    }

    pub fn create_charging_station(
        &self,
        pool_id: &ChargingPoolId,
        id: ChargingStationId,
        draft: ChargingStationDraft,
    ) -> DomainResult<Arc<ChargingStation>> {
        let operator = self.operator_of(pool_id.operator_id())?;
        let pool = operator
            .charging_pool(pool_id)
            .ok_or_else(|| DomainError::not_found("Unknown ChargingPoolId!"))?;
        operator.check_brands(&draft.brand_ids)?;
        pool.add_charging_station(id, draft)
    }

    pub fn create_evse(
        &self,
        station_id: &ChargingStationId,
        id: EvseId,
        draft: EvseDraft,
    ) -> DomainResult<Arc<Evse>> {
        let operator = self.operator_of(station_id.operator_id())?;
        let station = self
            .charging_station(station_id)
            .ok_or_else(|| DomainError::not_found("Unknown ChargingStationId!"))?;
        operator.check_brands(&draft.brand_ids)?;
        station.add_evse(id, draft)
    }

    pub fn delete_charging_pool(&self, id: &ChargingPoolId) -> DomainResult<Arc<ChargingPool>> {
        self.operator_of(id.operator_id())
            .map_err(|_| DomainError::not_found("Unknown ChargingPoolId!"))?
            .remove_charging_pool(id)
    }

    pub fn delete_charging_station(&self, id: &ChargingStationId) -> DomainResult<Arc<ChargingStation>> {
        let unknown = || DomainError::not_found("Unknown ChargingStationId!");
        let station = self.charging_station(id).ok_or_else(unknown)?;
        self.charging_pool(&station.charging_pool)
            .ok_or_else(unknown)?
            .remove_charging_station(id)
    }

    pub fn delete_evse(&self, id: &EvseId) -> DomainResult<Arc<Evse>> {
        let unknown = || DomainError::not_found("Unknown EVSEId!");
        let evse = self.evse(id).ok_or_else(unknown)?;
        self.charging_station(&evse.charging_station)
            .ok_or_else(unknown)?
            .remove_evse(id)
    }
}

impl Detach for RoamingNetwork {
    fn detach(&self) {
        self.operators.detach_all();
        self.grid_operators.close();
        self.parking_operators.close();
        self.smart_cities.close();
    }
}

impl Entity for RoamingNetwork {
    fn kind(&self) -> EntityKind {
        EntityKind::RoamingNetwork
    }

    fn id_text(&self) -> String {
        self.id.to_string()
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::evse::{PlugType, SocketOutletDraft};
    use crate::domain::ids::SocketOutletId;

    fn network() -> RoamingNetwork {
        RoamingNetwork::new(
            RoamingNetworkId::parse("TEST_RN1").unwrap(),
            RoamingNetworkDraft::default(),
            10,
        )
    }

    fn operator_id() -> ChargingStationOperatorId {
        ChargingStationOperatorId::parse("DE*GEF").unwrap()
    }

    fn populated() -> RoamingNetwork {
        let rn = network();
        let op = rn
            .add_charging_station_operator(operator_id(), Default::default())
            .unwrap();
        let pool = op
            .add_charging_pool(ChargingPoolId::new(&operator_id(), "1111").unwrap(), Default::default())
            .unwrap();
        let station = pool
            .add_charging_station(ChargingStationId::new(&operator_id(), "1111").unwrap(), Default::default())
            .unwrap();
        station
            .add_evse(EvseId::new(&operator_id(), "1111*1").unwrap(), Default::default())
            .unwrap();
        rn
    }

    #[test]
    fn children_keep_their_ancestor_ids() {
        let rn = populated();
        let evse = rn.evse(&EvseId::parse("DE*GEF*E1111*1").unwrap()).unwrap();
        assert_eq!(evse.roaming_network, rn.id);
        assert_eq!(evse.charging_pool.to_string(), "DE*GEF*P1111");
        assert_eq!(evse.charging_station.to_string(), "DE*GEF*S1111");
    }

    #[test]
    fn duplicate_child_ids_conflict() {
        let rn = populated();
        let op = rn.charging_station_operator(&operator_id()).unwrap();
        let again = op.add_charging_pool(ChargingPoolId::new(&operator_id(), "1111").unwrap(), Default::default());
        assert!(matches!(again, Err(DomainError::Conflict(_))));
        assert_eq!(rn.charging_pools().len(), 1);
    }

    #[test]
    fn child_of_foreign_operator_is_rejected() {
        let rn = populated();
        let pool = rn.charging_pool(&ChargingPoolId::parse("DE*GEF*P1111").unwrap()).unwrap();
        let foreign = ChargingStationId::parse("DE*XYZ*S1").unwrap();
        assert!(matches!(
            pool.add_charging_station(foreign, Default::default()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn pool_under_unknown_operator_is_not_found() {
        let rn = network();
        let result = rn.create_charging_pool(ChargingPoolId::parse("DE*GEF*P1").unwrap(), Default::default());
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[test]
    fn unknown_brand_is_rejected_before_linking() {
        let rn = populated();
        let mut draft = ChargingStationDraft::default();
        draft.brand_ids.push(BrandId::parse("DE*GEF*BX").unwrap());
        let result = rn.create_charging_station(
            &ChargingPoolId::parse("DE*GEF*P1111").unwrap(),
            ChargingStationId::parse("DE*GEF*S2222").unwrap(),
            draft,
        );
        assert!(matches!(result, Err(DomainError::NotFound(_))));
        assert_eq!(rn.charging_stations().len(), 1);
    }

    #[test]
    fn deleting_a_station_removes_its_evses() {
        let rn = populated();
        rn.delete_charging_station(&ChargingStationId::parse("DE*GEF*S1111").unwrap())
            .unwrap();
        assert!(rn.evses().is_empty());
        assert!(rn.evse(&EvseId::parse("DE*GEF*E1111*1").unwrap()).is_none());
    }

    #[test]
    fn socket_outlets_are_unique_per_evse() {
        let rn = populated();
        let evse = rn.evses().pop().unwrap();
        let draft = SocketOutletDraft {
            plug: PlugType::Type2Outlet,
            ..Default::default()
        };
        evse.add_socket_outlet(SocketOutletId::new(1).unwrap(), draft.clone()).unwrap();
        assert!(evse.add_socket_outlet(SocketOutletId::new(1).unwrap(), draft).is_err());
        assert_eq!(evse.socket_outlets().len(), 1);
    }

    #[test]
    fn creation_under_a_removed_pool_is_refused() {
        let rn = populated();
        let pool_id = ChargingPoolId::parse("DE*GEF*P1111").unwrap();
        let pool = rn.charging_pool(&pool_id).unwrap();
        rn.delete_charging_pool(&pool_id).unwrap();

        let late = pool.add_charging_station(ChargingStationId::parse("DE*GEF*S2222").unwrap(), Default::default());
        assert_eq!(late.unwrap_err(), DomainError::not_found("Unknown ChargingPoolId!"));
        assert!(rn.charging_stations().is_empty());
    }

    #[test]
    fn removing_an_operator_detaches_everything_below() {
        let rn = populated();
        let station = rn.charging_station(&ChargingStationId::parse("DE*GEF*S1111").unwrap()).unwrap();
        let evse = rn.evses().pop().unwrap();
        rn.remove_charging_station_operator(&operator_id()).unwrap();

        assert!(matches!(
            station.add_evse(EvseId::parse("DE*GEF*E1111*2").unwrap(), Default::default()),
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            evse.add_socket_outlet(SocketOutletId::new(1).unwrap(), Default::default()),
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            rn.add_charging_station_operator(operator_id(), Default::default()),
            Ok(_)
        ));
        assert!(rn.evses().is_empty());
    }

    #[test]
    fn duplicate_socket_outlets_in_a_draft_are_rejected() {
        let rn = populated();
        let outlet = (SocketOutletId::new(1).unwrap(), SocketOutletDraft::default());
        let draft = EvseDraft {
            socket_outlets: vec![outlet.clone(), outlet],
            ..Default::default()
        };
        let result = rn.create_evse(
            &ChargingStationId::parse("DE*GEF*S1111").unwrap(),
            EvseId::parse("DE*GEF*E1111*2").unwrap(),
            draft,
        );
        assert_eq!(result.unwrap_err(), DomainError::validation("Duplicate SocketOutletId!"));
        assert_eq!(rn.evses().len(), 1);
    }

    #[test]
    fn evses_are_never_visible_without_their_outlets() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let rn = populated();
        let station_id = ChargingStationId::parse("DE*GEF*S1111").unwrap();
        let done = AtomicBool::new(false);

        std::thread::scope(|scope| {
            let reader = scope.spawn(|| {
                let mut incomplete = 0;
                while !done.load(Ordering::SeqCst) {
                    incomplete += rn
                        .evses()
                        .iter()
                        .skip(1)
                        .filter(|evse| evse.socket_outlets().len() != 2)
                        .count();
                }
                incomplete
            });

            for n in 0..500 {
                let draft = EvseDraft {
                    socket_outlets: vec![
                        (SocketOutletId::new(1).unwrap(), SocketOutletDraft::default()),
                        (SocketOutletId::new(2).unwrap(), SocketOutletDraft::default()),
                    ],
                    ..Default::default()
                };
                let id = EvseId::new(&operator_id(), &format!("2222*{}", n)).unwrap();
                rn.create_evse(&station_id, id, draft).unwrap();
            }
            done.store(true, Ordering::SeqCst);

            assert_eq!(reader.join().unwrap(), 0);
        });
        assert_eq!(rn.evses().len(), 501);
    }
}

