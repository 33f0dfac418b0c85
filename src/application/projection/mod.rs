//! Rendering of entities and collections into JSON and GeoJSON
//!
//! The engine only reads. Given the same snapshot and the same policy it
//! produces the same document.

pub mod geojson;
pub mod json;
pub mod policy;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::status::StatusValue;
use crate::domain::{
    Brand, ChargingPool, ChargingStation, ChargingStationOperator, Entity, Evse, RoamingNetwork,
    StatusSchedule,
};
use crate::support::pagination::{Paged, Window};

pub use json::{Document, Projectable, Renderer};
pub use policy::{Direction, ExpandMode, ExpansionPolicy, Relation, Traversal};

/// Replaces the default document of one entity kind
pub type PropertyCreator<T> = Arc<dyn Fn(&T) -> Document + Send + Sync>;

/// Optional per-kind document builders
#[derive(Clone, Default)]
pub struct PropertyCreators {
    pub roaming_network: Option<PropertyCreator<RoamingNetwork>>,
    pub charging_station_operator: Option<PropertyCreator<ChargingStationOperator>>,
    pub charging_pool: Option<PropertyCreator<ChargingPool>>,
    pub charging_station: Option<PropertyCreator<ChargingStation>>,
    pub evse: Option<PropertyCreator<Evse>>,
}

impl fmt::Debug for PropertyCreators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyCreators")
            .field("roaming_network", &self.roaming_network.is_some())
            .field("charging_station_operator", &self.charging_station_operator.is_some())
            .field("charging_pool", &self.charging_pool.is_some())
            .field("charging_station", &self.charging_station.is_some())
            .field("evse", &self.evse.is_some())
            .finish()
    }
}

/// A rendered document plus the size of the collection it was cut from
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub document: Value,
    pub total: usize,
}

/// Which status history a status report lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Admin,
    Operational,
}

#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    policy: ExpansionPolicy,
    history_size: usize,
    creators: PropertyCreators,
}

impl Default for ProjectionEngine {
    fn default() -> Self {
        Self::new(ExpansionPolicy::default())
    }
}

impl ProjectionEngine {
    pub fn new(policy: ExpansionPolicy) -> Self {
        Self {
            policy,
            history_size: 1,
            creators: PropertyCreators::default(),
        }
    }

    pub fn with_history_size(mut self, history_size: usize) -> Self {
        self.history_size = history_size;
        self
    }

    pub fn with_property_creators(mut self, creators: PropertyCreators) -> Self {
        self.creators = creators;
        self
    }

    fn renderer<'a>(&'a self, network: &'a RoamingNetwork) -> Renderer<'a> {
        Renderer {
            network,
            policy: &self.policy,
            history_size: self.history_size,
            creators: &self.creators,
        }
    }

    /// One entity of `network` as a JSON object
    pub fn entity<E: Projectable>(&self, network: &RoamingNetwork, entity: &E) -> Value {
        Value::Object(entity.project(&self.renderer(network), Traversal::Root))
    }

    pub fn roaming_network(&self, network: &RoamingNetwork) -> Value {
        self.entity(network, network)
    }

    /// Networks already windowed by the store; each is its own lookup root.
    pub fn roaming_networks(&self, page: &Paged<Arc<RoamingNetwork>>) -> Projection {
        Projection {
            document: Value::Array(page.items.iter().map(|rn| self.roaming_network(rn)).collect()),
            total: page.total,
        }
    }

    /// Windowed JSON array over `items`, in their given order
    pub fn collection<E: Projectable>(&self, network: &RoamingNetwork, items: Vec<Arc<E>>, window: Window) -> Projection {
        let page = Paged::from_all(items, window);
        let renderer = self.renderer(network);
        Projection {
            document: Value::Array(
                page.items
                    .iter()
                    .map(|item| Value::Object(item.project(&renderer, Traversal::Root)))
                    .collect(),
            ),
            total: page.total,
        }
    }

    pub fn brand(&self, brand: &Brand) -> Value {
        Value::Object(json::brand_document(brand))
    }

    pub fn brands(&self, brands: Vec<Arc<Brand>>, window: Window) -> Projection {
        let page = Paged::from_all(brands, window);
        Projection {
            document: Value::Array(page.items.iter().map(|brand| self.brand(brand)).collect()),
            total: page.total,
        }
    }

    /// `{id: [{timestamp, value}, ...]}` for the windowed `items`. Entities
    /// without history are left out.
    pub fn status_report<E: Entity>(&self, items: Vec<Arc<E>>, window: Window, kind: StatusKind) -> Projection {
        let page = Paged::from_all(items, window);
        let size = self.history_size.max(1);
        let mut report = Document::new();
        for item in &page.items {
            let history = match kind {
                StatusKind::Admin => history_of(&item.core().admin_status, size),
                StatusKind::Operational => history_of(&item.core().status, size),
            };
            if let Some(history) = history {
                report.insert(item.id_text(), history);
            }
        }
        Projection {
            document: Value::Object(report),
            total: page.total,
        }
    }
}

fn history_of<T: StatusValue>(schedule: &StatusSchedule<T>, size: usize) -> Option<Value> {
    let entries = schedule.history(size);
    (!entries.is_empty()).then(|| json::history_json(&entries))
}

#[cfg(test)]
pub(crate) mod test_support {
    use rust_decimal::Decimal;

    use crate::domain::*;

    pub fn op() -> ChargingStationOperatorId {
        ChargingStationOperatorId::parse("DE*GEF").unwrap()
    }

    /// One of everything: network → operator (brand) → pool → station →
    /// EVSE → socket outlet, plus a grid operator.
    pub fn sample_network() -> RoamingNetwork {
        let rn = RoamingNetwork::new(
            RoamingNetworkId::parse("TEST_RN1").unwrap(),
            RoamingNetworkDraft {
                data_licenses: vec![DataLicense::OpenDatabaseLicense],
                ..Default::default()
            },
            10,
        );
        rn.add_grid_operator(GridOperatorId::parse("DE*GRD").unwrap(), EntityDraft::default())
            .unwrap();

        let operator = rn
            .add_charging_station_operator(
                op(),
                ChargingStationOperatorDraft {
                    entity: EntityDraft {
                        name: I18NText::create("de", "GraphDefined"),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
            .unwrap();
        let brand = BrandId::new(&op(), "01").unwrap();
        operator
            .add_brand(
                brand.clone(),
                BrandDraft {
                    name: I18NText::create("en", "Fast"),
                    ..Default::default()
                },
            )
            .unwrap();

        let pool = operator
            .add_charging_pool(
                ChargingPoolId::new(&op(), "1111").unwrap(),
                ChargingPoolDraft {
                    entity: EntityDraft {
                        coordinate: Some(GeoCoordinate::new(49.73, 10.14).unwrap()),
                        status: Some(OperationalStatus::Available),
                        ..Default::default()
                    },
                    brand_ids: vec![brand],
                    ..Default::default()
                },
            )
            .unwrap();
        let station = pool
            .add_charging_station(ChargingStationId::new(&op(), "1111").unwrap(), Default::default())
            .unwrap();
        let evse = station
            .add_evse(
                EvseId::new(&op(), "1111*1").unwrap(),
                EvseDraft {
                    max_power: Some(Decimal::new(22, 0)),
                    ..Default::default()
                },
            )
            .unwrap();
        evse.add_socket_outlet(
            SocketOutletId::new(1).unwrap(),
            SocketOutletDraft {
                plug: PlugType::Type2Outlet,
                ..Default::default()
            },
        )
        .unwrap();
        rn
    }
}
