//! JSON documents for every entity kind

use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{json, Map, Value};

use super::policy::{Direction, ExpandMode, ExpansionPolicy, Relation, Traversal};
use super::PropertyCreators;
use crate::domain::status::{StatusSchedule, StatusValue, Timestamped};
use crate::domain::{
    Brand, BrandId, ChargingPool, ChargingStation, ChargingStationOperator, DataLicense, Entity, Evse,
    GridOperator, ParkingOperator, RoamingNetwork, SmartCityProxy, SocketOutlet,
};

pub type Document = Map<String, Value>;

/// Rendering context: the network back-references resolve against, the
/// caller's policy and the status history size.
pub struct Renderer<'a> {
    pub(super) network: &'a RoamingNetwork,
    pub(super) policy: &'a ExpansionPolicy,
    pub(super) history_size: usize,
    pub(super) creators: &'a PropertyCreators,
}

/// Entities the projection engine can render
pub trait Projectable: Entity {
    fn project(&self, renderer: &Renderer<'_>, traversal: Traversal) -> Document;
}

impl Renderer<'_> {
    /// Fields every entity document starts with
    fn base<E: Entity + ?Sized>(&self, entity: &E) -> Document {
        let core = entity.core();
        let mut doc = Document::new();
        doc.insert(entity.kind().id_field().to_string(), Value::String(entity.id_text()));
        if !core.name.is_empty() {
            doc.insert("name".into(), core.name.to_json());
        }
        doc.insert("description".into(), core.description.to_json());
        if let Some(coordinate) = &core.coordinate {
            let mut location = json!({
                "lat": coordinate.latitude,
                "lng": coordinate.longitude,
            });
            if let Some(altitude) = coordinate.altitude {
                location["alt"] = json!(altitude);
            }
            doc.insert("geoLocation".into(), location);
        }
        self.history(&mut doc, "adminStatus", &core.admin_status);
        self.history(&mut doc, "status", &core.status);
        doc
    }

    fn history<T: StatusValue>(&self, doc: &mut Document, key: &str, schedule: &StatusSchedule<T>) {
        if self.history_size == 0 {
            return;
        }
        let entries = schedule.history(self.history_size);
        if !entries.is_empty() {
            doc.insert(key.to_string(), history_json(&entries));
        }
    }

    fn single(
        &self,
        doc: &mut Document,
        relation: Relation,
        direction: Direction,
        traversal: Traversal,
        id: String,
        expand: impl FnOnce(Traversal) -> Option<Document>,
    ) {
        let keys = relation.keys();
        let embedded = match self.policy.effective(relation, direction, traversal) {
            ExpandMode::Hidden => return,
            ExpandMode::IdOnly => None,
            ExpandMode::Expand => expand(traversal.enter(direction)),
        };
        match embedded {
            Some(embedded) => doc.insert(keys.one.to_string(), Value::Object(embedded)),
            // Parent vanished between lookups, fall back to its id
            None => doc.insert(format!("{}Id", keys.one), Value::String(id)),
        };
    }

    #[allow(clippy::too_many_arguments)]
    fn many<T>(
        &self,
        doc: &mut Document,
        relation: Relation,
        direction: Direction,
        traversal: Traversal,
        items: &[T],
        id_of: impl Fn(&T) -> String,
        expand: impl Fn(&T, Traversal) -> Document,
    ) {
        if items.is_empty() {
            return;
        }
        let keys = relation.keys();
        match self.policy.effective(relation, direction, traversal) {
            ExpandMode::Hidden => {}
            ExpandMode::IdOnly => {
                let ids = items.iter().map(|item| Value::String(id_of(item))).collect();
                doc.insert(format!("{}Ids", keys.one), Value::Array(ids));
            }
            ExpandMode::Expand => {
                let next = traversal.enter(direction);
                let documents = items.iter().map(|item| Value::Object(expand(item, next))).collect();
                doc.insert(keys.many.to_string(), Value::Array(documents));
            }
        }
    }

    fn children<E: Projectable>(
        &self,
        doc: &mut Document,
        relation: Relation,
        traversal: Traversal,
        items: &[Arc<E>],
    ) {
        self.many(
            doc,
            relation,
            Direction::Owned,
            traversal,
            items,
            |item| item.id_text(),
            |item, next| item.project(self, next),
        );
    }

    fn parent<E: Projectable>(
        &self,
        doc: &mut Document,
        relation: Relation,
        traversal: Traversal,
        id: String,
        lookup: impl FnOnce() -> Option<Arc<E>>,
    ) {
        self.single(doc, relation, Direction::BackReference, traversal, id, |next| {
            lookup().map(|parent| parent.project(self, next))
        });
    }

    fn network_ref(&self, doc: &mut Document, traversal: Traversal) {
        self.single(
            doc,
            Relation::RoamingNetwork,
            Direction::BackReference,
            traversal,
            self.network.id.to_string(),
            |next| Some(self.network.project(self, next)),
        );
    }

    fn brand_refs(&self, doc: &mut Document, traversal: Traversal, ids: &[BrandId]) {
        self.many(
            doc,
            Relation::Brand,
            Direction::Leaf,
            traversal,
            ids,
            |id| id.to_string(),
            |id, _| match self.network.brand(id) {
                Some(brand) => brand_document(&brand),
                None => {
                    let mut doc = Document::new();
                    doc.insert("BrandId".into(), Value::String(id.to_string()));
                    doc
                }
            },
        );
    }

    fn licenses(&self, doc: &mut Document, traversal: Traversal, licenses: &[DataLicense]) {
        self.many(
            doc,
            Relation::DataLicense,
            Direction::Leaf,
            traversal,
            licenses,
            |license| license.id().to_string(),
            |license, _| license_document(license),
        );
    }
}

pub fn brand_document(brand: &Brand) -> Document {
    let mut doc = Document::new();
    doc.insert("BrandId".into(), Value::String(brand.id.to_string()));
    if !brand.name.is_empty() {
        doc.insert("name".into(), brand.name.to_json());
    }
    text(&mut doc, "logo", brand.logo.as_deref());
    text(&mut doc, "homepage", brand.homepage.as_deref());
    doc
}

pub fn license_document(license: &DataLicense) -> Document {
    let mut doc = Document::new();
    doc.insert("DataLicenseId".into(), Value::String(license.id().to_string()));
    doc.insert("description".into(), Value::String(license.description().to_string()));
    if !license.urls().is_empty() {
        doc.insert("urls".into(), json!(license.urls()));
    }
    doc
}

/// `[{timestamp, value}, ...]`, newest first
pub fn history_json<T: StatusValue>(entries: &[Timestamped<T>]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|entry| {
                json!({
                    "timestamp": entry.timestamp.to_rfc3339(),
                    "value": entry.value.label(),
                })
            })
            .collect(),
    )
}

fn text(doc: &mut Document, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        doc.insert(key.to_string(), Value::String(value.to_string()));
    }
}

/// Two-decimal text, only for positive values
fn quantity(doc: &mut Document, key: &str, value: Option<Decimal>) {
    if let Some(value) = value.filter(|v| *v > Decimal::ZERO) {
        let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        doc.insert(key.to_string(), Value::String(rounded.to_string()));
    }
}

impl Projectable for RoamingNetwork {
    fn project(&self, r: &Renderer<'_>, traversal: Traversal) -> Document {
        if let Some(create) = &r.creators.roaming_network {
            return create(self);
        }
        let mut doc = r.base(self);
        r.licenses(&mut doc, traversal, &self.data_licenses);
        r.children(&mut doc, Relation::Operator, traversal, &self.charging_station_operators());
        r.children(&mut doc, Relation::GridOperator, traversal, &self.grid_operators());
        r.children(&mut doc, Relation::ParkingOperator, traversal, &self.parking_operators());
        r.children(&mut doc, Relation::SmartCity, traversal, &self.smart_cities());
        doc
    }
}

impl Projectable for ChargingStationOperator {
    fn project(&self, r: &Renderer<'_>, traversal: Traversal) -> Document {
        if let Some(create) = &r.creators.charging_station_operator {
            return create(self);
        }
        let mut doc = r.base(self);
        r.network_ref(&mut doc, traversal);
        text(&mut doc, "homepage", self.homepage.as_deref());
        r.licenses(&mut doc, traversal, &self.data_licenses);
        r.many(
            &mut doc,
            Relation::Brand,
            Direction::Leaf,
            traversal,
            &self.brands(),
            |brand| brand.id.to_string(),
            |brand, _| brand_document(brand),
        );
        r.children(&mut doc, Relation::ChargingPool, traversal, &self.charging_pools());
        doc
    }
}

macro_rules! organisation_projection {
    ($($entity:ty),*) => {$(
        impl Projectable for $entity {
            fn project(&self, r: &Renderer<'_>, traversal: Traversal) -> Document {
                let mut doc = r.base(self);
                r.network_ref(&mut doc, traversal);
                doc
            }
        }
    )*};
}

organisation_projection!(GridOperator, ParkingOperator, SmartCityProxy);

impl Projectable for ChargingPool {
    fn project(&self, r: &Renderer<'_>, traversal: Traversal) -> Document {
        if let Some(create) = &r.creators.charging_pool {
            return create(self);
        }
        let operator_id = self.id.operator_id();
        let mut doc = r.base(self);
        r.network_ref(&mut doc, traversal);
        r.parent(&mut doc, Relation::Operator, traversal, operator_id.to_string(), || {
            r.network.charging_station_operator(operator_id)
        });
        text(&mut doc, "address", self.address.as_deref());
        quantity(&mut doc, "maxPower", self.max_power);
        r.licenses(&mut doc, traversal, &self.data_licenses);
        r.brand_refs(&mut doc, traversal, &self.brand_ids);
        r.children(&mut doc, Relation::ChargingStation, traversal, &self.charging_stations());
        doc
    }
}

impl Projectable for ChargingStation {
    fn project(&self, r: &Renderer<'_>, traversal: Traversal) -> Document {
        if let Some(create) = &r.creators.charging_station {
            return create(self);
        }
        let operator_id = self.id.operator_id();
        let mut doc = r.base(self);
        r.network_ref(&mut doc, traversal);
        r.parent(&mut doc, Relation::Operator, traversal, operator_id.to_string(), || {
            r.network.charging_station_operator(operator_id)
        });
        r.parent(&mut doc, Relation::ChargingPool, traversal, self.charging_pool.to_string(), || {
            r.network.charging_pool(&self.charging_pool)
        });
        quantity(&mut doc, "maxPower", self.max_power);
        r.brand_refs(&mut doc, traversal, &self.brand_ids);
        r.children(&mut doc, Relation::Evse, traversal, &self.evses());
        doc
    }
}

impl Projectable for Evse {
    fn project(&self, r: &Renderer<'_>, traversal: Traversal) -> Document {
        if let Some(create) = &r.creators.evse {
            return create(self);
        }
        let operator_id = self.id.operator_id();
        let mut doc = r.base(self);
        r.network_ref(&mut doc, traversal);
        r.parent(&mut doc, Relation::Operator, traversal, operator_id.to_string(), || {
            r.network.charging_station_operator(operator_id)
        });
        r.parent(&mut doc, Relation::ChargingPool, traversal, self.charging_pool.to_string(), || {
            r.network.charging_pool(&self.charging_pool)
        });
        r.parent(
            &mut doc,
            Relation::ChargingStation,
            traversal,
            self.charging_station.to_string(),
            || r.network.charging_station(&self.charging_station),
        );
        quantity(&mut doc, "maxVoltage", self.max_voltage);
        quantity(&mut doc, "maxCurrent", self.max_current);
        quantity(&mut doc, "maxPower", self.max_power);
        quantity(&mut doc, "maxCapacity", self.max_capacity);
        r.brand_refs(&mut doc, traversal, &self.brand_ids);
        r.children(&mut doc, Relation::SocketOutlet, traversal, &self.socket_outlets());
        doc
    }
}

impl Projectable for SocketOutlet {
    fn project(&self, r: &Renderer<'_>, traversal: Traversal) -> Document {
        let mut doc = r.base(self);
        r.parent(&mut doc, Relation::Evse, traversal, self.evse.to_string(), || {
            r.network.evse(&self.evse)
        });
        doc.insert("plug".into(), Value::String(self.plug.as_str().to_string()));
        if let Some(attached) = self.cable_attached {
            doc.insert("cableAttached".into(), Value::Bool(attached));
        }
        quantity(&mut doc, "cableLength", self.cable_length);
        doc
    }
}
