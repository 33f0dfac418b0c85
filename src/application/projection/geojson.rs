//! GeoJSON Features and FeatureCollections

use std::sync::Arc;

use serde_json::{json, Value};

use super::json::{Document, Projectable};
use super::policy::Traversal;
use super::{Projection, ProjectionEngine};
use crate::domain::{GeoCoordinate, RoamingNetwork};
use crate::support::pagination::{Paged, Window};

/// `{type: "Point", coordinates: [lon, lat]}`
pub fn point(coordinate: &GeoCoordinate) -> Value {
    json!({
        "type": "Point",
        "coordinates": [coordinate.longitude, coordinate.latitude],
    })
}

impl ProjectionEngine {
    /// Feature of one entity; geometry only when it has a coordinate.
    pub fn feature<E: Projectable>(&self, network: &RoamingNetwork, entity: &E) -> Value {
        let renderer = self.renderer(network);
        feature_of(entity, entity.project(&renderer, Traversal::Root))
    }

    /// FeatureCollection over the windowed `items`
    pub fn feature_collection<E: Projectable>(
        &self,
        network: &RoamingNetwork,
        items: Vec<Arc<E>>,
        window: Window,
        properties: Option<Document>,
    ) -> Projection {
        let page = Paged::from_all(items, window);
        let renderer = self.renderer(network);
        let features: Vec<Value> = page
            .items
            .iter()
            .map(|item| feature_of(item.as_ref(), item.project(&renderer, Traversal::Root)))
            .collect();

        Projection {
            document: json!({
                "type": "FeatureCollection",
                "properties": Value::Object(properties.unwrap_or_default()),
                "features": features,
            }),
            total: page.total,
        }
    }
}

fn feature_of<E: Projectable + ?Sized>(entity: &E, properties: Document) -> Value {
    let mut feature = json!({
        "type": "Feature",
        "id": entity.id_text(),
        "properties": Value::Object(properties),
    });
    if let Some(coordinate) = &entity.core().coordinate {
        feature["geometry"] = point(coordinate);
    }
    feature
}

#[cfg(test)]
mod tests {
    use super::super::test_support::sample_network;
    use super::*;

    #[test]
    fn feature_carries_lon_lat_geometry() {
        let rn = sample_network();
        let pool = rn.charging_pools().remove(0);
        let feature = ProjectionEngine::default().feature(&rn, pool.as_ref());

        assert_eq!(feature["type"], json!("Feature"));
        assert_eq!(feature["id"], json!("DE*GEF*P1111"));
        assert_eq!(feature["geometry"]["coordinates"], json!([10.14, 49.73]));
        assert_eq!(feature["properties"]["ChargingPoolId"], json!("DE*GEF*P1111"));
    }

    #[test]
    fn feature_without_coordinate_has_no_geometry() {
        let rn = sample_network();
        let station = rn.charging_stations().remove(0);
        let feature = ProjectionEngine::default().feature(&rn, station.as_ref());
        assert!(feature.get("geometry").is_none());
    }

    #[test]
    fn collection_uses_caller_properties() {
        let rn = sample_network();
        let mut properties = Document::new();
        properties.insert("roamingNetworkId".into(), json!("TEST_RN1"));

        let projection =
            ProjectionEngine::default().feature_collection(&rn, rn.charging_pools(), Window::all(), Some(properties));
        assert_eq!(projection.total, 1);
        assert_eq!(projection.document["type"], json!("FeatureCollection"));
        assert_eq!(projection.document["properties"]["roamingNetworkId"], json!("TEST_RN1"));
        assert_eq!(projection.document["features"].as_array().map(Vec::len), Some(1));

        let empty = ProjectionEngine::default().feature_collection(&rn, rn.charging_pools(), Window::new(5, None), None);
        assert_eq!(empty.document["properties"], json!({}));
        assert_eq!(empty.document["features"], json!([]));
        assert_eq!(empty.total, 1);
    }
}
