//! Prometheus scrape endpoint

use axum::{extract::State, http::header, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::application::{EntityStore, SharedEntityStore};

pub const INVENTORY: &str = "registry_entities";

/// State of the `/metrics` route
#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
    pub store: SharedEntityStore,
}

/// `GET /metrics`: request metrics plus the current inventory
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    record_inventory(&state.store);
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}

/// Set `registry_entities{kind}` to the number of entities of each kind
/// across all scopes.
pub fn record_inventory(store: &EntityStore) {
    let networks = store.all_networks();
    let (mut operators, mut pools, mut stations, mut evses) = (0, 0, 0, 0);
    for network in &networks {
        operators += network.charging_station_operators().len();
        pools += network.charging_pools().len();
        stations += network.charging_stations().len();
        evses += network.evses().len();
    }

    for (kind, count) in [
        ("roaming_network", networks.len()),
        ("charging_station_operator", operators),
        ("charging_pool", pools),
        ("charging_station", stations),
        ("evse", evses),
    ] {
        metrics::gauge!(INVENTORY, "kind" => kind).set(count as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    use crate::application::{HostScope, StoreSettings};
    use crate::domain::{ChargingPoolDraft, ChargingPoolId, ChargingStationOperatorDraft, ChargingStationOperatorId, RoamingNetworkId};

    #[test]
    fn inventory_counts_every_scope() {
        let store = EntityStore::new(StoreSettings::default());
        for host in ["a.example.org", "b.example.org"] {
            let network = store
                .create(&HostScope::from_host(host), RoamingNetworkId::parse("TEST_RN1").unwrap(), None, None)
                .unwrap();
            let operator_id = ChargingStationOperatorId::parse("DE*GEF").unwrap();
            network
                .add_charging_station_operator(operator_id, ChargingStationOperatorDraft::default())
                .unwrap();
            network
                .create_charging_pool(ChargingPoolId::parse("DE*GEF*P1111").unwrap(), ChargingPoolDraft::default())
                .unwrap();
        }

        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || record_inventory(&store));

        let rendered = handle.render();
        assert!(rendered.contains(r#"registry_entities{kind="roaming_network"} 2"#));
        assert!(rendered.contains(r#"registry_entities{kind="charging_pool"} 2"#));
        assert!(rendered.contains(r#"registry_entities{kind="evse"} 0"#));
    }
}
