//! Registry request metrics
//!
//! `registry_requests_total{verb, kind, status}` and
//! `registry_request_duration_seconds{verb, kind}`. `verb` is the method as
//! sent (`COUNT`, `CREATE`, `SET` included); `kind` is the entity kind the
//! route addresses, taken from the route template so ids never become
//! labels.

use std::time::Instant;

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};

use crate::interfaces::http::common::RequestVerb;

pub const REQUESTS_TOTAL: &str = "registry_requests_total";
pub const REQUEST_DURATION: &str = "registry_request_duration_seconds";

const UNMATCHED: &str = "unmatched";

pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let verb = request
        .extensions()
        .get::<RequestVerb>()
        .map(|verb| verb.0.to_string())
        .unwrap_or_else(|| request.method().to_string());
    let kind = request
        .extensions()
        .get::<MatchedPath>()
        .map_or(UNMATCHED, |matched| entity_kind(matched.as_str()));

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    metrics::counter!(REQUESTS_TOTAL, "verb" => verb.clone(), "kind" => kind, "status" => status).increment(1);
    metrics::histogram!(REQUEST_DURATION, "verb" => verb, "kind" => kind).record(duration);

    response
}

/// Entity kind addressed by a route template
pub fn entity_kind(template: &str) -> &'static str {
    let mut segments = template.trim_start_matches('/').split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some("RNs"), _, None) => "roaming_network",
        (Some("RNs"), _, Some("{property}")) => "property",
        (Some("RNs"), _, Some(collection)) => collection_kind(collection),
        (Some("health"), _, _) => "health",
        (Some("metrics"), _, _) => "metrics",
        _ => "other",
    }
}

fn collection_kind(collection: &str) -> &'static str {
    match collection {
        "ChargingStationOperators" => "charging_station_operator",
        "GridOperators" => "grid_operator",
        "ParkingOperators" => "parking_operator",
        "SmartCities" => "smart_city",
        "Brands" => "brand",
        "ChargingPools" => "charging_pool",
        "ChargingStations" => "charging_station",
        "EVSEs" => "evse",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Method, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    use crate::application::{EntityStore, StoreSettings};
    use crate::config::ApiConfig;
    use crate::interfaces::http::router::{create_app, AppState};

    #[test]
    fn templates_map_to_entity_kinds() {
        assert_eq!(entity_kind("/RNs"), "roaming_network");
        assert_eq!(entity_kind("/RNs/{roaming_network_id}"), "roaming_network");
        assert_eq!(entity_kind("/RNs/{roaming_network_id}/{property}"), "property");
        assert_eq!(entity_kind("/RNs/{roaming_network_id}/ChargingPools/Status"), "charging_pool");
        assert_eq!(entity_kind("/RNs/{roaming_network_id}/EVSEs/{id}/AdminStatus"), "evse");
        assert_eq!(
            entity_kind("/RNs/{roaming_network_id}/ChargingStationOperators/{operator_id}"),
            "charging_station_operator"
        );
        assert_eq!(entity_kind("/health"), "health");
        assert_eq!(entity_kind("/docs/{*rest}"), "other");
    }

    #[test]
    fn requests_are_labelled_by_sent_verb_and_kind() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let app = create_app(
            AppState::new(EntityStore::shared(StoreSettings::default()), ApiConfig::default()),
            None,
        );
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();

        metrics::with_local_recorder(&recorder, || {
            runtime.block_on(async {
                for (verb, uri) in [("CREATE", "/RNs/TEST_RN1"), ("COUNT", "/RNs/TEST_RN1/ChargingPools")] {
                    let request = Request::builder()
                        .method(Method::from_bytes(verb.as_bytes()).unwrap())
                        .uri(uri)
                        .header(header::HOST, "api.example.org")
                        .body(Body::empty())
                        .unwrap();
                    let response = app.clone().oneshot(request).await.unwrap();
                    assert!(response.status().is_success());
                }
                let missing = Request::builder()
                    .uri("/RNs/UNKNOWN/EVSEs")
                    .header(header::HOST, "api.example.org")
                    .body(Body::empty())
                    .unwrap();
                let response = app.clone().oneshot(missing).await.unwrap();
                assert_eq!(response.status(), StatusCode::NOT_FOUND);
            })
        });

        let rendered = handle.render();
        let counted = |labels: &[&str]| {
            rendered
                .lines()
                .filter(|line| line.starts_with(REQUESTS_TOTAL))
                .any(|line| labels.iter().all(|label| line.contains(label)))
        };
        assert!(counted(&[r#"verb="CREATE""#, r#"kind="roaming_network""#, r#"status="201""#]));
        assert!(counted(&[r#"verb="COUNT""#, r#"kind="charging_pool""#, r#"status="200""#]));
        assert!(counted(&[r#"verb="GET""#, r#"kind="evse""#, r#"status="404""#]));
        assert!(!rendered.contains("TEST_RN1"));
    }
}
