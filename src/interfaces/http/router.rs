//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, put};
use axum::{middleware, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::util::MapRequest;
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::{normalize_method, ApiResult, CountResponse, EntityFields, ErrorBody, GeoLocationDto};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::{health, infrastructure, organisations, properties, roaming_networks};
use crate::application::{HostScope, SharedEntityStore};
use crate::config::ApiConfig;
use crate::domain::{RoamingNetwork, RoamingNetworkId};

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: SharedEntityStore,
    pub api: ApiConfig,
    pub started_at: Arc<Instant>,
}

impl AppState {
    pub fn new(store: SharedEntityStore, api: ApiConfig) -> Self {
        Self {
            store,
            api,
            started_at: Arc::new(Instant::now()),
        }
    }

    /// Resolve a roaming network id from the path within `scope`
    pub fn network(&self, scope: &HostScope, roaming_network_id: &str) -> ApiResult<Arc<RoamingNetwork>> {
        let id = RoamingNetworkId::parse(roaming_network_id)?;
        Ok(self.store.get(scope, &id)?)
    }
}

/// OpenAPI documentation. `CREATE`/`SET` appear as their `POST`/`PUT`
/// aliases; `COUNT` has no OpenAPI method and is left out.
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        roaming_networks::list_roaming_networks,
        roaming_networks::get_roaming_network,
        roaming_networks::create_roaming_network,
        roaming_networks::delete_roaming_network,
        properties::get_property,
        properties::set_property,
        organisations::list_charging_station_operators,
        organisations::get_charging_station_operator,
        organisations::create_charging_station_operator,
        organisations::delete_charging_station_operator,
        organisations::list_brands,
        organisations::get_brand,
        organisations::create_brand,
        organisations::list_grid_operators,
        organisations::get_grid_operator,
        organisations::create_grid_operator,
        organisations::list_parking_operators,
        organisations::get_parking_operator,
        organisations::create_parking_operator,
        organisations::list_smart_cities,
        organisations::get_smart_city,
        organisations::create_smart_city,
        infrastructure::list_charging_pools,
        infrastructure::get_charging_pool,
        infrastructure::create_charging_pool,
        infrastructure::delete_charging_pool,
        infrastructure::charging_pools_admin_status,
        infrastructure::charging_pools_status,
        infrastructure::set_charging_pool_admin_status,
        infrastructure::set_charging_pool_status,
        infrastructure::list_charging_stations,
        infrastructure::get_charging_station,
        infrastructure::create_charging_station,
        infrastructure::delete_charging_station,
        infrastructure::charging_stations_admin_status,
        infrastructure::charging_stations_status,
        infrastructure::set_charging_station_admin_status,
        infrastructure::set_charging_station_status,
        infrastructure::list_evses,
        infrastructure::get_evse,
        infrastructure::create_evse,
        infrastructure::delete_evse,
        infrastructure::evses_admin_status,
        infrastructure::evses_status,
        infrastructure::set_evse_admin_status,
        infrastructure::set_evse_status,
    ),
    components(
        schemas(
            ErrorBody,
            CountResponse,
            EntityFields,
            GeoLocationDto,
            health::HealthResponse,
            roaming_networks::CreateRoamingNetworkRequest,
            properties::SetPropertyRequest,
            organisations::CreateChargingStationOperatorRequest,
            organisations::CreateOrganisationRequest,
            organisations::CreateBrandRequest,
            infrastructure::CreateChargingPoolRequest,
            infrastructure::CreateChargingStationRequest,
            infrastructure::CreateEvseRequest,
            infrastructure::SocketOutletRequest,
            infrastructure::SetStatusRequest,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Roaming Networks", description = "Roaming networks of the request host"),
        (name = "Properties", description = "Schema-free properties with compare-and-swap writes"),
        (name = "Organisations", description = "Charging station operators, grid and parking operators, smart cities, brands"),
        (name = "Infrastructure", description = "Charging pools, charging stations and EVSEs"),
    ),
    info(
        title = "Charging Infrastructure API",
        version = "1.0.0",
        description = "In-memory registry of e-mobility roaming networks and their charging infrastructure",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    use infrastructure as infra;
    use organisations as orgs;

    let network_routes = Router::new()
        .route(
            "/RNs",
            get(roaming_networks::list_roaming_networks).fallback(roaming_networks::count_roaming_networks),
        )
        .route(
            "/RNs/{roaming_network_id}",
            get(roaming_networks::get_roaming_network)
                .post(roaming_networks::create_roaming_network)
                .delete(roaming_networks::delete_roaming_network),
        )
        .route(
            "/RNs/{roaming_network_id}/{property}",
            get(properties::get_property).put(properties::set_property),
        );

    let organisation_routes = Router::new()
        .route(
            "/RNs/{roaming_network_id}/ChargingStationOperators",
            get(orgs::list_charging_station_operators).fallback(orgs::count_charging_station_operators),
        )
        .route(
            "/RNs/{roaming_network_id}/ChargingStationOperators/{operator_id}",
            get(orgs::get_charging_station_operator)
                .post(orgs::create_charging_station_operator)
                .delete(orgs::delete_charging_station_operator),
        )
        .route(
            "/RNs/{roaming_network_id}/GridOperators",
            get(orgs::list_grid_operators).fallback(orgs::count_grid_operators),
        )
        .route(
            "/RNs/{roaming_network_id}/GridOperators/{id}",
            get(orgs::get_grid_operator).post(orgs::create_grid_operator),
        )
        .route(
            "/RNs/{roaming_network_id}/ParkingOperators",
            get(orgs::list_parking_operators).fallback(orgs::count_parking_operators),
        )
        .route(
            "/RNs/{roaming_network_id}/ParkingOperators/{id}",
            get(orgs::get_parking_operator).post(orgs::create_parking_operator),
        )
        .route(
            "/RNs/{roaming_network_id}/SmartCities",
            get(orgs::list_smart_cities).fallback(orgs::count_smart_cities),
        )
        .route(
            "/RNs/{roaming_network_id}/SmartCities/{id}",
            get(orgs::get_smart_city).post(orgs::create_smart_city),
        )
        .route("/RNs/{roaming_network_id}/Brands", get(orgs::list_brands))
        .route(
            "/RNs/{roaming_network_id}/Brands/{brand_id}",
            get(orgs::get_brand).post(orgs::create_brand),
        );

    let infrastructure_routes = Router::new()
        // Charging pools
        .route(
            "/RNs/{roaming_network_id}/ChargingPools",
            get(infra::list_charging_pools).fallback(infra::count_charging_pools),
        )
        .route(
            "/RNs/{roaming_network_id}/ChargingPools/AdminStatus",
            get(infra::charging_pools_admin_status),
        )
        .route(
            "/RNs/{roaming_network_id}/ChargingPools/Status",
            get(infra::charging_pools_status),
        )
        .route(
            "/RNs/{roaming_network_id}/ChargingPools/{id}",
            get(infra::get_charging_pool)
                .post(infra::create_charging_pool)
                .delete(infra::delete_charging_pool),
        )
        .route(
            "/RNs/{roaming_network_id}/ChargingPools/{id}/AdminStatus",
            put(infra::set_charging_pool_admin_status),
        )
        .route(
            "/RNs/{roaming_network_id}/ChargingPools/{id}/Status",
            put(infra::set_charging_pool_status),
        )
        // Charging stations
        .route(
            "/RNs/{roaming_network_id}/ChargingStations",
            get(infra::list_charging_stations).fallback(infra::count_charging_stations),
        )
        .route(
            "/RNs/{roaming_network_id}/ChargingStations/AdminStatus",
            get(infra::charging_stations_admin_status),
        )
        .route(
            "/RNs/{roaming_network_id}/ChargingStations/Status",
            get(infra::charging_stations_status),
        )
        .route(
            "/RNs/{roaming_network_id}/ChargingStations/{id}",
            get(infra::get_charging_station)
                .post(infra::create_charging_station)
                .delete(infra::delete_charging_station),
        )
        .route(
            "/RNs/{roaming_network_id}/ChargingStations/{id}/AdminStatus",
            put(infra::set_charging_station_admin_status),
        )
        .route(
            "/RNs/{roaming_network_id}/ChargingStations/{id}/Status",
            put(infra::set_charging_station_status),
        )
        // EVSEs
        .route(
            "/RNs/{roaming_network_id}/EVSEs",
            get(infra::list_evses).fallback(infra::count_evses),
        )
        .route(
            "/RNs/{roaming_network_id}/EVSEs/AdminStatus",
            get(infra::evses_admin_status),
        )
        .route("/RNs/{roaming_network_id}/EVSEs/Status", get(infra::evses_status))
        .route(
            "/RNs/{roaming_network_id}/EVSEs/{id}",
            get(infra::get_evse).post(infra::create_evse).delete(infra::delete_evse),
        )
        .route(
            "/RNs/{roaming_network_id}/EVSEs/{id}/AdminStatus",
            put(infra::set_evse_admin_status),
        )
        .route("/RNs/{roaming_network_id}/EVSEs/{id}/Status", put(infra::set_evse_status));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check))
        .merge(network_routes)
        .merge(organisation_routes)
        .merge(infrastructure_routes);

    if let Some(handle) = metrics_handle {
        let metrics_routes = Router::new()
            .route("/metrics", get(prometheus_metrics))
            .with_state(MetricsState {
                handle,
                store: state.store.clone(),
            });
        router = router.merge(metrics_routes);
    }

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The served application: the router behind the verb-alias rewrite
pub type App = MapRequest<Router, fn(Request<Body>) -> Request<Body>>;

pub fn create_app(state: AppState, metrics_handle: Option<PrometheusHandle>) -> App {
    let normalize: fn(Request<Body>) -> Request<Body> = normalize_method;
    tower::util::MapRequestLayer::new(normalize).layer(create_api_router(state, metrics_handle))
}
