//! Infrastructure API handlers
//!
//! Collections are flat views across all operators of a network. `GET` on
//! a collection answers with GeoJSON when the client accepts
//! `application/geo+json`.
//!
//! `SET .../{id}/AdminStatus` and `SET .../{id}/Status` append to the status
//! histories; repeating the current value records nothing.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method};
use axum::response::Response;
use tracing::info;

use super::dto::{CreateChargingPoolRequest, CreateChargingStationRequest, CreateEvseRequest, SetStatusRequest};
use crate::application::{ProjectionEngine, StatusKind};
use crate::domain::{AdminStatus, ChargingPoolId, ChargingStationId, DomainError, Entity, EvseId, OperationalStatus};
use crate::interfaces::http::common::{
    collection_json, count_json, created_json, expect_count, ok_json, render_collection, render_entity, ApiResult,
    ErrorBody, ListQuery, Scope, ValidatedJson,
};
use crate::interfaces::http::router::AppState;

/// Read, delete and status handlers of one infrastructure level. The
/// literals are the OpenAPI paths: collection, item, the two collection
/// reports and the two item status paths.
macro_rules! infrastructure_handlers {
    (
        $id:ty, $unknown:literal, $what:literal,
        paths: $collection:literal, $item:literal,
               $admin_report_path:literal, $status_report_path:literal,
               $item_admin_path:literal, $item_status_path:literal,
        $all:ident, $one:ident, $delete:ident,
        $list:ident, $count:ident, $get:ident, $remove:ident,
        $admin_report:ident, $status_report:ident,
        $set_admin:ident, $set_status:ident
    ) => {
        /// `COUNT` on the collection answers `{"count": N}`.
        #[utoipa::path(
            get,
            path = $collection,
            tag = "Infrastructure",
            params(
                ("roaming_network_id" = String, Path, description = "Roaming network id"),
                ("skip" = Option<usize>, Query, description = "Entries to skip"),
                ("take" = Option<usize>, Query, description = "Entries to return"),
                ("expand" = Option<String>, Query, description = "Relations to expand, repeatable")
            ),
            responses(
                (status = 200, description = "JSON array, or a GeoJSON FeatureCollection for application/geo+json", body = Vec<Object>),
                (status = 404, description = "Unknown roaming network", body = ErrorBody)
            )
        )]
        pub async fn $list(
            State(state): State<AppState>,
            Scope(scope): Scope,
            Path(roaming_network_id): Path<String>,
            query: ListQuery,
            headers: HeaderMap,
        ) -> ApiResult<Response> {
            let network = state.network(&scope, &roaming_network_id)?;
            let items = network.$all();
            Ok(render_collection(&network, items, &query, &headers))
        }

        pub async fn $count(
            State(state): State<AppState>,
            Scope(scope): Scope,
            Path(roaming_network_id): Path<String>,
            method: Method,
        ) -> ApiResult<Response> {
            expect_count(&method)?;
            let network = state.network(&scope, &roaming_network_id)?;
            Ok(count_json(network.$all().len()))
        }

        #[utoipa::path(
            get,
            path = $item,
            tag = "Infrastructure",
            params(
                ("roaming_network_id" = String, Path, description = "Roaming network id"),
                ("id" = String, Path, description = $what)
            ),
            responses(
                (status = 200, description = "JSON object, or a GeoJSON Feature for application/geo+json", body = Object),
                (status = 404, description = "Unknown network or entity", body = ErrorBody)
            )
        )]
        pub async fn $get(
            State(state): State<AppState>,
            Scope(scope): Scope,
            Path((roaming_network_id, id)): Path<(String, String)>,
            query: ListQuery,
            headers: HeaderMap,
        ) -> ApiResult<Response> {
            let network = state.network(&scope, &roaming_network_id)?;
            let id = <$id>::parse(&id)?;
            let item = network
                .$one(&id)
                .ok_or_else(|| DomainError::not_found($unknown))?;
            Ok(render_entity(&network, item.as_ref(), &query, &headers))
        }

        #[utoipa::path(
            delete,
            path = $item,
            tag = "Infrastructure",
            params(
                ("roaming_network_id" = String, Path, description = "Roaming network id"),
                ("id" = String, Path, description = $what)
            ),
            responses(
                (status = 200, description = "The removed entity", body = Object),
                (status = 404, description = "Unknown network or entity", body = ErrorBody)
            )
        )]
        pub async fn $remove(
            State(state): State<AppState>,
            Scope(scope): Scope,
            Path((roaming_network_id, id)): Path<(String, String)>,
        ) -> ApiResult<Response> {
            let network = state.network(&scope, &roaming_network_id)?;
            let id = <$id>::parse(&id)?;
            let removed = network.$delete(&id)?;
            info!(roaming_network_id = %network.id, id = %id, "Infrastructure removed");
            Ok(ok_json(&ProjectionEngine::default().entity(&network, removed.as_ref())))
        }

        /// `{id: [{timestamp, value}]}` of the admin status histories
        #[utoipa::path(
            get,
            path = $admin_report_path,
            tag = "Infrastructure",
            params(
                ("roaming_network_id" = String, Path, description = "Roaming network id"),
                ("historysize" = Option<usize>, Query, description = "History entries per entity")
            ),
            responses(
                (status = 200, description = "Admin status histories by id", body = Object),
                (status = 404, description = "Unknown roaming network", body = ErrorBody)
            )
        )]
        pub async fn $admin_report(
            State(state): State<AppState>,
            Scope(scope): Scope,
            Path(roaming_network_id): Path<String>,
            query: ListQuery,
        ) -> ApiResult<Response> {
            let network = state.network(&scope, &roaming_network_id)?;
            let report = query
                .engine()
                .status_report(network.$all(), query.window, StatusKind::Admin);
            Ok(collection_json(&report))
        }

        /// `{id: [{timestamp, value}]}` of the operational status histories
        #[utoipa::path(
            get,
            path = $status_report_path,
            tag = "Infrastructure",
            params(
                ("roaming_network_id" = String, Path, description = "Roaming network id"),
                ("historysize" = Option<usize>, Query, description = "History entries per entity")
            ),
            responses(
                (status = 200, description = "Operational status histories by id", body = Object),
                (status = 404, description = "Unknown roaming network", body = ErrorBody)
            )
        )]
        pub async fn $status_report(
            State(state): State<AppState>,
            Scope(scope): Scope,
            Path(roaming_network_id): Path<String>,
            query: ListQuery,
        ) -> ApiResult<Response> {
            let network = state.network(&scope, &roaming_network_id)?;
            let report = query
                .engine()
                .status_report(network.$all(), query.window, StatusKind::Operational);
            Ok(collection_json(&report))
        }

        #[utoipa::path(
            put,
            path = $item_admin_path,
            tag = "Infrastructure",
            params(
                ("roaming_network_id" = String, Path, description = "Roaming network id"),
                ("id" = String, Path, description = $what)
            ),
            request_body = SetStatusRequest,
            responses(
                (status = 200, description = "The entity with its admin status history", body = Object),
                (status = 400, description = "Unknown status value", body = ErrorBody),
                (status = 404, description = "Unknown network or entity", body = ErrorBody)
            )
        )]
        pub async fn $set_admin(
            State(state): State<AppState>,
            Scope(scope): Scope,
            Path((roaming_network_id, id)): Path<(String, String)>,
            query: ListQuery,
            ValidatedJson(body): ValidatedJson<SetStatusRequest>,
        ) -> ApiResult<Response> {
            let network = state.network(&scope, &roaming_network_id)?;
            let id = <$id>::parse(&id)?;
            let item = network
                .$one(&id)
                .ok_or_else(|| DomainError::not_found($unknown))?;
            let status = AdminStatus::parse(&body.value)?;
            if item.set_admin_status(status) {
                info!(roaming_network_id = %network.id, id = %id, admin_status = status.as_str(), "Admin status changed");
            }
            Ok(ok_json(&query.engine().entity(&network, item.as_ref())))
        }

        #[utoipa::path(
            put,
            path = $item_status_path,
            tag = "Infrastructure",
            params(
                ("roaming_network_id" = String, Path, description = "Roaming network id"),
                ("id" = String, Path, description = $what)
            ),
            request_body = SetStatusRequest,
            responses(
                (status = 200, description = "The entity with its status history", body = Object),
                (status = 400, description = "Unknown status value", body = ErrorBody),
                (status = 404, description = "Unknown network or entity", body = ErrorBody)
            )
        )]
        pub async fn $set_status(
            State(state): State<AppState>,
            Scope(scope): Scope,
            Path((roaming_network_id, id)): Path<(String, String)>,
            query: ListQuery,
            ValidatedJson(body): ValidatedJson<SetStatusRequest>,
        ) -> ApiResult<Response> {
            let network = state.network(&scope, &roaming_network_id)?;
            let id = <$id>::parse(&id)?;
            let item = network
                .$one(&id)
                .ok_or_else(|| DomainError::not_found($unknown))?;
            let status = OperationalStatus::parse(&body.value)?;
            if item.set_status(status) {
                info!(roaming_network_id = %network.id, id = %id, status = status.as_str(), "Status changed");
            }
            Ok(ok_json(&query.engine().entity(&network, item.as_ref())))
        }
    };
}

infrastructure_handlers!(
    ChargingPoolId,
    "Unknown ChargingPoolId!",
    "Charging pool id, e.g. DE*GEF*P1111",
    paths: "/RNs/{roaming_network_id}/ChargingPools",
           "/RNs/{roaming_network_id}/ChargingPools/{id}",
           "/RNs/{roaming_network_id}/ChargingPools/AdminStatus",
           "/RNs/{roaming_network_id}/ChargingPools/Status",
           "/RNs/{roaming_network_id}/ChargingPools/{id}/AdminStatus",
           "/RNs/{roaming_network_id}/ChargingPools/{id}/Status",
    charging_pools,
    charging_pool,
    delete_charging_pool,
    list_charging_pools,
    count_charging_pools,
    get_charging_pool,
    delete_charging_pool,
    charging_pools_admin_status,
    charging_pools_status,
    set_charging_pool_admin_status,
    set_charging_pool_status
);

infrastructure_handlers!(
    ChargingStationId,
    "Unknown ChargingStationId!",
    "Charging station id, e.g. DE*GEF*S1111",
    paths: "/RNs/{roaming_network_id}/ChargingStations",
           "/RNs/{roaming_network_id}/ChargingStations/{id}",
           "/RNs/{roaming_network_id}/ChargingStations/AdminStatus",
           "/RNs/{roaming_network_id}/ChargingStations/Status",
           "/RNs/{roaming_network_id}/ChargingStations/{id}/AdminStatus",
           "/RNs/{roaming_network_id}/ChargingStations/{id}/Status",
    charging_stations,
    charging_station,
    delete_charging_station,
    list_charging_stations,
    count_charging_stations,
    get_charging_station,
    delete_charging_station,
    charging_stations_admin_status,
    charging_stations_status,
    set_charging_station_admin_status,
    set_charging_station_status
);

infrastructure_handlers!(
    EvseId,
    "Unknown EVSEId!",
    "EVSE id, e.g. DE*GEF*E1111*1",
    paths: "/RNs/{roaming_network_id}/EVSEs",
           "/RNs/{roaming_network_id}/EVSEs/{id}",
           "/RNs/{roaming_network_id}/EVSEs/AdminStatus",
           "/RNs/{roaming_network_id}/EVSEs/Status",
           "/RNs/{roaming_network_id}/EVSEs/{id}/AdminStatus",
           "/RNs/{roaming_network_id}/EVSEs/{id}/Status",
    evses,
    evse,
    delete_evse,
    list_evses,
    count_evses,
    get_evse,
    delete_evse,
    evses_admin_status,
    evses_status,
    set_evse_admin_status,
    set_evse_status
);

#[utoipa::path(
    post,
    path = "/RNs/{roaming_network_id}/ChargingPools/{id}",
    tag = "Infrastructure",
    params(
        ("roaming_network_id" = String, Path, description = "Roaming network id"),
        ("id" = String, Path, description = "Pool id, e.g. DE*GEF*P1111")
    ),
    request_body = CreateChargingPoolRequest,
    responses(
        (status = 201, description = "Charging pool created", body = Object),
        (status = 400, description = "Invalid id or body", body = ErrorBody),
        (status = 404, description = "Unknown network or operator", body = ErrorBody),
        (status = 409, description = "Already exists", body = ErrorBody)
    )
)]
pub async fn create_charging_pool(
    State(state): State<AppState>,
    Scope(scope): Scope,
    Path((roaming_network_id, charging_pool_id)): Path<(String, String)>,
    ValidatedJson(body): ValidatedJson<CreateChargingPoolRequest>,
) -> ApiResult<Response> {
    let network = state.network(&scope, &roaming_network_id)?;
    let id = ChargingPoolId::parse(&charging_pool_id)?;
    let pool = network.create_charging_pool(id, body.into_draft()?)?;
    Ok(created_json(&ProjectionEngine::default().entity(&network, pool.as_ref())))
}

#[utoipa::path(
    post,
    path = "/RNs/{roaming_network_id}/ChargingStations/{id}",
    tag = "Infrastructure",
    params(
        ("roaming_network_id" = String, Path, description = "Roaming network id"),
        ("id" = String, Path, description = "Station id, e.g. DE*GEF*S1111")
    ),
    request_body = CreateChargingStationRequest,
    responses(
        (status = 201, description = "Charging station created", body = Object),
        (status = 400, description = "Invalid id or body", body = ErrorBody),
        (status = 404, description = "Unknown network or pool", body = ErrorBody),
        (status = 409, description = "Already exists", body = ErrorBody)
    )
)]
pub async fn create_charging_station(
    State(state): State<AppState>,
    Scope(scope): Scope,
    Path((roaming_network_id, charging_station_id)): Path<(String, String)>,
    ValidatedJson(body): ValidatedJson<CreateChargingStationRequest>,
) -> ApiResult<Response> {
    let network = state.network(&scope, &roaming_network_id)?;
    let id = ChargingStationId::parse(&charging_station_id)?;
    let (pool_id, draft) = body.into_draft()?;
    let station = network.create_charging_station(&pool_id, id, draft)?;
    Ok(created_json(&ProjectionEngine::default().entity(&network, station.as_ref())))
}

#[utoipa::path(
    post,
    path = "/RNs/{roaming_network_id}/EVSEs/{id}",
    tag = "Infrastructure",
    params(
        ("roaming_network_id" = String, Path, description = "Roaming network id"),
        ("id" = String, Path, description = "EVSE id, e.g. DE*GEF*E1111*1")
    ),
    request_body = CreateEvseRequest,
    responses(
        (status = 201, description = "EVSE created", body = Object),
        (status = 400, description = "Invalid id or body", body = ErrorBody),
        (status = 404, description = "Unknown network or station", body = ErrorBody),
        (status = 409, description = "Already exists", body = ErrorBody)
    )
)]
pub async fn create_evse(
    State(state): State<AppState>,
    Scope(scope): Scope,
    Path((roaming_network_id, evse_id)): Path<(String, String)>,
    ValidatedJson(body): ValidatedJson<CreateEvseRequest>,
) -> ApiResult<Response> {
    let network = state.network(&scope, &roaming_network_id)?;
    let id = EvseId::parse(&evse_id)?;
    let (station_id, draft) = body.into_draft()?;
    let evse = network.create_evse(&station_id, id, draft)?;
    Ok(created_json(&ProjectionEngine::default().entity(&network, evse.as_ref())))
}
