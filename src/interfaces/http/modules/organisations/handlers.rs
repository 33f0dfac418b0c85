//! Organisation API handlers

use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method};
use axum::response::Response;

use super::dto::{CreateBrandRequest, CreateChargingStationOperatorRequest, CreateOrganisationRequest};
use crate::application::ProjectionEngine;
use crate::domain::{
    BrandId, ChargingStationOperatorId, DomainError, GridOperatorId, ParkingOperatorId, SmartCityId,
};
use crate::interfaces::http::common::{
    collection_json, count_json, created_json, expect_count, ok_json, render_entity, ApiResult, ErrorBody,
    ListQuery, Scope, ValidatedJson,
};
use crate::interfaces::http::router::AppState;

// ── Charging station operators ─────────────────────────────────

#[utoipa::path(
    get,
    path = "/RNs/{roaming_network_id}/ChargingStationOperators",
    tag = "Organisations",
    params(("roaming_network_id" = String, Path, description = "Roaming network id")),
    responses(
        (status = 200, description = "Operators in creation order", body = Vec<Object>),
        (status = 404, description = "Unknown roaming network", body = ErrorBody)
    )
)]
pub async fn list_charging_station_operators(
    State(state): State<AppState>,
    Scope(scope): Scope,
    Path(roaming_network_id): Path<String>,
    query: ListQuery,
) -> ApiResult<Response> {
    let network = state.network(&scope, &roaming_network_id)?;
    let operators = network.charging_station_operators();
    Ok(collection_json(&query.engine().collection(&network, operators, query.window)))
}

pub async fn count_charging_station_operators(
    State(state): State<AppState>,
    Scope(scope): Scope,
    Path(roaming_network_id): Path<String>,
    method: Method,
) -> ApiResult<Response> {
    expect_count(&method)?;
    let network = state.network(&scope, &roaming_network_id)?;
    Ok(count_json(network.charging_station_operators().len()))
}

#[utoipa::path(
    get,
    path = "/RNs/{roaming_network_id}/ChargingStationOperators/{operator_id}",
    tag = "Organisations",
    params(
        ("roaming_network_id" = String, Path, description = "Roaming network id"),
        ("operator_id" = String, Path, description = "Operator id, e.g. DE*GEF")
    ),
    responses(
        (status = 200, description = "Operator", body = Object),
        (status = 404, description = "Unknown network or operator", body = ErrorBody)
    )
)]
pub async fn get_charging_station_operator(
    State(state): State<AppState>,
    Scope(scope): Scope,
    Path((roaming_network_id, operator_id)): Path<(String, String)>,
    query: ListQuery,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let network = state.network(&scope, &roaming_network_id)?;
    let id = ChargingStationOperatorId::parse(&operator_id)?;
    let operator = network
        .charging_station_operator(&id)
        .ok_or_else(|| DomainError::not_found("Unknown ChargingStationOperatorId!"))?;
    Ok(render_entity(&network, operator.as_ref(), &query, &headers))
}

#[utoipa::path(
    post,
    path = "/RNs/{roaming_network_id}/ChargingStationOperators/{operator_id}",
    tag = "Organisations",
    params(
        ("roaming_network_id" = String, Path, description = "Roaming network id"),
        ("operator_id" = String, Path, description = "Operator id, e.g. DE*GEF")
    ),
    request_body = CreateChargingStationOperatorRequest,
    responses(
        (status = 201, description = "Operator created", body = Object),
        (status = 400, description = "Invalid id or body", body = ErrorBody),
        (status = 404, description = "Unknown roaming network", body = ErrorBody),
        (status = 409, description = "Already exists", body = ErrorBody)
    )
)]
pub async fn create_charging_station_operator(
    State(state): State<AppState>,
    Scope(scope): Scope,
    Path((roaming_network_id, operator_id)): Path<(String, String)>,
    ValidatedJson(body): ValidatedJson<CreateChargingStationOperatorRequest>,
) -> ApiResult<Response> {
    let network = state.network(&scope, &roaming_network_id)?;
    let id = ChargingStationOperatorId::parse(&operator_id)?;
    let operator = network.add_charging_station_operator(id, body.into_draft()?)?;
    Ok(created_json(&ProjectionEngine::default().entity(&network, operator.as_ref())))
}

#[utoipa::path(
    delete,
    path = "/RNs/{roaming_network_id}/ChargingStationOperators/{operator_id}",
    tag = "Organisations",
    params(
        ("roaming_network_id" = String, Path, description = "Roaming network id"),
        ("operator_id" = String, Path, description = "Operator id, e.g. DE*GEF")
    ),
    responses(
        (status = 200, description = "Removed operator", body = Object),
        (status = 404, description = "Unknown network or operator", body = ErrorBody)
    )
)]
pub async fn delete_charging_station_operator(
    State(state): State<AppState>,
    Scope(scope): Scope,
    Path((roaming_network_id, operator_id)): Path<(String, String)>,
) -> ApiResult<Response> {
    let network = state.network(&scope, &roaming_network_id)?;
    let id = ChargingStationOperatorId::parse(&operator_id)?;
    let removed = network.remove_charging_station_operator(&id)?;
    Ok(ok_json(&ProjectionEngine::default().entity(&network, removed.as_ref())))
}

// ── Grid operators, parking operators, smart cities ────────────

/// Handlers of one organisation kind. The literals are the OpenAPI
/// collection and item paths.
macro_rules! organisation_handlers {
    (
        $id:ty, $label:literal, $unknown:literal,
        paths: $collection:literal, $item:literal,
        $all:ident, $one:ident, $add:ident,
        $list:ident, $count:ident, $get:ident, $create:ident
    ) => {
        /// `GET` on the collection
        #[utoipa::path(
            get,
            path = $collection,
            tag = "Organisations",
            params(
                ("roaming_network_id" = String, Path, description = "Roaming network id"),
                ("skip" = Option<usize>, Query, description = "Entries to skip"),
                ("take" = Option<usize>, Query, description = "Entries to return")
            ),
            responses(
                (status = 200, description = "Entries in creation order", body = Vec<Object>),
                (status = 404, description = "Unknown roaming network", body = ErrorBody)
            )
        )]
        pub async fn $list(
            State(state): State<AppState>,
            Scope(scope): Scope,
            Path(roaming_network_id): Path<String>,
            query: ListQuery,
        ) -> ApiResult<Response> {
            let network = state.network(&scope, &roaming_network_id)?;
            let items = network.$all();
            Ok(collection_json(&query.engine().collection(&network, items, query.window)))
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
            tag = "Organisations",
            params(
                ("roaming_network_id" = String, Path, description = "Roaming network id"),
                ("id" = String, Path, description = $label)
            ),
            responses(
                (status = 200, description = $label, body = Object),
                (status = 404, description = "Unknown network or id", body = ErrorBody)
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
            post,
            path = $item,
            tag = "Organisations",
            params(
                ("roaming_network_id" = String, Path, description = "Roaming network id"),
                ("id" = String, Path, description = $label)
            ),
            request_body = CreateOrganisationRequest,
            responses(
                (status = 201, description = "Created", body = Object),
                (status = 400, description = "Invalid id or body", body = ErrorBody),
                (status = 404, description = "Unknown roaming network", body = ErrorBody),
                (status = 409, description = "Already exists", body = ErrorBody)
            )
        )]
        pub async fn $create(
            State(state): State<AppState>,
            Scope(scope): Scope,
            Path((roaming_network_id, id)): Path<(String, String)>,
            ValidatedJson(body): ValidatedJson<CreateOrganisationRequest>,
        ) -> ApiResult<Response> {
            let network = state.network(&scope, &roaming_network_id)?;
            let id = <$id>::parse(&id)?;
            let item = network.$add(id, body.fields.into_draft($label)?)?;
            Ok(created_json(&ProjectionEngine::default().entity(&network, item.as_ref())))
        }
    };
}

organisation_handlers!(
    GridOperatorId,
    "grid operator",
    "Unknown GridOperatorId!",
    paths: "/RNs/{roaming_network_id}/GridOperators",
           "/RNs/{roaming_network_id}/GridOperators/{id}",
    grid_operators,
    grid_operator,
    add_grid_operator,
    list_grid_operators,
    count_grid_operators,
    get_grid_operator,
    create_grid_operator
);

organisation_handlers!(
    ParkingOperatorId,
    "parking operator",
    "Unknown ParkingOperatorId!",
    paths: "/RNs/{roaming_network_id}/ParkingOperators",
           "/RNs/{roaming_network_id}/ParkingOperators/{id}",
    parking_operators,
    parking_operator,
    add_parking_operator,
    list_parking_operators,
    count_parking_operators,
    get_parking_operator,
    create_parking_operator
);

organisation_handlers!(
    SmartCityId,
    "smart city",
    "Unknown SmartCityId!",
    paths: "/RNs/{roaming_network_id}/SmartCities",
           "/RNs/{roaming_network_id}/SmartCities/{id}",
    smart_cities,
    smart_city,
    add_smart_city,
    list_smart_cities,
    count_smart_cities,
    get_smart_city,
    create_smart_city
);

// ── Brands ─────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/RNs/{roaming_network_id}/Brands",
    tag = "Organisations",
    params(("roaming_network_id" = String, Path, description = "Roaming network id")),
    responses(
        (status = 200, description = "Brands of all operators", body = Vec<Object>),
        (status = 404, description = "Unknown roaming network", body = ErrorBody)
    )
)]
pub async fn list_brands(
    State(state): State<AppState>,
    Scope(scope): Scope,
    Path(roaming_network_id): Path<String>,
    query: ListQuery,
) -> ApiResult<Response> {
    let network = state.network(&scope, &roaming_network_id)?;
    Ok(collection_json(&query.engine().brands(network.brands(), query.window)))
}

#[utoipa::path(
    get,
    path = "/RNs/{roaming_network_id}/Brands/{brand_id}",
    tag = "Organisations",
    params(
        ("roaming_network_id" = String, Path, description = "Roaming network id"),
        ("brand_id" = String, Path, description = "Brand id, e.g. DE*GEF*B01")
    ),
    responses(
        (status = 200, description = "Brand", body = Object),
        (status = 404, description = "Unknown network or brand", body = ErrorBody)
    )
)]
pub async fn get_brand(
    State(state): State<AppState>,
    Scope(scope): Scope,
    Path((roaming_network_id, brand_id)): Path<(String, String)>,
) -> ApiResult<Response> {
    let network = state.network(&scope, &roaming_network_id)?;
    let id = BrandId::parse(&brand_id)?;
    let brand = network
        .brand(&id)
        .ok_or_else(|| DomainError::not_found("Unknown BrandId!"))?;
    Ok(ok_json(&ProjectionEngine::default().brand(&brand)))
}

#[utoipa::path(
    post,
    path = "/RNs/{roaming_network_id}/Brands/{brand_id}",
    tag = "Organisations",
    params(
        ("roaming_network_id" = String, Path, description = "Roaming network id"),
        ("brand_id" = String, Path, description = "Brand id, e.g. DE*GEF*B01")
    ),
    request_body = CreateBrandRequest,
    responses(
        (status = 201, description = "Brand created", body = Object),
        (status = 400, description = "Invalid id or body", body = ErrorBody),
        (status = 404, description = "Unknown network or operator", body = ErrorBody),
        (status = 409, description = "Already exists", body = ErrorBody)
    )
)]
pub async fn create_brand(
    State(state): State<AppState>,
    Scope(scope): Scope,
    Path((roaming_network_id, brand_id)): Path<(String, String)>,
    ValidatedJson(body): ValidatedJson<CreateBrandRequest>,
) -> ApiResult<Response> {
    let network = state.network(&scope, &roaming_network_id)?;
    let id = BrandId::parse(&brand_id)?;
    let brand = network.add_brand(id, body.into_draft()?)?;
    Ok(created_json(&ProjectionEngine::default().brand(&brand)))
}
