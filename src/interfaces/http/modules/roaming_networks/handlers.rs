//! Roaming network API handlers

use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method};
use axum::response::Response;

use super::dto::CreateRoamingNetworkRequest;
use crate::application::ProjectionEngine;
use crate::domain::RoamingNetworkId;
use crate::interfaces::http::common::{
    collection_json, count_json, created_json, expect_count, ok_json, render_entity, ApiResult, ErrorBody,
    ListQuery, Scope, ValidatedJson,
};
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    get,
    path = "/RNs",
    tag = "Roaming Networks",
    params(
        ("skip" = Option<usize>, Query, description = "Entries to skip"),
        ("take" = Option<usize>, Query, description = "Entries to return"),
        ("expand" = Option<String>, Query, description = "Relations to expand, repeatable")
    ),
    responses(
        (status = 200, description = "Roaming networks of the request host", body = Vec<Object>),
        (status = 400, description = "Malformed query", body = ErrorBody)
    )
)]
pub async fn list_roaming_networks(
    State(state): State<AppState>,
    Scope(scope): Scope,
    query: ListQuery,
) -> Response {
    let page = state.store.list(&scope, query.window);
    collection_json(&query.engine().roaming_networks(&page))
}

/// `COUNT /RNs`
pub async fn count_roaming_networks(
    State(state): State<AppState>,
    Scope(scope): Scope,
    method: Method,
) -> ApiResult<Response> {
    expect_count(&method)?;
    Ok(count_json(state.store.count(&scope)))
}

#[utoipa::path(
    get,
    path = "/RNs/{roaming_network_id}",
    tag = "Roaming Networks",
    params(("roaming_network_id" = String, Path, description = "Roaming network id")),
    responses(
        (status = 200, description = "Roaming network", body = Object),
        (status = 404, description = "Unknown roaming network", body = ErrorBody)
    )
)]
pub async fn get_roaming_network(
    State(state): State<AppState>,
    Scope(scope): Scope,
    Path(roaming_network_id): Path<String>,
    query: ListQuery,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let network = state.network(&scope, &roaming_network_id)?;
    Ok(render_entity(&network, network.as_ref(), &query, &headers))
}

#[utoipa::path(
    post,
    path = "/RNs/{roaming_network_id}",
    tag = "Roaming Networks",
    params(("roaming_network_id" = String, Path, description = "Roaming network id")),
    request_body = CreateRoamingNetworkRequest,
    responses(
        (status = 201, description = "Roaming network created", body = Object),
        (status = 400, description = "Invalid id or body", body = ErrorBody),
        (status = 409, description = "Already exists", body = ErrorBody)
    )
)]
pub async fn create_roaming_network(
    State(state): State<AppState>,
    Scope(scope): Scope,
    Path(roaming_network_id): Path<String>,
    ValidatedJson(body): ValidatedJson<CreateRoamingNetworkRequest>,
) -> ApiResult<Response> {
    let id = RoamingNetworkId::parse(&roaming_network_id)?;
    let network = state
        .store
        .create(&scope, id, body.name.as_ref(), body.description.as_ref())?;
    Ok(created_json(&ProjectionEngine::default().roaming_network(&network)))
}

#[utoipa::path(
    delete,
    path = "/RNs/{roaming_network_id}",
    tag = "Roaming Networks",
    params(("roaming_network_id" = String, Path, description = "Roaming network id")),
    responses(
        (status = 200, description = "Removed roaming network", body = Object),
        (status = 404, description = "Unknown roaming network", body = ErrorBody)
    )
)]
pub async fn delete_roaming_network(
    State(state): State<AppState>,
    Scope(scope): Scope,
    Path(roaming_network_id): Path<String>,
) -> ApiResult<Response> {
    let network = state.network(&scope, &roaming_network_id)?;
    let removed = state.store.delete(&scope, &network.id)?;
    Ok(ok_json(&ProjectionEngine::default().roaming_network(&removed)))
}
