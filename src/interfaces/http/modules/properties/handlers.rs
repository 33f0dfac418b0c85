//! Property API handlers

use axum::extract::{Path, State};
use axum::response::Response;
use serde_json::{Map, Value};

use super::dto::SetPropertyRequest;
use crate::domain::{Entity, SetOutcome};
use crate::interfaces::http::common::{created_json, ok_json, ApiResult, ErrorBody, Scope, ValidatedJson};
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    get,
    path = "/RNs/{roaming_network_id}/{property}",
    tag = "Properties",
    params(
        ("roaming_network_id" = String, Path, description = "Roaming network id"),
        ("property" = String, Path, description = "Property name")
    ),
    responses(
        (status = 200, description = "`{property: value}`", body = Object),
        (status = 404, description = "Unknown network or property", body = ErrorBody)
    )
)]
pub async fn get_property(
    State(state): State<AppState>,
    Scope(scope): Scope,
    Path((roaming_network_id, property)): Path<(String, String)>,
) -> ApiResult<Response> {
    let network = state.network(&scope, &roaming_network_id)?;
    let value = network.properties().get(&property)?;

    let mut body = Map::new();
    body.insert(property, value);
    Ok(ok_json(&Value::Object(body)))
}

#[utoipa::path(
    put,
    path = "/RNs/{roaming_network_id}/{property}",
    tag = "Properties",
    params(
        ("roaming_network_id" = String, Path, description = "Roaming network id"),
        ("property" = String, Path, description = "Property name")
    ),
    request_body = SetPropertyRequest,
    responses(
        (status = 200, description = "Property updated", body = SetPropertyRequest),
        (status = 201, description = "Property created", body = SetPropertyRequest),
        (status = 400, description = "Malformed body", body = ErrorBody),
        (status = 404, description = "Unknown network", body = ErrorBody),
        (status = 409, description = "Current value differs from oldValue", body = ErrorBody)
    )
)]
pub async fn set_property(
    State(state): State<AppState>,
    Scope(scope): Scope,
    Path((roaming_network_id, property)): Path<(String, String)>,
    ValidatedJson(body): ValidatedJson<SetPropertyRequest>,
) -> ApiResult<Response> {
    let network = state.network(&scope, &roaming_network_id)?;
    let update = network
        .properties()
        .set(&property, &body.old_value, body.new_value)?;

    tracing::debug!(
        roaming_network_id = %network.id,
        property = %property,
        outcome = ?update.outcome,
        "Property written"
    );

    let echo = serde_json::json!({
        "oldValue": update.old_value,
        "newValue": update.new_value,
    });
    Ok(match update.outcome {
        SetOutcome::Created => created_json(&echo),
        SetOutcome::Updated => ok_json(&echo),
    })
}
