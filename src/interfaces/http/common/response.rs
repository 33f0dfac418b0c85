//! Response builders: JSON/GeoJSON bodies, `ETag`, `X-Total-Count`

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use super::query::ListQuery;
use crate::application::projection::{Document, Projectable};
use crate::application::Projection;
use crate::domain::RoamingNetwork;

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";
pub const GEOJSON: &str = "application/geo+json";

/// Quoted SHA-256 hex digest of a body
pub fn etag_of(body: &[u8]) -> String {
    format!("\"{}\"", hex::encode(Sha256::digest(body)))
}

fn respond(status: StatusCode, content_type: &'static str, body: &Value, total: Option<usize>) -> Response {
    let bytes = body.to_string().into_bytes();
    let mut response = Response::builder().status(status);
    if let Some(headers) = response.headers_mut() {
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        if status == StatusCode::OK {
            if let Ok(etag) = HeaderValue::from_str(&etag_of(&bytes)) {
                headers.insert(header::ETAG, etag);
            }
        }
        if let Some(total) = total {
            headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(total));
        }
    }
    response
        .body(Body::from(bytes))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

pub fn ok_json(body: &Value) -> Response {
    respond(StatusCode::OK, "application/json", body, None)
}

pub fn created_json(body: &Value) -> Response {
    respond(StatusCode::CREATED, "application/json", body, None)
}

pub fn count_json(count: usize) -> Response {
    ok_json(&json!({ "count": count }))
}

/// Windowed array with `X-Total-Count`
pub fn collection_json(projection: &Projection) -> Response {
    respond(StatusCode::OK, "application/json", &projection.document, Some(projection.total))
}

/// Whether the client asked for GeoJSON via `Accept`
pub fn wants_geojson(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains(GEOJSON))
}

/// A collection of `network` as JSON array or FeatureCollection
pub fn render_collection<E: Projectable>(
    network: &RoamingNetwork,
    items: Vec<Arc<E>>,
    query: &ListQuery,
    headers: &HeaderMap,
) -> Response {
    let engine = query.engine();
    if wants_geojson(headers) {
        let mut properties = Document::new();
        properties.insert("roamingNetworkId".into(), Value::String(network.id.to_string()));
        let projection = engine.feature_collection(network, items, query.window, Some(properties));
        respond(StatusCode::OK, GEOJSON, &projection.document, Some(projection.total))
    } else {
        collection_json(&engine.collection(network, items, query.window))
    }
}

/// One entity of `network` as JSON object or Feature
pub fn render_entity<E: Projectable>(
    network: &RoamingNetwork,
    entity: &E,
    query: &ListQuery,
    headers: &HeaderMap,
) -> Response {
    let engine = query.engine();
    if wants_geojson(headers) {
        respond(StatusCode::OK, GEOJSON, &engine.feature(network, entity), None)
    } else {
        ok_json(&engine.entity(network, entity))
    }
}
