//! Query-string parameters shared by all read endpoints
//!
//! `skip`, `take`, `historysize` and the repeatable `expand`. `expand` may
//! occur several times, so the query is read as raw pairs instead of a
//! derived struct.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use super::error::{ApiError, ApiResult};
use crate::application::{ExpansionPolicy, ProjectionEngine};
use crate::config::ApiConfig;
use crate::interfaces::http::router::AppState;
use crate::support::pagination::Window;

#[derive(Debug, Clone)]
pub struct ListQuery {
    pub window: Window,
    pub history_size: usize,
    pub policy: ExpansionPolicy,
}

impl ListQuery {
    pub fn from_pairs(pairs: &[(String, String)], api: &ApiConfig) -> ApiResult<Self> {
        let mut skip = 0;
        let mut take = None;
        let mut history_size = api.default_history_size;
        let mut expand = Vec::new();

        for (key, value) in pairs {
            match key.to_ascii_lowercase().as_str() {
                "skip" => skip = number(value, "Invalid skip parameter!")?,
                "take" => take = Some(number(value, "Invalid take parameter!")?),
                "historysize" => history_size = number(value, "Invalid historysize parameter!")?,
                "expand" => expand.push(value.as_str()),
                _ => {}
            }
        }

        if let Some(max) = api.max_take {
            take = Some(take.map_or(max, |take: usize| take.min(max)));
        }

        Ok(Self {
            window: Window::new(skip, take),
            history_size,
            policy: ExpansionPolicy::from_tokens(expand)?,
        })
    }

    pub fn engine(&self) -> ProjectionEngine {
        ProjectionEngine::new(self.policy.clone()).with_history_size(self.history_size)
    }
}

fn number(value: &str, message: &str) -> ApiResult<usize> {
    value.trim().parse().map_err(|_| ApiError::bad_request(message))
}

impl FromRequestParts<AppState> for ListQuery {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::bad_request("Invalid query string!"))?;
        Self::from_pairs(&pairs, &state.api)
    }
}
