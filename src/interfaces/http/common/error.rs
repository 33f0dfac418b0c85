//! Error responses
//!
//! Every failure leaves the API as `{"description": "<message>"}` with the
//! status code of its error kind.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use utoipa::ToSchema;

use crate::support::errors::DomainError;

/// Error body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub description: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Method not allowed!")]
    MethodNotAllowed,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(description: impl Into<String>) -> Self {
        Self::Domain(DomainError::validation(description))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Domain(DomainError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Domain(DomainError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Domain(DomainError::Conflict(_)) => StatusCode::CONFLICT,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        debug!(status = status.as_u16(), error = %self, "Request rejected");
        let body = ErrorBody {
            description: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(DomainError::not_found("Unknown RoamingNetworkId!")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(DomainError::conflict("Property value mismatch!")).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn description_is_the_domain_message() {
        let error = ApiError::from(DomainError::not_found("Unknown property!"));
        assert_eq!(error.to_string(), "Unknown property!");
    }
}
