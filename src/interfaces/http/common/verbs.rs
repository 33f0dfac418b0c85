//! Custom HTTP verbs
//!
//! `CREATE` and `SET` are aliases of `POST` and `PUT`; they are rewritten
//! before routing so handlers only see the standard methods. `COUNT` has
//! no standard counterpart and reaches the method routers' fallbacks. The
//! verb as sent travels on as a [`RequestVerb`] extension.

use axum::body::Body;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, Method, Request};

use super::error::ApiError;
use crate::application::HostScope;
use crate::interfaces::http::router::AppState;

pub const COUNT: &str = "COUNT";

/// The method a client sent, before alias rewriting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestVerb(pub Method);

/// Map `CREATE` to `POST` and `SET` to `PUT`.
pub fn normalize_method(mut request: Request<Body>) -> Request<Body> {
    let sent = request.method().clone();
    let alias = match sent.as_str() {
        "CREATE" => Some(Method::POST),
        "SET" => Some(Method::PUT),
        _ => None,
    };
    if let Some(method) = alias {
        *request.method_mut() = method;
    }
    request.extensions_mut().insert(RequestVerb(sent));
    request
}

/// Reject everything but `COUNT` in a method router fallback
pub fn expect_count(method: &Method) -> Result<(), ApiError> {
    if method.as_str() == COUNT {
        Ok(())
    } else {
        Err(ApiError::MethodNotAllowed)
    }
}

/// Host scope of the request, from its `Host` header
#[derive(Debug, Clone)]
pub struct Scope(pub HostScope);

impl FromRequestParts<AppState> for Scope {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .or_else(|| parts.uri.host());
        Ok(Scope(state.store.scope_for_host(host)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_are_rewritten() {
        let create = Request::builder()
            .method(Method::from_bytes(b"CREATE").unwrap())
            .body(Body::empty())
            .unwrap();
        assert_eq!(*normalize_method(create).method(), Method::POST);

        let set = Request::builder()
            .method(Method::from_bytes(b"SET").unwrap())
            .body(Body::empty())
            .unwrap();
        let set = normalize_method(set);
        assert_eq!(*set.method(), Method::PUT);
        assert_eq!(set.extensions().get::<RequestVerb>().map(|verb| verb.0.as_str()), Some("SET"));

        let count = Request::builder()
            .method(Method::from_bytes(b"COUNT").unwrap())
            .body(Body::empty())
            .unwrap();
        assert_eq!(normalize_method(count).method().as_str(), COUNT);
    }

    #[test]
    fn only_count_passes_the_fallback() {
        assert!(expect_count(&Method::from_bytes(b"COUNT").unwrap()).is_ok());
        assert!(expect_count(&Method::PATCH).is_err());
    }
}
