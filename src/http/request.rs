//! Request identification and translation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every request lacking one
//! - Translate an HTTP request into a [`RestRequest`] for dispatch
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The raw method string is kept; unrecognized verbs are decided by
//!   dispatch, not rejected here

use axum::http::{HeaderMap, HeaderName, Method, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::dispatch::RestRequest;
use crate::security::Principal;
use crate::traversal::RestPath;

pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Issues UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        Uuid::new_v4().to_string().parse().ok().map(RequestId::new)
    }
}

/// Request ID of an incoming request, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Build the dispatch view of a request whose path is already resolved.
pub fn rest_request(
    method: &Method,
    path: RestPath,
    principal: Principal,
    body: impl Into<Vec<u8>>,
) -> RestRequest {
    RestRequest::new(method.as_str(), path.layer)
        .with_principal(principal)
        .with_location(path.segments)
        .with_body(body)
}
