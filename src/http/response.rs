//! Rendering of dispatch outcomes as HTTP responses.
//!
//! # Responsibilities
//! - Payloads → 200 (text payloads get a text content type)
//! - Not-Allowed → 405 with `Allow`, plain-text body
//! - Traversal failures → 404
//! - Permission failures → 401 (with a challenge) or 403
//!
//! # Design Decisions
//! - The 405 wire contract is fixed: `Allow` is always present, even empty
//! - Error bodies other than 405 are empty; details go to the log

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::dispatch::{DispatchError, HandlerError, NotAllowed, Payload, NOT_ALLOWED_BODY, TEXT_PLAIN_UTF8};
use crate::traversal::TraversalError;

impl IntoResponse for Payload {
    fn into_response(self) -> Response {
        match self {
            Payload::Text(text) => {
                ([(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)], text).into_response()
            }
            Payload::Bytes(bytes) => Response::new(Body::from(bytes)),
        }
    }
}

impl IntoResponse for NotAllowed {
    fn into_response(self) -> Response {
        let allow = HeaderValue::from_str(&self.allow_header())
            .unwrap_or_else(|_| HeaderValue::from_static(""));
        (
            StatusCode::METHOD_NOT_ALLOWED,
            [
                (header::ALLOW, allow),
                (header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN_UTF8)),
            ],
            NOT_ALLOWED_BODY,
        )
            .into_response()
    }
}

impl IntoResponse for TraversalError {
    fn into_response(self) -> Response {
        StatusCode::NOT_FOUND.into_response()
    }
}

/// Render a dispatch failure. `realm` names the 401 challenge realm.
pub fn render_dispatch_error(err: DispatchError, realm: &str) -> Response {
    match err {
        DispatchError::NotAllowed(signal) => signal.into_response(),
        DispatchError::Unauthorized { .. } => {
            let challenge = HeaderValue::from_str(&format!("basic realm=\"{realm}\""))
                .unwrap_or_else(|_| HeaderValue::from_static("basic"));
            (StatusCode::UNAUTHORIZED, [(header::WWW_AUTHENTICATE, challenge)]).into_response()
        }
        DispatchError::Forbidden { .. } => StatusCode::FORBIDDEN.into_response(),
        DispatchError::Handler { source, .. } => match source {
            HandlerError::BadRequest(_) => StatusCode::BAD_REQUEST.into_response(),
            // Never reaches here; the dispatcher turns it into a signal.
            HandlerError::NotAllowed => StatusCode::METHOD_NOT_ALLOWED.into_response(),
            HandlerError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::Permission;
    use crate::selector::Verb;

    async fn body(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    fn not_allowed(allow: Vec<Verb>) -> NotAllowed {
        NotAllowed {
            method: "POST".into(),
            resource_type: "MyApp".into(),
            resource: "app".into(),
            layer: "LayerB".into(),
            allow,
        }
    }

    #[tokio::test]
    async fn test_not_allowed_wire_contract() {
        let response = not_allowed(vec![Verb::Get, Verb::Put]).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, PUT");
        assert_eq!(response.headers()[header::CONTENT_TYPE], TEXT_PLAIN_UTF8);
        assert_eq!(body(response).await, b"Method Not Allowed");
    }

    #[tokio::test]
    async fn test_empty_allow_header_still_sent() {
        let response = not_allowed(Vec::new()).into_response();
        assert_eq!(response.headers()[header::ALLOW], "");
    }

    #[tokio::test]
    async fn test_payload_content_types() {
        let text = Payload::from("GET").into_response();
        assert_eq!(text.headers()[header::CONTENT_TYPE], TEXT_PLAIN_UTF8);
        assert_eq!(body(text).await, b"GET");

        let bytes = Payload::from(b"PUT").into_response();
        assert!(bytes.headers().get(header::CONTENT_TYPE).is_none());
        assert_eq!(body(bytes).await, b"PUT");
    }

    #[test]
    fn test_unauthorized_challenges() {
        let err = DispatchError::Unauthorized {
            handler: "SecurityRest".into(),
            permission: Permission::named("content.Manage"),
        };
        let response = render_dispatch_error(err, "restskin");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "basic realm=\"restskin\"");
    }

    #[test]
    fn test_failure_statuses() {
        let forbidden = DispatchError::Forbidden {
            principal: "bob".into(),
            handler: "SecurityRest".into(),
            permission: Permission::named("content.Manage"),
        };
        assert_eq!(render_dispatch_error(forbidden, "r").status(), StatusCode::FORBIDDEN);

        let bad = DispatchError::Handler {
            handler: "BodyTest".into(),
            source: HandlerError::BadRequest("not utf-8".into()),
        };
        assert_eq!(render_dispatch_error(bad, "r").status(), StatusCode::BAD_REQUEST);

        let failed = DispatchError::Handler {
            handler: "BodyTest".into(),
            source: HandlerError::Failed("boom".into()),
        };
        assert_eq!(render_dispatch_error(failed, "r").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(TraversalError::NotFound("/x".into()).into_response().status(), StatusCode::NOT_FOUND);
    }
}
