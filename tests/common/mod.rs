//! Shared utilities for the HTTP-level tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use restskin::config::{GrantConfig, ServiceConfig, TokenConfig};
use restskin::{demo, HttpServer};

pub const MANAGER_TOKEN: &str = "manager-token";
pub const VISITOR_TOKEN: &str = "visitor-token";

/// Config with a `manager` holding the content permission and a `visitor`
/// holding nothing.
pub fn config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.security.tokens = vec![
        TokenConfig {
            principal: "manager".into(),
            token: MANAGER_TOKEN.into(),
        },
        TokenConfig {
            principal: "visitor".into(),
            token: VISITOR_TOKEN.into(),
        },
    ];
    config.security.grants = vec![GrantConfig {
        principal: "manager".into(),
        permission: demo::MANAGE_CONTENT.into(),
        location: None,
    }];
    config
}

pub fn server(config: ServiceConfig) -> HttpServer {
    let app = Arc::new(demo::application().expect("sample application builds"));
    let tree = Arc::new(demo::resource_tree().expect("sample tree builds"));
    HttpServer::new(config, app, tree)
}

pub fn router(config: ServiceConfig) -> Router {
    server(config).router()
}

/// A response with its body collected.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.body).expect("utf-8 body")
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).map(|v| v.to_str().expect("ascii header"))
    }
}

pub async fn send(router: &Router, method: &str, uri: &str, token: Option<&str>, body: &[u8]) -> Reply {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = request.body(Body::from(body.to_vec())).unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec();
    Reply {
        status: parts.status,
        headers: parts.headers,
        body,
    }
}

pub async fn call(router: &Router, method: &str, uri: &str) -> Reply {
    send(router, method, uri, None, b"").await
}
