//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with a single catch-all REST handler
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Resolve skin and resource, authenticate, dispatch, render
//! - Log and record metrics for every request
//! - Serve until shutdown is triggered

use std::error::Error as _;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{request::Parts, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use http_body_util::LengthLimitError;
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{RestConfig, ServiceConfig};
use crate::dispatch::{DispatchError, Dispatcher};
use crate::http::request::{request_id, rest_request, MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::render_dispatch_error;
use crate::lifecycle::{Application, Shutdown};
use crate::observability::metrics;
use crate::security::{GrantPolicy, SecurityPolicy, TokenAuthenticator};
use crate::traversal::ResourceTree;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
    pub tree: Arc<ResourceTree>,
    pub policy: Arc<dyn SecurityPolicy>,
    pub auth: Arc<TokenAuthenticator>,
    pub rest: RestConfig,
    pub max_body_bytes: usize,
}

/// HTTP server publishing an [`Application`] over a resource tree.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a server; grants and tokens come from `config.security`.
    pub fn new(config: ServiceConfig, app: Arc<Application>, tree: Arc<ResourceTree>) -> Self {
        let policy = Arc::new(GrantPolicy::from_config(&config.security));
        Self::with_policy(config, app, tree, policy)
    }

    /// Create a server with a custom security policy.
    pub fn with_policy(
        config: ServiceConfig,
        app: Arc<Application>,
        tree: Arc<ResourceTree>,
        policy: Arc<dyn SecurityPolicy>,
    ) -> Self {
        let state = AppState {
            app,
            tree,
            policy,
            auth: Arc::new(TokenAuthenticator::from_config(&config.security)),
            rest: config.rest.clone(),
            max_body_bytes: config.limits.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .fallback(rest_handler)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone()))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID.clone(), MakeRequestUuid))
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` is triggered, then drain.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            skin_namespace = %self.config.rest.skin_namespace,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.signalled())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Catch-all REST handler.
async fn rest_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers).to_string();
    let method = parts.method.to_string();
    let path = parts.uri.path().to_string();

    let response = serve_rest(&state, parts, body, &request_id).await;

    let status = response.status().as_u16();
    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );
    metrics::record_request(&method, status, start);
    response
}

async fn serve_rest(state: &AppState, parts: Parts, body: Body, request_id: &str) -> Response {
    let path = match state
        .app
        .skins()
        .parse_path(parts.uri.path(), &state.rest.skin_namespace)
    {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!(request_id = %request_id, error = %e, "Skin resolution failed");
            return e.into_response();
        }
    };

    let resource = match state.tree.traverse(&path.segments) {
        Ok(resource) => resource,
        Err(e) => {
            tracing::debug!(request_id = %request_id, error = %e, "Traversal failed");
            return e.into_response();
        }
    };

    let principal = state.auth.authenticate(&parts.headers);

    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
            return body_error_status(&e).into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        skin = ?path.skin,
        layer = %path.layer,
        resource = %resource.name(),
        resource_type = %resource.type_tag(),
        principal = %principal,
        "Dispatching"
    );

    let request = rest_request(&parts.method, path, principal, body.to_vec());
    match Dispatcher::new(state.app.table(), state.policy.as_ref()).dispatch(resource.as_ref(), &request) {
        Ok(payload) => payload.into_response(),
        Err(err) => {
            match &err {
                DispatchError::Handler { .. } => {
                    tracing::error!(request_id = %request_id, error = %err, "Handler failed")
                }
                _ => tracing::debug!(request_id = %request_id, error = %err, "Request refused"),
            }
            render_dispatch_error(err, &state.rest.realm)
        }
    }
}

/// 413 when the body hit the size limit, 400 for any other read failure.
fn body_error_status(err: &axum::Error) -> StatusCode {
    let mut cause = err.source();
    while let Some(e) = cause {
        if e.is::<LengthLimitError>() {
            return StatusCode::PAYLOAD_TOO_LARGE;
        }
        cause = e.source();
    }
    StatusCode::BAD_REQUEST
}
