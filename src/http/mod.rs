//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all handler)
//!     → request.rs (request ID, RestRequest construction)
//!     → [skin resolution + traversal] (traversal)
//!     → [lookup, permission check, invoke] (dispatch)
//!     → response.rs (200 / 401 / 403 / 404 / 405 rendering)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::render_dispatch_error;
pub use server::{AppState, HttpServer};
