//! REST publication with declarative per-verb dispatch.
//!
//! Resource classes declare handlers for `GET`, `POST`, `PUT` and `DELETE`
//! on a context type within a request layer. Registrations are frozen into
//! a dispatch table; a request resolves to the most specific handler for
//! its resource type, layer and verb, or to a `405 Method Not Allowed`
//! listing the verbs that would have worked.

pub mod config;
pub mod demo;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod selector;
pub mod traversal;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::{Application, ApplicationBuilder, Shutdown};
