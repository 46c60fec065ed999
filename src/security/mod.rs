//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → authentication.rs (bearer token → principal)
//!     → [dispatch resolves handler + its permission]
//!     → access_control.rs (principal holds permission at location?)
//!     → invoke handler, or 401 (anonymous) / 403 (authenticated)
//! ```
//!
//! # Design Decisions
//! - Fail closed: no matching grant means no access
//! - Checked once, on the handler chosen for the request
//! - Unknown credentials degrade to anonymous rather than erroring

pub mod access_control;
pub mod authentication;
pub mod permission;

pub use access_control::{Grant, GrantPolicy, SecurityPolicy, ANYBODY};
pub use authentication::TokenAuthenticator;
pub use permission::{Permission, Principal};
