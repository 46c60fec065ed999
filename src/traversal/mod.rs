//! Traversal subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming path "/++rest++b/app/alpha"
//!     → skin.rs (strip skin segment, resolve layer or fail)
//!     → resource.rs (walk the resource tree or fail)
//!     → Return: (layer, resource) for dispatch
//! ```
//!
//! # Design Decisions
//! - Both failures are 404-class and happen before any handler lookup
//! - Tree and skins are immutable at runtime (no locks)

pub mod resource;
pub mod skin;

use thiserror::Error;

pub use resource::{Model, Resource, ResourceTree};
pub use skin::{RestPath, SkinRegistry};

/// Failure to resolve a request path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraversalError {
    #[error("unknown skin {0:?}")]
    UnknownSkin(String),

    #[error("no resource at {0}")]
    NotFound(String),
}

/// Split an absolute location such as `/app/alpha` into its names.
pub fn path_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
