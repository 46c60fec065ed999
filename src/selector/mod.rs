//! Selector model.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     type / layer declarations
//!     → hierarchy.rs (parent links, ranks, resolution orders)
//!
//! Request time:
//!     (resource type, request layer, verb)
//!     → candidate selectors, most specific first
//!     → dispatch table probes them in order
//! ```
//!
//! # Design Decisions
//! - Type specificity dominates layer specificity
//! - Verb is an exact match on a closed set, never a lattice

pub mod hierarchy;
pub mod verb;

use std::fmt;

use serde::Serialize;

pub use hierarchy::{
    Hierarchy, HierarchyError, LayerHierarchy, LayerTag, Tag, TypeHierarchy, TypeTag,
};
pub use verb::Verb;

/// Key identifying exactly one registered handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Selector {
    pub target: TypeTag,
    pub layer: LayerTag,
    pub verb: Verb,
}

impl Selector {
    pub fn new(target: impl Into<TypeTag>, layer: impl Into<LayerTag>, verb: Verb) -> Self {
        Self {
            target: target.into(),
            layer: layer.into(),
            verb,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @ {}", self.verb, self.target, self.layer)
    }
}

/// Iterate `(type, layer)` pairs in specificity order: every layer of the
/// most specific type first, then every layer of the next type, and so on.
pub fn candidates<'a>(
    types: &'a [TypeTag],
    layers: &'a [LayerTag],
) -> impl Iterator<Item = (&'a TypeTag, &'a LayerTag)> + 'a {
    types
        .iter()
        .flat_map(move |t| layers.iter().map(move |l| (t, l)))
}
