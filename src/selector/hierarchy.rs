//! Explicit type and layer lattices.
//!
//! # Responsibilities
//! - Hold "implements"/"extends" parent links declared at startup
//! - Precompute each node's rank (longest path to the root)
//! - Precompute each node's resolution order, most specific first
//!
//! # Design Decisions
//! - Parents must be declared before children, so the graph is acyclic
//!   by construction
//! - Every node descends from the root, which is always last in any
//!   resolution order
//! - Ties between equally ranked ancestors fall back to breadth-first
//!   discovery order through the declared parents

use std::borrow::Cow;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;

use serde::Serialize;
use thiserror::Error;

/// A node identifier in a [`Hierarchy`].
pub trait Tag: Clone + Eq + Hash + fmt::Debug + fmt::Display {
    /// The universal root every other node descends from.
    fn root() -> Self;

    /// Nodes every hierarchy of this tag type starts out with, as
    /// `(tag, parents)` in declaration order.
    fn builtins() -> Vec<(Self, Vec<Self>)> {
        Vec::new()
    }
}

/// Identifies a resource class or an interface resources provide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TypeTag(Cow<'static, str>);

impl TypeTag {
    /// The universal interface every resource provides.
    pub const ANY: TypeTag = TypeTag(Cow::Borrowed("Interface"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Tag usable in `const` items.
    pub const fn new_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Tag for TypeTag {
    fn root() -> Self {
        Self::ANY
    }
}

/// Identifies a request layer (protocol variant / skin).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LayerTag(Cow<'static, str>);

impl LayerTag {
    /// Layer every HTTP request provides, REST or not.
    pub const HTTP: LayerTag = LayerTag(Cow::Borrowed("IHTTPRequest"));

    /// Base REST layer. Default layer for handler registrations and the
    /// required ancestor of every layer bound to a skin.
    pub const REST: LayerTag = LayerTag(Cow::Borrowed("IRESTLayer"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Tag for LayerTag {
    fn root() -> Self {
        Self::HTTP
    }

    fn builtins() -> Vec<(Self, Vec<Self>)> {
        vec![(Self::REST, vec![Self::HTTP])]
    }
}

macro_rules! tag_conversions {
    ($tag:ident) => {
        impl fmt::Display for $tag {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&'static str> for $tag {
            fn from(name: &'static str) -> Self {
                Self::new(name)
            }
        }

        impl From<String> for $tag {
            fn from(name: String) -> Self {
                Self::new(name)
            }
        }
    };
}

tag_conversions!(TypeTag);
tag_conversions!(LayerTag);

/// Errors raised while declaring hierarchy nodes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("{0} is already declared")]
    Duplicate(String),

    #[error("{tag} names undeclared parent {parent}")]
    UnknownParent { tag: String, parent: String },
}

#[derive(Debug, Clone)]
struct Node<T> {
    rank: usize,
    parents: Vec<T>,
    resolution_order: Vec<T>,
}

/// A directed acyclic "is-a" structure over tags.
#[derive(Debug, Clone)]
pub struct Hierarchy<T: Tag> {
    nodes: HashMap<T, Node<T>>,
    declared: Vec<T>,
    root_only: Vec<T>,
}

pub type TypeHierarchy = Hierarchy<TypeTag>;
pub type LayerHierarchy = Hierarchy<LayerTag>;

impl<T: Tag> Hierarchy<T> {
    /// Create a hierarchy holding the root and the tag type's builtins.
    pub fn new() -> Self {
        let root = T::root();
        let mut nodes = HashMap::new();
        nodes.insert(
            root.clone(),
            Node {
                rank: 0,
                parents: Vec::new(),
                resolution_order: vec![root.clone()],
            },
        );

        let mut hierarchy = Self {
            nodes,
            declared: vec![root.clone()],
            root_only: vec![root],
        };

        for (tag, parents) in T::builtins() {
            // Builtins only reference the root or earlier builtins.
            let declared = hierarchy.declare(tag, &parents);
            debug_assert!(declared.is_ok(), "builtin declaration failed: {declared:?}");
        }
        hierarchy
    }

    /// Declare `tag` with the given parents. An empty parent list attaches
    /// the node directly below the root.
    pub fn declare(&mut self, tag: T, parents: &[T]) -> Result<(), HierarchyError> {
        if self.nodes.contains_key(&tag) {
            return Err(HierarchyError::Duplicate(tag.to_string()));
        }

        let mut direct: Vec<T> = Vec::with_capacity(parents.len().max(1));
        for parent in parents {
            if !self.nodes.contains_key(parent) {
                return Err(HierarchyError::UnknownParent {
                    tag: tag.to_string(),
                    parent: parent.to_string(),
                });
            }
            if !direct.contains(parent) {
                direct.push(parent.clone());
            }
        }
        if direct.is_empty() {
            direct.push(T::root());
        }

        let rank = 1 + direct.iter().map(|p| self.rank(p)).max().unwrap_or(0);

        // Breadth-first walk through the declared parents.
        let mut seen = HashSet::new();
        let mut ancestors = Vec::new();
        let mut queue: VecDeque<T> = direct.iter().cloned().collect();
        while let Some(next) = queue.pop_front() {
            if !seen.insert(next.clone()) {
                continue;
            }
            if let Some(node) = self.nodes.get(&next) {
                queue.extend(node.parents.iter().cloned());
            }
            ancestors.push(next);
        }
        // Stable sort keeps discovery order among equal ranks.
        ancestors.sort_by_key(|t| Reverse(self.rank(t)));

        let mut resolution_order = Vec::with_capacity(ancestors.len() + 1);
        resolution_order.push(tag.clone());
        resolution_order.extend(ancestors);

        self.nodes.insert(
            tag.clone(),
            Node {
                rank,
                parents: direct,
                resolution_order,
            },
        );
        self.declared.push(tag);
        Ok(())
    }

    pub fn contains(&self, tag: &T) -> bool {
        self.nodes.contains_key(tag)
    }

    /// Longest path from `tag` to the root. Undeclared tags rank as the root.
    pub fn rank(&self, tag: &T) -> usize {
        self.nodes.get(tag).map(|n| n.rank).unwrap_or(0)
    }

    /// `tag` followed by all its ancestors, most specific first.
    /// Undeclared tags resolve as the root alone.
    pub fn resolution_order(&self, tag: &T) -> &[T] {
        self.nodes
            .get(tag)
            .map(|n| n.resolution_order.as_slice())
            .unwrap_or(&self.root_only)
    }

    /// Whether `tag` is `ancestor` or descends from it.
    pub fn extends(&self, tag: &T, ancestor: &T) -> bool {
        self.nodes
            .get(tag)
            .map(|n| n.resolution_order.contains(ancestor))
            .unwrap_or(false)
    }

    /// Declared tags in declaration order, root first.
    pub fn tags(&self) -> impl Iterator<Item = &T> {
        self.declared.iter()
    }
}

impl<T: Tag> Default for Hierarchy<T> {
    fn default() -> Self {
        Self::new()
    }
}
