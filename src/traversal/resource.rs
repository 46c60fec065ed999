//! Resources and the tree they are published in.
//!
//! # Responsibilities
//! - Describe a published object by its type tag and name
//! - Resolve a path of names to a resource (404 on a miss)
//!
//! # Design Decisions
//! - The tree is built at startup and read-only while serving
//! - Children are kept sorted by name for stable listings

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::selector::TypeTag;
use crate::traversal::TraversalError;

/// An object REST handlers can be invoked on.
pub trait Resource: Any + Send + Sync + fmt::Debug {
    /// Most specific type of this resource.
    fn type_tag(&self) -> TypeTag;

    /// Name of the resource within its container.
    fn name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

/// A plain named resource of a given type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub name: String,
    pub type_tag: TypeTag,
}

impl Model {
    pub fn new(name: impl Into<String>, type_tag: impl Into<TypeTag>) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
        }
    }
}

impl Resource for Model {
    fn type_tag(&self) -> TypeTag {
        self.type_tag.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
struct Node {
    resource: Arc<dyn Resource>,
    children: BTreeMap<String, Node>,
}

impl Node {
    fn new(resource: Arc<dyn Resource>) -> Self {
        Self {
            resource,
            children: BTreeMap::new(),
        }
    }
}

/// Containment tree of published resources.
#[derive(Debug)]
pub struct ResourceTree {
    root: Node,
}

impl ResourceTree {
    pub fn new(root: impl Resource) -> Self {
        Self {
            root: Node::new(Arc::new(root)),
        }
    }

    /// Add `resource` under the container at `parent`, keyed by its name.
    /// An existing child with the same name is replaced.
    pub fn insert(
        &mut self,
        parent: &[&str],
        resource: impl Resource,
    ) -> Result<&mut Self, TraversalError> {
        let mut node = &mut self.root;
        for (depth, name) in parent.iter().enumerate() {
            node = node
                .children
                .get_mut(*name)
                .ok_or_else(|| TraversalError::NotFound(format!("/{}", parent[..=depth].join("/"))))?;
        }

        let name = resource.name().to_string();
        node.children.insert(name, Node::new(Arc::new(resource)));
        Ok(self)
    }

    /// Resolve `path` from the root. An empty path yields the root.
    pub fn traverse<S: AsRef<str>>(&self, path: &[S]) -> Result<Arc<dyn Resource>, TraversalError> {
        let mut node = &self.root;
        for name in path {
            node = node
                .children
                .get(name.as_ref())
                .ok_or_else(|| TraversalError::NotFound(render_path(path)))?;
        }
        Ok(Arc::clone(&node.resource))
    }

    /// Names of the direct children at `path`.
    pub fn children<S: AsRef<str>>(&self, path: &[S]) -> Result<Vec<String>, TraversalError> {
        let mut node = &self.root;
        for name in path {
            node = node
                .children
                .get(name.as_ref())
                .ok_or_else(|| TraversalError::NotFound(render_path(path)))?;
        }
        Ok(node.children.keys().cloned().collect())
    }
}

fn render_path<S: AsRef<str>>(path: &[S]) -> String {
    let mut rendered = String::new();
    for name in path {
        rendered.push('/');
        rendered.push_str(name.as_ref());
    }
    if rendered.is_empty() {
        rendered.push('/');
    }
    rendered
}
