//! Skin resolution for `++rest++<tag>` path segments.
//!
//! # Responsibilities
//! - Map skin tags to REST layers
//! - Split a request path into its layer and traversal segments
//!
//! # Design Decisions
//! - A skin segment may appear anywhere in the path; it is removed from
//!   the traversal path and the last one wins
//! - Paths without a skin segment resolve to the plain HTTP layer, which
//!   no REST handler is registered for by default
//! - Unknown tags fail traversal (404), they never reach dispatch
//! - Segments are percent-decoded before matching; a segment that does
//!   not decode to UTF-8 fails traversal

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;

use crate::selector::LayerTag;
use crate::traversal::TraversalError;

/// Skin tags bound to REST layers. Frozen after startup.
#[derive(Debug, Clone, Default)]
pub struct SkinRegistry {
    skins: BTreeMap<String, LayerTag>,
}

impl SkinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `tag` to `layer`, returning the previous binding if any.
    /// Callers check that `layer` extends the REST layer.
    pub(crate) fn insert(&mut self, tag: impl Into<String>, layer: LayerTag) -> Option<LayerTag> {
        self.skins.insert(tag.into(), layer)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.skins.contains_key(tag)
    }

    /// Layer bound to `tag`.
    pub fn layer(&self, tag: &str) -> Result<&LayerTag, TraversalError> {
        self.skins
            .get(tag)
            .ok_or_else(|| TraversalError::UnknownSkin(tag.to_string()))
    }

    /// All bindings, sorted by tag.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LayerTag)> {
        self.skins.iter().map(|(tag, layer)| (tag.as_str(), layer))
    }

    /// Split `path` into the selected layer and the traversal segments.
    pub fn parse_path(&self, path: &str, namespace: &str) -> Result<RestPath, TraversalError> {
        let mut rest_path = RestPath {
            skin: None,
            layer: LayerTag::HTTP,
            segments: Vec::new(),
        };

        for raw in path.split('/').filter(|s| !s.is_empty()) {
            let segment = percent_decode_str(raw)
                .decode_utf8()
                .map_err(|_| TraversalError::NotFound(path.to_string()))?;
            match segment.strip_prefix(namespace) {
                Some(tag) => {
                    rest_path.layer = self.layer(tag)?.clone();
                    rest_path.skin = Some(tag.to_string());
                }
                None => rest_path.segments.push(segment.to_string()),
            }
        }
        Ok(rest_path)
    }
}

/// A request path with its skin segment resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestPath {
    /// Skin tag found in the path, if any.
    pub skin: Option<String>,
    /// Layer the request is served in.
    pub layer: LayerTag,
    /// Remaining names to traverse from the root.
    pub segments: Vec<String>,
}
