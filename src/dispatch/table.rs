//! Handler registration and best-match lookup.
//!
//! # Responsibilities
//! - Collect handler registrations during startup
//! - Reject selectors naming undeclared types or layers
//! - Install the public refusal handlers on (any type, REST layer)
//! - Find the most specific handler for (type, layer, verb)
//!
//! # Design Decisions
//! - Built once, frozen, shared read-only (no locks on lookup)
//! - A repeated selector replaces the earlier registration (logged)
//! - Lookup probes candidate selectors in specificity order; there is no
//!   linear scan over registrations

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::dispatch::class::RestClass;
use crate::dispatch::handler::{Handler, HandlerError, Payload, RestView};
use crate::security::Permission;
use crate::selector::{
    candidates, HierarchyError, LayerHierarchy, LayerTag, Selector, TypeHierarchy, TypeTag, Verb,
};

/// Configuration-time failure. Raised while building, never per request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("type declaration failed: {0}")]
    Type(HierarchyError),

    #[error("layer declaration failed: {0}")]
    Layer(HierarchyError),

    #[error("{handler} registers {selector} on an undeclared type")]
    UnknownType { handler: String, selector: Selector },

    #[error("{handler} registers {selector} in an undeclared layer")]
    UnknownLayer { handler: String, selector: Selector },

    #[error("skin {skin:?} names undeclared layer {layer}")]
    UnknownSkinLayer { skin: String, layer: LayerTag },

    #[error(
        "skin {skin:?} is bound to {layer}, which does not extend {}; \
         layers registered as skins must extend it",
        LayerTag::REST
    )]
    SkinLayerNotRest { skin: String, layer: LayerTag },

    #[error("skin {0:?} is registered more than once")]
    DuplicateSkin(String),

    #[error("skin tag {0:?} must be non-empty and must not contain '/'")]
    InvalidSkinTag(String),
}

type ByLayer = HashMap<LayerTag, Arc<Handler>>;
type ByType = HashMap<TypeTag, ByLayer>;

/// Collects registrations during startup.
#[derive(Debug, Default)]
pub struct DispatchTableBuilder {
    handlers: HashMap<Selector, Handler>,
}

impl DispatchTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single handler under `selector`.
    pub fn register<F>(&mut self, selector: Selector, permission: Permission, invoke: F) -> &mut Self
    where
        F: Fn(&RestView<'_>) -> Result<Payload, HandlerError> + Send + Sync + 'static,
    {
        let name = selector.target.to_string();
        self.register_handler(Handler::new(name, selector, permission, invoke))
    }

    pub fn register_handler(&mut self, handler: Handler) -> &mut Self {
        let selector = handler.selector().clone();
        if let Some(previous) = self.handlers.insert(selector.clone(), handler) {
            tracing::warn!(
                selector = %selector,
                replaced = %previous.name(),
                "Duplicate handler registration, keeping the latest"
            );
        }
        self
    }

    /// Register every verb handler of a resource class.
    pub fn register_class(&mut self, class: RestClass) -> &mut Self {
        tracing::debug!(class = %class.name(), verbs = ?class.verbs(), "Registering resource class");
        for handler in class.into_handlers() {
            self.register_handler(handler);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Validate every selector and freeze the table.
    pub fn build(
        self,
        types: TypeHierarchy,
        layers: LayerHierarchy,
    ) -> Result<DispatchTable, Vec<RegistrationError>> {
        let mut errors = Vec::new();
        for (selector, handler) in &self.handlers {
            if !types.contains(&selector.target) {
                errors.push(RegistrationError::UnknownType {
                    handler: handler.name().to_string(),
                    selector: selector.clone(),
                });
            }
            if !layers.contains(&selector.layer) {
                errors.push(RegistrationError::UnknownLayer {
                    handler: handler.name().to_string(),
                    selector: selector.clone(),
                });
            }
        }
        if !errors.is_empty() {
            errors.sort_by(|a, b| a.to_string().cmp(&b.to_string()));
            return Err(errors);
        }

        let mut handlers = self.handlers;
        for verb in Verb::ALLOW_ORDER {
            handlers
                .entry(Selector::new(TypeTag::ANY, LayerTag::REST, verb))
                .or_insert_with_key(|selector| Handler::refusal(selector.clone()));
        }

        let count = handlers.len();
        let mut by_verb: HashMap<Verb, ByType> = HashMap::new();
        for (selector, handler) in handlers {
            by_verb
                .entry(selector.verb)
                .or_default()
                .entry(selector.target)
                .or_default()
                .insert(selector.layer, Arc::new(handler));
        }

        tracing::debug!(handlers = count, "Dispatch table frozen");
        Ok(DispatchTable {
            by_verb,
            types,
            layers,
        })
    }
}

/// A registered selector as shown by introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    #[serde(flatten)]
    pub selector: Selector,
    pub handler: String,
    pub permission: Permission,
    pub not_allowed: bool,
}

/// Frozen registration table.
#[derive(Debug)]
pub struct DispatchTable {
    by_verb: HashMap<Verb, ByType>,
    types: TypeHierarchy,
    layers: LayerHierarchy,
}

impl DispatchTable {
    /// Most specific handler for `verb` on a resource of type `target`
    /// requested in `layer`.
    pub fn lookup(&self, target: &TypeTag, layer: &LayerTag, verb: Verb) -> Option<&Arc<Handler>> {
        let by_type = self.by_verb.get(&verb)?;
        let found = candidates(
            self.types.resolution_order(target),
            self.layers.resolution_order(layer),
        )
        .find_map(|(t, l)| by_type.get(t).and_then(|by_layer| by_layer.get(l)));

        tracing::trace!(
            resource_type = %target,
            layer = %layer,
            verb = %verb,
            handler = ?found.map(|h| h.selector()),
            "Handler lookup"
        );
        found
    }

    /// Like [`lookup`](Self::lookup) for a raw request method. Methods
    /// outside the verb set never match.
    pub fn lookup_method(&self, target: &TypeTag, layer: &LayerTag, method: &str) -> Option<&Arc<Handler>> {
        Verb::parse(method).and_then(|verb| self.lookup(target, layer, verb))
    }

    pub fn types(&self) -> &TypeHierarchy {
        &self.types
    }

    pub fn layers(&self) -> &LayerHierarchy {
        &self.layers
    }

    /// Every registered selector, sorted.
    pub fn registrations(&self) -> Vec<Registration> {
        let mut registrations: Vec<Registration> = self
            .by_verb
            .values()
            .flat_map(|by_type| by_type.values())
            .flat_map(|by_layer| by_layer.values())
            .map(|handler| Registration {
                selector: handler.selector().clone(),
                handler: handler.name().to_string(),
                permission: handler.permission().clone(),
                not_allowed: handler.is_not_allowed(),
            })
            .collect();
        registrations.sort_by(|a, b| a.selector.cmp(&b.selector));
        registrations
    }
}
