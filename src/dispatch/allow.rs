//! Not-Allowed signal and `Allow` header computation.
//!
//! # Responsibilities
//! - Probe every verb for a real (non-refusal) handler on a target
//! - Carry the result in the typed [`NotAllowed`] failure
//!
//! # Design Decisions
//! - Verbs are probed and listed as DELETE, GET, POST, PUT
//! - The list depends only on (resource type, layer), never on the
//!   method that was requested
//! - Terminal: reported to the client, never retried

use thiserror::Error;

use crate::dispatch::handler::RestRequest;
use crate::dispatch::table::DispatchTable;
use crate::selector::{LayerTag, TypeTag, Verb};
use crate::traversal::Resource;

/// Body of every 405 response.
pub const NOT_ALLOWED_BODY: &str = "Method Not Allowed";

/// Content type of text responses, 405s included.
pub const TEXT_PLAIN_UTF8: &str = "text/plain;charset=utf-8";

/// Verbs with a real handler for `target` in `layer`, in `Allow` order.
pub fn allowed_verbs(table: &DispatchTable, target: &TypeTag, layer: &LayerTag) -> Vec<Verb> {
    Verb::ALLOW_ORDER
        .into_iter()
        .filter(|verb| {
            table
                .lookup(target, layer, *verb)
                .is_some_and(|handler| !handler.is_not_allowed())
        })
        .collect()
}

/// Render verbs as an `Allow` header value (empty when there are none).
pub fn allow_header(verbs: &[Verb]) -> String {
    verbs
        .iter()
        .map(Verb::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// No real handler exists for the requested method on the target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{method} not allowed on {resource_type} {resource:?} in {layer}")]
pub struct NotAllowed {
    pub method: String,
    pub resource_type: TypeTag,
    pub resource: String,
    pub layer: LayerTag,
    /// Verbs that would have succeeded, in `Allow` order.
    pub allow: Vec<Verb>,
}

impl NotAllowed {
    /// Build the signal for `request` against `resource`.
    pub fn resolve(table: &DispatchTable, resource: &dyn Resource, request: &RestRequest) -> Self {
        let resource_type = resource.type_tag();
        let allow = allowed_verbs(table, &resource_type, &request.layer);
        Self {
            method: request.method.clone(),
            resource_type,
            resource: resource.name().to_string(),
            layer: request.layer.clone(),
            allow,
        }
    }

    pub fn allow_header(&self) -> String {
        allow_header(&self.allow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{DispatchTableBuilder, RestClass};
    use crate::selector::{LayerHierarchy, TypeHierarchy};
    use crate::traversal::Model;

    fn table() -> DispatchTable {
        let mut types = TypeHierarchy::new();
        types.declare("MyApp".into(), &[]).unwrap();
        let mut layers = LayerHierarchy::new();
        layers.declare("LayerB".into(), &[LayerTag::REST]).unwrap();
        layers.declare("LayerC".into(), &[LayerTag::REST]).unwrap();

        let mut builder = DispatchTableBuilder::new();
        builder.register_class(
            RestClass::new("BRest", "MyApp")
                .layer("LayerB")
                .method(Verb::Put, |_| Ok(b"PUT".into()))
                .method(Verb::Get, |_| Ok("GET".into())),
        );
        builder.build(types, layers).unwrap()
    }

    #[test]
    fn test_allow_lists_real_handlers_in_fixed_order() {
        let table = table();
        let verbs = allowed_verbs(&table, &"MyApp".into(), &"LayerB".into());
        assert_eq!(verbs, [Verb::Get, Verb::Put]);
        assert_eq!(allow_header(&verbs), "GET, PUT");
    }

    #[test]
    fn test_allow_empty_when_only_refusals_match() {
        let table = table();
        assert!(allowed_verbs(&table, &"MyApp".into(), &"LayerC".into()).is_empty());
        assert!(allowed_verbs(&table, &"MyApp".into(), &LayerTag::HTTP).is_empty());
        assert_eq!(allow_header(&[]), "");
    }

    #[test]
    fn test_signal_independent_of_requested_method() {
        let table = table();
        let app = Model::new("app", "MyApp");

        let post = NotAllowed::resolve(&table, &app, &RestRequest::new("POST", "LayerB"));
        let frog = NotAllowed::resolve(&table, &app, &RestRequest::new("FROG", "LayerB"));
        assert_eq!(post.allow_header(), "GET, PUT");
        assert_eq!(post.allow, frog.allow);
        assert_eq!(frog.method, "FROG");
        assert_eq!(NOT_ALLOWED_BODY.len(), 18);
    }
}
