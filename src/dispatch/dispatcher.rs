//! Request-time dispatch state machine.
//!
//! ```text
//! RECEIVED
//!   → lookup (resource type, request layer, verb)
//!       miss / unrecognized verb          → NOT_ALLOWED
//!   → permission check on the winner
//!       anonymous caller lacks it         → UNAUTHORIZED
//!       authenticated caller lacks it     → FORBIDDEN
//!   → invoke
//!       refusal handler                   → NOT_ALLOWED
//!       handler error                     → DISPATCHED (failure)
//!       payload                           → DISPATCHED (success)
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::dispatch::allow::NotAllowed;
use crate::dispatch::handler::{Handler, HandlerError, Payload, RestRequest, RestView};
use crate::dispatch::table::DispatchTable;
use crate::security::{Permission, Principal, SecurityPolicy};
use crate::traversal::Resource;

/// Typed outcome of a request that did not produce a payload.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    NotAllowed(#[from] NotAllowed),

    #[error("{handler} requires permission {permission}")]
    Unauthorized { handler: String, permission: Permission },

    #[error("{principal} lacks permission {permission} for {handler}")]
    Forbidden {
        principal: String,
        handler: String,
        permission: Permission,
    },

    #[error("{handler} failed: {source}")]
    Handler {
        handler: String,
        #[source]
        source: HandlerError,
    },
}

/// Resolves, authorizes and invokes handlers against a frozen table.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    table: &'a DispatchTable,
    policy: &'a dyn SecurityPolicy,
}

impl<'a> Dispatcher<'a> {
    pub fn new(table: &'a DispatchTable, policy: &'a dyn SecurityPolicy) -> Self {
        Self { table, policy }
    }

    /// Find the handler for `request` and check the caller may use it.
    pub fn resolve(
        &self,
        resource: &dyn Resource,
        request: &RestRequest,
    ) -> Result<&'a Arc<Handler>, DispatchError> {
        let handler = self
            .table
            .lookup_method(&resource.type_tag(), &request.layer, &request.method)
            .ok_or_else(|| NotAllowed::resolve(self.table, resource, request))?;

        let permission = handler.permission();
        if !self
            .policy
            .is_authorized(&request.principal, permission, &request.location)
        {
            return Err(match &request.principal {
                Principal::Anonymous => DispatchError::Unauthorized {
                    handler: handler.name().to_string(),
                    permission: permission.clone(),
                },
                Principal::Authenticated(id) => DispatchError::Forbidden {
                    principal: id.clone(),
                    handler: handler.name().to_string(),
                    permission: permission.clone(),
                },
            });
        }
        Ok(handler)
    }

    /// Run the full state machine for one request.
    pub fn dispatch(
        &self,
        resource: &dyn Resource,
        request: &RestRequest,
    ) -> Result<Payload, DispatchError> {
        let handler = self.resolve(resource, request)?;
        let view = RestView {
            context: resource,
            request,
        };

        handler.invoke(&view).map_err(|err| match err {
            HandlerError::NotAllowed => NotAllowed::resolve(self.table, resource, request).into(),
            source => DispatchError::Handler {
                handler: handler.name().to_string(),
                source,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{DispatchTableBuilder, RestClass};
    use crate::security::{Grant, GrantPolicy};
    use crate::selector::{LayerHierarchy, LayerTag, TypeHierarchy, Verb};
    use crate::traversal::Model;

    fn table() -> DispatchTable {
        let mut types = TypeHierarchy::new();
        types.declare("MyContent".into(), &[]).unwrap();
        let mut layers = LayerHierarchy::new();
        layers.declare("LayerSecurity".into(), &[LayerTag::REST]).unwrap();

        let mut builder = DispatchTableBuilder::new();
        builder.register_class(
            RestClass::new("SecurityRest", "MyContent")
                .layer("LayerSecurity")
                .method(Verb::Get, |_| Ok("GET3".into()))
                .guarded(Verb::Post, Permission::named("content.Manage"), |view| {
                    Ok(view.body().into())
                })
                .method(Verb::Delete, |_| Err(HandlerError::Failed("disk on fire".into())))
                .method(Verb::Put, |_| Err(HandlerError::NotAllowed)),
        );
        builder.build(types, layers).unwrap()
    }

    fn request(method: &str) -> RestRequest {
        RestRequest::new(method, "LayerSecurity").with_location(vec!["alpha".into()])
    }

    #[test]
    fn test_public_get_dispatches() {
        let table = table();
        let policy = GrantPolicy::new();
        let alpha = Model::new("alpha", "MyContent");

        let payload = Dispatcher::new(&table, &policy)
            .dispatch(&alpha, &request("GET"))
            .unwrap();
        assert_eq!(payload, Payload::Text("GET3".into()));
    }

    #[test]
    fn test_guarded_handler_is_unauthorized_not_405() {
        let table = table();
        let policy = GrantPolicy::new();
        let alpha = Model::new("alpha", "MyContent");
        let dispatcher = Dispatcher::new(&table, &policy);

        let err = dispatcher.dispatch(&alpha, &request("POST")).unwrap_err();
        assert!(matches!(err, DispatchError::Unauthorized { .. }));

        let manager = request("POST").with_principal(Principal::Authenticated("bob".into()));
        let err = dispatcher.dispatch(&alpha, &manager).unwrap_err();
        assert!(matches!(err, DispatchError::Forbidden { ref principal, .. } if principal == "bob"));
    }

    #[test]
    fn test_granted_principal_dispatches() {
        let table = table();
        let policy = GrantPolicy::new().with_grant(Grant::global("bob", "content.Manage"));
        let alpha = Model::new("alpha", "MyContent");

        let request = request("POST")
            .with_principal(Principal::Authenticated("bob".into()))
            .with_body("posted");
        let payload = Dispatcher::new(&table, &policy).dispatch(&alpha, &request).unwrap();
        assert_eq!(payload, Payload::Bytes(b"posted".to_vec()));
    }

    #[test]
    fn test_unknown_method_and_refusal_are_not_allowed() {
        let table = table();
        let policy = GrantPolicy::new();
        let alpha = Model::new("alpha", "MyContent");
        let dispatcher = Dispatcher::new(&table, &policy);

        for method in ["FROG", "PUT"] {
            match dispatcher.dispatch(&alpha, &request(method)).unwrap_err() {
                DispatchError::NotAllowed(signal) => {
                    assert_eq!(signal.allow_header(), "DELETE, GET, POST, PUT");
                    assert_eq!(signal.method, method);
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        let plain = RestRequest::new("GET", LayerTag::HTTP);
        match dispatcher.dispatch(&alpha, &plain).unwrap_err() {
            DispatchError::NotAllowed(signal) => assert!(signal.allow.is_empty()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_handler_failure_is_reported() {
        let table = table();
        let policy = GrantPolicy::new();
        let alpha = Model::new("alpha", "MyContent");

        let err = Dispatcher::new(&table, &policy)
            .dispatch(&alpha, &request("DELETE"))
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Handler { source: HandlerError::Failed(_), .. }
        ));
    }
}
