//! Handlers and the values they receive and return.

use std::fmt;

use thiserror::Error;

use crate::security::{Permission, Principal};
use crate::selector::{LayerTag, Selector};
use crate::traversal::Resource;

/// Response body produced by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Sent as `text/plain;charset=utf-8`.
    Text(String),
    /// Sent without a content type.
    Bytes(Vec<u8>),
}

impl Payload {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Bytes(bytes) => bytes,
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Payload::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Payload {
    fn from(bytes: &[u8; N]) -> Self {
        Payload::Bytes(bytes.to_vec())
    }
}

/// Failure raised from inside a handler body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The handler refuses the verb; rendered as a 405.
    #[error("method not allowed")]
    NotAllowed,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Failed(String),
}

/// What the dispatcher knows about an incoming request.
#[derive(Debug, Clone)]
pub struct RestRequest {
    /// Request method exactly as received (may be outside the verb set).
    pub method: String,
    /// Layer resolved from the skin segment, or the plain HTTP layer.
    pub layer: LayerTag,
    pub principal: Principal,
    /// Names traversed from the root to the target resource.
    pub location: Vec<String>,
    pub body: Vec<u8>,
}

impl RestRequest {
    pub fn new(method: impl Into<String>, layer: impl Into<LayerTag>) -> Self {
        Self {
            method: method.into(),
            layer: layer.into(),
            principal: Principal::Anonymous,
            location: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = principal;
        self
    }

    pub fn with_location(mut self, location: Vec<String>) -> Self {
        self.location = location;
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

/// The object and request a handler is invoked with.
#[derive(Debug, Clone, Copy)]
pub struct RestView<'a> {
    pub context: &'a dyn Resource,
    pub request: &'a RestRequest,
}

impl<'a> RestView<'a> {
    /// Raw request body as uploaded.
    pub fn body(&self) -> &'a [u8] {
        &self.request.body
    }

    /// Request body decoded as UTF-8.
    pub fn body_text(&self) -> Result<&'a str, HandlerError> {
        std::str::from_utf8(&self.request.body)
            .map_err(|e| HandlerError::BadRequest(format!("body is not UTF-8: {e}")))
    }

    /// The context resource as its concrete type.
    pub fn context_as<T: Resource>(&self) -> Option<&'a T> {
        self.context.as_any().downcast_ref::<T>()
    }
}

pub type InvokeFn = dyn Fn(&RestView<'_>) -> Result<Payload, HandlerError> + Send + Sync;

enum Invoke {
    Declared(Box<InvokeFn>),
    Refusal,
}

/// One registered verb handler.
pub struct Handler {
    selector: Selector,
    permission: Permission,
    name: String,
    invoke: Invoke,
}

impl Handler {
    pub fn new<F>(name: impl Into<String>, selector: Selector, permission: Permission, invoke: F) -> Self
    where
        F: Fn(&RestView<'_>) -> Result<Payload, HandlerError> + Send + Sync + 'static,
    {
        Self::from_boxed(name, selector, permission, Box::new(invoke))
    }

    pub(crate) fn from_boxed(
        name: impl Into<String>,
        selector: Selector,
        permission: Permission,
        invoke: Box<InvokeFn>,
    ) -> Self {
        Self {
            selector,
            permission,
            name: name.into(),
            invoke: Invoke::Declared(invoke),
        }
    }

    /// Public fallback handler that refuses every request.
    pub(crate) fn refusal(selector: Selector) -> Self {
        Self {
            selector,
            permission: Permission::Public,
            name: "NotAllowed".to_string(),
            invoke: Invoke::Refusal,
        }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn permission(&self) -> &Permission {
        &self.permission
    }

    /// Name of the resource class the handler was declared in.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True only for the synthetic fallback handlers.
    pub fn is_not_allowed(&self) -> bool {
        matches!(self.invoke, Invoke::Refusal)
    }

    pub fn invoke(&self, view: &RestView<'_>) -> Result<Payload, HandlerError> {
        match &self.invoke {
            Invoke::Declared(invoke) => invoke(view),
            Invoke::Refusal => Err(HandlerError::NotAllowed),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("selector", &self.selector)
            .field("permission", &self.permission)
            .field("is_not_allowed", &self.is_not_allowed())
            .finish()
    }
}
