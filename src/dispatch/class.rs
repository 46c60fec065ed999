//! Declarative resource classes.
//!
//! A resource class groups the verb handlers an application writes for one
//! context type, with the layer and permission they share. It is only a
//! declaration: registering it splits it into one independently guarded
//! handler per verb.

use crate::dispatch::handler::{Handler, HandlerError, InvokeFn, Payload, RestView};
use crate::security::Permission;
use crate::selector::{LayerTag, Selector, TypeTag, Verb};

struct Method {
    verb: Verb,
    permission: Option<Permission>,
    invoke: Box<InvokeFn>,
}

/// Verb handlers declared together for a context type and layer.
pub struct RestClass {
    name: String,
    context: TypeTag,
    layer: LayerTag,
    permission: Option<Permission>,
    methods: Vec<Method>,
}

impl RestClass {
    /// Declare a class for `context` in the base REST layer.
    pub fn new(name: impl Into<String>, context: impl Into<TypeTag>) -> Self {
        Self {
            name: name.into(),
            context: context.into(),
            layer: LayerTag::REST,
            permission: None,
            methods: Vec::new(),
        }
    }

    pub fn layer(mut self, layer: impl Into<LayerTag>) -> Self {
        self.layer = layer.into();
        self
    }

    /// Permission for every method that does not name its own.
    pub fn require(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    /// Add a handler for `verb`. Declaring a verb twice keeps the last one.
    pub fn method<F>(self, verb: Verb, invoke: F) -> Self
    where
        F: Fn(&RestView<'_>) -> Result<Payload, HandlerError> + Send + Sync + 'static,
    {
        self.push(verb, None, Box::new(invoke))
    }

    /// Add a handler for `verb` guarded by its own permission.
    pub fn guarded<F>(self, verb: Verb, permission: Permission, invoke: F) -> Self
    where
        F: Fn(&RestView<'_>) -> Result<Payload, HandlerError> + Send + Sync + 'static,
    {
        self.push(verb, Some(permission), Box::new(invoke))
    }

    fn push(mut self, verb: Verb, permission: Option<Permission>, invoke: Box<InvokeFn>) -> Self {
        self.methods.retain(|m| m.verb != verb);
        self.methods.push(Method {
            verb,
            permission,
            invoke,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Verbs this class handles, in declaration order.
    pub fn verbs(&self) -> Vec<Verb> {
        self.methods.iter().map(|m| m.verb).collect()
    }

    /// Split into one handler per declared verb.
    pub fn into_handlers(self) -> Vec<Handler> {
        let RestClass {
            name,
            context,
            layer,
            permission,
            methods,
        } = self;

        methods
            .into_iter()
            .map(|method| {
                let permission = method
                    .permission
                    .or_else(|| permission.clone())
                    .unwrap_or_default();
                Handler::from_boxed(
                    name.clone(),
                    Selector::new(context.clone(), layer.clone(), method.verb),
                    permission,
                    method.invoke,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_permission_overrides_class_permission() {
        let class = RestClass::new("SecurityRest", "MyContent")
            .layer("LayerSecurity")
            .require(Permission::named("content.Manage"))
            .guarded(Verb::Get, Permission::Public, |_| Ok("GET3".into()))
            .method(Verb::Post, |_| Ok("POST3".into()));

        assert_eq!(class.verbs(), [Verb::Get, Verb::Post]);

        let handlers = class.into_handlers();
        assert_eq!(handlers.len(), 2);
        assert_eq!(handlers[0].permission(), &Permission::Public);
        assert_eq!(handlers[1].permission(), &Permission::named("content.Manage"));
        assert_eq!(
            handlers[1].selector(),
            &Selector::new("MyContent", "LayerSecurity", Verb::Post)
        );
        assert_eq!(handlers[1].name(), "SecurityRest");
    }

    #[test]
    fn test_defaults_to_public_rest_layer() {
        let handlers = RestClass::new("DRest", "MyContent")
            .method(Verb::Get, |_| Ok("GET2".into()))
            .into_handlers();

        assert_eq!(handlers[0].selector().layer, LayerTag::REST);
        assert!(handlers[0].permission().is_public());
    }

    #[test]
    fn test_class_without_verbs_registers_nothing() {
        assert!(RestClass::new("CRest", "MyApp").into_handlers().is_empty());
    }
}
