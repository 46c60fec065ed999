//! Sample application served by the `restskin` binary.
//!
//! # Layout
//! ```text
//! /                 Folder
//! ├── app           MyApp
//! │   ├── alpha     MyContent
//! │   ├── one       MyInterfaceContent (IFoo)
//! │   └── two       MyNoInterfaceContent (IFoo)
//! └── manfred       Mammoth
//! ```
//!
//! # Skins
//! | skin      | layer            | handlers                                   |
//! |-----------|------------------|--------------------------------------------|
//! | `a`       | LayerA           | ARest: every verb on MyApp                 |
//! | `b`       | LayerB           | BRest: GET, PUT on MyApp                   |
//! | `c`       | LayerC           | CRest: no verbs                            |
//! | `d`       | D                | DRest (base REST layer): GET on MyContent  |
//! | `e`       | LayerSecurity    | SecurityRest: public GET, guarded rest     |
//! | `f`       | LayerContent     | BodyTest: POST, PUT echo the body          |
//! | `g`       | LayerInterface   | InterfaceRest on IFoo, NoInterfaceRest     |
//! | `mammoth` | MammothRestLayer | MammothRest: guarded GET                   |

use std::any::Any;

use crate::dispatch::{HandlerError, Payload, RestClass, RestView};
use crate::lifecycle::{Application, BuildError};
use crate::security::Permission;
use crate::selector::{TypeTag, Verb};
use crate::traversal::{Model, Resource, ResourceTree, TraversalError};

/// Required for every SecurityRest verb except GET.
pub const MANAGE_CONTENT: &str = "content.Manage";

/// Required for MammothRest GET.
pub const TOUCH_MAMMOTH: &str = "mammoth.Touch";

/// A model that remembers its own name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mammoth {
    pub name: String,
}

impl Mammoth {
    pub const TYPE: TypeTag = TypeTag::new_static("Mammoth");

    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Resource for Mammoth {
    fn type_tag(&self) -> TypeTag {
        Self::TYPE
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn reply(text: &'static str) -> impl Fn(&RestView<'_>) -> Result<Payload, HandlerError> {
    move |_| Ok(Payload::Text(text.to_string()))
}

fn reply_bytes(bytes: &'static [u8]) -> impl Fn(&RestView<'_>) -> Result<Payload, HandlerError> {
    move |_| Ok(Payload::Bytes(bytes.to_vec()))
}

/// Declare and freeze the sample application.
pub fn application() -> Result<Application, BuildError> {
    let foo: TypeTag = "IFoo".into();
    let container: TypeTag = "IContainer".into();
    let manage = Permission::named(MANAGE_CONTENT);

    let mut builder = Application::builder();
    builder
        .declare_type("IContainer", &[])
        .declare_type("IFoo", &[])
        .declare_type("Folder", &[container.clone()])
        .declare_type("MyApp", &[container])
        .declare_type("MyContent", &[])
        .declare_type("MyInterfaceContent", &[foo.clone()])
        .declare_type("MyNoInterfaceContent", &[foo])
        .declare_type(Mammoth::TYPE, &[]);

    for (layer, skin) in [
        ("LayerA", "a"),
        ("LayerB", "b"),
        ("LayerC", "c"),
        ("D", "d"),
        ("LayerSecurity", "e"),
        ("LayerContent", "f"),
        ("LayerInterface", "g"),
        ("MammothRestLayer", "mammoth"),
    ] {
        builder.rest_layer(layer).restskin(skin, layer);
    }

    builder
        .rest_class(
            RestClass::new("ARest", "MyApp")
                .layer("LayerA")
                .method(Verb::Get, reply("GET"))
                .method(Verb::Post, reply("POST"))
                .method(Verb::Put, reply_bytes(b"PUT"))
                .method(Verb::Delete, reply_bytes(b"DELETE")),
        )
        .rest_class(
            RestClass::new("BRest", "MyApp")
                .layer("LayerB")
                .method(Verb::Get, reply("GET"))
                .method(Verb::Put, reply_bytes(b"PUT")),
        )
        .rest_class(RestClass::new("CRest", "MyApp").layer("LayerC"))
        .rest_class(RestClass::new("DRest", "MyContent").method(Verb::Get, reply("GET2")))
        .rest_class(
            RestClass::new("SecurityRest", "MyContent")
                .layer("LayerSecurity")
                .require(manage.clone())
                .guarded(Verb::Get, Permission::Public, reply("GET3"))
                .method(Verb::Post, reply("POST3"))
                .method(Verb::Put, reply_bytes(b"PUT3"))
                .method(Verb::Delete, reply_bytes(b"DELETE3")),
        )
        .rest_class(
            RestClass::new("BodyTest", "MyContent")
                .layer("LayerContent")
                .method(Verb::Post, |view| Ok(view.body_text()?.into()))
                .method(Verb::Put, |view| Ok(view.body().into())),
        )
        .rest_class(
            RestClass::new("InterfaceRest", "IFoo")
                .layer("LayerInterface")
                .method(Verb::Get, reply("GET interface registered"))
                .method(Verb::Post, reply("POST interface registered"))
                .method(Verb::Put, reply_bytes(b"PUT interface registered"))
                .method(Verb::Delete, reply_bytes(b"DELETE interface registered")),
        )
        .rest_class(
            RestClass::new("NoInterfaceRest", "MyNoInterfaceContent")
                .layer("LayerInterface")
                .method(Verb::Get, reply("GET directly registered"))
                .method(Verb::Put, reply_bytes(b"PUT directly registered")),
        )
        .rest_class(
            RestClass::new("MammothRest", Mammoth::TYPE)
                .layer("MammothRestLayer")
                .guarded(Verb::Get, Permission::named(TOUCH_MAMMOTH), |view| {
                    view.context_as::<Mammoth>()
                        .map(|mammoth| Payload::Text(mammoth.name.clone()))
                        .ok_or_else(|| HandlerError::Failed("context is not a mammoth".into()))
                }),
        );

    builder.build()
}

/// The sample resource tree.
pub fn resource_tree() -> Result<ResourceTree, TraversalError> {
    let mut tree = ResourceTree::new(Model::new("", "Folder"));
    tree.insert(&[], Model::new("app", "MyApp"))?
        .insert(&[], Mammoth::new("manfred"))?
        .insert(&["app"], Model::new("alpha", "MyContent"))?
        .insert(&["app"], Model::new("one", "MyInterfaceContent"))?
        .insert(&["app"], Model::new("two", "MyNoInterfaceContent"))?;
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::LayerTag;

    #[test]
    fn test_application_builds() {
        let app = application().unwrap();
        assert_eq!(app.skins().iter().count(), 8);
        assert_eq!(app.skins().layer("d").unwrap(), &LayerTag::new("D"));

        let registrations = app.table().registrations();
        let real = registrations.iter().filter(|r| !r.not_allowed).count();
        // 4 + 2 + 0 + 1 + 4 + 2 + 4 + 2 + 1
        assert_eq!(real, 20);
        assert_eq!(registrations.len(), real + 4);
    }

    #[test]
    fn test_resource_tree_layout() {
        let tree = resource_tree().unwrap();
        assert_eq!(tree.children(&["app"]).unwrap(), ["alpha", "one", "two"]);
        let manfred = tree.traverse(&["manfred"]).unwrap();
        assert_eq!(manfred.type_tag(), Mammoth::TYPE);
        assert_eq!(manfred.name(), "manfred");
    }
}
