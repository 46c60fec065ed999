//! Startup orchestration.
//!
//! # Responsibilities
//! - Collect type, layer, skin and handler declarations
//! - Validate them all at once and freeze the result
//!
//! # Design Decisions
//! - Fail fast: any misconfiguration aborts startup, never a request
//! - Every problem is reported, not just the first
//! - The frozen [`Application`] is shared via `Arc` and never mutated

use thiserror::Error;

use crate::dispatch::{
    DispatchTable, DispatchTableBuilder, HandlerError, Payload, RegistrationError, RestClass,
    RestView,
};
use crate::security::Permission;
use crate::selector::{LayerHierarchy, LayerTag, Selector, TypeHierarchy, TypeTag};
use crate::traversal::SkinRegistry;

/// Startup failed; carries every registration problem found.
#[derive(Debug, Error)]
#[error("application setup failed: {}", render(.errors))]
pub struct BuildError {
    pub errors: Vec<RegistrationError>,
}

fn render(errors: &[RegistrationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Collects declarations in the order application setup code makes them.
#[derive(Debug, Default)]
pub struct ApplicationBuilder {
    types: TypeHierarchy,
    layers: LayerHierarchy,
    skins: Vec<(String, LayerTag)>,
    table: DispatchTableBuilder,
    errors: Vec<RegistrationError>,
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a resource class or interface with the interfaces it
    /// implements or extends.
    pub fn declare_type(&mut self, tag: impl Into<TypeTag>, parents: &[TypeTag]) -> &mut Self {
        if let Err(e) = self.types.declare(tag.into(), parents) {
            self.errors.push(RegistrationError::Type(e));
        }
        self
    }

    /// Declare a request layer with the layers it extends.
    pub fn declare_layer(&mut self, tag: impl Into<LayerTag>, parents: &[LayerTag]) -> &mut Self {
        if let Err(e) = self.layers.declare(tag.into(), parents) {
            self.errors.push(RegistrationError::Layer(e));
        }
        self
    }

    /// Declare a layer directly extending the base REST layer.
    pub fn rest_layer(&mut self, tag: impl Into<LayerTag>) -> &mut Self {
        self.declare_layer(tag, &[LayerTag::REST])
    }

    /// Publish `layer` under the URL segment `<namespace><skin>`.
    pub fn restskin(&mut self, skin: impl Into<String>, layer: impl Into<LayerTag>) -> &mut Self {
        self.skins.push((skin.into(), layer.into()));
        self
    }

    pub fn rest_class(&mut self, class: RestClass) -> &mut Self {
        self.table.register_class(class);
        self
    }

    pub fn register<F>(&mut self, selector: Selector, permission: Permission, invoke: F) -> &mut Self
    where
        F: Fn(&RestView<'_>) -> Result<Payload, HandlerError> + Send + Sync + 'static,
    {
        self.table.register(selector, permission, invoke);
        self
    }

    /// Validate every declaration and freeze the application.
    pub fn build(self) -> Result<Application, BuildError> {
        let ApplicationBuilder {
            types,
            layers,
            skins,
            table,
            mut errors,
        } = self;

        let mut registry = SkinRegistry::new();
        for (skin, layer) in skins {
            if skin.is_empty() || skin.contains('/') {
                errors.push(RegistrationError::InvalidSkinTag(skin));
            } else if !layers.contains(&layer) {
                errors.push(RegistrationError::UnknownSkinLayer { skin, layer });
            } else if !layers.extends(&layer, &LayerTag::REST) {
                errors.push(RegistrationError::SkinLayerNotRest { skin, layer });
            } else if registry.contains(&skin) {
                errors.push(RegistrationError::DuplicateSkin(skin));
            } else {
                registry.insert(skin, layer);
            }
        }

        let table = match table.build(types, layers) {
            Ok(table) if errors.is_empty() => table,
            Ok(_) => return Err(BuildError { errors }),
            Err(table_errors) => {
                errors.extend(table_errors);
                return Err(BuildError { errors });
            }
        };

        tracing::info!(
            handlers = table.registrations().len(),
            skins = registry.iter().count(),
            "Application frozen"
        );
        Ok(Application {
            table,
            skins: registry,
        })
    }
}

/// Frozen registrations and skins, read-only while serving.
#[derive(Debug)]
pub struct Application {
    table: DispatchTable,
    skins: SkinRegistry,
}

impl Application {
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    pub fn skins(&self) -> &SkinRegistry {
        &self.skins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Verb;

    #[test]
    fn test_build_binds_skins() {
        let mut builder = Application::builder();
        builder
            .declare_type("MyApp", &[])
            .rest_layer("LayerB")
            .restskin("b", "LayerB")
            .rest_class(
                RestClass::new("BRest", "MyApp")
                    .layer("LayerB")
                    .method(Verb::Get, |_| Ok("GET".into())),
            );
        let app = builder.build().unwrap();

        assert_eq!(app.skins().layer("b").unwrap(), &LayerTag::new("LayerB"));
        assert!(app
            .table()
            .lookup(&"MyApp".into(), &"LayerB".into(), Verb::Get)
            .is_some_and(|h| !h.is_not_allowed()));
    }

    #[test]
    fn test_skin_on_non_rest_layer_fails_fast() {
        let mut builder = Application::builder();
        builder
            .declare_layer("IBrowserLayer", &[])
            .restskin("browser", "IBrowserLayer");

        let err = builder.build().unwrap_err();
        assert_eq!(
            err.errors,
            vec![RegistrationError::SkinLayerNotRest {
                skin: "browser".into(),
                layer: "IBrowserLayer".into(),
            }]
        );
        assert!(err.to_string().contains("does not extend IRESTLayer"));
    }

    #[test]
    fn test_collects_every_problem() {
        let mut builder = Application::builder();
        builder
            .declare_type("MyApp", &[])
            .declare_type("MyApp", &[])
            .rest_layer("LayerA")
            .restskin("a", "LayerA")
            .restskin("a", "LayerA")
            .restskin("", "LayerA")
            .restskin("z", "LayerZ")
            .rest_class(RestClass::new("Orphan", "Ghost").method(Verb::Get, |_| Ok("x".into())));

        let errors = builder.build().unwrap_err().errors;
        assert_eq!(errors.len(), 5);
        assert!(matches!(errors[0], RegistrationError::Type(_)));
        assert_eq!(errors[1], RegistrationError::DuplicateSkin("a".into()));
        assert_eq!(errors[2], RegistrationError::InvalidSkinTag(String::new()));
        assert!(matches!(errors[3], RegistrationError::UnknownSkinLayer { .. }));
        assert!(matches!(errors[4], RegistrationError::UnknownType { .. }));
    }
}
