use crate::view::{ViewDefinition, ViewName};
use std::{collections::BTreeMap, sync::Arc};
use thiserror::Error as ThisError;

///
/// RegistryError
///

#[remain::sorted]
#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("view '{name}' is already registered")]
    DuplicateView { name: ViewName },
}

///
/// ViewRegistry
///
/// Named view definitions, immutable once registered. Definitions are held
/// behind `Arc` so the maintainer and read surfaces can share them without
/// cloning the projection payload.
///

#[derive(Clone, Debug, Default)]
pub struct ViewRegistry {
    views: BTreeMap<ViewName, Arc<ViewDefinition>>,
}

impl ViewRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one view definition. Re-registering a name is an error:
    /// definitions never change in place, they are superseded by new names.
    pub fn register(&mut self, definition: ViewDefinition) -> Result<(), RegistryError> {
        let name = definition.name.clone();
        if self.views.contains_key(&name) {
            return Err(RegistryError::DuplicateView { name });
        }

        self.views.insert(name, Arc::new(definition));
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &ViewName) -> Option<&Arc<ViewDefinition>> {
        self.views.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &ViewName) -> bool {
        self.views.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ViewDefinition>> {
        self.views.values()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Projection, ValueSpec};

    fn definition(name: &str) -> ViewDefinition {
        ViewDefinition::new(
            name,
            "order",
            Projection::Field {
                field: "modified".to_string(),
                value: ValueSpec::Null,
            },
        )
    }

    #[test]
    fn register_then_get_round_trips() {
        let mut registry = ViewRegistry::new();
        registry.register(definition("order/modified")).expect("register");

        let fetched = registry
            .get(&ViewName::from("order/modified"))
            .expect("registered view");
        assert_eq!(fetched.doctype, "order");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ViewRegistry::new();
        registry.register(definition("order/modified")).expect("register");

        let err = registry
            .register(definition("order/modified"))
            .expect_err("duplicate");
        assert!(matches!(err, RegistryError::DuplicateView { .. }));
    }
}
