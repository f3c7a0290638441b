use weft_reflect::derive::Reflect;
use weft_reflect::info::{ReflectKind, TypeInfo, Typed};
use weft_reflect::ops::ReflectRef;
use weft_reflect::registry::TypeRegistry;
use weft_reflect::{Dynamic, Reflect};

use super::{Container, resolve, take_substitute};
use crate::error::ContainerError;

const NAME: &str = "nullable";

/// An option as an explicit presence flag and at most one value.
#[derive(Reflect, Debug, Default)]
#[reflect(default)]
pub struct NullableSubstitute {
    pub type_path: String,
    pub has_value: bool,
    pub value: Vec<Dynamic>,
}

/// Boxes options into [`NullableSubstitute`]s.
///
/// Options are natively reflected, so this container is opt-in. It suits
/// readers that need the presence flag spelled out.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullableContainer;

impl Container for NullableContainer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn applies_unconditionally(&self) -> bool {
        true
    }

    fn can_substitute(&self, info: &'static TypeInfo, _registry: &TypeRegistry) -> bool {
        info.kind() == ReflectKind::Nullable
    }

    fn substitute_info(&self) -> &'static TypeInfo {
        NullableSubstitute::type_info()
    }

    fn register_substitute(&self, registry: &mut TypeRegistry) {
        registry.register::<NullableSubstitute>();
    }

    fn create_substitute(
        &self,
        value: &dyn Reflect,
        _registry: &TypeRegistry,
    ) -> Option<Box<dyn Reflect>> {
        let ReflectRef::Nullable(nullable) = value.reflect_ref() else {
            return None;
        };
        let inner = match nullable.value() {
            Some(inner) => vec![Dynamic::from_boxed(inner.reflect_clone().ok()?)],
            None => Vec::new(),
        };
        Some(Box::new(NullableSubstitute {
            type_path: value.reflect_type_path().to_owned(),
            has_value: !inner.is_empty(),
            value: inner,
        }))
    }

    fn recover(
        &self,
        substitute: Box<dyn Reflect>,
        registry: &TypeRegistry,
    ) -> Result<Box<dyn Reflect>, ContainerError> {
        let substitute = take_substitute::<NullableSubstitute>(NAME, substitute)?;
        let meta = resolve(NAME, registry, &substitute.type_path)?;
        let restore_err = |reason: String| ContainerError::Restore {
            container: NAME,
            type_path: substitute.type_path.clone(),
            reason,
        };
        let info = meta
            .type_info()
            .as_nullable()
            .map_err(|err| restore_err(err.to_string()))?;

        let inner = substitute.value.into_iter().next();
        match (substitute.has_value, inner) {
            (false, _) => Ok(info.none()),
            (true, Some(inner)) => info.some(inner.into_inner()).map_err(|inner| {
                restore_err(format!("cannot hold a `{}`", inner.reflect_type_path()))
            }),
            (true, None) => Err(restore_err("the value is missing".to_owned())),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use weft_reflect::registry::TypeRegistry;

    use super::{NullableContainer, NullableSubstitute};
    use crate::container::Container;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<Option<u8>>();
        NullableContainer.register_substitute(&mut registry);
        registry
    }

    #[test]
    fn presence_is_spelled_out() {
        let registry = registry();

        let substitute = NullableContainer
            .create_substitute(&Some(5_u8), &registry)
            .unwrap();
        let spelled = substitute.downcast_ref::<NullableSubstitute>().unwrap();
        assert!(spelled.has_value);
        assert_eq!(spelled.value.len(), 1);
        let value = NullableContainer.recover(substitute, &registry).unwrap();
        assert_eq!(value.take::<Option<u8>>().unwrap(), Some(5));

        let substitute = NullableContainer
            .create_substitute(&None::<u8>, &registry)
            .unwrap();
        assert!(!substitute.downcast_ref::<NullableSubstitute>().unwrap().has_value);
        let value = NullableContainer.recover(substitute, &registry).unwrap();
        assert_eq!(value.take::<Option<u8>>().unwrap(), None);
    }

    #[test]
    fn missing_value_fails_to_restore() {
        let registry = registry();
        let substitute = Box::new(NullableSubstitute {
            type_path: "core::option::Option<u8>".to_owned(),
            has_value: true,
            value: Vec::new(),
        });
        let err = NullableContainer.recover(substitute, &registry).unwrap_err();
        assert_eq!(err.code(), 402);
    }
}
