use weft_reflect::Reflect;
use weft_reflect::derive::Reflect;
use weft_reflect::info::{TypeHandle, TypeInfo, Typed};
use weft_reflect::registry::TypeRegistry;

use super::{Container, resolve, take_substitute};
use crate::error::ContainerError;

const NAME: &str = "type-handle";

/// A [`TypeHandle`] by type path.
#[derive(Reflect, Debug, Clone, Default, PartialEq, Eq)]
#[reflect(default, clone)]
pub struct TypeName {
    pub type_path: String,
}

/// Writes [`TypeHandle`]s as [`TypeName`]s. The named type must be
/// registered on the reading side.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeHandleContainer;

impl Container for TypeHandleContainer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn applies_to_structures(&self) -> bool {
        false
    }

    fn can_substitute(&self, info: &'static TypeInfo, _registry: &TypeRegistry) -> bool {
        info.type_is::<TypeHandle>()
    }

    fn substitute_info(&self) -> &'static TypeInfo {
        TypeName::type_info()
    }

    fn register_substitute(&self, registry: &mut TypeRegistry) {
        registry.register::<TypeName>();
    }

    fn create_substitute(
        &self,
        value: &dyn Reflect,
        _registry: &TypeRegistry,
    ) -> Option<Box<dyn Reflect>> {
        let handle = value.downcast_ref::<TypeHandle>()?;
        Some(Box::new(TypeName {
            type_path: handle.info().type_path().to_owned(),
        }))
    }

    fn recover(
        &self,
        substitute: Box<dyn Reflect>,
        registry: &TypeRegistry,
    ) -> Result<Box<dyn Reflect>, ContainerError> {
        let TypeName { type_path } = take_substitute(NAME, substitute)?;
        let meta = resolve(NAME, registry, &type_path)?;
        Ok(Box::new(TypeHandle::new(meta.type_info())))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use weft_reflect::info::{TypeHandle, Typed};
    use weft_reflect::registry::TypeRegistry;

    use super::{TypeHandleContainer, TypeName};
    use crate::container::Container;

    #[test]
    fn handles_travel_by_path() {
        let mut registry = TypeRegistry::new();
        registry.register::<u32>();

        let handle = TypeHandle::new(u32::type_info());
        let substitute = TypeHandleContainer
            .create_substitute(&handle, &registry)
            .unwrap();
        assert_eq!(substitute.downcast_ref::<TypeName>().unwrap().type_path, "u32");

        let value = TypeHandleContainer.recover(substitute, &registry).unwrap();
        assert!(value.take::<TypeHandle>().unwrap().info().type_is::<u32>());
    }

    #[test]
    fn unregistered_paths_do_not_resolve() {
        let registry = TypeRegistry::new();
        let substitute = Box::new(TypeName {
            type_path: "nowhere::Missing".to_owned(),
        });
        let err = TypeHandleContainer.recover(substitute, &registry).unwrap_err();
        assert_eq!(err.code(), 401);
    }
}
