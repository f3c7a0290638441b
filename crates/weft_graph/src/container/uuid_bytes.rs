use uuid::Uuid;
use weft_reflect::Reflect;
use weft_reflect::derive::Reflect;
use weft_reflect::info::{TypeInfo, Typed};
use weft_reflect::registry::TypeRegistry;

use super::{Container, take_substitute};
use crate::error::ContainerError;

const NAME: &str = "uuid";

/// The 16 bytes of a [`Uuid`], big-endian.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(default, clone)]
pub struct UuidBytes {
    pub bytes: [u8; 16],
}

/// Writes [`Uuid`]s as [`UuidBytes`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidContainer;

impl Container for UuidContainer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn applies_to_structures(&self) -> bool {
        false
    }

    fn can_substitute(&self, info: &'static TypeInfo, _registry: &TypeRegistry) -> bool {
        info.type_is::<Uuid>()
    }

    fn substitute_info(&self) -> &'static TypeInfo {
        UuidBytes::type_info()
    }

    fn register_substitute(&self, registry: &mut TypeRegistry) {
        registry.register::<UuidBytes>();
    }

    fn create_substitute(
        &self,
        value: &dyn Reflect,
        _registry: &TypeRegistry,
    ) -> Option<Box<dyn Reflect>> {
        let uuid = value.downcast_ref::<Uuid>()?;
        Some(Box::new(UuidBytes {
            bytes: *uuid.as_bytes(),
        }))
    }

    fn recover(
        &self,
        substitute: Box<dyn Reflect>,
        _registry: &TypeRegistry,
    ) -> Result<Box<dyn Reflect>, ContainerError> {
        let UuidBytes { bytes } = take_substitute(NAME, substitute)?;
        Ok(Box::new(Uuid::from_bytes(bytes)))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use uuid::Uuid;
    use weft_reflect::registry::TypeRegistry;

    use super::{UuidBytes, UuidContainer};
    use crate::container::Container;

    #[test]
    fn bytes_are_big_endian() {
        let registry = TypeRegistry::new();
        let uuid = Uuid::from_u128(0x0011_2233_4455_6677_8899_aabb_ccdd_eeff);

        let substitute = UuidContainer.create_substitute(&uuid, &registry).unwrap();
        let bytes = substitute.downcast_ref::<UuidBytes>().unwrap().bytes;
        assert_eq!(bytes[0], 0x00);
        assert_eq!(bytes[15], 0xff);

        let value = UuidContainer.recover(substitute, &registry).unwrap();
        assert_eq!(value.take::<Uuid>().unwrap(), uuid);
    }

    #[test]
    fn other_values_are_not_substituted() {
        let registry = TypeRegistry::new();
        assert!(UuidContainer.create_substitute(&7_u32, &registry).is_none());
        let err = UuidContainer.recover(Box::new(7_u32), &registry).unwrap_err();
        assert_eq!(err.code(), 402);
    }
}
