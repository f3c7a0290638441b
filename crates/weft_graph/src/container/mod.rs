//! Substitute representations for types the walk cannot handle directly.
//!
//! A [`Container`] stands in for a value: on write it produces a substitute
//! value, which is serialized under its own type tag, and on read it turns
//! the substitute back into the original. At most one container is bound to
//! a type, the first eligible one in declared order.
//!
//! A container is eligible for a type when
//! - the type is a structure (struct or nullable) and the container applies
//!   to structures, or the type is opaque, and
//! - the type has no usable constructor, or the container applies
//!   unconditionally.
//!
//! # Menu
//!
//! - [`SerdeBlobContainer`]: serde types without a usable constructor, as JSON.
//! - [`ConverterContainer`]: types with a string conversion.
//! - [`NullableContainer`]: options as an explicit `has_value`/`value` pair.
//! - [`UuidContainer`]: `uuid::Uuid` as 16 bytes.
//! - [`TypeHandleContainer`]: [`TypeHandle`](weft_reflect::info::TypeHandle)
//!   as its type path.

use core::fmt;

use weft_reflect::Reflect;
use weft_reflect::info::{ReflectKind, TypeInfo};
use weft_reflect::registry::{GetTypeMeta, TypeMeta, TypeRegistry};

use crate::error::ContainerError;

// -----------------------------------------------------------------------------
// Modules

mod converter;
mod nullable;
mod serde_blob;
mod type_handle;
mod uuid_bytes;

// -----------------------------------------------------------------------------
// Exports

pub use converter::{ConvertedText, ConverterContainer};
pub use nullable::{NullableContainer, NullableSubstitute};
pub use serde_blob::{SerdeBlob, SerdeBlobContainer};
pub use type_handle::{TypeHandleContainer, TypeName};
pub use uuid_bytes::{UuidBytes, UuidContainer};

// -----------------------------------------------------------------------------
// Container

/// A substitution strategy.
pub trait Container: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// Whether the container binds even to types with a usable constructor.
    fn applies_unconditionally(&self) -> bool {
        false
    }

    /// Whether the container binds to structures, not only to opaque types.
    fn applies_to_structures(&self) -> bool {
        true
    }

    /// The type-specific applicability test.
    fn can_substitute(&self, info: &'static TypeInfo, registry: &TypeRegistry) -> bool;

    /// The type of the substitutes this container produces.
    fn substitute_info(&self) -> &'static TypeInfo;

    fn register_substitute(&self, registry: &mut TypeRegistry);

    /// Builds the substitute, or `None` when this value cannot be
    /// represented. `None` disables the container for the value's type.
    fn create_substitute(
        &self,
        value: &dyn Reflect,
        registry: &TypeRegistry,
    ) -> Option<Box<dyn Reflect>>;

    fn recover(
        &self,
        substitute: Box<dyn Reflect>,
        registry: &TypeRegistry,
    ) -> Result<Box<dyn Reflect>, ContainerError>;
}

impl fmt::Debug for dyn Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether `container` may be bound to the type `info`.
pub(crate) fn is_eligible(
    container: &dyn Container,
    info: &'static TypeInfo,
    constructible: bool,
) -> bool {
    let shape_fits = match info.kind() {
        ReflectKind::Struct | ReflectKind::Nullable => container.applies_to_structures(),
        ReflectKind::Opaque => true,
        _ => false,
    };
    shape_fits && (!constructible || container.applies_unconditionally())
}

// -----------------------------------------------------------------------------
// Helpers

/// Looks a type up by the path a substitute carries.
fn resolve<'r>(
    container: &'static str,
    registry: &'r TypeRegistry,
    type_path: &str,
) -> Result<&'r TypeMeta, ContainerError> {
    registry
        .get_with_type_path(type_path)
        .ok_or_else(|| ContainerError::Unresolved {
            container,
            type_path: type_path.to_owned(),
        })
}

/// Unboxes a substitute of the expected type.
fn take_substitute<T: Reflect + GetTypeMeta>(
    container: &'static str,
    substitute: Box<dyn Reflect>,
) -> Result<T, ContainerError> {
    substitute
        .take::<T>()
        .map_err(|other| ContainerError::Restore {
            container,
            type_path: T::type_path().to_owned(),
            reason: format!("found a `{}` substitute", other.reflect_type_path()),
        })
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use weft_reflect::derive::Reflect;
    use weft_reflect::info::{TypeHandle, Typed};

    use super::{
        Container, ConverterContainer, NullableContainer, SerdeBlobContainer,
        TypeHandleContainer, UuidContainer, is_eligible,
    };

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Plain {
        value: i32,
    }

    #[test]
    fn eligibility_follows_shape_and_constructibility() {
        let plain = Plain::type_info();
        let uuid = <uuid::Uuid as Typed>::type_info();
        let option = <Option<i32> as Typed>::type_info();
        let array = <[u8; 4] as Typed>::type_info();

        assert!(!is_eligible(&SerdeBlobContainer, plain, true));
        assert!(is_eligible(&SerdeBlobContainer, plain, false));
        assert!(is_eligible(&ConverterContainer, plain, true));
        assert!(is_eligible(&NullableContainer, option, true));
        assert!(!is_eligible(&UuidContainer, plain, false));
        assert!(is_eligible(&UuidContainer, uuid, false));
        assert!(!is_eligible(&ConverterContainer, array, false));
        assert!(is_eligible(&TypeHandleContainer, TypeHandle::type_info(), false));
        assert_eq!(TypeHandleContainer.name(), "type-handle");
    }
}
