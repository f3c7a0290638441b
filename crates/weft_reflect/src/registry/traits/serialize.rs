use serde_core::{Serialize, Serializer};

use crate::Reflect;
use crate::info::Typed;
use crate::registry::FromType;

/// `serde` serialization for a reflected type.
///
/// Stores a function that downcasts to the concrete type and hands it out as
/// an [`erased_serde::Serialize`].
///
/// ```
/// # use weft_reflect::{registry::{TypeTraitSerialize, TypeRegistry}, derive::Reflect, Reflect};
/// use serde::Serialize;
///
/// #[derive(Reflect, Serialize)]
/// #[reflect(serialize)]
/// struct MyStruct {
///     value: i32,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<MyStruct>();
///
/// let input = MyStruct { value: 123 };
/// let serial = registry.get_type_trait::<TypeTraitSerialize>(input.ty_id()).unwrap();
///
/// let json = serde_json::to_string(serial.as_serialize(&input).unwrap()).unwrap();
/// assert_eq!(json, r#"{"value":123}"#);
/// ```
#[derive(Clone)]
pub struct TypeTraitSerialize {
    func: fn(value: &dyn Reflect) -> Option<&dyn erased_serde::Serialize>,
}

impl<T: erased_serde::Serialize + Typed + Reflect> FromType<T> for TypeTraitSerialize {
    fn from_type() -> Self {
        Self {
            func: |value| {
                value
                    .downcast_ref::<T>()
                    .map(|value| value as &dyn erased_serde::Serialize)
            },
        }
    }
}

impl TypeTraitSerialize {
    /// Returns `None` if `value` is not of the registered type.
    #[inline]
    pub fn as_serialize<'a>(&self, value: &'a dyn Reflect) -> Option<&'a dyn erased_serde::Serialize> {
        (self.func)(value)
    }

    /// Returns `None` if `value` is not of the registered type.
    #[inline]
    pub fn serialize<S: Serializer>(
        &self,
        value: &dyn Reflect,
        serializer: S,
    ) -> Option<Result<S::Ok, S::Error>> {
        self.as_serialize(value)
            .map(|value| value.serialize(serializer))
    }
}
