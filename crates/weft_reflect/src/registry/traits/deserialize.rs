use serde_core::{Deserialize, Deserializer};

use crate::Reflect;
use crate::info::Typed;
use crate::registry::FromType;

/// `serde` deserialization for a reflected type.
///
/// ```
/// use core::any::TypeId;
/// use weft_reflect::registry::{TypeTraitDeserialize, TypeRegistry};
/// use weft_reflect::derive::Reflect;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Reflect, Serialize, Deserialize, PartialEq, Debug)]
/// #[reflect(serde)]
/// struct MyStruct {
///     value: i32,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<MyStruct>();
///
/// let processor = registry
///     .get_type_trait::<TypeTraitDeserialize>(TypeId::of::<MyStruct>())
///     .unwrap();
///
/// let mut deserializer = serde_json::Deserializer::from_str(r#"{"value":123}"#);
/// let value = processor.deserialize(&mut deserializer).unwrap();
///
/// assert_eq!(value.take::<MyStruct>().unwrap(), MyStruct { value: 123 });
/// ```
#[derive(Clone)]
pub struct TypeTraitDeserialize {
    func: fn(
        deserializer: &mut dyn erased_serde::Deserializer,
    ) -> Result<Box<dyn Reflect>, erased_serde::Error>,
}

impl TypeTraitDeserialize {
    #[inline]
    pub fn deserialize<'de, D: Deserializer<'de>>(
        &self,
        deserializer: D,
    ) -> Result<Box<dyn Reflect>, D::Error> {
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        (self.func)(&mut erased).map_err(<D::Error as serde_core::de::Error>::custom)
    }
}

impl<T: for<'a> Deserialize<'a> + Typed + Reflect> FromType<T> for TypeTraitDeserialize {
    fn from_type() -> Self {
        Self {
            func: |deserializer| Ok(Box::new(T::deserialize(deserializer)?)),
        }
    }
}
