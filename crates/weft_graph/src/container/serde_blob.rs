use weft_reflect::Reflect;
use weft_reflect::derive::Reflect;
use weft_reflect::info::{TypeInfo, Typed};
use weft_reflect::registry::{TypeRegistry, TypeTraitDeserialize, TypeTraitSerialize};

use super::{Container, resolve, take_substitute};
use crate::error::ContainerError;

const NAME: &str = "serde-blob";

/// A serde value as JSON text.
#[derive(Reflect, Debug, Clone, Default, PartialEq, Eq)]
#[reflect(default, clone)]
pub struct SerdeBlob {
    pub type_path: String,
    pub json: String,
}

/// The last resort for `#[reflect(serde)]` types that cannot be built from
/// their members.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeBlobContainer;

impl Container for SerdeBlobContainer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn can_substitute(&self, info: &'static TypeInfo, registry: &TypeRegistry) -> bool {
        registry.get(info.type_id()).is_some_and(|meta| {
            meta.has_trait::<TypeTraitSerialize>() && meta.has_trait::<TypeTraitDeserialize>()
        })
    }

    fn substitute_info(&self) -> &'static TypeInfo {
        SerdeBlob::type_info()
    }

    fn register_substitute(&self, registry: &mut TypeRegistry) {
        registry.register::<SerdeBlob>();
    }

    fn create_substitute(
        &self,
        value: &dyn Reflect,
        registry: &TypeRegistry,
    ) -> Option<Box<dyn Reflect>> {
        let serialize = registry.get_type_trait::<TypeTraitSerialize>(value.ty_id())?;
        let json = serde_json::to_string(serialize.as_serialize(value)?).ok()?;
        Some(Box::new(SerdeBlob {
            type_path: value.reflect_type_path().to_owned(),
            json,
        }))
    }

    fn recover(
        &self,
        substitute: Box<dyn Reflect>,
        registry: &TypeRegistry,
    ) -> Result<Box<dyn Reflect>, ContainerError> {
        let blob = take_substitute::<SerdeBlob>(NAME, substitute)?;
        let meta = resolve(NAME, registry, &blob.type_path)?;
        let Some(deserialize) = meta.get_trait::<TypeTraitDeserialize>() else {
            return Err(ContainerError::Unresolved {
                container: NAME,
                type_path: blob.type_path,
            });
        };
        let mut deserializer = serde_json::Deserializer::from_str(&blob.json);
        deserialize
            .deserialize(&mut deserializer)
            .map_err(|err| ContainerError::Restore {
                container: NAME,
                type_path: blob.type_path.clone(),
                reason: err.to_string(),
            })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use weft_reflect::derive::Reflect;
    use weft_reflect::registry::TypeRegistry;

    use super::{SerdeBlob, SerdeBlobContainer};
    use crate::container::Container;

    #[derive(Reflect, Serialize, Deserialize, Debug, PartialEq)]
    #[reflect(serde, memberwise = false)]
    struct Sealed {
        secret: u32,
    }

    #[test]
    fn blob_round_trip() {
        let mut registry = TypeRegistry::new();
        registry.register::<Sealed>();
        SerdeBlobContainer.register_substitute(&mut registry);

        let substitute = SerdeBlobContainer
            .create_substitute(&Sealed { secret: 7 }, &registry)
            .unwrap();
        let blob = substitute.downcast_ref::<SerdeBlob>().unwrap();
        assert_eq!(blob.json, r#"{"secret":7}"#);

        let value = SerdeBlobContainer.recover(substitute, &registry).unwrap();
        assert_eq!(value.take::<Sealed>().unwrap(), Sealed { secret: 7 });
    }
}
