use weft_reflect::Reflect;
use weft_reflect::derive::Reflect;
use weft_reflect::info::{TypeInfo, Typed};
use weft_reflect::registry::{TypeRegistry, TypeTraitConvert};

use super::{Container, resolve, take_substitute};
use crate::error::ContainerError;

const NAME: &str = "converter";

/// A value in its declared string form.
#[derive(Reflect, Debug, Clone, Default, PartialEq, Eq)]
#[reflect(default, clone)]
pub struct ConvertedText {
    pub type_path: String,
    pub text: String,
}

/// Uses the `Display`/`FromStr` pair registered by `#[reflect(convert)]`.
///
/// Applies even to constructible types. A value whose text does not parse
/// back into a value printing the same text disables the container for its
/// type.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConverterContainer;

impl Container for ConverterContainer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn applies_unconditionally(&self) -> bool {
        true
    }

    fn can_substitute(&self, info: &'static TypeInfo, registry: &TypeRegistry) -> bool {
        registry
            .get_type_trait::<TypeTraitConvert>(info.type_id())
            .is_some()
    }

    fn substitute_info(&self) -> &'static TypeInfo {
        ConvertedText::type_info()
    }

    fn register_substitute(&self, registry: &mut TypeRegistry) {
        registry.register::<ConvertedText>();
    }

    fn create_substitute(
        &self,
        value: &dyn Reflect,
        registry: &TypeRegistry,
    ) -> Option<Box<dyn Reflect>> {
        let convert = registry.get_type_trait::<TypeTraitConvert>(value.ty_id())?;
        let text = convert.to_string(value)?;
        let parsed = convert.from_str(&text)?;
        if convert.to_string(&*parsed)? != text {
            return None;
        }
        Some(Box::new(ConvertedText {
            type_path: value.reflect_type_path().to_owned(),
            text,
        }))
    }

    fn recover(
        &self,
        substitute: Box<dyn Reflect>,
        registry: &TypeRegistry,
    ) -> Result<Box<dyn Reflect>, ContainerError> {
        let converted = take_substitute::<ConvertedText>(NAME, substitute)?;
        let meta = resolve(NAME, registry, &converted.type_path)?;
        meta.get_trait::<TypeTraitConvert>()
            .and_then(|convert| convert.from_str(&converted.text))
            .ok_or_else(|| ContainerError::Restore {
                container: NAME,
                reason: format!("`{}` does not parse back", converted.text),
                type_path: converted.type_path,
            })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::fmt;
    use core::str::FromStr;

    use weft_reflect::derive::Reflect;
    use weft_reflect::info::{TypePath, Typed};
    use weft_reflect::registry::TypeRegistry;

    use super::{ConvertedText, ConverterContainer};
    use crate::container::Container;

    /// Parses any level but keeps at most 100.
    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default, convert)]
    struct Clamped {
        level: u16,
    }

    impl fmt::Display for Clamped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.level)
        }
    }

    impl FromStr for Clamped {
        type Err = core::num::ParseIntError;

        fn from_str(text: &str) -> Result<Self, Self::Err> {
            let level = text.parse::<u16>()?.min(100);
            Ok(Self { level })
        }
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<Clamped>();
        ConverterContainer.register_substitute(&mut registry);
        registry
    }

    #[test]
    fn text_round_trip() {
        let registry = registry();
        assert!(ConverterContainer.can_substitute(Clamped::type_info(), &registry));

        let substitute = ConverterContainer
            .create_substitute(&Clamped { level: 30 }, &registry)
            .unwrap();
        let converted = substitute.downcast_ref::<ConvertedText>().unwrap();
        assert_eq!(converted.text, "30");

        let value = ConverterContainer.recover(substitute, &registry).unwrap();
        assert_eq!(value.take::<Clamped>().unwrap(), Clamped { level: 30 });
    }

    #[test]
    fn text_parsing_to_another_value_is_refused() {
        let registry = registry();
        assert!(
            ConverterContainer
                .create_substitute(&Clamped { level: 200 }, &registry)
                .is_none()
        );
    }

    #[test]
    fn unparsable_text_fails_to_recover() {
        let registry = registry();
        let substitute = Box::new(ConvertedText {
            type_path: Clamped::type_path().to_owned(),
            text: "loud".to_owned(),
        });
        let err = ConverterContainer.recover(substitute, &registry).unwrap_err();
        assert!(err.to_string().contains("`loud` does not parse back"), "{err}");
    }
}
