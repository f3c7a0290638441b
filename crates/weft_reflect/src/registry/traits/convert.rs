use core::fmt::Display;
use core::str::FromStr;

use crate::Reflect;
use crate::info::Typed;
use crate::registry::FromType;

/// A textual form of a value, built from [`Display`] and [`FromStr`].
///
/// The converter container writes such values as a single string instead of
/// their members.
///
/// ```
/// use weft_reflect::registry::{FromType, TypeTraitConvert};
///
/// let convert = <TypeTraitConvert as FromType<u16>>::from_type();
/// assert_eq!(convert.to_string(&7_u16).as_deref(), Some("7"));
/// assert!(convert.from_str("x").is_none());
/// ```
#[derive(Clone)]
pub struct TypeTraitConvert {
    to_string: fn(&dyn Reflect) -> Option<String>,
    from_str: fn(&str) -> Option<Box<dyn Reflect>>,
}

impl TypeTraitConvert {
    /// Returns `None` if `value` is not of the registered type.
    #[inline]
    pub fn to_string(&self, value: &dyn Reflect) -> Option<String> {
        (self.to_string)(value)
    }

    /// Returns `None` if the text does not parse.
    #[inline]
    pub fn from_str(&self, text: &str) -> Option<Box<dyn Reflect>> {
        (self.from_str)(text)
    }
}

impl<T: Display + FromStr + Typed + Reflect> FromType<T> for TypeTraitConvert {
    fn from_type() -> Self {
        Self {
            to_string: |value| value.downcast_ref::<T>().map(ToString::to_string),
            from_str: |text| {
                text.parse::<T>()
                    .ok()
                    .map(|value| Box::new(value) as Box<dyn Reflect>)
            },
        }
    }
}
