use crate::Reflect;

/// A field-less enum.
pub trait Enum: Reflect {
    fn variant_name(&self) -> &'static str;

    fn discriminant(&self) -> i64;
}
