use crate::Reflect;
use crate::ops::SetError;

/// A struct with named fields, usually implemented by `#[derive(Reflect)]`.
///
/// Fields are borrowed in place. Properties go through the declared getter
/// and setter, so they are read as owned values.
///
/// # Examples
///
/// ```
/// use weft_reflect::{Reflect, derive::Reflect, ops::ReflectMut};
///
/// #[derive(Reflect)]
/// struct Counter {
///     hits: u32,
/// }
///
/// let mut counter = Counter { hits: 1 };
/// let ReflectMut::Struct(s) = counter.reflect_mut() else { unreachable!() };
/// s.field_mut("hits").unwrap().set(Box::new(5_u32)).unwrap();
/// assert_eq!(counter.hits, 5);
/// ```
pub trait Struct: Reflect {
    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect>;

    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;

    fn field_len(&self) -> usize;

    /// Reads a property through its getter.
    fn property(&self, _name: &str) -> Option<Box<dyn Reflect>> {
        None
    }

    /// Writes a property through its setter.
    fn set_property(&mut self, name: &str, _value: Box<dyn Reflect>) -> Result<(), SetError> {
        Err(SetError::UnknownMember {
            container: self.reflect_type_path(),
            member: name.to_owned(),
        })
    }
}
