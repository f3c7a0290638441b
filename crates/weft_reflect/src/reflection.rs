use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{DynamicTypePath, DynamicTyped, ReflectKind};
use crate::ops::{ReflectCloneError, ReflectMut, ReflectRef};
use crate::registry::DynamicTypeMeta;

// -----------------------------------------------------------------------------
// Reflect

/// The foundational trait of the reflection system.
///
/// A `Reflect` value can describe its own type ([`DynamicTyped`]), expose a
/// kind-specific view of itself ([`reflect_ref`], [`reflect_mut`]) and register
/// its type metadata in a [`TypeRegistry`].
///
/// Implement it with [the derive macro] rather than by hand. Built-in
/// implementations cover the primitives, `String`, `Option`, `Vec`, `VecDeque`,
/// arrays, boxed slices, `HashMap`, `BTreeMap`, the set types, the `chrono`
/// date-times, `uuid::Uuid`, [`Shared`] and [`Dynamic`].
///
/// # Type identification
///
/// [`Any::type_id`] on a `Box<dyn Reflect>` returns the id of the box.
/// Use [`Reflect::ty_id`], which always returns the id of the value:
///
/// ```
/// use weft_reflect::Reflect;
/// use core::any::TypeId;
///
/// let x: Box<dyn Reflect> = Box::new(32_i32);
/// assert!(x.ty_id() == TypeId::of::<i32>());
/// ```
///
/// [`reflect_ref`]: Reflect::reflect_ref
/// [`reflect_mut`]: Reflect::reflect_mut
/// [`TypeRegistry`]: crate::registry::TypeRegistry
/// [the derive macro]: crate::derive::Reflect
/// [`Shared`]: crate::Shared
/// [`Dynamic`]: crate::Dynamic
pub trait Reflect: DynamicTypePath + DynamicTyped + DynamicTypeMeta + Any {
    /// Returns the [`TypeId`] of the underlying value.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Replaces `self` with `value` if both have the same type.
    ///
    /// On mismatch the value is handed back untouched.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    fn reflect_kind(&self) -> ReflectKind;

    fn reflect_ref(&self) -> ReflectRef<'_>;

    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    /// Clones the value through reflection.
    ///
    /// Implemented by primitives, [`Shared`](crate::Shared) (which clones the
    /// handle, not the pointee) and types deriving with `#[reflect(clone)]`.
    fn reflect_clone(&self) -> Result<Box<dyn Reflect>, ReflectCloneError> {
        Err(ReflectCloneError::NotSupported {
            type_path: self.reflect_type_path(),
        })
    }
}

impl dyn Reflect {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the value to type `T`, consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    pub fn downcast<T: Any>(self: Box<dyn Reflect>) -> Result<Box<T>, Box<dyn Reflect>> {
        if !self.is::<T>() {
            return Err(self);
        }
        match <Box<dyn Any>>::downcast::<T>(self) {
            Ok(value) => Ok(value),
            Err(_) => unreachable!("type was checked before downcasting"),
        }
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait object.
    ///
    /// ```
    /// use weft_reflect::Reflect;
    ///
    /// let x: Box<dyn Reflect> = Box::new(String::from("weft"));
    /// assert_eq!(x.take::<String>().unwrap(), "weft");
    /// ```
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        self.downcast::<T>().map(|value| *value)
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reflect_ref() {
            ReflectRef::Primitive(value) => write!(f, "{:?}", value.primitive_value()),
            ReflectRef::Enum(value) => {
                write!(f, "{}::{}", self.reflect_type_name(), value.variant_name())
            }
            _ => write!(f, "Reflect({})", self.reflect_type_path()),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::info::ReflectKind;

    #[test]
    fn downcast_keeps_mismatch() {
        let value: Box<dyn Reflect> = Box::new(7_u8);
        let value = value.downcast::<u16>().unwrap_err();
        assert!(value.is::<u8>());
        assert_eq!(value.take::<u8>().unwrap(), 7);
    }

    #[test]
    fn set_rejects_other_types() {
        let mut target = 1_i64;
        let rejected = target.set(Box::new(2_i32)).unwrap_err();
        assert!(rejected.is::<i32>());
        target.set(Box::new(5_i64)).unwrap();
        assert_eq!(target, 5);
        assert_eq!(target.reflect_kind(), ReflectKind::Primitive);
    }

    #[test]
    fn debug_prints_primitive_values() {
        let value: Box<dyn Reflect> = Box::new(3_i32);
        assert_eq!(format!("{value:?}"), "I32(3)");
    }
}
