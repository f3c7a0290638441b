use core::fmt;

use crate::Reflect;
use crate::cell::NonGenericTypeInfoCell;
use crate::info::{DynamicInfo, ReflectKind, TypeInfo, TypePath, Typed};
use crate::ops::{ReflectCloneError, ReflectMut, ReflectRef};
use crate::registry::{GetTypeMeta, TypeMeta};

/// A value whose concrete type is only known at runtime.
///
/// A `Dynamic` field is the "object" of the object model: its concrete type is
/// always written next to the value, and any registered type can be read back.
///
/// ```
/// use weft_reflect::Dynamic;
///
/// let value = Dynamic::new(String::from("text"));
/// assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("text"));
/// ```
pub struct Dynamic(Box<dyn Reflect>);

impl Dynamic {
    #[inline]
    pub fn new<T: Reflect>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Wraps a boxed value. A boxed `Dynamic` is unwrapped rather than nested.
    pub fn from_boxed(value: Box<dyn Reflect>) -> Self {
        match value.downcast::<Dynamic>() {
            Ok(dynamic) => *dynamic,
            Err(value) => Self(value),
        }
    }

    #[inline]
    pub fn get(&self) -> &dyn Reflect {
        &*self.0
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut dyn Reflect {
        &mut *self.0
    }

    #[inline]
    pub fn into_inner(self) -> Box<dyn Reflect> {
        self.0
    }

    #[inline]
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Dynamic").field(&self.0).finish()
    }
}

impl TypePath for Dynamic {
    #[inline]
    fn type_path() -> &'static str {
        "weft_reflect::Dynamic"
    }

    #[inline]
    fn type_name() -> &'static str {
        "Dynamic"
    }
}

impl Typed for Dynamic {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Dynamic(DynamicInfo::new::<Self>()))
    }
}

impl GetTypeMeta for Dynamic {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::of::<Self>()
    }
}

impl Reflect for Dynamic {
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = Dynamic::from_boxed(value);
        Ok(())
    }

    #[inline]
    fn reflect_kind(&self) -> ReflectKind {
        ReflectKind::Dynamic
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Dynamic(&*self.0)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Dynamic(&mut *self.0)
    }

    fn reflect_clone(&self) -> Result<Box<dyn Reflect>, ReflectCloneError> {
        let inner = self.0.reflect_clone()?;
        Ok(Box::new(Dynamic(inner)))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Dynamic;
    use crate::Reflect;

    #[test]
    fn from_boxed_does_not_nest() {
        let inner: Box<dyn Reflect> = Box::new(Dynamic::new(1_u8));
        let outer = Dynamic::from_boxed(inner);
        assert!(outer.get().is::<u8>());
    }

    #[test]
    fn set_accepts_any_type() {
        let mut value = Dynamic::new(1_u8);
        value.set(Box::new(String::from("x"))).unwrap();
        assert!(value.get().is::<String>());
    }
}
