use core::fmt;
use core::hash::{Hash, Hasher};

use crate::info::{TypeInfo, Typed};

/// A `Copy` handle to the static [`TypeInfo`] of some type.
///
/// The reflected counterpart of a runtime type object. Handles compare by
/// [`TypeId`](core::any::TypeId).
///
/// ```
/// use weft_reflect::info::TypeHandle;
///
/// let a = TypeHandle::of::<u32>();
/// assert_eq!(a, TypeHandle::of::<u32>());
/// assert_ne!(a, TypeHandle::of::<i32>());
/// assert_eq!(a.info().type_path(), "u32");
/// ```
#[derive(Clone, Copy)]
pub struct TypeHandle(&'static TypeInfo);

impl TypeHandle {
    #[inline]
    pub fn of<T: Typed>() -> Self {
        Self(T::type_info())
    }

    #[inline(always)]
    pub const fn new(info: &'static TypeInfo) -> Self {
        Self(info)
    }

    #[inline(always)]
    pub const fn info(self) -> &'static TypeInfo {
        self.0
    }
}

impl PartialEq for TypeHandle {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0.type_id() == other.0.type_id()
    }
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.type_id().hash(state);
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHandle({})", self.0.type_path())
    }
}

crate::derive::impl_reflect_opaque!(#[reflect(clone)] ::weft_reflect::info::TypeHandle);
