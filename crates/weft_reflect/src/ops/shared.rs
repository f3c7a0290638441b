use alloc::rc::Rc;
use core::cell::{Ref, RefCell, RefMut};
use core::fmt;

use crate::Reflect;
use crate::cell::{GenericTypeInfoCell, GenericTypePathCell};
use crate::info::{ReflectKind, SharedInfo, TypeInfo, TypePath, Typed};
use crate::ops::{ReflectCloneError, ReflectMut, ReflectRef};
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};

// -----------------------------------------------------------------------------
// Shared

/// A shared, mutable handle: the reference-tracked "class" of the object model.
///
/// Cloning a `Shared` clones the handle. Two handles to the same allocation
/// serialize once and deserialize back into two handles to one allocation,
/// which is how cyclic graphs are expressed.
///
/// ```
/// use weft_reflect::Shared;
///
/// let a = Shared::new(5_i32);
/// let b = a.clone();
/// *b.borrow_mut() += 1;
///
/// assert!(Shared::ptr_eq(&a, &b));
/// assert_eq!(*a.borrow(), 6);
/// ```
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Panics if the value is currently mutably borrowed.
    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Panics if the value is currently borrowed.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    #[inline]
    pub fn try_borrow(&self) -> Option<Ref<'_, T>> {
        self.0.try_borrow().ok()
    }

    #[inline]
    pub fn try_borrow_mut(&self) -> Option<RefMut<'_, T>> {
        self.0.try_borrow_mut().ok()
    }

    /// Returns `true` if both handles point to the same allocation.
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.0, &other.0)
    }

    /// The address of the allocation, stable while any handle is alive.
    #[inline]
    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }

    #[inline]
    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl<T> Clone for Shared<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for Shared<T> {
    // The pointee is not printed, graphs may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shared({:#x})", self.identity())
    }
}

// -----------------------------------------------------------------------------
// SharedHandle

/// Object-safe access to a [`Shared`] handle.
pub trait SharedHandle: Reflect {
    /// The allocation address, used for identity tracking.
    fn identity(&self) -> usize;

    fn try_borrow_inner(&self) -> Option<Ref<'_, dyn Reflect>>;

    fn try_borrow_inner_mut(&self) -> Option<RefMut<'_, dyn Reflect>>;

    /// Clones the handle.
    fn share(&self) -> Box<dyn Reflect>;
}

impl<T: GetTypeMeta + Reflect> SharedHandle for Shared<T> {
    #[inline]
    fn identity(&self) -> usize {
        Shared::identity(self)
    }

    fn try_borrow_inner(&self) -> Option<Ref<'_, dyn Reflect>> {
        let guard = self.0.try_borrow().ok()?;
        Some(Ref::map(guard, |value| value as &dyn Reflect))
    }

    fn try_borrow_inner_mut(&self) -> Option<RefMut<'_, dyn Reflect>> {
        let guard = self.0.try_borrow_mut().ok()?;
        Some(RefMut::map(guard, |value| value as &mut dyn Reflect))
    }

    #[inline]
    fn share(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }
}

// -----------------------------------------------------------------------------
// Reflect

impl<T: TypePath> TypePath for Shared<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| format!("weft_reflect::Shared<{}>", T::type_path()))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| format!("Shared<{}>", T::type_name()))
    }
}

impl<T: GetTypeMeta + Reflect> Typed for Shared<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Shared(SharedInfo::new::<Self, T>(|value| {
                value
                    .take::<T>()
                    .map(|value| Box::new(Shared::new(value)) as Box<dyn Reflect>)
            }))
        })
    }
}

impl<T: GetTypeMeta + Reflect> GetTypeMeta for Shared<T> {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::of::<Self>()
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

impl<T: GetTypeMeta + Reflect> Reflect for Shared<T> {
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }

    #[inline]
    fn reflect_kind(&self) -> ReflectKind {
        ReflectKind::Shared
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Shared(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Shared(self)
    }

    #[inline]
    fn reflect_clone(&self) -> Result<Box<dyn Reflect>, ReflectCloneError> {
        Ok(Box::new(self.clone()))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Shared, SharedHandle};
    use crate::Reflect;
    use crate::info::{TypePath, Typed};

    #[test]
    fn type_path_wraps_inner() {
        assert_eq!(<Shared<i32>>::type_path(), "weft_reflect::Shared<i32>");
        assert_eq!(<Shared<i32>>::type_name(), "Shared<i32>");
    }

    #[test]
    fn reflect_clone_shares_allocation() {
        let a = Shared::new(1_u8);
        let b = a.reflect_clone().unwrap().take::<Shared<u8>>().unwrap();
        assert!(Shared::ptr_eq(&a, &b));
        assert_eq!(a.strong_count(), 2);
    }

    #[test]
    fn wrap_builds_new_handle() {
        let info = <Shared<u8>>::type_info().as_shared().unwrap();
        let wrapped = info.wrap(Box::new(9_u8)).unwrap();
        let handle = wrapped.take::<Shared<u8>>().unwrap();
        assert_eq!(*handle.borrow(), 9);
        assert!(info.wrap(Box::new(9_u16)).is_err());
    }

    #[test]
    fn borrow_inner_through_handle() {
        let a = Shared::new(3_i64);
        let handle: &dyn SharedHandle = &a;
        handle
            .try_borrow_inner_mut()
            .unwrap()
            .set(Box::new(4_i64))
            .unwrap();
        assert_eq!(*a.borrow(), 4);

        let _guard = a.borrow_mut();
        assert!(handle.try_borrow_inner().is_none());
    }
}
