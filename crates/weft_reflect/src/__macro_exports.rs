//! Items used by generated code. Not public API.

pub mod auto_register {
    use crate::registry::{GetTypeMeta, TypeRegistry};

    pub use inventory;

    /// A registration function submitted by `#[reflect(auto_register)]`.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    pub trait __RegisterType {
        fn __register(registry: &mut TypeRegistry);
    }

    impl<T: GetTypeMeta> __RegisterType for T {
        #[inline]
        fn __register(registry: &mut TypeRegistry) {
            registry.register::<T>();
        }
    }

    /// Marks a registry that already ran every submitted function.
    pub struct __AvailFlag;

    crate::derive::impl_reflect_opaque!(crate::__macro_exports::auto_register::__AvailFlag);

    pub fn __register_types(registry: &mut TypeRegistry) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
        registry.register::<__AvailFlag>();
    }
}

pub mod macro_utils {
    use crate::Reflect;
    use crate::info::TypePath;
    use crate::ops::{ReflectCloneError, SetError};
    use crate::registry::{GetTypeMeta, TypeRegistry};

    pub use alloc::borrow::ToOwned;
    pub use alloc::string::ToString;

    /// Concatenates type path fragments with a single allocation.
    ///
    /// ```
    /// use weft_reflect::__macro_exports::macro_utils::concat;
    ///
    /// let s = concat(&["module", "::", "Name", "<", "T", ">"]);
    /// assert_eq!(s, "module::Name<T>");
    /// assert_eq!(s.capacity(), 15);
    /// ```
    #[inline(never)]
    pub fn concat(parts: &[&str]) -> alloc::string::String {
        let len = parts.iter().map(|part| part.len()).sum();
        let mut res = alloc::string::String::with_capacity(len);
        for part in parts {
            res.push_str(part);
        }
        res
    }

    /// Stores `value` through a property setter.
    pub fn set_via<S, T: Reflect + TypePath>(
        target: &mut S,
        value: alloc::boxed::Box<dyn Reflect>,
        setter: fn(&mut S, T),
    ) -> Result<(), SetError> {
        let value = value.take::<T>().map_err(|value| SetError::TypeMismatch {
            expected: T::type_path(),
            found: value.reflect_type_path(),
        })?;
        setter(target, value);
        Ok(())
    }

    /// Registers the type returned by a property getter.
    #[inline]
    pub fn register_getter<S, T: GetTypeMeta>(registry: &mut TypeRegistry, _getter: fn(&S) -> T) {
        registry.register::<T>();
    }

    /// Clones one field through [`Reflect::reflect_clone`].
    pub fn clone_field<T: Reflect>(field: &T) -> Result<T, ReflectCloneError> {
        field
            .reflect_clone()?
            .take::<T>()
            .map_err(|_| ReflectCloneError::NotSupported {
                type_path: field.reflect_type_path(),
            })
    }
}
