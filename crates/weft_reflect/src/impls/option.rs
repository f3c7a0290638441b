use crate::Reflect;
use crate::__macro_exports::macro_utils::clone_field;
use crate::cell::GenericTypeInfoCell;
use crate::info::{NullableInfo, ReflectKind, TypeInfo, Typed};
use crate::ops::{Nullable, ReflectCloneError, ReflectMut, ReflectRef, SetError};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};

crate::derive::impl_type_path!(::core::option::Option<T>);

fn none<T: Reflect + GetTypeMeta>() -> Box<dyn Reflect> {
    Box::new(None::<T>)
}

fn some<T: Reflect + GetTypeMeta>(value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    let value = value.take::<T>()?;
    Ok(Box::new(Some(value)))
}

impl<T: Reflect + GetTypeMeta> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Nullable(NullableInfo::new::<Self, T>(none::<T>, some::<T>))
        })
    }
}

impl<T: Reflect + GetTypeMeta> Nullable for Option<T> {
    #[inline]
    fn value(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(|value| value as &dyn Reflect)
    }

    #[inline]
    fn value_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(|value| value as &mut dyn Reflect)
    }

    fn set_value(&mut self, value: Option<Box<dyn Reflect>>) -> Result<(), SetError> {
        *self = match value {
            Some(value) => Some(super::take_item::<T>(value)?),
            None => None,
        };
        Ok(())
    }
}

impl<T: Reflect + GetTypeMeta> Reflect for Option<T> {
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }

    #[inline]
    fn reflect_kind(&self) -> ReflectKind {
        ReflectKind::Nullable
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Nullable(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Nullable(self)
    }

    fn reflect_clone(&self) -> Result<Box<dyn Reflect>, ReflectCloneError> {
        let value = match self {
            Some(value) => Some(clone_field(value)?),
            None => None,
        };
        Ok(Box::new(value))
    }
}

impl<T: Reflect + GetTypeMeta> GetTypeMeta for Option<T> {
    fn get_type_meta() -> TypeMeta {
        let mut type_meta = TypeMeta::of::<Self>();
        type_meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
        type_meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::info::{TypePath, Typed};
    use crate::ops::{ReflectMut, ReflectRef, SetError};

    #[test]
    fn type_path() {
        assert_eq!(<Option<String>>::type_path(), "core::option::Option<alloc::string::String>");
        assert_eq!(<Option<String>>::type_name(), "Option<String>");
    }

    #[test]
    fn info_wraps_values() {
        let info = <Option<u32>>::type_info().as_nullable().unwrap();
        assert!(info.none().take::<Option<u32>>().unwrap().is_none());

        let some = info.some(Box::new(4_u32)).unwrap();
        assert_eq!(some.take::<Option<u32>>().unwrap(), Some(4));

        let wrong = info.some(Box::new(4_i64)).unwrap_err();
        assert!(wrong.is::<i64>());
    }

    #[test]
    fn set_value() {
        let mut value: Option<String> = None;
        let ReflectMut::Nullable(nullable) = value.reflect_mut() else {
            panic!("expected a nullable");
        };
        nullable.set_value(Some(Box::new(String::from("x")))).unwrap();
        assert!(matches!(
            nullable.set_value(Some(Box::new(1_u8))),
            Err(SetError::TypeMismatch { .. })
        ));
        nullable.set_value(None).unwrap();
        assert!(value.is_none());

        let value = Some(9_i16);
        let ReflectRef::Nullable(nullable) = value.reflect_ref() else {
            panic!("expected a nullable");
        };
        assert_eq!(nullable.value().and_then(|v| v.downcast_ref::<i16>()), Some(&9));
    }
}
