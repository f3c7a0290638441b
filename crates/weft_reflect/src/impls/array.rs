use crate::Reflect;
use crate::__macro_exports::macro_utils::clone_field;
use crate::cell::{GenericTypeInfoCell, GenericTypePathCell};
use crate::info::{ArrayInfo, ReflectKind, TypeInfo, TypePath, Typed};
use crate::ops::{Array, ReflectCloneError, ReflectMut, ReflectRef};
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};

/// Moves boxed items into a `Vec<T>`, or hands them back untouched.
fn take_all<T: Reflect>(items: Vec<Box<dyn Reflect>>) -> Result<Vec<T>, Vec<Box<dyn Reflect>>> {
    if !items.iter().all(|item| item.is::<T>()) {
        return Err(items);
    }
    Ok(items
        .into_iter()
        .filter_map(|item| item.take::<T>().ok())
        .collect())
}

fn boxed_items<T: Reflect>(items: Vec<T>) -> Vec<Box<dyn Reflect>> {
    items
        .into_iter()
        .map(|item| Box::new(item) as Box<dyn Reflect>)
        .collect()
}

fn array_from_items<T: Reflect + GetTypeMeta, const N: usize>(
    items: Vec<Box<dyn Reflect>>,
) -> Result<Box<dyn Reflect>, Vec<Box<dyn Reflect>>> {
    if items.len() != N {
        return Err(items);
    }
    let items = take_all::<T>(items)?;
    match <[T; N]>::try_from(items) {
        Ok(array) => Ok(Box::new(array)),
        Err(items) => Err(boxed_items(items)),
    }
}

fn boxed_slice_from_items<T: Reflect + GetTypeMeta>(
    items: Vec<Box<dyn Reflect>>,
) -> Result<Box<dyn Reflect>, Vec<Box<dyn Reflect>>> {
    let items = take_all::<T>(items)?;
    Ok(Box::new(items.into_boxed_slice()))
}

macro_rules! impl_array_ops {
    ($ty:ty, [$($generics:tt)*]) => {
        impl<$($generics)*> Array for $ty {
            #[inline]
            fn len(&self) -> usize {
                <[T]>::len(self)
            }

            #[inline]
            fn get(&self, index: usize) -> Option<&dyn Reflect> {
                <[T]>::get(self, index).map(|item| item as &dyn Reflect)
            }

            #[inline]
            fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
                <[T]>::get_mut(self, index).map(|item| item as &mut dyn Reflect)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
                Box::new(<[T]>::iter(self).map(|item| item as &dyn Reflect))
            }
        }

        impl<$($generics)*> Reflect for $ty {
            fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> ReflectKind {
                ReflectKind::Array
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Array(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Array(self)
            }

            fn reflect_clone(&self) -> Result<Box<dyn Reflect>, ReflectCloneError> {
                let mut items = Vec::with_capacity(<[T]>::len(self));
                for item in <[T]>::iter(self) {
                    items.push(Box::new(clone_field(item)?) as Box<dyn Reflect>);
                }
                let info = <Self as Typed>::type_info()
                    .as_array()
                    .map_err(|_| ReflectCloneError::NotSupported {
                        type_path: Self::type_path(),
                    })?;
                info.from_items(items)
                    .map_err(|_| ReflectCloneError::NotSupported {
                        type_path: Self::type_path(),
                    })
            }
        }

        impl<$($generics)*> GetTypeMeta for $ty {
            #[inline]
            fn get_type_meta() -> TypeMeta {
                TypeMeta::of::<Self>()
            }

            fn register_dependencies(registry: &mut TypeRegistry) {
                registry.register::<T>();
            }
        }
    };
}

// -----------------------------------------------------------------------------
// [T; N]

impl<T: TypePath, const N: usize> TypePath for [T; N] {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| format!("[{}; {N}]", T::type_path()))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| format!("[{}; {N}]", T::type_name()))
    }
}

impl<T: Reflect + GetTypeMeta, const N: usize> Typed for [T; N] {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Array(ArrayInfo::new::<Self, T>(Some(N), array_from_items::<T, N>))
        })
    }
}

impl_array_ops!([T; N], [T: Reflect + GetTypeMeta, const N: usize]);

// -----------------------------------------------------------------------------
// Box<[T]>

impl<T: TypePath> TypePath for Box<[T]> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| format!("alloc::boxed::Box<[{}]>", T::type_path()))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| format!("Box<[{}]>", T::type_name()))
    }
}

impl<T: Reflect + GetTypeMeta> Typed for Box<[T]> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Array(ArrayInfo::new::<Self, T>(None, boxed_slice_from_items::<T>))
        })
    }
}

impl_array_ops!(Box<[T]>, [T: Reflect + GetTypeMeta]);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::info::{TypePath, Typed};
    use crate::ops::ReflectRef;

    #[test]
    fn type_paths() {
        assert_eq!(<[u8; 4]>::type_path(), "[u8; 4]");
        assert_eq!(<Box<[String]>>::type_name(), "Box<[String]>");
    }

    #[test]
    fn from_items_checks_length_and_types() {
        let info = <[i32; 3]>::type_info().as_array().unwrap();
        assert_eq!(info.capacity(), Some(3));

        let short: Vec<Box<dyn Reflect>> = vec![Box::new(1_i32), Box::new(2_i32)];
        assert_eq!(info.from_items(short).unwrap_err().len(), 2);

        let wrong: Vec<Box<dyn Reflect>> = vec![Box::new(1_i32), Box::new(2_u8), Box::new(3_i32)];
        assert!(info.from_items(wrong).is_err());

        let good: Vec<Box<dyn Reflect>> = vec![Box::new(1_i32), Box::new(2_i32), Box::new(3_i32)];
        let array = info.from_items(good).unwrap();
        assert_eq!(array.take::<[i32; 3]>().unwrap(), [1, 2, 3]);
    }

    #[test]
    fn boxed_slice_view_and_clone() {
        let slice: Box<[u16]> = vec![7, 8].into_boxed_slice();
        let ReflectRef::Array(array) = slice.reflect_ref() else {
            panic!("expected an array");
        };
        assert_eq!(array.len(), 2);
        assert_eq!(array.get(1).and_then(|v| v.downcast_ref::<u16>()), Some(&8));

        let cloned = slice.reflect_clone().unwrap();
        assert_eq!(&*cloned.take::<Box<[u16]>>().unwrap(), &[7, 8]);
    }
}
