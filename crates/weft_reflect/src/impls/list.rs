use alloc::collections::{BTreeSet, VecDeque};
use core::hash::Hash;
use std::collections::HashSet;

use crate::Reflect;
use crate::__macro_exports::macro_utils::clone_field;
use crate::cell::GenericTypeInfoCell;
use crate::info::{ListInfo, ReflectKind, TypeInfo, Typed};
use crate::ops::{List, ReflectCloneError, ReflectMut, ReflectRef, SetError};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};

crate::derive::impl_type_path!(::alloc::vec::Vec<T>);
crate::derive::impl_type_path!(::alloc::collections::VecDeque<T>);
crate::derive::impl_type_path!(::alloc::collections::BTreeSet<T>);
crate::derive::impl_type_path!(::std::collections::HashSet<T>);

macro_rules! impl_reflect_for_list {
    ($ty:ident, $is_set:literal, $push:ident, [$($bound:tt)*]) => {
        impl<T: Reflect + GetTypeMeta $($bound)*> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::List(ListInfo::new::<Self, T>($is_set, |capacity| {
                        Box::new(<$ty<T>>::with_capacity(capacity))
                    }))
                })
            }
        }

        impl<T: Reflect + GetTypeMeta $($bound)*> List for $ty<T> {
            #[inline]
            fn len(&self) -> usize {
                <$ty<T>>::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
                Box::new(<&$ty<T> as IntoIterator>::into_iter(self).map(|item| item as &dyn Reflect))
            }

            fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), SetError> {
                let item = super::take_item::<T>(value)?;
                <$ty<T>>::$push(self, item);
                Ok(())
            }
        }

        impl<T: Reflect + GetTypeMeta $($bound)*> Reflect for $ty<T> {
            fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> ReflectKind {
                ReflectKind::List
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::List(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::List(self)
            }

            fn reflect_clone(&self) -> Result<Box<dyn Reflect>, ReflectCloneError> {
                let mut list = <$ty<T>>::with_capacity(<$ty<T>>::len(self));
                for item in <&$ty<T> as IntoIterator>::into_iter(self) {
                    list.$push(clone_field(item)?);
                }
                Ok(Box::new(list))
            }
        }

        impl<T: Reflect + GetTypeMeta $($bound)*> GetTypeMeta for $ty<T> {
            fn get_type_meta() -> TypeMeta {
                let mut type_meta = TypeMeta::of::<Self>();
                type_meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                type_meta
            }

            fn register_dependencies(registry: &mut TypeRegistry) {
                registry.register::<T>();
            }
        }
    };
}

/// `BTreeSet` has no capacity, `with_capacity` keeps the list macro uniform.
trait WithCapacity {
    fn with_capacity(capacity: usize) -> Self;
}

impl<T: Ord> WithCapacity for BTreeSet<T> {
    #[inline]
    fn with_capacity(_capacity: usize) -> Self {
        BTreeSet::new()
    }
}

impl_reflect_for_list!(Vec, false, push, []);
impl_reflect_for_list!(VecDeque, false, push_back, []);
impl_reflect_for_list!(BTreeSet, true, insert, [+ Ord]);
impl_reflect_for_list!(HashSet, true, insert, [+ Eq + Hash]);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeSet;

    use crate::Reflect;
    use crate::info::{TypePath, Typed};
    use crate::ops::{ReflectMut, ReflectRef, SetError};

    #[test]
    fn type_paths() {
        assert_eq!(<Vec<u8>>::type_path(), "alloc::vec::Vec<u8>");
        assert_eq!(<Vec<Vec<u8>>>::type_name(), "Vec<Vec<u8>>");
        assert_eq!(
            <BTreeSet<String>>::type_path(),
            "alloc::collections::BTreeSet<alloc::string::String>"
        );
    }

    #[test]
    fn info_builds_empty_lists() {
        let info = <Vec<i32>>::type_info().as_list().unwrap();
        assert!(!info.is_set());
        assert!(info.item_ty().is::<i32>());

        let mut list = info.new_empty(3);
        let ReflectMut::List(list_mut) = list.reflect_mut() else {
            panic!("expected a list");
        };
        list_mut.push(Box::new(4_i32)).unwrap();
        assert_eq!(list.take::<Vec<i32>>().unwrap(), [4]);
    }

    #[test]
    fn push_rejects_other_items() {
        let mut set = BTreeSet::<u8>::new();
        let ReflectMut::List(list) = set.reflect_mut() else {
            panic!("expected a list");
        };
        let err = list.push(Box::new(1_i8)).unwrap_err();
        assert!(matches!(err, SetError::TypeMismatch { expected: "u8", found: "i8" }));
        list.push(Box::new(1_u8)).unwrap();
        list.push(Box::new(1_u8)).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn iter_and_clone_walk_the_items() {
        let list = vec![String::from("a"), String::from("b")];
        let ReflectRef::List(ops) = list.reflect_ref() else {
            panic!("expected a list");
        };
        let items: Vec<_> = ops
            .iter()
            .filter_map(|item| item.downcast_ref::<String>())
            .collect();
        assert_eq!(items, ["a", "b"]);

        let copy = list.reflect_clone().unwrap();
        assert_eq!(copy.take::<Vec<String>>().unwrap(), list);
    }
}
