use alloc::collections::BTreeMap;
use core::hash::Hash;
use std::collections::HashMap;

use crate::Reflect;
use crate::__macro_exports::macro_utils::clone_field;
use crate::cell::GenericTypeInfoCell;
use crate::info::{MapInfo, ReflectKind, TypeInfo, Typed};
use crate::ops::{Map, ReflectCloneError, ReflectMut, ReflectRef, SetError};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};

crate::derive::impl_type_path!(::alloc::collections::BTreeMap<K, V>);
crate::derive::impl_type_path!(::std::collections::HashMap<K, V>);

macro_rules! impl_reflect_for_map {
    ($ty:ident, $new:expr, [$($bound:tt)*]) => {
        impl<K, V> Typed for $ty<K, V>
        where
            K: Reflect + GetTypeMeta $($bound)*,
            V: Reflect + GetTypeMeta,
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Map(MapInfo::new::<Self, K, V>(|capacity| {
                        let new: fn(usize) -> $ty<K, V> = $new;
                        Box::new(new(capacity))
                    }))
                })
            }
        }

        impl<K, V> Map for $ty<K, V>
        where
            K: Reflect + GetTypeMeta $($bound)*,
            V: Reflect + GetTypeMeta,
        {
            #[inline]
            fn len(&self) -> usize {
                <$ty<K, V>>::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
                Box::new(
                    <$ty<K, V>>::iter(self)
                        .map(|(key, value)| (key as &dyn Reflect, value as &dyn Reflect)),
                )
            }

            fn insert(&mut self, key: Box<dyn Reflect>, value: Box<dyn Reflect>) -> Result<(), SetError> {
                let key = super::take_item::<K>(key)?;
                let value = super::take_item::<V>(value)?;
                <$ty<K, V>>::insert(self, key, value);
                Ok(())
            }
        }

        impl<K, V> Reflect for $ty<K, V>
        where
            K: Reflect + GetTypeMeta $($bound)*,
            V: Reflect + GetTypeMeta,
        {
            fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> ReflectKind {
                ReflectKind::Map
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Map(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Map(self)
            }

            fn reflect_clone(&self) -> Result<Box<dyn Reflect>, ReflectCloneError> {
                let new: fn(usize) -> $ty<K, V> = $new;
                let mut map = new(<$ty<K, V>>::len(self));
                for (key, value) in <$ty<K, V>>::iter(self) {
                    map.insert(clone_field(key)?, clone_field(value)?);
                }
                Ok(Box::new(map))
            }
        }

        impl<K, V> GetTypeMeta for $ty<K, V>
        where
            K: Reflect + GetTypeMeta $($bound)*,
            V: Reflect + GetTypeMeta,
        {
            fn get_type_meta() -> TypeMeta {
                let mut type_meta = TypeMeta::of::<Self>();
                type_meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                type_meta
            }

            fn register_dependencies(registry: &mut TypeRegistry) {
                registry.register::<K>();
                registry.register::<V>();
            }
        }
    };
}

impl_reflect_for_map!(BTreeMap, |_| BTreeMap::new(), [+ Ord]);
impl_reflect_for_map!(HashMap, HashMap::with_capacity, [+ Eq + Hash]);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::Reflect;
    use crate::info::{TypePath, Typed};
    use crate::ops::{ReflectMut, ReflectRef};

    #[test]
    fn type_paths() {
        assert_eq!(
            <HashMap<String, i32>>::type_path(),
            "std::collections::HashMap<alloc::string::String, i32>"
        );
        assert_eq!(<HashMap<String, i32>>::type_name(), "HashMap<String, i32>");
    }

    #[test]
    fn insert_and_iterate() {
        let info = <HashMap<String, i32>>::type_info().as_map().unwrap();
        assert!(info.key_ty().is::<String>());

        let mut map = info.new_empty(2);
        let ReflectMut::Map(map_mut) = map.reflect_mut() else {
            panic!("expected a map");
        };
        map_mut.insert(Box::new(String::from("a")), Box::new(1_i32)).unwrap();
        map_mut.insert(Box::new(String::from("b")), Box::new(2_i32)).unwrap();
        assert!(map_mut.insert(Box::new(3_u8), Box::new(2_i32)).is_err());

        let ReflectRef::Map(view) = map.reflect_ref() else {
            panic!("expected a map");
        };
        assert_eq!(view.len(), 2);

        let map = map.take::<HashMap<String, i32>>().unwrap();
        assert_eq!(map["a"], 1);
        assert_eq!(map["b"], 2);
    }
}
