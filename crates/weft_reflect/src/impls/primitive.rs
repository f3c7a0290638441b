use chrono::{DateTime, Local, NaiveDateTime, Utc};

use crate::Reflect;
use crate::cell::NonGenericTypeInfoCell;
use crate::info::{PrimitiveCode, PrimitiveInfo, ReflectKind, TypeInfo, TypePath, Typed};
use crate::ops::{Primitive, PrimitiveValue, ReflectCloneError, ReflectMut, ReflectRef};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeTraitDefault};

macro_rules! impl_reflect_primitive {
    ($ty:ident, $code:ident) => {
        impl_reflect_primitive!($ty, stringify!($ty), stringify!($ty), $code);
    };
    ($ty:ty, $path:expr, $name:expr, $code:ident) => {
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }

            #[inline]
            fn type_name() -> &'static str {
                $name
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    TypeInfo::Primitive(PrimitiveInfo::new::<Self>(PrimitiveCode::$code))
                })
            }
        }

        impl Primitive for $ty {
            #[inline]
            fn primitive_value(&self) -> PrimitiveValue {
                PrimitiveValue::$code(Clone::clone(self))
            }

            #[inline]
            fn primitive_code(&self) -> PrimitiveCode {
                PrimitiveCode::$code
            }
        }

        impl Reflect for $ty {
            fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> ReflectKind {
                ReflectKind::Primitive
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Primitive(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Primitive(self)
            }

            #[inline]
            fn reflect_clone(&self) -> Result<Box<dyn Reflect>, ReflectCloneError> {
                Ok(Box::new(Clone::clone(self)))
            }
        }

        impl GetTypeMeta for $ty {
            fn get_type_meta() -> TypeMeta {
                let mut type_meta = TypeMeta::of::<Self>();
                type_meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                type_meta
            }
        }
    };
}

impl_reflect_primitive!(bool, Bool);
impl_reflect_primitive!(char, Char);
impl_reflect_primitive!(i8, I8);
impl_reflect_primitive!(u8, U8);
impl_reflect_primitive!(i16, I16);
impl_reflect_primitive!(u16, U16);
impl_reflect_primitive!(i32, I32);
impl_reflect_primitive!(u32, U32);
impl_reflect_primitive!(i64, I64);
impl_reflect_primitive!(u64, U64);
impl_reflect_primitive!(f32, F32);
impl_reflect_primitive!(f64, F64);
impl_reflect_primitive!(i128, I128);
impl_reflect_primitive!(u128, U128);
impl_reflect_primitive!(isize, Isize);
impl_reflect_primitive!(usize, Usize);

impl_reflect_primitive!(String, "alloc::string::String", "String", String);
impl_reflect_primitive!(NaiveDateTime, "chrono::NaiveDateTime", "NaiveDateTime", NaiveDateTime);
impl_reflect_primitive!(
    DateTime<Utc>,
    "chrono::DateTime<chrono::Utc>",
    "DateTime<Utc>",
    DateTimeUtc
);
impl_reflect_primitive!(
    DateTime<Local>,
    "chrono::DateTime<chrono::Local>",
    "DateTime<Local>",
    DateTimeLocal
);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use crate::Reflect;
    use crate::info::{PrimitiveCode, TypePath, Typed};
    use crate::ops::{PrimitiveValue, ReflectRef};

    #[test]
    fn paths_and_codes() {
        assert_eq!(i32::type_path(), "i32");
        assert_eq!(String::type_name(), "String");
        assert_eq!(<DateTime<Utc>>::type_path(), "chrono::DateTime<chrono::Utc>");

        let info = u64::type_info().as_primitive().unwrap();
        assert_eq!(info.code(), PrimitiveCode::U64);
    }

    #[test]
    fn primitive_view() {
        let value = String::from("weft");
        let ReflectRef::Primitive(p) = value.reflect_ref() else {
            panic!("expected a primitive");
        };
        assert_eq!(p.primitive_value(), PrimitiveValue::String("weft".into()));
        assert_eq!(p.primitive_code(), PrimitiveCode::String);
    }

    #[test]
    fn clone_through_reflection() {
        let value = -3.5_f32;
        let cloned = value.reflect_clone().unwrap();
        assert_eq!(cloned.take::<f32>().unwrap(), -3.5);
    }
}
