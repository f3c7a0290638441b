use core::any::TypeId;
use core::fmt;

use thiserror::Error;

use crate::info::{ArrayInfo, ListInfo, MapInfo, StructInfo};
use crate::info::{DynamicInfo, NullableInfo, SharedInfo};
use crate::info::{EnumInfo, OpaqueInfo, PrimitiveInfo};
use crate::info::{Type, TypePath};

// -----------------------------------------------------------------------------
// ReflectKind

/// The shape of a reflected type.
///
/// | Kind | Rust types | Object model |
/// |---|---|---|
/// | `Primitive` | numbers, `bool`, `char`, `String`, date-times | primitive |
/// | `Struct` | structs with named fields | structure |
/// | `List` | `Vec`, `VecDeque`, sets | collection |
/// | `Array` | `[T; N]`, `Box<[T]>` | fixed length array |
/// | `Map` | `HashMap`, `BTreeMap` | dictionary |
/// | `Nullable` | `Option<T>` | nullable |
/// | `Enum` | field-less enums | enumeration |
/// | `Shared` | [`Shared<T>`](crate::Shared) | class, identity tracked |
/// | `Dynamic` | [`Dynamic`](crate::Dynamic) | object / interface |
/// | `Opaque` | everything else | needs a container |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Primitive,
    Struct,
    List,
    Array,
    Map,
    Nullable,
    Enum,
    Shared,
    Dynamic,
    Opaque,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReflectKind::Primitive => "primitive",
            ReflectKind::Struct => "struct",
            ReflectKind::List => "list",
            ReflectKind::Array => "array",
            ReflectKind::Map => "map",
            ReflectKind::Nullable => "nullable",
            ReflectKind::Enum => "enum",
            ReflectKind::Shared => "shared",
            ReflectKind::Dynamic => "dynamic",
            ReflectKind::Opaque => "opaque",
        };
        f.write_str(name)
    }
}

/// A [`TypeInfo`] was accessed as the wrong kind.
#[derive(Debug, Error)]
#[error("kind mismatch: expected {expected}, received {received}")]
pub struct ReflectKindError {
    pub expected: ReflectKind,
    pub received: ReflectKind,
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time information about a type.
#[derive(Debug)]
pub enum TypeInfo {
    Primitive(PrimitiveInfo),
    Struct(StructInfo),
    List(ListInfo),
    Array(ArrayInfo),
    Map(MapInfo),
    Nullable(NullableInfo),
    Enum(EnumInfo),
    Shared(SharedInfo),
    Dynamic(DynamicInfo),
    Opaque(OpaqueInfo),
}

macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        #[doc = concat!("Returns the [`", stringify!($info), "`] or a [`ReflectKindError`].")]
        pub fn $name(&self) -> Result<&$info, ReflectKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(ReflectKindError {
                    expected: ReflectKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl TypeInfo {
    /// The [`Type`] this info describes.
    pub const fn ty(&self) -> &Type {
        match self {
            Self::Primitive(info) => info.ty(),
            Self::Struct(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Array(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Nullable(info) => info.ty(),
            Self::Enum(info) => info.ty(),
            Self::Shared(info) => info.ty(),
            Self::Dynamic(info) => info.ty(),
            Self::Opaque(info) => info.ty(),
        }
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.ty().id()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty().name()
    }

    #[inline]
    pub fn type_is<T: TypePath + ?Sized>(&self) -> bool {
        self.ty().is::<T>()
    }

    pub const fn kind(&self) -> ReflectKind {
        match self {
            Self::Primitive(_) => ReflectKind::Primitive,
            Self::Struct(_) => ReflectKind::Struct,
            Self::List(_) => ReflectKind::List,
            Self::Array(_) => ReflectKind::Array,
            Self::Map(_) => ReflectKind::Map,
            Self::Nullable(_) => ReflectKind::Nullable,
            Self::Enum(_) => ReflectKind::Enum,
            Self::Shared(_) => ReflectKind::Shared,
            Self::Dynamic(_) => ReflectKind::Dynamic,
            Self::Opaque(_) => ReflectKind::Opaque,
        }
    }

    impl_cast_method!(as_primitive: Primitive => PrimitiveInfo);
    impl_cast_method!(as_struct: Struct => StructInfo);
    impl_cast_method!(as_list: List => ListInfo);
    impl_cast_method!(as_array: Array => ArrayInfo);
    impl_cast_method!(as_map: Map => MapInfo);
    impl_cast_method!(as_nullable: Nullable => NullableInfo);
    impl_cast_method!(as_enum: Enum => EnumInfo);
    impl_cast_method!(as_shared: Shared => SharedInfo);
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::info::{ReflectKind, Typed};

    #[test]
    fn kind_of_builtins() {
        assert_eq!(i32::type_info().kind(), ReflectKind::Primitive);
        assert_eq!(<Vec<u8>>::type_info().kind(), ReflectKind::List);
        assert_eq!(<[u8; 4]>::type_info().kind(), ReflectKind::Array);
        assert_eq!(<Option<u8>>::type_info().kind(), ReflectKind::Nullable);
    }

    #[test]
    fn cast_reports_kinds() {
        let err = i32::type_info().as_struct().unwrap_err();
        assert_eq!(err.expected, ReflectKind::Struct);
        assert_eq!(err.received, ReflectKind::Primitive);
    }
}
