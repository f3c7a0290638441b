//! Kind-specific views of reflected values.
//!
//! ## Menu
//!
//! - [`ReflectRef`] / [`ReflectMut`]: the view returned by
//!   [`Reflect::reflect_ref`] and [`Reflect::reflect_mut`].
//! - Traits per kind: [`Primitive`], [`Struct`], [`List`], [`Array`], [`Map`],
//!   [`Nullable`], [`Enum`], [`SharedHandle`].
//! - Values: [`Shared`], [`Dynamic`], [`PrimitiveValue`].
//! - Errors: [`SetError`], [`ReflectCloneError`].
//!
//! [`Reflect::reflect_ref`]: crate::Reflect::reflect_ref
//! [`Reflect::reflect_mut`]: crate::Reflect::reflect_mut

// -----------------------------------------------------------------------------
// Modules

mod array_ops;
mod dynamic;
mod enum_ops;
mod errors;
mod list_ops;
mod map_ops;
mod nullable_ops;
mod primitive;
mod shared;
mod struct_ops;

// -----------------------------------------------------------------------------
// Exports

pub use array_ops::Array;
pub use dynamic::Dynamic;
pub use enum_ops::Enum;
pub use errors::{ReflectCloneError, SetError};
pub use list_ops::List;
pub use map_ops::Map;
pub use nullable_ops::Nullable;
pub use primitive::{Primitive, PrimitiveValue};
pub use shared::{Shared, SharedHandle};
pub use struct_ops::Struct;

use crate::Reflect;
use crate::info::ReflectKind;

// -----------------------------------------------------------------------------
// ReflectRef

/// An immutable, kind-specific view of a reflected value.
pub enum ReflectRef<'a> {
    Primitive(&'a dyn Primitive),
    Struct(&'a dyn Struct),
    List(&'a dyn List),
    Array(&'a dyn Array),
    Map(&'a dyn Map),
    Nullable(&'a dyn Nullable),
    Enum(&'a dyn Enum),
    Shared(&'a dyn SharedHandle),
    /// The value held by a [`Dynamic`].
    Dynamic(&'a dyn Reflect),
    Opaque(&'a dyn Reflect),
}

impl ReflectRef<'_> {
    pub fn kind(&self) -> ReflectKind {
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
}

// -----------------------------------------------------------------------------
// ReflectMut

/// A mutable, kind-specific view of a reflected value.
///
/// The pointee of a [`Shared`] is reached through
/// [`SharedHandle::try_borrow_inner_mut`], which only needs a shared reference.
pub enum ReflectMut<'a> {
    Primitive(&'a mut dyn Primitive),
    Struct(&'a mut dyn Struct),
    List(&'a mut dyn List),
    Array(&'a mut dyn Array),
    Map(&'a mut dyn Map),
    Nullable(&'a mut dyn Nullable),
    Enum(&'a mut dyn Enum),
    Shared(&'a mut dyn SharedHandle),
    Dynamic(&'a mut dyn Reflect),
    Opaque(&'a mut dyn Reflect),
}

impl ReflectMut<'_> {
    pub fn kind(&self) -> ReflectKind {
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
}
