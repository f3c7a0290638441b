//! Static type descriptions.
//!
//! ## Menu
//!
//! - [`TypePath`] / [`DynamicTypePath`]: stable type paths.
//! - [`Typed`] / [`DynamicTyped`]: access to the static [`TypeInfo`].
//! - [`Type`]: a `TypeId` paired with its path.
//! - [`TypeInfo`]: one variant per [`ReflectKind`].
//! - [`TypeHandle`]: a reflected reference to a [`TypeInfo`].

// -----------------------------------------------------------------------------
// Modules

mod collection_info;
mod enum_info;
mod primitive_info;
mod struct_info;
mod type_handle;
mod type_info;
mod type_path;
mod typed;
mod wrapper_info;

// -----------------------------------------------------------------------------
// Exports

pub use collection_info::{ArrayInfo, FromItemsFn, ListInfo, MapInfo};
pub use enum_info::{EnumInfo, VariantInfo};
pub use primitive_info::{OpaqueInfo, PrimitiveCode, PrimitiveInfo};
pub use struct_info::{FieldFlags, NamedField, PropertyInfo, StructInfo};
pub use type_handle::TypeHandle;
pub use type_info::{ReflectKind, ReflectKindError, TypeInfo};
pub use type_path::{DynamicTypePath, Type, TypePath};
pub use typed::{DynamicTyped, Typed};
pub use wrapper_info::{DynamicInfo, NullableInfo, SharedInfo};
