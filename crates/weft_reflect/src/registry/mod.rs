//! Runtime type metadata.
//!
//! ## Menu
//!
//! - [`TypeTrait`]: a capability supported by a type.
//! - [`FromType`]: builds a `TypeTrait` for a concrete type.
//! - [`TypeMeta`]: a [`TypeInfo`] plus a [`TypeTrait`] table.
//! - [`GetTypeMeta`] / [`DynamicTypeMeta`]: produce the `TypeMeta` of a type.
//! - [`TypeRegistry`]: stores `TypeMeta`s by id, path and name.
//! - TypeTraits:
//!     - [`TypeTraitDefault`]: [`Default`] construction.
//!     - [`TypeTraitConstructors`]: parametric constructors.
//!     - [`TypeTraitConvert`]: a lossless string form.
//!     - [`TypeTraitSerialize`] / [`TypeTraitDeserialize`]: `serde` support.
//!
//! ## auto_register
//!
//! Types annotated with `#[reflect(auto_register)]` are submitted through the
//! [`inventory`] crate and picked up by [`TypeRegistry::auto_register`].
//!
//! [`TypeInfo`]: crate::info::TypeInfo

// -----------------------------------------------------------------------------
// Modules

mod from_type;
mod traits;
mod type_meta;
mod type_registry;
mod type_trait;

// -----------------------------------------------------------------------------
// Exports

pub use from_type::FromType;
pub use traits::TypeTraitDefault;
pub use traits::{ConstructError, ConstructorArgs, ConstructorInfo, ConstructorParam};
pub use traits::{TypeTraitConstructors, TypeTraitConvert};
pub use traits::{TypeTraitDeserialize, TypeTraitSerialize};
pub use type_meta::{DynamicTypeMeta, GetTypeMeta, TypeMeta};
pub use type_registry::TypeRegistry;
pub use type_trait::TypeTrait;
