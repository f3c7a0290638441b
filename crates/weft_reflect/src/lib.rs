//! Compile-time generated reflection for the `weft` object-graph serializer.
//!
//! Rust has no runtime introspection, so every serializable type carries a
//! static description of its shape, produced by `#[derive(Reflect)]` or by the
//! built-in implementations in this crate.
//!
//! ## Menu
//!
//! - [`Reflect`]: dynamic access to a value, the root of the system.
//! - [`info`]: static type descriptions ([`TypePath`], [`Typed`], [`TypeInfo`]).
//! - [`ops`]: kind-specific views of a value ([`Struct`], [`List`], [`Map`], ...).
//! - [`registry`]: [`TypeRegistry`] holding [`TypeMeta`] and type traits.
//! - [`Shared`]: the reference-tracked handle, the "class" of the object model.
//! - [`Dynamic`]: a type-erased value, the "object" of the object model.
//!
//! ## Examples
//!
//! ```
//! use weft_reflect::{Reflect, derive::Reflect, ops::ReflectRef};
//!
//! #[derive(Reflect, Default)]
//! #[reflect(default)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let point = Point { x: 1, y: 2 };
//! let ReflectRef::Struct(s) = point.reflect_ref() else { unreachable!() };
//! assert_eq!(s.field("y").and_then(|v| v.downcast_ref::<i32>()), Some(&2));
//! ```
//!
//! [`TypePath`]: crate::info::TypePath
//! [`Typed`]: crate::info::Typed
//! [`TypeInfo`]: crate::info::TypeInfo
//! [`Struct`]: crate::ops::Struct
//! [`List`]: crate::ops::List
//! [`Map`]: crate::ops::Map
//! [`TypeRegistry`]: crate::registry::TypeRegistry
//! [`TypeMeta`]: crate::registry::TypeMeta
//! [`Shared`]: crate::ops::Shared
//! [`Dynamic`]: crate::ops::Dynamic
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Crates

extern crate alloc;

// Generated code names `weft_reflect`, which must also resolve in this crate.
extern crate self as weft_reflect;

// -----------------------------------------------------------------------------
// Modules

mod impls;
mod reflection;

pub mod cell;
pub mod info;
pub mod ops;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use ops::{Dynamic, Shared};
pub use reflection::Reflect;
pub use weft_reflect_derive as derive;
