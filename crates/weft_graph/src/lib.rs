//! An object graph serializer over reflected types.
//!
//! Values are walked through their reflection data and rendered as a tree
//! of [`Element`](element::Element)s, which a format adapter turns into
//! bytes. Shared handles keep their identity across a round trip, cycles
//! included, and every type is described once per stream.
//!
//! ```
//! use weft_graph::{Format, Weft};
//! use weft_reflect::derive::Reflect;
//!
//! #[derive(Reflect, Default, Debug, PartialEq)]
//! #[reflect(default)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let weft = Weft::new();
//! let bytes = weft.serialize(&Point { x: 3, y: -4 }, Format::Json).unwrap();
//! let back: Point = weft.deserialize(&bytes, Format::Json).unwrap();
//! assert_eq!(back, Point { x: 3, y: -4 });
//! ```
//!
//! ## Menu
//!
//! - [`Weft`]: serialize and deserialize entry points.
//! - [`Settings`]: streaming mode, type descriptors, checked reads.
//! - [`modifiers`]: containers, filters and naming conventions.
//! - [`container`]: substitutes for types the walk cannot handle directly.
//! - [`descriptor`]: how a type is walked and built.
//! - [`format`]: binary, XML and JSON adapters.
//! - [`index`]: session type indices.
//! - [`error`]: the error taxonomy.
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod facade;
mod read;
mod settings;
mod write;

pub mod container;
pub mod descriptor;
pub mod element;
pub mod error;
pub mod format;
pub mod index;
pub mod modifiers;
pub mod record;

// -----------------------------------------------------------------------------
// Top-level exports

pub use inventory;

pub use error::GraphError;
pub use facade::{Weft, WeftBuilder};
pub use format::Format;
pub use settings::{Settings, StreamingMode};
