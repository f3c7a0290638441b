//! Small containers shared by the `weft` crates.
//!
//! ## Menu
//!
//! - [`hash`]: `hashbrown` maps and sets with fixed `foldhash` seeds.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId) without rehashing.
//! - [`LfuCache`]: a tiny bounded cache that evicts the least frequently used entry.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod lfu;
mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use lfu::LfuCache;
pub use typeid_map::TypeIdMap;
