//! Built-in reflection for foreign types.
//!
//! ## Implemented Menu
//!
//! - primitives: `bool`, `char`, `i8`-`i128`, `u8`-`u128`, `isize`, `usize`,
//!   `f32`, `f64`, `String`
//! - chrono: `NaiveDateTime`, `DateTime<Utc>`, `DateTime<Local>`
//! - lists: `Vec<T>`, `VecDeque<T>`, `BTreeSet<T>`, `HashSet<T>`
//! - maps: `BTreeMap<K, V>`, `HashMap<K, V>`
//! - arrays: `[T; N]`, `Box<[T]>`
//! - nullable: `Option<T>`
//! - opaque: `uuid::Uuid`

// -----------------------------------------------------------------------------
// Modules

mod array;
mod list;
mod map;
mod option;
mod primitive;

crate::derive::impl_reflect_opaque!(#[reflect(clone, default)] ::uuid::Uuid);

// -----------------------------------------------------------------------------
// Helpers

use crate::Reflect;
use crate::info::TypePath;
use crate::ops::SetError;

/// Moves an item into its static type, for `push` and `insert`.
pub(crate) fn take_item<T: Reflect + TypePath>(value: Box<dyn Reflect>) -> Result<T, SetError> {
    value.take::<T>().map_err(|value| SetError::TypeMismatch {
        expected: T::type_path(),
        found: value.reflect_type_path(),
    })
}
