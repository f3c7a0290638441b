//! Framework records that travel on the wire.
//!
//! These are ordinary reflected structs. Each has a reserved type index, so
//! no descriptor is ever emitted for them.

use weft_reflect::derive::Reflect;

/// Identifies a module that contributes modifiers.
///
/// Listed in the stream header so a reader can try to load the same module.
#[derive(Reflect, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[reflect(default, clone)]
pub struct ModuleIdentifier {
    pub short_name: String,
    pub full_name: String,
    pub location: String,
}

impl ModuleIdentifier {
    pub fn new(
        short_name: impl Into<String>,
        full_name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            short_name: short_name.into(),
            full_name: full_name.into(),
            location: location.into(),
        }
    }

    /// The identifier of this crate's own modifier set.
    pub fn builtin() -> Self {
        Self::new(
            env!("CARGO_PKG_NAME"),
            concat!(env!("CARGO_PKG_NAME"), "@", env!("CARGO_PKG_VERSION")),
            module_path!(),
        )
    }
}

/// The first value of every stream.
#[derive(Reflect, Debug, Clone, Default, PartialEq)]
#[reflect(default, clone)]
pub struct Header {
    pub modules: Vec<ModuleIdentifier>,
}

/// The serialized shape of one type.
///
/// `constructor_map[i]` is the member index bound to parameter `i` of the
/// chosen constructor, empty when the type is built from its default.
/// `nested` holds the item, key or value type indices, `-1` when unknown.
#[derive(Reflect, Debug, Clone, Default, PartialEq, Eq)]
#[reflect(default, clone)]
pub struct TypeDescriptorRecord {
    pub type_path: String,
    pub members: Vec<String>,
    pub constructor_map: Vec<i32>,
    pub nested: Vec<i32>,
}
