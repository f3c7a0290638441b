use crate::info::{TypeInfo, TypePath};

/// A static accessor to compile-time type information.
///
/// Implemented by `#[derive(Reflect)]`. The returned [`TypeInfo`] is built
/// once and lives for the rest of the program, see [`cell`](crate::cell).
pub trait Typed: TypePath {
    fn type_info() -> &'static TypeInfo;
}

/// Object-safe access to [`Typed`].
pub trait DynamicTyped {
    fn reflect_type_info(&self) -> &'static TypeInfo;
}

impl<T: Typed> DynamicTyped for T {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }
}
