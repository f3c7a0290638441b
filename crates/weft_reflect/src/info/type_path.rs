use core::any::TypeId;
use core::fmt;

// -----------------------------------------------------------------------------
// TypePath

/// A stable, human readable path for a type.
///
/// The path is what travels on the wire inside type descriptor records, so it
/// must not depend on compiler internals the way [`core::any::type_name`] does.
///
/// ```
/// use weft_reflect::info::TypePath;
///
/// assert_eq!(<Vec<i32>>::type_path(), "alloc::vec::Vec<i32>");
/// assert_eq!(<Vec<i32>>::type_name(), "Vec<i32>");
/// ```
pub trait TypePath: 'static {
    /// The fully qualified path, e.g. `alloc::vec::Vec<i32>`.
    fn type_path() -> &'static str;

    /// The short name, e.g. `Vec<i32>`.
    fn type_name() -> &'static str;
}

// -----------------------------------------------------------------------------
// DynamicTypePath

/// Object-safe access to [`TypePath`].
pub trait DynamicTypePath {
    fn reflect_type_path(&self) -> &'static str;

    fn reflect_type_name(&self) -> &'static str;
}

impl<T: TypePath> DynamicTypePath for T {
    #[inline]
    fn reflect_type_path(&self) -> &'static str {
        Self::type_path()
    }

    #[inline]
    fn reflect_type_name(&self) -> &'static str {
        Self::type_name()
    }
}

// -----------------------------------------------------------------------------
// Type

/// The identity of a type: its [`TypeId`] plus lazily computed paths.
///
/// Paths are stored as function pointers, so building a `Type` never forces
/// a generic path cell to initialize.
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    type_path: fn() -> &'static str,
    type_name: fn() -> &'static str,
}

impl Type {
    #[inline]
    pub const fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            type_path: T::type_path,
            type_name: T::type_name,
        }
    }

    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[inline(always)]
    pub fn path(&self) -> &'static str {
        (self.type_path)()
    }

    #[inline(always)]
    pub fn name(&self) -> &'static str {
        (self.type_name)()
    }

    #[inline]
    pub fn is<T: 'static + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
