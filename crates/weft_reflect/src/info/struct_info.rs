use bitflags::bitflags;

use crate::info::{Type, TypeInfo, TypePath, Typed};

// -----------------------------------------------------------------------------
// FieldFlags

bitflags! {
    /// Serialization hints attached to a field or property by `#[reflect(...)]`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FieldFlags: u8 {
        /// `#[reflect(always_serialize)]`: include, overriding every other rule.
        const ALWAYS_SERIALIZE = 1 << 0;
        /// `#[reflect(never_serialize)]`: always exclude.
        const NEVER_SERIALIZE = 1 << 1;
        /// `#[reflect(non_serialized)]`: excluded unless forced.
        const NON_SERIALIZED = 1 << 2;
        /// `#[reflect(hidden)]` or `#[doc(hidden)]`: excluded unless forced.
        const HIDDEN = 1 << 3;
        /// `#[reflect(base)]`: the field embeds a base struct whose fields are inherited.
        const BASE = 1 << 4;
    }
}

// -----------------------------------------------------------------------------
// NamedField

/// A named field of a struct.
#[derive(Debug, Clone)]
pub struct NamedField {
    name: &'static str,
    ty: Type,
    // Stored as a function to break static initialization cycles
    // between mutually recursive types.
    type_info: fn() -> &'static TypeInfo,
    flags: FieldFlags,
}

impl NamedField {
    #[inline]
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            ty: Type::of::<T>(),
            type_info: T::type_info,
            flags: FieldFlags::empty(),
        }
    }

    #[inline]
    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline(always)]
    pub const fn flags(&self) -> FieldFlags {
        self.flags
    }

    #[inline]
    pub fn is_base(&self) -> bool {
        self.flags.contains(FieldFlags::BASE)
    }
}

// -----------------------------------------------------------------------------
// PropertyInfo

/// A getter/setter pair declared with `#[reflect(property(...))]`.
///
/// Properties are accessed through [`Struct::property`] and
/// [`Struct::set_property`]. A property without a setter is still
/// reflected but cannot be restored.
///
/// [`Struct::property`]: crate::ops::Struct::property
/// [`Struct::set_property`]: crate::ops::Struct::set_property
#[derive(Debug, Clone)]
pub struct PropertyInfo {
    name: &'static str,
    ty: Type,
    type_info: fn() -> &'static TypeInfo,
    has_setter: bool,
    flags: FieldFlags,
}

impl PropertyInfo {
    #[inline]
    pub fn new<T: Typed>(name: &'static str, has_setter: bool) -> Self {
        Self {
            name,
            ty: Type::of::<T>(),
            type_info: T::type_info,
            has_setter,
            flags: FieldFlags::empty(),
        }
    }

    /// Builds the info from the getter's signature, inferring the property type.
    #[inline]
    pub fn from_getter<S, T: Typed>(
        name: &'static str,
        _getter: fn(&S) -> T,
        has_setter: bool,
    ) -> Self {
        Self::new::<T>(name, has_setter)
    }

    #[inline]
    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline(always)]
    pub const fn has_setter(&self) -> bool {
        self.has_setter
    }

    #[inline(always)]
    pub const fn flags(&self) -> FieldFlags {
        self.flags
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// Information about a struct with named fields.
#[derive(Debug)]
pub struct StructInfo {
    ty: Type,
    fields: Box<[NamedField]>,
    properties: Box<[PropertyInfo]>,
}

impl StructInfo {
    pub fn new<T: TypePath>(fields: &[NamedField]) -> Self {
        Self {
            ty: Type::of::<T>(),
            fields: fields.to_vec().into_boxed_slice(),
            properties: Box::new([]),
        }
    }

    pub fn with_properties(mut self, properties: &[PropertyInfo]) -> Self {
        self.properties = properties.to_vec().into_boxed_slice();
        self
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn fields(&self) -> &[NamedField] {
        &self.fields
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&NamedField> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn properties(&self) -> &[PropertyInfo] {
        &self.properties
    }

    #[inline]
    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|property| property.name == name)
    }

    /// The field marked `#[reflect(base)]`, if any.
    #[inline]
    pub fn base(&self) -> Option<&NamedField> {
        self.fields.iter().find(|field| field.is_base())
    }
}
