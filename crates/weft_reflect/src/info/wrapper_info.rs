use crate::Reflect;
use crate::info::{Type, TypeInfo, TypePath, Typed};

// -----------------------------------------------------------------------------
// NullableInfo

/// Information about `Option<T>`.
#[derive(Debug)]
pub struct NullableInfo {
    ty: Type,
    inner_ty: Type,
    inner_info: fn() -> &'static TypeInfo,
    none: fn() -> Box<dyn Reflect>,
    some: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
}

impl NullableInfo {
    pub fn new<TOption: TypePath, TInner: Typed>(
        none: fn() -> Box<dyn Reflect>,
        some: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
    ) -> Self {
        Self {
            ty: Type::of::<TOption>(),
            inner_ty: Type::of::<TInner>(),
            inner_info: TInner::type_info,
            none,
            some,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline(always)]
    pub const fn inner_ty(&self) -> &Type {
        &self.inner_ty
    }

    #[inline]
    pub fn inner_info(&self) -> &'static TypeInfo {
        (self.inner_info)()
    }

    #[inline]
    pub fn none(&self) -> Box<dyn Reflect> {
        (self.none)()
    }

    /// Wraps an inner value, handing it back on type mismatch.
    #[inline]
    pub fn some(&self, value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.some)(value)
    }
}

// -----------------------------------------------------------------------------
// SharedInfo

/// Information about [`Shared<T>`](crate::Shared).
#[derive(Debug)]
pub struct SharedInfo {
    ty: Type,
    inner_ty: Type,
    inner_info: fn() -> &'static TypeInfo,
    wrap: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
}

impl SharedInfo {
    pub fn new<TShared: TypePath, TInner: Typed>(
        wrap: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
    ) -> Self {
        Self {
            ty: Type::of::<TShared>(),
            inner_ty: Type::of::<TInner>(),
            inner_info: TInner::type_info,
            wrap,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline(always)]
    pub const fn inner_ty(&self) -> &Type {
        &self.inner_ty
    }

    #[inline]
    pub fn inner_info(&self) -> &'static TypeInfo {
        (self.inner_info)()
    }

    /// Moves an inner value into a new handle.
    #[inline]
    pub fn wrap(&self, value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.wrap)(value)
    }
}

// -----------------------------------------------------------------------------
// DynamicInfo

/// Information about [`Dynamic`](crate::Dynamic), a value of unknown static type.
#[derive(Debug)]
pub struct DynamicInfo {
    ty: Type,
}

impl DynamicInfo {
    pub const fn new<T: TypePath>() -> Self {
        Self { ty: Type::of::<T>() }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }
}
