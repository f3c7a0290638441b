use crate::Reflect;
use crate::info::{Type, TypePath};

/// One variant of a field-less enum.
#[derive(Debug, Clone, Copy)]
pub struct VariantInfo {
    pub name: &'static str,
    pub discriminant: i64,
}

/// Information about a field-less enum.
///
/// Enums travel as their discriminant, so each variant keeps the value
/// written by the compiler (or by an explicit `= n`).
#[derive(Debug)]
pub struct EnumInfo {
    ty: Type,
    variants: Box<[VariantInfo]>,
    from_discriminant: fn(i64) -> Option<Box<dyn Reflect>>,
}

impl EnumInfo {
    pub fn new<T: TypePath>(
        variants: &[VariantInfo],
        from_discriminant: fn(i64) -> Option<Box<dyn Reflect>>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            variants: variants.into(),
            from_discriminant,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn variants(&self) -> &[VariantInfo] {
        &self.variants
    }

    pub fn variant(&self, name: &str) -> Option<&VariantInfo> {
        self.variants.iter().find(|variant| variant.name == name)
    }

    /// Builds the variant with the given discriminant.
    #[inline]
    pub fn from_discriminant(&self, discriminant: i64) -> Option<Box<dyn Reflect>> {
        (self.from_discriminant)(discriminant)
    }
}
