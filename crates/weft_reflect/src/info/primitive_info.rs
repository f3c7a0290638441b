use core::fmt;

use crate::info::{Type, TypePath};

// -----------------------------------------------------------------------------
// PrimitiveCode

/// The intrinsic numeric code of a primitive type.
///
/// On the wire a primitive type's index always equals its code, whatever the
/// order in which types are discovered. Codes `0..=2` are reserved.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveCode {
    Bool = 3,
    Char = 4,
    I8 = 5,
    U8 = 6,
    I16 = 7,
    U16 = 8,
    I32 = 9,
    U32 = 10,
    I64 = 11,
    U64 = 12,
    F32 = 13,
    F64 = 14,
    I128 = 15,
    /// `chrono::NaiveDateTime`, a date-time without zone.
    NaiveDateTime = 16,
    U128 = 17,
    String = 18,
    Isize = 19,
    Usize = 20,
    /// `chrono::DateTime<Utc>`.
    DateTimeUtc = 21,
    /// `chrono::DateTime<Local>`.
    DateTimeLocal = 22,
}

impl PrimitiveCode {
    /// Every primitive code, in numeric order.
    pub const ALL: [PrimitiveCode; 20] = [
        Self::Bool,
        Self::Char,
        Self::I8,
        Self::U8,
        Self::I16,
        Self::U16,
        Self::I32,
        Self::U32,
        Self::I64,
        Self::U64,
        Self::F32,
        Self::F64,
        Self::I128,
        Self::NaiveDateTime,
        Self::U128,
        Self::String,
        Self::Isize,
        Self::Usize,
        Self::DateTimeUtc,
        Self::DateTimeLocal,
    ];

    /// One past the highest primitive code.
    pub const END: u32 = 23;

    #[inline]
    pub const fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.code() == code)
    }
}

impl fmt::Display for PrimitiveCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// -----------------------------------------------------------------------------
// PrimitiveInfo

/// Information about a primitive type.
#[derive(Debug)]
pub struct PrimitiveInfo {
    ty: Type,
    code: PrimitiveCode,
}

impl PrimitiveInfo {
    pub const fn new<T: TypePath>(code: PrimitiveCode) -> Self {
        Self {
            ty: Type::of::<T>(),
            code,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline(always)]
    pub const fn code(&self) -> PrimitiveCode {
        self.code
    }
}

// -----------------------------------------------------------------------------
// OpaqueInfo

/// Information about a type whose inner structure is not reflected.
///
/// Opaque values can only be serialized through a container substitute.
#[derive(Debug)]
pub struct OpaqueInfo {
    ty: Type,
}

impl OpaqueInfo {
    pub const fn new<T: TypePath + ?Sized>() -> Self {
        Self { ty: Type::of::<T>() }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::PrimitiveCode;

    #[test]
    fn codes_are_unique_and_below_end() {
        for (index, code) in PrimitiveCode::ALL.iter().enumerate() {
            assert!(code.code() < PrimitiveCode::END);
            assert_eq!(PrimitiveCode::from_code(code.code()), Some(*code));
            for other in &PrimitiveCode::ALL[index + 1..] {
                assert_ne!(code.code(), other.code());
            }
        }
        assert_eq!(PrimitiveCode::from_code(2), None);
    }
}
