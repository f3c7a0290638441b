use chrono::{DateTime, Local, NaiveDateTime, Utc};

use crate::Reflect;
use crate::info::PrimitiveCode;

// -----------------------------------------------------------------------------
// Primitive

/// A reflected primitive value.
pub trait Primitive: Reflect {
    fn primitive_value(&self) -> PrimitiveValue;

    fn primitive_code(&self) -> PrimitiveCode;
}

// -----------------------------------------------------------------------------
// PrimitiveValue

/// An owned primitive, tagged with its type.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValue {
    Bool(bool),
    Char(char),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    I128(i128),
    NaiveDateTime(NaiveDateTime),
    U128(u128),
    String(String),
    Isize(isize),
    Usize(usize),
    DateTimeUtc(DateTime<Utc>),
    DateTimeLocal(DateTime<Local>),
}

impl PrimitiveValue {
    pub fn code(&self) -> PrimitiveCode {
        match self {
            Self::Bool(_) => PrimitiveCode::Bool,
            Self::Char(_) => PrimitiveCode::Char,
            Self::I8(_) => PrimitiveCode::I8,
            Self::U8(_) => PrimitiveCode::U8,
            Self::I16(_) => PrimitiveCode::I16,
            Self::U16(_) => PrimitiveCode::U16,
            Self::I32(_) => PrimitiveCode::I32,
            Self::U32(_) => PrimitiveCode::U32,
            Self::I64(_) => PrimitiveCode::I64,
            Self::U64(_) => PrimitiveCode::U64,
            Self::F32(_) => PrimitiveCode::F32,
            Self::F64(_) => PrimitiveCode::F64,
            Self::I128(_) => PrimitiveCode::I128,
            Self::NaiveDateTime(_) => PrimitiveCode::NaiveDateTime,
            Self::U128(_) => PrimitiveCode::U128,
            Self::String(_) => PrimitiveCode::String,
            Self::Isize(_) => PrimitiveCode::Isize,
            Self::Usize(_) => PrimitiveCode::Usize,
            Self::DateTimeUtc(_) => PrimitiveCode::DateTimeUtc,
            Self::DateTimeLocal(_) => PrimitiveCode::DateTimeLocal,
        }
    }

    /// Returns `true` for the all-zero value of a number, `false` and `'\0'`.
    ///
    /// Strings and date-times are never zero. `-0.0` is not zero, so its sign
    /// survives a round trip through the default value.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Bool(v) => !*v,
            Self::Char(v) => *v == '\0',
            Self::I8(v) => *v == 0,
            Self::U8(v) => *v == 0,
            Self::I16(v) => *v == 0,
            Self::U16(v) => *v == 0,
            Self::I32(v) => *v == 0,
            Self::U32(v) => *v == 0,
            Self::I64(v) => *v == 0,
            Self::U64(v) => *v == 0,
            Self::F32(v) => v.to_bits() == 0,
            Self::F64(v) => v.to_bits() == 0,
            Self::I128(v) => *v == 0,
            Self::U128(v) => *v == 0,
            Self::Isize(v) => *v == 0,
            Self::Usize(v) => *v == 0,
            Self::String(_)
            | Self::NaiveDateTime(_)
            | Self::DateTimeUtc(_)
            | Self::DateTimeLocal(_) => false,
        }
    }

    /// The zero value of a primitive type, `None` for date-times.
    pub fn zero(code: PrimitiveCode) -> Option<Self> {
        let value = match code {
            PrimitiveCode::Bool => Self::Bool(false),
            PrimitiveCode::Char => Self::Char('\0'),
            PrimitiveCode::I8 => Self::I8(0),
            PrimitiveCode::U8 => Self::U8(0),
            PrimitiveCode::I16 => Self::I16(0),
            PrimitiveCode::U16 => Self::U16(0),
            PrimitiveCode::I32 => Self::I32(0),
            PrimitiveCode::U32 => Self::U32(0),
            PrimitiveCode::I64 => Self::I64(0),
            PrimitiveCode::U64 => Self::U64(0),
            PrimitiveCode::F32 => Self::F32(0.0),
            PrimitiveCode::F64 => Self::F64(0.0),
            PrimitiveCode::I128 => Self::I128(0),
            PrimitiveCode::U128 => Self::U128(0),
            PrimitiveCode::Isize => Self::Isize(0),
            PrimitiveCode::Usize => Self::Usize(0),
            PrimitiveCode::String => Self::String(String::new()),
            PrimitiveCode::NaiveDateTime
            | PrimitiveCode::DateTimeUtc
            | PrimitiveCode::DateTimeLocal => return None,
        };
        Some(value)
    }

    /// Moves the value into a box of its concrete type.
    pub fn into_reflect(self) -> Box<dyn Reflect> {
        match self {
            Self::Bool(v) => Box::new(v),
            Self::Char(v) => Box::new(v),
            Self::I8(v) => Box::new(v),
            Self::U8(v) => Box::new(v),
            Self::I16(v) => Box::new(v),
            Self::U16(v) => Box::new(v),
            Self::I32(v) => Box::new(v),
            Self::U32(v) => Box::new(v),
            Self::I64(v) => Box::new(v),
            Self::U64(v) => Box::new(v),
            Self::F32(v) => Box::new(v),
            Self::F64(v) => Box::new(v),
            Self::I128(v) => Box::new(v),
            Self::NaiveDateTime(v) => Box::new(v),
            Self::U128(v) => Box::new(v),
            Self::String(v) => Box::new(v),
            Self::Isize(v) => Box::new(v),
            Self::Usize(v) => Box::new(v),
            Self::DateTimeUtc(v) => Box::new(v),
            Self::DateTimeLocal(v) => Box::new(v),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::PrimitiveValue;
    use crate::info::PrimitiveCode;

    #[test]
    fn zero_detection() {
        assert!(PrimitiveValue::I32(0).is_zero());
        assert!(!PrimitiveValue::I32(-1).is_zero());
        assert!(PrimitiveValue::F64(0.0).is_zero());
        assert!(!PrimitiveValue::F64(-0.0).is_zero());
        assert!(!PrimitiveValue::String(String::new()).is_zero());
    }

    #[test]
    fn zero_matches_code() {
        for code in PrimitiveCode::ALL {
            if let Some(zero) = PrimitiveValue::zero(code) {
                assert_eq!(zero.code(), code);
            }
        }
    }

    #[test]
    fn into_reflect_keeps_type() {
        let boxed = PrimitiveValue::U16(7).into_reflect();
        assert_eq!(boxed.downcast_ref::<u16>(), Some(&7));
    }
}
