use chrono::{DateTime, Local, Utc};
use weft_reflect::info::PrimitiveCode;
use weft_reflect::ops::PrimitiveValue;

use super::varint;
use super::{FormatReader, FormatWriter};
use crate::element::{Element, ElementKind, Token};
use crate::error::FormatError;

// -----------------------------------------------------------------------------
// Layout

const VERSION: &str = "03.00";

const HAS_TYPE: u8 = 0x10;
const HAS_INSTANCE: u8 = 0x20;
const HAS_COUNT: u8 = 0x40;
const CLOSING: u8 = 0x80;
const KIND_MASK: u8 = 0x0F;

/// A null carrying a type tag, which no real element does.
const END_MARK: u8 = ElementKind::Null.code() | HAS_TYPE;

// -----------------------------------------------------------------------------
// BinaryWriter

/// Writes the compact binary layout.
///
/// An element is one byte (kind in the low nibble, attribute flags above),
/// followed by its attributes as varints. Primitive values follow their
/// element directly and close themselves.
#[derive(Debug, Default)]
pub struct BinaryWriter {
    out: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_datetime(&mut self, seconds: i64, nanos: u32) {
        varint::write_signed(&mut self.out, i128::from(seconds));
        varint::write_unsigned(&mut self.out, u128::from(nanos));
    }
}

impl FormatWriter for BinaryWriter {
    fn start_tree(&mut self) {
        varint::write_unsigned(&mut self.out, VERSION.len() as u128);
        self.out.extend_from_slice(VERSION.as_bytes());
    }

    fn enter_element(&mut self, element: Element) -> bool {
        let ty = element.ty();
        let instance = element.instance();
        let count = element.count();

        let mut head = element.kind().code();
        if ty.is_some() {
            head |= HAS_TYPE;
        }
        if instance.is_some() {
            head |= HAS_INSTANCE;
        }
        if count.is_some() {
            head |= HAS_COUNT;
        }
        self.out.push(head);

        for attr in [ty, instance, count].into_iter().flatten() {
            varint::write_unsigned(&mut self.out, u128::from(attr));
        }
        !element.kind().needs_end()
    }

    fn write_primitive(&mut self, value: &PrimitiveValue) {
        let out = &mut self.out;
        match *value {
            PrimitiveValue::Bool(v) => out.push(u8::from(v)),
            PrimitiveValue::Char(v) => varint::write_unsigned(out, u128::from(u32::from(v))),
            PrimitiveValue::I8(v) => out.push(v as u8),
            PrimitiveValue::U8(v) => out.push(v),
            PrimitiveValue::I16(v) => varint::write_signed(out, i128::from(v)),
            PrimitiveValue::U16(v) => varint::write_unsigned(out, u128::from(v)),
            PrimitiveValue::I32(v) => varint::write_signed(out, i128::from(v)),
            PrimitiveValue::U32(v) => varint::write_unsigned(out, u128::from(v)),
            PrimitiveValue::I64(v) => varint::write_signed(out, i128::from(v)),
            PrimitiveValue::U64(v) => varint::write_unsigned(out, u128::from(v)),
            PrimitiveValue::F32(v) => out.extend_from_slice(&v.to_le_bytes()),
            PrimitiveValue::F64(v) => out.extend_from_slice(&v.to_le_bytes()),
            PrimitiveValue::I128(v) => varint::write_signed(out, v),
            PrimitiveValue::U128(v) => varint::write_unsigned(out, v),
            PrimitiveValue::Isize(v) => varint::write_signed(out, v as i128),
            PrimitiveValue::Usize(v) => varint::write_unsigned(out, v as u128),
            PrimitiveValue::String(ref v) => {
                varint::write_unsigned(out, v.len() as u128);
                out.extend_from_slice(v.as_bytes());
            }
            PrimitiveValue::NaiveDateTime(v) => {
                let v = v.and_utc();
                self.write_datetime(v.timestamp(), v.timestamp_subsec_nanos());
            }
            PrimitiveValue::DateTimeUtc(v) => {
                self.write_datetime(v.timestamp(), v.timestamp_subsec_nanos());
            }
            PrimitiveValue::DateTimeLocal(v) => {
                self.write_datetime(v.timestamp(), v.timestamp_subsec_nanos());
            }
        }
    }

    fn exit_element(&mut self, kind: ElementKind) {
        self.out.push(CLOSING | kind.code());
    }

    fn insert_data_end_mark(&mut self) {
        self.out.push(END_MARK);
    }

    fn finish(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.out)
    }

    fn is_string_formatter(&self) -> bool {
        false
    }

    fn can_manage_multiplex_streams(&self) -> bool {
        true
    }
}

// -----------------------------------------------------------------------------
// BinaryReader

/// Reads the layout written by [`BinaryWriter`].
#[derive(Debug)]
pub struct BinaryReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn byte(&mut self) -> Result<u8, FormatError> {
        let byte = *self.bytes.get(self.pos).ok_or(FormatError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(byte)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        let end = self.pos.checked_add(len).ok_or(FormatError::UnexpectedEnd)?;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or(FormatError::UnexpectedEnd)?;
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let mut array = [0; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    fn unsigned(&mut self) -> Result<u128, FormatError> {
        varint::read_unsigned(self.bytes, &mut self.pos)
    }

    fn signed(&mut self) -> Result<i128, FormatError> {
        varint::read_signed(self.bytes, &mut self.pos)
    }

    fn length(&mut self) -> Result<usize, FormatError> {
        let value = self.unsigned()?;
        usize::try_from(value).map_err(|_| FormatError::malformed("length out of range"))
    }

    fn attribute(&mut self) -> Result<u32, FormatError> {
        let value = self.unsigned()?;
        u32::try_from(value).map_err(|_| FormatError::malformed("element attribute out of range"))
    }

    fn datetime(&mut self, code: PrimitiveCode) -> Result<DateTime<Utc>, FormatError> {
        let seconds = self.signed()?;
        let nanos = self.unsigned()?;
        i64::try_from(seconds)
            .ok()
            .zip(u32::try_from(nanos).ok())
            .and_then(|(seconds, nanos)| DateTime::from_timestamp(seconds, nanos))
            .ok_or_else(|| FormatError::InvalidPrimitive {
                code,
                text: format!("{seconds}s {nanos}ns"),
            })
    }
}

macro_rules! narrow {
    ($self:ident, $read:ident, $code:ident, $ty:ty) => {{
        let value = $self.$read()?;
        <$ty>::try_from(value).map_err(|_| FormatError::InvalidPrimitive {
            code: PrimitiveCode::$code,
            text: value.to_string(),
        })?
    }};
}

impl FormatReader for BinaryReader<'_> {
    fn start_tree(&mut self) -> Result<(), FormatError> {
        let len = self.length()?;
        let version = self.take(len)?;
        if version == VERSION.as_bytes() {
            Ok(())
        } else {
            Err(FormatError::Version {
                found: String::from_utf8_lossy(version).into_owned(),
            })
        }
    }

    fn next_token(&mut self) -> Result<Token, FormatError> {
        let head = self.byte()?;
        if head == END_MARK {
            return Ok(Token::End);
        }
        let Some(kind) = ElementKind::from_code(head & KIND_MASK) else {
            return Err(FormatError::malformed(format!("unknown element byte {head:#04x}")));
        };
        if head & CLOSING != 0 {
            return Ok(Token::Close(kind));
        }

        let ty = (head & HAS_TYPE != 0).then(|| self.attribute()).transpose()?;
        let instance = (head & HAS_INSTANCE != 0).then(|| self.attribute()).transpose()?;
        let count = (head & HAS_COUNT != 0).then(|| self.attribute()).transpose()?;
        Element::from_parts(kind, ty, instance, count)
            .map(Token::Open)
            .ok_or_else(|| FormatError::malformed(format!("`{kind}` element lacks an attribute")))
    }

    fn read_primitive(&mut self, code: PrimitiveCode) -> Result<PrimitiveValue, FormatError> {
        let value = match code {
            PrimitiveCode::Bool => match self.byte()? {
                0 => PrimitiveValue::Bool(false),
                1 => PrimitiveValue::Bool(true),
                other => {
                    return Err(FormatError::InvalidPrimitive {
                        code,
                        text: other.to_string(),
                    });
                }
            },
            PrimitiveCode::Char => {
                let value = narrow!(self, unsigned, Char, u32);
                let c = char::from_u32(value).ok_or(FormatError::InvalidPrimitive {
                    code,
                    text: value.to_string(),
                })?;
                PrimitiveValue::Char(c)
            }
            PrimitiveCode::I8 => PrimitiveValue::I8(self.byte()? as i8),
            PrimitiveCode::U8 => PrimitiveValue::U8(self.byte()?),
            PrimitiveCode::I16 => PrimitiveValue::I16(narrow!(self, signed, I16, i16)),
            PrimitiveCode::U16 => PrimitiveValue::U16(narrow!(self, unsigned, U16, u16)),
            PrimitiveCode::I32 => PrimitiveValue::I32(narrow!(self, signed, I32, i32)),
            PrimitiveCode::U32 => PrimitiveValue::U32(narrow!(self, unsigned, U32, u32)),
            PrimitiveCode::I64 => PrimitiveValue::I64(narrow!(self, signed, I64, i64)),
            PrimitiveCode::U64 => PrimitiveValue::U64(narrow!(self, unsigned, U64, u64)),
            PrimitiveCode::F32 => PrimitiveValue::F32(f32::from_le_bytes(self.array()?)),
            PrimitiveCode::F64 => PrimitiveValue::F64(f64::from_le_bytes(self.array()?)),
            PrimitiveCode::I128 => PrimitiveValue::I128(self.signed()?),
            PrimitiveCode::U128 => PrimitiveValue::U128(self.unsigned()?),
            PrimitiveCode::Isize => PrimitiveValue::Isize(narrow!(self, signed, Isize, isize)),
            PrimitiveCode::Usize => PrimitiveValue::Usize(narrow!(self, unsigned, Usize, usize)),
            PrimitiveCode::String => {
                let len = self.length()?;
                let bytes = self.take(len)?;
                let text = core::str::from_utf8(bytes)
                    .map_err(|err| FormatError::malformed(err.to_string()))?;
                PrimitiveValue::String(text.to_owned())
            }
            PrimitiveCode::NaiveDateTime => {
                PrimitiveValue::NaiveDateTime(self.datetime(code)?.naive_utc())
            }
            PrimitiveCode::DateTimeUtc => PrimitiveValue::DateTimeUtc(self.datetime(code)?),
            PrimitiveCode::DateTimeLocal => {
                PrimitiveValue::DateTimeLocal(self.datetime(code)?.with_timezone(&Local))
            }
        };
        Ok(value)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use weft_reflect::info::PrimitiveCode;
    use weft_reflect::ops::PrimitiveValue;

    use super::{BinaryReader, BinaryWriter, END_MARK};
    use crate::element::{Element, ElementKind, Token};
    use crate::format::{FormatReader, FormatWriter};

    #[test]
    fn end_mark_is_not_an_element() {
        assert_eq!(END_MARK, 0x15);
        let mut writer = BinaryWriter::new();
        writer.enter_element(Element::Null);
        writer.enter_element(Element::Default { ty: Some(3) });
        assert_eq!(writer.finish(), [0x05, 0x16, 0x03]);
    }

    #[test]
    fn elements_and_values_read_back() {
        let mut writer = BinaryWriter::new();
        writer.start_tree();
        let branch = Element::SubBranch {
            ty: Some(300),
            count: Some(2),
        };
        assert!(!writer.enter_element(branch));
        assert!(writer.enter_element(Element::Primitive { ty: None }));
        writer.write_primitive(&PrimitiveValue::I16(i16::MIN));
        writer.exit_element(ElementKind::SubBranch);
        writer.insert_data_end_mark();
        let bytes = writer.finish();

        let mut reader = BinaryReader::new(&bytes);
        reader.start_tree().unwrap();
        assert_eq!(reader.next_token().unwrap(), Token::Open(branch));
        assert_eq!(
            reader.next_token().unwrap(),
            Token::Open(Element::Primitive { ty: None })
        );
        assert_eq!(
            reader.read_primitive(PrimitiveCode::I16).unwrap(),
            PrimitiveValue::I16(i16::MIN)
        );
        assert_eq!(
            reader.next_token().unwrap(),
            Token::Close(ElementKind::SubBranch)
        );
        assert_eq!(reader.next_token().unwrap(), Token::End);
    }

    #[test]
    fn rejects_other_versions() {
        let bytes = [5, b'0', b'2', b'.', b'0', b'0'];
        assert!(BinaryReader::new(&bytes).start_tree().is_err());
    }
}
