//! Wire formats.
//!
//! Every format renders the same element tree. The graph walk only talks to
//! a [`FormatWriter`] or [`FormatReader`] and never asks which one it has,
//! apart from the two capability flags
//! [`is_string_formatter`](FormatWriter::is_string_formatter) and
//! [`can_manage_multiplex_streams`](FormatWriter::can_manage_multiplex_streams).
//!
//! # Menu
//!
//! - [`Format`]: picks an adapter.
//! - [`FormatWriter`] / [`FormatReader`]: the adapter contract.
//! - [`BinaryWriter`] / [`BinaryReader`]: compact bytes with varints.
//! - [`XmlWriter`] / [`XmlReader`]: `<data>` documents.
//! - [`JsonWriter`] / [`JsonReader`]: `{"version":..,"data":[..],"end":""}`.
//! - [`Recorder`]: buffers a channel for the assembled streaming mode.

use std::collections::VecDeque;

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, Utc};
use weft_reflect::info::PrimitiveCode;
use weft_reflect::ops::PrimitiveValue;

use crate::element::{Element, ElementKind, Token};
use crate::error::FormatError;

// -----------------------------------------------------------------------------
// Modules

mod binary;
mod json;
mod varint;
mod xml;

// -----------------------------------------------------------------------------
// Exports

pub use binary::{BinaryReader, BinaryWriter};
pub use json::{JsonReader, JsonWriter};
pub use xml::{XmlReader, XmlWriter};

// -----------------------------------------------------------------------------
// Contract

/// Renders elements to one output channel.
///
/// The walk calls [`exit_element`](Self::exit_element) for every element
/// whose kind needs an end, and for every element whose
/// [`enter_element`](Self::enter_element) returned `false`.
pub trait FormatWriter {
    /// Writes the preamble and version tag.
    fn start_tree(&mut self);

    /// Opens an element. Returns whether it was closed in place.
    fn enter_element(&mut self, element: Element) -> bool;

    /// Writes the value of the primitive element just entered.
    fn write_primitive(&mut self, value: &PrimitiveValue);

    fn exit_element(&mut self, kind: ElementKind);

    fn insert_data_end_mark(&mut self);

    /// Closes the tree and hands out the bytes written so far.
    fn finish(&mut self) -> Vec<u8>;

    fn is_string_formatter(&self) -> bool;

    /// Whether a type-descriptor table can be placed ahead of a buffered
    /// instance channel.
    fn can_manage_multiplex_streams(&self) -> bool;
}

/// Parses elements from one input channel.
///
/// Elements that do not need an end never produce a [`Token::Close`].
pub trait FormatReader {
    /// Reads the preamble and rejects any other version tag.
    fn start_tree(&mut self) -> Result<(), FormatError>;

    fn next_token(&mut self) -> Result<Token, FormatError>;

    /// Reads the value of the primitive element just opened.
    fn read_primitive(&mut self, code: PrimitiveCode) -> Result<PrimitiveValue, FormatError>;
}

// -----------------------------------------------------------------------------
// Format

/// The available wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    #[default]
    Binary,
    Xml,
    Json,
}

impl Format {
    pub fn writer(self) -> Box<dyn FormatWriter> {
        match self {
            Self::Binary => Box::new(BinaryWriter::new()),
            Self::Xml => Box::new(XmlWriter::new()),
            Self::Json => Box::new(JsonWriter::new()),
        }
    }

    pub fn reader(self, bytes: &[u8]) -> Result<Box<dyn FormatReader + '_>, FormatError> {
        Ok(match self {
            Self::Binary => Box::new(BinaryReader::new(bytes)),
            Self::Xml => Box::new(XmlReader::new(utf8(bytes)?)?),
            Self::Json => Box::new(JsonReader::new(bytes)?),
        })
    }

    /// Whether a primitive element closes itself in this format.
    #[inline]
    pub const fn primitive_self_closes(self) -> bool {
        matches!(self, Self::Binary)
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, FormatError> {
    core::str::from_utf8(bytes).map_err(|err| FormatError::malformed(err.to_string()))
}

// -----------------------------------------------------------------------------
// Recorder

/// One buffered writer call.
#[derive(Debug, Clone, PartialEq)]
pub enum WireOp {
    Enter(Element),
    Primitive(PrimitiveValue),
    Exit(ElementKind),
}

/// Buffers a channel so it can be replayed after the type-descriptor table.
#[derive(Debug)]
pub struct Recorder {
    format: Format,
    ops: Vec<WireOp>,
}

impl Recorder {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            ops: Vec::new(),
        }
    }

    #[inline]
    pub fn ops(&self) -> &[WireOp] {
        &self.ops
    }

    /// Plays the buffered calls into `out`.
    pub fn replay(self, out: &mut dyn FormatWriter) {
        for op in self.ops {
            match op {
                WireOp::Enter(element) => {
                    out.enter_element(element);
                }
                WireOp::Primitive(value) => out.write_primitive(&value),
                WireOp::Exit(kind) => out.exit_element(kind),
            }
        }
    }
}

impl FormatWriter for Recorder {
    fn start_tree(&mut self) {}

    fn enter_element(&mut self, element: Element) -> bool {
        self.ops.push(WireOp::Enter(element));
        match element.kind() {
            ElementKind::Primitive => self.format.primitive_self_closes(),
            kind => !kind.needs_end(),
        }
    }

    fn write_primitive(&mut self, value: &PrimitiveValue) {
        self.ops.push(WireOp::Primitive(value.clone()));
    }

    fn exit_element(&mut self, kind: ElementKind) {
        self.ops.push(WireOp::Exit(kind));
    }

    fn insert_data_end_mark(&mut self) {}

    fn finish(&mut self) -> Vec<u8> {
        Vec::new()
    }

    fn is_string_formatter(&self) -> bool {
        !matches!(self.format, Format::Binary)
    }

    fn can_manage_multiplex_streams(&self) -> bool {
        false
    }
}

// -----------------------------------------------------------------------------
// Text primitives

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// The text form of a primitive, shared by the string formatters.
pub(crate) fn primitive_to_text(value: &PrimitiveValue) -> String {
    match value {
        PrimitiveValue::Bool(v) => v.to_string(),
        PrimitiveValue::Char(v) => v.to_string(),
        PrimitiveValue::I8(v) => v.to_string(),
        PrimitiveValue::U8(v) => v.to_string(),
        PrimitiveValue::I16(v) => v.to_string(),
        PrimitiveValue::U16(v) => v.to_string(),
        PrimitiveValue::I32(v) => v.to_string(),
        PrimitiveValue::U32(v) => v.to_string(),
        PrimitiveValue::I64(v) => v.to_string(),
        PrimitiveValue::U64(v) => v.to_string(),
        PrimitiveValue::F32(v) => format!("{v:?}"),
        PrimitiveValue::F64(v) => format!("{v:?}"),
        PrimitiveValue::I128(v) => v.to_string(),
        PrimitiveValue::U128(v) => v.to_string(),
        PrimitiveValue::Isize(v) => v.to_string(),
        PrimitiveValue::Usize(v) => v.to_string(),
        PrimitiveValue::String(v) => v.clone(),
        PrimitiveValue::NaiveDateTime(v) => v.format(NAIVE_FORMAT).to_string(),
        PrimitiveValue::DateTimeUtc(v) => v.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        PrimitiveValue::DateTimeLocal(v) => v.to_rfc3339_opts(SecondsFormat::AutoSi, false),
    }
}

/// Parses the text form of a primitive of type `code`.
pub(crate) fn primitive_from_text(
    code: PrimitiveCode,
    text: &str,
) -> Result<PrimitiveValue, FormatError> {
    fn parse<T: core::str::FromStr>(
        code: PrimitiveCode,
        text: &str,
        f: fn(T) -> PrimitiveValue,
    ) -> Result<PrimitiveValue, FormatError> {
        text.parse::<T>().map(f).map_err(|_| invalid(code, text))
    }

    match code {
        PrimitiveCode::Bool => parse(code, text, PrimitiveValue::Bool),
        PrimitiveCode::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(PrimitiveValue::Char(c)),
                _ => Err(invalid(code, text)),
            }
        }
        PrimitiveCode::I8 => parse(code, text, PrimitiveValue::I8),
        PrimitiveCode::U8 => parse(code, text, PrimitiveValue::U8),
        PrimitiveCode::I16 => parse(code, text, PrimitiveValue::I16),
        PrimitiveCode::U16 => parse(code, text, PrimitiveValue::U16),
        PrimitiveCode::I32 => parse(code, text, PrimitiveValue::I32),
        PrimitiveCode::U32 => parse(code, text, PrimitiveValue::U32),
        PrimitiveCode::I64 => parse(code, text, PrimitiveValue::I64),
        PrimitiveCode::U64 => parse(code, text, PrimitiveValue::U64),
        PrimitiveCode::F32 => parse(code, text, PrimitiveValue::F32),
        PrimitiveCode::F64 => parse(code, text, PrimitiveValue::F64),
        PrimitiveCode::I128 => parse(code, text, PrimitiveValue::I128),
        PrimitiveCode::U128 => parse(code, text, PrimitiveValue::U128),
        PrimitiveCode::Isize => parse(code, text, PrimitiveValue::Isize),
        PrimitiveCode::Usize => parse(code, text, PrimitiveValue::Usize),
        PrimitiveCode::String => Ok(PrimitiveValue::String(text.to_owned())),
        PrimitiveCode::NaiveDateTime => NaiveDateTime::parse_from_str(text, NAIVE_FORMAT)
            .map(PrimitiveValue::NaiveDateTime)
            .map_err(|_| invalid(code, text)),
        PrimitiveCode::DateTimeUtc => DateTime::parse_from_rfc3339(text)
            .map(|v| PrimitiveValue::DateTimeUtc(v.with_timezone(&Utc)))
            .map_err(|_| invalid(code, text)),
        PrimitiveCode::DateTimeLocal => DateTime::parse_from_rfc3339(text)
            .map(|v| PrimitiveValue::DateTimeLocal(v.with_timezone(&Local)))
            .map_err(|_| invalid(code, text)),
    }
}

#[cold]
fn invalid(code: PrimitiveCode, text: &str) -> FormatError {
    FormatError::InvalidPrimitive {
        code,
        text: text.to_owned(),
    }
}

// -----------------------------------------------------------------------------
// TokenQueue

/// A pre-parsed text document, flattened into reader steps.
#[derive(Debug, Default)]
pub(crate) struct TokenQueue {
    version: Option<String>,
    items: VecDeque<Queued>,
}

#[derive(Debug)]
enum Queued {
    Token(Token),
    Text(String),
}

impl TokenQueue {
    pub fn set_version(&mut self, version: String) {
        self.version = Some(version);
    }

    pub fn push_token(&mut self, token: Token) {
        self.items.push_back(Queued::Token(token));
    }

    pub fn push_text(&mut self, text: String) {
        self.items.push_back(Queued::Text(text));
    }

    pub fn check_version(&self, expected: &str) -> Result<(), FormatError> {
        match self.version.as_deref() {
            Some(version) if version == expected => Ok(()),
            found => Err(FormatError::Version {
                found: found.unwrap_or_default().to_owned(),
            }),
        }
    }

    pub fn next_token(&mut self) -> Result<Token, FormatError> {
        match self.items.pop_front() {
            Some(Queued::Token(token)) => Ok(token),
            Some(Queued::Text(text)) => Err(FormatError::UnexpectedElement {
                expected: "an element",
                found: format!("text `{text}`"),
            }),
            None => Err(FormatError::UnexpectedEnd),
        }
    }

    pub fn read_primitive(&mut self, code: PrimitiveCode) -> Result<PrimitiveValue, FormatError> {
        match self.items.pop_front() {
            Some(Queued::Text(text)) => primitive_from_text(code, &text),
            Some(Queued::Token(token)) => Err(FormatError::UnexpectedElement {
                expected: "a primitive value",
                found: token.to_string(),
            }),
            None => Err(FormatError::UnexpectedEnd),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use weft_reflect::info::PrimitiveCode;
    use weft_reflect::ops::PrimitiveValue;

    use super::{primitive_from_text, primitive_to_text};

    fn round_trip(value: PrimitiveValue) {
        let text = primitive_to_text(&value);
        let back = primitive_from_text(value.code(), &text).unwrap();
        match (&value, &back) {
            (PrimitiveValue::F32(a), PrimitiveValue::F32(b)) => assert_eq!(a.to_bits(), b.to_bits()),
            (PrimitiveValue::F64(a), PrimitiveValue::F64(b)) => assert_eq!(a.to_bits(), b.to_bits()),
            _ => assert_eq!(value, back, "{text}"),
        }
    }

    #[test]
    fn text_forms_round_trip() {
        round_trip(PrimitiveValue::I128(i128::MIN));
        round_trip(PrimitiveValue::U128(u128::MAX));
        round_trip(PrimitiveValue::F32(f32::MIN_POSITIVE));
        round_trip(PrimitiveValue::F64(f64::INFINITY));
        round_trip(PrimitiveValue::F64(-0.0));
        round_trip(PrimitiveValue::Char('\u{1F600}'));
        round_trip(PrimitiveValue::String(" padded ".to_owned()));

        let naive = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_nano_opt(23, 59, 58, 123_456_789)
            .unwrap();
        round_trip(PrimitiveValue::NaiveDateTime(naive));
        round_trip(PrimitiveValue::DateTimeUtc(Utc.from_utc_datetime(&naive)));
    }

    #[test]
    fn nan_keeps_its_text() {
        assert_eq!(primitive_to_text(&PrimitiveValue::F64(f64::NAN)), "NaN");
        let PrimitiveValue::F64(v) = primitive_from_text(PrimitiveCode::F64, "NaN").unwrap() else {
            unreachable!()
        };
        assert!(v.is_nan());
    }

    #[test]
    fn rejects_bad_text() {
        assert!(primitive_from_text(PrimitiveCode::U8, "256").is_err());
        assert!(primitive_from_text(PrimitiveCode::Char, "ab").is_err());
        assert!(primitive_from_text(PrimitiveCode::Bool, "yes").is_err());
    }
}
