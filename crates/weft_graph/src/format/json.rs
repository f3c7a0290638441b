use core::fmt::Write as _;

use serde::Deserialize;
use serde_json::{Map, Value};
use weft_reflect::info::PrimitiveCode;
use weft_reflect::ops::PrimitiveValue;

use super::{FormatReader, FormatWriter, TokenQueue, primitive_to_text};
use crate::element::{Element, ElementKind, Token};
use crate::error::FormatError;

const VERSION: &str = "3.0";

// -----------------------------------------------------------------------------
// JsonWriter

/// Writes `{"version": "3.0","data":[...],"end":""}`.
///
/// Each element is an object: `k` holds the kind code, `t`/`i`/`n` the
/// optional attributes, `v` the text of a primitive and `c` the children.
#[derive(Debug, Default)]
pub struct JsonWriter {
    out: String,
    // One entry per open array, `true` once it holds an item.
    commas: Vec<bool>,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn separate(&mut self) {
        if let Some(has_items) = self.commas.last_mut() {
            if *has_items {
                self.out.push(',');
            }
            *has_items = true;
        }
    }

    fn open_array(&mut self) {
        self.out.push('[');
        self.commas.push(false);
    }

    fn close_array(&mut self) {
        self.out.push(']');
        self.commas.pop();
    }
}

impl FormatWriter for JsonWriter {
    fn start_tree(&mut self) {
        let _ = write!(self.out, "{{\"version\": \"{VERSION}\",\"data\":");
        self.open_array();
    }

    fn enter_element(&mut self, element: Element) -> bool {
        self.separate();
        let kind = element.kind();
        let _ = write!(self.out, "{{\"k\":{}", kind.code());
        for (name, attr) in [
            ("t", element.ty()),
            ("i", element.instance()),
            ("n", element.count()),
        ] {
            if let Some(value) = attr {
                let _ = write!(self.out, ",\"{name}\":{value}");
            }
        }
        if kind.needs_end() {
            self.out.push_str(",\"c\":");
            self.open_array();
            false
        } else if kind == ElementKind::Primitive {
            false
        } else {
            self.out.push('}');
            true
        }
    }

    fn write_primitive(&mut self, value: &PrimitiveValue) {
        let text = Value::String(primitive_to_text(value));
        let _ = write!(self.out, ",\"v\":{text}");
    }

    fn exit_element(&mut self, kind: ElementKind) {
        if kind.needs_end() {
            self.close_array();
        }
        self.out.push('}');
    }

    fn insert_data_end_mark(&mut self) {
        self.close_array();
        self.out.push_str(",\"end\":\"\"");
    }

    fn finish(&mut self) -> Vec<u8> {
        self.out.push('}');
        self.commas.clear();
        core::mem::take(&mut self.out).into_bytes()
    }

    fn is_string_formatter(&self) -> bool {
        true
    }

    fn can_manage_multiplex_streams(&self) -> bool {
        false
    }
}

// -----------------------------------------------------------------------------
// JsonReader

/// Reads documents written by [`JsonWriter`].
#[derive(Debug)]
pub struct JsonReader {
    queue: TokenQueue,
}

impl JsonReader {
    pub fn new(bytes: &[u8]) -> Result<Self, FormatError> {
        // Every element nests an object and a child array, so deep graphs
        // outgrow the default limit of 128.
        let mut deserializer = serde_json::Deserializer::from_slice(bytes);
        deserializer.disable_recursion_limit();
        let document = Value::deserialize(&mut deserializer)?;
        deserializer.end()?;
        let Value::Object(root) = document else {
            return Err(FormatError::malformed("the document is not an object"));
        };

        let mut queue = TokenQueue::default();
        if let Some(version) = root.get("version").and_then(Value::as_str) {
            queue.set_version(version.to_owned());
        }
        if let Some(data) = root.get("data") {
            for element in elements(data)? {
                flatten(element, &mut queue)?;
            }
        }
        if root.contains_key("end") {
            queue.push_token(Token::End);
        }
        Ok(Self { queue })
    }
}

fn elements(value: &Value) -> Result<&[Value], FormatError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| FormatError::malformed("expected an array of elements"))
}

fn attribute(object: &Map<String, Value>, name: &str) -> Result<Option<u32>, FormatError> {
    object
        .get(name)
        .map(|value| {
            value
                .as_u64()
                .and_then(|value| u32::try_from(value).ok())
                .ok_or_else(|| FormatError::malformed(format!("attribute `{name}`: {value}")))
        })
        .transpose()
}

fn flatten(value: &Value, queue: &mut TokenQueue) -> Result<(), FormatError> {
    let Value::Object(object) = value else {
        return Err(FormatError::malformed(format!("expected an element, found {value}")));
    };
    let kind = object
        .get("k")
        .and_then(Value::as_u64)
        .and_then(|code| u8::try_from(code).ok())
        .and_then(ElementKind::from_code)
        .ok_or_else(|| FormatError::malformed(format!("element without a valid kind: {value}")))?;
    let element = Element::from_parts(
        kind,
        attribute(object, "t")?,
        attribute(object, "i")?,
        attribute(object, "n")?,
    )
    .ok_or_else(|| FormatError::malformed(format!("`{kind}` element lacks an attribute")))?;

    queue.push_token(Token::Open(element));
    if kind == ElementKind::Primitive {
        let text = object
            .get("v")
            .and_then(Value::as_str)
            .ok_or_else(|| FormatError::malformed("primitive element without a value"))?;
        queue.push_text(text.to_owned());
    } else if kind.needs_end() {
        if let Some(children) = object.get("c") {
            for child in elements(children)? {
                flatten(child, queue)?;
            }
        }
        queue.push_token(Token::Close(kind));
    }
    Ok(())
}

impl FormatReader for JsonReader {
    fn start_tree(&mut self) -> Result<(), FormatError> {
        self.queue.check_version(VERSION)
    }

    fn next_token(&mut self) -> Result<Token, FormatError> {
        self.queue.next_token()
    }

    fn read_primitive(&mut self, code: PrimitiveCode) -> Result<PrimitiveValue, FormatError> {
        self.queue.read_primitive(code)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use weft_reflect::info::PrimitiveCode;
    use weft_reflect::ops::PrimitiveValue;

    use super::{JsonReader, JsonWriter};
    use crate::element::{Element, ElementKind, Token};
    use crate::format::{FormatReader, FormatWriter};

    #[test]
    fn writes_the_documented_layout() {
        let mut writer = JsonWriter::new();
        writer.start_tree();
        writer.enter_element(Element::SubBranch {
            ty: None,
            count: Some(2),
        });
        writer.enter_element(Element::Collection);
        writer.enter_element(Element::Primitive { ty: Some(9) });
        writer.write_primitive(&PrimitiveValue::I32(-4));
        writer.exit_element(ElementKind::Primitive);
        writer.enter_element(Element::Null);
        writer.exit_element(ElementKind::Collection);
        writer.exit_element(ElementKind::SubBranch);
        writer.insert_data_end_mark();
        let text = String::from_utf8(writer.finish()).unwrap();
        assert_eq!(
            text,
            r#"{"version": "3.0","data":[{"k":7,"n":2,"c":[{"k":8,"c":[{"k":3,"t":9,"v":"-4"},{"k":5}]}]}],"end":""}"#
        );

        let mut reader = JsonReader::new(text.as_bytes()).unwrap();
        reader.start_tree().unwrap();
        let tokens = [
            Token::Open(Element::SubBranch {
                ty: None,
                count: Some(2),
            }),
            Token::Open(Element::Collection),
            Token::Open(Element::Primitive { ty: Some(9) }),
        ];
        for token in tokens {
            assert_eq!(reader.next_token().unwrap(), token);
        }
        assert_eq!(
            reader.read_primitive(PrimitiveCode::I32).unwrap(),
            PrimitiveValue::I32(-4)
        );
        assert_eq!(reader.next_token().unwrap(), Token::Open(Element::Null));
        assert_eq!(reader.next_token().unwrap(), Token::Close(ElementKind::Collection));
        assert_eq!(reader.next_token().unwrap(), Token::Close(ElementKind::SubBranch));
        assert_eq!(reader.next_token().unwrap(), Token::End);
    }

    #[test]
    fn missing_end_is_reported_as_end_of_stream() {
        let text = r#"{"version": "3.0","data":[]}"#;
        let mut reader = JsonReader::new(text.as_bytes()).unwrap();
        reader.start_tree().unwrap();
        assert!(reader.next_token().is_err());
    }
}
