use core::fmt::Write as _;

use weft_reflect::info::PrimitiveCode;
use weft_reflect::ops::PrimitiveValue;

use super::{FormatReader, FormatWriter, TokenQueue, primitive_to_text};
use crate::element::{Element, ElementKind, Token};
use crate::error::FormatError;

const VERSION: &str = "3.0";
const ROOT: &str = "data";
const VERSION_TAG: &str = "version";
const END_TAG: &str = "end";

// -----------------------------------------------------------------------------
// XmlWriter

/// Writes `<data>` documents.
///
/// Element attributes are `t` (type), `i` (instance) and `n` (count). A
/// primitive element holds its value as text.
#[derive(Debug, Default)]
pub struct XmlWriter {
    out: String,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn escape(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '&' => self.out.push_str("&amp;"),
                '<' => self.out.push_str("&lt;"),
                '>' => self.out.push_str("&gt;"),
                '"' => self.out.push_str("&quot;"),
                '\'' => self.out.push_str("&apos;"),
                '\r' | '\t' => {
                    let _ = write!(self.out, "&#x{:X};", u32::from(c));
                }
                c => self.out.push(c),
            }
        }
    }
}

impl FormatWriter for XmlWriter {
    fn start_tree(&mut self) {
        self.out.push_str("<?xml version=\"1.0\"?><");
        self.out.push_str(ROOT);
        self.out.push_str("><version>");
        self.out.push_str(VERSION);
        self.out.push_str("</version>");
    }

    fn enter_element(&mut self, element: Element) -> bool {
        let kind = element.kind();
        self.out.push('<');
        self.out.push_str(kind.tag());
        for (name, attr) in [
            ("t", element.ty()),
            ("i", element.instance()),
            ("n", element.count()),
        ] {
            if let Some(value) = attr {
                let _ = write!(self.out, " {name}=\"{value}\"");
            }
        }
        let self_closing = !kind.needs_end() && kind != ElementKind::Primitive;
        self.out.push_str(if self_closing { "/>" } else { ">" });
        self_closing
    }

    fn write_primitive(&mut self, value: &PrimitiveValue) {
        let text = primitive_to_text(value);
        self.escape(&text);
    }

    fn exit_element(&mut self, kind: ElementKind) {
        self.out.push_str("</");
        self.out.push_str(kind.tag());
        self.out.push('>');
    }

    fn insert_data_end_mark(&mut self) {
        self.out.push('<');
        self.out.push_str(END_TAG);
        self.out.push_str("/>");
    }

    fn finish(&mut self) -> Vec<u8> {
        self.out.push_str("</");
        self.out.push_str(ROOT);
        self.out.push('>');
        core::mem::take(&mut self.out).into_bytes()
    }

    fn is_string_formatter(&self) -> bool {
        true
    }

    fn can_manage_multiplex_streams(&self) -> bool {
        true
    }
}

// -----------------------------------------------------------------------------
// XmlReader

/// Reads documents written by [`XmlWriter`].
///
/// The document is parsed with `roxmltree` up front and flattened into
/// reader steps.
#[derive(Debug)]
pub struct XmlReader {
    queue: TokenQueue,
}

impl XmlReader {
    pub fn new(text: &str) -> Result<Self, FormatError> {
        let document = roxmltree::Document::parse(text)?;
        let root = document.root_element();
        if root.tag_name().name() != ROOT {
            return Err(FormatError::UnexpectedElement {
                expected: "<data>",
                found: format!("<{}>", root.tag_name().name()),
            });
        }

        let mut queue = TokenQueue::default();
        for node in root.children().filter(|node| node.is_element()) {
            match node.tag_name().name() {
                VERSION_TAG => queue.set_version(text_of(node)),
                END_TAG => queue.push_token(Token::End),
                _ => flatten(node, &mut queue)?,
            }
        }
        Ok(Self { queue })
    }
}

fn text_of(node: roxmltree::Node<'_, '_>) -> String {
    node.children()
        .filter_map(|child| child.text())
        .collect()
}

fn attribute(node: roxmltree::Node<'_, '_>, name: &str) -> Result<Option<u32>, FormatError> {
    node.attribute(name)
        .map(|value| {
            value
                .parse::<u32>()
                .map_err(|_| FormatError::malformed(format!("attribute `{name}=\"{value}\"`")))
        })
        .transpose()
}

fn flatten(node: roxmltree::Node<'_, '_>, queue: &mut TokenQueue) -> Result<(), FormatError> {
    let name = node.tag_name().name();
    let Some(kind) = ElementKind::from_tag(name) else {
        return Err(FormatError::UnexpectedElement {
            expected: "an element tag",
            found: format!("<{name}>"),
        });
    };
    let element = Element::from_parts(
        kind,
        attribute(node, "t")?,
        attribute(node, "i")?,
        attribute(node, "n")?,
    )
    .ok_or_else(|| FormatError::malformed(format!("<{name}> lacks an attribute")))?;

    queue.push_token(Token::Open(element));
    if kind == ElementKind::Primitive {
        queue.push_text(text_of(node));
    } else if kind.needs_end() {
        for child in node.children().filter(|child| child.is_element()) {
            flatten(child, queue)?;
        }
        queue.push_token(Token::Close(kind));
    }
    Ok(())
}

impl FormatReader for XmlReader {
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

    use super::{XmlReader, XmlWriter};
    use crate::element::{Element, ElementKind, Token};
    use crate::format::{FormatReader, FormatWriter};

    #[test]
    fn writes_the_documented_layout() {
        let mut writer = XmlWriter::new();
        writer.start_tree();
        writer.enter_element(Element::SubBranch {
            ty: Some(29),
            count: None,
        });
        assert!(!writer.enter_element(Element::Primitive { ty: None }));
        writer.write_primitive(&PrimitiveValue::String("a<b".into()));
        writer.exit_element(ElementKind::Primitive);
        assert!(writer.enter_element(Element::Reference {
            ty: None,
            instance: 0
        }));
        writer.exit_element(ElementKind::SubBranch);
        writer.insert_data_end_mark();
        let text = String::from_utf8(writer.finish()).unwrap();
        assert_eq!(
            text,
            "<?xml version=\"1.0\"?><data><version>3.0</version>\
             <b t=\"29\"><p>a&lt;b</p><r i=\"0\"/></b><end/></data>"
        );

        let mut reader = XmlReader::new(&text).unwrap();
        reader.start_tree().unwrap();
        assert!(matches!(reader.next_token().unwrap(), Token::Open(Element::SubBranch { .. })));
        assert!(matches!(reader.next_token().unwrap(), Token::Open(Element::Primitive { .. })));
        assert_eq!(
            reader.read_primitive(PrimitiveCode::String).unwrap(),
            PrimitiveValue::String("a<b".into())
        );
        assert!(matches!(reader.next_token().unwrap(), Token::Open(Element::Reference { .. })));
        assert_eq!(reader.next_token().unwrap(), Token::Close(ElementKind::SubBranch));
        assert_eq!(reader.next_token().unwrap(), Token::End);
    }

    #[test]
    fn empty_primitive_text_is_an_empty_string() {
        let text = "<?xml version=\"1.0\"?><data><version>3.0</version><p></p><end/></data>";
        let mut reader = XmlReader::new(text).unwrap();
        reader.start_tree().unwrap();
        reader.next_token().unwrap();
        assert_eq!(
            reader.read_primitive(PrimitiveCode::String).unwrap(),
            PrimitiveValue::String(String::new())
        );
    }

    #[test]
    fn rejects_other_versions() {
        let text = "<data><version>2.0</version></data>";
        assert!(XmlReader::new(text).unwrap().start_tree().is_err());
    }
}
