//! Well-formed XML reader producing a lightweight element tree.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// An XML element with the text that precedes its first child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written in the document
    pub name: String,

    /// Attributes in document order, values unescaped
    pub attrs: Vec<(String, String)>,

    /// Text content before the first child element
    pub text: String,

    /// Child elements
    pub children: Vec<Element>,
}

impl Element {
    /// Value of the named attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First direct child with the given tag name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    fn push_text(&mut self, text: &str) {
        // Text after the first child belongs to that child's tail, which is never read.
        if self.children.is_empty() {
            self.text.push_str(text);
        }
    }
}

/// Errors raised when a document is not well-formed XML.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("XML syntax error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Invalid value for attribute {name}: {message}")]
    AttributeValue { name: String, message: String },

    #[error("Encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    #[error("Undefined entity reference &{0};")]
    UnknownEntity(String),

    #[error("Closing tag without matching opening tag")]
    UnexpectedEnd,

    #[error("Element <{0}> is never closed")]
    Unclosed(String),

    #[error("Content outside the root element")]
    OutsideRoot,

    #[error("Document has no root element")]
    NoRoot,
}

/// Parse a complete XML document into its root element.
pub fn read_document(source: &[u8]) -> Result<Element, ParseError> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                if root.is_some() {
                    return Err(ParseError::OutsideRoot);
                }
                open.push(start_element(&reader, &e)?);
            }
            Event::Empty(e) => {
                let element = start_element(&reader, &e)?;
                close_element(&mut open, &mut root, element)?;
            }
            Event::End(_) => {
                let element = open.pop().ok_or(ParseError::UnexpectedEnd)?;
                close_element(&mut open, &mut root, element)?;
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?;
                match open.last_mut() {
                    Some(current) => current.push_text(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(ParseError::OutsideRoot),
                }
            }
            Event::CData(e) => {
                let text = reader.decoder().decode(&e)?;
                let current = open.last_mut().ok_or(ParseError::OutsideRoot)?;
                current.push_text(&text);
            }
            Event::GeneralRef(e) => {
                let name = reader.decoder().decode(&e)?;
                let resolved =
                    resolve_entity(&name).ok_or_else(|| ParseError::UnknownEntity(name.to_string()))?;
                let current = open.last_mut().ok_or(ParseError::OutsideRoot)?;
                current.push_text(resolved.encode_utf8(&mut [0; 4]));
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
        buf.clear();
    }

    if let Some(unclosed) = open.pop() {
        return Err(ParseError::Unclosed(unclosed.name));
    }

    root.ok_or(ParseError::NoRoot)
}

fn start_element<R>(reader: &Reader<R>, e: &BytesStart) -> Result<Element, ParseError> {
    let name = reader.decoder().decode(e.name().as_ref())?.into_owned();

    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = reader.decoder().decode(attr.key.as_ref())?.into_owned();
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|err| ParseError::AttributeValue {
                name: key.clone(),
                message: err.to_string(),
            })?
            .into_owned();
        attrs.push((key, value));
    }

    Ok(Element {
        name,
        attrs,
        ..Default::default()
    })
}

fn close_element(
    open: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ParseError> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(ParseError::OutsideRoot);
    }
    *root = Some(element);
    Ok(())
}

/// Resolve a predefined entity or numeric character reference.
fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => {
            let reference = name.strip_prefix('#')?;
            let code = match reference.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => reference.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_nested_tree() {
        let root = read_document(
            br#"<?xml version="1.0"?>
<!DOCTYPE xbel>
<xbel version="1.0">
  <title>Root</title>
  <folder><title>Sub</title><bookmark href="https://a.example"/></folder>
</xbel>"#,
        )
        .unwrap();

        assert_eq!(root.name, "xbel");
        assert_eq!(root.attr("version"), Some("1.0"));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.child("title").unwrap().text, "Root");

        let folder = root.child("folder").unwrap();
        assert_eq!(folder.child("title").unwrap().text, "Sub");
        assert_eq!(
            folder.child("bookmark").unwrap().attr("href"),
            Some("https://a.example")
        );
    }

    #[test]
    fn resolves_entities_in_text_and_attributes() {
        let root = read_document(
            br#"<a href="x?a=1&amp;b=&lt;2&gt;">Fish &amp; Chips &#169; &#x263A;</a>"#,
        )
        .unwrap();

        assert_eq!(root.attr("href"), Some("x?a=1&b=<2>"));
        assert_eq!(root.text, "Fish & Chips \u{a9} \u{263a}");
    }

    #[test]
    fn keeps_cdata_as_text() {
        let root = read_document(b"<t><![CDATA[<b>raw</b>]]></t>").unwrap();
        assert_eq!(root.text, "<b>raw</b>");
    }

    #[test]
    fn text_is_only_what_precedes_first_child() {
        let root = read_document(b"<t>head<i>x</i>tail</t>").unwrap();
        assert_eq!(root.text, "head");
    }

    #[test]
    fn decodes_declared_latin1_encoding() {
        let root = read_document(
            b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<xbel><title>Caf\xe9</title><bookmark href=\"https://caf\xe9.example\" title=\"na\xefve\"/></xbel>",
        )
        .unwrap();

        assert_eq!(root.child("title").unwrap().text, "Caf\u{e9}");
        let bookmark = root.child("bookmark").unwrap();
        assert_eq!(bookmark.attr("href"), Some("https://caf\u{e9}.example"));
        assert_eq!(bookmark.attr("title"), Some("na\u{ef}ve"));
    }

    #[test]
    fn defaults_to_utf8_without_declared_encoding() {
        let root = read_document("<t>Caf\u{e9}</t>".as_bytes()).unwrap();
        assert_eq!(root.text, "Caf\u{e9}");
    }

    #[test]
    fn rejects_mismatched_tags() {
        assert!(read_document(b"<a><b></a></b>").is_err());
    }

    #[test]
    fn rejects_unclosed_elements() {
        assert!(read_document(b"<a><b>text").is_err());
    }

    #[test]
    fn rejects_empty_document() {
        assert!(matches!(read_document(b"  \n"), Err(ParseError::NoRoot)));
    }

    #[test]
    fn rejects_second_root() {
        assert!(read_document(b"<a/><b/>").is_err());
    }

    #[test]
    fn rejects_text_outside_root() {
        assert!(read_document(b"<a/>junk").is_err());
    }

    #[test]
    fn rejects_undefined_entities() {
        assert!(matches!(
            read_document(b"<a>&nbsp;</a>"),
            Err(ParseError::UnknownEntity(name)) if name == "nbsp"
        ));
    }

    #[test]
    fn rejects_duplicate_attributes() {
        assert!(read_document(br#"<a x="1" x="2"/>"#).is_err());
    }
}
