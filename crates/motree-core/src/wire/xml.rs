//! Format B: tag-attribute XML
//!
//! Each object is an element named after its class with one XML attribute
//! per object attribute (sorted), children nested in order, and childless
//! objects self-closed. Written with `quick-xml`, read with `roxmltree`.

use std::borrow::Cow;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Writer;

use super::{Mo, ENVELOPE};
use crate::errors::{MoError, Result};

const FORMAT: &str = "xml";

fn encode_error(err: impl std::fmt::Display) -> MoError {
    MoError::Encode {
        format: FORMAT,
        message: err.to_string(),
    }
}

/// Encode an object tree with two-space indentation
///
/// # Errors
///
/// `Encode` if the writer fails or an attribute value holds a character
/// XML 1.0 cannot carry.
pub fn encode(mo: &Mo) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_mo(&mut writer, mo)?;
    String::from_utf8(writer.into_inner()).map_err(encode_error)
}

fn write_mo(writer: &mut Writer<Vec<u8>>, mo: &Mo) -> Result<()> {
    let mut start = BytesStart::new(mo.class_name.as_str());
    for (name, value) in &mo.attributes {
        let escaped = escape_attribute(value).ok_or_else(|| {
            encode_error(format!(
                "attribute '{}' of {} holds a character not allowed in XML",
                name, mo.class_name
            ))
        })?;
        start.push_attribute(Attribute {
            key: QName(name.as_bytes()),
            value: Cow::Owned(escaped.into_bytes()),
        });
    }

    if mo.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(encode_error);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(encode_error)?;
    for child in &mo.children {
        write_mo(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(mo.class_name.as_str())))
        .map_err(encode_error)
}

/// Escape an attribute value so a conforming reader returns it unchanged
///
/// Tab, newline and carriage return become character references, since
/// attribute value normalization would otherwise turn them into spaces.
/// `None` for characters outside the XML 1.0 `Char` production.
fn escape_attribute(value: &str) -> Option<String> {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\u{FFFE}' | '\u{FFFF}' => return None,
            c if c < ' ' => return None,
            c => out.push(c),
        }
    }
    Some(out)
}

/// Decode one object tree from its root element
///
/// # Errors
///
/// `Decode` for malformed XML.
pub fn decode(text: &str) -> Result<Mo> {
    let document = roxmltree::Document::parse(text)?;
    Ok(element_to_mo(document.root_element()))
}

/// Decode `<imdata totalCount="N">...</imdata>` into its objects
///
/// # Errors
///
/// `Decode` for malformed XML or a root element other than `imdata`.
pub fn decode_envelope(text: &str) -> Result<Vec<Mo>> {
    let document = roxmltree::Document::parse(text)?;
    let root = document.root_element();
    if root.tag_name().name() != ENVELOPE {
        return Err(MoError::decode(
            FORMAT,
            format!("expected <{}>, found <{}>", ENVELOPE, root.tag_name().name()),
        ));
    }
    Ok(root
        .children()
        .filter(|n| n.is_element())
        .map(element_to_mo)
        .collect())
}

fn element_to_mo(element: roxmltree::Node<'_, '_>) -> Mo {
    let mut mo = Mo::new(element.tag_name().name());
    for attribute in element.attributes() {
        mo.attributes
            .insert(attribute.name().to_string(), attribute.value().to_string());
    }
    mo.children = element
        .children()
        .filter(|n| n.is_element())
        .map(element_to_mo)
        .collect();
    mo
}
