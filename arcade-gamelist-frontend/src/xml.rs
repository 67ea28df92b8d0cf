//! A minimal owned XML element tree.
//!
//! Existing gamelists are read into this tree so entries can be carried over
//! untouched, and new entries are built as trees too. [`render_document`] is
//! the only place that turns a tree back into text.

use std::io::BufRead;

use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::FrontendError;

const INDENT: &str = "  ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// First direct child named `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text of the first direct child named `name`. A child without text
    /// yields `Some("")`.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(|c| c.text.as_deref().unwrap_or_default())
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(child);
    }
}

/// Parse a whole document and return its root element.
///
/// Text is kept exactly as written, except whitespace-only text in an element
/// that has child elements, which is indentation.
pub fn parse_document<R: BufRead>(reader: R) -> Result<XmlElement, FrontendError> {
    let mut xml = Reader::from_reader(reader);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => stack.push(element_from_start(e)?),
            Event::Empty(ref e) => {
                let element = element_from_start(e)?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(ref e) => {
                if let Some(top) = stack.last_mut() {
                    let text = e.unescape()?;
                    if !(is_blank(&text) && !top.children.is_empty()) {
                        top.text.get_or_insert_with(String::new).push_str(&text);
                    }
                }
            }
            Event::CData(ref e) => {
                if let Some(top) = stack.last_mut() {
                    top.text
                        .get_or_insert_with(String::new)
                        .push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(FrontendError::invalid_gamelist("unexpected end of document"));
    }
    root.ok_or_else(|| FrontendError::invalid_gamelist("document has no root element"))
}

fn element_from_start(e: &BytesStart<'_>) -> Result<XmlElement, FrontendError> {
    let mut element = XmlElement::new(String::from_utf8_lossy(e.name().as_ref()));
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => {
            if parent.text.as_deref().is_some_and(is_blank) {
                parent.text = None;
            }
            parent.push(element);
        }
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

/// Render `root` as an indented document with an XML declaration.
pub fn render_document(root: &XmlElement) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?>\n");
    render_element(&mut out, root, 0);
    out
}

fn render_element(out: &mut String, element: &XmlElement, depth: usize) {
    push_indent(out, depth);
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }

    let text = element.text.as_deref().unwrap_or_default();
    if element.children.is_empty() && text.is_empty() {
        out.push_str(" />\n");
        return;
    }

    out.push('>');
    out.push_str(&partial_escape(text));
    if element.children.is_empty() {
        push_closing(out, &element.name);
        return;
    }

    out.push('\n');
    for child in &element.children {
        render_element(out, child, depth + 1);
    }
    push_indent(out, depth);
    push_closing(out, &element.name);
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn push_closing(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push_str(">\n");
}

#[cfg(test)]
#[path = "tests/xml_tests.rs"]
mod tests;
