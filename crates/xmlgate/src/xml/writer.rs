//! XML serialization

use crate::xml::model::{Content, Document, Element};

/// XML declaration emitted ahead of the root element
pub const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Output options for [`to_string`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// Emit the XML declaration
    pub declaration: bool,
    /// Indentation per nesting level; `None` writes everything on one line
    pub indent: Option<usize>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            declaration: true,
            indent: Some(2),
        }
    }
}

impl WriteOptions {
    /// Single-line output without declaration
    pub const fn compact() -> Self {
        Self {
            declaration: false,
            indent: None,
        }
    }
}

/// Serialize a document
pub fn to_string(doc: &Document, options: WriteOptions) -> String {
    let mut output = String::new();
    if options.declaration {
        output.push_str(DECLARATION);
        if options.indent.is_some() {
            output.push('\n');
        }
    }
    serialize_element(&doc.root, options.indent, 0, &mut output);
    output
}

fn serialize_element(element: &Element, indent: Option<usize>, level: usize, output: &mut String) {
    output.push('<');
    output.push_str(&element.name);

    for (key, value) in element.attributes.iter() {
        output.push(' ');
        output.push_str(key);
        output.push_str("=\"");
        output.push_str(&escape_attribute(value));
        output.push('"');
    }

    if element.children.is_empty() {
        output.push_str("/>");
        return;
    }

    output.push('>');

    let has_elements = element
        .children
        .iter()
        .any(|child| matches!(child, Content::Element(_)));

    match indent {
        Some(width) if has_elements => {
            for child in &element.children {
                match child {
                    Content::Element(child) => {
                        newline(width, level + 1, output);
                        serialize_element(child, indent, level + 1, output);
                    }
                    Content::Text(text) if text.trim().is_empty() => {}
                    Content::Text(text) => {
                        newline(width, level + 1, output);
                        output.push_str(&escape_text(text.trim()));
                    }
                }
            }
            newline(width, level, output);
        }
        _ => {
            for child in &element.children {
                match child {
                    Content::Element(child) => serialize_element(child, indent, level + 1, output),
                    Content::Text(text) => output.push_str(&escape_text(text)),
                }
            }
        }
    }

    output.push_str("</");
    output.push_str(&element.name);
    output.push('>');
}

fn newline(width: usize, level: usize, output: &mut String) {
    output.push('\n');
    output.extend(std::iter::repeat_n(' ', width * level));
}

/// Escape character data
pub fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value
pub fn escape_attribute(input: &str) -> String {
    escape_text(input)
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
