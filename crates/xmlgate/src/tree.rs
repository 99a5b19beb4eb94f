//! Occurrence tree built from a parsed XML document
//!
//! Every child element is stored as a sequence of occurrences, even when the
//! schema expects exactly one. An element without attributes or child
//! elements collapses to its text (the empty string for an empty tag); any
//! other element becomes a [`Node`].
//!
//! ```
//! use xmlgate::tree::parse_tree;
//! # fn main() -> Result<(), xmlgate::Error> {
//! let tree = parse_tree("<request><control><senderid>acme</senderid></control></request>")?;
//! let sender = tree
//!     .get("request")
//!     .and_then(|request| request.first("control"))
//!     .and_then(|control| control.first("senderid"))
//!     .and_then(|sender| sender.as_text());
//! assert_eq!(sender, Some("acme"));
//! # Ok(())
//! # }
//! ```

use indexmap::IndexMap;

use crate::error::Result;
use crate::xml::model::{Content, Document, Element};
use crate::xml::parser::{Config, Parser};

/// Options controlling how a document is folded into a [`Tree`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeOptions {
    /// Lower-case element names
    pub normalize_tags: bool,
    /// Trim leading and trailing whitespace from text
    pub trim: bool,
    /// Collapse runs of two or more whitespace characters into one space
    pub normalize: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            normalize_tags: true,
            trim: true,
            normalize: true,
        }
    }
}

impl TreeOptions {
    /// Keep names and text exactly as written
    pub const fn verbatim() -> Self {
        Self {
            normalize_tags: false,
            trim: false,
            normalize: false,
        }
    }
}

/// Parsed request tree: the root element name mapped to its single occurrence
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Tree {
    entries: IndexMap<String, Occurrence>,
}

/// One occurrence of an element
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Occurrence {
    /// Element with neither attributes nor child elements
    Text(String),
    /// Element with attributes or child elements
    Node(Node),
}

/// Element with attributes and/or children
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Node {
    #[cfg_attr(
        feature = "serde",
        serde(rename = "$", skip_serializing_if = "IndexMap::is_empty")
    )]
    pub attributes: IndexMap<String, String>,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "_", skip_serializing_if = "Option::is_none")
    )]
    pub text: Option<String>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub children: IndexMap<String, Vec<Occurrence>>,
}

impl Tree {
    /// Tree for a request without an XML body
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fold a parsed document into a tree
    pub fn from_document(doc: &Document, options: &TreeOptions) -> Self {
        let mut entries = IndexMap::new();
        entries.insert(
            element_name(&doc.root, options),
            occurrence(&doc.root, options),
        );
        Self { entries }
    }

    /// Occurrence of the root element, if the root carries this name
    pub fn get(&self, name: &str) -> Option<&Occurrence> {
        self.entries.get(name)
    }

    /// Name of the root element
    pub fn root_name(&self) -> Option<&str> {
        self.entries.keys().next().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Occurrence {
    /// Whether the occurrence carries anything: a node, or non-empty text
    pub fn is_filled(&self) -> bool {
        match self {
            Self::Text(text) => !text.is_empty(),
            Self::Node(_) => true,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            Self::Text(_) => None,
        }
    }

    /// Text of the occurrence; for a node, its character data if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Node(node) => node.text.as_deref(),
        }
    }

    /// First occurrence of a child element; text occurrences have no children
    pub fn first(&self, name: &str) -> Option<&Self> {
        self.as_node().and_then(|node| node.first(name))
    }
}

impl Node {
    /// All occurrences of a child element
    pub fn occurrences(&self, name: &str) -> &[Occurrence] {
        self.children.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// First occurrence of a child element
    pub fn first(&self, name: &str) -> Option<&Occurrence> {
        self.occurrences(name).first()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Parse XML text into a tree with default limits and options
pub fn parse_tree(input: &str) -> Result<Tree> {
    parse_tree_with(input, Config::default(), &TreeOptions::default())
}

/// Parse XML text into a tree with explicit limits and options
pub fn parse_tree_with(input: &str, config: Config, options: &TreeOptions) -> Result<Tree> {
    parse_tree_bytes(input.as_bytes(), config, options)
}

/// Parse raw bytes into a tree; invalid UTF-8 is reported where it occurs
pub fn parse_tree_bytes(input: &[u8], config: Config, options: &TreeOptions) -> Result<Tree> {
    let doc = Parser::with_config(input, config).parse()?;
    Ok(Tree::from_document(&doc, options))
}

fn element_name(element: &Element, options: &TreeOptions) -> String {
    if options.normalize_tags {
        element.name.to_lowercase()
    } else {
        element.name.clone()
    }
}

fn occurrence(element: &Element, options: &TreeOptions) -> Occurrence {
    let text = clean_text(&element.text(), options);
    let has_elements = element
        .children
        .iter()
        .any(|child| matches!(child, Content::Element(_)));

    if element.attributes.is_empty() && !has_elements {
        return Occurrence::Text(text);
    }

    let mut children: IndexMap<String, Vec<Occurrence>> = IndexMap::new();
    for child in element.elements() {
        children
            .entry(element_name(child, options))
            .or_default()
            .push(occurrence(child, options));
    }

    Occurrence::Node(Node {
        attributes: element.attributes.clone(),
        text: (!text.trim().is_empty()).then_some(text),
        children,
    })
}

fn clean_text(text: &str, options: &TreeOptions) -> String {
    let text = if options.trim { text.trim() } else { text };
    if !options.normalize {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut run = String::new();
    for ch in text.chars() {
        if ch.is_whitespace() {
            run.push(ch);
            continue;
        }
        flush_whitespace(&mut result, &mut run);
        result.push(ch);
    }
    flush_whitespace(&mut result, &mut run);
    result
}

fn flush_whitespace(result: &mut String, run: &mut String) {
    if run.chars().count() >= 2 {
        result.push(' ');
    } else {
        result.push_str(run);
    }
    run.clear();
}
