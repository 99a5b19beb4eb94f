//! XML parser implementation

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::lexer::Cursor;
use crate::xml::model::{Content, Document, Element};

/// Configuration for the XML parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_size: 1024 * 1024,
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }
}

/// Recursive-descent parser producing a [`Document`]
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
    depth: u16,
    input_len: usize,
}

impl<'a> Parser<'a> {
    /// Parser with default limits
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    pub const fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            depth: 0,
            input_len: input.len(),
        }
    }

    /// Parse a complete document: optional prolog, one root element, optional epilog
    pub fn parse(&mut self) -> Result<Document> {
        let max = self.config.max_size;
        if max > 0 && self.input_len > max {
            return Err(self.error(ErrorKind::MaxSizeExceeded { max }));
        }

        self.skip_misc()?;
        if self.cursor.is_eof() {
            return Err(self.error(ErrorKind::EmptyDocument));
        }
        let root = self.parse_element()?;
        self.skip_misc()?;
        if !self.cursor.is_eof() {
            return Err(self.error(ErrorKind::TrailingContent));
        }

        Ok(Document { root })
    }

    /// Whitespace, declarations, comments and processing instructions
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.eat_str(b"<?") {
                self.markup(b"?>")?;
            } else if self.cursor.eat_str(b"<!--") {
                self.markup(b"-->")?;
            } else if self.cursor.eat_str(b"<!") {
                self.skip_doctype()?;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_element(&mut self) -> Result<Element> {
        self.enter()?;
        self.expect(b'<')?;
        if self.cursor.current() == Some(b'/') {
            return Err(self.unexpected("unexpected closing tag"));
        }

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;
        let children = if self.cursor.eat(b'/') {
            self.expect(b'>')?;
            Vec::new()
        } else {
            self.expect(b'>')?;
            self.parse_children(&name)?
        };

        self.depth = self.depth.saturating_sub(1);
        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    /// Content up to and including the closing tag of `name`
    fn parse_children(&mut self, name: &str) -> Result<Vec<Content>> {
        let mut children = Vec::new();
        loop {
            if self.cursor.is_eof() {
                let name = name.to_string();
                return Err(self.error(ErrorKind::UnterminatedElement { name }));
            }

            let pos = self.cursor.position();
            if self.cursor.eat_str(b"</") {
                let found = self.parse_name()?;
                if found != name {
                    let expected = name.to_string();
                    return Err(Error::at(ErrorKind::MismatchedTag { expected, found }, pos));
                }
                self.cursor.skip_whitespace();
                self.expect(b'>')?;
                return Ok(children);
            } else if self.cursor.eat_str(b"<!--") {
                self.markup(b"-->")?;
            } else if self.cursor.eat_str(b"<![CDATA[") {
                let raw = self.markup(b"]]>")?;
                push_text(&mut children, self.utf8(raw)?.to_string());
            } else if self.cursor.eat_str(b"<?") {
                self.markup(b"?>")?;
            } else if self.cursor.current() == Some(b'<') {
                children.push(Content::Element(self.parse_element()?));
            } else {
                let raw = self.cursor.take_while(|b| b != b'<');
                let text = self.decode(self.utf8(raw)?)?;
                push_text(&mut children, text);
            }
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth = self.depth.saturating_add(1);
        let max = self.config.max_depth;
        if max > 0 && self.depth > max {
            return Err(self.error(ErrorKind::MaxDepthExceeded { max }));
        }
        Ok(())
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attributes = IndexMap::new();
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => return Ok(attributes),
                Some(_) => {}
                None => return Err(self.error(ErrorKind::UnexpectedEof)),
            }

            let pos = self.cursor.position();
            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attributes.contains_key(&name) {
                return Err(Error::at(ErrorKind::DuplicateAttribute { name }, pos));
            }
            attributes.insert(name, value);
        }
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let Some(quote @ (b'"' | b'\'')) = self.cursor.current() else {
            return Err(self.unexpected("expected quoted value"));
        };
        self.cursor.bump();

        let raw = self.cursor.take_while(|b| b != quote && b != b'<');
        match self.cursor.current() {
            Some(b) if b == quote => {
                self.cursor.bump();
                self.decode(self.utf8(raw)?)
            }
            Some(_) => Err(self.unexpected("'<' in attribute value")),
            None => Err(self.error(ErrorKind::UnexpectedEof)),
        }
    }

    fn parse_name(&mut self) -> Result<String> {
        match self.cursor.current() {
            Some(b) if is_name_start(b) => {}
            Some(_) => return Err(self.error(ErrorKind::InvalidName)),
            None => return Err(self.error(ErrorKind::UnexpectedEof)),
        }
        let raw = self.cursor.take_while(is_name_char);
        self.utf8(raw).map(str::to_string)
    }

    /// `<!DOCTYPE ...>`, including a bracketed internal subset
    fn skip_doctype(&mut self) -> Result<()> {
        let mut open = 0usize;
        while let Some(b) = self.cursor.bump() {
            match b {
                b'[' => open += 1,
                b']' => open = open.saturating_sub(1),
                b'>' if open == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.error(ErrorKind::UnterminatedMarkup))
    }

    /// Body of a comment, CDATA section or processing instruction
    fn markup(&mut self, terminator: &[u8]) -> Result<&'a [u8]> {
        match self.cursor.take_until(terminator) {
            Some(raw) => Ok(raw),
            None => Err(self.error(ErrorKind::UnterminatedMarkup)),
        }
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.cursor.eat(byte) {
            Ok(())
        } else {
            Err(self.unexpected(format!("expected '{}'", char::from(byte))))
        }
    }

    fn utf8(&self, raw: &'a [u8]) -> Result<&'a str> {
        std::str::from_utf8(raw).map_err(|_| self.error(ErrorKind::InvalidUtf8))
    }

    fn decode(&self, text: &str) -> Result<String> {
        decode_entities(text).ok_or_else(|| self.error(ErrorKind::InvalidEntity))
    }

    fn error(&self, kind: ErrorKind) -> Error {
        Error::at(kind, self.cursor.position())
    }

    fn unexpected(&self, message: impl Into<String>) -> Error {
        Error::with_message(
            ErrorKind::UnexpectedToken,
            Span::at(self.cursor.position()),
            message,
        )
    }
}

/// Merge adjacent text runs so CDATA and comments do not split a value
fn push_text(children: &mut Vec<Content>, text: String) {
    if text.is_empty() {
        return;
    }
    match children.last_mut() {
        Some(Content::Text(previous)) => previous.push_str(&text),
        _ => children.push(Content::Text(text)),
    }
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b':' || !b.is_ascii()
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || b.is_ascii_digit() || b == b'-' || b == b'.'
}

/// Replace predefined and numeric character references; `None` on a malformed one
fn decode_entities(text: &str) -> Option<String> {
    if !text.contains('&') {
        return Some(text.to_string());
    }

    let mut decoded = String::with_capacity(text.len());
    let mut parts = text.split('&');
    decoded.push_str(parts.next().unwrap_or_default());
    for part in parts {
        let (reference, tail) = part.split_once(';')?;
        decoded.push(match reference {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "apos" => '\'',
            "quot" => '"',
            _ => {
                let hex = reference
                    .strip_prefix("#x")
                    .or_else(|| reference.strip_prefix("#X"));
                let code = match hex {
                    Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                    None => reference.strip_prefix('#')?.parse().ok()?,
                };
                char::from_u32(code)?
            }
        });
        decoded.push_str(tail);
    }
    Some(decoded)
}
