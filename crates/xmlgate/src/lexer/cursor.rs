//! Byte cursor over XML input

use crate::error::Pos;

/// Position-tracking view of the unread part of the input
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    input: &'a [u8],
    offset: usize,
    line: u32,
    col: u32,
}

impl<'a> Cursor<'a> {
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            offset: 0,
            line: 1,
            col: 1,
        }
    }

    /// Unread input
    pub fn rest(&self) -> &'a [u8] {
        self.input.get(self.offset..).unwrap_or_default()
    }

    /// Next byte without consuming it
    pub fn current(&self) -> Option<u8> {
        self.rest().first().copied()
    }

    pub fn starts_with(&self, pattern: &[u8]) -> bool {
        self.rest().starts_with(pattern)
    }

    pub const fn is_eof(&self) -> bool {
        self.offset >= self.input.len()
    }

    /// Line and column of the next byte
    pub const fn position(&self) -> Pos {
        Pos::new(self.offset, self.line, self.col)
    }

    /// Consume one byte
    pub fn bump(&mut self) -> Option<u8> {
        let byte = self.current()?;
        self.offset += 1;
        if byte == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(byte)
    }

    /// Consume `byte` if it is next
    pub fn eat(&mut self, byte: u8) -> bool {
        let matched = self.current() == Some(byte);
        if matched {
            self.bump();
        }
        matched
    }

    /// Consume `pattern` if the input continues with it
    pub fn eat_str(&mut self, pattern: &[u8]) -> bool {
        let matched = self.starts_with(pattern);
        if matched {
            for _ in pattern {
                self.bump();
            }
        }
        matched
    }

    /// Consume bytes while `accept` holds and return them
    pub fn take_while(&mut self, accept: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.offset;
        while self.current().is_some_and(&accept) {
            self.bump();
        }
        self.input.get(start..self.offset).unwrap_or_default()
    }

    /// Consume through the next `terminator` and return what preceded it.
    /// Returns `None` with the cursor at end of input when there is none.
    pub fn take_until(&mut self, terminator: &[u8]) -> Option<&'a [u8]> {
        let start = self.offset;
        loop {
            if self.starts_with(terminator) {
                let taken = self.input.get(start..self.offset);
                self.eat_str(terminator);
                return taken;
            }
            self.bump()?;
        }
    }

    /// Skip spaces, tabs and line breaks
    pub fn skip_whitespace(&mut self) {
        self.take_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'));
    }
}
