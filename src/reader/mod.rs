//! # Code Reader
//!
//! A cursored view over an in-memory character buffer.
//!
//! ## Overview
//!
//! [`CodeReader`] snapshots a string into a character buffer and keeps a
//! cursor with 1-based line/column coordinates for diagnostics. Probes
//! (`peek*`, `is_at*`, `find_offset*`) are side-effect free; `read_*` and
//! [`advance`](CodeReader::advance) move the cursor; a [`Location`] can
//! be saved and restored for backtracking.
//!
//! The probe API is cursor-relative. The interpreter instead addresses
//! the buffer absolutely through [`char_at`](CodeReader::char_at) and
//! friends, since match offsets and capture spans are absolute.
//!
//! [`regex_match`](CodeReader::regex_match) compiles a pattern (caching
//! the compiled tree behind a mutex, keyed by pattern text) and matches
//! it exactly at the cursor, the way a `\G`-anchored pattern would,
//! without consuming anything.
//!
//! ## Usage
//!
//! ```rust
//! use treegex::reader::CodeReader;
//!
//! let mut reader = CodeReader::new("let x = 1;\nnext");
//! let saved = reader.location();
//! assert_eq!(reader.read_line(), Some("let x = 1;".to_string()));
//! assert_eq!(reader.line(), 2);
//! reader.restore(saved).unwrap();
//! assert_eq!(reader.position(), 0);
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use compact_str::CompactString;
use hashbrown::HashMap;

use crate::error::ReaderError;
use crate::grammar::GrammarNode;
use crate::interp::{match_at, CaptureMap, StringMatch};
use crate::regex::RegexParser;
use crate::text::TextRange;

/// A saved cursor state; any previously observed location can be
/// restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub position: usize,
    pub line: u32,
    pub column: u32,
}

/// A cursor over an in-memory character buffer.
///
/// Not thread-safe: each matching session owns one reader. The compiled
/// trees it shares through the pattern cache are immutable and may be
/// used from any number of readers.
#[derive(Debug)]
pub struct CodeReader {
    buffer: Vec<char>,
    position: usize,
    line: u32,
    column: u32,
    pattern_cache: Mutex<HashMap<CompactString, Arc<GrammarNode>, ahash::RandomState>>,
}

impl CodeReader {
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            buffer: text.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            pattern_cache: Mutex::new(HashMap::default()),
        }
    }

    /// Total buffer length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The cursor position, in characters from the start of the buffer.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// 1-based line of the cursor.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// 1-based column of the cursor.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Characters left between the cursor and the end of the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.buffer.len()
    }

    /// The character under the cursor, if any. Never moves the cursor.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.char_at(self.position)
    }

    /// The character `offset` places past the cursor.
    #[must_use]
    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.char_at(self.position + offset)
    }

    /// Whether the character under the cursor equals `c`.
    #[must_use]
    pub fn is_at(&self, c: char) -> bool {
        self.peek() == Some(c)
    }

    /// Whether the character `offset` places past the cursor equals `c`.
    #[must_use]
    pub fn is_at_offset(&self, c: char, offset: usize) -> bool {
        self.peek_at(offset) == Some(c)
    }

    /// Whether the buffer continues with `text` at the cursor.
    #[must_use]
    pub fn is_at_str(&self, text: &str) -> bool {
        self.has_str_at(self.position, text)
    }

    /// Whether the buffer continues with `text` at `offset` places past
    /// the cursor.
    #[must_use]
    pub fn is_at_str_offset(&self, text: &str, offset: usize) -> bool {
        self.has_str_at(self.position + offset, text)
    }

    /// Whether the text at `offset` places past the cursor equals the
    /// text of a previously observed `span`.
    #[must_use]
    pub fn is_at_span(&self, span: TextRange, offset: usize) -> bool {
        self.text_eq_at(span, self.position + offset)
    }

    /// The span of the next `length` characters starting `offset` places
    /// past the cursor, without consuming it.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::SpanOutOfBounds`] if the span would extend
    /// past the end of the buffer.
    pub fn peek_span(&self, length: usize, offset: usize) -> Result<TextRange, ReaderError> {
        let start = self.position + offset;
        if start + length > self.buffer.len() {
            return Err(ReaderError::SpanOutOfBounds {
                length,
                offset: start,
            });
        }
        Ok(TextRange::at(start, length))
    }

    /// Distance from the cursor to the next occurrence of `c`.
    #[must_use]
    pub fn find_offset(&self, c: char) -> Option<usize> {
        self.buffer[self.position..].iter().position(|&x| x == c)
    }

    /// Distance from the cursor to the next occurrence of `text`.
    #[must_use]
    pub fn find_offset_str(&self, text: &str) -> Option<usize> {
        let needle: Vec<char> = text.chars().collect();
        if needle.is_empty() {
            return Some(0);
        }
        self.buffer[self.position..]
            .windows(needle.len())
            .position(|window| window == needle)
    }

    /// Distance from the cursor to the first character satisfying
    /// `predicate`.
    #[must_use]
    pub fn find_offset_by(&self, predicate: impl Fn(char) -> bool) -> Option<usize> {
        self.buffer[self.position..]
            .iter()
            .position(|&c| predicate(c))
    }

    /// The character at the absolute buffer index `index`.
    #[must_use]
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.buffer.get(index).copied()
    }

    /// Whether the buffer continues with `text` at the absolute index
    /// `index`.
    #[must_use]
    pub fn has_str_at(&self, index: usize, text: &str) -> bool {
        let mut at = index;
        for expected in text.chars() {
            if self.char_at(at) != Some(expected) {
                return false;
            }
            at += 1;
        }
        true
    }

    /// Whether the buffer text at the absolute index `index` equals the
    /// buffer text of `range`.
    #[must_use]
    pub fn text_eq_at(&self, range: TextRange, index: usize) -> bool {
        if index + range.len() > self.buffer.len() || range.end() > self.buffer.len() {
            return false;
        }
        self.buffer[range.start()..range.end()] == self.buffer[index..index + range.len()]
    }

    /// The text of a span as an owned string. Out-of-bounds spans yield
    /// an empty string.
    #[must_use]
    pub fn slice(&self, range: TextRange) -> String {
        self.buffer
            .get(range.start()..range.end())
            .map(|chars| chars.iter().collect())
            .unwrap_or_default()
    }

    /// Move the cursor forward by `n` characters, maintaining line and
    /// column coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::AdvancePastEnd`] if fewer than `n`
    /// characters remain.
    pub fn advance(&mut self, n: usize) -> Result<(), ReaderError> {
        if n > self.remaining() {
            return Err(ReaderError::AdvancePastEnd {
                requested: n,
                remaining: self.remaining(),
            });
        }
        for _ in 0..n {
            let c = self.buffer[self.position];
            self.position += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        Ok(())
    }

    /// Consume `length` characters and return their span.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::AdvancePastEnd`] if fewer than `length`
    /// characters remain.
    pub fn read_span(&mut self, length: usize) -> Result<TextRange, ReaderError> {
        let span = TextRange::at(self.position, length);
        self.advance(length)?;
        Ok(span)
    }

    /// Consume `length` characters and return them as a string.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::AdvancePastEnd`] if fewer than `length`
    /// characters remain.
    pub fn read_string(&mut self, length: usize) -> Result<String, ReaderError> {
        let span = self.read_span(length)?;
        Ok(self.slice(span))
    }

    /// Consume and return everything from the cursor to the end.
    pub fn read_to_end(&mut self) -> String {
        let span = TextRange::new(self.position, self.buffer.len());
        let text = self.slice(span);
        self.position = self.buffer.len();
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        text
    }

    /// Consume one line and return its content without the terminator.
    /// The terminator itself (CRLF, then LF, then lone CR) is consumed.
    /// Returns `None` at end of input.
    pub fn read_line(&mut self) -> Option<String> {
        if self.is_at_end() {
            return None;
        }
        let mut length = 0;
        let mut terminator = 0;
        while let Some(c) = self.peek_at(length) {
            match c {
                '\r' => {
                    terminator = if self.peek_at(length + 1) == Some('\n') {
                        2
                    } else {
                        1
                    };
                    break;
                }
                '\n' => {
                    terminator = 1;
                    break;
                }
                _ => length += 1,
            }
        }
        let span = TextRange::at(self.position, length);
        let content = self.slice(span);
        // Both lengths were just probed, so the advance cannot fail.
        let _ = self.advance(length + terminator);
        Some(content)
    }

    /// Snapshot the cursor.
    #[must_use]
    pub const fn location(&self) -> Location {
        Location {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    /// Restore a previously observed cursor snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::InvalidPosition`] for positions past the
    /// end of the buffer and [`ReaderError::InvalidCoordinate`] for a
    /// zero line or column.
    pub fn restore(&mut self, location: Location) -> Result<(), ReaderError> {
        if location.position > self.buffer.len() {
            return Err(ReaderError::InvalidPosition {
                position: location.position,
                length: self.buffer.len(),
            });
        }
        if location.line == 0 || location.column == 0 {
            return Err(ReaderError::InvalidCoordinate);
        }
        self.position = location.position;
        self.line = location.line;
        self.column = location.column;
        Ok(())
    }

    /// Compile `pattern` (through the reader's pattern cache) and match
    /// it exactly at the cursor. Nothing is consumed; use the match
    /// façade to consume a matched span.
    ///
    /// # Errors
    ///
    /// Returns the pattern's parse error, or an engine error if the
    /// compiled tree is unsupported by the interpreter.
    pub fn regex_match(&self, pattern: &str) -> crate::error::Result<StringMatch> {
        let node = self.cached_pattern(pattern)?;
        let mut captures = CaptureMap::new();
        let m = match_at(&node, self, self.position, &mut captures)?;
        let span = TextRange::at(self.position, m.length);
        Ok(StringMatch {
            is_match: m.is_match,
            text: if m.is_match {
                self.slice(span)
            } else {
                String::new()
            },
            captures: if m.is_match {
                captures
            } else {
                CaptureMap::new()
            },
        })
    }

    fn cached_pattern(&self, pattern: &str) -> crate::error::Result<Arc<GrammarNode>> {
        let mut cache = self
            .pattern_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(node) = cache.get(pattern) {
            return Ok(Arc::clone(node));
        }
        let node = Arc::new(RegexParser::parse(pattern)?);
        cache.insert(CompactString::new(pattern), Arc::clone(&node));
        Ok(node)
    }
}
