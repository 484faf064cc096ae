use compact_str::CompactString;

use crate::error::{RegexParseError, RegexParseErrorKind};
use crate::grammar::{classes, GrammarNode, UnicodeCategory};
use crate::text::{CharRange, TextRange};

/// Recursive-descent parser from pattern text to grammar trees.
///
/// Numbered capture groups receive their positions in the order their
/// opening `(` appears in the pattern, starting at 1. Lazy quantifiers
/// parse into `Repeat { lazy: true }` nodes; rejecting them is the
/// interpreter's business, not the parser's.
pub struct RegexParser {
    chars: Vec<char>,
    pos: usize,
    next_capture: u32,
}

/// A resolved escape: either a plain character or a class node.
enum EscapeItem {
    Char(char),
    Node(GrammarNode),
}

impl RegexParser {
    /// Parse `pattern` into a grammar tree.
    ///
    /// # Errors
    ///
    /// Returns a [`RegexParseError`] with the offending range and a
    /// canonical message for any malformed pattern.
    #[tracing::instrument(level = "trace", skip(pattern), fields(pattern_len = pattern.len()))]
    pub fn parse(pattern: &str) -> Result<GrammarNode, RegexParseError> {
        let mut parser = Self {
            chars: pattern.chars().collect(),
            pos: 0,
            next_capture: 1,
        };
        let node = parser.parse_alternation()?;
        if parser.pos < parser.chars.len() {
            // parse_alternation only stops early on an unmatched ')'.
            return Err(parser.err(
                RegexParseErrorKind::UnexpectedClosingParenthesis,
                parser.pos,
                parser.pos + 1,
            ));
        }
        Ok(node)
    }

    fn parse_alternation(&mut self) -> Result<GrammarNode, RegexParseError> {
        let mut branches = vec![self.parse_sequence()?];
        while self.peek() == Some('|') {
            self.pos += 1;
            branches.push(self.parse_sequence()?);
        }
        Ok(match branches.len() {
            1 => branches.swap_remove(0),
            _ => GrammarNode::Alt(branches),
        })
    }

    fn parse_sequence(&mut self) -> Result<GrammarNode, RegexParseError> {
        let mut seq: Option<GrammarNode> = None;
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            let atom = self.parse_atom()?;
            seq = Some(match seq {
                Some(prev) => prev.then(atom),
                None => atom,
            });
        }
        seq.ok_or_else(|| self.err_here(RegexParseErrorKind::EmptySequence))
    }

    fn parse_atom(&mut self) -> Result<GrammarNode, RegexParseError> {
        let primary = self.parse_primary()?;
        self.parse_quantifier(primary)
    }

    fn parse_quantifier(&mut self, node: GrammarNode) -> Result<GrammarNode, RegexParseError> {
        let repeat = match self.peek() {
            Some('?') => {
                self.pos += 1;
                GrammarNode::optional(node)
            }
            Some('*') => {
                self.pos += 1;
                GrammarNode::infinite(node)
            }
            Some('+') => {
                self.pos += 1;
                GrammarNode::at_least(node, 1)
            }
            Some('{') if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.parse_bounded_repeat(node)?
            }
            _ => return Ok(node),
        };
        if self.peek() == Some('?') {
            self.pos += 1;
            return match repeat {
                GrammarNode::Repeat {
                    node, min, max, ..
                } => Ok(GrammarNode::Repeat {
                    node,
                    min,
                    max,
                    lazy: true,
                }),
                other => Ok(other),
            };
        }
        Ok(repeat)
    }

    fn parse_bounded_repeat(&mut self, node: GrammarNode) -> Result<GrammarNode, RegexParseError> {
        let start = self.pos;
        self.pos += 1; // '{'
        let min = self.read_number();
        let max = if self.peek() == Some(',') {
            self.pos += 1;
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                Some(self.read_number())
            } else {
                None
            }
        } else {
            Some(min)
        };
        if self.peek() != Some('}') {
            return Err(self.err(RegexParseErrorKind::UnfinishedRepetition, start, self.pos));
        }
        self.pos += 1;
        GrammarNode::repeat(node, Some(min), max)
            .map_err(|_| self.err(RegexParseErrorKind::InvalidRepetitionRange, start, self.pos))
    }

    fn parse_primary(&mut self) -> Result<GrammarNode, RegexParseError> {
        let start = self.pos;
        match self.peek() {
            None => Err(self.err_here(RegexParseErrorKind::EmptySequence)),
            Some('.') => {
                self.pos += 1;
                Ok(GrammarNode::Any)
            }
            Some('(') => self.parse_group(),
            Some('[') => self.parse_set(),
            Some('\\') => self.parse_escape_node(),
            Some('^' | '$') => Err(self.err(
                RegexParseErrorKind::UnsupportedAnchor,
                start,
                start + 1,
            )),
            Some('*' | '+' | '?') => Err(self.err(
                RegexParseErrorKind::QuantifierWithoutTarget,
                start,
                start + 1,
            )),
            Some(c) => {
                self.pos += 1;
                Ok(GrammarNode::Char(c))
            }
        }
    }

    fn parse_group(&mut self) -> Result<GrammarNode, RegexParseError> {
        let start = self.pos;
        self.pos += 1; // '('
        if self.peek() != Some('?') {
            let index = self.next_capture;
            self.next_capture += 1;
            let node = self.parse_alternation()?;
            self.expect_group_close(start, RegexParseErrorKind::CaptureGroupMissingClose)?;
            return Ok(GrammarNode::capture(index, node));
        }
        self.pos += 1; // '?'
        match self.peek() {
            None => Err(self.err(RegexParseErrorKind::UnrecognizedGroupType, start, self.pos)),
            Some(':') => {
                self.pos += 1;
                if self.at_end() {
                    return Err(self.err(
                        RegexParseErrorKind::UnfinishedNonCapturingGroup,
                        start,
                        self.pos,
                    ));
                }
                let node = self.parse_alternation()?;
                self.expect_group_close(start, RegexParseErrorKind::UnfinishedNonCapturingGroup)?;
                Ok(node)
            }
            Some(kind @ ('=' | '!')) => {
                self.pos += 1;
                if self.at_end() {
                    return Err(self.err(
                        RegexParseErrorKind::UnfinishedLookahead,
                        start,
                        self.pos,
                    ));
                }
                let node = self.parse_alternation()?;
                self.expect_group_close(start, RegexParseErrorKind::UnfinishedLookahead)?;
                Ok(if kind == '=' {
                    GrammarNode::Lookahead(Box::new(node))
                } else {
                    GrammarNode::NotLookahead(Box::new(node))
                })
            }
            Some('<') => self.parse_named_capture(start),
            Some(_) => Err(self.err(
                RegexParseErrorKind::UnrecognizedGroupType,
                start,
                start + 2,
            )),
        }
    }

    fn parse_named_capture(&mut self, start: usize) -> Result<GrammarNode, RegexParseError> {
        self.pos += 1; // '<'
        let name = self.parse_name(start, RegexParseErrorKind::InvalidNamedCaptureName)?;
        if self.peek() != Some('>') {
            return Err(self.err(
                RegexParseErrorKind::NamedCaptureNameMissingClose,
                start,
                self.pos,
            ));
        }
        self.pos += 1;
        if self.at_end() {
            return Err(self.err(
                RegexParseErrorKind::NamedCaptureGroupMissingClose,
                start,
                self.pos,
            ));
        }
        let node = self.parse_alternation()?;
        self.expect_group_close(start, RegexParseErrorKind::NamedCaptureGroupMissingClose)?;
        Ok(GrammarNode::NamedCapture {
            name,
            node: Box::new(node),
        })
    }

    fn parse_set(&mut self) -> Result<GrammarNode, RegexParseError> {
        let start = self.pos;
        self.pos += 1; // '['
        let negated = if self.peek() == Some('^') {
            self.pos += 1;
            true
        } else {
            false
        };
        let mut chars: Vec<char> = Vec::new();
        let mut nodes: Vec<GrammarNode> = Vec::new();
        let mut first = true;
        loop {
            match self.peek() {
                None => {
                    return Err(self.err(RegexParseErrorKind::UnfinishedSet, start, self.pos))
                }
                Some(']') if !first => {
                    self.pos += 1;
                    break;
                }
                Some('\\') => match self.parse_escape_item(true)? {
                    EscapeItem::Char(c) => chars.push(c),
                    EscapeItem::Node(node) => nodes.push(node),
                },
                Some(c) => {
                    let item_start = self.pos;
                    self.pos += 1;
                    if self.peek() == Some('-')
                        && self.peek_at(1).is_some()
                        && self.peek_at(1) != Some(']')
                    {
                        self.pos += 1; // '-'
                        let end = self.parse_set_range_end(item_start)?;
                        if c > end {
                            return Err(self.err(
                                RegexParseErrorKind::InvalidCharacterRange,
                                item_start,
                                self.pos,
                            ));
                        }
                        nodes.push(GrammarNode::Range(CharRange::of(c, end)));
                    } else {
                        chars.push(c);
                    }
                }
            }
            first = false;
        }
        Ok(if negated {
            GrammarNode::not_set(chars, nodes)
        } else {
            GrammarNode::set(chars, nodes)
        })
    }

    /// The end character of a `a-z` set range; escapes are accepted as
    /// long as they resolve to a single character.
    fn parse_set_range_end(&mut self, item_start: usize) -> Result<char, RegexParseError> {
        match self.peek() {
            Some('\\') => match self.parse_escape_item(true)? {
                EscapeItem::Char(c) => Ok(c),
                EscapeItem::Node(_) => Err(self.err(
                    RegexParseErrorKind::InvalidCharacterRange,
                    item_start,
                    self.pos,
                )),
            },
            Some(c) => {
                self.pos += 1;
                Ok(c)
            }
            None => Err(self.err(
                RegexParseErrorKind::InvalidCharacterRange,
                item_start,
                self.pos,
            )),
        }
    }

    fn parse_escape_node(&mut self) -> Result<GrammarNode, RegexParseError> {
        match self.parse_escape_item(false)? {
            EscapeItem::Char(c) => Ok(GrammarNode::Char(c)),
            EscapeItem::Node(node) => Ok(node),
        }
    }

    fn parse_escape_item(&mut self, in_set: bool) -> Result<EscapeItem, RegexParseError> {
        let start = self.pos;
        self.pos += 1; // '\\'
        let Some(c) = self.peek() else {
            return Err(self.err(RegexParseErrorKind::InvalidEscape, start, self.pos));
        };
        match c {
            'a' => self.escape_char('\x07'),
            'f' => self.escape_char('\x0C'),
            'n' => self.escape_char('\n'),
            'r' => self.escape_char('\r'),
            't' => self.escape_char('\t'),
            'v' => self.escape_char('\x0B'),
            '.' | '$' | '^' | '{' | '[' | '(' | '|' | ')' | '*' | '+' | '?' | '\\' => {
                self.escape_char(c)
            }
            'x' => {
                self.pos += 1;
                let hi = self.expect_hex(start)?;
                let lo = self.expect_hex(start)?;
                match char::from_u32(hi * 16 + lo) {
                    Some(value) => Ok(EscapeItem::Char(value)),
                    None => Err(self.err(RegexParseErrorKind::InvalidEscape, start, self.pos)),
                }
            }
            'd' => self.escape_node(classes::digit()),
            'D' => self.escape_node(classes::non_digit()),
            'w' => self.escape_node(classes::word()),
            'W' => self.escape_node(classes::non_word()),
            's' => self.escape_node(classes::whitespace()),
            'S' => self.escape_node(classes::non_whitespace()),
            'p' | 'P' => self.parse_unicode_class(start, c == 'P'),
            'k' if !in_set => self.parse_named_backreference(start),
            c if c.is_ascii_digit() && !in_set => self.parse_numbered_backreference(start),
            _ => Err(self.err(RegexParseErrorKind::InvalidEscape, start, self.pos + 1)),
        }
    }

    fn escape_char(&mut self, value: char) -> Result<EscapeItem, RegexParseError> {
        self.pos += 1;
        Ok(EscapeItem::Char(value))
    }

    fn escape_node(&mut self, node: GrammarNode) -> Result<EscapeItem, RegexParseError> {
        self.pos += 1;
        Ok(EscapeItem::Node(node))
    }

    fn parse_unicode_class(
        &mut self,
        start: usize,
        negated: bool,
    ) -> Result<EscapeItem, RegexParseError> {
        self.pos += 1; // 'p' / 'P'
        if self.peek() != Some('{') {
            return Err(self.err(RegexParseErrorKind::InvalidEscape, start, self.pos));
        }
        self.pos += 1;
        let mut name = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(self.err(
                        RegexParseErrorKind::InvalidUnicodeCategory { name },
                        start,
                        self.pos,
                    ))
                }
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                Some(c) => {
                    name.push(c);
                    self.pos += 1;
                }
            }
        }
        match UnicodeCategory::from_name(&name) {
            Some(category) => Ok(EscapeItem::Node(if negated {
                GrammarNode::NotCategory(category)
            } else {
                GrammarNode::Category(category)
            })),
            None => Err(self.err(
                RegexParseErrorKind::InvalidUnicodeCategory { name },
                start,
                self.pos,
            )),
        }
    }

    fn parse_numbered_backreference(
        &mut self,
        start: usize,
    ) -> Result<EscapeItem, RegexParseError> {
        let digit_start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos - digit_start > 3 {
            return Err(self.err(RegexParseErrorKind::InvalidBackreference, start, self.pos));
        }
        let value = self.chars[digit_start..self.pos]
            .iter()
            .fold(0u32, |acc, c| {
                acc.saturating_mul(10)
                    .saturating_add(c.to_digit(10).unwrap_or(0))
            });
        Ok(EscapeItem::Node(GrammarNode::Backreference(value)))
    }

    fn parse_named_backreference(&mut self, start: usize) -> Result<EscapeItem, RegexParseError> {
        self.pos += 1; // 'k'
        if self.peek() != Some('<') {
            return Err(self.err(
                RegexParseErrorKind::NamedBackreferenceMissingOpen,
                start,
                self.pos,
            ));
        }
        self.pos += 1;
        let name = self.parse_name(start, RegexParseErrorKind::InvalidNamedBackreferenceName)?;
        if self.peek() != Some('>') {
            return Err(self.err(
                RegexParseErrorKind::NamedBackreferenceMissingClose,
                start,
                self.pos,
            ));
        }
        self.pos += 1;
        Ok(EscapeItem::Node(GrammarNode::NamedBackreference(name)))
    }

    /// `[A-Za-z_][A-Za-z0-9_]*`, for capture and backreference names.
    fn parse_name(
        &mut self,
        start: usize,
        invalid: RegexParseErrorKind,
    ) -> Result<CompactString, RegexParseError> {
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            Some(_) => return Err(self.err(invalid, start, self.pos + 1)),
            None => return Err(self.err(invalid, start, self.pos)),
        }
        let mut name = CompactString::default();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok(name)
    }

    fn expect_group_close(
        &mut self,
        start: usize,
        kind: RegexParseErrorKind,
    ) -> Result<(), RegexParseError> {
        if self.peek() == Some(')') {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.err(kind, start, self.pos))
        }
    }

    fn expect_hex(&mut self, start: usize) -> Result<u32, RegexParseError> {
        match self.peek() {
            Some(c) if c.is_ascii_hexdigit() => {
                self.pos += 1;
                Ok(c.to_digit(16).unwrap_or(0))
            }
            Some(_) => Err(self.err(RegexParseErrorKind::InvalidEscape, start, self.pos + 1)),
            None => Err(self.err(RegexParseErrorKind::InvalidEscape, start, self.pos)),
        }
    }

    fn read_number(&mut self) -> u32 {
        let mut value = 0u32;
        while let Some(c) = self.peek() {
            let Some(digit) = c.to_digit(10) else { break };
            value = value.saturating_mul(10).saturating_add(digit);
            self.pos += 1;
        }
        value
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn err(&self, kind: RegexParseErrorKind, start: usize, end: usize) -> RegexParseError {
        let end = end.min(self.chars.len()).max(start);
        RegexParseError::new(TextRange::new(start, end), kind)
    }

    fn err_here(&self, kind: RegexParseErrorKind) -> RegexParseError {
        self.err(kind, self.pos, self.pos + 1)
    }
}
