//! # Grammar Tree Interpreter
//!
//! Matches grammar trees against a [`CodeReader`], plus the thin façade
//! entry points that consume the matched span.
//!
//! ## Overview
//!
//! [`match_at`] walks a tree at an absolute buffer offset and reports
//! `(is_match, length)` without moving the reader. All choices are
//! deterministic and left-biased: alternations take the first matching
//! branch, repetitions are greedy. Captures are written into a
//! [`CaptureMap`] under tentative scopes, so a backtracked attempt never
//! leaks entries.
//!
//! The façade functions [`simple_match`], [`span_match`], and
//! [`string_match`] run at the reader's current position and advance the
//! reader over the matched span on success only.
//!
//! A tree failing to match is the ordinary `is_match == false` outcome,
//! not an error; the only matching-time error is hitting a lazy
//! repetition, which the engine does not support.
//!
//! ## Usage
//!
//! ```rust
//! use treegex::interp::string_match;
//! use treegex::reader::CodeReader;
//! use treegex::regex::RegexParser;
//!
//! let tree = RegexParser::parse("[a-z]+").unwrap();
//! let mut reader = CodeReader::new("hello, world");
//! let m = string_match(&mut reader, &tree).unwrap();
//! assert!(m.is_match);
//! assert_eq!(m.text, "hello");
//! assert_eq!(reader.position(), 5);
//! ```

pub mod captures;

pub use captures::{Capture, CaptureKey, CaptureMap};

use crate::error::EngineError;
use crate::grammar::GrammarNode;
use crate::reader::CodeReader;
use crate::text::TextRange;

/// Outcome of matching a tree at an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleMatch {
    pub is_match: bool,
    /// Characters consumed from the starting offset; 0 for zero-width
    /// assertions and for failures.
    pub length: usize,
}

impl SimpleMatch {
    #[must_use]
    pub const fn matched(length: usize) -> Self {
        Self {
            is_match: true,
            length,
        }
    }

    #[must_use]
    pub const fn failed() -> Self {
        Self {
            is_match: false,
            length: 0,
        }
    }
}

/// A successful-span outcome: the consumed range plus captures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanMatch {
    pub is_match: bool,
    pub span: TextRange,
    pub captures: CaptureMap,
}

/// A successful-text outcome: the consumed text plus captures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringMatch {
    pub is_match: bool,
    pub text: String,
    pub captures: CaptureMap,
}

/// Match `node` against the reader's buffer starting at the absolute
/// offset `offset`. The reader is never advanced.
///
/// # Errors
///
/// Returns [`EngineError::LazyRepetition`] if the tree contains a lazy
/// repetition on a path the match attempts.
pub fn match_at(
    node: &GrammarNode,
    reader: &CodeReader,
    offset: usize,
    captures: &mut CaptureMap,
) -> Result<SimpleMatch, EngineError> {
    match node {
        GrammarNode::Any => Ok(match reader.char_at(offset) {
            Some(_) => SimpleMatch::matched(1),
            None => SimpleMatch::failed(),
        }),

        GrammarNode::Char(value) => Ok(match reader.char_at(offset) {
            Some(c) if c == *value => SimpleMatch::matched(1),
            _ => SimpleMatch::failed(),
        }),

        // A zero-width assertion: the character is inspected but not
        // consumed.
        GrammarNode::NotChar(value) => Ok(match reader.char_at(offset) {
            Some(c) if c != *value => SimpleMatch::matched(0),
            _ => SimpleMatch::failed(),
        }),

        GrammarNode::Literal(text) => Ok(if reader.has_str_at(offset, text) {
            SimpleMatch::matched(text.chars().count())
        } else {
            SimpleMatch::failed()
        }),

        GrammarNode::Range(range) => Ok(match reader.char_at(offset) {
            Some(c) if range.contains(c) => SimpleMatch::matched(1),
            _ => SimpleMatch::failed(),
        }),

        GrammarNode::NotRange(range) => Ok(match reader.char_at(offset) {
            Some(c) if !range.contains(c) => SimpleMatch::matched(1),
            _ => SimpleMatch::failed(),
        }),

        GrammarNode::Set { chars, nodes } => {
            Ok(match set_member_at(reader, offset, chars, nodes, captures)? {
                Some(true) => SimpleMatch::matched(1),
                _ => SimpleMatch::failed(),
            })
        }

        GrammarNode::NotSet { chars, nodes } => {
            Ok(match set_member_at(reader, offset, chars, nodes, captures)? {
                Some(false) => SimpleMatch::matched(1),
                _ => SimpleMatch::failed(),
            })
        }

        GrammarNode::Category(category) => Ok(match reader.char_at(offset) {
            Some(c) if category.contains(c) => SimpleMatch::matched(1),
            _ => SimpleMatch::failed(),
        }),

        // Zero-width, like NotChar.
        GrammarNode::NotCategory(category) => Ok(match reader.char_at(offset) {
            Some(c) if !category.contains(c) => SimpleMatch::matched(0),
            _ => SimpleMatch::failed(),
        }),

        GrammarNode::Seq(nodes) => {
            let mut scope = captures.fork();
            let mut length = 0;
            for child in nodes {
                let m = match_at(child, reader, offset + length, &mut scope)?;
                if !m.is_match {
                    return Ok(SimpleMatch::failed());
                }
                length += m.length;
            }
            captures.commit(scope);
            Ok(SimpleMatch::matched(length))
        }

        GrammarNode::Alt(nodes) => {
            for child in nodes {
                let mut scope = captures.fork();
                let m = match_at(child, reader, offset, &mut scope)?;
                if m.is_match {
                    captures.commit(scope);
                    return Ok(m);
                }
            }
            Ok(SimpleMatch::failed())
        }

        GrammarNode::NotAlt(nodes) => {
            for child in nodes {
                let mut scope = captures.fork();
                if match_at(child, reader, offset, &mut scope)?.is_match {
                    return Ok(SimpleMatch::failed());
                }
            }
            Ok(SimpleMatch::matched(0))
        }

        GrammarNode::Repeat {
            node,
            min,
            max,
            lazy,
        } => {
            if *lazy {
                return Err(EngineError::LazyRepetition);
            }
            let mut scope = captures.fork();
            let mut count: u32 = 0;
            let mut length = 0;
            loop {
                if max.is_some_and(|max| count >= max) {
                    break;
                }
                let mut attempt = scope.fork();
                let m = match_at(node, reader, offset + length, &mut attempt)?;
                if !m.is_match {
                    break;
                }
                scope.commit(attempt);
                count += 1;
                length += m.length;
                // A zero-length match may only run up the counter while
                // the minimum is still unmet; it never pumps forever.
                if m.length == 0 && min.map_or(true, |min| count >= min) {
                    break;
                }
            }
            if count >= min.unwrap_or(0) {
                captures.commit(scope);
                Ok(SimpleMatch::matched(length))
            } else {
                Ok(SimpleMatch::failed())
            }
        }

        GrammarNode::Lookahead(node) => {
            // Trial captures are discarded whether or not the assertion
            // holds.
            let mut scope = captures.fork();
            Ok(if match_at(node, reader, offset, &mut scope)?.is_match {
                SimpleMatch::matched(0)
            } else {
                SimpleMatch::failed()
            })
        }

        GrammarNode::NotLookahead(node) => {
            let mut scope = captures.fork();
            Ok(if match_at(node, reader, offset, &mut scope)?.is_match {
                SimpleMatch::failed()
            } else {
                SimpleMatch::matched(0)
            })
        }

        GrammarNode::Capture { index, node } => {
            record_capture(CaptureKey::Numbered(*index), node, reader, offset, captures)
        }

        GrammarNode::NamedCapture { name, node } => record_capture(
            CaptureKey::Named(name.clone()),
            node,
            reader,
            offset,
            captures,
        ),

        GrammarNode::Backreference(index) => {
            Ok(resolve_backreference(captures.get_numbered(*index), reader, offset))
        }

        GrammarNode::NamedBackreference(name) => {
            Ok(resolve_backreference(captures.get_named(name), reader, offset))
        }
    }
}

/// Membership probe shared by `Set` and `NotSet`: `None` when no
/// character exists at the offset, otherwise whether it belongs to the
/// set. Trial captures from child nodes are always discarded.
fn set_member_at(
    reader: &CodeReader,
    offset: usize,
    chars: &[char],
    nodes: &[GrammarNode],
    captures: &CaptureMap,
) -> Result<Option<bool>, EngineError> {
    let Some(c) = reader.char_at(offset) else {
        return Ok(None);
    };
    if chars.contains(&c) {
        return Ok(Some(true));
    }
    for node in nodes {
        let mut scope = captures.fork();
        let m = match_at(node, reader, offset, &mut scope)?;
        if m.is_match && m.length >= 1 {
            return Ok(Some(true));
        }
    }
    Ok(Some(false))
}

fn record_capture(
    key: CaptureKey,
    node: &GrammarNode,
    reader: &CodeReader,
    offset: usize,
    captures: &mut CaptureMap,
) -> Result<SimpleMatch, EngineError> {
    let mut scope = captures.fork();
    let m = match_at(node, reader, offset, &mut scope)?;
    if m.is_match {
        scope.insert(key, Capture::new(offset, m.length));
        captures.commit(scope);
        Ok(m)
    } else {
        Ok(SimpleMatch::failed())
    }
}

/// An absent or empty capture never matches; otherwise the reader text
/// at `offset` must equal the captured span.
fn resolve_backreference(
    capture: Option<Capture>,
    reader: &CodeReader,
    offset: usize,
) -> SimpleMatch {
    match capture {
        Some(capture) if !capture.is_empty() => {
            let span = TextRange::at(capture.start, capture.length);
            if reader.text_eq_at(span, offset) {
                SimpleMatch::matched(capture.length)
            } else {
                SimpleMatch::failed()
            }
        }
        _ => SimpleMatch::failed(),
    }
}

/// Match at the reader's position; on success, consume the span and
/// report its length.
///
/// # Errors
///
/// Propagates [`EngineError`](crate::error::EngineError) from the
/// interpreter and [`ReaderError`](crate::error::ReaderError) from the
/// consuming advance.
#[tracing::instrument(level = "trace", skip(reader, node), fields(offset = reader.position()))]
pub fn simple_match(
    reader: &mut CodeReader,
    node: &GrammarNode,
) -> crate::error::Result<SimpleMatch> {
    let mut captures = CaptureMap::new();
    simple_match_with(reader, node, &mut captures)
}

/// [`simple_match`] writing captures into a caller-supplied table.
///
/// # Errors
///
/// Same as [`simple_match`].
pub fn simple_match_with(
    reader: &mut CodeReader,
    node: &GrammarNode,
    captures: &mut CaptureMap,
) -> crate::error::Result<SimpleMatch> {
    let m = match_at(node, reader, reader.position(), captures)?;
    if m.is_match {
        reader.advance(m.length)?;
    }
    Ok(m)
}

/// Match at the reader's position; on success, consume the span and
/// return it with the capture table.
///
/// # Errors
///
/// Same as [`simple_match`].
#[tracing::instrument(level = "trace", skip(reader, node), fields(offset = reader.position()))]
pub fn span_match(reader: &mut CodeReader, node: &GrammarNode) -> crate::error::Result<SpanMatch> {
    let start = reader.position();
    let mut captures = CaptureMap::new();
    let m = match_at(node, reader, start, &mut captures)?;
    if m.is_match {
        reader.advance(m.length)?;
        Ok(SpanMatch {
            is_match: true,
            span: TextRange::at(start, m.length),
            captures,
        })
    } else {
        Ok(SpanMatch {
            is_match: false,
            span: TextRange::at(start, 0),
            captures: CaptureMap::new(),
        })
    }
}

/// Match at the reader's position; on success, consume the span and
/// return its text with the capture table.
///
/// # Errors
///
/// Same as [`simple_match`].
#[tracing::instrument(level = "trace", skip(reader, node), fields(offset = reader.position()))]
pub fn string_match(
    reader: &mut CodeReader,
    node: &GrammarNode,
) -> crate::error::Result<StringMatch> {
    let m = span_match(reader, node)?;
    Ok(StringMatch {
        is_match: m.is_match,
        text: reader.slice(m.span),
        captures: m.captures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::classes;

    fn run(node: &GrammarNode, input: &str) -> (SimpleMatch, CaptureMap) {
        let reader = CodeReader::new(input);
        let mut captures = CaptureMap::new();
        let m = match_at(node, &reader, 0, &mut captures).expect("match should not error");
        (m, captures)
    }

    #[test]
    fn terminals() {
        let (m, _) = run(&GrammarNode::Any, "x");
        assert_eq!(m, SimpleMatch::matched(1));
        let (m, _) = run(&GrammarNode::Any, "");
        assert_eq!(m, SimpleMatch::failed());

        let (m, _) = run(&GrammarNode::Char('a'), "ab");
        assert_eq!(m, SimpleMatch::matched(1));
        let (m, _) = run(&GrammarNode::Char('a'), "ba");
        assert_eq!(m, SimpleMatch::failed());

        let (m, _) = run(&GrammarNode::Literal("abc".into()), "abcd");
        assert_eq!(m, SimpleMatch::matched(3));
        let (m, _) = run(&GrammarNode::Literal("abc".into()), "abd");
        assert_eq!(m, SimpleMatch::failed());
    }

    #[test]
    fn negated_char_is_zero_width() {
        let (m, _) = run(&GrammarNode::NotChar('a'), "b");
        assert_eq!(m, SimpleMatch::matched(0));
        let (m, _) = run(&GrammarNode::NotChar('a'), "a");
        assert_eq!(m, SimpleMatch::failed());
        let (m, _) = run(&GrammarNode::NotChar('a'), "");
        assert_eq!(m, SimpleMatch::failed());
    }

    #[test]
    fn negated_range_consumes_one() {
        let node = GrammarNode::not_range('a', 'z').unwrap();
        let (m, _) = run(&node, "A");
        assert_eq!(m, SimpleMatch::matched(1));
        let (m, _) = run(&node, "m");
        assert_eq!(m, SimpleMatch::failed());
    }

    #[test]
    fn sets_consult_chars_and_child_nodes() {
        let node = GrammarNode::set(['x'], vec![classes::digit()]);
        let (m, _) = run(&node, "x");
        assert_eq!(m, SimpleMatch::matched(1));
        let (m, _) = run(&node, "5");
        assert_eq!(m, SimpleMatch::matched(1));
        let (m, _) = run(&node, "y");
        assert_eq!(m, SimpleMatch::failed());

        let negated = GrammarNode::not_set(['x'], vec![classes::digit()]);
        let (m, _) = run(&negated, "y");
        assert_eq!(m, SimpleMatch::matched(1));
        let (m, _) = run(&negated, "5");
        assert_eq!(m, SimpleMatch::failed());
        let (m, _) = run(&negated, "");
        assert_eq!(m, SimpleMatch::failed());
    }

    #[test]
    fn sequence_adds_lengths() {
        let node = GrammarNode::Char('a').then(GrammarNode::Char('b'));
        let (m, _) = run(&node, "abc");
        assert_eq!(m, SimpleMatch::matched(2));
        let (m, _) = run(&node, "ac");
        assert_eq!(m, SimpleMatch::failed());
    }

    #[test]
    fn alternation_is_left_biased_with_backtracking() {
        let node = GrammarNode::Literal("1a".into()).or(GrammarNode::Literal("12".into()));
        let (m, _) = run(&node, "12");
        assert_eq!(m, SimpleMatch::matched(2));
    }

    #[test]
    fn negated_alternation_asserts_nothing_matches() {
        let node = GrammarNode::not_alt(vec![GrammarNode::Char('a'), GrammarNode::Char('b')]);
        let (m, _) = run(&node, "c");
        assert_eq!(m, SimpleMatch::matched(0));
        let (m, _) = run(&node, "a");
        assert_eq!(m, SimpleMatch::failed());
        // Trivially true with no children, even at end of input.
        let (m, _) = run(&GrammarNode::not_alt(vec![]), "");
        assert_eq!(m, SimpleMatch::matched(0));
    }

    #[test]
    fn greedy_repetition_consumes_maximally() {
        let node = GrammarNode::at_least(GrammarNode::Char('a'), 1);
        let (m, _) = run(&node, "aaa");
        assert_eq!(m, SimpleMatch::matched(3));
        let (m, _) = run(&node, "b");
        assert_eq!(m, SimpleMatch::failed());

        let capped = GrammarNode::repeat(GrammarNode::Char('a'), Some(1), Some(2)).unwrap();
        let (m, _) = run(&capped, "aaaa");
        assert_eq!(m, SimpleMatch::matched(2));
    }

    #[test]
    fn zero_width_repetition_does_not_pump() {
        let inner = GrammarNode::Lookahead(Box::new(GrammarNode::Char('a')));
        let node = GrammarNode::infinite(inner);
        let (m, _) = run(&node, "a");
        assert_eq!(m, SimpleMatch::matched(0));

        let with_min =
            GrammarNode::repeat(
                GrammarNode::Lookahead(Box::new(GrammarNode::Char('a'))),
                Some(3),
                None,
            )
            .unwrap();
        let (m, _) = run(&with_min, "a");
        assert_eq!(m, SimpleMatch::matched(0));
    }

    #[test]
    fn lazy_repetition_is_rejected() {
        let node = GrammarNode::infinite(GrammarNode::Char('a'))
            .into_lazy()
            .unwrap();
        let reader = CodeReader::new("aaa");
        let mut captures = CaptureMap::new();
        assert_eq!(
            match_at(&node, &reader, 0, &mut captures),
            Err(crate::error::EngineError::LazyRepetition)
        );
    }

    #[test]
    fn captures_record_spans() {
        let node = GrammarNode::capture(1, GrammarNode::Literal("ab".into()));
        let (m, captures) = run(&node, "ab");
        assert_eq!(m, SimpleMatch::matched(2));
        assert_eq!(captures.get_numbered(1), Some(Capture::new(0, 2)));
    }

    #[test]
    fn backreference_matches_captured_text() {
        // (?<x>a)b\k<x>b against "abab"
        let node = GrammarNode::named_capture("x", GrammarNode::Char('a'))
            .unwrap()
            .then(GrammarNode::Char('b'))
            .then(GrammarNode::NamedBackreference("x".into()))
            .then(GrammarNode::Char('b'));
        let (m, captures) = run(&node, "abab");
        assert_eq!(m, SimpleMatch::matched(4));
        assert_eq!(captures.get_named("x"), Some(Capture::new(0, 1)));
    }

    #[test]
    fn backreference_fails_on_absent_or_empty_captures() {
        let (m, _) = run(&GrammarNode::Backreference(1), "abc");
        assert_eq!(m, SimpleMatch::failed());

        // Capture of a zero-width assertion records an empty span; the
        // backreference then refuses to match.
        let node = GrammarNode::capture(1, GrammarNode::NotChar('z'))
            .then(GrammarNode::Backreference(1));
        let (m, _) = run(&node, "ab");
        assert_eq!(m, SimpleMatch::failed());
    }

    #[test]
    fn lookaheads_are_zero_width() {
        let node = GrammarNode::Lookahead(Box::new(GrammarNode::Char('x')))
            .then(GrammarNode::Char('x'));
        let (m, _) = run(&node, "x");
        assert_eq!(m, SimpleMatch::matched(1));

        let node = GrammarNode::NotLookahead(Box::new(GrammarNode::Char('x')))
            .then(GrammarNode::Char('y'));
        let (m, _) = run(&node, "y");
        assert_eq!(m, SimpleMatch::matched(1));
    }

    #[test]
    fn lookahead_captures_are_discarded() {
        let node = GrammarNode::Lookahead(Box::new(GrammarNode::capture(
            1,
            GrammarNode::Char('x'),
        )))
        .then(GrammarNode::Char('x'));
        let (m, captures) = run(&node, "x");
        assert_eq!(m, SimpleMatch::matched(1));
        assert!(captures.is_empty());
    }

    #[test]
    fn losing_alternative_captures_are_discarded() {
        let left = GrammarNode::capture(1, GrammarNode::Char('a')).then(GrammarNode::Char('X'));
        let right = GrammarNode::capture(2, GrammarNode::Char('a'));
        let node = left.or(right);
        let (m, captures) = run(&node, "ab");
        assert_eq!(m, SimpleMatch::matched(1));
        assert_eq!(captures.get_numbered(1), None);
        assert_eq!(captures.get_numbered(2), Some(Capture::new(0, 1)));
    }

    #[test]
    fn failed_repetition_discards_iteration_captures() {
        // (?<x>a){2,} against "a": one iteration succeeds, the minimum is
        // unmet, so nothing may survive.
        let inner = GrammarNode::named_capture("x", GrammarNode::Char('a')).unwrap();
        let node = GrammarNode::repeat(inner, Some(2), None).unwrap();
        let reader = CodeReader::new("a");
        let mut captures = CaptureMap::new();
        let m = match_at(&node, &reader, 0, &mut captures).unwrap();
        assert_eq!(m, SimpleMatch::failed());
        assert!(captures.is_empty());
    }

    #[test]
    fn facade_advances_only_on_success() {
        let tree = GrammarNode::Literal("ab".into());
        let mut reader = CodeReader::new("abab");

        let m = simple_match(&mut reader, &tree).unwrap();
        assert_eq!(m, SimpleMatch::matched(2));
        assert_eq!(reader.position(), 2);

        let miss = span_match(&mut reader, &GrammarNode::Char('x')).unwrap();
        assert!(!miss.is_match);
        assert_eq!(reader.position(), 2);

        let hit = string_match(&mut reader, &tree).unwrap();
        assert!(hit.is_match);
        assert_eq!(hit.text, "ab");
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn facade_matches_at_current_position() {
        let mut reader = CodeReader::new("xay");
        reader.advance(1).unwrap();
        let m = span_match(&mut reader, &GrammarNode::Char('a')).unwrap();
        assert!(m.is_match);
        assert_eq!(m.span, TextRange::at(1, 1));
        // Capture offsets are absolute within the buffer.
        let mut reader = CodeReader::new("xay");
        reader.advance(1).unwrap();
        let m = span_match(
            &mut reader,
            &GrammarNode::capture(1, GrammarNode::Char('a')),
        )
        .unwrap();
        assert_eq!(m.captures.get_numbered(1), Some(Capture::new(1, 1)));
    }
}
