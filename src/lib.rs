//! # Treegex
//!
//! A composable grammar engine: grammar rules as an algebraic tree of
//! nodes, a regex-like front end that compiles into such trees, and a
//! backtracking interpreter that matches them against a seekable
//! character reader.
//!
//! ## Overview
//!
//! - **Grammar trees** ([`grammar`]): an immutable sum type covering
//!   terminals, sets, Unicode categories, sequences, alternations,
//!   greedy repetition, lookarounds, captures, and backreferences, with
//!   structural equality, a visitor surface, and derived operators
//!   (`then`, `or`, `negate`, `repeat`).
//! - **Regex front end** ([`regex`]): compiles a pragmatic regex subset
//!   into grammar trees, reporting typed errors with offset ranges and
//!   canonical messages.
//! - **Interpreter & façade** ([`interp`]): deterministic, left-biased
//!   matching with tentative capture scopes; the façade entry points
//!   consume the matched span from the reader.
//! - **Code reader** ([`reader`]): a cursored character buffer with
//!   peeks, line/column tracking, save/restore, and a cached
//!   cursor-anchored `regex_match`.
//!
//! ## Quick Start
//!
//! ```rust
//! use treegex::interp::string_match;
//! use treegex::reader::CodeReader;
//! use treegex::regex::RegexParser;
//!
//! let tree = RegexParser::parse("(?<key>[a-z]+)=(?<value>\\d+)").unwrap();
//! let mut reader = CodeReader::new("answer=42; rest");
//!
//! let m = string_match(&mut reader, &tree).unwrap();
//! assert!(m.is_match);
//! assert_eq!(m.text, "answer=42");
//!
//! let key = m.captures.get_named("key").unwrap();
//! assert_eq!((key.start, key.length), (0, 6));
//! assert_eq!(reader.position(), 9);
//! ```
//!
//! Trees can equally be composed directly:
//!
//! ```rust
//! use treegex::grammar::{classes, GrammarNode};
//!
//! let number = GrammarNode::at_least(classes::digit(), 1);
//! let signed = GrammarNode::optional(GrammarNode::Char('-')).then(number);
//! assert!(signed.validate().is_ok());
//! ```
//!
//! Matching is a pure function of `(tree, buffer, offset)`; trees are
//! immutable and freely shareable across threads, while each reader is
//! owned by a single matching session.

pub mod error;
pub mod grammar;
pub mod interp;
pub mod reader;
pub mod regex;
pub mod text;

pub use error::{
    EngineError, Error, GrammarError, ReaderError, RegexParseError, RegexParseErrorKind, Result,
};
pub use grammar::{
    first_difference, to_pattern, GrammarNode, GrammarVisitor, UnicodeCategory,
};
pub use interp::{
    match_at, simple_match, simple_match_with, span_match, string_match, Capture, CaptureKey,
    CaptureMap, SimpleMatch, SpanMatch, StringMatch,
};
pub use reader::{CodeReader, Location};
pub use regex::RegexParser;
pub use text::{CharRange, TextRange};
