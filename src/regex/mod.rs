//! # Regex Front End
//!
//! Compiles a regex-like surface syntax into a grammar tree.
//!
//! ## Overview
//!
//! [`RegexParser::parse`] turns a pattern string into a
//! [`GrammarNode`](crate::grammar::GrammarNode) tree. The surface covers
//! literals and escapes, `.`, bracket sets with ranges and class escapes,
//! alternation, the four quantifiers (`?`, `*`, `+`, `{m,n}`), capturing
//! and non-capturing groups, lookaheads, Unicode category classes, and
//! numbered/named backreferences.
//!
//! Failures carry a [`TextRange`](crate::text::TextRange) over the
//! offending pattern characters and a canonical message; see
//! [`RegexParseError`](crate::error::RegexParseError).
//!
//! ## Usage
//!
//! ```rust
//! use treegex::grammar::GrammarNode;
//! use treegex::regex::RegexParser;
//!
//! let tree = RegexParser::parse("(?<word>[a-z]+)").unwrap();
//! assert!(matches!(tree, GrammarNode::NamedCapture { .. }));
//! ```

mod parser;

pub use parser::RegexParser;
