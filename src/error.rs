//! # Error Types
//!
//! Error types for grammar construction, regex parsing, matching, and
//! reader cursor misuse.
//!
//! ## Overview
//!
//! Failure comes in two flavours with very different contracts:
//!
//! - **Errors**: malformed grammar trees ([`GrammarError`]), malformed
//!   patterns ([`RegexParseError`]), unsupported constructs reached while
//!   matching ([`EngineError`]), and cursor argument violations
//!   ([`ReaderError`]).
//! - **Match failures**: a tree simply not matching the input. These are
//!   *not* errors; they surface as an `is_match == false` result.
//!
//! [`RegexParseError`] carries both a [`TextRange`] over the offending
//! pattern characters and a canonical human-readable sentence, both of
//! which are stable and asserted by tests.

use thiserror::Error;

use crate::text::TextRange;

/// Crate-level error aggregating every failure domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error(transparent)]
    Parse(#[from] RegexParseError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Reader(#[from] ReaderError),
}

/// Crate-level result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Violations of the grammar-tree construction invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("string terminal must not be empty")]
    EmptyLiteral,

    #[error("character range start '{start}' sorts after end '{end}'")]
    InvalidRange { start: char, end: char },

    #[error("sequence requires at least one node")]
    EmptySequence,

    #[error("alternation requires at least one node")]
    EmptyAlternation,

    #[error("repetition bounds min={min:?} max={max:?} are invalid")]
    InvalidRepetition {
        min: Option<u32>,
        max: Option<u32>,
    },

    #[error("capture name must not be empty")]
    EmptyCaptureName,

    #[error("{variant} has no canonical negation")]
    NotNegatable { variant: &'static str },

    #[error("only repetitions carry a laziness flag")]
    NotRepetition,
}

/// A pattern parse failure with a location and a canonical message.
///
/// The range is inclusive of its start and exclusive of its end, in
/// character offsets of the pattern string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct RegexParseError {
    pub range: TextRange,
    pub kind: RegexParseErrorKind,
}

impl RegexParseError {
    #[must_use]
    pub fn new(range: TextRange, kind: RegexParseErrorKind) -> Self {
        Self { range, kind }
    }

    /// The offending span of the pattern.
    #[must_use]
    pub const fn range(&self) -> TextRange {
        self.range
    }

    /// The canonical message for this failure.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// The individual pattern parse failures and their canonical sentences.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegexParseErrorKind {
    #[error("Invalid escape sequence.")]
    InvalidEscape,

    #[error("Invalid unicode class or code block name: {name}.")]
    InvalidUnicodeCategory { name: String },

    #[error("Unfinished set.")]
    UnfinishedSet,

    #[error("Unrecognized group type.")]
    UnrecognizedGroupType,

    #[error("Unfinished lookahead.")]
    UnfinishedLookahead,

    #[error("Unfinished non-capturing group.")]
    UnfinishedNonCapturingGroup,

    #[error("Invalid backreference.")]
    InvalidBackreference,

    #[error("Expected opening '<' for named backreference.")]
    NamedBackreferenceMissingOpen,

    #[error("Invalid named backreference name.")]
    InvalidNamedBackreferenceName,

    #[error("Expected closing '>' in named backreference.")]
    NamedBackreferenceMissingClose,

    #[error("Expected closing ')' for capture group.")]
    CaptureGroupMissingClose,

    #[error("Invalid named capture group name.")]
    InvalidNamedCaptureName,

    #[error("Expected closing '>' for named capture group name.")]
    NamedCaptureNameMissingClose,

    #[error("Expected closing ')' for named capture group.")]
    NamedCaptureGroupMissingClose,

    #[error("Unsupported anchor.")]
    UnsupportedAnchor,

    #[error("Empty sequence.")]
    EmptySequence,

    #[error("Unexpected closing parenthesis.")]
    UnexpectedClosingParenthesis,

    #[error("Quantifier without target.")]
    QuantifierWithoutTarget,

    #[error("Unfinished repetition.")]
    UnfinishedRepetition,

    #[error("Invalid repetition range.")]
    InvalidRepetitionRange,

    #[error("Invalid character range.")]
    InvalidCharacterRange,
}

/// Unsupported constructs reached while matching a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Lazy repetitions aren't supported yet.")]
    LazyRepetition,
}

/// Cursor argument violations raised by the code reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReaderError {
    #[error("cannot advance {requested} characters with {remaining} remaining")]
    AdvancePastEnd { requested: usize, remaining: usize },

    #[error("span of {length} characters at offset {offset} exceeds the buffer")]
    SpanOutOfBounds { length: usize, offset: usize },

    #[error("position {position} is outside the buffer of length {length}")]
    InvalidPosition { position: usize, length: usize },

    #[error("line and column coordinates are 1-based")]
    InvalidCoordinate,
}
