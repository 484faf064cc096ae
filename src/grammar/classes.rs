//! Character-class catalogue.
//!
//! Canonical grammar nodes for the shorthand classes (`\d`, `\w`, `\s` and
//! their negations) plus the [`UnicodeCategory`] type backing `\p{…}` /
//! `\P{…}`. The regex front end resolves class escapes against this
//! catalogue, and the stringifier recognizes these exact nodes when
//! rendering a tree back to pattern text.

use smallvec::smallvec;
use unicode_general_category::{get_general_category, GeneralCategory};

use crate::grammar::GrammarNode;
use crate::text::CharRange;

/// `\d`: the decimal digits `[0-9]`.
#[must_use]
pub fn digit() -> GrammarNode {
    GrammarNode::Range(CharRange::of('0', '9'))
}

/// `\D`: any character outside `[0-9]`.
#[must_use]
pub fn non_digit() -> GrammarNode {
    GrammarNode::NotRange(CharRange::of('0', '9'))
}

fn word_ranges() -> Vec<GrammarNode> {
    vec![
        GrammarNode::Range(CharRange::of('A', 'Z')),
        GrammarNode::Range(CharRange::of('a', 'z')),
        GrammarNode::Range(CharRange::of('0', '9')),
    ]
}

/// `\w`: word characters `[A-Za-z0-9_]`.
#[must_use]
pub fn word() -> GrammarNode {
    GrammarNode::Set {
        chars: smallvec!['_'],
        nodes: word_ranges(),
    }
}

/// `\W`: any character outside `[A-Za-z0-9_]`.
#[must_use]
pub fn non_word() -> GrammarNode {
    GrammarNode::NotSet {
        chars: smallvec!['_'],
        nodes: word_ranges(),
    }
}

const WHITESPACE: [char; 6] = [' ', '\t', '\n', '\r', '\x0C', '\x0B'];

/// `\s`: the whitespace characters `[ \t\n\r\f\v]`.
#[must_use]
pub fn whitespace() -> GrammarNode {
    GrammarNode::set(WHITESPACE, Vec::new())
}

/// `\S`: any character outside `[ \t\n\r\f\v]`.
#[must_use]
pub fn non_whitespace() -> GrammarNode {
    GrammarNode::not_set(WHITESPACE, Vec::new())
}

/// A Unicode general category, either one of the thirty two-letter
/// categories or one of the seven one-letter aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnicodeCategory {
    UppercaseLetter,
    LowercaseLetter,
    TitlecaseLetter,
    ModifierLetter,
    OtherLetter,
    NonspacingMark,
    SpacingMark,
    EnclosingMark,
    DecimalNumber,
    LetterNumber,
    OtherNumber,
    ConnectorPunctuation,
    DashPunctuation,
    OpenPunctuation,
    ClosePunctuation,
    InitialPunctuation,
    FinalPunctuation,
    OtherPunctuation,
    MathSymbol,
    CurrencySymbol,
    ModifierSymbol,
    OtherSymbol,
    SpaceSeparator,
    LineSeparator,
    ParagraphSeparator,
    Control,
    Format,
    Surrogate,
    PrivateUse,
    Unassigned,
    /// Aggregate `L`: any letter.
    Letter,
    /// Aggregate `M`: any mark.
    Mark,
    /// Aggregate `N`: any number.
    Number,
    /// Aggregate `P`: any punctuation.
    Punctuation,
    /// Aggregate `S`: any symbol.
    Symbol,
    /// Aggregate `Z`: any separator.
    Separator,
    /// Aggregate `C`: any control/format/unassigned character.
    Other,
}

impl UnicodeCategory {
    /// Resolve a published category name (`"Lu"`, `"Nd"`, `"L"`, …).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Lu" => Self::UppercaseLetter,
            "Ll" => Self::LowercaseLetter,
            "Lt" => Self::TitlecaseLetter,
            "Lm" => Self::ModifierLetter,
            "Lo" => Self::OtherLetter,
            "Mn" => Self::NonspacingMark,
            "Mc" => Self::SpacingMark,
            "Me" => Self::EnclosingMark,
            "Nd" => Self::DecimalNumber,
            "Nl" => Self::LetterNumber,
            "No" => Self::OtherNumber,
            "Pc" => Self::ConnectorPunctuation,
            "Pd" => Self::DashPunctuation,
            "Ps" => Self::OpenPunctuation,
            "Pe" => Self::ClosePunctuation,
            "Pi" => Self::InitialPunctuation,
            "Pf" => Self::FinalPunctuation,
            "Po" => Self::OtherPunctuation,
            "Sm" => Self::MathSymbol,
            "Sc" => Self::CurrencySymbol,
            "Sk" => Self::ModifierSymbol,
            "So" => Self::OtherSymbol,
            "Zs" => Self::SpaceSeparator,
            "Zl" => Self::LineSeparator,
            "Zp" => Self::ParagraphSeparator,
            "Cc" => Self::Control,
            "Cf" => Self::Format,
            "Cs" => Self::Surrogate,
            "Co" => Self::PrivateUse,
            "Cn" => Self::Unassigned,
            "L" => Self::Letter,
            "M" => Self::Mark,
            "N" => Self::Number,
            "P" => Self::Punctuation,
            "S" => Self::Symbol,
            "Z" => Self::Separator,
            "C" => Self::Other,
            _ => return None,
        })
    }

    /// The published name of this category.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UppercaseLetter => "Lu",
            Self::LowercaseLetter => "Ll",
            Self::TitlecaseLetter => "Lt",
            Self::ModifierLetter => "Lm",
            Self::OtherLetter => "Lo",
            Self::NonspacingMark => "Mn",
            Self::SpacingMark => "Mc",
            Self::EnclosingMark => "Me",
            Self::DecimalNumber => "Nd",
            Self::LetterNumber => "Nl",
            Self::OtherNumber => "No",
            Self::ConnectorPunctuation => "Pc",
            Self::DashPunctuation => "Pd",
            Self::OpenPunctuation => "Ps",
            Self::ClosePunctuation => "Pe",
            Self::InitialPunctuation => "Pi",
            Self::FinalPunctuation => "Pf",
            Self::OtherPunctuation => "Po",
            Self::MathSymbol => "Sm",
            Self::CurrencySymbol => "Sc",
            Self::ModifierSymbol => "Sk",
            Self::OtherSymbol => "So",
            Self::SpaceSeparator => "Zs",
            Self::LineSeparator => "Zl",
            Self::ParagraphSeparator => "Zp",
            Self::Control => "Cc",
            Self::Format => "Cf",
            Self::Surrogate => "Cs",
            Self::PrivateUse => "Co",
            Self::Unassigned => "Cn",
            Self::Letter => "L",
            Self::Mark => "M",
            Self::Number => "N",
            Self::Punctuation => "P",
            Self::Symbol => "S",
            Self::Separator => "Z",
            Self::Other => "C",
        }
    }

    /// Check whether `c` belongs to this category.
    #[must_use]
    pub fn contains(self, c: char) -> bool {
        let category = get_general_category(c);
        match self {
            Self::UppercaseLetter => category == GeneralCategory::UppercaseLetter,
            Self::LowercaseLetter => category == GeneralCategory::LowercaseLetter,
            Self::TitlecaseLetter => category == GeneralCategory::TitlecaseLetter,
            Self::ModifierLetter => category == GeneralCategory::ModifierLetter,
            Self::OtherLetter => category == GeneralCategory::OtherLetter,
            Self::NonspacingMark => category == GeneralCategory::NonspacingMark,
            Self::SpacingMark => category == GeneralCategory::SpacingMark,
            Self::EnclosingMark => category == GeneralCategory::EnclosingMark,
            Self::DecimalNumber => category == GeneralCategory::DecimalNumber,
            Self::LetterNumber => category == GeneralCategory::LetterNumber,
            Self::OtherNumber => category == GeneralCategory::OtherNumber,
            Self::ConnectorPunctuation => category == GeneralCategory::ConnectorPunctuation,
            Self::DashPunctuation => category == GeneralCategory::DashPunctuation,
            Self::OpenPunctuation => category == GeneralCategory::OpenPunctuation,
            Self::ClosePunctuation => category == GeneralCategory::ClosePunctuation,
            Self::InitialPunctuation => category == GeneralCategory::InitialPunctuation,
            Self::FinalPunctuation => category == GeneralCategory::FinalPunctuation,
            Self::OtherPunctuation => category == GeneralCategory::OtherPunctuation,
            Self::MathSymbol => category == GeneralCategory::MathSymbol,
            Self::CurrencySymbol => category == GeneralCategory::CurrencySymbol,
            Self::ModifierSymbol => category == GeneralCategory::ModifierSymbol,
            Self::OtherSymbol => category == GeneralCategory::OtherSymbol,
            Self::SpaceSeparator => category == GeneralCategory::SpaceSeparator,
            Self::LineSeparator => category == GeneralCategory::LineSeparator,
            Self::ParagraphSeparator => category == GeneralCategory::ParagraphSeparator,
            Self::Control => category == GeneralCategory::Control,
            Self::Format => category == GeneralCategory::Format,
            Self::Surrogate => category == GeneralCategory::Surrogate,
            Self::PrivateUse => category == GeneralCategory::PrivateUse,
            Self::Unassigned => category == GeneralCategory::Unassigned,
            Self::Letter => matches!(
                category,
                GeneralCategory::UppercaseLetter
                    | GeneralCategory::LowercaseLetter
                    | GeneralCategory::TitlecaseLetter
                    | GeneralCategory::ModifierLetter
                    | GeneralCategory::OtherLetter
            ),
            Self::Mark => matches!(
                category,
                GeneralCategory::NonspacingMark
                    | GeneralCategory::SpacingMark
                    | GeneralCategory::EnclosingMark
            ),
            Self::Number => matches!(
                category,
                GeneralCategory::DecimalNumber
                    | GeneralCategory::LetterNumber
                    | GeneralCategory::OtherNumber
            ),
            Self::Punctuation => matches!(
                category,
                GeneralCategory::ConnectorPunctuation
                    | GeneralCategory::DashPunctuation
                    | GeneralCategory::OpenPunctuation
                    | GeneralCategory::ClosePunctuation
                    | GeneralCategory::InitialPunctuation
                    | GeneralCategory::FinalPunctuation
                    | GeneralCategory::OtherPunctuation
            ),
            Self::Symbol => matches!(
                category,
                GeneralCategory::MathSymbol
                    | GeneralCategory::CurrencySymbol
                    | GeneralCategory::ModifierSymbol
                    | GeneralCategory::OtherSymbol
            ),
            Self::Separator => matches!(
                category,
                GeneralCategory::SpaceSeparator
                    | GeneralCategory::LineSeparator
                    | GeneralCategory::ParagraphSeparator
            ),
            Self::Other => matches!(
                category,
                GeneralCategory::Control
                    | GeneralCategory::Format
                    | GeneralCategory::Surrogate
                    | GeneralCategory::PrivateUse
                    | GeneralCategory::Unassigned
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_matches_decimal_digits() {
        let node = digit();
        match node {
            GrammarNode::Range(range) => {
                assert!(range.contains('0'));
                assert!(range.contains('9'));
                assert!(!range.contains('a'));
            }
            other => panic!("expected range, got {other:?}"),
        }
    }

    #[test]
    fn word_covers_letters_digits_underscore() {
        let GrammarNode::Set { chars, nodes } = word() else {
            panic!("expected set");
        };
        assert_eq!(chars.as_slice(), ['_']);
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn whitespace_chars_are_sorted_set_members() {
        let GrammarNode::Set { chars, nodes } = whitespace() else {
            panic!("expected set");
        };
        assert!(chars.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(chars.contains(&' '));
        assert!(chars.contains(&'\x0B'));
        assert!(nodes.is_empty());
    }

    #[test]
    fn category_names_round_trip() {
        for name in [
            "Lu", "Ll", "Lt", "Lm", "Lo", "Mn", "Mc", "Me", "Nd", "Nl", "No", "Pc", "Pd", "Ps",
            "Pe", "Pi", "Pf", "Po", "Sm", "Sc", "Sk", "So", "Zs", "Zl", "Zp", "Cc", "Cf", "Cs",
            "Co", "Cn", "L", "M", "N", "P", "S", "Z", "C",
        ] {
            let category = UnicodeCategory::from_name(name).expect(name);
            assert_eq!(category.name(), name);
        }
        assert_eq!(UnicodeCategory::from_name("Unexistent"), None);
        assert_eq!(UnicodeCategory::from_name(""), None);
    }

    #[test]
    fn categories_classify_characters() {
        assert!(UnicodeCategory::UppercaseLetter.contains('A'));
        assert!(!UnicodeCategory::UppercaseLetter.contains('a'));
        assert!(UnicodeCategory::DecimalNumber.contains('7'));
        assert!(UnicodeCategory::Letter.contains('a'));
        assert!(UnicodeCategory::Letter.contains('Z'));
        assert!(!UnicodeCategory::Letter.contains('1'));
        assert!(UnicodeCategory::Separator.contains(' '));
        assert!(UnicodeCategory::Other.contains('\u{0007}'));
    }
}
