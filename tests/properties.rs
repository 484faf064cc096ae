//! Property-based tests for the matching engine.
//!
//! These generate random inputs and verify the universal laws: greedy
//! maximality, sequence additivity, alternation left bias, and match
//! lengths bounded by the remaining input.

use proptest::prelude::*;

use treegex::grammar::GrammarNode;
use treegex::interp::{match_at, CaptureMap};
use treegex::reader::CodeReader;

fn small_text() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[abc]{0,12}").expect("valid generator")
}

proptest! {
    #[test]
    fn peek_is_idempotent(text in small_text(), offset in 0usize..16) {
        let reader = CodeReader::new(&text);
        let first = reader.peek_at(offset);
        let second = reader.peek_at(offset);
        prop_assert_eq!(first, second);
        prop_assert_eq!(reader.position(), 0);
    }

    #[test]
    fn greedy_repetition_is_maximal(
        available in 0u32..10,
        min in 0u32..5,
        max in 1u32..8,
    ) {
        prop_assume!(min <= max);
        let input: String = "a".repeat(available as usize);
        let reader = CodeReader::new(&input);
        let tree = GrammarNode::repeat(GrammarNode::Char('a'), Some(min), Some(max))
            .expect("bounds are valid");
        let mut captures = CaptureMap::new();
        let m = match_at(&tree, &reader, 0, &mut captures).expect("no engine error");

        let expected = available.min(max);
        if expected >= min {
            prop_assert!(m.is_match);
            prop_assert_eq!(m.length, expected as usize);
        } else {
            prop_assert!(!m.is_match);
        }
    }

    #[test]
    fn sequence_length_is_additive(a in "[ab]{1,6}", b in "[ab]{1,6}", suffix in small_text()) {
        let input = format!("{a}{b}{suffix}");
        let reader = CodeReader::new(&input);
        let tree = GrammarNode::literal(a.clone())
            .expect("non-empty")
            .then(GrammarNode::literal(b.clone()).expect("non-empty"));
        let mut captures = CaptureMap::new();
        let m = match_at(&tree, &reader, 0, &mut captures).expect("no engine error");
        prop_assert!(m.is_match);
        prop_assert_eq!(m.length, a.chars().count() + b.chars().count());
    }

    #[test]
    fn alternation_is_left_biased(a in "[ab]{1,4}", b in "[ab]{1,4}", input in small_text()) {
        let reader = CodeReader::new(&input);
        let left = GrammarNode::literal(a).expect("non-empty");
        let right = GrammarNode::literal(b).expect("non-empty");
        let alt = left.clone().or(right);

        let mut captures = CaptureMap::new();
        let left_alone = match_at(&left, &reader, 0, &mut captures).expect("no engine error");
        let combined = match_at(&alt, &reader, 0, &mut captures).expect("no engine error");

        if left_alone.is_match {
            prop_assert_eq!(combined, left_alone);
        }
    }

    #[test]
    fn match_length_never_exceeds_remaining(
        input in small_text(),
        offset in 0usize..16,
        pattern in prop::sample::select(vec![".*", "a*", "[abc]+", "a|b|c", "(?:ab)*"]),
    ) {
        let tree = treegex::regex::RegexParser::parse(pattern).expect("pattern parses");
        let reader = CodeReader::new(&input);
        let mut captures = CaptureMap::new();
        let m = match_at(&tree, &reader, offset, &mut captures).expect("no engine error");
        if m.is_match {
            let remaining = reader.len().saturating_sub(offset);
            prop_assert!(m.length <= remaining);
        }
    }

    #[test]
    fn captures_stay_inside_the_match(input in "[ab]{2,10}") {
        let tree = treegex::regex::RegexParser::parse("(a|b)([ab]*)").expect("pattern parses");
        let reader = CodeReader::new(&input);
        let mut captures = CaptureMap::new();
        let m = match_at(&tree, &reader, 0, &mut captures).expect("no engine error");
        prop_assert!(m.is_match);
        for (_, capture) in captures.iter() {
            prop_assert!(capture.start + capture.length <= m.length);
        }
    }
}
