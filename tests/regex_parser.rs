//! Pattern-to-tree scenarios for the regex front end.

use treegex::grammar::{classes, first_difference, GrammarNode, UnicodeCategory};
use treegex::regex::RegexParser;
use treegex::text::{CharRange, TextRange};

fn parse(pattern: &str) -> GrammarNode {
    RegexParser::parse(pattern).expect(pattern)
}

fn assert_tree(pattern: &str, expected: &GrammarNode) {
    let tree = parse(pattern);
    if let Some(difference) = first_difference(&tree, expected) {
        panic!("{pattern}: {difference}");
    }
}

#[test]
fn literal_character() {
    assert_tree("a", &GrammarNode::Char('a'));
}

#[test]
fn newline_escape() {
    assert_tree("\\n", &GrammarNode::Char('\n'));
}

#[test]
fn hex_escape() {
    assert_tree("\\x0A", &GrammarNode::Char('\x0A'));
    assert_tree("\\x41", &GrammarNode::Char('A'));
}

#[test]
fn character_set() {
    assert_tree("[abc]", &GrammarNode::set(['a', 'b', 'c'], vec![]));
}

#[test]
fn character_range_set() {
    assert_tree(
        "[a-z]",
        &GrammarNode::set([], vec![GrammarNode::Range(CharRange::new('a', 'z').unwrap())]),
    );
}

#[test]
fn negated_class_set() {
    assert_tree(
        "[^\\d\\s]",
        &GrammarNode::not_set([], vec![classes::digit(), classes::whitespace()]),
    );
}

#[test]
fn bracket_as_first_set_item() {
    assert_tree("[]]", &GrammarNode::set([']'], vec![]));
}

#[test]
fn lookaheads() {
    assert_tree(
        "(?=a)",
        &GrammarNode::Lookahead(Box::new(GrammarNode::Char('a'))),
    );
    assert_tree(
        "(?!a)",
        &GrammarNode::NotLookahead(Box::new(GrammarNode::Char('a'))),
    );
}

#[test]
fn named_capture() {
    assert_tree(
        "(?<name>a)",
        &GrammarNode::named_capture("name", GrammarNode::Char('a')).unwrap(),
    );
}

#[test]
fn numbered_capture() {
    assert_tree("(a)", &GrammarNode::capture(1, GrammarNode::Char('a')));
}

#[test]
fn named_backreference() {
    assert_tree("\\k<x>", &GrammarNode::NamedBackreference("x".into()));
}

#[test]
fn numbered_backreference() {
    assert_tree("\\100", &GrammarNode::Backreference(100));
}

#[test]
fn class_escapes() {
    assert_tree("\\d", &classes::digit());
    assert_tree("\\D", &classes::non_digit());
    assert_tree("\\w", &classes::word());
    assert_tree("\\W", &classes::non_word());
    assert_tree("\\s", &classes::whitespace());
    assert_tree("\\S", &classes::non_whitespace());
}

#[test]
fn unicode_category_classes() {
    assert_tree(
        "\\p{Lu}",
        &GrammarNode::Category(UnicodeCategory::UppercaseLetter),
    );
    assert_tree(
        "\\P{Zs}",
        &GrammarNode::NotCategory(UnicodeCategory::SpaceSeparator),
    );
    assert_tree("\\p{L}", &GrammarNode::Category(UnicodeCategory::Letter));
}

#[test]
fn quantified_group_over_alternation() {
    // The non-capturing group is transparent; the repetition wraps the
    // alternation directly.
    let expected = GrammarNode::infinite(GrammarNode::Alt(vec![
        GrammarNode::Char('a').then(GrammarNode::Char('b')),
        GrammarNode::Char('c'),
    ]));
    assert_tree("(?:ab|c)*", &expected);
}

#[test]
fn nested_capture_numbering() {
    let expected = GrammarNode::capture(
        1,
        GrammarNode::capture(2, GrammarNode::Char('a')).then(GrammarNode::capture(
            3,
            GrammarNode::Char('b'),
        )),
    );
    assert_tree("((a)(b))", &expected);
}

#[test]
fn failure_scenarios() {
    let cases: &[(&str, (usize, usize), &str)] = &[
        ("\\b", (0, 2), "Invalid escape sequence."),
        (
            "\\p{Unexistent}",
            (0, 14),
            "Invalid unicode class or code block name: Unexistent.",
        ),
        ("[]", (0, 2), "Unfinished set."),
        ("(?", (0, 2), "Unrecognized group type."),
        ("(?=", (0, 3), "Unfinished lookahead."),
        ("\\1000", (0, 5), "Invalid backreference."),
        ("\\k<a", (0, 4), "Expected closing '>' in named backreference."),
    ];
    for (pattern, (start, end), message) in cases {
        let error = RegexParser::parse(pattern).expect_err(pattern);
        assert_eq!(
            error.range(),
            TextRange::new(*start, *end),
            "range for {pattern:?}"
        );
        assert_eq!(&error.message(), message, "message for {pattern:?}");
    }
}

#[test]
fn further_failure_messages() {
    let cases: &[(&str, &str)] = &[
        ("\\g", "Invalid escape sequence."),
        ("[^]", "Unfinished set."),
        ("(?*", "Unrecognized group type."),
        ("(?!", "Unfinished lookahead."),
        ("(?:", "Unfinished non-capturing group."),
        ("(?:a", "Unfinished non-capturing group."),
        ("(a", "Expected closing ')' for capture group."),
        ("\\k", "Expected opening '<' for named backreference."),
        ("\\k<>", "Invalid named backreference name."),
        ("(?<>a)", "Invalid named capture group name."),
        ("(?<x a)", "Expected closing '>' for named capture group name."),
        ("(?<x>a", "Expected closing ')' for named capture group."),
        ("^", "Unsupported anchor."),
        ("$", "Unsupported anchor."),
        ("+a", "Quantifier without target."),
        ("a)", "Unexpected closing parenthesis."),
        ("", "Empty sequence."),
        ("a|", "Empty sequence."),
    ];
    for (pattern, message) in cases {
        let error = RegexParser::parse(pattern).expect_err(pattern);
        assert_eq!(&error.message(), message, "message for {pattern:?}");
    }
}
