//! Rendering grammar trees back to pattern text.
//!
//! [`to_pattern`] emits a regex-like form of a tree, used in diagnostics
//! and round-trip tests. Rendering recognizes the canonical catalogue
//! nodes (`\d`, `\w`, `\s`, negations) and renders them as their escapes,
//! so trees produced by the pattern parser reparse to structurally equal
//! trees, modulo the documented normalizations (singleton sequences and
//! alternations collapse; set members sort; an absent repetition minimum
//! reparses as the equivalent explicit zero).

use std::fmt::Write as _;

use crate::grammar::{classes, visit, GrammarNode, GrammarVisitor, UnicodeCategory};
use crate::text::CharRange;

/// Render `node` as pattern text.
#[must_use]
pub fn to_pattern(node: &GrammarNode) -> String {
    let mut writer = PatternWriter { out: String::new() };
    writer.write_node(node);
    writer.out
}

struct PatternWriter {
    out: String,
}

impl PatternWriter {
    fn write_node(&mut self, node: &GrammarNode) {
        if let Some(escape) = catalogue_escape(node) {
            self.out.push_str(escape);
        } else {
            visit(node, self);
        }
    }

    /// Render a node in a position where a quantifier or neighbour
    /// follows, grouping it when its rendering would not bind as one atom.
    fn write_atom(&mut self, node: &GrammarNode) {
        if needs_group(node) {
            self.out.push_str("(?:");
            self.write_node(node);
            self.out.push(')');
        } else {
            self.write_node(node);
        }
    }

    fn write_pattern_char(&mut self, c: char) {
        match c {
            '.' | '$' | '^' | '{' | '[' | '(' | '|' | ')' | '*' | '+' | '?' | '\\' => {
                self.out.push('\\');
                self.out.push(c);
            }
            _ => self.write_plain_char(c),
        }
    }

    fn write_set_char(&mut self, c: char) {
        match c {
            // '^' could read as negation and '\\' as an escape lead-in.
            '^' | '\\' => {
                self.out.push('\\');
                self.out.push(c);
            }
            _ => self.write_plain_char(c),
        }
    }

    fn write_plain_char(&mut self, c: char) {
        match c {
            '\x07' => self.out.push_str("\\a"),
            '\x0C' => self.out.push_str("\\f"),
            '\n' => self.out.push_str("\\n"),
            '\r' => self.out.push_str("\\r"),
            '\t' => self.out.push_str("\\t"),
            '\x0B' => self.out.push_str("\\v"),
            c if (c as u32) < 0x20 => {
                let _ = write!(self.out, "\\x{:02X}", c as u32);
            }
            c => self.out.push(c),
        }
    }

    fn write_set_body(&mut self, chars: &[char], nodes: &[GrammarNode]) {
        // ']' is only expressible as the first item, '-' only as the last.
        if chars.contains(&']') {
            self.out.push(']');
        }
        for &c in chars {
            if c != ']' && c != '-' {
                self.write_set_char(c);
            }
        }
        for node in nodes {
            self.write_set_member(node);
        }
        if chars.contains(&'-') {
            self.out.push('-');
        }
    }

    fn write_set_member(&mut self, node: &GrammarNode) {
        if let Some(escape) = catalogue_escape(node) {
            self.out.push_str(escape);
            return;
        }
        match node {
            GrammarNode::Range(range) => {
                self.write_set_char(range.start());
                self.out.push('-');
                self.write_set_char(range.end());
            }
            GrammarNode::Category(category) => {
                let _ = write!(self.out, "\\p{{{}}}", category.name());
            }
            GrammarNode::NotCategory(category) => {
                let _ = write!(self.out, "\\P{{{}}}", category.name());
            }
            GrammarNode::Set { chars, nodes } => self.write_set_body(chars, nodes),
            // Not expressible inside a bracket group; emit the standalone
            // form as a best-effort diagnostic rendering.
            other => self.write_node(other),
        }
    }

    fn write_quantifier(&mut self, min: Option<u32>, max: Option<u32>, lazy: bool) {
        match (min, max) {
            (None, Some(1)) => self.out.push('?'),
            (None, None) => self.out.push('*'),
            (Some(1), None) => self.out.push('+'),
            (Some(n), None) => {
                let _ = write!(self.out, "{{{n},}}");
            }
            (Some(n), Some(m)) if n == m => {
                let _ = write!(self.out, "{{{n}}}");
            }
            (min, Some(m)) => {
                let _ = write!(self.out, "{{{},{m}}}", min.unwrap_or(0));
            }
        }
        if lazy {
            self.out.push('?');
        }
    }
}

impl GrammarVisitor for PatternWriter {
    type Output = ();

    fn visit_any(&mut self) {
        self.out.push('.');
    }

    fn visit_char(&mut self, value: char) {
        self.write_pattern_char(value);
    }

    fn visit_not_char(&mut self, value: char) {
        self.out.push_str("[^");
        self.write_set_char(value);
        self.out.push(']');
    }

    fn visit_literal(&mut self, text: &str) {
        for c in text.chars() {
            self.write_pattern_char(c);
        }
    }

    fn visit_range(&mut self, range: CharRange) {
        self.out.push('[');
        self.write_set_char(range.start());
        self.out.push('-');
        self.write_set_char(range.end());
        self.out.push(']');
    }

    fn visit_not_range(&mut self, range: CharRange) {
        self.out.push_str("[^");
        self.write_set_char(range.start());
        self.out.push('-');
        self.write_set_char(range.end());
        self.out.push(']');
    }

    fn visit_set(&mut self, chars: &[char], nodes: &[GrammarNode]) {
        self.out.push('[');
        self.write_set_body(chars, nodes);
        self.out.push(']');
    }

    fn visit_not_set(&mut self, chars: &[char], nodes: &[GrammarNode]) {
        self.out.push_str("[^");
        self.write_set_body(chars, nodes);
        self.out.push(']');
    }

    fn visit_category(&mut self, category: UnicodeCategory) {
        let _ = write!(self.out, "\\p{{{}}}", category.name());
    }

    fn visit_not_category(&mut self, category: UnicodeCategory) {
        let _ = write!(self.out, "\\P{{{}}}", category.name());
    }

    fn visit_seq(&mut self, nodes: &[GrammarNode]) {
        for node in nodes {
            if matches!(node, GrammarNode::Alt(_)) {
                self.out.push_str("(?:");
                self.write_node(node);
                self.out.push(')');
            } else {
                self.write_node(node);
            }
        }
    }

    fn visit_alt(&mut self, nodes: &[GrammarNode]) {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.out.push('|');
            }
            self.write_node(node);
        }
    }

    fn visit_not_alt(&mut self, nodes: &[GrammarNode]) {
        self.out.push_str("(?!");
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.out.push('|');
            }
            self.write_node(node);
        }
        self.out.push(')');
    }

    fn visit_repeat(&mut self, node: &GrammarNode, min: Option<u32>, max: Option<u32>, lazy: bool) {
        self.write_atom(node);
        self.write_quantifier(min, max, lazy);
    }

    fn visit_lookahead(&mut self, node: &GrammarNode) {
        self.out.push_str("(?=");
        self.write_node(node);
        self.out.push(')');
    }

    fn visit_not_lookahead(&mut self, node: &GrammarNode) {
        self.out.push_str("(?!");
        self.write_node(node);
        self.out.push(')');
    }

    fn visit_capture(&mut self, _index: u32, node: &GrammarNode) {
        self.out.push('(');
        self.write_node(node);
        self.out.push(')');
    }

    fn visit_named_capture(&mut self, name: &str, node: &GrammarNode) {
        let _ = write!(self.out, "(?<{name}>");
        self.write_node(node);
        self.out.push(')');
    }

    fn visit_backreference(&mut self, index: u32) {
        let _ = write!(self.out, "\\{index}");
    }

    fn visit_named_backreference(&mut self, name: &str) {
        let _ = write!(self.out, "\\k<{name}>");
    }
}

fn needs_group(node: &GrammarNode) -> bool {
    match node {
        GrammarNode::Seq(_) | GrammarNode::Alt(_) | GrammarNode::Repeat { .. } => true,
        GrammarNode::Literal(text) => text.chars().count() > 1,
        _ => false,
    }
}

fn catalogue_escape(node: &GrammarNode) -> Option<&'static str> {
    if *node == classes::digit() {
        Some("\\d")
    } else if *node == classes::non_digit() {
        Some("\\D")
    } else if *node == classes::word() {
        Some("\\w")
    } else if *node == classes::non_word() {
        Some("\\W")
    } else if *node == classes::whitespace() {
        Some("\\s")
    } else if *node == classes::non_whitespace() {
        Some("\\S")
    } else {
        None
    }
}
