//! Visitor dispatch over grammar trees.
//!
//! A [`GrammarVisitor`] has one method per node variant; [`visit`]
//! performs the dispatch with a single `match`. The visitor itself is the
//! accumulator: methods take `&mut self` and return `Self::Output`.
//! Recursion into children is left to the visitor, which keeps traversal
//! order and result combination under its control (the stringifier in
//! [`display`](crate::grammar::display) is the in-tree example).

use crate::grammar::{GrammarNode, UnicodeCategory};
use crate::text::CharRange;

/// One callback per [`GrammarNode`] variant.
pub trait GrammarVisitor {
    type Output;

    fn visit_any(&mut self) -> Self::Output;
    fn visit_char(&mut self, value: char) -> Self::Output;
    fn visit_not_char(&mut self, value: char) -> Self::Output;
    fn visit_literal(&mut self, text: &str) -> Self::Output;
    fn visit_range(&mut self, range: CharRange) -> Self::Output;
    fn visit_not_range(&mut self, range: CharRange) -> Self::Output;
    fn visit_set(&mut self, chars: &[char], nodes: &[GrammarNode]) -> Self::Output;
    fn visit_not_set(&mut self, chars: &[char], nodes: &[GrammarNode]) -> Self::Output;
    fn visit_category(&mut self, category: UnicodeCategory) -> Self::Output;
    fn visit_not_category(&mut self, category: UnicodeCategory) -> Self::Output;
    fn visit_seq(&mut self, nodes: &[GrammarNode]) -> Self::Output;
    fn visit_alt(&mut self, nodes: &[GrammarNode]) -> Self::Output;
    fn visit_not_alt(&mut self, nodes: &[GrammarNode]) -> Self::Output;
    fn visit_repeat(
        &mut self,
        node: &GrammarNode,
        min: Option<u32>,
        max: Option<u32>,
        lazy: bool,
    ) -> Self::Output;
    fn visit_lookahead(&mut self, node: &GrammarNode) -> Self::Output;
    fn visit_not_lookahead(&mut self, node: &GrammarNode) -> Self::Output;
    fn visit_capture(&mut self, index: u32, node: &GrammarNode) -> Self::Output;
    fn visit_named_capture(&mut self, name: &str, node: &GrammarNode) -> Self::Output;
    fn visit_backreference(&mut self, index: u32) -> Self::Output;
    fn visit_named_backreference(&mut self, name: &str) -> Self::Output;
}

/// Dispatch `visitor` on `node`.
pub fn visit<V: GrammarVisitor>(node: &GrammarNode, visitor: &mut V) -> V::Output {
    match node {
        GrammarNode::Any => visitor.visit_any(),
        GrammarNode::Char(value) => visitor.visit_char(*value),
        GrammarNode::NotChar(value) => visitor.visit_not_char(*value),
        GrammarNode::Literal(text) => visitor.visit_literal(text),
        GrammarNode::Range(range) => visitor.visit_range(*range),
        GrammarNode::NotRange(range) => visitor.visit_not_range(*range),
        GrammarNode::Set { chars, nodes } => visitor.visit_set(chars, nodes),
        GrammarNode::NotSet { chars, nodes } => visitor.visit_not_set(chars, nodes),
        GrammarNode::Category(category) => visitor.visit_category(*category),
        GrammarNode::NotCategory(category) => visitor.visit_not_category(*category),
        GrammarNode::Seq(nodes) => visitor.visit_seq(nodes),
        GrammarNode::Alt(nodes) => visitor.visit_alt(nodes),
        GrammarNode::NotAlt(nodes) => visitor.visit_not_alt(nodes),
        GrammarNode::Repeat {
            node,
            min,
            max,
            lazy,
        } => visitor.visit_repeat(node, *min, *max, *lazy),
        GrammarNode::Lookahead(node) => visitor.visit_lookahead(node),
        GrammarNode::NotLookahead(node) => visitor.visit_not_lookahead(node),
        GrammarNode::Capture { index, node } => visitor.visit_capture(*index, node),
        GrammarNode::NamedCapture { name, node } => visitor.visit_named_capture(name, node),
        GrammarNode::Backreference(index) => visitor.visit_backreference(*index),
        GrammarNode::NamedBackreference(name) => visitor.visit_named_backreference(name),
    }
}
