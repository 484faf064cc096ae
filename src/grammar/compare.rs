//! Structural comparison helper for test assertions.
//!
//! `PartialEq` on [`GrammarNode`] is the equality relation; this module
//! adds [`first_difference`], which walks two trees in lockstep and
//! reports the path to the first structural divergence, so a failing
//! assertion names the offending subtree instead of dumping both trees.

use std::fmt::Write as _;

use crate::grammar::GrammarNode;

/// Locate the first structural difference between two trees.
///
/// Returns `None` when the trees are structurally equal, otherwise a
/// human-readable description such as
/// `` `Seq[1]/Repeat`: max Some(3) != Some(5) ``.
#[must_use]
pub fn first_difference(a: &GrammarNode, b: &GrammarNode) -> Option<String> {
    let mut path = String::from("root");
    diff(a, b, &mut path)
}

fn diff(a: &GrammarNode, b: &GrammarNode, path: &mut String) -> Option<String> {
    use GrammarNode as N;

    if a.variant_name() != b.variant_name() {
        return Some(format!(
            "`{path}`: {} != {}",
            a.variant_name(),
            b.variant_name()
        ));
    }

    match (a, b) {
        (N::Any, N::Any) => None,
        (N::Char(x), N::Char(y)) | (N::NotChar(x), N::NotChar(y)) => {
            (x != y).then(|| format!("`{path}`: '{x}' != '{y}'"))
        }
        (N::Literal(x), N::Literal(y)) => {
            (x != y).then(|| format!("`{path}`: {x:?} != {y:?}"))
        }
        (N::Range(x), N::Range(y)) | (N::NotRange(x), N::NotRange(y)) => {
            (x != y).then(|| format!("`{path}`: {x} != {y}"))
        }
        (N::Category(x), N::Category(y)) | (N::NotCategory(x), N::NotCategory(y)) => {
            (x != y).then(|| format!("`{path}`: {} != {}", x.name(), y.name()))
        }
        (
            N::Set {
                chars: ax,
                nodes: an,
            },
            N::Set {
                chars: bx,
                nodes: bn,
            },
        )
        | (
            N::NotSet {
                chars: ax,
                nodes: an,
            },
            N::NotSet {
                chars: bx,
                nodes: bn,
            },
        ) => {
            if ax != bx {
                return Some(format!("`{path}`: members {ax:?} != {bx:?}"));
            }
            diff_children(an, bn, path, a.variant_name())
        }
        (N::Seq(an), N::Seq(bn)) | (N::Alt(an), N::Alt(bn)) | (N::NotAlt(an), N::NotAlt(bn)) => {
            diff_children(an, bn, path, a.variant_name())
        }
        (
            N::Repeat {
                node: an,
                min: amin,
                max: amax,
                lazy: alazy,
            },
            N::Repeat {
                node: bn,
                min: bmin,
                max: bmax,
                lazy: blazy,
            },
        ) => {
            if amin != bmin {
                return Some(format!("`{path}`: min {amin:?} != {bmin:?}"));
            }
            if amax != bmax {
                return Some(format!("`{path}`: max {amax:?} != {bmax:?}"));
            }
            if alazy != blazy {
                return Some(format!("`{path}`: lazy {alazy} != {blazy}"));
            }
            diff_child(an, bn, path, "Repeat")
        }
        (N::Lookahead(an), N::Lookahead(bn)) => diff_child(an, bn, path, "Lookahead"),
        (N::NotLookahead(an), N::NotLookahead(bn)) => diff_child(an, bn, path, "NotLookahead"),
        (
            N::Capture {
                index: ai,
                node: an,
            },
            N::Capture {
                index: bi,
                node: bn,
            },
        ) => {
            if ai != bi {
                return Some(format!("`{path}`: capture index {ai} != {bi}"));
            }
            diff_child(an, bn, path, "Capture")
        }
        (
            N::NamedCapture {
                name: aname,
                node: an,
            },
            N::NamedCapture {
                name: bname,
                node: bn,
            },
        ) => {
            if aname != bname {
                return Some(format!("`{path}`: capture name {aname:?} != {bname:?}"));
            }
            diff_child(an, bn, path, "NamedCapture")
        }
        (N::Backreference(x), N::Backreference(y)) => {
            (x != y).then(|| format!("`{path}`: backreference {x} != {y}"))
        }
        (N::NamedBackreference(x), N::NamedBackreference(y)) => {
            (x != y).then(|| format!("`{path}`: backreference {x:?} != {y:?}"))
        }
        _ => None,
    }
}

fn diff_children(
    a: &[GrammarNode],
    b: &[GrammarNode],
    path: &mut String,
    label: &str,
) -> Option<String> {
    if a.len() != b.len() {
        return Some(format!(
            "`{path}`: {label} child count {} != {}",
            a.len(),
            b.len()
        ));
    }
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        let rollback = path.len();
        let _ = write!(path, "/{label}[{i}]");
        if let Some(found) = diff(x, y, path) {
            return Some(found);
        }
        path.truncate(rollback);
    }
    None
}

fn diff_child(a: &GrammarNode, b: &GrammarNode, path: &mut String, label: &str) -> Option<String> {
    let rollback = path.len();
    let _ = write!(path, "/{label}");
    let found = diff(a, b, path);
    path.truncate(rollback);
    found
}
