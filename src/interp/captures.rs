//! Capture table and tentative scopes.
//!
//! Captures are keyed by [`CaptureKey`]: numbered keys for positional
//! groups, named keys for `(?<name>…)` groups. The two namespaces are
//! disjoint by type; `Display` renders numbered keys as `⟨N⟩`.
//!
//! A [`CaptureMap`] supports forking into a tentative scope and
//! committing that scope back, which is the whole backtracking story for
//! captures: a node that can still fail runs its children against a fork
//! and commits only on success, so a discarded attempt never leaks
//! entries into the surviving table.

use std::fmt;

use compact_str::CompactString;
use hashbrown::HashMap;

/// Key of a capture-table entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CaptureKey {
    /// A positional capture group, numbered from 1 in pattern order.
    Numbered(u32),
    /// A named capture group.
    Named(CompactString),
}

impl CaptureKey {
    #[must_use]
    pub fn named(name: impl Into<CompactString>) -> Self {
        Self::Named(name.into())
    }
}

impl fmt::Display for CaptureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numbered(index) => write!(f, "\u{27E8}{index}\u{27E9}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// A recorded sub-match: where it started and how many characters it
/// covers, in absolute buffer offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    pub start: usize,
    pub length: usize,
}

impl Capture {
    #[must_use]
    pub const fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    #[must_use]
    pub const fn end(self) -> usize {
        self.start + self.length
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.length == 0
    }
}

/// The capture table of one match run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureMap {
    entries: HashMap<CaptureKey, Capture, ahash::RandomState>,
}

impl CaptureMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &CaptureKey) -> Option<Capture> {
        self.entries.get(key).copied()
    }

    #[must_use]
    pub fn get_numbered(&self, index: u32) -> Option<Capture> {
        self.get(&CaptureKey::Numbered(index))
    }

    #[must_use]
    pub fn get_named(&self, name: &str) -> Option<Capture> {
        self.get(&CaptureKey::Named(CompactString::new(name)))
    }

    /// Record a capture, replacing any previous entry under the key.
    pub fn insert(&mut self, key: CaptureKey, capture: Capture) -> Option<Capture> {
        self.entries.insert(key, capture)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CaptureKey, &Capture)> {
        self.entries.iter()
    }

    /// Open a tentative scope: a full copy the caller may mutate freely.
    #[must_use]
    pub(crate) fn fork(&self) -> Self {
        self.clone()
    }

    /// Merge a successful tentative scope back. The scope started as a
    /// full copy, so the merge is wholesale replacement.
    pub(crate) fn commit(&mut self, scope: Self) {
        self.entries = scope.entries;
    }
}
