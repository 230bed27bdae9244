//! Keeps the binder aligned with the parser.
//!
//! The parser records every scope it keeps in the order it entered them. The binder walks the same
//! tree again and must enter scopes of the same kinds at the same source offsets in the same order.
//! A mismatch means the two passes disagree about the tree's structure, which is a bug, so it panics.

use crate::scope::ScopeId;
use crate::scope::ScopeKind;
use serde::Serialize;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct ScopeOrderEntry {
  pub loc: usize,
  pub kind: ScopeKind,
  pub scope: ScopeId,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ScopeOrder {
  entries: Vec<ScopeOrderEntry>,
}

impl ScopeOrder {
  pub fn new() -> ScopeOrder {
    ScopeOrder::default()
  }

  /// Returns the index of the new entry.
  pub fn push(&mut self, loc: usize, kind: ScopeKind, scope: ScopeId) -> usize {
    if let Some(prev) = self.entries.last() {
      assert!(
        prev.loc < loc,
        "scope entered at {} must come after the previous scope at {}",
        loc,
        prev.loc
      );
    };
    self.entries.push(ScopeOrderEntry { loc, kind, scope });
    self.entries.len() - 1
  }

  pub fn get(&self, index: usize) -> Option<ScopeOrderEntry> {
    self.entries.get(index).copied()
  }

  pub fn remove(&mut self, index: usize) -> ScopeOrderEntry {
    self.entries.remove(index)
  }

  pub fn truncate(&mut self, len: usize) {
    self.entries.truncate(len);
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn entries(&self) -> &[ScopeOrderEntry] {
    &self.entries
  }

  pub fn into_replay(self) -> ScopeReplay {
    ScopeReplay {
      entries: self.entries,
      next: 0,
    }
  }
}

/// Pass 2 view of the scope order.
#[derive(Debug)]
pub struct ScopeReplay {
  entries: Vec<ScopeOrderEntry>,
  next: usize,
}

impl ScopeReplay {
  /// Takes the next scope, which must have been entered at `loc` as a `kind` scope during parsing.
  pub fn dequeue(&mut self, loc: usize, kind: ScopeKind) -> ScopeId {
    let Some(entry) = self.entries.get(self.next) else {
      panic!("binder entered a scope at {} but the parser recorded no more scopes", loc);
    };
    if entry.loc != loc {
      panic!(
        "binder entered a scope at {} but the parser recorded the next scope at {}",
        loc, entry.loc
      );
    };
    if entry.kind != kind {
      panic!(
        "binder entered a {:?} scope at {} but the parser recorded a {:?} scope there",
        kind, loc, entry.kind
      );
    };
    self.next += 1;
    entry.scope
  }

  pub fn remaining(&self) -> usize {
    self.entries.len() - self.next
  }

  pub fn is_done(&self) -> bool {
    self.remaining() == 0
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::scope::ScopeKind;
  use crate::scope::ScopeTree;

  #[test]
  fn replays_in_recorded_order() {
    let mut tree = ScopeTree::new();
    let mut order = ScopeOrder::new();
    let a = tree.create(ScopeKind::Block, 3);
    order.push(3, ScopeKind::Block, a);
    let b = tree.create(ScopeKind::Label, 8);
    order.push(8, ScopeKind::Label, b);
    let mut replay = order.into_replay();
    assert_eq!(replay.dequeue(3, ScopeKind::Block), a);
    assert_eq!(replay.dequeue(8, ScopeKind::Label), b);
    assert!(replay.is_done());
  }

  #[test]
  #[should_panic(expected = "recorded the next scope at 3")]
  fn mismatch_panics() {
    let mut tree = ScopeTree::new();
    let mut order = ScopeOrder::new();
    let a = tree.create(ScopeKind::Block, 3);
    order.push(3, ScopeKind::Block, a);
    order.into_replay().dequeue(4, ScopeKind::Block);
  }

  #[test]
  #[should_panic(expected = "recorded a With scope there")]
  fn kind_mismatch_panics() {
    let mut tree = ScopeTree::new();
    let mut order = ScopeOrder::new();
    let a = tree.create(ScopeKind::With, 3);
    order.push(3, ScopeKind::With, a);
    order.into_replay().dequeue(3, ScopeKind::Block);
  }

  #[test]
  #[should_panic(expected = "must come after")]
  fn locations_must_increase() {
    let mut tree = ScopeTree::new();
    let mut order = ScopeOrder::new();
    let a = tree.create(ScopeKind::Block, 3);
    order.push(3, ScopeKind::Block, a);
    order.push(3, ScopeKind::Block, a);
  }
}
