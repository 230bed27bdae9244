use crate::loc::Loc;
use serde::Serialize;
use std::ops::Index;
use std::ops::IndexMut;

/// Stable handle to a symbol. The AST holds these instead of symbols so that symbol identity survives
/// rewriting the tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize)]
pub struct SymbolRef {
  pub source_index: u32,
  pub inner_index: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum SymbolKind {
  // A free reference to a global, implicitly declared in the module scope.
  Unbound,
  // `var` and parameters.
  Hoisted,
  HoistedFunction,
  CatchIdentifier,
  Arguments,
  Class,
  Const,
  Import,
  Label,
  TsEnum,
  TsNamespace,
  PrivateField,
  PrivateMethod,
  PrivateGet,
  PrivateSet,
  PrivateGetSetPair,
  // Temporaries introduced by lowering.
  Generated,
  // `let`, enum members, and everything else block scoped.
  Other,
}

impl SymbolKind {
  pub fn is_hoisted(self) -> bool {
    matches!(self, SymbolKind::Hoisted | SymbolKind::HoistedFunction)
  }

  pub fn is_private(self) -> bool {
    matches!(
      self,
      SymbolKind::PrivateField
        | SymbolKind::PrivateMethod
        | SymbolKind::PrivateGet
        | SymbolKind::PrivateSet
        | SymbolKind::PrivateGetSetPair
    )
  }
}

/// For a member of a TypeScript namespace or enum, the property it is stored as at runtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NamespaceAlias {
  pub namespace_ref: SymbolRef,
  pub alias: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Symbol {
  pub kind: SymbolKind,
  pub original_name: String,
  pub loc: Loc,
  // Set when this symbol was merged into another one. Follow with `SymbolTable::follow`.
  pub link: Option<SymbolRef>,
  pub use_count_estimate: u32,
  pub must_not_be_renamed: bool,
  pub import_record_index: Option<u32>,
  pub namespace_alias: Option<NamespaceAlias>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SymbolTable {
  source_index: u32,
  symbols: Vec<Symbol>,
}

impl SymbolTable {
  pub fn new(source_index: u32) -> SymbolTable {
    SymbolTable {
      source_index,
      symbols: Vec::new(),
    }
  }

  pub fn source_index(&self) -> u32 {
    self.source_index
  }

  pub fn push(&mut self, kind: SymbolKind, name: impl Into<String>, loc: Loc) -> SymbolRef {
    let r = SymbolRef {
      source_index: self.source_index,
      inner_index: self.symbols.len() as u32,
    };
    self.symbols.push(Symbol {
      kind,
      original_name: name.into(),
      loc,
      link: None,
      use_count_estimate: 0,
      must_not_be_renamed: false,
      import_record_index: None,
      namespace_alias: None,
    });
    r
  }

  pub fn get(&self, r: SymbolRef) -> &Symbol {
    debug_assert_eq!(r.source_index, self.source_index);
    &self.symbols[r.inner_index as usize]
  }

  pub fn get_mut(&mut self, r: SymbolRef) -> &mut Symbol {
    debug_assert_eq!(r.source_index, self.source_index);
    &mut self.symbols[r.inner_index as usize]
  }

  /// Follows merge links to the symbol that now represents `r`.
  pub fn follow(&self, r: SymbolRef) -> SymbolRef {
    let mut cur = r;
    while let Some(next) = self.get(cur).link {
      cur = next;
    }
    cur
  }

  pub fn record_use(&mut self, r: SymbolRef, count: u32) {
    let r = self.follow(r);
    let symbol = self.get_mut(r);
    symbol.use_count_estimate = symbol.use_count_estimate.saturating_add(count);
  }

  pub fn len(&self) -> usize {
    self.symbols.len()
  }

  pub fn is_empty(&self) -> bool {
    self.symbols.is_empty()
  }

  pub fn truncate(&mut self, len: usize) {
    self.symbols.truncate(len);
  }

  pub fn iter(&self) -> impl Iterator<Item = (SymbolRef, &Symbol)> {
    let source_index = self.source_index;
    self.symbols.iter().enumerate().map(move |(i, s)| {
      (
        SymbolRef {
          source_index,
          inner_index: i as u32,
        },
        s,
      )
    })
  }
}

impl Index<SymbolRef> for SymbolTable {
  type Output = Symbol;

  fn index(&self, index: SymbolRef) -> &Self::Output {
    self.get(index)
  }
}

impl IndexMut<SymbolRef> for SymbolTable {
  fn index_mut(&mut self, index: SymbolRef) -> &mut Self::Output {
    self.get_mut(index)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn follow_walks_links() {
    let mut table = SymbolTable::new(3);
    let a = table.push(SymbolKind::Hoisted, "a", Loc(0, 1));
    let b = table.push(SymbolKind::Hoisted, "a", Loc(5, 6));
    let c = table.push(SymbolKind::Hoisted, "a", Loc(9, 10));
    table[a].link = Some(b);
    table[b].link = Some(c);
    assert_eq!(table.follow(a), c);
    table.record_use(a, 2);
    assert_eq!(table[c].use_count_estimate, 2);
    assert_eq!(a.source_index, 3);
  }
}
