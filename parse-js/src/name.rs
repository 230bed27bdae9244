use crate::loc::Loc;
use serde::Serialize;

/// An identifier name that has not been bound to a symbol yet.
///
/// Most names are a view into the source text. Names that don't appear verbatim in the source
/// (escaped identifiers, names synthesized by the parser) live in a [`NameTable`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum Name {
  Borrowed { offset: u32, len: u32 },
  Owned(u32),
}

impl Name {
  pub fn borrowed(loc: Loc) -> Name {
    Name::Borrowed {
      offset: loc.0 as u32,
      len: loc.len() as u32,
    }
  }
}

#[derive(Clone, Debug, Default)]
pub struct NameTable {
  owned: Vec<String>,
}

impl NameTable {
  pub fn new() -> NameTable {
    NameTable::default()
  }

  pub fn own(&mut self, value: impl Into<String>) -> Name {
    let id = self.owned.len() as u32;
    self.owned.push(value.into());
    Name::Owned(id)
  }

  /// The source passed in must be the buffer the borrowed names were taken from.
  pub fn get<'s>(&'s self, source: &'s str, name: Name) -> &'s str {
    match name {
      Name::Borrowed { offset, len } => {
        let start = offset as usize;
        &source[start..start + len as usize]
      }
      Name::Owned(id) => &self.owned[id as usize],
    }
  }

  pub fn len(&self) -> usize {
    self.owned.len()
  }

  pub fn is_empty(&self) -> bool {
    self.owned.is_empty()
  }

  pub fn truncate(&mut self, len: usize) {
    self.owned.truncate(len);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn borrowed_and_owned_names() {
    let source = "let abc = 1";
    let mut table = NameTable::new();
    let borrowed = Name::borrowed(Loc(4, 7));
    let owned = table.own("x\u{e9}");
    assert_eq!(table.get(source, borrowed), "abc");
    assert_eq!(table.get(source, owned), "x\u{e9}");
    table.truncate(0);
    assert!(table.is_empty());
  }
}
