use parse_js::ast::node::Node;
use parse_js::ast::stmt::ImportName;
use parse_js::ast::stmt::ImportStmt;
use parse_js::ast::stmt::Stmt;
use parse_js::import_record::ImportKind;
use parse_js::import_record::ImportRecord;
use parse_js::loc::Loc;
use parse_js::store::SymbolStore;
use parse_js::symbol::SymbolKind;
use parse_js::symbol::SymbolRef;
use std::collections::BTreeMap;
use tracing::trace;

/// Import path of the module that provides runtime helpers. The bundler resolves it.
pub const RUNTIME_PATH: &str = "<runtime>";

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Helper {
  // `Object.assign`, used by object spread.
  Assign,
  // `Math.pow`, used by `**`.
  Pow,
}

impl Helper {
  pub fn name(self) -> &'static str {
    match self {
      Helper::Assign => "__assign",
      Helper::Pow => "__pow",
    }
  }
}

/// Runtime helpers referenced so far. Each gets one import symbol the first time it is needed.
#[derive(Default, Debug)]
pub struct RuntimeHelpers {
  used: BTreeMap<&'static str, SymbolRef>,
}

impl RuntimeHelpers {
  pub fn get(&mut self, store: &mut SymbolStore, helper: Helper, loc: Loc) -> SymbolRef {
    let name = helper.name();
    if let Some(&r) = self.used.get(name) {
      store.symbols.record_use(r, 1);
      return r;
    };
    trace!(helper = name, "runtime helper");
    let r = store.symbols.push(SymbolKind::Import, name, loc);
    let root = store.scopes.root();
    store.scopes.get_mut(root).generated.push(r);
    store.symbols.record_use(r, 1);
    self.used.insert(name, r);
    r
  }

  pub fn is_empty(&self) -> bool {
    self.used.is_empty()
  }

  /// Registers the runtime import record and returns one import statement for every helper used,
  /// sorted by name.
  pub fn finish(
    self,
    store: &mut SymbolStore,
    import_records: &mut Vec<ImportRecord>,
  ) -> Option<(Node<Stmt>, BTreeMap<String, SymbolRef>)> {
    if self.used.is_empty() {
      return None;
    };
    let loc = Loc(0, 0);
    let import_record = import_records.len() as u32;
    import_records.push(ImportRecord {
      path: RUNTIME_PATH.to_string(),
      kind: ImportKind::Stmt,
      loc,
    });
    let mut names = Vec::with_capacity(self.used.len());
    for (&name, &local) in self.used.iter() {
      store.symbols[local].import_record_index = Some(import_record);
      names.push(ImportName {
        imported: name.to_string(),
        local,
      });
    }
    let stmt = Node::new(loc, Stmt::Import(ImportStmt {
      import_record,
      default: None,
      namespace: None,
      names,
    }));
    let used = self.used.into_iter().map(|(name, r)| (name.to_string(), r)).collect();
    Some((stmt, used))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn helpers_are_shared_and_sorted() {
    let mut store = SymbolStore::new(0, false);
    let mut helpers = RuntimeHelpers::default();
    let pow = helpers.get(&mut store, Helper::Pow, Loc(3, 5));
    let assign = helpers.get(&mut store, Helper::Assign, Loc(9, 12));
    assert_eq!(helpers.get(&mut store, Helper::Pow, Loc(20, 22)), pow);
    assert_eq!(store.symbols[pow].use_count_estimate, 2);

    let mut records = Vec::new();
    let (stmt, used) = helpers.finish(&mut store, &mut records).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].path, RUNTIME_PATH);
    assert_eq!(store.symbols[assign].import_record_index, Some(0));
    let Stmt::Import(import) = *stmt.stx else {
      panic!("expected import");
    };
    let names: Vec<&str> = import.names.iter().map(|n| n.imported.as_str()).collect();
    assert_eq!(names, vec!["__assign", "__pow"]);
    assert_eq!(used.len(), 2);
  }
}
