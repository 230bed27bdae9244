//! Pass 3. Splits the bound file into parts the linker can tree-shake independently and records
//! the imports, exports and dependency edges between them.

use crate::fold;
use crate::helpers::RuntimeHelpers;
use diagnostics::Log;
use parse_js::ast::class_or_object::Class;
use parse_js::ast::expr::IdRef;
use parse_js::ast::node::Node;
use parse_js::ast::pat::Pat;
use parse_js::ast::stmt::ExportDefaultValue;
use parse_js::ast::stmt::ForInit;
use parse_js::ast::stmt::Stmt;
use parse_js::ast::stmt::VarDecl;
use parse_js::ast::stmt::VarDeclMode;
use parse_js::import_record::ImportRecord;
use parse_js::scope::ScopeId;
use parse_js::scope::ScopeTree;
use parse_js::store::SymbolStore;
use parse_js::symbol::SymbolRef;
use parse_js::symbol::SymbolTable;
use serde::Serialize;
use serde::Serializer;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use tracing::debug;
use tracing::trace;

// JSON objects only have string keys, so symbol-keyed maps are written as `[key, value]` pairs.
fn symbol_map<V: Serialize, S: Serializer>(map: &BTreeMap<SymbolRef, V>, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.collect_seq(map.iter())
}

/// A group of top-level statements that is included or dropped as a unit.
#[derive(Clone, Debug, Serialize)]
pub struct Part {
  pub stmts: Vec<Node<Stmt>>,
  pub declared_symbols: Vec<SymbolRef>,
  /// Uses of each symbol from inside this part.
  #[serde(serialize_with = "symbol_map")]
  pub symbol_uses: BTreeMap<SymbolRef, u32>,
  pub import_record_indices: Vec<u32>,
  pub can_be_removed_if_unused: bool,
  /// Other parts that declare symbols this part uses.
  pub dependencies: BTreeSet<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NamedImport {
  /// None for a namespace import (`import * as ns`).
  pub alias: Option<String>,
  pub import_record_index: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum NamedExport {
  Local {
    symbol: SymbolRef,
  },
  /// `export {a as b} from "x"`, or `export * as ns from "x"` when `imported` is None.
  ReExport {
    import_record: u32,
    imported: Option<String>,
  },
}

/// Everything the linker needs to know about one file.
#[derive(Debug, Serialize)]
pub struct Ast {
  pub parts: Vec<Part>,
  pub module_scope: ScopeId,
  pub symbols: SymbolTable,
  pub scopes: ScopeTree,
  pub import_records: Vec<ImportRecord>,
  #[serde(serialize_with = "symbol_map")]
  pub named_imports: BTreeMap<SymbolRef, NamedImport>,
  pub named_exports: BTreeMap<String, NamedExport>,
  pub export_star_import_records: Vec<u32>,
  #[serde(serialize_with = "symbol_map")]
  pub top_level_symbol_to_parts: BTreeMap<SymbolRef, Vec<u32>>,
  pub has_top_level_return: bool,
  pub uses_exports_ref: bool,
  pub uses_module_ref: bool,
  pub has_es_module_syntax: bool,
  /// Runtime helpers the file imports, by helper name.
  pub runtime_helpers: BTreeMap<String, SymbolRef>,
  pub log: Log,
}

impl Ast {
  /// Indices of the parts that declare `symbol` at the top level.
  pub fn parts_declaring(&self, symbol: SymbolRef) -> &[u32] {
    self
      .top_level_symbol_to_parts
      .get(&self.symbols.follow(symbol))
      .map(|parts| parts.as_slice())
      .unwrap_or(&[])
  }
}

/// The statements one top-level source statement lowered to, and what they touch.
pub(crate) struct PartDraft {
  pub stmts: Vec<Node<Stmt>>,
  pub uses: BTreeMap<SymbolRef, u32>,
  pub import_records: Vec<u32>,
}

pub(crate) struct Finished {
  pub drafts: Vec<PartDraft>,
  pub store: SymbolStore,
  pub import_records: Vec<ImportRecord>,
  pub helpers: RuntimeHelpers,
  pub log: Log,
  pub ts: bool,
  pub has_top_level_return: bool,
  pub has_es_module_syntax: bool,
  pub uses_exports_ref: bool,
  pub uses_module_ref: bool,
}

// TypeScript can't tell an import of a type from an import of a value, so bindings that are never
// read are assumed to be types. An import left with no bindings is dropped entirely, but
// `import "x"` never had any and stays for its side effects.
fn drop_unused_imports(stmts: &mut Vec<Node<Stmt>>, symbols: &SymbolTable) -> usize {
  let unused = |r: &SymbolRef| symbols[symbols.follow(*r)].use_count_estimate == 0;
  let before = stmts.len();
  stmts.retain_mut(|stmt| {
    let Stmt::Import(import) = stmt.stx.as_mut() else {
      return true;
    };
    let had_bindings = import.default.is_some() || import.namespace.is_some() || !import.names.is_empty();
    if import.default.as_ref().is_some_and(unused) {
      import.default = None;
    };
    if import.namespace.as_ref().is_some_and(unused) {
      import.namespace = None;
    };
    import.names.retain(|n| !unused(&n.local));
    let has_bindings = import.default.is_some() || import.namespace.is_some() || !import.names.is_empty();
    !had_bindings || has_bindings
  });
  before - stmts.len()
}

fn var_declared(decl: &VarDecl, out: &mut Vec<SymbolRef>) {
  for d in decl.declarators.iter() {
    d.pattern.stx.bound_symbols(out);
  }
}

// `var`s in nested blocks and loops still belong to the module scope.
fn nested_vars(stmt: &Stmt, out: &mut Vec<SymbolRef>) {
  let for_init = |init: &ForInit, out: &mut Vec<SymbolRef>| {
    if let ForInit::Decl(decl) = init {
      if decl.stx.mode == VarDeclMode::Var {
        var_declared(&decl.stx, out);
      };
    };
  };
  match stmt {
    Stmt::Var(decl) if decl.mode == VarDeclMode::Var => var_declared(decl, out),
    Stmt::Block(b) => b.body.iter().for_each(|s| nested_vars(&s.stx, out)),
    Stmt::If(s) => {
      nested_vars(&s.consequent.stx, out);
      if let Some(alt) = &s.alternate {
        nested_vars(&alt.stx, out);
      };
    }
    Stmt::For(s) => {
      if let Some(init) = &s.init {
        for_init(init, out);
      };
      nested_vars(&s.body.stx, out);
    }
    Stmt::ForIn(s) => {
      for_init(&s.lhs, out);
      nested_vars(&s.body.stx, out);
    }
    Stmt::ForOf(s) => {
      for_init(&s.lhs, out);
      nested_vars(&s.body.stx, out);
    }
    Stmt::While(s) => nested_vars(&s.body.stx, out),
    Stmt::DoWhile(s) => nested_vars(&s.body.stx, out),
    Stmt::Label(s) => nested_vars(&s.body.stx, out),
    Stmt::With(s) => nested_vars(&s.body.stx, out),
    Stmt::Switch(s) => {
      for branch in s.branches.iter() {
        branch.stx.body.iter().for_each(|s| nested_vars(&s.stx, out));
      }
    }
    Stmt::Try(s) => {
      s.wrapped.stx.body.iter().for_each(|s| nested_vars(&s.stx, out));
      if let Some(catch) = &s.catch {
        catch.stx.body.stx.body.iter().for_each(|s| nested_vars(&s.stx, out));
      };
      if let Some(finally) = &s.finally {
        finally.stx.body.iter().for_each(|s| nested_vars(&s.stx, out));
      };
    }
    _ => {}
  };
}

fn declared_symbols(stmt: &Stmt, out: &mut Vec<SymbolRef>) {
  match stmt {
    Stmt::Var(decl) => var_declared(decl, out),
    Stmt::Func(f) => out.extend(f.name),
    Stmt::Class(c) => out.extend(c.class.name),
    Stmt::Import(import) => {
      out.extend(import.default);
      out.extend(import.namespace);
      out.extend(import.names.iter().map(|n| n.local));
    }
    Stmt::ExportDefault(s) => {
      out.push(s.default_ref);
      if let ExportDefaultValue::Decl(decl) = &s.value {
        declared_symbols(&decl.stx, out);
      };
    }
    other => nested_vars(other, out),
  };
}

fn class_is_side_effect_free(class: &Class, symbols: &SymbolTable) -> bool {
  class.extends.is_none()
    && class
      .members
      .iter()
      .all(|m| fold::is_side_effect_free_class_member(&m.stx, symbols))
}

fn stmt_is_removable(stmt: &Stmt, symbols: &SymbolTable) -> bool {
  match stmt {
    Stmt::Empty | Stmt::Erased | Stmt::Directive(_) | Stmt::Func(_) => true,
    // The linker decides whether the imported file's side effects are needed.
    Stmt::Import(import) => import.default.is_some() || import.namespace.is_some() || !import.names.is_empty(),
    Stmt::ExportFrom(_) | Stmt::ExportStar(_) | Stmt::ExportList(_) => true,
    Stmt::Class(c) => class_is_side_effect_free(&c.class, symbols),
    Stmt::Expr(s) => fold::is_side_effect_free(&s.expr, symbols),
    // Destructuring may run getters or iterators.
    Stmt::Var(decl) => decl.declarators.iter().all(|d| {
      matches!(d.pattern.stx.as_ref(), Pat::Id(_))
        && d
          .initializer
          .as_ref()
          .map_or(true, |init| fold::is_side_effect_free(init, symbols))
    }),
    Stmt::ExportDefault(s) => match &s.value {
      ExportDefaultValue::Expr(expr) => fold::is_side_effect_free(expr, symbols),
      ExportDefaultValue::Decl(decl) => stmt_is_removable(&decl.stx, symbols),
    },
    _ => false,
  }
}

fn static_import_record(stmt: &Stmt) -> Option<u32> {
  match stmt {
    Stmt::Import(s) => Some(s.import_record),
    Stmt::ExportFrom(s) => Some(s.import_record),
    Stmt::ExportStar(s) => Some(s.import_record),
    _ => None,
  }
}

#[derive(Default)]
struct ModuleInterface {
  named_imports: BTreeMap<SymbolRef, NamedImport>,
  named_exports: BTreeMap<String, NamedExport>,
  export_star_import_records: Vec<u32>,
}

impl ModuleInterface {
  fn export_local(&mut self, name: &str, symbol: SymbolRef) {
    self
      .named_exports
      .insert(name.to_string(), NamedExport::Local { symbol });
  }

  fn visit(&mut self, stmt: &Stmt, symbols: &SymbolTable) {
    match stmt {
      Stmt::Import(s) => {
        let record = s.import_record;
        if let Some(r) = s.default {
          self.named_imports.insert(r, NamedImport {
            alias: Some("default".to_string()),
            import_record_index: record,
          });
        };
        if let Some(r) = s.namespace {
          self.named_imports.insert(r, NamedImport {
            alias: None,
            import_record_index: record,
          });
        };
        for name in s.names.iter() {
          self.named_imports.insert(name.local, NamedImport {
            alias: Some(name.imported.clone()),
            import_record_index: record,
          });
        }
      }
      Stmt::ExportFrom(s) => {
        for name in s.names.iter() {
          self.named_exports.insert(name.alias.clone(), NamedExport::ReExport {
            import_record: s.import_record,
            imported: Some(name.name.clone()),
          });
        }
      }
      Stmt::ExportStar(s) => match &s.alias {
        Some(alias) => {
          self.named_exports.insert(alias.clone(), NamedExport::ReExport {
            import_record: s.import_record,
            imported: None,
          });
        }
        None => self.export_star_import_records.push(s.import_record),
      },
      Stmt::ExportList(s) => {
        for item in s.items.iter() {
          if let IdRef::Resolved(r) = item.local {
            self.export_local(&item.alias, r);
          };
        }
      }
      Stmt::ExportDefault(s) => self.export_local("default", s.default_ref),
      Stmt::Var(decl) if decl.export => {
        let mut bound = Vec::new();
        var_declared(decl, &mut bound);
        for r in bound {
          self.export_local(&symbols[r].original_name, r);
        }
      }
      Stmt::Func(f) if f.export => {
        if let Some(r) = f.name {
          self.export_local(&symbols[r].original_name, r);
        };
      }
      Stmt::Class(c) if c.export => {
        if let Some(r) = c.class.name {
          self.export_local(&symbols[r].original_name, r);
        };
      }
      _ => {}
    };
  }
}

pub(crate) fn build_ast(finished: Finished) -> Ast {
  let Finished {
    mut drafts,
    mut store,
    mut import_records,
    helpers,
    log,
    ts,
    has_top_level_return,
    has_es_module_syntax,
    uses_exports_ref,
    uses_module_ref,
  } = finished;

  if ts {
    let dropped: usize = drafts
      .iter_mut()
      .map(|d| drop_unused_imports(&mut d.stmts, &store.symbols))
      .sum();
    if dropped > 0 {
      trace!(dropped, "dropped type-only imports");
    };
  };

  let runtime_helpers = match helpers.finish(&mut store, &mut import_records) {
    Some((stmt, used)) => {
      drafts.push(PartDraft {
        stmts: vec![stmt],
        uses: BTreeMap::new(),
        import_records: Vec::new(),
      });
      used
    }
    None => BTreeMap::new(),
  };

  let symbols = &store.symbols;
  let mut interface = ModuleInterface::default();
  let mut parts = Vec::with_capacity(drafts.len());
  for draft in drafts {
    let PartDraft {
      stmts,
      uses,
      import_records: mut indices,
    } = draft;
    let mut declared = Vec::new();
    let mut removable = true;
    for stmt in stmts.iter() {
      declared_symbols(&stmt.stx, &mut declared);
      removable &= stmt_is_removable(&stmt.stx, symbols);
      interface.visit(&stmt.stx, symbols);
      if let Some(index) = static_import_record(&stmt.stx) {
        if !indices.contains(&index) {
          indices.push(index);
        };
      };
    }
    for r in declared.iter_mut() {
      *r = symbols.follow(*r);
    }
    declared.sort();
    declared.dedup();
    parts.push(Part {
      stmts,
      declared_symbols: declared,
      symbol_uses: uses,
      import_record_indices: indices,
      can_be_removed_if_unused: removable,
      dependencies: BTreeSet::new(),
    });
  }

  let mut top_level_symbol_to_parts: BTreeMap<SymbolRef, Vec<u32>> = BTreeMap::new();
  for (i, part) in parts.iter().enumerate() {
    for &r in part.declared_symbols.iter() {
      let entry = top_level_symbol_to_parts.entry(r).or_default();
      if entry.last() != Some(&(i as u32)) {
        entry.push(i as u32);
      };
    }
  }
  for (i, part) in parts.iter_mut().enumerate() {
    for r in part.symbol_uses.keys() {
      if let Some(declaring) = top_level_symbol_to_parts.get(r) {
        part
          .dependencies
          .extend(declaring.iter().copied().filter(|&p| p != i as u32));
      };
    }
  }

  debug!(
    parts = parts.len(),
    imports = interface.named_imports.len(),
    exports = interface.named_exports.len(),
    "split into parts"
  );
  let module_scope = store.scopes.root();
  Ast {
    parts,
    module_scope,
    symbols: store.symbols,
    scopes: store.scopes,
    import_records,
    named_imports: interface.named_imports,
    named_exports: interface.named_exports,
    export_star_import_records: interface.export_star_import_records,
    top_level_symbol_to_parts,
    has_top_level_return,
    uses_exports_ref,
    uses_module_ref,
    has_es_module_syntax,
    runtime_helpers,
    log,
  }
}
