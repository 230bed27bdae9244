//! Pass 2. Walks the tree the parser built, entering the scopes it recorded in the same order,
//! resolving every deferred name, folding constants and lowering syntax the target lacks.

mod expr;
mod stmt;

use crate::build;
use crate::defines::ProcessedDefines;
use crate::helpers::Helper;
use crate::helpers::RuntimeHelpers;
use crate::lower::ts::EnumValue;
use crate::options::Feature;
use crate::options::LowerOptions;
use crate::parts;
use crate::parts::Ast;
use crate::parts::PartDraft;
use ahash::HashMap;
use ahash::HashSet;
use diagnostics::Log;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::IdRef;
use parse_js::ast::node::Node;
use parse_js::ast::stmt::TopLevel;
use parse_js::ast::stmt::VarDeclMode;
use parse_js::error::Issue;
use parse_js::import_record::ImportRecord;
use parse_js::loc::Loc;
use parse_js::name::Name;
use parse_js::name::NameTable;
use parse_js::scope::ScopeKind;
use parse_js::store::SymbolStore;
use parse_js::symbol::SymbolKind;
use parse_js::symbol::SymbolRef;
use parse_js::sync::ScopeReplay;
use std::collections::BTreeMap;
use tracing::debug;
use tracing::trace;

pub(crate) use expr::ExprCtx;

/// Uses and import records of the top-level statement being visited.
#[derive(Default)]
pub(crate) struct PartUsage {
  pub uses: BTreeMap<SymbolRef, u32>,
  pub import_records: Vec<u32>,
}

pub(crate) struct Binder<'a> {
  source: &'a str,
  names: NameTable,
  pub(crate) options: &'a LowerOptions,
  pub(crate) defines: &'a ProcessedDefines,
  pub(crate) store: SymbolStore,
  replay: ScopeReplay,
  pub(crate) log: Log,
  pub(crate) import_records: Vec<ImportRecord>,
  pub(crate) helpers: RuntimeHelpers,
  // One frame per function body, plus the module. Temporaries are declared with `var` at the top
  // of the frame they were created in.
  temps: Vec<Vec<SymbolRef>>,
  temp_count: usize,
  // Inside a branch that folding proved can never run.
  pub(crate) dead: bool,
  // Enum initializers fold arithmetic even without `mangle_syntax`.
  pub(crate) in_enum: bool,
  // Known values of enum members, by member symbol.
  pub(crate) enum_values: HashMap<SymbolRef, EnumValue>,
  // Known values of enum members, by the enum's name symbol and the member name.
  pub(crate) enum_members: HashMap<SymbolRef, HashMap<String, EnumValue>>,
  // `this` inside a static field initializer that is moved out of the class.
  pub(crate) this_replacement: Option<SymbolRef>,
  // Closure parameters of the namespaces being visited, innermost last.
  pub(crate) namespaces: Vec<SymbolRef>,
  // Enum and namespace names that already have a `var`.
  pub(crate) emitted_vars: HashSet<SymbolRef>,
  pub(crate) uses_exports_ref: bool,
  pub(crate) uses_module_ref: bool,
  part: PartUsage,
}

impl<'a> Binder<'a> {
  pub(crate) fn new(
    source: &'a str,
    options: &'a LowerOptions,
    defines: &'a ProcessedDefines,
    mut store: SymbolStore,
    names: NameTable,
    log: Log,
    import_records: Vec<ImportRecord>,
  ) -> Binder<'a> {
    let replay = std::mem::take(&mut store.order).into_replay();
    let root = store.scopes.root();
    store.scopes.set_current(root);
    Binder {
      source,
      names,
      options,
      defines,
      store,
      replay,
      log,
      import_records,
      helpers: RuntimeHelpers::default(),
      temps: Vec::new(),
      temp_count: 0,
      dead: false,
      in_enum: false,
      enum_values: HashMap::default(),
      enum_members: HashMap::default(),
      this_replacement: None,
      namespaces: Vec::new(),
      emitted_vars: HashSet::default(),
      uses_exports_ref: false,
      uses_module_ref: false,
      part: PartUsage::default(),
    }
  }

  /// Binds the whole file. Each top-level statement becomes one part.
  pub(crate) fn bind(mut self, top_level: Node<TopLevel>, has_top_level_return: bool, has_es_module_syntax: bool) -> Ast {
    self.temps.push(Vec::new());
    let mut drafts = Vec::new();
    for stmt in top_level.stx.body {
      let mut stmts = Vec::new();
      self.visit_stmt(stmt, &mut stmts);
      let usage = std::mem::take(&mut self.part);
      drafts.push(PartDraft {
        stmts,
        uses: usage.uses,
        import_records: usage.import_records,
      });
    }
    debug_assert!(
      self.replay.is_done(),
      "{} recorded scopes were never entered",
      self.replay.remaining()
    );
    let module_temps = self.temps.pop().unwrap_or_default();
    if !module_temps.is_empty() {
      let loc = Loc(0, 0);
      let mut uses = BTreeMap::new();
      for &t in module_temps.iter() {
        uses.insert(t, 1);
      }
      drafts.insert(0, PartDraft {
        stmts: vec![build::var_decl(loc, VarDeclMode::Var, false, module_temps.into_iter().map(|t| (t, None)))],
        uses,
        import_records: Vec::new(),
      });
    };
    debug!(
      parts = drafts.len(),
      symbols = self.store.symbols.len(),
      errors = self.log.errors().count(),
      "bound"
    );
    parts::build_ast(parts::Finished {
      drafts,
      store: self.store,
      import_records: self.import_records,
      helpers: self.helpers,
      log: self.log,
      ts: self.options.parse.ts,
      has_top_level_return,
      has_es_module_syntax,
      uses_exports_ref: self.uses_exports_ref,
      uses_module_ref: self.uses_module_ref,
    })
  }

  pub(crate) fn enter_scope(&mut self, kind: ScopeKind, loc: usize) {
    let id = self.replay.dequeue(loc, kind);
    debug_assert_eq!(
      self.store.scopes.get(id).parent,
      Some(self.store.scopes.current()),
      "scope at {} entered from the wrong parent",
      loc
    );
    self.store.scopes.set_current(id);
  }

  pub(crate) fn leave_scope(&mut self) {
    let current = self.store.scopes.current();
    let parent = self.store.scopes.get(current).parent.unwrap_or(self.store.scopes.root());
    self.store.scopes.set_current(parent);
  }

  pub(crate) fn current_scope_kind(&self) -> ScopeKind {
    self.store.scopes.current_scope().kind
  }

  pub(crate) fn name_text(&self, name: Name) -> String {
    self.names.get(self.source, name).to_string()
  }

  /// The text of a deferred name, or the original name of a resolved one.
  pub(crate) fn id_text(&self, id: IdRef) -> String {
    match id {
      IdRef::Deferred(name) => self.name_text(name),
      IdRef::Resolved(r) => self.store.symbols[r].original_name.clone(),
    }
  }

  /// Resolves a name in the current scope. Uses in dead code aren't counted.
  pub(crate) fn resolve_name(&mut self, name: &str, loc: Loc) -> SymbolRef {
    let r = self.store.resolve(name, loc, false);
    if !self.dead {
      self.record_use(r);
    };
    r
  }

  pub(crate) fn resolve_id(&mut self, id: IdRef, loc: Loc) -> SymbolRef {
    match id {
      IdRef::Deferred(name) => {
        let text = self.name_text(name);
        self.resolve_name(&text, loc)
      }
      IdRef::Resolved(r) => r,
    }
  }

  /// Resolves `#x` against the enclosing class bodies.
  pub(crate) fn resolve_private(&mut self, id: IdRef, loc: Loc) -> IdRef {
    let IdRef::Deferred(name) = id else {
      return id;
    };
    let text = self.name_text(name);
    match self.store.resolve_private(&text, false) {
      Some(r) => {
        if !self.dead {
          self.record_use(r);
        };
        IdRef::Resolved(r)
      }
      None => {
        self.issue(
          Issue::InvalidPrivateName,
          loc,
          format!("private name `{}` must be declared in an enclosing class", text),
        );
        IdRef::Resolved(self.store.symbols.push(SymbolKind::Unbound, text, loc))
      }
    }
  }

  /// Counts a reference for the symbol table and for the current part.
  pub(crate) fn record_use(&mut self, r: SymbolRef) {
    self.store.symbols.record_use(r, 1);
    self.note_part_use(r);
  }

  // The symbol table was already updated.
  fn note_part_use(&mut self, r: SymbolRef) {
    let r = self.store.symbols.follow(r);
    *self.part.uses.entry(r).or_insert(0) += 1;
  }

  pub(crate) fn note_import_record(&mut self, index: u32) {
    if !self.part.import_records.contains(&index) {
      self.part.import_records.push(index);
    };
  }

  pub(crate) fn issue(&mut self, issue: Issue, loc: Loc, message: impl Into<String>) {
    self.log.add(issue.diagnostic(loc, message));
  }

  pub(crate) fn supports(&self, feature: Feature) -> bool {
    self.options.target.supports(feature)
  }

  pub(crate) fn unsupported(&mut self, feature: Feature, loc: Loc) {
    let target = self.options.target.name();
    self.issue(
      Issue::UnsupportedForTarget,
      loc,
      format!("{} cannot be used when targeting {}", feature.description(), target),
    );
  }

  pub(crate) fn helper(&mut self, helper: Helper, loc: Loc) -> Node<Expr> {
    let r = self.helpers.get(&mut self.store, helper, loc);
    self.note_part_use(r);
    build::id(loc, r)
  }

  pub(crate) fn push_temp_frame(&mut self) {
    self.temps.push(Vec::new());
  }

  pub(crate) fn pop_temp_frame(&mut self) -> Vec<SymbolRef> {
    self.temps.pop().unwrap_or_default()
  }

  /// A fresh temporary, declared at the top of the innermost function.
  pub(crate) fn new_temp(&mut self, loc: Loc) -> SymbolRef {
    let name = temp_name(self.temp_count);
    self.temp_count += 1;
    let r = self.store.generate(SymbolKind::Generated, &name, loc);
    trace!(temp = %name, "new temporary");
    if let Some(frame) = self.temps.last_mut() {
      frame.push(r);
    };
    r
  }

  /// Drops a temporary that ended up unused.
  pub(crate) fn remove_temp(&mut self, r: SymbolRef) {
    if let Some(frame) = self.temps.last_mut() {
      frame.retain(|&t| t != r);
    };
    self.part.uses.remove(&r);
  }

  /// A symbol for a name introduced by lowering, declared in the current scope.
  pub(crate) fn generate(&mut self, kind: SymbolKind, name: &str, loc: Loc) -> SymbolRef {
    self.store.generate(kind, name, loc)
  }

  /// Runs `f` with dead-code tracking set to `dead` (or left on, if already dead).
  pub(crate) fn with_dead<T>(&mut self, dead: bool, f: impl FnOnce(&mut Self) -> T) -> T {
    let saved = self.dead;
    self.dead |= dead;
    let result = f(self);
    self.dead = saved;
    result
  }
}

// `_a`, `_b`, ..., `_z`, `_ba`, ...
fn temp_name(mut n: usize) -> String {
  let mut letters = Vec::new();
  loop {
    letters.push((b'a' + (n % 26) as u8) as char);
    n /= 26;
    if n == 0 {
      break;
    };
  }
  let mut name = String::from("_");
  name.extend(letters.into_iter().rev());
  name
}

#[cfg(test)]
mod tests {
  use super::temp_name;

  #[test]
  fn temp_names() {
    assert_eq!(temp_name(0), "_a");
    assert_eq!(temp_name(25), "_z");
    assert_eq!(temp_name(26), "_ba");
  }
}
