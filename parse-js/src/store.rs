//! Scope and symbol bookkeeping shared by the parser (pass 1) and the binder (pass 2).

use crate::error::Issue;
use crate::loc::Loc;
use crate::scope::ScopeId;
use crate::scope::ScopeKind;
use crate::scope::ScopeTree;
use crate::symbol::SymbolKind;
use crate::symbol::SymbolRef;
use crate::symbol::SymbolTable;
use crate::sync::ScopeOrder;
use diagnostics::Log;
use tracing::trace;

/// What to do when a name is declared twice in the same scope.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Merge {
  Forbidden,
  ReplaceWithNew,
  KeepExisting,
  OverwriteWithNew,
  BecomePrivateGetSetPair,
}

pub fn can_merge(scope_kind: ScopeKind, existing: SymbolKind, new: SymbolKind, ts: bool) -> Merge {
  use SymbolKind::*;
  if existing == Unbound {
    return Merge::ReplaceWithNew;
  };
  // TypeScript imports may be type-only, so they yield to local declarations.
  if ts && existing == Import {
    return Merge::ReplaceWithNew;
  };
  // `enum Foo {} enum Foo {}`, `namespace Foo {} enum Foo {}`
  if new == TsEnum && matches!(existing, TsEnum | TsNamespace) {
    return Merge::ReplaceWithNew;
  };
  // `namespace Foo {} namespace Foo {}`, `function Foo() {} namespace Foo {}`
  if new == TsNamespace && matches!(existing, TsNamespace | HoistedFunction | TsEnum | Class) {
    return Merge::KeepExisting;
  };
  // `var a; var a`, `var a; function a() {}`, `function a() {} var a`
  if new.is_hoisted()
    && existing.is_hoisted()
    && (matches!(
      scope_kind,
      ScopeKind::Entry | ScopeKind::FunctionArgs | ScopeKind::FunctionBody
    ) || (new == existing && new == Hoisted))
  {
    return Merge::KeepExisting;
  };
  if matches!((existing, new), (PrivateGet, PrivateSet) | (PrivateSet, PrivateGet)) {
    return Merge::BecomePrivateGetSetPair;
  };
  // `try {} catch (e) { var e }`
  if existing == CatchIdentifier && new == Hoisted {
    return Merge::ReplaceWithNew;
  };
  // `function f() { var arguments }`
  if existing == Arguments && new == Hoisted {
    return Merge::KeepExisting;
  };
  // `function f() { let arguments }`
  if existing == Arguments {
    return Merge::OverwriteWithNew;
  };
  Merge::Forbidden
}

#[derive(Clone, Copy, Debug)]
pub struct StoreSnapshot {
  scopes: usize,
  current: ScopeId,
  order: usize,
  symbols: usize,
  undo: usize,
}

// A change to a scope or symbol that may predate a snapshot, replayed backwards by `rollback`.
#[derive(Clone, Debug)]
enum Undo {
  Member {
    scope: ScopeId,
    name: String,
    previous: Option<SymbolRef>,
  },
  Link {
    symbol: SymbolRef,
    previous: Option<SymbolRef>,
  },
  Kind {
    symbol: SymbolRef,
    previous: SymbolKind,
  },
  Pinned {
    symbol: SymbolRef,
    previous: bool,
  },
}

/// The scope tree, the symbol table, and the order scopes were entered in.
#[derive(Clone, Debug)]
pub struct SymbolStore {
  pub scopes: ScopeTree,
  pub symbols: SymbolTable,
  pub order: ScopeOrder,
  undo: Vec<Undo>,
  ts: bool,
}

impl SymbolStore {
  pub fn new(source_index: u32, ts: bool) -> SymbolStore {
    SymbolStore {
      scopes: ScopeTree::new(),
      symbols: SymbolTable::new(source_index),
      order: ScopeOrder::new(),
      undo: Vec::new(),
      ts,
    }
  }

  pub fn current_scope(&self) -> ScopeId {
    self.scopes.current()
  }

  /// Enters a new child of the current scope and records it for pass 2. Returns the index of the
  /// record, for a later `discard_scope` or `flatten_scope`.
  pub fn enter_scope(&mut self, kind: ScopeKind, loc: usize) -> usize {
    let parent = self.scopes.current();
    let id = self.scopes.create(kind, loc);
    trace!(?kind, loc, scope = id.index(), "enter scope");
    if kind == ScopeKind::FunctionBody && self.scopes.get(parent).kind == ScopeKind::FunctionArgs {
      // Copy parameters down so that redeclaring one in the body is detected. The name of a
      // function expression is declared in the argument scope but may be redeclared.
      let copied: Vec<(String, SymbolRef)> = self
        .scopes
        .get(parent)
        .members
        .iter()
        .filter(|(_, &r)| self.symbols[r].kind != SymbolKind::HoistedFunction)
        .map(|(name, &r)| (name.clone(), r))
        .collect();
      self.scopes.get_mut(id).members.extend(copied);
    };
    self.order.push(loc, kind, id)
  }

  pub fn leave_scope(&mut self) {
    let left = self.scopes.leave();
    trace!(scope = left.index(), "leave scope");
    let scope = self.scopes.get(left);
    if scope.contains_direct_eval {
      let members: Vec<SymbolRef> = scope.members.values().copied().collect();
      for r in members {
        self.pin(r);
      }
    };
  }

  /// Removes a scope that turned out not to exist, and everything recorded after it.
  pub fn discard_scope(&mut self, order_index: usize) {
    let Some(entry) = self.order.get(order_index) else {
      panic!("no scope recorded at index {}", order_index);
    };
    let parent = self.scopes.get(entry.scope).parent;
    trace!(scope = entry.scope.index(), "discard scope");
    let parent = parent.unwrap_or(self.scopes.root());
    self.scopes.truncate(entry.scope.index());
    self.order.truncate(order_index);
    self.scopes.set_current(parent);
  }

  /// Removes just this scope, moving its children into its parent.
  pub fn flatten_scope(&mut self, order_index: usize) {
    let entry = self.order.remove(order_index);
    trace!(scope = entry.scope.index(), "flatten scope");
    self.scopes.flatten(entry.scope);
  }

  pub fn snapshot(&self) -> StoreSnapshot {
    StoreSnapshot {
      scopes: self.scopes.len(),
      current: self.scopes.current(),
      order: self.order.len(),
      symbols: self.symbols.len(),
      undo: self.undo.len(),
    }
  }

  /// Undoes everything since the snapshot: new scopes and symbols, and merges, links and member
  /// bindings that changed symbols or scopes which already existed.
  pub fn rollback(&mut self, snapshot: StoreSnapshot) {
    // Replay first, while every recorded scope and symbol still exists.
    while self.undo.len() > snapshot.undo {
      let Some(undo) = self.undo.pop() else {
        break;
      };
      match undo {
        Undo::Member { scope, name, previous } => {
          let members = &mut self.scopes.get_mut(scope).members;
          match previous {
            Some(r) => {
              members.insert(name, r);
            }
            None => {
              members.remove(&name);
            }
          };
        }
        Undo::Link { symbol, previous } => self.symbols[symbol].link = previous,
        Undo::Kind { symbol, previous } => self.symbols[symbol].kind = previous,
        Undo::Pinned { symbol, previous } => self.symbols[symbol].must_not_be_renamed = previous,
      };
    }
    self.scopes.truncate(snapshot.scopes);
    self.scopes.set_current(snapshot.current);
    self.order.truncate(snapshot.order);
    self.symbols.truncate(snapshot.symbols);
    let live = snapshot.symbols as u32;
    let ancestors: Vec<ScopeId> = self.scopes.ancestors(snapshot.current).collect();
    for id in ancestors {
      self.scopes.get_mut(id).generated.retain(|r| r.inner_index < live);
    }
    trace!(symbols = snapshot.symbols, scopes = snapshot.scopes, "store rolled back");
  }

  fn set_member(&mut self, scope: ScopeId, name: &str, r: SymbolRef) {
    let previous = self.scopes.get_mut(scope).members.insert(name.to_string(), r);
    self.undo.push(Undo::Member {
      scope,
      name: name.to_string(),
      previous,
    });
  }

  fn set_link(&mut self, symbol: SymbolRef, target: SymbolRef) {
    let previous = self.symbols[symbol].link.replace(target);
    self.undo.push(Undo::Link { symbol, previous });
  }

  fn set_kind(&mut self, symbol: SymbolRef, kind: SymbolKind) {
    let previous = std::mem::replace(&mut self.symbols[symbol].kind, kind);
    self.undo.push(Undo::Kind { symbol, previous });
  }

  fn pin(&mut self, symbol: SymbolRef) {
    let previous = std::mem::replace(&mut self.symbols[symbol].must_not_be_renamed, true);
    if !previous {
      self.undo.push(Undo::Pinned { symbol, previous });
    };
  }

  /// Declares a name in the current scope, merging with or reporting an existing declaration.
  pub fn declare(&mut self, kind: SymbolKind, name: &str, loc: Loc, log: &mut Log) -> SymbolRef {
    let declaring = self.scopes.current();
    let mut r = self.symbols.push(kind, name, loc);

    if let Some(&existing) = self.scopes.get(declaring).members.get(name) {
      let existing_kind = self.symbols[existing].kind;
      let merge = can_merge(self.scopes.get(declaring).kind, existing_kind, kind, self.ts);
      trace!(name, ?existing_kind, new_kind = ?kind, ?merge, "declaration collision");
      match merge {
        Merge::Forbidden => {
          self.report_duplicate(name, loc, existing, log);
          return existing;
        }
        Merge::KeepExisting => {
          self.set_link(r, existing);
          r = existing;
        }
        Merge::ReplaceWithNew => {
          self.set_link(existing, r);
        }
        Merge::BecomePrivateGetSetPair => {
          self.set_link(r, existing);
          self.set_kind(existing, SymbolKind::PrivateGetSetPair);
          r = existing;
        }
        Merge::OverwriteWithNew => {}
      };
    };
    self.set_member(declaring, name, r);

    // `catch (e) { let e }`, where only `var` may repeat the parameter.
    if kind != SymbolKind::Hoisted {
      if let Some(existing) = self.catch_parameter(declaring, name) {
        self.report_duplicate(name, loc, existing, log);
      };
    };

    if kind == SymbolKind::Hoisted && !self.scopes.get(declaring).kind.stops_hoisting() {
      r = self.hoist(declaring, name, r, loc, log);
    };
    r
  }

  // The catch parameter named `name`, when `scope` is the body of a catch clause.
  fn catch_parameter(&self, scope: ScopeId, name: &str) -> Option<SymbolRef> {
    let body = self.scopes.get(scope);
    if body.kind != ScopeKind::Block {
      return None;
    };
    let clause = self.scopes.get(body.parent?);
    if clause.kind != ScopeKind::CatchBinding {
      return None;
    };
    let &existing = clause.members.get(name)?;
    let parameter = matches!(self.symbols[existing].kind, SymbolKind::CatchIdentifier | SymbolKind::Other);
    parameter.then_some(existing)
  }

  // Propagates a `var` up to the enclosing function or module scope.
  fn hoist(&mut self, declaring: ScopeId, name: &str, r: SymbolRef, loc: Loc, log: &mut Log) -> SymbolRef {
    let mut r = r;
    // `with (o) var x = 1` assigns to `o.x` when `o` has that property.
    let mut through_with = self.scopes.get(declaring).kind == ScopeKind::With;
    let mut next = self.scopes.get(declaring).parent;
    while let Some(s) = next {
      let scope_kind = self.scopes.get(s).kind;
      through_with |= scope_kind == ScopeKind::With;
      if let Some(&existing) = self.scopes.get(s).members.get(name) {
        if self.symbols.follow(existing) == self.symbols.follow(r) {
          break;
        };
        match self.symbols[existing].kind {
          SymbolKind::Unbound | SymbolKind::Hoisted | SymbolKind::Arguments => {
            self.set_link(r, existing);
            r = existing;
            self.replace_in_chain(declaring, s, name, r);
            break;
          }
          SymbolKind::HoistedFunction
            if matches!(scope_kind, ScopeKind::Entry | ScopeKind::FunctionBody) =>
          {
            self.set_link(r, existing);
            r = existing;
            self.replace_in_chain(declaring, s, name, r);
            break;
          }
          SymbolKind::CatchIdentifier => {
            // Merge the catch binding into the var and keep going past the catch scope.
            self.set_link(existing, r);
            self.set_member(s, name, r);
          }
          _ => {
            self.report_duplicate(name, loc, existing, log);
            break;
          }
        };
      } else {
        self.set_member(s, name, r);
      };
      if scope_kind.stops_hoisting() {
        break;
      };
      next = self.scopes.get(s).parent;
    }
    if through_with {
      let target = self.symbols.follow(r);
      self.pin(target);
    };
    r
  }

  // After merging into an ancestor's symbol, point the scopes walked so far at it too.
  fn replace_in_chain(&mut self, from: ScopeId, to: ScopeId, name: &str, r: SymbolRef) {
    let chain: Vec<ScopeId> = self.scopes.ancestors(from).take_while(|&s| s != to).collect();
    for s in chain {
      self.set_member(s, name, r);
    }
  }

  fn report_duplicate(&self, name: &str, loc: Loc, existing: SymbolRef, log: &mut Log) {
    let previous = self.symbols[existing].loc;
    log.add(
      Issue::DuplicateDeclaration
        .diagnostic(loc, format!("`{}` has already been declared", name))
        .with_label(previous.range(), format!("`{}` was originally declared here", name)),
    );
  }

  /// Adds a symbol to the current scope that name lookup will never find.
  pub fn generate(&mut self, kind: SymbolKind, name: &str, loc: Loc) -> SymbolRef {
    let r = self.symbols.push(kind, name, loc);
    self.scopes.current_scope_mut().generated.push(r);
    r
  }

  /// Resolves a name from the current scope outwards. Names that aren't declared anywhere become
  /// unbound symbols in the module scope.
  pub fn resolve(&mut self, name: &str, loc: Loc, record_use: bool) -> SymbolRef {
    let mut passed_with = false;
    let mut found = None;
    for s in self.scopes.ancestors(self.scopes.current()) {
      let scope = self.scopes.get(s);
      if let Some(&r) = scope.members.get(name) {
        found = Some(r);
        break;
      };
      passed_with |= scope.kind == ScopeKind::With;
    }
    let r = match found {
      Some(r) => r,
      None => {
        let r = self.symbols.push(SymbolKind::Unbound, name, loc);
        let root = self.scopes.root();
        self.set_member(root, name, r);
        r
      }
    };
    if passed_with {
      self.pin(r);
    };
    if record_use {
      self.symbols.record_use(r, 1);
    };
    r
  }

  /// Private names only resolve within enclosing class bodies.
  pub fn resolve_private(&mut self, name: &str, record_use: bool) -> Option<SymbolRef> {
    let r = self
      .scopes
      .ancestors(self.scopes.current())
      .filter(|&s| self.scopes.get(s).kind == ScopeKind::ClassBody)
      .find_map(|s| self.scopes.get(s).members.get(name).copied())?;
    if record_use {
      self.symbols.record_use(r, 1);
    };
    Some(r)
  }

  /// Finds the label a `break` or `continue` refers to, without crossing a function boundary.
  pub fn find_label(&self, name: &str) -> Option<SymbolRef> {
    for s in self.scopes.ancestors(self.scopes.current()) {
      let scope = self.scopes.get(s);
      if let Some(label) = scope.label {
        if self.symbols[label].original_name == name {
          return Some(label);
        };
      };
      if scope.kind.stops_hoisting() {
        break;
      };
    }
    None
  }

  pub fn mark_direct_eval(&mut self) {
    let chain: Vec<ScopeId> = self.scopes.ancestors(self.scopes.current()).collect();
    for s in chain {
      self.scopes.get_mut(s).contains_direct_eval = true;
    }
  }

  pub fn into_parts(self) -> (ScopeTree, SymbolTable, ScopeOrder) {
    (self.scopes, self.symbols, self.order)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn store() -> (SymbolStore, Log) {
    (SymbolStore::new(0, false), Log::new())
  }

  #[test]
  fn var_in_block_then_module_var_unify() {
    let (mut st, mut log) = store();
    st.enter_scope(ScopeKind::Block, 1);
    let inner = st.declare(SymbolKind::Hoisted, "x", Loc(6, 7), &mut log);
    st.leave_scope();
    let outer = st.declare(SymbolKind::Hoisted, "x", Loc(15, 16), &mut log);
    assert!(log.is_empty());
    assert_eq!(st.symbols.follow(inner), st.symbols.follow(outer));
  }

  #[test]
  fn var_then_let_conflicts_both_ways() {
    let (mut st, mut log) = store();
    st.declare(SymbolKind::Hoisted, "x", Loc(4, 5), &mut log);
    st.declare(SymbolKind::Other, "x", Loc(11, 12), &mut log);
    assert_eq!(log.len(), 1);
    assert_eq!(log.diagnostics()[0].message, "`x` has already been declared");

    let (mut st, mut log) = store();
    st.declare(SymbolKind::Other, "x", Loc(4, 5), &mut log);
    st.enter_scope(ScopeKind::Block, 7);
    st.declare(SymbolKind::Hoisted, "x", Loc(13, 14), &mut log);
    assert_eq!(log.len(), 1);
  }

  #[test]
  fn nested_var_conflicts_with_function_level_let() {
    let (mut st, mut log) = store();
    st.enter_scope(ScopeKind::FunctionArgs, 10);
    st.enter_scope(ScopeKind::FunctionBody, 13);
    st.enter_scope(ScopeKind::Block, 15);
    st.declare(SymbolKind::Hoisted, "x", Loc(21, 22), &mut log);
    st.leave_scope();
    st.declare(SymbolKind::Other, "x", Loc(30, 31), &mut log);
    assert_eq!(log.len(), 1);
  }

  #[test]
  fn parameters_are_copied_into_the_body() {
    let (mut st, mut log) = store();
    st.enter_scope(ScopeKind::FunctionArgs, 10);
    let name = st.declare(SymbolKind::HoistedFunction, "f", Loc(9, 10), &mut log);
    let param = st.declare(SymbolKind::Hoisted, "a", Loc(11, 12), &mut log);
    st.enter_scope(ScopeKind::FunctionBody, 14);
    assert_eq!(st.scopes.current_scope().members.get("a"), Some(&param));
    assert!(!st.scopes.current_scope().members.contains_key("f"));
    let redeclared = st.declare(SymbolKind::Hoisted, "a", Loc(20, 21), &mut log);
    assert_eq!(redeclared, param);
    st.declare(SymbolKind::Other, "f", Loc(30, 31), &mut log);
    assert!(log.is_empty());
    assert_ne!(name, param);
  }

  #[test]
  fn catch_binding_merges_into_var() {
    let (mut st, mut log) = store();
    st.enter_scope(ScopeKind::CatchBinding, 7);
    let e = st.declare(SymbolKind::CatchIdentifier, "e", Loc(14, 15), &mut log);
    st.enter_scope(ScopeKind::Block, 17);
    let v = st.declare(SymbolKind::Hoisted, "e", Loc(23, 24), &mut log);
    assert!(log.is_empty());
    assert_eq!(st.symbols.follow(e), v);
    let root = st.scopes.root();
    assert_eq!(st.scopes.get(root).members.get("e"), Some(&v));
  }

  #[test]
  fn catch_body_cannot_shadow_parameter_lexically() {
    let (mut st, mut log) = store();
    st.enter_scope(ScopeKind::CatchBinding, 7);
    st.declare(SymbolKind::CatchIdentifier, "e", Loc(14, 15), &mut log);
    st.enter_scope(ScopeKind::Block, 17);
    st.declare(SymbolKind::Other, "e", Loc(23, 24), &mut log);
    assert_eq!(log.len(), 1);
    // One block further in, it is a new binding.
    st.enter_scope(ScopeKind::Block, 26);
    st.declare(SymbolKind::Other, "e", Loc(30, 31), &mut log);
    assert_eq!(log.len(), 1);
  }

  #[test]
  fn private_accessors_pair_up() {
    let (mut st, mut log) = store();
    st.enter_scope(ScopeKind::ClassBody, 8);
    let get = st.declare(SymbolKind::PrivateGet, "#x", Loc(14, 16), &mut log);
    let set = st.declare(SymbolKind::PrivateSet, "#x", Loc(30, 32), &mut log);
    assert_eq!(get, set);
    assert_eq!(st.symbols[get].kind, SymbolKind::PrivateGetSetPair);
    assert_eq!(st.resolve_private("#x", true), Some(get));
    st.leave_scope();
    assert_eq!(st.resolve_private("#x", true), None);
  }

  #[test]
  fn unresolved_names_become_unbound_once() {
    let (mut st, _log) = store();
    st.enter_scope(ScopeKind::Block, 1);
    let a = st.resolve("console", Loc(3, 10), true);
    let b = st.resolve("console", Loc(20, 27), true);
    assert_eq!(a, b);
    assert_eq!(st.symbols[a].kind, SymbolKind::Unbound);
    assert_eq!(st.symbols[a].use_count_estimate, 2);
  }

  #[test]
  fn names_resolved_through_with_are_pinned() {
    let (mut st, mut log) = store();
    let x = st.declare(SymbolKind::Other, "x", Loc(4, 5), &mut log);
    st.enter_scope(ScopeKind::With, 15);
    assert_eq!(st.resolve("x", Loc(17, 18), true), x);
    assert!(st.symbols[x].must_not_be_renamed);
  }

  #[test]
  fn var_declared_directly_in_with_body_is_pinned() {
    let (mut st, mut log) = store();
    st.enter_scope(ScopeKind::With, 9);
    let y = st.declare(SymbolKind::Hoisted, "y", Loc(13, 14), &mut log);
    st.leave_scope();
    assert!(st.symbols[y].must_not_be_renamed);
    assert_eq!(st.scopes.get(st.scopes.root()).members.get("y"), Some(&y));

    let (mut st, mut log) = store();
    st.enter_scope(ScopeKind::Block, 1);
    let z = st.declare(SymbolKind::Hoisted, "z", Loc(7, 8), &mut log);
    assert!(!st.symbols[z].must_not_be_renamed);
  }

  #[test]
  fn direct_eval_pins_members() {
    let (mut st, mut log) = store();
    st.enter_scope(ScopeKind::FunctionArgs, 10);
    st.enter_scope(ScopeKind::FunctionBody, 12);
    let local = st.declare(SymbolKind::Other, "local", Loc(18, 23), &mut log);
    st.mark_direct_eval();
    st.leave_scope();
    assert!(st.symbols[local].must_not_be_renamed);
    assert!(st.scopes.get(st.scopes.root()).contains_direct_eval);
  }

  #[test]
  fn rollback_and_discard_restore_state() {
    let (mut st, mut log) = store();
    let snap = st.snapshot();
    st.enter_scope(ScopeKind::FunctionArgs, 3);
    st.declare(SymbolKind::Hoisted, "p", Loc(4, 5), &mut log);
    st.rollback(snap);
    assert_eq!(st.scopes.len(), 1);
    assert_eq!(st.symbols.len(), 0);
    assert!(st.order.is_empty());

    let index = st.enter_scope(ScopeKind::Entry, 10);
    st.enter_scope(ScopeKind::Block, 12);
    st.leave_scope();
    st.discard_scope(index);
    assert_eq!(st.current_scope(), st.scopes.root());
    assert!(st.order.is_empty());
    assert!(st.scopes.get(st.scopes.root()).children.is_empty());
  }

  #[test]
  fn rollback_undoes_merges_into_older_symbols() {
    let mut st = SymbolStore::new(0, true);
    let mut log = Log::new();
    let first = st.declare(SymbolKind::TsEnum, "E", Loc(5, 6), &mut log);
    let import = st.declare(SymbolKind::Import, "X", Loc(20, 21), &mut log);
    let snap = st.snapshot();
    st.declare(SymbolKind::TsEnum, "E", Loc(40, 41), &mut log);
    st.declare(SymbolKind::Const, "X", Loc(60, 61), &mut log);
    st.enter_scope(ScopeKind::Block, 70);
    st.declare(SymbolKind::Hoisted, "v", Loc(72, 73), &mut log);
    st.rollback(snap);

    assert_eq!(st.symbols.len(), 2);
    assert_eq!(st.symbols[first].link, None);
    assert_eq!(st.symbols[import].link, None);
    assert_eq!(st.symbols.follow(first), first);
    let root = st.scopes.get(st.scopes.root());
    assert_eq!(root.members.get("E"), Some(&first));
    assert_eq!(root.members.get("X"), Some(&import));
    assert!(!root.members.contains_key("v"));
  }

  #[test]
  fn rollback_splits_a_private_accessor_pair() {
    let (mut st, mut log) = store();
    st.enter_scope(ScopeKind::ClassBody, 8);
    let get = st.declare(SymbolKind::PrivateGet, "#x", Loc(14, 16), &mut log);
    let snap = st.snapshot();
    st.declare(SymbolKind::PrivateSet, "#x", Loc(30, 32), &mut log);
    assert_eq!(st.symbols[get].kind, SymbolKind::PrivateGetSetPair);
    st.rollback(snap);
    assert_eq!(st.symbols[get].kind, SymbolKind::PrivateGet);
  }

  #[test]
  fn labels_do_not_cross_functions() {
    let (mut st, mut log) = store();
    st.enter_scope(ScopeKind::Label, 0);
    let label = st.declare(SymbolKind::Label, "outer", Loc(0, 5), &mut log);
    st.scopes.current_scope_mut().label = Some(label);
    st.enter_scope(ScopeKind::Block, 7);
    assert_eq!(st.find_label("outer"), Some(label));
    st.enter_scope(ScopeKind::FunctionArgs, 20);
    st.enter_scope(ScopeKind::FunctionBody, 22);
    assert_eq!(st.find_label("outer"), None);
  }
}
