use crate::symbol::SymbolRef;
use ahash::HashMap;
use serde::Serialize;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize)]
pub struct ScopeId(u32);

impl ScopeId {
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// Ordered so that every kind from `Entry` onwards is a hoisting boundary.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize)]
pub enum ScopeKind {
  Block,
  With,
  Label,
  ClassName,
  ClassBody,
  CatchBinding,

  // The module, and the bodies of TypeScript enums and namespaces.
  Entry,
  FunctionArgs,
  FunctionBody,
  ClassStaticInit,
}

impl ScopeKind {
  pub fn stops_hoisting(self) -> bool {
    self >= ScopeKind::Entry
  }
}

#[derive(Clone, Debug, Serialize)]
pub struct Scope {
  pub kind: ScopeKind,
  // Source offset the scope was entered at; pass 2 uses it to find the scope again.
  pub loc: usize,
  pub parent: Option<ScopeId>,
  pub children: Vec<ScopeId>,
  pub members: HashMap<String, SymbolRef>,
  // Symbols that exist in this scope but can't be found by name lookup.
  pub generated: Vec<SymbolRef>,
  pub contains_direct_eval: bool,
  // Only for `Label` scopes.
  pub label: Option<SymbolRef>,
}

impl Scope {
  fn new(kind: ScopeKind, loc: usize, parent: Option<ScopeId>) -> Scope {
    Scope {
      kind,
      loc,
      parent,
      children: Vec::new(),
      members: HashMap::default(),
      generated: Vec::new(),
      contains_direct_eval: false,
      label: None,
    }
  }
}

/// Arena of scopes. Parent and child links are `ScopeId`s into the same arena, so rolling back is a
/// truncation.
#[derive(Clone, Debug, Serialize)]
pub struct ScopeTree {
  scopes: Vec<Scope>,
  #[serde(skip)]
  current: ScopeId,
}

impl ScopeTree {
  pub fn new() -> ScopeTree {
    ScopeTree {
      scopes: vec![Scope::new(ScopeKind::Entry, 0, None)],
      current: ScopeId(0),
    }
  }

  pub fn root(&self) -> ScopeId {
    ScopeId(0)
  }

  pub fn current(&self) -> ScopeId {
    self.current
  }

  pub fn set_current(&mut self, id: ScopeId) {
    self.current = id;
  }

  pub fn get(&self, id: ScopeId) -> &Scope {
    &self.scopes[id.index()]
  }

  pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
    &mut self.scopes[id.index()]
  }

  pub fn current_scope(&self) -> &Scope {
    self.get(self.current)
  }

  pub fn current_scope_mut(&mut self) -> &mut Scope {
    let id = self.current;
    self.get_mut(id)
  }

  pub fn len(&self) -> usize {
    self.scopes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.scopes.is_empty()
  }

  /// Creates a child of the current scope and makes it current.
  pub fn create(&mut self, kind: ScopeKind, loc: usize) -> ScopeId {
    let id = ScopeId(self.scopes.len() as u32);
    let parent = self.current;
    self.scopes.push(Scope::new(kind, loc, Some(parent)));
    self.get_mut(parent).children.push(id);
    self.current = id;
    id
  }

  /// Makes the parent of the current scope current, returning the scope that was left.
  pub fn leave(&mut self) -> ScopeId {
    let left = self.current;
    // The module scope is never left.
    debug_assert!(self.get(left).parent.is_some());
    if let Some(parent) = self.get(left).parent {
      self.current = parent;
    };
    left
  }

  /// Iterates from `id` up to the module scope, inclusive.
  pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
    let mut next = Some(id);
    std::iter::from_fn(move || {
      let cur = next?;
      next = self.get(cur).parent;
      Some(cur)
    })
  }

  /// Removes every scope created after the first `len`. `current` must be set by the caller.
  pub fn truncate(&mut self, len: usize) {
    self.scopes.truncate(len);
    for scope in self.scopes.iter_mut() {
      scope.children.retain(|c| c.index() < len);
    }
  }

  /// Splices `id` out of the tree, moving its children into its parent at its position. The scope
  /// record stays in the arena but is unreachable.
  pub fn flatten(&mut self, id: ScopeId) {
    let Some(parent) = self.get(id).parent else {
      panic!("cannot flatten the module scope");
    };
    let children = std::mem::take(&mut self.get_mut(id).children);
    for &child in children.iter() {
      self.get_mut(child).parent = Some(parent);
    }
    let siblings = &mut self.get_mut(parent).children;
    let pos = siblings.iter().position(|&c| c == id);
    match pos {
      Some(pos) => {
        siblings.splice(pos..pos + 1, children);
      }
      None => siblings.extend(children),
    };
    self.get_mut(id).parent = None;
    if self.current == id {
      self.current = parent;
    };
  }
}

impl Default for ScopeTree {
  fn default() -> Self {
    ScopeTree::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kinds_from_entry_stop_hoisting() {
    assert!(!ScopeKind::Block.stops_hoisting());
    assert!(!ScopeKind::CatchBinding.stops_hoisting());
    assert!(ScopeKind::Entry.stops_hoisting());
    assert!(ScopeKind::FunctionBody.stops_hoisting());
  }

  #[test]
  fn flatten_reparents_children() {
    let mut tree = ScopeTree::new();
    let args = tree.create(ScopeKind::FunctionArgs, 1);
    let inner = tree.create(ScopeKind::FunctionArgs, 5);
    tree.leave();
    let block = tree.create(ScopeKind::Block, 9);
    tree.leave();
    assert_eq!(tree.current(), args);
    tree.flatten(args);
    assert_eq!(tree.current(), tree.root());
    assert_eq!(tree.get(tree.root()).children, vec![inner, block]);
    assert_eq!(tree.get(inner).parent, Some(tree.root()));
  }

  #[test]
  fn truncate_drops_later_scopes() {
    let mut tree = ScopeTree::new();
    let a = tree.create(ScopeKind::Block, 1);
    tree.leave();
    let b = tree.create(ScopeKind::Block, 4);
    tree.create(ScopeKind::Block, 6);
    tree.truncate(b.index());
    tree.set_current(tree.root());
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.get(tree.root()).children, vec![a]);
    assert_eq!(tree.ancestors(a).collect::<Vec<_>>(), vec![a, tree.root()]);
  }
}
