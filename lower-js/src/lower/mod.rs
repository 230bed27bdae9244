//! Rewrites syntax the target doesn't support. Each rule runs inline as the binder leaves a node,
//! so every rewritten subtree is already bound.

pub(crate) mod assign;
pub(crate) mod class;
pub(crate) mod jsx;
pub(crate) mod optional_chain;
pub(crate) mod spread;
pub(crate) mod ts;

use crate::bind::Binder;
use crate::build;
use derive_visitor::DriveMut;
use derive_visitor::VisitorMut;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::IdRef;
use parse_js::ast::node::Node;
use parse_js::loc::Loc;
use parse_js::operator::OperatorName;
use parse_js::symbol::SymbolKind;
use parse_js::symbol::SymbolRef;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum CaptureMode {
  // Nothing runs between the reads, so an identifier can simply be read again.
  NotMutated,
  // Code between the reads may assign to the identifier.
  CouldBeMutated,
}

/// An expression that is evaluated once but read several times in the lowered output.
///
/// The first read assigns a temporary inline, so evaluation order is unchanged, and later reads use
/// the temporary. Literals and (when safe) identifiers are read again instead.
pub(crate) struct Captured {
  loc: Loc,
  value: Option<Node<Expr>>,
  repeatable: Option<Node<Expr>>,
  temp: Option<SymbolRef>,
  reads: u32,
}

type ExprNode = Node<Expr>;

// Turns the only `_a = value` back into `value` once it's known `_a` is never read again.
#[derive(VisitorMut)]
#[visitor(ExprNode(exit))]
struct InlineTemp {
  temp: SymbolRef,
  done: bool,
}

impl InlineTemp {
  fn exit_expr_node(&mut self, node: &mut ExprNode) {
    if self.done {
      return;
    };
    let Expr::Binary(bin) = node.stx.as_ref() else {
      return;
    };
    let assigns_temp = bin.operator == OperatorName::Assignment
      && matches!(bin.left.stx.as_ref(), Expr::Id(id) if id.id == IdRef::Resolved(self.temp));
    if !assigns_temp {
      return;
    };
    let expr = std::mem::replace(&mut *node.stx, Expr::Missing);
    if let Expr::Binary(bin) = expr {
      *node = bin.right;
      self.done = true;
    };
  }
}

impl<'a> Binder<'a> {
  pub(crate) fn capture(&mut self, value: Node<Expr>, mode: CaptureMode) -> Captured {
    let repeatable = match value.stx.as_ref() {
      Expr::LitNum(_)
      | Expr::LitStr(_)
      | Expr::LitBool(_)
      | Expr::LitNull
      | Expr::LitBigInt(_)
      | Expr::Undefined
      | Expr::This => true,
      Expr::Id(id) => match (mode, id.id) {
        (CaptureMode::NotMutated, _) => true,
        (CaptureMode::CouldBeMutated, IdRef::Resolved(r)) => {
          let r = self.store.symbols.follow(r);
          matches!(
            self.store.symbols[r].kind,
            SymbolKind::Const | SymbolKind::Import | SymbolKind::Generated
          )
        }
        _ => false,
      },
      _ => false,
    };
    let loc = value.loc;
    if repeatable {
      Captured {
        loc,
        value: None,
        repeatable: Some(value),
        temp: None,
        reads: 0,
      }
    } else {
      Captured {
        loc,
        value: Some(value),
        repeatable: None,
        temp: None,
        reads: 0,
      }
    }
  }

  /// Reads the captured value.
  pub(crate) fn captured_get(&mut self, captured: &mut Captured) -> Node<Expr> {
    captured.reads += 1;
    if let Some(expr) = &captured.repeatable {
      let expr = expr.clone();
      if captured.reads > 1 {
        if let Expr::Id(id) = expr.stx.as_ref() {
          self.record_use(id.id.symbol());
        };
      };
      return expr;
    };
    let loc = captured.loc;
    match captured.value.take() {
      Some(value) => {
        let temp = self.new_temp(loc);
        self.record_use(temp);
        captured.temp = Some(temp);
        build::assign(loc, build::id(loc, temp), value)
      }
      None => {
        // A second read always follows a first, which created the temporary.
        let temp = captured.temp.unwrap_or_else(|| self.new_temp(loc));
        self.record_use(temp);
        build::id(loc, temp)
      }
    }
  }

  /// Finishes a capture around the lowered expression that contains its reads.
  pub(crate) fn captured_wrap(&mut self, captured: Captured, result: Node<Expr>) -> Node<Expr> {
    if captured.repeatable.is_some() {
      return result;
    };
    if let Some(value) = captured.value {
      if value.stx.is_primitive_literal() {
        return result;
      };
      return build::comma(captured.loc, value, result);
    };
    let mut result = result;
    if let (1, Some(temp)) = (captured.reads, captured.temp) {
      let mut inline = InlineTemp { temp, done: false };
      result.drive_mut(&mut inline);
      if inline.done {
        self.remove_temp(temp);
      };
    };
    result
  }
}

/// The target of a compound assignment, split so it can be read and then written without
/// evaluating its object or key twice.
pub(crate) enum AssignTarget {
  Id(Node<Expr>),
  Member {
    object: Captured,
    name: String,
  },
  Computed {
    object: Captured,
    key: Captured,
  },
}

impl<'a> Binder<'a> {
  /// Hands the target back if it can't be split, e.g. a private member.
  pub(crate) fn split_assign_target(&mut self, target: Node<Expr>) -> Result<AssignTarget, Node<Expr>> {
    let loc = target.loc;
    match *target.stx {
      Expr::Id(id) => Ok(AssignTarget::Id(Node::new(loc, Expr::Id(id)))),
      Expr::Member(member) if !matches!(member.object.stx.as_ref(), Expr::Super) => {
        let object = self.capture(member.object, CaptureMode::CouldBeMutated);
        Ok(AssignTarget::Member {
          object,
          name: member.right,
        })
      }
      Expr::ComputedMember(member) if !matches!(member.object.stx.as_ref(), Expr::Super) => {
        let object = self.capture(member.object, CaptureMode::CouldBeMutated);
        let key = self.capture(member.member, CaptureMode::CouldBeMutated);
        Ok(AssignTarget::Computed { object, key })
      }
      other => Err(Node::new(loc, other)),
    }
  }

  /// An expression referring to the target. Call once for the read and once for the write.
  pub(crate) fn assign_target_ref(&mut self, target: &mut AssignTarget, loc: Loc) -> Node<Expr> {
    match target {
      AssignTarget::Id(id) => {
        let id = id.clone();
        if let Expr::Id(e) = id.stx.as_ref() {
          if let IdRef::Resolved(r) = e.id {
            self.record_use(r);
          };
        };
        id
      }
      AssignTarget::Member { object, name } => {
        let object = self.captured_get(object);
        build::member(loc, object, name.clone())
      }
      AssignTarget::Computed { object, key } => {
        let object = self.captured_get(object);
        let key = self.captured_get(key);
        build::computed_member(loc, object, key)
      }
    }
  }

  pub(crate) fn assign_target_wrap(&mut self, target: AssignTarget, result: Node<Expr>) -> Node<Expr> {
    match target {
      AssignTarget::Id(_) => result,
      AssignTarget::Member { object, .. } => self.captured_wrap(object, result),
      AssignTarget::Computed { object, key } => {
        let result = self.captured_wrap(key, result);
        self.captured_wrap(object, result)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::defines::ProcessedDefines;
  use crate::options::LowerOptions;
  use diagnostics::Log;
  use parse_js::name::NameTable;
  use parse_js::store::SymbolStore;

  fn with_binder(f: impl FnOnce(&mut Binder)) {
    let options = LowerOptions::default();
    let mut binder = Binder::new(
      "",
      &options,
      ProcessedDefines::known_globals(),
      SymbolStore::new(0, false),
      NameTable::new(),
      Log::new(),
      Vec::new(),
    );
    binder.push_temp_frame();
    f(&mut binder);
  }

  fn call(loc: Loc) -> Node<Expr> {
    build::call(loc, build::string(loc, "f"), Vec::new())
  }

  #[test]
  fn literal_is_read_again() {
    with_binder(|b| {
      let loc = Loc(0, 1);
      let mut c = b.capture(build::number(loc, 1.0), CaptureMode::NotMutated);
      let first = b.captured_get(&mut c);
      let second = b.captured_get(&mut c);
      let result = b.captured_wrap(c, build::comma(loc, first, second));
      assert!(matches!(result.stx.as_ref(), Expr::Binary(bin) if matches!(bin.left.stx.as_ref(), Expr::LitNum(_))));
      assert!(b.pop_temp_frame().is_empty());
    });
  }

  #[test]
  fn side_effects_get_one_temporary() {
    with_binder(|b| {
      let loc = Loc(0, 3);
      let mut c = b.capture(call(loc), CaptureMode::NotMutated);
      let first = b.captured_get(&mut c);
      let second = b.captured_get(&mut c);
      let result = b.captured_wrap(c, build::comma(loc, first, second));
      let Expr::Binary(bin) = result.stx.as_ref() else {
        panic!("expected comma");
      };
      assert!(matches!(bin.left.stx.as_ref(), Expr::Binary(assign) if assign.operator == OperatorName::Assignment));
      assert!(matches!(bin.right.stx.as_ref(), Expr::Id(_)));
      assert_eq!(b.pop_temp_frame().len(), 1);
    });
  }

  #[test]
  fn single_read_drops_the_temporary() {
    with_binder(|b| {
      let loc = Loc(0, 3);
      let mut c = b.capture(call(loc), CaptureMode::NotMutated);
      let only = b.captured_get(&mut c);
      let result = b.captured_wrap(c, build::not(loc, only));
      let Expr::Unary(unary) = result.stx.as_ref() else {
        panic!("expected unary");
      };
      assert!(matches!(unary.argument.stx.as_ref(), Expr::Call(_)));
      assert!(b.pop_temp_frame().is_empty());
    });
  }

  #[test]
  fn unread_value_still_runs() {
    with_binder(|b| {
      let loc = Loc(0, 3);
      let c = b.capture(call(loc), CaptureMode::NotMutated);
      let result = b.captured_wrap(c, build::boolean(loc, true));
      assert!(matches!(result.stx.as_ref(), Expr::Binary(bin) if bin.operator == OperatorName::Comma));
    });
  }
}
