//! `a?.b.c(d)` becomes `a == null ? void 0 : a.b.c(d)`.
//!
//! A chain that starts with a call must keep the receiver: `a.b?.()` becomes
//! `(_a = a.b) == null ? void 0 : _a.call(a)`.

use super::CaptureMode;
use super::Captured;
use crate::bind::Binder;
use crate::build;
use crate::fold;
use parse_js::ast::expr::CallArg;
use parse_js::ast::expr::CallExpr;
use parse_js::ast::expr::ComputedMemberExpr;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::IdRef;
use parse_js::ast::expr::MemberExpr;
use parse_js::ast::expr::OptionalChain;
use parse_js::ast::expr::PrivateMemberExpr;
use parse_js::ast::node::Node;
use parse_js::loc::Loc;
use parse_js::operator::OperatorName;
use tracing::trace;

// One link of a chain with its object or callee taken out.
enum Link {
  Member {
    loc: Loc,
    right: String,
  },
  Computed {
    loc: Loc,
    member: Node<Expr>,
  },
  Private {
    loc: Loc,
    id: IdRef,
  },
  Call {
    loc: Loc,
    arguments: Vec<CallArg>,
    is_direct_eval: bool,
  },
}

impl Link {
  fn is_member(&self) -> bool {
    !matches!(self, Link::Call { .. })
  }

  fn rebuild(self, object: Node<Expr>) -> Node<Expr> {
    match self {
      Link::Member { loc, right } => build::member(loc, object, right),
      Link::Computed { loc, member } => build::computed_member(loc, object, member),
      Link::Private { loc, id } => Node::new(loc, Expr::PrivateMember(PrivateMemberExpr {
        optional_chain: OptionalChain::None,
        object,
        id,
      })),
      Link::Call {
        loc,
        arguments,
        is_direct_eval,
      } => Node::new(loc, Expr::Call(CallExpr {
        optional_chain: OptionalChain::None,
        is_direct_eval,
        callee: object,
        arguments,
      })),
    }
  }
}

// The `this` for a chain that starts by calling a member.
enum Receiver {
  This(Loc),
  Captured(Captured),
}

impl<'a> Binder<'a> {
  /// Lowers the chain ending at `expr`. With `delete`, the result is `delete expr`.
  pub(crate) fn lower_optional_chain(&mut self, expr: Node<Expr>, delete: bool) -> Node<Expr> {
    self.lower_chain(expr, delete, false).0
  }

  // With `want_receiver`, also captures the object of the outermost link so a call on the result
  // can pass it as `this`.
  fn lower_chain(&mut self, expr: Node<Expr>, delete: bool, want_receiver: bool) -> (Node<Expr>, Option<Captured>) {
    let loc = expr.loc;
    // Outermost link first.
    let mut links = Vec::new();
    let mut current = expr;
    let base = loop {
      let chain = current.stx.optional_chain();
      if chain == OptionalChain::None {
        break current;
      };
      let link_loc = current.loc;
      let (link, inner) = match *current.stx {
        Expr::Member(MemberExpr { object, right, .. }) => (Link::Member { loc: link_loc, right }, object),
        Expr::ComputedMember(ComputedMemberExpr { object, member, .. }) => {
          (Link::Computed { loc: link_loc, member }, object)
        }
        Expr::PrivateMember(PrivateMemberExpr { object, id, .. }) => (Link::Private { loc: link_loc, id }, object),
        Expr::Call(CallExpr {
          callee,
          arguments,
          is_direct_eval,
          ..
        }) => (
          Link::Call {
            loc: link_loc,
            arguments,
            is_direct_eval,
          },
          callee,
        ),
        other => break Node::new(link_loc, other),
      };
      links.push(link);
      if chain == OptionalChain::Start {
        break inner;
      };
      current = inner;
    };
    trace!(links = links.len(), delete, "lowered optional chain");

    let starts_with_call = matches!(links.last(), Some(Link::Call { .. }));
    let (base, mut receiver) = if starts_with_call {
      self.split_callee(base)
    } else {
      (base, None)
    };

    let nullish = fold::nullishness(&base);
    if nullish == Some(true) {
      let result = if delete {
        build::boolean(loc, true)
      } else {
        build::undefined(loc)
      };
      return (result, None);
    };
    let (test, mut base_capture, mut rebuilt) = if nullish == Some(false) {
      (None, None, base)
    } else {
      let mut captured = self.capture(base, CaptureMode::NotMutated);
      let value = self.captured_get(&mut captured);
      let test = build::binary(loc, OperatorName::Equality, value, build::null(loc));
      let rebuilt = self.captured_get(&mut captured);
      (Some(test), Some(captured), rebuilt)
    };

    let mut outer_receiver = None;
    let count = links.len();
    for (i, link) in links.into_iter().rev().enumerate() {
      if want_receiver && i + 1 == count && link.is_member() {
        // A computed key runs between reading the object and calling with it.
        let mode = match &link {
          Link::Computed { .. } => CaptureMode::CouldBeMutated,
          _ => CaptureMode::NotMutated,
        };
        let mut captured = self.capture(rebuilt, mode);
        rebuilt = self.captured_get(&mut captured);
        outer_receiver = Some(captured);
      };
      rebuilt = match (i, link, receiver.as_mut()) {
        (
          0,
          Link::Call {
            loc: call_loc,
            arguments,
            ..
          },
          Some(receiver),
        ) => {
          let this = match receiver {
            Receiver::This(this_loc) => Node::new(*this_loc, Expr::This),
            Receiver::Captured(captured) => self.captured_get(captured),
          };
          let mut args = Vec::with_capacity(arguments.len() + 1);
          args.push(build::arg(this));
          args.extend(arguments);
          build::call_with_args(call_loc, build::member(call_loc, rebuilt, "call"), args)
        }
        (_, link, _) => link.rebuild(rebuilt),
      };
    }

    let rebuilt = if delete {
      build::unary(loc, OperatorName::Delete, rebuilt)
    } else {
      rebuilt
    };
    let mut result = match test {
      Some(test) => {
        let short = if delete {
          build::boolean(loc, true)
        } else {
          build::undefined(loc)
        };
        build::cond(loc, test, short, rebuilt)
      }
      None => rebuilt,
    };
    if let Some(captured) = base_capture.take() {
      result = self.captured_wrap(captured, result);
    };
    if let Some(Receiver::Captured(captured)) = receiver {
      result = self.captured_wrap(captured, result);
    };
    (result, outer_receiver)
  }

  // Splits the callee of a chain that starts with a call into the function and its receiver.
  fn split_callee(&mut self, callee: Node<Expr>) -> (Node<Expr>, Option<Receiver>) {
    if callee.stx.optional_chain() != OptionalChain::None {
      // `a?.b.c?.()`: the inner chain is lowered here so it can hand over `a.b`.
      let (lowered, receiver) = self.lower_chain(callee, false, true);
      return (lowered, receiver.map(Receiver::Captured));
    };
    let loc = callee.loc;
    match *callee.stx {
      Expr::Member(member) if matches!(member.object.stx.as_ref(), Expr::Super) => {
        let this_loc = member.object.loc;
        (Node::new(loc, Expr::Member(member)), Some(Receiver::This(this_loc)))
      }
      Expr::ComputedMember(member) if matches!(member.object.stx.as_ref(), Expr::Super) => {
        let this_loc = member.object.loc;
        (Node::new(loc, Expr::ComputedMember(member)), Some(Receiver::This(this_loc)))
      }
      Expr::Member(member) => {
        let mut object = self.capture(member.object, CaptureMode::NotMutated);
        let first = self.captured_get(&mut object);
        (build::member(loc, first, member.right), Some(Receiver::Captured(object)))
      }
      Expr::ComputedMember(member) => {
        let mut object = self.capture(member.object, CaptureMode::CouldBeMutated);
        let first = self.captured_get(&mut object);
        (
          build::computed_member(loc, first, member.member),
          Some(Receiver::Captured(object)),
        )
      }
      Expr::PrivateMember(member) => {
        let mut object = self.capture(member.object, CaptureMode::NotMutated);
        let first = self.captured_get(&mut object);
        let base = Node::new(loc, Expr::PrivateMember(PrivateMemberExpr {
          optional_chain: OptionalChain::None,
          object: first,
          id: member.id,
        }));
        (base, Some(Receiver::Captured(object)))
      }
      other => (Node::new(loc, other), None),
    }
  }
}
