//! `??`, `**` and the compound assignments built on them.

use super::CaptureMode;
use crate::bind::Binder;
use crate::build;
use crate::helpers::Helper;
use crate::options::Feature;
use parse_js::ast::expr::Expr;
use parse_js::ast::node::Node;
use parse_js::loc::Loc;
use parse_js::operator::OperatorName;
use tracing::trace;

impl<'a> Binder<'a> {
  /// Lowers a folded binary expression if its operator isn't supported.
  pub(crate) fn lower_binary(&mut self, expr: Node<Expr>) -> Node<Expr> {
    let needs_lowering = match expr.stx.as_ref() {
      Expr::Binary(bin) => match bin.operator {
        OperatorName::NullishCoalescing => !self.supports(Feature::NullishCoalescing),
        OperatorName::Exponentiation => !self.supports(Feature::Exponent),
        _ => false,
      },
      _ => false,
    };
    if !needs_lowering {
      return expr;
    };
    let loc = expr.loc;
    match *expr.stx {
      Expr::Binary(bin) if bin.operator == OperatorName::NullishCoalescing => {
        self.lower_nullish(loc, bin.left, bin.right)
      }
      Expr::Binary(bin) => self.lower_pow(loc, bin.left, bin.right),
      other => Node::new(loc, other),
    }
  }

  /// `a ?? b` becomes `a != null ? a : b`, or with strict comparisons,
  /// `a !== null && a !== void 0 ? a : b`.
  pub(crate) fn lower_nullish(&mut self, loc: Loc, left: Node<Expr>, right: Node<Expr>) -> Node<Expr> {
    trace!("lowered nullish coalescing");
    let mut left = self.capture(left, CaptureMode::NotMutated);
    let test = if self.options.strict_nullish {
      let not_null = self.captured_get(&mut left);
      let not_undefined = self.captured_get(&mut left);
      build::binary(
        loc,
        OperatorName::LogicalAnd,
        build::binary(loc, OperatorName::StrictInequality, not_null, build::null(loc)),
        build::binary(loc, OperatorName::StrictInequality, not_undefined, build::undefined(loc)),
      )
    } else {
      let value = self.captured_get(&mut left);
      build::binary(loc, OperatorName::Inequality, value, build::null(loc))
    };
    let value = self.captured_get(&mut left);
    let result = build::cond(loc, test, value, right);
    self.captured_wrap(left, result)
  }

  /// `a ** b` becomes `__pow(a, b)`.
  pub(crate) fn lower_pow(&mut self, loc: Loc, left: Node<Expr>, right: Node<Expr>) -> Node<Expr> {
    trace!("lowered exponentiation");
    let pow = self.helper(Helper::Pow, loc);
    build::call(loc, pow, vec![left, right])
  }

  /// Lowers compound assignments the target lacks. Others are rebuilt as-is.
  pub(crate) fn lower_assign(
    &mut self,
    loc: Loc,
    operator: OperatorName,
    left: Node<Expr>,
    right: Node<Expr>,
  ) -> Node<Expr> {
    match operator {
      OperatorName::AssignmentLogicalAnd
      | OperatorName::AssignmentLogicalOr
      | OperatorName::AssignmentNullishCoalescing
        if !self.supports(Feature::LogicalAssignment) =>
      {
        self.lower_logical_assign(loc, operator, left, right)
      }
      OperatorName::AssignmentExponentiation if !self.supports(Feature::Exponent) => {
        self.lower_pow_assign(loc, left, right)
      }
      _ => build::binary(loc, operator, left, right),
    }
  }

  // `a.b ||= c` becomes `(_a = a).b || (_a.b = c)`.
  fn lower_logical_assign(
    &mut self,
    loc: Loc,
    operator: OperatorName,
    left: Node<Expr>,
    right: Node<Expr>,
  ) -> Node<Expr> {
    let mut target = match self.split_assign_target(left) {
      Ok(target) => target,
      Err(left) => return build::binary(loc, operator, left, right),
    };
    trace!(operator = operator.text(), "lowered logical assignment");
    let read = self.assign_target_ref(&mut target, loc);
    let write = self.assign_target_ref(&mut target, loc);
    let assign = build::assign(loc, write, right);
    let result = match operator {
      OperatorName::AssignmentLogicalAnd => build::binary(loc, OperatorName::LogicalAnd, read, assign),
      OperatorName::AssignmentLogicalOr => build::binary(loc, OperatorName::LogicalOr, read, assign),
      _ if self.supports(Feature::NullishCoalescing) => {
        build::binary(loc, OperatorName::NullishCoalescing, read, assign)
      }
      _ => self.lower_nullish(loc, read, assign),
    };
    self.assign_target_wrap(target, result)
  }

  // `a.b **= c` becomes `(_a = a).b = __pow(_a.b, c)`.
  fn lower_pow_assign(&mut self, loc: Loc, left: Node<Expr>, right: Node<Expr>) -> Node<Expr> {
    let mut target = match self.split_assign_target(left) {
      Ok(target) => target,
      Err(left) => return build::binary(loc, OperatorName::AssignmentExponentiation, left, right),
    };
    let write = self.assign_target_ref(&mut target, loc);
    let read = self.assign_target_ref(&mut target, loc);
    let value = self.lower_pow(loc, read, right);
    let result = build::assign(loc, write, value);
    self.assign_target_wrap(target, result)
  }
}
