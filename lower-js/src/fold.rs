//! Constant folding. Only rewrites whose result can't be told apart from the original at runtime.
//!
//! Comparisons, `!`, `typeof` and string concatenation of literals always fold. Arithmetic folds
//! with `mangle_syntax`, and always inside enum initializers.

use crate::bind::Binder;
use crate::build;
use parse_js::ast::class_or_object::ClassMember;
use parse_js::ast::class_or_object::ClassOrObjKey;
use parse_js::ast::class_or_object::ClassOrObjVal;
use parse_js::ast::expr::ArrElem;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::IdRef;
use parse_js::ast::expr::ObjMemberType;
use parse_js::ast::expr::TemplateExpr;
use parse_js::ast::expr::TemplatePart;
use parse_js::ast::expr::TemplateStr;
use parse_js::ast::node::Node;
use parse_js::error::Issue;
use parse_js::loc::Loc;
use parse_js::num::JsNumber;
use parse_js::operator::OperatorName;
use parse_js::symbol::SymbolKind;
use parse_js::symbol::SymbolTable;
use tracing::trace;

const TYPEOF_RESULTS: &[&str] = &[
  "bigint",
  "boolean",
  "function",
  "number",
  "object",
  "string",
  "symbol",
  "undefined",
  // Some old browsers report this for host objects.
  "unknown",
];

/// The boolean value of a primitive literal.
pub fn truthiness(expr: &Node<Expr>) -> Option<bool> {
  match expr.stx.as_ref() {
    Expr::LitBool(b) => Some(*b),
    Expr::LitNull | Expr::Undefined => Some(false),
    Expr::LitNum(n) => Some(n.0 != 0.0 && !n.0.is_nan()),
    Expr::LitStr(s) => Some(!s.is_empty()),
    Expr::LitBigInt(b) => Some(b.trim_start_matches('0') != ""),
    _ => None,
  }
}

/// Whether an expression is known to be `null`/`undefined`, or known not to be.
pub fn nullishness(expr: &Node<Expr>) -> Option<bool> {
  match expr.stx.as_ref() {
    Expr::LitNull | Expr::Undefined => Some(true),
    // Dropping the operand must not lose a side effect.
    Expr::Unary(u) if u.operator == OperatorName::Void && u.argument.stx.is_primitive_literal() => {
      Some(true)
    }
    Expr::LitBool(_)
    | Expr::LitNum(_)
    | Expr::LitStr(_)
    | Expr::LitBigInt(_)
    | Expr::LitRegex(_)
    | Expr::LitArr(_)
    | Expr::LitObj(_)
    | Expr::Template(_)
    | Expr::Func(_)
    | Expr::ArrowFunc(_)
    | Expr::Class(_) => Some(false),
    _ => None,
  }
}

fn typeof_literal(expr: &Node<Expr>) -> Option<&'static str> {
  Some(match expr.stx.as_ref() {
    Expr::LitBool(_) => "boolean",
    Expr::LitNull => "object",
    Expr::LitNum(_) => "number",
    Expr::LitStr(_) => "string",
    Expr::LitBigInt(_) => "bigint",
    Expr::Undefined => "undefined",
    Expr::Func(_) | Expr::ArrowFunc(_) => "function",
    _ => return None,
  })
}

fn as_num(expr: &Node<Expr>) -> Option<f64> {
  match expr.stx.as_ref() {
    Expr::LitNum(n) => Some(n.0),
    _ => None,
  }
}

fn as_str(expr: &Node<Expr>) -> Option<&str> {
  match expr.stx.as_ref() {
    Expr::LitStr(s) => Some(s.as_str()),
    _ => None,
  }
}

// Direct comparison of two literals of the same kind. Mixed kinds aren't folded.
fn literal_equals(left: &Node<Expr>, right: &Node<Expr>) -> Option<bool> {
  match (left.stx.as_ref(), right.stx.as_ref()) {
    (Expr::LitNum(a), Expr::LitNum(b)) => Some(a.0 == b.0),
    (Expr::LitStr(a), Expr::LitStr(b)) => Some(a == b),
    (Expr::LitBool(a), Expr::LitBool(b)) => Some(a == b),
    (Expr::LitNull, Expr::LitNull) | (Expr::Undefined, Expr::Undefined) => Some(true),
    _ => None,
  }
}

fn is_negative_zero(expr: &Node<Expr>) -> bool {
  match expr.stx.as_ref() {
    Expr::LitNum(n) => n.0 == 0.0 && n.0.is_sign_negative(),
    Expr::Unary(u) => {
      u.operator == OperatorName::UnaryNegation && matches!(u.argument.stx.as_ref(), Expr::LitNum(n) if n.0 == 0.0)
    }
    _ => false,
  }
}

// Literals that create a new object every time they're evaluated.
fn is_fresh_reference(expr: &Node<Expr>) -> bool {
  matches!(
    expr.stx.as_ref(),
    Expr::LitObj(_) | Expr::LitArr(_) | Expr::Func(_) | Expr::ArrowFunc(_) | Expr::Class(_) | Expr::LitRegex(_)
  )
}

fn js_pow(base: f64, exponent: f64) -> f64 {
  // Unlike `powf`, `1 ** NaN` and `(-1) ** Infinity` are NaN.
  if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
    return f64::NAN;
  };
  base.powf(exponent)
}

fn escape_template_raw(cooked: &str) -> String {
  let mut raw = String::with_capacity(cooked.len());
  let mut chars = cooked.chars().peekable();
  while let Some(c) = chars.next() {
    match c {
      '\\' => raw.push_str("\\\\"),
      '`' => raw.push_str("\\`"),
      '\r' => raw.push_str("\\r"),
      '$' if chars.peek() == Some(&'{') => raw.push_str("\\$"),
      c => raw.push(c),
    };
  }
  raw
}

/// Whether evaluating the expression and discarding the result can be skipped.
pub fn is_side_effect_free(expr: &Node<Expr>, symbols: &SymbolTable) -> bool {
  match expr.stx.as_ref() {
    Expr::LitNull
    | Expr::LitBool(_)
    | Expr::LitNum(_)
    | Expr::LitStr(_)
    | Expr::LitBigInt(_)
    | Expr::LitRegex(_)
    | Expr::Undefined
    | Expr::This
    | Expr::ImportMeta => true,
    Expr::ArrowFunc(_) | Expr::Func(_) => true,
    Expr::Id(id) => {
      id.can_be_removed_if_unused
        || match id.id {
          IdRef::Resolved(r) => symbols[symbols.follow(r)].kind != SymbolKind::Unbound,
          IdRef::Deferred(_) => false,
        }
    }
    Expr::Member(member) => member.can_be_removed_if_unused && is_side_effect_free(&member.object, symbols),
    Expr::Unary(unary) => match unary.operator {
      OperatorName::Typeof if matches!(unary.argument.stx.as_ref(), Expr::Id(_)) => true,
      OperatorName::UnaryPlus
      | OperatorName::UnaryNegation
      | OperatorName::LogicalNot
      | OperatorName::BitwiseNot
      | OperatorName::Typeof
      | OperatorName::Void => is_side_effect_free(&unary.argument, symbols),
      _ => false,
    },
    Expr::Binary(bin) => {
      use OperatorName::*;
      if !is_side_effect_free(&bin.left, symbols) || !is_side_effect_free(&bin.right, symbols) {
        return false;
      };
      matches!(
        bin.operator,
        Addition
          | Subtraction
          | Multiplication
          | Division
          | Remainder
          | Exponentiation
          | BitwiseAnd
          | BitwiseOr
          | BitwiseXor
          | BitwiseLeftShift
          | BitwiseRightShift
          | BitwiseUnsignedRightShift
          | LessThan
          | LessThanOrEqual
          | GreaterThan
          | GreaterThanOrEqual
          | Equality
          | Inequality
          | StrictEquality
          | StrictInequality
          | LogicalAnd
          | LogicalOr
          | NullishCoalescing
          | Comma
      )
    }
    Expr::Cond(cond) => {
      is_side_effect_free(&cond.test, symbols)
        && is_side_effect_free(&cond.consequent, symbols)
        && is_side_effect_free(&cond.alternate, symbols)
    }
    Expr::LitArr(arr) => arr.elements.iter().all(|elem| match elem {
      ArrElem::Single(expr) => is_side_effect_free(expr, symbols),
      ArrElem::Empty => true,
      ArrElem::Rest(_) => false,
    }),
    Expr::LitObj(obj) => obj.members.iter().all(|member| match &member.stx.typ {
      ObjMemberType::Valued { key, val } => {
        if matches!(key, ClassOrObjKey::Computed(_)) {
          return false;
        };
        match val {
          ClassOrObjVal::Prop(Some(expr)) => is_side_effect_free(expr, symbols),
          ClassOrObjVal::Prop(None) => true,
          ClassOrObjVal::Getter(_) | ClassOrObjVal::Setter(_) | ClassOrObjVal::Method(_) => true,
          ClassOrObjVal::StaticBlock(_) => false,
        }
      }
      ObjMemberType::Shorthand { id, .. } => match id {
        IdRef::Resolved(r) => symbols[symbols.follow(*r)].kind != SymbolKind::Unbound,
        IdRef::Deferred(_) => false,
      },
      ObjMemberType::Rest { .. } => false,
    }),
    Expr::Class(class) => {
      // `class extends 1 {}` throws.
      class.extends.is_none() && class.members.iter().all(|m| is_side_effect_free_class_member(&m.stx, symbols))
    }
    Expr::Template(tpl) => tpl.parts.iter().all(|part| match part {
      TemplatePart::Str(_) => true,
      TemplatePart::Expr(expr) => is_side_effect_free(expr, symbols),
    }),
    _ => false,
  }
}

pub fn is_side_effect_free_class_member(member: &ClassMember, symbols: &SymbolTable) -> bool {
  if let ClassOrObjKey::Computed(key) = &member.key {
    if !matches!(key.stx.as_ref(), Expr::LitStr(_) | Expr::LitNum(_)) {
      return false;
    };
  };
  match &member.val {
    ClassOrObjVal::Getter(_) | ClassOrObjVal::Setter(_) | ClassOrObjVal::Method(_) => true,
    ClassOrObjVal::Prop(None) => true,
    // Instance initializers only run on construction.
    ClassOrObjVal::Prop(Some(_)) if !member.static_ => true,
    ClassOrObjVal::Prop(Some(expr)) => is_side_effect_free(expr, symbols),
    ClassOrObjVal::StaticBlock(_) => false,
  }
}

impl<'a> Binder<'a> {
  fn folds_arithmetic(&self) -> bool {
    self.options.mangle_syntax || self.in_enum
  }

  pub(crate) fn is_side_effect_free(&self, expr: &Node<Expr>) -> bool {
    is_side_effect_free(expr, &self.store.symbols)
  }

  pub(crate) fn fold_unary(&mut self, loc: Loc, operator: OperatorName, argument: Node<Expr>) -> Node<Expr> {
    match operator {
      OperatorName::LogicalNot => {
        if let Some(value) = truthiness(&argument) {
          return build::boolean(loc, !value);
        };
      }
      OperatorName::Typeof => {
        if let Some(name) = typeof_literal(&argument) {
          return build::string(loc, name);
        };
      }
      OperatorName::Void if self.options.mangle_syntax && argument.stx.is_primitive_literal() => {
        return build::undefined(loc);
      }
      OperatorName::UnaryNegation if self.folds_arithmetic() => {
        if let Some(n) = as_num(&argument) {
          return build::number(loc, -n);
        };
      }
      OperatorName::UnaryPlus if self.folds_arithmetic() => {
        if let Some(n) = as_num(&argument) {
          return build::number(loc, n);
        };
      }
      OperatorName::BitwiseNot if self.folds_arithmetic() => {
        if let Some(n) = as_num(&argument) {
          return build::number(loc, !JsNumber(n).to_int32() as f64);
        };
      }
      _ => {}
    };
    build::unary(loc, operator, argument)
  }

  fn check_equality(&mut self, loc: Loc, operator: OperatorName, left: &Node<Expr>, right: &Node<Expr>) {
    if is_negative_zero(left) || is_negative_zero(right) {
      self.issue(
        Issue::NegativeZeroComparison,
        loc,
        format!("comparison with -0 using the \"{}\" operator will also match 0", operator.text()),
      );
    };
    if is_fresh_reference(left) || is_fresh_reference(right) {
      let always = matches!(operator, OperatorName::Inequality | OperatorName::StrictInequality);
      self.issue(
        Issue::ReferenceComparison,
        loc,
        format!(
          "comparison using the \"{}\" operator here is always {}",
          operator.text(),
          always
        ),
      );
    };
    for (a, b) in [(left, right), (right, left)] {
      let is_typeof = matches!(a.stx.as_ref(), Expr::Unary(u) if u.operator == OperatorName::Typeof);
      if let (true, Some(s)) = (is_typeof, as_str(b)) {
        if !TYPEOF_RESULTS.contains(&s) {
          self.issue(
            Issue::TypeofComparison,
            b.loc,
            format!("the \"typeof\" operator will never evaluate to \"{}\"", s),
          );
        };
      };
    }
  }

  pub(crate) fn fold_binary(
    &mut self,
    loc: Loc,
    operator: OperatorName,
    left: Node<Expr>,
    right: Node<Expr>,
  ) -> Node<Expr> {
    use OperatorName::*;
    match operator {
      Equality | Inequality | StrictEquality | StrictInequality => {
        self.check_equality(loc, operator, &left, &right);
        if let Some(equal) = literal_equals(&left, &right) {
          let negated = matches!(operator, Inequality | StrictInequality);
          return build::boolean(loc, equal != negated);
        };
      }
      Addition => {
        if let (Some(l), Some(r)) = (as_str(&left), as_str(&right)) {
          return build::string(loc, format!("{}{}", l, r));
        };
        if self.folds_arithmetic() {
          if let (Some(l), Some(r)) = (as_num(&left), as_num(&right)) {
            return build::number(loc, l + r);
          };
        };
      }
      Subtraction | Multiplication | Division | Remainder | Exponentiation if self.folds_arithmetic() => {
        if let (Some(l), Some(r)) = (as_num(&left), as_num(&right)) {
          let value = match operator {
            Subtraction => l - r,
            Multiplication => l * r,
            Division => l / r,
            Remainder => l % r,
            _ => js_pow(l, r),
          };
          return build::number(loc, value);
        };
      }
      BitwiseAnd | BitwiseOr | BitwiseXor | BitwiseLeftShift | BitwiseRightShift | BitwiseUnsignedRightShift
        if self.folds_arithmetic() =>
      {
        if let (Some(l), Some(r)) = (as_num(&left), as_num(&right)) {
          let (l, r) = (JsNumber(l), JsNumber(r));
          let shift = r.to_uint32() & 31;
          let value = match operator {
            BitwiseAnd => (l.to_int32() & r.to_int32()) as f64,
            BitwiseOr => (l.to_int32() | r.to_int32()) as f64,
            BitwiseXor => (l.to_int32() ^ r.to_int32()) as f64,
            BitwiseLeftShift => l.to_int32().wrapping_shl(shift) as f64,
            BitwiseRightShift => (l.to_int32() >> shift) as f64,
            _ => (l.to_uint32() >> shift) as f64,
          };
          return build::number(loc, value);
        };
      }
      LessThan | LessThanOrEqual | GreaterThan | GreaterThanOrEqual if self.folds_arithmetic() => {
        if let (Some(l), Some(r)) = (as_num(&left), as_num(&right)) {
          let value = match operator {
            LessThan => l < r,
            LessThanOrEqual => l <= r,
            GreaterThan => l > r,
            _ => l >= r,
          };
          return build::boolean(loc, value);
        };
      }
      LogicalAnd if self.options.mangle_syntax => {
        if let Some(truthy) = truthiness(&left) {
          return if truthy { right } else { left };
        };
      }
      LogicalOr if self.options.mangle_syntax => {
        if let Some(truthy) = truthiness(&left) {
          return if truthy { left } else { right };
        };
      }
      NullishCoalescing if self.options.mangle_syntax => {
        if let Some(nullish) = nullishness(&left) {
          if nullish || left.stx.is_primitive_literal() {
            return if nullish { right } else { left };
          };
        };
      }
      Comma if self.options.mangle_syntax => {
        if self.is_side_effect_free(&left) {
          return right;
        };
      }
      _ => {}
    };
    build::binary(loc, operator, left, right)
  }

  /// Folds a conditional whose test is a literal.
  pub(crate) fn fold_cond(
    &mut self,
    loc: Loc,
    test: Node<Expr>,
    consequent: Node<Expr>,
    alternate: Node<Expr>,
  ) -> Node<Expr> {
    if self.options.mangle_syntax {
      if let Some(truthy) = truthiness(&test) {
        trace!(truthy, "folded conditional");
        return if truthy { consequent } else { alternate };
      };
    };
    build::cond(loc, test, consequent, alternate)
  }

  /// Merges string literal substitutions into the surrounding text. A template left with no
  /// substitutions becomes a string.
  pub(crate) fn fold_template(&mut self, loc: Loc, parts: Vec<TemplatePart>) -> Node<Expr> {
    let mut merged: Vec<TemplatePart> = Vec::with_capacity(parts.len());
    for part in parts {
      let (cooked, raw) = match part {
        TemplatePart::Str(s) => match s.cooked {
          Some(cooked) => (cooked, s.raw),
          None => {
            merged.push(TemplatePart::Str(TemplateStr { cooked: None, raw: s.raw }));
            continue;
          }
        },
        TemplatePart::Expr(e) => match *e.stx {
          Expr::LitStr(value) => {
            let raw = escape_template_raw(&value);
            (value, raw)
          }
          other => {
            merged.push(TemplatePart::Expr(Node::new(e.loc, other)));
            continue;
          }
        },
      };
      match merged.last_mut() {
        Some(TemplatePart::Str(TemplateStr {
          cooked: Some(prev_cooked),
          raw: prev_raw,
        })) => {
          prev_cooked.push_str(&cooked);
          prev_raw.push_str(&raw);
        }
        _ => merged.push(TemplatePart::Str(TemplateStr {
          cooked: Some(cooked),
          raw,
        })),
      };
    }
    if let [TemplatePart::Str(TemplateStr { cooked: Some(_), .. })] = merged.as_slice() {
      if let Some(TemplatePart::Str(TemplateStr { cooked: Some(cooked), .. })) = merged.pop() {
        return build::string(loc, cooked);
      };
    };
    if merged.is_empty() {
      return build::string(loc, "");
    };
    Node::new(loc, Expr::Template(TemplateExpr { parts: merged }))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn num(v: f64) -> Node<Expr> {
    build::number(Loc(0, 1), v)
  }

  #[test]
  fn truthiness_of_literals() {
    assert_eq!(truthiness(&num(0.0)), Some(false));
    assert_eq!(truthiness(&num(f64::NAN)), Some(false));
    assert_eq!(truthiness(&num(2.0)), Some(true));
    assert_eq!(truthiness(&build::string(Loc(0, 1), "")), Some(false));
    assert_eq!(truthiness(&build::null(Loc(0, 1))), Some(false));
    assert_eq!(truthiness(&build::empty_object(Loc(0, 1))), None);
  }

  #[test]
  fn void_of_a_literal_is_nullish() {
    let loc = Loc(0, 1);
    assert_eq!(nullishness(&build::unary(loc, OperatorName::Void, num(0.0))), Some(true));
    let call = build::call(loc, num(1.0), Vec::new());
    assert_eq!(nullishness(&build::unary(loc, OperatorName::Void, call)), None);
  }

  #[test]
  fn equality_is_direct_comparison() {
    assert_eq!(literal_equals(&num(f64::NAN), &num(f64::NAN)), Some(false));
    assert_eq!(literal_equals(&num(-0.0), &num(0.0)), Some(true));
    assert_eq!(literal_equals(&build::null(Loc(0, 1)), &build::undefined(Loc(0, 1))), None);
    assert_eq!(literal_equals(&num(1.0), &build::string(Loc(0, 1), "1")), None);
  }

  #[test]
  fn pow_follows_js() {
    assert!(js_pow(1.0, f64::NAN).is_nan());
    assert!(js_pow(-1.0, f64::INFINITY).is_nan());
    assert_eq!(js_pow(2.0, 10.0), 1024.0);
  }

  #[test]
  fn raw_text_escapes() {
    assert_eq!(escape_template_raw("a`b${c}\\"), "a\\`b\\${c}\\\\");
  }
}
