use ahash::HashMap;
use ahash::HashMapExt;
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Associativity {
  Left,
  Right,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum OperatorName {
  Addition,
  Assignment,
  AssignmentAddition,
  AssignmentBitwiseAnd,
  AssignmentBitwiseLeftShift,
  AssignmentBitwiseOr,
  AssignmentBitwiseRightShift,
  AssignmentBitwiseUnsignedRightShift,
  AssignmentBitwiseXor,
  AssignmentDivision,
  AssignmentExponentiation,
  AssignmentLogicalAnd,
  AssignmentLogicalOr,
  AssignmentMultiplication,
  AssignmentNullishCoalescing,
  AssignmentRemainder,
  AssignmentSubtraction,
  Await,
  BitwiseAnd,
  BitwiseLeftShift,
  BitwiseNot,
  BitwiseOr,
  BitwiseRightShift,
  BitwiseUnsignedRightShift,
  BitwiseXor,
  Comma,
  Conditional,
  Delete,
  Division,
  Equality,
  Exponentiation,
  GreaterThan,
  GreaterThanOrEqual,
  In,
  Inequality,
  Instanceof,
  LessThan,
  LessThanOrEqual,
  LogicalAnd,
  LogicalNot,
  LogicalOr,
  Multiplication,
  NullishCoalescing,
  PostfixDecrement,
  PostfixIncrement,
  PrefixDecrement,
  PrefixIncrement,
  Remainder,
  StrictEquality,
  StrictInequality,
  Subtraction,
  Typeof,
  UnaryNegation,
  UnaryPlus,
  Void,
}

impl OperatorName {
  pub fn is_assignment(self) -> bool {
    matches!(
      self,
      OperatorName::Assignment
        | OperatorName::AssignmentAddition
        | OperatorName::AssignmentBitwiseAnd
        | OperatorName::AssignmentBitwiseLeftShift
        | OperatorName::AssignmentBitwiseOr
        | OperatorName::AssignmentBitwiseRightShift
        | OperatorName::AssignmentBitwiseUnsignedRightShift
        | OperatorName::AssignmentBitwiseXor
        | OperatorName::AssignmentDivision
        | OperatorName::AssignmentExponentiation
        | OperatorName::AssignmentLogicalAnd
        | OperatorName::AssignmentLogicalOr
        | OperatorName::AssignmentMultiplication
        | OperatorName::AssignmentNullishCoalescing
        | OperatorName::AssignmentRemainder
        | OperatorName::AssignmentSubtraction
    )
  }

  pub fn is_logical_assignment(self) -> bool {
    matches!(
      self,
      OperatorName::AssignmentLogicalAnd
        | OperatorName::AssignmentLogicalOr
        | OperatorName::AssignmentNullishCoalescing
    )
  }

  pub fn is_update(self) -> bool {
    matches!(
      self,
      OperatorName::PrefixDecrement
        | OperatorName::PrefixIncrement
        | OperatorName::PostfixDecrement
        | OperatorName::PostfixIncrement
    )
  }

  /// For a compound assignment, the binary operator it applies.
  pub fn compound_binary(self) -> Option<OperatorName> {
    Some(match self {
      OperatorName::AssignmentAddition => OperatorName::Addition,
      OperatorName::AssignmentBitwiseAnd => OperatorName::BitwiseAnd,
      OperatorName::AssignmentBitwiseLeftShift => OperatorName::BitwiseLeftShift,
      OperatorName::AssignmentBitwiseOr => OperatorName::BitwiseOr,
      OperatorName::AssignmentBitwiseRightShift => OperatorName::BitwiseRightShift,
      OperatorName::AssignmentBitwiseUnsignedRightShift => OperatorName::BitwiseUnsignedRightShift,
      OperatorName::AssignmentBitwiseXor => OperatorName::BitwiseXor,
      OperatorName::AssignmentDivision => OperatorName::Division,
      OperatorName::AssignmentExponentiation => OperatorName::Exponentiation,
      OperatorName::AssignmentLogicalAnd => OperatorName::LogicalAnd,
      OperatorName::AssignmentLogicalOr => OperatorName::LogicalOr,
      OperatorName::AssignmentMultiplication => OperatorName::Multiplication,
      OperatorName::AssignmentNullishCoalescing => OperatorName::NullishCoalescing,
      OperatorName::AssignmentRemainder => OperatorName::Remainder,
      OperatorName::AssignmentSubtraction => OperatorName::Subtraction,
      _ => return None,
    })
  }

  pub fn text(self) -> &'static str {
    match self {
      OperatorName::Addition => "+",
      OperatorName::Assignment => "=",
      OperatorName::AssignmentAddition => "+=",
      OperatorName::AssignmentBitwiseAnd => "&=",
      OperatorName::AssignmentBitwiseLeftShift => "<<=",
      OperatorName::AssignmentBitwiseOr => "|=",
      OperatorName::AssignmentBitwiseRightShift => ">>=",
      OperatorName::AssignmentBitwiseUnsignedRightShift => ">>>=",
      OperatorName::AssignmentBitwiseXor => "^=",
      OperatorName::AssignmentDivision => "/=",
      OperatorName::AssignmentExponentiation => "**=",
      OperatorName::AssignmentLogicalAnd => "&&=",
      OperatorName::AssignmentLogicalOr => "||=",
      OperatorName::AssignmentMultiplication => "*=",
      OperatorName::AssignmentNullishCoalescing => "??=",
      OperatorName::AssignmentRemainder => "%=",
      OperatorName::AssignmentSubtraction => "-=",
      OperatorName::Await => "await",
      OperatorName::BitwiseAnd => "&",
      OperatorName::BitwiseLeftShift => "<<",
      OperatorName::BitwiseNot => "~",
      OperatorName::BitwiseOr => "|",
      OperatorName::BitwiseRightShift => ">>",
      OperatorName::BitwiseUnsignedRightShift => ">>>",
      OperatorName::BitwiseXor => "^",
      OperatorName::Comma => ",",
      OperatorName::Conditional => "?",
      OperatorName::Delete => "delete",
      OperatorName::Division => "/",
      OperatorName::Equality => "==",
      OperatorName::Exponentiation => "**",
      OperatorName::GreaterThan => ">",
      OperatorName::GreaterThanOrEqual => ">=",
      OperatorName::In => "in",
      OperatorName::Inequality => "!=",
      OperatorName::Instanceof => "instanceof",
      OperatorName::LessThan => "<",
      OperatorName::LessThanOrEqual => "<=",
      OperatorName::LogicalAnd => "&&",
      OperatorName::LogicalNot => "!",
      OperatorName::LogicalOr => "||",
      OperatorName::Multiplication => "*",
      OperatorName::NullishCoalescing => "??",
      OperatorName::PostfixDecrement | OperatorName::PrefixDecrement => "--",
      OperatorName::PostfixIncrement | OperatorName::PrefixIncrement => "++",
      OperatorName::Remainder => "%",
      OperatorName::StrictEquality => "===",
      OperatorName::StrictInequality => "!==",
      OperatorName::Subtraction => "-",
      OperatorName::Typeof => "typeof",
      OperatorName::UnaryNegation => "-",
      OperatorName::UnaryPlus => "+",
      OperatorName::Void => "void",
    }
  }
}

/// Precedence levels, lowest binding first.
pub mod prec {
  pub const LOWEST: u8 = 0;
  pub const COMMA: u8 = 1;
  pub const YIELD: u8 = 3;
  pub const ASSIGN: u8 = 4;
  pub const CONDITIONAL: u8 = 5;
  pub const NULLISH_COALESCING: u8 = 6;
  pub const LOGICAL_OR: u8 = 7;
  pub const LOGICAL_AND: u8 = 8;
  pub const BITWISE_OR: u8 = 9;
  pub const BITWISE_XOR: u8 = 10;
  pub const BITWISE_AND: u8 = 11;
  pub const EQUALS: u8 = 12;
  pub const COMPARE: u8 = 13;
  pub const SHIFT: u8 = 14;
  pub const ADD: u8 = 15;
  pub const MULTIPLY: u8 = 16;
  pub const EXPONENTIATION: u8 = 17;
  pub const PREFIX: u8 = 18;
  pub const POSTFIX: u8 = 19;
  pub const NEW: u8 = 20;
  pub const CALL: u8 = 21;
  pub const MEMBER: u8 = 22;
}

#[derive(Copy, Clone, Debug)]
pub struct Operator {
  pub name: OperatorName,
  pub precedence: u8,
  pub associativity: Associativity,
}

#[rustfmt::skip]
pub static OPERATORS: Lazy<HashMap<OperatorName, Operator>> = Lazy::new(|| {
  use Associativity::*;
  use OperatorName::*;
  let table: &[(OperatorName, u8, Associativity)] = &[
    (Comma, prec::COMMA, Left),
    (Assignment, prec::ASSIGN, Right),
    (AssignmentAddition, prec::ASSIGN, Right),
    (AssignmentBitwiseAnd, prec::ASSIGN, Right),
    (AssignmentBitwiseLeftShift, prec::ASSIGN, Right),
    (AssignmentBitwiseOr, prec::ASSIGN, Right),
    (AssignmentBitwiseRightShift, prec::ASSIGN, Right),
    (AssignmentBitwiseUnsignedRightShift, prec::ASSIGN, Right),
    (AssignmentBitwiseXor, prec::ASSIGN, Right),
    (AssignmentDivision, prec::ASSIGN, Right),
    (AssignmentExponentiation, prec::ASSIGN, Right),
    (AssignmentLogicalAnd, prec::ASSIGN, Right),
    (AssignmentLogicalOr, prec::ASSIGN, Right),
    (AssignmentMultiplication, prec::ASSIGN, Right),
    (AssignmentNullishCoalescing, prec::ASSIGN, Right),
    (AssignmentRemainder, prec::ASSIGN, Right),
    (AssignmentSubtraction, prec::ASSIGN, Right),
    (Conditional, prec::CONDITIONAL, Right),
    (NullishCoalescing, prec::NULLISH_COALESCING, Left),
    (LogicalOr, prec::LOGICAL_OR, Left),
    (LogicalAnd, prec::LOGICAL_AND, Left),
    (BitwiseOr, prec::BITWISE_OR, Left),
    (BitwiseXor, prec::BITWISE_XOR, Left),
    (BitwiseAnd, prec::BITWISE_AND, Left),
    (Equality, prec::EQUALS, Left),
    (Inequality, prec::EQUALS, Left),
    (StrictEquality, prec::EQUALS, Left),
    (StrictInequality, prec::EQUALS, Left),
    (LessThan, prec::COMPARE, Left),
    (LessThanOrEqual, prec::COMPARE, Left),
    (GreaterThan, prec::COMPARE, Left),
    (GreaterThanOrEqual, prec::COMPARE, Left),
    (In, prec::COMPARE, Left),
    (Instanceof, prec::COMPARE, Left),
    (BitwiseLeftShift, prec::SHIFT, Left),
    (BitwiseRightShift, prec::SHIFT, Left),
    (BitwiseUnsignedRightShift, prec::SHIFT, Left),
    (Addition, prec::ADD, Left),
    (Subtraction, prec::ADD, Left),
    (Multiplication, prec::MULTIPLY, Left),
    (Division, prec::MULTIPLY, Left),
    (Remainder, prec::MULTIPLY, Left),
    (Exponentiation, prec::EXPONENTIATION, Right),
    (Await, prec::PREFIX, Right),
    (BitwiseNot, prec::PREFIX, Right),
    (Delete, prec::PREFIX, Right),
    (LogicalNot, prec::PREFIX, Right),
    (PrefixDecrement, prec::PREFIX, Right),
    (PrefixIncrement, prec::PREFIX, Right),
    (Typeof, prec::PREFIX, Right),
    (UnaryNegation, prec::PREFIX, Right),
    (UnaryPlus, prec::PREFIX, Right),
    (Void, prec::PREFIX, Right),
    (PostfixDecrement, prec::POSTFIX, Left),
    (PostfixIncrement, prec::POSTFIX, Left),
  ];
  let mut map = HashMap::<OperatorName, Operator>::new();
  for &(name, precedence, associativity) in table {
    map.insert(name, Operator { name, precedence, associativity });
  }
  map
});

pub fn precedence_of(name: OperatorName) -> u8 {
  OPERATORS.get(&name).map(|o| o.precedence).unwrap_or(prec::LOWEST)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn table_covers_every_operator_with_text() {
    assert_eq!(OPERATORS[&OperatorName::Exponentiation].associativity, Associativity::Right);
    assert!(precedence_of(OperatorName::Multiplication) > precedence_of(OperatorName::Addition));
    assert!(precedence_of(OperatorName::LogicalAnd) > precedence_of(OperatorName::NullishCoalescing));
    assert_eq!(OperatorName::AssignmentNullishCoalescing.compound_binary(), Some(OperatorName::NullishCoalescing));
    assert!(OperatorName::AssignmentLogicalOr.is_logical_assignment());
    assert!(!OperatorName::AssignmentAddition.is_logical_assignment());
  }
}
