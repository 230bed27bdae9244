use crate::loc::Loc;
use crate::token::TT;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Formatter;
use diagnostics::Diagnostic;
use diagnostics::Severity;
use std::error::Error;
use std::fmt::Display;

/// Classification of fatal syntax errors. Any of these aborts analysis of the file.
///
/// Diagnostic codes (prefix `PS`) are stable per variant.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SyntaxErrorType {
  ExpectedNotFound,
  ExpectedSyntax(&'static str),
  InvalidAssigmentTarget,
  InvalidCharacterEscape,
  JsxClosingTagMismatch,
  LineTerminatorAfterArrowFunctionParameters,
  LineTerminatorAfterThrow,
  LineTerminatorInRegex,
  LineTerminatorInString,
  MalformedLiteralBigInt,
  MalformedLiteralNumber,
  RequiredTokenNotFound(TT),
  TryStatementHasNoCatchOrFinally,
  UnexpectedEnd,
  UnexpectedToken,
}

#[derive(Clone)]
pub struct SyntaxError {
  pub typ: SyntaxErrorType,
  pub loc: Loc,
  pub actual_token: Option<TT>,
}

impl SyntaxError {
  pub fn new(typ: SyntaxErrorType, loc: Loc, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError {
      typ,
      loc,
      actual_token,
    }
  }

  pub fn to_diagnostic(&self) -> Diagnostic {
    let mut diagnostic = Diagnostic::error(
      self.typ.code(),
      self.typ.message(self.actual_token),
      self.loc.range(),
    );
    if let Some(actual) = self.actual_token {
      diagnostic = diagnostic.with_note(format!("found token: {:?}", actual));
    }
    diagnostic
  }
}

impl Debug for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{} around loc [{}:{}]", self, self.loc.0, self.loc.1)
  }
}

impl Display for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{:?} [token={:?}]", self.typ, self.actual_token)
  }
}

impl Error for SyntaxError {}

impl PartialEq for SyntaxError {
  fn eq(&self, other: &Self) -> bool {
    self.typ == other.typ
  }
}

impl Eq for SyntaxError {}

pub type SyntaxResult<T> = Result<T, SyntaxError>;

impl SyntaxErrorType {
  pub fn code(&self) -> &'static str {
    match self {
      SyntaxErrorType::ExpectedNotFound => "PS0001",
      SyntaxErrorType::ExpectedSyntax(_) => "PS0002",
      SyntaxErrorType::InvalidAssigmentTarget => "PS0003",
      SyntaxErrorType::InvalidCharacterEscape => "PS0004",
      SyntaxErrorType::JsxClosingTagMismatch => "PS0005",
      SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters => "PS0006",
      SyntaxErrorType::LineTerminatorAfterThrow => "PS0007",
      SyntaxErrorType::LineTerminatorInRegex => "PS0009",
      SyntaxErrorType::LineTerminatorInString => "PS0010",
      SyntaxErrorType::MalformedLiteralBigInt => "PS0011",
      SyntaxErrorType::MalformedLiteralNumber => "PS0012",
      SyntaxErrorType::RequiredTokenNotFound(_) => "PS0013",
      SyntaxErrorType::TryStatementHasNoCatchOrFinally => "PS0014",
      SyntaxErrorType::UnexpectedEnd => "PS0015",
      SyntaxErrorType::UnexpectedToken => "PS0016",
    }
  }

  pub fn message(&self, actual_token: Option<TT>) -> String {
    match self {
      SyntaxErrorType::ExpectedNotFound => "expected token not found".into(),
      SyntaxErrorType::ExpectedSyntax(expected) => format!("expected {}", expected),
      SyntaxErrorType::InvalidAssigmentTarget => "invalid assignment target".into(),
      SyntaxErrorType::InvalidCharacterEscape => "invalid character escape".into(),
      SyntaxErrorType::JsxClosingTagMismatch => "JSX closing tag does not match opening tag".into(),
      SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters => {
        "line terminator not allowed after arrow function parameters".into()
      }
      SyntaxErrorType::LineTerminatorAfterThrow => {
        "line terminator not allowed after `throw`".into()
      }
      SyntaxErrorType::LineTerminatorInRegex => {
        "line terminator not allowed in regular expression".into()
      }
      SyntaxErrorType::LineTerminatorInString => {
        "line terminator not allowed in string literal".into()
      }
      SyntaxErrorType::MalformedLiteralBigInt => "malformed bigint literal".into(),
      SyntaxErrorType::MalformedLiteralNumber => "malformed number literal".into(),
      SyntaxErrorType::RequiredTokenNotFound(token) => format!("expected token {:?}", token),
      SyntaxErrorType::TryStatementHasNoCatchOrFinally => {
        "try statement requires a catch or finally block".into()
      }
      SyntaxErrorType::UnexpectedEnd => actual_token
        .map(|tok| format!("unexpected end before {:?}", tok))
        .unwrap_or_else(|| "unexpected end of input".into()),
      SyntaxErrorType::UnexpectedToken => actual_token
        .map(|tok| format!("unexpected {:?}", tok))
        .unwrap_or_else(|| "unexpected token".into()),
    }
  }
}

/// Problems that are reported to the log without aborting analysis.
///
/// Codes prefixed `JS1` are recoverable errors and `JS2` are warnings.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Issue {
  DuplicateDeclaration,
  InvalidPrivateName,
  InvalidAssignmentTarget,
  InvalidRestElement,
  InvalidShorthandInitializer,
  UnknownLabel,
  UnsupportedSyntax,
  UnsupportedForTarget,
  InvalidDefault,
  DuplicateLabel,
  NegativeZeroComparison,
  ReferenceComparison,
  UnreturnedExpression,
  TypeofComparison,
}

impl Issue {
  pub fn code(&self) -> &'static str {
    match self {
      Issue::DuplicateDeclaration => "JS1001",
      Issue::InvalidPrivateName => "JS1002",
      Issue::InvalidAssignmentTarget => "JS1003",
      Issue::InvalidRestElement => "JS1004",
      Issue::InvalidShorthandInitializer => "JS1005",
      Issue::UnknownLabel => "JS1006",
      Issue::UnsupportedSyntax => "JS1007",
      Issue::UnsupportedForTarget => "JS1008",
      Issue::InvalidDefault => "JS1009",
      Issue::DuplicateLabel => "JS1010",
      Issue::NegativeZeroComparison => "JS2001",
      Issue::ReferenceComparison => "JS2002",
      Issue::UnreturnedExpression => "JS2003",
      Issue::TypeofComparison => "JS2004",
    }
  }

  pub fn severity(&self) -> Severity {
    match self {
      Issue::NegativeZeroComparison
      | Issue::ReferenceComparison
      | Issue::UnreturnedExpression
      | Issue::TypeofComparison => Severity::Warning,
      _ => Severity::Error,
    }
  }

  pub fn diagnostic(&self, loc: Loc, message: impl Into<String>) -> Diagnostic {
    Diagnostic::new(self.severity(), self.code(), message, loc.range())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn issue_severity_follows_code_prefix() {
    for issue in [
      Issue::DuplicateDeclaration,
      Issue::UnknownLabel,
      Issue::DuplicateLabel,
      Issue::NegativeZeroComparison,
      Issue::UnreturnedExpression,
    ] {
      let warning = issue.code().starts_with("JS2");
      assert_eq!(issue.severity() == Severity::Warning, warning);
    }
  }

  #[test]
  fn syntax_error_diagnostic_mentions_token() {
    let err = Loc(3, 4).error(SyntaxErrorType::UnexpectedToken, Some(TT::Comma));
    let d = err.to_diagnostic();
    assert_eq!(d.code, "PS0016");
    assert_eq!(d.message, "unexpected Comma");
    assert_eq!(d.notes, vec!["found token: Comma".to_string()]);
  }
}
