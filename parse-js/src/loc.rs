use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::token::TT;
use diagnostics::TextRange;
use serde::Serialize;
use std::cmp::max;
use std::cmp::min;
use std::ops::Add;
use std::ops::AddAssign;

/// A location within the current source file expressed as UTF-8 byte offsets.
///
/// Nodes synthesized by lowering reuse the location of the construct they replace, so a `Loc` is not
/// guaranteed to cover text that exists verbatim in the source.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  pub fn at(offset: usize) -> Loc {
    Loc(offset, offset)
  }

  pub fn start(&self) -> usize {
    self.0
  }

  pub fn end(&self) -> usize {
    self.1
  }

  pub fn error(self, typ: SyntaxErrorType, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError::new(typ, self, actual_token)
  }

  pub fn is_empty(&self) -> bool {
    self.0 >= self.1
  }

  pub fn len(&self) -> usize {
    self.1.saturating_sub(self.0)
  }

  pub fn extend(&mut self, other: Loc) {
    self.0 = min(self.0, other.0);
    self.1 = max(self.1, other.1);
  }

  /// Ranges reported to the diagnostics log saturate at `u32::MAX`.
  pub fn range(&self) -> TextRange {
    TextRange::new(saturating_u32(self.0), saturating_u32(self.1))
  }
}

fn saturating_u32(v: usize) -> u32 {
  u32::try_from(v).unwrap_or(u32::MAX)
}

impl Add for Loc {
  type Output = Loc;

  fn add(self, rhs: Self) -> Self::Output {
    let mut new = self;
    new.extend(rhs);
    new
  }
}

impl AddAssign for Loc {
  fn add_assign(&mut self, rhs: Self) {
    self.extend(rhs);
  }
}

impl From<Loc> for TextRange {
  fn from(value: Loc) -> Self {
    value.range()
  }
}

#[cfg(test)]
mod tests {
  use super::Loc;
  use diagnostics::TextRange;

  #[test]
  fn add_covers_both() {
    assert_eq!(Loc(4, 6) + Loc(1, 3), Loc(1, 6));
    let mut l = Loc::at(10);
    l += Loc(10, 12);
    assert_eq!(l, Loc(10, 12));
    assert_eq!(l.len(), 2);
  }

  #[test]
  fn range_saturates() {
    assert_eq!(Loc(usize::MAX - 1, usize::MAX).range(), TextRange::new(u32::MAX, u32::MAX));
  }
}
