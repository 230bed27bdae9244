use serde::Deserialize;
use serde::Serialize;

/// Sub-grammars enabled for a file. Plain JavaScript when both are off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
  pub ts: bool,
  pub jsx: bool,
}

impl ParseOptions {
  pub fn js() -> ParseOptions {
    ParseOptions::default()
  }

  pub fn jsx() -> ParseOptions {
    ParseOptions {
      ts: false,
      jsx: true,
    }
  }

  pub fn ts() -> ParseOptions {
    ParseOptions {
      ts: true,
      jsx: false,
    }
  }

  pub fn tsx() -> ParseOptions {
    ParseOptions { ts: true, jsx: true }
  }
}
