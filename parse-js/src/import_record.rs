use crate::loc::Loc;
use serde::Serialize;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum ImportKind {
  Stmt,
  ReExport,
  Dynamic,
  Require,
}

/// A module path this file depends on. Statements refer to records by index.
#[derive(Clone, Debug, Serialize)]
pub struct ImportRecord {
  pub path: String,
  pub kind: ImportKind,
  pub loc: Loc,
}
