use super::expr::Expr;
use super::node::Node;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub enum JsxTag {
  // Lowercase or hyphenated names like `div`, passed as strings.
  Intrinsic(#[drive(skip)] String),
  // A component reference: an identifier or a member chain.
  Component(Node<Expr>),
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub enum JsxAttr {
  Named {
    #[drive(skip)]
    name: String,
    // None for `<input disabled />`.
    value: Option<Node<Expr>>,
  },
  Spread {
    value: Node<Expr>,
  },
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub enum JsxChild {
  // Already decoded and with whitespace collapsed.
  Text(#[drive(skip)] String),
  Expr(Node<Expr>),
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct JsxElem {
  // None for fragments.
  pub tag: Option<JsxTag>,
  pub attributes: Vec<JsxAttr>,
  pub children: Vec<JsxChild>,
}
