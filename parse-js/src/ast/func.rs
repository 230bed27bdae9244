use super::expr::Expr;
use super::node::Node;
use super::pat::Pat;
use super::stmt::Stmt;
use crate::symbol::SymbolRef;
use derive_more::derive::From;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct Param {
  #[drive(skip)]
  pub rest: bool,
  pub pattern: Node<Pat>,
  pub default_value: Option<Node<Expr>>,
  // TypeScript `constructor(public x)`, which also assigns `this.x`.
  #[drive(skip)]
  pub ts_param_property: bool,
}

#[derive(Clone, Debug, Drive, DriveMut, From, Serialize)]
pub enum FuncBody {
  Block(Vec<Node<Stmt>>),
  // Arrow functions only.
  Expression(Node<Expr>),
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct Func {
  #[drive(skip)]
  pub arrow: bool,
  #[drive(skip)]
  pub async_: bool,
  #[drive(skip)]
  pub generator: bool,
  // Where the parameter and body scopes were entered: the `(` (or the lone parameter of an arrow)
  // and the `{` (or an arrow's `=>`).
  #[drive(skip)]
  pub args_scope_loc: usize,
  #[drive(skip)]
  pub body_scope_loc: usize,
  // Declared in every non-arrow function body.
  #[drive(skip)]
  pub arguments: Option<SymbolRef>,
  pub params: Vec<Node<Param>>,
  pub body: FuncBody,
}
