use super::expr::Expr;
use super::expr::IdRef;
use super::func::Func;
use super::node::Node;
use super::stmt::Stmt;
use crate::symbol::SymbolRef;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

// A direct key is not a variable reference, so it isn't an `IdExpr`.
#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub enum ClassOrObjKey {
  // Identifier, keyword, string, or number. Numbers are stored in their canonical string form.
  Direct(#[drive(skip)] String),
  Computed(Node<Expr>),
  Private(#[drive(skip)] IdRef),
}

impl ClassOrObjKey {
  pub fn direct(&self) -> Option<&str> {
    match self {
      ClassOrObjKey::Direct(name) => Some(name),
      _ => None,
    }
  }
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct StaticBlock {
  #[drive(skip)]
  pub scope_loc: usize,
  pub body: Vec<Node<Stmt>>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub enum ClassOrObjVal {
  // `params` is empty.
  Getter(Node<Func>),
  // `params` has exactly one parameter.
  Setter(Node<Func>),
  Method(Node<Func>),
  // Always Some in objects, since shorthands are `ObjMemberType::Shorthand`.
  Prop(Option<Node<Expr>>),
  StaticBlock(Node<StaticBlock>),
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ClassMember {
  pub key: ClassOrObjKey,
  #[drive(skip)]
  pub static_: bool,
  pub val: ClassOrObjVal,
}

impl ClassMember {
  pub fn is_field(&self) -> bool {
    matches!(self.val, ClassOrObjVal::Prop(_))
  }

  pub fn is_constructor(&self) -> bool {
    !self.static_
      && matches!(self.val, ClassOrObjVal::Method(_))
      && self.key.direct() == Some("constructor")
  }
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct Class {
  // For declarations, the symbol in the enclosing scope. For expressions, the symbol that only
  // the class body can see.
  #[drive(skip)]
  pub name: Option<SymbolRef>,
  #[drive(skip)]
  pub name_scope_loc: usize,
  #[drive(skip)]
  pub body_scope_loc: usize,
  pub extends: Option<Node<Expr>>,
  pub members: Vec<Node<ClassMember>>,
}
