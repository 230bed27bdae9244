use super::class_or_object::ClassOrObjKey;
use super::expr::Expr;
use super::node::Node;
use crate::symbol::SymbolRef;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

/// A binding pattern. Every name in a pattern is declared when it is parsed, so unlike expressions
/// there are no deferred names here.
#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub enum Pat {
  Id(IdPat),
  Arr(ArrPat),
  Obj(ObjPat),
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct IdPat {
  #[drive(skip)]
  pub symbol: SymbolRef,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ArrPatElem {
  pub target: Node<Pat>,
  pub default_value: Option<Node<Expr>>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ArrPat {
  // None for holes.
  pub elements: Vec<Option<ArrPatElem>>,
  pub rest: Option<Node<Pat>>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ObjPatProp {
  pub key: ClassOrObjKey,
  pub target: Node<Pat>,
  #[drive(skip)]
  pub shorthand: bool,
  pub default_value: Option<Node<Expr>>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ObjPat {
  pub properties: Vec<Node<ObjPatProp>>,
  pub rest: Option<Node<Pat>>,
}

impl Pat {
  /// Symbols bound by this pattern, in source order.
  pub fn bound_symbols(&self, out: &mut Vec<SymbolRef>) {
    match self {
      Pat::Id(id) => out.push(id.symbol),
      Pat::Arr(arr) => {
        for elem in arr.elements.iter().flatten() {
          elem.target.stx.bound_symbols(out);
        }
        if let Some(rest) = &arr.rest {
          rest.stx.bound_symbols(out);
        };
      }
      Pat::Obj(obj) => {
        for prop in obj.properties.iter() {
          prop.stx.target.stx.bound_symbols(out);
        }
        if let Some(rest) = &obj.rest {
          rest.stx.bound_symbols(out);
        };
      }
    }
  }
}
