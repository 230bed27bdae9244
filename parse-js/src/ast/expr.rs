use super::class_or_object::Class;
use super::class_or_object::ClassOrObjKey;
use super::class_or_object::ClassOrObjVal;
use super::func::Func;
use super::jsx::JsxElem;
use super::node::Node;
use crate::name::Name;
use crate::num::JsNumber;
use crate::operator::OperatorName;
use crate::symbol::SymbolRef;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

/// A reference to a variable. The parser leaves references unresolved because the declaration may
/// appear later in the source; the binder resolves every one of them.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum IdRef {
  Deferred(Name),
  Resolved(SymbolRef),
}

impl IdRef {
  pub fn symbol(&self) -> SymbolRef {
    match self {
      IdRef::Resolved(r) => *r,
      IdRef::Deferred(_) => panic!("identifier has not been bound yet"),
    }
  }

  pub fn name(&self) -> Option<Name> {
    debug_assert!(matches!(self, IdRef::Deferred(_)), "identifier was already bound");
    match self {
      IdRef::Deferred(name) => Some(*name),
      IdRef::Resolved(_) => None,
    }
  }

  pub fn is_resolved(&self) -> bool {
    matches!(self, IdRef::Resolved(_))
  }
}

/// Position of a link in an optional chain. `a?.b.c` is a member access marked `Start` (the `?.`
/// link) wrapped in a member access marked `Continue`; the whole chain short-circuits at the `Start`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
pub enum OptionalChain {
  #[default]
  None,
  Start,
  Continue,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub enum Expr {
  ArrowFunc(ArrowFuncExpr),
  Binary(BinaryExpr),
  Call(CallExpr),
  Class(Class),
  ComputedMember(ComputedMemberExpr),
  Cond(CondExpr),
  Func(FuncExpr),
  Id(IdExpr),
  ImportCall(ImportCallExpr),
  ImportMeta,
  JsxElem(JsxElem),
  // Stands in for an expression that failed to parse after a recoverable error.
  Missing,
  New(NewExpr),
  NewTarget,
  Member(MemberExpr),
  // `#x` on the left of `in`.
  PrivateName(PrivateNameExpr),
  PrivateMember(PrivateMemberExpr),
  Super,
  TaggedTemplate(TaggedTemplateExpr),
  Template(TemplateExpr),
  This,
  Unary(UnaryExpr),
  UnaryPostfix(UnaryPostfixExpr),
  Undefined,
  Yield(YieldExpr),

  // Literals.
  LitArr(LitArrExpr),
  LitBigInt(#[drive(skip)] String),
  LitBool(#[drive(skip)] bool),
  LitNull,
  LitNum(#[drive(skip)] JsNumber),
  LitObj(LitObjExpr),
  LitRegex(#[drive(skip)] String),
  LitStr(#[drive(skip)] String),
}

impl Expr {
  pub fn id(r: SymbolRef) -> Expr {
    Expr::Id(IdExpr {
      id: IdRef::Resolved(r),
      can_be_removed_if_unused: false,
    })
  }

  pub fn is_nullish_literal(&self) -> bool {
    matches!(self, Expr::LitNull | Expr::Undefined)
  }

  pub fn optional_chain(&self) -> OptionalChain {
    match self {
      Expr::Call(e) => e.optional_chain,
      Expr::ComputedMember(e) => e.optional_chain,
      Expr::Member(e) => e.optional_chain,
      Expr::PrivateMember(e) => e.optional_chain,
      _ => OptionalChain::None,
    }
  }

  /// Whether evaluating this expression can't have side effects.
  pub fn is_primitive_literal(&self) -> bool {
    matches!(
      self,
      Expr::LitBool(_)
        | Expr::LitNull
        | Expr::LitNum(_)
        | Expr::LitStr(_)
        | Expr::LitBigInt(_)
        | Expr::Undefined
    )
  }
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ArrowFuncExpr {
  pub func: Node<Func>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct BinaryExpr {
  #[drive(skip)]
  pub operator: OperatorName,
  pub left: Node<Expr>,
  pub right: Node<Expr>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct CallArg {
  #[drive(skip)]
  pub spread: bool,
  pub value: Node<Expr>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct CallExpr {
  #[drive(skip)]
  pub optional_chain: OptionalChain,
  // `eval(...)` where `eval` isn't shadowed, which can see every local in scope.
  #[drive(skip)]
  pub is_direct_eval: bool,
  pub callee: Node<Expr>,
  pub arguments: Vec<CallArg>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ComputedMemberExpr {
  #[drive(skip)]
  pub optional_chain: OptionalChain,
  pub object: Node<Expr>,
  pub member: Node<Expr>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct CondExpr {
  pub test: Node<Expr>,
  pub consequent: Node<Expr>,
  pub alternate: Node<Expr>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct FuncExpr {
  #[drive(skip)]
  pub name: Option<SymbolRef>,
  pub func: Node<Func>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct IdExpr {
  #[drive(skip)]
  pub id: IdRef,
  // Set for reads of known globals and `typeof` operands, which can be dropped without changing behavior.
  #[drive(skip)]
  pub can_be_removed_if_unused: bool,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ImportCallExpr {
  pub module: Node<Expr>,
  #[drive(skip)]
  pub import_record: Option<u32>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct NewExpr {
  pub callee: Node<Expr>,
  pub arguments: Vec<CallArg>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct MemberExpr {
  #[drive(skip)]
  pub optional_chain: OptionalChain,
  pub object: Node<Expr>,
  #[drive(skip)]
  pub right: String,
  #[drive(skip)]
  pub can_be_removed_if_unused: bool,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct PrivateNameExpr {
  #[drive(skip)]
  pub id: IdRef,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct PrivateMemberExpr {
  #[drive(skip)]
  pub optional_chain: OptionalChain,
  pub object: Node<Expr>,
  #[drive(skip)]
  pub id: IdRef,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct TemplateStr {
  // None if the text contains an escape that is only valid in a tagged template.
  #[drive(skip)]
  pub cooked: Option<String>,
  #[drive(skip)]
  pub raw: String,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub enum TemplatePart {
  Str(TemplateStr),
  Expr(Node<Expr>),
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct TaggedTemplateExpr {
  pub function: Node<Expr>,
  pub parts: Vec<TemplatePart>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct TemplateExpr {
  pub parts: Vec<TemplatePart>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct UnaryExpr {
  #[drive(skip)]
  pub operator: OperatorName,
  pub argument: Node<Expr>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct UnaryPostfixExpr {
  #[drive(skip)]
  pub operator: OperatorName,
  pub argument: Node<Expr>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct YieldExpr {
  #[drive(skip)]
  pub delegate: bool,
  pub argument: Option<Node<Expr>>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub enum ArrElem {
  Single(Node<Expr>),
  Rest(Node<Expr>),
  Empty,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct LitArrExpr {
  pub elements: Vec<ArrElem>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub enum ObjMemberType {
  Valued {
    key: ClassOrObjKey,
    val: ClassOrObjVal,
  },
  Shorthand {
    #[drive(skip)]
    id: IdRef,
    // Only valid when the object turns out to be an assignment target: `({ a = 1 } = b)`.
    initializer: Option<Node<Expr>>,
  },
  Rest {
    val: Node<Expr>,
  },
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ObjMember {
  pub typ: ObjMemberType,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct LitObjExpr {
  pub members: Vec<Node<ObjMember>>,
}
