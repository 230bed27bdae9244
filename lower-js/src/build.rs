//! Constructors for nodes synthesized by lowering. Every node borrows the location of the code it
//! replaces.

use parse_js::ast::expr::ArrElem;
use parse_js::ast::expr::BinaryExpr;
use parse_js::ast::expr::CallArg;
use parse_js::ast::expr::CallExpr;
use parse_js::ast::expr::ComputedMemberExpr;
use parse_js::ast::expr::CondExpr;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::FuncExpr;
use parse_js::ast::expr::LitArrExpr;
use parse_js::ast::expr::LitObjExpr;
use parse_js::ast::expr::MemberExpr;
use parse_js::ast::expr::OptionalChain;
use parse_js::ast::expr::UnaryExpr;
use parse_js::ast::func::Func;
use parse_js::ast::func::FuncBody;
use parse_js::ast::func::Param;
use parse_js::ast::node::Node;
use parse_js::ast::pat::IdPat;
use parse_js::ast::pat::Pat;
use parse_js::ast::stmt::Stmt;
use parse_js::ast::stmt::VarDecl;
use parse_js::ast::stmt::VarDeclMode;
use parse_js::ast::stmt::VarDeclarator;
use parse_js::loc::Loc;
use parse_js::num::JsNumber;
use parse_js::operator::OperatorName;
use parse_js::symbol::SymbolRef;

/// Placeholder left behind by `std::mem::replace` while a node is rebuilt.
pub fn dummy_expr() -> Node<Expr> {
  Node::new(Loc(0, 0), Expr::Missing)
}

pub fn id(loc: Loc, symbol: SymbolRef) -> Node<Expr> {
  Node::new(loc, Expr::id(symbol))
}

pub fn string(loc: Loc, value: impl Into<String>) -> Node<Expr> {
  Node::new(loc, Expr::LitStr(value.into()))
}

pub fn number(loc: Loc, value: f64) -> Node<Expr> {
  Node::new(loc, Expr::LitNum(JsNumber(value)))
}

pub fn boolean(loc: Loc, value: bool) -> Node<Expr> {
  Node::new(loc, Expr::LitBool(value))
}

pub fn null(loc: Loc) -> Node<Expr> {
  Node::new(loc, Expr::LitNull)
}

/// `void 0`.
pub fn undefined(loc: Loc) -> Node<Expr> {
  Node::new(loc, Expr::Undefined)
}

pub fn empty_object(loc: Loc) -> Node<Expr> {
  Node::new(loc, Expr::LitObj(LitObjExpr { members: Vec::new() }))
}

pub fn array(loc: Loc, elements: Vec<Node<Expr>>) -> Node<Expr> {
  Node::new(loc, Expr::LitArr(LitArrExpr {
    elements: elements.into_iter().map(ArrElem::Single).collect(),
  }))
}

pub fn binary(loc: Loc, operator: OperatorName, left: Node<Expr>, right: Node<Expr>) -> Node<Expr> {
  Node::new(loc, Expr::Binary(BinaryExpr {
    operator,
    left,
    right,
  }))
}

pub fn assign(loc: Loc, left: Node<Expr>, right: Node<Expr>) -> Node<Expr> {
  binary(loc, OperatorName::Assignment, left, right)
}

pub fn comma(loc: Loc, left: Node<Expr>, right: Node<Expr>) -> Node<Expr> {
  binary(loc, OperatorName::Comma, left, right)
}

/// Joins expressions with the comma operator. None if there are none.
pub fn comma_all(loc: Loc, exprs: impl IntoIterator<Item = Node<Expr>>) -> Option<Node<Expr>> {
  exprs.into_iter().reduce(|left, right| comma(loc, left, right))
}

pub fn unary(loc: Loc, operator: OperatorName, argument: Node<Expr>) -> Node<Expr> {
  Node::new(loc, Expr::Unary(UnaryExpr { operator, argument }))
}

pub fn not(loc: Loc, argument: Node<Expr>) -> Node<Expr> {
  unary(loc, OperatorName::LogicalNot, argument)
}

pub fn cond(loc: Loc, test: Node<Expr>, consequent: Node<Expr>, alternate: Node<Expr>) -> Node<Expr> {
  Node::new(loc, Expr::Cond(CondExpr {
    test,
    consequent,
    alternate,
  }))
}

pub fn member(loc: Loc, object: Node<Expr>, name: impl Into<String>) -> Node<Expr> {
  Node::new(loc, Expr::Member(MemberExpr {
    optional_chain: OptionalChain::None,
    object,
    right: name.into(),
    can_be_removed_if_unused: false,
  }))
}

pub fn computed_member(loc: Loc, object: Node<Expr>, member: Node<Expr>) -> Node<Expr> {
  Node::new(loc, Expr::ComputedMember(ComputedMemberExpr {
    optional_chain: OptionalChain::None,
    object,
    member,
  }))
}

pub fn arg(value: Node<Expr>) -> CallArg {
  CallArg { spread: false, value }
}

pub fn call(loc: Loc, callee: Node<Expr>, arguments: Vec<Node<Expr>>) -> Node<Expr> {
  call_with_args(loc, callee, arguments.into_iter().map(arg).collect())
}

pub fn call_with_args(loc: Loc, callee: Node<Expr>, arguments: Vec<CallArg>) -> Node<Expr> {
  Node::new(loc, Expr::Call(CallExpr {
    optional_chain: OptionalChain::None,
    is_direct_eval: false,
    callee,
    arguments,
  }))
}

pub fn expr_stmt(expr: Node<Expr>) -> Node<Stmt> {
  let loc = expr.loc;
  Node::new(loc, Stmt::expr(expr))
}

pub fn id_pat(loc: Loc, symbol: SymbolRef) -> Node<Pat> {
  Node::new(loc, Pat::Id(IdPat { symbol }))
}

pub fn var_decl(
  loc: Loc,
  mode: VarDeclMode,
  export: bool,
  declarators: impl IntoIterator<Item = (SymbolRef, Option<Node<Expr>>)>,
) -> Node<Stmt> {
  let declarators = declarators
    .into_iter()
    .map(|(symbol, initializer)| VarDeclarator {
      pattern: id_pat(loc, symbol),
      initializer,
    })
    .collect();
  Node::new(loc, Stmt::Var(VarDecl {
    export,
    mode,
    declarators,
  }))
}

pub fn param(loc: Loc, symbol: SymbolRef, rest: bool) -> Node<Param> {
  Node::new(loc, Param {
    rest,
    pattern: id_pat(loc, symbol),
    default_value: None,
    ts_param_property: false,
  })
}

/// A non-arrow function. Its scopes were never recorded by the parser, so it must not be bound
/// again.
pub fn func(loc: Loc, params: Vec<Node<Param>>, body: Vec<Node<Stmt>>) -> Node<Func> {
  Node::new(loc, Func {
    arrow: false,
    async_: false,
    generator: false,
    args_scope_loc: loc.0,
    body_scope_loc: loc.0,
    arguments: None,
    params,
    body: FuncBody::Block(body),
  })
}

/// `(function (param) { body })(arg);`
pub fn iife_stmt(loc: Loc, param_symbol: SymbolRef, arg: Node<Expr>, body: Vec<Node<Stmt>>) -> Node<Stmt> {
  let callee = Node::new(loc, Expr::Func(FuncExpr {
    name: None,
    func: func(loc, vec![param(loc, param_symbol, false)], body),
  }));
  expr_stmt(call(loc, callee, vec![arg]))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn comma_all_folds_left() {
    let loc = Loc(0, 1);
    assert!(comma_all(loc, Vec::new()).is_none());
    let one = comma_all(loc, vec![number(loc, 1.0)]).unwrap();
    assert!(matches!(*one.stx, Expr::LitNum(JsNumber(v)) if v == 1.0));
    let three = comma_all(loc, vec![number(loc, 1.0), number(loc, 2.0), number(loc, 3.0)]).unwrap();
    let Expr::Binary(outer) = *three.stx else {
      panic!("expected comma");
    };
    assert_eq!(outer.operator, OperatorName::Comma);
    assert!(matches!(*outer.left.stx, Expr::Binary(_)));
    assert!(matches!(*outer.right.stx, Expr::LitNum(_)));
  }
}
