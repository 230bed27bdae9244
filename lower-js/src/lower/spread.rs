use crate::bind::Binder;
use crate::build;
use crate::helpers::Helper;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::LitObjExpr;
use parse_js::ast::expr::ObjMember;
use parse_js::ast::expr::ObjMemberType;
use parse_js::ast::node::Node;
use parse_js::loc::Loc;
use tracing::trace;

fn object(loc: Loc, members: Vec<Node<ObjMember>>) -> Node<Expr> {
  Node::new(loc, Expr::LitObj(LitObjExpr { members }))
}

impl<'a> Binder<'a> {
  /// `{a, ...b, c}` becomes `__assign(__assign({a}, b), {c})`.
  pub(crate) fn lower_object_spread(&mut self, loc: Loc, members: Vec<Node<ObjMember>>) -> Node<Expr> {
    trace!("lowered object spread");
    let mut result: Option<Node<Expr>> = None;
    let mut pending = Vec::new();
    for member in members {
      let member_loc = member.loc;
      match member.stx.typ {
        ObjMemberType::Rest { val } => {
          let target = match result.take() {
            None => object(loc, std::mem::take(&mut pending)),
            Some(prev) if pending.is_empty() => prev,
            Some(prev) => {
              let assign = self.helper(Helper::Assign, loc);
              build::call(loc, assign, vec![prev, object(loc, std::mem::take(&mut pending))])
            }
          };
          let assign = self.helper(Helper::Assign, member_loc);
          result = Some(build::call(loc, assign, vec![target, val]));
        }
        typ => pending.push(Node::new(member_loc, ObjMember { typ })),
      };
    }
    match result {
      None => object(loc, pending),
      Some(result) if pending.is_empty() => result,
      Some(result) => {
        let assign = self.helper(Helper::Assign, loc);
        build::call(loc, assign, vec![result, object(loc, pending)])
      }
    }
  }
}
