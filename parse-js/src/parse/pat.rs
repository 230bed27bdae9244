use super::ParseCtx;
use super::Parser;
use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::class_or_object::ClassOrObjVal;
use crate::ast::expr::ArrElem;
use crate::ast::expr::BinaryExpr;
use crate::ast::expr::Expr;
use crate::ast::expr::IdExpr;
use crate::ast::expr::IdRef;
use crate::ast::expr::LitArrExpr;
use crate::ast::expr::LitObjExpr;
use crate::ast::expr::ObjMemberType;
use crate::ast::expr::OptionalChain;
use crate::ast::node::Node;
use crate::ast::pat::ArrPat;
use crate::ast::pat::ArrPatElem;
use crate::ast::pat::IdPat;
use crate::ast::pat::ObjPat;
use crate::ast::pat::ObjPatProp;
use crate::ast::pat::Pat;
use crate::error::Issue;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::loc::Loc;
use crate::operator::OperatorName;
use crate::symbol::SymbolKind;
use crate::token::TT;

impl<'a> Parser<'a> {
  /// Parses a binding pattern, declaring every name it binds as `kind` in the current scope.
  pub fn pat(&mut self, ctx: ParseCtx, kind: SymbolKind) -> SyntaxResult<Node<Pat>> {
    match self.peek().typ {
      TT::BracketOpen => self.arr_pat(ctx, kind),
      TT::BraceOpen => self.obj_pat(ctx, kind),
      _ => self.id_pat(ctx, kind),
    }
  }

  pub fn id_pat(&mut self, ctx: ParseCtx, kind: SymbolKind) -> SyntaxResult<Node<Pat>> {
    let t = self.require(TT::Identifier)?;
    let name = self.identifier_text(&t)?;
    if (ctx.rules.await_allowed && name == "await") || (ctx.rules.yield_allowed && name == "yield") {
      self.issue(
        Issue::UnsupportedSyntax,
        t.loc,
        format!("cannot use `{}` as an identifier here", name),
      );
    };
    let symbol = self.declare(kind, &name, t.loc);
    Ok(Node::new(t.loc, Pat::Id(IdPat { symbol })))
  }

  fn pat_default(&mut self, ctx: ParseCtx) -> SyntaxResult<Option<Node<Expr>>> {
    Ok(if self.consume_if(TT::Equals).is_match() {
      Some(self.expr_assign(ctx.nested())?)
    } else {
      None
    })
  }

  pub fn arr_pat(&mut self, ctx: ParseCtx, kind: SymbolKind) -> SyntaxResult<Node<Pat>> {
    self.with_loc(|p| {
      p.require(TT::BracketOpen)?;
      let mut elements = Vec::new();
      let mut rest = None;
      loop {
        if p.consume_if(TT::BracketClose).is_match() {
          break;
        };
        if p.consume_if(TT::Comma).is_match() {
          elements.push(None);
          continue;
        };
        if p.consume_if(TT::DotDotDot).is_match() {
          rest = Some(p.pat(ctx, kind)?);
          p.require(TT::BracketClose)?;
          break;
        };
        let target = p.pat(ctx, kind)?;
        let default_value = p.pat_default(ctx)?;
        elements.push(Some(ArrPatElem {
          target,
          default_value,
        }));
        if !p.consume_if(TT::Comma).is_match() {
          p.require(TT::BracketClose)?;
          break;
        };
      }
      Ok(Pat::Arr(ArrPat { elements, rest }))
    })
  }

  pub fn obj_pat(&mut self, ctx: ParseCtx, kind: SymbolKind) -> SyntaxResult<Node<Pat>> {
    self.with_loc(|p| {
      p.require(TT::BraceOpen)?;
      let mut properties = Vec::new();
      let mut rest = None;
      loop {
        if p.consume_if(TT::BraceClose).is_match() {
          break;
        };
        if p.consume_if(TT::DotDotDot).is_match() {
          rest = Some(p.id_pat(ctx, kind)?);
          p.require(TT::BraceClose)?;
          break;
        };
        let prop = p.with_loc(|p| {
          let (t, next) = p.peek_2();
          if t.typ == TT::Identifier && next.typ != TT::Colon {
            // Shorthand: `{ a }` or `{ a = 1 }`.
            let target = p.id_pat(ctx, kind)?;
            let key = ClassOrObjKey::Direct(p.identifier_text(&t)?);
            let default_value = p.pat_default(ctx)?;
            return Ok(ObjPatProp {
              key,
              target,
              shorthand: true,
              default_value,
            });
          };
          let key = p.class_or_obj_key(ctx, false)?;
          p.require(TT::Colon)?;
          let target = p.pat(ctx, kind)?;
          let default_value = p.pat_default(ctx)?;
          Ok(ObjPatProp {
            key,
            target,
            shorthand: false,
            default_value,
          })
        })?;
        properties.push(prop);
        if !p.consume_if(TT::Comma).is_match() {
          p.require(TT::BraceClose)?;
          break;
        };
      }
      Ok(Pat::Obj(ObjPat { properties, rest }))
    })
  }

  // Declares the name an identifier expression refers to.
  fn id_expr_to_pat(&mut self, loc: Loc, id: &IdExpr, kind: SymbolKind) -> SyntaxResult<Node<Pat>> {
    let IdRef::Deferred(name) = id.id else {
      return Err(loc.error(SyntaxErrorType::InvalidAssigmentTarget, None));
    };
    let name = self.names.get(self.source(), name).to_string();
    let symbol = self.declare(kind, &name, loc);
    Ok(Node::new(loc, Pat::Id(IdPat { symbol })))
  }

  // `a = 1` as an element of a converted literal is a target with a default.
  fn expr_to_pat_with_default(
    &mut self,
    node: Node<Expr>,
    kind: SymbolKind,
  ) -> SyntaxResult<(Node<Pat>, Option<Node<Expr>>)> {
    match *node.stx {
      Expr::Binary(BinaryExpr {
        operator: OperatorName::Assignment,
        left,
        right,
      }) => Ok((self.expr_to_pat(left, kind)?, Some(right))),
      stx => Ok((self.expr_to_pat(Node::new(node.loc, stx), kind)?, None)),
    }
  }

  /// Converts an expression that turned out to be a binding pattern, such as the parameters of
  /// `(a, [b, c] = d) => e`, declaring the names it binds. This avoids reparsing.
  pub fn expr_to_pat(&mut self, node: Node<Expr>, kind: SymbolKind) -> SyntaxResult<Node<Pat>> {
    let loc = node.loc;
    match *node.stx {
      Expr::Id(id) => self.id_expr_to_pat(loc, &id, kind),
      Expr::LitArr(LitArrExpr { elements }) => {
        let mut pat_elements = Vec::new();
        let mut rest = None;
        for element in elements {
          if rest.is_some() {
            return Err(loc.error(SyntaxErrorType::InvalidAssigmentTarget, None));
          };
          match element {
            ArrElem::Single(elem) => {
              let (target, default_value) = self.expr_to_pat_with_default(elem, kind)?;
              pat_elements.push(Some(ArrPatElem {
                target,
                default_value,
              }));
            }
            ArrElem::Rest(elem) => rest = Some(self.expr_to_pat(elem, kind)?),
            ArrElem::Empty => pat_elements.push(None),
          };
        }
        Ok(Node::new(loc, Pat::Arr(ArrPat {
          elements: pat_elements,
          rest,
        })))
      }
      Expr::LitObj(LitObjExpr { members }) => {
        let mut properties = Vec::new();
        let mut rest = None;
        for member in members {
          let member_loc = member.loc;
          if rest.is_some() {
            return Err(member_loc.error(SyntaxErrorType::InvalidAssigmentTarget, None));
          };
          match member.stx.typ {
            ObjMemberType::Valued {
              key,
              val: ClassOrObjVal::Prop(Some(value)),
            } => {
              let (target, default_value) = self.expr_to_pat_with_default(value, kind)?;
              properties.push(Node::new(member_loc, ObjPatProp {
                key,
                target,
                shorthand: false,
                default_value,
              }));
            }
            ObjMemberType::Valued { .. } => {
              return Err(member_loc.error(SyntaxErrorType::InvalidAssigmentTarget, None));
            }
            ObjMemberType::Shorthand { id, initializer } => {
              let IdRef::Deferred(name) = id else {
                return Err(member_loc.error(SyntaxErrorType::InvalidAssigmentTarget, None));
              };
              let key = ClassOrObjKey::Direct(self.names.get(self.source(), name).to_string());
              let target = self.id_expr_to_pat(
                member_loc,
                &IdExpr {
                  id,
                  can_be_removed_if_unused: false,
                },
                kind,
              )?;
              properties.push(Node::new(member_loc, ObjPatProp {
                key,
                target,
                shorthand: true,
                default_value: initializer,
              }));
            }
            ObjMemberType::Rest { val } => {
              let target = self.expr_to_pat(val, kind)?;
              if !matches!(*target.stx, Pat::Id(_)) {
                return Err(target.error(SyntaxErrorType::InvalidAssigmentTarget));
              };
              rest = Some(target);
            }
          };
        }
        Ok(Node::new(loc, Pat::Obj(ObjPat { properties, rest })))
      }
      _ => Err(loc.error(SyntaxErrorType::InvalidAssigmentTarget, None)),
    }
  }

  /// Checks the left side of an assignment or update. Array and object literals are only valid on
  /// the left of a plain `=`, where they are destructuring targets and stay expressions.
  pub fn check_assign_target(&mut self, target: &Node<Expr>, operator: OperatorName) {
    if !self.is_valid_assign_target(target, operator == OperatorName::Assignment) {
      self.issue(
        Issue::InvalidAssignmentTarget,
        target.loc,
        "invalid assignment target",
      );
    };
  }

  fn is_valid_assign_target(&self, target: &Node<Expr>, allow_destructuring: bool) -> bool {
    match target.stx.as_ref() {
      Expr::Id(_) => true,
      Expr::Member(e) => e.optional_chain == OptionalChain::None,
      Expr::ComputedMember(e) => e.optional_chain == OptionalChain::None,
      Expr::PrivateMember(e) => e.optional_chain == OptionalChain::None,
      Expr::LitArr(arr) if allow_destructuring => arr.elements.iter().all(|e| match e {
        ArrElem::Single(elem) => self.is_valid_destructuring_elem(elem),
        ArrElem::Rest(elem) => self.is_valid_assign_target(elem, true),
        ArrElem::Empty => true,
      }),
      Expr::LitObj(obj) if allow_destructuring => obj.members.iter().all(|m| match &m.stx.typ {
        ObjMemberType::Valued {
          val: ClassOrObjVal::Prop(Some(value)),
          ..
        } => self.is_valid_destructuring_elem(value),
        ObjMemberType::Valued { .. } => false,
        ObjMemberType::Shorthand { .. } => true,
        ObjMemberType::Rest { val } => self.is_valid_assign_target(val, false),
      }),
      _ => false,
    }
  }

  fn is_valid_destructuring_elem(&self, elem: &Node<Expr>) -> bool {
    match elem.stx.as_ref() {
      Expr::Binary(BinaryExpr {
        operator: OperatorName::Assignment,
        left,
        ..
      }) => self.is_valid_assign_target(left, true),
      _ => self.is_valid_assign_target(elem, true),
    }
  }
}
