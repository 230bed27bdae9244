use super::operator::BINARY_OPERATOR_MAPPING;
use super::operator::UNARY_OPERATOR_MAPPING;
use super::ParseCtx;
use super::ParsePatternRules;
use super::Parser;
use super::Reading;
use crate::ast::expr::ArrowFuncExpr;
use crate::ast::expr::BinaryExpr;
use crate::ast::expr::CallArg;
use crate::ast::expr::CallExpr;
use crate::ast::expr::ComputedMemberExpr;
use crate::ast::expr::CondExpr;
use crate::ast::expr::Expr;
use crate::ast::expr::IdExpr;
use crate::ast::expr::IdRef;
use crate::ast::expr::ImportCallExpr;
use crate::ast::expr::MemberExpr;
use crate::ast::expr::NewExpr;
use crate::ast::expr::OptionalChain;
use crate::ast::expr::PrivateMemberExpr;
use crate::ast::expr::PrivateNameExpr;
use crate::ast::expr::TaggedTemplateExpr;
use crate::ast::expr::UnaryExpr;
use crate::ast::expr::UnaryPostfixExpr;
use crate::ast::expr::YieldExpr;
use crate::ast::func::Func;
use crate::ast::func::FuncBody;
use crate::ast::func::Param;
use crate::ast::node::Node;
use crate::ast::pat::IdPat;
use crate::ast::pat::Pat;
use crate::error::Issue;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::import_record::ImportKind;
use crate::lex::LexMode;
use crate::loc::Loc;
use crate::operator::prec;
use crate::operator::Associativity;
use crate::operator::OperatorName;
use crate::scope::ScopeKind;
use crate::symbol::SymbolKind;
use crate::token::Token;
use crate::token::TT;

// Tokens after which a `<...>` in an expression must have been type arguments rather than
// comparisons.
fn can_follow_type_args(t: &Token) -> bool {
  t.preceded_by_line_terminator
    || matches!(
      t.typ,
      TT::ParenthesisOpen
        | TT::LiteralTemplatePartString
        | TT::LiteralTemplatePartStringEnd
        | TT::ParenthesisClose
        | TT::BracketClose
        | TT::BraceClose
        | TT::Colon
        | TT::Semicolon
        | TT::Comma
        | TT::Question
        | TT::EqualsEquals
        | TT::EqualsEqualsEquals
        | TT::ExclamationEquals
        | TT::ExclamationEqualsEquals
        | TT::AmpersandAmpersand
        | TT::BarBar
        | TT::QuestionQuestion
        | TT::Caret
        | TT::Ampersand
        | TT::Bar
        | TT::EOF
    )
}

// Whether `yield` is followed by its operand.
fn can_start_yield_operand(t: &Token) -> bool {
  !t.preceded_by_line_terminator
    && !matches!(
      t.typ,
      TT::ParenthesisClose
        | TT::BracketClose
        | TT::BraceClose
        | TT::Comma
        | TT::Semicolon
        | TT::Colon
        | TT::Question
        | TT::EqualsChevronRight
        | TT::KeywordIn
        | TT::EOF
    )
}

/// An item between parentheses, before it is known whether they are arrow function parameters.
struct ParenItem {
  rest: Option<Loc>,
  value: Node<Expr>,
}

impl<'a> Parser<'a> {
  /// A full expression, including the comma operator.
  pub fn expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    self.expr_with_min_prec(ctx, prec::COMMA)
  }

  /// An expression without top-level commas, as in arguments and initializers.
  pub fn expr_assign(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    self.expr_with_min_prec(ctx, prec::ASSIGN)
  }

  pub fn id_expr(&mut self) -> SyntaxResult<Node<Expr>> {
    let t = self.require(TT::Identifier)?;
    let name = self.name_of(&t)?;
    Ok(Node::new(t.loc, Expr::Id(IdExpr {
      id: IdRef::Deferred(name),
      can_be_removed_if_unused: false,
    })))
  }

  /// Arguments of a call or `new`, including the parentheses.
  pub fn call_args(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<CallArg>> {
    self.require(TT::ParenthesisOpen)?;
    self.call_args_after_open(ctx)
  }

  fn call_args_after_open(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<CallArg>> {
    self.list(TT::Comma, TT::ParenthesisClose, |p| {
      let spread = p.consume_if(TT::DotDotDot).is_match();
      let value = p.expr_assign(ctx.nested())?;
      Ok(CallArg { spread, value })
    })
  }

  pub fn expr_with_min_prec(&mut self, ctx: ParseCtx, min_prec: u8) -> SyntaxResult<Node<Expr>> {
    let left = self.expr_operand(ctx)?;
    self.expr_suffix(ctx, left, min_prec)
  }

  fn expr_operand(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    let t = self.peek_with_mode(LexMode::SlashIsRegex);

    if let Some(operator) = UNARY_OPERATOR_MAPPING.get(&t.typ) {
      self.consume();
      let argument = self.expr_with_min_prec(ctx.with_or_pattern(false), operator.precedence)?;
      if operator.name.is_update() {
        self.check_assign_target(&argument, operator.name);
      };
      return Ok(Node::new(t.loc + argument.loc, Expr::Unary(UnaryExpr {
        operator: operator.name,
        argument,
      })));
    };
    if ctx.rules.await_allowed && self.is_word(&t, "await") {
      self.consume();
      let argument = self.expr_with_min_prec(ctx.with_or_pattern(false), prec::PREFIX)?;
      return Ok(Node::new(t.loc + argument.loc, Expr::Unary(UnaryExpr {
        operator: OperatorName::Await,
        argument,
      })));
    };
    if ctx.rules.yield_allowed && self.is_word(&t, "yield") {
      return self.yield_expr(ctx);
    };

    let primary = self.expr_primary(ctx, t)?;
    if matches!(*primary.stx, Expr::ArrowFunc(_)) {
      return Ok(primary);
    };
    self.member_chain(ctx, primary, true)
  }

  fn yield_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    self.with_loc(|p| {
      p.consume();
      let next = p.peek_with_mode(LexMode::SlashIsRegex);
      let delegate = !next.preceded_by_line_terminator && p.consume_if(TT::Asterisk).is_match();
      let argument = if delegate || can_start_yield_operand(&next) {
        Some(p.expr_assign(ctx.with_or_pattern(false))?)
      } else {
        None
      };
      Ok(Expr::Yield(YieldExpr { delegate, argument }))
    })
  }

  fn expr_primary(&mut self, ctx: ParseCtx, t: Token) -> SyntaxResult<Node<Expr>> {
    match t.typ {
      TT::Identifier => {
        let (_, t1, t2) = self.peek_3();
        if self.is_word(&t, "async") && !t1.preceded_by_line_terminator {
          match t1.typ {
            TT::KeywordFunction => return self.func_expr(),
            TT::ParenthesisOpen => {
              let async_tok = self.consume();
              return self.paren_or_arrow(ctx, Some(async_tok), false);
            }
            TT::Identifier if t2.typ == TT::EqualsChevronRight => {
              let async_tok = self.consume();
              return self.single_param_arrow(ctx, Some(async_tok));
            }
            TT::ChevronLeft if self.is_ts() => {
              let generic = self.speculate(|p| {
                let async_tok = p.consume();
                p.generic_arrow(ctx, Some(async_tok))
              });
              if let Some(arrow) = generic {
                return Ok(arrow);
              };
            }
            _ => {}
          };
        };
        if t1.typ == TT::EqualsChevronRight && !t1.preceded_by_line_terminator {
          return self.single_param_arrow(ctx, None);
        };
        self.id_expr()
      }
      TT::KeywordFunction => self.func_expr(),
      TT::KeywordClass => self.class_expr(ctx),
      TT::ParenthesisOpen => self.paren_or_arrow(ctx, None, false),
      TT::BracketOpen => self.lit_arr(ctx),
      TT::BraceOpen => self.lit_obj(ctx),
      TT::LiteralBigInt => self.lit_bigint(),
      TT::LiteralNumber => self.lit_num(),
      TT::LiteralRegex => self.lit_regex(),
      TT::LiteralString => self.lit_str(),
      TT::LiteralTemplatePartString | TT::LiteralTemplatePartStringEnd => self.lit_template(ctx),
      TT::LiteralTrue | TT::LiteralFalse => {
        self.consume();
        Ok(Node::new(t.loc, Expr::LitBool(t.typ == TT::LiteralTrue)))
      }
      TT::LiteralNull => {
        self.consume();
        Ok(Node::new(t.loc, Expr::LitNull))
      }
      TT::KeywordThis => {
        self.consume();
        Ok(Node::new(t.loc, Expr::This))
      }
      TT::KeywordSuper => {
        self.consume();
        Ok(Node::new(t.loc, Expr::Super))
      }
      TT::KeywordNew => self.new_expr(ctx),
      TT::KeywordImport => self.import_expr(ctx),
      TT::PrivateMember => {
        // Only `#x in obj` uses a private name on its own.
        self.consume();
        if self.peek().typ != TT::KeywordIn {
          return Err(t.error(SyntaxErrorType::ExpectedSyntax("`in` after private name")));
        };
        let name = self.name_of(&t)?;
        Ok(Node::new(t.loc, Expr::PrivateName(PrivateNameExpr {
          id: IdRef::Deferred(name),
        })))
      }
      TT::ChevronLeft => self.angle_bracket_expr(ctx),
      TT::EOF => Err(t.error(SyntaxErrorType::UnexpectedEnd)),
      _ => Err(t.error(SyntaxErrorType::ExpectedSyntax("expression operand"))),
    }
  }

  // `<` at the start of an operand: a JSX element, a generic arrow function, or a TypeScript cast.
  fn angle_bracket_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    if !self.is_ts() {
      return self.jsx_elem(ctx);
    };
    if self.is_jsx() {
      // In TSX, only `<T,>` and `<T extends U>` start a generic arrow function.
      let (_, t1, t2) = self.peek_3();
      let generic = t1.typ == TT::Identifier && matches!(t2.typ, TT::Comma | TT::KeywordExtends);
      if !generic {
        return self.jsx_elem(ctx);
      };
      return self.generic_arrow(ctx, None);
    };
    if let Some(arrow) = self.speculate(|p| p.generic_arrow(ctx, None)) {
      return Ok(arrow);
    };
    // `<T>x` cast.
    let start = self.require(TT::ChevronLeft)?;
    self.ts_skip_type()?;
    self.require_chevron_right()?;
    let value = self.expr_with_min_prec(ctx, prec::PREFIX)?;
    Ok(Node::new(start.loc + value.loc, *value.stx))
  }

  fn generic_arrow(&mut self, ctx: ParseCtx, async_tok: Option<Token>) -> SyntaxResult<Node<Expr>> {
    self.ts_skip_type_params()?;
    if self.peek().typ != TT::ParenthesisOpen {
      return Err(self.peek().error(SyntaxErrorType::RequiredTokenNotFound(TT::ParenthesisOpen)));
    };
    self.paren_or_arrow(ctx, async_tok, true)
  }

  fn new_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    let new_tok = self.require(TT::KeywordNew)?;
    if self.consume_if(TT::Dot).is_match() {
      let prop = self.require_word("target")?;
      return Ok(Node::new(new_tok.loc + prop.loc, Expr::NewTarget));
    };
    let t = self.peek_with_mode(LexMode::SlashIsRegex);
    let callee = match t.typ {
      TT::KeywordNew => self.new_expr(ctx)?,
      _ => self.expr_primary(ctx, t)?,
    };
    let callee = self.member_chain(ctx, callee, false)?;
    let cp = self.checkpoint();
    let arguments = if self.peek().typ == TT::ParenthesisOpen {
      self.call_args(ctx)?
    } else {
      Vec::new()
    };
    let loc = new_tok.loc + callee.loc + self.since_checkpoint(&cp);
    Ok(Node::new(loc, Expr::New(NewExpr { callee, arguments })))
  }

  fn import_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    let import_tok = self.require(TT::KeywordImport)?;
    if self.consume_if(TT::Dot).is_match() {
      let prop = self.require_word("meta")?;
      return Ok(Node::new(import_tok.loc + prop.loc, Expr::ImportMeta));
    };
    self.require(TT::ParenthesisOpen)?;
    let module = self.expr_assign(ctx.nested())?;
    // Import attributes are accepted and ignored.
    if self.consume_if(TT::Comma).is_match() && self.peek().typ != TT::ParenthesisClose {
      self.expr_assign(ctx.nested())?;
      let _ = self.consume_if(TT::Comma);
    };
    let end = self.require(TT::ParenthesisClose)?;
    let import_record = match module.stx.as_ref() {
      Expr::LitStr(path) => Some(self.add_import_record(path.clone(), ImportKind::Dynamic, module.loc)),
      _ => None,
    };
    Ok(Node::new(import_tok.loc + end.loc, Expr::ImportCall(ImportCallExpr {
      module,
      import_record,
    })))
  }

  // The property name after `.` or `?.`.
  fn member_name(&mut self) -> SyntaxResult<(Token, Result<IdRef, String>)> {
    let t = self.consume();
    if t.typ == TT::PrivateMember {
      let name = self.name_of(&t)?;
      return Ok((t, Ok(IdRef::Deferred(name))));
    };
    if !t.typ.is_identifier_name() {
      return Err(t.error(SyntaxErrorType::ExpectedSyntax("member access property")));
    };
    let name = self.identifier_text(&t)?;
    Ok((t, Err(name)))
  }

  fn member_access(&mut self, object: Node<Expr>, optional_chain: OptionalChain) -> SyntaxResult<Node<Expr>> {
    let (t, name) = self.member_name()?;
    let loc = object.loc + t.loc;
    Ok(Node::new(loc, match name {
      Ok(id) => Expr::PrivateMember(PrivateMemberExpr {
        optional_chain,
        object,
        id,
      }),
      Err(right) => Expr::Member(MemberExpr {
        optional_chain,
        object,
        right,
        can_be_removed_if_unused: false,
      }),
    }))
  }

  fn computed_member(
    &mut self,
    ctx: ParseCtx,
    object: Node<Expr>,
    optional_chain: OptionalChain,
  ) -> SyntaxResult<Node<Expr>> {
    let member = self.expr(ctx.nested())?;
    let end = self.require(TT::BracketClose)?;
    Ok(Node::new(object.loc + end.loc, Expr::ComputedMember(ComputedMemberExpr {
      optional_chain,
      object,
      member,
    })))
  }

  fn call(&mut self, ctx: ParseCtx, callee: Node<Expr>, optional_chain: OptionalChain) -> SyntaxResult<Node<Expr>> {
    // Either `(` or `?.(`.
    let cp = self.checkpoint();
    self.consume();
    let arguments = self.call_args_after_open(ctx)?;
    let loc = callee.loc + self.since_checkpoint(&cp);
    let is_direct_eval = optional_chain == OptionalChain::None
      && matches!(callee.stx.as_ref(), Expr::Id(IdExpr { id: IdRef::Deferred(name), .. }) if self.names.get(self.source(), *name) == "eval");
    if is_direct_eval {
      self.store.mark_direct_eval();
    };
    Ok(Node::new(loc, Expr::Call(CallExpr {
      optional_chain,
      is_direct_eval,
      callee,
      arguments,
    })))
  }

  /// Member accesses, calls, and tagged templates following an operand. Links after a `?.` are
  /// marked as continuing its optional chain.
  pub fn member_chain(&mut self, ctx: ParseCtx, left: Node<Expr>, allow_call: bool) -> SyntaxResult<Node<Expr>> {
    let mut left = left;
    let mut in_chain = false;
    loop {
      let t = self.peek();
      let link = if in_chain {
        OptionalChain::Continue
      } else {
        OptionalChain::None
      };
      left = match t.typ {
        TT::Dot => {
          self.consume();
          self.member_access(left, link)?
        }
        TT::BracketOpen => {
          self.consume();
          self.computed_member(ctx, left, link)?
        }
        TT::ParenthesisOpen if allow_call => self.call(ctx, left, link)?,
        TT::QuestionDot if allow_call => {
          self.consume();
          in_chain = true;
          self.member_access(left, OptionalChain::Start)?
        }
        TT::QuestionDotBracketOpen if allow_call => {
          self.consume();
          in_chain = true;
          self.computed_member(ctx, left, OptionalChain::Start)?
        }
        TT::QuestionDotParenthesisOpen if allow_call => {
          in_chain = true;
          self.call(ctx, left, OptionalChain::Start)?
        }
        TT::LiteralTemplatePartString | TT::LiteralTemplatePartStringEnd => {
          if in_chain {
            self.issue(
              Issue::UnsupportedSyntax,
              t.loc,
              "template literals cannot be tagged in an optional chain",
            );
          };
          let cp = self.checkpoint();
          let parts = self.lit_template_parts(ctx, true)?;
          let loc = left.loc + self.since_checkpoint(&cp);
          Node::new(loc, Expr::TaggedTemplate(TaggedTemplateExpr {
            function: left,
            parts,
          }))
        }
        // Non-null assertion.
        TT::Exclamation if self.is_ts() && !t.preceded_by_line_terminator => {
          let t = self.consume();
          Node::new(left.loc + t.loc, *left.stx)
        }
        // `f<T>(x)` and `f<T>`.
        TT::ChevronLeft if self.is_ts() => {
          let skipped = self.speculate(|p| {
            p.ts_skip_type_args()?;
            let next = p.peek();
            if can_follow_type_args(&next) {
              Ok(())
            } else {
              Err(next.error(SyntaxErrorType::ExpectedSyntax("type arguments")))
            }
          });
          if skipped.is_none() {
            break;
          };
          left
        }
        _ => break,
      };
    }
    Ok(left)
  }

  /// Postfix operators, binary operators, the conditional operator, and TypeScript `as`.
  fn expr_suffix(&mut self, ctx: ParseCtx, left: Node<Expr>, min_prec: u8) -> SyntaxResult<Node<Expr>> {
    let mut left = left;
    loop {
      let t = self.peek();
      match t.typ {
        // Automatic semicolon insertion applies before a postfix operator on a new line.
        TT::PlusPlus | TT::HyphenHyphen if !t.preceded_by_line_terminator => {
          if prec::POSTFIX < min_prec {
            break;
          };
          self.consume();
          let operator = if t.typ == TT::PlusPlus {
            OperatorName::PostfixIncrement
          } else {
            OperatorName::PostfixDecrement
          };
          self.check_assign_target(&left, operator);
          left = Node::new(left.loc + t.loc, Expr::UnaryPostfix(UnaryPostfixExpr {
            operator,
            argument: left,
          }));
          continue;
        }
        TT::Question => {
          if prec::CONDITIONAL < min_prec {
            break;
          };
          if self.is_ts() {
            // `(a?: T) => a` and `(a?) => a`: an optional parameter, not a conditional.
            let (_, next) = self.peek_2();
            if matches!(next.typ, TT::Colon | TT::Comma | TT::ParenthesisClose | TT::Equals) {
              break;
            };
          };
          self.consume();
          let consequent = self.expr_assign(ctx.nested())?;
          self.require(TT::Colon)?;
          let alternate = self.expr_assign(ctx.with_or_pattern(false))?;
          left = Node::new(left.loc + alternate.loc, Expr::Cond(CondExpr {
            test: left,
            consequent,
            alternate,
          }));
          continue;
        }
        TT::Identifier
          if self.is_ts()
            && !t.preceded_by_line_terminator
            && (self.is_word(&t, "as") || self.is_word(&t, "satisfies")) =>
        {
          if prec::COMPARE < min_prec {
            break;
          };
          self.consume();
          if self.is_word(&t, "as") && self.peek().typ == TT::KeywordConst {
            self.consume();
          } else {
            self.ts_skip_type()?;
          };
          continue;
        }
        _ => {}
      };

      let Some(operator) = BINARY_OPERATOR_MAPPING.get(&t.typ) else {
        break;
      };
      if t.typ == TT::KeywordIn && !ctx.in_allowed {
        break;
      };
      if operator.precedence < min_prec {
        break;
      };
      self.consume();
      if operator.name.is_assignment() {
        self.check_assign_target(&left, operator.name);
      };
      let next_min_prec = operator.precedence + (operator.associativity == Associativity::Left) as u8;
      let right = self.expr_with_min_prec(ctx.with_or_pattern(false), next_min_prec)?;
      left = Node::new(left.loc + right.loc, Expr::Binary(BinaryExpr {
        operator: operator.name,
        left,
        right,
      }));
    }
    Ok(left)
  }

  /// `x => ...` or `async x => ...`.
  fn single_param_arrow(&mut self, ctx: ParseCtx, async_tok: Option<Token>) -> SyntaxResult<Node<Expr>> {
    let param_tok = self.require(TT::Identifier)?;
    self.enter_scope(ScopeKind::FunctionArgs, param_tok.loc.0);
    let name = self.identifier_text(&param_tok)?;
    let symbol = self.declare(SymbolKind::Hoisted, &name, param_tok.loc);
    let params = vec![Node::new(param_tok.loc, Param {
      rest: false,
      pattern: Node::new(param_tok.loc, Pat::Id(IdPat { symbol })),
      default_value: None,
      ts_param_property: false,
    })];
    let start = async_tok.as_ref().map(|t| t.loc).unwrap_or(param_tok.loc);
    self.arrow_func_rest(ctx, start, async_tok.is_some(), param_tok.loc.0, params)
  }

  /// Parenthesized items that are either an expression, the parameters of an arrow function, or,
  /// after `async`, the arguments of a call to something named `async`. The parameter scope is
  /// entered before the items are parsed, and flattened away if they turn out not to be parameters.
  fn paren_or_arrow(
    &mut self,
    ctx: ParseCtx,
    async_tok: Option<Token>,
    require_arrow: bool,
  ) -> SyntaxResult<Node<Expr>> {
    let open = self.peek();
    let order_index = self.enter_scope(ScopeKind::FunctionArgs, open.loc.0);
    let outer_deferred = self.begin_deferred();
    let cp = self.checkpoint();
    self.require(TT::ParenthesisOpen)?;

    let item_ctx = ParseCtx {
      rules: ParsePatternRules {
        await_allowed: ctx.rules.await_allowed || async_tok.is_some(),
        yield_allowed: ctx.rules.yield_allowed,
      },
      in_allowed: true,
      or_pattern: true,
    };
    let mut items = Vec::new();
    // Syntax that can only appear in parameters.
    let mut params_only = None;
    loop {
      if self.consume_if(TT::ParenthesisClose).is_match() {
        break;
      };
      let rest = self.consume_if(TT::DotDotDot).match_loc();
      if async_tok.is_none() {
        params_only = params_only.or(rest);
      };
      let mut value = self.expr_assign(item_ctx)?;
      if self.is_ts() {
        if let Some(q) = self.consume_if(TT::Question).match_loc() {
          params_only = params_only.or(Some(q));
        };
        if let Some(colon) = self.consume_if(TT::Colon).match_loc() {
          params_only = params_only.or(Some(colon));
          self.ts_skip_type()?;
        };
        if params_only.is_some() && self.consume_if(TT::Equals).is_match() {
          let default_value = self.expr_assign(item_ctx.nested())?;
          value = Node::new(value.loc + default_value.loc, Expr::Binary(BinaryExpr {
            operator: OperatorName::Assignment,
            left: value,
            right: default_value,
          }));
        };
      };
      items.push(ParenItem { rest, value });
      if !self.consume_if(TT::Comma).is_match() {
        self.require(TT::ParenthesisClose)?;
        break;
      };
    }
    let parens_loc = self.since_checkpoint(&cp);

    if self.is_ts() && self.peek().typ == TT::Colon {
      // A return type, but only if `=>` follows: in `a ? (b) : c` the colon belongs to the conditional.
      let return_type = self.speculate(|p| {
        p.consume();
        p.ts_skip_return_type()?;
        let next = p.peek();
        if next.typ == TT::EqualsChevronRight {
          Ok(next.loc)
        } else {
          Err(next.error(SyntaxErrorType::RequiredTokenNotFound(TT::EqualsChevronRight)))
        }
      });
      params_only = params_only.or(return_type);
    };

    let next = self.peek();
    let is_arrow = next.typ == TT::EqualsChevronRight;
    if !is_arrow && (require_arrow || params_only.is_some() || (items.is_empty() && async_tok.is_none())) {
      return Err(next.error(SyntaxErrorType::RequiredTokenNotFound(TT::EqualsChevronRight)));
    };

    if is_arrow {
      self.end_deferred(outer_deferred, Reading::Pattern);
      let mut params = Vec::with_capacity(items.len());
      for item in items {
        params.push(self.arrow_param(item)?);
      }
      let start = async_tok.as_ref().map(|t| t.loc).unwrap_or(open.loc);
      return self.arrow_func_rest(ctx, start, async_tok.is_some(), open.loc.0, params);
    };

    self.end_deferred(outer_deferred, Reading::Expr);
    self.store.flatten_scope(order_index);
    if let Some(async_tok) = async_tok {
      // A call to a function named `async`.
      let name = self.name_of(&async_tok)?;
      let callee = Node::new(async_tok.loc, Expr::Id(IdExpr {
        id: IdRef::Deferred(name),
        can_be_removed_if_unused: false,
      }));
      let arguments = items
        .into_iter()
        .map(|item| CallArg {
          spread: item.rest.is_some(),
          value: item.value,
        })
        .collect();
      return Ok(Node::new(async_tok.loc + parens_loc, Expr::Call(CallExpr {
        optional_chain: OptionalChain::None,
        is_direct_eval: false,
        callee,
        arguments,
      })));
    };
    let mut values = items.into_iter().map(|item| item.value);
    let Some(mut grouped) = values.next() else {
      return Err(parens_loc.error(SyntaxErrorType::ExpectedSyntax("expression"), None));
    };
    for right in values {
      grouped = Node::new(grouped.loc + right.loc, Expr::Binary(BinaryExpr {
        operator: OperatorName::Comma,
        left: grouped,
        right,
      }));
    }
    Ok(grouped)
  }

  fn arrow_param(&mut self, item: ParenItem) -> SyntaxResult<Node<Param>> {
    let loc = item.rest.map(|r| r + item.value.loc).unwrap_or(item.value.loc);
    let (pattern, default_value) = match *item.value.stx {
      Expr::Binary(BinaryExpr {
        operator: OperatorName::Assignment,
        left,
        right,
      }) if item.rest.is_none() => (self.expr_to_pat(left, SymbolKind::Hoisted)?, Some(right)),
      stx => (
        self.expr_to_pat(Node::new(item.value.loc, stx), SymbolKind::Hoisted)?,
        None,
      ),
    };
    Ok(Node::new(loc, Param {
      rest: item.rest.is_some(),
      pattern,
      default_value,
      ts_param_property: false,
    }))
  }

  /// Parses `=> body` once the parameters have been declared in the current (parameter) scope.
  fn arrow_func_rest(
    &mut self,
    ctx: ParseCtx,
    start: Loc,
    async_: bool,
    args_scope_loc: usize,
    params: Vec<Node<Param>>,
  ) -> SyntaxResult<Node<Expr>> {
    let arrow = self.require(TT::EqualsChevronRight)?;
    if arrow.preceded_by_line_terminator {
      return Err(arrow.error(SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters));
    };
    self.enter_scope(ScopeKind::FunctionBody, arrow.loc.0);
    self.function_depth += 1;
    let body_ctx = ParseCtx {
      rules: ParsePatternRules {
        await_allowed: async_,
        yield_allowed: false,
      },
      in_allowed: ctx.in_allowed,
      or_pattern: false,
    };
    let cp = self.checkpoint();
    let body = if self.peek().typ == TT::BraceOpen {
      FuncBody::Block(self.func_block_body(body_ctx)?)
    } else {
      FuncBody::Expression(self.expr_assign(body_ctx)?)
    };
    let loc = start + self.since_checkpoint(&cp);
    self.function_depth -= 1;
    self.leave_scope();
    self.leave_scope();
    let func = Node::new(loc, Func {
      arrow: true,
      async_,
      generator: false,
      args_scope_loc,
      body_scope_loc: arrow.loc.0,
      arguments: None,
      params,
      body,
    });
    Ok(Node::new(loc, Expr::ArrowFunc(ArrowFuncExpr { func })))
  }
}
