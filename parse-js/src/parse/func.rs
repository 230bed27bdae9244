use super::ParseCtx;
use super::ParsePatternRules;
use super::Parser;
use crate::ast::expr::Expr;
use crate::ast::expr::FuncExpr;
use crate::ast::func::Func;
use crate::ast::func::FuncBody;
use crate::ast::func::Param;
use crate::ast::node::Node;
use crate::ast::stmt::FuncDecl;
use crate::ast::stmt::Stmt;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::loc::Loc;
use crate::scope::ScopeKind;
use crate::symbol::SymbolKind;
use crate::symbol::SymbolRef;
use crate::token::Token;
use crate::token::TT;

const TS_PARAM_MODIFIERS: [&str; 5] = ["public", "private", "protected", "readonly", "override"];

/// How a function is introduced, independent of its parameters and body.
#[derive(Clone, Copy)]
pub struct FuncFlags {
  pub async_: bool,
  pub generator: bool,
  // TypeScript overloads, abstract methods, and `declare function` have no body.
  pub body_optional: bool,
}

impl<'a> Parser<'a> {
  // `async`, `function`, and `*`, returning where they started.
  fn func_keywords(&mut self) -> SyntaxResult<(Loc, bool, bool)> {
    let start = self.peek().loc;
    let async_ = self.consume_if_word("async");
    self.require(TT::KeywordFunction)?;
    let generator = self.consume_if(TT::Asterisk).is_match();
    Ok((start, async_, generator))
  }

  pub fn func_expr(&mut self) -> SyntaxResult<Node<Expr>> {
    let (start, async_, generator) = self.func_keywords()?;
    let name_tok = match self.peek().typ {
      TT::Identifier => Some(self.consume()),
      _ => None,
    };
    let flags = FuncFlags {
      async_,
      generator,
      body_optional: false,
    };
    let Some((func, name)) = self.func_rest(flags, name_tok.as_ref())? else {
      let t = self.peek();
      return Err(t.error(SyntaxErrorType::RequiredTokenNotFound(TT::BraceOpen)));
    };
    let loc = start + func.loc;
    Ok(Node::new(loc, Expr::Func(FuncExpr { name, func })))
  }

  /// A function declaration. The name is declared in the enclosing scope once the function has
  /// parsed, so that a body-less TypeScript overload declares nothing.
  pub fn func_decl(&mut self, export: bool, default_export: bool) -> SyntaxResult<Node<Stmt>> {
    let (start, async_, generator) = self.func_keywords()?;
    let name_tok = if default_export && self.peek().typ != TT::Identifier {
      None
    } else {
      Some(self.require(TT::Identifier)?)
    };
    let flags = FuncFlags {
      async_,
      generator,
      body_optional: self.is_ts(),
    };
    let Some((func, _)) = self.func_rest(flags, None)? else {
      return Ok(Node::new(start + self.last_loc(), Stmt::Erased));
    };
    let name = match name_tok {
      Some(t) => {
        let name = self.identifier_text(&t)?;
        Some(self.declare(SymbolKind::HoistedFunction, &name, t.loc))
      }
      None => None,
    };
    let loc = start + func.loc;
    Ok(Node::new(loc, Stmt::Func(FuncDecl { export, name, func })))
  }

  /// Where the last consumed token ended.
  pub(crate) fn last_loc(&self) -> Loc {
    match self.next_tok_i.checked_sub(1).and_then(|i| self.buf.get(i)) {
      Some(t) => t.token.loc,
      None => Loc(0, 0),
    }
  }

  /// Type parameters, parameters, return type, and body. For a function expression, `expr_name` is
  /// declared inside the parameter scope so that only the function itself can see it.
  ///
  /// Returns None if the function has no body, in which case nothing it declared is kept.
  pub fn func_rest(
    &mut self,
    flags: FuncFlags,
    expr_name: Option<&Token>,
  ) -> SyntaxResult<Option<(Node<Func>, Option<SymbolRef>)>> {
    if self.is_ts() && self.peek().typ == TT::ChevronLeft {
      self.ts_skip_type_params()?;
    };
    let open = self.peek();
    if open.typ != TT::ParenthesisOpen {
      return Err(open.error(SyntaxErrorType::RequiredTokenNotFound(TT::ParenthesisOpen)));
    };
    let order_index = self.enter_scope(ScopeKind::FunctionArgs, open.loc.0);
    let name = match expr_name {
      Some(t) => {
        let name = self.identifier_text(t)?;
        Some(self.declare(SymbolKind::HoistedFunction, &name, t.loc))
      }
      None => None,
    };
    self.function_depth += 1;
    let fn_ctx = ParseCtx {
      rules: ParsePatternRules {
        await_allowed: flags.async_,
        yield_allowed: flags.generator,
      },
      in_allowed: true,
      or_pattern: false,
    };
    let params = self.func_params(fn_ctx)?;
    if self.is_ts() && self.consume_if(TT::Colon).is_match() {
      self.ts_skip_return_type()?;
    };

    let brace = self.peek();
    if brace.typ != TT::BraceOpen {
      if flags.body_optional {
        self.require_semicolon()?;
        self.function_depth -= 1;
        self.store.discard_scope(order_index);
        return Ok(None);
      };
      return Err(brace.error(SyntaxErrorType::RequiredTokenNotFound(TT::BraceOpen)));
    };
    self.enter_scope(ScopeKind::FunctionBody, brace.loc.0);
    let arguments = match self.store.scopes.current_scope().members.get("arguments") {
      Some(_) => None,
      None => Some(self.declare(SymbolKind::Arguments, "arguments", brace.loc)),
    };
    let body = self.func_block_body(fn_ctx)?;
    self.leave_scope();
    self.leave_scope();
    self.function_depth -= 1;

    let loc = open.loc + self.last_loc();
    let func = Node::new(loc, Func {
      arrow: false,
      async_: flags.async_,
      generator: flags.generator,
      args_scope_loc: open.loc.0,
      body_scope_loc: brace.loc.0,
      arguments,
      params,
      body: FuncBody::Block(body),
    });
    Ok(Some((func, name)))
  }

  /// `{ ... }` of a function, in the body scope the caller has entered.
  pub fn func_block_body(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<Stmt>>> {
    self.require(TT::BraceOpen)?;
    let body = self.stmts_with_directives(ctx, TT::BraceClose)?;
    self.require(TT::BraceClose)?;
    Ok(body)
  }

  fn ts_param_modifiers(&mut self) -> bool {
    let mut found = false;
    loop {
      let (t, next) = self.peek_2();
      let is_modifier = TS_PARAM_MODIFIERS.iter().any(|m| self.is_word(&t, m));
      // `readonly` may itself be the parameter's name.
      let followed_by_binding = matches!(next.typ, TT::Identifier | TT::BraceOpen | TT::BracketOpen | TT::DotDotDot);
      if !is_modifier || !followed_by_binding {
        break;
      };
      self.consume();
      found = true;
    }
    found
  }

  /// Parameters between parentheses, declared as hoisted names in the current scope.
  pub fn func_params(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<Param>>> {
    self.require(TT::ParenthesisOpen)?;
    let params = self.list(TT::Comma, TT::ParenthesisClose, |p| {
      let cp = p.checkpoint();
      let ts_param_property = p.is_ts() && p.ts_param_modifiers();
      if p.is_ts() && p.peek().typ == TT::KeywordThis {
        // `this: Type` only annotates the receiver.
        p.consume();
        if p.consume_if(TT::Colon).is_match() {
          p.ts_skip_type()?;
        };
        return Ok(None);
      };
      let rest = p.consume_if(TT::DotDotDot).is_match();
      let pattern = p.pat(ctx, SymbolKind::Hoisted)?;
      if p.is_ts() {
        let _ = p.consume_if(TT::Question);
        if p.consume_if(TT::Colon).is_match() {
          p.ts_skip_type()?;
        };
      };
      let default_value = if p.consume_if(TT::Equals).is_match() {
        Some(p.expr_assign(ctx.nested())?)
      } else {
        None
      };
      let loc = p.since_checkpoint(&cp);
      Ok(Some(Node::new(loc, Param {
        rest,
        pattern,
        default_value,
        ts_param_property,
      })))
    })?;
    Ok(params.into_iter().flatten().collect())
  }
}
