use super::ParseCtx;
use super::Parser;
use super::Reading;
use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::ast::stmt::BlockStmt;
use crate::ast::stmt::BreakStmt;
use crate::ast::stmt::CatchBlock;
use crate::ast::stmt::ContinueStmt;
use crate::ast::stmt::DoWhileStmt;
use crate::ast::stmt::ForInStmt;
use crate::ast::stmt::ForInit;
use crate::ast::stmt::ForOfStmt;
use crate::ast::stmt::ForStmt;
use crate::ast::stmt::IfStmt;
use crate::ast::stmt::LabelStmt;
use crate::ast::stmt::ReturnStmt;
use crate::ast::stmt::Stmt;
use crate::ast::stmt::SwitchBranch;
use crate::ast::stmt::SwitchStmt;
use crate::ast::stmt::ThrowStmt;
use crate::ast::stmt::TryStmt;
use crate::ast::stmt::VarDecl;
use crate::ast::stmt::VarDeclMode;
use crate::ast::stmt::VarDeclarator;
use crate::ast::stmt::WhileStmt;
use crate::ast::stmt::WithStmt;
use crate::error::Issue;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::operator::OperatorName;
use crate::scope::ScopeKind;
use crate::symbol::SymbolKind;
use crate::token::Token;
use crate::token::TT;

// Tokens that start an expression which `return` on the previous line would have returned.
fn starts_unreturned_expr(t: &Token) -> bool {
  matches!(
    t.typ,
    TT::Identifier
      | TT::LiteralBigInt
      | TT::LiteralFalse
      | TT::LiteralNull
      | TT::LiteralNumber
      | TT::LiteralString
      | TT::LiteralTemplatePartString
      | TT::LiteralTemplatePartStringEnd
      | TT::LiteralTrue
      | TT::ParenthesisOpen
      | TT::BracketOpen
      | TT::KeywordThis
      | TT::KeywordNew
      | TT::KeywordTypeof
      | TT::KeywordVoid
      | TT::Exclamation
      | TT::Tilde
  )
}

impl<'a> Parser<'a> {
  /// A statement list preceded by a directive prologue such as `"use strict";`.
  pub fn stmts_with_directives(&mut self, ctx: ParseCtx, end: TT) -> SyntaxResult<Vec<Node<Stmt>>> {
    let mut body = Vec::new();
    loop {
      let (t, next) = self.peek_2();
      let is_directive = t.typ == TT::LiteralString
        && (matches!(next.typ, TT::Semicolon | TT::BraceClose | TT::EOF) || next.preceded_by_line_terminator);
      if !is_directive {
        break;
      };
      self.consume();
      let _ = self.consume_if(TT::Semicolon);
      let raw = self.str(t.loc);
      body.push(Node::new(t.loc, Stmt::Directive(raw[1..raw.len() - 1].to_string())));
    }
    body.extend(self.repeat_until_tt(end, |p| p.stmt(ctx))?);
    Ok(body)
  }

  /// Which declaration keyword starts the next statement, if any. `let` is only a keyword when a
  /// binding follows it.
  pub fn peek_var_decl_mode(&mut self) -> Option<VarDeclMode> {
    let (t, next) = self.peek_2();
    match t.typ {
      TT::KeywordVar => Some(VarDeclMode::Var),
      TT::KeywordConst if !(self.is_ts() && next.typ == TT::KeywordEnum) => Some(VarDeclMode::Const),
      TT::Identifier
        if self.is_word(&t, "let") && matches!(next.typ, TT::Identifier | TT::BracketOpen | TT::BraceOpen) =>
      {
        Some(VarDeclMode::Let)
      }
      _ => None,
    }
  }

  pub fn stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let (t, next) = self.peek_2();
    if let Some(mode) = self.peek_var_decl_mode() {
      return self.var_decl_stmt(ctx, mode, false);
    };
    if self.is_ts() {
      if let Some(stmt) = self.ts_decl_stmt(ctx, false)? {
        return Ok(stmt);
      };
    };
    match t.typ {
      TT::BraceOpen => Ok(self.block_stmt(ctx)?.map_stx(Stmt::Block)),
      TT::Semicolon => {
        self.consume();
        Ok(Node::new(t.loc, Stmt::Empty))
      }
      TT::KeywordFunction => self.func_decl(false, false),
      TT::Identifier
        if self.is_word(&t, "async")
          && next.typ == TT::KeywordFunction
          && !next.preceded_by_line_terminator =>
      {
        self.func_decl(false, false)
      }
      TT::KeywordClass => self.class_decl(ctx, false, false),
      TT::KeywordIf => self.if_stmt(ctx),
      TT::KeywordFor => self.for_stmt(ctx),
      TT::KeywordWhile => self.while_stmt(ctx),
      TT::KeywordDo => self.do_while_stmt(ctx),
      TT::KeywordSwitch => self.switch_stmt(ctx),
      TT::KeywordTry => self.try_stmt(ctx),
      TT::KeywordThrow => self.throw_stmt(ctx),
      TT::KeywordReturn => self.return_stmt(ctx),
      TT::KeywordBreak | TT::KeywordContinue => self.break_or_continue_stmt(),
      TT::KeywordWith => self.with_stmt(ctx),
      TT::KeywordDebugger => {
        self.consume();
        self.require_semicolon()?;
        Ok(Node::new(t.loc, Stmt::Debugger))
      }
      TT::KeywordImport if !matches!(next.typ, TT::ParenthesisOpen | TT::Dot) => self.import_stmt(),
      TT::KeywordExport => self.export_stmt(ctx),
      TT::Identifier if next.typ == TT::Colon => self.label_stmt(ctx),
      _ => self.expr_stmt(ctx),
    }
  }

  pub fn expr_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let expr = self.expr(ctx)?;
    self.require_semicolon()?;
    Ok(Node::new(expr.loc, Stmt::expr(expr)))
  }

  /// `{ ... }` as its own block scope.
  pub fn block_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<BlockStmt>> {
    let open = self.require(TT::BraceOpen)?;
    self.enter_scope(ScopeKind::Block, open.loc.0);
    let body = self.repeat_until_tt(TT::BraceClose, |p| p.stmt(ctx))?;
    let close = self.require(TT::BraceClose)?;
    self.leave_scope();
    Ok(Node::new(open.loc + close.loc, BlockStmt {
      scope_loc: open.loc.0,
      body,
    }))
  }

  /// Declarators after `var`, `let`, or `const`, without the terminating semicolon.
  pub fn var_decl(&mut self, ctx: ParseCtx, mode: VarDeclMode, export: bool) -> SyntaxResult<Node<VarDecl>> {
    let start = self.consume();
    let kind = match mode {
      VarDeclMode::Var => SymbolKind::Hoisted,
      VarDeclMode::Let => SymbolKind::Other,
      VarDeclMode::Const => SymbolKind::Const,
    };
    let mut declarators = Vec::new();
    loop {
      let pattern = self.pat(ctx, kind)?;
      if self.is_ts() {
        let _ = self.consume_if(TT::Exclamation);
        if self.consume_if(TT::Colon).is_match() {
          self.ts_skip_type()?;
        };
      };
      let initializer = if self.consume_if(TT::Equals).is_match() {
        Some(self.expr_assign(ctx.with_or_pattern(false))?)
      } else {
        None
      };
      declarators.push(VarDeclarator { pattern, initializer });
      if !self.consume_if(TT::Comma).is_match() {
        break;
      };
    }
    Ok(Node::new(start.loc + self.last_loc(), VarDecl {
      export,
      mode,
      declarators,
    }))
  }

  pub fn var_decl_stmt(&mut self, ctx: ParseCtx, mode: VarDeclMode, export: bool) -> SyntaxResult<Node<Stmt>> {
    let decl = self.var_decl(ctx, mode, export)?;
    self.require_semicolon()?;
    Ok(decl.map_stx(Stmt::Var))
  }

  fn paren_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    self.require(TT::ParenthesisOpen)?;
    let expr = self.expr(ctx.nested())?;
    self.require(TT::ParenthesisClose)?;
    Ok(expr)
  }

  fn if_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let start = self.require(TT::KeywordIf)?;
    let test = self.paren_expr(ctx)?;
    let consequent = self.stmt(ctx)?;
    let alternate = if self.consume_if(TT::KeywordElse).is_match() {
      Some(self.stmt(ctx)?)
    } else {
      None
    };
    Ok(Node::new(start.loc + self.last_loc(), Stmt::If(IfStmt {
      test,
      consequent,
      alternate,
    })))
  }

  // The left side of `for (... in/of ...)` or the initializer of a plain `for`.
  fn for_init(&mut self, ctx: ParseCtx) -> SyntaxResult<ForInit> {
    let head_ctx = ctx.with_in_allowed(false);
    if let Some(mode) = self.peek_var_decl_mode() {
      return Ok(ForInit::Decl(self.var_decl(head_ctx, mode, false)?));
    };
    let outer = self.begin_deferred();
    let expr = self.expr(head_ctx.with_or_pattern(true))?;
    let next = self.peek();
    if next.typ == TT::KeywordIn || self.is_word(&next, "of") {
      self.end_deferred(outer, Reading::Pattern);
      self.check_assign_target(&expr, OperatorName::Assignment);
    } else {
      self.end_deferred(outer, Reading::Expr);
    };
    Ok(ForInit::Expr(expr))
  }

  fn for_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let start = self.require(TT::KeywordFor)?;
    let await_ = ctx.rules.await_allowed && self.consume_if_word("await");
    self.require(TT::ParenthesisOpen)?;
    self.enter_scope(ScopeKind::Block, start.loc.0);
    let init = if self.peek().typ == TT::Semicolon {
      None
    } else {
      Some(self.for_init(ctx)?)
    };

    let stmt = match init {
      Some(lhs) if self.consume_if(TT::KeywordIn).is_match() => {
        let rhs = self.expr(ctx.nested())?;
        self.require(TT::ParenthesisClose)?;
        let body = self.stmt(ctx)?;
        Stmt::ForIn(ForInStmt {
          scope_loc: start.loc.0,
          lhs,
          rhs,
          body,
        })
      }
      Some(lhs) if self.consume_if_word("of") => {
        let rhs = self.expr_assign(ctx.nested())?;
        self.require(TT::ParenthesisClose)?;
        let body = self.stmt(ctx)?;
        Stmt::ForOf(ForOfStmt {
          scope_loc: start.loc.0,
          await_,
          lhs,
          rhs,
          body,
        })
      }
      init => {
        self.require(TT::Semicolon)?;
        let condition = match self.peek().typ {
          TT::Semicolon => None,
          _ => Some(self.expr(ctx.nested())?),
        };
        self.require(TT::Semicolon)?;
        let update = match self.peek().typ {
          TT::ParenthesisClose => None,
          _ => Some(self.expr(ctx.nested())?),
        };
        self.require(TT::ParenthesisClose)?;
        let body = self.stmt(ctx)?;
        Stmt::For(ForStmt {
          scope_loc: start.loc.0,
          init,
          condition,
          update,
          body,
        })
      }
    };
    self.leave_scope();
    Ok(Node::new(start.loc + self.last_loc(), stmt))
  }

  fn while_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let start = self.require(TT::KeywordWhile)?;
    let condition = self.paren_expr(ctx)?;
    let body = self.stmt(ctx)?;
    Ok(Node::new(start.loc + body.loc, Stmt::While(WhileStmt { condition, body })))
  }

  fn do_while_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let start = self.require(TT::KeywordDo)?;
    let body = self.stmt(ctx)?;
    self.require(TT::KeywordWhile)?;
    let condition = self.paren_expr(ctx)?;
    // A semicolon is always inserted after `do ... while (x)`.
    let _ = self.consume_if(TT::Semicolon);
    Ok(Node::new(start.loc + self.last_loc(), Stmt::DoWhile(DoWhileStmt { body, condition })))
  }

  fn switch_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let start = self.require(TT::KeywordSwitch)?;
    let test = self.paren_expr(ctx)?;
    let open = self.require(TT::BraceOpen)?;
    self.enter_scope(ScopeKind::Block, open.loc.0);
    let mut branches = Vec::new();
    while !self.consume_if(TT::BraceClose).is_match() {
      let branch = self.with_loc(|p| {
        let case = if p.consume_if(TT::KeywordDefault).is_match() {
          None
        } else {
          p.require(TT::KeywordCase)?;
          Some(p.expr(ctx.nested())?)
        };
        p.require(TT::Colon)?;
        let mut body = Vec::new();
        while !matches!(p.peek().typ, TT::KeywordCase | TT::KeywordDefault | TT::BraceClose | TT::EOF) {
          body.push(p.stmt(ctx)?);
        }
        Ok(SwitchBranch { case, body })
      })?;
      branches.push(branch);
    }
    self.leave_scope();
    Ok(Node::new(start.loc + self.last_loc(), Stmt::Switch(SwitchStmt {
      test,
      scope_loc: open.loc.0,
      branches,
    })))
  }

  fn try_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let start = self.require(TT::KeywordTry)?;
    let wrapped = self.block_stmt(ctx)?;
    let catch = match self.consume_if(TT::KeywordCatch).match_loc() {
      Some(catch_loc) => {
        self.enter_scope(ScopeKind::CatchBinding, catch_loc.0);
        let parameter = if self.consume_if(TT::ParenthesisOpen).is_match() {
          // Only a plain identifier may be redeclared with `var` in the body.
          let kind = if self.peek().typ == TT::Identifier {
            SymbolKind::CatchIdentifier
          } else {
            SymbolKind::Other
          };
          let pattern = self.pat(ctx, kind)?;
          if self.is_ts() && self.consume_if(TT::Colon).is_match() {
            self.ts_skip_type()?;
          };
          self.require(TT::ParenthesisClose)?;
          Some(pattern)
        } else {
          None
        };
        let body = self.block_stmt(ctx)?;
        self.leave_scope();
        Some(Node::new(catch_loc + body.loc, CatchBlock {
          scope_loc: catch_loc.0,
          parameter,
          body,
        }))
      }
      None => None,
    };
    let finally = if self.consume_if(TT::KeywordFinally).is_match() {
      Some(self.block_stmt(ctx)?)
    } else {
      None
    };
    if catch.is_none() && finally.is_none() {
      return Err(start.error(SyntaxErrorType::TryStatementHasNoCatchOrFinally));
    };
    Ok(Node::new(start.loc + self.last_loc(), Stmt::Try(TryStmt {
      wrapped,
      catch,
      finally,
    })))
  }

  fn throw_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let start = self.require(TT::KeywordThrow)?;
    let next = self.peek_with_mode(LexMode::SlashIsRegex);
    if next.preceded_by_line_terminator {
      return Err(next.error(SyntaxErrorType::LineTerminatorAfterThrow));
    };
    let value = self.expr(ctx.nested())?;
    self.require_semicolon()?;
    Ok(Node::new(start.loc + value.loc, Stmt::Throw(ThrowStmt { value })))
  }

  fn return_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let start = self.require(TT::KeywordReturn)?;
    if !self.in_function() {
      self.has_top_level_return = true;
    };
    let next = self.peek_with_mode(LexMode::SlashIsRegex);
    let value = if matches!(next.typ, TT::Semicolon | TT::BraceClose | TT::EOF) {
      None
    } else if next.preceded_by_line_terminator {
      if starts_unreturned_expr(&next) {
        self.issue(
          Issue::UnreturnedExpression,
          next.loc,
          "the following expression is not returned because of an automatically inserted semicolon",
        );
      };
      None
    } else {
      Some(self.expr(ctx.nested())?)
    };
    self.require_semicolon()?;
    Ok(Node::new(start.loc + self.last_loc(), Stmt::Return(ReturnStmt { value })))
  }

  fn break_or_continue_stmt(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.consume();
    let next = self.peek();
    let label = if next.typ == TT::Identifier && !next.preceded_by_line_terminator {
      self.consume();
      let name = self.identifier_text(&next)?;
      let label = self.store.find_label(&name);
      if label.is_none() {
        self.issue(Issue::UnknownLabel, next.loc, format!("there is no containing label named `{}`", name));
      };
      label
    } else {
      None
    };
    self.require_semicolon()?;
    let loc = start.loc + self.last_loc();
    Ok(Node::new(loc, match start.typ {
      TT::KeywordBreak => Stmt::Break(BreakStmt { label }),
      _ => Stmt::Continue(ContinueStmt { label }),
    }))
  }

  fn with_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let start = self.require(TT::KeywordWith)?;
    self.require(TT::ParenthesisOpen)?;
    let object = self.expr(ctx.nested())?;
    let close = self.require(TT::ParenthesisClose)?;
    self.enter_scope(ScopeKind::With, close.loc.0);
    let body = self.stmt(ctx)?;
    self.leave_scope();
    Ok(Node::new(start.loc + body.loc, Stmt::With(WithStmt {
      object,
      scope_loc: close.loc.0,
      body,
    })))
  }

  fn label_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let name_tok = self.require(TT::Identifier)?;
    self.require(TT::Colon)?;
    let name = self.identifier_text(&name_tok)?;
    if self.store.find_label(&name).is_some() {
      self.issue(
        Issue::DuplicateLabel,
        name_tok.loc,
        format!("duplicate label `{}`", name),
      );
    };
    self.enter_scope(ScopeKind::Label, name_tok.loc.0);
    let label = self.store.generate(SymbolKind::Label, &name, name_tok.loc);
    self.store.scopes.current_scope_mut().label = Some(label);
    let body = self.stmt(ctx)?;
    self.leave_scope();
    Ok(Node::new(name_tok.loc + body.loc, Stmt::Label(LabelStmt {
      scope_loc: name_tok.loc.0,
      label,
      body,
    })))
  }
}
