use super::ParseCtx;
use super::Parser;
use crate::ast::expr::CallArg;
use crate::ast::expr::CallExpr;
use crate::ast::expr::Expr;
use crate::ast::expr::IdExpr;
use crate::ast::expr::IdRef;
use crate::ast::expr::MemberExpr;
use crate::ast::expr::OptionalChain;
use crate::ast::node::Node;
use crate::ast::pat::IdPat;
use crate::ast::pat::Pat;
use crate::ast::stmt::EnumDecl;
use crate::ast::stmt::EnumMember;
use crate::ast::stmt::NamespaceDecl;
use crate::ast::stmt::Stmt;
use crate::ast::stmt::VarDecl;
use crate::ast::stmt::VarDeclMode;
use crate::ast::stmt::VarDeclarator;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::import_record::ImportKind;
use crate::loc::Loc;
use crate::scope::ScopeKind;
use crate::symbol::SymbolKind;
use crate::token::Token;
use crate::token::TT;

// Words that may follow `declare`.
const DECLARABLE: [&str; 8] = ["let", "async", "abstract", "namespace", "module", "global", "interface", "type"];

impl<'a> Parser<'a> {
  /// TypeScript declarations that start with a contextual word, and enums. Returns None if the next
  /// statement isn't one, without consuming anything.
  pub fn ts_decl_stmt(&mut self, ctx: ParseCtx, export: bool) -> SyntaxResult<Option<Node<Stmt>>> {
    let (t, next) = self.peek_2();
    let same_line = !next.preceded_by_line_terminator;
    let start = t.loc;
    if self.is_word(&t, "interface") && next.typ == TT::Identifier && same_line {
      self.ts_skip_interface()?;
      return Ok(Some(Node::new(start + self.last_loc(), Stmt::Erased)));
    };
    if self.is_word(&t, "type") && next.typ == TT::Identifier && same_line {
      self.ts_skip_type_alias()?;
      return Ok(Some(Node::new(start + self.last_loc(), Stmt::Erased)));
    };
    if t.typ == TT::KeywordEnum || (t.typ == TT::KeywordConst && next.typ == TT::KeywordEnum) {
      return self.ts_enum(ctx, export).map(Some);
    };
    if self.is_word(&t, "declare") && same_line {
      let declarable = matches!(
        next.typ,
        TT::KeywordVar | TT::KeywordConst | TT::KeywordFunction | TT::KeywordClass | TT::KeywordEnum
      ) || DECLARABLE.iter().any(|w| self.is_word(&next, w));
      if declarable {
        return self.ts_declare(ctx).map(Some);
      };
    };
    if self.is_word(&t, "abstract") && next.typ == TT::KeywordClass && same_line {
      self.consume();
      let class = self.class_decl(ctx, export, false)?;
      return Ok(Some(Node::new(start + class.loc, *class.stx)));
    };
    if (self.is_word(&t, "namespace") || self.is_word(&t, "module")) && same_line {
      if next.typ == TT::Identifier {
        self.consume();
        let name_tok = self.consume();
        return self.ts_namespace_rest(ctx, export, start, name_tok).map(Some);
      };
      if next.typ == TT::LiteralString && self.is_word(&t, "module") {
        return self.ts_ambient(ctx, start).map(Some);
      };
    };
    Ok(None)
  }

  fn ts_enum(&mut self, ctx: ParseCtx, export: bool) -> SyntaxResult<Node<Stmt>> {
    let start = self.peek().loc;
    // Const enums are emitted like any other enum.
    let _ = self.consume_if(TT::KeywordConst);
    self.require(TT::KeywordEnum)?;
    let name_tok = self.require(TT::Identifier)?;
    let name_text = self.identifier_text(&name_tok)?;
    let name = self.declare(SymbolKind::TsEnum, &name_text, name_tok.loc);
    self.enter_scope(ScopeKind::Entry, name_tok.loc.0);
    let arg = self.store.generate(SymbolKind::Hoisted, &name_text, name_tok.loc);
    self.require(TT::BraceOpen)?;
    let members = self.list(TT::Comma, TT::BraceClose, |p| {
      let t = p.consume();
      let member_name = match t.typ {
        TT::LiteralString => p.lit_str_val(&t)?,
        typ if typ.is_identifier_name() => p.identifier_text(&t)?,
        _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("enum member name"))),
      };
      // Members can refer to earlier members by name.
      let symbol = p.declare(SymbolKind::Other, &member_name, t.loc);
      let initializer = if p.consume_if(TT::Equals).is_match() {
        Some(p.expr_assign(ctx.nested())?)
      } else {
        None
      };
      Ok(Node::new(t.loc + p.last_loc(), EnumMember {
        name: member_name,
        symbol,
        initializer,
      }))
    })?;
    self.leave_scope();
    Ok(Node::new(start + self.last_loc(), Stmt::Enum(EnumDecl {
      export,
      name,
      arg,
      scope_loc: name_tok.loc.0,
      members,
    })))
  }

  /// The rest of `namespace A.B { ... }` after a name. A namespace with nothing but types in it is
  /// erased along with everything it declared.
  fn ts_namespace_rest(&mut self, ctx: ParseCtx, export: bool, start: Loc, name_tok: Token) -> SyntaxResult<Node<Stmt>> {
    if name_tok.typ != TT::Identifier {
      return Err(name_tok.error(SyntaxErrorType::ExpectedSyntax("namespace name")));
    };
    let snapshot = self.store.snapshot();
    let had_module_syntax = self.has_es_module_syntax;
    let name_text = self.identifier_text(&name_tok)?;
    let name = self.declare(SymbolKind::TsNamespace, &name_text, name_tok.loc);
    self.enter_scope(ScopeKind::Entry, name_tok.loc.0);
    let arg = self.store.generate(SymbolKind::Hoisted, &name_text, name_tok.loc);
    let body = if self.consume_if(TT::Dot).is_match() {
      let inner = self.consume();
      vec![self.ts_namespace_rest(ctx, true, inner.loc, inner)?]
    } else {
      self.require(TT::BraceOpen)?;
      let body = self.repeat_until_tt(TT::BraceClose, |p| p.stmt(ctx))?;
      self.require(TT::BraceClose)?;
      body
    };
    self.leave_scope();
    // `export` inside a namespace exports from the namespace, not the module.
    self.has_es_module_syntax = had_module_syntax;

    let loc = start + self.last_loc();
    let has_values = body.iter().any(|s| !matches!(*s.stx, Stmt::Erased | Stmt::Empty));
    if !has_values {
      self.store.rollback(snapshot);
      return Ok(Node::new(loc, Stmt::Erased));
    };
    Ok(Node::new(loc, Stmt::Namespace(NamespaceDecl {
      export,
      name,
      arg,
      scope_loc: name_tok.loc.0,
      body,
    })))
  }

  // Parses and then forgets whatever follows `declare`.
  fn ts_declare(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let start = self.require_word("declare")?;
    let snapshot = self.store.snapshot();
    let import_records = self.import_records.len();
    let had_module_syntax = self.has_es_module_syntax;
    let (t, next) = self.peek_2();
    if self.is_word(&t, "global") {
      self.consume();
      self.ts_ambient_body(ctx)?;
    } else if self.is_word(&t, "module") && next.typ == TT::LiteralString {
      self.ts_ambient(ctx, t.loc)?;
    } else {
      self.stmt(ctx)?;
    };
    self.store.rollback(snapshot);
    self.import_records.truncate(import_records);
    self.has_es_module_syntax = had_module_syntax;
    Ok(Node::new(start.loc + self.last_loc(), Stmt::Erased))
  }

  // `module "x" { ... }` or `module "x";`, which only describe another module's types.
  fn ts_ambient(&mut self, ctx: ParseCtx, start: Loc) -> SyntaxResult<Node<Stmt>> {
    self.require_word("module")?;
    self.require(TT::LiteralString)?;
    if self.peek().typ == TT::BraceOpen {
      let snapshot = self.store.snapshot();
      let import_records = self.import_records.len();
      let had_module_syntax = self.has_es_module_syntax;
      self.ts_ambient_body(ctx)?;
      self.store.rollback(snapshot);
      self.import_records.truncate(import_records);
      self.has_es_module_syntax = had_module_syntax;
    } else {
      self.require_semicolon()?;
    };
    Ok(Node::new(start + self.last_loc(), Stmt::Erased))
  }

  fn ts_ambient_body(&mut self, ctx: ParseCtx) -> SyntaxResult<()> {
    let open = self.require(TT::BraceOpen)?;
    self.enter_scope(ScopeKind::Entry, open.loc.0);
    self.repeat_until_tt(TT::BraceClose, |p| p.stmt(ctx))?;
    self.require(TT::BraceClose)?;
    self.leave_scope();
    Ok(())
  }

  /// `import x = require("y")` or `import x = A.B`, after `import`.
  pub fn ts_import_equals(&mut self, start: Loc, export: bool) -> SyntaxResult<Node<Stmt>> {
    let name_tok = self.require(TT::Identifier)?;
    self.require(TT::Equals)?;
    let (t, next) = self.peek_2();
    let (mode, value) = if self.is_word(&t, "require") && next.typ == TT::ParenthesisOpen {
      self.consume();
      self.consume();
      let path_tok = self.require(TT::LiteralString)?;
      let path = self.lit_str_val(&path_tok)?;
      self.require(TT::ParenthesisClose)?;
      self.add_import_record(path.clone(), ImportKind::Require, path_tok.loc);
      let callee = Node::new(t.loc, Expr::Id(IdExpr {
        id: IdRef::Deferred(self.name_of(&t)?),
        can_be_removed_if_unused: false,
      }));
      let call = Expr::Call(CallExpr {
        optional_chain: OptionalChain::None,
        is_direct_eval: false,
        callee,
        arguments: vec![CallArg {
          spread: false,
          value: Node::new(path_tok.loc, Expr::LitStr(path)),
        }],
      });
      (VarDeclMode::Const, Node::new(t.loc + self.last_loc(), call))
    } else {
      let first = self.require(TT::Identifier)?;
      let mut value = Node::new(first.loc, Expr::Id(IdExpr {
        id: IdRef::Deferred(self.name_of(&first)?),
        can_be_removed_if_unused: false,
      }));
      while self.consume_if(TT::Dot).is_match() {
        let prop = self.require_predicate(|typ| typ.is_identifier_name(), "property name")?;
        value = Node::new(value.loc + prop.loc, Expr::Member(MemberExpr {
          optional_chain: OptionalChain::None,
          object: value,
          right: self.string(prop.loc),
          can_be_removed_if_unused: false,
        }));
      }
      (VarDeclMode::Var, value)
    };
    self.require_semicolon()?;

    let kind = match mode {
      VarDeclMode::Const => SymbolKind::Const,
      _ => SymbolKind::Hoisted,
    };
    let name_text = self.identifier_text(&name_tok)?;
    let symbol = self.declare(kind, &name_text, name_tok.loc);
    Ok(Node::new(start + self.last_loc(), Stmt::Var(VarDecl {
      export,
      mode,
      declarators: vec![VarDeclarator {
        pattern: Node::new(name_tok.loc, Pat::Id(IdPat { symbol })),
        initializer: Some(value),
      }],
    })))
  }
}
