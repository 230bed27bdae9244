use super::ParseCtx;
use super::Parser;
use crate::ast::expr::IdRef;
use crate::ast::node::Node;
use crate::ast::stmt::ExportDefaultStmt;
use crate::ast::stmt::ExportDefaultValue;
use crate::ast::stmt::ExportFromStmt;
use crate::ast::stmt::ExportListItem;
use crate::ast::stmt::ExportListStmt;
use crate::ast::stmt::ExportName;
use crate::ast::stmt::ExportStarStmt;
use crate::ast::stmt::ImportName;
use crate::ast::stmt::ImportStmt;
use crate::ast::stmt::Stmt;
use crate::error::Issue;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::import_record::ImportKind;
use crate::loc::Loc;
use crate::symbol::SymbolKind;
use crate::symbol::SymbolRef;
use crate::token::TT;

impl<'a> Parser<'a> {
  /// A name in an import or export list, which may be a string: `export { a as "b c" }`.
  fn module_export_name(&mut self) -> SyntaxResult<(String, Loc)> {
    let t = self.consume();
    match t.typ {
      TT::LiteralString => Ok((self.lit_str_val(&t)?, t.loc)),
      typ if typ.is_identifier_name() => Ok((self.identifier_text(&t)?, t.loc)),
      _ => Err(t.error(SyntaxErrorType::ExpectedSyntax("import or export name"))),
    }
  }

  // `from "path"` and any import attributes, returning the new import record.
  fn from_clause(&mut self, kind: ImportKind) -> SyntaxResult<u32> {
    self.require_word("from")?;
    self.module_path(kind)
  }

  fn module_path(&mut self, kind: ImportKind) -> SyntaxResult<u32> {
    let t = self.require(TT::LiteralString)?;
    let path = self.lit_str_val(&t)?;
    let record = self.add_import_record(path, kind, t.loc);
    let attrs = self.peek();
    if (attrs.typ == TT::KeywordWith || self.is_word(&attrs, "assert")) && !attrs.preceded_by_line_terminator {
      self.consume();
      self.require(TT::BraceOpen)?;
      self.list(TT::Comma, TT::BraceClose, |p| {
        p.module_export_name()?;
        p.require(TT::Colon)?;
        p.require(TT::LiteralString)?;
        Ok(())
      })?;
    };
    Ok(record)
  }

  fn declare_import(&mut self) -> SyntaxResult<SymbolRef> {
    let t = self.require(TT::Identifier)?;
    let name = self.identifier_text(&t)?;
    Ok(self.declare(SymbolKind::Import, &name, t.loc))
  }

  // Consumes a type-only import or export up to its end.
  fn skip_type_only_module_item(&mut self) -> SyntaxResult<()> {
    loop {
      let t = self.peek();
      match t.typ {
        TT::LiteralString => {
          self.consume();
          break;
        }
        TT::Semicolon | TT::EOF => break,
        _ if t.preceded_by_line_terminator && t.typ != TT::BraceClose && !self.is_word(&t, "from") => break,
        _ => {
          self.consume();
        }
      };
    }
    self.require_semicolon()
  }

  // `{ type A }` names only a type, but `{ type }` and `{ type as B }` name a value called `type`.
  fn type_only_specifier(&mut self) -> bool {
    let (t, next, after) = self.peek_3();
    if !self.is_ts() || !self.is_word(&t, "type") || !matches!(next.typ, TT::Identifier | TT::LiteralString) {
      return false;
    };
    !self.is_word(&next, "as") || matches!(after.typ, TT::Comma | TT::BraceClose) || self.is_word(&after, "as")
  }

  fn skip_type_only_specifier(&mut self) -> SyntaxResult<()> {
    self.consume();
    self.module_export_name()?;
    if self.consume_if_word("as") {
      self.module_export_name()?;
    };
    Ok(())
  }

  pub fn import_stmt(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.require(TT::KeywordImport)?;
    let (t, next) = self.peek_2();

    if self.is_ts() {
      let type_only = self.is_word(&t, "type")
        && (matches!(next.typ, TT::BraceOpen | TT::Asterisk)
          || (next.typ == TT::Identifier && !self.is_word(&next, "from")));
      if type_only {
        self.skip_type_only_module_item()?;
        return Ok(Node::new(start.loc + self.last_loc(), Stmt::Erased));
      };
      if t.typ == TT::Identifier && next.typ == TT::Equals {
        return self.ts_import_equals(start.loc, false);
      };
    };
    self.has_es_module_syntax = true;

    if t.typ == TT::LiteralString {
      let import_record = self.module_path(ImportKind::Stmt)?;
      self.require_semicolon()?;
      return Ok(Node::new(start.loc + self.last_loc(), Stmt::Import(ImportStmt {
        import_record,
        default: None,
        namespace: None,
        names: Vec::new(),
      })));
    };

    let mut default = None;
    let mut namespace = None;
    let mut names = Vec::new();
    if t.typ == TT::Identifier {
      default = Some(self.declare_import()?);
      if !self.consume_if(TT::Comma).is_match() {
        return self.finish_import(start.loc, default, namespace, names);
      };
    };
    if self.consume_if(TT::Asterisk).is_match() {
      self.require_word("as")?;
      namespace = Some(self.declare_import()?);
    } else {
      self.require(TT::BraceOpen)?;
      let items = self.list(TT::Comma, TT::BraceClose, |p| {
        let t = p.peek();
        if p.type_only_specifier() {
          p.skip_type_only_specifier()?;
          return Ok(None);
        };
        let (imported, loc) = p.module_export_name()?;
        let local = if p.consume_if_word("as") {
          p.declare_import()?
        } else {
          if t.typ != TT::Identifier {
            return Err(loc.error(SyntaxErrorType::ExpectedSyntax("`as` after string import name"), None));
          };
          p.declare(SymbolKind::Import, &imported, loc)
        };
        Ok(Some(ImportName { imported, local }))
      })?;
      names.extend(items.into_iter().flatten());
    };
    self.finish_import(start.loc, default, namespace, names)
  }

  fn finish_import(
    &mut self,
    start: Loc,
    default: Option<SymbolRef>,
    namespace: Option<SymbolRef>,
    names: Vec<ImportName>,
  ) -> SyntaxResult<Node<Stmt>> {
    let import_record = self.from_clause(ImportKind::Stmt)?;
    self.require_semicolon()?;
    let locals = default
      .iter()
      .chain(namespace.iter())
      .copied()
      .chain(names.iter().map(|n| n.local));
    for local in locals.collect::<Vec<_>>() {
      self.store.symbols[local].import_record_index = Some(import_record);
    }
    Ok(Node::new(start + self.last_loc(), Stmt::Import(ImportStmt {
      import_record,
      default,
      namespace,
      names,
    })))
  }

  pub fn export_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let start = self.require(TT::KeywordExport)?;
    self.has_es_module_syntax = true;
    let (t, next) = self.peek_2();

    if let Some(mode) = self.peek_var_decl_mode() {
      return self.var_decl_stmt(ctx, mode, true).map(|s| Node::new(start.loc + s.loc, *s.stx));
    };
    if self.is_ts() {
      if t.typ == TT::Equals {
        // `export = x`
        self.consume();
        // The statement is dropped, so nothing it declared may stay in the scope order.
        let snapshot = self.store.snapshot();
        let value = self.expr(ctx)?;
        self.require_semicolon()?;
        self.store.rollback(snapshot);
        self.issue(
          Issue::UnsupportedSyntax,
          start.loc + value.loc,
          "`export =` is not supported in ES modules",
        );
        return Ok(Node::new(start.loc + value.loc, Stmt::Erased));
      };
      if self.is_word(&t, "as") && self.is_word(&next, "namespace") {
        self.consume();
        self.consume();
        self.require(TT::Identifier)?;
        self.require_semicolon()?;
        let loc = start.loc + self.last_loc();
        self.issue(Issue::UnsupportedSyntax, loc, "`export as namespace` is not supported");
        return Ok(Node::new(loc, Stmt::Erased));
      };
      if self.is_word(&t, "type") && matches!(next.typ, TT::BraceOpen | TT::Asterisk) {
        self.skip_type_only_module_item()?;
        return Ok(Node::new(start.loc + self.last_loc(), Stmt::Erased));
      };
      if t.typ == TT::KeywordImport {
        let (_, _, third) = self.peek_3();
        if third.typ == TT::Equals {
          self.consume();
          return self.ts_import_equals(start.loc, true);
        };
      };
      if let Some(stmt) = self.ts_decl_stmt(ctx, true)? {
        return Ok(Node::new(start.loc + stmt.loc, *stmt.stx));
      };
    };

    let stmt = match t.typ {
      TT::KeywordFunction => self.func_decl(true, false)?,
      TT::Identifier if self.is_word(&t, "async") && next.typ == TT::KeywordFunction => self.func_decl(true, false)?,
      TT::KeywordClass => self.class_decl(ctx, true, false)?,
      TT::KeywordDefault => return self.export_default(ctx, start.loc),
      TT::Asterisk => {
        self.consume();
        let alias = if self.consume_if_word("as") {
          Some(self.module_export_name()?.0)
        } else {
          None
        };
        let import_record = self.from_clause(ImportKind::ReExport)?;
        self.require_semicolon()?;
        Node::new(t.loc, Stmt::ExportStar(ExportStarStmt { import_record, alias }))
      }
      TT::BraceOpen => self.export_list(start.loc)?,
      _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("exportable declaration"))),
    };
    Ok(Node::new(start.loc + self.last_loc(), *stmt.stx))
  }

  fn export_list(&mut self, start: Loc) -> SyntaxResult<Node<Stmt>> {
    self.require(TT::BraceOpen)?;
    let entries = self.list(TT::Comma, TT::BraceClose, |p| {
      if p.type_only_specifier() {
        p.skip_type_only_specifier()?;
        return Ok(None);
      };
      let local_tok = p.peek();
      let (name, _) = p.module_export_name()?;
      let alias = if p.consume_if_word("as") {
        p.module_export_name()?.0
      } else {
        name.clone()
      };
      Ok(Some((local_tok, name, alias)))
    })?;
    let entries: Vec<_> = entries.into_iter().flatten().collect();

    if self.peek_is_word("from") {
      let import_record = self.from_clause(ImportKind::ReExport)?;
      self.require_semicolon()?;
      let names = entries
        .into_iter()
        .map(|(_, name, alias)| ExportName { name, alias })
        .collect();
      return Ok(Node::new(start + self.last_loc(), Stmt::ExportFrom(ExportFromStmt {
        import_record,
        names,
      })));
    };
    self.require_semicolon()?;
    let mut items = Vec::with_capacity(entries.len());
    for (local_tok, _, alias) in entries {
      if local_tok.typ != TT::Identifier {
        return Err(local_tok.error(SyntaxErrorType::ExpectedSyntax("local name to export")));
      };
      let name = self.name_of(&local_tok)?;
      items.push(ExportListItem {
        local: IdRef::Deferred(name),
        alias,
      });
    }
    Ok(Node::new(start + self.last_loc(), Stmt::ExportList(ExportListStmt { items })))
  }

  fn export_default(&mut self, ctx: ParseCtx, start: Loc) -> SyntaxResult<Node<Stmt>> {
    let default_tok = self.require(TT::KeywordDefault)?;
    let default_ref = self.store.generate(SymbolKind::Other, "default", default_tok.loc);
    let (t, next) = self.peek_2();
    let is_async_fn = self.is_word(&t, "async") && next.typ == TT::KeywordFunction && !next.preceded_by_line_terminator;
    let value = if t.typ == TT::KeywordFunction || is_async_fn {
      ExportDefaultValue::Decl(self.func_decl(false, true)?)
    } else if t.typ == TT::KeywordClass {
      ExportDefaultValue::Decl(self.class_decl(ctx, false, true)?)
    } else if self.is_ts() && self.is_word(&t, "interface") {
      self.ts_skip_interface()?;
      return Ok(Node::new(start + self.last_loc(), Stmt::Erased));
    } else {
      let value = self.expr_assign(ctx)?;
      self.require_semicolon()?;
      ExportDefaultValue::Expr(value)
    };
    Ok(Node::new(start + self.last_loc(), Stmt::ExportDefault(ExportDefaultStmt {
      default_ref,
      value,
    })))
  }
}
