use super::Binder;
use super::ExprCtx;
use crate::build;
use crate::fold;
use crate::options::Feature;
use parse_js::ast::class_or_object::ClassOrObjKey;
use parse_js::ast::expr::IdRef;
use parse_js::ast::func::Func;
use parse_js::ast::func::FuncBody;
use parse_js::ast::func::Param;
use parse_js::ast::node::Node;
use parse_js::ast::pat::ArrPat;
use parse_js::ast::pat::ArrPatElem;
use parse_js::ast::pat::IdPat;
use parse_js::ast::pat::ObjPat;
use parse_js::ast::pat::ObjPatProp;
use parse_js::ast::pat::Pat;
use parse_js::ast::stmt::BlockStmt;
use parse_js::ast::stmt::CatchBlock;
use parse_js::ast::stmt::ExportDefaultStmt;
use parse_js::ast::stmt::ExportDefaultValue;
use parse_js::ast::stmt::ExportListItem;
use parse_js::ast::stmt::ExportListStmt;
use parse_js::ast::stmt::ForInit;
use parse_js::ast::stmt::IfStmt;
use parse_js::ast::stmt::ReturnStmt;
use parse_js::ast::stmt::Stmt;
use parse_js::ast::stmt::SwitchBranch;
use parse_js::ast::stmt::ThrowStmt;
use parse_js::ast::stmt::TryStmt;
use parse_js::ast::stmt::VarDecl;
use parse_js::ast::stmt::VarDeclMode;
use parse_js::loc::Loc;
use parse_js::scope::ScopeKind;
use parse_js::symbol::SymbolKind;
use parse_js::symbol::SymbolRef;
use tracing::trace;

impl<'a> Binder<'a> {
  pub(crate) fn visit_stmts(&mut self, stmts: Vec<Node<Stmt>>) -> Vec<Node<Stmt>> {
    let mut out = Vec::with_capacity(stmts.len());
    for stmt in stmts {
      self.visit_stmt(stmt, &mut out);
    }
    out
  }

  /// Visits a statement in a position that takes exactly one, like a loop body.
  pub(crate) fn visit_single_stmt(&mut self, stmt: Node<Stmt>) -> Node<Stmt> {
    let loc = stmt.loc;
    let mut out = Vec::new();
    self.visit_stmt(stmt, &mut out);
    if out.len() > 1 {
      return Node::new(loc, Stmt::Block(BlockStmt {
        scope_loc: loc.0,
        body: out,
      }));
    };
    out.pop().unwrap_or_else(|| Node::new(loc, Stmt::Empty))
  }

  pub(crate) fn visit_block(&mut self, block: Node<BlockStmt>) -> Node<BlockStmt> {
    let loc = block.loc;
    let BlockStmt { scope_loc, body } = *block.stx;
    self.enter_scope(ScopeKind::Block, scope_loc);
    let body = self.visit_stmts(body);
    self.leave_scope();
    Node::new(loc, BlockStmt { scope_loc, body })
  }

  /// Visits one statement, appending what it lowers to. That may be nothing (erased TypeScript) or
  /// several statements (a class followed by its static fields).
  pub(crate) fn visit_stmt(&mut self, stmt: Node<Stmt>, out: &mut Vec<Node<Stmt>>) {
    let loc = stmt.loc;
    match *stmt.stx {
      Stmt::Block(block) => {
        let block = self.visit_block(Node::new(loc, block));
        out.push(Node::new(loc, Stmt::Block(*block.stx)));
      }
      Stmt::Class(decl) => self.visit_class_decl(loc, decl, out),
      Stmt::DoWhile(mut s) => {
        s.body = self.visit_single_stmt(s.body);
        s.condition = self.visit_expr(s.condition);
        out.push(Node::new(loc, Stmt::DoWhile(s)));
      }
      Stmt::Enum(decl) => self.visit_enum(loc, decl, out),
      Stmt::Erased => {}
      Stmt::ExportDefault(s) => self.visit_export_default(loc, s, out),
      Stmt::ExportList(s) => {
        let items = s
          .items
          .into_iter()
          .map(|item| ExportListItem {
            local: IdRef::Resolved(self.resolve_id(item.local, loc)),
            alias: item.alias,
          })
          .collect();
        out.push(Node::new(loc, Stmt::ExportList(ExportListStmt { items })));
      }
      Stmt::Expr(mut s) => {
        s.expr = self.visit_expr(s.expr);
        if self.options.mangle_syntax && self.is_side_effect_free(&s.expr) {
          trace!("dropped unused expression statement");
          return;
        };
        out.push(Node::new(loc, Stmt::Expr(s)));
      }
      Stmt::For(mut s) => {
        self.enter_scope(ScopeKind::Block, s.scope_loc);
        s.init = s.init.map(|init| self.visit_for_init(init));
        s.condition = s.condition.map(|e| self.visit_expr(e));
        s.update = s.update.map(|e| self.visit_expr(e));
        s.body = self.visit_single_stmt(s.body);
        self.leave_scope();
        out.push(Node::new(loc, Stmt::For(s)));
      }
      Stmt::ForIn(mut s) => {
        self.enter_scope(ScopeKind::Block, s.scope_loc);
        s.lhs = self.visit_for_init(s.lhs);
        s.rhs = self.visit_expr(s.rhs);
        s.body = self.visit_single_stmt(s.body);
        self.leave_scope();
        out.push(Node::new(loc, Stmt::ForIn(s)));
      }
      Stmt::ForOf(mut s) => {
        self.enter_scope(ScopeKind::Block, s.scope_loc);
        s.lhs = self.visit_for_init(s.lhs);
        s.rhs = self.visit_expr(s.rhs);
        s.body = self.visit_single_stmt(s.body);
        self.leave_scope();
        out.push(Node::new(loc, Stmt::ForOf(s)));
      }
      Stmt::Func(mut decl) => {
        decl.func = self.visit_func(decl.func);
        let namespace = self.namespace_for_export(decl.export);
        if namespace.is_some() {
          decl.export = false;
        };
        let name = decl.name;
        out.push(Node::new(loc, Stmt::Func(decl)));
        if let (Some(namespace), Some(name)) = (namespace, name) {
          out.push(self.namespace_export(namespace, name, loc));
        };
      }
      Stmt::If(s) => self.visit_if(loc, s, out),
      Stmt::Label(mut s) => {
        self.enter_scope(ScopeKind::Label, s.scope_loc);
        s.body = self.visit_single_stmt(s.body);
        self.leave_scope();
        out.push(Node::new(loc, Stmt::Label(s)));
      }
      Stmt::Namespace(decl) => self.visit_namespace(loc, decl, out),
      Stmt::Return(s) => {
        let value = s.value.map(|v| self.visit_expr(v));
        out.push(Node::new(loc, Stmt::Return(ReturnStmt { value })));
      }
      Stmt::Switch(mut s) => {
        s.test = self.visit_expr(s.test);
        self.enter_scope(ScopeKind::Block, s.scope_loc);
        s.branches = s
          .branches
          .into_iter()
          .map(|branch| {
            let branch_loc = branch.loc;
            let SwitchBranch { case, body } = *branch.stx;
            let case = case.map(|c| self.visit_expr(c));
            let body = self.visit_stmts(body);
            Node::new(branch_loc, SwitchBranch { case, body })
          })
          .collect();
        self.leave_scope();
        out.push(Node::new(loc, Stmt::Switch(s)));
      }
      Stmt::Throw(s) => {
        let value = self.visit_expr(s.value);
        out.push(Node::new(loc, Stmt::Throw(ThrowStmt { value })));
      }
      Stmt::Try(s) => {
        let s = self.visit_try(s);
        out.push(Node::new(loc, Stmt::Try(s)));
      }
      Stmt::Var(decl) => {
        let namespace = self.namespace_for_export(decl.export);
        let decl = self.visit_var_decl(decl);
        match namespace {
          Some(namespace) => self.export_var_to_namespace(namespace, decl, loc, out),
          None => out.push(Node::new(loc, Stmt::Var(decl))),
        };
      }
      Stmt::While(mut s) => {
        s.condition = self.visit_expr(s.condition);
        s.body = self.visit_single_stmt(s.body);
        out.push(Node::new(loc, Stmt::While(s)));
      }
      Stmt::With(mut s) => {
        s.object = self.visit_expr(s.object);
        self.enter_scope(ScopeKind::With, s.scope_loc);
        s.body = self.visit_single_stmt(s.body);
        self.leave_scope();
        out.push(Node::new(loc, Stmt::With(s)));
      }
      other @ (Stmt::Break(_)
      | Stmt::Continue(_)
      | Stmt::Debugger
      | Stmt::Directive(_)
      | Stmt::Empty
      | Stmt::ExportFrom(_)
      | Stmt::ExportStar(_)
      | Stmt::Import(_)) => out.push(Node::new(loc, other)),
    }
  }

  fn visit_if(&mut self, loc: Loc, stmt: IfStmt, out: &mut Vec<Node<Stmt>>) {
    let IfStmt {
      test,
      consequent,
      alternate,
    } = stmt;
    let test = self.visit_expr(test);
    let known = if self.options.mangle_syntax {
      fold::truthiness(&test)
    } else {
      None
    };
    let consequent = self.with_dead(known == Some(false), |b| b.visit_single_stmt(consequent));
    let alternate = alternate.map(|alt| self.with_dead(known == Some(true), |b| b.visit_single_stmt(alt)));
    let Some(taken) = known else {
      out.push(Node::new(loc, Stmt::If(IfStmt {
        test,
        consequent,
        alternate,
      })));
      return;
    };
    trace!(taken, "removed dead branch");
    let (kept, dropped) = if taken {
      (Some(consequent), alternate)
    } else {
      (alternate, Some(consequent))
    };
    // The branch never runs, but its `var`s still exist.
    let mut hoisted = Vec::new();
    if let Some(dropped) = &dropped {
      self.collect_hoisted(dropped, &mut hoisted);
    };
    if !hoisted.is_empty() {
      out.push(build::var_decl(
        loc,
        VarDeclMode::Var,
        false,
        hoisted.into_iter().map(|s| (s, None)),
      ));
    };
    if let Some(kept) = kept {
      out.push(kept);
    };
  }

  fn collect_hoisted(&self, stmt: &Node<Stmt>, out: &mut Vec<SymbolRef>) {
    let add_decl = |decl: &VarDecl, out: &mut Vec<SymbolRef>| {
      if decl.mode != VarDeclMode::Var {
        return;
      };
      let mut bound = Vec::new();
      for d in decl.declarators.iter() {
        d.pattern.stx.bound_symbols(&mut bound);
      }
      for r in bound {
        let r = self.store.symbols.follow(r);
        if !out.contains(&r) {
          out.push(r);
        };
      }
    };
    match stmt.stx.as_ref() {
      Stmt::Var(decl) => add_decl(decl, out),
      Stmt::Block(block) => {
        for s in block.body.iter() {
          self.collect_hoisted(s, out);
        }
      }
      Stmt::If(s) => {
        self.collect_hoisted(&s.consequent, out);
        if let Some(alt) = &s.alternate {
          self.collect_hoisted(alt, out);
        };
      }
      Stmt::For(s) => {
        if let Some(ForInit::Decl(decl)) = &s.init {
          add_decl(&decl.stx, out);
        };
        self.collect_hoisted(&s.body, out);
      }
      Stmt::ForIn(s) => {
        if let ForInit::Decl(decl) = &s.lhs {
          add_decl(&decl.stx, out);
        };
        self.collect_hoisted(&s.body, out);
      }
      Stmt::ForOf(s) => {
        if let ForInit::Decl(decl) = &s.lhs {
          add_decl(&decl.stx, out);
        };
        self.collect_hoisted(&s.body, out);
      }
      Stmt::While(s) => self.collect_hoisted(&s.body, out),
      Stmt::DoWhile(s) => self.collect_hoisted(&s.body, out),
      Stmt::Label(s) => self.collect_hoisted(&s.body, out),
      Stmt::With(s) => self.collect_hoisted(&s.body, out),
      Stmt::Switch(s) => {
        for branch in s.branches.iter() {
          for s in branch.stx.body.iter() {
            self.collect_hoisted(s, out);
          }
        }
      }
      Stmt::Try(s) => {
        for s in s.wrapped.stx.body.iter() {
          self.collect_hoisted(s, out);
        }
        if let Some(catch) = &s.catch {
          for s in catch.stx.body.stx.body.iter() {
            self.collect_hoisted(s, out);
          }
        };
        if let Some(finally) = &s.finally {
          for s in finally.stx.body.iter() {
            self.collect_hoisted(s, out);
          }
        };
      }
      _ => {}
    };
  }

  fn visit_try(&mut self, s: TryStmt) -> TryStmt {
    let wrapped = self.visit_block(s.wrapped);
    let catch = s.catch.map(|catch| {
      let loc = catch.loc;
      let CatchBlock {
        scope_loc,
        parameter,
        body,
      } = *catch.stx;
      self.enter_scope(ScopeKind::CatchBinding, scope_loc);
      let parameter = match parameter {
        Some(p) => Some(self.visit_pat(p)),
        None if !self.supports(Feature::OptionalCatchBinding) => {
          trace!("lowered optional catch binding");
          let r = self.generate(SymbolKind::CatchIdentifier, "e", loc);
          Some(build::id_pat(loc, r))
        }
        None => None,
      };
      let body = self.visit_block(body);
      self.leave_scope();
      Node::new(loc, CatchBlock {
        scope_loc,
        parameter,
        body,
      })
    });
    let finally = s.finally.map(|f| self.visit_block(f));
    TryStmt {
      wrapped,
      catch,
      finally,
    }
  }

  fn visit_export_default(&mut self, loc: Loc, s: ExportDefaultStmt, out: &mut Vec<Node<Stmt>>) {
    let ExportDefaultStmt { default_ref, value } = s;
    match value {
      ExportDefaultValue::Expr(expr) => {
        let expr = self.visit_expr(expr);
        out.push(Node::new(loc, Stmt::ExportDefault(ExportDefaultStmt {
          default_ref,
          value: ExportDefaultValue::Expr(expr),
        })));
      }
      ExportDefaultValue::Decl(decl) => {
        let decl_loc = decl.loc;
        match *decl.stx {
          Stmt::Func(mut f) => {
            f.func = self.visit_func(f.func);
            out.push(Node::new(loc, Stmt::ExportDefault(ExportDefaultStmt {
              default_ref,
              value: ExportDefaultValue::Decl(Node::new(decl_loc, Stmt::Func(f))),
            })));
          }
          Stmt::Class(c) => self.visit_export_default_class(loc, default_ref, decl_loc, c, out),
          other => {
            let mut inner = Vec::new();
            self.visit_stmt(Node::new(decl_loc, other), &mut inner);
            for stmt in inner {
              out.push(Node::new(loc, Stmt::ExportDefault(ExportDefaultStmt {
                default_ref,
                value: ExportDefaultValue::Decl(stmt),
              })));
            }
          }
        };
      }
    };
  }

  pub(crate) fn visit_var_decl(&mut self, decl: VarDecl) -> VarDecl {
    let declarators = decl
      .declarators
      .into_iter()
      .map(|mut d| {
        d.pattern = self.visit_pat(d.pattern);
        d.initializer = d.initializer.map(|init| self.visit_expr(init));
        d
      })
      .collect();
    VarDecl {
      export: decl.export,
      mode: decl.mode,
      declarators,
    }
  }

  fn visit_for_init(&mut self, init: ForInit) -> ForInit {
    match init {
      ForInit::Decl(decl) => ForInit::Decl(decl.map_stx(|d| self.visit_var_decl(d))),
      ForInit::Expr(expr) => ForInit::Expr(self.visit_expr_in(expr, ExprCtx {
        assign_target: true,
        ..ExprCtx::default()
      })),
    }
  }

  pub(crate) fn visit_key(&mut self, key: ClassOrObjKey, loc: Loc) -> ClassOrObjKey {
    match key {
      ClassOrObjKey::Computed(expr) => ClassOrObjKey::Computed(self.visit_expr(expr)),
      ClassOrObjKey::Private(id) => ClassOrObjKey::Private(self.resolve_private(id, loc)),
      direct => direct,
    }
  }

  pub(crate) fn visit_pat(&mut self, pat: Node<Pat>) -> Node<Pat> {
    let loc = pat.loc;
    match *pat.stx {
      Pat::Id(IdPat { symbol }) => Node::new(loc, Pat::Id(IdPat { symbol })),
      Pat::Arr(arr) => {
        let elements = arr
          .elements
          .into_iter()
          .map(|elem| {
            elem.map(|e| ArrPatElem {
              target: self.visit_pat(e.target),
              default_value: e.default_value.map(|d| self.visit_expr(d)),
            })
          })
          .collect();
        let rest = arr.rest.map(|r| self.visit_pat(r));
        Node::new(loc, Pat::Arr(ArrPat { elements, rest }))
      }
      Pat::Obj(obj) => {
        let properties = obj
          .properties
          .into_iter()
          .map(|prop| {
            let prop_loc = prop.loc;
            let ObjPatProp {
              key,
              target,
              shorthand,
              default_value,
            } = *prop.stx;
            let key = self.visit_key(key, prop_loc);
            let target = self.visit_pat(target);
            let default_value = default_value.map(|d| self.visit_expr(d));
            Node::new(prop_loc, ObjPatProp {
              key,
              target,
              shorthand,
              default_value,
            })
          })
          .collect();
        let rest = obj.rest.map(|r| {
          if !self.supports(Feature::ObjectRestSpread) {
            self.unsupported(Feature::ObjectRestSpread, r.loc);
          };
          self.visit_pat(r)
        });
        Node::new(loc, Pat::Obj(ObjPat { properties, rest }))
      }
    }
  }

  pub(crate) fn visit_func(&mut self, func: Node<Func>) -> Node<Func> {
    let loc = func.loc;
    let mut f = *func.stx;
    let saved_this = self.this_replacement;
    if !f.arrow {
      self.this_replacement = None;
    };
    self.enter_scope(ScopeKind::FunctionArgs, f.args_scope_loc);
    self.push_temp_frame();
    f.params = f.params.into_iter().map(|p| self.visit_param(p)).collect();
    self.enter_scope(ScopeKind::FunctionBody, f.body_scope_loc);
    f.body = match f.body {
      FuncBody::Block(body) => FuncBody::Block(self.visit_stmts(body)),
      FuncBody::Expression(expr) => FuncBody::Expression(self.visit_expr(expr)),
    };
    self.leave_scope();
    let temps = self.pop_temp_frame();
    self.leave_scope();
    self.this_replacement = saved_this;
    if !temps.is_empty() {
      let decl = build::var_decl(loc, VarDeclMode::Var, false, temps.into_iter().map(|t| (t, None)));
      f.body = match f.body {
        FuncBody::Block(mut body) => {
          let at = body
            .iter()
            .take_while(|s| matches!(s.stx.as_ref(), Stmt::Directive(_)))
            .count();
          body.insert(at, decl);
          FuncBody::Block(body)
        }
        FuncBody::Expression(expr) => {
          let ret_loc = expr.loc;
          FuncBody::Block(vec![
            decl,
            Node::new(ret_loc, Stmt::Return(ReturnStmt { value: Some(expr) })),
          ])
        }
      };
    };
    Node::new(loc, f)
  }

  fn visit_param(&mut self, param: Node<Param>) -> Node<Param> {
    param.map_stx(|mut p| {
      p.pattern = self.visit_pat(p.pattern);
      p.default_value = p.default_value.map(|d| self.visit_expr(d));
      p
    })
  }

  /// The closure parameter to export to, for an `export`ed declaration inside a namespace.
  pub(crate) fn namespace_for_export(&self, export: bool) -> Option<SymbolRef> {
    if export {
      self.namespaces.last().copied()
    } else {
      None
    }
  }

  /// `ns.name = name;`
  pub(crate) fn namespace_export(&mut self, namespace: SymbolRef, symbol: SymbolRef, loc: Loc) -> Node<Stmt> {
    self.record_use(namespace);
    self.record_use(symbol);
    let name = self.store.symbols[symbol].original_name.clone();
    build::expr_stmt(build::assign(
      loc,
      build::member(loc, build::id(loc, namespace), name),
      build::id(loc, symbol),
    ))
  }

  // Identifiers become `ns.x = init`; destructuring stays local and each binding is copied.
  fn export_var_to_namespace(&mut self, namespace: SymbolRef, decl: VarDecl, loc: Loc, out: &mut Vec<Node<Stmt>>) {
    for d in decl.declarators {
      if let Pat::Id(id) = d.pattern.stx.as_ref() {
        let symbol = id.symbol;
        if let Some(init) = d.initializer {
          self.record_use(namespace);
          let name = self.store.symbols[symbol].original_name.clone();
          let target = build::member(loc, build::id(loc, namespace), name);
          out.push(build::expr_stmt(build::assign(loc, target, init)));
        };
        continue;
      };
      let mut bound = Vec::new();
      d.pattern.stx.bound_symbols(&mut bound);
      out.push(Node::new(loc, Stmt::Var(VarDecl {
        export: false,
        mode: decl.mode,
        declarators: vec![d],
      })));
      for symbol in bound {
        let stmt = self.namespace_export(namespace, symbol, loc);
        out.push(stmt);
      }
    }
  }
}
