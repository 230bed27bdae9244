//! TypeScript enums and namespaces become closures over an object:
//!
//! ```text
//! var E;
//! (function (E) {
//!   E[E["A"] = 0] = "A";
//! })(E || (E = {}));
//! ```

use crate::bind::Binder;
use crate::build;
use parse_js::ast::expr::Expr;
use parse_js::ast::node::Node;
use parse_js::ast::pat::Pat;
use parse_js::ast::stmt::EnumDecl;
use parse_js::ast::stmt::EnumMember;
use parse_js::ast::stmt::NamespaceDecl;
use parse_js::ast::stmt::Stmt;
use parse_js::ast::stmt::VarDeclMode;
use parse_js::loc::Loc;
use parse_js::operator::OperatorName;
use parse_js::scope::ScopeKind;
use parse_js::symbol::NamespaceAlias;
use parse_js::symbol::SymbolKind;
use parse_js::symbol::SymbolRef;
use tracing::trace;

/// The value of an enum member, if it's a constant.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum EnumValue {
  Num(f64),
  Str(String),
  Unknown,
}

impl EnumValue {
  pub(crate) fn to_expr(&self, loc: Loc) -> Option<Node<Expr>> {
    match self {
      EnumValue::Num(n) => Some(build::number(loc, *n)),
      EnumValue::Str(s) => Some(build::string(loc, s.clone())),
      EnumValue::Unknown => None,
    }
  }
}

impl<'a> Binder<'a> {
  pub(crate) fn visit_enum(&mut self, loc: Loc, decl: EnumDecl, out: &mut Vec<Node<Stmt>>) {
    let EnumDecl {
      export,
      name,
      arg,
      scope_loc,
      members,
    } = decl;
    self.enter_scope(ScopeKind::Entry, scope_loc);
    self.push_temp_frame();
    let mut body = Vec::with_capacity(members.len());
    let followed = self.store.symbols.follow(name);
    let count = members.len();
    // Members without an initializer count up from the previous numeric one.
    let mut next = Some(0.0);
    for member in members {
      let member_loc = member.loc;
      let EnumMember {
        name: member_name,
        symbol,
        initializer,
      } = *member.stx;
      let value_expr = match initializer {
        Some(init) => {
          let saved = self.in_enum;
          self.in_enum = true;
          let value = self.visit_expr(init);
          self.in_enum = saved;
          value
        }
        None => match next {
          Some(n) => build::number(member_loc, n),
          None => build::undefined(member_loc),
        },
      };
      let value = match value_expr.stx.as_ref() {
        Expr::LitNum(n) => EnumValue::Num(n.0),
        Expr::LitStr(s) => EnumValue::Str(s.clone()),
        _ => EnumValue::Unknown,
      };
      next = match value {
        EnumValue::Num(n) => Some(n + 1.0),
        _ => None,
      };
      self.store.symbols[symbol].namespace_alias = Some(NamespaceAlias {
        namespace_ref: arg,
        alias: member_name.clone(),
      });
      self.enum_values.insert(symbol, value.clone());
      // Later initializers may read it back as `E.A`.
      self.enum_members.entry(followed).or_default().insert(member_name.clone(), value.clone());

      self.record_use(arg);
      let slot = build::computed_member(
        member_loc,
        build::id(member_loc, arg),
        build::string(member_loc, member_name.clone()),
      );
      let stmt = if let EnumValue::Str(_) = value {
        // String members get no reverse mapping.
        build::assign(member_loc, slot, value_expr)
      } else {
        self.record_use(arg);
        build::assign(
          member_loc,
          build::computed_member(member_loc, build::id(member_loc, arg), build::assign(member_loc, slot, value_expr)),
          build::string(member_loc, member_name.clone()),
        )
      };
      body.push(build::expr_stmt(stmt));
    }
    let temps = self.pop_temp_frame();
    self.leave_scope();
    trace!(members = count, "lowered enum");
    self.emit_closure(loc, export, name, arg, temps, body, out);
  }

  pub(crate) fn visit_namespace(&mut self, loc: Loc, decl: NamespaceDecl, out: &mut Vec<Node<Stmt>>) {
    let NamespaceDecl {
      export,
      name,
      arg,
      scope_loc,
      body,
    } = decl;
    self.enter_scope(ScopeKind::Entry, scope_loc);
    // Exported variables live on the closure parameter, so every reference goes through it.
    for stmt in body.iter() {
      let Stmt::Var(decl) = stmt.stx.as_ref() else {
        continue;
      };
      if !decl.export {
        continue;
      };
      for declarator in decl.declarators.iter() {
        if let Pat::Id(id) = declarator.pattern.stx.as_ref() {
          let alias = self.store.symbols[id.symbol].original_name.clone();
          self.store.symbols[id.symbol].namespace_alias = Some(NamespaceAlias {
            namespace_ref: arg,
            alias,
          });
        };
      }
    }
    self.namespaces.push(arg);
    self.push_temp_frame();
    let body = self.visit_stmts(body);
    let temps = self.pop_temp_frame();
    self.namespaces.pop();
    self.leave_scope();
    trace!(statements = body.len(), "lowered namespace");
    self.emit_closure(loc, export, name, arg, temps, body, out);
  }

  // `var N;` the first time, then `(function (N) { ... })(N || (N = {}));`. Inside another
  // namespace the argument also stores the object on the parent: `N = P.N || (P.N = {})`.
  fn emit_closure(
    &mut self,
    loc: Loc,
    export: bool,
    name: SymbolRef,
    arg: SymbolRef,
    temps: Vec<SymbolRef>,
    mut body: Vec<Node<Stmt>>,
    out: &mut Vec<Node<Stmt>>,
  ) {
    let parent = self.namespace_for_export(export);
    let followed = self.store.symbols.follow(name);
    let kind = self.store.symbols[followed].kind;
    // Merged with a function or class, which already declares the name.
    let declared = matches!(kind, SymbolKind::HoistedFunction | SymbolKind::Class);
    if !declared && self.emitted_vars.insert(followed) {
      let module_export = export && parent.is_none();
      let mode = if self.current_scope_kind().stops_hoisting() {
        VarDeclMode::Var
      } else {
        VarDeclMode::Let
      };
      out.push(build::var_decl(loc, mode, module_export, [(name, None)]));
    };
    if !temps.is_empty() {
      body.insert(
        0,
        build::var_decl(loc, VarDeclMode::Var, false, temps.into_iter().map(|t| (t, None))),
      );
    };

    let property = self.store.symbols[followed].original_name.clone();
    self.record_use(name);
    self.record_use(name);
    let arg_expr = match parent {
      Some(parent) => {
        self.record_use(parent);
        self.record_use(parent);
        let stored = build::binary(
          loc,
          OperatorName::LogicalOr,
          build::member(loc, build::id(loc, parent), property.clone()),
          build::assign(
            loc,
            build::member(loc, build::id(loc, parent), property),
            build::empty_object(loc),
          ),
        );
        build::assign(loc, build::id(loc, name), stored)
      }
      None => build::binary(
        loc,
        OperatorName::LogicalOr,
        build::id(loc, name),
        build::assign(loc, build::id(loc, name), build::empty_object(loc)),
      ),
    };
    out.push(build::iife_stmt(loc, arg, arg_expr, body));
  }
}

#[cfg(test)]
mod tests {
  use super::EnumValue;
  use parse_js::ast::expr::Expr;
  use parse_js::loc::Loc;

  #[test]
  fn only_constants_inline() {
    let loc = Loc(0, 1);
    assert!(matches!(
      EnumValue::Num(2.0).to_expr(loc).map(|e| *e.stx),
      Some(Expr::LitNum(n)) if n.0 == 2.0
    ));
    assert!(matches!(
      EnumValue::Str("x".into()).to_expr(loc).map(|e| *e.stx),
      Some(Expr::LitStr(s)) if s == "x"
    ));
    assert!(EnumValue::Unknown.to_expr(loc).is_none());
  }
}
