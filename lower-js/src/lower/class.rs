//! Class fields below ES2022, and TypeScript parameter properties at every target.
//!
//! Instance fields move into the constructor as `this.x = init`. Static fields move after the
//! class as `C.x = init`. Computed keys of moved fields are evaluated in their original position
//! through a temporary.

use crate::bind::Binder;
use crate::build;
use crate::options::Feature;
use parse_js::ast::class_or_object::Class;
use parse_js::ast::class_or_object::ClassMember;
use parse_js::ast::class_or_object::ClassOrObjKey;
use parse_js::ast::class_or_object::ClassOrObjVal;
use parse_js::ast::class_or_object::StaticBlock;
use parse_js::ast::expr::CallArg;
use parse_js::ast::expr::Expr;
use parse_js::ast::func::Func;
use parse_js::ast::func::FuncBody;
use parse_js::ast::node::Node;
use parse_js::ast::pat::Pat;
use parse_js::ast::stmt::ClassDecl;
use parse_js::ast::stmt::ExportDefaultStmt;
use parse_js::ast::stmt::ExportDefaultValue;
use parse_js::ast::stmt::Stmt;
use parse_js::ast::stmt::VarDeclMode;
use parse_js::char::is_identifier;
use parse_js::loc::Loc;
use parse_js::scope::ScopeKind;
use parse_js::symbol::SymbolKind;
use parse_js::symbol::SymbolRef;
use tracing::trace;

struct LoweredClass {
  class: Class,
  // Key evaluations and static initializers to run right after the class is defined.
  after: Vec<Node<Expr>>,
}

fn property(loc: Loc, object: Node<Expr>, key: Node<Expr>) -> Node<Expr> {
  match key.stx.as_ref() {
    Expr::LitStr(name) if is_identifier(name) => build::member(loc, object, name.clone()),
    _ => build::computed_member(loc, object, key),
  }
}

// Whether a top-level statement is a `super(...)` call.
fn is_super_call(stmt: &Node<Stmt>) -> bool {
  let Stmt::Expr(s) = stmt.stx.as_ref() else {
    return false;
  };
  matches!(s.expr.stx.as_ref(), Expr::Call(call) if matches!(call.callee.stx.as_ref(), Expr::Super))
}

impl<'a> Binder<'a> {
  fn lowers_fields(&self) -> bool {
    !self.supports(Feature::ClassFields)
  }

  // Moved static fields need a name for the class.
  fn needs_class_ref(&self, class: &Class) -> bool {
    self.lowers_fields()
      && class.members.iter().any(|m| {
        m.stx.static_ && m.stx.is_field() && !matches!(m.stx.key, ClassOrObjKey::Private(_))
      })
  }

  pub(crate) fn visit_class_decl(&mut self, loc: Loc, decl: ClassDecl, out: &mut Vec<Node<Stmt>>) {
    let ClassDecl { export, class } = decl;
    let namespace = self.namespace_for_export(export);
    let name = class.name;
    let lowered = self.lower_class(class, name);
    out.push(Node::new(loc, Stmt::Class(ClassDecl {
      export: export && namespace.is_none(),
      class: lowered.class,
    })));
    out.extend(lowered.after.into_iter().map(build::expr_stmt));
    if let (Some(namespace), Some(name)) = (namespace, name) {
      out.push(self.namespace_export(namespace, name, loc));
    };
  }

  pub(crate) fn visit_export_default_class(
    &mut self,
    loc: Loc,
    default_ref: SymbolRef,
    decl_loc: Loc,
    decl: ClassDecl,
    out: &mut Vec<Node<Stmt>>,
  ) {
    let ClassDecl { export, mut class } = decl;
    if class.name.is_none() && self.needs_class_ref(&class) {
      class.name = Some(self.generate(SymbolKind::Class, "_default", decl_loc));
    };
    let name = class.name;
    let lowered = self.lower_class(class, name);
    out.push(Node::new(loc, Stmt::ExportDefault(ExportDefaultStmt {
      default_ref,
      value: ExportDefaultValue::Decl(Node::new(decl_loc, Stmt::Class(ClassDecl {
        export,
        class: lowered.class,
      }))),
    })));
    out.extend(lowered.after.into_iter().map(build::expr_stmt));
  }

  /// A class expression whose static fields were moved out becomes
  /// `(_a = class {}, _a.x = 1, _a)`.
  pub(crate) fn visit_class_expr(&mut self, loc: Loc, class: Class) -> Node<Expr> {
    let class_ref = if self.needs_class_ref(&class) {
      Some(self.new_temp(loc))
    } else {
      None
    };
    let lowered = self.lower_class(class, class_ref);
    let class = Node::new(loc, Expr::Class(lowered.class));
    if lowered.after.is_empty() {
      if let Some(r) = class_ref {
        self.remove_temp(r);
      };
      return class;
    };
    let r = match class_ref {
      Some(r) => r,
      None => self.new_temp(loc),
    };
    self.record_use(r);
    self.record_use(r);
    let mut exprs = Vec::with_capacity(lowered.after.len() + 2);
    exprs.push(build::assign(loc, build::id(loc, r), class));
    exprs.extend(lowered.after);
    exprs.push(build::id(loc, r));
    build::comma_all(loc, exprs).unwrap_or_else(|| build::id(loc, r))
  }

  fn lower_class(&mut self, class: Class, class_ref: Option<SymbolRef>) -> LoweredClass {
    let Class {
      name,
      name_scope_loc,
      body_scope_loc,
      extends,
      members,
    } = class;
    let lower_fields = self.lowers_fields();
    let ts = self.options.parse.ts;

    self.enter_scope(ScopeKind::ClassName, name_scope_loc);
    let extends = extends.map(|e| self.visit_expr(e));
    self.enter_scope(ScopeKind::ClassBody, body_scope_loc);

    let mut kept = Vec::with_capacity(members.len());
    // `_a = key` for keys of moved fields, run before the next key that stays in the class.
    let mut pending_keys = Vec::new();
    let mut instance_inits = Vec::new();
    let mut statics = Vec::new();
    for member in members {
      let member_loc = member.loc;
      let ClassMember { key, static_, val } = *member.stx;
      let private = matches!(key, ClassOrObjKey::Private(_));
      if private && !self.supports(Feature::PrivateNames) {
        self.unsupported(Feature::PrivateNames, member_loc);
      };
      let key = self.visit_key(key, member_loc);
      let val = match val {
        ClassOrObjVal::StaticBlock(block) => {
          if !self.supports(Feature::ClassStaticBlocks) {
            self.unsupported(Feature::ClassStaticBlocks, member_loc);
          };
          ClassOrObjVal::StaticBlock(self.visit_static_block(block))
        }
        ClassOrObjVal::Prop(init) => {
          let moved = lower_fields && !private;
          // A field initializer has its own `this`: the instance, or the class for statics.
          let this = if moved && static_ { class_ref } else { None };
          let saved = std::mem::replace(&mut self.this_replacement, this);
          let init = init.map(|e| self.visit_expr(e));
          self.this_replacement = saved;
          if !moved {
            ClassOrObjVal::Prop(init)
          } else {
            let key = match key {
              ClassOrObjKey::Direct(name) => build::string(member_loc, name),
              ClassOrObjKey::Computed(expr) if matches!(expr.stx.as_ref(), Expr::LitStr(_) | Expr::LitNum(_)) => expr,
              ClassOrObjKey::Computed(expr) => {
                let temp = self.new_temp(member_loc);
                self.record_use(temp);
                self.record_use(temp);
                pending_keys.push(build::assign(member_loc, build::id(member_loc, temp), expr));
                build::id(member_loc, temp)
              }
              ClassOrObjKey::Private(_) => continue,
            };
            let value = match init {
              Some(init) => init,
              // TypeScript drops fields that are only declarations.
              None if ts => continue,
              None => build::undefined(member_loc),
            };
            trace!(static_, "moved class field");
            if static_ {
              let Some(class_ref) = class_ref else {
                continue;
              };
              self.record_use(class_ref);
              let target = property(member_loc, build::id(member_loc, class_ref), key);
              statics.push(build::assign(member_loc, target, value));
            } else {
              let target = property(member_loc, Node::new(member_loc, Expr::This), key);
              instance_inits.push(build::expr_stmt(build::assign(member_loc, target, value)));
            };
            continue;
          }
        }
        ClassOrObjVal::Getter(f) => ClassOrObjVal::Getter(self.visit_func(f)),
        ClassOrObjVal::Setter(f) => ClassOrObjVal::Setter(self.visit_func(f)),
        ClassOrObjVal::Method(f) => ClassOrObjVal::Method(self.visit_func(f)),
      };
      let key = match key {
        ClassOrObjKey::Computed(expr) if !pending_keys.is_empty() => {
          let expr_loc = expr.loc;
          pending_keys.push(expr);
          let joined = build::comma_all(expr_loc, std::mem::take(&mut pending_keys));
          ClassOrObjKey::Computed(joined.unwrap_or_else(build::dummy_expr))
        }
        key => key,
      };
      kept.push(Node::new(member_loc, ClassMember { key, static_, val }));
    }
    self.leave_scope();
    self.leave_scope();

    self.add_constructor_inits(&mut kept, extends.is_some(), instance_inits);

    let mut after = pending_keys;
    after.extend(statics);
    LoweredClass {
      class: Class {
        name,
        name_scope_loc,
        body_scope_loc,
        extends,
        members: kept,
      },
      after,
    }
  }

  fn visit_static_block(&mut self, block: Node<StaticBlock>) -> Node<StaticBlock> {
    let loc = block.loc;
    let StaticBlock { scope_loc, body } = *block.stx;
    let saved = self.this_replacement.take();
    self.enter_scope(ScopeKind::ClassStaticInit, scope_loc);
    self.push_temp_frame();
    let mut body = self.visit_stmts(body);
    let temps = self.pop_temp_frame();
    self.leave_scope();
    self.this_replacement = saved;
    if !temps.is_empty() {
      body.insert(
        0,
        build::var_decl(loc, VarDeclMode::Var, false, temps.into_iter().map(|t| (t, None))),
      );
    };
    Node::new(loc, StaticBlock { scope_loc, body })
  }

  // Expands `constructor(public x)` into `this.x = x`, then runs the moved instance fields. A
  // constructor is added if the class has none.
  fn add_constructor_inits(
    &mut self,
    members: &mut Vec<Node<ClassMember>>,
    extends: bool,
    field_inits: Vec<Node<Stmt>>,
  ) {
    let ctor = members.iter_mut().find(|m| m.stx.is_constructor());
    let Some(ctor) = ctor else {
      if field_inits.is_empty() {
        return;
      };
      let loc = field_inits[0].loc;
      members.insert(0, self.synthesize_constructor(loc, extends, field_inits));
      return;
    };
    let ClassOrObjVal::Method(func) = &mut ctor.stx.val else {
      return;
    };
    let mut inits = Vec::new();
    for param in func.stx.params.iter_mut() {
      if !param.stx.ts_param_property {
        continue;
      };
      param.stx.ts_param_property = false;
      let Pat::Id(id) = param.stx.pattern.stx.as_ref() else {
        continue;
      };
      let loc = param.loc;
      let symbol = id.symbol;
      let name = self.store.symbols[symbol].original_name.clone();
      self.record_use(symbol);
      trace!(name = %name, "expanded parameter property");
      inits.push(build::expr_stmt(build::assign(
        loc,
        build::member(loc, Node::new(loc, Expr::This), name),
        build::id(loc, symbol),
      )));
    }
    inits.extend(field_inits);
    if inits.is_empty() {
      return;
    };
    let FuncBody::Block(body) = &mut func.stx.body else {
      return;
    };
    let directives = body
      .iter()
      .take_while(|s| matches!(s.stx.as_ref(), Stmt::Directive(_)))
      .count();
    let mut start = directives;
    if body.get(start).is_some_and(|s| self.is_temp_decl(s)) {
      start += 1;
    };
    // TODO: a `super()` nested in a block or expression still gets the inits before it.
    let at = if extends {
      body.iter().position(is_super_call).map(|i| i + 1).unwrap_or(start)
    } else {
      start
    };
    body.splice(at..at, inits);
  }

  // The `var _a, _b;` added for a function's temporaries.
  fn is_temp_decl(&self, stmt: &Node<Stmt>) -> bool {
    let Stmt::Var(decl) = stmt.stx.as_ref() else {
      return false;
    };
    decl.declarators.iter().all(|d| {
      d.initializer.is_none()
        && matches!(d.pattern.stx.as_ref(), Pat::Id(id) if self.store.symbols[id.symbol].kind == SymbolKind::Generated)
    })
  }

  fn synthesize_constructor(&mut self, loc: Loc, extends: bool, inits: Vec<Node<Stmt>>) -> Node<ClassMember> {
    let mut params = Vec::new();
    let mut body = Vec::with_capacity(inits.len() + 1);
    if extends {
      // constructor(...args) { super(...args); }
      let args = self.generate(SymbolKind::Hoisted, "args", loc);
      self.record_use(args);
      params.push(build::param(loc, args, true));
      body.push(build::expr_stmt(build::call_with_args(loc, Node::new(loc, Expr::Super), vec![
        CallArg {
          spread: true,
          value: build::id(loc, args),
        },
      ])));
    };
    body.extend(inits);
    let func: Node<Func> = build::func(loc, params, body);
    Node::new(loc, ClassMember {
      key: ClassOrObjKey::Direct("constructor".into()),
      static_: false,
      val: ClassOrObjVal::Method(func),
    })
  }
}
