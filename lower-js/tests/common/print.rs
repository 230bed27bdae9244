use lower_js::parts::Ast;
use parse_js::ast::class_or_object::Class;
use parse_js::ast::class_or_object::ClassMember;
use parse_js::ast::class_or_object::ClassOrObjKey;
use parse_js::ast::class_or_object::ClassOrObjVal;
use parse_js::ast::expr::ArrElem;
use parse_js::ast::expr::CallArg;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::IdRef;
use parse_js::ast::expr::ObjMemberType;
use parse_js::ast::expr::OptionalChain;
use parse_js::ast::expr::TemplatePart;
use parse_js::ast::func::Func;
use parse_js::ast::func::FuncBody;
use parse_js::ast::node::Node;
use parse_js::ast::pat::Pat;
use parse_js::ast::stmt::ExportDefaultValue;
use parse_js::ast::stmt::ForInit;
use parse_js::ast::stmt::Stmt;
use parse_js::ast::stmt::VarDecl;
use parse_js::ast::stmt::VarDeclMode;
use parse_js::operator::prec;
use parse_js::operator::Associativity;
use parse_js::operator::OperatorName;
use parse_js::operator::OPERATORS;
use parse_js::symbol::SymbolRef;

const PRIMARY: u8 = prec::MEMBER + 1;

/// Prints every part of `ast`, one statement per line. Only as faithful as the tests need: it
/// doesn't rename, and it parenthesizes by precedence alone.
pub fn print(ast: &Ast) -> String {
  let mut p = Printer {
    ast,
    out: String::new(),
    indent: 0,
  };
  for part in ast.parts.iter() {
    for stmt in part.stmts.iter() {
      p.stmt(stmt);
    }
  }
  p.out
}

pub fn print_expr(ast: &Ast, expr: &Node<Expr>) -> String {
  let mut p = Printer {
    ast,
    out: String::new(),
    indent: 0,
  };
  p.expr(expr, prec::LOWEST);
  p.out
}

struct Printer<'a> {
  ast: &'a Ast,
  out: String,
  indent: usize,
}

fn quote(s: &str) -> String {
  let mut out = String::from("\"");
  for c in s.chars() {
    match c {
      '"' => out.push_str("\\\""),
      '\\' => out.push_str("\\\\"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      c => out.push(c),
    };
  }
  out.push('"');
  out
}

fn expr_prec(e: &Expr) -> u8 {
  match e {
    Expr::Binary(b) => OPERATORS[&b.operator].precedence,
    Expr::Cond(_) => prec::CONDITIONAL,
    Expr::ArrowFunc(_) => prec::ASSIGN,
    Expr::Yield(_) => prec::YIELD,
    Expr::Unary(_) => prec::PREFIX,
    Expr::UnaryPostfix(_) => prec::POSTFIX,
    Expr::LitNum(n) if n.0 < 0.0 || (n.0 == 0.0 && n.0.is_sign_negative()) => prec::PREFIX,
    Expr::New(_) => prec::NEW,
    Expr::Call(_) | Expr::ImportCall(_) | Expr::TaggedTemplate(_) => prec::CALL,
    Expr::Member(_) | Expr::ComputedMember(_) | Expr::PrivateMember(_) => prec::MEMBER,
    Expr::Undefined => prec::PREFIX,
    _ => PRIMARY,
  }
}

fn is_logical(e: &Expr) -> bool {
  matches!(
    e,
    Expr::Binary(b) if matches!(b.operator, OperatorName::LogicalAnd | OperatorName::LogicalOr)
  )
}

fn is_nullish(e: &Expr) -> bool {
  matches!(e, Expr::Binary(b) if b.operator == OperatorName::NullishCoalescing)
}

impl<'a> Printer<'a> {
  fn name(&self, r: SymbolRef) -> &str {
    let symbols = &self.ast.symbols;
    &symbols[symbols.follow(r)].original_name
  }

  fn id(&mut self, id: &IdRef) {
    match id {
      IdRef::Resolved(r) => {
        let name = self.name(*r).to_string();
        self.out.push_str(&name);
      }
      IdRef::Deferred(_) => self.out.push_str("<deferred>"),
    };
  }

  fn path(&self, record: u32) -> String {
    quote(&self.ast.import_records[record as usize].path)
  }

  fn write_indent(&mut self) {
    for _ in 0..self.indent {
      self.out.push_str("  ");
    }
  }

  fn stmt(&mut self, s: &Node<Stmt>) {
    if matches!(s.stx.as_ref(), Stmt::Erased) {
      return;
    };
    self.write_indent();
    self.stmt_inline(s);
    self.out.push('\n');
  }

  fn block(&mut self, body: &[Node<Stmt>]) {
    if body.iter().all(|s| matches!(s.stx.as_ref(), Stmt::Erased)) {
      self.out.push_str("{}");
      return;
    };
    self.out.push_str("{\n");
    self.indent += 1;
    for s in body {
      self.stmt(s);
    }
    self.indent -= 1;
    self.write_indent();
    self.out.push('}');
  }

  fn var_decl(&mut self, decl: &VarDecl) {
    if decl.export {
      self.out.push_str("export ");
    };
    self.out.push_str(match decl.mode {
      VarDeclMode::Const => "const ",
      VarDeclMode::Let => "let ",
      VarDeclMode::Var => "var ",
    });
    for (i, d) in decl.declarators.iter().enumerate() {
      if i > 0 {
        self.out.push_str(", ");
      };
      self.pat(&d.pattern);
      if let Some(init) = &d.initializer {
        self.out.push_str(" = ");
        self.expr(init, prec::ASSIGN);
      };
    }
  }

  // Expression statements can't start with `{`, `function` or `class`.
  fn expr_stmt(&mut self, e: &Node<Expr>) {
    let start = self.out.len();
    self.expr(e, prec::LOWEST);
    let text = &self.out[start..];
    if text.starts_with('{')
      || text.starts_with("function")
      || text.starts_with("async function")
      || text.starts_with("class")
    {
      self.out.insert(start, '(');
      self.out.push(')');
    };
  }

  fn for_init(&mut self, init: &ForInit) {
    match init {
      ForInit::Expr(e) => self.expr(e, prec::LOWEST),
      ForInit::Decl(d) => self.var_decl(&d.stx),
    };
  }

  fn stmt_inline(&mut self, s: &Node<Stmt>) {
    match s.stx.as_ref() {
      Stmt::Block(b) => self.block(&b.body),
      Stmt::Break(b) => {
        self.out.push_str("break");
        if let Some(label) = b.label {
          self.out.push(' ');
          let name = self.name(label).to_string();
          self.out.push_str(&name);
        };
        self.out.push(';');
      }
      Stmt::Continue(c) => {
        self.out.push_str("continue");
        if let Some(label) = c.label {
          self.out.push(' ');
          let name = self.name(label).to_string();
          self.out.push_str(&name);
        };
        self.out.push(';');
      }
      Stmt::Class(c) => {
        if c.export {
          self.out.push_str("export ");
        };
        self.class(&c.class);
      }
      Stmt::Debugger => self.out.push_str("debugger;"),
      Stmt::Directive(d) => {
        self.out.push_str(&quote(d));
        self.out.push(';');
      }
      Stmt::DoWhile(d) => {
        self.out.push_str("do ");
        self.stmt_inline(&d.body);
        self.out.push_str(" while (");
        self.expr(&d.condition, prec::LOWEST);
        self.out.push_str(");");
      }
      Stmt::Empty => self.out.push(';'),
      Stmt::Enum(_) => self.out.push_str("<enum>"),
      Stmt::Namespace(_) => self.out.push_str("<namespace>"),
      Stmt::Erased => {}
      Stmt::ExportDefault(d) => {
        self.out.push_str("export default ");
        match &d.value {
          ExportDefaultValue::Expr(e) => {
            self.expr(e, prec::ASSIGN);
            self.out.push(';');
          }
          ExportDefaultValue::Decl(decl) => self.stmt_inline(decl),
        };
      }
      Stmt::ExportFrom(e) => {
        self.out.push_str("export {");
        for (i, n) in e.names.iter().enumerate() {
          if i > 0 {
            self.out.push_str(", ");
          };
          self.out.push_str(&n.name);
          if n.alias != n.name {
            self.out.push_str(" as ");
            self.out.push_str(&n.alias);
          };
        }
        let path = self.path(e.import_record);
        self.out.push_str("} from ");
        self.out.push_str(&path);
        self.out.push(';');
      }
      Stmt::ExportList(e) => {
        self.out.push_str("export {");
        for (i, item) in e.items.iter().enumerate() {
          if i > 0 {
            self.out.push_str(", ");
          };
          let start = self.out.len();
          self.id(&item.local);
          if self.out[start..] != item.alias {
            self.out.push_str(" as ");
            self.out.push_str(&item.alias);
          };
        }
        self.out.push_str("};");
      }
      Stmt::ExportStar(e) => {
        self.out.push_str("export * ");
        if let Some(alias) = &e.alias {
          self.out.push_str("as ");
          self.out.push_str(alias);
          self.out.push(' ');
        };
        let path = self.path(e.import_record);
        self.out.push_str("from ");
        self.out.push_str(&path);
        self.out.push(';');
      }
      Stmt::Expr(e) => {
        self.expr_stmt(&e.expr);
        self.out.push(';');
      }
      Stmt::For(f) => {
        self.out.push_str("for (");
        if let Some(init) = &f.init {
          self.for_init(init);
        };
        self.out.push(';');
        if let Some(c) = &f.condition {
          self.out.push(' ');
          self.expr(c, prec::LOWEST);
        };
        self.out.push(';');
        if let Some(u) = &f.update {
          self.out.push(' ');
          self.expr(u, prec::LOWEST);
        };
        self.out.push_str(") ");
        self.stmt_inline(&f.body);
      }
      Stmt::ForIn(f) => {
        self.out.push_str("for (");
        self.for_init(&f.lhs);
        self.out.push_str(" in ");
        self.expr(&f.rhs, prec::LOWEST);
        self.out.push_str(") ");
        self.stmt_inline(&f.body);
      }
      Stmt::ForOf(f) => {
        self.out.push_str(if f.await_ { "for await (" } else { "for (" });
        self.for_init(&f.lhs);
        self.out.push_str(" of ");
        self.expr(&f.rhs, prec::ASSIGN);
        self.out.push_str(") ");
        self.stmt_inline(&f.body);
      }
      Stmt::Func(f) => {
        if f.export {
          self.out.push_str("export ");
        };
        self.func(f.name, &f.func.stx);
      }
      Stmt::If(i) => {
        self.out.push_str("if (");
        self.expr(&i.test, prec::LOWEST);
        self.out.push_str(") ");
        self.stmt_inline(&i.consequent);
        if let Some(alt) = &i.alternate {
          self.out.push_str(" else ");
          self.stmt_inline(alt);
        };
      }
      Stmt::Import(i) => {
        self.out.push_str("import ");
        let mut any = false;
        if let Some(d) = i.default {
          let name = self.name(d).to_string();
          self.out.push_str(&name);
          any = true;
        };
        if let Some(ns) = i.namespace {
          if any {
            self.out.push_str(", ");
          };
          let name = self.name(ns).to_string();
          self.out.push_str("* as ");
          self.out.push_str(&name);
          any = true;
        };
        if !i.names.is_empty() {
          if any {
            self.out.push_str(", ");
          };
          self.out.push('{');
          for (n, name) in i.names.iter().enumerate() {
            if n > 0 {
              self.out.push_str(", ");
            };
            let local = self.name(name.local).to_string();
            self.out.push_str(&name.imported);
            if local != name.imported {
              self.out.push_str(" as ");
              self.out.push_str(&local);
            };
          }
          self.out.push('}');
          any = true;
        };
        if any {
          self.out.push_str(" from ");
        };
        let path = self.path(i.import_record);
        self.out.push_str(&path);
        self.out.push(';');
      }
      Stmt::Label(l) => {
        let name = self.name(l.label).to_string();
        self.out.push_str(&name);
        self.out.push_str(": ");
        self.stmt_inline(&l.body);
      }
      Stmt::Return(r) => {
        self.out.push_str("return");
        if let Some(v) = &r.value {
          self.out.push(' ');
          self.expr(v, prec::LOWEST);
        };
        self.out.push(';');
      }
      Stmt::Switch(s) => {
        self.out.push_str("switch (");
        self.expr(&s.test, prec::LOWEST);
        self.out.push_str(") {\n");
        self.indent += 1;
        for branch in s.branches.iter() {
          self.write_indent();
          match &branch.stx.case {
            Some(case) => {
              self.out.push_str("case ");
              self.expr(case, prec::LOWEST);
              self.out.push_str(":\n");
            }
            None => self.out.push_str("default:\n"),
          };
          self.indent += 1;
          for s in branch.stx.body.iter() {
            self.stmt(s);
          }
          self.indent -= 1;
        }
        self.indent -= 1;
        self.write_indent();
        self.out.push('}');
      }
      Stmt::Throw(t) => {
        self.out.push_str("throw ");
        self.expr(&t.value, prec::LOWEST);
        self.out.push(';');
      }
      Stmt::Try(t) => {
        self.out.push_str("try ");
        self.block(&t.wrapped.stx.body);
        if let Some(c) = &t.catch {
          self.out.push_str(" catch ");
          if let Some(param) = &c.stx.parameter {
            self.out.push('(');
            self.pat(param);
            self.out.push_str(") ");
          };
          self.block(&c.stx.body.stx.body);
        };
        if let Some(f) = &t.finally {
          self.out.push_str(" finally ");
          self.block(&f.stx.body);
        };
      }
      Stmt::Var(v) => {
        self.var_decl(v);
        self.out.push(';');
      }
      Stmt::While(w) => {
        self.out.push_str("while (");
        self.expr(&w.condition, prec::LOWEST);
        self.out.push_str(") ");
        self.stmt_inline(&w.body);
      }
      Stmt::With(w) => {
        self.out.push_str("with (");
        self.expr(&w.object, prec::LOWEST);
        self.out.push_str(") ");
        self.stmt_inline(&w.body);
      }
    };
  }

  fn pat(&mut self, p: &Node<Pat>) {
    match p.stx.as_ref() {
      Pat::Id(id) => {
        let name = self.name(id.symbol).to_string();
        self.out.push_str(&name);
      }
      Pat::Arr(arr) => {
        self.out.push('[');
        for (i, elem) in arr.elements.iter().enumerate() {
          if i > 0 {
            self.out.push_str(", ");
          };
          if let Some(elem) = elem {
            self.pat(&elem.target);
            if let Some(d) = &elem.default_value {
              self.out.push_str(" = ");
              self.expr(d, prec::ASSIGN);
            };
          };
        }
        if let Some(rest) = &arr.rest {
          if !arr.elements.is_empty() {
            self.out.push_str(", ");
          };
          self.out.push_str("...");
          self.pat(rest);
        };
        self.out.push(']');
      }
      Pat::Obj(obj) => {
        self.out.push('{');
        for (i, prop) in obj.properties.iter().enumerate() {
          if i > 0 {
            self.out.push_str(", ");
          };
          if !prop.stx.shorthand {
            self.key(&prop.stx.key);
            self.out.push_str(": ");
          };
          self.pat(&prop.stx.target);
          if let Some(d) = &prop.stx.default_value {
            self.out.push_str(" = ");
            self.expr(d, prec::ASSIGN);
          };
        }
        if let Some(rest) = &obj.rest {
          if !obj.properties.is_empty() {
            self.out.push_str(", ");
          };
          self.out.push_str("...");
          self.pat(rest);
        };
        self.out.push('}');
      }
    };
  }

  fn key(&mut self, key: &ClassOrObjKey) {
    match key {
      ClassOrObjKey::Direct(name) => {
        if parse_js::char::is_identifier(name) || name.parse::<f64>().is_ok() {
          self.out.push_str(name);
        } else {
          self.out.push_str(&quote(name));
        };
      }
      ClassOrObjKey::Computed(e) => {
        self.out.push('[');
        self.expr(e, prec::ASSIGN);
        self.out.push(']');
      }
      ClassOrObjKey::Private(id) => {
        self.out.push('#');
        self.id(id);
      }
    };
  }

  fn params(&mut self, func: &Func) {
    self.out.push('(');
    for (i, param) in func.params.iter().enumerate() {
      if i > 0 {
        self.out.push_str(", ");
      };
      if param.stx.rest {
        self.out.push_str("...");
      };
      self.pat(&param.stx.pattern);
      if let Some(d) = &param.stx.default_value {
        self.out.push_str(" = ");
        self.expr(d, prec::ASSIGN);
      };
    }
    self.out.push(')');
  }

  fn func_body(&mut self, func: &Func) {
    match &func.body {
      FuncBody::Block(body) => self.block(body),
      FuncBody::Expression(e) => {
        if matches!(e.stx.as_ref(), Expr::LitObj(_)) {
          self.out.push('(');
          self.expr(e, prec::ASSIGN);
          self.out.push(')');
        } else {
          self.expr(e, prec::ASSIGN);
        };
      }
    };
  }

  fn func(&mut self, name: Option<SymbolRef>, func: &Func) {
    if func.async_ {
      self.out.push_str("async ");
    };
    self.out.push_str("function");
    if func.generator {
      self.out.push('*');
    };
    if let Some(name) = name {
      self.out.push(' ');
      let name = self.name(name).to_string();
      self.out.push_str(&name);
    };
    self.params(func);
    self.out.push(' ');
    self.func_body(func);
  }

  fn method(&mut self, prefix: &str, key: &ClassOrObjKey, func: &Func) {
    self.out.push_str(prefix);
    if func.async_ {
      self.out.push_str("async ");
    };
    if func.generator {
      self.out.push('*');
    };
    self.key(key);
    self.params(func);
    self.out.push(' ');
    self.func_body(func);
  }

  fn class_member(&mut self, m: &ClassMember) {
    if m.static_ {
      self.out.push_str("static ");
    };
    match &m.val {
      ClassOrObjVal::Getter(f) => self.method("get ", &m.key, &f.stx),
      ClassOrObjVal::Setter(f) => self.method("set ", &m.key, &f.stx),
      ClassOrObjVal::Method(f) => self.method("", &m.key, &f.stx),
      ClassOrObjVal::Prop(value) => {
        self.key(&m.key);
        if let Some(v) = value {
          self.out.push_str(" = ");
          self.expr(v, prec::ASSIGN);
        };
        self.out.push(';');
      }
      ClassOrObjVal::StaticBlock(b) => self.block(&b.stx.body),
    };
  }

  fn class(&mut self, class: &Class) {
    self.out.push_str("class");
    if let Some(name) = class.name {
      self.out.push(' ');
      let name = self.name(name).to_string();
      self.out.push_str(&name);
    };
    if let Some(extends) = &class.extends {
      self.out.push_str(" extends ");
      self.expr(extends, prec::CALL);
    };
    if class.members.is_empty() {
      self.out.push_str(" {}");
      return;
    };
    self.out.push_str(" {\n");
    self.indent += 1;
    for m in class.members.iter() {
      self.write_indent();
      self.class_member(&m.stx);
      self.out.push('\n');
    }
    self.indent -= 1;
    self.write_indent();
    self.out.push('}');
  }

  fn args(&mut self, args: &[CallArg]) {
    self.out.push('(');
    for (i, arg) in args.iter().enumerate() {
      if i > 0 {
        self.out.push_str(", ");
      };
      if arg.spread {
        self.out.push_str("...");
      };
      self.expr(&arg.value, prec::ASSIGN);
    }
    self.out.push(')');
  }

  fn template(&mut self, parts: &[TemplatePart]) {
    self.out.push('`');
    for part in parts {
      match part {
        TemplatePart::Str(s) => self.out.push_str(&s.raw),
        TemplatePart::Expr(e) => {
          self.out.push_str("${");
          self.expr(e, prec::LOWEST);
          self.out.push('}');
        }
      };
    }
    self.out.push('`');
  }

  fn chain(&mut self, chain: OptionalChain, dot: bool) {
    match (chain, dot) {
      (OptionalChain::Start, _) => self.out.push_str("?."),
      (_, true) => self.out.push('.'),
      (_, false) => {}
    };
  }

  fn binary(&mut self, op: OperatorName, left: &Node<Expr>, right: &Node<Expr>) {
    let info = OPERATORS[&op];
    let (mut left_level, mut right_level) = match info.associativity {
      Associativity::Left => (info.precedence, info.precedence + 1),
      Associativity::Right => (info.precedence + 1, info.precedence),
    };
    if op == OperatorName::Exponentiation {
      left_level = prec::POSTFIX;
    };
    if op.is_assignment() {
      left_level = prec::CALL;
    };
    // `??` can't be mixed with `||` or `&&` without parentheses.
    if op == OperatorName::NullishCoalescing {
      if is_logical(&left.stx) {
        left_level = PRIMARY;
      };
      if is_logical(&right.stx) {
        right_level = PRIMARY;
      };
    };
    if matches!(op, OperatorName::LogicalAnd | OperatorName::LogicalOr) {
      if is_nullish(&left.stx) {
        left_level = PRIMARY;
      };
      if is_nullish(&right.stx) {
        right_level = PRIMARY;
      };
    };
    self.expr(left, left_level);
    if op == OperatorName::Comma {
      self.out.push_str(", ");
    } else {
      self.out.push(' ');
      self.out.push_str(op.text());
      self.out.push(' ');
    };
    self.expr(right, right_level);
  }

  fn expr(&mut self, e: &Node<Expr>, level: u8) {
    let wrap = expr_prec(&e.stx) < level;
    if wrap {
      self.out.push('(');
    };
    self.expr_inner(e);
    if wrap {
      self.out.push(')');
    };
  }

  fn expr_inner(&mut self, e: &Node<Expr>) {
    match e.stx.as_ref() {
      Expr::ArrowFunc(a) => {
        let func = &a.func.stx;
        if func.async_ {
          self.out.push_str("async ");
        };
        self.params(func);
        self.out.push_str(" => ");
        self.func_body(func);
      }
      Expr::Binary(b) => self.binary(b.operator, &b.left, &b.right),
      Expr::Call(c) => {
        // `(function () {})()`
        let level = match c.callee.stx.as_ref() {
          Expr::Func(_) | Expr::ArrowFunc(_) => PRIMARY + 1,
          _ => prec::CALL,
        };
        self.expr(&c.callee, level);
        self.chain(c.optional_chain, false);
        self.args(&c.arguments);
      }
      Expr::Class(c) => self.class(c),
      Expr::ComputedMember(m) => {
        self.expr(&m.object, prec::CALL);
        self.chain(m.optional_chain, false);
        self.out.push('[');
        self.expr(&m.member, prec::LOWEST);
        self.out.push(']');
      }
      Expr::Cond(c) => {
        self.expr(&c.test, prec::CONDITIONAL + 1);
        self.out.push_str(" ? ");
        self.expr(&c.consequent, prec::ASSIGN);
        self.out.push_str(" : ");
        self.expr(&c.alternate, prec::ASSIGN);
      }
      Expr::Func(f) => self.func(f.name, &f.func.stx),
      Expr::Id(id) => self.id(&id.id),
      Expr::ImportCall(i) => {
        self.out.push_str("import(");
        self.expr(&i.module, prec::ASSIGN);
        self.out.push(')');
      }
      Expr::ImportMeta => self.out.push_str("import.meta"),
      Expr::JsxElem(_) => self.out.push_str("<jsx>"),
      Expr::Missing => {}
      Expr::New(n) => {
        self.out.push_str("new ");
        self.expr(&n.callee, prec::MEMBER);
        self.args(&n.arguments);
      }
      Expr::NewTarget => self.out.push_str("new.target"),
      Expr::Member(m) => {
        self.expr(&m.object, prec::CALL);
        self.chain(m.optional_chain, true);
        self.out.push_str(&m.right);
      }
      Expr::PrivateName(p) => {
        self.out.push('#');
        self.id(&p.id);
      }
      Expr::PrivateMember(m) => {
        self.expr(&m.object, prec::CALL);
        self.chain(m.optional_chain, true);
        self.out.push('#');
        self.id(&m.id);
      }
      Expr::Super => self.out.push_str("super"),
      Expr::TaggedTemplate(t) => {
        self.expr(&t.function, prec::CALL);
        self.template(&t.parts);
      }
      Expr::Template(t) => self.template(&t.parts),
      Expr::This => self.out.push_str("this"),
      Expr::Unary(u) => {
        let text = u.operator.text();
        self.out.push_str(text);
        let start = self.out.len();
        self.expr(&u.argument, prec::PREFIX);
        let arg = &self.out[start..];
        let needs_space = text.chars().all(|c| c.is_ascii_alphabetic())
          || (text == "-" && arg.starts_with('-'))
          || (text == "+" && arg.starts_with('+'));
        if needs_space {
          self.out.insert(start, ' ');
        };
      }
      Expr::UnaryPostfix(u) => {
        self.expr(&u.argument, prec::POSTFIX);
        self.out.push_str(u.operator.text());
      }
      Expr::Undefined => self.out.push_str("void 0"),
      Expr::Yield(y) => {
        self.out.push_str(if y.delegate { "yield*" } else { "yield" });
        if let Some(arg) = &y.argument {
          self.out.push(' ');
          self.expr(arg, prec::ASSIGN);
        };
      }
      Expr::LitArr(arr) => {
        self.out.push('[');
        for (i, elem) in arr.elements.iter().enumerate() {
          if i > 0 {
            self.out.push_str(", ");
          };
          match elem {
            ArrElem::Single(e) => self.expr(e, prec::ASSIGN),
            ArrElem::Rest(e) => {
              self.out.push_str("...");
              self.expr(e, prec::ASSIGN);
            }
            ArrElem::Empty => {}
          };
        }
        if matches!(arr.elements.last(), Some(ArrElem::Empty)) {
          self.out.push(',');
        };
        self.out.push(']');
      }
      Expr::LitBigInt(b) => {
        self.out.push_str(b);
        if !b.ends_with('n') {
          self.out.push('n');
        };
      }
      Expr::LitBool(b) => self.out.push_str(if *b { "true" } else { "false" }),
      Expr::LitNull => self.out.push_str("null"),
      Expr::LitNum(n) => {
        if n.0 == 0.0 && n.0.is_sign_negative() {
          self.out.push_str("-0");
        } else {
          self.out.push_str(&n.to_js_string());
        };
      }
      Expr::LitObj(obj) => {
        if obj.members.is_empty() {
          self.out.push_str("{}");
          return;
        };
        self.out.push_str("{ ");
        for (i, member) in obj.members.iter().enumerate() {
          if i > 0 {
            self.out.push_str(", ");
          };
          match &member.stx.typ {
            ObjMemberType::Valued { key, val } => match val {
              ClassOrObjVal::Getter(f) => self.method("get ", key, &f.stx),
              ClassOrObjVal::Setter(f) => self.method("set ", key, &f.stx),
              ClassOrObjVal::Method(f) => self.method("", key, &f.stx),
              ClassOrObjVal::Prop(value) => {
                self.key(key);
                if let Some(v) = value {
                  self.out.push_str(": ");
                  self.expr(v, prec::ASSIGN);
                };
              }
              ClassOrObjVal::StaticBlock(_) => {}
            },
            ObjMemberType::Shorthand { id, initializer } => {
              self.id(id);
              if let Some(init) = initializer {
                self.out.push_str(" = ");
                self.expr(init, prec::ASSIGN);
              };
            }
            ObjMemberType::Rest { val } => {
              self.out.push_str("...");
              self.expr(val, prec::ASSIGN);
            }
          };
        }
        self.out.push_str(" }");
      }
      Expr::LitRegex(r) => self.out.push_str(r),
      Expr::LitStr(s) => self.out.push_str(&quote(s)),
    };
  }
}
