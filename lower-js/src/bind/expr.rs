use super::Binder;
use crate::build;
use crate::defines::DefineValue;
use crate::fold;
use crate::options::Feature;
use parse_js::ast::class_or_object::ClassOrObjKey;
use parse_js::ast::class_or_object::ClassOrObjVal;
use parse_js::ast::expr::ArrElem;
use parse_js::ast::expr::BinaryExpr;
use parse_js::ast::expr::CallArg;
use parse_js::ast::expr::CallExpr;
use parse_js::ast::expr::ComputedMemberExpr;
use parse_js::ast::expr::CondExpr;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::IdExpr;
use parse_js::ast::expr::IdRef;
use parse_js::ast::expr::LitArrExpr;
use parse_js::ast::expr::LitObjExpr;
use parse_js::ast::expr::MemberExpr;
use parse_js::ast::expr::NewExpr;
use parse_js::ast::expr::ObjMember;
use parse_js::ast::expr::ObjMemberType;
use parse_js::ast::expr::OptionalChain;
use parse_js::ast::expr::PrivateMemberExpr;
use parse_js::ast::expr::PrivateNameExpr;
use parse_js::ast::expr::TaggedTemplateExpr;
use parse_js::ast::expr::TemplatePart;
use parse_js::ast::expr::UnaryExpr;
use parse_js::ast::expr::UnaryPostfixExpr;
use parse_js::ast::expr::YieldExpr;
use parse_js::ast::node::Node;
use parse_js::import_record::ImportKind;
use parse_js::import_record::ImportRecord;
use parse_js::loc::Loc;
use parse_js::operator::OperatorName;
use parse_js::symbol::SymbolKind;
use tracing::trace;

/// Where an expression appears, as far as binding and lowering care.
#[derive(Clone, Copy, Default, Debug)]
pub(crate) struct ExprCtx {
  // Written to: the left of an assignment, an update operand, or a destructuring target.
  pub assign_target: bool,
  // An inner link of an optional chain. The outermost link lowers the whole chain.
  pub in_chain: bool,
  // The operand of `typeof`, which can't throw even if unbound.
  pub typeof_arg: bool,
}

impl ExprCtx {
  fn target(assign_target: bool) -> ExprCtx {
    ExprCtx {
      assign_target,
      ..ExprCtx::default()
    }
  }

  fn chain_link(optional_chain: OptionalChain) -> ExprCtx {
    ExprCtx {
      in_chain: optional_chain == OptionalChain::Continue,
      ..ExprCtx::default()
    }
  }
}

impl<'a> Binder<'a> {
  pub(crate) fn visit_expr(&mut self, expr: Node<Expr>) -> Node<Expr> {
    self.visit_expr_in(expr, ExprCtx::default())
  }

  pub(crate) fn visit_expr_in(&mut self, expr: Node<Expr>, ctx: ExprCtx) -> Node<Expr> {
    let loc = expr.loc;
    match *expr.stx {
      Expr::Id(id) => self.visit_id(loc, id, ctx),
      Expr::This => match self.this_replacement {
        Some(r) => {
          self.record_use(r);
          build::id(loc, r)
        }
        None => Node::new(loc, Expr::This),
      },
      Expr::ArrowFunc(mut e) => {
        e.func = self.visit_func(e.func);
        Node::new(loc, Expr::ArrowFunc(e))
      }
      Expr::Func(mut e) => {
        e.func = self.visit_func(e.func);
        Node::new(loc, Expr::Func(e))
      }
      Expr::Class(class) => self.visit_class_expr(loc, class),
      Expr::Binary(bin) => self.visit_binary(loc, bin),
      Expr::Cond(cond) => self.visit_cond(loc, cond),
      Expr::Unary(unary) => self.visit_unary(loc, unary),
      Expr::UnaryPostfix(UnaryPostfixExpr { operator, argument }) => {
        let argument = self.visit_expr_in(argument, ExprCtx::target(true));
        Node::new(loc, Expr::UnaryPostfix(UnaryPostfixExpr { operator, argument }))
      }
      Expr::Call(call) => self.visit_call(loc, call, ctx),
      Expr::New(NewExpr { callee, arguments }) => {
        let callee = self.visit_expr(callee);
        let arguments = self.visit_args(arguments);
        Node::new(loc, Expr::New(NewExpr { callee, arguments }))
      }
      Expr::Member(member) => self.visit_member(loc, member, ctx),
      Expr::ComputedMember(member) => self.visit_computed_member(loc, member, ctx),
      Expr::PrivateMember(PrivateMemberExpr {
        optional_chain,
        object,
        id,
      }) => {
        let object = self.visit_expr_in(object, ExprCtx::chain_link(optional_chain));
        let id = self.resolve_private(id, loc);
        let node = Node::new(loc, Expr::PrivateMember(PrivateMemberExpr {
          optional_chain,
          object,
          id,
        }));
        self.lower_chain_if_outermost(node, ctx)
      }
      // `#x in obj`
      Expr::PrivateName(PrivateNameExpr { id }) => {
        let id = self.resolve_private(id, loc);
        Node::new(loc, Expr::PrivateName(PrivateNameExpr { id }))
      }
      Expr::TaggedTemplate(TaggedTemplateExpr { function, parts }) => {
        let function = self.visit_expr(function);
        let parts = self.visit_template_parts(parts);
        Node::new(loc, Expr::TaggedTemplate(TaggedTemplateExpr { function, parts }))
      }
      Expr::Template(tpl) => {
        let parts = self.visit_template_parts(tpl.parts);
        self.fold_template(loc, parts)
      }
      Expr::LitArr(LitArrExpr { elements }) => {
        let element_ctx = ExprCtx::target(ctx.assign_target);
        let elements = elements
          .into_iter()
          .map(|elem| match elem {
            ArrElem::Single(e) => ArrElem::Single(self.visit_expr_in(e, element_ctx)),
            ArrElem::Rest(e) => ArrElem::Rest(self.visit_expr_in(e, element_ctx)),
            ArrElem::Empty => ArrElem::Empty,
          })
          .collect();
        Node::new(loc, Expr::LitArr(LitArrExpr { elements }))
      }
      Expr::LitObj(obj) => self.visit_object(loc, obj, ctx),
      Expr::LitBigInt(value) => {
        if !self.supports(Feature::BigInt) {
          self.unsupported(Feature::BigInt, loc);
        };
        Node::new(loc, Expr::LitBigInt(value))
      }
      Expr::JsxElem(elem) => self.visit_jsx(loc, elem),
      Expr::ImportCall(mut e) => {
        e.module = self.visit_expr(e.module);
        if let Some(index) = e.import_record {
          self.note_import_record(index);
        };
        Node::new(loc, Expr::ImportCall(e))
      }
      Expr::Yield(YieldExpr { delegate, argument }) => {
        let argument = argument.map(|a| self.visit_expr(a));
        Node::new(loc, Expr::Yield(YieldExpr { delegate, argument }))
      }
      other => Node::new(loc, other),
    }
  }

  fn visit_args(&mut self, arguments: Vec<CallArg>) -> Vec<CallArg> {
    arguments
      .into_iter()
      .map(|arg| CallArg {
        spread: arg.spread,
        value: self.visit_expr(arg.value),
      })
      .collect()
  }

  fn visit_template_parts(&mut self, parts: Vec<TemplatePart>) -> Vec<TemplatePart> {
    parts
      .into_iter()
      .map(|part| match part {
        TemplatePart::Expr(e) => TemplatePart::Expr(self.visit_expr(e)),
        s => s,
      })
      .collect()
  }

  fn visit_id(&mut self, loc: Loc, id: IdExpr, ctx: ExprCtx) -> Node<Expr> {
    let r = self.resolve_id(id.id, loc);
    let followed = self.store.symbols.follow(r);
    // Members of enums and namespaces live on the closure parameter.
    if let Some(alias) = self.store.symbols[followed].namespace_alias.clone() {
      if !ctx.assign_target {
        if let Some(value) = self.enum_values.get(&followed).and_then(|v| v.to_expr(loc)) {
          return value;
        };
      };
      self.record_use(alias.namespace_ref);
      return build::member(loc, build::id(loc, alias.namespace_ref), alias.alias);
    };
    let mut can_be_removed_if_unused = id.can_be_removed_if_unused;
    let symbol = &self.store.symbols[followed];
    if symbol.kind == SymbolKind::Unbound {
      let name = symbol.original_name.clone();
      match name.as_str() {
        "exports" => self.uses_exports_ref = true,
        "module" => self.uses_module_ref = true,
        _ => {}
      };
      if !ctx.assign_target {
        let defines = self.defines;
        if let Some(data) = defines.identifiers.get(&name) {
          if let Some(value) = &data.value {
            trace!(name = %name, "substituted define");
            return self.define_value(loc, value);
          };
          can_be_removed_if_unused |= data.can_be_removed_if_unused;
        };
      };
      can_be_removed_if_unused |= ctx.typeof_arg;
    };
    Node::new(loc, Expr::Id(IdExpr {
      id: IdRef::Resolved(r),
      can_be_removed_if_unused,
    }))
  }

  fn define_value(&mut self, loc: Loc, value: &DefineValue) -> Node<Expr> {
    match value {
      DefineValue::Null => build::null(loc),
      DefineValue::Undefined => build::undefined(loc),
      DefineValue::Bool(b) => build::boolean(loc, *b),
      DefineValue::Num(n) => build::number(loc, *n),
      DefineValue::Str(s) => build::string(loc, s.clone()),
      DefineValue::Global(parts) => {
        let Some((first, rest)) = parts.split_first() else {
          return build::undefined(loc);
        };
        let r = self.resolve_name(first, loc);
        let mut expr = build::id(loc, r);
        for part in rest {
          expr = build::member(loc, expr, part.clone());
        }
        expr
      }
    }
  }

  // `a.b.c` as `["a", "b", "c"]`, if it's a plain chain on an unbound name.
  fn dot_chain(&self, expr: &Node<Expr>) -> Option<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = expr;
    loop {
      match current.stx.as_ref() {
        Expr::Member(m) if m.optional_chain == OptionalChain::None => {
          parts.push(m.right.clone());
          current = &m.object;
        }
        Expr::Id(IdExpr {
          id: IdRef::Resolved(r),
          ..
        }) => {
          let symbol = &self.store.symbols[self.store.symbols.follow(*r)];
          if symbol.kind != SymbolKind::Unbound {
            return None;
          };
          parts.push(symbol.original_name.clone());
          break;
        }
        _ => return None,
      };
    }
    parts.reverse();
    Some(parts)
  }

  fn apply_dot_define(&mut self, mut node: Node<Expr>) -> Node<Expr> {
    let defines = self.defines;
    let Expr::Member(member) = node.stx.as_ref() else {
      return node;
    };
    if !defines.dots.contains_key(&member.right) {
      return node;
    };
    let Some(parts) = self.dot_chain(&node) else {
      return node;
    };
    let parts: Vec<&str> = parts.iter().map(|p| p.as_str()).collect();
    let Some(data) = defines.find_dot(&parts) else {
      return node;
    };
    if let Some(value) = &data.value {
      trace!(chain = %parts.join("."), "substituted define");
      return self.define_value(node.loc, value);
    };
    if data.can_be_removed_if_unused {
      if let Expr::Member(member) = node.stx.as_mut() {
        member.can_be_removed_if_unused = true;
      };
    };
    node
  }

  // `E.A` where `E` is an enum declared in this file and `A` has a known value.
  fn enum_member_value(&self, object: &Node<Expr>, name: &str, loc: Loc) -> Option<Node<Expr>> {
    let Expr::Id(IdExpr {
      id: IdRef::Resolved(r),
      ..
    }) = object.stx.as_ref()
    else {
      return None;
    };
    let r = self.store.symbols.follow(*r);
    self.enum_members.get(&r)?.get(name)?.to_expr(loc)
  }

  fn lower_chain_if_outermost(&mut self, node: Node<Expr>, ctx: ExprCtx) -> Node<Expr> {
    if node.stx.optional_chain() != OptionalChain::None && !ctx.in_chain && !self.supports(Feature::OptionalChain) {
      return self.lower_optional_chain(node, false);
    };
    node
  }

  fn visit_member(&mut self, loc: Loc, member: MemberExpr, ctx: ExprCtx) -> Node<Expr> {
    let MemberExpr {
      optional_chain,
      object,
      right,
      can_be_removed_if_unused,
    } = member;
    let object = self.visit_expr_in(object, ExprCtx::chain_link(optional_chain));
    let plain = optional_chain == OptionalChain::None && !ctx.assign_target;
    if plain {
      if let Some(value) = self.enum_member_value(&object, &right, loc) {
        return value;
      };
    };
    let node = Node::new(loc, Expr::Member(MemberExpr {
      optional_chain,
      object,
      right,
      can_be_removed_if_unused,
    }));
    if plain {
      return self.apply_dot_define(node);
    };
    self.lower_chain_if_outermost(node, ctx)
  }

  fn visit_computed_member(&mut self, loc: Loc, member: ComputedMemberExpr, ctx: ExprCtx) -> Node<Expr> {
    let ComputedMemberExpr {
      optional_chain,
      object,
      member,
    } = member;
    let object = self.visit_expr_in(object, ExprCtx::chain_link(optional_chain));
    let member = self.visit_expr(member);
    if optional_chain == OptionalChain::None && !ctx.assign_target {
      if let Expr::LitStr(name) = member.stx.as_ref() {
        if let Some(value) = self.enum_member_value(&object, name, loc) {
          return value;
        };
      };
    };
    let node = Node::new(loc, Expr::ComputedMember(ComputedMemberExpr {
      optional_chain,
      object,
      member,
    }));
    self.lower_chain_if_outermost(node, ctx)
  }

  fn visit_call(&mut self, loc: Loc, call: CallExpr, ctx: ExprCtx) -> Node<Expr> {
    let CallExpr {
      optional_chain,
      is_direct_eval,
      callee,
      arguments,
    } = call;
    // A chain ending in `?.()` is lowered together with its callee's chain to keep the receiver.
    let callee_ctx = if optional_chain == OptionalChain::Start && !self.supports(Feature::OptionalChain) {
      ExprCtx {
        in_chain: true,
        ..ExprCtx::default()
      }
    } else {
      ExprCtx::chain_link(optional_chain)
    };
    let callee = self.visit_expr_in(callee, callee_ctx);
    let arguments = self.visit_args(arguments);
    if self.options.is_bundling && optional_chain == OptionalChain::None {
      self.detect_require(&callee, &arguments);
    };
    let node = Node::new(loc, Expr::Call(CallExpr {
      optional_chain,
      is_direct_eval,
      callee,
      arguments,
    }));
    self.lower_chain_if_outermost(node, ctx)
  }

  // `require("x")` with an unbound `require` and one string argument imports `x`.
  fn detect_require(&mut self, callee: &Node<Expr>, arguments: &[CallArg]) {
    let Expr::Id(IdExpr {
      id: IdRef::Resolved(r),
      ..
    }) = callee.stx.as_ref()
    else {
      return;
    };
    let symbol = &self.store.symbols[self.store.symbols.follow(*r)];
    if symbol.kind != SymbolKind::Unbound || symbol.original_name != "require" {
      return;
    };
    let [CallArg { spread: false, value }] = arguments else {
      return;
    };
    let Expr::LitStr(path) = value.stx.as_ref() else {
      return;
    };
    let loc = value.loc;
    let existing = self
      .import_records
      .iter()
      .position(|record| record.kind == ImportKind::Require && record.loc == loc);
    let index = match existing {
      Some(index) => index as u32,
      None => {
        self.import_records.push(ImportRecord {
          path: path.clone(),
          kind: ImportKind::Require,
          loc,
        });
        (self.import_records.len() - 1) as u32
      }
    };
    trace!(path = %path, "require call");
    self.note_import_record(index);
  }

  fn visit_binary(&mut self, loc: Loc, bin: BinaryExpr) -> Node<Expr> {
    let BinaryExpr {
      operator,
      left,
      right,
    } = bin;
    if operator.is_assignment() {
      let left = self.visit_expr_in(left, ExprCtx::target(true));
      let right = self.visit_expr(right);
      return self.lower_assign(loc, operator, left, right);
    };
    let left = self.visit_expr(left);
    let right_is_dead = self.options.mangle_syntax
      && match operator {
        OperatorName::LogicalAnd => fold::truthiness(&left) == Some(false),
        OperatorName::LogicalOr => fold::truthiness(&left) == Some(true),
        OperatorName::NullishCoalescing => fold::nullishness(&left) == Some(false),
        _ => false,
      };
    let right = self.with_dead(right_is_dead, |b| b.visit_expr(right));
    let folded = self.fold_binary(loc, operator, left, right);
    self.lower_binary(folded)
  }

  fn visit_cond(&mut self, loc: Loc, cond: CondExpr) -> Node<Expr> {
    let CondExpr {
      test,
      consequent,
      alternate,
    } = cond;
    let test = self.visit_expr(test);
    let known = if self.options.mangle_syntax {
      fold::truthiness(&test)
    } else {
      None
    };
    let consequent = self.with_dead(known == Some(false), |b| b.visit_expr(consequent));
    let alternate = self.with_dead(known == Some(true), |b| b.visit_expr(alternate));
    self.fold_cond(loc, test, consequent, alternate)
  }

  fn visit_unary(&mut self, loc: Loc, unary: UnaryExpr) -> Node<Expr> {
    let UnaryExpr { operator, argument } = unary;
    match operator {
      OperatorName::Delete => {
        let argument = self.visit_expr_in(argument, ExprCtx {
          in_chain: true,
          ..ExprCtx::default()
        });
        if argument.stx.optional_chain() != OptionalChain::None && !self.supports(Feature::OptionalChain) {
          return self.lower_optional_chain(argument, true);
        };
        build::unary(loc, operator, argument)
      }
      OperatorName::PrefixIncrement | OperatorName::PrefixDecrement => {
        let argument = self.visit_expr_in(argument, ExprCtx::target(true));
        build::unary(loc, operator, argument)
      }
      OperatorName::Typeof => {
        let argument = self.visit_expr_in(argument, ExprCtx {
          typeof_arg: true,
          ..ExprCtx::default()
        });
        self.fold_unary(loc, operator, argument)
      }
      _ => {
        let argument = self.visit_expr(argument);
        self.fold_unary(loc, operator, argument)
      }
    }
  }

  fn visit_object(&mut self, loc: Loc, obj: LitObjExpr, ctx: ExprCtx) -> Node<Expr> {
    let value_ctx = ExprCtx::target(ctx.assign_target);
    let mut has_rest = false;
    let mut members = Vec::with_capacity(obj.members.len());
    for member in obj.members {
      let member_loc = member.loc;
      let typ = match member.stx.typ {
        ObjMemberType::Valued { key, val } => {
          let key = self.visit_key(key, member_loc);
          let val = match val {
            ClassOrObjVal::Prop(Some(e)) => ClassOrObjVal::Prop(Some(self.visit_expr_in(e, value_ctx))),
            ClassOrObjVal::Getter(f) => ClassOrObjVal::Getter(self.visit_func(f)),
            ClassOrObjVal::Setter(f) => ClassOrObjVal::Setter(self.visit_func(f)),
            ClassOrObjVal::Method(f) => ClassOrObjVal::Method(self.visit_func(f)),
            other => other,
          };
          ObjMemberType::Valued { key, val }
        }
        ObjMemberType::Shorthand { id, initializer } => self.visit_shorthand(member_loc, id, initializer, ctx),
        ObjMemberType::Rest { val } => {
          has_rest = true;
          ObjMemberType::Rest {
            val: self.visit_expr_in(val, value_ctx),
          }
        }
      };
      members.push(Node::new(member_loc, ObjMember { typ }));
    }
    if has_rest && !self.supports(Feature::ObjectRestSpread) {
      if ctx.assign_target {
        self.unsupported(Feature::ObjectRestSpread, loc);
      } else {
        return self.lower_object_spread(loc, members);
      };
    };
    Node::new(loc, Expr::LitObj(LitObjExpr { members }))
  }

  // Stays a shorthand unless the name was rewritten, e.g. to a namespace member or a define.
  fn visit_shorthand(
    &mut self,
    loc: Loc,
    id: IdRef,
    initializer: Option<Node<Expr>>,
    ctx: ExprCtx,
  ) -> ObjMemberType {
    let name = self.id_text(id);
    let value = self.visit_id(
      loc,
      IdExpr {
        id,
        can_be_removed_if_unused: false,
      },
      ExprCtx::target(ctx.assign_target),
    );
    let initializer = initializer.map(|init| self.visit_expr(init));
    if let Expr::Id(IdExpr {
      id: IdRef::Resolved(r),
      ..
    }) = value.stx.as_ref()
    {
      if self.store.symbols[*r].original_name == name {
        return ObjMemberType::Shorthand {
          id: IdRef::Resolved(*r),
          initializer,
        };
      };
    };
    let val = match initializer {
      Some(init) => build::assign(loc, value, init),
      None => value,
    };
    ObjMemberType::Valued {
      key: ClassOrObjKey::Direct(name),
      val: ClassOrObjVal::Prop(Some(val)),
    }
  }
}
