use super::func::FuncFlags;
use super::ParseCtx;
use super::ParsePatternRules;
use super::Parser;
use crate::ast::class_or_object::Class;
use crate::ast::class_or_object::ClassMember;
use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::class_or_object::ClassOrObjVal;
use crate::ast::class_or_object::StaticBlock;
use crate::ast::expr::Expr;
use crate::ast::expr::IdRef;
use crate::ast::expr::ObjMember;
use crate::ast::expr::ObjMemberType;
use crate::ast::func::Func;
use crate::ast::node::Node;
use crate::ast::stmt::ClassDecl;
use crate::ast::stmt::Stmt;
use crate::error::Issue;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::operator::prec;
use crate::scope::ScopeKind;
use crate::symbol::SymbolKind;
use crate::symbol::SymbolRef;
use crate::token::Token;
use crate::token::TT;

const TS_MEMBER_MODIFIERS: [&str; 7] = [
  "public",
  "private",
  "protected",
  "readonly",
  "override",
  "abstract",
  "declare",
];

#[derive(Clone, Copy, PartialEq, Eq)]
enum MethodKind {
  Method,
  Getter,
  Setter,
}

#[derive(Clone, Copy)]
struct MethodModifiers {
  kind: MethodKind,
  async_: bool,
  generator: bool,
}

impl MethodModifiers {
  fn any(&self) -> bool {
    self.kind != MethodKind::Method || self.async_ || self.generator
  }
}

fn is_key_start(t: &Token) -> bool {
  t.typ.is_identifier_name()
    || matches!(
      t.typ,
      TT::LiteralString | TT::LiteralNumber | TT::LiteralBigInt | TT::BracketOpen | TT::PrivateMember
    )
}

impl<'a> Parser<'a> {
  /// A property name in an object literal, object pattern, or class body.
  pub fn class_or_obj_key(&mut self, ctx: ParseCtx, allow_private: bool) -> SyntaxResult<ClassOrObjKey> {
    let t = self.consume();
    Ok(match t.typ {
      TT::BracketOpen => {
        let key = self.expr_assign(ctx.nested())?;
        self.require(TT::BracketClose)?;
        ClassOrObjKey::Computed(key)
      }
      TT::LiteralString => ClassOrObjKey::Direct(self.lit_str_val(&t)?),
      TT::LiteralNumber => ClassOrObjKey::Direct(self.lit_num_val(&t)?.to_js_string()),
      TT::LiteralBigInt => ClassOrObjKey::Direct(self.lit_bigint_val(&t)?),
      TT::PrivateMember if allow_private => ClassOrObjKey::Private(IdRef::Deferred(self.name_of(&t)?)),
      typ if typ.is_identifier_name() => ClassOrObjKey::Direct(self.identifier_text(&t)?),
      _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("property key"))),
    })
  }

  // `get`, `set`, `async`, and `*` before a method name. Each of the words is also a valid key.
  fn method_modifiers(&mut self) -> MethodModifiers {
    let mut modifiers = MethodModifiers {
      kind: MethodKind::Method,
      async_: false,
      generator: false,
    };
    let (t, next) = self.peek_2();
    if (self.is_word(&t, "get") || self.is_word(&t, "set")) && is_key_start(&next) {
      self.consume();
      modifiers.kind = if self.is_word(&t, "get") {
        MethodKind::Getter
      } else {
        MethodKind::Setter
      };
    } else if self.is_word(&t, "async")
      && !next.preceded_by_line_terminator
      && (is_key_start(&next) || next.typ == TT::Asterisk)
    {
      self.consume();
      modifiers.async_ = true;
    };
    if modifiers.kind == MethodKind::Method {
      modifiers.generator = self.consume_if(TT::Asterisk).is_match();
    };
    modifiers
  }

  fn method_val(&mut self, modifiers: MethodModifiers, body_optional: bool) -> SyntaxResult<Option<ClassOrObjVal>> {
    let flags = FuncFlags {
      async_: modifiers.async_,
      generator: modifiers.generator,
      body_optional,
    };
    let Some((func, _)) = self.func_rest(flags, None)? else {
      return Ok(None);
    };
    self.check_accessor_params(&func, modifiers.kind);
    Ok(Some(match modifiers.kind {
      MethodKind::Method => ClassOrObjVal::Method(func),
      MethodKind::Getter => ClassOrObjVal::Getter(func),
      MethodKind::Setter => ClassOrObjVal::Setter(func),
    }))
  }

  fn check_accessor_params(&mut self, func: &Node<Func>, kind: MethodKind) {
    let params = &func.stx.params;
    let message = match kind {
      MethodKind::Getter if !params.is_empty() => "a getter cannot have parameters",
      MethodKind::Setter if params.len() != 1 || params[0].stx.rest => "a setter must have exactly one parameter",
      _ => return,
    };
    self.issue(Issue::UnsupportedSyntax, func.loc, message);
  }

  /// One member of an object literal. Shorthands with an initializer are only valid if the object
  /// turns out to be a pattern.
  pub fn obj_member(&mut self, ctx: ParseCtx) -> SyntaxResult<ObjMember> {
    let (t, next) = self.peek_2();
    if t.typ == TT::DotDotDot {
      self.consume();
      let val = self.expr_assign(ctx)?;
      return Ok(ObjMember {
        typ: ObjMemberType::Rest { val },
      });
    };
    if t.typ == TT::Identifier && matches!(next.typ, TT::Comma | TT::BraceClose | TT::Equals) {
      self.consume();
      let name = self.name_of(&t)?;
      let initializer = match self.consume_if(TT::Equals).match_loc() {
        Some(eq) => {
          let value = self.expr_assign(ctx.nested())?;
          self.defer_invalid_expr(eq + value.loc);
          Some(value)
        }
        None => None,
      };
      return Ok(ObjMember {
        typ: ObjMemberType::Shorthand {
          id: IdRef::Deferred(name),
          initializer,
        },
      });
    };

    let modifiers = self.method_modifiers();
    let key = self.class_or_obj_key(ctx, false)?;
    let next = self.peek();
    let val = if modifiers.any() || next.typ == TT::ParenthesisOpen || (self.is_ts() && next.typ == TT::ChevronLeft) {
      match self.method_val(modifiers, false)? {
        Some(val) => val,
        None => return Err(self.peek().error(SyntaxErrorType::RequiredTokenNotFound(TT::BraceOpen))),
      }
    } else {
      self.require(TT::Colon)?;
      ClassOrObjVal::Prop(Some(self.expr_assign(ctx)?))
    };
    Ok(ObjMember {
      typ: ObjMemberType::Valued { key, val },
    })
  }

  pub fn class_decl(&mut self, ctx: ParseCtx, export: bool, default_export: bool) -> SyntaxResult<Node<Stmt>> {
    let class_tok = self.require(TT::KeywordClass)?;
    let name = if default_export && !self.class_name_follows() {
      None
    } else {
      let t = self.require(TT::Identifier)?;
      let name = self.identifier_text(&t)?;
      Some(self.declare(SymbolKind::Class, &name, t.loc))
    };
    self.enter_scope(ScopeKind::ClassName, class_tok.loc.0);
    let class = self.class_rest(ctx, class_tok.loc.0, name)?;
    self.leave_scope();
    Ok(Node::new(class_tok.loc + self.last_loc(), Stmt::Class(ClassDecl { export, class })))
  }

  pub fn class_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    let class_tok = self.require(TT::KeywordClass)?;
    self.enter_scope(ScopeKind::ClassName, class_tok.loc.0);
    let name = if self.class_name_follows() {
      let t = self.consume();
      let name = self.identifier_text(&t)?;
      Some(self.declare(SymbolKind::Class, &name, t.loc))
    } else {
      None
    };
    let class = self.class_rest(ctx, class_tok.loc.0, name)?;
    self.leave_scope();
    Ok(Node::new(class_tok.loc + self.last_loc(), Expr::Class(class)))
  }

  fn class_name_follows(&mut self) -> bool {
    let t = self.peek();
    t.typ == TT::Identifier && !self.is_word(&t, "implements")
  }

  // Everything after the name, in the class name scope.
  fn class_rest(
    &mut self,
    ctx: ParseCtx,
    name_scope_loc: usize,
    name: Option<SymbolRef>,
  ) -> SyntaxResult<Class> {
    if self.is_ts() && self.peek().typ == TT::ChevronLeft {
      self.ts_skip_type_params()?;
    };
    let extends = if self.consume_if(TT::KeywordExtends).is_match() {
      let heritage = self.expr_with_min_prec(ctx.nested(), prec::CALL)?;
      if self.is_ts() && self.peek().typ == TT::ChevronLeft {
        self.ts_skip_type_args()?;
      };
      Some(heritage)
    } else {
      None
    };
    if self.is_ts() && self.consume_if_word("implements") {
      loop {
        self.ts_skip_type()?;
        if !self.consume_if(TT::Comma).is_match() {
          break;
        };
      }
    };

    let open = self.require(TT::BraceOpen)?;
    self.enter_scope(ScopeKind::ClassBody, open.loc.0);
    let mut members = Vec::new();
    while !self.consume_if(TT::BraceClose).is_match() {
      if let Some(member) = self.class_member(ctx)? {
        members.push(member);
      };
    }
    self.leave_scope();
    Ok(Class {
      name,
      name_scope_loc,
      body_scope_loc: open.loc.0,
      extends,
      members,
    })
  }

  // TypeScript modifiers before a member. Returns whether the member only exists in the type.
  fn ts_member_modifiers(&mut self) -> bool {
    let mut erased = false;
    loop {
      let (t, next) = self.peek_2();
      let is_modifier = TS_MEMBER_MODIFIERS.iter().any(|m| self.is_word(&t, m));
      if !is_modifier || next.preceded_by_line_terminator || !(is_key_start(&next) || next.typ == TT::Asterisk) {
        break;
      };
      erased |= self.is_word(&t, "declare") || self.is_word(&t, "abstract");
      self.consume();
    }
    erased
  }

  // `[key: string]: T;`
  fn ts_skip_index_signature(&mut self) -> bool {
    let (t1, t2, t3) = self.peek_3();
    if t1.typ != TT::BracketOpen || t2.typ != TT::Identifier || t3.typ != TT::Colon {
      return false;
    };
    self
      .speculate(|p| {
        p.consume();
        p.consume();
        p.consume();
        p.ts_skip_type()?;
        p.require(TT::BracketClose)?;
        if p.consume_if(TT::Colon).is_match() {
          p.ts_skip_type()?;
        };
        p.require_semicolon()
      })
      .is_some()
  }

  fn static_block(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<StaticBlock>> {
    let open = self.require(TT::BraceOpen)?;
    self.enter_scope(ScopeKind::ClassStaticInit, open.loc.0);
    let block_ctx = ctx.with_rules(ParsePatternRules {
      await_allowed: false,
      yield_allowed: false,
    });
    let body = self.repeat_until_tt(TT::BraceClose, |p| p.stmt(block_ctx))?;
    let close = self.require(TT::BraceClose)?;
    self.leave_scope();
    Ok(Node::new(open.loc + close.loc, StaticBlock {
      scope_loc: open.loc.0,
      body,
    }))
  }

  /// A member of a class body. Returns None for members that only exist in TypeScript's type
  /// system: index signatures, overloads, and `declare` or `abstract` fields.
  fn class_member(&mut self, ctx: ParseCtx) -> SyntaxResult<Option<Node<ClassMember>>> {
    let cp = self.checkpoint();
    if self.consume_if(TT::Semicolon).is_match() {
      return Ok(None);
    };
    let erased = self.is_ts() && self.ts_member_modifiers();
    if self.is_ts() && self.ts_skip_index_signature() {
      return Ok(None);
    };

    let (t, next) = self.peek_2();
    let static_ = self.is_word(&t, "static") && (is_key_start(&next) || matches!(next.typ, TT::Asterisk | TT::BraceOpen));
    if static_ {
      self.consume();
      if next.typ == TT::BraceOpen {
        let block = self.static_block(ctx)?;
        return Ok(Some(Node::new(self.since_checkpoint(&cp), ClassMember {
          key: ClassOrObjKey::Direct(String::new()),
          static_: true,
          val: ClassOrObjVal::StaticBlock(block),
        })));
      };
    };
    // Modifiers may also follow `static`.
    let erased = erased || (self.is_ts() && self.ts_member_modifiers());

    let modifiers = self.method_modifiers();
    let key_tok = self.peek();
    let key = self.class_or_obj_key(ctx, true)?;
    if self.is_ts() {
      let _ = self.consume_if(TT::Question);
      let _ = self.consume_if(TT::Exclamation);
    };
    let next = self.peek();
    let val = if modifiers.any() || next.typ == TT::ParenthesisOpen || (self.is_ts() && next.typ == TT::ChevronLeft) {
      match self.method_val(modifiers, self.is_ts())? {
        Some(val) => val,
        None => return Ok(None),
      }
    } else {
      if self.is_ts() && self.consume_if(TT::Colon).is_match() {
        self.ts_skip_type()?;
      };
      let initializer_ctx = ParseCtx {
        rules: ParsePatternRules {
          await_allowed: false,
          yield_allowed: false,
        },
        in_allowed: true,
        or_pattern: false,
      };
      let initializer = if self.consume_if(TT::Equals).is_match() {
        Some(self.expr_assign(initializer_ctx)?)
      } else {
        None
      };
      self.require_semicolon()?;
      ClassOrObjVal::Prop(initializer)
    };
    if erased && matches!(val, ClassOrObjVal::Prop(_)) {
      return Ok(None);
    };

    let key = match key {
      ClassOrObjKey::Private(_) => {
        let kind = match &val {
          ClassOrObjVal::Getter(_) => SymbolKind::PrivateGet,
          ClassOrObjVal::Setter(_) => SymbolKind::PrivateSet,
          ClassOrObjVal::Method(_) => SymbolKind::PrivateMethod,
          _ => SymbolKind::PrivateField,
        };
        let name = self.identifier_text(&key_tok)?;
        ClassOrObjKey::Private(IdRef::Resolved(self.declare(kind, &name, key_tok.loc)))
      }
      key => key,
    };
    Ok(Some(Node::new(self.since_checkpoint(&cp), ClassMember { key, static_, val })))
  }
}
