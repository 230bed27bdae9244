use super::ParseCtx;
use super::ParsePatternRules;
use super::Parser;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::token::Token;
use crate::token::TT;

// Types are parsed only to find where they end. Nothing about them is kept.

fn closes_type_args(typ: TT) -> bool {
  matches!(
    typ,
    TT::ChevronRight
      | TT::ChevronRightChevronRight
      | TT::ChevronRightChevronRightChevronRight
      | TT::ChevronRightEquals
      | TT::ChevronRightChevronRightEquals
      | TT::ChevronRightChevronRightChevronRightEquals
  )
}

const TYPE_OPERATORS: [&str; 3] = ["keyof", "unique", "readonly"];

impl<'a> Parser<'a> {
  fn type_key_ctx(&self) -> ParseCtx {
    ParseCtx {
      rules: ParsePatternRules {
        await_allowed: false,
        yield_allowed: false,
      },
      in_allowed: true,
      or_pattern: false,
    }
  }

  /// Skips a complete type, including function types and conditional types.
  pub fn ts_skip_type(&mut self) -> SyntaxResult<()> {
    let (t, next) = self.peek_2();
    match t.typ {
      TT::ChevronLeft => {
        self.ts_skip_type_params()?;
        return self.ts_skip_fn_type_rest();
      }
      TT::ParenthesisOpen => {
        if self.speculate(|p| p.ts_skip_fn_type_rest()).is_some() {
          return Ok(());
        };
      }
      TT::KeywordNew => {
        self.consume();
        if self.peek().typ == TT::ChevronLeft {
          self.ts_skip_type_params()?;
        };
        return self.ts_skip_fn_type_rest();
      }
      TT::Identifier if self.is_word(&t, "abstract") && next.typ == TT::KeywordNew => {
        self.consume();
        return self.ts_skip_type();
      }
      _ => {}
    };
    self.ts_skip_union()?;
    let t = self.peek();
    if t.typ == TT::KeywordExtends && !t.preceded_by_line_terminator {
      self.consume();
      self.ts_skip_union()?;
      self.require(TT::Question)?;
      self.ts_skip_type()?;
      self.require(TT::Colon)?;
      self.ts_skip_type()?;
    };
    Ok(())
  }

  // Parameters, `=>`, and the result of a function type.
  fn ts_skip_fn_type_rest(&mut self) -> SyntaxResult<()> {
    self.ts_skip_fn_type_params()?;
    self.require(TT::EqualsChevronRight)?;
    self.ts_skip_return_type()
  }

  fn ts_skip_fn_type_params(&mut self) -> SyntaxResult<()> {
    self.require(TT::ParenthesisOpen)?;
    self.list(TT::Comma, TT::ParenthesisClose, |p| {
      while p.peek_2().1.typ == TT::Identifier
        && ["public", "private", "protected", "readonly"].iter().any(|m| p.peek_is_word(m))
      {
        p.consume();
      }
      let _ = p.consume_if(TT::DotDotDot);
      let t = p.peek();
      match t.typ {
        TT::Identifier | TT::KeywordThis => {
          p.consume();
        }
        TT::BraceOpen | TT::BracketOpen => p.ts_skip_balanced()?,
        _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("parameter name"))),
      };
      let _ = p.consume_if(TT::Question);
      if p.consume_if(TT::Colon).is_match() {
        p.ts_skip_type()?;
      };
      Ok(())
    })?;
    Ok(())
  }

  // A destructuring pattern in a function type, which has no bearing on the type.
  fn ts_skip_balanced(&mut self) -> SyntaxResult<()> {
    let mut depth = 0usize;
    loop {
      let t = self.consume();
      match t.typ {
        TT::BraceOpen | TT::BracketOpen | TT::ParenthesisOpen => depth += 1,
        TT::BraceClose | TT::BracketClose | TT::ParenthesisClose => {
          depth = depth.saturating_sub(1);
          if depth == 0 {
            return Ok(());
          };
        }
        TT::EOF => return Err(t.error(SyntaxErrorType::UnexpectedEnd)),
        _ => {}
      };
    }
  }

  fn ts_skip_union(&mut self) -> SyntaxResult<()> {
    // A leading `|` or `&` is allowed.
    let _ = self.consume_if_pred(|t| matches!(t.typ, TT::Bar | TT::Ampersand));
    loop {
      self.ts_skip_type_operator()?;
      if !self.consume_if_pred(|t| matches!(t.typ, TT::Bar | TT::Ampersand)).is_match() {
        break;
      };
    }
    Ok(())
  }

  fn ts_skip_type_operator(&mut self) -> SyntaxResult<()> {
    let (t, next) = self.peek_2();
    let operand_follows = !matches!(
      next.typ,
      TT::Comma | TT::ParenthesisClose | TT::BracketClose | TT::BraceClose | TT::Semicolon | TT::Equals | TT::EOF
    ) && !closes_type_args(next.typ);
    if operand_follows && TYPE_OPERATORS.iter().any(|w| self.is_word(&t, w)) {
      self.consume();
      return self.ts_skip_type_operator();
    };
    if operand_follows && self.is_word(&t, "infer") {
      self.consume();
      self.require(TT::Identifier)?;
      // `infer U extends X ? A : B` is a conditional; `infer U extends X` in a conditional's check
      // position is a constraint.
      let _ = self.speculate(|p| {
        p.require(TT::KeywordExtends)?;
        p.ts_skip_type_operator()?;
        let t = p.peek();
        if t.typ == TT::Question {
          return Err(t.error(SyntaxErrorType::ExpectedSyntax("infer constraint")));
        };
        Ok(())
      });
      return Ok(());
    };
    self.ts_skip_postfix_type()
  }

  fn ts_skip_postfix_type(&mut self) -> SyntaxResult<()> {
    self.ts_skip_primary_type()?;
    loop {
      let t = self.peek();
      if t.typ != TT::BracketOpen || t.preceded_by_line_terminator {
        break;
      };
      self.consume();
      if !self.consume_if(TT::BracketClose).is_match() {
        self.ts_skip_type()?;
        self.require(TT::BracketClose)?;
      };
    }
    Ok(())
  }

  // `A.B.C<T>`.
  fn ts_skip_type_reference(&mut self) -> SyntaxResult<()> {
    while self.consume_if(TT::Dot).is_match() {
      self.require_predicate(|typ| typ.is_identifier_name(), "type name")?;
    }
    let t = self.peek();
    if t.typ == TT::ChevronLeft && !t.preceded_by_line_terminator {
      self.ts_skip_type_args()?;
    };
    Ok(())
  }

  fn ts_skip_primary_type(&mut self) -> SyntaxResult<()> {
    let t = self.peek();
    match t.typ {
      TT::Identifier => {
        self.consume();
        self.ts_skip_type_reference()?;
      }
      TT::KeywordThis
      | TT::KeywordVoid
      | TT::LiteralNull
      | TT::LiteralTrue
      | TT::LiteralFalse
      | TT::LiteralString
      | TT::LiteralNumber
      | TT::LiteralBigInt => {
        self.consume();
      }
      TT::Hyphen => {
        self.consume();
        self.require_predicate(|typ| matches!(typ, TT::LiteralNumber | TT::LiteralBigInt), "number")?;
      }
      TT::KeywordTypeof => {
        self.consume();
        if self.peek().typ == TT::KeywordImport {
          self.ts_skip_import_type()?;
        } else {
          self.require_predicate(|typ| typ.is_identifier_name(), "name")?;
          self.ts_skip_type_reference()?;
        };
      }
      TT::KeywordImport => self.ts_skip_import_type()?,
      TT::LiteralTemplatePartString | TT::LiteralTemplatePartStringEnd => self.ts_skip_template_type()?,
      TT::BraceOpen => self.ts_skip_object_type()?,
      TT::BracketOpen => self.ts_skip_tuple_type()?,
      TT::ParenthesisOpen => {
        self.consume();
        self.ts_skip_type()?;
        self.require(TT::ParenthesisClose)?;
      }
      TT::EOF => return Err(t.error(SyntaxErrorType::UnexpectedEnd)),
      _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("type"))),
    };
    Ok(())
  }

  // `import("x").A.B<T>`
  fn ts_skip_import_type(&mut self) -> SyntaxResult<()> {
    self.require(TT::KeywordImport)?;
    self.require(TT::ParenthesisOpen)?;
    self.require(TT::LiteralString)?;
    self.require(TT::ParenthesisClose)?;
    self.ts_skip_type_reference()
  }

  fn ts_skip_template_type(&mut self) -> SyntaxResult<()> {
    let mut t = self.consume();
    loop {
      match t.typ {
        TT::LiteralTemplatePartString => {
          self.ts_skip_type()?;
          t = self.consume_with_mode(LexMode::TemplateStrContinue);
        }
        TT::LiteralTemplatePartStringEnd => return Ok(()),
        TT::EOF => return Err(t.error(SyntaxErrorType::UnexpectedEnd)),
        _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("template type part"))),
      };
    }
  }

  fn ts_skip_tuple_type(&mut self) -> SyntaxResult<()> {
    self.require(TT::BracketOpen)?;
    self.list(TT::Comma, TT::BracketClose, |p| {
      let _ = p.consume_if(TT::DotDotDot);
      // Named members: `[first: A, rest?: B]`.
      let (t, next, after) = p.peek_3();
      let labelled = t.typ.is_identifier_name()
        && (next.typ == TT::Colon || (next.typ == TT::Question && after.typ == TT::Colon));
      if labelled {
        p.consume();
        let _ = p.consume_if(TT::Question);
        p.require(TT::Colon)?;
      };
      p.ts_skip_type()?;
      let _ = p.consume_if(TT::Question);
      Ok(())
    })?;
    Ok(())
  }

  /// Object types, interface bodies, and mapped types.
  pub fn ts_skip_object_type(&mut self) -> SyntaxResult<()> {
    self.require(TT::BraceOpen)?;
    loop {
      let t = self.peek();
      match t.typ {
        TT::BraceClose => {
          self.consume();
          return Ok(());
        }
        TT::Semicolon | TT::Comma => {
          self.consume();
        }
        _ => self.ts_skip_type_member()?,
      };
    }
  }

  // Signature parameters and an optional return type.
  fn ts_skip_signature(&mut self) -> SyntaxResult<()> {
    if self.peek().typ == TT::ChevronLeft {
      self.ts_skip_type_params()?;
    };
    self.ts_skip_fn_type_params()?;
    if self.consume_if(TT::Colon).is_match() {
      self.ts_skip_return_type()?;
    };
    Ok(())
  }

  fn ts_skip_type_member(&mut self) -> SyntaxResult<()> {
    // `readonly`, `+readonly`, `-readonly`, `get`, and `set`, unless they are the member's name.
    loop {
      let (t, next) = self.peek_2();
      let modifier = matches!(t.typ, TT::Plus | TT::Hyphen)
        || (["readonly", "get", "set"].iter().any(|m| self.is_word(&t, m))
          && !matches!(
            next.typ,
            TT::Colon | TT::Question | TT::ParenthesisOpen | TT::ChevronLeft | TT::Semicolon | TT::Comma | TT::BraceClose
          )
          && !next.preceded_by_line_terminator);
      if !modifier {
        break;
      };
      self.consume();
    }

    let (t, next, after) = self.peek_3();
    match t.typ {
      TT::ParenthesisOpen | TT::ChevronLeft => return self.ts_skip_signature(),
      TT::KeywordNew if matches!(next.typ, TT::ParenthesisOpen | TT::ChevronLeft) => {
        self.consume();
        return self.ts_skip_signature();
      }
      TT::BracketOpen if next.typ == TT::Identifier && after.typ == TT::KeywordIn => {
        // `[K in keyof T as N]+?: V`
        self.consume();
        self.consume();
        self.consume();
        self.ts_skip_type()?;
        if self.consume_if_word("as") {
          self.ts_skip_type()?;
        };
        self.require(TT::BracketClose)?;
        let _ = self.consume_if_pred(|t| matches!(t.typ, TT::Plus | TT::Hyphen));
        let _ = self.consume_if(TT::Question);
        if self.consume_if(TT::Colon).is_match() {
          self.ts_skip_type()?;
        };
        return Ok(());
      }
      TT::BracketOpen if next.typ == TT::Identifier && after.typ == TT::Colon => {
        // `[key: string]: V`
        self.consume();
        self.consume();
        self.consume();
        self.ts_skip_type()?;
        self.require(TT::BracketClose)?;
        let _ = self.consume_if(TT::Question);
        if self.consume_if(TT::Colon).is_match() {
          self.ts_skip_type()?;
        };
        return Ok(());
      }
      TT::BracketOpen => {
        self.consume();
        let ctx = self.type_key_ctx();
        self.expr_assign(ctx)?;
        self.require(TT::BracketClose)?;
      }
      TT::LiteralString | TT::LiteralNumber | TT::LiteralBigInt => {
        self.consume();
      }
      typ if typ.is_identifier_name() => {
        self.consume();
      }
      _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("type member"))),
    };
    let _ = self.consume_if(TT::Question);
    let t = self.peek();
    match t.typ {
      TT::ParenthesisOpen | TT::ChevronLeft => self.ts_skip_signature(),
      TT::Colon => {
        self.consume();
        self.ts_skip_type()
      }
      _ => Ok(()),
    }
  }

  /// `<A, B<C>>` after a name. The closing `>` may be part of a longer token such as `>>`.
  pub fn ts_skip_type_args(&mut self) -> SyntaxResult<()> {
    self.require(TT::ChevronLeft)?;
    while !closes_type_args(self.peek().typ) {
      self.ts_skip_type()?;
      if !self.consume_if(TT::Comma).is_match() {
        break;
      };
    }
    self.require_chevron_right()?;
    Ok(())
  }

  /// `<T extends U = V, const W>` in a declaration.
  pub fn ts_skip_type_params(&mut self) -> SyntaxResult<()> {
    self.require(TT::ChevronLeft)?;
    while !closes_type_args(self.peek().typ) {
      loop {
        let (t, next) = self.peek_2();
        // `const T`, `in T`, and `out T`.
        let is_modifier = (matches!(t.typ, TT::KeywordConst | TT::KeywordIn) || self.is_word(&t, "out"))
          && next.typ == TT::Identifier;
        if !is_modifier {
          break;
        };
        self.consume();
      }
      self.require(TT::Identifier)?;
      if self.consume_if(TT::KeywordExtends).is_match() {
        self.ts_skip_type()?;
      };
      if self.consume_if(TT::Equals).is_match() {
        self.ts_skip_type()?;
      };
      if !self.consume_if(TT::Comma).is_match() {
        break;
      };
    }
    self.require_chevron_right()?;
    Ok(())
  }

  // `x is T` and `this is T` name the parameter they narrow.
  fn is_type_predicate(&self, name: &Token, next: &Token) -> bool {
    matches!(name.typ, TT::Identifier | TT::KeywordThis) && self.is_word(next, "is") && !next.preceded_by_line_terminator
  }

  /// A return type, which may be a type predicate or assertion signature.
  pub fn ts_skip_return_type(&mut self) -> SyntaxResult<()> {
    let (t, next, after) = self.peek_3();
    if self.is_word(&t, "asserts")
      && matches!(next.typ, TT::Identifier | TT::KeywordThis)
      && !next.preceded_by_line_terminator
    {
      self.consume();
      self.consume();
      if self.is_word(&after, "is") && !after.preceded_by_line_terminator {
        self.consume();
        self.ts_skip_type()?;
      };
      return Ok(());
    };
    if self.is_type_predicate(&t, &next) {
      self.consume();
      self.consume();
    };
    self.ts_skip_type()
  }

  /// `interface A<T> extends B, C { ... }`, starting at `interface`.
  pub fn ts_skip_interface(&mut self) -> SyntaxResult<()> {
    self.require_word("interface")?;
    self.require(TT::Identifier)?;
    if self.peek().typ == TT::ChevronLeft {
      self.ts_skip_type_params()?;
    };
    if self.consume_if(TT::KeywordExtends).is_match() {
      loop {
        self.ts_skip_postfix_type()?;
        if !self.consume_if(TT::Comma).is_match() {
          break;
        };
      }
    };
    self.ts_skip_object_type()
  }

  /// `type A<T> = ...;`, starting at `type`.
  pub fn ts_skip_type_alias(&mut self) -> SyntaxResult<()> {
    self.require_word("type")?;
    self.require(TT::Identifier)?;
    if self.peek().typ == TT::ChevronLeft {
      self.ts_skip_type_params()?;
    };
    self.require(TT::Equals)?;
    self.ts_skip_type()?;
    self.require_semicolon()
  }
}
