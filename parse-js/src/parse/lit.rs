use super::ParseCtx;
use super::Parser;
use super::Reading;
use crate::ast::expr::ArrElem;
use crate::ast::expr::Expr;
use crate::ast::expr::LitArrExpr;
use crate::ast::expr::LitObjExpr;
use crate::ast::expr::TemplateExpr;
use crate::ast::expr::TemplatePart;
use crate::ast::expr::TemplateStr;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::decode::decode_string_literal;
use crate::lex::decode::decode_template_part;
use crate::lex::decode::normalise_bigint_literal;
use crate::lex::decode::template_part_raw;
use crate::lex::LexMode;
use crate::loc::Loc;
use crate::num::JsNumber;
use crate::token::Token;
use crate::token::TT;

impl<'a> Parser<'a> {
  /// How a just-finished array or object literal is read. An `=` right after it makes it a
  /// destructuring target; otherwise the enclosing literal decides, if there is one.
  fn literal_reading(&mut self, ctx: ParseCtx) -> Reading {
    if self.peek().typ == TT::Equals {
      Reading::Pattern
    } else if ctx.or_pattern {
      Reading::Undecided
    } else {
      Reading::Expr
    }
  }

  pub fn lit_arr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    let outer = self.begin_deferred();
    let elem_ctx = ctx.with_in_allowed(true).with_or_pattern(true);
    let arr = self.with_loc(|p| {
      p.require(TT::BracketOpen)?;
      let mut elements = Vec::new();
      loop {
        if p.consume_if(TT::BracketClose).is_match() {
          break;
        };
        if p.consume_if(TT::Comma).is_match() {
          elements.push(ArrElem::Empty);
          continue;
        };
        let rest = p.consume_if(TT::DotDotDot).match_loc();
        let value = p.expr_assign(elem_ctx)?;
        match rest {
          Some(rest_loc) => {
            if p.peek().typ == TT::Comma {
              p.defer_invalid_pattern(rest_loc + value.loc);
            };
            elements.push(ArrElem::Rest(value));
          }
          None => elements.push(ArrElem::Single(value)),
        };
        if !p.consume_if(TT::Comma).is_match() {
          p.require(TT::BracketClose)?;
          break;
        };
      }
      Ok(Expr::LitArr(LitArrExpr { elements }))
    })?;
    let reading = self.literal_reading(ctx);
    self.end_deferred(outer, reading);
    Ok(arr)
  }

  pub fn lit_obj(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    let outer = self.begin_deferred();
    let member_ctx = ctx.with_in_allowed(true).with_or_pattern(true);
    let obj = self.with_loc(|p| {
      p.require(TT::BraceOpen)?;
      let members = p.list_with_loc(TT::Comma, TT::BraceClose, |p| p.obj_member(member_ctx))?;
      Ok(Expr::LitObj(LitObjExpr { members }))
    })?;
    let reading = self.literal_reading(ctx);
    self.end_deferred(outer, reading);
    Ok(obj)
  }

  pub fn lit_bigint(&mut self) -> SyntaxResult<Node<Expr>> {
    let t = self.require(TT::LiteralBigInt)?;
    let value = self.lit_bigint_val(&t)?;
    Ok(Node::new(t.loc, Expr::LitBigInt(value)))
  }

  pub fn lit_bigint_val(&self, t: &Token) -> SyntaxResult<String> {
    normalise_bigint_literal(self.str(t.loc))
      .ok_or_else(|| t.error(SyntaxErrorType::MalformedLiteralBigInt))
  }

  pub fn lit_num(&mut self) -> SyntaxResult<Node<Expr>> {
    let t = self.require(TT::LiteralNumber)?;
    let value = self.lit_num_val(&t)?;
    Ok(Node::new(t.loc, Expr::LitNum(value)))
  }

  pub fn lit_num_val(&self, t: &Token) -> SyntaxResult<JsNumber> {
    JsNumber::from_literal(self.str(t.loc)).ok_or_else(|| t.error(SyntaxErrorType::MalformedLiteralNumber))
  }

  pub fn lit_str(&mut self) -> SyntaxResult<Node<Expr>> {
    let t = self.require(TT::LiteralString)?;
    let value = self.lit_str_val(&t)?;
    Ok(Node::new(t.loc, Expr::LitStr(value)))
  }

  pub fn lit_str_val(&self, t: &Token) -> SyntaxResult<String> {
    decode_string_literal(self.str(t.loc)).map_err(|e| {
      let at = t.loc.0 + e.offset;
      Loc(at, at + 1).error(SyntaxErrorType::InvalidCharacterEscape, Some(t.typ))
    })
  }

  pub fn lit_regex(&mut self) -> SyntaxResult<Node<Expr>> {
    let t = self.require_with_mode(TT::LiteralRegex, LexMode::SlashIsRegex)?;
    Ok(Node::new(t.loc, Expr::LitRegex(self.string(t.loc))))
  }

  pub fn lit_template(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    self.with_loc(|p| {
      let parts = p.lit_template_parts(ctx, false)?;
      Ok(Expr::Template(TemplateExpr { parts }))
    })
  }

  fn template_str(&self, t: &Token, tagged: bool) -> SyntaxResult<TemplateStr> {
    let raw = template_part_raw(self.str(t.loc));
    let cooked = decode_template_part(raw);
    if cooked.is_none() && !tagged {
      return Err(t.error(SyntaxErrorType::InvalidCharacterEscape));
    };
    Ok(TemplateStr {
      cooked,
      raw: raw.replace("\r\n", "\n").replace('\r', "\n"),
    })
  }

  /// Parses the strings and substitutions of a template. Tagged templates may contain escapes that
  /// have no cooked value.
  pub fn lit_template_parts(&mut self, ctx: ParseCtx, tagged: bool) -> SyntaxResult<Vec<TemplatePart>> {
    let mut t = self.consume();
    let mut parts = Vec::new();
    loop {
      match t.typ {
        TT::LiteralTemplatePartString => {
          parts.push(TemplatePart::Str(self.template_str(&t, tagged)?));
          let substitution = self.expr(ctx.nested())?;
          parts.push(TemplatePart::Expr(substitution));
          t = self.consume_with_mode(LexMode::TemplateStrContinue);
        }
        TT::LiteralTemplatePartStringEnd => {
          parts.push(TemplatePart::Str(self.template_str(&t, tagged)?));
          break;
        }
        TT::EOF => return Err(t.error(SyntaxErrorType::UnexpectedEnd)),
        _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("template string part"))),
      };
    }
    Ok(parts)
  }
}
