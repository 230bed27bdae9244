use super::ParseCtx;
use super::Parser;
use crate::ast::expr::Expr;
use crate::ast::expr::IdExpr;
use crate::ast::expr::IdRef;
use crate::ast::expr::MemberExpr;
use crate::ast::expr::OptionalChain;
use crate::ast::jsx::JsxAttr;
use crate::ast::jsx::JsxChild;
use crate::ast::jsx::JsxElem;
use crate::ast::jsx::JsxTag;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::token::Token;
use crate::token::TT;

fn named_entity(name: &str) -> Option<char> {
  Some(match name {
    "amp" => '&',
    "lt" => '<',
    "gt" => '>',
    "quot" => '"',
    "apos" => '\'',
    "nbsp" => '\u{a0}',
    "copy" => '\u{a9}',
    "reg" => '\u{ae}',
    "trade" => '\u{2122}',
    "hellip" => '\u{2026}',
    "mdash" => '\u{2014}',
    "ndash" => '\u{2013}',
    "laquo" => '\u{ab}',
    "raquo" => '\u{bb}',
    "middot" => '\u{b7}',
    "times" => '\u{d7}',
    "bull" => '\u{2022}',
    "euro" => '\u{20ac}',
    "lsquo" => '\u{2018}',
    "rsquo" => '\u{2019}',
    "ldquo" => '\u{201c}',
    "rdquo" => '\u{201d}',
    _ => return None,
  })
}

/// Replaces HTML character references. Unknown or malformed references are left as they are.
pub fn decode_jsx_entities(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  let mut rest = text;
  while let Some(amp) = rest.find('&') {
    out.push_str(&rest[..amp]);
    rest = &rest[amp..];
    let decoded = rest.find(';').and_then(|semi| {
      let name = &rest[1..semi];
      let c = if let Some(hex) = name.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
      } else if let Some(dec) = name.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
      } else {
        named_entity(name)
      }?;
      Some((c, semi + 1))
    });
    match decoded {
      Some((c, len)) => {
        out.push(c);
        rest = &rest[len..];
      }
      None => {
        out.push('&');
        rest = &rest[1..];
      }
    };
  }
  out.push_str(rest);
  out
}

/// Collapses JSX text the way React does: lines are trimmed where they meet a line break, lines
/// that become empty are dropped, and the rest are joined with single spaces.
pub fn normalize_jsx_text(raw: &str) -> String {
  if !raw.contains(['\n', '\r']) {
    return decode_jsx_entities(raw);
  };
  let lines: Vec<&str> = raw.split(['\n', '\r']).collect();
  let last = lines.len() - 1;
  let mut out = String::new();
  for (i, line) in lines.into_iter().enumerate() {
    let mut line = line;
    if i != 0 {
      line = line.trim_start_matches([' ', '\t']);
    };
    if i != last {
      line = line.trim_end_matches([' ', '\t']);
    };
    if line.is_empty() {
      continue;
    };
    if !out.is_empty() {
      out.push(' ');
    };
    out.push_str(line);
  }
  decode_jsx_entities(&out)
}

impl<'a> Parser<'a> {
  fn jsx_name_token(&mut self) -> SyntaxResult<Token> {
    let t = self.consume_with_mode(LexMode::JsxTag);
    if !t.typ.is_identifier_name() {
      return Err(t.error(SyntaxErrorType::ExpectedSyntax("JSX name")));
    };
    Ok(t)
  }

  // The tag name and its source text, which the closing tag must repeat.
  fn jsx_tag_name(&mut self) -> SyntaxResult<(String, JsxTag)> {
    let first = self.jsx_name_token()?;
    let mut text = self.string(first.loc);
    if self.peek_with_mode(LexMode::JsxTag).typ == TT::Colon {
      self.consume_with_mode(LexMode::JsxTag);
      let local = self.jsx_name_token()?;
      text.push(':');
      text.push_str(self.str(local.loc));
      return Ok((text.clone(), JsxTag::Intrinsic(text)));
    };
    if self.peek_with_mode(LexMode::JsxTag).typ != TT::Dot {
      let intrinsic = text.starts_with(|c: char| c.is_ascii_lowercase()) || text.contains('-');
      if intrinsic {
        return Ok((text.clone(), JsxTag::Intrinsic(text)));
      };
    };
    let mut component = match first.typ {
      TT::KeywordThis => Node::new(first.loc, Expr::This),
      _ => {
        let name = self.name_of(&first)?;
        Node::new(first.loc, Expr::Id(IdExpr {
          id: IdRef::Deferred(name),
          can_be_removed_if_unused: false,
        }))
      }
    };
    while self.peek_with_mode(LexMode::JsxTag).typ == TT::Dot {
      self.consume_with_mode(LexMode::JsxTag);
      let prop = self.jsx_name_token()?;
      text.push('.');
      text.push_str(self.str(prop.loc));
      component = Node::new(component.loc + prop.loc, Expr::Member(MemberExpr {
        optional_chain: OptionalChain::None,
        object: component,
        right: self.string(prop.loc),
        can_be_removed_if_unused: false,
      }));
    }
    Ok((text, JsxTag::Component(component)))
  }

  fn jsx_attr_value(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    let t = self.peek_with_mode(LexMode::JsxTag);
    match t.typ {
      TT::LiteralString => {
        self.consume_with_mode(LexMode::JsxTag);
        // No backslash escapes in JSX strings, only character references.
        let inner = self.str(t.loc);
        let inner = &inner[1..inner.len() - 1];
        Ok(Node::new(t.loc, Expr::LitStr(normalize_jsx_text(inner))))
      }
      TT::BraceOpen => {
        self.consume_with_mode(LexMode::JsxTag);
        let value = self.expr_assign(ctx.nested())?;
        self.require(TT::BraceClose)?;
        Ok(value)
      }
      TT::ChevronLeft => self.jsx_elem(ctx),
      _ => Err(t.error(SyntaxErrorType::ExpectedSyntax("JSX attribute value"))),
    }
  }

  fn jsx_attrs(&mut self, ctx: ParseCtx) -> SyntaxResult<(Vec<JsxAttr>, bool)> {
    let mut attributes = Vec::new();
    loop {
      let t = self.peek_with_mode(LexMode::JsxTag);
      match t.typ {
        TT::Slash => {
          self.consume_with_mode(LexMode::JsxTag);
          self.require_with_mode(TT::ChevronRight, LexMode::JsxTag)?;
          return Ok((attributes, true));
        }
        TT::ChevronRight => {
          self.consume_with_mode(LexMode::JsxTag);
          return Ok((attributes, false));
        }
        TT::BraceOpen => {
          self.consume_with_mode(LexMode::JsxTag);
          self.require(TT::DotDotDot)?;
          let value = self.expr_assign(ctx.nested())?;
          self.require(TT::BraceClose)?;
          attributes.push(JsxAttr::Spread { value });
        }
        typ if typ.is_identifier_name() => {
          self.consume_with_mode(LexMode::JsxTag);
          let mut name = self.string(t.loc);
          if self.peek_with_mode(LexMode::JsxTag).typ == TT::Colon {
            self.consume_with_mode(LexMode::JsxTag);
            let local = self.jsx_name_token()?;
            name.push(':');
            name.push_str(self.str(local.loc));
          };
          let value = if self.maybe_consume_with_mode(TT::Equals, LexMode::JsxTag).is_match() {
            Some(self.jsx_attr_value(ctx)?)
          } else {
            None
          };
          attributes.push(JsxAttr::Named { name, value });
        }
        TT::EOF => return Err(t.error(SyntaxErrorType::UnexpectedEnd)),
        _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("JSX attribute"))),
      };
    }
  }

  // Children up to and including the closing tag.
  fn jsx_children(&mut self, ctx: ParseCtx, open_text: Option<&str>) -> SyntaxResult<Vec<JsxChild>> {
    let mut children = Vec::new();
    loop {
      let text = self.consume_with_mode(LexMode::JsxTextContent);
      if !text.loc.is_empty() {
        let normalized = normalize_jsx_text(self.str(text.loc));
        if !normalized.is_empty() {
          children.push(JsxChild::Text(normalized));
        };
      };
      let t = self.peek();
      match t.typ {
        TT::BraceOpen => {
          self.consume();
          // `{/* comment */}` and `{}` produce nothing.
          if self.consume_if(TT::BraceClose).is_match() {
            continue;
          };
          let value = self.expr(ctx.nested())?;
          self.require(TT::BraceClose)?;
          children.push(JsxChild::Expr(value));
        }
        TT::ChevronLeftSlash => {
          self.consume();
          let close_text = match open_text {
            Some(_) => Some(self.jsx_tag_name()?.0),
            None => None,
          };
          if close_text.as_deref() != open_text {
            return Err(t.error(SyntaxErrorType::JsxClosingTagMismatch));
          };
          self.require_with_mode(TT::ChevronRight, LexMode::JsxTag)?;
          return Ok(children);
        }
        TT::ChevronLeft => children.push(JsxChild::Expr(self.jsx_elem(ctx)?)),
        TT::EOF => return Err(t.error(SyntaxErrorType::UnexpectedEnd)),
        _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("JSX child"))),
      };
    }
  }

  /// A JSX element or fragment, starting at its `<`.
  pub fn jsx_elem(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    let start = self.require(TT::ChevronLeft)?;
    if self.maybe_consume_with_mode(TT::ChevronRight, LexMode::JsxTag).is_match() {
      let children = self.jsx_children(ctx, None)?;
      return Ok(Node::new(start.loc + self.last_loc(), Expr::JsxElem(JsxElem {
        tag: None,
        attributes: Vec::new(),
        children,
      })));
    };
    let (text, tag) = self.jsx_tag_name()?;
    if self.is_ts() && self.peek().typ == TT::ChevronLeft {
      self.ts_skip_type_args()?;
    };
    let (attributes, self_closing) = self.jsx_attrs(ctx)?;
    let children = if self_closing {
      Vec::new()
    } else {
      self.jsx_children(ctx, Some(&text))?
    };
    Ok(Node::new(start.loc + self.last_loc(), Expr::JsxElem(JsxElem {
      tag: Some(tag),
      attributes,
      children,
    })))
  }
}

#[cfg(test)]
mod tests {
  use super::decode_jsx_entities;
  use super::normalize_jsx_text;

  #[test]
  fn decodes_references() {
    assert_eq!(decode_jsx_entities("a &amp; b &#65;&#x42; &bogus; &"), "a & b AB &bogus; &");
  }

  #[test]
  fn collapses_multiline_text() {
    assert_eq!(normalize_jsx_text("  hello  "), "  hello  ");
    assert_eq!(normalize_jsx_text("\n    hello\n    world  \n  "), "hello world");
    assert_eq!(normalize_jsx_text("\n   \n"), "");
  }
}
