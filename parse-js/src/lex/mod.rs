use crate::char::CharFilter;
use crate::char::DIGIT;
use crate::char::DIGIT_BIN;
use crate::char::DIGIT_HEX;
use crate::char::DIGIT_OCT;
use crate::char::ID_CONTINUE;
use crate::char::ID_CONTINUE_JSX;
use crate::char::ID_START;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;
use ahash::HashMap;
use ahash::HashMapExt;
use aho_corasick::AhoCorasick;
use aho_corasick::AhoCorasickBuilder;
use aho_corasick::AhoCorasickKind;
use aho_corasick::Anchored;
use aho_corasick::Input;
use aho_corasick::MatchKind;
use aho_corasick::StartKind;
use core::ops::Index;
use memchr::memchr;
use memchr::memchr2;
use memchr::memchr3;
use once_cell::sync::Lazy;

pub mod decode;
#[cfg(test)]
mod tests;

/// How the next token should be scanned. The grammar picks the mode, since several characters mean
/// different things depending on syntactic position.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LexMode {
  JsxTag,
  JsxTextContent,
  SlashIsRegex,
  Standard,
  // Rescan a `}` that closes a template substitution as the continuation of the template string.
  TemplateStrContinue,
}

#[derive(Copy, Clone, Debug)]
pub struct LexerCheckpoint {
  next: usize,
}

// Contains the match length.
#[derive(Copy, Clone)]
struct Match(usize);

impl Match {
  fn len(&self) -> usize {
    self.0
  }

  fn prefix(&self, n: usize) -> Match {
    debug_assert!(n <= self.len());
    Match(n)
  }

  fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

struct PatternMatcher {
  patterns: Vec<TT>,
  matcher: AhoCorasick,
  anchored: bool,
}

impl PatternMatcher {
  fn new<D: AsRef<str>>(anchored: bool, patterns: Vec<(TT, D)>) -> Self {
    let (tts, syns): (Vec<_>, Vec<_>) = patterns.into_iter().unzip();
    let matcher = AhoCorasickBuilder::new()
      .start_kind(if anchored {
        StartKind::Anchored
      } else {
        StartKind::Unanchored
      })
      .kind(Some(AhoCorasickKind::DFA))
      .match_kind(MatchKind::LeftmostLongest)
      .build(syns.iter().map(|s| s.as_ref().as_bytes()))
      .expect("lexer pattern table is static and valid");
    PatternMatcher {
      patterns: tts,
      matcher,
      anchored,
    }
  }

  fn find(&self, lexer: &Lexer) -> LexResult<(TT, Match)> {
    self
      .matcher
      .find(Input::new(&lexer.source[lexer.next..]).anchored(if self.anchored {
        Anchored::Yes
      } else {
        Anchored::No
      }))
      .map(|m| (self.patterns[m.pattern().as_usize()], Match(m.end())))
      .ok_or(LexNotFound)
  }
}

#[derive(Debug)]
struct LexNotFound;

type LexResult<T> = Result<T, LexNotFound>;

pub struct Lexer<'a> {
  source: &'a str,
  next: usize,
}

impl<'a> Lexer<'a> {
  pub fn new(code: &'a str) -> Lexer<'a> {
    Lexer {
      source: code,
      next: 0,
    }
  }

  pub fn source(&self) -> &'a str {
    self.source
  }

  pub fn next(&self) -> usize {
    self.next
  }

  fn end(&self) -> usize {
    self.source.len()
  }

  fn remaining(&self) -> usize {
    self.end() - self.next
  }

  fn at_end(&self) -> bool {
    self.next >= self.end()
  }

  fn peek(&self, n: usize) -> LexResult<char> {
    self.peek_or_eof(n).ok_or(LexNotFound)
  }

  fn peek_or_eof(&self, n: usize) -> Option<char> {
    self.source[self.next..].chars().nth(n)
  }

  pub fn checkpoint(&self) -> LexerCheckpoint {
    LexerCheckpoint { next: self.next }
  }

  pub fn since_checkpoint(&self, checkpoint: LexerCheckpoint) -> Loc {
    Loc(checkpoint.next, self.next)
  }

  pub fn apply_checkpoint(&mut self, checkpoint: LexerCheckpoint) {
    self.next = checkpoint.next;
  }

  /// Moves the cursor to an arbitrary offset, which must be on a character boundary.
  pub fn set_next(&mut self, next: usize) {
    debug_assert!(self.source.is_char_boundary(next));
    self.next = next;
  }

  fn n(&self, n: usize) -> LexResult<Match> {
    if self.next + n > self.end() {
      return Err(LexNotFound);
    };
    Ok(Match(n))
  }

  fn if_char(&self, c: char) -> Match {
    match self.source[self.next..].chars().next() {
      Some(first) if first == c => Match(c.len_utf8()),
      _ => Match(0),
    }
  }

  fn through_char_or_end(&self, c: char) -> Match {
    debug_assert!(c.is_ascii());
    memchr(c as u8, self.source[self.next..].as_bytes())
      .map(|pos| Match(pos + 1))
      .unwrap_or_else(|| Match(self.remaining()))
  }

  fn while_not_2_chars(&self, a: char, b: char) -> Match {
    debug_assert!(a.is_ascii() && b.is_ascii());
    Match(memchr2(a as u8, b as u8, self.source[self.next..].as_bytes()).unwrap_or(self.remaining()))
  }

  fn while_not_3_chars(&self, a: char, b: char, c: char) -> Match {
    debug_assert!(a.is_ascii() && b.is_ascii() && c.is_ascii());
    Match(
      memchr3(a as u8, b as u8, c as u8, self.source[self.next..].as_bytes())
        .unwrap_or(self.remaining()),
    )
  }

  fn while_chars(&self, chars: &CharFilter) -> Match {
    let mut len = 0;
    for ch in self.source[self.next..].chars() {
      if chars.has(ch) {
        len += ch.len_utf8();
      } else {
        break;
      }
    }
    Match(len)
  }

  fn consume(&mut self, m: Match) -> Match {
    self.next += m.len();
    m
  }

  fn consume_next(&mut self) -> LexResult<char> {
    let c = self.peek(0)?;
    self.next += c.len_utf8();
    Ok(c)
  }

  fn skip_expect(&mut self, n: usize) {
    debug_assert!(self.next + n <= self.end());
    self.next += n;
  }

  fn drive_fallible(
    &mut self,
    preceded_by_line_terminator: bool,
    f: impl FnOnce(&mut Self) -> LexResult<TT>,
  ) -> Token {
    let cp = self.checkpoint();
    let typ = f(self).unwrap_or(TT::Invalid);
    Token {
      loc: self.since_checkpoint(cp),
      typ,
      preceded_by_line_terminator,
    }
  }

  fn drive(&mut self, preceded_by_line_terminator: bool, f: impl FnOnce(&mut Self) -> TT) -> Token {
    self.drive_fallible(preceded_by_line_terminator, |lexer| Ok(f(lexer)))
  }
}

impl<'a> Index<Loc> for Lexer<'a> {
  type Output = str;

  fn index(&self, index: Loc) -> &Self::Output {
    &self.source[index.0..index.1]
  }
}

#[rustfmt::skip]
pub static OPERATORS_MAPPING: Lazy<HashMap<TT, &'static str>> = Lazy::new(|| {
  let mut map = HashMap::<TT, &'static str>::new();
  map.insert(TT::Ampersand, "&");
  map.insert(TT::AmpersandAmpersand, "&&");
  map.insert(TT::AmpersandAmpersandEquals, "&&=");
  map.insert(TT::AmpersandEquals, "&=");
  map.insert(TT::Asterisk, "*");
  map.insert(TT::AsteriskAsterisk, "**");
  map.insert(TT::AsteriskAsteriskEquals, "**=");
  map.insert(TT::AsteriskEquals, "*=");
  map.insert(TT::At, "@");
  map.insert(TT::Bar, "|");
  map.insert(TT::BarBar, "||");
  map.insert(TT::BarBarEquals, "||=");
  map.insert(TT::BarEquals, "|=");
  map.insert(TT::BraceClose, "}");
  map.insert(TT::BraceOpen, "{");
  map.insert(TT::BracketClose, "]");
  map.insert(TT::BracketOpen, "[");
  map.insert(TT::Caret, "^");
  map.insert(TT::CaretEquals, "^=");
  map.insert(TT::ChevronLeft, "<");
  map.insert(TT::ChevronLeftChevronLeft, "<<");
  map.insert(TT::ChevronLeftChevronLeftEquals, "<<=");
  map.insert(TT::ChevronLeftEquals, "<=");
  map.insert(TT::ChevronRight, ">");
  map.insert(TT::ChevronRightChevronRight, ">>");
  map.insert(TT::ChevronRightChevronRightChevronRight, ">>>");
  map.insert(TT::ChevronRightChevronRightChevronRightEquals, ">>>=");
  map.insert(TT::ChevronRightChevronRightEquals, ">>=");
  map.insert(TT::ChevronRightEquals, ">=");
  map.insert(TT::Colon, ":");
  map.insert(TT::Comma, ",");
  map.insert(TT::Dot, ".");
  map.insert(TT::DotDotDot, "...");
  map.insert(TT::Equals, "=");
  map.insert(TT::EqualsChevronRight, "=>");
  map.insert(TT::EqualsEquals, "==");
  map.insert(TT::EqualsEqualsEquals, "===");
  map.insert(TT::Exclamation, "!");
  map.insert(TT::ExclamationEquals, "!=");
  map.insert(TT::ExclamationEqualsEquals, "!==");
  map.insert(TT::Hyphen, "-");
  map.insert(TT::HyphenEquals, "-=");
  map.insert(TT::HyphenHyphen, "--");
  map.insert(TT::ParenthesisClose, ")");
  map.insert(TT::ParenthesisOpen, "(");
  map.insert(TT::Percent, "%");
  map.insert(TT::PercentEquals, "%=");
  map.insert(TT::Plus, "+");
  map.insert(TT::PlusEquals, "+=");
  map.insert(TT::PlusPlus, "++");
  map.insert(TT::PrivateMember, "#");
  map.insert(TT::Question, "?");
  map.insert(TT::QuestionDot, "?.");
  map.insert(TT::QuestionDotBracketOpen, "?.[");
  map.insert(TT::QuestionDotParenthesisOpen, "?.(");
  map.insert(TT::QuestionQuestion, "??");
  map.insert(TT::QuestionQuestionEquals, "??=");
  map.insert(TT::Semicolon, ";");
  map.insert(TT::Slash, "/");
  map.insert(TT::SlashEquals, "/=");
  map.insert(TT::Tilde, "~");
  map
});

pub static KEYWORDS_MAPPING: Lazy<HashMap<TT, &'static str>> = Lazy::new(|| {
  let mut map = HashMap::<TT, &'static str>::new();
  map.insert(TT::KeywordBreak, "break");
  map.insert(TT::KeywordCase, "case");
  map.insert(TT::KeywordCatch, "catch");
  map.insert(TT::KeywordClass, "class");
  map.insert(TT::KeywordConst, "const");
  map.insert(TT::KeywordContinue, "continue");
  map.insert(TT::KeywordDebugger, "debugger");
  map.insert(TT::KeywordDefault, "default");
  map.insert(TT::KeywordDelete, "delete");
  map.insert(TT::KeywordDo, "do");
  map.insert(TT::KeywordElse, "else");
  map.insert(TT::KeywordEnum, "enum");
  map.insert(TT::KeywordExport, "export");
  map.insert(TT::KeywordExtends, "extends");
  map.insert(TT::KeywordFinally, "finally");
  map.insert(TT::KeywordFor, "for");
  map.insert(TT::KeywordFunction, "function");
  map.insert(TT::KeywordIf, "if");
  map.insert(TT::KeywordImport, "import");
  map.insert(TT::KeywordIn, "in");
  map.insert(TT::KeywordInstanceof, "instanceof");
  map.insert(TT::KeywordNew, "new");
  map.insert(TT::KeywordReturn, "return");
  map.insert(TT::KeywordSuper, "super");
  map.insert(TT::KeywordSwitch, "switch");
  map.insert(TT::KeywordThis, "this");
  map.insert(TT::KeywordThrow, "throw");
  map.insert(TT::KeywordTry, "try");
  map.insert(TT::KeywordTypeof, "typeof");
  map.insert(TT::KeywordVar, "var");
  map.insert(TT::KeywordVoid, "void");
  map.insert(TT::KeywordWhile, "while");
  map.insert(TT::KeywordWith, "with");
  map.insert(TT::LiteralFalse, "false");
  map.insert(TT::LiteralNull, "null");
  map.insert(TT::LiteralTrue, "true");
  map
});

pub fn keyword_text(tt: TT) -> Option<&'static str> {
  KEYWORDS_MAPPING.get(&tt).copied()
}

#[rustfmt::skip]
static SIG: Lazy<PatternMatcher> = Lazy::new(|| {
  let keyword_strs: Vec<&'static str> = KEYWORDS_MAPPING.values().copied().collect();
  let mut patterns: Vec<(TT, String)> = Vec::new();
  for (&k, &v) in OPERATORS_MAPPING.iter() {
    patterns.push((k, v.into()));
  }
  for (&k, &v) in KEYWORDS_MAPPING.iter() {
    patterns.push((k, v.into()));
    // Avoid matching an identifier that starts with a keyword (e.g. `classes`) as the keyword.
    for c in ID_CONTINUE.ascii_chars() {
      let mut v = v.to_string();
      v.push(c);
      if !keyword_strs.contains(&v.as_str()) {
        patterns.push((TT::Identifier, v));
      }
    }
  }
  for c in ID_START.ascii_chars() {
    patterns.push((TT::Identifier, c.to_string()));
  }
  // Unicode escape at the start of an identifier.
  patterns.push((TT::Identifier, "\\".into()));
  for c in '0'..='9' {
    patterns.push((TT::LiteralNumber, c.to_string()));
    // `.5` is a number, not the `.` operator.
    patterns.push((TT::LiteralNumber, format!(".{}", c)));
    // `a?.5:b` is a conditional, not optional chaining.
    patterns.push((TT::Question, format!("?.{}", c)));
  }
  patterns.push((TT::LiteralNumberBin, "0b".into()));
  patterns.push((TT::LiteralNumberBin, "0B".into()));
  patterns.push((TT::LiteralNumberHex, "0x".into()));
  patterns.push((TT::LiteralNumberHex, "0X".into()));
  patterns.push((TT::LiteralNumberOct, "0o".into()));
  patterns.push((TT::LiteralNumberOct, "0O".into()));
  patterns.push((TT::ChevronLeftSlash, "</".into()));
  patterns.push((TT::LiteralString, "\"".into()));
  patterns.push((TT::LiteralString, "'".into()));
  patterns.push((TT::LiteralTemplatePartString, "`".into()));

  PatternMatcher::new(true, patterns)
});

static ML_COMMENT: Lazy<PatternMatcher> = Lazy::new(|| {
  PatternMatcher::new::<&str>(false, vec![
    (TT::CommentMultilineEnd, "*/"),
    (TT::LineTerminator, "\r"),
    (TT::LineTerminator, "\n"),
    (TT::LineTerminator, "\u{2028}"),
    (TT::LineTerminator, "\u{2029}"),
  ])
});

static INSIG: Lazy<PatternMatcher> = Lazy::new(|| {
  PatternMatcher::new::<&str>(true, vec![
    (TT::LineTerminator, "\r"),
    (TT::LineTerminator, "\n"),
    (TT::LineTerminator, "\u{2028}"),
    (TT::LineTerminator, "\u{2029}"),
    (TT::Whitespace, "\x09"),
    (TT::Whitespace, "\x0b"),
    (TT::Whitespace, "\x0c"),
    (TT::Whitespace, "\x20"),
    (TT::Whitespace, "\u{00A0}"),
    (TT::Whitespace, "\u{1680}"),
    (TT::Whitespace, "\u{2000}"),
    (TT::Whitespace, "\u{2001}"),
    (TT::Whitespace, "\u{2002}"),
    (TT::Whitespace, "\u{2003}"),
    (TT::Whitespace, "\u{2004}"),
    (TT::Whitespace, "\u{2005}"),
    (TT::Whitespace, "\u{2006}"),
    (TT::Whitespace, "\u{2007}"),
    (TT::Whitespace, "\u{2008}"),
    (TT::Whitespace, "\u{2009}"),
    (TT::Whitespace, "\u{200A}"),
    (TT::Whitespace, "\u{202F}"),
    (TT::Whitespace, "\u{205F}"),
    (TT::Whitespace, "\u{3000}"),
    (TT::Whitespace, "\u{FEFF}"),
    (TT::CommentMultiline, "/*"),
    (TT::CommentSingle, "//"),
    // Hashbang, only valid at the very start of the file (checked by the caller).
    (TT::CommentSingle, "#!"),
  ])
});

/// Returns whether the comment includes a line terminator.
fn lex_multiline_comment(lexer: &mut Lexer<'_>) -> bool {
  // Consume `/*`.
  lexer.skip_expect(2);
  let mut contains_newline = false;
  loop {
    // An unterminated comment runs to the end of the source.
    let (tt, mat) = ML_COMMENT
      .find(lexer)
      .unwrap_or((TT::EOF, Match(lexer.remaining())));
    lexer.consume(mat);
    match tt {
      TT::LineTerminator => contains_newline = true,
      _ => break,
    };
  }
  contains_newline
}

fn lex_single_comment(lexer: &mut Lexer<'_>, prefix: Match) {
  lexer.skip_expect(prefix.len());
  // WARNING: U+2028 and U+2029 do not end a single-line comment here.
  lexer.consume(lexer.through_char_or_end('\n'));
}

fn lex_unicode_escape(lexer: &mut Lexer<'_>) -> LexResult<()> {
  // `\u`
  if lexer.peek(1)? != 'u' {
    return Err(LexNotFound);
  }
  lexer.skip_expect(2);
  if lexer.peek_or_eof(0) == Some('{') {
    lexer.skip_expect(1);
    if lexer.consume(lexer.while_chars(&DIGIT_HEX)).is_empty() || lexer.peek(0)? != '}' {
      return Err(LexNotFound);
    }
    lexer.skip_expect(1);
  } else {
    for _ in 0..4 {
      if !DIGIT_HEX.has(lexer.peek(0)?) {
        return Err(LexNotFound);
      }
      lexer.skip_expect(1);
    }
  }
  Ok(())
}

fn lex_identifier_rest(lexer: &mut Lexer<'_>, continue_chars: &CharFilter) -> LexResult<()> {
  loop {
    lexer.consume(lexer.while_chars(continue_chars));
    if lexer.peek_or_eof(0) != Some('\\') {
      return Ok(());
    }
    lex_unicode_escape(lexer)?;
  }
}

fn lex_identifier(lexer: &mut Lexer<'_>, mode: LexMode) -> LexResult<TT> {
  let starter = lexer.peek(0)?;
  if starter == '\\' {
    lex_unicode_escape(lexer)?;
  } else {
    lexer.skip_expect(starter.len_utf8());
  }
  lex_identifier_rest(lexer, if mode == LexMode::JsxTag {
    &ID_CONTINUE_JSX
  } else {
    &ID_CONTINUE
  })?;
  Ok(TT::Identifier)
}

fn lex_bigint_or_number(lexer: &mut Lexer<'_>) -> LexResult<TT> {
  let start = lexer.next();
  lexer.consume(lexer.while_chars(&DIGIT));
  if !lexer.consume(lexer.if_char('n')).is_empty() {
    return Ok(TT::LiteralBigInt);
  }
  let integer_part = &lexer.source[start..lexer.next()];
  let is_legacy_octal = integer_part.len() > 1
    && integer_part.starts_with('0')
    && integer_part.chars().all(|c| matches!(c, '0'..='7'));
  if lexer.peek_or_eof(0) == Some('.') && !is_legacy_octal {
    lexer.skip_expect(1);
    lexer.consume(lexer.while_chars(&DIGIT));
  }
  if matches!(lexer.peek_or_eof(0), Some('e' | 'E')) {
    lexer.skip_expect(1);
    if matches!(lexer.peek(0)?, '+' | '-') {
      lexer.skip_expect(1);
    };
    if lexer.consume(lexer.while_chars(&DIGIT)).is_empty() {
      return Ok(TT::Invalid);
    };
  }
  Ok(TT::LiteralNumber)
}

fn lex_radix_bigint_or_number(lexer: &mut Lexer<'_>, digits: &CharFilter) -> TT {
  lexer.skip_expect(2);
  if lexer.consume(lexer.while_chars(digits)).is_empty() {
    return TT::Invalid;
  };
  if !lexer.consume(lexer.if_char('n')).is_empty() {
    return TT::LiteralBigInt;
  }
  TT::LiteralNumber
}

fn lex_private_member(lexer: &mut Lexer<'_>) -> LexResult<TT> {
  // Include the `#` in the token.
  lexer.skip_expect(1);
  let starter = lexer.peek(0)?;
  if !ID_START.has(starter) {
    return Ok(TT::Invalid);
  };
  lexer.skip_expect(starter.len_utf8());
  lex_identifier_rest(lexer, &ID_CONTINUE)?;
  Ok(TT::PrivateMember)
}

fn lex_regex(lexer: &mut Lexer<'_>) -> LexResult<TT> {
  // Consume slash.
  lexer.consume(lexer.n(1)?);
  let mut in_charset = false;
  loop {
    match lexer.consume_next()? {
      '\\' => {
        // Cannot escape line terminator.
        let escaped_char = lexer.peek(0)?;
        if escaped_char == '\n' {
          return Ok(TT::Invalid);
        };
        lexer.skip_expect(escaped_char.len_utf8());
      }
      '/' if !in_charset => break,
      '[' => in_charset = true,
      ']' if in_charset => in_charset = false,
      '\n' => return Ok(TT::Invalid),
      _ => {}
    };
  }
  lexer.consume(lexer.while_chars(&ID_CONTINUE));
  Ok(TT::LiteralRegex)
}

fn lex_string(lexer: &mut Lexer<'_>, allow_line_terminators: bool) -> LexResult<TT> {
  let quote = lexer.peek(0)?;
  lexer.skip_expect(1);
  let mut invalid = false;
  loop {
    let stop = lexer.source[lexer.next..]
      .bytes()
      .position(|b| matches!(b, b'\\' | b'\n' | b'\r') || b == quote as u8)
      .ok_or(LexNotFound)?;
    lexer.skip_expect(stop);
    match lexer.consume_next()? {
      '\\' => {
        // Any escaped character, including a line continuation.
        if lexer.consume_next()? == '\r' {
          lexer.consume(lexer.if_char('\n'));
        };
      }
      '\n' | '\r' => {
        invalid |= !allow_line_terminators;
      }
      _ => break,
    };
  }
  Ok(if invalid {
    TT::Invalid
  } else {
    TT::LiteralString
  })
}

/// Ends with `${` or backtick.
fn lex_template_string_continue(lexer: &mut Lexer<'_>) -> LexResult<TT> {
  loop {
    lexer.consume(lexer.while_not_3_chars('\\', '`', '$'));
    match lexer.consume_next()? {
      '\\' => {
        lexer.consume_next()?;
      }
      '`' => return Ok(TT::LiteralTemplatePartStringEnd),
      '$' => {
        if lexer.peek(0)? == '{' {
          lexer.skip_expect(1);
          return Ok(TT::LiteralTemplatePartString);
        }
      }
      _ => unreachable!(),
    };
  }
}

fn lex_template(lexer: &mut Lexer<'_>) -> LexResult<TT> {
  // Consume backtick.
  lexer.skip_expect(1);
  lex_template_string_continue(lexer)
}

pub fn lex_next(lexer: &mut Lexer<'_>, mode: LexMode) -> Token {
  if mode == LexMode::JsxTextContent {
    return lexer.drive(false, |lexer| {
      lexer.consume(lexer.while_not_2_chars('{', '<'));
      TT::JsxTextContent
    });
  };

  let mut preceded_by_line_terminator = false;
  while let Ok((tt, mat)) = INSIG.find(lexer) {
    match tt {
      TT::LineTerminator => {
        lexer.consume(mat);
        preceded_by_line_terminator = true;
      }
      TT::Whitespace => {
        lexer.consume(mat);
      }
      TT::CommentMultiline => {
        preceded_by_line_terminator |= lex_multiline_comment(lexer);
      }
      TT::CommentSingle => {
        if lexer.source[lexer.next..].starts_with("#!") && lexer.next() != 0 {
          break;
        };
        // A single-line comment always ends with a line terminator.
        preceded_by_line_terminator = true;
        lex_single_comment(lexer, mat);
      }
      _ => unreachable!(),
    };
  }

  // EOF is different from Invalid, so we should emit this specifically instead of letting drive_fallible return an Invalid.
  if lexer.at_end() {
    return Token {
      loc: Loc::at(lexer.end()),
      typ: TT::EOF,
      preceded_by_line_terminator,
    };
  };

  if mode == LexMode::TemplateStrContinue {
    return lexer.drive_fallible(preceded_by_line_terminator, |lexer| {
      if lexer.peek(0)? != '}' {
        return Ok(TT::Invalid);
      };
      lex_template_string_continue(lexer)
    });
  };

  lexer.drive_fallible(preceded_by_line_terminator, |lexer| {
    if let Some(c) = lexer.peek_or_eof(0) {
      if !c.is_ascii() {
        return if ID_START.has(c) {
          lex_identifier(lexer, mode)
        } else {
          lexer.skip_expect(c.len_utf8());
          Ok(TT::Invalid)
        };
      }
    }

    SIG.find(lexer).and_then(|(tt, mut mat)| match tt {
      TT::Identifier => lex_identifier(lexer, mode),
      TT::LiteralNumber => lex_bigint_or_number(lexer),
      TT::LiteralNumberBin => Ok(lex_radix_bigint_or_number(lexer, &DIGIT_BIN)),
      TT::LiteralNumberHex => Ok(lex_radix_bigint_or_number(lexer, &DIGIT_HEX)),
      TT::LiteralNumberOct => Ok(lex_radix_bigint_or_number(lexer, &DIGIT_OCT)),
      TT::LiteralString => lex_string(lexer, mode == LexMode::JsxTag),
      TT::LiteralTemplatePartString => lex_template(lexer),
      TT::PrivateMember => lex_private_member(lexer),
      TT::Slash | TT::SlashEquals if mode == LexMode::SlashIsRegex => lex_regex(lexer),
      typ => {
        if typ == TT::Question && mat.len() != 1 {
          // We've matched `?.[0-9]`.
          mat = mat.prefix(1);
        };
        lexer.consume(mat);
        Ok(typ)
      }
    })
  })
}
