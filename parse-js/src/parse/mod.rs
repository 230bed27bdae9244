use crate::ast::node::Node;
use crate::ast::stmt::TopLevel;
use crate::error::Issue;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::import_record::ImportKind;
use crate::import_record::ImportRecord;
use crate::lex::decode::decode_identifier;
use crate::lex::lex_next;
use crate::lex::LexMode;
use crate::lex::Lexer;
use crate::loc::Loc;
use crate::name::Name;
use crate::name::NameTable;
use crate::options::ParseOptions;
use crate::scope::ScopeKind;
use crate::store::StoreSnapshot;
use crate::store::SymbolStore;
use crate::symbol::SymbolKind;
use crate::symbol::SymbolRef;
use crate::token::Token;
use crate::token::TT;
use diagnostics::Log;
use diagnostics::LogCheckpoint;
use tracing::trace;

pub mod class_or_object;
pub mod drive;
pub mod expr;
pub mod func;
pub mod import_export;
pub mod jsx;
pub mod lit;
pub mod operator;
pub mod pat;
pub mod stmt;
#[cfg(test)]
mod tests;
pub mod ts;
pub mod ts_decl;

#[derive(Clone, Copy)]
pub struct ParsePatternRules {
  // Whether `await` is an operator rather than an identifier.
  pub await_allowed: bool,
  // Whether `yield` is an operator rather than an identifier.
  pub yield_allowed: bool,
}

// Almost every parse_* function takes these values. The struct is passed by value and never mutated; the with_* methods create an altered copy for passing into other functions.
#[derive(Clone, Copy)]
pub struct ParseCtx {
  pub rules: ParsePatternRules,
  // False directly inside a `for` head, where `in` ends the expression.
  pub in_allowed: bool,
  // The caller decides later whether this is an expression or a binding pattern, so errors that
  // only apply to one of them are deferred.
  pub or_pattern: bool,
}

impl ParseCtx {
  pub fn with_rules(&self, rules: ParsePatternRules) -> ParseCtx {
    ParseCtx { rules, ..*self }
  }

  pub fn with_in_allowed(&self, in_allowed: bool) -> ParseCtx {
    ParseCtx { in_allowed, ..*self }
  }

  pub fn with_or_pattern(&self, or_pattern: bool) -> ParseCtx {
    ParseCtx { or_pattern, ..*self }
  }

  /// Context for a nested expression that is definitely not part of a pattern.
  pub fn nested(&self) -> ParseCtx {
    ParseCtx {
      in_allowed: true,
      or_pattern: false,
      ..*self
    }
  }
}

/// Errors that are only errors for one reading of an ambiguous literal.
#[derive(Clone, Copy, Default, Debug)]
pub struct DeferredErrors {
  // `{ a = 1 }` is only valid as a pattern.
  invalid_expr: Option<Loc>,
  // `[...a, b]` is only valid as an expression.
  invalid_pattern: Option<Loc>,
}

impl DeferredErrors {
  fn merge(&mut self, other: DeferredErrors) {
    self.invalid_expr = self.invalid_expr.or(other.invalid_expr);
    self.invalid_pattern = self.invalid_pattern.or(other.invalid_pattern);
  }
}

/// How an ambiguous literal turned out to be used.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Reading {
  Expr,
  Pattern,
  // Let the enclosing literal decide.
  Undecided,
}

#[derive(Debug)]
#[must_use]
pub struct MaybeToken {
  typ: TT,
  loc: Loc,
  matched: bool,
}

impl MaybeToken {
  pub fn is_match(&self) -> bool {
    self.matched
  }

  pub fn match_loc(&self) -> Option<Loc> {
    if self.matched {
      Some(self.loc)
    } else {
      None
    }
  }

  pub fn error(&self, err: SyntaxErrorType) -> SyntaxError {
    debug_assert!(!self.matched);
    self.loc.error(err, Some(self.typ))
  }
}

#[derive(Clone, Copy)]
pub struct ParserCheckpoint {
  next_tok_i: usize,
}

/// Everything a speculative parse may change.
#[derive(Clone, Copy)]
pub struct Snapshot {
  tokens: ParserCheckpoint,
  log: LogCheckpoint,
  store: StoreSnapshot,
  names: usize,
  import_records: usize,
  deferred: DeferredErrors,
  function_depth: u32,
}

struct BufferedToken {
  token: Token,
  lex_mode: LexMode,
}

pub struct Parser<'a> {
  lexer: Lexer<'a>,
  buf: Vec<BufferedToken>,
  next_tok_i: usize,
  options: ParseOptions,
  pub(crate) store: SymbolStore,
  pub(crate) names: NameTable,
  pub(crate) log: Log,
  pub(crate) import_records: Vec<ImportRecord>,
  deferred: DeferredErrors,
  function_depth: u32,
  pub(crate) has_top_level_return: bool,
  pub(crate) has_es_module_syntax: bool,
}

// We extend this struct with added methods in the various submodules, instead of simply using free functions and passing `&mut Parser` around. `self` is shorter than `parser`, needs no imports, and narrows autocomplete.
impl<'a> Parser<'a> {
  pub fn new(source: &'a str, source_index: u32, options: ParseOptions) -> Parser<'a> {
    Parser {
      lexer: Lexer::new(source),
      buf: Vec::new(),
      next_tok_i: 0,
      options,
      store: SymbolStore::new(source_index, options.ts),
      names: NameTable::new(),
      log: Log::new(),
      import_records: Vec::new(),
      deferred: DeferredErrors::default(),
      function_depth: 0,
      has_top_level_return: false,
      has_es_module_syntax: false,
    }
  }

  pub fn options(&self) -> ParseOptions {
    self.options
  }

  pub fn is_ts(&self) -> bool {
    self.options.ts
  }

  pub fn is_jsx(&self) -> bool {
    self.options.jsx
  }

  pub fn source(&self) -> &'a str {
    self.lexer.source()
  }

  pub fn str(&self, loc: Loc) -> &'a str {
    &self.lexer.source()[loc.0..loc.1]
  }

  pub fn string(&self, loc: Loc) -> String {
    self.str(loc).to_string()
  }

  pub fn checkpoint(&self) -> ParserCheckpoint {
    ParserCheckpoint {
      next_tok_i: self.next_tok_i,
    }
  }

  /// The range from the first token consumed after the checkpoint to the last token consumed.
  pub fn since_checkpoint(&self, checkpoint: &ParserCheckpoint) -> Loc {
    if self.next_tok_i <= checkpoint.next_tok_i {
      let at = self
        .buf
        .get(checkpoint.next_tok_i)
        .map(|t| t.token.loc.0)
        .unwrap_or(self.lexer.next());
      return Loc::at(at);
    };
    let start = self.buf[checkpoint.next_tok_i].token.loc.0;
    let end = self.buf[self.next_tok_i - 1].token.loc.1;
    Loc(start, end)
  }

  pub fn restore_checkpoint(&mut self, checkpoint: ParserCheckpoint) {
    self.next_tok_i = checkpoint.next_tok_i;
  }

  fn reset_to(&mut self, n: usize) {
    self.next_tok_i = n;
    self.buf.truncate(n);
    match self.buf.last() {
      Some(t) => self.lexer.set_next(t.token.loc.1),
      None => self.lexer.set_next(0),
    };
  }

  fn forward<K: FnOnce(&Token) -> bool>(&mut self, mode: LexMode, keep: K) -> (bool, Token) {
    if self
      .buf
      .get(self.next_tok_i)
      .is_some_and(|t| t.lex_mode != mode)
    {
      self.reset_to(self.next_tok_i);
    }
    if self.buf.len() == self.next_tok_i {
      let token = lex_next(&mut self.lexer, mode);
      self.buf.push(BufferedToken {
        token,
        lex_mode: mode,
      });
    }
    let t = self.buf[self.next_tok_i].token.clone();
    let k = keep(&t);
    if k {
      self.next_tok_i += 1;
    };
    (k, t)
  }

  pub fn consume_with_mode(&mut self, mode: LexMode) -> Token {
    self.forward(mode, |_| true).1
  }

  pub fn consume(&mut self) -> Token {
    self.consume_with_mode(LexMode::Standard)
  }

  pub fn peek_with_mode(&mut self, mode: LexMode) -> Token {
    self.forward(mode, |_| false).1
  }

  pub fn peek(&mut self) -> Token {
    self.peek_with_mode(LexMode::Standard)
  }

  pub fn peek_2(&mut self) -> (Token, Token) {
    let cp = self.checkpoint();
    let a = self.consume();
    let b = self.consume();
    self.restore_checkpoint(cp);
    (a, b)
  }

  pub fn peek_3(&mut self) -> (Token, Token, Token) {
    let cp = self.checkpoint();
    let a = self.consume();
    let b = self.consume();
    let c = self.consume();
    self.restore_checkpoint(cp);
    (a, b, c)
  }

  pub fn maybe_consume_with_mode(&mut self, typ: TT, mode: LexMode) -> MaybeToken {
    let (matched, t) = self.forward(mode, |t| t.typ == typ);
    MaybeToken {
      typ,
      matched,
      loc: t.loc,
    }
  }

  pub fn consume_if(&mut self, typ: TT) -> MaybeToken {
    self.maybe_consume_with_mode(typ, LexMode::Standard)
  }

  pub fn consume_if_pred<F: FnOnce(&Token) -> bool>(&mut self, pred: F) -> MaybeToken {
    let (matched, t) = self.forward(LexMode::Standard, pred);
    MaybeToken {
      typ: t.typ,
      matched,
      loc: t.loc,
    }
  }

  pub fn require_with_mode(&mut self, typ: TT, mode: LexMode) -> SyntaxResult<Token> {
    let t = self.consume_with_mode(mode);
    if t.typ != typ {
      Err(t.error(SyntaxErrorType::RequiredTokenNotFound(typ)))
    } else {
      Ok(t)
    }
  }

  pub fn require_predicate<P: FnOnce(TT) -> bool>(
    &mut self,
    pred: P,
    expected: &'static str,
  ) -> SyntaxResult<Token> {
    let t = self.consume_with_mode(LexMode::Standard);
    if !pred(t.typ) {
      Err(t.error(SyntaxErrorType::ExpectedSyntax(expected)))
    } else {
      Ok(t)
    }
  }

  pub fn require(&mut self, typ: TT) -> SyntaxResult<Token> {
    self.require_with_mode(typ, LexMode::Standard)
  }

  /// Whether the token is the identifier `word`, written without escapes.
  pub fn is_word(&self, t: &Token, word: &str) -> bool {
    t.typ == TT::Identifier && self.str(t.loc) == word
  }

  pub fn peek_is_word(&mut self, word: &str) -> bool {
    let t = self.peek();
    self.is_word(&t, word)
  }

  pub fn consume_if_word(&mut self, word: &str) -> bool {
    let t = self.peek();
    if self.is_word(&t, word) {
      self.consume();
      true
    } else {
      false
    }
  }

  pub fn require_word(&mut self, word: &'static str) -> SyntaxResult<Token> {
    let t = self.consume();
    if !self.is_word(&t, word) {
      return Err(t.error(SyntaxErrorType::ExpectedSyntax(word)));
    };
    Ok(t)
  }

  /// Splits a token starting with `>` (such as `>>` or `>=`) so that a type argument list can be
  /// closed, and consumes the leading `>`.
  pub fn require_chevron_right(&mut self) -> SyntaxResult<Token> {
    let t = self.peek();
    match t.typ {
      TT::ChevronRight => Ok(self.consume()),
      TT::ChevronRightChevronRight
      | TT::ChevronRightChevronRightChevronRight
      | TT::ChevronRightEquals
      | TT::ChevronRightChevronRightEquals
      | TT::ChevronRightChevronRightChevronRightEquals => {
        let i = self.next_tok_i;
        self.reset_to(i);
        self.lexer.set_next(t.loc.0 + 1);
        let split = Token {
          loc: Loc(t.loc.0, t.loc.0 + 1),
          typ: TT::ChevronRight,
          preceded_by_line_terminator: t.preceded_by_line_terminator,
        };
        self.buf.push(BufferedToken {
          token: split.clone(),
          lex_mode: LexMode::Standard,
        });
        self.next_tok_i += 1;
        Ok(split)
      }
      _ => Err(t.error(SyntaxErrorType::RequiredTokenNotFound(TT::ChevronRight))),
    }
  }

  /// Consumes a semicolon, or accepts an automatically inserted one.
  pub fn require_semicolon(&mut self) -> SyntaxResult<()> {
    let t = self.peek();
    match t.typ {
      TT::Semicolon => {
        self.consume();
        Ok(())
      }
      TT::BraceClose | TT::EOF => Ok(()),
      _ if t.preceded_by_line_terminator => Ok(()),
      _ => Err(t.error(SyntaxErrorType::RequiredTokenNotFound(TT::Semicolon))),
    }
  }

  pub fn snapshot(&self) -> Snapshot {
    Snapshot {
      tokens: self.checkpoint(),
      log: self.log.checkpoint(),
      store: self.store.snapshot(),
      names: self.names.len(),
      import_records: self.import_records.len(),
      deferred: self.deferred,
      function_depth: self.function_depth,
    }
  }

  pub fn rollback(&mut self, snapshot: Snapshot) {
    self.restore_checkpoint(snapshot.tokens);
    self.log.restore(snapshot.log);
    self.store.rollback(snapshot.store);
    self.names.truncate(snapshot.names);
    self.import_records.truncate(snapshot.import_records);
    self.deferred = snapshot.deferred;
    self.function_depth = snapshot.function_depth;
  }

  /// Attempts a sub-parse. If it fails, every change it made is undone and None is returned.
  pub fn speculate<T, F>(&mut self, f: F) -> Option<T>
  where
    F: FnOnce(&mut Self) -> SyntaxResult<T>,
  {
    let snapshot = self.snapshot();
    match f(self) {
      Ok(v) => Some(v),
      Err(err) => {
        trace!(error = %err, "speculative parse rolled back");
        self.rollback(snapshot);
        None
      }
    }
  }

  /// Starts collecting deferred errors for a new literal, returning the enclosing collector.
  pub fn begin_deferred(&mut self) -> DeferredErrors {
    std::mem::take(&mut self.deferred)
  }

  /// Settles the errors collected since `begin_deferred`.
  pub fn end_deferred(&mut self, outer: DeferredErrors, reading: Reading) {
    let inner = std::mem::replace(&mut self.deferred, outer);
    match reading {
      Reading::Expr => {
        if let Some(loc) = inner.invalid_expr {
          self.issue(
            Issue::InvalidShorthandInitializer,
            loc,
            "shorthand property initializers are only allowed in destructuring patterns",
          );
        };
      }
      Reading::Pattern => {
        if let Some(loc) = inner.invalid_pattern {
          self.issue(
            Issue::InvalidRestElement,
            loc,
            "a rest element must be last in a destructuring pattern",
          );
        };
      }
      Reading::Undecided => self.deferred.merge(inner),
    }
  }

  pub fn defer_invalid_expr(&mut self, loc: Loc) {
    self.deferred.invalid_expr.get_or_insert(loc);
  }

  pub fn defer_invalid_pattern(&mut self, loc: Loc) {
    self.deferred.invalid_pattern.get_or_insert(loc);
  }

  pub fn issue(&mut self, issue: Issue, loc: Loc, message: impl Into<String>) {
    self.log.add(issue.diagnostic(loc, message));
  }

  /// The name of an identifier token, decoding escapes if there are any.
  pub fn name_of(&mut self, t: &Token) -> SyntaxResult<Name> {
    let raw = self.str(t.loc);
    if !raw.contains('\\') {
      return Ok(Name::borrowed(t.loc));
    };
    let decoded = decode_identifier(raw).ok_or_else(|| t.error(SyntaxErrorType::InvalidCharacterEscape))?;
    Ok(self.names.own(decoded))
  }

  pub fn identifier_text(&self, t: &Token) -> SyntaxResult<String> {
    decode_identifier(self.str(t.loc)).ok_or_else(|| t.error(SyntaxErrorType::InvalidCharacterEscape))
  }

  pub fn declare(&mut self, kind: SymbolKind, name: &str, loc: Loc) -> SymbolRef {
    self.store.declare(kind, name, loc, &mut self.log)
  }

  pub fn enter_scope(&mut self, kind: ScopeKind, loc: usize) -> usize {
    self.store.enter_scope(kind, loc)
  }

  pub fn leave_scope(&mut self) {
    self.store.leave_scope();
  }

  pub fn add_import_record(&mut self, path: String, kind: ImportKind, loc: Loc) -> u32 {
    let index = self.import_records.len() as u32;
    self.import_records.push(ImportRecord { path, kind, loc });
    index
  }

  pub fn in_function(&self) -> bool {
    self.function_depth > 0
  }

  pub fn top_level(&mut self) -> SyntaxResult<Node<TopLevel>> {
    let ctx = ParseCtx {
      rules: ParsePatternRules {
        // Top-level await.
        await_allowed: true,
        yield_allowed: false,
      },
      in_allowed: true,
      or_pattern: false,
    };
    let body = self.stmts_with_directives(ctx, TT::EOF)?;
    self.require(TT::EOF)?;
    Ok(Node::new(Loc(0, self.source().len()), TopLevel { body }))
  }
}
