//! Parses JavaScript, TypeScript and JSX while building the scope tree and declaring symbols.
//!
//! The result of [`parse`] still contains unresolved identifier references. A second pass (see the
//! `lower-js` crate) replays the recorded scope order to bind them.

use ast::node::Node;
use ast::stmt::TopLevel;
use diagnostics::Log;
use error::SyntaxError;
use import_record::ImportRecord;
use name::NameTable;
use options::ParseOptions;
use parse::Parser;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use store::SymbolStore;
use tracing::debug;

pub mod ast;
pub mod char;
pub mod error;
pub mod import_record;
pub mod lex;
pub mod loc;
pub mod name;
pub mod num;
pub mod operator;
pub mod options;
pub mod parse;
pub mod scope;
pub mod store;
pub mod symbol;
pub mod sync;
pub mod token;

/// Everything the first pass produces for one file.
pub struct Parsed {
  pub top_level: Node<TopLevel>,
  pub store: SymbolStore,
  // Names with escapes or synthesized by the parser, referred to by `Name::Owned`.
  pub names: NameTable,
  pub log: Log,
  pub import_records: Vec<ImportRecord>,
  pub has_top_level_return: bool,
  pub has_es_module_syntax: bool,
}

/// A fatal syntax error, with the recoverable errors and warnings reported before it.
#[derive(Debug)]
pub struct ParseFailure {
  pub error: SyntaxError,
  pub log: Log,
}

impl Display for ParseFailure {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    Display::fmt(&self.error, f)
  }
}

impl std::error::Error for ParseFailure {}

pub fn parse(source: &str, source_index: u32, options: ParseOptions) -> Result<Parsed, ParseFailure> {
  let mut parser = Parser::new(source, source_index, options);
  match parser.top_level() {
    Ok(top_level) => {
      debug!(
        scopes = parser.store.scopes.len(),
        symbols = parser.store.symbols.len(),
        "parsed"
      );
      Ok(Parsed {
        top_level,
        store: parser.store,
        names: parser.names,
        log: parser.log,
        import_records: parser.import_records,
        has_top_level_return: parser.has_top_level_return,
        has_es_module_syntax: parser.has_es_module_syntax,
      })
    }
    Err(error) => Err(ParseFailure {
      error,
      log: parser.log,
    }),
  }
}
