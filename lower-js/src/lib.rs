//! Binds, constant folds and lowers one file parsed by `parse-js`, then splits it into parts.
//!
//! [`analyze`] runs the whole pipeline:
//!
//! 1. `parse_js::parse` builds the tree, the scope tree and the declared symbols.
//! 2. The binder replays the recorded scopes, resolves every identifier, substitutes defines,
//!    folds constants and lowers syntax the [`options::Target`] doesn't support. TypeScript enums
//!    and namespaces and JSX are always lowered.
//! 3. Each top-level statement becomes a [`parts::Part`] with its declared and used symbols, so a
//!    linker can drop the parts nothing depends on.

use defines::ProcessedDefines;
use diagnostics::Log;
use options::LowerOptions;
use parse_js::error::SyntaxError;
use parts::Ast;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use tracing::debug;

mod bind;
pub mod build;
pub mod defines;
pub mod fold;
pub mod helpers;
mod lower;
pub mod options;
pub mod parts;

pub use parts::NamedExport;
pub use parts::NamedImport;
pub use parts::Part;

/// A fatal syntax error, with everything reported before it.
#[derive(Debug)]
pub struct AnalyzeFailure {
  pub error: SyntaxError,
  pub log: Log,
}

impl Display for AnalyzeFailure {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    Display::fmt(&self.error, f)
  }
}

impl std::error::Error for AnalyzeFailure {}

/// Analyzes one file. Recoverable errors and warnings end up in [`Ast::log`]; only syntax errors
/// the parser can't continue past fail.
pub fn analyze(source: &str, source_index: u32, options: &LowerOptions) -> Result<Ast, AnalyzeFailure> {
  let parsed = parse_js::parse(source, source_index, options.parse).map_err(|f| AnalyzeFailure {
    error: f.error,
    log: f.log,
  })?;
  let defines: &ProcessedDefines = match &options.defines {
    Some(defines) => defines,
    None => ProcessedDefines::known_globals(),
  };
  debug!(
    es = options.target.name(),
    mangle = options.mangle_syntax,
    "binding"
  );
  let binder = bind::Binder::new(
    source,
    options,
    defines,
    parsed.store,
    parsed.names,
    parsed.log,
    parsed.import_records,
  );
  Ok(binder.bind(
    parsed.top_level,
    parsed.has_top_level_return,
    parsed.has_es_module_syntax,
  ))
}
