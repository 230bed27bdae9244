//! Diagnostics model and per-file message log.
//!
//! Analysis of a single file produces at most one fatal error (returned as an
//! `Err` by the parser) plus any number of recoverable errors and warnings,
//! which are appended to a [`Log`] and never interrupt analysis.
//!
//! ```
//! use diagnostics::render::render_diagnostic;
//! use diagnostics::{Log, TextRange};
//!
//! let mut log = Log::new();
//! log.add_error("BIND0001", "\"x\" has already been declared", TextRange::new(11, 12));
//! let rendered = render_diagnostic("example.js", "var x; let x;", &log.diagnostics()[0]);
//! assert!(rendered.contains("--> example.js:1:12"));
//! ```

pub mod render;

use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

/// A byte range in the source text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
pub struct TextRange {
  pub start: u32,
  pub end: u32,
}

impl TextRange {
  pub const fn new(start: u32, end: u32) -> Self {
    Self { start, end }
  }

  pub fn len(&self) -> u32 {
    self.end.saturating_sub(self.start)
  }

  pub fn is_empty(&self) -> bool {
    self.start >= self.end
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum Severity {
  Error,
  Warning,
  Note,
}

impl Severity {
  pub const fn as_str(&self) -> &'static str {
    match self {
      Severity::Error => "error",
      Severity::Warning => "warning",
      Severity::Note => "note",
    }
  }
}

impl Display for Severity {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A secondary location attached to a diagnostic, e.g. the original declaration for a redeclaration error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Label {
  pub range: TextRange,
  pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
  pub code: &'static str,
  pub severity: Severity,
  pub message: String,
  pub range: TextRange,
  pub labels: Vec<Label>,
  pub notes: Vec<String>,
}

impl Diagnostic {
  pub fn new(
    severity: Severity,
    code: &'static str,
    message: impl Into<String>,
    range: TextRange,
  ) -> Self {
    Self {
      code,
      severity,
      message: message.into(),
      range,
      labels: Vec::new(),
      notes: Vec::new(),
    }
  }

  pub fn error(code: &'static str, message: impl Into<String>, range: TextRange) -> Self {
    Self::new(Severity::Error, code, message, range)
  }

  pub fn warning(code: &'static str, message: impl Into<String>, range: TextRange) -> Self {
    Self::new(Severity::Warning, code, message, range)
  }

  pub fn with_label(mut self, range: TextRange, message: impl Into<String>) -> Self {
    self.labels.push(Label {
      range,
      message: message.into(),
    });
    self
  }

  pub fn with_note(mut self, note: impl Into<String>) -> Self {
    self.notes.push(note.into());
    self
  }
}

/// Ordered collection of the recoverable errors and warnings raised while analyzing one file.
///
/// Speculative parses take a [`LogCheckpoint`] and roll back to it when the attempt is abandoned, so
/// only messages from the interpretation that was kept survive.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Log {
  diagnostics: Vec<Diagnostic>,
}

#[derive(Clone, Copy, Debug)]
pub struct LogCheckpoint(usize);

impl Log {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, diagnostic: Diagnostic) {
    self.diagnostics.push(diagnostic);
  }

  pub fn add_error(&mut self, code: &'static str, message: impl Into<String>, range: TextRange) {
    self.add(Diagnostic::error(code, message, range));
  }

  pub fn add_warning(&mut self, code: &'static str, message: impl Into<String>, range: TextRange) {
    self.add(Diagnostic::warning(code, message, range));
  }

  pub fn checkpoint(&self) -> LogCheckpoint {
    LogCheckpoint(self.diagnostics.len())
  }

  pub fn restore(&mut self, checkpoint: LogCheckpoint) {
    self.diagnostics.truncate(checkpoint.0);
  }

  pub fn diagnostics(&self) -> &[Diagnostic] {
    &self.diagnostics
  }

  pub fn into_diagnostics(self) -> Vec<Diagnostic> {
    self.diagnostics
  }

  pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
    self
      .diagnostics
      .iter()
      .filter(|d| d.severity == Severity::Error)
  }

  pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
    self
      .diagnostics
      .iter()
      .filter(|d| d.severity == Severity::Warning)
  }

  pub fn has_errors(&self) -> bool {
    self.errors().next().is_some()
  }

  pub fn len(&self) -> usize {
    self.diagnostics.len()
  }

  pub fn is_empty(&self) -> bool {
    self.diagnostics.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn restore_drops_messages_after_checkpoint() {
    let mut log = Log::new();
    log.add_warning("W", "kept", TextRange::new(0, 1));
    let cp = log.checkpoint();
    log.add_error("E", "speculative", TextRange::new(1, 2));
    assert!(log.has_errors());
    log.restore(cp);
    assert_eq!(log.len(), 1);
    assert!(!log.has_errors());
    assert_eq!(log.warnings().count(), 1);
  }

  #[test]
  fn builder_attaches_labels_and_notes() {
    let d = Diagnostic::error("E", "dup", TextRange::new(4, 5))
      .with_label(TextRange::new(0, 1), "previous declaration")
      .with_note("consider renaming");
    assert_eq!(d.labels.len(), 1);
    assert_eq!(d.labels[0].message, "previous declaration");
    assert_eq!(d.notes, vec!["consider renaming".to_string()]);
  }
}
