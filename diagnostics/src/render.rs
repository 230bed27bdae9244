use crate::Diagnostic;
use crate::TextRange;
use std::fmt::Write;

/// Render a diagnostic into a human-readable string with caret highlighting.
///
/// Only the first line of each highlighted range gets carets; multi-line ranges are marked to the end of
/// their first line.
pub fn render_diagnostic(file_name: &str, text: &str, diagnostic: &Diagnostic) -> String {
  let mut output = String::new();
  let lines = LineIndex::new(text);

  // Writing to a String cannot fail.
  let _ = writeln!(
    output,
    "{}[{}]: {}",
    diagnostic.severity, diagnostic.code, diagnostic.message
  );
  let (line, col) = lines.line_col(text, diagnostic.range.start as usize);
  let _ = writeln!(output, " --> {}:{}:{}", file_name, line + 1, col + 1);

  let mut highlights = vec![(diagnostic.range, diagnostic.message.as_str(), '^')];
  for label in &diagnostic.labels {
    highlights.push((label.range, label.message.as_str(), '-'));
  }
  highlights.sort_by_key(|(range, _, _)| range.start);

  let max_line = highlights
    .iter()
    .map(|(range, _, _)| lines.line_col(text, range.start as usize).0)
    .max()
    .unwrap_or(0);
  let gutter = (max_line + 1).to_string().len();

  let _ = writeln!(output, "{:>gutter$} |", "");
  let mut last_line = None;
  for (range, message, marker) in highlights {
    let (line, col) = lines.line_col(text, range.start as usize);
    if last_line != Some(line) {
      let _ = writeln!(output, "{:>gutter$} | {}", line + 1, lines.line_text(text, line));
      last_line = Some(line);
    };
    let len = underline_len(&lines, text, line, col, range);
    let _ = writeln!(
      output,
      "{:>gutter$} | {}{} {}",
      "",
      " ".repeat(col),
      marker.to_string().repeat(len),
      message
    );
  }
  for note in &diagnostic.notes {
    let _ = writeln!(output, "{:>gutter$} = note: {}", "", note);
  }
  output
}

fn underline_len(lines: &LineIndex, text: &str, line: usize, col: usize, range: TextRange) -> usize {
  let line_chars = lines.line_text(text, line).chars().count();
  let end = range.end.max(range.start) as usize;
  let (end_line, end_col) = lines.line_col(text, end);
  let end_col = if end_line == line { end_col } else { line_chars };
  end_col.saturating_sub(col).max(1)
}

struct LineIndex {
  starts: Vec<usize>,
}

impl LineIndex {
  fn new(text: &str) -> Self {
    let mut starts = vec![0];
    for (i, b) in text.bytes().enumerate() {
      if b == b'\n' {
        starts.push(i + 1);
      };
    }
    Self { starts }
  }

  // Zero-based line and character column.
  fn line_col(&self, text: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
      offset -= 1;
    }
    let line = match self.starts.binary_search(&offset) {
      Ok(l) => l,
      Err(l) => l - 1,
    };
    let col = text[self.starts[line]..offset].chars().count();
    (line, col)
  }

  fn line_text<'t>(&self, text: &'t str, line: usize) -> &'t str {
    let start = self.starts[line];
    let end = self
      .starts
      .get(line + 1)
      .map(|&s| s - 1)
      .unwrap_or(text.len());
    text[start..end].trim_end_matches('\r')
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Diagnostic;

  #[test]
  fn render_single_line_span() {
    let diagnostic = Diagnostic::error("TEST0001", "unused variable", TextRange::new(4, 5));
    let rendered = render_diagnostic("test.js", "let x = 1;", &diagnostic);
    let expected = "error[TEST0001]: unused variable\n --> test.js:1:5\n  |\n1 | let x = 1;\n  |     ^ unused variable\n";
    assert_eq!(rendered, expected);
  }

  #[test]
  fn render_label_on_earlier_line() {
    let text = "var x;\nlet x;";
    let diagnostic = Diagnostic::error("DUP", "\"x\" has already been declared", TextRange::new(11, 12))
      .with_label(TextRange::new(4, 5), "\"x\" was originally declared here");
    let rendered = render_diagnostic("a.js", text, &diagnostic);
    let expected = concat!(
      "error[DUP]: \"x\" has already been declared\n",
      " --> a.js:2:5\n",
      "  |\n",
      "1 | var x;\n",
      "  |     - \"x\" was originally declared here\n",
      "2 | let x;\n",
      "  |     ^ \"x\" has already been declared\n",
    );
    assert_eq!(rendered, expected);
  }

  #[test]
  fn empty_range_gets_one_caret() {
    let diagnostic = Diagnostic::warning("W", "here", TextRange::new(3, 3)).with_note("a note");
    let rendered = render_diagnostic("x.js", "abcdef", &diagnostic);
    assert!(rendered.contains("  |    ^ here\n"));
    assert!(rendered.ends_with("  = note: a note\n"));
  }
}
