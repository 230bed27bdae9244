#![allow(dead_code)]

pub mod print;

use lower_js::analyze;
use lower_js::options::LowerOptions;
use lower_js::options::Target;
use lower_js::parts::Ast;
use parse_js::options::ParseOptions;
use similar::ChangeTag;
use similar::TextDiff;

pub fn analyze_ok(source: &str, options: &LowerOptions) -> Ast {
  match analyze(source, 0, options) {
    Ok(ast) => ast,
    Err(failure) => panic!("failed to analyze {:?}: {}", source, failure),
  }
}

pub fn es5() -> LowerOptions {
  LowerOptions::for_target(Target::ES5)
}

pub fn esnext() -> LowerOptions {
  LowerOptions::for_target(Target::ESNext)
}

pub fn mangled(target: Target) -> LowerOptions {
  LowerOptions {
    mangle_syntax: true,
    ..LowerOptions::for_target(target)
  }
}

pub fn ts(target: Target) -> LowerOptions {
  LowerOptions {
    parse: ParseOptions::ts(),
    ..LowerOptions::for_target(target)
  }
}

pub fn jsx() -> LowerOptions {
  LowerOptions {
    parse: ParseOptions::jsx(),
    ..LowerOptions::for_target(Target::ESNext)
  }
}

/// Compares the printed output line by line, showing a diff on mismatch.
pub fn assert_printed(source: &str, options: &LowerOptions, expected: &str) {
  let ast = analyze_ok(source, options);
  let errors: Vec<_> = ast.log.errors().map(|d| d.message.clone()).collect();
  assert!(errors.is_empty(), "unexpected errors for {:?}: {:?}", source, errors);
  let actual = print::print(&ast);
  let expected = format!("{}\n", expected.trim());
  if actual != expected {
    let mut msg = format!("Output of {:?} differs:\n", source);
    let diff = TextDiff::from_lines(&expected, &actual);
    for change in diff.iter_all_changes() {
      let sign = match change.tag() {
        ChangeTag::Delete => "-",
        ChangeTag::Insert => "+",
        ChangeTag::Equal => " ",
      };
      msg.push_str(sign);
      msg.push_str(change.as_str().unwrap_or_default());
    }
    panic!("{}", msg);
  };
}

/// Messages of every error reported for `source`, whether or not analysis failed.
pub fn error_messages(source: &str, options: &LowerOptions) -> Vec<String> {
  match analyze(source, 0, options) {
    Ok(ast) => ast.log.errors().map(|d| d.message.clone()).collect(),
    Err(failure) => {
      let mut messages: Vec<String> = failure.log.errors().map(|d| d.message.clone()).collect();
      messages.push(failure.to_string());
      messages
    }
  }
}

pub fn warning_messages(source: &str, options: &LowerOptions) -> Vec<String> {
  analyze_ok(source, options)
    .log
    .warnings()
    .map(|d| d.message.clone())
    .collect()
}
