use super::Parser;
use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::ast::stmt::Stmt;
use crate::ast::stmt::TopLevel;
use crate::error::Issue;
use crate::error::SyntaxErrorType;
use crate::lex::LexMode;
use crate::loc::Loc;
use crate::options::ParseOptions;
use crate::scope::ScopeKind;
use crate::symbol::SymbolKind;
use crate::token::TT;

fn parse_ok(source: &str, options: ParseOptions) -> (Parser<'_>, Node<TopLevel>) {
  let mut p = Parser::new(source, 0, options);
  let top = match p.top_level() {
    Ok(top) => top,
    Err(err) => panic!("failed to parse {:?}: {}", source, err),
  };
  (p, top)
}

fn codes(p: &Parser) -> Vec<&'static str> {
  p.log.diagnostics().iter().map(|d| d.code).collect()
}

fn root_has(p: &Parser, name: &str) -> bool {
  let root = p.store.scopes.root();
  p.store.scopes.get(root).members.contains_key(name)
}

#[test]
fn token_buffer_and_checkpoints() {
  let mut p = Parser::new("let x = /a/ / 1;", 0, ParseOptions::js());
  let cp = p.checkpoint();
  assert_eq!(p.next_tok_i, 0);

  let t = p.peek();
  assert_eq!(p.next_tok_i, 0);
  assert_eq!(p.buf.len(), 1);
  // Contextual words are plain identifiers.
  assert_eq!(t.typ, TT::Identifier);

  p.consume();
  let t = p.consume();
  assert_eq!(p.next_tok_i, 2);
  assert_eq!(t.typ, TT::Identifier);
  assert_eq!(p.str(t.loc), "x");

  p.restore_checkpoint(cp);
  assert_eq!(p.next_tok_i, 0);
  assert_eq!(p.buf.len(), 2);

  // A different mode relexes from that point.
  let t = p.peek_with_mode(LexMode::SlashIsRegex);
  assert_eq!(p.buf.len(), 1);
  assert_eq!(t.typ, TT::Identifier);
}

#[test]
fn failed_speculation_leaves_no_trace() {
  let mut p = Parser::new("a b c", 0, ParseOptions::js());
  let result: Option<()> = p.speculate(|p| {
    let t = p.consume();
    p.declare(SymbolKind::Hoisted, "x", t.loc);
    p.enter_scope(ScopeKind::Block, t.loc.0);
    p.issue(Issue::UnknownLabel, t.loc, "nope");
    let t = p.consume();
    Err(t.error(SyntaxErrorType::ExpectedSyntax("nothing")))
  });
  assert!(result.is_none());
  assert!(!root_has(&p, "x"));
  assert_eq!(p.store.order.len(), 0);
  assert_eq!(p.store.scopes.current(), p.store.scopes.root());
  assert!(p.log.is_empty());
  let loc = p.peek().loc;
  assert_eq!(p.str(loc), "a");
}

#[test]
fn splits_closing_chevrons() {
  let mut p = Parser::new("a>>b", 0, ParseOptions::ts());
  p.consume();
  let first = p.require_chevron_right().unwrap();
  assert_eq!(first.loc, Loc(1, 2));
  let second = p.require_chevron_right().unwrap();
  assert_eq!(second.loc, Loc(2, 3));
  let loc = p.peek().loc;
  assert_eq!(p.str(loc), "b");
}

#[test]
fn hoists_var_out_of_blocks() {
  let (p, _) = parse_ok("{ var x } var x; function f(a) { let b }", ParseOptions::js());
  assert!(p.log.is_empty(), "{:?}", p.log);
  assert!(root_has(&p, "x"));
  assert!(root_has(&p, "f"));
  assert!(!root_has(&p, "b"));
  let kinds: Vec<ScopeKind> = p
    .store
    .order
    .entries()
    .iter()
    .map(|e| p.store.scopes.get(e.scope).kind)
    .collect();
  assert_eq!(kinds, vec![
    ScopeKind::Block,
    ScopeKind::FunctionArgs,
    ScopeKind::FunctionBody
  ]);
}

#[test]
fn reports_duplicate_lexical_declarations() {
  let (p, _) = parse_ok("var x; let x;", ParseOptions::js());
  assert_eq!(codes(&p), vec![Issue::DuplicateDeclaration.code()]);
}

#[test]
fn parenthesized_expression_is_not_a_scope() {
  let (p, top) = parse_ok("(a, b); (c, d) => c;", ParseOptions::js());
  assert!(matches!(*top.stx.body[0].stx, Stmt::Expr(ref e) if matches!(*e.expr.stx, Expr::Binary(_))));
  assert!(matches!(*top.stx.body[1].stx, Stmt::Expr(ref e) if matches!(*e.expr.stx, Expr::ArrowFunc(_))));
  // Only the arrow keeps its parameter and body scopes.
  assert_eq!(p.store.order.len(), 2);
}

#[test]
fn warns_about_unreturned_expression() {
  let (p, _) = parse_ok("function f() { return\n  1 }", ParseOptions::js());
  assert_eq!(codes(&p), vec![Issue::UnreturnedExpression.code()]);
}

#[test]
fn records_top_level_return() {
  let (p, _) = parse_ok("return;", ParseOptions::js());
  assert!(p.has_top_level_return);
  assert!(!p.has_es_module_syntax);
}

#[test]
fn unknown_label_is_recoverable() {
  let (p, _) = parse_ok("a: for (;;) { break a; continue b; }", ParseOptions::js());
  assert_eq!(codes(&p), vec![Issue::UnknownLabel.code()]);
}

#[test]
fn imports_are_bound_to_their_record() {
  let (p, top) = parse_ok(
    "import a, { b as c } from \"m\"; import * as ns from \"n\"; export { c };",
    ParseOptions::js(),
  );
  assert!(p.has_es_module_syntax);
  assert_eq!(p.import_records.len(), 2);
  assert_eq!(p.import_records[0].path, "m");
  assert_eq!(top.stx.body.len(), 3);
  let root = p.store.scopes.get(p.store.scopes.root());
  for (name, record) in [("a", 0), ("c", 0), ("ns", 1)] {
    let symbol = &p.store.symbols[root.members[name]];
    assert_eq!(symbol.kind, SymbolKind::Import);
    assert_eq!(symbol.import_record_index, Some(record));
  }
  assert!(!root.members.contains_key("b"));
}

#[test]
fn erases_type_only_declarations() {
  let source = "interface I { x: number; f(): void }\n\
    type T<U> = U extends string ? [U] : never;\n\
    declare const d: Map<string, Array<number>>;\n\
    namespace Types { export type A = number }\n\
    import type { X } from \"x\";\n\
    let v: Array<Array<number>> = [];";
  let (p, top) = parse_ok(source, ParseOptions::ts());
  assert!(p.log.is_empty(), "{:?}", p.log);
  let erased = top.stx.body.iter().filter(|s| matches!(*s.stx, Stmt::Erased)).count();
  assert_eq!(erased, 5);
  assert!(!root_has(&p, "d"));
  assert!(!root_has(&p, "Types"));
  assert!(root_has(&p, "v"));
  assert!(p.import_records.is_empty());
}

#[test]
fn parses_enums_and_value_namespaces() {
  let (p, top) = parse_ok(
    "enum E { A, B = 5, C }\nnamespace N { export const x = 1 }",
    ParseOptions::ts(),
  );
  let Stmt::Enum(e) = &*top.stx.body[0].stx else {
    panic!("expected enum, got {:?}", top.stx.body[0]);
  };
  let names: Vec<&str> = e.members.iter().map(|m| m.stx.name.as_str()).collect();
  assert_eq!(names, vec!["A", "B", "C"]);
  assert!(matches!(*top.stx.body[1].stx, Stmt::Namespace(_)));
  assert_eq!(p.store.symbols[p.store.scopes.get(p.store.scopes.root()).members["N"]].kind, SymbolKind::TsNamespace);
  // `export` inside the namespace doesn't make the file a module.
  assert!(!p.has_es_module_syntax);
}

#[test]
fn distinguishes_type_arguments_from_comparisons() {
  let (_, top) = parse_ok("f<T>(x); a < b > c;", ParseOptions::ts());
  assert!(matches!(*top.stx.body[0].stx, Stmt::Expr(ref e) if matches!(*e.expr.stx, Expr::Call(_))));
  assert!(matches!(*top.stx.body[1].stx, Stmt::Expr(ref e) if matches!(*e.expr.stx, Expr::Binary(_))));
}

#[test]
fn import_equals_becomes_a_variable() {
  let (p, top) = parse_ok("import fs = require(\"fs\");\nimport B = A.B;", ParseOptions::ts());
  assert!(matches!(*top.stx.body[0].stx, Stmt::Var(_)));
  assert!(matches!(*top.stx.body[1].stx, Stmt::Var(_)));
  assert_eq!(p.import_records.len(), 1);
  assert!(root_has(&p, "fs"));
  assert!(root_has(&p, "B"));
}

#[test]
fn closing_tag_must_match() {
  let mut p = Parser::new("<a><b></a></b>", 0, ParseOptions::jsx());
  let err = p.top_level().unwrap_err();
  assert_eq!(err.typ, SyntaxErrorType::JsxClosingTagMismatch);
}
