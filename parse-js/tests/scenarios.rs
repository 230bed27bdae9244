use parse_js::ast::stmt::Stmt;
use parse_js::error::Issue;
use parse_js::options::ParseOptions;
use parse_js::parse;
use parse_js::symbol::SymbolKind;

#[test]
fn redeclaring_var_as_let_names_the_symbol() {
  let parsed = parse("var x; let x", 0, ParseOptions::js()).expect("recoverable");
  let errors: Vec<_> = parsed.log.errors().collect();
  assert_eq!(errors.len(), 1);
  assert_eq!(errors[0].code, Issue::DuplicateDeclaration.code());
  assert!(errors[0].message.contains('x'), "{}", errors[0].message);
}

#[test]
fn hoisting_unifies_block_and_module_vars() {
  let parsed = parse("{ var x } var x", 0, ParseOptions::js()).expect("parses");
  assert!(parsed.log.is_empty());
  let root = parsed.store.scopes.get(parsed.store.scopes.root());
  let x = root.members["x"];
  assert_eq!(parsed.store.symbols[x].kind, SymbolKind::Hoisted);
}

#[test]
fn fatal_errors_keep_earlier_diagnostics() {
  let failure = match parse("let a; let a; (", 0, ParseOptions::js()) {
    Ok(_) => panic!("expected a syntax error"),
    Err(failure) => failure,
  };
  assert_eq!(failure.log.len(), 1);
  assert!(!failure.to_string().is_empty());
}

#[test]
fn typescript_only_syntax_needs_the_ts_option() {
  assert!(parse("let x: number = 1", 0, ParseOptions::js()).is_err());
  let parsed = parse("let x: number = 1", 0, ParseOptions::ts()).expect("parses");
  assert!(matches!(*parsed.top_level.stx.body[0].stx, Stmt::Var(_)));
}

#[test]
fn ast_serializes_to_json() {
  let parsed = parse("const a = b?.c ?? 1;", 3, ParseOptions::js()).expect("parses");
  let json = serde_json::to_value(&parsed.top_level).expect("serializes");
  let text = json.to_string();
  assert!(text.contains("Var"), "{}", text);
  assert!(text.contains("\"source_index\":3"), "{}", text);
}

#[test]
fn var_in_unbraced_with_body_is_pinned() {
  for source in ["with (o) var y;", "function f() { with (o) var y; }", "with (o) { var y }"] {
    let parsed = parse(source, 0, ParseOptions::js()).expect("parses");
    let y = parsed
      .store
      .symbols
      .iter()
      .find(|(_, s)| s.original_name == "y")
      .map(|(r, _)| r)
      .expect("y is declared");
    let y = parsed.store.symbols.follow(y);
    assert!(parsed.store.symbols[y].must_not_be_renamed, "{}", source);
  }
}

#[test]
fn rolled_back_declarations_leave_earlier_symbols_intact() {
  let parsed = parse("enum E { A } declare enum E { B }", 0, ParseOptions::ts()).expect("parses");
  let root = parsed.store.scopes.get(parsed.store.scopes.root());
  let e = root.members["E"];
  assert_eq!(parsed.store.symbols.follow(e), e);
  assert_eq!(parsed.store.symbols[e].kind, SymbolKind::TsEnum);
}

fn has_error(source: &str) -> bool {
  match parse(source, 0, ParseOptions::js()) {
    Ok(parsed) => parsed.log.errors().next().is_some(),
    Err(_) => true,
  }
}

#[test]
fn ambiguous_literals_report_errors_for_the_reading_they_get() {
  assert!(has_error("x = ({a = 1})"));
  assert!(!has_error("({a = 1} = x)"));
  assert!(!has_error("[{a = 1}] = x"));
  assert!(has_error("f({a = 1})"));
  assert!(has_error("[...a, b] = c"));
  assert!(!has_error("x = [...a, b]"));
  assert!(!has_error("({a = 1}) => a"));
}

fn error_codes(source: &str) -> Vec<&'static str> {
  let parsed = parse(source, 0, ParseOptions::js()).expect("recoverable");
  parsed.log.errors().map(|d| d.code).collect()
}

#[test]
fn catch_parameter_conflicts() {
  let duplicate = Issue::DuplicateDeclaration.code();
  assert_eq!(error_codes("try {} catch (e) { let e }"), vec![duplicate]);
  assert_eq!(error_codes("try {} catch (e) { class e {} }"), vec![duplicate]);
  assert_eq!(error_codes("try {} catch ({e}) { var e }"), vec![duplicate]);
  assert_eq!(error_codes("try {} catch ([e]) { let e }"), vec![duplicate]);
  assert!(error_codes("try {} catch (e) { var e }").is_empty());
  assert!(error_codes("try {} catch (e) { { let e } }").is_empty());
}

#[test]
fn nested_labels_must_differ() {
  assert_eq!(error_codes("l: l: ;"), vec![Issue::DuplicateLabel.code()]);
  assert_eq!(error_codes("l: { l: ; }"), vec![Issue::DuplicateLabel.code()]);
  assert!(error_codes("l: ; l: ;").is_empty());
  assert!(error_codes("l: { m: ; }").is_empty());
  assert!(error_codes("l: (function () { l: ; });").is_empty());
}
