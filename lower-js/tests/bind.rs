mod common;

use common::analyze_ok;
use common::assert_printed;
use common::error_messages;
use common::esnext;
use common::mangled;
use common::print::print;
use common::ts;
use common::warning_messages;
use lower_js::analyze;
use lower_js::defines::ProcessedDefines;
use lower_js::options::LowerOptions;
use lower_js::options::Target;
use lower_js::NamedExport;
use parse_js::import_record::ImportKind;
use parse_js::symbol::SymbolKind;
use std::sync::Arc;

#[test]
fn var_then_let_is_a_duplicate() {
  let errors = error_messages("var x; let x", &esnext());
  assert_eq!(errors.len(), 1, "{:?}", errors);
  assert!(errors[0].contains('x'), "{}", errors[0]);
}

#[test]
fn block_var_then_function_let_is_a_duplicate() {
  assert!(!error_messages("function f() { { var x } let x }", &esnext()).is_empty());
  assert!(!error_messages("function f() { let x; { var x } }", &esnext()).is_empty());
  assert!(error_messages("function f() { var x; { var x } }", &esnext()).is_empty());
}

#[test]
fn hoisted_vars_share_one_symbol() {
  let ast = analyze_ok("{ var x } var x", &esnext());
  assert_eq!(ast.log.errors().count(), 0);
  let x = ast.scopes.get(ast.module_scope).members["x"];
  assert_eq!(ast.symbols[x].kind, SymbolKind::Hoisted);
  assert_eq!(ast.parts_declaring(x).len(), 2);
}

#[test]
fn enum_members_inline_as_constants() {
  assert_printed(
    "enum E { A, B = 5, C }\nlet y = E.C + E.A;",
    &ts(Target::ESNext),
    r#"
var E;
(function(E) {
  E[E["A"] = 0] = "A";
  E[E["B"] = 5] = "B";
  E[E["C"] = 6] = "C";
})(E || (E = {}));
let y = 6 + 0;
"#,
  );
}

#[test]
fn enum_initializers_fold_without_mangle() {
  assert_printed(
    "enum E { A = 1 << 2, B }",
    &ts(Target::ESNext),
    r#"
var E;
(function(E) {
  E[E["A"] = 4] = "A";
  E[E["B"] = 5] = "B";
})(E || (E = {}));
"#,
  );
}

#[test]
fn parts_track_dependencies() {
  let ast = analyze_ok("const a = 1;\nfunction f() { return a; }\nf();", &esnext());
  assert_eq!(ast.parts.len(), 3);
  let a = ast.scopes.get(ast.module_scope).members["a"];
  let f = ast.scopes.get(ast.module_scope).members["f"];
  assert_eq!(ast.parts[0].declared_symbols, vec![a]);
  assert_eq!(ast.parts[1].declared_symbols, vec![f]);
  assert!(ast.parts[1].dependencies.contains(&0));
  assert!(ast.parts[2].dependencies.contains(&1));
  assert!(!ast.parts[2].dependencies.contains(&0));
  assert!(ast.parts[0].can_be_removed_if_unused);
  assert!(ast.parts[1].can_be_removed_if_unused);
  assert!(!ast.parts[2].can_be_removed_if_unused);
  assert_eq!(ast.top_level_symbol_to_parts[&a], vec![0]);
}

#[test]
fn module_interface() {
  let source = r#"
import d, {a, b as c} from "x";
export {c};
export * from "y";
export * as ns from "z";
export {e as f} from "w";
export const g = 1;
export default 2;
"#;
  let ast = analyze_ok(source, &esnext());
  assert!(ast.has_es_module_syntax);
  assert_eq!(ast.named_imports.len(), 3);
  let aliases: Vec<Option<&str>> = ast.named_imports.values().map(|i| i.alias.as_deref()).collect();
  assert!(aliases.contains(&Some("default")));
  assert!(aliases.contains(&Some("a")));
  assert!(aliases.contains(&Some("b")));

  let keys: Vec<&str> = ast.named_exports.keys().map(|k| k.as_str()).collect();
  assert_eq!(keys, vec!["c", "default", "f", "g", "ns"]);
  match &ast.named_exports["c"] {
    NamedExport::Local { symbol } => assert!(ast.named_imports.contains_key(symbol)),
    other => panic!("expected a local export, got {:?}", other),
  };
  match &ast.named_exports["ns"] {
    NamedExport::ReExport { import_record, imported } => {
      assert_eq!(ast.import_records[*import_record as usize].path, "z");
      assert_eq!(*imported, None);
    }
    other => panic!("expected a re-export, got {:?}", other),
  };
  assert!(matches!(
    &ast.named_exports["f"],
    NamedExport::ReExport { imported: Some(name), .. } if name == "e"
  ));
  assert_eq!(ast.export_star_import_records.len(), 1);
  let star = ast.export_star_import_records[0] as usize;
  assert_eq!(ast.import_records[star].path, "y");
  assert!(ast.parts[0].import_record_indices.contains(&0));
}

#[test]
fn ts_drops_imports_only_used_as_types() {
  assert_printed(
    "import {A, b} from \"x\";\nimport {T} from \"t\";\nimport \"side\";\nlet y: A = b;\nlet z: T;",
    &ts(Target::ESNext),
    r#"
import {b} from "x";
import "side";
let y = b;
let z;
"#,
  );
}

#[test]
fn js_keeps_unused_imports() {
  assert_printed("import {a} from \"x\";", &esnext(), "import {a} from \"x\";");
}

#[test]
fn dead_branch_uses_do_not_keep_imports() {
  let options = LowerOptions {
    mangle_syntax: true,
    ..ts(Target::ESNext)
  };
  let ast = analyze_ok("import {a} from \"x\";\nif (false) a();", &options);
  assert_eq!(print(&ast), "");
}

#[test]
fn commonjs_references_are_detected() {
  let ast = analyze_ok("exports.a = 1;\nmodule.exports.b = 2;", &esnext());
  assert!(ast.uses_exports_ref);
  assert!(ast.uses_module_ref);
  assert!(!ast.has_es_module_syntax);

  let ast = analyze_ok("let exports = {}; exports.a = 1;", &esnext());
  assert!(!ast.uses_exports_ref);
}

#[test]
fn require_is_an_import_record_when_bundling() {
  let options = LowerOptions {
    is_bundling: true,
    ..esnext()
  };
  let ast = analyze_ok("const x = require(\"y\");", &options);
  assert_eq!(ast.import_records.len(), 1);
  assert_eq!(ast.import_records[0].kind, ImportKind::Require);
  assert_eq!(ast.import_records[0].path, "y");
  assert_eq!(ast.parts[0].import_record_indices, vec![0]);

  let ast = analyze_ok("const x = require(\"y\");", &esnext());
  assert!(ast.import_records.is_empty());
}

#[test]
fn dynamic_import_belongs_to_its_part() {
  let ast = analyze_ok("let a = 1;\nimport(\"x\");", &esnext());
  assert_eq!(ast.import_records[0].kind, ImportKind::Dynamic);
  assert!(ast.parts[0].import_record_indices.is_empty());
  assert_eq!(ast.parts[1].import_record_indices, vec![0]);
}

#[test]
fn typeof_unbound_is_removable() {
  let ast = analyze_ok("typeof x;\nx;", &esnext());
  assert!(ast.parts[0].can_be_removed_if_unused);
  assert!(!ast.parts[1].can_be_removed_if_unused);
  let ast = analyze_ok("typeof x;", &mangled(Target::ESNext));
  assert_eq!(print(&ast), "");
}

#[test]
fn defines_replace_identifiers_and_chains() {
  let defines = ProcessedDefines::new([
    ("DEBUG", "false"),
    ("process.env.NODE_ENV", "\"production\""),
  ])
  .expect("valid defines");
  let options = LowerOptions {
    mangle_syntax: true,
    defines: Some(Arc::new(defines)),
    ..esnext()
  };
  assert_printed(
    "x = DEBUG;\nif (process.env.NODE_ENV === \"production\") a();",
    &options,
    "x = false;\na();",
  );
}

#[test]
fn defines_skip_assignment_targets() {
  let defines = ProcessedDefines::new([("DEBUG", "false")]).expect("valid defines");
  let options = LowerOptions {
    defines: Some(Arc::new(defines)),
    ..esnext()
  };
  assert_printed("DEBUG = 1;", &options, "DEBUG = 1;");
}

#[test]
fn comparison_warnings() {
  let warnings = warning_messages("if (x === -0) {}", &esnext());
  assert_eq!(warnings.len(), 1, "{:?}", warnings);
  assert!(warnings[0].contains("-0"), "{}", warnings[0]);

  let warnings = warning_messages("if (x == []) {}", &esnext());
  assert_eq!(warnings.len(), 1, "{:?}", warnings);
  assert!(warnings[0].contains("always false"), "{}", warnings[0]);

  let warnings = warning_messages("if (typeof x == \"strnig\") {}", &esnext());
  assert_eq!(warnings.len(), 1, "{:?}", warnings);
  assert!(warnings[0].contains("strnig"), "{}", warnings[0]);

  assert!(warning_messages("if (typeof x == \"string\") {}", &esnext()).is_empty());
}

#[test]
fn negative_zero_folds_equal_to_zero() {
  let warnings = warning_messages("x = 0 === -0;", &esnext());
  assert_eq!(warnings.len(), 1);
  assert_printed("x = 0 === -0;", &esnext(), "x = true;");
}

#[test]
fn unsupported_syntax_is_reported() {
  let errors = error_messages("x = 10n;", &LowerOptions::for_target(Target::ES2019));
  assert_eq!(errors.len(), 1, "{:?}", errors);
  assert!(errors[0].contains("es2019"), "{}", errors[0]);
  assert!(error_messages("x = 10n;", &LowerOptions::for_target(Target::ES2020)).is_empty());

  let errors = error_messages("class A { #x = 1 }", &LowerOptions::for_target(Target::ES2021));
  assert_eq!(errors.len(), 1, "{:?}", errors);
  let errors = error_messages("class A { static { a(); } }", &LowerOptions::for_target(Target::ES2021));
  assert_eq!(errors.len(), 1, "{:?}", errors);
}

#[test]
fn undeclared_private_name_is_an_error() {
  let errors = error_messages("class A { f() { return this.#y; } }", &esnext());
  assert_eq!(errors.len(), 1, "{:?}", errors);
  assert!(errors[0].contains("private name"), "{}", errors[0]);
}

#[test]
fn runtime_helpers_are_recorded() {
  let ast = analyze_ok("x = a ** b;\ny = c ** d;", &LowerOptions::for_target(Target::ES2015));
  assert_eq!(ast.runtime_helpers.len(), 1);
  let pow = ast.runtime_helpers["__pow"];
  let helper_part = ast.parts.len() as u32 - 1;
  assert_eq!(ast.parts_declaring(pow), &[helper_part]);
  assert!(ast.parts[0].dependencies.contains(&helper_part));
  assert!(ast.parts[1].dependencies.contains(&helper_part));
}

#[test]
fn top_level_return_is_recorded() {
  assert!(analyze_ok("return;", &esnext()).has_top_level_return);
  assert!(!analyze_ok("function f() { return; }", &esnext()).has_top_level_return);
}

#[test]
fn syntax_errors_fail() {
  let failure = match analyze("let a; let a; (", 0, &esnext()) {
    Ok(_) => panic!("expected a syntax error"),
    Err(failure) => failure,
  };
  assert_eq!(failure.log.len(), 1);
  assert!(!failure.to_string().is_empty());
}

#[test]
fn ast_serializes_to_json() {
  let ast = analyze_ok("import {a} from \"x\";\nexport const b = a ?? 1;", &esnext());
  let json = serde_json::to_value(&ast).expect("serializes");
  assert_eq!(json["parts"].as_array().map(|p| p.len()), Some(2));
  assert!(json["named_imports"].is_array());
  assert_eq!(json["has_es_module_syntax"], serde_json::Value::Bool(true));
}

#[test]
fn erased_declarations_do_not_disturb_earlier_bindings() {
  assert_printed(
    "enum E { A }\ndeclare enum E { B }",
    &ts(Target::ESNext),
    r#"
var E;
(function(E) {
  E[E["A"] = 0] = "A";
})(E || (E = {}));
"#,
  );
  let ast = analyze_ok("import {X} from \"y\";\ndeclare const X: number;\nlet z = X;", &ts(Target::ESNext));
  assert_eq!(ast.log.errors().count(), 0);
  let x = ast.scopes.get(ast.module_scope).members["X"];
  assert_eq!(ast.symbols.follow(x), x);
  assert_eq!(ast.symbols[x].kind, SymbolKind::Import);
  assert_eq!(print(&ast), "import {X} from \"y\";\nlet z = X;\n");
}
