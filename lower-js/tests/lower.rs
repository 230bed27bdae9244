mod common;

use common::analyze_ok;
use common::assert_printed;
use common::es5;
use common::esnext;
use common::jsx;
use common::mangled;
use common::ts;
use lower_js::options::LowerOptions;
use lower_js::options::Target;

#[test]
fn nullish_coalescing_loose() {
  assert_printed("a ?? b;", &LowerOptions::for_target(Target::ES2019), "a != null ? a : b;");
}

#[test]
fn nullish_coalescing_strict() {
  let options = LowerOptions {
    strict_nullish: true,
    ..LowerOptions::for_target(Target::ES2019)
  };
  assert_printed("a ?? b;", &options, "a !== null && a !== void 0 ? a : b;");
}

#[test]
fn nullish_coalescing_captures_side_effects() {
  assert_printed(
    "a.b ?? c;",
    &LowerOptions::for_target(Target::ES2019),
    r#"
var _a;
(_a = a.b) != null ? _a : c;
"#,
  );
}

#[test]
fn supported_syntax_is_untouched() {
  assert_printed("a ?? b;\na?.b;\nx = a ** b;", &esnext(), "a ?? b;\na?.b;\nx = a ** b;");
}

#[test]
fn optional_member_chain() {
  assert_printed(
    "a?.b.c;",
    &LowerOptions::for_target(Target::ES2019),
    "a == null ? void 0 : a.b.c;",
  );
}

#[test]
fn optional_call_keeps_receiver() {
  assert_printed(
    "a.b?.();",
    &LowerOptions::for_target(Target::ES2019),
    r#"
var _a;
(_a = a.b) == null ? void 0 : _a.call(a);
"#,
  );
}

#[test]
fn optional_call_on_computed_member_captures_receiver_before_key() {
  assert_printed(
    "a[(a = {n: 2}, \"f\")]?.();",
    &LowerOptions::for_target(Target::ES2019),
    r#"
var _a, _b;
(_b = (_a = a)[a = { n: 2 }, "f"]) == null ? void 0 : _b.call(_a);
"#,
  );
  assert_printed(
    "a?.[(a = {n: 2}, \"f\")]?.();",
    &LowerOptions::for_target(Target::ES2019),
    r#"
var _a, _b;
(_b = a == null ? void 0 : (_a = a)[a = { n: 2 }, "f"]) == null ? void 0 : _b.call(_a);
"#,
  );
}

#[test]
fn chained_optional_links_evaluate_side_effects_once() {
  let ast = analyze_ok("f()?.a?.[g()]?.();", &LowerOptions::for_target(Target::ES2019));
  let out = common::print::print(&ast);
  assert_eq!(out.matches("f()").count(), 1, "{}", out);
  assert_eq!(out.matches("g()").count(), 1, "{}", out);
  assert!(!out.contains("?."), "{}", out);
}

#[test]
fn optional_chain_on_void_literal_is_undefined() {
  assert_printed("(void 0)?.x;", &LowerOptions::for_target(Target::ES2019), "void 0;");
}

#[test]
fn optional_delete() {
  assert_printed(
    "delete a?.b;",
    &LowerOptions::for_target(Target::ES2019),
    "a == null ? true : delete a.b;",
  );
}

#[test]
fn exponentiation_uses_runtime_helper() {
  assert_printed(
    "x = a ** b;",
    &LowerOptions::for_target(Target::ES2015),
    r#"
x = __pow(a, b);
import {__pow} from "<runtime>";
"#,
  );
}

#[test]
fn object_spread_uses_runtime_helper() {
  assert_printed(
    "x = {...a, b: 1};",
    &LowerOptions::for_target(Target::ES2017),
    r#"
x = __assign(__assign({}, a), { b: 1 });
import {__assign} from "<runtime>";
"#,
  );
}

#[test]
fn logical_assignment_on_const_object() {
  assert_printed(
    "const o = {};\no.b ||= c;",
    &LowerOptions::for_target(Target::ES2020),
    "const o = {};\no.b || (o.b = c);",
  );
}

#[test]
fn logical_assignment_captures_object() {
  assert_printed(
    "a.b &&= c;",
    &LowerOptions::for_target(Target::ES2020),
    r#"
var _a;
(_a = a).b && (_a.b = c);
"#,
  );
}

#[test]
fn nullish_assignment_without_nullish_support() {
  assert_printed(
    "a ??= b;",
    &LowerOptions::for_target(Target::ES2019),
    "a != null ? a : a = b;",
  );
}

#[test]
fn static_field_moves_after_class() {
  assert_printed(
    "class Foo { static foo = 1 }",
    &LowerOptions::for_target(Target::ES2020),
    r#"
class Foo {}
Foo.foo = 1;
"#,
  );
}

#[test]
fn instance_field_moves_into_new_constructor() {
  assert_printed(
    "class A { x = 1 }",
    &LowerOptions::for_target(Target::ES2020),
    r#"
class A {
  constructor() {
    this.x = 1;
  }
}
"#,
  );
}

#[test]
fn instance_field_follows_super_call() {
  assert_printed(
    "class A extends B { x = 1; constructor() { f(); super(); g(); } }",
    &LowerOptions::for_target(Target::ES2020),
    r#"
class A extends B {
  constructor() {
    f();
    super();
    this.x = 1;
    g();
  }
}
"#,
  );
}

#[test]
fn derived_class_gets_forwarding_constructor() {
  assert_printed(
    "class A extends B { x = 1 }",
    &LowerOptions::for_target(Target::ES2020),
    r#"
class A extends B {
  constructor(...args) {
    super(...args);
    this.x = 1;
  }
}
"#,
  );
}

#[test]
fn moved_computed_keys_keep_evaluation_order() {
  assert_printed(
    "class A { [a()] = 1; [m()]() {} static [b()] = 2 }",
    &LowerOptions::for_target(Target::ES2020),
    r#"
var _a, _b;
class A {
  constructor() {
    this[_a] = 1;
  }
  [(_a = a(), m())]() {}
}
_b = b();
A[_b] = 2;
"#,
  );
}

#[test]
fn class_fields_kept_when_supported() {
  assert_printed(
    "class A { static x = 1; y = 2; }",
    &esnext(),
    r#"
class A {
  static x = 1;
  y = 2;
}
"#,
  );
}

#[test]
fn ts_parameter_properties_expand() {
  assert_printed(
    "class A { constructor(public x: number) {} }",
    &ts(Target::ESNext),
    r#"
class A {
  constructor(x) {
    this.x = x;
  }
}
"#,
  );
}

#[test]
fn enum_auto_increments() {
  assert_printed(
    "enum E { A, B = 5, C }",
    &ts(Target::ESNext),
    r#"
var E;
(function(E) {
  E[E["A"] = 0] = "A";
  E[E["B"] = 5] = "B";
  E[E["C"] = 6] = "C";
})(E || (E = {}));
"#,
  );
}

#[test]
fn enum_initializers_fold_qualified_earlier_members() {
  assert_printed(
    "enum E { A = 1, B = E.A + 1, C = A * 3 }",
    &ts(Target::ESNext),
    r#"
var E;
(function(E) {
  E[E["A"] = 1] = "A";
  E[E["B"] = 2] = "B";
  E[E["C"] = 3] = "C";
})(E || (E = {}));
"#,
  );
}

#[test]
fn string_enum_members_have_no_reverse_mapping() {
  assert_printed(
    r#"enum S { A = "a" }"#,
    &ts(Target::ESNext),
    r#"
var S;
(function(S) {
  S["A"] = "a";
})(S || (S = {}));
"#,
  );
}

#[test]
fn type_only_namespace_is_erased() {
  assert_printed("namespace N { type T = number; }\nlet x = 1;", &ts(Target::ESNext), "let x = 1;");
}

#[test]
fn namespace_exports_live_on_the_closure_argument() {
  assert_printed(
    "namespace N { export const x = 1; export function f() { return x; } }",
    &ts(Target::ESNext),
    r#"
var N;
(function(N) {
  N.x = 1;
  function f() {
    return N.x;
  }
  N.f = f;
})(N || (N = {}));
"#,
  );
}

#[test]
fn dotted_namespace_nests_closures() {
  assert_printed(
    "namespace A.B { export const y = 2; }",
    &ts(Target::ESNext),
    r#"
var A;
(function(A) {
  var B;
  (function(B) {
    B.y = 2;
  })(B = A.B || (A.B = {}));
})(A || (A = {}));
"#,
  );
}

#[test]
fn exported_namespace_exports_its_var() {
  assert_printed(
    "export namespace N { export const x = 1; }",
    &ts(Target::ESNext),
    r#"
export var N;
(function(N) {
  N.x = 1;
})(N || (N = {}));
"#,
  );
}

#[test]
fn optional_catch_binding() {
  assert_printed(
    "try { a(); } catch { b(); }",
    &LowerOptions::for_target(Target::ES2018),
    r#"
try {
  a();
} catch (e) {
  b();
}
"#,
  );
  assert_printed(
    "try { a(); } catch { b(); }",
    &esnext(),
    r#"
try {
  a();
} catch {
  b();
}
"#,
  );
}

#[test]
fn jsx_element() {
  assert_printed(
    "<div>hi</div>;",
    &jsx(),
    r#"React.createElement("div", null, "hi");"#,
  );
}

#[test]
fn jsx_fragment_and_component() {
  assert_printed(
    "<><Foo a={1} b /></>;",
    &jsx(),
    r#"React.createElement(React.Fragment, null, React.createElement(Foo, { a: 1, b: true }));"#,
  );
}

#[test]
fn mangle_folds_arithmetic() {
  assert_printed("x = 1 + 2 * 3;", &mangled(Target::ESNext), "x = 7;");
}

#[test]
fn arithmetic_not_folded_without_mangle() {
  assert_printed("x = 1 + 2;", &esnext(), "x = 1 + 2;");
}

#[test]
fn mangle_removes_dead_branch_but_keeps_vars() {
  assert_printed(
    "if (false) { var x = 1; } else { b(); }",
    &mangled(Target::ESNext),
    r#"
var x;
{
  b();
}
"#,
  );
}

#[test]
fn es5_lowers_everything_it_can() {
  assert_printed(
    "x = a ?? b ** c;",
    &es5(),
    r#"
x = a != null ? a : __pow(b, c);
import {__pow} from "<runtime>";
"#,
  );
}

#[test]
fn lowered_output_is_stable_when_lowered_again() {
  let cases = [
    ("a.b ?? c;", Target::ES2019),
    ("a.b?.();", Target::ES2019),
    ("a?.b.c;", Target::ES2019),
    ("a.b &&= c;", Target::ES2020),
    ("class Foo { static foo = 1 }", Target::ES2020),
    ("class A { x = 1 }", Target::ES2020),
    ("try { a(); } catch { b(); }", Target::ES2018),
  ];
  for (source, target) in cases {
    let options = LowerOptions::for_target(target);
    let once = common::print::print(&analyze_ok(source, &options));
    let twice = common::print::print(&analyze_ok(&once, &options));
    assert_eq!(once, twice, "lowering {:?} again changed it", source);
  }
}
