use parse_js::ast::expr::Expr;
use parse_js::ast::stmt::Stmt;
use parse_js::num::JsNumber;
use parse_js::options::ParseOptions;
use parse_js::parse;

fn parse_number_value(src: &str) -> JsNumber {
  let parsed = parse(src, 0, ParseOptions::js()).unwrap();
  let stmt = parsed.top_level.stx.body.first().expect("expected a statement");
  match stmt.stx.as_ref() {
    Stmt::Expr(expr_stmt) => match expr_stmt.expr.stx.as_ref() {
      Expr::LitNum(num) => *num,
      other => panic!("expected numeric literal, got {:?}", other),
    },
    other => panic!("expected expression statement, got {:?}", other),
  }
}

#[test]
fn parses_max_finite_literal() {
  let value = parse_number_value("1.7976931348623157e308");
  assert_eq!(value.0, f64::MAX);
}

#[test]
fn overflows_to_infinity() {
  let value = parse_number_value("1e400");
  assert!(value.0.is_infinite() && value.0.is_sign_positive());
}

#[test]
fn parses_legacy_octal_literal() {
  assert_eq!(parse_number_value("0777").0, 0o777 as f64);
  assert_eq!(parse_number_value("089").0, 89.0);
}

#[test]
fn parses_prefixed_radixes() {
  assert_eq!(parse_number_value("0xff").0, 255.0);
  assert_eq!(parse_number_value("0o17").0, 15.0);
  assert_eq!(parse_number_value("0B101").0, 5.0);
}

#[test]
fn numeric_separators_do_not_change_value() {
  let with_separators = parse_number_value("1_234.5_6e7_8");
  let without_separators = parse_number_value("1234.56e78");
  assert_eq!(with_separators.0.to_bits(), without_separators.0.to_bits());
}

#[test]
fn rejects_hex_floats() {
  assert!(JsNumber::from_literal("0x1.fp3").is_none());
}
