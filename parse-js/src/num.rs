use core::hash::Hash;
use core::hash::Hasher;
use serde::Serialize;
use serde::Serializer;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

// This provides Eq for f64, so that literal nodes can be compared and hashed.
// Comparisons that must follow IEEE semantics should use the inner value directly.
#[derive(Copy, Clone, Debug)]
pub struct JsNumber(pub f64);

impl JsNumber {
  /// Parses the raw source text of a numeric literal (no trailing `n`).
  pub fn from_literal(raw: &str) -> Option<JsNumber> {
    let clean: String = raw.chars().filter(|&c| c != '_').collect();
    let radix_body = |prefix_lower: &str, prefix_upper: &str| {
      clean
        .strip_prefix(prefix_lower)
        .or_else(|| clean.strip_prefix(prefix_upper))
        .map(|s| s.to_string())
    };
    let int_in_radix = |digits: &str, radix: u32| -> Option<f64> {
      if digits.is_empty() {
        return None;
      };
      let mut v = 0f64;
      for c in digits.chars() {
        v = v * radix as f64 + c.to_digit(radix)? as f64;
      }
      Some(v)
    };
    if let Some(d) = radix_body("0x", "0X") {
      return int_in_radix(&d, 16).map(JsNumber);
    };
    if let Some(d) = radix_body("0o", "0O") {
      return int_in_radix(&d, 8).map(JsNumber);
    };
    if let Some(d) = radix_body("0b", "0B") {
      return int_in_radix(&d, 2).map(JsNumber);
    };
    // Legacy octal, e.g. `0777`. A leading zero followed by an 8 or 9 is decimal.
    if clean.len() > 1 && clean.starts_with('0') && clean.chars().all(|c| c.is_ascii_digit()) {
      if clean.chars().all(|c| ('0'..='7').contains(&c)) {
        return int_in_radix(&clean[1..], 8).map(JsNumber);
      };
    };
    clean.parse::<f64>().ok().map(JsNumber)
  }

  /// Formats the value the way `Number.prototype.toString` does for radix 10.
  pub fn to_js_string(&self) -> String {
    let v = self.0;
    if v.is_nan() {
      return "NaN".into();
    };
    if v.is_infinite() {
      return if v > 0.0 { "Infinity" } else { "-Infinity" }.into();
    };
    if v == 0.0 {
      // Both zeroes print as "0".
      return "0".into();
    };
    let abs = v.abs();
    if (1e-6..1e21).contains(&abs) {
      return format!("{}", v);
    };
    let exp = format!("{:e}", v);
    match exp.split_once('e') {
      Some((mantissa, e)) if !e.starts_with('-') => format!("{}e+{}", mantissa, e),
      _ => exp,
    }
  }

  pub fn is_integer(&self) -> bool {
    self.0.is_finite() && self.0.fract() == 0.0
  }

  /// ECMAScript ToInt32.
  pub fn to_int32(&self) -> i32 {
    if !self.0.is_finite() {
      return 0;
    };
    let int = self.0.trunc();
    let modulo = int.rem_euclid(4294967296.0);
    modulo as u32 as i32
  }

  pub fn to_uint32(&self) -> u32 {
    self.to_int32() as u32
  }
}

impl Display for JsNumber {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_js_string())
  }
}

impl PartialEq for JsNumber {
  fn eq(&self, other: &Self) -> bool {
    if self.0.is_nan() {
      return other.0.is_nan();
    };
    self.0.to_bits() == other.0.to_bits()
  }
}

impl Eq for JsNumber {}

impl Hash for JsNumber {
  fn hash<H: Hasher>(&self, state: &mut H) {
    if !self.0.is_nan() {
      self.0.to_bits().hash(state);
    };
  }
}

impl Serialize for JsNumber {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::JsNumber;

  #[test]
  fn parses_literal_forms() {
    assert_eq!(JsNumber::from_literal("0x1F"), Some(JsNumber(31.0)));
    assert_eq!(JsNumber::from_literal("0b1_01"), Some(JsNumber(5.0)));
    assert_eq!(JsNumber::from_literal("0o17"), Some(JsNumber(15.0)));
    assert_eq!(JsNumber::from_literal("017"), Some(JsNumber(15.0)));
    assert_eq!(JsNumber::from_literal("019"), Some(JsNumber(19.0)));
    assert_eq!(JsNumber::from_literal("1_000.5e1"), Some(JsNumber(10005.0)));
    assert_eq!(JsNumber::from_literal(".5"), Some(JsNumber(0.5)));
    assert_eq!(JsNumber::from_literal("0x"), None);
  }

  #[test]
  fn formats_like_js() {
    assert_eq!(JsNumber(1.0).to_js_string(), "1");
    assert_eq!(JsNumber(-0.0).to_js_string(), "0");
    assert_eq!(JsNumber(0.1).to_js_string(), "0.1");
    assert_eq!(JsNumber(1e21).to_js_string(), "1e+21");
    assert_eq!(JsNumber(1.5e-7).to_js_string(), "1.5e-7");
    assert_eq!(JsNumber(f64::NAN).to_js_string(), "NaN");
    assert_eq!(JsNumber(f64::NEG_INFINITY).to_js_string(), "-Infinity");
  }

  #[test]
  fn int32_conversion_wraps() {
    assert_eq!(JsNumber(4294967297.0).to_int32(), 1);
    assert_eq!(JsNumber(-1.0).to_uint32(), 4294967295);
    assert_eq!(JsNumber(2147483648.0).to_int32(), -2147483648);
  }
}
