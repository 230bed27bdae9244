//! Compile-time substitutions for global names and property chains.

use ahash::HashMap;
use once_cell::sync::Lazy;
use parse_js::char::is_identifier;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

#[derive(Clone, Debug, PartialEq)]
pub enum DefineValue {
  Null,
  Undefined,
  Bool(bool),
  Num(f64),
  Str(String),
  // Another global, possibly a property chain like `globalThis.process`.
  Global(Vec<String>),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DefineData {
  // None if the expression is kept and only marked.
  pub value: Option<DefineValue>,
  // Reading it can't throw or have side effects.
  pub can_be_removed_if_unused: bool,
}

/// A define for a property chain such as `process.env.NODE_ENV`.
#[derive(Clone, Debug, PartialEq)]
pub struct DotDefine {
  pub parts: Vec<String>,
  pub data: DefineData,
}

#[derive(Clone, Debug)]
pub enum DefineError {
  InvalidKey(String),
  InvalidValue { key: String, value: String },
}

impl Display for DefineError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      DefineError::InvalidKey(key) => write!(f, "define key {:?} is not an identifier or property chain", key),
      DefineError::InvalidValue { key, value } => write!(
        f,
        "define value {:?} for {:?} must be a JSON literal or an identifier chain",
        value, key
      ),
    }
  }
}

impl std::error::Error for DefineError {}

#[derive(Clone, Debug, Default)]
pub struct ProcessedDefines {
  pub identifiers: HashMap<String, DefineData>,
  // Keyed by the last part of the chain, so a member access only has to check its own name.
  pub dots: HashMap<String, Vec<DotDefine>>,
}

#[rustfmt::skip]
const KNOWN_GLOBAL_CHAINS: &[(&str, &[&str])] = &[
  ("Math", &[
    "E", "LN10", "LN2", "LOG10E", "LOG2E", "PI", "SQRT1_2", "SQRT2", "abs", "acos", "acosh", "asin",
    "asinh", "atan", "atan2", "atanh", "cbrt", "ceil", "clz32", "cos", "cosh", "exp", "expm1", "floor",
    "fround", "hypot", "imul", "log", "log10", "log1p", "log2", "max", "min", "pow", "random", "round",
    "sign", "sin", "sinh", "sqrt", "tan", "tanh", "trunc",
  ]),
  ("Number", &[
    "EPSILON", "MAX_SAFE_INTEGER", "MAX_VALUE", "MIN_SAFE_INTEGER", "MIN_VALUE", "NEGATIVE_INFINITY",
    "NaN", "POSITIVE_INFINITY", "isFinite", "isInteger", "isNaN", "isSafeInteger", "parseFloat",
    "parseInt",
  ]),
  ("Object", &[
    "assign", "create", "defineProperties", "defineProperty", "entries", "freeze", "fromEntries",
    "getOwnPropertyDescriptor", "getOwnPropertyDescriptors", "getOwnPropertyNames",
    "getOwnPropertySymbols", "getPrototypeOf", "is", "isExtensible", "isFrozen", "isSealed", "keys",
    "preventExtensions", "seal", "setPrototypeOf", "values",
  ]),
  ("Reflect", &[
    "apply", "construct", "defineProperty", "deleteProperty", "get", "getOwnPropertyDescriptor",
    "getPrototypeOf", "has", "isExtensible", "ownKeys", "preventExtensions", "set", "setPrototypeOf",
  ]),
  ("Symbol", &[
    "asyncIterator", "hasInstance", "isConcatSpreadable", "iterator", "match", "matchAll", "replace",
    "search", "species", "split", "toPrimitive", "toStringTag", "unscopables",
  ]),
];

const KNOWN_GLOBAL_NAMES: &[&str] = &[
  "Array", "Boolean", "Date", "Error", "Function", "JSON", "Map", "Math", "Number", "Object",
  "Promise", "Reflect", "RegExp", "Set", "String", "Symbol", "WeakMap", "WeakSet",
];

static KNOWN_GLOBALS: Lazy<ProcessedDefines> = Lazy::new(|| {
  let mut defines = ProcessedDefines::default();
  let removable = |value| DefineData {
    value,
    can_be_removed_if_unused: true,
  };
  defines.identifiers.insert("undefined".into(), removable(Some(DefineValue::Undefined)));
  defines.identifiers.insert("NaN".into(), removable(Some(DefineValue::Num(f64::NAN))));
  defines.identifiers.insert("Infinity".into(), removable(Some(DefineValue::Num(f64::INFINITY))));
  for &name in KNOWN_GLOBAL_NAMES {
    defines.identifiers.insert(name.into(), removable(None));
  }
  for &(object, props) in KNOWN_GLOBAL_CHAINS {
    for &prop in props {
      defines.add_dot(vec![object.to_string(), prop.to_string()], removable(None));
    }
  }
  defines
});

fn parse_value(key: &str, raw: &str) -> Result<DefineValue, DefineError> {
  let invalid = || DefineError::InvalidValue {
    key: key.to_string(),
    value: raw.to_string(),
  };
  let raw = raw.trim();
  if raw == "undefined" {
    return Ok(DefineValue::Undefined);
  };
  if let Ok(json) = serde_json::from_str::<serde_json::Value>(raw) {
    return match json {
      serde_json::Value::Null => Ok(DefineValue::Null),
      serde_json::Value::Bool(b) => Ok(DefineValue::Bool(b)),
      serde_json::Value::Number(n) => n.as_f64().map(DefineValue::Num).ok_or_else(invalid),
      serde_json::Value::String(s) => Ok(DefineValue::Str(s)),
      _ => Err(invalid()),
    };
  };
  split_chain(raw).map(DefineValue::Global).ok_or_else(invalid)
}

fn split_chain(raw: &str) -> Option<Vec<String>> {
  let parts: Vec<String> = raw.split('.').map(|p| p.to_string()).collect();
  if parts.iter().all(|p| is_identifier(p)) {
    Some(parts)
  } else {
    None
  }
}

impl ProcessedDefines {
  /// Builds the table from `key => value` pairs such as `process.env.NODE_ENV => "\"production\""`.
  /// Values are JSON literals, `undefined`, or a global name or chain. The known side-effect free
  /// globals are included, and user defines override them.
  pub fn new<K: AsRef<str>, V: AsRef<str>>(
    user_defines: impl IntoIterator<Item = (K, V)>,
  ) -> Result<ProcessedDefines, DefineError> {
    let mut defines = KNOWN_GLOBALS.clone();
    for (key, value) in user_defines {
      let key = key.as_ref();
      let Some(mut parts) = split_chain(key) else {
        return Err(DefineError::InvalidKey(key.to_string()));
      };
      let value = parse_value(key, value.as_ref())?;
      let can_be_removed_if_unused = !matches!(value, DefineValue::Global(_));
      let data = DefineData {
        value: Some(value),
        can_be_removed_if_unused,
      };
      if parts.len() == 1 {
        let name = parts.remove(0);
        defines.identifiers.insert(name, data);
      } else {
        defines.add_dot(parts, data);
      };
    }
    Ok(defines)
  }

  /// The table used when there are no user defines.
  pub fn known_globals() -> &'static ProcessedDefines {
    &KNOWN_GLOBALS
  }

  fn add_dot(&mut self, parts: Vec<String>, data: DefineData) {
    let Some(last) = parts.last().cloned() else {
      return;
    };
    let entries = self.dots.entry(last).or_insert_with(Vec::new);
    match entries.iter_mut().find(|d| d.parts == parts) {
      Some(existing) => existing.data = data,
      None => entries.push(DotDefine { parts, data }),
    };
  }

  /// Finds the define for a chain, given outermost object first, e.g. `["Math", "PI"]`.
  pub fn find_dot(&self, parts: &[&str]) -> Option<&DefineData> {
    let last = parts.last()?;
    self
      .dots
      .get(*last)?
      .iter()
      .find(|d| d.parts.len() == parts.len() && d.parts.iter().zip(parts).all(|(a, b)| a == b))
      .map(|d| &d.data)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_globals_mark_reads_removable() {
    let defines = ProcessedDefines::known_globals();
    let pi = defines.find_dot(&["Math", "PI"]).unwrap();
    assert!(pi.can_be_removed_if_unused);
    assert_eq!(pi.value, None);
    assert!(defines.find_dot(&["Math", "nope"]).is_none());
    assert!(defines.find_dot(&["window", "Math", "PI"]).is_none());
    assert_eq!(defines.identifiers["undefined"].value, Some(DefineValue::Undefined));
  }

  #[test]
  fn user_defines_parse_values() {
    let defines = ProcessedDefines::new([
      ("process.env.NODE_ENV", "\"production\""),
      ("DEBUG", "false"),
      ("VERSION", "3"),
      ("global", "globalThis"),
      ("Math.PI", "3.14"),
    ])
    .unwrap();
    assert_eq!(
      defines.find_dot(&["process", "env", "NODE_ENV"]).unwrap().value,
      Some(DefineValue::Str("production".into()))
    );
    assert_eq!(defines.identifiers["DEBUG"].value, Some(DefineValue::Bool(false)));
    assert_eq!(defines.identifiers["VERSION"].value, Some(DefineValue::Num(3.0)));
    assert_eq!(
      defines.identifiers["global"].value,
      Some(DefineValue::Global(vec!["globalThis".into()]))
    );
    assert!(!defines.identifiers["global"].can_be_removed_if_unused);
    // User defines replace known globals.
    assert_eq!(defines.find_dot(&["Math", "PI"]).unwrap().value, Some(DefineValue::Num(3.14)));
    assert_eq!(defines.dots["PI"].len(), 1);
  }

  #[test]
  fn rejects_bad_keys_and_values() {
    assert!(matches!(
      ProcessedDefines::new([("a-b", "1")]),
      Err(DefineError::InvalidKey(_))
    ));
    assert!(matches!(
      ProcessedDefines::new([("a", "[1, 2]")]),
      Err(DefineError::InvalidValue { .. })
    ));
    assert!(matches!(
      ProcessedDefines::new([("a", "x + 1")]),
      Err(DefineError::InvalidValue { .. })
    ));
  }
}
