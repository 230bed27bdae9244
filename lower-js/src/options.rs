use crate::defines::ProcessedDefines;
use parse_js::options::ParseOptions;
use serde::Deserialize;
use serde::Serialize;
use std::sync::Arc;

/// Language level of the output. Later levels include everything earlier ones support.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
  ES5,
  ES2015,
  ES2016,
  ES2017,
  ES2018,
  ES2019,
  ES2020,
  ES2021,
  ES2022,
  #[default]
  ESNext,
}

/// Syntax that may have to be lowered or rejected for older targets.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Feature {
  Exponent,
  ObjectRestSpread,
  OptionalCatchBinding,
  NullishCoalescing,
  OptionalChain,
  BigInt,
  LogicalAssignment,
  ClassFields,
  ClassStaticFields,
  ClassStaticBlocks,
  PrivateNames,
}

impl Feature {
  /// The first level that has this feature.
  pub fn introduced_in(self) -> Target {
    match self {
      Feature::Exponent => Target::ES2016,
      Feature::ObjectRestSpread => Target::ES2018,
      Feature::OptionalCatchBinding => Target::ES2019,
      Feature::NullishCoalescing | Feature::OptionalChain | Feature::BigInt => Target::ES2020,
      Feature::LogicalAssignment => Target::ES2021,
      Feature::ClassFields
      | Feature::ClassStaticFields
      | Feature::ClassStaticBlocks
      | Feature::PrivateNames => Target::ES2022,
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Feature::Exponent => "the exponentiation operator",
      Feature::ObjectRestSpread => "object rest and spread",
      Feature::OptionalCatchBinding => "optional catch bindings",
      Feature::NullishCoalescing => "the nullish coalescing operator",
      Feature::OptionalChain => "optional chaining",
      Feature::BigInt => "BigInt literals",
      Feature::LogicalAssignment => "logical assignment operators",
      Feature::ClassFields => "class fields",
      Feature::ClassStaticFields => "static class fields",
      Feature::ClassStaticBlocks => "class static blocks",
      Feature::PrivateNames => "private class members",
    }
  }
}

impl Target {
  pub fn supports(self, feature: Feature) -> bool {
    self >= feature.introduced_in()
  }

  pub fn name(self) -> &'static str {
    match self {
      Target::ES5 => "es5",
      Target::ES2015 => "es2015",
      Target::ES2016 => "es2016",
      Target::ES2017 => "es2017",
      Target::ES2018 => "es2018",
      Target::ES2019 => "es2019",
      Target::ES2020 => "es2020",
      Target::ES2021 => "es2021",
      Target::ES2022 => "es2022",
      Target::ESNext => "esnext",
    }
  }
}

/// How JSX elements become calls. Each is a dotted chain of names, resolved where the element is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsxOptions {
  pub factory: Vec<String>,
  pub fragment: Vec<String>,
}

impl Default for JsxOptions {
  fn default() -> Self {
    JsxOptions {
      factory: vec!["React".into(), "createElement".into()],
      fragment: vec!["React".into(), "Fragment".into()],
    }
  }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LowerOptions {
  // Enables detecting `require()` calls as imports.
  pub is_bundling: bool,
  // Enables constant folding and removing branches that can never run.
  pub mangle_syntax: bool,
  pub target: Target,
  // Lowers `a ?? b` with strict comparisons against `null` and `undefined` instead of `!= null`.
  pub strict_nullish: bool,
  pub jsx: JsxOptions,
  pub parse: ParseOptions,
  // Built once by the caller and shared between files. When unset, only the known globals apply.
  #[serde(skip)]
  pub defines: Option<Arc<ProcessedDefines>>,
}

impl LowerOptions {
  pub fn for_target(target: Target) -> LowerOptions {
    LowerOptions {
      target,
      ..LowerOptions::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn targets_are_ordered() {
    assert!(Target::ES5 < Target::ES2015);
    assert!(Target::ES2022 < Target::ESNext);
    assert!(!Target::ES2019.supports(Feature::OptionalChain));
    assert!(Target::ES2020.supports(Feature::OptionalChain));
    assert!(Target::ES2020.supports(Feature::NullishCoalescing));
    assert!(!Target::ES2020.supports(Feature::LogicalAssignment));
    assert!(Target::ESNext.supports(Feature::PrivateNames));
    assert!(!Target::ES2015.supports(Feature::Exponent));
  }

  #[test]
  fn options_load_from_json() {
    let options: LowerOptions = serde_json::from_str(
      r#"{"target": "es2019", "strict_nullish": true, "parse": {"ts": true}, "jsx": {"factory": ["h"]}}"#,
    )
    .unwrap();
    assert_eq!(options.target, Target::ES2019);
    assert!(options.strict_nullish);
    assert!(options.parse.ts);
    assert!(!options.parse.jsx);
    assert_eq!(options.jsx.factory, vec!["h".to_string()]);
    assert_eq!(options.jsx.fragment, vec!["React".to_string(), "Fragment".to_string()]);
    assert!(options.defines.is_none());
  }
}
