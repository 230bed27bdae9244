use core::ops::RangeInclusive;
use once_cell::sync::Lazy;

/// ASCII character class with an optional rule for the rest of Unicode.
#[derive(Clone)]
pub struct CharFilter {
  ascii: [bool; 128],
  non_ascii: fn(char) -> bool,
}

fn never(_: char) -> bool {
  false
}

impl CharFilter {
  pub fn new() -> CharFilter {
    CharFilter {
      ascii: [false; 128],
      non_ascii: never,
    }
  }

  pub fn add_char(&mut self, c: char) {
    debug_assert!(c.is_ascii());
    self.ascii[c as usize] = true;
  }

  pub fn add_chars(&mut self, chars: RangeInclusive<char>) {
    for c in chars {
      self.add_char(c);
    }
  }

  pub fn add_chars_from_slice(&mut self, chars: &str) {
    for c in chars.chars() {
      self.add_char(c);
    }
  }

  pub fn with_non_ascii(mut self, pred: fn(char) -> bool) -> CharFilter {
    self.non_ascii = pred;
    self
  }

  pub fn has(&self, c: char) -> bool {
    if c.is_ascii() {
      self.ascii[c as usize]
    } else {
      (self.non_ascii)(c)
    }
  }

  pub fn ascii_chars(&self) -> impl Iterator<Item = char> + '_ {
    (0u8..128)
      .filter(|&b| self.ascii[b as usize])
      .map(char::from)
  }
}

pub const ECMASCRIPT_LINE_TERMINATORS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

#[inline]
pub fn is_line_terminator(c: char) -> bool {
  ECMASCRIPT_LINE_TERMINATORS.contains(&c)
}

fn is_unicode_id_start(c: char) -> bool {
  c.is_alphabetic()
}

fn is_unicode_id_continue(c: char) -> bool {
  // ZWNJ and ZWJ are allowed in identifier parts.
  c.is_alphanumeric() || c == '\u{200C}' || c == '\u{200D}'
}

pub static DIGIT: Lazy<CharFilter> = Lazy::new(|| {
  let mut filter = CharFilter::new();
  filter.add_chars('0'..='9');
  filter.add_char('_');
  filter
});

pub static DIGIT_BIN: Lazy<CharFilter> = Lazy::new(|| {
  let mut filter = CharFilter::new();
  filter.add_chars('0'..='1');
  filter.add_char('_');
  filter
});

pub static DIGIT_HEX: Lazy<CharFilter> = Lazy::new(|| {
  let mut filter = CharFilter::new();
  filter.add_chars('0'..='9');
  filter.add_chars('a'..='f');
  filter.add_chars('A'..='F');
  filter.add_char('_');
  filter
});

pub static DIGIT_OCT: Lazy<CharFilter> = Lazy::new(|| {
  let mut filter = CharFilter::new();
  filter.add_chars('0'..='7');
  filter.add_char('_');
  filter
});

pub static ID_START: Lazy<CharFilter> = Lazy::new(|| {
  let mut filter = CharFilter::new();
  filter.add_chars('a'..='z');
  filter.add_chars('A'..='Z');
  filter.add_chars_from_slice("$_");
  filter.with_non_ascii(is_unicode_id_start)
});

pub static ID_CONTINUE: Lazy<CharFilter> = Lazy::new(|| {
  let mut filter = ID_START.clone();
  filter.add_chars('0'..='9');
  filter.with_non_ascii(is_unicode_id_continue)
});

// JSX tag and attribute names may contain hyphens.
pub static ID_CONTINUE_JSX: Lazy<CharFilter> = Lazy::new(|| {
  let mut filter = ID_CONTINUE.clone();
  filter.add_char('-');
  filter
});

pub fn is_identifier(s: &str) -> bool {
  let mut chars = s.chars();
  match chars.next() {
    Some(c) if ID_START.has(c) => chars.all(|c| ID_CONTINUE.has(c)),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identifier_classes() {
    assert!(is_identifier("$foo_1"));
    assert!(is_identifier("ünïcode"));
    assert!(!is_identifier("1abc"));
    assert!(!is_identifier("a-b"));
    assert!(ID_CONTINUE_JSX.has('-'));
    assert!(!ID_CONTINUE.has('-'));
    assert_eq!(DIGIT_BIN.ascii_chars().collect::<String>(), "01_");
  }
}
