//! Decoding of literal token text into values.
//!
//! Strings are represented as Rust `String`s; lone surrogates from `\u` escapes decode to U+FFFD.

use crate::char::is_identifier;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct InvalidEscape {
  // Byte offset of the backslash, relative to the decoded text.
  pub offset: usize,
}

fn hex_value(s: &str) -> Option<u32> {
  if s.is_empty() || !s.chars().all(|c| c.is_ascii_hexdigit()) {
    return None;
  };
  u32::from_str_radix(s, 16).ok()
}

/// Decodes one escape sequence. `raw` starts immediately after the backslash.
/// Returns the number of bytes consumed and the produced character, if any (line continuations produce none).
fn decode_escape(raw: &str, allow_legacy_octal: bool) -> Option<(usize, Option<char>)> {
  let first = raw.chars().next()?;
  Some(match first {
    '\r' => (if raw[1..].starts_with('\n') { 2 } else { 1 }, None),
    '\n' | '\u{2028}' | '\u{2029}' => (first.len_utf8(), None),
    'b' => (1, Some('\x08')),
    'f' => (1, Some('\x0c')),
    'n' => (1, Some('\n')),
    'r' => (1, Some('\r')),
    't' => (1, Some('\t')),
    'v' => (1, Some('\x0b')),
    '0' if !raw[1..].starts_with(|c: char| c.is_ascii_digit()) => (1, Some('\0')),
    '0'..='7' => {
      if !allow_legacy_octal {
        return None;
      };
      let mut len = 1;
      let mut value = first.to_digit(8)?;
      for c in raw[1..].chars().take(2) {
        match c.to_digit(8) {
          Some(d) if value * 8 + d <= 0o377 => {
            value = value * 8 + d;
            len += 1;
          }
          _ => break,
        };
      }
      (len, char::from_u32(value))
    }
    '8' | '9' => (1, Some(first)),
    'x' => {
      let hex = raw.get(1..3)?;
      (3, char::from_u32(hex_value(hex)?))
    }
    'u' => decode_unicode_escape_body(&raw[1..]).map(|(len, c)| (len + 1, Some(c)))?,
    c => (c.len_utf8(), Some(c)),
  })
}

/// `raw` starts after `\u`.
fn decode_unicode_escape_body(raw: &str) -> Option<(usize, char)> {
  if let Some(rest) = raw.strip_prefix('{') {
    let end = rest.find('}')?;
    let value = hex_value(&rest[..end])?;
    if value > 0x10FFFF {
      return None;
    };
    return Some((end + 2, char::from_u32(value).unwrap_or('\u{FFFD}')));
  };
  let value = hex_value(raw.get(..4)?)?;
  if (0xD800..=0xDBFF).contains(&value) {
    // Combine a surrogate pair written as two escapes.
    if let Some(low) = raw
      .get(4..10)
      .and_then(|s| s.strip_prefix("\\u"))
      .and_then(hex_value)
      .filter(|low| (0xDC00..=0xDFFF).contains(low))
    {
      let combined = 0x10000 + ((value - 0xD800) << 10) + (low - 0xDC00);
      if let Some(c) = char::from_u32(combined) {
        return Some((10, c));
      };
    };
  };
  Some((4, char::from_u32(value).unwrap_or('\u{FFFD}')))
}

fn decode_body(body: &str, allow_legacy_octal: bool) -> Result<String, InvalidEscape> {
  let mut out = String::with_capacity(body.len());
  let mut i = 0;
  while let Some(rel) = body[i..].find('\\') {
    out.push_str(&body[i..i + rel]);
    let esc = i + rel;
    let (len, c) = decode_escape(&body[esc + 1..], allow_legacy_octal).ok_or(InvalidEscape { offset: esc })?;
    if let Some(c) = c {
      out.push(c);
    };
    i = esc + 1 + len;
  }
  out.push_str(&body[i..]);
  Ok(out)
}

/// Decodes a string literal token, including its quotes.
pub fn decode_string_literal(raw: &str) -> Result<String, InvalidEscape> {
  debug_assert!(raw.len() >= 2);
  decode_body(&raw[1..raw.len() - 1], true).map_err(|e| InvalidEscape { offset: e.offset + 1 })
}

/// Strips the delimiters from a template part token: a leading backtick or `}`, and a trailing backtick or `${`.
pub fn template_part_raw(raw: &str) -> &str {
  let start = 1;
  let end = if raw.ends_with("${") {
    raw.len() - 2
  } else {
    raw.len() - 1
  };
  &raw[start.min(end)..end]
}

/// Cooked value of a template part. `None` if it contains an invalid escape, which is only allowed in tagged templates.
pub fn decode_template_part(raw: &str) -> Option<String> {
  // Line terminators are normalized to `\n` in both cooked and raw values.
  let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
  decode_body(&normalized, false).ok()
}

/// Decodes `\u` escapes in an identifier. Returns `None` if the result is not a valid identifier.
pub fn decode_identifier(raw: &str) -> Option<String> {
  if !raw.contains('\\') {
    return Some(raw.to_string());
  };
  let mut out = String::with_capacity(raw.len());
  let mut i = 0;
  while let Some(rel) = raw[i..].find("\\u") {
    out.push_str(&raw[i..i + rel]);
    let (len, c) = decode_unicode_escape_body(&raw[i + rel + 2..])?;
    out.push(c);
    i += rel + 2 + len;
  }
  out.push_str(&raw[i..]);
  is_identifier(&out).then_some(out)
}

/// Canonical decimal digits of a bigint literal, without the `n` suffix.
pub fn normalise_bigint_literal(raw: &str) -> Option<String> {
  let body = raw.strip_suffix('n')?.replace('_', "");
  let (radix, digits) = match body.get(..2) {
    Some("0x" | "0X") => (16, &body[2..]),
    Some("0o" | "0O") => (8, &body[2..]),
    Some("0b" | "0B") => (2, &body[2..]),
    _ => (10, body.as_str()),
  };
  if digits.is_empty() || (radix == 10 && digits.len() > 1 && digits.starts_with('0')) {
    return None;
  };
  // Schoolbook base conversion on little-endian decimal digits.
  let mut decimal: Vec<u8> = vec![0];
  for c in digits.chars() {
    let d = c.to_digit(radix)?;
    let mut carry = d;
    for slot in decimal.iter_mut() {
      let v = *slot as u32 * radix + carry;
      *slot = (v % 10) as u8;
      carry = v / 10;
    }
    while carry > 0 {
      decimal.push((carry % 10) as u8);
      carry /= 10;
    }
  }
  while decimal.len() > 1 && decimal.last() == Some(&0) {
    decimal.pop();
  }
  Some(decimal.iter().rev().map(|d| char::from(b'0' + d)).collect())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_string_escapes() {
    assert_eq!(decode_string_literal(r#""a\nb""#).unwrap(), "a\nb");
    assert_eq!(decode_string_literal(r"'\x41B\u{43}'").unwrap(), "ABC");
    assert_eq!(decode_string_literal(r"'😀'").unwrap(), "😀");
    assert_eq!(decode_string_literal(r"'\101'").unwrap(), "A");
    assert_eq!(decode_string_literal("'a\\\nb'").unwrap(), "ab");
    assert_eq!(decode_string_literal(r"'\0'").unwrap(), "\0");
    assert_eq!(decode_string_literal(r"'\x4'").unwrap_err(), InvalidEscape { offset: 1 });
  }

  #[test]
  fn template_parts() {
    assert_eq!(template_part_raw("`abc${"), "abc");
    assert_eq!(template_part_raw("}def`"), "def");
    assert_eq!(template_part_raw("``"), "");
    assert_eq!(decode_template_part("a\\tb"), Some("a\tb".into()));
    assert_eq!(decode_template_part("\\01"), None);
    assert_eq!(decode_template_part("x\r\ny"), Some("x\ny".into()));
  }

  #[test]
  fn identifiers_and_bigints() {
    assert_eq!(decode_identifier("\\u0061bc"), Some("abc".into()));
    assert_eq!(decode_identifier("\\u{31}a"), None);
    assert_eq!(normalise_bigint_literal("0xFFn"), Some("255".into()));
    assert_eq!(normalise_bigint_literal("1_000n"), Some("1000".into()));
    assert_eq!(normalise_bigint_literal("0n"), Some("0".into()));
    assert_eq!(normalise_bigint_literal("01n"), None);
  }
}
