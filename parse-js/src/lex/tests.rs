use crate::lex::lex_next;
use crate::lex::LexMode;
use crate::lex::Lexer;
use crate::token::TT;
use crate::token::TT::*;

fn check<const N: usize>(code: &str, expecteds: [TT; N]) {
  let mut lexer = Lexer::new(code);
  for expected in expecteds {
    let t = lex_next(&mut lexer, LexMode::Standard);
    assert_eq!(t.typ, expected, "lexing {:?}", code);
  }
  let t = lex_next(&mut lexer, LexMode::Standard);
  assert_eq!(EOF, t.typ);
}

#[test]
fn test_lex_keywords() {
  check("class", [KeywordClass]);
  check("instanceof", [KeywordInstanceof]);
  check("classes", [Identifier]);
  // Contextual keywords are identifiers.
  check("async of let", [Identifier, Identifier, Identifier]);
}

#[test]
fn test_lex_identifiers() {
  check("h929", [Identifier]);
  check("\\u0061b", [Identifier]);
  check("ünï", [Identifier]);
  check("#priv", [PrivateMember]);
}

#[test]
fn test_lex_literal_numbers() {
  check("1", [LiteralNumber]);
  check(".929", [LiteralNumber]);
  check(". 929", [Dot, LiteralNumber]);
  check(".929.2..", [LiteralNumber, LiteralNumber, Dot, Dot]);
  check("?.929", [Question, LiteralNumber]);
  check("?..929", [QuestionDot, LiteralNumber]);
  check("1e", [Invalid]);
  check("0x", [Invalid]);
}

#[test]
fn test_lex_literal_bigints() {
  check("929n", [LiteralBigInt]);
  check("0x800faceb00cn", [LiteralBigInt]);
  check("0b110101010n", [LiteralBigInt]);
}

#[test]
fn test_lex_literal_strings() {
  check("'hello world'", [LiteralString]);
  check("'hello world\n'", [Invalid]);
  check("'a\\\nb'", [LiteralString]);
  check("'unterminated", [Invalid]);
}

#[test]
fn test_lex_optional_chain_tokens() {
  check("a?.b?.[c]?.(d)", [
    Identifier,
    QuestionDot,
    Identifier,
    QuestionDotBracketOpen,
    Identifier,
    BracketClose,
    QuestionDotParenthesisOpen,
    Identifier,
    ParenthesisClose,
  ]);
  check("a ??= b", [Identifier, QuestionQuestionEquals, Identifier]);
}

#[test]
fn test_line_terminator_tracking() {
  let mut lexer = Lexer::new("a /* x\n */ b // c\nd");
  assert!(!lex_next(&mut lexer, LexMode::Standard).preceded_by_line_terminator);
  assert!(lex_next(&mut lexer, LexMode::Standard).preceded_by_line_terminator);
  assert!(lex_next(&mut lexer, LexMode::Standard).preceded_by_line_terminator);
}

#[test]
fn test_modes() {
  let mut lexer = Lexer::new("/a[/]b/g / 2");
  assert_eq!(lex_next(&mut lexer, LexMode::SlashIsRegex).typ, LiteralRegex);
  assert_eq!(lex_next(&mut lexer, LexMode::Standard).typ, Slash);

  let mut lexer = Lexer::new("`a${b}c`");
  assert_eq!(lex_next(&mut lexer, LexMode::Standard).typ, LiteralTemplatePartString);
  assert_eq!(lex_next(&mut lexer, LexMode::Standard).typ, Identifier);
  let cont = lex_next(&mut lexer, LexMode::TemplateStrContinue);
  assert_eq!(cont.typ, LiteralTemplatePartStringEnd);
  assert_eq!(&lexer[cont.loc], "}c`");

  let mut lexer = Lexer::new("data-id text <");
  assert_eq!(lex_next(&mut lexer, LexMode::JsxTag).typ, Identifier);
  assert_eq!(lex_next(&mut lexer, LexMode::JsxTextContent).typ, JsxTextContent);
}

#[test]
fn test_checkpoint_rewinds() {
  let mut lexer = Lexer::new("a b");
  let cp = lexer.checkpoint();
  lex_next(&mut lexer, LexMode::Standard);
  lexer.apply_checkpoint(cp);
  let t = lex_next(&mut lexer, LexMode::Standard);
  assert_eq!(&lexer[t.loc], "a");
}
