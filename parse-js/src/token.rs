use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::loc::Loc;
use serde::Serialize;

/// Token types.
///
/// Only reserved words get their own variant. Contextual words (`async`, `let`, `of`, `get`, `type`,
/// `namespace` and so on) are lexed as `Identifier` and recognized by the parser from their text, since
/// whether they are keywords depends on grammar position.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum TT {
  // Special token used to represent the end of the source code. Easier than using and handling Option everywhere.
  EOF,
  // Special token used to represent invalid source code, so that peeking never has to handle errors.
  Invalid,
  // These are only used by the lexer.
  CommentMultiline,
  CommentMultilineEnd,
  CommentSingle,
  LineTerminator,
  LiteralNumberBin,
  LiteralNumberHex,
  LiteralNumberOct,
  Whitespace,

  Ampersand,
  AmpersandAmpersand,
  AmpersandAmpersandEquals,
  AmpersandEquals,
  Asterisk,
  AsteriskAsterisk,
  AsteriskAsteriskEquals,
  AsteriskEquals,
  At,
  Bar,
  BarBar,
  BarBarEquals,
  BarEquals,
  BraceClose,
  BraceOpen,
  BracketClose,
  BracketOpen,
  Caret,
  CaretEquals,
  ChevronLeft,
  ChevronLeftChevronLeft,
  ChevronLeftChevronLeftEquals,
  ChevronLeftEquals,
  ChevronLeftSlash,
  ChevronRight,
  ChevronRightChevronRight,
  ChevronRightChevronRightChevronRight,
  ChevronRightChevronRightChevronRightEquals,
  ChevronRightChevronRightEquals,
  ChevronRightEquals,
  Colon,
  Comma,
  Dot,
  DotDotDot,
  Equals,
  EqualsChevronRight,
  EqualsEquals,
  EqualsEqualsEquals,
  Exclamation,
  ExclamationEquals,
  ExclamationEqualsEquals,
  Hyphen,
  HyphenEquals,
  HyphenHyphen,
  Identifier,
  JsxTextContent,
  KeywordBreak,
  KeywordCase,
  KeywordCatch,
  KeywordClass,
  KeywordConst,
  KeywordContinue,
  KeywordDebugger,
  KeywordDefault,
  KeywordDelete,
  KeywordDo,
  KeywordElse,
  KeywordEnum,
  KeywordExport,
  KeywordExtends,
  KeywordFinally,
  KeywordFor,
  KeywordFunction,
  KeywordIf,
  KeywordImport,
  KeywordIn,
  KeywordInstanceof,
  KeywordNew,
  KeywordReturn,
  KeywordSuper,
  KeywordSwitch,
  KeywordThis,
  KeywordThrow,
  KeywordTry,
  KeywordTypeof,
  KeywordVar,
  KeywordVoid,
  KeywordWhile,
  KeywordWith,
  LiteralBigInt,
  LiteralFalse,
  LiteralNull,
  LiteralNumber,
  LiteralRegex,
  LiteralString,
  LiteralTemplatePartString,
  LiteralTemplatePartStringEnd,
  LiteralTrue,
  ParenthesisClose,
  ParenthesisOpen,
  Percent,
  PercentEquals,
  Plus,
  PlusEquals,
  PlusPlus,
  PrivateMember,
  Question,
  QuestionDot,
  QuestionDotBracketOpen,
  QuestionDotParenthesisOpen,
  QuestionQuestion,
  QuestionQuestionEquals,
  Semicolon,
  Slash,
  SlashEquals,
  Tilde,
}

impl TT {
  /// Reserved words and literal keywords, which may still be used as property names.
  pub fn is_keyword(self) -> bool {
    matches!(
      self,
      TT::KeywordBreak
        | TT::KeywordCase
        | TT::KeywordCatch
        | TT::KeywordClass
        | TT::KeywordConst
        | TT::KeywordContinue
        | TT::KeywordDebugger
        | TT::KeywordDefault
        | TT::KeywordDelete
        | TT::KeywordDo
        | TT::KeywordElse
        | TT::KeywordEnum
        | TT::KeywordExport
        | TT::KeywordExtends
        | TT::KeywordFinally
        | TT::KeywordFor
        | TT::KeywordFunction
        | TT::KeywordIf
        | TT::KeywordImport
        | TT::KeywordIn
        | TT::KeywordInstanceof
        | TT::KeywordNew
        | TT::KeywordReturn
        | TT::KeywordSuper
        | TT::KeywordSwitch
        | TT::KeywordThis
        | TT::KeywordThrow
        | TT::KeywordTry
        | TT::KeywordTypeof
        | TT::KeywordVar
        | TT::KeywordVoid
        | TT::KeywordWhile
        | TT::KeywordWith
        | TT::LiteralFalse
        | TT::LiteralNull
        | TT::LiteralTrue
    )
  }

  /// Whether this token can be a property name after `.` or inside an object/class body.
  pub fn is_identifier_name(self) -> bool {
    self == TT::Identifier || self.is_keyword()
  }
}

#[derive(Clone, Debug)]
pub struct Token {
  pub loc: Loc,
  // Whether one or more whitespace characters appear immediately before this token, and at least
  // one of those whitespace characters is a line terminator.
  pub preceded_by_line_terminator: bool,
  pub typ: TT,
}

impl Token {
  pub fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
    self.loc.error(typ, Some(self.typ))
  }
}
