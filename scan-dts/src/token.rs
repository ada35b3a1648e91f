use crate::loc::Loc;
use ahash::HashMap;
use ahash::HashMapExt;
use once_cell::sync::Lazy;
use serde::Serialize;

/// Token types produced by the declaration lexer.
///
/// The set is deliberately small: the scanner only needs enough lexical
/// structure to find statement boundaries, bracket nesting, and the handful
/// of keywords it dispatches on. Everything else lexes as [`TT::Identifier`]
/// or [`TT::Unknown`] and flows through as raw text.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum TT {
  // Special token representing the end of the source code, so peeking never
  // needs Option handling.
  EOF,

  Identifier,
  LiteralNumber,
  LiteralString,
  LiteralTemplate,

  Ampersand,
  Arrow,
  Asterisk,
  Bar,
  BraceClose,
  BraceOpen,
  BracketClose,
  BracketOpen,
  ChevronLeft,
  ChevronRight,
  Colon,
  Comma,
  Dot,
  Equals,
  Minus,
  ParenClose,
  ParenOpen,
  Question,
  Semicolon,
  Unknown,

  KeywordAbstract,
  KeywordClass,
  KeywordConst,
  KeywordDeclare,
  KeywordDefault,
  KeywordEnum,
  KeywordExport,
  KeywordFrom,
  KeywordFunction,
  KeywordGlobal,
  KeywordImport,
  KeywordInterface,
  KeywordModule,
  KeywordNamespace,
  KeywordPrivate,
  KeywordRequire,
  KeywordType,
}

pub static KEYWORDS_MAPPING: Lazy<HashMap<&'static str, TT>> = Lazy::new(|| {
  let mut map = HashMap::new();
  map.insert("abstract", TT::KeywordAbstract);
  map.insert("class", TT::KeywordClass);
  map.insert("const", TT::KeywordConst);
  map.insert("declare", TT::KeywordDeclare);
  map.insert("default", TT::KeywordDefault);
  map.insert("enum", TT::KeywordEnum);
  map.insert("export", TT::KeywordExport);
  map.insert("from", TT::KeywordFrom);
  map.insert("function", TT::KeywordFunction);
  map.insert("global", TT::KeywordGlobal);
  map.insert("import", TT::KeywordImport);
  map.insert("interface", TT::KeywordInterface);
  map.insert("module", TT::KeywordModule);
  map.insert("namespace", TT::KeywordNamespace);
  map.insert("private", TT::KeywordPrivate);
  map.insert("require", TT::KeywordRequire);
  map.insert("type", TT::KeywordType);
  map
});

#[derive(Copy, Clone, Debug, Serialize)]
pub struct Token {
  pub loc: Loc,
  pub tt: TT,
}

impl Token {
  pub fn new(loc: Loc, tt: TT) -> Token {
    Token { loc, tt }
  }
}
