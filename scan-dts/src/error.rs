use crate::loc::Loc;
use diagnostics::Diagnostic;
use diagnostics::FileId;
use diagnostics::Span;
use core::fmt;
use core::fmt::Formatter;
use std::error::Error;
use std::fmt::Display;

/// A stable classification of scan errors.
///
/// Diagnostic codes reuse the TypeScript compiler's numbers for the same
/// conditions and are stable:
/// - `TS1002`: [`ScanErrorType::UnterminatedString`]
/// - `TS1005`: [`ScanErrorType::ExpectedToken`]
/// - `TS1010`: [`ScanErrorType::UnterminatedComment`]
/// - `TS1126`: [`ScanErrorType::UnexpectedEndOfFile`]
/// - `TS1128`: [`ScanErrorType::UnexpectedToken`]
/// - `TS1141`: [`ScanErrorType::ExpectedString`]
/// - `TS1160`: [`ScanErrorType::UnterminatedTemplate`]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ScanErrorType {
  ExpectedToken(&'static str),
  ExpectedString,
  UnexpectedEndOfFile,
  UnexpectedToken,
  UnterminatedString,
  UnterminatedComment,
  UnterminatedTemplate,
}

impl ScanErrorType {
  pub const fn code(&self) -> u32 {
    match self {
      ScanErrorType::UnterminatedString => 1002,
      ScanErrorType::ExpectedToken(_) => 1005,
      ScanErrorType::UnterminatedComment => 1010,
      ScanErrorType::UnexpectedEndOfFile => 1126,
      ScanErrorType::UnexpectedToken => 1128,
      ScanErrorType::ExpectedString => 1141,
      ScanErrorType::UnterminatedTemplate => 1160,
    }
  }

  pub fn message(&self) -> String {
    match self {
      ScanErrorType::ExpectedToken(expected) => format!("'{}' expected.", expected),
      ScanErrorType::ExpectedString => "String literal expected.".to_string(),
      ScanErrorType::UnexpectedEndOfFile => "Unexpected end of text.".to_string(),
      ScanErrorType::UnexpectedToken => "Declaration or statement expected.".to_string(),
      ScanErrorType::UnterminatedString => "Unterminated string literal.".to_string(),
      ScanErrorType::UnterminatedComment => "'*/' expected.".to_string(),
      ScanErrorType::UnterminatedTemplate => "Unterminated template literal.".to_string(),
    }
  }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ScanError {
  pub typ: ScanErrorType,
  pub loc: Loc,
}

impl ScanError {
  pub fn new(typ: ScanErrorType, loc: Loc) -> ScanError {
    ScanError { typ, loc }
  }

  /// Convert into a positioned [`Diagnostic`] for the given file.
  pub fn to_diagnostic(&self, file: FileId) -> Diagnostic {
    Diagnostic::error(self.typ.code(), self.typ.message())
      .with_span(Span::new(file, self.loc.to_range()))
  }
}

impl fmt::Debug for ScanError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "ScanError({:?} at {:?})", self.typ, self.loc)
  }
}

impl Display for ScanError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "TS{} at {}..{}: {}",
      self.typ.code(),
      self.loc.0,
      self.loc.1,
      self.typ.message()
    )
  }
}

impl Error for ScanError {}

pub type ScanResult<T> = Result<T, ScanError>;
