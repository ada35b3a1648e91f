//! Shared diagnostics model and rendering utilities.
//!
//! The data structures here are intentionally minimal and deterministic so
//! they can be reused across scanning, resolution, and bundling without
//! pulling in any heavy dependencies. Codes are numeric and rendered in the
//! TypeScript compiler's `error TS<code>` style.
//!
//! ```
//! use diagnostics::render::{render_line, SourceProvider};
//! use diagnostics::{Diagnostic, FileId, Span, TextRange};
//!
//! struct SingleFile {
//!   name: String,
//!   text: String,
//! }
//!
//! impl SourceProvider for SingleFile {
//!   fn file_name(&self, _file: FileId) -> Option<&str> {
//!     Some(&self.name)
//!   }
//!
//!   fn file_text(&self, _file: FileId) -> Option<&str> {
//!     Some(&self.text)
//!   }
//! }
//!
//! let provider = SingleFile {
//!   name: "example.d.ts".into(),
//!   text: "export const x: number;".into(),
//! };
//! let diag = Diagnostic::error(2304, "Cannot find name 'number'.").with_span(Span {
//!   file: FileId(0),
//!   range: TextRange::new(16, 22),
//! });
//!
//! let rendered = render_line(&provider, &diag);
//! assert_eq!(rendered, "example.d.ts(1,17): error TS2304: Cannot find name 'number'.");
//! ```

pub mod files;
pub mod paths;
pub mod render;

use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

/// A stable identifier for a file in a compilation unit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize)]
pub struct FileId(pub u32);

/// A half-open byte range in a file. Offsets are UTF-8 byte offsets.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct TextRange {
  pub start: u32,
  pub end: u32,
}

impl TextRange {
  pub const fn new(start: u32, end: u32) -> Self {
    Self { start, end }
  }

  pub fn len(&self) -> u32 {
    self.end.saturating_sub(self.start)
  }

  pub fn is_empty(&self) -> bool {
    self.start >= self.end
  }
}

/// A span across a specific file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct Span {
  pub file: FileId,
  pub range: TextRange,
}

impl Span {
  pub const fn new(file: FileId, range: TextRange) -> Self {
    Self { file, range }
  }
}

/// Diagnostic severity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Error,
  Warning,
  Message,
}

impl Severity {
  pub const fn as_str(&self) -> &'static str {
    match self {
      Severity::Error => "error",
      Severity::Warning => "warning",
      Severity::Message => "message",
    }
  }
}

impl Display for Severity {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A user-facing diagnostic with a numeric TypeScript-style code and an
/// optional source position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
  pub code: u32,
  pub severity: Severity,
  pub message: String,
  pub span: Option<Span>,
  pub notes: Vec<String>,
}

impl Diagnostic {
  pub fn new(severity: Severity, code: u32, message: impl Into<String>) -> Self {
    Self {
      code,
      severity,
      message: message.into(),
      span: None,
      notes: Vec::new(),
    }
  }

  pub fn error(code: u32, message: impl Into<String>) -> Self {
    Self::new(Severity::Error, code, message)
  }

  pub fn warning(code: u32, message: impl Into<String>) -> Self {
    Self::new(Severity::Warning, code, message)
  }

  pub fn with_span(mut self, span: Span) -> Self {
    self.span = Some(span);
    self
  }

  pub fn with_note(mut self, note: impl Into<String>) -> Self {
    self.notes.push(note.into());
    self
  }
}

/// Sort diagnostics by file, start offset, code, then message. Diagnostics
/// without a span sort after positioned ones for the same reason the
/// renderer prints them last: they carry no anchor to group under.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
  diagnostics.sort_by(|a, b| {
    let key = |d: &Diagnostic| {
      d.span
        .map(|s| (0u8, s.file, s.range.start))
        .unwrap_or((1, FileId(u32::MAX), u32::MAX))
    };
    key(a)
      .cmp(&key(b))
      .then(a.code.cmp(&b.code))
      .then(a.message.cmp(&b.message))
  });
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builder_sets_span_and_notes() {
    let diag = Diagnostic::error(1005, "';' expected.")
      .with_span(Span::new(FileId(3), TextRange::new(10, 11)))
      .with_note("while scanning a class body");
    assert_eq!(diag.code, 1005);
    assert_eq!(diag.severity, Severity::Error);
    assert_eq!(diag.span.unwrap().file, FileId(3));
    assert_eq!(diag.notes.len(), 1);
  }

  #[test]
  fn sorts_unpositioned_diagnostics_last() {
    let mut diags = vec![
      Diagnostic::error(6053, "File 'missing.d.ts' not found."),
      Diagnostic::error(1002, "Unterminated string literal.")
        .with_span(Span::new(FileId(1), TextRange::new(4, 5))),
      Diagnostic::error(1128, "Declaration or statement expected.")
        .with_span(Span::new(FileId(0), TextRange::new(9, 10))),
    ];
    sort_diagnostics(&mut diags);
    assert_eq!(diags[0].code, 1128);
    assert_eq!(diags[1].code, 1002);
    assert_eq!(diags[2].code, 6053);
  }

  #[test]
  fn text_range_len_saturates() {
    let range = TextRange::new(5, 3);
    assert_eq!(range.len(), 0);
    assert!(range.is_empty());
  }
}
