//! Compiler-style, single-line diagnostic rendering.
//!
//! Positioned diagnostics render as
//! `<file>(<line>,<column>): error TS<code>: <message>` with 1-based line
//! and column numbers, matching the TypeScript compiler's terse output
//! format. Diagnostics without a position render their message text alone.

use crate::Diagnostic;
use crate::FileId;
use std::fmt::Write;

/// Source metadata used during rendering.
pub struct SourceFile<'a> {
  pub name: &'a str,
  pub text: &'a str,
}

/// Provides access to source text for rendering diagnostics.
pub trait SourceProvider {
  fn file_name(&self, file: FileId) -> Option<&str>;
  fn file_text(&self, file: FileId) -> Option<&str>;

  /// Convenience method to fetch both the file name and text together.
  fn source(&self, file: FileId) -> Option<SourceFile<'_>> {
    Some(SourceFile {
      name: self.file_name(file)?,
      text: self.file_text(file)?,
    })
  }
}

/// Render one diagnostic as a compiler line.
pub fn render_line(provider: &dyn SourceProvider, diagnostic: &Diagnostic) -> String {
  let mut out = String::new();
  match diagnostic.span.and_then(|span| {
    let source = provider.source(span.file)?;
    let (line, column) = line_and_column(source.text, span.range.start as usize);
    Some((source.name.to_string(), line, column))
  }) {
    Some((name, line, column)) => {
      write!(
        out,
        "{}({},{}): {} TS{}: {}",
        name, line, column, diagnostic.severity, diagnostic.code, diagnostic.message
      )
      .unwrap();
    }
    None => out.push_str(&diagnostic.message),
  }
  out
}

/// Render an aggregated failure: a header line followed by one rendered line
/// per diagnostic.
pub fn render_failure(
  provider: &dyn SourceProvider,
  header: &str,
  diagnostics: &[Diagnostic],
) -> String {
  let mut out = String::from(header);
  for diagnostic in diagnostics {
    out.push('\n');
    out.push_str(&render_line(provider, diagnostic));
  }
  out
}

/// Compute the 1-based line and column of a byte offset. Columns count bytes
/// from the line start, which lines up with how the upstream compiler
/// reports positions in ASCII declaration output.
pub fn line_and_column(text: &str, offset: usize) -> (u32, u32) {
  let offset = offset.min(text.len());
  let mut line = 1u32;
  let mut line_start = 0usize;
  for (idx, byte) in text.bytes().enumerate() {
    if idx >= offset {
      break;
    }
    if byte == b'\n' {
      line += 1;
      line_start = idx + 1;
    }
  }
  (line, (offset - line_start) as u32 + 1)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Diagnostic, Span, TextRange};

  struct TestSource {
    name: String,
    text: String,
  }

  impl SourceProvider for TestSource {
    fn file_name(&self, _file: FileId) -> Option<&str> {
      Some(&self.name)
    }

    fn file_text(&self, _file: FileId) -> Option<&str> {
      Some(&self.text)
    }
  }

  #[test]
  fn renders_positioned_diagnostic() {
    let source = TestSource {
      name: "foo.d.ts".into(),
      text: "export const x: number;\nexport const y: string\n".into(),
    };
    let diag = Diagnostic::error(1005, "';' expected.")
      .with_span(Span::new(FileId(0), TextRange::new(46, 47)));
    assert_eq!(
      render_line(&source, &diag),
      "foo.d.ts(2,23): error TS1005: ';' expected."
    );
  }

  #[test]
  fn renders_message_only_without_span() {
    let source = TestSource {
      name: "foo.d.ts".into(),
      text: String::new(),
    };
    let diag = Diagnostic::error(6053, "File 'bar.d.ts' not found.");
    assert_eq!(render_line(&source, &diag), "File 'bar.d.ts' not found.");
  }

  #[test]
  fn renders_aggregated_failure() {
    let source = TestSource {
      name: "a.d.ts".into(),
      text: "import './b'".into(),
    };
    let diags = vec![
      Diagnostic::error(1002, "Unterminated string literal.")
        .with_span(Span::new(FileId(0), TextRange::new(7, 12))),
      Diagnostic::error(6053, "File 'b.d.ts' not found."),
    ];
    let rendered = render_failure(&source, "Declaration generation failed", &diags);
    assert_eq!(
      rendered,
      "Declaration generation failed\n\
       a.d.ts(1,8): error TS1002: Unterminated string literal.\n\
       File 'b.d.ts' not found."
    );
  }

  #[test]
  fn line_and_column_are_one_based() {
    assert_eq!(line_and_column("abc", 0), (1, 1));
    assert_eq!(line_and_column("a\nbc", 2), (2, 1));
    assert_eq!(line_and_column("a\nbc", 3), (2, 2));
    assert_eq!(line_and_column("ab", 99), (1, 3));
  }
}
