//! Wraps rewritten declaration bodies in `declare module` blocks.
//!
//! The writer owns the in-memory artifact buffer and only ever appends to
//! it, in emission order. Blocks are separated by exactly one blank line;
//! each body ends with exactly one newline before the closing delimiter.

use crate::options::COMPILER_INDENT;

pub struct BlockWriter {
  artifact: String,
  indent: String,
}

impl BlockWriter {
  pub fn new(indent: impl Into<String>) -> BlockWriter {
    BlockWriter {
      artifact: String::new(),
      indent: indent.into(),
    }
  }

  /// Append one module block. The body is line-ending normalized, its
  /// compiler indentation translated to the configured unit, and every
  /// non-empty line re-indented by one unit.
  pub fn write_block(&mut self, module_id: &str, body: &str) {
    let normalized = normalize_eol(body);
    let translated = if self.indent == COMPILER_INDENT {
      normalized
    } else {
      translate_indent(&normalized, &self.indent)
    };
    let content = translated.trim_end();

    self.artifact.push_str("declare module '");
    self.artifact.push_str(module_id);
    self.artifact.push_str("' {\n");
    if !content.is_empty() {
      for line in content.split('\n') {
        if !line.trim().is_empty() {
          self.artifact.push_str(&self.indent);
          self.artifact.push_str(line);
        }
        self.artifact.push('\n');
      }
    }
    self.artifact.push_str("}\n\n");
  }

  /// Append the final package-alias block for the configured entry module.
  pub fn write_alias(&mut self, name: &str, main_id: &str) {
    self.artifact.push_str("declare module '");
    self.artifact.push_str(name);
    self.artifact.push_str("' {\n");
    self.artifact.push_str(&self.indent);
    self.artifact.push_str("import main = require('");
    self.artifact.push_str(main_id);
    self.artifact.push_str("');\n");
    self.artifact.push_str(&self.indent);
    self.artifact.push_str("export = main;\n}\n");
  }

  pub fn finish(self) -> String {
    self.artifact
  }
}

fn normalize_eol(text: &str) -> String {
  if !text.contains('\r') {
    return text.to_string();
  }
  text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Translate leading four-space indentation runs to the configured unit,
/// line by line. Interior spacing (including inside string literals) is
/// left alone.
fn translate_indent(text: &str, unit: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for (idx, line) in text.split('\n').enumerate() {
    if idx > 0 {
      out.push('\n');
    }
    let mut rest = line;
    while let Some(stripped) = rest.strip_prefix(COMPILER_INDENT) {
      out.push_str(unit);
      rest = stripped;
    }
    out.push_str(rest);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn wraps_body_with_one_blank_line_after_block() {
    let mut writer = BlockWriter::new("  ");
    writer.write_block("pkg/foo", "export class Foo {\n}\n");
    assert_eq!(
      writer.finish(),
      "declare module 'pkg/foo' {\n  export class Foo {\n  }\n}\n\n"
    );
  }

  #[test]
  fn empty_body_yields_well_formed_empty_block() {
    let mut writer = BlockWriter::new("  ");
    writer.write_block("pkg/empty", "");
    assert_eq!(writer.finish(), "declare module 'pkg/empty' {\n}\n\n");
  }

  #[test]
  fn body_ends_with_exactly_one_newline() {
    let mut writer = BlockWriter::new("  ");
    writer.write_block("pkg/a", "declare const a: number\n\n\n");
    assert_eq!(
      writer.finish(),
      "declare module 'pkg/a' {\n  declare const a: number\n}\n\n"
    );
  }

  #[test]
  fn translates_compiler_indentation_to_the_configured_unit() {
    let mut writer = BlockWriter::new("  ");
    writer.write_block("pkg/a", "class A {\n    x: number\n        y: string\n}\n");
    assert_eq!(
      writer.finish(),
      "declare module 'pkg/a' {\n  class A {\n    x: number\n      y: string\n  }\n}\n\n"
    );
  }

  #[test]
  fn keeps_compiler_indentation_when_configured() {
    let mut writer = BlockWriter::new("    ");
    writer.write_block("pkg/a", "class A {\n    x: number\n}\n");
    assert_eq!(
      writer.finish(),
      "declare module 'pkg/a' {\n    class A {\n        x: number\n    }\n}\n\n"
    );
  }

  #[test]
  fn normalizes_crlf_line_endings() {
    let mut writer = BlockWriter::new("  ");
    writer.write_block("pkg/a", "class A {\r\n}\r\n");
    assert_eq!(
      writer.finish(),
      "declare module 'pkg/a' {\n  class A {\n  }\n}\n\n"
    );
  }

  #[test]
  fn interior_blank_lines_carry_no_indentation() {
    let mut writer = BlockWriter::new("  ");
    writer.write_block("pkg/a", "\nexport class A {\n}\n");
    assert_eq!(
      writer.finish(),
      "declare module 'pkg/a' {\n\n  export class A {\n  }\n}\n\n"
    );
  }

  #[test]
  fn alias_block_keeps_statement_terminators() {
    let mut writer = BlockWriter::new("  ");
    writer.write_alias("pkg", "pkg/lib/entry");
    assert_eq!(
      writer.finish(),
      "declare module 'pkg' {\n  import main = require('pkg/lib/entry');\n  export = main;\n}\n"
    );
  }
}
