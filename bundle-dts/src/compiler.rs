use ahash::HashMap;
use ahash::HashMapExt;
use diagnostics::render::SourceProvider;
use diagnostics::Diagnostic;
use diagnostics::FileId;
use scan_dts::scan;
use scan_dts::Declaration;

/// One source file of the compilation unit, as reported by the compiler.
/// Paths are project-relative with `/` separators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
  pub id: FileId,
  pub path: String,
  /// Pre-existing declaration files pass through the pipeline untouched:
  /// they are neither re-emitted nor bundled.
  pub is_declaration: bool,
}

/// One file's emitted declaration: its text and the scanned sparse tree.
#[derive(Clone, Debug)]
pub struct EmittedDeclaration {
  pub text: String,
  pub declaration: Declaration,
}

/// The external source-to-declaration compiler, driven by the pipeline.
///
/// The [`SourceProvider`] supertrait lets the pipeline render any
/// diagnostics the compiler reports with resolved line/column positions at
/// failure time.
pub trait Compiler: SourceProvider {
  /// Every file of the compilation unit, in the compiler's own order. The
  /// pipeline processes files strictly in this order.
  fn source_files(&self) -> Vec<SourceFile>;

  /// Diagnostics known before any emission. Non-empty fails the run before
  /// anything is produced.
  fn pre_emit_diagnostics(&mut self) -> Vec<Diagnostic>;

  /// Emit one file's declaration. Diagnostics fail the whole run.
  fn emit_declaration(&mut self, file: &SourceFile) -> Result<EmittedDeclaration, Vec<Diagnostic>>;
}

/// An in-memory [`Compiler`] holding already-emitted declaration text per
/// source file, for tests, harnesses, and embedders that obtain declaration
/// output some other way.
#[derive(Default)]
pub struct InMemoryCompiler {
  files: Vec<MemoryFile>,
  pre_emit: Vec<Diagnostic>,
  emit_failures: HashMap<String, Vec<Diagnostic>>,
}

struct MemoryFile {
  path: String,
  text: String,
  is_declaration: bool,
}

impl InMemoryCompiler {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a source file together with the declaration text its compilation
  /// emits. Paths ending in `.d.ts` register as pre-existing declaration
  /// files and are skipped by the pipeline.
  pub fn add_file(&mut self, path: impl Into<String>, text: impl Into<String>) -> FileId {
    let path = path.into();
    let id = FileId(self.files.len() as u32);
    self.files.push(MemoryFile {
      is_declaration: path.ends_with(".d.ts"),
      path,
      text: text.into(),
    });
    id
  }

  pub fn with_file(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
    self.add_file(path, text);
    self
  }

  /// Script a pre-emit diagnostic, failing the run during compilation.
  pub fn add_pre_emit_diagnostic(&mut self, diagnostic: Diagnostic) {
    self.pre_emit.push(diagnostic);
  }

  /// Script an emission failure for one file.
  pub fn fail_emission(&mut self, path: impl Into<String>, diagnostics: Vec<Diagnostic>) {
    self.emit_failures.insert(path.into(), diagnostics);
  }
}

impl SourceProvider for InMemoryCompiler {
  fn file_name(&self, file: FileId) -> Option<&str> {
    self.files.get(file.0 as usize).map(|f| f.path.as_str())
  }

  fn file_text(&self, file: FileId) -> Option<&str> {
    self.files.get(file.0 as usize).map(|f| f.text.as_str())
  }
}

impl Compiler for InMemoryCompiler {
  fn source_files(&self) -> Vec<SourceFile> {
    self
      .files
      .iter()
      .enumerate()
      .map(|(idx, f)| SourceFile {
        id: FileId(idx as u32),
        path: f.path.clone(),
        is_declaration: f.is_declaration,
      })
      .collect()
  }

  fn pre_emit_diagnostics(&mut self) -> Vec<Diagnostic> {
    self.pre_emit.clone()
  }

  fn emit_declaration(&mut self, file: &SourceFile) -> Result<EmittedDeclaration, Vec<Diagnostic>> {
    if let Some(diagnostics) = self.emit_failures.get(&file.path) {
      return Err(diagnostics.clone());
    }
    let text = self
      .files
      .get(file.id.0 as usize)
      .map(|f| f.text.clone())
      .unwrap_or_default();
    let declaration = scan(&text).map_err(|err| vec![err.to_diagnostic(file.id)])?;
    Ok(EmittedDeclaration { text, declaration })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dts_paths_register_as_declaration_files() {
    let compiler = InMemoryCompiler::new()
      .with_file("index.ts", "export declare class A {\n}\n")
      .with_file("types.d.ts", "export interface T {\n}\n");
    let files = compiler.source_files();
    assert!(!files[0].is_declaration);
    assert!(files[1].is_declaration);
  }

  #[test]
  fn scan_errors_surface_as_emission_diagnostics() {
    let mut compiler = InMemoryCompiler::new().with_file("broken.ts", "import './x");
    let files = compiler.source_files();
    let err = compiler.emit_declaration(&files[0]).unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err[0].code, 1002);
    assert_eq!(err[0].span.unwrap().file, files[0].id);
  }

  #[test]
  fn scripted_emission_failures_take_precedence() {
    let mut compiler = InMemoryCompiler::new().with_file("a.ts", "export declare const a: number;\n");
    compiler.fail_emission("a.ts", vec![Diagnostic::error(2322, "Type mismatch.")]);
    let files = compiler.source_files();
    assert!(compiler.emit_declaration(&files[0]).is_err());
  }
}
