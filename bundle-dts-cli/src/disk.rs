//! A [`Compiler`] over declaration output an external compiler run has
//! already produced on disk.
//!
//! The actual source-to-declaration compilation is delegated to that
//! external run: "emitting" a file here means reading the matching `.d.ts`
//! from the configured output directory and scanning it. Missing or
//! unscannable declaration files surface as emission diagnostics for the
//! corresponding source file.

use bundle_dts::{Compiler, EmittedDeclaration, SourceFile};
use diagnostics::paths::normalize_relative;
use diagnostics::render::SourceProvider;
use diagnostics::{Diagnostic, FileId};
use scan_dts::scan;
use std::fs;
use std::path::{Path, PathBuf};

pub struct DiskCompiler {
  out_dir: PathBuf,
  files: Vec<DiskFile>,
}

struct DiskFile {
  /// Module-identifier-space path: project-relative, root dir stripped.
  path: String,
  /// The emitted declaration file backing this source file.
  declaration_path: PathBuf,
  declaration_name: String,
  is_declaration: bool,
  text: Option<String>,
}

impl DiskCompiler {
  pub fn new(project_dir: &Path, out_dir: &Path, root_dir: Option<&str>, files: Vec<String>) -> DiskCompiler {
    let out_dir = project_dir.join(out_dir);
    let root_prefix = root_dir
      .and_then(normalize_relative)
      .filter(|dir| !dir.is_empty())
      .map(|dir| format!("{}/", dir));
    let files = files
      .into_iter()
      .map(|raw| {
        let normalized = normalize_relative(&raw).unwrap_or(raw);
        let path = match &root_prefix {
          Some(prefix) => normalized
            .strip_prefix(prefix.as_str())
            .unwrap_or(&normalized)
            .to_string(),
          None => normalized,
        };
        let is_declaration = path.ends_with(".d.ts");
        let stem = bundle_dts::resolve::strip_source_ext(&path).to_string();
        let declaration_path = out_dir.join(format!("{}.d.ts", stem));
        DiskFile {
          declaration_name: declaration_path.display().to_string(),
          declaration_path,
          is_declaration,
          path,
          text: None,
        }
      })
      .collect();
    DiskCompiler { out_dir, files }
  }
}

impl SourceProvider for DiskCompiler {
  fn file_name(&self, file: FileId) -> Option<&str> {
    self
      .files
      .get(file.0 as usize)
      .map(|f| f.declaration_name.as_str())
  }

  fn file_text(&self, file: FileId) -> Option<&str> {
    self.files.get(file.0 as usize).and_then(|f| f.text.as_deref())
  }
}

impl Compiler for DiskCompiler {
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
    let mut diagnostics = Vec::new();
    if !self.out_dir.is_dir() {
      diagnostics.push(Diagnostic::error(
        6053,
        format!("File '{}' not found.", self.out_dir.display()),
      ));
    }
    diagnostics
  }

  fn emit_declaration(&mut self, file: &SourceFile) -> Result<EmittedDeclaration, Vec<Diagnostic>> {
    let entry = match self.files.get_mut(file.id.0 as usize) {
      Some(entry) => entry,
      None => {
        return Err(vec![Diagnostic::error(
          6053,
          format!("File '{}' not found.", file.path),
        )])
      }
    };
    let text = match fs::read_to_string(&entry.declaration_path) {
      Ok(text) => text,
      Err(_) => {
        return Err(vec![Diagnostic::error(
          6053,
          format!("File '{}' not found.", entry.declaration_path.display()),
        )])
      }
    };
    entry.text = Some(text.clone());
    let declaration = scan(&text).map_err(|err| vec![err.to_diagnostic(file.id)])?;
    Ok(EmittedDeclaration { text, declaration })
  }
}
