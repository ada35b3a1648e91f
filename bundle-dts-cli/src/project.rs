//! Project configuration loading and file filtering.
//!
//! This is the layer that owns working-directory behavior: the default
//! `tsconfig.json` lookup happens here, against the process's current
//! directory, and the core pipeline only ever sees the explicit
//! configuration assembled from it.

use glob::Pattern;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectConfig {
  pub files: Vec<String>,
  pub compiler_options: CompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerOptions {
  /// Directory the external compiler emitted declarations into.
  pub out_dir: Option<String>,
  /// Overrides `outDir` for declaration output when set.
  pub declaration_dir: Option<String>,
  /// Source root stripped from file paths when deriving module
  /// identifiers.
  pub root_dir: Option<String>,
}

impl ProjectConfig {
  /// The directory holding emitted declaration files.
  pub fn declaration_out_dir(&self) -> Option<&str> {
    self
      .compiler_options
      .declaration_dir
      .as_deref()
      .or(self.compiler_options.out_dir.as_deref())
  }
}

pub fn load_project(path: &Path) -> Result<ProjectConfig, String> {
  let text = fs::read_to_string(path)
    .map_err(|err| format!("failed to read project file {}: {}", path.display(), err))?;
  serde_json::from_str(&text)
    .map_err(|err| format!("failed to parse project file {}: {}", path.display(), err))
}

/// Apply include/exclude globs to the project's file list, preserving
/// order. An empty include list keeps everything not excluded.
pub fn filter_files(
  files: Vec<String>,
  includes: &[String],
  exclude: &[String],
) -> Result<Vec<String>, String> {
  let includes = compile_patterns(includes)?;
  let exclude = compile_patterns(exclude)?;
  Ok(
    files
      .into_iter()
      .filter(|file| {
        let included = includes.is_empty() || includes.iter().any(|p| p.matches(file));
        included && !exclude.iter().any(|p| p.matches(file))
      })
      .collect(),
  )
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>, String> {
  patterns
    .iter()
    .map(|raw| Pattern::new(raw).map_err(|err| format!("invalid glob '{}': {}", raw, err)))
    .collect()
}
