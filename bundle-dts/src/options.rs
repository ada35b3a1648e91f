use crate::err::BundleError;
use serde::Deserialize;
use serde::Serialize;
use std::path::PathBuf;

/// The indentation unit the upstream compiler uses in emitted declarations.
pub const COMPILER_INDENT: &str = "    ";

/// The default indentation unit for re-nested module bodies.
pub const DEFAULT_INDENT: &str = "  ";

/// Explicit bundling configuration, built by the caller (CLI or embedder)
/// and passed into the pipeline. The core never consults the working
/// directory or reads configuration files itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BundleOptions {
  /// Package name used as the prefix of every synthesized module
  /// identifier. Required.
  pub name: String,
  /// Output artifact path. Required for [`crate::bundle_to_path`]; unused
  /// by [`crate::bundle`], which returns the artifact text.
  pub out: Option<PathBuf>,
  /// Entry module. When set, a final block aliases the whole package to
  /// this module. Relative values resolve through the module map.
  pub main: Option<String>,
  /// Indentation unit for re-nested bodies.
  pub indent: String,
  /// Strip redundant `export` keywords from declarations inside module
  /// blocks.
  pub strip_exports: bool,
  /// File-filtering globs passed through to the compiler.
  pub exclude: Vec<String>,
  pub includes: Vec<String>,
}

impl Default for BundleOptions {
  fn default() -> Self {
    BundleOptions {
      name: String::new(),
      out: None,
      main: None,
      indent: DEFAULT_INDENT.to_string(),
      strip_exports: false,
      exclude: Vec::new(),
      includes: Vec::new(),
    }
  }
}

impl BundleOptions {
  pub fn new(name: impl Into<String>) -> Self {
    BundleOptions {
      name: name.into(),
      ..Default::default()
    }
  }

  pub fn with_main(mut self, main: impl Into<String>) -> Self {
    self.main = Some(main.into());
    self
  }

  pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
    self.indent = indent.into();
    self
  }

  pub fn validate(&self) -> Result<(), BundleError> {
    if self.name.is_empty() {
      return Err(BundleError::Configuration(
        "option 'name' is required".to_string(),
      ));
    }
    if !self.indent.chars().all(|c| c == ' ' || c == '\t') {
      return Err(BundleError::Configuration(
        "option 'indent' must consist of spaces or tabs".to_string(),
      ));
    }
    Ok(())
  }
}
