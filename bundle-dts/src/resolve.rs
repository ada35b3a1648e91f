//! Module identifier computation and intra-package reference rewriting.
//!
//! Exactly one identifier policy applies everywhere: the package name plus
//! the file's path relative to the output root, extension stripped, with an
//! `index` leaf collapsing into its containing directory. Relative
//! specifiers resolve against the *file's* directory and are then looked up
//! in the module map (trying `<p>` before `<p>/index`), so references into
//! and out of index files land on real modules and unknown targets are
//! detected instead of passed through.

use crate::err::ModuleCollision;
use crate::err::UnresolvedReference;
use ahash::HashMap;
use ahash::HashMapExt;
use diagnostics::paths::join_relative;
use diagnostics::paths::normalize_relative;
use diagnostics::paths::parent_dir;
use scan_dts::tree::DeclNode;
use scan_dts::tree::NodeKind;

const SOURCE_EXTENSIONS: &[&str] = &[".d.ts", ".tsx", ".ts", ".jsx", ".js"];

/// Strip a known source/declaration extension, leaving the module stem.
pub fn strip_source_ext(path: &str) -> &str {
  for ext in SOURCE_EXTENSIONS {
    if let Some(stem) = path.strip_suffix(ext) {
      return stem;
    }
  }
  path
}

/// Compute the synthesized module identifier for an extension-stripped,
/// package-relative path.
pub fn module_id(package: &str, stem: &str) -> String {
  let mut segments: Vec<&str> = stem.split('/').filter(|s| !s.is_empty()).collect();
  if segments.last() == Some(&"index") {
    segments.pop();
  }
  if segments.is_empty() {
    package.to_string()
  } else if package.is_empty() {
    segments.join("/")
  } else {
    format!("{}/{}", package, segments.join("/"))
  }
}

/// The identifier table for one run. Built once, before any file is
/// processed, from the full set of emitted source files.
pub struct ModuleMap {
  package: String,
  by_stem: HashMap<String, String>,
  collisions: Vec<ModuleCollision>,
}

impl ModuleMap {
  pub fn build<'a>(package: &str, paths: impl IntoIterator<Item = &'a str>) -> ModuleMap {
    let mut by_stem = HashMap::new();
    let mut by_id: HashMap<String, String> = HashMap::new();
    let mut collisions = Vec::new();
    for path in paths {
      let rel = normalize_relative(path).unwrap_or_else(|| path.to_string());
      let stem = strip_source_ext(&rel).to_string();
      let id = module_id(package, &stem);
      match by_id.get(&id) {
        Some(first) => collisions.push(ModuleCollision {
          id: id.clone(),
          first: first.clone(),
          second: rel.clone(),
        }),
        None => {
          by_id.insert(id.clone(), rel.clone());
        }
      }
      by_stem.insert(stem, id);
    }
    ModuleMap {
      package: package.to_string(),
      by_stem,
      collisions,
    }
  }

  pub fn package(&self) -> &str {
    &self.package
  }

  /// Identifier collisions discovered while building the table. Fatal at
  /// finalize time.
  pub fn collisions(&self) -> &[ModuleCollision] {
    &self.collisions
  }

  /// The module identifier of a source file in this run.
  pub fn id_for_source(&self, path: &str) -> Option<&str> {
    let rel = normalize_relative(path)?;
    self.by_stem.get(strip_source_ext(&rel)).map(|s| s.as_str())
  }

  /// Resolve a relative specifier against a package-relative directory,
  /// trying the target itself and then its `index`.
  pub fn resolve(&self, from_dir: &str, specifier: &str) -> Option<&str> {
    let joined = join_relative(from_dir, strip_source_ext(specifier))?;
    if let Some(id) = self.by_stem.get(joined.as_str()) {
      return Some(id);
    }
    let index = if joined.is_empty() {
      "index".to_string()
    } else {
      format!("{}/index", joined)
    };
    self.by_stem.get(index.as_str()).map(|s| s.as_str())
  }
}

/// Per-file reference resolver: the rewriter's decision function. Records
/// relative references it cannot match; those fail the run at finalize.
pub struct FileResolver<'a> {
  map: &'a ModuleMap,
  source_path: String,
  module_id: String,
  file_dir: String,
  unresolved: Vec<UnresolvedReference>,
}

impl<'a> FileResolver<'a> {
  pub fn new(map: &'a ModuleMap, source_path: &str) -> FileResolver<'a> {
    let rel = normalize_relative(source_path).unwrap_or_else(|| source_path.to_string());
    let stem = strip_source_ext(&rel).to_string();
    let module_id = match map.id_for_source(&rel) {
      Some(id) => id.to_string(),
      None => module_id(map.package(), &stem),
    };
    FileResolver {
      map,
      source_path: rel,
      module_id,
      file_dir: parent_dir(&stem).to_string(),
      unresolved: Vec::new(),
    }
  }

  pub fn module_id(&self) -> &str {
    &self.module_id
  }

  pub fn into_unresolved(self) -> Vec<UnresolvedReference> {
    self.unresolved
  }

  fn rewrite_specifier(&mut self, specifier: &str) -> Option<String> {
    match self.map.resolve(&self.file_dir, specifier) {
      Some(id) => Some(id.to_string()),
      None => {
        self.unresolved.push(UnresolvedReference {
          file: self.source_path.clone(),
          specifier: specifier.to_string(),
        });
        None
      }
    }
  }

  /// The per-node decision function. Returns replacement text, or `None`
  /// to descend.
  pub fn decide(&mut self, node: &DeclNode, parent: Option<NodeKind>) -> Option<String> {
    match node.kind {
      NodeKind::DeclareKeyword => Some(String::new()),
      NodeKind::ExternalModuleRef => {
        let specifier = node.children.first().map(|c| c.text().to_string())?;
        if !specifier.starts_with('.') {
          return None;
        }
        self
          .rewrite_specifier(&specifier)
          .map(|id| format!(" require('{}')", id))
      }
      NodeKind::StringLiteral
        if matches!(parent, Some(NodeKind::ImportDecl) | Some(NodeKind::ExportDecl)) =>
      {
        let specifier = node.text().to_string();
        if !specifier.starts_with('.') {
          return None;
        }
        self.rewrite_specifier(&specifier).map(|id| format!(" '{}'", id))
      }
      _ => None,
    }
  }
}
