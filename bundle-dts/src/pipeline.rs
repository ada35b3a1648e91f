//! The bundling pipeline: drives the compiler, rewrites each emitted
//! declaration, and finalizes the artifact.
//!
//! Runs move through `Idle → Configuring → Compiling → Emitting →
//! Finalizing` and terminate in `Succeeded` or `Failed`. Files are
//! processed strictly in the compiler's emission order, one at a time; the
//! module identifier table is fully known before the first file is
//! processed. Blocks accumulate in memory and the artifact is persisted in
//! one atomic write-and-rename, so a failing run leaves nothing on disk.

use crate::compiler::Compiler;
use crate::err::BundleError;
use crate::err::UnresolvedReference;
use crate::options::BundleOptions;
use crate::resolve::FileResolver;
use crate::resolve::ModuleMap;
use crate::rewrite::rewrite;
use crate::write::BlockWriter;
use diagnostics::render::render_failure;
use itertools::Itertools;
use scan_dts::loc::Loc;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

const FAILURE_HEADER: &str = "Declaration generation failed";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
  Idle,
  Configuring,
  Compiling,
  Emitting,
  Finalizing,
  Succeeded,
  Failed,
}

struct Bundler<'a, C: Compiler> {
  options: &'a BundleOptions,
  compiler: &'a mut C,
  phase: Phase,
}

/// Run the pipeline and return the artifact text.
pub fn bundle<C: Compiler>(
  options: &BundleOptions,
  compiler: &mut C,
) -> Result<String, BundleError> {
  let mut bundler = Bundler {
    options,
    compiler,
    phase: Phase::Idle,
  };
  match bundler.run() {
    Ok(artifact) => {
      bundler.transition(Phase::Succeeded);
      Ok(artifact)
    }
    Err(err) => {
      bundler.transition(Phase::Failed);
      Err(err)
    }
  }
}

/// Run the pipeline and atomically persist the artifact to `options.out`.
pub fn bundle_to_path<C: Compiler>(
  options: &BundleOptions,
  compiler: &mut C,
) -> Result<(), BundleError> {
  let out = options
    .out
    .clone()
    .ok_or_else(|| BundleError::Configuration("option 'out' is required".to_string()))?;
  let artifact = bundle(options, compiler)?;
  write_artifact(&out, &artifact)
}

impl<'a, C: Compiler> Bundler<'a, C> {
  fn transition(&mut self, next: Phase) {
    debug!(from = ?self.phase, to = ?next, "pipeline phase");
    self.phase = next;
  }

  fn run(&mut self) -> Result<String, BundleError> {
    self.transition(Phase::Configuring);
    self.options.validate()?;

    self.transition(Phase::Compiling);
    let files = self.compiler.source_files();
    let pre_emit = self.compiler.pre_emit_diagnostics();
    if !pre_emit.is_empty() {
      return Err(BundleError::Compilation {
        message: render_failure(&*self.compiler, FAILURE_HEADER, &pre_emit),
        diagnostics: pre_emit,
      });
    }
    // All source files are known here, so the identifier table is complete
    // before the first emission.
    let map = ModuleMap::build(
      &self.options.name,
      files
        .iter()
        .filter(|f| !f.is_declaration)
        .map(|f| f.path.as_str()),
    );

    self.transition(Phase::Emitting);
    let mut writer = BlockWriter::new(self.options.indent.clone());
    let mut unresolved: Vec<UnresolvedReference> = Vec::new();
    for file in &files {
      if file.is_declaration {
        debug!(file = %file.path, "skipping pre-existing declaration file");
        continue;
      }
      debug!(file = %file.path, "emitting declaration");
      let emitted = match self.compiler.emit_declaration(file) {
        Ok(emitted) => emitted,
        Err(diagnostics) => {
          return Err(BundleError::Emission {
            message: render_failure(&*self.compiler, FAILURE_HEADER, &diagnostics),
            diagnostics,
          });
        }
      };

      let mut resolver = FileResolver::new(&map, &file.path);
      let module_id = resolver.module_id().to_string();
      let elide = elide_spans(
        &emitted.declaration.terminators,
        self
          .options
          .strip_exports
          .then_some(emitted.declaration.export_keywords.as_slice()),
      );
      let body = rewrite(&emitted.text, &emitted.declaration.root, &elide, |node, parent| {
        resolver.decide(node, parent)
      });
      unresolved.extend(resolver.into_unresolved());
      writer.write_block(&module_id, &body);
    }

    self.transition(Phase::Finalizing);
    if !map.collisions().is_empty() || !unresolved.is_empty() {
      return Err(BundleError::Resolution {
        collisions: map.collisions().to_vec(),
        unresolved: unresolved.into_iter().unique().collect(),
      });
    }
    if let Some(main) = &self.options.main {
      let main_id = if main.starts_with('.') {
        match map.resolve("", main) {
          Some(id) => id.to_string(),
          None => {
            return Err(BundleError::Resolution {
              collisions: Vec::new(),
              unresolved: vec![UnresolvedReference {
                file: "(bundle options)".to_string(),
                specifier: main.clone(),
              }],
            });
          }
        }
      } else {
        main.clone()
      };
      writer.write_alias(&self.options.name, &main_id);
    }
    Ok(writer.finish())
  }
}

fn elide_spans(terminators: &[Loc], export_keywords: Option<&[Loc]>) -> Vec<Loc> {
  let mut spans = terminators.to_vec();
  if let Some(exports) = export_keywords {
    spans.extend_from_slice(exports);
    spans.sort_by_key(|loc| loc.0);
  }
  spans
}

/// Atomically persist the artifact: write a sibling temporary file, apply
/// `rw-r--r--` permissions, and rename it into place. The temporary file is
/// removed if any step fails.
pub fn write_artifact(path: &Path, artifact: &str) -> Result<(), BundleError> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)?;
  }
  let mut tmp_name = path.as_os_str().to_owned();
  tmp_name.push(".tmp");
  let tmp = PathBuf::from(tmp_name);
  let result = (|| {
    fs::write(&tmp, artifact)?;
    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      fs::set_permissions(&tmp, fs::Permissions::from_mode(0o644))?;
    }
    fs::rename(&tmp, path)
  })();
  if let Err(err) = result {
    let _ = fs::remove_file(&tmp);
    return Err(BundleError::Stream(err));
  }
  Ok(())
}
