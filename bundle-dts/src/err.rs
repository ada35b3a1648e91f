use diagnostics::Diagnostic;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io;

/// Two source files whose synthesized module identifiers are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModuleCollision {
  pub id: String,
  pub first: String,
  pub second: String,
}

/// A relative reference that matched no module in the compilation unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnresolvedReference {
  pub file: String,
  pub specifier: String,
}

/// Bundling failures, by origin. Callers can distinguish configuration
/// mistakes from compiler-reported source errors by variant; the pipeline
/// raises exactly one of these per run.
#[derive(Debug)]
pub enum BundleError {
  /// A missing or malformed option.
  Configuration(String),
  /// Pre-emit diagnostics from the compilation unit.
  Compilation {
    message: String,
    diagnostics: Vec<Diagnostic>,
  },
  /// Diagnostics raised while emitting one file's declaration.
  Emission {
    message: String,
    diagnostics: Vec<Diagnostic>,
  },
  /// Identifier collisions or unmatched relative references.
  Resolution {
    collisions: Vec<ModuleCollision>,
    unresolved: Vec<UnresolvedReference>,
  },
  /// Output transport failure.
  Stream(io::Error),
}

impl Display for BundleError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      BundleError::Configuration(message) => f.write_str(message),
      BundleError::Compilation { message, .. } | BundleError::Emission { message, .. } => {
        f.write_str(message)
      }
      BundleError::Resolution {
        collisions,
        unresolved,
      } => {
        f.write_str("Declaration generation failed")?;
        for collision in collisions {
          write!(
            f,
            "\nModules '{}' and '{}' both resolve to '{}'.",
            collision.first, collision.second, collision.id
          )?;
        }
        for reference in unresolved {
          write!(
            f,
            "\nCannot find module '{}' referenced from '{}'.",
            reference.specifier, reference.file
          )?;
        }
        Ok(())
      }
      BundleError::Stream(err) => write!(f, "output stream failure: {}", err),
    }
  }
}

impl Error for BundleError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      BundleError::Stream(err) => Some(err),
      _ => None,
    }
  }
}

impl From<io::Error> for BundleError {
  fn from(err: io::Error) -> Self {
    BundleError::Stream(err)
  }
}

impl BundleError {
  /// The structured diagnostics behind a compilation or emission failure.
  pub fn diagnostics(&self) -> &[Diagnostic] {
    match self {
      BundleError::Compilation { diagnostics, .. } | BundleError::Emission { diagnostics, .. } => {
        diagnostics
      }
      _ => &[],
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolution_error_lists_collisions_and_unresolved() {
    let err = BundleError::Resolution {
      collisions: vec![ModuleCollision {
        id: "pkg/foo".to_string(),
        first: "foo.ts".to_string(),
        second: "foo/index.ts".to_string(),
      }],
      unresolved: vec![UnresolvedReference {
        file: "bar.ts".to_string(),
        specifier: "./missing".to_string(),
      }],
    };
    let rendered = err.to_string();
    assert_eq!(
      rendered,
      "Declaration generation failed\n\
       Modules 'foo.ts' and 'foo/index.ts' both resolve to 'pkg/foo'.\n\
       Cannot find module './missing' referenced from 'bar.ts'."
    );
  }

  #[test]
  fn stream_error_exposes_source() {
    let err = BundleError::Stream(io::Error::new(io::ErrorKind::Other, "disk full"));
    assert!(err.source().is_some());
    assert!(err.to_string().contains("disk full"));
  }
}
