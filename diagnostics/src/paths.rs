//! Path normalization helpers shared across tooling.
//!
//! Module identifiers and intra-package references are built from
//! *package-relative* virtual paths, so the rules here differ from OS path
//! handling in two ways: separators are always `/` regardless of platform,
//! and `..` may never escape the package root — a reference that climbs out
//! of the root is not a path at all, it is a resolution failure the caller
//! must surface.

/// Replace platform separators with `/`.
pub fn normalize_slashes(raw: &str) -> String {
  raw.replace('\\', "/")
}

/// Normalize a package-relative path: forward slashes, no leading `./`,
/// `.` segments removed, `..` pops a segment. Returns `None` if `..`
/// would escape the package root.
pub fn normalize_relative(raw: &str) -> Option<String> {
  let path = normalize_slashes(raw);
  let mut components: Vec<&str> = Vec::new();
  for part in path.split('/') {
    match part {
      "" | "." => {}
      ".." => {
        components.pop()?;
      }
      part => components.push(part),
    }
  }
  Some(components.join("/"))
}

/// Join a relative specifier onto a package-relative base directory and
/// normalize the result. `base_dir` is `""` for the package root. Returns
/// `None` if the specifier escapes the package root.
pub fn join_relative(base_dir: &str, specifier: &str) -> Option<String> {
  if base_dir.is_empty() {
    normalize_relative(specifier)
  } else {
    normalize_relative(&format!("{}/{}", base_dir, specifier))
  }
}

/// The package-relative directory of a package-relative file path (`""` for
/// files at the package root).
pub fn parent_dir(path: &str) -> &str {
  match path.rfind('/') {
    Some(idx) => &path[..idx],
    None => "",
  }
}
