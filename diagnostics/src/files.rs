use crate::render::SourceProvider;
use crate::FileId;
use std::sync::Arc;

/// A minimal in-memory store of file names and source text for rendering
/// diagnostics in tests, CLIs, and harnesses without needing a custom
/// [`SourceProvider`] implementation.
///
/// `FileId`s are allocated deterministically in insertion order starting from
/// zero. Source text is stored in `Arc<str>` to make cloning cheap.
#[derive(Clone, Debug, Default)]
pub struct SimpleFiles {
  files: Vec<SimpleFile>,
}

#[derive(Clone, Debug)]
struct SimpleFile {
  name: Arc<str>,
  text: Arc<str>,
}

impl SimpleFiles {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a new file and returns its [`FileId`]. The id is monotonically
  /// increasing and stable for the lifetime of the `SimpleFiles` instance.
  pub fn add(&mut self, name: impl Into<Arc<str>>, text: impl Into<Arc<str>>) -> FileId {
    assert!(self.files.len() < u32::MAX as usize, "file count overflow");
    let file = FileId(self.files.len() as u32);
    self.files.push(SimpleFile {
      name: name.into(),
      text: text.into(),
    });
    file
  }

  /// Replaces the text for an existing file, returning the previous text if
  /// the file existed.
  pub fn set_text(&mut self, file: FileId, text: impl Into<Arc<str>>) -> Option<Arc<str>> {
    self
      .files
      .get_mut(file.0 as usize)
      .map(|file| std::mem::replace(&mut file.text, text.into()))
  }
}

impl SourceProvider for SimpleFiles {
  fn file_name(&self, file: FileId) -> Option<&str> {
    self.files.get(file.0 as usize).map(|file| file.name.as_ref())
  }

  fn file_text(&self, file: FileId) -> Option<&str> {
    self.files.get(file.0 as usize).map(|file| file.text.as_ref())
  }
}
