use crate::error::ScanError;
use crate::error::ScanErrorType;
use diagnostics::TextRange;
use std::cmp::max;
use std::cmp::min;

/// A byte range within a single file.
///
/// Spans handed out by the scanner are **trivia-inclusive** on the left for
/// statement and member nodes: a node's span begins where the previous
/// sibling ended, so the whitespace and comments leading into a construct
/// belong to that construct. Eliding a node therefore also removes its
/// leading trivia, and replacement text is responsible for any separating
/// whitespace it needs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  pub fn len(&self) -> usize {
    self.1.saturating_sub(self.0)
  }

  pub fn is_empty(&self) -> bool {
    self.0 >= self.1
  }

  pub fn extend(&mut self, other: Loc) {
    self.0 = min(self.0, other.0);
    self.1 = max(self.1, other.1);
  }

  /// Create an error at this location.
  pub fn error(self, typ: ScanErrorType) -> ScanError {
    ScanError::new(typ, self)
  }

  /// Convert into a `diagnostics` range, saturating to `u32`.
  pub fn to_range(self) -> TextRange {
    let clamp = |v: usize| v.min(u32::MAX as usize) as u32;
    TextRange::new(clamp(self.0), clamp(self.1))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extend_covers_both_spans() {
    let mut loc = Loc(4, 8);
    loc.extend(Loc(2, 6));
    assert_eq!(loc, Loc(2, 8));
  }

  #[test]
  fn to_range_saturates_large_offsets() {
    let range = Loc(usize::MAX - 1, usize::MAX).to_range();
    assert_eq!(range.start, u32::MAX);
    assert_eq!(range.end, u32::MAX);
  }
}
