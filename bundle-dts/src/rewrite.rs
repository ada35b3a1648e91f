//! Cursor-driven selective text splicing over one declaration tree.
//!
//! The traversal copies original text verbatim between recognized nodes and
//! splices in elisions and replacements at the nodes themselves, so all
//! whitespace, comments, and punctuation the scanner did not model survive
//! byte-for-byte. The cursor is monotonically non-decreasing: every byte of
//! the input is either copied once or deliberately skipped, never both.
//!
//! Token-level stripping happens here too: verbatim copies omit the
//! `elide_tokens` spans (statement terminators, optionally `export`
//! keywords). Because those spans were recorded by the lexer, a `;` inside
//! a string literal or comment is never touched.

use scan_dts::loc::Loc;
use scan_dts::tree::DeclNode;
use scan_dts::tree::NodeKind;

/// Rewrite one file. `decide` is consulted per node with the parent's kind;
/// returning replacement text replaces the node's whole subtree.
/// `elide_tokens` must be sorted by start offset.
pub fn rewrite<F>(source: &str, root: &DeclNode, elide_tokens: &[Loc], decide: F) -> String
where
  F: FnMut(&DeclNode, Option<NodeKind>) -> Option<String>,
{
  let mut rewriter = Rewriter {
    source,
    out: String::with_capacity(source.len()),
    cursor: 0,
    elide: elide_tokens,
    elide_idx: 0,
    decide,
  };
  for child in &root.children {
    rewriter.visit(child, root.kind);
  }
  rewriter.read_through(source.len());
  rewriter.out
}

struct Rewriter<'a, F> {
  source: &'a str,
  out: String,
  cursor: usize,
  elide: &'a [Loc],
  elide_idx: usize,
  decide: F,
}

impl<'a, F> Rewriter<'a, F>
where
  F: FnMut(&DeclNode, Option<NodeKind>) -> Option<String>,
{
  fn visit(&mut self, node: &DeclNode, parent: NodeKind) {
    self.read_through(node.loc.0);

    if node.is_private() {
      // Private members are elided entirely, leading trivia included.
      self.skip_to(node.loc.1);
      return;
    }

    if node.kind == NodeKind::ImportDecl && !node.has_binding_clause() {
      // Side-effect-only imports have no declarable value in a type-only
      // bundle.
      self.skip_to(node.loc.1);
      return;
    }

    if let Some(replacement) = (self.decide)(node, Some(parent)) {
      self.out.push_str(&replacement);
      self.skip_to(node.loc.1);
      return;
    }

    if matches!(
      node.kind,
      NodeKind::ClassDecl | NodeKind::InterfaceDecl | NodeKind::FunctionDecl
    ) {
      self.out.push('\n');
    }
    for child in &node.children {
      self.visit(child, node.kind);
    }
  }

  /// Copy original text from the cursor up to `to`, omitting elide spans.
  fn read_through(&mut self, to: usize) {
    let to = to.min(self.source.len());
    debug_assert!(to >= self.cursor);
    while self.cursor < to {
      while self.elide_idx < self.elide.len() && self.elide[self.elide_idx].1 <= self.cursor {
        self.elide_idx += 1;
      }
      match self.elide.get(self.elide_idx) {
        Some(&span) if span.0 < to => {
          if span.0 > self.cursor {
            self.out.push_str(&self.source[self.cursor..span.0]);
          }
          self.cursor = span.1.min(to).max(self.cursor);
          if span.1 <= to {
            self.elide_idx += 1;
          }
        }
        _ => {
          self.out.push_str(&self.source[self.cursor..to]);
          self.cursor = to;
        }
      }
    }
  }

  fn skip_to(&mut self, to: usize) {
    debug_assert!(to >= self.cursor);
    self.cursor = self.cursor.max(to.min(self.source.len()));
  }
}
