//! Sparse syntax scanner for emitted TypeScript declaration text.
//!
//! The scanner does not build a full syntax tree. It recognizes exactly the
//! node shapes a declaration bundler rewrites — imports, export-from
//! clauses, `import x = require(...)` references, `declare` modifiers,
//! class/interface/function containers, and private members — and leaves
//! every other byte of the file as raw text between nodes. Alongside the
//! tree it records the token-level facts a token-aware rewriter needs:
//! the spans of statement-terminator `;` tokens and of strippable `export`
//! modifiers, both guaranteed to lie outside string literals and comments.

use error::ScanResult;
use lex::lex;
use loc::Loc;
use token::TT;
use tree::DeclNode;
use tree::NodeKind;

pub mod error;
pub mod lex;
pub mod loc;
pub mod scan;
pub mod token;
pub mod tree;

pub use scan::Declaration;
pub use tree::ModifierSet;

/// Scan one emitted declaration file into its sparse tree and token facts.
pub fn scan(source: &str) -> ScanResult<Declaration> {
  let tokens = lex(source)?;
  let terminators = tokens
    .iter()
    .filter(|t| t.tt == TT::Semicolon)
    .map(|t| t.loc)
    .collect();
  let mut scanner = scan::Scanner::new(source, tokens);
  let children = scanner.statements(0, false)?;
  let mut root = DeclNode::new(NodeKind::Root, Loc(0, source.len()));
  root.children = children;
  Ok(Declaration {
    root,
    terminators,
    export_keywords: scanner.into_export_keywords(),
  })
}
