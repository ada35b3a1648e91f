use crate::loc::Loc;
use serde::Serialize;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;

/// The node shapes the bundler's rewriter recognizes. Everything else in a
/// declaration file is raw text between nodes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub enum NodeKind {
  Root,
  /// `import ... from '...'` or `import '...'` (no binding clause).
  ImportDecl,
  /// `export ... from '...'`.
  ExportDecl,
  /// The `require('...')` reference of an `import x = require('...')`.
  ExternalModuleRef,
  /// A `declare` modifier keyword.
  DeclareKeyword,
  /// A module-specifier string literal.
  StringLiteral,
  ClassDecl,
  InterfaceDecl,
  FunctionDecl,
  /// A `namespace`/`module`/`global` declaration with a braced body.
  ModuleDecl,
  /// A class or interface member.
  Member,
}

/// An explicit modifier set, replacing flag-bit inspection of any one
/// compiler's internal node representation.
#[derive(Copy, Clone, Eq, PartialEq, Default, Serialize)]
pub struct ModifierSet(u8);

impl ModifierSet {
  pub const PRIVATE: ModifierSet = ModifierSet(1 << 0);
  pub const DECLARE: ModifierSet = ModifierSet(1 << 1);
  pub const EXPORT: ModifierSet = ModifierSet(1 << 2);
  /// Set on imports that bind names; absent on side-effect-only imports.
  pub const BINDING_CLAUSE: ModifierSet = ModifierSet(1 << 3);

  pub const fn contains(self, other: ModifierSet) -> bool {
    self.0 & other.0 == other.0
  }

  pub fn insert(&mut self, other: ModifierSet) {
    self.0 |= other.0;
  }

  pub const fn union(self, other: ModifierSet) -> ModifierSet {
    ModifierSet(self.0 | other.0)
  }

  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }
}

impl Debug for ModifierSet {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let mut names = Vec::new();
    if self.contains(ModifierSet::PRIVATE) {
      names.push("private");
    }
    if self.contains(ModifierSet::DECLARE) {
      names.push("declare");
    }
    if self.contains(ModifierSet::EXPORT) {
      names.push("export");
    }
    if self.contains(ModifierSet::BINDING_CLAUSE) {
      names.push("binding_clause");
    }
    write!(f, "ModifierSet[{}]", names.join(" "))
  }
}

/// One node of the sparse declaration tree.
#[derive(Clone, Debug, Serialize)]
pub struct DeclNode {
  pub kind: NodeKind,
  pub loc: Loc,
  pub modifiers: ModifierSet,
  /// Decoded value for [`NodeKind::StringLiteral`] nodes.
  pub value: Option<String>,
  pub children: Vec<DeclNode>,
}

impl DeclNode {
  pub fn new(kind: NodeKind, loc: Loc) -> DeclNode {
    DeclNode {
      kind,
      loc,
      modifiers: ModifierSet::default(),
      value: None,
      children: Vec::new(),
    }
  }

  pub fn with_modifiers(mut self, modifiers: ModifierSet) -> DeclNode {
    self.modifiers = modifiers;
    self
  }

  pub fn with_value(mut self, value: impl Into<String>) -> DeclNode {
    self.value = Some(value.into());
    self
  }

  pub fn is_private(&self) -> bool {
    self.modifiers.contains(ModifierSet::PRIVATE)
  }

  pub fn has_binding_clause(&self) -> bool {
    self.modifiers.contains(ModifierSet::BINDING_CLAUSE)
  }

  /// The decoded string value, for specifier nodes.
  pub fn text(&self) -> &str {
    self.value.as_deref().unwrap_or("")
  }
}
