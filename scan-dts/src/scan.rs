use crate::error::ScanErrorType;
use crate::error::ScanResult;
use crate::lex::string_value;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;
use crate::tree::DeclNode;
use crate::tree::ModifierSet;
use crate::tree::NodeKind;

/// The result of scanning one declaration file: the sparse tree plus the
/// token-level facts a token-aware rewriter consumes.
#[derive(Clone, Debug)]
pub struct Declaration {
  pub root: DeclNode,
  /// Spans of every statement-terminator `;` token. Guaranteed to lie
  /// outside string literals, templates, and comments.
  pub terminators: Vec<Loc>,
  /// Spans of `export` modifier keywords (including their trailing
  /// whitespace) that can be stripped without changing meaning. `export`
  /// tokens on re-export clauses, default exports, `export =`, and
  /// `export import` are never recorded.
  pub export_keywords: Vec<Loc>,
}

impl Declaration {
  pub fn is_empty(&self) -> bool {
    self.root.children.is_empty()
  }
}

pub(crate) struct Scanner<'a> {
  source: &'a str,
  tokens: Vec<Token>,
  i: usize,
  export_keywords: Vec<Loc>,
}

impl<'a> Scanner<'a> {
  pub(crate) fn new(source: &'a str, tokens: Vec<Token>) -> Scanner<'a> {
    debug_assert!(matches!(tokens.last(), Some(t) if t.tt == TT::EOF));
    Scanner {
      source,
      tokens,
      i: 0,
      export_keywords: Vec::new(),
    }
  }

  pub(crate) fn into_export_keywords(self) -> Vec<Loc> {
    self.export_keywords
  }

  fn cur(&self) -> Token {
    self.tokens[self.i.min(self.tokens.len() - 1)]
  }

  fn peek(&self, n: usize) -> Token {
    self.tokens[(self.i + n).min(self.tokens.len() - 1)]
  }

  fn bump(&mut self) -> Token {
    let token = self.cur();
    if token.tt != TT::EOF {
      self.i += 1;
    }
    token
  }

  fn expect(&mut self, tt: TT, what: &'static str) -> ScanResult<Token> {
    let token = self.cur();
    if token.tt == tt {
      Ok(self.bump())
    } else if tt == TT::LiteralString {
      Err(token.loc.error(ScanErrorType::ExpectedString))
    } else {
      Err(token.loc.error(ScanErrorType::ExpectedToken(what)))
    }
  }

  /// End offset of the last consumed token.
  fn prev_end(&self) -> usize {
    if self.i == 0 {
      0
    } else {
      self.tokens[self.i - 1].loc.1
    }
  }

  /// Scan a statement list. `prev_end` seeds the trivia-inclusive start of
  /// the first statement; `stop_at_brace` distinguishes a braced body from
  /// the top level.
  pub(crate) fn statements(
    &mut self,
    prev_end: usize,
    stop_at_brace: bool,
  ) -> ScanResult<Vec<DeclNode>> {
    let mut nodes = Vec::new();
    let mut prev = prev_end;
    loop {
      match self.cur().tt {
        TT::EOF => {
          if stop_at_brace {
            return Err(self.cur().loc.error(ScanErrorType::UnexpectedEndOfFile));
          }
          break;
        }
        TT::BraceClose if stop_at_brace => break,
        TT::BraceClose => {
          return Err(self.cur().loc.error(ScanErrorType::UnexpectedToken));
        }
        TT::Semicolon => {
          self.bump();
        }
        _ => self.statement(prev, &mut nodes)?,
      }
      prev = self.prev_end();
    }
    Ok(nodes)
  }

  fn statement(&mut self, pos: usize, nodes: &mut Vec<DeclNode>) -> ScanResult<()> {
    let mut export_span: Option<Loc> = None;
    let mut declare_node: Option<DeclNode> = None;
    let mut saw_default = false;
    loop {
      match self.cur().tt {
        TT::KeywordExport if export_span.is_none() => {
          let token = self.bump();
          export_span = Some(Loc(token.loc.0, self.cur().loc.0));
        }
        TT::KeywordDefault => {
          saw_default = true;
          self.bump();
        }
        TT::KeywordDeclare if declare_node.is_none() => {
          let token = self.bump();
          declare_node = Some(DeclNode::new(
            NodeKind::DeclareKeyword,
            Loc(token.loc.0, self.cur().loc.0),
          ));
        }
        TT::KeywordAbstract => {
          self.bump();
        }
        _ => break,
      }
    }

    let fact_eligible = export_span.is_some() && !saw_default;
    let mut record_fact = |scanner: &mut Scanner<'a>| {
      if fact_eligible {
        scanner.export_keywords.push(export_span.unwrap());
      }
    };

    match self.cur().tt {
      TT::KeywordImport => {
        if let Some(declare) = declare_node {
          nodes.push(declare);
        }
        self.import_statement(pos, nodes)?;
      }
      TT::KeywordClass | TT::KeywordInterface => {
        record_fact(self);
        let node = self.class_like(pos, declare_node)?;
        nodes.push(node);
      }
      TT::KeywordFunction => {
        record_fact(self);
        let node = self.function_decl(pos, declare_node);
        nodes.push(node);
      }
      TT::KeywordEnum => {
        record_fact(self);
        if let Some(declare) = declare_node {
          nodes.push(declare);
        }
        self.braced_statement()?;
      }
      TT::KeywordConst => {
        record_fact(self);
        if let Some(declare) = declare_node {
          nodes.push(declare);
        }
        self.bump();
        if self.cur().tt == TT::KeywordEnum {
          self.braced_statement()?;
        } else {
          self.skip_simple_statement();
        }
      }
      TT::KeywordNamespace | TT::KeywordModule => {
        record_fact(self);
        self.module_decl(pos, declare_node, nodes)?;
      }
      TT::KeywordGlobal if self.peek(1).tt == TT::BraceOpen => {
        self.module_decl(pos, declare_node, nodes)?;
      }
      TT::BraceOpen | TT::Asterisk if export_span.is_some() => {
        self.export_from(pos, nodes)?;
      }
      TT::KeywordType
        if export_span.is_some()
          && matches!(self.peek(1).tt, TT::BraceOpen | TT::Asterisk) =>
      {
        self.bump();
        self.export_from(pos, nodes)?;
      }
      TT::Equals => {
        // export = x;
        self.skip_simple_statement();
      }
      _ => {
        record_fact(self);
        if let Some(declare) = declare_node {
          nodes.push(declare);
        }
        self.skip_simple_statement();
      }
    }
    Ok(())
  }

  fn import_statement(&mut self, pos: usize, nodes: &mut Vec<DeclNode>) -> ScanResult<()> {
    let import_tok = self.bump();
    match self.cur().tt {
      TT::LiteralString => {
        let str_tok = self.bump();
        let semi = self.expect(TT::Semicolon, ";")?;
        let mut node = DeclNode::new(NodeKind::ImportDecl, Loc(pos, semi.loc.1));
        node.children.push(
          DeclNode::new(NodeKind::StringLiteral, Loc(import_tok.loc.1, str_tok.loc.1))
            .with_value(string_value(self.source, str_tok.loc)),
        );
        nodes.push(node);
      }
      TT::Identifier if self.peek(1).tt == TT::Equals => {
        self.bump();
        let eq = self.bump();
        self.expect(TT::KeywordRequire, "require")?;
        let lparen = self.expect(TT::ParenOpen, "(")?;
        let str_tok = self.expect(TT::LiteralString, "string")?;
        let rparen = self.expect(TT::ParenClose, ")")?;
        self.expect(TT::Semicolon, ";")?;
        let mut node = DeclNode::new(NodeKind::ExternalModuleRef, Loc(eq.loc.1, rparen.loc.1));
        node.children.push(
          DeclNode::new(NodeKind::StringLiteral, Loc(lparen.loc.1, str_tok.loc.1))
            .with_value(string_value(self.source, str_tok.loc)),
        );
        nodes.push(node);
      }
      _ => {
        loop {
          match self.cur().tt {
            TT::KeywordFrom => break,
            TT::EOF | TT::Semicolon => {
              return Err(self.cur().loc.error(ScanErrorType::ExpectedToken("from")));
            }
            _ => {
              self.bump();
            }
          }
        }
        let from = self.bump();
        let str_tok = self.expect(TT::LiteralString, "string")?;
        let semi = self.expect(TT::Semicolon, ";")?;
        let mut node = DeclNode::new(NodeKind::ImportDecl, Loc(pos, semi.loc.1))
          .with_modifiers(ModifierSet::BINDING_CLAUSE);
        node.children.push(
          DeclNode::new(NodeKind::StringLiteral, Loc(from.loc.1, str_tok.loc.1))
            .with_value(string_value(self.source, str_tok.loc)),
        );
        nodes.push(node);
      }
    }
    Ok(())
  }

  fn export_from(&mut self, pos: usize, nodes: &mut Vec<DeclNode>) -> ScanResult<()> {
    loop {
      match self.cur().tt {
        TT::KeywordFrom => break,
        TT::Semicolon => {
          // `export { X };` — nothing to rewrite.
          self.bump();
          return Ok(());
        }
        TT::EOF => return Ok(()),
        _ => {
          self.bump();
        }
      }
    }
    let from = self.bump();
    let str_tok = self.expect(TT::LiteralString, "string")?;
    let semi = self.expect(TT::Semicolon, ";")?;
    let mut node = DeclNode::new(NodeKind::ExportDecl, Loc(pos, semi.loc.1));
    node.children.push(
      DeclNode::new(NodeKind::StringLiteral, Loc(from.loc.1, str_tok.loc.1))
        .with_value(string_value(self.source, str_tok.loc)),
    );
    nodes.push(node);
    Ok(())
  }

  fn class_like(&mut self, pos: usize, declare_node: Option<DeclNode>) -> ScanResult<DeclNode> {
    let kw = self.bump();
    let kind = if kw.tt == TT::KeywordClass {
      NodeKind::ClassDecl
    } else {
      NodeKind::InterfaceDecl
    };
    // Name, type parameters, heritage. `<`/`>` are brackets in this
    // position, so the body brace is the first `{` at angle depth zero.
    let mut angle = 0i32;
    loop {
      match self.cur().tt {
        TT::ChevronLeft => {
          angle += 1;
          self.bump();
        }
        TT::ChevronRight => {
          angle -= 1;
          self.bump();
        }
        TT::BraceOpen if angle <= 0 => break,
        TT::EOF => return Err(self.cur().loc.error(ScanErrorType::UnexpectedEndOfFile)),
        _ => {
          self.bump();
        }
      }
    }
    let brace = self.bump();
    let mut node = DeclNode::new(kind, Loc(pos, brace.loc.1));
    if let Some(declare) = declare_node {
      node.modifiers.insert(ModifierSet::DECLARE);
      node.children.push(declare);
    }
    let mut prev = brace.loc.1;
    loop {
      match self.cur().tt {
        TT::BraceClose => break,
        TT::EOF => return Err(self.cur().loc.error(ScanErrorType::UnexpectedEndOfFile)),
        _ => {
          self.member(prev, &mut node.children);
          prev = self.prev_end();
        }
      }
    }
    let close = self.bump();
    node.loc = Loc(pos, close.loc.1);
    Ok(node)
  }

  fn member(&mut self, prev_end: usize, children: &mut Vec<DeclNode>) {
    // Accessibility modifiers come first in emitted declarations, so a
    // private member is identified by its leading `private` keyword. A
    // property *named* `private` is followed by punctuation, not a name.
    let is_private = self.cur().tt == TT::KeywordPrivate
      && matches!(self.peek(1).tt, TT::Identifier | TT::KeywordAbstract);
    let mut depth = 0i32;
    let mut angle = 0i32;
    loop {
      match self.cur().tt {
        TT::BraceOpen | TT::ParenOpen | TT::BracketOpen => {
          depth += 1;
          self.bump();
        }
        TT::BraceClose if depth == 0 => break,
        TT::BraceClose | TT::ParenClose | TT::BracketClose => {
          depth -= 1;
          self.bump();
        }
        TT::ChevronLeft => {
          angle += 1;
          self.bump();
        }
        TT::ChevronRight => {
          angle -= 1;
          self.bump();
        }
        TT::Semicolon | TT::Comma if depth == 0 && angle <= 0 => {
          self.bump();
          break;
        }
        TT::EOF => break,
        _ => {
          self.bump();
        }
      }
    }
    if is_private {
      children.push(
        DeclNode::new(NodeKind::Member, Loc(prev_end, self.prev_end()))
          .with_modifiers(ModifierSet::PRIVATE),
      );
    }
  }

  fn function_decl(&mut self, pos: usize, declare_node: Option<DeclNode>) -> DeclNode {
    self.bump();
    let mut depth = 0i32;
    loop {
      match self.cur().tt {
        TT::BraceOpen | TT::ParenOpen | TT::BracketOpen => {
          depth += 1;
          self.bump();
        }
        TT::BraceClose if depth == 0 => break,
        TT::BraceClose | TT::ParenClose | TT::BracketClose => {
          depth -= 1;
          self.bump();
        }
        TT::Semicolon if depth == 0 => {
          self.bump();
          break;
        }
        TT::EOF => break,
        _ => {
          self.bump();
        }
      }
    }
    let mut node = DeclNode::new(NodeKind::FunctionDecl, Loc(pos, self.prev_end()));
    if let Some(declare) = declare_node {
      node.modifiers.insert(ModifierSet::DECLARE);
      node.children.push(declare);
    }
    node
  }

  fn module_decl(
    &mut self,
    pos: usize,
    declare_node: Option<DeclNode>,
    nodes: &mut Vec<DeclNode>,
  ) -> ScanResult<()> {
    self.bump();
    loop {
      match self.cur().tt {
        TT::BraceOpen => break,
        TT::Semicolon => {
          // Shorthand ambient declaration without a body.
          self.bump();
          if let Some(declare) = declare_node {
            nodes.push(declare);
          }
          return Ok(());
        }
        TT::EOF => return Err(self.cur().loc.error(ScanErrorType::UnexpectedEndOfFile)),
        _ => {
          self.bump();
        }
      }
    }
    let brace = self.bump();
    let body = self.statements(brace.loc.1, true)?;
    let close = self.expect(TT::BraceClose, "}")?;
    let mut node = DeclNode::new(NodeKind::ModuleDecl, Loc(pos, close.loc.1));
    if let Some(declare) = declare_node {
      node.modifiers.insert(ModifierSet::DECLARE);
      node.children.push(declare);
    }
    node.children.extend(body);
    nodes.push(node);
    Ok(())
  }

  fn braced_statement(&mut self) -> ScanResult<()> {
    loop {
      match self.cur().tt {
        TT::BraceOpen => break,
        TT::Semicolon => {
          self.bump();
          return Ok(());
        }
        TT::EOF => return Ok(()),
        _ => {
          self.bump();
        }
      }
    }
    let mut depth = 0i32;
    loop {
      match self.cur().tt {
        TT::BraceOpen => {
          depth += 1;
          self.bump();
        }
        TT::BraceClose => {
          depth -= 1;
          self.bump();
          if depth == 0 {
            break;
          }
        }
        TT::EOF => return Err(self.cur().loc.error(ScanErrorType::UnexpectedEndOfFile)),
        _ => {
          self.bump();
        }
      }
    }
    Ok(())
  }

  fn skip_simple_statement(&mut self) {
    let mut depth = 0i32;
    loop {
      match self.cur().tt {
        TT::BraceOpen | TT::ParenOpen | TT::BracketOpen => {
          depth += 1;
          self.bump();
        }
        TT::BraceClose if depth == 0 => return,
        TT::BraceClose | TT::ParenClose | TT::BracketClose => {
          depth -= 1;
          self.bump();
        }
        TT::Semicolon if depth == 0 => {
          self.bump();
          return;
        }
        TT::EOF => return,
        _ => {
          self.bump();
        }
      }
    }
  }
}
