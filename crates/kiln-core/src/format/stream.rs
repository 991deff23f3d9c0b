//! Lowering a tree to a token stream
//!
//! Every leaf contributes, in order: its leading trivia, a `CloseBreak` if it
//! ends an indentation scope, the leaf itself, an `OpenBreak` if it starts
//! one, then its trailing trivia. Scopes are bracket pairs, the stretch
//! between a control-flow keyword and its body's `{`, and switch-case bodies
//! (from the label's `:` up to the first leaf of the next case or the `}`).
//! A case starts at its attribute when it has one, as in `@unknown default:`.

use crate::syntax::{NodeId, SyntaxKind, SyntaxTree, Trivia, TriviaPiece};

use super::FormatError;
use super::token::Token;

/// Walks a tree and collects its token stream
pub struct TokenStreamBuilder<'a> {
    tree: &'a SyntaxTree,
    maximum_blank_lines: usize,
    ancestors: Vec<NodeId>,
    tokens: Vec<Token>,
    depth: usize,
    /// Inside a `SwitchCase` whose first leaf is not yet lowered
    case_start: bool,
}

impl<'a> TokenStreamBuilder<'a> {
    pub fn new(tree: &'a SyntaxTree, maximum_blank_lines: usize) -> Self {
        Self {
            tree,
            maximum_blank_lines,
            ancestors: Vec::new(),
            tokens: Vec::new(),
            depth: 0,
            case_start: false,
        }
    }

    /// Lower the whole tree. Fails if the break markers do not pair up.
    pub fn build(mut self) -> Result<Vec<Token>, FormatError> {
        self.walk(self.tree.root())?;
        if self.depth != 0 {
            return Err(FormatError::UnclosedBreaks { count: self.depth });
        }
        Ok(self.tokens)
    }

    fn walk(&mut self, node: NodeId) -> Result<(), FormatError> {
        if self.tree.is_leaf(node) {
            return self.leaf(node);
        }
        if self.tree.kind(node) == SyntaxKind::SwitchCase {
            self.case_start = true;
        }
        self.ancestors.push(node);
        for &child in self.tree.children(node) {
            self.walk(child)?;
        }
        self.ancestors.pop();
        Ok(())
    }

    fn leaf(&mut self, node: NodeId) -> Result<(), FormatError> {
        let Some(leaf) = self.tree.leaf(node) else {
            return Ok(());
        };
        self.trivia(&leaf.leading);

        let kind = self.tree.kind(node);
        if kind != SyntaxKind::Eof {
            if std::mem::take(&mut self.case_start) || self.closes_scope(node, kind) {
                self.close()?;
            }
            self.tokens.push(Token::Syntax(node));
            if self.opens_scope(node, kind) {
                self.open();
            }
        }

        self.trivia(&leaf.trailing);
        Ok(())
    }

    fn open(&mut self) {
        self.depth += 1;
        self.tokens.push(Token::OpenBreak);
    }

    fn close(&mut self) -> Result<(), FormatError> {
        if self.depth == 0 {
            return Err(FormatError::UnbalancedClose {
                position: self.tokens.len(),
            });
        }
        self.depth -= 1;
        self.tokens.push(Token::CloseBreak);
        Ok(())
    }

    fn parent(&self) -> Option<NodeId> {
        self.ancestors.last().copied()
    }

    fn grandparent(&self) -> Option<NodeId> {
        self.ancestors.iter().rev().nth(1).copied()
    }

    fn parent_kind(&self) -> Option<SyntaxKind> {
        self.parent().map(|parent| self.tree.kind(parent))
    }

    fn closes_scope(&self, node: NodeId, kind: SyntaxKind) -> bool {
        match kind {
            SyntaxKind::LeftBrace => self.begins_control_flow_body(node),
            kind => kind.is_closing_delimiter(),
        }
    }

    fn opens_scope(&self, node: NodeId, kind: SyntaxKind) -> bool {
        match kind {
            SyntaxKind::IfKw
            | SyntaxKind::ForKw
            | SyntaxKind::GuardKw
            | SyntaxKind::WhileKw
            | SyntaxKind::SwitchKw => self.is_leading_keyword(node),
            SyntaxKind::Colon => matches!(
                self.parent_kind(),
                Some(SyntaxKind::SwitchCaseLabel | SyntaxKind::SwitchDefaultLabel)
            ),
            kind => kind.is_opening_delimiter(),
        }
    }

    /// The keyword is the first token of its control-flow statement
    fn is_leading_keyword(&self, node: NodeId) -> bool {
        self.parent().is_some_and(|parent| {
            self.tree.kind(parent).is_control_flow()
                && self.tree.children(parent).first() == Some(&node)
        })
    }

    /// `{` of a switch, or of the first block of `if`/`guard`/`for`/`while`
    fn begins_control_flow_body(&self, node: NodeId) -> bool {
        let Some(parent) = self.parent() else {
            return false;
        };
        match self.tree.kind(parent) {
            SyntaxKind::SwitchStmt => true,
            SyntaxKind::CodeBlock => {
                let Some(statement) = self.grandparent() else {
                    return false;
                };
                let kind = self.tree.kind(statement);
                kind.is_control_flow()
                    && kind != SyntaxKind::SwitchStmt
                    && self.tree.child_of_kind(statement, SyntaxKind::CodeBlock) == Some(parent)
                    && self.tree.children(parent).first() == Some(&node)
            }
            _ => false,
        }
    }

    fn trivia(&mut self, trivia: &Trivia) {
        let trivia = trivia.without_spaces();
        let mut line_breaks = 0;
        for piece in trivia.iter() {
            if piece.is_line_break() {
                line_breaks += piece.line_breaks();
                continue;
            }
            self.flush_line_breaks(line_breaks);
            line_breaks = 0;
            match piece {
                TriviaPiece::GarbageText(text) => self.tokens.push(Token::Comment(text.clone())),
                piece => {
                    if let Some(text) = piece.comment_text() {
                        self.tokens.push(Token::Comment(text.to_string()));
                    }
                }
            }
        }
        self.flush_line_breaks(line_breaks);
    }

    fn flush_line_breaks(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        if count > self.maximum_blank_lines {
            self.tokens.push(Token::EmptyLine);
        } else {
            self.tokens
                .extend(std::iter::repeat_n(Token::Newline, count));
        }
    }
}

/// Lower `tree` to its token stream
pub fn make_stream(tree: &SyntaxTree, maximum_blank_lines: usize) -> Result<Vec<Token>, FormatError> {
    TokenStreamBuilder::new(tree, maximum_blank_lines).build()
}
