//! Printer input

use crate::syntax::{NodeId, SyntaxTree};

/// One element of the printer's input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A leaf; the printer reads its text and trailing spacing from the tree
    Syntax(NodeId),
    /// Comment text, markers included
    Comment(String),
    Newline,
    /// A run of line breaks longer than the blank-line limit
    EmptyLine,
    /// Indent one unit from here on
    OpenBreak,
    /// Dedent one unit
    CloseBreak,
}

impl Token {
    pub fn is_break(&self) -> bool {
        matches!(self, Token::OpenBreak | Token::CloseBreak)
    }

    /// Short label, resolving leaves against `tree`
    pub fn describe(&self, tree: &SyntaxTree) -> String {
        match self {
            Token::Syntax(leaf) => tree.token_text(*leaf).to_string(),
            Token::Comment(text) => text.clone(),
            Token::Newline => "\\n".to_string(),
            Token::EmptyLine => "<empty>".to_string(),
            Token::OpenBreak => "⟨".to_string(),
            Token::CloseBreak => "⟩".to_string(),
        }
    }
}

/// Labels for a whole stream, for tests and `--debug` dumps
pub fn describe_tokens(tokens: &[Token], tree: &SyntaxTree) -> Vec<String> {
    tokens.iter().map(|token| token.describe(tree)).collect()
}
