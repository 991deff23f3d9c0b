//! Lossless syntax tree and the front end that builds it
//!
//! ```rust,ignore
//! use kiln_core::syntax::{parse, SyntaxKind};
//!
//! let tree = parse("if ready { launch() }\n")?;
//! assert_eq!(tree.kind(tree.root()), SyntaxKind::SourceFile);
//! assert_eq!(tree.to_string(), "if ready { launch() }\n");
//! ```

mod kind;
pub mod lexer;
mod line_index;
mod parser;
mod tree;
mod trivia;

pub use kind::SyntaxKind;
pub use line_index::LineIndex;
pub use parser::{ParseError, parse};
pub use tree::{Leaf, NodeId, Preorder, SyntaxTree};
pub use trivia::{Trivia, TriviaPiece};
