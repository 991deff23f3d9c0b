//! Token stream construction and printing
//!
//! A tree is lowered by [`TokenStreamBuilder`] into [`Token`]s carrying
//! explicit indentation break markers, then rendered by [`Printer`].
//!
//! ```rust,ignore
//! let tree = kiln_core::syntax::parse("if x { return 1 }")?;
//! let tokens = make_stream(&tree, 1)?;
//! let options = PrinterOptions::default().with_show_breaks(true);
//! assert_eq!(Printer::new(&tree, options).render(&tokens)?, "if ⟨x ⟩{ ⟨return 1 ⟩}");
//! ```

mod printer;
mod stream;
mod token;

pub use printer::{CLOSE_BREAK_GLYPH, OPEN_BREAK_GLYPH, Printer, PrinterOptions, PrinterState};
pub use stream::{TokenStreamBuilder, make_stream};
pub use token::{Token, describe_tokens};

use thiserror::Error;

use crate::error::KilnError;
use crate::syntax::SyntaxTree;

/// Break markers or indentation out of balance
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("close break without a matching open break at token {position}")]
    UnbalancedClose { position: usize },

    #[error("{count} open break(s) never closed")]
    UnclosedBreaks { count: usize },

    #[error("indentation underflow (indent was {indent})")]
    IndentUnderflow { indent: usize },

    #[error("indentation is {indent} at end of file, expected 0")]
    IndentNotReset { indent: usize },
}

impl From<FormatError> for KilnError {
    fn from(err: FormatError) -> Self {
        KilnError::internal_error(err.to_string())
    }
}

/// Lower and render `tree` in one step
pub fn pretty_print(tree: &SyntaxTree, options: PrinterOptions) -> Result<String, FormatError> {
    let tokens = make_stream(tree, options.maximum_blank_lines)?;
    Printer::new(tree, options).render(&tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse;

    #[test]
    fn test_pretty_print_is_idempotent() {
        let source = "struct Point {\n    let x: Int\n\n\n    func norm() -> Int {\n        return x * x\n    }\n}\n";
        let options = PrinterOptions::default();

        let once = pretty_print(&parse(source).unwrap(), options).unwrap();
        let twice = pretty_print(&parse(&once).unwrap(), options).unwrap();
        assert_eq!(once, twice);
        assert_eq!(
            once,
            "struct Point {\n  let x: Int\n\n  func norm() -> Int {\n    return x * x\n  }\n}\n"
        );
    }

    #[test]
    fn test_format_error_becomes_internal_error() {
        let err: KilnError = FormatError::IndentUnderflow { indent: 0 }.into();
        assert_eq!(err.kind(), crate::error::ErrorKind::Internal);
    }
}
