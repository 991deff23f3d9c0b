//! Rendering a token stream to text

use crate::config::{Configuration, Indent};
use crate::syntax::SyntaxTree;

use super::FormatError;
use super::token::Token;

/// Glyph printed for [`Token::OpenBreak`] when breaks are shown
pub const OPEN_BREAK_GLYPH: char = '⟨';
/// Glyph printed for [`Token::CloseBreak`] when breaks are shown
pub const CLOSE_BREAK_GLYPH: char = '⟩';

/// Printer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterOptions {
    pub indentation: Indent,
    pub maximum_blank_lines: usize,
    /// Print break markers as glyphs
    pub show_breaks: bool,
}

impl PrinterOptions {
    pub fn from_configuration(configuration: &Configuration) -> Self {
        Self {
            indentation: configuration.indentation,
            maximum_blank_lines: configuration.maximum_blank_lines,
            show_breaks: false,
        }
    }

    pub fn with_show_breaks(mut self, show_breaks: bool) -> Self {
        self.show_breaks = show_breaks;
        self
    }
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self::from_configuration(&Configuration::default())
    }
}

/// Indentation bookkeeping, reset for every render
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrinterState {
    /// Indentation in characters of the indent unit
    pub current_indent: usize,
    /// A line was just ended and the next text needs indenting
    pub pending_indent: bool,
}

pub struct Printer<'a> {
    tree: &'a SyntaxTree,
    options: PrinterOptions,
    state: PrinterState,
    output: String,
}

impl<'a> Printer<'a> {
    pub fn new(tree: &'a SyntaxTree, options: PrinterOptions) -> Self {
        Self {
            tree,
            options,
            state: PrinterState::default(),
            output: String::new(),
        }
    }

    pub fn state(&self) -> PrinterState {
        self.state
    }

    pub fn render(&mut self, tokens: &[Token]) -> Result<String, FormatError> {
        self.state = PrinterState::default();
        self.output.clear();

        for token in tokens {
            self.print(token)?;
        }

        if self.state.current_indent != 0 {
            return Err(FormatError::IndentNotReset {
                indent: self.state.current_indent,
            });
        }
        Ok(std::mem::take(&mut self.output))
    }

    fn print(&mut self, token: &Token) -> Result<(), FormatError> {
        match token {
            Token::Syntax(leaf) => {
                let Some(leaf) = self.tree.leaf(*leaf) else {
                    return Ok(());
                };
                self.write_indent();
                self.output.push_str(&leaf.text);
                // Spaces on either side of a trailing comment all land before it.
                let spaces = leaf.trailing.number_of_spaces();
                self.output.extend(std::iter::repeat_n(' ', spaces));
            }
            Token::Comment(text) => {
                self.write_indent();
                self.output.push_str(text);
            }
            Token::Newline => {
                self.output.push('\n');
                self.state.pending_indent = true;
            }
            Token::EmptyLine => {
                let lines = self.options.maximum_blank_lines + 1;
                self.output.extend(std::iter::repeat_n('\n', lines));
                self.state.pending_indent = true;
            }
            Token::OpenBreak => {
                self.state.current_indent += self.options.indentation.count();
                if self.options.show_breaks {
                    self.output.push(OPEN_BREAK_GLYPH);
                }
            }
            Token::CloseBreak => {
                let unit = self.options.indentation.count();
                self.state.current_indent = self
                    .state
                    .current_indent
                    .checked_sub(unit)
                    .ok_or(FormatError::IndentUnderflow {
                        indent: self.state.current_indent,
                    })?;
                if self.options.show_breaks {
                    self.output.push(CLOSE_BREAK_GLYPH);
                }
            }
        }
        Ok(())
    }

    fn write_indent(&mut self) {
        if !self.state.pending_indent {
            return;
        }
        let character = self.options.indentation.character();
        self.output
            .extend(std::iter::repeat_n(character, self.state.current_indent));
        self.state.pending_indent = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::make_stream;
    use crate::syntax::parse;

    fn render(source: &str, options: PrinterOptions) -> String {
        let tree = parse(source).unwrap();
        let tokens = make_stream(&tree, options.maximum_blank_lines).unwrap();
        Printer::new(&tree, options).render(&tokens).unwrap()
    }

    #[test]
    fn test_render_with_breaks_shown() {
        let options = PrinterOptions::default().with_show_breaks(true);
        assert_eq!(
            render("if x { return 1 }", options),
            "if ⟨x ⟩{ ⟨return 1 ⟩}"
        );
    }

    #[test]
    fn test_reindents_blocks() {
        let source = "func go() {\nif ready {\n        launch()\n}\n}\n";
        insta::assert_snapshot!(render(source, PrinterOptions::default()), @r"
        func go() {
          if ready {
            launch()
          }
        }
        ");
    }

    #[test]
    fn test_tabs_and_blank_lines() {
        let options = PrinterOptions {
            indentation: Indent::Tabs(1),
            maximum_blank_lines: 1,
            show_breaks: false,
        };
        assert_eq!(
            render("struct A {\n\n\n\nlet a = 1\n}\n", options),
            "struct A {\n\n\tlet a = 1\n}\n"
        );
    }

    #[test]
    fn test_unknown_default_label_aligns_with_case() {
        let source = "switch x {\ncase .a(let y):\nf(y)\n@unknown default:\nbreak\n}\n";
        assert_eq!(
            render(source, PrinterOptions::default()),
            "switch x {\ncase .a(let y):\n  f(y)\n@unknown default:\n  break\n}\n"
        );
    }

    #[test]
    fn test_trailing_spaces_print_before_comment() {
        assert_eq!(
            render("let a /* c */ = 1\n", PrinterOptions::default()),
            "let a  /* c */= 1\n"
        );
    }

    #[test]
    fn test_switch_bodies_indent_under_labels() {
        let source = "switch x {\ncase 1:\na()\ndefault:\nb()\n}\n";
        assert_eq!(
            render(source, PrinterOptions::default()),
            "switch x {\ncase 1:\n  a()\ndefault:\n  b()\n}\n"
        );
    }

    #[test]
    fn test_underflow_is_an_error() {
        let tree = SyntaxTree::new();
        let mut printer = Printer::new(&tree, PrinterOptions::default());
        assert_eq!(
            printer.render(&[Token::CloseBreak]),
            Err(FormatError::IndentUnderflow { indent: 0 })
        );
    }

    #[test]
    fn test_indent_must_return_to_zero() {
        let tree = SyntaxTree::new();
        let mut printer = Printer::new(&tree, PrinterOptions::default());
        assert_eq!(
            printer.render(&[Token::OpenBreak, Token::Newline]),
            Err(FormatError::IndentNotReset { indent: 2 })
        );
    }
}
