//! Trivia-preserving lexer
//!
//! Lexing happens in two steps. The scanner splits the input into tokens
//! and trivia pieces; attachment then hangs the trivia on the tokens:
//!
//! - trailing trivia is the whitespace and comments on the same line after a
//!   token, minus whitespace that only runs into a line break;
//! - leading trivia is everything else before a token.
//!
//! The final token is always a zero-width [`SyntaxKind::Eof`] that carries
//! whatever trivia ends the file, so `lex_with_trivia(s)` loses nothing.

use biome_text_size::{TextRange, TextSize};

use super::kind::SyntaxKind;
use super::trivia::{Trivia, TriviaPiece};

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub range: TextRange,
}

impl LexError {
    pub fn new(message: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            message: message.into(),
            range: range(start, end),
        }
    }
}

/// A token with its attached trivia
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexedToken {
    pub kind: SyntaxKind,
    pub text: String,
    pub leading: Trivia,
    pub trailing: Trivia,
    pub range: TextRange,
}

/// Tokens (always ending in `Eof`) and any errors found on the way
pub type LexResult = (Vec<LexedToken>, Vec<LexError>);

enum Lexeme {
    Trivia(TriviaPiece),
    Token {
        kind: SyntaxKind,
        start: usize,
        end: usize,
    },
}

/// Lex `input` into tokens carrying their leading and trailing trivia
pub fn lex_with_trivia(input: &str) -> LexResult {
    let (lexemes, errors) = scan(input);
    (attach_trivia(input, lexemes), errors)
}

fn scan(input: &str) -> (Vec<Lexeme>, Vec<LexError>) {
    let mut lexemes = Vec::new();
    let mut errors = Vec::new();
    let mut i = 0usize;

    while let Some((current, size)) = next_char(input, i) {
        let start = i;
        let following = next_char(input, i + size).map(|(c, _)| c);

        match current {
            ' ' | '\t' | '\u{b}' | '\u{c}' | '\n' => {
                let end = run_of(input, start, current);
                let n = end - start;
                let piece = match current {
                    ' ' => TriviaPiece::Spaces(n),
                    '\t' => TriviaPiece::Tabs(n),
                    '\u{b}' => TriviaPiece::VerticalTabs(n),
                    '\u{c}' => TriviaPiece::Formfeeds(n),
                    _ => TriviaPiece::Newlines(n),
                };
                lexemes.push(Lexeme::Trivia(piece));
                i = end;
            }
            '\r' => {
                let (piece, end) = if following == Some('\n') {
                    let mut end = start;
                    while input[end..].starts_with("\r\n") {
                        end += 2;
                    }
                    (TriviaPiece::CarriageReturnLineFeeds((end - start) / 2), end)
                } else {
                    let end = run_of(input, start, '\r');
                    (TriviaPiece::CarriageReturns(end - start), end)
                };
                lexemes.push(Lexeme::Trivia(piece));
                i = end;
            }
            '/' if following == Some('/') => {
                let end = input[start..]
                    .find(['\n', '\r'])
                    .map_or(input.len(), |offset| start + offset);
                let text = input[start..end].to_string();
                let piece = if text.starts_with("///") {
                    TriviaPiece::DocLineComment(text)
                } else {
                    TriviaPiece::LineComment(text)
                };
                lexemes.push(Lexeme::Trivia(piece));
                i = end;
            }
            '/' if following == Some('*') => {
                let (end, error) = lex_block_comment(input, start);
                if let Some(error) = error {
                    errors.push(error);
                }
                let text = input[start..end].to_string();
                let piece = if text.starts_with("/**") && !text.starts_with("/**/") {
                    TriviaPiece::DocBlockComment(text)
                } else {
                    TriviaPiece::BlockComment(text)
                };
                lexemes.push(Lexeme::Trivia(piece));
                i = end;
            }
            _ => {
                let (kind, end, error) = lex_token(input, start, current);
                if let Some(error) = error {
                    errors.push(error);
                }
                lexemes.push(Lexeme::Token { kind, start, end });
                i = end;
            }
        }
    }

    (lexemes, errors)
}

fn lex_token(input: &str, start: usize, current: char) -> (SyntaxKind, usize, Option<LexError>) {
    let single = |kind| (kind, start + 1, None);
    match current {
        '(' => single(SyntaxKind::LeftParen),
        ')' => single(SyntaxKind::RightParen),
        '{' => single(SyntaxKind::LeftBrace),
        '}' => single(SyntaxKind::RightBrace),
        '[' => single(SyntaxKind::LeftSquare),
        ']' => single(SyntaxKind::RightSquare),
        ',' => single(SyntaxKind::Comma),
        ':' => single(SyntaxKind::Colon),
        ';' => single(SyntaxKind::Semicolon),
        '@' => single(SyntaxKind::At),
        '"' => lex_string(input, start),
        '`' => match input[start + 1..].find(['`', '\n']) {
            Some(offset) if input[start + 1 + offset..].starts_with('`') => {
                (SyntaxKind::Identifier, start + offset + 2, None)
            }
            _ => (
                SyntaxKind::Unknown,
                start + 1,
                Some(LexError::new("unterminated backtick identifier", start, start + 1)),
            ),
        },
        '$' | '#' => {
            let (_, end) = read_word(input, start + 1);
            if end == start + 1 {
                single(SyntaxKind::Unknown)
            } else {
                (SyntaxKind::Identifier, end, None)
            }
        }
        c if c.is_ascii_digit() => {
            let (kind, end) = lex_number(input, start);
            (kind, end, None)
        }
        c if is_word_start(c) => {
            let (word, end) = read_word(input, start);
            let kind = SyntaxKind::from_keyword(word).unwrap_or(SyntaxKind::Identifier);
            (kind, end, None)
        }
        c if OPERATOR_CHARS.contains(c) => {
            let (kind, end) = lex_operator(input, start);
            (kind, end, None)
        }
        other => (SyntaxKind::Unknown, start + other.len_utf8(), None),
    }
}

const OPERATOR_CHARS: &str = "/=-+!*%<>&|^~?.";

/// Operators. `<` and `>` are always lexed alone (or with a following `=`)
/// so that the parser can turn them into generic delimiters.
fn lex_operator(input: &str, start: usize) -> (SyntaxKind, usize) {
    let rest = &input[start..];
    if rest.starts_with("<=") || rest.starts_with(">=") {
        return (SyntaxKind::Operator, start + 2);
    }
    if rest.starts_with('<') || rest.starts_with('>') {
        return (SyntaxKind::Operator, start + 1);
    }
    if rest.starts_with("->") {
        return (SyntaxKind::Arrow, start + 2);
    }
    if rest.starts_with("...") || rest.starts_with("..<") {
        return (SyntaxKind::Operator, start + 3);
    }
    if rest.starts_with('.') {
        return (SyntaxKind::Period, start + 1);
    }

    let mut end = start;
    for (offset, c) in rest.char_indices() {
        if !"/=-+!*%&|^~?".contains(c) {
            break;
        }
        let tail = &rest[offset..];
        if offset > 0 && (tail.starts_with("//") || tail.starts_with("/*") || tail.starts_with("->")) {
            break;
        }
        end = start + offset + c.len_utf8();
    }

    let kind = match &input[start..end] {
        "=" => SyntaxKind::Equal,
        "?" => SyntaxKind::QuestionMark,
        "!" => SyntaxKind::ExclamationMark,
        _ => SyntaxKind::Operator,
    };
    (kind, end)
}

fn lex_number(input: &str, start: usize) -> (SyntaxKind, usize) {
    let bytes = input.as_bytes();
    let mut end = start;

    if input[start..].starts_with("0x") || input[start..].starts_with("0b") || input[start..].starts_with("0o") {
        end += 2;
        while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
            end += 1;
        }
        return (SyntaxKind::IntegerLiteral, end);
    }

    let digits = |mut pos: usize| {
        while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'_') {
            pos += 1;
        }
        pos
    };

    end = digits(end);
    let mut kind = SyntaxKind::IntegerLiteral;

    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end = digits(end + 1);
        kind = SyntaxKind::FloatLiteral;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exponent = end + 1;
        if exponent < bytes.len() && (bytes[exponent] == b'+' || bytes[exponent] == b'-') {
            exponent += 1;
        }
        if exponent < bytes.len() && bytes[exponent].is_ascii_digit() {
            end = digits(exponent);
            kind = SyntaxKind::FloatLiteral;
        }
    }

    (kind, end)
}

/// String literal starting at `start`, including `\( ... )` interpolations
/// and `"""` blocks.
fn lex_string(input: &str, start: usize) -> (SyntaxKind, usize, Option<LexError>) {
    let multiline = input[start..].starts_with("\"\"\"");
    let (delimiter, body) = if multiline { ("\"\"\"", start + 3) } else { ("\"", start + 1) };

    match scan_string_body(input, body, delimiter, multiline) {
        Some(end) => (SyntaxKind::StringLiteral, end, None),
        None => {
            let end = if multiline {
                input.len()
            } else {
                input[start..]
                    .find('\n')
                    .map_or(input.len(), |offset| start + offset)
            };
            (
                SyntaxKind::StringLiteral,
                end,
                Some(LexError::new("unterminated string literal", start, end)),
            )
        }
    }
}

/// Offset just past the closing delimiter, or `None` if the literal is
/// unterminated.
fn scan_string_body(input: &str, mut i: usize, delimiter: &str, multiline: bool) -> Option<usize> {
    while i < input.len() {
        let rest = &input[i..];
        if rest.starts_with(delimiter) {
            return Some(i + delimiter.len());
        }
        let (c, size) = next_char(input, i)?;
        match c {
            '\n' if !multiline => return None,
            '\\' if rest.starts_with("\\(") => {
                i = skip_interpolation(input, i + 2)?;
            }
            '\\' => {
                let (_, escaped) = next_char(input, i + 1)?;
                i += 1 + escaped;
            }
            _ => i += size,
        }
    }
    None
}

fn skip_interpolation(input: &str, mut i: usize) -> Option<usize> {
    let mut depth = 1usize;
    while i < input.len() {
        let (c, size) = next_char(input, i)?;
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            '"' => {
                let nested = if input[i..].starts_with("\"\"\"") { "\"\"\"" } else { "\"" };
                i = scan_string_body(input, i + nested.len(), nested, nested.len() == 3)?;
                continue;
            }
            _ => {}
        }
        i += size;
    }
    None
}

/// Nested `/* /* */ */` comments are one piece
fn lex_block_comment(input: &str, start: usize) -> (usize, Option<LexError>) {
    let mut depth = 0usize;
    let mut i = start;
    while i < input.len() {
        let rest = &input[i..];
        if rest.starts_with("/*") {
            depth += 1;
            i += 2;
        } else if rest.starts_with("*/") {
            depth -= 1;
            i += 2;
            if depth == 0 {
                return (i, None);
            }
        } else {
            i += next_char(input, i).map_or(1, |(_, size)| size);
        }
    }
    (
        input.len(),
        Some(LexError::new("unterminated block comment", start, input.len())),
    )
}

fn attach_trivia(input: &str, lexemes: Vec<Lexeme>) -> Vec<LexedToken> {
    let mut tokens = Vec::new();
    let mut pending: Vec<TriviaPiece> = Vec::new();
    let mut lexemes = lexemes.into_iter().peekable();

    while let Some(lexeme) = lexemes.next() {
        let (kind, start, end) = match lexeme {
            Lexeme::Trivia(piece) => {
                pending.push(piece);
                continue;
            }
            Lexeme::Token { kind, start, end } => (kind, start, end),
        };

        let mut trailing = Vec::new();
        while let Some(Lexeme::Trivia(piece)) = lexemes.peek() {
            if piece.is_line_break() {
                break;
            }
            trailing.push(piece.clone());
            lexemes.next();
        }

        let leading = Trivia::from_pieces(pending.drain(..));

        // Whitespace that only runs into a line break (or the end of the
        // file) belongs to the next line.
        let at_line_end = matches!(lexemes.peek(), None | Some(Lexeme::Trivia(_)));
        if at_line_end {
            let keep = trailing
                .iter()
                .rposition(|piece: &TriviaPiece| !piece.is_horizontal_space())
                .map_or(0, |index| index + 1);
            pending.extend(trailing.drain(keep..));
        }

        tokens.push(LexedToken {
            kind,
            text: input[start..end].to_string(),
            leading,
            trailing: Trivia::from_pieces(trailing),
            range: range(start, end),
        });
    }

    tokens.push(LexedToken {
        kind: SyntaxKind::Eof,
        text: String::new(),
        leading: Trivia::from_pieces(pending),
        trailing: Trivia::new(),
        range: range(input.len(), input.len()),
    });

    tokens
}

fn is_word_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn read_word(input: &str, start: usize) -> (&str, usize) {
    let end = input[start..]
        .char_indices()
        .find(|&(_, c)| !(c == '_' || c.is_alphanumeric()))
        .map_or(input.len(), |(offset, _)| start + offset);
    (&input[start..end], end)
}

fn run_of(input: &str, start: usize, c: char) -> usize {
    input[start..]
        .find(|other| other != c)
        .map_or(input.len(), |offset| start + offset)
}

fn next_char(input: &str, pos: usize) -> Option<(char, usize)> {
    input[pos..].chars().next().map(|c| (c, c.len_utf8()))
}

fn range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use TriviaPiece::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        let (tokens, errors) = lex_with_trivia(input);
        assert!(errors.is_empty(), "{errors:?}");
        tokens.into_iter().map(|token| token.kind).collect()
    }

    fn reconstruct(tokens: &[LexedToken]) -> String {
        tokens
            .iter()
            .map(|t| format!("{}{}{}", t.leading, t.text, t.trailing))
            .collect()
    }

    #[test]
    fn test_lossless_reconstruction() {
        let source = "import Foundation\n\n/// Doc\nfunc f<T>(x: T) -> Int {\r\n  return x /* why */ // tail\n}\n\n";
        let (tokens, errors) = lex_with_trivia(source);
        assert!(errors.is_empty());
        assert_eq!(reconstruct(&tokens), source);
    }

    #[test]
    fn test_trailing_trivia_stops_at_line_break() {
        let (tokens, _) = lex_with_trivia("a // c\n  b");
        assert_eq!(tokens[0].trailing.pieces(), &[Spaces(1), LineComment("// c".into())]);
        assert_eq!(tokens[1].leading.pieces(), &[Newlines(1), Spaces(2)]);
    }

    #[test]
    fn test_whitespace_before_line_break_moves_to_next_token() {
        let (tokens, _) = lex_with_trivia("a   \nb");
        assert!(tokens[0].trailing.is_empty());
        assert_eq!(tokens[1].leading.pieces(), &[Spaces(3), Newlines(1)]);
    }

    #[test]
    fn test_eof_carries_final_trivia() {
        let (tokens, _) = lex_with_trivia("a\n// end\n");
        let eof = tokens.last().unwrap();
        assert_eq!(eof.kind, SyntaxKind::Eof);
        assert_eq!(
            eof.leading.pieces(),
            &[Newlines(1), LineComment("// end".into()), Newlines(1)]
        );
    }

    #[test]
    fn test_keywords_and_operators() {
        assert_eq!(
            kinds("if a != b { x = -1 }"),
            vec![
                SyntaxKind::IfKw,
                SyntaxKind::Identifier,
                SyntaxKind::Operator,
                SyntaxKind::Identifier,
                SyntaxKind::LeftBrace,
                SyntaxKind::Identifier,
                SyntaxKind::Equal,
                SyntaxKind::Operator,
                SyntaxKind::IntegerLiteral,
                SyntaxKind::RightBrace,
                SyntaxKind::Eof,
            ]
        );
    }

    #[test]
    fn test_angles_lex_alone() {
        assert_eq!(
            kinds("a<b<c>>"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::Operator,
                SyntaxKind::Identifier,
                SyntaxKind::Operator,
                SyntaxKind::Identifier,
                SyntaxKind::Operator,
                SyntaxKind::Operator,
                SyntaxKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers_and_ranges() {
        assert_eq!(
            kinds("1.5 0..<10 0xFF 1e3"),
            vec![
                SyntaxKind::FloatLiteral,
                SyntaxKind::IntegerLiteral,
                SyntaxKind::Operator,
                SyntaxKind::IntegerLiteral,
                SyntaxKind::IntegerLiteral,
                SyntaxKind::FloatLiteral,
                SyntaxKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_interpolation() {
        let (tokens, errors) = lex_with_trivia(r#"print("a \(f("b")) c")"#);
        assert!(errors.is_empty());
        assert_eq!(tokens[2].kind, SyntaxKind::StringLiteral);
        assert_eq!(tokens[2].text, r#""a \(f("b")) c""#);
    }

    #[test]
    fn test_nested_block_comment() {
        let (tokens, errors) = lex_with_trivia("/* a /* b */ c */x");
        assert!(errors.is_empty());
        assert_eq!(
            tokens[0].leading.pieces(),
            &[BlockComment("/* a /* b */ c */".into())]
        );
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let (_, errors) = lex_with_trivia("let s = \"abc\nlet t = 1");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "unterminated string literal");
    }

    #[test]
    fn test_unicode_identifier() {
        let (tokens, _) = lex_with_trivia("let café = 1");
        assert_eq!(tokens[1].kind, SyntaxKind::Identifier);
        assert_eq!(tokens[1].text, "café");
    }
}
