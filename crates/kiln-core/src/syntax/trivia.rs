//! Trivia attached to leaves
//!
//! Trivia is everything between two tokens that does not affect the parse:
//! whitespace, line breaks and comments. Each leaf owns a leading and a
//! trailing collection. Counted pieces (`Spaces(3)`) keep runs compact, and
//! `condensed` merges neighbouring pieces of the same shape.

use std::fmt;

/// A single trivia element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TriviaPiece {
    Spaces(usize),
    Tabs(usize),
    VerticalTabs(usize),
    Formfeeds(usize),
    Newlines(usize),
    CarriageReturns(usize),
    CarriageReturnLineFeeds(usize),
    /// `// ...` without the line break
    LineComment(String),
    /// `/* ... */`, possibly spanning lines
    BlockComment(String),
    /// `/// ...`
    DocLineComment(String),
    /// `/** ... */`
    DocBlockComment(String),
    GarbageText(String),
}

impl TriviaPiece {
    pub fn is_comment(&self) -> bool {
        matches!(
            self,
            TriviaPiece::LineComment(_)
                | TriviaPiece::BlockComment(_)
                | TriviaPiece::DocLineComment(_)
                | TriviaPiece::DocBlockComment(_)
        )
    }

    /// Horizontal whitespace: spaces, tabs, vertical tabs, form feeds
    pub fn is_horizontal_space(&self) -> bool {
        matches!(
            self,
            TriviaPiece::Spaces(_)
                | TriviaPiece::Tabs(_)
                | TriviaPiece::VerticalTabs(_)
                | TriviaPiece::Formfeeds(_)
        )
    }

    /// Number of line breaks this piece stands for, zero if it is not one
    pub fn line_breaks(&self) -> usize {
        match self {
            TriviaPiece::Newlines(n)
            | TriviaPiece::CarriageReturns(n)
            | TriviaPiece::CarriageReturnLineFeeds(n) => *n,
            _ => 0,
        }
    }

    pub fn is_line_break(&self) -> bool {
        self.line_breaks() > 0
    }

    /// Comment text, if this piece is a comment
    pub fn comment_text(&self) -> Option<&str> {
        match self {
            TriviaPiece::LineComment(text)
            | TriviaPiece::BlockComment(text)
            | TriviaPiece::DocLineComment(text)
            | TriviaPiece::DocBlockComment(text) => Some(text),
            _ => None,
        }
    }

    fn merge(&self, other: &TriviaPiece) -> Option<TriviaPiece> {
        use TriviaPiece::*;
        let merged = match (self, other) {
            (Spaces(l), Spaces(r)) => Spaces(l + r),
            (Tabs(l), Tabs(r)) => Tabs(l + r),
            (VerticalTabs(l), VerticalTabs(r)) => VerticalTabs(l + r),
            (Formfeeds(l), Formfeeds(r)) => Formfeeds(l + r),
            (Newlines(l), Newlines(r)) => Newlines(l + r),
            (CarriageReturns(l), CarriageReturns(r)) => CarriageReturns(l + r),
            (CarriageReturnLineFeeds(l), CarriageReturnLineFeeds(r)) => {
                CarriageReturnLineFeeds(l + r)
            }
            (GarbageText(l), GarbageText(r)) => GarbageText(format!("{l}{r}")),
            _ => return None,
        };
        Some(merged)
    }
}

impl fmt::Display for TriviaPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn repeat(f: &mut fmt::Formatter<'_>, s: &str, n: usize) -> fmt::Result {
            for _ in 0..n {
                f.write_str(s)?;
            }
            Ok(())
        }

        match self {
            TriviaPiece::Spaces(n) => repeat(f, " ", *n),
            TriviaPiece::Tabs(n) => repeat(f, "\t", *n),
            TriviaPiece::VerticalTabs(n) => repeat(f, "\u{b}", *n),
            TriviaPiece::Formfeeds(n) => repeat(f, "\u{c}", *n),
            TriviaPiece::Newlines(n) => repeat(f, "\n", *n),
            TriviaPiece::CarriageReturns(n) => repeat(f, "\r", *n),
            TriviaPiece::CarriageReturnLineFeeds(n) => repeat(f, "\r\n", *n),
            TriviaPiece::LineComment(text)
            | TriviaPiece::BlockComment(text)
            | TriviaPiece::DocLineComment(text)
            | TriviaPiece::DocBlockComment(text)
            | TriviaPiece::GarbageText(text) => f.write_str(text),
        }
    }
}

/// Ordered trivia pieces on one side of a leaf
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Trivia {
    pieces: Vec<TriviaPiece>,
}

impl Trivia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pieces(pieces: impl IntoIterator<Item = TriviaPiece>) -> Self {
        Self {
            pieces: pieces.into_iter().collect(),
        }
    }

    pub fn spaces(n: usize) -> Self {
        Self::from_pieces([TriviaPiece::Spaces(n)])
    }

    pub fn newlines(n: usize) -> Self {
        Self::from_pieces([TriviaPiece::Newlines(n)])
    }

    pub fn pieces(&self) -> &[TriviaPiece] {
        &self.pieces
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TriviaPiece> {
        self.pieces.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn push(&mut self, piece: TriviaPiece) {
        self.pieces.push(piece);
    }

    /// Trailing horizontal space as the printer sees it: every space counts,
    /// every tab counts as one. Spaces after a trailing comment count too.
    pub fn number_of_spaces(&self) -> usize {
        self.pieces
            .iter()
            .map(|piece| match piece {
                TriviaPiece::Spaces(n) => *n,
                TriviaPiece::Tabs(_) => 1,
                _ => 0,
            })
            .sum()
    }

    pub fn contains_newlines(&self) -> bool {
        self.pieces.iter().any(TriviaPiece::is_line_break)
    }

    pub fn contains_comments(&self) -> bool {
        self.pieces.iter().any(TriviaPiece::is_comment)
    }

    /// Total number of line breaks across all pieces
    pub fn newline_count(&self) -> usize {
        self.pieces.iter().map(TriviaPiece::line_breaks).sum()
    }

    /// Merge neighbouring pieces of the same shape:
    /// `[Spaces(1), Spaces(2)]` becomes `[Spaces(3)]`.
    pub fn condensed(&self) -> Trivia {
        let mut pieces: Vec<TriviaPiece> = Vec::with_capacity(self.pieces.len());
        for piece in &self.pieces {
            match pieces.last().and_then(|prev| prev.merge(piece)) {
                Some(merged) => {
                    let last = pieces.len() - 1;
                    pieces[last] = merged;
                }
                None => pieces.push(piece.clone()),
            }
        }
        Trivia { pieces }
    }

    /// Drop horizontal whitespace and merge what is left
    pub fn without_spaces(&self) -> Trivia {
        Trivia::from_pieces(
            self.pieces
                .iter()
                .filter(|piece| !piece.is_horizontal_space())
                .cloned(),
        )
        .condensed()
    }

    /// Drop horizontal whitespace that runs into a line break, so that
    /// whitespace-only lines merge with their neighbours. Indentation before
    /// the leaf itself is kept.
    pub fn without_trailing_spaces(&self) -> Trivia {
        let mut kept = Vec::with_capacity(self.pieces.len());
        for (index, piece) in self.pieces.iter().enumerate() {
            if piece.is_horizontal_space() {
                let next_breaks = self.pieces[index + 1..]
                    .iter()
                    .find(|next| !next.is_horizontal_space())
                    .is_some_and(TriviaPiece::is_line_break);
                if next_breaks {
                    continue;
                }
            }
            kept.push(piece.clone());
        }
        Trivia::from_pieces(kept).condensed()
    }

    /// Pieces after the last line break, i.e. the indentation of the leaf
    pub fn last_line(&self) -> &[TriviaPiece] {
        match self.pieces.iter().rposition(TriviaPiece::is_line_break) {
            Some(index) => &self.pieces[index + 1..],
            None => &self.pieces,
        }
    }

    /// Drop horizontal whitespace at the end
    pub fn trim_end(&self) -> Trivia {
        let end = self
            .pieces
            .iter()
            .rposition(|piece| !piece.is_horizontal_space())
            .map_or(0, |index| index + 1);
        Trivia::from_pieces(self.pieces[..end].iter().cloned())
    }
}

impl fmt::Display for Trivia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in &self.pieces {
            write!(f, "{piece}")?;
        }
        Ok(())
    }
}

impl FromIterator<TriviaPiece> for Trivia {
    fn from_iter<I: IntoIterator<Item = TriviaPiece>>(iter: I) -> Self {
        Self::from_pieces(iter)
    }
}

impl<'a> IntoIterator for &'a Trivia {
    type Item = &'a TriviaPiece;
    type IntoIter = std::slice::Iter<'a, TriviaPiece>;

    fn into_iter(self) -> Self::IntoIter {
        self.pieces.iter()
    }
}

impl std::ops::Add for Trivia {
    type Output = Trivia;

    fn add(mut self, rhs: Trivia) -> Trivia {
        self.pieces.extend(rhs.pieces);
        self
    }
}
