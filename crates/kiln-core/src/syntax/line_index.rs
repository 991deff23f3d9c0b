//! Byte offset to line/column conversion

use biome_text_size::TextSize;

/// Start offsets of every line in a source text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, byte)| byte == b'\n')
                .map(|(index, _)| index + 1),
        );
        Self { line_starts }
    }

    /// 1-based line and column (in bytes) of an offset
    pub fn line_col(&self, offset: TextSize) -> (usize, usize) {
        let offset = usize::from(offset);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        (line + 1, offset - self.line_starts[line] + 1)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let index = LineIndex::new("let a = 1\nlet b = 2\n");
        assert_eq!(index.line_col(TextSize::from(0)), (1, 1));
        assert_eq!(index.line_col(TextSize::from(4)), (1, 5));
        assert_eq!(index.line_col(TextSize::from(10)), (2, 1));
        assert_eq!(index.line_col(TextSize::from(14)), (2, 5));
        assert_eq!(index.line_count(), 3);
    }
}
