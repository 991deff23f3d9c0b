//! Prefer line comments over `/* */` block comments
//!
//! Doc block comments (`/** */`) are left alone.

use kiln_core::{
    Context, LintCx, LintRule, NodeId, Rule, Severity, SyntaxKind, TextRange, TextSize, Trivia,
    TriviaPiece,
};

pub const NAME: &str = "NoBlockComments";

const MESSAGE: &str = "replace block comment with line comments";

pub fn rule(_context: &Context) -> Rule {
    LintRule::new(NAME).on(SyntaxKind::TOKENS, check).into()
}

fn check(cx: &LintCx<'_>, node: NodeId) {
    let Some(leaf) = cx.tree().leaf(node) else {
        return;
    };
    let text_len = leaf.text.len();
    let leading_len = trivia_len(&leaf.leading);

    // Offsets only exist for parsed leaves; synthesized ones report the file
    let start = leaf
        .range
        .map(|range| usize::from(range.start()).saturating_sub(leading_len));
    report(cx, &leaf.leading, start);
    report(cx, &leaf.trailing, start.map(|start| start + leading_len + text_len));
}

fn report(cx: &LintCx<'_>, trivia: &Trivia, start: Option<usize>) {
    let mut offset = start;
    for piece in trivia.iter() {
        let len = piece.to_string().len();
        if let TriviaPiece::BlockComment(_) = piece {
            let range = offset.map(|offset| TextRange::at(to_size(offset), to_size(len)));
            cx.diagnose_range(Severity::Warning, MESSAGE, range);
        }
        offset = offset.map(|offset| offset + len);
    }
}

fn trivia_len(trivia: &Trivia) -> usize {
    trivia.iter().map(|piece| piece.to_string().len()).sum()
}

fn to_size(value: usize) -> TextSize {
    TextSize::from(u32::try_from(value).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{lint, run_with};
    use kiln_core::{Configuration, Mode};

    #[test]
    fn test_reports_leading_and_trailing_block_comments() {
        let (_, diagnostics) = run_with(
            Configuration::default(),
            rule,
            "/* head */\nlet a = 1 /* tail */\n",
            Mode::Lint,
        );
        let positions: Vec<_> = diagnostics
            .iter()
            .map(|d| (d.location.line, d.location.column))
            .collect();
        assert_eq!(positions, vec![(1, 1), (2, 11)]);
        assert!(diagnostics.iter().all(|d| d.message == format!("[NoBlockComments]: {MESSAGE}")));
    }

    #[test]
    fn test_line_and_doc_comments_pass() {
        assert!(lint(rule, "// a\n/// b\n/** c */\nlet a = 1\n").is_empty());
    }

    #[test]
    fn test_comment_before_end_of_file() {
        assert_eq!(lint(rule, "let a = 1\n/* done */\n").len(), 1);
    }
}
