//! Cap runs of blank lines
//!
//! Leading trivia of every token is rewritten so that no run of line breaks
//! exceeds `maximumBlankLines` blank lines. At the very start of the file the
//! run may hold at most `maximumBlankLines` line breaks; elsewhere one more,
//! since the first break only ends the previous line. Whitespace that sits
//! in front of a line break inside that trivia is dropped.

use kiln_core::{Context, FormatRule, NodeId, Rewriter, Rule, Severity, SyntaxKind, Trivia, TriviaPiece};

pub const NAME: &str = "MaximumBlankLines";

pub fn rule(context: &Context) -> Rule {
    let maximum = context.configuration().maximum_blank_lines;
    let kinds: Vec<SyntaxKind> = SyntaxKind::TOKENS
        .iter()
        .copied()
        .filter(|kind| *kind != SyntaxKind::Eof)
        .collect();

    FormatRule::new(NAME)
        .on(&kinds, move |rw, node| rewrite(rw, node, maximum))
        .into()
}

fn rewrite(rw: &mut Rewriter<'_>, node: NodeId, maximum: usize) -> NodeId {
    let Some(leading) = rw.tree().leading_trivia(node) else {
        return node;
    };
    let at_file_start = rw.tree().first_leaf(rw.tree().root()) == Some(node);
    let (capped, removed) = cap_blank_lines(leading, maximum, at_file_start);
    if removed == 0 {
        return node;
    }

    rw.diagnose(Severity::Warning, message(removed), node);
    rw.tree_mut().update_leaf(node, |leaf| leaf.leading = capped)
}

/// Capped trivia and the number of blank lines taken out
fn cap_blank_lines(trivia: &Trivia, maximum: usize, at_file_start: bool) -> (Trivia, usize) {
    let trivia = trivia.without_trailing_spaces();
    let mut removed = 0;
    let mut capped = Trivia::new();

    for (index, piece) in trivia.iter().enumerate() {
        let TriviaPiece::Newlines(count) = *piece else {
            capped.push(piece.clone());
            continue;
        };
        let limit = if index == 0 && at_file_start {
            maximum
        } else {
            maximum + 1
        };
        if count > limit {
            removed += count - limit;
            if limit > 0 {
                capped.push(TriviaPiece::Newlines(limit));
            }
        } else {
            capped.push(piece.clone());
        }
    }
    (capped, removed)
}

fn message(removed: usize) -> String {
    if removed == 1 {
        "remove 1 blank line".to_string()
    } else {
        format!("remove {removed} blank lines")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{format, lint, run_with};
    use kiln_core::{Configuration, Mode};

    #[test]
    fn test_collapses_blank_lines_between_statements() {
        assert_eq!(format(rule, "let a = 1\n\n\n\nlet b = 2\n"), "let a = 1\n\nlet b = 2\n");
    }

    #[test]
    fn test_keeps_allowed_blank_lines() {
        let source = "let a = 1\n\nlet b = 2\n";
        assert_eq!(format(rule, source), source);
        assert!(lint(rule, source).is_empty());
    }

    #[test]
    fn test_file_start_allows_fewer_breaks() {
        assert_eq!(format(rule, "\n\n\nlet a = 1\n"), "\nlet a = 1\n");
        assert_eq!(lint(rule, "\n\n\nlet a = 1\n"), vec!["[MaximumBlankLines]: remove 2 blank lines"]);
    }

    #[test]
    fn test_whitespace_only_lines_count_as_blank() {
        let source = "func f() {\n    a()\n    \n  \n\n    b()\n}\n";
        assert_eq!(format(rule, source), "func f() {\n    a()\n\n    b()\n}\n");
    }

    #[test]
    fn test_comments_split_runs() {
        let source = "let a = 1\n\n\n// note\n\n\nlet b = 2\n";
        assert_eq!(
            format(rule, source),
            "let a = 1\n\n// note\n\nlet b = 2\n"
        );
    }

    #[test]
    fn test_zero_blank_lines() {
        let configuration = Configuration {
            maximum_blank_lines: 0,
            ..Configuration::default()
        };
        let (output, diagnostics) =
            run_with(configuration, rule, "let a = 1\n\n\nlet b = 2\n", Mode::Format);
        assert_eq!(output, "let a = 1\nlet b = 2\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "[MaximumBlankLines]: remove 2 blank lines");
    }

    #[test]
    fn test_lint_reports_location() {
        let (_, diagnostics) = run_with(
            Configuration::default(),
            rule,
            "let a = 1\n\n\n\nlet b = 2\n",
            Mode::Lint,
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.line, 5);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }
}
