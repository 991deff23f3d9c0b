//! Remove statement-separating semicolons
//!
//! Works on statement containers. A removed `;` hands its trailing comments
//! to the statement before it. When another statement follows on the same
//! line, that statement is moved to a line of its own at the indentation of
//! the statement before it.

use kiln_core::{
    Context, FormatRule, NodeId, Rewriter, Rule, Severity, SyntaxKind, Trivia, TriviaPiece,
};

pub const NAME: &str = "DoNotUseSemicolons";

const CONTAINERS: &[SyntaxKind] = &[
    SyntaxKind::SourceFile,
    SyntaxKind::CodeBlock,
    SyntaxKind::MemberBlock,
    SyntaxKind::ClosureExpr,
    SyntaxKind::SwitchCase,
];

pub fn rule(_context: &Context) -> Rule {
    FormatRule::new(NAME).on(CONTAINERS, rewrite).into()
}

fn rewrite(rw: &mut Rewriter<'_>, node: NodeId) -> NodeId {
    let children = rw.tree().children(node).to_vec();
    if !children
        .iter()
        .any(|&child| rw.tree().kind(child) == SyntaxKind::Semicolon)
    {
        return node;
    }

    let mut kept: Vec<NodeId> = Vec::with_capacity(children.len());
    let mut carried = Trivia::new();
    let mut separated = false;

    for child in children {
        if rw.tree().kind(child) == SyntaxKind::Semicolon {
            rw.diagnose(Severity::Warning, "remove ';'", child);
            let Some(semicolon) = rw.tree().leaf(child).cloned() else {
                continue;
            };
            carried = carried + semicolon.leading;
            match kept.last_mut() {
                Some(previous) => {
                    *previous = rw.tree_mut().update_last_leaf(*previous, |leaf| {
                        leaf.trailing = std::mem::take(&mut leaf.trailing) + semicolon.trailing;
                    });
                }
                None => carried = carried + semicolon.trailing,
            }
            separated = true;
            continue;
        }

        if !separated {
            kept.push(child);
            continue;
        }
        separated = false;

        let leading = rw.tree().leading_trivia(child).cloned().unwrap_or_default();
        let mut leading = std::mem::take(&mut carried) + leading;
        let same_line = !leading.contains_newlines()
            && !matches!(
                rw.tree().kind(child),
                SyntaxKind::RightBrace | SyntaxKind::Eof
            );

        if let Some(previous) = kept.last_mut().filter(|_| same_line) {
            let indentation = statement_indentation(rw, *previous);
            leading = Trivia::newlines(1) + indentation + leading.without_spaces();
            *previous = rw
                .tree_mut()
                .update_last_leaf(*previous, |leaf| leaf.trailing = leaf.trailing.trim_end());
        }

        let child = rw
            .tree_mut()
            .update_first_leaf(child, |leaf| leaf.leading = leading);
        kept.push(child);
    }

    if !carried.is_empty() {
        if let Some(previous) = kept.last_mut() {
            *previous = rw.tree_mut().update_last_leaf(*previous, |leaf| {
                leaf.trailing = std::mem::take(&mut leaf.trailing) + carried;
            });
        }
    }

    rw.tree_mut().replace_children(node, kept)
}

/// Horizontal whitespace in front of the first token of `statement` on its line
fn statement_indentation(rw: &Rewriter<'_>, statement: NodeId) -> Trivia {
    let Some(leading) = rw.tree().leading_trivia(statement) else {
        return Trivia::new();
    };
    let line = leading.last_line();
    let start = line
        .iter()
        .rposition(|piece| !piece.is_horizontal_space())
        .map_or(0, |index| index + 1);
    Trivia::from_pieces(line[start..].iter().filter(|piece| is_indent(piece)).cloned())
}

fn is_indent(piece: &TriviaPiece) -> bool {
    matches!(piece, TriviaPiece::Spaces(_) | TriviaPiece::Tabs(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{format, lint};

    #[test]
    fn test_splits_statements_onto_lines() {
        assert_eq!(
            format(rule, "print(\"hello\"); print(\"goodbye\");\nprint(\"3\")"),
            "print(\"hello\")\nprint(\"goodbye\")\nprint(\"3\")"
        );
    }

    #[test]
    fn test_keeps_indentation_inside_blocks() {
        assert_eq!(
            format(rule, "func f() {\n    a(); b()\n}\n"),
            "func f() {\n    a()\n    b()\n}\n"
        );
    }

    #[test]
    fn test_trailing_semicolon_before_brace() {
        assert_eq!(format(rule, "func f() { a(); }\n"), "func f() { a() }\n");
    }

    #[test]
    fn test_comment_after_semicolon_stays() {
        assert_eq!(
            format(rule, "let a = 1; // one\nlet b = 2\n"),
            "let a = 1 // one\nlet b = 2\n"
        );
    }

    #[test]
    fn test_closures_and_switch_cases() {
        assert_eq!(
            format(rule, "run { a(); b() }\n"),
            "run { a()\nb() }\n"
        );
        assert_eq!(
            format(rule, "switch x {\ncase 1: a(); b()\ndefault: break\n}\n"),
            "switch x {\ncase 1: a()\nb()\ndefault: break\n}\n"
        );
    }

    #[test]
    fn test_reports_each_semicolon() {
        assert_eq!(
            lint(rule, "a(); b();\n"),
            vec!["[DoNotUseSemicolons]: remove ';'", "[DoNotUseSemicolons]: remove ';'"]
        );
        assert!(lint(rule, "a()\nb()\n").is_empty());
    }
}
