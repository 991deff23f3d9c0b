//! Declared names must be plain ASCII
//!
//! Checks variable and constant names (including tuple patterns), function
//! names and parameter labels and names.

use kiln_core::{Context, LintCx, LintRule, NodeId, Rule, Severity, SyntaxKind};

pub const NAME: &str = "IdentifiersMustBeAscii";

pub fn rule(_context: &Context) -> Rule {
    LintRule::new(NAME)
        .on(&[SyntaxKind::PatternBinding], check_pattern)
        .on(&[SyntaxKind::FunctionDecl], check_function)
        .on(&[SyntaxKind::Parameter], check_parameter)
        .into()
}

fn check_pattern(cx: &LintCx<'_>, node: NodeId) {
    let tree = cx.tree();
    let Some(&pattern) = tree.children(node).first() else {
        return;
    };
    match tree.kind(pattern) {
        SyntaxKind::Identifier => check_identifier(cx, pattern),
        SyntaxKind::TupleExpr => {
            for leaf in tree.leaves(pattern) {
                if tree.kind(leaf) == SyntaxKind::Identifier {
                    check_identifier(cx, leaf);
                }
            }
        }
        _ => {}
    }
}

fn check_function(cx: &LintCx<'_>, node: NodeId) {
    if let Some(name) = cx.tree().child_of_kind(node, SyntaxKind::Identifier) {
        check_identifier(cx, name);
    }
}

fn check_parameter(cx: &LintCx<'_>, node: NodeId) {
    let tree = cx.tree();
    for &child in tree.children(node) {
        match tree.kind(child) {
            SyntaxKind::Colon => break,
            SyntaxKind::Identifier => check_identifier(cx, child),
            _ => {}
        }
    }
}

fn check_identifier(cx: &LintCx<'_>, node: NodeId) {
    let name = cx.tree().token_text(node);
    let mut offending: Vec<char> = Vec::new();
    for c in name.chars().filter(|c| !c.is_ascii()) {
        if !offending.contains(&c) {
            offending.push(c);
        }
    }
    if offending.is_empty() {
        return;
    }

    let list = offending
        .iter()
        .map(char::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    cx.diagnose(
        Severity::Warning,
        format!("The identifier '{name}' contains the following non-ASCII characters: {list}"),
        node,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::lint;

    #[test]
    fn test_variable_names() {
        assert_eq!(
            lint(rule, "let café = 1\nvar naïve = 2\n"),
            vec![
                "[IdentifiersMustBeAscii]: The identifier 'café' contains the following non-ASCII characters: é",
                "[IdentifiersMustBeAscii]: The identifier 'naïve' contains the following non-ASCII characters: ï",
            ]
        );
    }

    #[test]
    fn test_repeated_characters_listed_once() {
        assert_eq!(
            lint(rule, "let ßßö = 1\n"),
            vec![
                "[IdentifiersMustBeAscii]: The identifier 'ßßö' contains the following non-ASCII characters: ß, ö"
            ]
        );
    }

    #[test]
    fn test_functions_parameters_and_tuples() {
        let messages = lint(rule, "func grüß(für λ: Int) {\n    let (α, b) = (1, 2)\n}\n");
        let names: Vec<_> = messages
            .iter()
            .filter_map(|m| m.split('\'').nth(1))
            .collect();
        assert_eq!(names, vec!["grüß", "für", "λ", "α"]);
    }

    #[test]
    fn test_uses_are_not_reported() {
        assert!(lint(rule, "let a = 1\nprint(ünused)\n").is_empty());
    }
}
