//! Unwrap parenthesized conditions
//!
//! `if (x) {}` becomes `if x {}`. Applies to every condition of `if`,
//! `guard` and `while`, the condition of `repeat ... while` and the subject
//! of `switch`. A condition is only unwrapped when the parentheses hold a
//! single expression and no closure, since `if (f { $0 }) {}` would not parse
//! without them.

use kiln_core::{Context, FormatRule, NodeId, Rewriter, Rule, Severity, SyntaxKind, Trivia};

pub const NAME: &str = "NoParensAroundConditions";

pub fn rule(_context: &Context) -> Rule {
    FormatRule::new(NAME)
        .on(
            &[
                SyntaxKind::IfStmt,
                SyntaxKind::GuardStmt,
                SyntaxKind::WhileStmt,
            ],
            rewrite_condition_list,
        )
        .on(
            &[SyntaxKind::RepeatWhileStmt, SyntaxKind::SwitchStmt],
            rewrite_subject,
        )
        .into()
}

fn rewrite_condition_list(rw: &mut Rewriter<'_>, node: NodeId) -> NodeId {
    let mut children = rw.tree().children(node).to_vec();
    let Some(list_index) = children
        .iter()
        .position(|&child| rw.tree().kind(child) == SyntaxKind::ConditionList)
    else {
        return node;
    };
    if list_index == 0 {
        return node;
    }

    let list = children[list_index];
    let mut conditions = rw.tree().children(list).to_vec();
    for index in 0..conditions.len() {
        if rw.tree().kind(conditions[index]) != SyntaxKind::SequenceExpr {
            continue;
        }
        let before = if index == 0 {
            children[list_index - 1]
        } else {
            conditions[index - 1]
        };
        let (before, condition) = unwrap_after(rw, before, conditions[index]);
        if index == 0 {
            children[list_index - 1] = before;
        } else {
            conditions[index - 1] = before;
        }
        conditions[index] = condition;
    }

    children[list_index] = rw.tree_mut().replace_children(list, conditions);
    rw.tree_mut().replace_children(node, children)
}

fn rewrite_subject(rw: &mut Rewriter<'_>, node: NodeId) -> NodeId {
    let mut children = rw.tree().children(node).to_vec();
    let Some(index) = children
        .iter()
        .position(|&child| rw.tree().kind(child) == SyntaxKind::SequenceExpr)
        .filter(|&index| index > 0)
    else {
        return node;
    };

    let (before, subject) = unwrap_after(rw, children[index - 1], children[index]);
    children[index - 1] = before;
    children[index] = subject;
    rw.tree_mut().replace_children(node, children)
}

/// Strip every redundant pair around `condition`. `before` is the node in
/// front of it and gets a space if the two would otherwise touch.
fn unwrap_after(rw: &mut Rewriter<'_>, before: NodeId, condition: NodeId) -> (NodeId, NodeId) {
    let mut current = condition;
    while let Some(inner) = unwrap_parens(rw, current) {
        current = inner;
    }
    if current == condition {
        return (before, condition);
    }

    let touching = rw.tree().trailing_trivia(before).is_some_and(Trivia::is_empty)
        && rw.tree().leading_trivia(current).is_some_and(Trivia::is_empty);
    let before = if touching {
        rw.tree_mut()
            .update_last_leaf(before, |leaf| leaf.trailing = Trivia::spaces(1))
    } else {
        before
    };
    (before, current)
}

/// `SequenceExpr[TupleExpr[(, SequenceExpr, )]]` → the inner `SequenceExpr`,
/// with the parentheses' trivia moved onto it
fn unwrap_parens(rw: &mut Rewriter<'_>, condition: NodeId) -> Option<NodeId> {
    let tree = rw.tree();
    let &[tuple] = tree.children(condition) else {
        return None;
    };
    if tree.kind(tuple) != SyntaxKind::TupleExpr {
        return None;
    }
    let &[open, inner, close] = tree.children(tuple) else {
        return None;
    };
    if tree.kind(inner) != SyntaxKind::SequenceExpr
        || tree
            .children(inner)
            .iter()
            .any(|&child| tree.kind(child) == SyntaxKind::ClosureExpr)
    {
        return None;
    }
    let open = tree.leaf(open)?.clone();
    let close = tree.leaf(close)?.clone();

    rw.diagnose(
        Severity::Warning,
        "remove parentheses around this expression",
        tuple,
    );

    let inner = rw.tree_mut().update_first_leaf(inner, |leaf| {
        leaf.leading = open.leading + open.trailing.without_spaces() + std::mem::take(&mut leaf.leading);
    });
    let inner = rw.tree_mut().update_last_leaf(inner, |leaf| {
        leaf.trailing =
            std::mem::take(&mut leaf.trailing).trim_end() + close.leading.without_spaces() + close.trailing;
    });
    Some(inner)
}
