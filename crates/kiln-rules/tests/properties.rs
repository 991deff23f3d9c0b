//! Whole-pipeline properties over a small corpus, with every built-in rule

use std::path::Path;
use std::sync::Arc;

use kiln_core::{
    Configuration, ExecutionOptions, FileOutcome, OutputStyle, SyntaxKind, Token, make_stream,
    parse, process_source,
};

const CORPUS: &[&str] = &[
    "import Foundation\n\n\n\nstruct Point {\n    let x: Int; let y: Int\n\n    func norm() -> Int {\n        return x * x + y * y\n    }\n}\n",
    "func classify(_ n: Int) -> String {\nswitch (n) {\ncase 0: return \"zero\"\ncase 1, 2:\nreturn \"small\"\ndefault:\nreturn \"many\"\n}\n}\n",
    "// leading comment\nif (ready) { launch() } else if (waiting) {\n    wait();\n} else {\n    abort()\n}\n",
    "guard (x > 0), (y > 0) else { return }\nwhile (i < 10) { i += 1 }\nrepeat {\n  i -= 1\n} while(i > 0)\n",
    "let values = [1, 2, 3].map { $0 * 2 }\nfor v in values where v > 2 {\n    print(v) /* trailing */\n}\n",
    "class Box<T>: Container {\n    var item: T\n    init(item: T) {\n        self.item = item\n    }\n}\n",
];

fn run(source: &str, options: ExecutionOptions) -> FileOutcome {
    process_source(
        Path::new("corpus.swift"),
        source,
        Arc::new(Configuration::default()),
        kiln_rules::populate,
        options,
    )
    .unwrap()
}

fn pretty() -> ExecutionOptions {
    ExecutionOptions::format(OutputStyle::Pretty { show_breaks: false })
}

#[test]
fn formatting_is_idempotent() {
    for source in CORPUS {
        let once = run(source, pretty()).output.unwrap();
        let twice = run(&once, pretty()).output.unwrap();
        assert_eq!(once, twice, "second pass changed:\n{once}");
    }
}

#[test]
fn verbatim_formatting_is_idempotent() {
    let verbatim = ExecutionOptions::format(OutputStyle::Verbatim);
    for source in CORPUS {
        let once = run(source, verbatim).output.unwrap();
        let twice = run(&once, verbatim);
        assert_eq!(Some(&once), twice.output.as_ref());
        assert!(!twice.changed);
    }
}

#[test]
fn runs_are_deterministic() {
    for source in CORPUS {
        let first = run(source, pretty());
        let second = run(source, pretty());
        assert_eq!(first.output, second.output);
        assert_eq!(first.diagnostics, second.diagnostics);

        let first = run(source, ExecutionOptions::lint());
        let second = run(source, ExecutionOptions::lint());
        assert_eq!(first.diagnostics, second.diagnostics);
    }
}

#[test]
fn token_stream_reconstructs_leaves() {
    for source in CORPUS {
        let tree = parse(source).unwrap();
        let tokens = make_stream(&tree, 1).unwrap();

        let streamed: Vec<_> = tokens
            .iter()
            .filter_map(|token| match token {
                Token::Syntax(node) => Some(*node),
                _ => None,
            })
            .collect();
        let leaves: Vec<_> = tree
            .leaves(tree.root())
            .filter(|&leaf| tree.kind(leaf) != SyntaxKind::Eof)
            .collect();
        assert_eq!(streamed, leaves);
    }
}

#[test]
fn breaks_are_balanced() {
    for source in CORPUS {
        let tree = parse(source).unwrap();
        let tokens = make_stream(&tree, 1).unwrap();
        let opens = tokens.iter().filter(|t| matches!(t, Token::OpenBreak)).count();
        let closes = tokens.iter().filter(|t| matches!(t, Token::CloseBreak)).count();
        assert_eq!(opens, closes);
    }
}

#[test]
fn lint_leaves_the_text_alone_and_reports() {
    let outcome = run(CORPUS[3], ExecutionOptions::lint());
    assert!(outcome.output.is_none());
    let parens = outcome
        .diagnostics
        .iter()
        .filter(|d| d.rule_id == "NoParensAroundConditions")
        .count();
    assert_eq!(parens, 4);
}

#[test]
fn all_rules_format_sample() {
    let output = run(CORPUS[0], pretty()).output.unwrap();
    insta::assert_snapshot!(output, @r"
    import Foundation

    struct Point {
      let x: Int
      let y: Int

      func norm() -> Int {
        return x * x + y * y
      }
    }
    ");
}
