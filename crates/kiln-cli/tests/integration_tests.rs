//! End-to-end tests for the kiln binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn cli() -> Command {
    Command::cargo_bin("kiln").unwrap()
}

fn project(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    temp_dir
}

#[test]
fn test_help_lists_subcommands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("lint"))
        .stdout(predicate::str::contains("format"))
        .stdout(predicate::str::contains("dump-config"));
}

#[test]
fn test_lint_clean_file_exits_zero() {
    let dir = project(&[("ok.swift", "let a = 1\n")]);
    cli()
        .arg("--no-color")
        .arg("lint")
        .arg(dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Checked 1 file"));
}

#[test]
fn test_lint_findings_exit_one() {
    let dir = project(&[("a.swift", "if (x) { a(); b() }\n")]);
    cli()
        .arg("--no-color")
        .arg("lint")
        .arg(dir.path().join("a.swift"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "[NoParensAroundConditions]: remove parentheses around this expression",
        ))
        .stdout(predicate::str::contains("[DoNotUseSemicolons]: remove ';'"));
}

#[test]
fn test_lint_json_output() {
    let dir = project(&[("a.swift", "let a = 1;\n")]);
    let output = cli()
        .args(["lint", "--output", "json"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["filesChecked"], 1);
    assert_eq!(report["diagnostics"][0]["rule_id"], "DoNotUseSemicolons");
    assert_eq!(report["diagnostics"][0]["severity"], "warning");
}

#[test]
fn test_parse_error_exits_two() {
    let dir = project(&[("bad.swift", "func f() {\n"), ("good.swift", "let a = 1\n")]);
    cli()
        .arg("lint")
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("bad.swift"));
}

#[test]
fn test_format_prints_pretty_output() {
    let dir = project(&[("a.swift", "func f() {\nif (ready) {\nlaunch(); land()\n}\n}\n")]);
    cli()
        .arg("format")
        .arg(dir.path().join("a.swift"))
        .assert()
        .success()
        .stdout("func f() {\n  if ready {\n    launch()\n    land()\n  }\n}\n");
}

#[test]
fn test_format_debug_shows_breaks() {
    let dir = project(&[("a.swift", "if x { return 1 }")]);
    cli()
        .args(["format", "--debug"])
        .arg(dir.path().join("a.swift"))
        .assert()
        .success()
        .stdout("if ⟨x ⟩{ ⟨return 1 ⟩}");
}

#[test]
fn test_format_verbatim_keeps_layout() {
    let dir = project(&[("a.swift", "func f() {\n        if (x) { y() }\n}\n")]);
    cli()
        .args(["format", "--verbatim"])
        .arg(dir.path().join("a.swift"))
        .assert()
        .success()
        .stdout("func f() {\n        if x { y() }\n}\n");
}

#[test]
fn test_format_in_place_with_exclude() {
    let dir = project(&[
        ("Sources/a.swift", "let a = 1;\n"),
        ("Sources/Generated/b.swift", "let b = 2;\n"),
    ]);
    cli()
        .args(["format", "--in-place", "--exclude", "*/Generated"])
        .arg(dir.path().join("Sources"))
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("Sources/a.swift")).unwrap(),
        "let a = 1\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("Sources/Generated/b.swift")).unwrap(),
        "let b = 2;\n"
    );
}

#[test]
fn test_config_disables_rules() {
    let dir = project(&[
        ("a.swift", "let a = 1;\n"),
        (".kiln.toml", "[rules]\nDoNotUseSemicolons = \"off\"\n"),
    ]);
    cli()
        .arg("lint")
        .arg(dir.path())
        .assert()
        .code(0);
}

#[test]
fn test_explicit_config_sets_indentation() {
    let dir = project(&[
        ("a.swift", "func f() {\nreturn 1\n}\n"),
        ("custom.json", r#"{ "indentation": { "tabs": 1 } }"#),
    ]);
    cli()
        .arg("--config")
        .arg(dir.path().join("custom.json"))
        .arg("format")
        .arg(dir.path().join("a.swift"))
        .assert()
        .success()
        .stdout("func f() {\n\treturn 1\n}\n");
}

#[test]
fn test_invalid_config_exits_two() {
    let dir = project(&[("a.swift", "let a = 1\n"), (".kiln.toml", "lineLength = 0\n")]);
    cli()
        .arg("lint")
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_rules_lists_builtins() {
    cli()
        .args(["--no-color", "rules"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MaximumBlankLines"))
        .stdout(predicate::str::contains("LineLengthLimit"));
}

#[test]
fn test_dump_config_and_schema() {
    let dir = project(&[]);
    cli()
        .current_dir(dir.path())
        .arg("dump-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("maximumBlankLines = 1"));

    cli()
        .args(["dump-config", "--schema"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"lineLength\""));
}
