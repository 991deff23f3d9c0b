//! Terminal and JSON reporting

use colored::*;
use kiln_core::{
    Configuration, Diagnostic, DiagnosticRenderer, FileOutcome, KilnError, OutputFormat, Severity,
};
use kiln_rules::RuleDescriptor;
use serde_json::json;
use std::time::Duration;

use crate::LintOutput;

/// Summary statistics for a lint run
#[derive(Debug, Clone, Default)]
pub struct LintSummary {
    pub files_checked: usize,
    pub files_failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub hints: usize,
    pub duration: Duration,
}

impl LintSummary {
    pub fn from_outcomes(outcomes: &[FileOutcome]) -> Self {
        let mut summary = Self {
            files_checked: outcomes.len(),
            ..Self::default()
        };
        for diagnostic in outcomes.iter().flat_map(|outcome| &outcome.diagnostics) {
            match diagnostic.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.infos += 1,
                Severity::Hint => summary.hints += 1,
            }
        }
        summary
    }

    pub fn total_issues(&self) -> usize {
        self.errors + self.warnings + self.infos + self.hints
    }

    pub fn has_issues(&self) -> bool {
        self.total_issues() > 0
    }
}

/// Prints results in the requested format
pub struct OutputFormatter {
    format: LintOutput,
    use_colors: bool,
}

impl OutputFormatter {
    pub fn new(format: LintOutput) -> Self {
        Self {
            format,
            use_colors: colored::control::SHOULD_COLORIZE.should_colorize(),
        }
    }

    fn renderer(&self) -> DiagnosticRenderer {
        match self.format {
            LintOutput::Human => DiagnosticRenderer::new().with_colors(self.use_colors),
            LintOutput::Json => DiagnosticRenderer::with_format(OutputFormat::JsonPretty),
        }
    }

    /// Diagnostics on stdout followed by the summary
    pub fn print_lint(&self, outcomes: &[FileOutcome], summary: &LintSummary) -> anyhow::Result<()> {
        match self.format {
            LintOutput::Human => {
                let renderer = self.renderer();
                for outcome in outcomes {
                    for diagnostic in &outcome.diagnostics {
                        println!("{}", renderer.render(diagnostic, Some(&outcome.source)));
                    }
                }
                self.print_summary(summary);
            }
            LintOutput::Json => {
                let diagnostics: Vec<&Diagnostic> = outcomes
                    .iter()
                    .flat_map(|outcome| &outcome.diagnostics)
                    .collect();
                let report = json!({
                    "diagnostics": diagnostics,
                    "summary": {
                        "filesChecked": summary.files_checked,
                        "filesFailed": summary.files_failed,
                        "errors": summary.errors,
                        "warnings": summary.warnings,
                        "infos": summary.infos,
                        "hints": summary.hints,
                    }
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Ok(())
    }

    fn print_summary(&self, summary: &LintSummary) {
        let files = plural(summary.files_checked, "file");
        let elapsed = format!("({:.2?})", summary.duration).dimmed();
        if !summary.has_issues() && summary.files_failed == 0 {
            println!("{} Checked {} {}", "✓".green(), files, elapsed);
            return;
        }

        let mut parts = Vec::new();
        if summary.errors > 0 {
            parts.push(plural(summary.errors, "error").red().to_string());
        }
        if summary.warnings > 0 {
            parts.push(plural(summary.warnings, "warning").yellow().to_string());
        }
        if summary.infos + summary.hints > 0 {
            parts.push(plural(summary.infos + summary.hints, "note").blue().to_string());
        }
        if summary.files_failed > 0 {
            parts.push(format!("{} failed", plural(summary.files_failed, "file")).red().to_string());
        }
        println!("Checked {}: {} {}", files, parts.join(", "), elapsed);
    }

    pub fn print_diagnostics_to_stderr(&self, diagnostics: &[Diagnostic], source: Option<&str>) {
        let renderer = DiagnosticRenderer::new().with_colors(self.use_colors);
        for diagnostic in diagnostics {
            eprintln!("{}", renderer.render(diagnostic, source));
        }
    }

    pub fn print_format_summary(&self, files: usize, rewritten: usize) {
        eprintln!(
            "{} Formatted {}, {} changed",
            "✓".green(),
            plural(files, "file"),
            rewritten
        );
    }

    pub fn print_rules(&self, rules: &[RuleDescriptor], configuration: &Configuration) {
        let width = rules.iter().map(|rule| rule.name.len()).max().unwrap_or(0);
        for rule in rules {
            let status = if !configuration.is_rule_enabled(rule.name) {
                "off".to_string()
            } else {
                configuration
                    .rule_severity(rule.name)
                    .map_or_else(|| "on".to_string(), |severity| severity.to_string())
            };
            println!(
                "{}  {:<6}  {}  {}",
                format!("{:<width$}", rule.name).bold(),
                rule.capability.to_string(),
                format!("{status:<7}").dimmed(),
                rule.description,
            );
        }
    }
}

/// A file that could not be processed
pub fn print_file_error(err: &KilnError) {
    eprintln!("{} {}", "error:".red().bold(), err);
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::Location;
    use std::path::PathBuf;

    fn outcome(severities: &[Severity]) -> FileOutcome {
        FileOutcome {
            path: PathBuf::from("a.swift"),
            source: String::new(),
            diagnostics: severities
                .iter()
                .map(|&severity| {
                    Diagnostic::new("Rule", severity, "[Rule]: finding", Location::new("a.swift", 1, 1))
                })
                .collect(),
            output: None,
            changed: false,
            execution_time: Duration::ZERO,
        }
    }

    #[test]
    fn test_summary_counts_by_severity() {
        let summary = LintSummary::from_outcomes(&[
            outcome(&[Severity::Warning, Severity::Error]),
            outcome(&[Severity::Warning]),
            outcome(&[]),
        ]);
        assert_eq!(summary.files_checked, 3);
        assert_eq!(summary.warnings, 2);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.total_issues(), 3);
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "file"), "1 file");
        assert_eq!(plural(0, "file"), "0 files");
    }
}
