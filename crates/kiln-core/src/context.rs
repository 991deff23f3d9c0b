//! Per-file state shared by every rule

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use biome_text_size::TextRange;

use crate::config::Configuration;
use crate::diagnostics::{Diagnostic, Location, Severity};
use crate::syntax::LineIndex;

/// Configuration, file identity and the diagnostics sink for one file
///
/// Rules receive it by shared reference. The sink uses interior mutability
/// and is append-only for the life of the run.
#[derive(Debug)]
pub struct Context {
    configuration: Arc<Configuration>,
    file: PathBuf,
    line_index: LineIndex,
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Context {
    pub fn new(configuration: Arc<Configuration>, file: impl Into<PathBuf>, source: &str) -> Self {
        Self {
            configuration,
            file: file.into(),
            line_index: LineIndex::new(source),
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Point line offsets at a new revision of the text
    pub(crate) fn reindex(&mut self, source: &str) {
        self.line_index = LineIndex::new(source);
    }

    /// Resolve a range against the current text
    pub fn location(&self, range: Option<TextRange>) -> Location {
        match range {
            Some(range) => {
                let (line, column) = self.line_index.line_col(range.start());
                Location::new(self.file.clone(), line, column)
                    .with_span(usize::from(range.start()), usize::from(range.len()))
            }
            None => Location::whole_file(self.file.clone()),
        }
    }

    /// Record an unattributed finding
    pub fn emit(&self, severity: Severity, message: impl Into<String>, range: Option<TextRange>) {
        let location = self.location(range);
        self.push(Diagnostic::new("kiln", severity, message, location));
    }

    /// Record a rule finding with the `[RuleName]: ` prefix. A configured
    /// severity for the rule replaces the one it asked for.
    pub(crate) fn emit_for_rule(
        &self,
        rule: &str,
        severity: Severity,
        message: &str,
        location: Location,
    ) {
        let severity = self.configuration.rule_severity(rule).unwrap_or(severity);
        let message = format!("[{rule}]: {message}");
        self.push(Diagnostic::new(rule, severity, message, location));
    }

    pub fn push(&self, diagnostic: Diagnostic) {
        tracing::trace!("diagnostic: {}", diagnostic);
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Snapshot of everything emitted so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn diagnostic_count(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleSeverity;
    use biome_text_size::TextSize;

    #[test]
    fn test_emit_resolves_location() {
        let context = Context::new(
            Arc::new(Configuration::default()),
            "main.swift",
            "let a = 1\nlet b = 2\n",
        );
        let range = TextRange::new(TextSize::from(14), TextSize::from(15));
        context.emit(Severity::Info, "found b", Some(range));

        let diagnostics = context.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.line, 2);
        assert_eq!(diagnostics[0].location.column, 5);
        assert_eq!(diagnostics[0].location.length, 1);
    }

    #[test]
    fn test_rule_prefix_and_override() {
        let mut configuration = Configuration::default();
        configuration
            .rules
            .insert("NoBlockComments".to_string(), RuleSeverity::Error);
        let context = Context::new(Arc::new(configuration), "main.swift", "");

        context.emit_for_rule(
            "NoBlockComments",
            Severity::Warning,
            "block comment",
            context.location(None),
        );

        let diagnostics = context.take_diagnostics();
        assert_eq!(diagnostics[0].message, "[NoBlockComments]: block comment");
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(context.diagnostic_count(), 0);
    }
}
