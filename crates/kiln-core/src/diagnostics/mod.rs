//! Diagnostic records produced while linting and formatting

mod renderer;

pub use renderer::{DiagnosticRenderer, OutputFormat};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A single finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Name of the rule that produced it, or `parse` / `internal`
    pub rule_id: String,
    /// Severity level of the diagnostic
    pub severity: Severity,
    pub category: DiagnosticCategory,
    /// Human-readable message; rule findings carry a `[RuleName]: ` prefix
    pub message: String,
    /// Location in the source file
    pub location: Location,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            category: DiagnosticCategory::Style,
            message: message.into(),
            location,
        }
    }

    /// An internal-consistency failure for a whole file
    pub fn internal(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            rule_id: "internal".to_string(),
            severity: Severity::Error,
            category: DiagnosticCategory::Internal,
            message: message.into(),
            location: Location::whole_file(file),
        }
    }

    /// A parse failure at a position
    pub fn parse(location: Location, message: impl Into<String>) -> Self {
        Self {
            rule_id: "parse".to_string(),
            severity: Severity::Error,
            category: DiagnosticCategory::Parse,
            message: message.into(),
            location,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.severity, self.message)
    }
}

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages
    Info,
    /// Hints for improvements
    Hint,
    /// Warnings that should be addressed
    Warning,
    /// Errors that must be fixed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Hint => "hint",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// Where a diagnostic came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    /// A rule finding
    Style,
    /// The file could not be parsed
    Parse,
    /// Break markers or printer state out of balance
    Internal,
}

/// Location information for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Line number (1-based); 0 when the diagnostic covers the whole file
    pub line: usize,
    /// Column number (1-based, bytes)
    pub column: usize,
    /// Byte offset in the file
    pub offset: usize,
    /// Length of the span
    pub length: usize,
}

impl Location {
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    pub fn whole_file(file: impl Into<PathBuf>) -> Self {
        Self::new(file, 0, 0)
    }

    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn is_whole_file(&self) -> bool {
        self.line == 0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole_file() {
            write!(f, "{}", self.file.display())
        } else {
            write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::new(
            "NoBlockComments",
            Severity::Warning,
            "[NoBlockComments]: block comments are not allowed",
            Location::new("Sources/main.swift", 4, 9),
        );
        assert_eq!(
            diagnostic.to_string(),
            "Sources/main.swift:4:9: warning: [NoBlockComments]: block comments are not allowed"
        );
    }

    #[test]
    fn test_internal_diagnostic() {
        let diagnostic = Diagnostic::internal("a.swift", "unbalanced close break");
        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.category, DiagnosticCategory::Internal);
        assert_eq!(diagnostic.to_string(), "a.swift: error: unbalanced close break");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }
}
