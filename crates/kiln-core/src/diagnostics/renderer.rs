//! Text and JSON rendering of diagnostics

use colored::{ColoredString, Colorize};

use super::{Diagnostic, Severity};

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `path:line:col: severity: message`, optionally with a code frame
    Text,
    /// JSON format for programmatic consumption
    Json,
    /// JSON with pretty-printing
    JsonPretty,
}

/// Renders diagnostics for the terminal or for tools
pub struct DiagnosticRenderer {
    output_format: OutputFormat,
    colors: bool,
}

impl DiagnosticRenderer {
    /// Plain text renderer without colors
    pub fn new() -> Self {
        Self {
            output_format: OutputFormat::Text,
            colors: false,
        }
    }

    /// Create a renderer with specific output format
    pub fn with_format(format: OutputFormat) -> Self {
        Self {
            output_format: format,
            colors: false,
        }
    }

    /// Enable ANSI colors; ignored for JSON output
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors && self.output_format == OutputFormat::Text;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.output_format
    }

    /// Render one diagnostic. `source` enables the code frame.
    pub fn render(&self, diagnostic: &Diagnostic, source: Option<&str>) -> String {
        match self.output_format {
            OutputFormat::Text => self.render_text(diagnostic, source),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.render_all(std::slice::from_ref(diagnostic))
            }
        }
    }

    /// Render a batch. JSON formats produce a single array.
    pub fn render_all(&self, diagnostics: &[Diagnostic]) -> String {
        let rendered = match self.output_format {
            OutputFormat::Text => {
                return diagnostics
                    .iter()
                    .map(|diagnostic| self.render_header(diagnostic))
                    .collect::<Vec<_>>()
                    .join("\n");
            }
            OutputFormat::Json => serde_json::to_string(diagnostics),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(diagnostics),
        };
        rendered.unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {e}\"}}"))
    }

    fn render_text(&self, diagnostic: &Diagnostic, source: Option<&str>) -> String {
        let mut output = self.render_header(diagnostic);
        if let Some(frame) = source.and_then(|source| self.render_code_frame(diagnostic, source)) {
            output.push('\n');
            output.push_str(&frame);
        }
        output
    }

    fn render_header(&self, diagnostic: &Diagnostic) -> String {
        let severity = self.paint(&diagnostic.severity.to_string(), diagnostic.severity);
        let location = if self.colors {
            diagnostic.location.to_string().bold().to_string()
        } else {
            diagnostic.location.to_string()
        };
        format!("{location}: {severity}: {}", diagnostic.message)
    }

    /// The offending line with carets under the span
    fn render_code_frame(&self, diagnostic: &Diagnostic, source: &str) -> Option<String> {
        let location = &diagnostic.location;
        if location.is_whole_file() {
            return None;
        }
        let line = source.lines().nth(location.line - 1)?;
        let gutter = location.line.to_string();
        let pad = " ".repeat(gutter.len());

        let column = location.column.saturating_sub(1).min(line.len());
        let marker_width = location.length.clamp(1, (line.len() - column).max(1));
        let carets = self.paint(&"^".repeat(marker_width), diagnostic.severity);

        Some(format!(
            "{pad} |\n{gutter} | {line}\n{pad} | {}{carets}",
            " ".repeat(column)
        ))
    }

    fn paint(&self, text: &str, severity: Severity) -> String {
        if !self.colors {
            return text.to_string();
        }
        let painted: ColoredString = match severity {
            Severity::Error => text.red().bold(),
            Severity::Warning => text.yellow().bold(),
            Severity::Info => text.blue(),
            Severity::Hint => text.dimmed(),
        };
        painted.to_string()
    }
}

impl Default for DiagnosticRenderer {
    fn default() -> Self {
        Self::new()
    }
}
