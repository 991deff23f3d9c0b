//! Configuration types for kiln

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::diagnostics::Severity;
use crate::error::KilnError;
use crate::result::Result;

/// Immutable settings shared by every rule and the printer
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    /// Configuration format version
    #[schemars(description = "Configuration format version")]
    pub version: u32,

    /// Maximum consecutive blank lines to keep
    #[schemars(description = "Maximum number of consecutive blank lines")]
    pub maximum_blank_lines: usize,

    /// Maximum line width
    #[schemars(description = "Maximum line width in columns")]
    pub line_length: usize,

    /// Display width of a tab character
    #[schemars(description = "Columns a tab character occupies")]
    pub tab_width: usize,

    /// One level of indentation
    #[schemars(description = "Indentation unit: { spaces = n } or { tabs = n }")]
    pub indentation: Indent,

    /// Per-rule severity; rules not listed run with their own severity
    #[schemars(description = "Rule name to severity (off, info, warn, error)")]
    pub rules: BTreeMap<String, RuleSeverity>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            version: 1,
            maximum_blank_lines: 1,
            line_length: 100,
            tab_width: 8,
            indentation: Indent::Spaces(2),
            rules: BTreeMap::new(),
        }
    }
}

impl Configuration {
    /// Reject values the pipeline and printer cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.line_length == 0 {
            return Err(KilnError::config_error("lineLength must be greater than 0"));
        }
        if self.indentation.count() == 0 {
            return Err(KilnError::config_error(
                "indentation must be at least one space or tab",
            ));
        }
        if self.tab_width == 0 {
            return Err(KilnError::config_error("tabWidth must be greater than 0"));
        }
        Ok(())
    }

    /// Whether a rule should be registered at all
    pub fn is_rule_enabled(&self, rule: &str) -> bool {
        self.rules.get(rule) != Some(&RuleSeverity::Off)
    }

    /// Severity override for a rule, if one is configured
    pub fn rule_severity(&self, rule: &str) -> Option<Severity> {
        self.rules.get(rule).and_then(|severity| severity.to_severity())
    }

    /// Render as TOML, tables last
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self)
            .map_err(|e| KilnError::config_error(format!("Failed to serialize config: {e}")))
    }

    /// JSON Schema describing the configuration file
    pub fn json_schema() -> Result<String> {
        let schema = schemars::schema_for!(Configuration);
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}

/// Indentation unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Indent {
    Spaces(usize),
    Tabs(usize),
}

impl Indent {
    /// Characters in one unit
    pub fn count(self) -> usize {
        match self {
            Indent::Spaces(n) | Indent::Tabs(n) => n,
        }
    }

    pub fn character(self) -> char {
        match self {
            Indent::Spaces(_) => ' ',
            Indent::Tabs(_) => '\t',
        }
    }
}

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Disable the rule
    Off,
    /// Informational message
    Info,
    /// Warning (doesn't fail the run by itself in format mode)
    Warn,
    /// Error
    Error,
}

impl RuleSeverity {
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Off => None,
            RuleSeverity::Info => Some(Severity::Info),
            RuleSeverity::Warn => Some(Severity::Warning),
            RuleSeverity::Error => Some(Severity::Error),
        }
    }
}
