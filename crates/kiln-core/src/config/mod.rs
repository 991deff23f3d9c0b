//! Configuration system for kiln
//!
//! A single immutable [`Configuration`] is loaded once per run and shared
//! (behind an `Arc`) by every rule and the printer.
//!
//! ## Configuration Discovery
//!
//! When no explicit path is given, the loader searches from the start
//! directory upwards for `.kiln.toml`, `kiln.toml`, `.kiln.json` or
//! `kiln.json`. Without a file the defaults apply.
//!
//! ## Example Configuration
//!
//! ```toml
//! maximumBlankLines = 1
//! lineLength = 100
//! tabWidth = 8
//!
//! [indentation]
//! spaces = 2
//!
//! [rules]
//! NoBlockComments = "off"
//! LineLengthLimit = "error"
//! ```

mod configuration;
mod loader;

pub use configuration::{Configuration, Indent, RuleSeverity};
pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
