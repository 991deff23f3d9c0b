//! kiln core
//!
//! Formatting and linting engine for Swift-style brace languages. This crate
//! provides the lossless syntax tree and its parser, the per-kind pass
//! pipeline that runs rules in lint or format mode, and the token stream
//! printer that renders a tree back to text.

pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod executor;
pub mod format;
pub mod pipeline;
pub mod result;
pub mod rule;
pub mod syntax;

pub use biome_text_size::{TextRange, TextSize};
pub use config::{CONFIG_FILE_NAMES, ConfigLoader, Configuration, Indent, RuleSeverity};
pub use context::Context;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticRenderer, Location, OutputFormat, Severity,
};
pub use error::{ErrorKind, KilnError};
pub use executor::{
    ExecutionOptions, FileOutcome, OutputStyle, Populate, init_thread_pool, process_file,
    process_files, process_source,
};
pub use format::{FormatError, Printer, PrinterOptions, Token, make_stream, pretty_print};
pub use pipeline::{Mode, Pipeline, Rewriter};
pub use result::Result;
pub use rule::{Capability, FileCx, FileRule, FormatRule, LintCx, LintRule, Rule};
pub use syntax::{NodeId, SyntaxKind, SyntaxTree, Trivia, TriviaPiece, parse};

/// Initialize the tracing subscriber for logging
///
/// `RUST_LOG` wins when set; otherwise `kiln=warn`, or `kiln=debug` when
/// `verbose`. Logs go to stderr so formatted output on stdout stays clean.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let default = if verbose {
        "kiln=debug,kiln_core=debug,kiln_rules=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
