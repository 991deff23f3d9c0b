//! Per-file processing and the parallel driver
//!
//! Each file runs through: file rules → parse → tree pass → output. Every
//! file gets its own [`Context`] and [`Pipeline`]; only the configuration is
//! shared between workers.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{Level, debug, info, span, warn};

use crate::config::Configuration;
use crate::context::Context;
use crate::diagnostics::Diagnostic;
use crate::error::KilnError;
use crate::format::{PrinterOptions, pretty_print};
use crate::pipeline::{Mode, Pipeline};
use crate::result::Result;
use crate::syntax::parse;

/// Registers rules on a fresh pipeline
pub type Populate = fn(&mut Pipeline);

static THREAD_POOL_INIT: Once = Once::new();

/// Size the global rayon pool; only the first call has an effect
pub fn init_thread_pool(threads: usize) {
    THREAD_POOL_INIT.call_once(|| {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("kiln-worker-{index}"))
            .build_global()
        {
            warn!("Could not configure global thread pool: {}", e);
            return;
        }
        info!("Configured global rayon thread pool with {} threads", threads);
    });
}

/// How format output is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    /// Lossless text of the rewritten tree
    Verbatim,
    /// Token stream through the printer
    Pretty { show_breaks: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionOptions {
    pub mode: Mode,
    pub style: OutputStyle,
}

impl ExecutionOptions {
    pub fn lint() -> Self {
        Self {
            mode: Mode::Lint,
            style: OutputStyle::Verbatim,
        }
    }

    pub fn format(style: OutputStyle) -> Self {
        Self {
            mode: Mode::Format,
            style,
        }
    }
}

/// Result of processing one file
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Text as read from disk
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
    /// Formatted text; `None` in lint mode or after an internal error
    pub output: Option<String>,
    /// Output differs from the source
    pub changed: bool,
    pub execution_time: Duration,
}

impl FileOutcome {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Run one file's text end to end
pub fn process_source(
    path: &Path,
    source: &str,
    configuration: Arc<Configuration>,
    populate: Populate,
    options: ExecutionOptions,
) -> Result<FileOutcome> {
    let start_time = Instant::now();
    let span = span!(Level::DEBUG, "process_file", file = %path.display());
    let _enter = span.enter();

    let mut pipeline = Pipeline::new(Context::new(configuration, path, source));
    populate(&mut pipeline);
    debug!("{} rules registered", pipeline.registered_rules().len());

    let text = pipeline.run_file_rules(source);
    let tree = parse(&text).map_err(|err| {
        let (line, column) = pipeline.context().line_index().line_col(err.range.start());
        KilnError::parse_error(path, line, column, err.message)
    })?;

    let tree = pipeline.run(tree, options.mode);

    let context = pipeline.into_context();
    let output = match (options.mode, options.style) {
        (Mode::Lint, _) => None,
        (Mode::Format, OutputStyle::Verbatim) => Some(tree.to_string()),
        (Mode::Format, OutputStyle::Pretty { show_breaks }) => {
            let printer_options =
                PrinterOptions::from_configuration(context.configuration()).with_show_breaks(show_breaks);
            match pretty_print(&tree, printer_options) {
                Ok(text) => Some(text),
                Err(err) => {
                    warn!("Printer failed for {}: {}", path.display(), err);
                    context.push(Diagnostic::internal(path, err.to_string()));
                    None
                }
            }
        }
    };

    let changed = output.as_deref().is_some_and(|output| output != source);
    let execution_time = start_time.elapsed();
    debug!("Completed {} in {:?}", path.display(), execution_time);

    Ok(FileOutcome {
        path: path.to_path_buf(),
        source: source.to_string(),
        diagnostics: context.take_diagnostics(),
        output,
        changed,
        execution_time,
    })
}

/// Read and run one file
pub fn process_file(
    path: &Path,
    configuration: Arc<Configuration>,
    populate: Populate,
    options: ExecutionOptions,
) -> Result<FileOutcome> {
    let source = fs::read_to_string(path).map_err(|e| KilnError::io_error(path, e))?;
    process_source(path, &source, configuration, populate, options)
}

/// Run many files in parallel; results come back in input order
pub fn process_files(
    paths: &[PathBuf],
    configuration: Arc<Configuration>,
    populate: Populate,
    options: ExecutionOptions,
) -> Vec<Result<FileOutcome>> {
    let start_time = Instant::now();
    let results: Vec<Result<FileOutcome>> = paths
        .par_iter()
        .map(|path| process_file(path, Arc::clone(&configuration), populate, options))
        .collect();
    info!(
        "Processed {} files in {:?}",
        paths.len(),
        start_time.elapsed()
    );
    results
}
