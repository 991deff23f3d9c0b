//! CLI command implementations

use anyhow::{Context as _, bail};
use glob::Pattern;
use kiln_core::{
    ConfigLoader, Configuration, DiagnosticCategory, ExecutionOptions, FileOutcome, KilnError,
    OutputStyle, process_files,
};
use kiln_rules::ALL_RULES;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::output::{LintSummary, OutputFormatter};
use crate::{LintOutput, Status};

/// Extension of the files picked up when walking directories
const SOURCE_EXTENSION: &str = "swift";

/// Switches of the format command
#[derive(Debug, Clone, Copy)]
pub struct FormatFlags {
    pub in_place: bool,
    pub verbatim: bool,
    pub debug: bool,
}

impl FormatFlags {
    fn style(self) -> OutputStyle {
        if self.verbatim {
            OutputStyle::Verbatim
        } else {
            OutputStyle::Pretty {
                show_breaks: self.debug,
            }
        }
    }
}

/// Lint command implementation
pub fn lint_command(
    paths: Vec<PathBuf>,
    output: LintOutput,
    exclude: Vec<String>,
    config_path: Option<PathBuf>,
) -> anyhow::Result<Status> {
    debug!("Running lint command on paths: {:?}", paths);
    let paths = default_paths(paths);
    let configuration = load_configuration(config_path.as_deref(), &paths)?;
    let files = discover_files(&paths, &exclude)?;

    let start_time = Instant::now();
    let results = process_files(
        &files,
        configuration,
        kiln_rules::populate,
        ExecutionOptions::lint(),
    );

    let (outcomes, failed) = split_failures(results)?;
    let mut summary = LintSummary::from_outcomes(&outcomes);
    summary.files_failed = failed;
    summary.duration = start_time.elapsed();

    OutputFormatter::new(output).print_lint(&outcomes, &summary)?;
    info!("Linted {} files in {:?}", files.len(), summary.duration);

    Ok(if failed > 0 {
        Status::Failed
    } else if summary.has_issues() {
        Status::Findings
    } else {
        Status::Clean
    })
}

/// Format command implementation
pub fn format_command(
    paths: Vec<PathBuf>,
    flags: FormatFlags,
    exclude: Vec<String>,
    config_path: Option<PathBuf>,
) -> anyhow::Result<Status> {
    debug!("Running format command on paths: {:?} ({:?})", paths, flags);
    let paths = default_paths(paths);
    let configuration = load_configuration(config_path.as_deref(), &paths)?;
    let files = discover_files(&paths, &exclude)?;

    let results = process_files(
        &files,
        configuration,
        kiln_rules::populate,
        ExecutionOptions::format(flags.style()),
    );
    let (outcomes, mut failed) = split_failures(results)?;

    let formatter = OutputFormatter::new(LintOutput::Human);
    let mut rewritten = 0;
    for outcome in &outcomes {
        let internal: Vec<_> = outcome
            .diagnostics
            .iter()
            .filter(|d| d.category == DiagnosticCategory::Internal)
            .cloned()
            .collect();
        if !internal.is_empty() {
            formatter.print_diagnostics_to_stderr(&internal, Some(&outcome.source));
            failed += 1;
            continue;
        }

        let Some(text) = &outcome.output else {
            continue;
        };
        if flags.in_place {
            if outcome.changed {
                fs::write(&outcome.path, text).map_err(|e| KilnError::io_error(&outcome.path, e))?;
                rewritten += 1;
                debug!("Rewrote {}", outcome.path.display());
            }
        } else {
            print!("{text}");
        }
    }

    if flags.in_place {
        formatter.print_format_summary(outcomes.len(), rewritten);
    }
    Ok(if failed > 0 { Status::Failed } else { Status::Clean })
}

/// List the built-in rules and whether the configuration enables them
pub fn rules_command(config_path: Option<PathBuf>) -> anyhow::Result<Status> {
    let configuration = load_configuration(config_path.as_deref(), &[PathBuf::from(".")])?;
    OutputFormatter::new(LintOutput::Human).print_rules(ALL_RULES, &configuration);
    Ok(Status::Clean)
}

/// Print the effective configuration, or its schema
pub fn dump_config_command(schema: bool, config_path: Option<PathBuf>) -> anyhow::Result<Status> {
    if schema {
        println!("{}", Configuration::json_schema()?);
        return Ok(Status::Clean);
    }
    let configuration = load_configuration(config_path.as_deref(), &[PathBuf::from(".")])?;
    print!("{}", configuration.to_toml_string()?);
    Ok(Status::Clean)
}

fn default_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    }
}

/// Explicit `--config`, else discovery from the first path
fn load_configuration(
    config_path: Option<&Path>,
    paths: &[PathBuf],
) -> anyhow::Result<Arc<Configuration>> {
    let start_dir = paths.first().map(|path| {
        if path.is_file() {
            match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            }
        } else {
            path.clone()
        }
    });
    let configuration = ConfigLoader::load(config_path, start_dir.as_deref())?;
    debug!("Loaded configuration: {:?}", configuration);
    Ok(Arc::new(configuration))
}

/// Expand directories to their `.swift` files and drop excluded paths.
/// Explicit file arguments are kept whatever their extension.
fn discover_files(paths: &[PathBuf], exclude: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let patterns = exclude
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).with_context(|| format!("invalid exclude pattern '{pattern}'"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let excluded = |path: &Path| patterns.iter().any(|pattern| pattern.matches_path(path));

    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            if !excluded(path) {
                files.push(path.clone());
            }
            continue;
        }
        if !path.is_dir() {
            bail!("path not found: {}", path.display());
        }

        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .into_iter()
            .filter_entry(|entry| !excluded(entry.path()))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION))
            .collect();
        found.sort();
        files.extend(found);
    }

    debug!("Discovered {} files", files.len());
    Ok(files)
}

/// Separate per-file failures from outcomes. Failures that only affect one
/// file are printed; anything else aborts the command.
fn split_failures(
    results: Vec<kiln_core::Result<FileOutcome>>,
) -> anyhow::Result<(Vec<FileOutcome>, usize)> {
    let mut outcomes = Vec::with_capacity(results.len());
    let mut failed = 0;
    for result in results {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) if err.is_recoverable() => {
                crate::output::print_file_error(&err);
                failed += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok((outcomes, failed))
}
