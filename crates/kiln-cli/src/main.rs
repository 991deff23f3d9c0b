//! kiln CLI
//!
//! Command-line interface for the kiln formatter and linter

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "kiln: formatter and linter for Swift sources")]
#[command(version = kiln_core::VERSION)]
#[command(
    long_about = "kiln rewrites and checks Swift sources with a set of built-in rules.\n\
\n\
Examples:\n  \
kiln lint Sources/             # Report rule violations\n  \
kiln format --in-place .       # Format every .swift file in place\n  \
kiln format --debug a.swift    # Show indentation break markers\n  \
kiln dump-config --schema      # Print the configuration JSON Schema"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.kiln.toml/.kiln.json)"
    )]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for parallel processing
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report rule violations without changing files
    #[command(alias = "check")]
    Lint {
        /// Files or directories to lint
        #[arg(help = "Files or directories to process (default: current directory)")]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(
            short,
            long,
            default_value = "human",
            help = "Output format for diagnostics"
        )]
        output: LintOutput,

        /// Exclude patterns (glob syntax)
        #[arg(
            long,
            help = "Exclude files matching pattern (can be used multiple times)"
        )]
        exclude: Vec<String>,
    },

    /// Format files with the built-in rules and the pretty printer
    #[command(alias = "fmt")]
    Format {
        /// Files or directories to format
        #[arg(help = "Files or directories to format (default: current directory)")]
        paths: Vec<PathBuf>,

        /// Write results back instead of printing them
        #[arg(short, long, help = "Rewrite files in place")]
        in_place: bool,

        /// Skip the printer and print the rewritten tree as is
        #[arg(long, help = "Print rule rewrites without re-indenting")]
        verbatim: bool,

        /// Show indentation break markers in the output
        #[arg(long, help = "Print break markers as ⟨ and ⟩", conflicts_with_all = ["verbatim", "in_place"])]
        debug: bool,

        /// Exclude patterns (glob syntax)
        #[arg(
            long,
            help = "Exclude files matching pattern (can be used multiple times)"
        )]
        exclude: Vec<String>,
    },

    /// List built-in rules
    Rules,

    /// Print the effective configuration
    DumpConfig {
        /// Print the JSON Schema instead
        #[arg(long, help = "Print the configuration JSON Schema")]
        schema: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LintOutput {
    /// Human-readable output with colors and context
    Human,
    /// JSON format for programmatic consumption
    Json,
}

/// Process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    /// Nothing to report
    Clean,
    /// Diagnostics were emitted
    Findings,
    /// A file could not be processed
    Failed,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Clean => ExitCode::SUCCESS,
            Status::Findings => ExitCode::from(1),
            Status::Failed => ExitCode::from(2),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    kiln_core::init_tracing(cli.verbose > 0);

    if let Some(threads) = cli.threads {
        kiln_core::init_thread_pool(threads);
    }

    match run_command(cli) {
        Ok(status) => {
            debug!("Exiting with {:?}", status);
            status.into()
        }
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            Status::Failed.into()
        }
    }
}

fn run_command(cli: Cli) -> anyhow::Result<Status> {
    let config_path = cli.config;
    match cli.command {
        Commands::Lint {
            paths,
            output,
            exclude,
        } => commands::lint_command(paths, output, exclude, config_path),

        Commands::Format {
            paths,
            in_place,
            verbatim,
            debug,
            exclude,
        } => commands::format_command(
            paths,
            commands::FormatFlags {
                in_place,
                verbatim,
                debug,
            },
            exclude,
            config_path,
        ),

        Commands::Rules => commands::rules_command(config_path),

        Commands::DumpConfig { schema } => commands::dump_config_command(schema, config_path),
    }
}
