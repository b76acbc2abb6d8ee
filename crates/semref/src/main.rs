//! semref command-line interface.
//!
//! One invocation runs one operation and produces one JSON report on
//! stdout. Diagnostics and logs go to stderr, so stdout stays parseable.
//! On failure the process prints a single `[semref] {message}` line and
//! exits with the error's stable code.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use semref::backend::BackendRegistry;
use semref::capability::CapabilityTable;
use semref::engine::{Engine, EngineRequest, Operation, DEFAULT_MAX_RESULTS};
use semref_core::error::CoreResult;
use semref_core::report;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "semref",
    version,
    about = "Semantic refactoring engine: rename symbols, map references, judge safe deletes"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    /// Operation to run.
    #[arg(long, value_enum, default_value_t = OperationArg::Rename)]
    operation: OperationArg,

    /// Language of the project (selects the analysis backend).
    #[arg(long)]
    language: String,

    /// File containing the caret, absolute or relative to the project.
    #[arg(long)]
    file: PathBuf,

    /// 1-based caret line.
    #[arg(long)]
    line: u32,

    /// 1-based caret column in UTF-16 code units.
    #[arg(long)]
    column: u32,

    /// Replacement name; required by rename.
    #[arg(long)]
    new_name: Option<String>,

    /// Plan the rename and report it without writing any file.
    #[arg(long)]
    dry_run: bool,

    /// Also rewrite occurrences inside comments (rename only).
    #[arg(long)]
    include_comments: bool,

    /// Also rewrite occurrences inside string literals (rename only).
    #[arg(long)]
    include_strings: bool,

    /// Cap on emitted reference entries; summary counts are never capped.
    #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
    max_results: usize,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Project root directory.
    #[arg(long, default_value = ".")]
    project: PathBuf,

    /// JSON capability descriptor replacing the builtin table.
    #[arg(long)]
    capabilities: Option<PathBuf>,

    /// Log verbosity on stderr (RUST_LOG overrides).
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

/// CLI surface of [`Operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OperationArg {
    Rename,
    ReferenceMap,
    SafeDeleteCandidates,
}

impl From<OperationArg> for Operation {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::Rename => Operation::Rename,
            OperationArg::ReferenceMap => Operation::ReferenceMap,
            OperationArg::SafeDeleteCandidates => Operation::SafeDeleteCandidates,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

// ============================================================================
// Entry Point
// ============================================================================

fn init_tracing(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(cli: Cli) -> CoreResult<()> {
    let capabilities = match &cli.global.capabilities {
        Some(path) => CapabilityTable::from_json_file(path)?,
        None => CapabilityTable::builtin(),
    };
    let registry = BackendRegistry::builtin();
    let engine = Engine::new(&registry, &capabilities);

    let request = EngineRequest {
        operation: cli.operation.into(),
        language: cli.language,
        project: cli.global.project,
        file: cli.file,
        line: cli.line,
        column: cli.column,
        new_name: cli.new_name,
        dry_run: cli.dry_run,
        include_comments: cli.include_comments,
        include_strings: cli.include_strings,
        max_results: cli.max_results,
    };
    let output = engine.run(&request)?;
    report::emit(&output, &mut std::io::stdout().lock())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.log_level);
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[semref] {err}");
            ExitCode::from(err.exit_category().code())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn operation_arg_maps_onto_engine_operations() {
        assert_eq!(Operation::from(OperationArg::Rename), Operation::Rename);
        assert_eq!(
            Operation::from(OperationArg::ReferenceMap),
            Operation::ReferenceMap
        );
        assert_eq!(
            Operation::from(OperationArg::SafeDeleteCandidates),
            Operation::SafeDeleteCandidates
        );
    }

    #[test]
    fn defaults_select_rename_dry_run_off() {
        let cli = Cli::parse_from([
            "semref",
            "--language",
            "go",
            "--file",
            "main.go",
            "--line",
            "1",
            "--column",
            "6",
        ]);
        assert_eq!(cli.operation, OperationArg::Rename);
        assert!(!cli.dry_run);
        assert_eq!(cli.max_results, DEFAULT_MAX_RESULTS);
        assert_eq!(cli.global.project, PathBuf::from("."));
        assert_eq!(cli.global.log_level, LogLevel::Warn);
    }

    #[test]
    fn kebab_case_operation_names_parse() {
        let cli = Cli::parse_from([
            "semref",
            "--operation",
            "safe-delete-candidates",
            "--language",
            "rust",
            "--file",
            "lib.rs",
            "--line",
            "1",
            "--column",
            "4",
        ]);
        assert_eq!(cli.operation, OperationArg::SafeDeleteCandidates);
    }
}
