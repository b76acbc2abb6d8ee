//! Invocation orchestration from request to report.
//!
//! One [`EngineRequest`] runs through a fixed pipeline: validate the
//! request, gate it on the capability table, snapshot the project through
//! a [`SourceCache`], resolve the symbol at the caret, and dispatch to
//! the requested operation. The pipeline produces exactly one
//! [`OperationReport`] on success and exactly one [`CoreError`] on
//! failure; nothing is written to disk unless an apply-mode rename
//! reaches its commit phase.

mod collect;
mod resolve;
mod safe_delete;

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use semref_core::edit::{apply_file_edits, FileEdit};
use semref_core::error::{CoreError, CoreResult};
use semref_core::report::{
    OperationReport, RenamePayload, ReportPayload, SourcePosition,
};
use semref_core::source::SourceCache;
use semref_core::text;

use crate::backend::{AnalysisBackend, BackendRegistry, RenameOptions, ResolvedSymbol};
use crate::capability::CapabilityTable;

/// Default cap on emitted reference entries.
pub const DEFAULT_MAX_RESULTS: usize = 200;

// ============================================================================
// Operations
// ============================================================================

/// The operations the engine can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Rewrite every occurrence of the symbol to a new name.
    Rename,
    /// Report a classified map of every occurrence.
    ReferenceMap,
    /// Judge whether the symbol could be deleted safely.
    SafeDeleteCandidates,
}

impl Operation {
    /// Every operation, in wire-name order.
    pub const ALL: &'static [Operation] = &[
        Operation::Rename,
        Operation::ReferenceMap,
        Operation::SafeDeleteCandidates,
    ];

    /// Wire name of the operation, as it appears in reports and
    /// capability descriptors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Rename => "rename",
            Operation::ReferenceMap => "reference-map",
            Operation::SafeDeleteCandidates => "safe-delete-candidates",
        }
    }

    /// Whether the operation mutates project files.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Operation::Rename)
    }
}

// ============================================================================
// Engine Request
// ============================================================================

/// One fully-specified invocation.
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// Operation to run.
    pub operation: Operation,
    /// Language identifier used for capability and backend lookup.
    pub language: String,
    /// Project root directory.
    pub project: PathBuf,
    /// File containing the caret, absolute or relative to the project.
    pub file: PathBuf,
    /// 1-based caret line.
    pub line: u32,
    /// 1-based caret column in UTF-16 code units.
    pub column: u32,
    /// Replacement name; required for rename, ignored otherwise.
    pub new_name: Option<String>,
    /// Plan the rename without writing any file.
    pub dry_run: bool,
    /// Also rewrite occurrences inside comments (rename only).
    pub include_comments: bool,
    /// Also rewrite occurrences inside string literals (rename only).
    pub include_strings: bool,
    /// Cap on emitted reference entries; counts are never capped.
    pub max_results: usize,
}

/// Whether a replacement name is lexically valid as an identifier.
///
/// The grammar is the intersection the supported languages agree on:
/// an ASCII letter, underscore, or `$` followed by ASCII alphanumerics,
/// underscores, or `$`.
fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let leads = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$');
    leads && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn validate(request: &EngineRequest) -> CoreResult<()> {
    if request.line == 0 || request.column == 0 {
        return Err(CoreError::input(
            "line and column are 1-based and must be positive",
        ));
    }
    if request.max_results == 0 {
        return Err(CoreError::input("max-results must be positive"));
    }
    if request.operation == Operation::Rename {
        let name = request
            .new_name
            .as_deref()
            .ok_or_else(|| CoreError::input("rename requires a new name"))?;
        if !is_valid_identifier(name) {
            return Err(CoreError::input(format!(
                "'{name}' is not a valid identifier"
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Engine
// ============================================================================

/// The orchestrator tying capabilities, backends, and operations together.
pub struct Engine<'a> {
    registry: &'a BackendRegistry,
    capabilities: &'a CapabilityTable,
}

impl<'a> Engine<'a> {
    /// Create an engine over a backend registry and capability table.
    pub fn new(registry: &'a BackendRegistry, capabilities: &'a CapabilityTable) -> Self {
        Engine {
            registry,
            capabilities,
        }
    }

    /// Run one invocation end to end.
    pub fn run(&self, request: &EngineRequest) -> CoreResult<OperationReport> {
        validate(request)?;

        let record = self.capabilities.require(&request.language, request.operation)?;
        let backend = self
            .registry
            .get(&request.language)
            .filter(|backend| backend.id() == record.backend_id)
            .ok_or_else(|| {
                CoreError::capability(format!(
                    "backend '{}' is declared for language '{}' but is not available",
                    record.backend_id, request.language
                ))
            })?;

        let cache = SourceCache::new(&request.project)?;
        let file = cache.resolve(&request.file)?;
        let content = cache.content(&file)?;
        let offset = text::line_column_to_offset(&content, request.line, request.column)?;
        debug!(
            operation = request.operation.as_str(),
            file = %file.display(),
            offset,
            "invocation position resolved"
        );

        let symbol = resolve::resolve_symbol(backend, &cache, &file, offset, request.operation)?;
        info!(
            operation = request.operation.as_str(),
            symbol = %symbol.display_name,
            backend = record.backend_id,
            "symbol resolved"
        );

        let from = SourcePosition::new(
            file.display().to_string(),
            request.line,
            request.column,
        );
        let (mode, payload) = match request.operation {
            Operation::Rename => self.run_rename(backend, &cache, request, &symbol)?,
            Operation::ReferenceMap => {
                let collection =
                    collect::collect_references(backend, &cache, &symbol.display_name, request.max_results)?;
                ("analysis", ReportPayload::ReferenceMap(collection.into_payload()))
            }
            Operation::SafeDeleteCandidates => {
                let collection =
                    collect::collect_references(backend, &cache, &symbol.display_name, request.max_results)?;
                ("analysis", ReportPayload::SafeDelete(safe_delete::evaluate(collection)))
            }
        };

        Ok(OperationReport {
            operation: request.operation.as_str().to_string(),
            mode: mode.to_string(),
            backend: record.backend_id.clone(),
            deterministic: record.deterministic,
            symbol: symbol.display_name,
            from,
            payload,
        })
    }

    /// Plan and (unless dry-run) apply a rename.
    ///
    /// Apply is two-phase: every file's new content is spliced in memory
    /// first, then written. A splice failure therefore writes nothing; a
    /// write failure aborts with earlier files already committed, which
    /// the diagnostic reports.
    fn run_rename(
        &self,
        backend: &dyn AnalysisBackend,
        cache: &SourceCache,
        request: &EngineRequest,
        symbol: &ResolvedSymbol,
    ) -> CoreResult<(&'static str, ReportPayload)> {
        let new_name = request.new_name.as_deref().unwrap_or_default();
        let options = RenameOptions {
            include_comments: request.include_comments,
            include_strings: request.include_strings,
        };
        let locations =
            backend.find_rename_locations(cache, &symbol.display_name, &options)?;
        if locations.is_empty() {
            return Err(CoreError::reference(format!(
                "no rename locations were found for '{}'",
                symbol.display_name
            )));
        }

        let touched_locations = locations.len() as u32;
        let mut by_file: BTreeMap<PathBuf, Vec<FileEdit>> = BTreeMap::new();
        for location in locations {
            let replacement = format!("{}{}{}", location.prefix, new_name, location.suffix);
            by_file
                .entry(location.file.clone())
                .or_default()
                .push(FileEdit::new(location.file, location.span, replacement));
        }
        let touched_files = by_file.len() as u32;

        let mut planned = Vec::with_capacity(by_file.len());
        for (file, edits) in by_file {
            let content = cache.content(&file)?;
            let updated = apply_file_edits(&content, &edits)?;
            planned.push((file, updated));
        }

        if request.dry_run {
            debug!(
                touched_files,
                touched_locations, "rename planned, dry-run leaves files untouched"
            );
        } else {
            let mut committed = 0u32;
            for (file, updated) in &planned {
                if let Err(e) = cache.write(file, updated) {
                    warn!(
                        committed,
                        total = touched_files,
                        file = %file.display(),
                        "rename aborted mid-apply; earlier files were already written"
                    );
                    return Err(e);
                }
                committed += 1;
            }
            info!(touched_files, touched_locations, "rename applied");
        }

        let mode = if request.dry_run { "dry-run" } else { "apply" };
        Ok((
            mode,
            ReportPayload::Rename(RenamePayload {
                to: new_name.to_string(),
                touched_files,
                touched_locations,
            }),
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================
