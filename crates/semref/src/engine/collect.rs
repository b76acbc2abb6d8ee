//! Reference collection and classification.
//!
//! The collector takes the backend's raw occurrence list, marks the
//! definition set, orders everything by file path and offset, and counts
//! the full set before clipping emission to the caller's cap. Summary
//! counts therefore never change with `maxResults`; only the emitted
//! entry list does.

use std::collections::HashSet;

use tracing::debug;

use semref_core::error::{CoreError, CoreResult};
use semref_core::report::{ReferenceEntry, ReferenceMapPayload, ReferenceSummary};
use semref_core::source::SourceCache;
use semref_core::text;

use crate::backend::AnalysisBackend;

/// The classified outcome of one reference collection pass.
#[derive(Debug, Clone)]
pub(crate) struct ReferenceCollection {
    /// Counts over the full reference set.
    pub(crate) summary: ReferenceSummary,
    /// Entries emitted to the report, clipped to the caller's cap.
    pub(crate) entries: Vec<ReferenceEntry>,
}

impl ReferenceCollection {
    pub(crate) fn into_payload(self) -> ReferenceMapPayload {
        ReferenceMapPayload {
            summary: self.summary,
            references: self.entries,
        }
    }
}

/// Collect, classify, order, count, and clip the references to `symbol`.
///
/// An empty occurrence set is an error: the caret resolved to a symbol
/// the project never mentions, which means the index and the resolver
/// disagree and the caller should know.
pub(crate) fn collect_references(
    backend: &dyn AnalysisBackend,
    cache: &SourceCache,
    symbol: &str,
    max_results: usize,
) -> CoreResult<ReferenceCollection> {
    let mut references = backend.find_references(cache, symbol)?;
    if references.is_empty() {
        return Err(CoreError::reference(format!(
            "no references to '{symbol}' were found in the project"
        )));
    }

    let definitions: HashSet<_> = backend
        .find_definitions(cache, symbol)?
        .into_iter()
        .map(|d| (d.file, d.span))
        .collect();
    for reference in &mut references {
        if definitions.contains(&(reference.file.clone(), reference.span)) {
            reference.is_definition = true;
        }
    }
    references.sort_by(|a, b| (&a.file, a.span.start).cmp(&(&b.file, b.span.start)));

    let total = references.len() as u32;
    let touched_files = references
        .iter()
        .map(|r| r.file.as_path())
        .collect::<HashSet<_>>()
        .len() as u32;
    let definition_count = references.iter().filter(|r| r.is_definition).count() as u32;
    let write_count = references
        .iter()
        .filter(|r| !r.is_definition && r.is_write_access)
        .count() as u32;
    let read_count = total - definition_count - write_count;

    let mut entries = Vec::with_capacity(references.len().min(max_results));
    for reference in references.iter().take(max_results) {
        let content = cache.content(&reference.file)?;
        let (line, column) = text::offset_to_line_column(&content, reference.span.start);
        entries.push(ReferenceEntry {
            file: reference.file.display().to_string(),
            line,
            column,
            is_definition: reference.is_definition,
            is_write_access: reference.is_write_access,
        });
    }
    let emitted = entries.len() as u32;
    debug!(symbol, total, emitted, "references classified");

    Ok(ReferenceCollection {
        summary: ReferenceSummary {
            total_references: total,
            emitted_references: emitted,
            truncated: emitted < total,
            touched_files,
            definition_count,
            read_count,
            write_count,
        },
        entries,
    })
}

// ============================================================================
// Tests
// ============================================================================
