//! JSON report types and serialization for CLI output.
//!
//! One invocation produces exactly one [`OperationReport`], pretty-printed
//! to stdout. The report is the **sole success artifact**: on failure the
//! CLI prints a diagnostic line to stderr instead and no JSON is emitted.
//!
//! ## Wire Format
//!
//! Field names are camelCase. Every report carries the same envelope
//! (operation, mode, backend, deterministic, symbol, from) followed by the
//! operation-specific payload fields. Reference entries and summary counts
//! are ordered deterministically: same input, same output.

use std::io::Write;

use serde::Serialize;

use crate::error::{CoreError, CoreResult};

// ============================================================================
// Envelope Types
// ============================================================================

/// A caret position in caller coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePosition {
    /// Absolute, normalized file path.
    pub file: String,
    /// 1-based line.
    pub line: u32,
    /// 1-based column in UTF-16 code units.
    pub column: u32,
}

impl SourcePosition {
    /// Create a new position.
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        SourcePosition {
            file: file.into(),
            line,
            column,
        }
    }
}

/// The terminal artifact of one invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationReport {
    /// Operation that ran (rename, reference-map, safe-delete-candidates).
    pub operation: String,
    /// Execution mode (dry-run, apply, analysis).
    pub mode: String,
    /// Identifier of the backend that served the operation.
    pub backend: String,
    /// Whether the backend is deterministic.
    pub deterministic: bool,
    /// Display name of the resolved symbol.
    pub symbol: String,
    /// The caret position the invocation targeted.
    pub from: SourcePosition,
    /// Operation-specific payload fields, flattened into the envelope.
    #[serde(flatten)]
    pub payload: ReportPayload,
}

// ============================================================================
// Payloads
// ============================================================================

/// Operation-specific payload.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReportPayload {
    /// Payload for rename.
    Rename(RenamePayload),
    /// Payload for reference-map.
    ReferenceMap(ReferenceMapPayload),
    /// Payload for safe-delete-candidates.
    SafeDelete(SafeDeletePayload),
}

/// Rename outcome counts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenamePayload {
    /// The new symbol name.
    pub to: String,
    /// Number of files with at least one edit.
    pub touched_files: u32,
    /// Total number of rewritten occurrences.
    pub touched_locations: u32,
}

/// Reference-map payload: classified summary plus emitted entries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceMapPayload {
    /// Summary counts over the full (unclipped) reference set.
    pub summary: ReferenceSummary,
    /// Emitted reference entries, clipped to the caller's maxResults.
    pub references: Vec<ReferenceEntry>,
}

/// Summary counts for a reference map.
///
/// Counts always cover the full reference set; `maxResults` clips only the
/// emitted entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceSummary {
    /// Total references found.
    pub total_references: u32,
    /// Entries actually emitted.
    pub emitted_references: u32,
    /// Whether emission was clipped.
    pub truncated: bool,
    /// Distinct files containing references.
    pub touched_files: u32,
    /// References classified as definitions.
    pub definition_count: u32,
    /// Non-definition references classified as reads.
    pub read_count: u32,
    /// Non-definition references classified as writes.
    pub write_count: u32,
}

/// One emitted reference occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntry {
    /// Absolute, normalized file path.
    pub file: String,
    /// 1-based line of the occurrence.
    pub line: u32,
    /// 1-based column in UTF-16 code units.
    pub column: u32,
    /// Whether this occurrence is the definition.
    pub is_definition: bool,
    /// Whether this occurrence writes to the symbol.
    pub is_write_access: bool,
}

/// Safe-delete payload: verdict, emission summary, and entries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeDeletePayload {
    /// The deletion verdict.
    pub candidate: SafeDeleteCandidate,
    /// Emission summary for the entries below.
    pub summary: SafeDeleteSummary,
    /// Emitted reference entries, clipped to the caller's maxResults.
    pub references: Vec<ReferenceEntry>,
}

/// Deletion verdict for a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeDeleteCandidate {
    /// Whether deletion is considered safe (confidence is high).
    pub safe_to_delete: bool,
    /// Confidence bucket derived from the non-definition count.
    pub confidence: Confidence,
    /// Total references found.
    pub total_references: u32,
    /// References outside the definition set.
    pub non_definition_references: u32,
    /// Fixed explanation for this verdict.
    pub rationale: String,
}

/// Confidence bucket for a safe-delete verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Emission summary for safe-delete entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeDeleteSummary {
    /// Entries actually emitted.
    pub emitted_references: u32,
    /// Whether emission was clipped.
    pub truncated: bool,
}

// ============================================================================
// Emission
// ============================================================================

/// Serialize a report as pretty-printed JSON followed by a newline.
pub fn emit<W: Write>(report: &OperationReport, writer: &mut W) -> CoreResult<()> {
    serde_json::to_writer_pretty(&mut *writer, report)
        .map_err(|e| CoreError::internal(format!("failed to serialize report: {e}")))?;
    writeln!(writer).map_err(|e| CoreError::io("failed to write report", e))?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
