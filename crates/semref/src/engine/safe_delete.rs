//! Safe-delete candidate evaluation.
//!
//! The verdict is a pure function of the classified reference set: the
//! count of references outside the definition set maps to a confidence
//! bucket, and only the top bucket marks the symbol safe to delete.
//! Reflection and dynamic dispatch are invisible to a lexical index, so
//! the verdict speaks only for the indexed sources.

use semref_core::report::{Confidence, SafeDeleteCandidate, SafeDeletePayload, SafeDeleteSummary};

use crate::engine::collect::ReferenceCollection;

/// Map a non-definition reference count to a confidence bucket.
fn confidence_for(non_definition: u32) -> Confidence {
    match non_definition {
        0 => Confidence::High,
        1..=2 => Confidence::Medium,
        _ => Confidence::Low,
    }
}

fn rationale_for(confidence: Confidence, non_definition: u32) -> String {
    match confidence {
        Confidence::High => "no references outside the definition in the indexed sources; \
             dynamic or reflective access cannot be ruled out"
            .to_string(),
        Confidence::Medium => format!(
            "{non_definition} reference(s) outside the definition in the indexed sources; \
             review each site before deleting"
        ),
        Confidence::Low => format!(
            "{non_definition} references outside the definition in the indexed sources; \
             the symbol is in active use"
        ),
    }
}

/// Evaluate a safe-delete verdict over a classified reference set.
pub(crate) fn evaluate(collection: ReferenceCollection) -> SafeDeletePayload {
    let summary = &collection.summary;
    let non_definition = summary.total_references - summary.definition_count;
    let confidence = confidence_for(non_definition);
    SafeDeletePayload {
        candidate: SafeDeleteCandidate {
            safe_to_delete: confidence == Confidence::High,
            confidence,
            total_references: summary.total_references,
            non_definition_references: non_definition,
            rationale: rationale_for(confidence, non_definition),
        },
        summary: SafeDeleteSummary {
            emitted_references: summary.emitted_references,
            truncated: summary.truncated,
        },
        references: collection.entries,
    }
}

// ============================================================================
// Tests
// ============================================================================
