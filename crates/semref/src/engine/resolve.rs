//! Symbol resolution at the caret position.
//!
//! The backend is always asked first. When it has no answer, read-only
//! operations fall back to lexical identifier extraction over the cached
//! snapshot; rename never does, because a lexical guess must not
//! authorize a mutation the backend did not confirm.

use std::path::Path;

use tracing::debug;

use semref_core::error::{CoreError, CoreResult};
use semref_core::source::SourceCache;

use crate::backend::{AnalysisBackend, ResolvedSymbol};
use crate::engine::Operation;
use crate::index::identifier_at;

/// Resolve the symbol at `offset` for the requested operation.
pub(crate) fn resolve_symbol(
    backend: &dyn AnalysisBackend,
    cache: &SourceCache,
    file: &Path,
    offset: usize,
    operation: Operation,
) -> CoreResult<ResolvedSymbol> {
    if let Some(resolved) = backend.resolve_symbol(cache, file, offset)? {
        if operation == Operation::Rename && !resolved.renameable {
            let reason = resolved
                .decline_reason
                .unwrap_or_else(|| "the backend declined the rename".to_string());
            return Err(CoreError::symbol(format!(
                "'{}' cannot be renamed: {}",
                resolved.display_name, reason
            )));
        }
        return Ok(resolved);
    }

    if operation.is_mutating() {
        return Err(CoreError::symbol(
            "no renameable symbol at the requested position",
        ));
    }

    let content = cache.content(file)?;
    let name = identifier_at(&content, offset, backend.extra_identifier_chars()).ok_or_else(
        || CoreError::symbol("no identifier at the requested position"),
    )?;
    debug!(symbol = name, "backend had no answer, resolved lexically");
    Ok(ResolvedSymbol {
        display_name: name.to_string(),
        renameable: false,
        decline_reason: Some("resolved lexically, not confirmed by the backend".to_string()),
    })
}

// ============================================================================
// Tests
// ============================================================================
