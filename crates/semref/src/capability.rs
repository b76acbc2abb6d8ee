//! Backend capability routing.
//!
//! Every invocation is gated on a `{language, operation}` lookup in the
//! [`CapabilityTable`] before any backend call. The table fails closed:
//! an absent language, an absent operation row, or `supported: false` all
//! refuse the request. Read-only operations may run against a backend
//! marked non-deterministic (the report carries the flag), but rename
//! never does.
//!
//! ## Descriptor Format
//!
//! The builtin table covers the bundled backends; `--capabilities <path>`
//! replaces it with a JSON descriptor of the same shape:
//!
//! ```json
//! {
//!   "go": {
//!     "rename": { "supported": true, "backendId": "symbol-index", "deterministic": true },
//!     "reference-map": { "supported": true, "backendId": "symbol-index", "deterministic": true }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use semref_core::error::{CoreError, CoreResult};

use crate::engine::Operation;

/// Backend id of the bundled deterministic lexical backend.
pub const SYMBOL_INDEX_BACKEND_ID: &str = "symbol-index";

// ============================================================================
// Capability Records
// ============================================================================

/// Support declaration for one `{language, operation}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityRecord {
    /// Whether the operation may run for this language.
    pub supported: bool,
    /// Identifier of the backend that would serve it.
    pub backend_id: String,
    /// Whether that backend produces identical output for identical input.
    pub deterministic: bool,
}

/// Per-language, per-operation capability table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityTable {
    languages: BTreeMap<String, BTreeMap<String, CapabilityRecord>>,
}

impl CapabilityTable {
    /// The builtin registry for the bundled backends.
    ///
    /// Go, Java, and Rust route to the symbol-index backend for every
    /// operation. TypeScript is listed but unsupported: its
    /// language-service backend runs out of process and is not bundled.
    pub fn builtin() -> Self {
        let mut languages = BTreeMap::new();
        for language in ["go", "java", "rust"] {
            languages.insert(
                language.to_string(),
                Self::rows(true, SYMBOL_INDEX_BACKEND_ID, true),
            );
        }
        languages.insert(
            "typescript".to_string(),
            Self::rows(false, "typescript-language-service", true),
        );
        CapabilityTable { languages }
    }

    fn rows(
        supported: bool,
        backend_id: &str,
        deterministic: bool,
    ) -> BTreeMap<String, CapabilityRecord> {
        Operation::ALL
            .iter()
            .map(|op| {
                (
                    op.as_str().to_string(),
                    CapabilityRecord {
                        supported,
                        backend_id: backend_id.to_string(),
                        deterministic,
                    },
                )
            })
            .collect()
    }

    /// Load a capability descriptor from a JSON file.
    pub fn from_json_file(path: &Path) -> CoreResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| CoreError::io(format!("failed to read {}", path.display()), e))?;
        let table: CapabilityTable = serde_json::from_str(&text).map_err(|e| {
            CoreError::input(format!(
                "invalid capability descriptor {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!(path = %path.display(), languages = table.languages.len(), "capability descriptor loaded");
        Ok(table)
    }

    /// Look up the record for a `{language, operation}` pair.
    pub fn lookup(&self, language: &str, operation: Operation) -> Option<&CapabilityRecord> {
        self.languages.get(language)?.get(operation.as_str())
    }

    /// Gate an invocation: return the record or a fail-closed refusal.
    pub fn require(&self, language: &str, operation: Operation) -> CoreResult<&CapabilityRecord> {
        let rows = self.languages.get(language).ok_or_else(|| {
            CoreError::capability(format!(
                "no backend is registered for language '{}'",
                language
            ))
        })?;
        let record = rows.get(operation.as_str()).ok_or_else(|| {
            CoreError::capability(format!(
                "no capability record for operation '{}' on language '{}'",
                operation.as_str(),
                language
            ))
        })?;
        if !record.supported {
            return Err(CoreError::capability(format!(
                "backend '{}' does not support {} for language '{}'",
                record.backend_id,
                operation.as_str(),
                language
            )));
        }
        if operation == Operation::Rename && !record.deterministic {
            return Err(CoreError::capability(format!(
                "backend '{}' is not deterministic; refusing rename for language '{}'",
                record.backend_id, language
            )));
        }
        Ok(record)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write as _;

    use tempfile::TempDir;

    #[test]
    fn builtin_supports_bundled_languages_for_all_operations() {
        let table = CapabilityTable::builtin();
        for language in ["go", "java", "rust"] {
            for op in Operation::ALL {
                let record = table.require(language, *op).unwrap();
                assert!(record.supported);
                assert!(record.deterministic);
                assert_eq!(record.backend_id, SYMBOL_INDEX_BACKEND_ID);
            }
        }
    }

    #[test]
    fn unknown_language_fails_closed() {
        let table = CapabilityTable::builtin();
        let err = table.require("cobol", Operation::Rename).unwrap_err();
        assert!(matches!(err, CoreError::Capability { .. }));
        assert!(err.to_string().contains("cobol"));
    }

    #[test]
    fn unsupported_record_fails_closed_and_names_backend() {
        let table = CapabilityTable::builtin();
        let err = table.require("typescript", Operation::Rename).unwrap_err();
        assert!(matches!(err, CoreError::Capability { .. }));
        assert!(err.to_string().contains("typescript-language-service"));
    }

    #[test]
    fn non_deterministic_backend_refuses_rename_but_allows_reads() {
        let json = r#"{
            "go": {
                "rename": { "supported": true, "backendId": "heuristic", "deterministic": false },
                "reference-map": { "supported": true, "backendId": "heuristic", "deterministic": false }
            }
        }"#;
        let table: CapabilityTable = serde_json::from_str(json).unwrap();

        let err = table.require("go", Operation::Rename).unwrap_err();
        assert!(err.to_string().contains("not deterministic"));

        let record = table.require("go", Operation::ReferenceMap).unwrap();
        assert!(!record.deterministic);
    }

    #[test]
    fn descriptor_round_trips_through_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("capabilities.json");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(
            br#"{
                "zig": {
                    "reference-map": { "supported": true, "backendId": "zls", "deterministic": true }
                }
            }"#,
        )
        .unwrap();

        let table = CapabilityTable::from_json_file(&path).unwrap();
        assert!(table.lookup("zig", Operation::ReferenceMap).is_some());
        assert!(table.lookup("zig", Operation::Rename).is_none());
        assert!(table.require("zig", Operation::Rename).is_err());
    }

    #[test]
    fn malformed_descriptor_is_input_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = CapabilityTable::from_json_file(&path).unwrap_err();
        assert!(matches!(err, CoreError::Input { .. }));
    }

    #[test]
    fn missing_descriptor_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        let err = CapabilityTable::from_json_file(&path).unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }
}
