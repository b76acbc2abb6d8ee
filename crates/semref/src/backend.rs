//! Analysis backend trait and backend registry.
//!
//! A backend answers four questions about a project: what symbol sits at
//! a position, where is it referenced, where is it defined, and where
//! would a rename rewrite. Backends own no IDs and keep no state between
//! invocations; every query runs against the [`SourceCache`] snapshots of
//! the current invocation.
//!
//! The engine never calls a backend directly by language: dispatch goes
//! through the capability table first, and the [`BackendRegistry`] only
//! supplies the implementation once the table has approved the request.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use semref_core::edit::Span;
use semref_core::error::CoreResult;
use semref_core::source::SourceCache;

use crate::index::SymbolIndexBackend;

// ============================================================================
// Backend Data Types
// ============================================================================

/// A symbol resolved at a caret position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSymbol {
    /// Canonical display name of the symbol.
    pub display_name: String,
    /// Whether the backend authorizes renaming this symbol.
    pub renameable: bool,
    /// Backend-supplied reason when renaming is declined.
    pub decline_reason: Option<String>,
}

/// One occurrence of a symbol in the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// File containing the occurrence (absolute, normalized).
    pub file: PathBuf,
    /// Byte span of the occurrence in the file's snapshot.
    pub span: Span,
    /// Whether this occurrence is a definition. Backends that cannot tell
    /// leave this false; the engine classifies against the definition set.
    pub is_definition: bool,
    /// Whether this occurrence writes to the symbol. Defaults to false
    /// when the backend does not report write access.
    pub is_write_access: bool,
}

/// A definition site for a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolLocation {
    /// File containing the definition (absolute, normalized).
    pub file: PathBuf,
    /// Byte span of the defined name.
    pub span: Span,
}

/// One location a rename would rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameLocation {
    /// File containing the occurrence (absolute, normalized).
    pub file: PathBuf,
    /// Byte span to replace.
    pub span: Span,
    /// Decoration text the backend wants before the new name.
    pub prefix: String,
    /// Decoration text the backend wants after the new name.
    pub suffix: String,
}

/// Caller flags that widen the rename occurrence set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameOptions {
    /// Also rewrite occurrences inside comments.
    pub include_comments: bool,
    /// Also rewrite occurrences inside string literals.
    pub include_strings: bool,
}

// ============================================================================
// Analysis Backend Trait
// ============================================================================

/// Trait for per-language analysis backends.
///
/// All methods are read-only with respect to the project; file access goes
/// through the invocation's [`SourceCache`] so offsets stay anchored to
/// one snapshot per file.
pub trait AnalysisBackend {
    /// Stable identifier of this backend (appears in reports and errors).
    fn id(&self) -> &'static str;

    /// Identifier characters beyond ASCII alphanumerics and underscore
    /// that this backend's language allows (e.g. `$` in Java).
    fn extra_identifier_chars(&self) -> &[char] {
        &[]
    }

    /// Resolve the symbol at a byte offset in a file.
    ///
    /// `Ok(None)` means the backend has no answer for this position; the
    /// engine may then fall back to lexical extraction for read-only
    /// operations.
    fn resolve_symbol(
        &self,
        cache: &SourceCache,
        file: &Path,
        offset: usize,
    ) -> CoreResult<Option<ResolvedSymbol>>;

    /// Find every project occurrence of the symbol, code-only.
    fn find_references(&self, cache: &SourceCache, symbol: &str) -> CoreResult<Vec<Reference>>;

    /// Find the definition set for the symbol.
    fn find_definitions(
        &self,
        cache: &SourceCache,
        symbol: &str,
    ) -> CoreResult<Vec<SymbolLocation>>;

    /// Find every location a rename would rewrite, honoring the caller's
    /// include flags.
    fn find_rename_locations(
        &self,
        cache: &SourceCache,
        symbol: &str,
        options: &RenameOptions,
    ) -> CoreResult<Vec<RenameLocation>>;
}

// ============================================================================
// Backend Registry
// ============================================================================

/// Registry of backends keyed by language identifier.
pub struct BackendRegistry {
    backends: HashMap<String, Box<dyn AnalysisBackend>>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        BackendRegistry {
            backends: HashMap::new(),
        }
    }

    /// Create a registry holding the bundled symbol-index backends.
    pub fn builtin() -> Self {
        let mut registry = BackendRegistry::new();
        for language in ["go", "java", "rust"] {
            registry.register(language, Box::new(SymbolIndexBackend::for_language(language)));
        }
        registry
    }

    /// Register a backend for a language identifier.
    pub fn register(&mut self, language: impl Into<String>, backend: Box<dyn AnalysisBackend>) {
        self.backends.insert(language.into(), backend);
    }

    /// Look up the backend for a language.
    pub fn get(&self, language: &str) -> Option<&dyn AnalysisBackend> {
        self.backends.get(language).map(|b| b.as_ref())
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        BackendRegistry::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct StubBackend;

    impl AnalysisBackend for StubBackend {
        fn id(&self) -> &'static str {
            "stub"
        }

        fn resolve_symbol(
            &self,
            _cache: &SourceCache,
            _file: &Path,
            _offset: usize,
        ) -> CoreResult<Option<ResolvedSymbol>> {
            Ok(Some(ResolvedSymbol {
                display_name: "stub_symbol".to_string(),
                renameable: true,
                decline_reason: None,
            }))
        }

        fn find_references(
            &self,
            _cache: &SourceCache,
            _symbol: &str,
        ) -> CoreResult<Vec<Reference>> {
            Ok(vec![])
        }

        fn find_definitions(
            &self,
            _cache: &SourceCache,
            _symbol: &str,
        ) -> CoreResult<Vec<SymbolLocation>> {
            Ok(vec![])
        }

        fn find_rename_locations(
            &self,
            _cache: &SourceCache,
            _symbol: &str,
            _options: &RenameOptions,
        ) -> CoreResult<Vec<RenameLocation>> {
            Ok(vec![])
        }
    }

    #[test]
    fn registry_dispatches_by_language() {
        let mut registry = BackendRegistry::new();
        registry.register("go", Box::new(StubBackend));
        assert!(registry.get("go").is_some());
        assert!(registry.get("typescript").is_none());
        assert_eq!(registry.get("go").map(|b| b.id()), Some("stub"));
    }

    #[test]
    fn builtin_registry_covers_bundled_languages() {
        let registry = BackendRegistry::builtin();
        for language in ["go", "java", "rust"] {
            let backend = registry.get(language);
            assert!(backend.is_some(), "missing backend for {language}");
            assert_eq!(backend.map(|b| b.id()), Some("symbol-index"));
        }
        assert!(registry.get("typescript").is_none());
    }

    #[test]
    fn default_extra_identifier_chars_is_empty() {
        assert!(StubBackend.extra_identifier_chars().is_empty());
    }

    #[test]
    fn rename_options_default_is_code_only() {
        let options = RenameOptions::default();
        assert!(!options.include_comments);
        assert!(!options.include_strings);
    }
}
