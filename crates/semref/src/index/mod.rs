//! Bundled deterministic symbol-index backend.
//!
//! The backend builds no persistent index: every query walks the project
//! tree, reads each candidate file through the invocation's
//! [`SourceCache`], and scans it lexically. Identical input therefore
//! always produces identical output, which is what lets the capability
//! table mark this backend deterministic.
//!
//! Resolution is lexical, not semantic. Two different functions that
//! share a name are one symbol to this backend; the occurrence set is
//! the union of their whole-word matches. Definition detection looks for
//! a declaration keyword immediately before an occurrence, and at most
//! one occurrence per project is classified as the definition.

mod scan;

use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use semref_core::edit::Span;
use semref_core::error::CoreResult;
use semref_core::source::SourceCache;

use crate::backend::{
    AnalysisBackend, Reference, RenameLocation, RenameOptions, ResolvedSymbol, SymbolLocation,
};

pub(crate) use scan::identifier_at;

/// Directories skipped during the project walk.
const EXCLUDE_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".idea",
    ".venv",
    ".vscode",
    "__pycache__",
    "build",
    "dist",
    "node_modules",
    "out",
    "target",
    "vendor",
    "venv",
];

// ============================================================================
// Language Profiles
// ============================================================================

/// Lexical profile of a language the symbol-index backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexLanguage {
    Go,
    Java,
    Rust,
}

impl IndexLanguage {
    fn from_identifier(language: &str) -> Self {
        match language {
            "go" => IndexLanguage::Go,
            "java" => IndexLanguage::Java,
            "rust" => IndexLanguage::Rust,
            other => panic!("no symbol-index profile for language '{other}'"),
        }
    }

    /// File extensions scanned for this language.
    fn extensions(self) -> &'static [&'static str] {
        match self {
            IndexLanguage::Go => &["go"],
            IndexLanguage::Java => &["java"],
            IndexLanguage::Rust => &["rs"],
        }
    }

    /// Keywords that introduce a declaration when they immediately
    /// precede an occurrence.
    fn declaration_keywords(self) -> &'static [&'static str] {
        match self {
            IndexLanguage::Go => &["func", "type", "var", "const", "package"],
            IndexLanguage::Java => &["class", "interface", "enum", "record"],
            IndexLanguage::Rust => &[
                "fn", "struct", "enum", "trait", "mod", "const", "static", "let", "type", "mut",
            ],
        }
    }

    /// Whether block comments nest, as they do in Rust.
    fn nested_block_comments(self) -> bool {
        matches!(self, IndexLanguage::Rust)
    }

    /// Identifier characters beyond ASCII alphanumerics and underscore.
    fn extra_identifier_chars(self) -> &'static [char] {
        match self {
            IndexLanguage::Java => &['$'],
            _ => &[],
        }
    }
}

// ============================================================================
// Symbol-Index Backend
// ============================================================================

/// The bundled lexical backend, parameterized by language profile.
pub struct SymbolIndexBackend {
    language: IndexLanguage,
}

impl SymbolIndexBackend {
    /// Build the backend for a bundled language identifier.
    ///
    /// Panics on an unknown identifier; the builtin registry only
    /// constructs profiles for the languages it registers.
    pub fn for_language(language: &str) -> Self {
        SymbolIndexBackend {
            language: IndexLanguage::from_identifier(language),
        }
    }

    /// Enumerate project files with a matching extension, sorted by path.
    ///
    /// Sorting makes every downstream occurrence list deterministic
    /// regardless of directory iteration order.
    fn project_files(&self, cache: &SourceCache) -> CoreResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(cache.root()).into_iter().filter_entry(|entry| {
            !(entry.file_type().is_dir()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| EXCLUDE_DIRS.contains(&name)))
        });
        for entry in walker {
            let entry = entry.map_err(|e| {
                let io = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("walk error"));
                semref_core::error::CoreError::io("failed to walk project tree".to_string(), io)
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let matches = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| self.language.extensions().contains(&ext));
            if matches {
                files.push(entry.into_path());
            }
        }
        files.sort();
        trace!(count = files.len(), "project files enumerated");
        Ok(files)
    }

    /// Scan one file for eligible occurrences of `symbol`.
    fn scan_file(
        &self,
        cache: &SourceCache,
        file: &Path,
        symbol: &str,
        include_comments: bool,
        include_strings: bool,
    ) -> CoreResult<Vec<usize>> {
        let content = cache.content(file)?;
        let classes = scan::classify_bytes(&content, self.language.nested_block_comments());
        Ok(scan::occurrences(
            &content,
            symbol,
            &classes,
            include_comments,
            include_strings,
            self.language.extra_identifier_chars(),
        ))
    }
}

impl AnalysisBackend for SymbolIndexBackend {
    fn id(&self) -> &'static str {
        crate::capability::SYMBOL_INDEX_BACKEND_ID
    }

    fn extra_identifier_chars(&self) -> &[char] {
        self.language.extra_identifier_chars()
    }

    fn resolve_symbol(
        &self,
        cache: &SourceCache,
        file: &Path,
        offset: usize,
    ) -> CoreResult<Option<ResolvedSymbol>> {
        let content = cache.content(file)?;
        let resolved = scan::identifier_at(&content, offset, self.language.extra_identifier_chars())
            .map(|name| ResolvedSymbol {
                display_name: name.to_string(),
                renameable: true,
                decline_reason: None,
            });
        Ok(resolved)
    }

    fn find_references(&self, cache: &SourceCache, symbol: &str) -> CoreResult<Vec<Reference>> {
        let mut references = Vec::new();
        for file in self.project_files(cache)? {
            let starts = self.scan_file(cache, &file, symbol, false, false)?;
            if starts.is_empty() {
                continue;
            }
            let content = cache.content(&file)?;
            for start in starts {
                let end = start + symbol.len();
                references.push(Reference {
                    file: file.clone(),
                    span: Span::new(start, end),
                    is_definition: false,
                    is_write_access: scan::is_write_site(&content, end),
                });
            }
        }
        debug!(symbol, count = references.len(), "references collected");
        Ok(references)
    }

    fn find_definitions(
        &self,
        cache: &SourceCache,
        symbol: &str,
    ) -> CoreResult<Vec<SymbolLocation>> {
        let keywords = self.language.declaration_keywords();
        for file in self.project_files(cache)? {
            let starts = self.scan_file(cache, &file, symbol, false, false)?;
            if starts.is_empty() {
                continue;
            }
            let content = cache.content(&file)?;
            for start in starts {
                if scan::preceded_by_keyword(&content, start, keywords) {
                    // First declaration-shaped occurrence in path order
                    // wins; the lexical index never reports a second.
                    return Ok(vec![SymbolLocation {
                        file,
                        span: Span::new(start, start + symbol.len()),
                    }]);
                }
            }
        }
        Ok(vec![])
    }

    fn find_rename_locations(
        &self,
        cache: &SourceCache,
        symbol: &str,
        options: &RenameOptions,
    ) -> CoreResult<Vec<RenameLocation>> {
        let mut locations = Vec::new();
        for file in self.project_files(cache)? {
            let starts = self.scan_file(
                cache,
                &file,
                symbol,
                options.include_comments,
                options.include_strings,
            )?;
            for start in starts {
                locations.push(RenameLocation {
                    file: file.clone(),
                    span: Span::new(start, start + symbol.len()),
                    prefix: String::new(),
                    suffix: String::new(),
                });
            }
        }
        debug!(symbol, count = locations.len(), "rename locations collected");
        Ok(locations)
    }
}

// ============================================================================
// Tests
// ============================================================================
