//! semref: a multi-operation semantic refactoring engine.
//!
//! Given a source file, a caret position, and an operation (rename,
//! reference-map, safe-delete-candidates), semref resolves the symbol at
//! that position through a per-language analysis backend, enumerates every
//! occurrence across the project, and either reports a classified
//! occurrence map or safely rewrites all occurrences.
//!
//! The crate is organized as:
//! - [`backend`]: the `AnalysisBackend` trait and backend registry
//! - [`capability`]: the per-language, per-operation support table
//! - [`index`]: the bundled deterministic symbol-index backend
//! - [`engine`]: invocation orchestration from request to report

pub mod backend;
pub mod capability;
pub mod engine;
pub mod index;
