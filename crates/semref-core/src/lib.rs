//! Core infrastructure for semref.
//!
//! This crate provides the language-agnostic pieces of the engine:
//! - Position translation between line:column coordinates and byte offsets
//! - Span and edit types with per-file splice application
//! - A per-invocation source snapshot cache
//! - Error types and stable exit codes
//! - JSON report types for CLI output

pub mod edit;
pub mod error;
pub mod report;
pub mod source;
pub mod text;
