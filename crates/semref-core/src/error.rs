//! Error types and exit code constants for semref.
//!
//! This module provides a unified error type (`CoreError`) that every
//! subsystem (translation, resolution, collection, application) reports
//! through, plus the stable exit-code mapping used by the CLI.
//!
//! ## Exit Code Mapping
//!
//! - `2`: Invalid input (bad arguments, malformed request)
//! - `3`: Resolution errors (position out of range, no symbol, no references)
//! - `4`: Capability refusal (no deterministic backend for the request)
//! - `5`: I/O errors (read or write failed)
//! - `10`: Internal errors (bugs, impossible state)
//!
//! ## Design
//!
//! - **Unified type**: `CoreError` is the single error type surfaced by the CLI
//! - **Terminal**: every variant aborts the invocation; there is no retry path
//! - **Code mapping**: `ExitCategory` provides stable integer codes

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the engine.
pub type CoreResult<T> = Result<T, CoreError>;

// ============================================================================
// Exit Categories
// ============================================================================

/// Stable exit-code categories for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCategory {
    /// Invalid input from the caller (bad arguments, malformed request).
    InvalidInput = 2,
    /// Resolution errors (position out of range, no symbol, no references).
    ResolutionError = 3,
    /// Capability refusal (no deterministic backend for the request).
    CapabilityRefused = 4,
    /// I/O errors (read or write failed).
    IoError = 5,
    /// Internal errors (bugs, impossible state).
    InternalError = 10,
}

impl ExitCategory {
    /// Get the numeric exit code.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for ExitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for the engine.
///
/// Each variant carries a fully formed message; the CLI prints it as a
/// single diagnostic line and exits with the mapped code.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid input from the caller.
    #[error("invalid input: {message}")]
    Input { message: String },

    /// Position does not exist in the target file.
    #[error("invalid position: {message}")]
    Position { message: String },

    /// No symbol at the position, or the symbol refuses the operation.
    #[error("symbol error: {message}")]
    Symbol { message: String },

    /// Reference collection produced nothing usable.
    #[error("reference error: {message}")]
    Reference { message: String },

    /// No deterministic backend supports the request.
    #[error("capability error: {message}")]
    Capability { message: String },

    /// An underlying read or write failed.
    #[error("{message}: {source}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Internal error (bug or impossible state).
    #[error("internal error: {message}")]
    Internal { message: String },
}

// ============================================================================
// Exit Code Mapping
// ============================================================================

impl From<&CoreError> for ExitCategory {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::Input { .. } => ExitCategory::InvalidInput,
            CoreError::Position { .. } => ExitCategory::ResolutionError,
            CoreError::Symbol { .. } => ExitCategory::ResolutionError,
            CoreError::Reference { .. } => ExitCategory::ResolutionError,
            CoreError::Capability { .. } => ExitCategory::CapabilityRefused,
            CoreError::Io { .. } => ExitCategory::IoError,
            CoreError::Internal { .. } => ExitCategory::InternalError,
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl CoreError {
    /// Create an invalid input error.
    pub fn input(message: impl Into<String>) -> Self {
        CoreError::Input {
            message: message.into(),
        }
    }

    /// Create an invalid position error.
    pub fn position(message: impl Into<String>) -> Self {
        CoreError::Position {
            message: message.into(),
        }
    }

    /// Create a symbol error.
    pub fn symbol(message: impl Into<String>) -> Self {
        CoreError::Symbol {
            message: message.into(),
        }
    }

    /// Create a reference error.
    pub fn reference(message: impl Into<String>) -> Self {
        CoreError::Reference {
            message: message.into(),
        }
    }

    /// Create a capability error.
    pub fn capability(message: impl Into<String>) -> Self {
        CoreError::Capability {
            message: message.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        CoreError::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        CoreError::Internal {
            message: message.into(),
        }
    }

    /// Get the exit category for this error.
    pub fn exit_category(&self) -> ExitCategory {
        ExitCategory::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod exit_code_mapping {
        use super::*;

        #[test]
        fn input_maps_to_invalid_input() {
            let err = CoreError::input("missing required flag");
            assert_eq!(err.exit_category(), ExitCategory::InvalidInput);
            assert_eq!(err.exit_category().code(), 2);
        }

        #[test]
        fn position_maps_to_resolution_error() {
            let err = CoreError::position("line 99 out of range");
            assert_eq!(err.exit_category(), ExitCategory::ResolutionError);
            assert_eq!(err.exit_category().code(), 3);
        }

        #[test]
        fn symbol_maps_to_resolution_error() {
            let err = CoreError::symbol("no identifier at position");
            assert_eq!(err.exit_category(), ExitCategory::ResolutionError);
        }

        #[test]
        fn reference_maps_to_resolution_error() {
            let err = CoreError::reference("no references found");
            assert_eq!(err.exit_category(), ExitCategory::ResolutionError);
        }

        #[test]
        fn capability_maps_to_capability_refused() {
            let err = CoreError::capability("no backend for 'typescript'");
            assert_eq!(err.exit_category(), ExitCategory::CapabilityRefused);
            assert_eq!(err.exit_category().code(), 4);
        }

        #[test]
        fn io_maps_to_io_error() {
            let err = CoreError::io(
                "failed to read src/lib.rs",
                std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            );
            assert_eq!(err.exit_category(), ExitCategory::IoError);
            assert_eq!(err.exit_category().code(), 5);
        }

        #[test]
        fn internal_maps_to_internal_error() {
            let err = CoreError::internal("impossible state");
            assert_eq!(err.exit_category(), ExitCategory::InternalError);
            assert_eq!(err.exit_category().code(), 10);
        }
    }

    mod error_display {
        use super::*;

        #[test]
        fn input_display() {
            let err = CoreError::input("max-results must be positive");
            assert_eq!(err.to_string(), "invalid input: max-results must be positive");
        }

        #[test]
        fn position_display() {
            let err = CoreError::position("line 12 out of range (file has 4 lines)");
            assert_eq!(
                err.to_string(),
                "invalid position: line 12 out of range (file has 4 lines)"
            );
        }

        #[test]
        fn io_display_includes_source() {
            let err = CoreError::io(
                "failed to write main.go",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            );
            assert_eq!(err.to_string(), "failed to write main.go: denied");
        }
    }

    mod exit_category {
        use super::*;

        #[test]
        fn code_values_are_stable() {
            assert_eq!(ExitCategory::InvalidInput.code(), 2);
            assert_eq!(ExitCategory::ResolutionError.code(), 3);
            assert_eq!(ExitCategory::CapabilityRefused.code(), 4);
            assert_eq!(ExitCategory::IoError.code(), 5);
            assert_eq!(ExitCategory::InternalError.code(), 10);
        }

        #[test]
        fn display_shows_code() {
            assert_eq!(format!("{}", ExitCategory::InvalidInput), "2");
            assert_eq!(format!("{}", ExitCategory::InternalError), "10");
        }
    }
}
