//! Error types for lean-bindgen

use std::path::PathBuf;
use thiserror::Error;

use crate::ir::{FunctionId, ItemId, TypeId};

/// lean-bindgen errors
///
/// Unsupported C constructs are not errors: they surface as
/// [`Rejection`](crate::ir::Rejection) values and only drop the owning function.
#[derive(Error, Debug)]
pub enum Error {
    // Setup errors
    /// Invalid bindgen configuration
    ///
    /// **Triggered by:** Empty module name, a prefix that is not a C identifier fragment
    /// **Example:** `BindgenConfig::new("Simple Math", "simple_math", "simple_math.h")`
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
    },

    /// Declaration list missing or malformed
    ///
    /// **Triggered by:** Unreadable input file, invalid JSON, unknown record shape
    #[error("Input error: {message}")]
    Input {
        /// Error description
        message: String,
    },

    /// Failed to write a generated artifact
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    // Outcome errors
    /// No function survived type mapping
    ///
    /// **Triggered by:** A header whose every function uses unsupported types
    /// **Recovery:** Nothing is written; the run ends with a clean failure
    #[error("Nothing to generate: 0/{total} function(s) supported")]
    NothingToGenerate {
        /// Number of functions in the input
        total: usize,
    },

    // Defects
    /// Broken IR invariant (a bug in the IR machinery, not in the input)
    #[error("Internal error: {0}")]
    Internal(#[from] InvariantViolation),
}

/// IR invariants whose violation indicates a defect in lean-bindgen itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A type id that does not resolve in its context
    #[error("dangling type id {0}")]
    DanglingType(TypeId),

    /// A function id that does not resolve in its context
    #[error("dangling function id {0}")]
    DanglingFunction(FunctionId),

    /// An item id that does not resolve in its context
    #[error("dangling item id {0}")]
    DanglingItem(ItemId),

    /// Following `canonical` links revisited a type
    #[error("cyclic canonical chain starting at type {start} (revisited {revisited})")]
    CanonicalCycle {
        /// Type the resolution started from
        start: TypeId,
        /// First type seen twice
        revisited: TypeId,
    },

    /// A function marked supported whose signature no longer maps
    #[error("function id {0} is marked supported but does not map")]
    UnmappedSupported(FunctionId),

    /// An arena ran out of `u32` indices
    #[error("{kind} arena exhausted after {len} allocations")]
    ArenaExhausted {
        /// Arena name
        kind: &'static str,
        /// Slots already allocated
        len: usize,
    },
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad input or configuration, reported before any IR work
    Fatal,
    /// Run completed but produced nothing
    Outcome,
    /// Bug in the IR machinery
    Defect,
}

impl Error {
    /// Create a configuration error with a message
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config {
            message: msg.into(),
        }
    }

    /// Create an input error with a message
    pub fn input(msg: impl Into<String>) -> Self {
        Error::Input {
            message: msg.into(),
        }
    }

    /// Wrap an I/O failure with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Classify the error
    pub fn classify(&self) -> ErrorClass {
        match self {
            Error::Config { .. } | Error::Input { .. } | Error::Io { .. } => ErrorClass::Fatal,
            Error::NothingToGenerate { .. } => ErrorClass::Outcome,
            Error::Internal(_) => ErrorClass::Defect,
        }
    }

    /// Whether this error points at a bug rather than at the input
    pub fn is_defect(&self) -> bool {
        self.classify() == ErrorClass::Defect
    }
}

/// Result type for lean-bindgen operations
pub type Result<T> = std::result::Result<T, Error>;
