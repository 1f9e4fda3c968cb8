//! Reasons a C construct cannot cross the FFI boundary
//!
//! A rejection drops the whole owning function and is reported as a warning.
//! It is never fatal and never an [`Error`](crate::Error).

use std::fmt;

use thiserror::Error;

use super::types::PointerKind;

/// Why a type was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Native kind with no IR counterpart (struct by value, enum, array, ...)
    #[error("unsupported type '{spelling}' ({kind})")]
    UnsupportedKind {
        /// C spelling
        spelling: String,
        /// Native kind tag
        kind: String,
    },

    /// Pointer record without a pointee description
    #[error("pointer '{spelling}' has no pointee description")]
    MissingPointee {
        /// C spelling
        spelling: String,
    },

    /// `void *` and friends
    #[error("raw pointer '{spelling}'")]
    RawPointer {
        /// C spelling
        spelling: String,
    },

    /// Callback parameters
    #[error("function pointer '{spelling}'")]
    FunctionPointer {
        /// C spelling
        spelling: String,
    },

    /// `char *` without const: a buffer the callee may write to
    #[error("non-const char pointer '{spelling}'")]
    MutableCharPointer {
        /// C spelling
        spelling: String,
    },

    /// Pointer to a struct no typedef registered as an opaque handle
    #[error("pointer to unregistered struct '{name}'")]
    UnknownStruct {
        /// Struct name without the `struct` keyword
        name: String,
    },

    /// `T **`
    #[error("pointer to pointer '{spelling}'")]
    PointerToPointer {
        /// C spelling
        spelling: String,
    },

    /// Pointer to anything else (`int *`, `double *`, ...)
    #[error("pointer '{spelling}' has no handle or string meaning")]
    UnsupportedPointee {
        /// C spelling
        spelling: String,
    },

    /// Typedefs that name each other
    #[error("typedef cycle through '{name}'")]
    AliasCycle {
        /// Typedef revisited
        name: String,
    },

    /// Pointer classes reserved for future use
    #[error("{classification} pointer '{spelling}' has no mapping")]
    ReservedPointer {
        /// Pointer class
        classification: PointerKind,
        /// C spelling
        spelling: String,
    },

    /// `void` is only valid as a return type
    #[error("void used as a parameter type")]
    VoidParameter,

    /// Opaque struct passed by value
    #[error("'{spelling}' cannot cross the FFI boundary by value")]
    ByValueOpaque {
        /// C spelling
        spelling: String,
    },

    /// Distinct structs whose handle types would share one Lean name
    #[error("handle '{lean_name}' is ambiguous between structs {structs}")]
    OpaqueNameCollision {
        /// Generated Lean type name
        lean_name: String,
        /// Every struct that produces it, comma separated
        structs: String,
    },

    /// Typedef whose canonical form is still an alias
    #[error("typedef '{spelling}' did not canonicalize")]
    UnresolvedAlias {
        /// C spelling
        spelling: String,
    },
}

/// Outcome of lowering or mapping a single type
pub type Lowered<T> = std::result::Result<T, Rejection>;

/// Pipeline stage that dropped a function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipStage {
    /// The IR builder could not lower a type
    Lowering,
    /// The type mapper found no Lean mapping
    Mapping,
}

/// Where in the signature the offending type sits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectedAt {
    /// Return type
    Return,
    /// Named parameter
    Param(String),
}

/// A function left out of the generated bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFunction {
    /// Native function name
    pub name: String,
    /// Stage that dropped it
    pub stage: SkipStage,
    /// Offending position
    pub at: RejectedAt,
    /// Offending type and why
    pub reason: Rejection,
}

impl fmt::Display for SkippedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.at {
            RejectedAt::Return => {
                write!(f, "Skipped '{}' (return type: {})", self.name, self.reason)
            }
            RejectedAt::Param(param) => write!(
                f,
                "Skipped '{}' (parameter '{}': {})",
                self.name, param, self.reason
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_display_names_function() {
        let skipped = SkippedFunction {
            name: "set_callback".into(),
            stage: SkipStage::Lowering,
            at: RejectedAt::Param("cb".into()),
            reason: Rejection::FunctionPointer {
                spelling: "void (*)(int)".into(),
            },
        };
        assert_eq!(
            skipped.to_string(),
            "Skipped 'set_callback' (parameter 'cb': function pointer 'void (*)(int)')"
        );
    }
}
