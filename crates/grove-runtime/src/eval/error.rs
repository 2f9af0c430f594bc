//! Typed runtime errors.
//!
//! Every failure surfaces immediately to the caller; the core never retries
//! and never recovers locally.

use grove_data::value::DataError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// An argument's tag is outside the function's declared domain.
    #[error("type mismatch in {context}: expected {expected}, found {found}")]
    TypeMismatch {
        context: &'static str,
        expected: &'static str,
        found: String,
    },

    /// An external collection or document the evaluator depends on is absent.
    #[error("resource not found: {kind} {name:?}")]
    ResourceNotFound { kind: &'static str, name: String },

    /// Register index beyond capacity. Indicates a compiler defect; treated
    /// as fatal.
    #[error("register index {index} out of range (capacity {capacity})")]
    IndexOutOfRange { index: usize, capacity: usize },

    /// Register read before any write. Like `IndexOutOfRange`, a compiler
    /// defect rather than a data error.
    #[error("register {index} read before any write")]
    UnboundRegister { index: usize },

    /// Malformed value encoding encountered mid-evaluation.
    #[error(transparent)]
    Data(#[from] DataError),
}
