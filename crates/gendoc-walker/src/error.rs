//! Error types for path resolution and comment collection.

use thiserror::Error;

/// How a failure affects the surrounding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The descriptor tree does not look like what the field tables describe.
    StructuralMismatch,
    /// The coordinate path itself is not well formed.
    MalformedCoordinate,
    /// The path points past the end of a collection, usually because it was
    /// computed against a different revision of the file.
    StaleCoordinate,
}

/// Failure while resolving a coordinate path against a descriptor tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalkError {
    #[error("{kind} has no field numbered {number}")]
    FieldNotFound { kind: &'static str, number: i32 },

    #[error("{kind} has no name")]
    MissingName { kind: &'static str },

    #[error("field '{label}' is not set")]
    UnsetField { label: &'static str },

    #[error("path ends on field number {number} ('{label}') instead of an element")]
    DanglingFieldNumber { number: i32, label: &'static str },

    #[error("negative index {index} into '{label}'")]
    NegativeIndex { label: &'static str, index: i32 },

    #[error("index {index} is out of bounds for '{label}' of length {len}")]
    IndexOutOfBounds {
        label: &'static str,
        index: usize,
        len: usize,
    },
}

impl WalkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WalkError::FieldNotFound { .. }
            | WalkError::MissingName { .. }
            | WalkError::UnsetField { .. } => ErrorKind::StructuralMismatch,
            WalkError::DanglingFieldNumber { .. } | WalkError::NegativeIndex { .. } => {
                ErrorKind::MalformedCoordinate
            }
            WalkError::IndexOutOfBounds { .. } => ErrorKind::StaleCoordinate,
        }
    }

    /// Recoverable errors only invalidate the one source location being walked.
    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::StaleCoordinate
    }
}

/// A fatal walk failure, tagged with the source location that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}: cannot resolve source location {path:?}")]
pub struct CollectError {
    pub file: String,
    pub path: Vec<i32>,
    #[source]
    pub source: WalkError,
}
