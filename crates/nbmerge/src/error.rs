//! Error taxonomy for the diff/merge engine.
//!
//! The differ, aligner, merger and chunker are total functions and never
//! fail. Only patch/decision application can fail, and only for caller
//! contract violations. Schema mismatches after a merge are warnings, not
//! errors.

use std::fmt;

use thiserror::Error;

/// A patch path did not resolve against the value it was applied to.
///
/// Always a caller contract violation: patches must only ever be applied to
/// the exact value they were diffed against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedPatchError {
    #[error("missing key at {path}")]
    MissingKey { path: String },
    #[error("index out of bounds at {path}")]
    IndexOutOfBounds { path: String },
    #[error("wrong target kind at {path}")]
    WrongTarget { path: String },
    #[error("duplicate op path at {path}")]
    DuplicatePath { path: String },
}

impl MalformedPatchError {
    /// The formatted pointer path of the offending op.
    pub fn path(&self) -> &str {
        match self {
            MalformedPatchError::MissingKey { path }
            | MalformedPatchError::IndexOutOfBounds { path }
            | MalformedPatchError::WrongTarget { path }
            | MalformedPatchError::DuplicatePath { path } => path,
        }
    }
}

/// Decision application was attempted while at least one decision is still
/// undecided. Expected and recoverable: resolve the conflict and retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unresolved merge conflict at {path}")]
pub struct UnresolvedConflictError {
    pub path: String,
}

/// Failure modes of [`apply_decisions`](crate::merge::apply_decisions).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeApplyError {
    #[error(transparent)]
    Unresolved(#[from] UnresolvedConflictError),
    #[error(transparent)]
    Patch(#[from] MalformedPatchError),
}

/// A post-merge structural mismatch against the notebook schema.
///
/// Not an error: the merged document is still returned and the caller
/// decides whether to block or warn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaWarning {
    pub path: String,
    pub message: String,
}

impl SchemaWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
