//! The patch model: an ordered sequence of typed, path-addressed ops.
//!
//! Paths are absolute from the document root; ops nested inside a `Patch`
//! extend the patch's own path by one step per level. Sequence ops carry
//! the *base* index as their final path step, and an `Add` into a sequence
//! is anchored immediately before the base index it precedes (`len` to
//! append). Within one patch no two ops may target the same path, with one
//! exception: several `Add` ops may share an anchor — they apply in patch
//! order and address no base content.
//!
//! The serde wire form is a tagged object with an `"op"` discriminant and
//! round-trips losslessly through JSON.

use nbmerge_json_pointer::Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single diff operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum DiffOp {
    /// Insert `value` at `path` (object key, or sequence anchor).
    Add { path: Path, value: Value },
    /// Delete the value at `path`.
    Remove { path: Path },
    /// Swap the value at `path` from `old` to `new`. `old` is retained for
    /// presentation and inversion; application does not re-check it.
    Replace { path: Path, old: Value, new: Value },
    /// Recurse: `ops` transform the sub-tree at `path`.
    Patch { path: Path, ops: Vec<DiffOp> },
}

impl DiffOp {
    /// The operation name string, matching the wire discriminant.
    pub fn op_name(&self) -> &'static str {
        match self {
            DiffOp::Add { .. } => "add",
            DiffOp::Remove { .. } => "remove",
            DiffOp::Replace { .. } => "replace",
            DiffOp::Patch { .. } => "patch",
        }
    }

    /// The absolute path of the operation.
    pub fn path(&self) -> &Path {
        match self {
            DiffOp::Add { path, .. } => path,
            DiffOp::Remove { path } => path,
            DiffOp::Replace { path, .. } => path,
            DiffOp::Patch { path, .. } => path,
        }
    }

    /// The base index of a sequence op (the final path step, if numeric).
    pub fn base_index(&self) -> Option<usize> {
        self.path().last().and_then(|step| step.as_index())
    }
}
