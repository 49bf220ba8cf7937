//! nbmerge — structural diff and three-way merge for notebook documents.
//!
//! Documents are JSON-like trees with one schema-aware twist: an ordered
//! `cells` sequence whose order carries meaning. The engine diffs two
//! versions into a hierarchical patch, reconciles two divergent patches
//! into a decision list, and applies resolved decisions back onto base.
//!
//! The four entry points:
//!
//! - [`diff`] — patch transforming `base` into `remote`;
//! - [`merge_three_way`] — decision list for `(base, local, remote)`;
//! - [`apply_decisions`] — replay resolved decisions, schema-check result;
//! - [`chunk`] — fold an alignment into display runs.
//!
//! Everything operates on owned [`serde_json::Value`] trees and shares no
//! state between calls; concurrent merges of different documents need no
//! coordination.

pub mod diff;
pub mod error;
pub mod lines;
pub mod merge;
pub mod notebook;

pub use diff::{align, apply_patch, chunk, diff, AlignEntry, ChunkKind, DiffChunk, DiffOp};
pub use error::{MalformedPatchError, MergeApplyError, SchemaWarning, UnresolvedConflictError};
pub use merge::{apply_decisions, merge_three_way, MergeAction, MergeDecision, MergeResult};
pub use nbmerge_json_pointer::{
    format_json_pointer, parse_json_pointer, Path, PathStep,
};
pub use notebook::{validate_document, CellKind};
