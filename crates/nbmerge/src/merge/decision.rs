//! The merge decision model.
//!
//! A decision covers one sub-tree of the base document, identified by
//! `common_path`. It owns both sides' diffs and holds no reference into
//! base: `common_path` is a pure coordinate, re-resolved at apply time, so
//! base may be diffed many times without invalidating earlier decisions.
//!
//! Lifecycle: created by the merger (`Either` when both sides agree, the
//! changed side when one-sided, `Undecided` when conflicting), mutated only
//! by the consumer choosing an action, consumed by
//! [`apply_decisions`](super::apply_decisions).

use nbmerge_json_pointer::Path;
use serde::{Deserialize, Serialize};

use crate::diff::DiffOp;
use crate::error::UnresolvedConflictError;

/// The chosen resolution of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeAction {
    /// Keep base: apply no change.
    Base,
    /// Apply the local diff.
    Local,
    /// Apply the remote diff.
    Remote,
    /// Both sides agree; either diff may be applied.
    Either,
    /// Apply `custom_diff` instead of either side.
    Custom,
    /// Not yet resolved; application fails.
    Undecided,
}

impl MergeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeAction::Base => "base",
            MergeAction::Local => "local",
            MergeAction::Remote => "remote",
            MergeAction::Either => "either",
            MergeAction::Custom => "custom",
            MergeAction::Undecided => "undecided",
        }
    }
}

/// One unit of reconciliation produced by the three-way merger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeDecision {
    /// Path of the sub-tree this decision covers.
    pub common_path: Path,
    /// Local's ops for the group; paths are absolute, extending `common_path`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub local_diff: Vec<DiffOp>,
    /// Remote's ops for the group.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remote_diff: Vec<DiffOp>,
    pub action: MergeAction,
    pub conflict: bool,
    /// A caller-supplied replacement diff, required when `action` is
    /// `Custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_diff: Option<Vec<DiffOp>>,
}

impl MergeDecision {
    pub(crate) fn one_sided_local(common_path: Path, local_diff: Vec<DiffOp>) -> Self {
        Self {
            common_path,
            local_diff,
            remote_diff: Vec::new(),
            action: MergeAction::Local,
            conflict: false,
            custom_diff: None,
        }
    }

    pub(crate) fn one_sided_remote(common_path: Path, remote_diff: Vec<DiffOp>) -> Self {
        Self {
            common_path,
            local_diff: Vec::new(),
            remote_diff,
            action: MergeAction::Remote,
            conflict: false,
            custom_diff: None,
        }
    }

    pub(crate) fn agreed(common_path: Path, local_diff: Vec<DiffOp>, remote_diff: Vec<DiffOp>) -> Self {
        Self {
            common_path,
            local_diff,
            remote_diff,
            action: MergeAction::Either,
            conflict: false,
            custom_diff: None,
        }
    }

    pub(crate) fn conflicted(
        common_path: Path,
        local_diff: Vec<DiffOp>,
        remote_diff: Vec<DiffOp>,
    ) -> Self {
        Self {
            common_path,
            local_diff,
            remote_diff,
            action: MergeAction::Undecided,
            conflict: true,
            custom_diff: None,
        }
    }

    /// The ops this decision contributes under its current action.
    ///
    /// `Undecided` — and `Custom` without a `custom_diff` — are unresolved.
    pub fn chosen_ops(&self) -> Result<&[DiffOp], UnresolvedConflictError> {
        let unresolved = || UnresolvedConflictError {
            path: nbmerge_json_pointer::format_json_pointer(&self.common_path),
        };
        match self.action {
            MergeAction::Base => Ok(&[]),
            MergeAction::Local => Ok(&self.local_diff),
            MergeAction::Remote => Ok(&self.remote_diff),
            // Both sides agree by construction; local's copy stands in.
            MergeAction::Either => Ok(&self.local_diff),
            MergeAction::Custom => self
                .custom_diff
                .as_deref()
                .ok_or_else(unresolved),
            MergeAction::Undecided => Err(unresolved()),
        }
    }
}
