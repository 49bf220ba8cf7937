//! Decision application.
//!
//! Flattens resolved decisions back into one op list, replays it against a
//! clone of base, and schema-checks the result. Decisions are sorted by
//! `common_path` first so ops land in deterministic order regardless of how
//! the caller shuffled the list; the sort is stable, so same-path decisions
//! (same-anchor insertions in particular) keep their reconciliation order.

use serde_json::Value;

use crate::diff::apply::apply_ops;
use crate::diff::DiffOp;
use crate::error::{MergeApplyError, SchemaWarning};
use crate::notebook::validate_document;

use super::decision::MergeDecision;

/// The outcome of applying a fully resolved decision list.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    pub doc: Value,
    /// Structural schema mismatches in the merged document. Non-fatal.
    pub warnings: Vec<SchemaWarning>,
}

/// Replay every decision's chosen ops against a clone of `base`.
///
/// Fails with [`UnresolvedConflictError`](crate::error::UnresolvedConflictError)
/// before touching the document if any decision is still undecided, and
/// with [`MalformedPatchError`](crate::error::MalformedPatchError) if the
/// decisions do not belong to this base.
pub fn apply_decisions(
    base: &Value,
    decisions: &[MergeDecision],
) -> Result<MergeResult, MergeApplyError> {
    let mut sorted: Vec<&MergeDecision> = decisions.iter().collect();
    sorted.sort_by(|a, b| a.common_path.cmp(&b.common_path));

    let mut ops: Vec<&DiffOp> = Vec::new();
    for decision in sorted {
        ops.extend(decision.chosen_ops()?);
    }

    let mut doc = base.clone();
    apply_ops(&mut doc, &ops, 0)?;
    let warnings = validate_document(&doc);
    Ok(MergeResult { doc, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::{merge_three_way, MergeAction};
    use serde_json::json;

    fn doc(cells: Value) -> Value {
        json!({"cells": cells, "metadata": {}})
    }

    fn code_cell(source: &str) -> Value {
        json!({"cell_type": "code", "source": source, "metadata": {}, "outputs": []})
    }

    #[test]
    fn no_decisions_reproduce_base() {
        let base = doc(json!([code_cell("a")]));
        let result = apply_decisions(&base, &[]).unwrap();
        assert_eq!(result.doc, base);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn non_conflicting_merge_combines_both_sides() {
        let base = doc(json!([code_cell("a"), code_cell("b")]));
        let local = doc(json!([code_cell("a2"), code_cell("b")]));
        let remote = doc(json!([code_cell("a"), code_cell("b2")]));
        let decisions = merge_three_way(&base, &local, &remote);
        let result = apply_decisions(&base, &decisions).unwrap();
        assert_eq!(result.doc, doc(json!([code_cell("a2"), code_cell("b2")])));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn undecided_decision_blocks_application() {
        let base = doc(json!([code_cell("a")]));
        let local = doc(json!([code_cell("b")]));
        let remote = doc(json!([code_cell("c")]));
        let decisions = merge_three_way(&base, &local, &remote);
        let err = apply_decisions(&base, &decisions).unwrap_err();
        assert_eq!(
            err,
            MergeApplyError::Unresolved(crate::error::UnresolvedConflictError {
                path: "/cells/0".to_string(),
            })
        );
    }

    #[test]
    fn resolving_a_conflict_picks_that_side() {
        let base = doc(json!([code_cell("a")]));
        let local = doc(json!([]));
        let remote = doc(json!([code_cell("a2")]));
        let mut decisions = merge_three_way(&base, &local, &remote);
        assert_eq!(decisions.len(), 1);

        decisions[0].action = MergeAction::Local;
        assert_eq!(apply_decisions(&base, &decisions).unwrap().doc, local);

        decisions[0].action = MergeAction::Remote;
        assert_eq!(apply_decisions(&base, &decisions).unwrap().doc, remote);

        decisions[0].action = MergeAction::Base;
        assert_eq!(apply_decisions(&base, &decisions).unwrap().doc, base);
    }

    #[test]
    fn custom_diff_overrides_both_sides() {
        let base = doc(json!([code_cell("a")]));
        let local = doc(json!([code_cell("b")]));
        let remote = doc(json!([code_cell("c")]));
        let mut decisions = merge_three_way(&base, &local, &remote);
        decisions[0].action = MergeAction::Custom;
        decisions[0].custom_diff = Some(vec![DiffOp::Replace {
            path: nbmerge_json_pointer::parse_json_pointer("/cells/0/source"),
            old: json!("a"),
            new: json!("merged"),
        }]);
        let result = apply_decisions(&base, &decisions).unwrap();
        assert_eq!(result.doc, doc(json!([code_cell("merged")])));
    }

    #[test]
    fn same_anchor_insertions_apply_local_first() {
        let base = doc(json!([code_cell("a")]));
        let local = doc(json!([code_cell("a"), code_cell("from local")]));
        let remote = doc(json!([code_cell("a"), code_cell("from remote")]));
        let decisions = merge_three_way(&base, &local, &remote);
        let result = apply_decisions(&base, &decisions).unwrap();
        assert_eq!(
            result.doc,
            doc(json!([
                code_cell("a"),
                code_cell("from local"),
                code_cell("from remote")
            ]))
        );
    }

    #[test]
    fn decision_order_does_not_change_the_result() {
        let base = doc(json!([code_cell("a"), code_cell("b"), code_cell("c")]));
        let local = doc(json!([code_cell("a2"), code_cell("b"), code_cell("c")]));
        let remote = doc(json!([code_cell("a"), code_cell("b"), code_cell("c2")]));
        let mut decisions = merge_three_way(&base, &local, &remote);
        let forward = apply_decisions(&base, &decisions).unwrap();
        decisions.reverse();
        let reversed = apply_decisions(&base, &decisions).unwrap();
        assert_eq!(forward.doc, reversed.doc);
    }

    #[test]
    fn schema_warnings_surface_without_failing() {
        let base = doc(json!([code_cell("a")]));
        // Local rewrites the cell into something schema-invalid.
        let local = doc(json!([{"cell_type": "mystery", "source": "a", "metadata": {}}]));
        let decisions = merge_three_way(&base, &local, &base);
        let result = apply_decisions(&base, &decisions).unwrap();
        assert!(!result.warnings.is_empty());
        assert_eq!(result.warnings[0].path, "/cells/0/cell_type");
    }
}
