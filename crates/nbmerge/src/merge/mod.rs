//! Three-way merge of a base document and two divergent edits.
//!
//! [`merge_three_way`] diffs local and remote against the shared base and
//! reconciles the two patches into a sequence of [`MergeDecision`]s. Ops
//! from the two sides land in the same decision iff they address
//! overlapping paths; everything else resolves automatically. The merger
//! is total: structural mismatches below the root become ordinary
//! add/remove/replace conflicts, and well-formed inputs always yield a
//! decision list.

pub mod apply;
pub mod decision;

pub use apply::{apply_decisions, MergeResult};
pub use decision::{MergeAction, MergeDecision};

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use nbmerge_json_pointer::PathStep;
use serde_json::{Map, Value};

use crate::diff::{diff, DiffOp};

/// Compute merge decisions for `base`, `local`, `remote`.
///
/// Non-conflicting groups come back pre-resolved (`Either` when both sides
/// agree, the changed side when one-sided); conflicting groups carry both
/// diffs verbatim with `action = Undecided`.
pub fn merge_three_way(base: &Value, local: &Value, remote: &Value) -> Vec<MergeDecision> {
    let local_ops = diff(base, local);
    let remote_ops = diff(base, remote);
    let mut decisions = Vec::new();
    reconcile(&mut decisions, &[], base, local_ops, remote_ops);
    decisions
}

fn reconcile(
    out: &mut Vec<MergeDecision>,
    prefix: &[PathStep],
    base: &Value,
    local: Vec<DiffOp>,
    remote: Vec<DiffOp>,
) {
    if local.is_empty() && remote.is_empty() {
        return;
    }

    let depth = prefix.len();
    let has_self_op = |ops: &[DiffOp]| ops.iter().any(|op| op.path().len() <= depth);
    if has_self_op(&local) || has_self_op(&remote) {
        // A whole-node rewrite cannot be split into sub-groups.
        if local == remote {
            out.push(MergeDecision::agreed(prefix.to_vec(), local, remote));
        } else if remote.is_empty() {
            out.push(MergeDecision::one_sided_local(prefix.to_vec(), local));
        } else if local.is_empty() {
            out.push(MergeDecision::one_sided_remote(prefix.to_vec(), remote));
        } else {
            out.push(MergeDecision::conflicted(prefix.to_vec(), local, remote));
        }
        return;
    }

    match base {
        Value::Object(map) => reconcile_obj(out, prefix, map, local, remote),
        Value::Array(arr) => reconcile_arr(out, prefix, arr, local, remote),
        // Child ops under a scalar cannot come from our own differ.
        _ => out.push(MergeDecision::conflicted(prefix.to_vec(), local, remote)),
    }
}

// ── Mapping level ─────────────────────────────────────────────────────────

fn reconcile_obj(
    out: &mut Vec<MergeDecision>,
    prefix: &[PathStep],
    base: &Map<String, Value>,
    local: Vec<DiffOp>,
    remote: Vec<DiffOp>,
) {
    let depth = prefix.len();
    let mut groups: IndexMap<String, (Option<DiffOp>, Option<DiffOp>)> = IndexMap::new();
    for op in local {
        if let Some(key) = op.path()[depth].as_key().map(str::to_string) {
            groups.entry(key).or_default().0 = Some(op);
        }
    }
    for op in remote {
        if let Some(key) = op.path()[depth].as_key().map(str::to_string) {
            groups.entry(key).or_default().1 = Some(op);
        }
    }

    for (key, pair) in groups {
        match pair {
            (Some(l), None) => out.push(MergeDecision::one_sided_local(prefix.to_vec(), vec![l])),
            (None, Some(r)) => out.push(MergeDecision::one_sided_remote(prefix.to_vec(), vec![r])),
            (Some(l), Some(r)) => {
                if l == r {
                    out.push(MergeDecision::agreed(prefix.to_vec(), vec![l], vec![r]));
                    continue;
                }
                match (l, r) {
                    (
                        DiffOp::Patch {
                            path: lpath,
                            ops: lo,
                        },
                        DiffOp::Patch {
                            path: rpath,
                            ops: ro,
                        },
                    ) => match base.get(&key) {
                        Some(child) => reconcile(out, &lpath, child, lo, ro),
                        None => out.push(MergeDecision::conflicted(
                            prefix.to_vec(),
                            vec![DiffOp::Patch {
                                path: lpath,
                                ops: lo,
                            }],
                            vec![DiffOp::Patch {
                                path: rpath,
                                ops: ro,
                            }],
                        )),
                    },
                    (l, r) => {
                        out.push(MergeDecision::conflicted(prefix.to_vec(), vec![l], vec![r]))
                    }
                }
            }
            (None, None) => {}
        }
    }
}

// ── Sequence level ────────────────────────────────────────────────────────

#[derive(Default)]
struct SeqSideOps {
    /// Direct insertions keyed by anchor, in op order.
    adds: BTreeMap<usize, Vec<DiffOp>>,
    /// Ops addressing an existing base element, keyed by base index.
    elems: BTreeMap<usize, DiffOp>,
}

fn split_seq_ops(ops: Vec<DiffOp>, depth: usize) -> SeqSideOps {
    let mut side = SeqSideOps::default();
    for op in ops {
        let Some(idx) = op.path().get(depth).and_then(|step| step.as_index()) else {
            continue;
        };
        let direct_add = op.path().len() == depth + 1 && matches!(op, DiffOp::Add { .. });
        if direct_add {
            side.adds.entry(idx).or_default().push(op);
        } else {
            side.elems.insert(idx, op);
        }
    }
    side
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElemClass {
    LocalOnly,
    RemoteOnly,
    Agreed,
    Recurse,
    Conflict,
}

fn reconcile_arr(
    out: &mut Vec<MergeDecision>,
    prefix: &[PathStep],
    base: &[Value],
    local: Vec<DiffOp>,
    remote: Vec<DiffOp>,
) {
    let depth = prefix.len();
    let mut l = split_seq_ops(local, depth);
    let mut r = split_seq_ops(remote, depth);

    let indices: Vec<usize> = l
        .elems
        .keys()
        .chain(r.elems.keys())
        .copied()
        .collect::<BTreeSet<usize>>()
        .into_iter()
        .collect();

    let mut classes: BTreeMap<usize, ElemClass> = BTreeMap::new();
    for &idx in &indices {
        let class = match (l.elems.get(&idx), r.elems.get(&idx)) {
            (Some(_), None) => ElemClass::LocalOnly,
            (None, Some(_)) => ElemClass::RemoteOnly,
            (Some(lop), Some(rop)) if lop == rop => ElemClass::Agreed,
            (Some(DiffOp::Patch { .. }), Some(DiffOp::Patch { .. })) if idx < base.len() => {
                ElemClass::Recurse
            }
            (Some(_), Some(_)) => ElemClass::Conflict,
            (None, None) => continue,
        };
        classes.insert(idx, class);
    }

    let mut i = 0usize;
    while i < indices.len() {
        let idx = indices[i];
        match classes[&idx] {
            ElemClass::Agreed => {
                if let (Some(lop), Some(rop)) = (l.elems.remove(&idx), r.elems.remove(&idx)) {
                    out.push(MergeDecision::agreed(prefix.to_vec(), vec![lop], vec![rop]));
                }
                i += 1;
            }
            ElemClass::Recurse => {
                if let (
                    Some(DiffOp::Patch { path, ops: lo }),
                    Some(DiffOp::Patch { ops: ro, .. }),
                ) = (l.elems.remove(&idx), r.elems.remove(&idx))
                {
                    reconcile(out, &path, &base[idx], lo, ro);
                }
                i += 1;
            }
            ElemClass::LocalOnly | ElemClass::RemoteOnly | ElemClass::Conflict => {
                // A run of consecutive touched elements containing a
                // conflicting index collapses into one decision spanning
                // the minimal covering range; conflict-free runs keep
                // per-element granularity.
                let mut j = i;
                let mut has_conflict = false;
                while j < indices.len()
                    && indices[j] == idx + (j - i)
                    && matches!(
                        classes[&indices[j]],
                        ElemClass::LocalOnly | ElemClass::RemoteOnly | ElemClass::Conflict
                    )
                {
                    has_conflict |= classes[&indices[j]] == ElemClass::Conflict;
                    j += 1;
                }
                if has_conflict {
                    let mut lops = Vec::new();
                    let mut rops = Vec::new();
                    for &k in &indices[i..j] {
                        if let Some(op) = l.elems.remove(&k) {
                            lops.push(op);
                        }
                        if let Some(op) = r.elems.remove(&k) {
                            rops.push(op);
                        }
                    }
                    out.push(MergeDecision::conflicted(prefix.to_vec(), lops, rops));
                } else {
                    for &k in &indices[i..j] {
                        if let Some(op) = l.elems.remove(&k) {
                            out.push(MergeDecision::one_sided_local(prefix.to_vec(), vec![op]));
                        }
                        if let Some(op) = r.elems.remove(&k) {
                            out.push(MergeDecision::one_sided_remote(prefix.to_vec(), vec![op]));
                        }
                    }
                }
                i = j;
            }
        }
    }

    // Insertions, in ascending anchor order. Different content inserted at
    // the same anchor by both sides is kept from both, local first.
    let anchors: Vec<usize> = l
        .adds
        .keys()
        .chain(r.adds.keys())
        .copied()
        .collect::<BTreeSet<usize>>()
        .into_iter()
        .collect();
    for anchor in anchors {
        match (l.adds.remove(&anchor), r.adds.remove(&anchor)) {
            (Some(lo), Some(ro)) => {
                if lo == ro {
                    out.push(MergeDecision::agreed(prefix.to_vec(), lo, ro));
                } else {
                    out.push(MergeDecision::one_sided_local(prefix.to_vec(), lo));
                    out.push(MergeDecision::one_sided_remote(prefix.to_vec(), ro));
                }
            }
            (Some(lo), None) => out.push(MergeDecision::one_sided_local(prefix.to_vec(), lo)),
            (None, Some(ro)) => out.push(MergeDecision::one_sided_remote(prefix.to_vec(), ro)),
            (None, None) => {}
        }
    }
}
