//! Structural diff between two JSON-like document trees.
//!
//! [`diff`] computes a hierarchical, path-addressed patch that transforms
//! `base` into `remote`. Rules, in priority order:
//!
//! - deep-equal values produce no op;
//! - values of different node kinds produce a `Replace` at their own path;
//! - mappings recurse key-by-key over the union of base keys followed by
//!   remote-only keys;
//! - sequences are aligned element-wise (see [`seq`]) and addressed by
//!   *base* index; an adjacent delete+insert pair is folded into a nested
//!   `Patch` (same kind) or `Replace` (kind change).
//!
//! Strings are opaque leaves: source text compares by value here, and
//! line-level work is a presentation concern built on [`seq::align`]
//! directly.

pub mod apply;
pub mod chunk;
pub mod ops;
pub mod seq;

pub use apply::apply_patch;
pub use chunk::{chunk, ChunkKind, DiffChunk};
pub use ops::DiffOp;
pub use seq::{align, AlignEntry};

use indexmap::IndexSet;
use nbmerge_json_pointer::{Path, PathStep};
use serde_json::{Map, Value};

/// Generate the patch transforming `base` into `remote`.
///
/// Total function: never fails for any pair of values.
pub fn diff(base: &Value, remote: &Value) -> Vec<DiffOp> {
    if base == remote {
        return Vec::new();
    }
    match (base, remote) {
        (Value::Object(b), Value::Object(r)) => diff_obj(&[], b, r),
        (Value::Array(b), Value::Array(r)) => diff_arr(&[], b, r),
        _ => vec![DiffOp::Replace {
            path: Vec::new(),
            old: base.clone(),
            new: remote.clone(),
        }],
    }
}

/// Diff one child value, producing at most one op at the child's own path.
fn diff_child(path: Path, base: &Value, remote: &Value) -> Option<DiffOp> {
    if base == remote {
        return None;
    }
    match (base, remote) {
        (Value::Object(b), Value::Object(r)) => {
            let ops = diff_obj(&path, b, r);
            if ops.is_empty() {
                None
            } else {
                Some(DiffOp::Patch { path, ops })
            }
        }
        (Value::Array(b), Value::Array(r)) => {
            let ops = diff_arr(&path, b, r);
            if ops.is_empty() {
                None
            } else {
                Some(DiffOp::Patch { path, ops })
            }
        }
        _ => Some(DiffOp::Replace {
            path,
            old: base.clone(),
            new: remote.clone(),
        }),
    }
}

fn child_path(parent: &[PathStep], step: PathStep) -> Path {
    let mut path = parent.to_vec();
    path.push(step);
    path
}

fn diff_obj(parent: &[PathStep], base: &Map<String, Value>, remote: &Map<String, Value>) -> Vec<DiffOp> {
    // Union of base keys, then remote-only keys, in first-occurrence order.
    let mut union: IndexSet<&str> = base.keys().map(String::as_str).collect();
    union.extend(remote.keys().map(String::as_str));

    let mut ops = Vec::new();
    for key in union {
        let path = child_path(parent, PathStep::key(key));
        match (base.get(key), remote.get(key)) {
            (Some(_), None) => ops.push(DiffOp::Remove { path }),
            (None, Some(value)) => ops.push(DiffOp::Add {
                path,
                value: value.clone(),
            }),
            (Some(b), Some(r)) => {
                if let Some(op) = diff_child(path, b, r) {
                    ops.push(op);
                }
            }
            (None, None) => unreachable!("key came from the union"),
        }
    }
    ops
}

fn diff_arr(parent: &[PathStep], base: &[Value], remote: &[Value]) -> Vec<DiffOp> {
    let entries = align(base, remote, |a, b| a == b);
    let mut ops = Vec::new();
    let mut i = 0usize;
    while i < entries.len() {
        match entries[i] {
            AlignEntry::Equal(..) => i += 1,
            AlignEntry::DeleteBase(bi) => {
                // Adjacent delete+insert is an in-place element edit.
                if let Some(AlignEntry::InsertRemote(rj)) = entries.get(i + 1).copied() {
                    let path = child_path(parent, PathStep::Index(bi));
                    if let Some(op) = diff_child(path, &base[bi], &remote[rj]) {
                        ops.push(op);
                    }
                    i += 2;
                } else {
                    ops.push(DiffOp::Remove {
                        path: child_path(parent, PathStep::Index(bi)),
                    });
                    i += 1;
                }
            }
            AlignEntry::InsertRemote(rj) => {
                if let Some(AlignEntry::DeleteBase(bi)) = entries.get(i + 1).copied() {
                    let path = child_path(parent, PathStep::Index(bi));
                    if let Some(op) = diff_child(path, &base[bi], &remote[rj]) {
                        ops.push(op);
                    }
                    i += 2;
                } else {
                    // Anchor before the next base element still to come.
                    let anchor = next_base_index(&entries[i + 1..]).unwrap_or(base.len());
                    ops.push(DiffOp::Add {
                        path: child_path(parent, PathStep::Index(anchor)),
                        value: remote[rj].clone(),
                    });
                    i += 1;
                }
            }
        }
    }
    ops
}

/// The base index carried by the next alignment entry that consumes base.
fn next_base_index(entries: &[AlignEntry]) -> Option<usize> {
    entries.iter().find_map(|entry| match *entry {
        AlignEntry::Equal(i, _) | AlignEntry::DeleteBase(i) => Some(i),
        AlignEntry::InsertRemote(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbmerge_json_pointer::parse_json_pointer;
    use serde_json::json;

    #[test]
    fn diff_equal_docs() {
        let doc = json!({"cells": [], "metadata": {"language": "python"}});
        assert!(diff(&doc, &doc).is_empty());
    }

    #[test]
    fn diff_kind_change_is_replace() {
        let ops = diff(&json!({"a": 1}), &json!([1]));
        assert_eq!(
            ops,
            vec![DiffOp::Replace {
                path: vec![],
                old: json!({"a": 1}),
                new: json!([1]),
            }]
        );
    }

    #[test]
    fn diff_obj_add_remove_order() {
        let base = json!({"a": 1, "b": 2});
        let remote = json!({"b": 2, "c": 3});
        let ops = diff(&base, &remote);
        assert_eq!(ops.len(), 2);
        // Base keys first (removal of "a"), then remote-only keys.
        assert_eq!(ops[0].op_name(), "remove");
        assert_eq!(ops[0].path(), &parse_json_pointer("/a"));
        assert_eq!(ops[1].op_name(), "add");
        assert_eq!(ops[1].path(), &parse_json_pointer("/c"));
    }

    #[test]
    fn diff_nested_obj_is_hierarchical() {
        let base = json!({"metadata": {"language": "python", "version": 3}});
        let remote = json!({"metadata": {"language": "rust", "version": 3}});
        let ops = diff(&base, &remote);
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            DiffOp::Patch { path, ops } => {
                assert_eq!(path, &parse_json_pointer("/metadata"));
                assert_eq!(ops.len(), 1);
                assert_eq!(ops[0].path(), &parse_json_pointer("/metadata/language"));
                assert_eq!(ops[0].op_name(), "replace");
            }
            other => panic!("expected patch, got {other:?}"),
        }
    }

    #[test]
    fn diff_string_is_opaque_leaf() {
        let ops = diff(&json!("x = 1\ny = 2\n"), &json!("x = 1\ny = 3\n"));
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].op_name(), "replace");
    }

    #[test]
    fn diff_arr_remove_carries_base_index() {
        let base = json!([10, 20, 30]);
        let remote = json!([10, 30]);
        let ops = diff(&base, &remote);
        assert_eq!(
            ops,
            vec![DiffOp::Remove {
                path: parse_json_pointer("/1"),
            }]
        );
    }

    #[test]
    fn diff_arr_add_is_anchored_before_base_index() {
        let base = json!([10, 30]);
        let remote = json!([10, 20, 30]);
        let ops = diff(&base, &remote);
        assert_eq!(
            ops,
            vec![DiffOp::Add {
                path: parse_json_pointer("/1"),
                value: json!(20),
            }]
        );
    }

    #[test]
    fn diff_arr_append_anchors_at_len() {
        let base = json!([10]);
        let remote = json!([10, 20]);
        let ops = diff(&base, &remote);
        assert_eq!(ops[0].path(), &parse_json_pointer("/1"));
        assert_eq!(ops[0].op_name(), "add");
    }

    #[test]
    fn diff_arr_edit_folds_into_patch() {
        let base = json!([{"cell_type": "code", "source": "a", "metadata": {}, "outputs": []}]);
        let remote = json!([{"cell_type": "code", "source": "b", "metadata": {}, "outputs": []}]);
        let ops = diff(&base, &remote);
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            DiffOp::Patch { path, ops } => {
                assert_eq!(path, &parse_json_pointer("/0"));
                assert_eq!(ops[0].path(), &parse_json_pointer("/0/source"));
            }
            other => panic!("expected patch, got {other:?}"),
        }
    }

    #[test]
    fn diff_arr_element_kind_change_folds_into_replace() {
        let base = json!(["text", 2]);
        let remote = json!([["text"], 2]);
        let ops = diff(&base, &remote);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].op_name(), "replace");
        assert_eq!(ops[0].path(), &parse_json_pointer("/0"));
    }
}
