//! Patch application.
//!
//! Replays a patch against the exact value it was diffed from. Sequence
//! ops are replayed in one left-to-right pass over base indices, removals
//! taking effect before insertions at the same anchor, so index arithmetic
//! never has to be re-derived. A path that does not resolve is a caller
//! contract violation and fails with [`MalformedPatchError`].

use std::collections::HashMap;

use indexmap::IndexMap;
use nbmerge_json_pointer::format_json_pointer;
use serde_json::{Map, Value};

use crate::error::MalformedPatchError;

use super::ops::DiffOp;

/// Apply `ops` to a clone of `base`. The input is never mutated.
pub fn apply_patch(base: &Value, ops: &[DiffOp]) -> Result<Value, MalformedPatchError> {
    let refs: Vec<&DiffOp> = ops.iter().collect();
    let mut out = base.clone();
    apply_ops(&mut out, &refs, 0)?;
    Ok(out)
}

/// Replay a mixed-depth op list rooted `depth` steps above the ops' paths.
///
/// Ops may be hierarchical (`Patch` containers) or flat (absolute paths of
/// any depth, as produced by flattening merge decisions); both route to the
/// same grouped replay.
pub(crate) fn apply_ops(
    value: &mut Value,
    ops: &[&DiffOp],
    depth: usize,
) -> Result<(), MalformedPatchError> {
    if ops.is_empty() {
        return Ok(());
    }

    // An op whose path is exhausted targets this node itself and must be
    // the only op at this level.
    if let Some(&self_op) = ops.iter().find(|op| op.path().len() <= depth) {
        if ops.len() > 1 {
            return Err(MalformedPatchError::DuplicatePath {
                path: format_json_pointer(self_op.path()),
            });
        }
        return match self_op {
            DiffOp::Replace { new, .. } => {
                *value = new.clone();
                Ok(())
            }
            DiffOp::Patch { ops: nested, .. } => {
                let refs: Vec<&DiffOp> = nested.iter().collect();
                apply_ops(value, &refs, depth)
            }
            DiffOp::Add { path, .. } | DiffOp::Remove { path } => {
                Err(MalformedPatchError::WrongTarget {
                    path: format_json_pointer(path),
                })
            }
        };
    }

    match value {
        Value::Object(map) => apply_obj(map, ops, depth),
        Value::Array(arr) => apply_arr(arr, ops, depth),
        _ => Err(MalformedPatchError::WrongTarget {
            path: format_json_pointer(ops[0].path()),
        }),
    }
}

fn apply_obj(
    map: &mut Map<String, Value>,
    ops: &[&DiffOp],
    depth: usize,
) -> Result<(), MalformedPatchError> {
    let mut groups: IndexMap<String, Vec<&DiffOp>> = IndexMap::new();
    for &op in ops {
        let key = op.path()[depth]
            .as_key()
            .ok_or_else(|| MalformedPatchError::WrongTarget {
                path: format_json_pointer(op.path()),
            })?;
        groups.entry(key.to_string()).or_default().push(op);
    }

    for (key, group) in groups {
        let direct = group.len() == 1 && group[0].path().len() == depth + 1;
        if direct {
            match group[0] {
                DiffOp::Add { value, .. } => {
                    map.insert(key, value.clone());
                }
                DiffOp::Remove { path } => {
                    map.shift_remove(&key)
                        .ok_or_else(|| MalformedPatchError::MissingKey {
                            path: format_json_pointer(path),
                        })?;
                }
                DiffOp::Replace { path, new, .. } => {
                    let slot = map
                        .get_mut(&key)
                        .ok_or_else(|| MalformedPatchError::MissingKey {
                            path: format_json_pointer(path),
                        })?;
                    *slot = new.clone();
                }
                DiffOp::Patch { path, ops: nested } => {
                    let child = map
                        .get_mut(&key)
                        .ok_or_else(|| MalformedPatchError::MissingKey {
                            path: format_json_pointer(path),
                        })?;
                    let refs: Vec<&DiffOp> = nested.iter().collect();
                    apply_ops(child, &refs, depth + 1)?;
                }
            }
        } else if group.iter().all(|op| op.path().len() > depth + 1) {
            let child = map
                .get_mut(&key)
                .ok_or_else(|| MalformedPatchError::MissingKey {
                    path: format_json_pointer(group[0].path()),
                })?;
            apply_ops(child, &group, depth + 1)?;
        } else {
            return Err(MalformedPatchError::DuplicatePath {
                path: format_json_pointer(group[0].path()),
            });
        }
    }
    Ok(())
}

fn apply_arr(arr: &mut Vec<Value>, ops: &[&DiffOp], depth: usize) -> Result<(), MalformedPatchError> {
    let len = arr.len();
    // Insertions keyed by anchor, element ops keyed by base index.
    let mut adds: HashMap<usize, Vec<&Value>> = HashMap::new();
    let mut elems: HashMap<usize, Vec<&DiffOp>> = HashMap::new();

    for &op in ops {
        let idx = op.path()[depth]
            .as_index()
            .ok_or_else(|| MalformedPatchError::WrongTarget {
                path: format_json_pointer(op.path()),
            })?;
        let oob = || MalformedPatchError::IndexOutOfBounds {
            path: format_json_pointer(op.path()),
        };
        match op {
            DiffOp::Add { value, .. } if op.path().len() == depth + 1 => {
                if idx > len {
                    return Err(oob());
                }
                adds.entry(idx).or_default().push(value);
            }
            _ => {
                if idx >= len {
                    return Err(oob());
                }
                elems.entry(idx).or_default().push(op);
            }
        }
    }

    let old = std::mem::take(arr);
    let mut out = Vec::with_capacity(len);
    for (i, mut el) in old.into_iter().enumerate() {
        if let Some(values) = adds.get(&i) {
            for v in values {
                out.push((*v).clone());
            }
        }
        match elems.get(&i) {
            None => out.push(el),
            Some(group) => {
                let direct = group.len() == 1 && group[0].path().len() == depth + 1;
                if direct {
                    match group[0] {
                        DiffOp::Remove { .. } => {}
                        DiffOp::Replace { new, .. } => out.push(new.clone()),
                        DiffOp::Patch { ops: nested, .. } => {
                            let refs: Vec<&DiffOp> = nested.iter().collect();
                            apply_ops(&mut el, &refs, depth + 1)?;
                            out.push(el);
                        }
                        // Direct adds were routed to `adds` above.
                        DiffOp::Add { .. } => unreachable!("direct add in element group"),
                    }
                } else if group.iter().all(|op| op.path().len() > depth + 1) {
                    apply_ops(&mut el, group, depth + 1)?;
                    out.push(el);
                } else {
                    return Err(MalformedPatchError::DuplicatePath {
                        path: format_json_pointer(group[0].path()),
                    });
                }
            }
        }
    }
    if let Some(values) = adds.get(&len) {
        for v in values {
            out.push((*v).clone());
        }
    }
    *arr = out;
    Ok(())
}
