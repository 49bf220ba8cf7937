//! Display-support chunking of an alignment.
//!
//! Folds consecutive alignment entries into contiguous `[start, end)` runs
//! over the entry indices, so a consumer can collapse long unchanged
//! stretches. Chunks are derived data: recomputed on demand, no identity
//! across recomputation. Stateful consumers must key collapse state by
//! `start`, not by chunk value.

use super::seq::AlignEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Unchanged,
    Changed,
}

/// A contiguous run `[start, end)` of alignment entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffChunk {
    pub start: usize,
    pub end: usize,
    pub kind: ChunkKind,
    /// Set on `Unchanged` runs at or above the collapse threshold.
    pub collapsible: bool,
}

impl DiffChunk {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Group an alignment into unchanged/changed runs.
///
/// Chunk ranges partition `[0, alignment.len())` exactly. An unchanged run
/// is collapsible iff its length reaches `collapse_threshold`; a threshold
/// of zero or below disables collapsing entirely.
pub fn chunk(alignment: &[AlignEntry], collapse_threshold: isize) -> Vec<DiffChunk> {
    let mut chunks: Vec<DiffChunk> = Vec::new();
    for (i, entry) in alignment.iter().enumerate() {
        let kind = match entry {
            AlignEntry::Equal(..) => ChunkKind::Unchanged,
            AlignEntry::DeleteBase(_) | AlignEntry::InsertRemote(_) => ChunkKind::Changed,
        };
        match chunks.last_mut() {
            Some(last) if last.kind == kind => last.end = i + 1,
            _ => chunks.push(DiffChunk {
                start: i,
                end: i + 1,
                kind,
                collapsible: false,
            }),
        }
    }
    if collapse_threshold > 0 {
        let threshold = collapse_threshold as usize;
        for c in &mut chunks {
            c.collapsible = c.kind == ChunkKind::Unchanged && c.len() >= threshold;
        }
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::align;

    fn coverage(chunks: &[DiffChunk], n: usize) {
        let mut pos = 0usize;
        for c in chunks {
            assert_eq!(c.start, pos, "gap or overlap at {pos}");
            assert!(c.end > c.start);
            pos = c.end;
        }
        assert_eq!(pos, n);
    }

    #[test]
    fn empty_alignment_has_no_chunks() {
        assert!(chunk(&[], 3).is_empty());
    }

    #[test]
    fn chunks_partition_the_alignment() {
        let base: Vec<i32> = (0..20).collect();
        let mut remote = base.clone();
        remote[5] = 100;
        remote.remove(12);
        let alignment = align(&base, &remote, |a, b| a == b);
        for threshold in [-1, 0, 1, 3, 100] {
            let chunks = chunk(&alignment, threshold);
            coverage(&chunks, alignment.len());
        }
    }

    #[test]
    fn runs_alternate_kinds() {
        let base = [1, 2, 3, 4];
        let remote = [1, 9, 3, 4];
        let alignment = align(&base, &remote, |a, b| a == b);
        let chunks = chunk(&alignment, 0);
        let kinds: Vec<ChunkKind> = chunks.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ChunkKind::Unchanged, ChunkKind::Changed, ChunkKind::Unchanged]
        );
    }

    #[test]
    fn threshold_gates_collapsibility() {
        let base: Vec<i32> = (0..10).collect();
        let alignment = align(&base, &base, |a, b| a == b);
        let chunks = chunk(&alignment, 5);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].collapsible);

        let chunks = chunk(&alignment, 11);
        assert!(!chunks[0].collapsible);
    }

    #[test]
    fn nonpositive_threshold_disables_collapsing() {
        let base: Vec<i32> = (0..50).collect();
        let alignment = align(&base, &base, |a, b| a == b);
        for threshold in [0, -7] {
            let chunks = chunk(&alignment, threshold);
            assert!(chunks.iter().all(|c| !c.collapsible));
        }
    }
}
