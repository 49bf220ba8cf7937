//! Sequence alignment under a caller-supplied equality predicate.
//!
//! Produces a single left-to-right edit script of [`AlignEntry`] values.
//! Small inputs go through a classic LCS dynamic program; larger ones
//! through a Myers O((N+M)·D) greedy walk so that source-line alignment
//! inside a cell stays responsive. Both paths share the same tie-break
//! (consume base before remote), so output is deterministic for a given
//! input.

/// One step of an alignment between a base and a remote sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignEntry {
    /// `base[i]` and `remote[j]` are equal under the predicate.
    Equal(usize, usize),
    /// `base[i]` has no counterpart in remote.
    DeleteBase(usize),
    /// `remote[j]` has no counterpart in base.
    InsertRemote(usize),
}

/// Above this `n * m` product the DP matrix is abandoned for the Myers walk.
const DP_LIMIT: usize = 16_384;

/// Align `base` against `remote` under `eq`.
///
/// The result covers every base index exactly once (as `Equal` or
/// `DeleteBase`, ascending) and every remote index exactly once (as `Equal`
/// or `InsertRemote`, ascending).
pub fn align<T, F>(base: &[T], remote: &[T], eq: F) -> Vec<AlignEntry>
where
    F: Fn(&T, &T) -> bool,
{
    let n = base.len();
    let m = remote.len();

    // Common affixes are stripped first so the quadratic work only covers
    // the middle that actually changed.
    let mut prefix = 0usize;
    while prefix < n && prefix < m && eq(&base[prefix], &remote[prefix]) {
        prefix += 1;
    }
    let mut suffix = 0usize;
    while suffix < n - prefix && suffix < m - prefix && eq(&base[n - 1 - suffix], &remote[m - 1 - suffix]) {
        suffix += 1;
    }

    let mut out: Vec<AlignEntry> = (0..prefix).map(|i| AlignEntry::Equal(i, i)).collect();

    let mid_base = &base[prefix..n - suffix];
    let mid_remote = &remote[prefix..m - suffix];
    let middle = if mid_base.is_empty() {
        (0..mid_remote.len()).map(AlignEntry::InsertRemote).collect()
    } else if mid_remote.is_empty() {
        (0..mid_base.len()).map(AlignEntry::DeleteBase).collect()
    } else if mid_base.len() * mid_remote.len() <= DP_LIMIT {
        align_lcs(mid_base, mid_remote, &eq)
    } else {
        align_myers(mid_base, mid_remote, &eq)
    };
    out.extend(middle.into_iter().map(|entry| shift(entry, prefix)));

    for k in 0..suffix {
        out.push(AlignEntry::Equal(n - suffix + k, m - suffix + k));
    }
    out
}

fn shift(entry: AlignEntry, by: usize) -> AlignEntry {
    match entry {
        AlignEntry::Equal(i, j) => AlignEntry::Equal(i + by, j + by),
        AlignEntry::DeleteBase(i) => AlignEntry::DeleteBase(i + by),
        AlignEntry::InsertRemote(j) => AlignEntry::InsertRemote(j + by),
    }
}

/// LCS dynamic program over suffixes, backtracked front-to-back.
///
/// Ties prefer consuming base (`DeleteBase` before `InsertRemote`), which
/// keeps the earliest matching run as long as possible.
fn align_lcs<T, F>(base: &[T], remote: &[T], eq: &F) -> Vec<AlignEntry>
where
    F: Fn(&T, &T) -> bool,
{
    let n = base.len();
    let m = remote.len();
    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            dp[i][j] = if eq(&base[i], &remote[j]) {
                1 + dp[i + 1][j + 1]
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }

    let mut out = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    while i < n && j < m {
        if eq(&base[i], &remote[j]) {
            out.push(AlignEntry::Equal(i, j));
            i += 1;
            j += 1;
        } else if dp[i + 1][j] >= dp[i][j + 1] {
            out.push(AlignEntry::DeleteBase(i));
            i += 1;
        } else {
            out.push(AlignEntry::InsertRemote(j));
            j += 1;
        }
    }
    while i < n {
        out.push(AlignEntry::DeleteBase(i));
        i += 1;
    }
    while j < m {
        out.push(AlignEntry::InsertRemote(j));
        j += 1;
    }
    out
}

/// Myers greedy edit-distance walk with a recorded per-round trace.
///
/// Work is bounded by O((N+M)·D) where D is the edit distance; the trace
/// costs O(D·(N+M)) space, which is fine at notebook scale.
fn align_myers<T, F>(base: &[T], remote: &[T], eq: &F) -> Vec<AlignEntry>
where
    F: Fn(&T, &T) -> bool,
{
    let n = base.len();
    let m = remote.len();
    let max = n + m;
    let offset = max as isize;
    let mut v = vec![0usize; 2 * max + 1];
    let mut trace: Vec<Vec<usize>> = Vec::new();
    let mut found = 0isize;

    'outer: for d in 0..=(max as isize) {
        trace.push(v.clone());
        let mut k = -d;
        while k <= d {
            let ki = (offset + k) as usize;
            let mut x = if k == -d || (k != d && v[ki - 1] < v[ki + 1]) {
                v[ki + 1]
            } else {
                v[ki - 1] + 1
            };
            let mut y = (x as isize - k) as usize;
            while x < n && y < m && eq(&base[x], &remote[y]) {
                x += 1;
                y += 1;
            }
            v[ki] = x;
            if x >= n && y >= m {
                found = d;
                break 'outer;
            }
            k += 2;
        }
    }

    // Walk the trace back from (n, m), emitting entries in reverse.
    let mut rev = Vec::new();
    let (mut x, mut y) = (n, m);
    for d in (0..=found).rev() {
        let v = &trace[d as usize];
        let k = x as isize - y as isize;
        let ki = (offset + k) as usize;
        let prev_k = if k == -d || (k != d && v[ki - 1] < v[ki + 1]) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = v[(offset + prev_k) as usize];
        let prev_y = prev_x as isize - prev_k;
        while x > prev_x && (y as isize) > prev_y {
            rev.push(AlignEntry::Equal(x - 1, y - 1));
            x -= 1;
            y -= 1;
        }
        if d > 0 {
            if x == prev_x {
                rev.push(AlignEntry::InsertRemote(y - 1));
            } else {
                rev.push(AlignEntry::DeleteBase(x - 1));
            }
            x = prev_x;
            y = prev_y as usize;
        }
    }
    rev.reverse();
    rev
}
