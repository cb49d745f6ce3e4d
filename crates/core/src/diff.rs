//! Character-level diffing of tag values against catalogue values.
//!
//! Uses Myers' O(ND) shortest edit script over Unicode scalar values. The
//! distance of a diff is the number of inserted plus deleted characters,
//! which is what the weighted scorer aggregates.

use serde::{Deserialize, Serialize};

/// Kind of an edit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    Equal,
    Insert,
    Delete,
}

/// A run of consecutive characters sharing one edit kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub kind: EditKind,
    pub text: String,
}

impl Edit {
    fn new(kind: EditKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Number of characters in this run.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Result of diffing two strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// Edit script turning `a` into `b`. Empty when both are identical.
    pub edits: Vec<Edit>,
    /// Inserted plus deleted characters.
    pub distance: usize,
}

/// Diff report for one compared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRecord {
    /// Field name, e.g. "label" or "track 3".
    pub field: String,
    /// Local (tag) value.
    pub before: String,
    /// Remote (catalogue) value.
    pub after: String,
    pub edits: Vec<Edit>,
    pub distance: usize,
    pub equal: bool,
}

impl DiffRecord {
    /// Runs to show for the local side: equal and deleted text.
    pub fn before_edits(&self) -> impl Iterator<Item = &Edit> {
        self.edits.iter().filter(|e| e.kind != EditKind::Insert)
    }

    /// Runs to show for the remote side: equal and inserted text.
    pub fn after_edits(&self) -> impl Iterator<Item = &Edit> {
        self.edits.iter().filter(|e| e.kind != EditKind::Delete)
    }
}

/// Diff `a` against `b`.
pub fn diff(a: &str, b: &str) -> Diff {
    if a == b {
        return Diff::default();
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let mut ops: Vec<(EditKind, char)> = Vec::with_capacity(a.len() + b.len());
    ops.extend(a[..prefix].iter().map(|&c| (EditKind::Equal, c)));
    ops.extend(shortest_edit(
        &a[prefix..a.len() - suffix],
        &b[prefix..b.len() - suffix],
    ));
    ops.extend(a[a.len() - suffix..].iter().map(|&c| (EditKind::Equal, c)));

    let distance = ops
        .iter()
        .filter(|(kind, _)| *kind != EditKind::Equal)
        .count();

    Diff {
        edits: merge_runs(ops),
        distance,
    }
}

/// Diff a field and package it for reporting.
pub fn diff_field(field: impl Into<String>, before: &str, after: &str) -> DiffRecord {
    let Diff { edits, distance } = diff(before, after);
    DiffRecord {
        field: field.into(),
        before: before.to_string(),
        after: after.to_string(),
        edits,
        distance,
        equal: before == after,
    }
}

/// Myers' greedy forward search with trace, then backtrack.
///
/// Step `d` only reads diagonals `-d..=d`, so the trace keeps that window of
/// `v` per step, indexed by `k + d`.
fn shortest_edit(a: &[char], b: &[char]) -> Vec<(EditKind, char)> {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max = n + m;
    if max == 0 {
        return Vec::new();
    }

    let offset = max;
    let at = |k: isize| (k + offset) as usize;
    let mut v = vec![0isize; 2 * max as usize + 2];
    let mut trace: Vec<Vec<isize>> = Vec::new();

    'search: for d in 0..=max {
        trace.push(v[at(-d)..=at(d)].to_vec());
        let mut k = -d;
        while k <= d {
            let mut x = if k == -d || (k != d && v[at(k - 1)] < v[at(k + 1)]) {
                v[at(k + 1)]
            } else {
                v[at(k - 1)] + 1
            };
            let mut y = x - k;
            while x < n && y < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }
            v[at(k)] = x;
            if x >= n && y >= m {
                break 'search;
            }
            k += 2;
        }
    }

    let mut ops = Vec::with_capacity(a.len() + b.len());
    let (mut x, mut y) = (n, m);
    for (d, window) in trace.iter().enumerate().rev() {
        let d = d as isize;
        if d == 0 {
            // Leading snake from the origin.
            while x > 0 {
                ops.push((EditKind::Equal, a[(x - 1) as usize]));
                x -= 1;
            }
            break;
        }

        let get = |k: isize| window[(k + d) as usize];
        let k = x - y;
        let prev_k = if k == -d || (k != d && get(k - 1) < get(k + 1)) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = get(prev_k);
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            ops.push((EditKind::Equal, a[(x - 1) as usize]));
            x -= 1;
            y -= 1;
        }
        if x == prev_x {
            ops.push((EditKind::Insert, b[(y - 1) as usize]));
            y -= 1;
        } else {
            ops.push((EditKind::Delete, a[(x - 1) as usize]));
            x -= 1;
        }
    }

    ops.reverse();
    ops
}

fn merge_runs(ops: Vec<(EditKind, char)>) -> Vec<Edit> {
    let mut edits: Vec<Edit> = Vec::new();
    for (kind, c) in ops {
        match edits.last_mut() {
            Some(last) if last.kind == kind => last.text.push(c),
            _ => edits.push(Edit::new(kind, c)),
        }
    }
    edits
}
