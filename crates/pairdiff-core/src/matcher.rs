//! Longest-matching-block sequence matcher
//!
//! Recursively finds the longest run of identical lines inside the current
//! window, then repeats on the regions to its left and right. Among equally
//! long runs the one starting earliest in the left source wins (and, for
//! ties there, earliest in the right source), so results are stable.

use rustc_hash::FxHashMap;

/// A run of `len` identical lines at `left` and `right`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchingBlock {
    pub left: usize,
    pub right: usize,
    pub len: usize,
}

struct Matcher<'a> {
    left: &'a [String],
    /// Right-side positions of every distinct line, ascending
    right_index: FxHashMap<&'a str, Vec<usize>>,
}

impl<'a> Matcher<'a> {
    fn new(left: &'a [String], right: &'a [String]) -> Self {
        let mut right_index: FxHashMap<&'a str, Vec<usize>> = FxHashMap::default();
        for (j, line) in right.iter().enumerate() {
            right_index.entry(line.as_str()).or_default().push(j);
        }
        Self { left, right_index }
    }

    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchingBlock {
        let mut best = MatchingBlock {
            left: alo,
            right: blo,
            len: 0,
        };
        // run length of the match ending at right position j, for the previous left line
        let mut run_ending: FxHashMap<usize, usize> = FxHashMap::default();

        for i in alo..ahi {
            let mut next_run: FxHashMap<usize, usize> = FxHashMap::default();
            if let Some(positions) = self.right_index.get(self.left[i].as_str()) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_ending.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_run.insert(j, k);
                    if k > best.len {
                        best = MatchingBlock {
                            left: i + 1 - k,
                            right: j + 1 - k,
                            len: k,
                        };
                    }
                }
            }
            run_ending = next_run;
        }

        best
    }
}

/// All maximal matching blocks in ascending order, adjacent runs merged.
///
/// Unlike a sentinel-terminated list, the result holds only non-empty blocks.
pub fn matching_blocks(left: &[String], right: &[String]) -> Vec<MatchingBlock> {
    let matcher = Matcher::new(left, right);
    let mut pending = vec![(0, left.len(), 0, right.len())];
    let mut found = Vec::new();

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let m = matcher.longest_match(alo, ahi, blo, bhi);
        if m.len == 0 {
            continue;
        }
        if alo < m.left && blo < m.right {
            pending.push((alo, m.left, blo, m.right));
        }
        if m.left + m.len < ahi && m.right + m.len < bhi {
            pending.push((m.left + m.len, ahi, m.right + m.len, bhi));
        }
        found.push(m);
    }

    found.sort();

    let mut merged: Vec<MatchingBlock> = Vec::with_capacity(found.len());
    for block in found {
        match merged.last_mut() {
            Some(last)
                if last.left + last.len == block.left && last.right + last.len == block.right =>
            {
                last.len += block.len;
            }
            _ => merged.push(block),
        }
    }
    merged
}
