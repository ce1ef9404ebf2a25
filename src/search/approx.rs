//! Approximate substring matching.
//!
//! Finds the substring of a text with the smallest edit distance to a
//! pattern (Sellers' variant of Levenshtein, where the match may start
//! and end anywhere in the text). Position in the text does not affect
//! the result, only the number of edits.

use std::ops::Range;

/// Best approximate occurrence of a pattern in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproxMatch {
    /// Edits needed to turn the matched substring into the pattern.
    pub distance: usize,
    /// Matched character range in the text.
    pub span: Range<usize>,
}

impl ApproxMatch {
    /// Normalized score in `[0, 1]`; 0 is an exact occurrence.
    pub fn score(&self, pattern_len: usize) -> f64 {
        if pattern_len == 0 {
            return 1.0;
        }
        (self.distance as f64 / pattern_len as f64).min(1.0)
    }
}

/// Lowercase a string one char at a time, keeping char positions aligned
/// with the original.
pub fn fold_chars(s: &str) -> Vec<char> {
    s.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

/// Smallest-distance occurrence of `pattern` anywhere in `text`.
///
/// Ties keep the occurrence that ends first. Returns `None` when either
/// side is empty.
pub fn best_substring_match(pattern: &[char], text: &[char]) -> Option<ApproxMatch> {
    if pattern.is_empty() || text.is_empty() {
        return None;
    }

    let n = text.len();
    // Row i holds, for every text end position j, the best distance of
    // pattern[..i] ending at j and where that alignment starts.
    let mut prev_dist: Vec<usize> = vec![0; n + 1];
    let mut prev_start: Vec<usize> = (0..=n).collect();
    let mut cur_dist: Vec<usize> = vec![0; n + 1];
    let mut cur_start: Vec<usize> = vec![0; n + 1];

    for (i, &p) in pattern.iter().enumerate() {
        cur_dist[0] = i + 1;
        cur_start[0] = 0;
        for j in 1..=n {
            let substitution = prev_dist[j - 1] + usize::from(text[j - 1] != p);
            let skip_pattern = prev_dist[j] + 1;
            let skip_text = cur_dist[j - 1] + 1;

            let (dist, start) = if substitution <= skip_pattern && substitution <= skip_text {
                (substitution, prev_start[j - 1])
            } else if skip_pattern <= skip_text {
                (skip_pattern, prev_start[j])
            } else {
                (skip_text, cur_start[j - 1])
            };
            cur_dist[j] = dist;
            cur_start[j] = start;
        }
        std::mem::swap(&mut prev_dist, &mut cur_dist);
        std::mem::swap(&mut prev_start, &mut cur_start);
    }

    (1..=n)
        .min_by_key(|&j| (prev_dist[j], j))
        .map(|end| ApproxMatch {
            distance: prev_dist[end],
            span: prev_start[end]..end,
        })
}
