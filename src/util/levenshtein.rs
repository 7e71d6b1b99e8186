//! Bounded Levenshtein distance.
//!
//! Spelling scans compare one word against every term of an index, so the
//! matcher pre-splits the word once and gives up on a candidate as soon as
//! every cell of a row exceeds the bound.

use std::cmp::min;

/// Matches candidates against a fixed word within an edit-distance bound.
#[derive(Debug, Clone)]
pub struct LevenshteinMatcher {
    word: String,
    word_chars: Vec<char>,
}

impl LevenshteinMatcher {
    /// Create a new matcher for the given word.
    pub fn new<S: Into<String>>(word: S) -> Self {
        let word = word.into();
        let word_chars = word.chars().collect();
        LevenshteinMatcher { word, word_chars }
    }

    /// Get the word candidates are compared against.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Distance to `candidate`, or `None` once it is known to exceed `bound`.
    pub fn distance_within(&self, candidate: &str, bound: usize) -> Option<usize> {
        let candidate: Vec<char> = candidate.chars().collect();
        let len1 = self.word_chars.len();
        let len2 = candidate.len();

        if len1.abs_diff(len2) > bound {
            return None;
        }
        if len1 == 0 || len2 == 0 {
            return Some(len1.max(len2));
        }

        let mut prev_row: Vec<usize> = (0..=len2).collect();
        let mut curr_row = vec![0; len2 + 1];

        for i in 1..=len1 {
            curr_row[0] = i;
            let mut min_in_row = i;

            for j in 1..=len2 {
                let cost = usize::from(self.word_chars[i - 1] != candidate[j - 1]);
                curr_row[j] = min(
                    min(prev_row[j] + 1, curr_row[j - 1] + 1),
                    prev_row[j - 1] + cost,
                );
                min_in_row = min(min_in_row, curr_row[j]);
            }

            if min_in_row > bound {
                return None;
            }

            std::mem::swap(&mut prev_row, &mut curr_row);
        }

        Some(prev_row[len2]).filter(|&distance| distance <= bound)
    }
}
