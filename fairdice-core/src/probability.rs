//! Pairwise win probabilities for dice with arbitrary faces.
//!
//! A face of die A "wins" against a face of die B only when it is strictly
//! greater. Ties count for neither side, so `win_probability(a, b) +
//! win_probability(b, a) + tie_probability(a, b) == 1`.

use crate::Die;
use serde::{Deserialize, Serialize};

/// Probability that a uniformly random face of `a` beats a uniformly random face of `b`.
pub fn win_probability(a: &Die, b: &Die) -> f64 {
    let wins = count_pairs(a, b, |x, y| x > y);
    wins as f64 / pair_count(a, b)
}

/// Probability that random faces of `a` and `b` are equal.
pub fn tie_probability(a: &Die, b: &Die) -> f64 {
    let ties = count_pairs(a, b, |x, y| x == y);
    ties as f64 / pair_count(a, b)
}

fn count_pairs(a: &Die, b: &Die, pred: impl Fn(i64, i64) -> bool) -> usize {
    a.faces()
        .iter()
        .map(|&x| b.faces().iter().filter(|&&y| pred(x, y)).count())
        .sum()
}

fn pair_count(a: &Die, b: &Die) -> f64 {
    (a.face_count() * b.face_count()) as f64
}

/// All-pairs win probabilities. Cell `(i, j)` is `win_probability(dice[i], dice[j])`,
/// the diagonal included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityMatrix {
    cells: Vec<Vec<f64>>,
}

impl ProbabilityMatrix {
    pub fn calculate(dice: &[Die]) -> Self {
        let cells = dice
            .iter()
            .map(|a| dice.iter().map(|b| win_probability(a, b)).collect())
            .collect();
        Self { cells }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.cells.get(i).and_then(|row| row.get(j)).copied()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.cells
    }

    /// True when die `i` beats die `j` more often than not.
    pub fn beats(&self, i: usize, j: usize) -> bool {
        self.get(i, j).is_some_and(|p| p > 0.5)
    }

    /// For each die, the index of some die that beats it, if any.
    pub fn counters(&self) -> Vec<Option<usize>> {
        (0..self.size())
            .map(|j| (0..self.size()).find(|&i| i != j && self.beats(i, j)))
            .collect()
    }
}
