//! Pairwise win probabilities between face-sets.

use super::{DiceConfig, FaceSet};

/// Probability that one roll of `a` shows a strictly higher face than one roll of `b`
pub fn win_probability(a: &FaceSet, b: &FaceSet) -> f64 {
    let wins = a
        .faces()
        .iter()
        .flat_map(|x| b.faces().iter().map(move |y| x > y))
        .filter(|&win| win)
        .count();
    wins as f64 / (a.faces().len() * b.faces().len()) as f64
}

/// Win probability of every face-set (row) against every other (column)
#[derive(Clone, Debug, PartialEq)]
pub struct ProbabilityTable {
    rows: Vec<Vec<f64>>,
}

impl ProbabilityTable {
    pub fn new(config: &DiceConfig) -> Self {
        let sets = config.face_sets();
        let rows = sets
            .iter()
            .map(|a| sets.iter().map(|b| win_probability(a, b)).collect())
            .collect();
        Self { rows }
    }

    /// Number of face-sets on each side
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Probability that face-set `row` beats face-set `col`
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.rows.get(row)?.get(col).copied()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
}
