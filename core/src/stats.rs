//! Statistical observers.
//!
//! Each observer answers one question about the decks recorded so far:
//!   - uniformity:   does every card land in every position equally often?
//!   - adjacency:    do particular cards keep following each other?
//!   - displacement: how far did cards travel from their sorted position?
//!
//! RULE: Observation happens once per completed sequence per trial,
//! never after individual shuffle steps.
//!
//! `ShuffleStats` is a plain aggregate. Two aggregates built from
//! disjoint trials merge by element-wise addition, so trials may be split
//! across workers and combined in any order.
//!
//! RULE: the 52x52 matrices live on the heap. Aggregates travel by value
//! through rayon folds and must stay small on worker stacks.

use crate::{
    config::TestSelection,
    types::{Deck, DECK_SIZE},
};

type Matrix = [[u64; DECK_SIZE]; DECK_SIZE];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleStats {
    /// `pos_freq[card][position]`.
    pub pos_freq:  Box<Matrix>,
    /// `adj_freq[card][follower]`.
    pub adj_freq:  Box<Matrix>,
    /// `disp_hist[distance]`, distance = |position - card|.
    pub disp_hist: [u64; DECK_SIZE],
    observations:  u64,
}

impl Default for ShuffleStats {
    fn default() -> Self {
        Self {
            pos_freq:     zeroed_matrix(),
            adj_freq:     zeroed_matrix(),
            disp_hist:    [0; DECK_SIZE],
            observations: 0,
        }
    }
}

impl ShuffleStats {
    /// Number of decks recorded.
    pub fn observations(&self) -> u64 {
        self.observations
    }

    pub fn observe(&mut self, deck: &Deck, tests: TestSelection) {
        self.observations += 1;
        if tests.uniformity {
            self.observe_uniformity(deck);
        }
        if tests.adjacency {
            self.observe_adjacency(deck);
        }
        if tests.mixing {
            self.observe_displacement(deck);
        }
    }

    pub fn observe_uniformity(&mut self, deck: &Deck) {
        for (pos, &card) in deck.iter().enumerate() {
            self.pos_freq[card as usize][pos] += 1;
        }
    }

    pub fn observe_adjacency(&mut self, deck: &Deck) {
        for pair in deck.windows(2) {
            self.adj_freq[pair[0] as usize][pair[1] as usize] += 1;
        }
    }

    pub fn observe_displacement(&mut self, deck: &Deck) {
        for (pos, &card) in deck.iter().enumerate() {
            self.disp_hist[pos.abs_diff(card as usize)] += 1;
        }
    }

    /// Fold another aggregate into this one.
    pub fn merge(&mut self, other: &ShuffleStats) {
        for (row, other_row) in self.pos_freq.iter_mut().zip(other.pos_freq.iter()) {
            add_assign(row, other_row);
        }
        for (row, other_row) in self.adj_freq.iter_mut().zip(other.adj_freq.iter()) {
            add_assign(row, other_row);
        }
        add_assign(&mut self.disp_hist, &other.disp_hist);
        self.observations += other.observations;
    }

    /// Total displacement samples (52 per displacement observation).
    pub fn displacement_samples(&self) -> u64 {
        self.disp_hist.iter().sum()
    }
}

fn zeroed_matrix() -> Box<Matrix> {
    Box::new([[0; DECK_SIZE]; DECK_SIZE])
}

fn add_assign(dst: &mut [u64; DECK_SIZE], src: &[u64; DECK_SIZE]) {
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d += s;
    }
}
