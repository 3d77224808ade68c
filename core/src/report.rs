//! Reductions from accumulated statistics to summary numbers.
//!
//! Reports are read-only snapshots. A report built from an empty
//! accumulator is all zeros rather than an error.
//!
//! Baselines for a truly uniform permutation of 52 cards:
//!   - uniformity χ², df = 51  → mean ≈ 51
//!   - adjacency χ²,  df = 50  → mean ≈ 50
//!   - mean displacement       → ≈ 17.33

use crate::{
    config::TestSelection,
    stats::ShuffleStats,
    types::DECK_SIZE,
};
use serde::{Deserialize, Serialize};

pub const UNIFORMITY_EXPECTED: f64 = (DECK_SIZE - 1) as f64;
pub const ADJACENCY_EXPECTED: f64 = (DECK_SIZE - 2) as f64;
pub const DISPLACEMENT_EXPECTED: f64 = 17.33;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UniformityReport {
    pub mean_chi_sq: f64,
    pub max_chi_sq:  f64,
    /// χ² per card id. Empty when nothing was observed.
    pub chi_sq_card: Vec<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdjacencyReport {
    pub mean_chi_sq: f64,
    pub max_chi_sq:  f64,
    /// χ² per card id; zero for cards never seen with a follower.
    pub chi_sq_card: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DisplacementReport {
    pub mean: f64,
}

/// Per-card χ² of observed positions against a uniform spread.
///
/// The expected count is recorded decks / 52, not `shuffle_count / 52`:
/// a k-step sequence records one deck per trial, not k.
pub fn report_uniformity(stats: &ShuffleStats) -> UniformityReport {
    let mut report = UniformityReport::default();

    // Every card is counted once per recorded deck, so any row total
    // is the number of uniformity observations.
    let total: u64 = stats.pos_freq[0].iter().sum();
    if total == 0 {
        return report;
    }
    let expected = total as f64 / DECK_SIZE as f64;

    let mut sum = 0.0;
    report.chi_sq_card = Vec::with_capacity(DECK_SIZE);
    for row in stats.pos_freq.iter() {
        let chi_sq: f64 = row
            .iter()
            .map(|&observed| {
                let dev = observed as f64 - expected;
                dev * dev / expected
            })
            .sum();
        report.max_chi_sq = report.max_chi_sq.max(chi_sq);
        report.chi_sq_card.push(chi_sq);
        sum += chi_sq;
    }
    report.mean_chi_sq = sum / DECK_SIZE as f64;
    report
}

/// Per-card χ² over the 51 possible followers (self excluded).
/// Cards with no recorded follower contribute zero.
pub fn report_adjacency(stats: &ShuffleStats) -> AdjacencyReport {
    let mut report = AdjacencyReport::default();
    if stats.observations() == 0 {
        return report;
    }

    let mut sum = 0.0;
    report.chi_sq_card = vec![0.0; DECK_SIZE];
    for (card, row) in stats.adj_freq.iter().enumerate() {
        let row_total: u64 = row.iter().sum::<u64>() - row[card];
        if row_total == 0 {
            continue;
        }
        let expected = row_total as f64 / (DECK_SIZE - 1) as f64;

        let chi_sq: f64 = row
            .iter()
            .enumerate()
            .filter(|&(follower, _)| follower != card)
            .map(|(_, &observed)| {
                let dev = observed as f64 - expected;
                dev * dev / expected
            })
            .sum();
        report.chi_sq_card[card] = chi_sq;
        report.max_chi_sq = report.max_chi_sq.max(chi_sq);
        sum += chi_sq;
    }
    report.mean_chi_sq = sum / DECK_SIZE as f64;
    report
}

/// Weighted mean of the displacement histogram.
pub fn report_displacement(stats: &ShuffleStats) -> DisplacementReport {
    let total = stats.displacement_samples();
    if total == 0 {
        return DisplacementReport::default();
    }
    let weighted: u64 = stats
        .disp_hist
        .iter()
        .enumerate()
        .map(|(d, &n)| d as u64 * n)
        .sum();
    DisplacementReport { mean: weighted as f64 / total as f64 }
}

/// The reports of the enabled tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetricReports {
    pub uniformity:   Option<UniformityReport>,
    pub adjacency:    Option<AdjacencyReport>,
    pub displacement: Option<DisplacementReport>,
}

impl MetricReports {
    pub fn from_stats(stats: &ShuffleStats, tests: TestSelection) -> Self {
        Self {
            uniformity:   tests.uniformity.then(|| report_uniformity(stats)),
            adjacency:    tests.adjacency.then(|| report_adjacency(stats)),
            displacement: tests.mixing.then(|| report_displacement(stats)),
        }
    }
}
