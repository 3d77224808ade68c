//! Uniform-permutation calibration.
//!
//! Runs the Fisher–Yates baseline to measure what the reports look like
//! for a truly uniform shuffle. Trials are split into chunks, each on its
//! own stream and accumulator; the accumulators are merged at the end.

use crate::{
    config::TestSelection,
    deck::DeckContext,
    error::{ShuffleError, ShuffleResult},
    report::MetricReports,
    rng::{derive_seed, ShuffleRng},
    stats::ShuffleStats,
};
use rayon::prelude::*;

/// Stream index reserved for calibration. Chunk streams derive from
/// `derive_seed(seed, CALIBRATION_DOMAIN)`, never from the master seed
/// directly. For chunk indices below 100 000 the derived seeds differ from
/// every search ordinal's seed (up to 4^1 + .. + 4^8 candidates).
pub const CALIBRATION_DOMAIN: u64 = u64::MAX;

#[derive(Debug, Clone)]
pub struct Calibration {
    pub stats:   ShuffleStats,
    pub reports: MetricReports,
}

/// Shuffle a sorted deck uniformly `trials` times across `chunks` workers.
pub fn calibrate_uniform(trials: u64, chunks: u64, seed: u64) -> ShuffleResult<Calibration> {
    if trials == 0 {
        return Err(ShuffleError::OutOfRange { field: "trials", value: 0, min: 1, max: i64::MAX });
    }
    if chunks == 0 || chunks > trials {
        return Err(ShuffleError::OutOfRange {
            field: "chunks",
            value: chunks as i64,
            min:   1,
            max:   trials as i64,
        });
    }

    let domain_seed = derive_seed(seed, CALIBRATION_DOMAIN);
    let per_chunk = trials / chunks;
    let remainder = trials % chunks;

    let stats = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let n = per_chunk + u64::from(chunk < remainder);
            let mut ctx = DeckContext::new(ShuffleRng::for_stream(domain_seed, chunk));
            for _ in 0..n {
                ctx.reset();
                ctx.uniform_shuffle();
                ctx.observe(TestSelection::ALL);
            }
            ctx.stats
        })
        .reduce(ShuffleStats::default, |mut acc, part| {
            acc.merge(&part);
            acc
        });

    log::debug!("calibration: {} uniform decks over {chunks} chunks", stats.observations());
    let reports = MetricReports::from_stats(&stats, TestSelection::ALL);
    Ok(Calibration { stats, reports })
}
