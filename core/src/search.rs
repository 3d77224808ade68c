//! The sequence search engine.
//!
//! EVALUATION ORDER (per candidate, fixed):
//!   1. Build a fresh DeckContext on the candidate's own RNG stream.
//!   2. For each trial: reset to sorted order, apply every shuffle of the
//!      sequence in order, then record one observation.
//!   3. Reduce the accumulated statistics into the enabled reports.
//!   4. Score the reports; lower is closer to a uniform permutation.
//!
//! RULES:
//!   - Candidate RNG streams derive from (seed, global ordinal), so the
//!     outcome does not depend on execution order or thread count.
//!   - The best candidate is the minimum score; ties keep the lowest
//!     ordinal (the first one enumerated).
//!   - Cancellation is checked before each candidate, never mid-candidate.

use crate::{
    config::{Execution, ExperimentConfig, ScoreWeights, TestSelection},
    deck::DeckContext,
    error::ShuffleResult,
    report::MetricReports,
    rng::ShuffleRng,
    sequence::{SequenceSpace, ShuffleSequence},
    shuffle::ShuffleTables,
};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::sync::{
    atomic::{AtomicBool, Ordering as AtomicOrdering},
    Arc,
};

// ── Scoring ──────────────────────────────────────────────────────────────────

/// Weighted squared z-score of every enabled metric, normalised by the
/// enabled weight. Zero when every metric hits its target, and zero by
/// convention when no metric is enabled.
pub fn score(reports: &MetricReports, weights: &ScoreWeights) -> f64 {
    let terms = [
        reports.uniformity.as_ref().map(|r| {
            (r.mean_chi_sq, weights.uniformity_target, weights.uniformity_inv_stddev, weights.uniformity_weight)
        }),
        reports.adjacency.as_ref().map(|r| {
            (r.mean_chi_sq, weights.adjacency_target, weights.adjacency_inv_stddev, weights.adjacency_weight)
        }),
        reports.displacement.map(|r| {
            (r.mean, weights.displacement_target, weights.displacement_inv_stddev, weights.displacement_weight)
        }),
    ];

    let mut total = 0.0;
    let mut weight_sum = 0.0;
    for (mean, target, inv_stddev, weight) in terms.into_iter().flatten() {
        let z = (mean - target) * inv_stddev;
        total += weight * z * z;
        weight_sum += weight;
    }

    if weight_sum > 0.0 { total / weight_sum } else { 0.0 }
}

// ── Cancellation ─────────────────────────────────────────────────────────────

/// Shared stop flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

// ── Results ──────────────────────────────────────────────────────────────────

/// One evaluated candidate together with the context that produced it.
#[derive(Debug, Clone)]
pub struct BestSequence {
    pub ordinal:  u64,
    pub sequence: ShuffleSequence,
    pub score:    f64,
    /// Final deck of the last trial plus the accumulated statistics.
    pub context:  DeckContext,
}

impl BestSequence {
    fn beats(&self, other: &BestSequence) -> bool {
        match self.score.total_cmp(&other.score) {
            Ordering::Less    => true,
            Ordering::Equal   => self.ordinal < other.ordinal,
            Ordering::Greater => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// `None` only when the search was cancelled before any candidate ran.
    pub best:      Option<BestSequence>,
    pub evaluated: u64,
    pub total:     u64,
    pub cancelled: bool,
    pub tests:     TestSelection,
}

impl SearchOutcome {
    /// Reports of the enabled tests for the best candidate.
    pub fn reports(&self) -> Option<MetricReports> {
        self.best
            .as_ref()
            .map(|b| MetricReports::from_stats(&b.context.stats, self.tests))
    }
}

/// Running reduction: count of evaluated candidates and the best so far.
#[derive(Debug, Default)]
struct Tally {
    evaluated: u64,
    best:      Option<BestSequence>,
}

impl Tally {
    fn offer(mut self, candidate: BestSequence) -> Self {
        self.evaluated += 1;
        let improves = self.best.as_ref().map_or(true, |b| candidate.beats(b));
        if improves {
            log::debug!(
                "new best #{} [{}] score={:.4}",
                candidate.ordinal,
                candidate.sequence,
                candidate.score
            );
            self.best = Some(candidate);
        }
        self
    }

    fn merge(self, other: Tally) -> Tally {
        let best = match (self.best, other.best) {
            (Some(a), Some(b)) => Some(if b.beats(&a) { b } else { a }),
            (a, b) => a.or(b),
        };
        Tally { evaluated: self.evaluated + other.evaluated, best }
    }
}

// ── Engine ───────────────────────────────────────────────────────────────────

pub struct ShuffleSearch {
    config: ExperimentConfig,
    tables: ShuffleTables,
    space:  SequenceSpace,
    cancel: CancelToken,
}

impl ShuffleSearch {
    /// Validate the configuration and build every distribution table once.
    pub fn new(config: ExperimentConfig) -> ShuffleResult<Self> {
        config.validate()?;
        let tables = ShuffleTables::build(&config.models)?;
        let space = SequenceSpace::human(config.k_max, config.enumeration);
        Ok(Self { config, tables, space, cancel: CancelToken::new() })
    }

    /// Use an externally owned cancellation flag.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn tables(&self) -> &ShuffleTables {
        &self.tables
    }

    pub fn space(&self) -> &SequenceSpace {
        &self.space
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run every trial of one sequence on its own stream.
    pub fn evaluate(&self, ordinal: u64, sequence: ShuffleSequence) -> BestSequence {
        let cfg = &self.config;
        let mut ctx = DeckContext::new(ShuffleRng::for_stream(cfg.seed, ordinal));

        for _ in 0..cfg.trials {
            ctx.reset();
            for &kind in sequence.steps() {
                ctx.apply(kind, &self.tables);
            }
            ctx.observe(cfg.tests);
        }

        let reports = MetricReports::from_stats(&ctx.stats, cfg.tests);
        let score = score(&reports, &cfg.score);
        log::debug!("candidate #{ordinal} [{sequence}] score={score:.4}");

        BestSequence { ordinal, sequence, score, context: ctx }
    }

    fn evaluate_ordinal(&self, ordinal: u64) -> Option<BestSequence> {
        if self.cancel.is_cancelled() {
            return None;
        }
        let sequence = self.space.get(ordinal)?;
        Some(self.evaluate(ordinal, sequence))
    }

    /// Evaluate the whole space and keep the best candidate.
    pub fn run(&self) -> SearchOutcome {
        let total = self.space.len();
        log::info!(
            "search: {total} candidates, k_max={}, trials={}, tests={:?}, {:?}",
            self.config.k_max,
            self.config.trials,
            self.config.tests.labels(),
            self.config.execution
        );

        let tally = match self.config.execution {
            Execution::Sequential => {
                let mut tally = Tally::default();
                for ordinal in 0..total {
                    match self.evaluate_ordinal(ordinal) {
                        Some(candidate) => tally = tally.offer(candidate),
                        None => break,
                    }
                }
                tally
            }
            Execution::Parallel => (0..total)
                .into_par_iter()
                .filter_map(|ordinal| self.evaluate_ordinal(ordinal))
                .fold(Tally::default, Tally::offer)
                .reduce(Tally::default, Tally::merge),
        };

        let cancelled = tally.evaluated < total;
        if cancelled {
            log::warn!("search cancelled after {} of {total} candidates", tally.evaluated);
        }
        match &tally.best {
            Some(best) => log::info!(
                "search: best #{} [{}] score={:.4}",
                best.ordinal,
                best.sequence,
                best.score
            ),
            None => log::info!("search: no candidate evaluated"),
        }

        SearchOutcome {
            best: tally.best,
            evaluated: tally.evaluated,
            total,
            cancelled,
            tests: self.config.tests,
        }
    }
}
