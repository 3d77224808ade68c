//! Sequence enumeration, scoring and the search engine.

use approx::assert_relative_eq;
use shufflelab_core::{
    config::{Enumeration, Execution, ExperimentConfig, ScoreWeights, TestSelection},
    report::{AdjacencyReport, DisplacementReport, MetricReports, UniformityReport},
    search::{score, CancelToken, ShuffleSearch},
    sequence::{SequenceSpace, ShuffleSequence},
    shuffle::ShuffleKind::{self, *},
};

fn config(k_max: usize, trials: usize) -> ExperimentConfig {
    ExperimentConfig { k_max, trials, seed: 99, ..ExperimentConfig::default() }
}

fn reports(uniformity: f64, adjacency: f64, displacement: f64) -> MetricReports {
    MetricReports {
        uniformity: Some(UniformityReport { mean_chi_sq: uniformity, ..Default::default() }),
        adjacency: Some(AdjacencyReport { mean_chi_sq: adjacency, ..Default::default() }),
        displacement: Some(DisplacementReport { mean: displacement }),
    }
}

// ── Enumeration ──────────────────────────────────────────────────────────────

#[test]
fn candidate_counts() {
    assert_eq!(SequenceSpace::human(1, Enumeration::AllLengths).len(), 4);
    assert_eq!(SequenceSpace::human(2, Enumeration::AllLengths).len(), 20);
    assert_eq!(SequenceSpace::human(2, Enumeration::FixedLength).len(), 16);
    assert_eq!(SequenceSpace::human(8, Enumeration::FixedLength).len(), 65_536);
    assert_eq!(SequenceSpace::human(8, Enumeration::AllLengths).len(), 87_380);
}

#[test]
fn enumeration_is_lexicographic_within_each_length() {
    let space = SequenceSpace::human(2, Enumeration::AllLengths);
    let seq = |steps: &[ShuffleKind]| Some(ShuffleSequence(steps.to_vec()));

    assert_eq!(space.get(0), seq(&[Cut]));
    assert_eq!(space.get(1), seq(&[Riffle]));
    assert_eq!(space.get(3), seq(&[Overhand]));
    assert_eq!(space.get(4), seq(&[Cut, Cut]));
    assert_eq!(space.get(5), seq(&[Cut, Riffle]));
    assert_eq!(space.get(8), seq(&[Riffle, Cut]));
    assert_eq!(space.get(19), seq(&[Overhand, Overhand]));
    assert_eq!(space.get(20), None);
    assert_eq!(space.iter().count(), 20);
}

#[test]
#[should_panic(expected = "k_max")]
fn space_rejects_lengths_beyond_the_limit() {
    SequenceSpace::human(40, Enumeration::AllLengths);
}

#[test]
#[should_panic(expected = "k_max")]
fn space_rejects_empty_lengths() {
    SequenceSpace::human(0, Enumeration::FixedLength);
}

#[test]
fn fixed_length_space_skips_shorter_sequences() {
    let space = SequenceSpace::human(3, Enumeration::FixedLength);
    assert!(space.iter().all(|s| s.len() == 3));
    assert_eq!(space.get(0), Some(ShuffleSequence(vec![Cut, Cut, Cut])));
}

#[test]
fn sequence_label_joins_steps() {
    let s = ShuffleSequence(vec![Riffle, Riffle, Cut]);
    assert_eq!(s.label(), "Riffle → Riffle → Cut");
}

// ── Scoring ──────────────────────────────────────────────────────────────────

#[test]
fn score_is_zero_on_target() {
    let w = ScoreWeights::default();
    let r = reports(w.uniformity_target, w.adjacency_target, w.displacement_target);
    assert_eq!(score(&r, &w), 0.0);
}

#[test]
fn score_is_zero_with_no_metric_enabled() {
    assert_eq!(score(&MetricReports::default(), &ScoreWeights::default()), 0.0);
}

#[test]
fn score_normalises_by_enabled_weight() {
    let w = ScoreWeights::default();
    // One standard deviation off on uniformity only.
    let off = w.uniformity_target + 1.0 / w.uniformity_inv_stddev;
    let all = reports(off, w.adjacency_target, w.displacement_target);
    let expected = w.uniformity_weight
        / (w.uniformity_weight + w.adjacency_weight + w.displacement_weight);
    assert_relative_eq!(score(&all, &w), expected, epsilon = 1e-9);

    let alone = MetricReports { adjacency: None, displacement: None, ..all };
    assert_relative_eq!(score(&alone, &w), 1.0, epsilon = 1e-9);
}

#[test]
fn well_mixed_sequence_scores_below_a_single_cut() {
    let search = ShuffleSearch::new(config(1, 100)).unwrap();
    let cut = search.evaluate(0, ShuffleSequence(vec![Cut]));
    let riffles = search.evaluate(1, ShuffleSequence(vec![Riffle; 7]));
    assert!(riffles.score < cut.score, "{} vs {}", riffles.score, cut.score);
}

// ── Engine ───────────────────────────────────────────────────────────────────

#[test]
fn invalid_config_is_rejected() {
    assert!(ShuffleSearch::new(config(0, 10)).is_err());
    assert!(ShuffleSearch::new(config(9, 10)).is_err());
    assert!(ShuffleSearch::new(config(2, 0)).is_err());
    assert!(ShuffleSearch::new(config(2, 101)).is_err());
}

#[test]
fn run_evaluates_every_candidate() {
    for enumeration in [Enumeration::AllLengths, Enumeration::FixedLength] {
        let cfg = ExperimentConfig { enumeration, ..config(2, 3) };
        let outcome = ShuffleSearch::new(cfg).unwrap().run();
        let expected = if enumeration == Enumeration::AllLengths { 20 } else { 16 };
        assert_eq!(outcome.total, expected);
        assert_eq!(outcome.evaluated, expected);
        assert!(!outcome.cancelled);
        let best = outcome.best.expect("best candidate");
        assert!(best.ordinal < expected);
        assert!(best.score.is_finite());
    }
}

#[test]
fn default_parallel_search_completes() {
    let cfg = config(4, 5);
    assert_eq!(cfg.execution, Execution::Parallel);
    let outcome = ShuffleSearch::new(cfg).unwrap().run();
    assert_eq!(outcome.evaluated, 340);
    assert!(!outcome.cancelled);
    let best = outcome.best.as_ref().expect("best candidate");
    assert_eq!(best.context.stats.observations(), 5);
    assert!(outcome.reports().is_some());
}

#[test]
fn evaluation_records_one_observation_per_trial() {
    let search = ShuffleSearch::new(config(3, 12)).unwrap();
    let seq = ShuffleSequence(vec![Riffle, Hindu, Cut]);
    let best = search.evaluate(7, seq);
    assert_eq!(best.context.stats.observations(), 12);
    assert_eq!(best.context.shuffle_count(), 36);
}

#[test]
fn ties_keep_the_first_enumerated_candidate() {
    for execution in [Execution::Sequential, Execution::Parallel] {
        let cfg = ExperimentConfig { tests: TestSelection::NONE, execution, ..config(3, 2) };
        let outcome = ShuffleSearch::new(cfg).unwrap().run();
        let best = outcome.best.as_ref().expect("best candidate");
        assert_eq!(best.ordinal, 0, "{execution:?}");
        assert_eq!(best.sequence, ShuffleSequence(vec![Cut]));
        assert_eq!(best.score, 0.0);
        assert_eq!(outcome.reports(), Some(MetricReports::default()));
    }
}

#[test]
fn cancelled_search_stops_early() {
    let cancel = CancelToken::new();
    let search = ShuffleSearch::new(config(4, 5)).unwrap().with_cancel_token(cancel.clone());
    cancel.cancel();
    assert!(search.cancel_token().is_cancelled());

    let outcome = search.run();
    assert!(outcome.cancelled);
    assert!(outcome.evaluated < outcome.total);
    assert!(outcome.best.is_none());
    assert!(outcome.reports().is_none());
}
