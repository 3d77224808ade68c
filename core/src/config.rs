//! Experiment configuration.
//!
//! All run parameters are immutable once a search starts. Defaults
//! reproduce the standard experiment; a JSON file may override any
//! subset of fields.

use crate::{
    error::{ShuffleError, ShuffleResult},
    sampler::CdfParams,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const K_MIN: usize = 1;
pub const K_MAX: usize = 8;
pub const TRIALS_MIN: usize = 1;
pub const TRIALS_MAX: usize = 100;

// ── Test toggles ─────────────────────────────────────────────────────────────

/// Which statistical tests run. Disabled tests neither observe nor score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TestSelection {
    pub uniformity: bool,
    pub adjacency:  bool,
    pub mixing:     bool,
}

impl TestSelection {
    pub const ALL: Self = Self { uniformity: true, adjacency: true, mixing: true };
    pub const NONE: Self = Self { uniformity: false, adjacency: false, mixing: false };

    pub fn any(&self) -> bool {
        self.uniformity || self.adjacency || self.mixing
    }

    /// Display names of the enabled tests, in fixed order.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut out = Vec::with_capacity(3);
        if self.uniformity { out.push("Uniformity"); }
        if self.adjacency  { out.push("Adjacency"); }
        if self.mixing     { out.push("Mixing"); }
        out
    }
}

impl Default for TestSelection {
    fn default() -> Self { Self::ALL }
}

// ── Search shape ─────────────────────────────────────────────────────────────

/// Which sequence lengths are enumerated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Enumeration {
    /// Every length from 1 through k_max.
    #[default]
    AllLengths,
    /// Only sequences of exactly k_max shuffles.
    FixedLength,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    Sequential,
    /// Candidates evaluated on the rayon pool.
    #[default]
    Parallel,
}

// ── Scoring ──────────────────────────────────────────────────────────────────

/// Targets and weights of the deviation score. The values are empirical
/// and provisional.
///
/// Each enabled metric contributes `weight * ((mean - target) * inv_stddev)^2`;
/// the sum is divided by the total enabled weight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoreWeights {
    /// χ² with df = 51.
    pub uniformity_target:       f64,
    /// χ² with df = 50.
    pub adjacency_target:        f64,
    /// Mean |position - card| of a uniform 52-card permutation.
    pub displacement_target:     f64,
    /// 1 / sqrt(2 * 51).
    pub uniformity_inv_stddev:   f64,
    /// 1 / sqrt(2 * 50).
    pub adjacency_inv_stddev:    f64,
    /// Empirical std-dev ≈ 3.
    pub displacement_inv_stddev: f64,
    pub uniformity_weight:       f64,
    pub adjacency_weight:        f64,
    pub displacement_weight:     f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            uniformity_target:       51.0,
            adjacency_target:        50.0,
            displacement_target:     17.33,
            uniformity_inv_stddev:   0.099015,
            adjacency_inv_stddev:    0.1,
            displacement_inv_stddev: 0.333333,
            uniformity_weight:       0.25,
            adjacency_weight:        0.7,
            displacement_weight:     0.05,
        }
    }
}

impl ScoreWeights {
    pub fn validate(&self) -> ShuffleResult<()> {
        let fields = [
            ("uniformity_target", self.uniformity_target),
            ("adjacency_target", self.adjacency_target),
            ("displacement_target", self.displacement_target),
            ("uniformity_inv_stddev", self.uniformity_inv_stddev),
            ("adjacency_inv_stddev", self.adjacency_inv_stddev),
            ("displacement_inv_stddev", self.displacement_inv_stddev),
            ("uniformity_weight", self.uniformity_weight),
            ("adjacency_weight", self.adjacency_weight),
            ("displacement_weight", self.displacement_weight),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ShuffleError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

// ── Shuffle model parameters ─────────────────────────────────────────────────

/// One distribution per sampled quantity of each human shuffle model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelParams {
    /// Cut point, concentrated near the middle with a wide spread.
    pub cut:           CdfParams,
    /// Split point of the two riffle packets.
    pub riffle_cut:    CdfParams,
    /// Number of packet pick-ups per hindu shuffle.
    pub hindu_ops:     CdfParams,
    /// Bottom index of the packet lifted in one hindu pick-up.
    pub hindu_cut:     CdfParams,
    /// Cards dropped per hindu drop.
    pub hindu_drop:    CdfParams,
    /// Bottom index of the overhand packet.
    pub overhand_cut:  CdfParams,
    /// Cards dropped per overhand drop.
    pub overhand_drop: CdfParams,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            cut:           CdfParams::new(5, 47, 26.0, 5.0),
            riffle_cut:    CdfParams::new(12, 40, 26.0, 3.6),
            hindu_ops:     CdfParams::new(1, 5, 2.0, 1.2),
            hindu_cut:     CdfParams::new(20, 50, 35.0, 9.0),
            hindu_drop:    CdfParams::new(2, 10, 5.0, 2.5),
            overhand_cut:  CdfParams::new(20, 26, 31.0, 4.0),
            overhand_drop: CdfParams::new(2, 10, 5.0, 2.5),
        }
    }
}

// ── Experiment ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Longest shuffle sequence considered.
    pub k_max:       usize,
    /// Repetitions per candidate sequence.
    pub trials:      usize,
    pub tests:       TestSelection,
    /// Master seed; every candidate derives its own stream from it.
    pub seed:        u64,
    pub enumeration: Enumeration,
    pub execution:   Execution,
    pub score:       ScoreWeights,
    pub models:      ModelParams,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            k_max:       5,
            trials:      50,
            tests:       TestSelection::ALL,
            seed:        42,
            enumeration: Enumeration::AllLengths,
            execution:   Execution::Parallel,
            score:       ScoreWeights::default(),
            models:      ModelParams::default(),
        }
    }
}

impl ExperimentConfig {
    /// Load overrides from a JSON file. Absent fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> ShuffleResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: ExperimentConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ShuffleResult<()> {
        check_range("k_max", self.k_max, K_MIN, K_MAX)?;
        check_range("trials", self.trials, TRIALS_MIN, TRIALS_MAX)?;
        self.score.validate()?;
        let m = &self.models;
        m.cut.validate("cut")?;
        m.riffle_cut.validate("riffle_cut")?;
        m.hindu_ops.validate("hindu_ops")?;
        m.hindu_cut.validate("hindu_cut")?;
        m.hindu_drop.validate("hindu_drop")?;
        m.overhand_cut.validate("overhand_cut")?;
        m.overhand_drop.validate("overhand_drop")?;
        if m.hindu_drop.min == 0 || m.overhand_drop.min == 0 {
            return Err(ShuffleError::InvalidDistribution {
                name: "drop",
                reason: "drop counts must start at 1 or more".into(),
            });
        }
        Ok(())
    }
}

fn check_range(field: &'static str, value: usize, min: usize, max: usize) -> ShuffleResult<()> {
    if value < min || value > max {
        return Err(ShuffleError::OutOfRange {
            field,
            value: value as i64,
            min:   min as i64,
            max:   max as i64,
        });
    }
    Ok(())
}
