//! Discrete inverse-CDF sampling over deck indices.
//!
//! A table is built once from a truncated Gaussian weight profile over
//! `[min, max)` and then sampled many times in hot loops. Every table has
//! exactly DECK_SIZE entries; indices outside `[min, max)` carry zero weight.

use crate::{
    error::{ShuffleError, ShuffleResult},
    rng::ShuffleRng,
    types::DECK_SIZE,
};
use serde::{Deserialize, Serialize};

/// Target sum of the scaled integer weights. Truncation leaves the real
/// total slightly below this; sampling only needs monotone bounds.
pub const TOTAL_WEIGHT: f64 = 1000.0;

/// Shape of one Gaussian weight profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CdfParams {
    /// First index with non-zero weight.
    pub min:    usize,
    /// One past the last index with non-zero weight.
    pub max:    usize,
    /// Peak of the profile. May sit outside `[min, max)` for a one-sided shape.
    pub centre: f64,
    /// Standard deviation, in cards.
    pub spread: f64,
}

impl CdfParams {
    pub const fn new(min: usize, max: usize, centre: f64, spread: f64) -> Self {
        Self { min, max, centre, spread }
    }

    pub fn validate(&self, name: &'static str) -> ShuffleResult<()> {
        let fail = |reason: String| Err(ShuffleError::InvalidDistribution { name, reason });
        if self.min >= self.max {
            return fail(format!("empty range [{}, {})", self.min, self.max));
        }
        if self.max > DECK_SIZE {
            return fail(format!("max {} exceeds deck size {DECK_SIZE}", self.max));
        }
        if !self.centre.is_finite() {
            return fail(format!("centre {} is not finite", self.centre));
        }
        if !(self.spread.is_finite() && self.spread > 0.0) {
            return fail(format!("spread {} must be positive", self.spread));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdfTable {
    cumulative: [u32; DECK_SIZE],
}

impl CdfTable {
    /// Build the cumulative table for `params`.
    pub fn build(name: &'static str, params: CdfParams) -> ShuffleResult<Self> {
        params.validate(name)?;

        let mut weights = [0.0f64; DECK_SIZE];
        let mut sum = 0.0;
        for (k, w) in weights.iter_mut().enumerate().take(params.max).skip(params.min) {
            let d = k as f64 - params.centre;
            *w = (-(d * d) / (2.0 * params.spread * params.spread)).exp();
            sum += *w;
        }
        if sum <= 0.0 {
            return Err(ShuffleError::InvalidDistribution {
                name,
                reason: "every weight underflows to zero".into(),
            });
        }

        let scale = TOTAL_WEIGHT / sum;
        let mut cumulative = [0u32; DECK_SIZE];
        let mut running = 0u32;
        for (slot, w) in cumulative.iter_mut().zip(weights.iter()) {
            running += (w * scale) as u32;
            *slot = running;
        }

        let table = Self { cumulative };
        if table.total() == 0 {
            return Err(ShuffleError::InvalidDistribution {
                name,
                reason: "every weight truncates to zero".into(),
            });
        }
        Ok(table)
    }

    /// Sum of all integer weights (the last cumulative entry).
    pub fn total(&self) -> u32 {
        self.cumulative[DECK_SIZE - 1]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.cumulative
    }

    /// Per-index integer weights recovered from the running sum.
    pub fn weights(&self) -> [u32; DECK_SIZE] {
        let mut out = [0u32; DECK_SIZE];
        let mut prev = 0;
        for (w, &c) in out.iter_mut().zip(self.cumulative.iter()) {
            *w = c - prev;
            prev = c;
        }
        out
    }

    /// Draw an index: first k with `cumulative[k] > R`, R uniform in [0, total).
    pub fn sample(&self, rng: &mut ShuffleRng) -> usize {
        let r = rng.bounded(self.total());
        self.cumulative
            .iter()
            .position(|&c| r < c)
            .unwrap_or(DECK_SIZE - 1)
    }
}
