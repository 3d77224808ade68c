//! Shuffle selectors and the distribution tables the models sample from.
//!
//! RULE: `ShuffleKind` → algorithm is a fixed one-to-one mapping,
//! implemented once in `DeckContext::apply`.

use crate::{
    config::ModelParams,
    error::ShuffleResult,
    sampler::CdfTable,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ShuffleKind {
    Cut,
    Riffle,
    Hindu,
    Overhand,
    /// Deterministic cut at the midpoint.
    PerfectCut,
    /// Deterministic out-faro.
    PerfectRiffle,
    /// Fisher–Yates baseline. Calibration only.
    Uniform,
}

impl ShuffleKind {
    /// The search alphabet, in enumeration digit order.
    pub const HUMAN: [ShuffleKind; 4] = [Self::Cut, Self::Riffle, Self::Hindu, Self::Overhand];

    pub const ALL: [ShuffleKind; 7] = [
        Self::Cut,
        Self::Riffle,
        Self::Hindu,
        Self::Overhand,
        Self::PerfectCut,
        Self::PerfectRiffle,
        Self::Uniform,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cut           => "Cut",
            Self::Riffle        => "Riffle",
            Self::Hindu         => "Hindu",
            Self::Overhand      => "Overhand",
            Self::PerfectCut    => "PerfectCut",
            Self::PerfectRiffle => "PerfectRiffle",
            Self::Uniform       => "Uniform",
        }
    }
}

impl std::fmt::Display for ShuffleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Every model's distribution table, built once per experiment and
/// shared read-only by all deck contexts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleTables {
    pub cut:           CdfTable,
    pub riffle_cut:    CdfTable,
    pub hindu_ops:     CdfTable,
    pub hindu_cut:     CdfTable,
    pub hindu_drop:    CdfTable,
    pub overhand_cut:  CdfTable,
    pub overhand_drop: CdfTable,
}

impl ShuffleTables {
    pub fn build(params: &ModelParams) -> ShuffleResult<Self> {
        Ok(Self {
            cut:           CdfTable::build("cut", params.cut)?,
            riffle_cut:    CdfTable::build("riffle_cut", params.riffle_cut)?,
            hindu_ops:     CdfTable::build("hindu_ops", params.hindu_ops)?,
            hindu_cut:     CdfTable::build("hindu_cut", params.hindu_cut)?,
            hindu_drop:    CdfTable::build("hindu_drop", params.hindu_drop)?,
            overhand_cut:  CdfTable::build("overhand_cut", params.overhand_cut)?,
            overhand_drop: CdfTable::build("overhand_drop", params.overhand_drop)?,
        })
    }

    /// Named tables, for description output.
    pub fn named(&self) -> [(&'static str, &CdfTable); 7] {
        [
            ("cut", &self.cut),
            ("riffle_cut", &self.riffle_cut),
            ("hindu_ops", &self.hindu_ops),
            ("hindu_cut", &self.hindu_cut),
            ("hindu_drop", &self.hindu_drop),
            ("overhand_cut", &self.overhand_cut),
            ("overhand_drop", &self.overhand_drop),
        ]
    }
}
