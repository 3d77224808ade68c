//! Candidate shuffle sequences and their enumeration.
//!
//! A sequence of length k over an alphabet of size b is the k-digit
//! base-b number whose most significant digit is the first shuffle.
//! Counting upward therefore enumerates lexicographically, with the last
//! position changing fastest.
//!
//! Global ordinals run across lengths in increasing order: all length-1
//! sequences, then all length-2 sequences, and so on. Any ordinal maps
//! back to its sequence without replaying the enumeration, so ordinal
//! ranges can be handed to independent workers.

use crate::{
    config::{Enumeration, K_MAX, K_MIN},
    shuffle::ShuffleKind,
};
use serde::{Deserialize, Serialize};

/// An ordered list of shuffles applied to a sorted deck.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShuffleSequence(pub Vec<ShuffleKind>);

impl ShuffleSequence {
    pub fn steps(&self) -> &[ShuffleKind] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Cut → Riffle → Hindu`.
    pub fn label(&self) -> String {
        self.0
            .iter()
            .map(|s| s.label())
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

impl std::fmt::Display for ShuffleSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Every candidate a search will evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSpace {
    alphabet: Vec<ShuffleKind>,
    /// Inclusive range of enumerated lengths.
    min_len:  usize,
    max_len:  usize,
}

impl SequenceSpace {
    /// Panics when `k_max` is outside `K_MIN..=K_MAX`.
    pub fn new(alphabet: &[ShuffleKind], k_max: usize, enumeration: Enumeration) -> Self {
        assert!(!alphabet.is_empty(), "alphabet must not be empty");
        assert!(
            (K_MIN..=K_MAX).contains(&k_max),
            "k_max {k_max} outside {K_MIN}..={K_MAX}"
        );
        let min_len = match enumeration {
            Enumeration::AllLengths  => 1,
            Enumeration::FixedLength => k_max,
        };
        Self { alphabet: alphabet.to_vec(), min_len, max_len: k_max }
    }

    /// The standard search space over the four human shuffles.
    pub fn human(k_max: usize, enumeration: Enumeration) -> Self {
        Self::new(&ShuffleKind::HUMAN, k_max, enumeration)
    }

    pub fn alphabet(&self) -> &[ShuffleKind] {
        &self.alphabet
    }

    fn base(&self) -> u64 {
        self.alphabet.len() as u64
    }

    /// Number of candidates of exactly `k` shuffles.
    pub fn count_of_length(&self, k: usize) -> u64 {
        self.base().pow(k as u32)
    }

    /// Total candidates across all enumerated lengths.
    pub fn len(&self) -> u64 {
        (self.min_len..=self.max_len)
            .map(|k| self.count_of_length(k))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The candidate at a global ordinal, or `None` past the end.
    pub fn get(&self, ordinal: u64) -> Option<ShuffleSequence> {
        let mut rest = ordinal;
        for k in self.min_len..=self.max_len {
            let count = self.count_of_length(k);
            if rest < count {
                return Some(self.decode(k, rest));
            }
            rest -= count;
        }
        None
    }

    /// Decode a within-length ordinal as k base-b digits, most significant first.
    fn decode(&self, k: usize, mut value: u64) -> ShuffleSequence {
        let base = self.base();
        let mut steps = vec![self.alphabet[0]; k];
        for slot in steps.iter_mut().rev() {
            *slot = self.alphabet[(value % base) as usize];
            value /= base;
        }
        ShuffleSequence(steps)
    }

    /// All candidates in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = ShuffleSequence> + '_ {
        (0..self.len()).filter_map(move |ordinal| self.get(ordinal))
    }
}
