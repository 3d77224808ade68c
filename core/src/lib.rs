//! ShuffleLab core: human card-shuffle models and the search for the
//! shuffle sequence that best approximates a uniform permutation.
//!
//! Data flow:
//!   ExperimentConfig → ShuffleSearch → (per candidate) DeckContext
//!   → shuffle models → ShuffleStats → reports → score → best sequence.

pub mod baseline;
pub mod config;
pub mod deck;
pub mod error;
pub mod report;
pub mod rng;
pub mod sampler;
pub mod search;
pub mod sequence;
pub mod shuffle;
pub mod stats;
pub mod types;
