//! Deck state and the shuffle models that mutate it.
//!
//! RULES:
//!   - `deck` is a permutation of `0..DECK_SIZE` on entry and exit of
//!     every shuffle. Checked with debug assertions, never at runtime.
//!   - `buffer` is scratch space; its contents are meaningless between calls.
//!   - All randomness comes from the context's own `rng`.
//!   - `stats` accumulate across resets; `reset()` only restores the order.

use crate::{
    config::TestSelection,
    rng::ShuffleRng,
    sampler::CdfTable,
    shuffle::{ShuffleKind, ShuffleTables},
    stats::ShuffleStats,
    types::{is_permutation, Deck, CANONICAL_DECK, DECK_SIZE},
};

const HALF: usize = DECK_SIZE / 2;

/// One simulation unit: a deck, its scratch buffer, its RNG stream and
/// the running statistics of every trial recorded on it.
#[derive(Debug, Clone)]
pub struct DeckContext {
    deck:          Deck,
    buffer:        Deck,
    rng:           ShuffleRng,
    shuffle_count: u64,
    pub stats:     ShuffleStats,
}

impl DeckContext {
    pub fn new(rng: ShuffleRng) -> Self {
        Self::from_deck(CANONICAL_DECK, rng)
    }

    /// Start from an arbitrary ordering. `deck` must be a permutation.
    pub fn from_deck(deck: Deck, rng: ShuffleRng) -> Self {
        debug_assert!(is_permutation(&deck), "initial deck is not a permutation");
        Self {
            deck,
            buffer: [0; DECK_SIZE],
            rng,
            shuffle_count: 0,
            stats: ShuffleStats::default(),
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Individual shuffles applied over the context's lifetime.
    pub fn shuffle_count(&self) -> u64 {
        self.shuffle_count
    }

    /// Restore sorted order. Statistics are kept.
    pub fn reset(&mut self) {
        self.deck = CANONICAL_DECK;
    }

    /// Record the current order into the enabled accumulators.
    pub fn observe(&mut self, tests: TestSelection) {
        self.stats.observe(&self.deck, tests);
    }

    /// Apply one shuffle of the given kind.
    pub fn apply(&mut self, kind: ShuffleKind, tables: &ShuffleTables) {
        self.shuffle_count += 1;
        match kind {
            ShuffleKind::Cut           => self.cut(&tables.cut),
            ShuffleKind::Riffle        => self.riffle(&tables.riffle_cut),
            ShuffleKind::Hindu         => self.hindu(tables),
            ShuffleKind::Overhand      => self.overhand(&tables.overhand_cut, &tables.overhand_drop),
            ShuffleKind::PerfectCut    => self.perfect_cut(HALF),
            ShuffleKind::PerfectRiffle => self.perfect_riffle(),
            ShuffleKind::Uniform       => self.uniform_shuffle(),
        }
        debug_assert!(is_permutation(&self.deck), "{kind} produced a non-permutation");
    }

    // ── Perfect shuffles ─────────────────────────────────────────────────────

    /// Move cards `[cut_point, 52)` above cards `[0, cut_point)`,
    /// keeping the order inside each part. `cut_point` in `[0, 52]`.
    pub fn perfect_cut(&mut self, cut_point: usize) {
        assert!(cut_point <= DECK_SIZE, "cut point {cut_point} beyond deck");
        let lower = DECK_SIZE - cut_point;
        self.buffer[..lower].copy_from_slice(&self.deck[cut_point..]);
        self.buffer[lower..].copy_from_slice(&self.deck[..cut_point]);
        std::mem::swap(&mut self.deck, &mut self.buffer);
    }

    /// Out-faro: cut at the midpoint, then interleave so the original top
    /// half fills even positions and the bottom half fills odd positions.
    /// Eight applications restore any 52-card order.
    pub fn perfect_riffle(&mut self) {
        self.perfect_cut(HALF);
        // deck = [old bottom half | old top half]
        for (n, &card) in self.deck.iter().enumerate() {
            let pos = if n < HALF { 2 * n + 1 } else { 2 * (n - HALF) };
            self.buffer[pos] = card;
        }
        std::mem::swap(&mut self.deck, &mut self.buffer);
    }

    // ── Human shuffles ───────────────────────────────────────────────────────

    /// Single cut at a sampled point.
    pub fn cut(&mut self, cut: &CdfTable) {
        let cut_point = cut.sample(&mut self.rng);
        self.perfect_cut(cut_point);
    }

    /// Gilbert–Shannon–Reeds riffle.
    ///
    /// Split at a sampled point into left `[0, L)` and right `[L, 52)`,
    /// then fill the result bottom-up. Each slot takes the bottom card of
    /// the left packet with probability L / (L + R), where L and R are the
    /// cards still left in each packet.
    pub fn riffle(&mut self, riffle_cut: &CdfTable) {
        let split = riffle_cut.sample(&mut self.rng);
        let mut left = split;
        let mut right = DECK_SIZE - split;
        let mut left_idx = split;
        let mut right_idx = DECK_SIZE;

        for slot in (0..DECK_SIZE).rev() {
            let take_left = if left == 0 {
                false
            } else if right == 0 {
                true
            } else {
                self.rng.bounded((left + right) as u32) < left as u32
            };

            if take_left {
                left_idx -= 1;
                left -= 1;
                self.buffer[slot] = self.deck[left_idx];
            } else {
                right_idx -= 1;
                right -= 1;
                self.buffer[slot] = self.deck[right_idx];
            }
        }
        std::mem::swap(&mut self.deck, &mut self.buffer);
    }

    /// Repeated packet pick-ups; the pick-up count is itself sampled.
    pub fn hindu(&mut self, tables: &ShuffleTables) {
        let ops = tables.hindu_ops.sample(&mut self.rng);
        for _ in 0..ops {
            let cut_point = tables.hindu_cut.sample(&mut self.rng);
            self.peel_packet(cut_point, &tables.hindu_drop);
        }
    }

    /// A single packet pick-up.
    pub fn overhand(&mut self, cut: &CdfTable, drop: &CdfTable) {
        let cut_point = cut.sample(&mut self.rng);
        self.peel_packet(cut_point, drop);
    }

    /// Lift the packet `[0, cut_point]` and drop it back on top in
    /// sampled chunks. Each chunk keeps its internal order and lands above
    /// the chunks dropped before it; cards below the packet stay put.
    fn peel_packet(&mut self, cut_point: usize, drop: &CdfTable) {
        let packet_len = cut_point + 1;
        self.buffer = self.deck;

        let mut taken = 0;
        while taken < packet_len {
            let count = drop.sample(&mut self.rng).min(packet_len - taken);
            debug_assert!(count > 0, "drop table produced an empty drop");
            let end = packet_len - taken;
            self.buffer[end - count..end].copy_from_slice(&self.deck[taken..taken + count]);
            taken += count;
        }
        std::mem::swap(&mut self.deck, &mut self.buffer);
    }

    /// Textbook Fisher–Yates: swap each position, from the end, with a
    /// uniformly drawn position at or before it.
    pub fn uniform_shuffle(&mut self) {
        for i in (1..DECK_SIZE).rev() {
            let j = self.rng.bounded(i as u32 + 1) as usize;
            self.deck.swap(i, j);
        }
    }
}
