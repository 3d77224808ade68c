//! Shared primitive types used across the entire simulation.
//!
//! RULE: A `Deck` is always a permutation of `0..DECK_SIZE`.
//! Index 0 is the top of the deck.

use serde::{Deserialize, Serialize};

/// Number of cards in a standard deck.
pub const DECK_SIZE: usize = 52;

/// Cards per suit.
pub const RANKS_PER_SUIT: u8 = 13;

/// A card identifier in `[0, 52)`. Rank = id % 13, suit = id / 13.
pub type Card = u8;

/// A full ordered deck. `deck[0]` is the top card.
pub type Deck = [Card; DECK_SIZE];

/// Sorted deck: card `i` at position `i`.
pub const CANONICAL_DECK: Deck = {
    let mut d = [0u8; DECK_SIZE];
    let mut i = 0;
    while i < DECK_SIZE {
        d[i] = i as Card;
        i += 1;
    }
    d
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Clubs    => "♣",
            Self::Diamonds => "♦",
            Self::Hearts   => "♥",
            Self::Spades   => "♠",
        }
    }
}

/// Rank index in `[0, 13)`, ace low.
pub fn rank_of(card: Card) -> u8 {
    card % RANKS_PER_SUIT
}

pub fn suit_of(card: Card) -> Suit {
    match card / RANKS_PER_SUIT {
        0 => Suit::Clubs,
        1 => Suit::Diamonds,
        2 => Suit::Hearts,
        _ => Suit::Spades,
    }
}

/// Short label such as `A♣`, `T♥` or `K♠`.
pub fn card_label(card: Card) -> String {
    const RANKS: [&str; 13] = ["A", "2", "3", "4", "5", "6", "7", "8", "9", "T", "J", "Q", "K"];
    format!("{}{}", RANKS[rank_of(card) as usize], suit_of(card).symbol())
}

/// True when `deck` holds every identifier in `[0, 52)` exactly once.
pub fn is_permutation(deck: &Deck) -> bool {
    let mut seen = [false; DECK_SIZE];
    for &card in deck {
        let idx = card as usize;
        if idx >= DECK_SIZE || seen[idx] {
            return false;
        }
        seen[idx] = true;
    }
    true
}
