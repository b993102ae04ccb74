//! Straight and flush primitives shared by the classifiers.
//!
//! All functions are pure and work over arbitrary card or rank-value
//! multisets. Rank values are the numeric values 2-14; wherever a straight is
//! concerned an ace additionally counts as 1 so the wheel (A-2-3-4-5) is
//! found by the same sliding window as every other run.

use super::card::{Card, Rank, Suit};

/// The two kinds of four-card straight draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StraightDraw {
    /// Four consecutive ranks.
    OpenEnded,
    /// Four ranks inside a five-rank window (one gap).
    Gutshot,
}

/// Rank values of a card slice, in slice order.
pub fn rank_values(cards: &[Card]) -> Vec<u8> {
    cards.iter().map(|c| c.value()).collect()
}

/// Sorted unique values, with a leading 1 when an ace (14) is present.
pub fn ace_low_values(values: &[u8]) -> Vec<u8> {
    let mut unique = values.to_vec();
    unique.sort_unstable();
    unique.dedup();
    if unique.last() == Some(&Rank::Ace.value()) {
        unique.insert(0, 1);
    }
    unique
}

/// Low ends of every five-rank run present in `values` (1 marks the wheel).
pub fn runs_of_5(values: &[u8]) -> Vec<u8> {
    ace_low_values(values)
        .windows(5)
        .filter(|w| w[4] - w[0] == 4)
        .map(|w| w[0])
        .collect()
}

/// True when `values` contain five consecutive ranks.
pub fn has_run_of_5(values: &[u8]) -> bool {
    ace_low_values(values).windows(5).any(|w| w[4] - w[0] == 4)
}

/// True when four distinct ranks fall inside a five-rank window, i.e. one
/// more card could complete a straight.
pub fn straight_possible(values: &[u8]) -> bool {
    ace_low_values(values).windows(4).any(|w| w[3] - w[0] <= 4)
}

/// First four-rank window (low to high) that forms a straight draw.
pub fn straight_draw(values: &[u8]) -> Option<StraightDraw> {
    ace_low_values(values).windows(4).find_map(|w| match w[3] - w[0] {
        3 => Some(StraightDraw::OpenEnded),
        4 => Some(StraightDraw::Gutshot),
        _ => None,
    })
}

/// Number of cards per suit, indexed by `Suit::index`.
pub fn suit_counts(cards: &[Card]) -> [u8; 4] {
    let mut counts = [0u8; 4];
    for card in cards {
        counts[card.suit().index()] += 1;
    }
    counts
}

/// Size of the largest suit group.
pub fn max_suit_count(cards: &[Card]) -> u8 {
    suit_counts(cards).into_iter().max().unwrap_or(0)
}

/// The suit holding five or more of the cards, if any.
pub fn flush_suit(cards: &[Card]) -> Option<Suit> {
    let counts = suit_counts(cards);
    Suit::ALL.into_iter().find(|s| counts[s.index()] >= 5)
}

/// Number of cards per rank, indexed by `Rank::index`.
pub fn rank_counts(cards: &[Card]) -> [u8; 13] {
    let mut counts = [0u8; 13];
    for card in cards {
        counts[card.rank().index()] += 1;
    }
    counts
}

/// Size of the largest rank group.
pub fn max_rank_count(cards: &[Card]) -> u8 {
    rank_counts(cards).into_iter().max().unwrap_or(0)
}
