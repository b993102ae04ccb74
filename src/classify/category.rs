//! Hand category classification.
//!
//! Buckets the hero's hole cards on a 3-5 card board into a training
//! taxonomy. This is not a showdown ranking: `set` and `trips` are both three
//! of a kind and differ only in how the hero got there, and draws are only
//! reported when no pair or better applies.
//!
//! Rules are checked in a fixed precedence order and the first match wins.
//! The classifier never backtracks, so a pocket pair that completes a
//! straight is a `straight`, not a `set` or `overpair`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cards::primitives::{
    flush_suit, has_run_of_5, max_suit_count, rank_counts, rank_values, runs_of_5,
    straight_draw, StraightDraw,
};
use crate::cards::{Board, Card, Deal, HoleCards, Rank};

/// Kicker value at or above which a top pair counts as `TopPairGood`.
const GOOD_KICKER: u8 = Rank::Ten as u8;

/// Hand category, listed in evaluation precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandCategory {
    StraightFlush,
    Quads,
    Flush,
    Straight,
    FullHouse,
    /// One hole card matches a paired board rank.
    Trips,
    /// A pocket pair matches a board card.
    Set,
    TwoPair,
    Overpair,
    /// Pocket pair between the highest and second-highest board card.
    UnderpairHigh,
    /// Pocket pair below the second-highest board card.
    UnderpairLow,
    /// Top pair with a ten-or-better kicker.
    TopPairGood,
    TopPairWeak,
    SecondPair,
    LowPair,
    FlushDraw,
    /// Open-ended straight draw.
    Oesd,
    Gutshot,
    Overcards,
    AceHigh,
    Nothing,
}

impl HandCategory {
    /// All categories in precedence order.
    pub const ALL: [HandCategory; 21] = [
        HandCategory::StraightFlush,
        HandCategory::Quads,
        HandCategory::Flush,
        HandCategory::Straight,
        HandCategory::FullHouse,
        HandCategory::Trips,
        HandCategory::Set,
        HandCategory::TwoPair,
        HandCategory::Overpair,
        HandCategory::UnderpairHigh,
        HandCategory::UnderpairLow,
        HandCategory::TopPairGood,
        HandCategory::TopPairWeak,
        HandCategory::SecondPair,
        HandCategory::LowPair,
        HandCategory::FlushDraw,
        HandCategory::Oesd,
        HandCategory::Gutshot,
        HandCategory::Overcards,
        HandCategory::AceHigh,
        HandCategory::Nothing,
    ];

    /// Table key, e.g. `"top_pair_good"`.
    pub fn name(&self) -> &'static str {
        match self {
            HandCategory::StraightFlush => "straight_flush",
            HandCategory::Quads => "quads",
            HandCategory::Flush => "flush",
            HandCategory::Straight => "straight",
            HandCategory::FullHouse => "full_house",
            HandCategory::Trips => "trips",
            HandCategory::Set => "set",
            HandCategory::TwoPair => "two_pair",
            HandCategory::Overpair => "overpair",
            HandCategory::UnderpairHigh => "underpair_high",
            HandCategory::UnderpairLow => "underpair_low",
            HandCategory::TopPairGood => "top_pair_good",
            HandCategory::TopPairWeak => "top_pair_weak",
            HandCategory::SecondPair => "second_pair",
            HandCategory::LowPair => "low_pair",
            HandCategory::FlushDraw => "flush_draw",
            HandCategory::Oesd => "oesd",
            HandCategory::Gutshot => "gutshot",
            HandCategory::Overcards => "overcards",
            HandCategory::AceHigh => "ace_high",
            HandCategory::Nothing => "nothing",
        }
    }

    /// Human-readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            HandCategory::StraightFlush => "Straight Flush",
            HandCategory::Quads => "Quads",
            HandCategory::Flush => "Flush",
            HandCategory::Straight => "Straight",
            HandCategory::FullHouse => "Full House",
            HandCategory::Trips => "Trips",
            HandCategory::Set => "Set",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::Overpair => "Overpair",
            HandCategory::UnderpairHigh => "Underpair (high)",
            HandCategory::UnderpairLow => "Underpair (low)",
            HandCategory::TopPairGood => "Top Pair (good kicker)",
            HandCategory::TopPairWeak => "Top Pair (weak kicker)",
            HandCategory::SecondPair => "Second Pair",
            HandCategory::LowPair => "Low Pair",
            HandCategory::FlushDraw => "Flush Draw",
            HandCategory::Oesd => "Open-Ended Straight Draw",
            HandCategory::Gutshot => "Gutshot",
            HandCategory::Overcards => "Overcards",
            HandCategory::AceHigh => "Ace High",
            HandCategory::Nothing => "Nothing",
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify hole cards on a board.
///
/// # Panics
///
/// Panics if a hole card also appears on the board. Use [`Deal::new`] to
/// check that precondition as a `Result` first.
pub fn classify_hand_category(hand: &HoleCards, board: &Board) -> HandCategory {
    if let Some(card) = hand.cards().into_iter().find(|&c| board.contains(c)) {
        panic!("card {} is both in the hand {} and on the board {}", card, hand, board);
    }
    evaluate(hand, board)
}

impl Deal {
    /// Classify this deal's hand category.
    pub fn category(&self) -> HandCategory {
        evaluate(self.hand(), self.board())
    }
}

fn evaluate(hand: &HoleCards, board: &Board) -> HandCategory {
    let hero = hand.cards();
    let board_cards = board.cards();
    let all: Vec<Card> = hero.iter().chain(board_cards).copied().collect();
    let all_values = rank_values(&all);
    let all_rank_counts = rank_counts(&all);

    let mut board_values = rank_values(board_cards);
    board_values.sort_unstable_by(|a, b| b.cmp(a));
    let (highest, second) = (board_values[0], board_values[1]);

    let hero_holds_suit = |suit| hero.iter().any(|c| c.suit() == suit);
    let hero_holds_rank = |rank| hero.iter().any(|c| c.rank() == rank);

    let flush = flush_suit(&all).filter(|&suit| hero_holds_suit(suit));

    if let Some(suit) = flush {
        let suited: Vec<u8> = all.iter().filter(|c| c.suit() == suit).map(|c| c.value()).collect();
        if has_run_of_5(&suited) {
            return HandCategory::StraightFlush;
        }
    }

    if Rank::ALL
        .into_iter()
        .any(|r| all_rank_counts[r.index()] >= 4 && hero_holds_rank(r))
    {
        return HandCategory::Quads;
    }

    if flush.is_some() {
        return HandCategory::Flush;
    }

    if hero_completes_straight(&all_values, &board_values) {
        return HandCategory::Straight;
    }

    let board_rank_counts = rank_counts(board_cards);
    let board_paired = |rank: Rank| board_rank_counts[rank.index()] >= 2;

    if hand.is_pair() {
        let pocket = hand.card1.rank();
        if board_rank_counts[pocket.index()] > 0 {
            let other_pair = Rank::ALL.into_iter().any(|r| r != pocket && board_paired(r));
            return if other_pair {
                HandCategory::FullHouse
            } else {
                HandCategory::Set
            };
        }
        return if pocket.value() > highest {
            HandCategory::Overpair
        } else if pocket.value() > second {
            HandCategory::UnderpairHigh
        } else {
            HandCategory::UnderpairLow
        };
    }

    let hits: Vec<Card> = hero
        .into_iter()
        .filter(|c| board_rank_counts[c.rank().index()] > 0)
        .collect();

    match hits.as_slice() {
        [_, _] => {
            return if hits.iter().any(|c| board_paired(c.rank())) {
                HandCategory::FullHouse
            } else {
                HandCategory::TwoPair
            };
        }
        [hit] => {
            if board_paired(hit.rank()) {
                return HandCategory::Trips;
            }
            let kicker = if hand.card1 == *hit { hand.card2 } else { hand.card1 };
            return if hit.value() == highest {
                if kicker.value() >= GOOD_KICKER {
                    HandCategory::TopPairGood
                } else {
                    HandCategory::TopPairWeak
                }
            } else if hit.value() == second {
                HandCategory::SecondPair
            } else {
                HandCategory::LowPair
            };
        }
        _ => {}
    }

    if max_suit_count(&all) == 4 {
        return HandCategory::FlushDraw;
    }

    match straight_draw(&all_values) {
        Some(StraightDraw::OpenEnded) => return HandCategory::Oesd,
        Some(StraightDraw::Gutshot) => return HandCategory::Gutshot,
        None => {}
    }

    if hero.iter().all(|c| c.value() > highest) {
        return HandCategory::Overcards;
    }

    if hero_holds_rank(Rank::Ace) {
        return HandCategory::AceHigh;
    }

    HandCategory::Nothing
}

/// True when some five-rank run over all cards uses a rank the board lacks.
fn hero_completes_straight(all_values: &[u8], board_values: &[u8]) -> bool {
    let on_board = |value: u8| {
        let value = if value == 1 { Rank::Ace.value() } else { value };
        board_values.contains(&value)
    };
    runs_of_5(all_values)
        .into_iter()
        .any(|low| (low..low + 5).any(|v| !on_board(v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(hand: &str, board: &str) -> HandCategory {
        Deal::parse(hand, board).unwrap().category()
    }

    #[test]
    fn test_straight_flush_beats_flush_and_straight() {
        assert_eq!(classify("AhKh", "QhJhTh"), HandCategory::StraightFlush);
        assert_eq!(classify("5h4h", "Ah2h3h"), HandCategory::StraightFlush);
    }

    #[test]
    fn test_quads_need_a_hole_card() {
        assert_eq!(classify("7s7h", "7d7c2h"), HandCategory::Quads);
        assert_eq!(classify("7s8h", "7d7c7h"), HandCategory::Quads);
        assert_eq!(classify("2s3h", "7d7c7h7s"), HandCategory::Nothing);
    }

    #[test]
    fn test_flush_needs_a_hole_card_of_the_suit() {
        assert_eq!(classify("Ah2h", "Kh9h4h"), HandCategory::Flush);
        assert_eq!(classify("AsKd", "2h6h9hTh3h"), HandCategory::Overcards);
    }

    #[test]
    fn test_wheel_straight() {
        assert_eq!(classify("2s3h", "4d5cAh"), HandCategory::Straight);
        assert_eq!(classify("As2d", "3h4c5s"), HandCategory::Straight);
    }

    #[test]
    fn test_board_straight_without_hero_help() {
        assert_eq!(classify("2s2d", "9h8c7dTs6h"), HandCategory::UnderpairLow);
        assert_eq!(classify("Js2d", "9h8c7dTs6h"), HandCategory::Straight);
    }

    #[test]
    fn test_pocket_pair_straight_takes_precedence() {
        assert_eq!(classify("5s5h", "6d7c8h4s"), HandCategory::Straight);
    }

    #[test]
    fn test_set_versus_trips() {
        assert_eq!(classify("7s7h", "7d4c2h"), HandCategory::Set);
        assert_eq!(classify("7s8h", "7d7c2h"), HandCategory::Trips);
    }

    #[test]
    fn test_full_house_paths() {
        assert_eq!(classify("9s9h", "9d5c5h"), HandCategory::FullHouse);
        assert_eq!(classify("9s5d", "9d9c5h"), HandCategory::FullHouse);
    }

    #[test]
    fn test_two_pair() {
        assert_eq!(classify("Ks9d", "Kh9c2s"), HandCategory::TwoPair);
    }

    #[test]
    fn test_pocket_pairs_against_board() {
        assert_eq!(classify("QsQh", "Jd7c2h"), HandCategory::Overpair);
        assert_eq!(classify("JsJh", "Qd6c2h"), HandCategory::UnderpairHigh);
        assert_eq!(classify("5s5h", "Qd6c2h"), HandCategory::UnderpairLow);
    }

    #[test]
    fn test_single_pairs_and_kicker() {
        assert_eq!(classify("AsTd", "Ah7c2d"), HandCategory::TopPairGood);
        assert_eq!(classify("As9d", "Ah7c2d"), HandCategory::TopPairWeak);
        assert_eq!(classify("KsQd", "Kh7c2d"), HandCategory::TopPairGood);
        assert_eq!(classify("Ks7d", "Ah7c2d"), HandCategory::SecondPair);
        assert_eq!(classify("Ks2s", "Ah7c2d"), HandCategory::LowPair);
    }

    #[test]
    fn test_draws() {
        assert_eq!(classify("AhKh", "7h2h9c"), HandCategory::FlushDraw);
        assert_eq!(classify("9s8d", "7c6h2s"), HandCategory::Oesd);
        assert_eq!(classify("9s8d", "6c5hKs"), HandCategory::Gutshot);
        assert_eq!(classify("As2d", "3h4cKs"), HandCategory::Oesd);
    }

    #[test]
    fn test_unpaired_fallthrough() {
        assert_eq!(classify("AsKd", "9h7c2d"), HandCategory::Overcards);
        assert_eq!(classify("As4d", "Kh9c2d"), HandCategory::AceHigh);
        assert_eq!(classify("7s4d", "Kh9cJd"), HandCategory::Nothing);
    }

    #[test]
    fn test_turn_reclassification() {
        assert_eq!(classify("9s8d", "7c6h2s"), HandCategory::Oesd);
        assert_eq!(classify("9s8d", "7c6h2sTd"), HandCategory::Straight);
    }

    #[test]
    #[should_panic(expected = "both in the hand")]
    fn test_shared_card_fails_fast() {
        let hand: HoleCards = "AhKh".parse().unwrap();
        let board: Board = "AhQh2c".parse().unwrap();
        classify_hand_category(&hand, &board);
    }

    #[test]
    fn test_category_names_round_trip_through_serde() {
        for category in HandCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.name()));
        }
    }
}
