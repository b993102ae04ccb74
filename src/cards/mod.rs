//! Card model and the straight/flush primitives built on it.
//!
//! ## Modules
//!
//! - `card`: Rank, suit, card, hole cards, board, deal and deck
//! - `primitives`: Run-of-5, straight draw, suit count and rank count helpers

pub mod card;
pub mod primitives;

pub use card::{parse_cards, Board, Card, CardError, Deal, Deck, HoleCards, Rank, Street, Suit};
pub use primitives::{
    flush_suit, has_run_of_5, max_rank_count, max_suit_count, rank_counts, straight_draw,
    straight_possible, suit_counts, StraightDraw,
};
