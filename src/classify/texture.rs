//! Board texture and turn transition classification.
//!
//! A flop is bucketed into one of five textures used to pick c-bet
//! frequencies. The checks run in a fixed order and the first match wins, so
//! a paired board is never reported as wet even when two-suited.
//!
//! The turn is classified by what it changes relative to the flop.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cards::primitives::{rank_values, straight_possible, suit_counts};
use crate::cards::{Board, Card};

/// Flop texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardTexture {
    /// Rainbow, unconnected.
    Dry,
    /// Two-tone, or connected with a flush draw.
    Wet,
    /// Two cards share a rank.
    Paired,
    /// All three cards share a suit.
    Monotone,
    /// Close ranks on a rainbow flop.
    Connected,
}

impl BoardTexture {
    /// All textures.
    pub const ALL: [BoardTexture; 5] = [
        BoardTexture::Dry,
        BoardTexture::Wet,
        BoardTexture::Paired,
        BoardTexture::Monotone,
        BoardTexture::Connected,
    ];

    /// Table key, e.g. `"monotone"`.
    pub fn name(&self) -> &'static str {
        match self {
            BoardTexture::Dry => "dry",
            BoardTexture::Wet => "wet",
            BoardTexture::Paired => "paired",
            BoardTexture::Monotone => "monotone",
            BoardTexture::Connected => "connected",
        }
    }
}

impl fmt::Display for BoardTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the turn card changed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnTransition {
    /// Nothing relevant changed.
    Blank,
    /// Third (or fourth) card of a suit.
    FlushCompleting,
    /// Four board ranks within one card of a straight.
    StraightCompleting,
    /// The turn pairs a flop card.
    Pairing,
    /// The turn lands one or two ranks from a flop card.
    Connected,
}

impl TurnTransition {
    /// All transitions.
    pub const ALL: [TurnTransition; 5] = [
        TurnTransition::Blank,
        TurnTransition::FlushCompleting,
        TurnTransition::StraightCompleting,
        TurnTransition::Pairing,
        TurnTransition::Connected,
    ];

    /// Table key, e.g. `"flush_completing"`.
    pub fn name(&self) -> &'static str {
        match self {
            TurnTransition::Blank => "blank",
            TurnTransition::FlushCompleting => "flush_completing",
            TurnTransition::StraightCompleting => "straight_completing",
            TurnTransition::Pairing => "pairing",
            TurnTransition::Connected => "connected",
        }
    }
}

impl fmt::Display for TurnTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a three-card flop.
pub fn classify_board_texture(flop: &[Card; 3]) -> BoardTexture {
    let [a, b, c] = *flop;

    if a.rank() == b.rank() || b.rank() == c.rank() || a.rank() == c.rank() {
        return BoardTexture::Paired;
    }

    if a.suit() == b.suit() && b.suit() == c.suit() {
        return BoardTexture::Monotone;
    }

    let two_suited = a.suit() == b.suit() || b.suit() == c.suit() || a.suit() == c.suit();

    let mut values = [a.value(), b.value(), c.value()];
    values.sort_unstable();
    let gap = values[2] - values[0];
    let connected = values.windows(2).any(|w| w[1] - w[0] <= 2);
    if gap <= 4 && connected {
        return if two_suited {
            BoardTexture::Wet
        } else {
            BoardTexture::Connected
        };
    }

    if two_suited {
        BoardTexture::Wet
    } else {
        BoardTexture::Dry
    }
}

/// Classify the flop of a board (the first three cards).
pub fn classify_board(board: &Board) -> BoardTexture {
    classify_board_texture(&board.flop_cards())
}

/// Classify what the turn card changes relative to the flop.
pub fn classify_turn_transition(flop: &[Card; 3], turn: Card) -> TurnTransition {
    if suit_counts(flop)[turn.suit().index()] >= 2 {
        return TurnTransition::FlushCompleting;
    }

    if flop.iter().any(|c| c.rank() == turn.rank()) {
        return TurnTransition::Pairing;
    }

    let mut values = rank_values(flop);
    values.push(turn.value());
    if straight_possible(&values) {
        return TurnTransition::StraightCompleting;
    }

    let min_distance = flop
        .iter()
        .map(|c| c.value().abs_diff(turn.value()))
        .min()
        .unwrap_or(u8::MAX);
    if (1..=2).contains(&min_distance) {
        return TurnTransition::Connected;
    }

    TurnTransition::Blank
}

/// Classify the turn of a board, or `None` on a flop-only board.
pub fn classify_board_turn(board: &Board) -> Option<TurnTransition> {
    board
        .turn()
        .map(|turn| classify_turn_transition(&board.flop_cards(), turn))
}
