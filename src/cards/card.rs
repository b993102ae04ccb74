//! Card representation for the trainer.
//!
//! This module provides the value types every classifier works on:
//! - `Rank` / `Suit`: closed enumerations with numeric rank values 2-14
//! - `Card`: a single playing card
//! - `HoleCards`: the hero's two private cards
//! - `Board`: 3-5 community cards
//! - `Deal`: hole cards plus a board, checked for duplicate cards
//! - `Deck`: a deck of 52 cards with dealing functionality

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building cards, hands and boards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    /// The text is not a card like `As`, `Td` or `2c`.
    #[error("invalid card '{0}'")]
    InvalidCard(String),
    /// The same card appears twice across hand and board.
    #[error("duplicate card {0}")]
    DuplicateCard(Card),
    /// Hole cards must be exactly two cards.
    #[error("hole cards need exactly 2 cards, got {0}")]
    HandLength(usize),
    /// Boards hold between 3 and 5 cards.
    #[error("board needs 3 to 5 cards, got {0}")]
    BoardLength(usize),
}

/// Rank of a card, valued 2 (deuce) to 14 (ace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

/// Rank characters for display, indexed by `value - 2`.
const RANK_CHARS: [char; 13] = ['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];

impl Rank {
    /// All ranks, deuce first.
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Numeric value (2-14). The ace-low value 1 is handled by the straight primitives.
    #[inline]
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Index 0-12, deuce first.
    #[inline]
    pub fn index(self) -> usize {
        self as usize - 2
    }

    /// Parse a rank character (`2`-`9`, `T`, `J`, `Q`, `K`, `A`; case-insensitive).
    pub fn from_char(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        RANK_CHARS.iter().position(|&r| r == upper).map(|i| Self::ALL[i])
    }

    /// Rank character for display.
    pub fn to_char(self) -> char {
        RANK_CHARS[self.index()]
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Suit of a card. Suits carry no ordering in play, only equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

/// Suit characters for display, indexed by `Suit::index`.
const SUIT_CHARS: [char; 4] = ['s', 'h', 'd', 'c'];

impl Suit {
    /// All suits.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    /// Index 0-3 used by count tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parse a suit character (`s`, `h`, `d`, `c`; case-insensitive).
    pub fn from_char(c: char) -> Option<Self> {
        let lower = c.to_ascii_lowercase();
        SUIT_CHARS.iter().position(|&s| s == lower).map(|i| Self::ALL[i])
    }

    /// Suit character for display.
    pub fn to_char(self) -> char {
        SUIT_CHARS[self.index()]
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A single playing card.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    /// Create a card from rank and suit.
    #[inline]
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Create a card from its ID (0-51: rank index * 4 + suit index).
    #[inline]
    pub fn from_id(id: u8) -> Self {
        debug_assert!(id < 52, "card id must be 0-51");
        Self {
            rank: Rank::ALL[(id / 4) as usize],
            suit: Suit::ALL[(id % 4) as usize],
        }
    }

    /// Get the card's ID (0-51).
    #[inline]
    pub fn id(&self) -> u8 {
        (self.rank.index() * 4 + self.suit.index()) as u8
    }

    /// Get the card's rank.
    #[inline]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Get the card's suit.
    #[inline]
    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Numeric rank value (2-14).
    #[inline]
    pub fn value(&self) -> u8 {
        self.rank.value()
    }
}

impl FromStr for Card {
    type Err = CardError;

    /// Parse a card from a string like "As", "Kh", "2c".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let parsed = match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(u), None) => Rank::from_char(r).zip(Suit::from_char(u)),
            _ => None,
        };
        parsed
            .map(|(rank, suit)| Self::new(rank, suit))
            .ok_or_else(|| CardError::InvalidCard(s.to_string()))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Parse a run of cards like "AhKsQd" or "Ah Ks Qd".
pub fn parse_cards(s: &str) -> Result<Vec<Card>, CardError> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() % 2 != 0 || !compact.is_ascii() {
        return Err(CardError::InvalidCard(s.to_string()));
    }
    (0..compact.len())
        .step_by(2)
        .map(|i| compact[i..i + 2].parse())
        .collect()
}

fn first_duplicate(cards: &[Card]) -> Option<Card> {
    let mut seen = 0u64;
    for card in cards {
        let bit = 1u64 << card.id();
        if seen & bit != 0 {
            return Some(*card);
        }
        seen |= bit;
    }
    None
}

/// The hero's two hole cards.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoleCards {
    /// First card (higher rank by convention).
    pub card1: Card,
    /// Second card.
    pub card2: Card,
}

impl HoleCards {
    /// Create hole cards, ordering by rank (higher first).
    pub fn new(card1: Card, card2: Card) -> Result<Self, CardError> {
        if card1 == card2 {
            return Err(CardError::DuplicateCard(card1));
        }
        Ok(if card1.rank() >= card2.rank() {
            Self { card1, card2 }
        } else {
            Self {
                card1: card2,
                card2: card1,
            }
        })
    }

    /// Check if hole cards are suited.
    pub fn is_suited(&self) -> bool {
        self.card1.suit() == self.card2.suit()
    }

    /// Check if hole cards are a pair.
    pub fn is_pair(&self) -> bool {
        self.card1.rank() == self.card2.rank()
    }

    /// Get both cards as an array.
    pub fn cards(&self) -> [Card; 2] {
        [self.card1, self.card2]
    }

    /// Check if a card conflicts with these hole cards.
    pub fn contains(&self, card: Card) -> bool {
        self.card1 == card || self.card2 == card
    }

    /// Starting-hand notation: "AA", "AKs", "T9o".
    pub fn notation(&self) -> String {
        let (high, low) = (self.card1.rank(), self.card2.rank());
        if high == low {
            format!("{}{}", high, low)
        } else if self.is_suited() {
            format!("{}{}s", high, low)
        } else {
            format!("{}{}o", high, low)
        }
    }
}

impl FromStr for HoleCards {
    type Err = CardError;

    /// Parse hole cards from string like "AhKs" or "Ah Ks".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_cards(s)?.as_slice() {
            [c1, c2] => Self::new(*c1, *c2),
            other => Err(CardError::HandLength(other.len())),
        }
    }
}

impl fmt::Display for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.card1, self.card2)
    }
}

impl fmt::Debug for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Street reached by a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    Flop,
    Turn,
    River,
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Street::Flop => write!(f, "Flop"),
            Street::Turn => write!(f, "Turn"),
            Street::River => write!(f, "River"),
        }
    }
}

/// Community cards: the flop plus optional turn and river, in deal order.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    /// Create a board from 3-5 distinct cards.
    pub fn new(cards: Vec<Card>) -> Result<Self, CardError> {
        if !(3..=5).contains(&cards.len()) {
            return Err(CardError::BoardLength(cards.len()));
        }
        if let Some(card) = first_duplicate(&cards) {
            return Err(CardError::DuplicateCard(card));
        }
        Ok(Self { cards })
    }

    /// Create a flop board.
    pub fn flop(cards: [Card; 3]) -> Result<Self, CardError> {
        Self::new(cards.to_vec())
    }

    /// Get the number of cards on the board.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always false: a board holds at least the flop.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Get the cards on the board.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The first three cards.
    pub fn flop_cards(&self) -> [Card; 3] {
        [self.cards[0], self.cards[1], self.cards[2]]
    }

    /// The fourth card, if dealt.
    pub fn turn(&self) -> Option<Card> {
        self.cards.get(3).copied()
    }

    /// Return a new board with one more card dealt.
    pub fn with_card(&self, card: Card) -> Result<Self, CardError> {
        let mut cards = self.cards.clone();
        cards.push(card);
        Self::new(cards)
    }

    /// Check if the board contains a specific card.
    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Get the current street based on board cards.
    pub fn street(&self) -> Street {
        match self.cards.len() {
            3 => Street::Flop,
            4 => Street::Turn,
            _ => Street::River,
        }
    }
}

impl FromStr for Board {
    type Err = CardError;

    /// Parse a board from string like "AhKsQd" or "Ah Ks Qd Jc".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(parse_cards(s)?)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for card in &self.cards {
            write!(f, "{}", card)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self)
    }
}

/// Hole cards and a board with no card shared between them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Deal {
    hand: HoleCards,
    board: Board,
}

impl Deal {
    /// Pair a hand with a board, rejecting any card that appears in both.
    pub fn new(hand: HoleCards, board: Board) -> Result<Self, CardError> {
        if let Some(card) = hand.cards().into_iter().find(|&c| board.contains(c)) {
            return Err(CardError::DuplicateCard(card));
        }
        Ok(Self { hand, board })
    }

    /// Parse a deal from hand and board strings.
    pub fn parse(hand: &str, board: &str) -> Result<Self, CardError> {
        Self::new(hand.parse()?, board.parse()?)
    }

    /// The hero's hole cards.
    pub fn hand(&self) -> &HoleCards {
        &self.hand
    }

    /// The community cards.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Every card in play: hole cards first, then the board.
    pub fn all_cards(&self) -> Vec<Card> {
        let mut cards = Vec::with_capacity(2 + self.board.len());
        cards.extend_from_slice(&self.hand.cards());
        cards.extend_from_slice(self.board.cards());
        cards
    }

    /// Deal one more board card.
    pub fn with_board_card(&self, card: Card) -> Result<Self, CardError> {
        Self::new(self.hand, self.board.with_card(card)?)
    }
}

/// A deck of 52 playing cards.
#[derive(Clone)]
pub struct Deck {
    /// Usable cards in current order.
    cards: Vec<Card>,
    /// Index of next card to deal.
    index: usize,
    /// Bitmask of dead and dealt cards.
    dealt_mask: u64,
}

impl Deck {
    /// Create a new deck in standard order.
    pub fn new() -> Self {
        Self::without(&[])
    }

    /// Create a deck with specific cards removed.
    pub fn without(dead_cards: &[Card]) -> Self {
        let dealt_mask = dead_cards.iter().fold(0u64, |mask, c| mask | (1u64 << c.id()));
        let cards = (0..52u8)
            .filter(|id| dealt_mask & (1u64 << id) == 0)
            .map(Card::from_id)
            .collect();
        Self {
            cards,
            index: 0,
            dealt_mask,
        }
    }

    /// Shuffle the remaining cards in the deck.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards[self.index..].shuffle(rng);
    }

    /// Deal the next card from the deck.
    pub fn deal(&mut self) -> Option<Card> {
        let card = *self.cards.get(self.index)?;
        self.index += 1;
        self.dealt_mask |= 1u64 << card.id();
        Some(card)
    }

    /// Deal multiple cards.
    pub fn deal_n(&mut self, n: usize) -> Vec<Card> {
        let mut cards = Vec::with_capacity(n);
        for _ in 0..n {
            if let Some(card) = self.deal() {
                cards.push(card);
            } else {
                break;
            }
        }
        cards
    }

    /// Remove specific cards from the undealt part of the deck.
    pub fn remove(&mut self, cards: &[Card]) {
        for card in cards {
            self.dealt_mask |= 1u64 << card.id();
        }
        let index = self.index;
        let mask = self.dealt_mask;
        let mut position = 0;
        self.cards.retain(|c| {
            let keep = position < index || mask & (1u64 << c.id()) == 0;
            position += 1;
            keep
        });
    }

    /// Get the number of remaining cards.
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.index
    }

    /// Check if a card has been dealt or removed.
    pub fn is_dealt(&self, card: Card) -> bool {
        self.dealt_mask & (1u64 << card.id()) != 0
    }

    /// Get remaining cards as a slice.
    pub fn remaining_cards(&self) -> &[Card] {
        &self.cards[self.index..]
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deck({} remaining)", self.remaining())
    }
}
