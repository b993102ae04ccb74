//! # Postflop Trainer
//!
//! Core of a heads-up postflop decision trainer. A deal of two hole cards
//! and a 3-5 card board is reduced to discrete keys (hand category, flop
//! texture, turn transition) and looked up in a strategy book of heuristic
//! ranges to produce a recommended action.
//!
//! ## Features
//!
//! - **Hand Categories**: 21-way taxonomy from straight flush to nothing,
//!   separating sets from trips and pair quality by kicker
//! - **Board Textures**: Dry, wet, paired, monotone and connected flops
//! - **Turn Transitions**: What the turn card changed
//! - **Strategy Resolution**: Mixed records, category fallbacks and context
//!   defaults over a JSON strategy book
//! - **Training**: Grading, session stats, weakness detection and seedable
//!   scenario generation
//!
//! ## Quick Start
//!
//! ```
//! use postflop_trainer::cards::Deal;
//! use postflop_trainer::strategy::{DecisionContext, StrategyBook};
//! use postflop_trainer::{classify_board_texture, resolve_strategy};
//!
//! let book = StrategyBook::builtin().unwrap();
//! let deal = Deal::parse("AhKh", "QhJhTh").unwrap();
//! let texture = classify_board_texture(&deal.board().flop_cards());
//!
//! let decision = resolve_strategy(
//!     &book,
//!     DecisionContext::FlopBet,
//!     "BTN_vs_BB",
//!     texture,
//!     deal.category(),
//! )
//! .unwrap();
//! println!("{}", decision.describe());
//! ```
//!
//! ## Modules
//!
//! - [`cards`]: Cards, hands, boards, deck and straight/flush primitives
//! - [`classify`]: Hand category, board texture and turn transition
//! - [`strategy`]: Strategy book and resolution engine
//! - [`training`]: Grading, sessions, scenario generation and batch runs
//!
//! ## Architecture
//!
//! ```text
//!   Deal (hand + board)
//!         │
//!         ├── classify ──► HandCategory, BoardTexture, TurnTransition
//!         │                          │
//!         ▼                          ▼
//!   training::scenario ──► strategy::resolve ◄── StrategyBook (JSON)
//!         │                          │
//!         ▼                          ▼
//!   training::session ◄──── ActionDecision ──► training::grading
//! ```

#![warn(missing_docs)]

/// Card model and the straight/flush primitives.
pub mod cards;

/// Classifiers producing the strategy-book keys.
pub mod classify;

/// Strategy book and resolution engine.
pub mod strategy;

/// Drill loop support.
pub mod training;

pub use classify::{
    classify_board_texture, classify_hand_category, classify_turn_transition, BoardTexture,
    HandCategory, TurnTransition,
};
pub use strategy::{
    resolve_strategy, resolve_turn_strategy, Action, ActionDecision, DecisionContext,
    StrategyBook,
};
