//! Strategy tables and the resolution engine.
//!
//! ## Modules
//!
//! - `action`: Actions and decision contexts
//! - `table`: Strategy book JSON format, loading and validation
//! - `resolve`: Category → action resolution with fallbacks and defaults

pub mod action;
pub mod resolve;
pub mod table;

pub use action::{Action, DecisionContext};
pub use resolve::{resolve_strategy, resolve_turn_strategy, ActionDecision, StrategyError};
pub use table::{
    CategoryFallbacks, MixedEntry, RangeEntry, StrategyBook, StrategyTable, TableError,
    TurnStrategyTable, FREQUENCY_TOLERANCE,
};
