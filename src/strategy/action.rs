//! Actions and decision contexts.
//!
//! Each decision context has its own action vocabulary. The order of that
//! vocabulary is the priority in which a range entry's action lists are
//! scanned.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A postflop action the hero can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Continuation bet on the flop.
    Cbet,
    Check,
    /// Second bet on the turn.
    Barrel,
    Raise,
    Call,
    Fold,
}

impl Action {
    /// Table key, e.g. `"cbet"`.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Cbet => "cbet",
            Action::Check => "check",
            Action::Barrel => "barrel",
            Action::Raise => "raise",
            Action::Call => "call",
            Action::Fold => "fold",
        }
    }

    /// Parse a table key.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cbet" => Some(Action::Cbet),
            "check" => Some(Action::Check),
            "barrel" => Some(Action::Barrel),
            "raise" => Some(Action::Raise),
            "call" => Some(Action::Call),
            "fold" => Some(Action::Fold),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The situation a decision is made in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionContext {
    /// Preflop raiser deciding whether to c-bet the flop.
    FlopBet,
    /// Big blind facing a flop c-bet.
    FacingBet,
    /// Preflop raiser deciding whether to bet the turn again.
    TurnBarrel,
    /// Big blind facing a flop bet and a turn bet.
    FacingDoubleBarrel,
}

impl DecisionContext {
    /// All contexts.
    pub const ALL: [DecisionContext; 4] = [
        DecisionContext::FlopBet,
        DecisionContext::FacingBet,
        DecisionContext::TurnBarrel,
        DecisionContext::FacingDoubleBarrel,
    ];

    /// Action vocabulary in list-scan priority order.
    pub fn priority(&self) -> &'static [Action] {
        match self {
            DecisionContext::FlopBet => &[Action::Cbet, Action::Check],
            DecisionContext::TurnBarrel => &[Action::Barrel, Action::Check],
            DecisionContext::FacingBet | DecisionContext::FacingDoubleBarrel => {
                &[Action::Raise, Action::Call, Action::Fold]
            }
        }
    }

    /// Action returned when no list or mixed record holds the category.
    pub fn default_action(&self) -> Action {
        if self.is_aggressor() {
            Action::Check
        } else {
            Action::Fold
        }
    }

    /// True for the preflop raiser's contexts.
    pub fn is_aggressor(&self) -> bool {
        matches!(self, DecisionContext::FlopBet | DecisionContext::TurnBarrel)
    }

    /// True for the turn contexts, whose tables are keyed by transition too.
    pub fn is_turn(&self) -> bool {
        matches!(
            self,
            DecisionContext::TurnBarrel | DecisionContext::FacingDoubleBarrel
        )
    }

    /// True when `action` belongs to this context's vocabulary.
    pub fn allows(&self, action: Action) -> bool {
        self.priority().contains(&action)
    }

    /// Key of this context's section in the strategy book.
    pub fn name(&self) -> &'static str {
        match self {
            DecisionContext::FlopBet => "flop_bet",
            DecisionContext::FacingBet => "facing_bet",
            DecisionContext::TurnBarrel => "turn_barrel",
            DecisionContext::FacingDoubleBarrel => "facing_double_barrel",
        }
    }

    /// Parse a section key.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for DecisionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_and_defaults() {
        assert_eq!(DecisionContext::FlopBet.priority(), &[Action::Cbet, Action::Check]);
        assert_eq!(DecisionContext::FlopBet.default_action(), Action::Check);
        assert_eq!(DecisionContext::TurnBarrel.default_action(), Action::Check);
        assert_eq!(DecisionContext::FacingBet.default_action(), Action::Fold);
        assert_eq!(DecisionContext::FacingDoubleBarrel.default_action(), Action::Fold);
    }

    #[test]
    fn test_vocabulary() {
        assert!(DecisionContext::FacingBet.allows(Action::Raise));
        assert!(!DecisionContext::FacingBet.allows(Action::Cbet));
        assert!(!DecisionContext::FlopBet.allows(Action::Barrel));
    }

    #[test]
    fn test_names() {
        for context in DecisionContext::ALL {
            assert_eq!(DecisionContext::from_name(context.name()), Some(context));
        }
        assert_eq!(Action::from_name("barrel"), Some(Action::Barrel));
        assert_eq!(Action::from_name("shove"), None);
    }
}
