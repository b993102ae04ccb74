//! Strategy resolution.
//!
//! Given a table cell and a hand category, produce the recommended action:
//!
//! 1. a mixed record for the category
//! 2. a mixed record for the category's fallback
//! 3. the first action list, in context priority, holding the category or
//!    its fallback
//! 4. the context's default action
//!
//! Only a missing spot, texture or transition row is an error.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::action::{Action, DecisionContext};
use super::table::{CategoryFallbacks, RangeEntry, StrategyBook};
use crate::classify::{BoardTexture, HandCategory, TurnTransition};

/// Lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyError {
    #[error("{context}: no table for spot {spot}")]
    SpotNotFound {
        context: DecisionContext,
        spot: String,
    },
    #[error("{context}: spot {spot} has no {texture} entry")]
    TextureNotFound {
        context: DecisionContext,
        spot: String,
        texture: BoardTexture,
    },
    #[error("{context}: spot {spot} {texture} has neither a {transition} nor a blank row")]
    TransitionNotFound {
        context: DecisionContext,
        spot: String,
        texture: BoardTexture,
        transition: TurnTransition,
    },
}

/// Recommended action for a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionDecision {
    /// Always take this action.
    Deterministic(Action),
    /// Take each action with the given frequency.
    Mixed(BTreeMap<Action, f64>),
}

impl ActionDecision {
    /// Frequency of `action` (1.0 or 0.0 for deterministic decisions).
    pub fn frequency(&self, action: Action) -> f64 {
        match self {
            ActionDecision::Deterministic(a) => {
                if *a == action {
                    1.0
                } else {
                    0.0
                }
            }
            ActionDecision::Mixed(freqs) => freqs.get(&action).copied().unwrap_or(0.0),
        }
    }

    /// True when `action` is taken with positive frequency.
    pub fn accepts(&self, action: Action) -> bool {
        self.frequency(action) > 0.0
    }

    /// True for mixed decisions.
    pub fn is_mixed(&self) -> bool {
        matches!(self, ActionDecision::Mixed(_))
    }

    /// The most frequent action. Ties go to the action listed first.
    pub fn primary(&self) -> Option<Action> {
        match self {
            ActionDecision::Deterministic(a) => Some(*a),
            ActionDecision::Mixed(freqs) => freqs
                .iter()
                .fold(None, |best: Option<(Action, f64)>, (&a, &f)| match best {
                    Some((_, bf)) if bf >= f => best,
                    _ => Some((a, f)),
                })
                .map(|(a, _)| a),
        }
    }

    /// Short description, e.g. `"cbet"` or `"60% cbet / 40% check"`.
    /// Actions never played are left out.
    pub fn describe(&self) -> String {
        match self {
            ActionDecision::Deterministic(a) => a.to_string(),
            ActionDecision::Mixed(freqs) => freqs
                .iter()
                .filter(|(_, f)| **f > 0.0)
                .map(|(a, f)| format!("{}% {}", (f * 100.0).round(), a))
                .collect::<Vec<_>>()
                .join(" / "),
        }
    }
}

impl RangeEntry {
    /// Resolve a category against this entry.
    pub fn resolve(
        &self,
        context: DecisionContext,
        category: HandCategory,
        fallbacks: &CategoryFallbacks,
    ) -> ActionDecision {
        if let Some(record) = self.mixed_for(category) {
            return ActionDecision::Mixed(record.frequencies.clone());
        }

        let fallback = fallbacks.get(category);
        if let Some(record) = fallback.and_then(|fb| self.mixed_for(fb)) {
            debug!("{}: {} resolved via mixed {}", context, category, record.category);
            return ActionDecision::Mixed(record.frequencies.clone());
        }

        for &action in context.priority() {
            let list = self.list(action);
            if list.contains(&category) {
                return ActionDecision::Deterministic(action);
            }
            if let Some(fb) = fallback.filter(|fb| list.contains(fb)) {
                debug!("{}: {} resolved via {} list {}", context, category, fb, action);
                return ActionDecision::Deterministic(action);
            }
        }

        let action = context.default_action();
        debug!("{}: {} not listed, defaulting to {}", context, category, action);
        ActionDecision::Deterministic(action)
    }
}

/// Resolve a decision from a book.
///
/// Turn contexts read the `blank` transition row; use
/// [`resolve_turn_strategy`] to pick a transition.
pub fn resolve_strategy(
    book: &StrategyBook,
    context: DecisionContext,
    spot: &str,
    texture: BoardTexture,
    category: HandCategory,
) -> Result<ActionDecision, StrategyError> {
    let entry = book.lookup(context, spot, texture, None)?;
    Ok(entry.resolve(context, category, &book.fallbacks))
}

/// Resolve a turn decision, with the turn table's spot and `blank` row
/// fallbacks.
pub fn resolve_turn_strategy(
    book: &StrategyBook,
    context: DecisionContext,
    spot: &str,
    texture: BoardTexture,
    transition: TurnTransition,
    category: HandCategory,
) -> Result<ActionDecision, StrategyError> {
    let entry = book.lookup(context, spot, texture, Some(transition))?;
    Ok(entry.resolve(context, category, &book.fallbacks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::table::MixedEntry;

    fn entry() -> RangeEntry {
        let mut lists = BTreeMap::new();
        lists.insert(Action::Cbet, vec![HandCategory::Set, HandCategory::TopPairGood]);
        lists.insert(Action::Check, vec![HandCategory::LowPair, HandCategory::Set]);
        let mut freqs = BTreeMap::new();
        freqs.insert(Action::Cbet, 0.6);
        freqs.insert(Action::Check, 0.4);
        RangeEntry {
            mixed: vec![MixedEntry {
                category: HandCategory::SecondPair,
                frequencies: freqs,
            }],
            lists,
        }
    }

    #[test]
    fn test_list_priority() {
        let decision = entry().resolve(
            DecisionContext::FlopBet,
            HandCategory::Set,
            &CategoryFallbacks::default(),
        );
        assert_eq!(decision, ActionDecision::Deterministic(Action::Cbet));
    }

    #[test]
    fn test_mixed_fallback() {
        let decision = entry().resolve(
            DecisionContext::FlopBet,
            HandCategory::UnderpairHigh,
            &CategoryFallbacks::default(),
        );
        assert!(decision.is_mixed());
        assert_eq!(decision.frequency(Action::Cbet), 0.6);
        assert_eq!(decision.describe(), "60% cbet / 40% check");
    }

    #[test]
    fn test_list_fallback() {
        let decision = entry().resolve(
            DecisionContext::FlopBet,
            HandCategory::UnderpairLow,
            &CategoryFallbacks::default(),
        );
        assert_eq!(decision, ActionDecision::Deterministic(Action::Check));

        let without = entry().resolve(
            DecisionContext::FlopBet,
            HandCategory::UnderpairLow,
            &CategoryFallbacks::none(),
        );
        assert_eq!(without, ActionDecision::Deterministic(Action::Check));
    }

    #[test]
    fn test_default_action() {
        let fallbacks = CategoryFallbacks::default();
        let empty = RangeEntry::default();
        assert_eq!(
            empty.resolve(DecisionContext::FlopBet, HandCategory::Nothing, &fallbacks),
            ActionDecision::Deterministic(Action::Check)
        );
        assert_eq!(
            empty.resolve(DecisionContext::FacingBet, HandCategory::Set, &fallbacks),
            ActionDecision::Deterministic(Action::Fold)
        );
    }

    #[test]
    fn test_decision_helpers() {
        let det = ActionDecision::Deterministic(Action::Call);
        assert!(det.accepts(Action::Call));
        assert!(!det.accepts(Action::Fold));
        assert_eq!(det.describe(), "call");
        assert_eq!(det.primary(), Some(Action::Call));

        let mut freqs = BTreeMap::new();
        freqs.insert(Action::Raise, 0.0);
        freqs.insert(Action::Call, 0.7);
        freqs.insert(Action::Fold, 0.3);
        let mixed = ActionDecision::Mixed(freqs);
        assert!(!mixed.accepts(Action::Raise));
        assert!(mixed.accepts(Action::Fold));
        assert_eq!(mixed.primary(), Some(Action::Call));
        assert_eq!(mixed.describe(), "70% call / 30% fold");
    }

    #[test]
    fn test_builtin_flop_decisions() {
        let book = StrategyBook::builtin().unwrap();
        let ctx = DecisionContext::FlopBet;
        assert_eq!(
            resolve_strategy(&book, ctx, "BTN_vs_BB", BoardTexture::Dry, HandCategory::Set).unwrap(),
            ActionDecision::Deterministic(Action::Cbet)
        );
        let underpair =
            resolve_strategy(&book, ctx, "BTN_vs_BB", BoardTexture::Dry, HandCategory::UnderpairHigh)
                .unwrap();
        assert_eq!(underpair.frequency(Action::Cbet), 0.6);
        assert!(matches!(
            resolve_strategy(&book, ctx, "UTG_vs_BB", BoardTexture::Dry, HandCategory::Set),
            Err(StrategyError::SpotNotFound { .. })
        ));
    }

    #[test]
    fn test_builtin_turn_decisions() {
        let book = StrategyBook::builtin().unwrap();
        let decision = resolve_turn_strategy(
            &book,
            DecisionContext::TurnBarrel,
            "HJ_vs_BB",
            BoardTexture::Dry,
            TurnTransition::Blank,
            HandCategory::Set,
        )
        .unwrap();
        assert_eq!(decision, ActionDecision::Deterministic(Action::Barrel));
    }
}
