//! Grading a chosen action against the recommended one.
//!
//! EV figures are training points, not chips: each category carries a weight
//! reflecting how much is at stake with that holding, and mistakes cost a
//! share of it depending on the kind of error.

use serde::{Deserialize, Serialize};

use crate::classify::HandCategory;
use crate::strategy::{Action, ActionDecision, DecisionContext};

/// Stake weight of a category.
pub fn category_weight(category: HandCategory) -> u32 {
    match category {
        HandCategory::StraightFlush => 100,
        HandCategory::Quads => 99,
        HandCategory::FullHouse => 98,
        HandCategory::Flush => 97,
        HandCategory::Straight => 96,
        HandCategory::Set => 95,
        HandCategory::Trips => 90,
        HandCategory::TwoPair => 85,
        HandCategory::Overpair => 80,
        HandCategory::TopPairGood => 70,
        HandCategory::TopPairWeak => 60,
        HandCategory::UnderpairHigh => 55,
        HandCategory::FlushDraw => 55,
        HandCategory::Oesd => 50,
        HandCategory::SecondPair => 45,
        HandCategory::UnderpairLow => 40,
        HandCategory::Gutshot => 35,
        HandCategory::LowPair => 30,
        HandCategory::Overcards => 25,
        HandCategory::AceHigh => 20,
        HandCategory::Nothing => 10,
    }
}

/// Outcome of one graded decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    /// The action was accepted.
    pub correct: bool,
    /// Frequency of the chosen action in the recommendation.
    pub frequency: f64,
    /// Points gained (zero on a mistake).
    pub ev_gain: u32,
    /// Points lost (zero when correct).
    pub ev_loss: u32,
}

/// Map an action onto the context's vocabulary. A bet on the turn is a
/// barrel, whatever the caller named it.
pub fn normalize_action(context: DecisionContext, action: Action) -> Action {
    match (context, action) {
        (DecisionContext::TurnBarrel, Action::Cbet) => Action::Barrel,
        (DecisionContext::FlopBet, Action::Barrel) => Action::Cbet,
        _ => action,
    }
}

/// Grade `chosen` against `decision`.
///
/// A deterministic decision accepts only its action; a mixed one accepts
/// every action it plays with positive frequency, and the gain scales with
/// that frequency.
pub fn grade(
    context: DecisionContext,
    category: HandCategory,
    decision: &ActionDecision,
    chosen: Action,
) -> Grade {
    let chosen = normalize_action(context, chosen);
    let weight = f64::from(category_weight(category));
    let frequency = decision.frequency(chosen);

    if decision.accepts(chosen) {
        return Grade {
            correct: true,
            frequency,
            ev_gain: (weight * frequency).round() as u32,
            ev_loss: 0,
        };
    }

    let expected = match decision {
        ActionDecision::Deterministic(action) => Some(*action),
        ActionDecision::Mixed(_) => None,
    };
    Grade {
        correct: false,
        frequency,
        ev_gain: 0,
        ev_loss: (weight * loss_multiplier(context, expected, chosen)).round() as u32,
    }
}

fn loss_multiplier(context: DecisionContext, expected: Option<Action>, chosen: Action) -> f64 {
    use Action::*;

    match (context, expected, chosen) {
        (DecisionContext::FlopBet, Some(Cbet), Check) => 0.6,
        (DecisionContext::FlopBet, Some(Check), Cbet) => 0.8,
        (DecisionContext::TurnBarrel, Some(Barrel), Check) => 0.5,
        (DecisionContext::TurnBarrel, Some(Check), Barrel) => 0.7,
        (DecisionContext::FacingBet | DecisionContext::FacingDoubleBarrel, Some(expected), chosen) => {
            match (expected, chosen) {
                (Raise, Fold) | (Fold, Raise) => 1.0,
                (Call, Fold) => 0.5,
                (Fold, Call) => 0.6,
                _ => 0.5,
            }
        }
        _ => 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn mixed(pairs: &[(Action, f64)]) -> ActionDecision {
        ActionDecision::Mixed(pairs.iter().copied().collect::<BTreeMap<_, _>>())
    }

    #[test]
    fn test_deterministic_grades() {
        let cbet = ActionDecision::Deterministic(Action::Cbet);
        let ok = grade(DecisionContext::FlopBet, HandCategory::Set, &cbet, Action::Cbet);
        assert!(ok.correct);
        assert_eq!(ok.ev_gain, 95);

        let missed = grade(DecisionContext::FlopBet, HandCategory::Set, &cbet, Action::Check);
        assert!(!missed.correct);
        assert_eq!(missed.ev_loss, 57);

        let check = ActionDecision::Deterministic(Action::Check);
        let bluff = grade(DecisionContext::FlopBet, HandCategory::Nothing, &check, Action::Cbet);
        assert_eq!(bluff.ev_loss, 8);
    }

    #[test]
    fn test_mixed_grades() {
        let decision = mixed(&[(Action::Cbet, 0.6), (Action::Check, 0.4)]);
        let g = grade(DecisionContext::FlopBet, HandCategory::SecondPair, &decision, Action::Check);
        assert!(g.correct);
        assert_eq!(g.frequency, 0.4);
        assert_eq!(g.ev_gain, 18);

        let calls = mixed(&[(Action::Call, 0.5), (Action::Fold, 0.5)]);
        let raised = grade(DecisionContext::FacingBet, HandCategory::Gutshot, &calls, Action::Raise);
        assert!(!raised.correct);
        assert_eq!(raised.ev_loss, 18);
    }

    #[test]
    fn test_facing_loss_multipliers() {
        let ctx = DecisionContext::FacingBet;
        let raise = ActionDecision::Deterministic(Action::Raise);
        let call = ActionDecision::Deterministic(Action::Call);
        let fold = ActionDecision::Deterministic(Action::Fold);
        assert_eq!(grade(ctx, HandCategory::Set, &raise, Action::Fold).ev_loss, 95);
        assert_eq!(grade(ctx, HandCategory::Overpair, &call, Action::Fold).ev_loss, 40);
        assert_eq!(grade(ctx, HandCategory::Nothing, &fold, Action::Call).ev_loss, 6);
        assert_eq!(grade(ctx, HandCategory::Nothing, &fold, Action::Raise).ev_loss, 10);
        assert_eq!(grade(ctx, HandCategory::Set, &raise, Action::Call).ev_loss, 48);
    }

    #[test]
    fn test_turn_barrel_grades() {
        let ctx = DecisionContext::TurnBarrel;
        let barrel = ActionDecision::Deterministic(Action::Barrel);
        assert!(grade(ctx, HandCategory::Set, &barrel, Action::Cbet).correct);
        assert_eq!(grade(ctx, HandCategory::Set, &barrel, Action::Check).ev_loss, 48);

        let check = ActionDecision::Deterministic(Action::Check);
        assert_eq!(grade(ctx, HandCategory::Nothing, &check, Action::Barrel).ev_loss, 7);
    }
}
