//! Training session state.
//!
//! A session accumulates the score, EV totals, a bounded mistake log and
//! per-situation stats. Situations that keep going wrong are reported as
//! weaknesses and drive focus-mode scenario generation.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::config::TrainerConfig;
use super::grading::{grade, normalize_action, Grade};
use super::scenario::Scenario;
use crate::classify::{BoardTexture, HandCategory, TurnTransition};
use crate::strategy::{Action, ActionDecision, DecisionContext};

/// One wrong answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mistake {
    /// Hand notation, e.g. `AKs`.
    pub hand: String,
    pub board: String,
    pub context: DecisionContext,
    pub spot: String,
    pub texture: BoardTexture,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TurnTransition>,
    pub category: HandCategory,
    /// What the user did.
    pub chosen: Action,
    /// What the book recommends, e.g. `"call"` or `"60% cbet / 40% check"`.
    pub recommended: String,
    pub ev_loss: u32,
}

/// Results for one (context, spot, texture, category) situation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedStat {
    pub context: DecisionContext,
    pub spot: String,
    pub texture: BoardTexture,
    pub category: HandCategory,
    pub attempts: u32,
    pub correct: u32,
    pub ev_lost: u32,
}

impl DetailedStat {
    /// Share of attempts answered correctly (1.0 before any attempt).
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            1.0
        } else {
            f64::from(self.correct) / f64::from(self.attempts)
        }
    }

    fn matches(&self, scenario: &Scenario) -> bool {
        self.context == scenario.context
            && self.spot == scenario.spot
            && self.texture == scenario.texture
            && self.category == scenario.category
    }
}

/// A situation answered wrongly too often.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weakness {
    pub spot: String,
    pub texture: BoardTexture,
    pub category: HandCategory,
    pub attempts: u32,
    pub correct: u32,
    pub success_rate: f64,
    pub ev_lost: u32,
}

/// Score, EV totals, mistakes and stats of one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSession {
    pub correct: u32,
    pub total: u32,
    pub ev_gained: u64,
    pub ev_lost: u64,
    mistakes: VecDeque<Mistake>,
    stats: Vec<DetailedStat>,
    mistake_log_size: usize,
    weakness_min_attempts: u32,
    weakness_threshold: f64,
}

impl Default for TrainingSession {
    fn default() -> Self {
        Self::new(&TrainerConfig::default())
    }
}

impl TrainingSession {
    /// Empty session using the config's log size and weakness rule.
    pub fn new(config: &TrainerConfig) -> Self {
        Self {
            correct: 0,
            total: 0,
            ev_gained: 0,
            ev_lost: 0,
            mistakes: VecDeque::with_capacity(config.mistake_log_size + 1),
            stats: Vec::new(),
            mistake_log_size: config.mistake_log_size,
            weakness_min_attempts: config.weakness_min_attempts,
            weakness_threshold: config.weakness_threshold,
        }
    }

    /// Grade an answer and record it.
    pub fn record(
        &mut self,
        scenario: &Scenario,
        decision: &ActionDecision,
        chosen: Action,
    ) -> Grade {
        let chosen = normalize_action(scenario.context, chosen);
        let result = grade(scenario.context, scenario.category, decision, chosen);

        self.total += 1;
        if result.correct {
            self.correct += 1;
            self.ev_gained += u64::from(result.ev_gain);
        } else {
            self.ev_lost += u64::from(result.ev_loss);
            self.mistakes.push_front(Mistake {
                hand: scenario.hand_notation(),
                board: scenario.deal.board().to_string(),
                context: scenario.context,
                spot: scenario.spot.clone(),
                texture: scenario.texture,
                transition: scenario.transition,
                category: scenario.category,
                chosen,
                recommended: decision.describe(),
                ev_loss: result.ev_loss,
            });
            self.mistakes.truncate(self.mistake_log_size);
        }

        let stat = match self.stats.iter().position(|s| s.matches(scenario)) {
            Some(i) => &mut self.stats[i],
            None => {
                self.stats.push(DetailedStat {
                    context: scenario.context,
                    spot: scenario.spot.clone(),
                    texture: scenario.texture,
                    category: scenario.category,
                    attempts: 0,
                    correct: 0,
                    ev_lost: 0,
                });
                let last = self.stats.len() - 1;
                &mut self.stats[last]
            }
        };
        stat.attempts += 1;
        if result.correct {
            stat.correct += 1;
        } else {
            stat.ev_lost += result.ev_loss;
        }

        debug!(
            "{} {} {} {}: {} -> {}",
            scenario.context,
            scenario.spot,
            scenario.texture,
            scenario.category,
            chosen,
            if result.correct { "correct" } else { "wrong" }
        );
        result
    }

    /// Share of answers that were correct (0.0 before any answer).
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.correct) / f64::from(self.total)
        }
    }

    /// EV gained minus EV lost.
    pub fn net_ev(&self) -> i64 {
        self.ev_gained as i64 - self.ev_lost as i64
    }

    /// Mistakes, newest first.
    pub fn mistakes(&self) -> impl Iterator<Item = &Mistake> {
        self.mistakes.iter()
    }

    /// All per-situation stats, in first-seen order.
    pub fn stats(&self) -> &[DetailedStat] {
        &self.stats
    }

    /// Situations in `context` with enough attempts and a success rate under
    /// the threshold, weakest first.
    pub fn weaknesses(&self, context: DecisionContext, limit: usize) -> Vec<Weakness> {
        let mut weaknesses: Vec<Weakness> = self
            .stats
            .iter()
            .filter(|s| s.context == context)
            .filter(|s| {
                s.attempts >= self.weakness_min_attempts
                    && s.success_rate() < self.weakness_threshold
            })
            .map(|s| Weakness {
                spot: s.spot.clone(),
                texture: s.texture,
                category: s.category,
                attempts: s.attempts,
                correct: s.correct,
                success_rate: s.success_rate(),
                ev_lost: s.ev_lost,
            })
            .collect();
        weaknesses.sort_by(|a, b| a.success_rate.total_cmp(&b.success_rate));
        weaknesses.truncate(limit);
        weaknesses
    }

    /// Clear everything but the settings.
    pub fn reset(&mut self) {
        self.correct = 0;
        self.total = 0;
        self.ev_gained = 0;
        self.ev_lost = 0;
        self.mistakes.clear();
        self.stats.clear();
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Deal;

    fn scenario(hand: &str, board: &str) -> Scenario {
        let deal = Deal::parse(hand, board).unwrap();
        Scenario::new(DecisionContext::FlopBet, "BTN_vs_BB", deal)
    }

    #[test]
    fn test_score_and_ev() {
        let mut session = TrainingSession::default();
        let s = scenario("7s7h", "7d4c2h");
        let cbet = ActionDecision::Deterministic(Action::Cbet);

        assert!(session.record(&s, &cbet, Action::Cbet).correct);
        assert!(!session.record(&s, &cbet, Action::Check).correct);

        assert_eq!((session.correct, session.total), (1, 2));
        assert_eq!(session.ev_gained, 95);
        assert_eq!(session.ev_lost, 57);
        assert_eq!(session.net_ev(), 38);
        assert_eq!(session.accuracy(), 0.5);
    }

    #[test]
    fn test_mistake_log_is_bounded_newest_first() {
        let config = TrainerConfig::default().with_mistake_log_size(3);
        let mut session = TrainingSession::new(&config);
        let check = ActionDecision::Deterministic(Action::Check);
        let boards = ["Kd9c2s", "Qd9c2s", "Jd9c2s", "Td8c2s"];
        for board in boards {
            session.record(&scenario("7s4h", board), &check, Action::Cbet);
        }

        let boards: Vec<&str> = session.mistakes().map(|m| m.board.as_str()).collect();
        assert_eq!(boards, vec!["Td8c2s", "Jd9c2s", "Qd9c2s"]);
        assert_eq!(session.mistakes().next().map(|m| m.recommended.as_str()), Some("check"));
    }

    #[test]
    fn test_weaknesses() {
        let mut session = TrainingSession::default();
        let cbet = ActionDecision::Deterministic(Action::Cbet);
        let set = scenario("7s7h", "7d4c2h");
        let overpair = scenario("QsQh", "9d4c2h");

        // set: 1/4 correct
        session.record(&set, &cbet, Action::Cbet);
        for _ in 0..3 {
            session.record(&set, &cbet, Action::Check);
        }
        // overpair: 2/3 correct
        session.record(&overpair, &cbet, Action::Cbet);
        session.record(&overpair, &cbet, Action::Cbet);
        session.record(&overpair, &cbet, Action::Check);
        // too few attempts
        session.record(&scenario("AsKd", "9d4c2h"), &cbet, Action::Check);

        let weak = session.weaknesses(DecisionContext::FlopBet, 5);
        let categories: Vec<HandCategory> = weak.iter().map(|w| w.category).collect();
        assert_eq!(categories, vec![HandCategory::Set, HandCategory::Overpair]);
        assert_eq!(weak[0].success_rate, 0.25);
        assert_eq!(session.weaknesses(DecisionContext::FlopBet, 1).len(), 1);
        assert!(session.weaknesses(DecisionContext::FacingBet, 5).is_empty());
    }

    #[test]
    fn test_json_round_trip_and_reset() {
        let mut session = TrainingSession::default();
        let s = scenario("7s7h", "7d4c2h");
        session.record(&s, &ActionDecision::Deterministic(Action::Cbet), Action::Check);

        let restored = TrainingSession::from_json(&session.to_json().unwrap()).unwrap();
        assert_eq!(restored, session);

        session.reset();
        assert_eq!(session.total, 0);
        assert_eq!(session.mistakes().count(), 0);
        assert!(session.stats().is_empty());
    }
}
