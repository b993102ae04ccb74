//! Parallel batch evaluation.
//!
//! Deals many independent flop-and-turn scenarios across the rayon pool and
//! tallies how often each category, texture, transition and recommended
//! action comes up. Sample `i` uses seed `base + i`, so a seeded batch gives
//! the same report regardless of thread count.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::config::TrainerConfig;
use super::scenario::{Scenario, ScenarioError, ScenarioGenerator};
use crate::classify::{BoardTexture, HandCategory, TurnTransition};
use crate::strategy::{Action, ActionDecision, StrategyBook};

/// One evaluated flop and its turn.
#[derive(Debug, Clone)]
pub struct Sample {
    pub flop: Scenario,
    pub flop_decision: ActionDecision,
    pub turn: Scenario,
    pub turn_decision: ActionDecision,
}

/// Histograms over a batch of samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub samples: usize,
    pub textures: BTreeMap<BoardTexture, usize>,
    pub flop_categories: BTreeMap<HandCategory, usize>,
    pub turn_categories: BTreeMap<HandCategory, usize>,
    pub transitions: BTreeMap<TurnTransition, usize>,
    /// Most frequent recommended flop action.
    pub flop_actions: BTreeMap<Action, usize>,
    /// Most frequent recommended turn action.
    pub turn_actions: BTreeMap<Action, usize>,
    pub mixed_flop: usize,
    pub mixed_turn: usize,
}

impl BatchReport {
    /// Count one sample.
    pub fn add(&mut self, sample: &Sample) {
        self.samples += 1;
        *self.textures.entry(sample.flop.texture).or_default() += 1;
        *self.flop_categories.entry(sample.flop.category).or_default() += 1;
        *self.turn_categories.entry(sample.turn.category).or_default() += 1;
        if let Some(transition) = sample.turn.transition {
            *self.transitions.entry(transition).or_default() += 1;
        }
        if let Some(action) = sample.flop_decision.primary() {
            *self.flop_actions.entry(action).or_default() += 1;
        }
        if let Some(action) = sample.turn_decision.primary() {
            *self.turn_actions.entry(action).or_default() += 1;
        }
        if sample.flop_decision.is_mixed() {
            self.mixed_flop += 1;
        }
        if sample.turn_decision.is_mixed() {
            self.mixed_turn += 1;
        }
    }

    /// Share of flop decisions that were mixed.
    pub fn mixed_flop_rate(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.mixed_flop as f64 / self.samples as f64
        }
    }
}

/// Deal and resolve one flop and its turn.
pub fn evaluate_sample(
    book: &StrategyBook,
    generator: &mut ScenarioGenerator,
) -> Result<Sample, ScenarioError> {
    let flop = generator.random(book)?;
    let flop_decision = flop.decision(book)?;
    let turn = generator.deal_turn(&flop)?;
    let turn_decision = turn.decision(book)?;
    Ok(Sample {
        flop,
        flop_decision,
        turn,
        turn_decision,
    })
}

/// Evaluate `count` samples in parallel.
///
/// `on_progress` is called with the number of finished samples after each
/// one completes, from whichever worker finished it.
pub fn evaluate_batch<F>(
    book: &StrategyBook,
    config: &TrainerConfig,
    count: usize,
    on_progress: F,
) -> Result<BatchReport, ScenarioError>
where
    F: Fn(usize) + Sync,
{
    config.validate()?;
    let base_seed = config.seed.unwrap_or_else(rand::random);
    let completed = AtomicUsize::new(0);

    let samples: Vec<Sample> = (0..count)
        .into_par_iter()
        .map(|i| -> Result<Sample, ScenarioError> {
            let seeded = config.clone().with_seed(base_seed.wrapping_add(i as u64));
            let mut generator = ScenarioGenerator::new(seeded)?;
            let sample = evaluate_sample(book, &mut generator)?;
            on_progress(completed.fetch_add(1, Ordering::Relaxed) + 1);
            Ok(sample)
        })
        .collect::<Result<_, ScenarioError>>()?;

    let mut report = BatchReport::default();
    for sample in &samples {
        report.add(sample);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::DecisionContext;

    #[test]
    fn test_batch_counts() {
        let book = StrategyBook::builtin().unwrap();
        let config = TrainerConfig::default().with_seed(17);
        let progress = AtomicUsize::new(0);
        let report = evaluate_batch(&book, &config, 200, |done| {
            progress.fetch_max(done, Ordering::Relaxed);
        })
        .unwrap();

        assert_eq!(report.samples, 200);
        assert_eq!(progress.load(Ordering::Relaxed), 200);
        assert_eq!(report.textures.values().sum::<usize>(), 200);
        assert_eq!(report.flop_categories.values().sum::<usize>(), 200);
        assert_eq!(report.transitions.values().sum::<usize>(), 200);
        assert_eq!(report.flop_actions.values().sum::<usize>(), 200);
        assert!(report
            .flop_actions
            .keys()
            .all(|a| DecisionContext::FlopBet.allows(*a)));
        assert!(report
            .turn_actions
            .keys()
            .all(|a| DecisionContext::TurnBarrel.allows(*a)));
    }

    #[test]
    fn test_seeded_batch_is_deterministic() {
        let book = StrategyBook::builtin().unwrap();
        let config = TrainerConfig::default()
            .with_context(DecisionContext::FacingBet)
            .with_seed(4);
        let a = evaluate_batch(&book, &config, 64, |_| {}).unwrap();
        let b = evaluate_batch(&book, &config, 64, |_| {}).unwrap();
        assert_eq!(a, b);
        assert!(a
            .turn_actions
            .keys()
            .all(|a| DecisionContext::FacingDoubleBarrel.allows(*a)));
    }

    #[test]
    fn test_turn_context_rejected_before_dealing() {
        let book = StrategyBook::builtin().unwrap();
        let config = TrainerConfig::default().with_context(DecisionContext::TurnBarrel);
        let calls = AtomicUsize::new(0);
        let result = evaluate_batch(&book, &config, 10, |_| {
            calls.fetch_add(1, Ordering::Relaxed);
        });
        assert!(matches!(result, Err(ScenarioError::Config(_))));
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }
}
