//! Random training scenarios.
//!
//! A scenario is a deal plus everything the strategy book needs to answer
//! it: context, spot, flop texture, turn transition and hand category.
//! Generation is driven by a seedable `StdRng` so drills can be replayed.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::config::{ConfigError, TrainerConfig};
use super::session::TrainingSession;
use crate::cards::{Board, Card, CardError, Deal, Deck, HoleCards, Street};
use crate::classify::{
    classify_board, classify_board_texture, classify_board_turn, BoardTexture, HandCategory,
    TurnTransition,
};
use crate::strategy::{ActionDecision, DecisionContext, StrategyBook, StrategyError};

/// Weaknesses considered when picking a focus scenario.
const FOCUS_WEAKNESS_LIMIT: usize = 10;

/// Errors raised while generating scenarios.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    #[error("the strategy book has no spots for {0}")]
    NoSpots(DecisionContext),
    #[error("{0} has no turn follow-up")]
    NotAFlopContext(DecisionContext),
    #[error("the scenario is already past the flop")]
    TurnAlreadyDealt,
    #[error("the deck ran out of cards")]
    DeckExhausted,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Card(#[from] CardError),
    #[error(transparent)]
    Strategy(#[from] StrategyError),
}

/// A deal with its strategy-book keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub context: DecisionContext,
    pub spot: String,
    pub deal: Deal,
    /// Texture of the flop, kept on later streets.
    pub texture: BoardTexture,
    /// What the turn changed; `None` on the flop.
    pub transition: Option<TurnTransition>,
    pub category: HandCategory,
}

impl Scenario {
    /// Classify a deal for a context and spot.
    pub fn new(context: DecisionContext, spot: &str, deal: Deal) -> Self {
        let texture = classify_board(deal.board());
        let transition = classify_board_turn(deal.board());
        let category = deal.category();
        Self {
            context,
            spot: spot.to_string(),
            deal,
            texture,
            transition,
            category,
        }
    }

    /// Hand notation of the hero's cards, e.g. `AKs`.
    pub fn hand_notation(&self) -> String {
        self.deal.hand().notation()
    }

    /// The book's recommendation for this scenario.
    pub fn decision(&self, book: &StrategyBook) -> Result<ActionDecision, StrategyError> {
        let entry = book.lookup(self.context, &self.spot, self.texture, self.transition)?;
        Ok(entry.resolve(self.context, self.category, &book.fallbacks))
    }

    /// Context the hand continues in on the turn.
    pub fn turn_context(&self) -> Option<DecisionContext> {
        match self.context {
            DecisionContext::FlopBet => Some(DecisionContext::TurnBarrel),
            DecisionContext::FacingBet => Some(DecisionContext::FacingDoubleBarrel),
            DecisionContext::TurnBarrel | DecisionContext::FacingDoubleBarrel => None,
        }
    }
}

/// Seedable scenario source.
pub struct ScenarioGenerator {
    config: TrainerConfig,
    rng: StdRng,
}

impl ScenarioGenerator {
    /// Generator seeded from `config.seed`, or from entropy. The config is
    /// validated first, so a turn context is rejected here.
    pub fn new(config: TrainerConfig) -> Result<Self, ScenarioError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    /// The generator's options.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Deal a flop of the target texture from `deck`.
    ///
    /// Tries up to `texture_attempts` random flops from the remaining cards.
    /// When none matches, the next three cards are dealt as they are.
    pub fn board_for_texture(&mut self, target: BoardTexture, deck: &mut Deck) -> Vec<Card> {
        let mut candidates = deck.remaining_cards().to_vec();
        for _ in 0..self.config.texture_attempts {
            let (flop, _) = candidates.partial_shuffle(&mut self.rng, 3);
            if let &mut [a, b, c] = flop {
                if classify_board_texture(&[a, b, c]) == target {
                    let flop = vec![a, b, c];
                    deck.remove(&flop);
                    return flop;
                }
            }
        }
        debug!("no {} flop after {} attempts", target, self.config.texture_attempts);
        deck.deal_n(3)
    }

    /// A random flop scenario from the configured spots and textures.
    pub fn random(&mut self, book: &StrategyBook) -> Result<Scenario, ScenarioError> {
        let spot = self.pick_spot(book)?;
        let textures = self.config.active_textures();
        let texture = textures
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(BoardTexture::Dry);
        self.deal_scenario(&spot, texture)
    }

    /// A flop scenario aimed at one of the session's weaknesses.
    ///
    /// Weaknesses are picked with weight `1 - success_rate`, then up to
    /// `focus_attempts` deals are tried to hit the weak category. Without
    /// weaknesses this is [`ScenarioGenerator::random`].
    pub fn focus(
        &mut self,
        book: &StrategyBook,
        session: &TrainingSession,
    ) -> Result<Scenario, ScenarioError> {
        let weaknesses = session.weaknesses(self.config.context, FOCUS_WEAKNESS_LIMIT);
        if weaknesses.is_empty() {
            return self.random(book);
        }

        let total: f64 = weaknesses.iter().map(|w| 1.0 - w.success_rate).sum();
        let mut remaining = self.rng.gen::<f64>() * total;
        let mut target = &weaknesses[0];
        for weakness in &weaknesses {
            remaining -= 1.0 - weakness.success_rate;
            if remaining <= 0.0 {
                target = weakness;
                break;
            }
        }

        let mut scenario = self.deal_scenario(&target.spot, target.texture)?;
        for _ in 1..self.config.focus_attempts {
            if scenario.category == target.category {
                return Ok(scenario);
            }
            scenario = self.deal_scenario(&target.spot, target.texture)?;
        }
        if scenario.category != target.category {
            warn!(
                "focus: no {} hand on {} {} after {} attempts",
                target.category, target.spot, target.texture, self.config.focus_attempts
            );
        }
        Ok(scenario)
    }

    /// Deal the turn to a flop scenario and reclassify it in the turn context.
    pub fn deal_turn(&mut self, flop: &Scenario) -> Result<Scenario, ScenarioError> {
        let context = flop
            .turn_context()
            .ok_or(ScenarioError::NotAFlopContext(flop.context))?;
        if flop.deal.board().street() != Street::Flop {
            return Err(ScenarioError::TurnAlreadyDealt);
        }

        let mut deck = Deck::without(&flop.deal.all_cards());
        deck.shuffle(&mut self.rng);
        let turn = deck.deal().ok_or(ScenarioError::DeckExhausted)?;
        let deal = flop.deal.with_board_card(turn)?;

        let mut scenario = Scenario::new(context, &flop.spot, deal);
        scenario.texture = flop.texture;
        Ok(scenario)
    }

    fn pick_spot(&mut self, book: &StrategyBook) -> Result<String, ScenarioError> {
        let available = book.spots(self.config.context);
        let filtered: Vec<&str> = available
            .iter()
            .copied()
            .filter(|s| self.config.spots.iter().any(|c| c == s))
            .collect();
        let pool = if filtered.is_empty() { &available } else { &filtered };
        pool.choose(&mut self.rng)
            .map(|s| s.to_string())
            .ok_or(ScenarioError::NoSpots(self.config.context))
    }

    fn deal_scenario(&mut self, spot: &str, texture: BoardTexture) -> Result<Scenario, ScenarioError> {
        let mut deck = Deck::new();
        deck.shuffle(&mut self.rng);
        let flop = self.board_for_texture(texture, &mut deck);
        let hole = deck.deal_n(2);
        let (&c1, &c2) = match hole.as_slice() {
            [c1, c2] => (c1, c2),
            _ => return Err(ScenarioError::DeckExhausted),
        };
        let deal = Deal::new(HoleCards::new(c1, c2)?, Board::new(flop)?)?;
        Ok(Scenario::new(self.config.context, spot, deal))
    }
}
