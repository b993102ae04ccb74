//! Strategy book loaded from JSON.
//!
//! A book holds one table per decision context. Flop tables are keyed by
//! spot and texture; turn tables add the turn transition and carry a
//! default spot used when the requested one is missing.
//!
//! Books are validated once at load time, so every mixed record seen by the
//! resolver already sums to 1.0 and uses only its context's actions.

use log::{info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::action::{Action, DecisionContext};
use super::resolve::StrategyError;
use crate::classify::{BoardTexture, HandCategory, TurnTransition};

/// Allowed distance of a mixed record's frequency sum from 1.0.
pub const FREQUENCY_TOLERANCE: f64 = 1e-6;

const BUILTIN_BOOK: &str = include_str!("../../data/strategy_tables.json");

/// Errors raised while loading or validating a strategy book.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("{context} {location}: mixed frequencies for {category} sum to {sum}")]
    FrequencySum {
        context: DecisionContext,
        location: String,
        category: HandCategory,
        sum: f64,
    },
    #[error("{context} {location}: negative frequency {value} for {category} {action}")]
    NegativeFrequency {
        context: DecisionContext,
        location: String,
        category: HandCategory,
        action: Action,
        value: f64,
    },
    #[error("{context} {location}: action {action} is not valid in this context")]
    ForeignAction {
        context: DecisionContext,
        location: String,
        action: Action,
    },
    #[error("{context} {location}: {category} has more than one mixed record")]
    DuplicateMixed {
        context: DecisionContext,
        location: String,
        category: HandCategory,
    },
    #[error("{context}: default spot {spot} has no table")]
    UnknownDefaultSpot {
        context: DecisionContext,
        spot: String,
    },
}

// ============================================================================
// Entries
// ============================================================================

/// Mixed-strategy record for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixedEntry {
    /// Category this record applies to.
    pub category: HandCategory,
    /// Action frequencies, summing to 1.0.
    #[serde(flatten)]
    pub frequencies: BTreeMap<Action, f64>,
}

/// Action lists and mixed records for one table cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeEntry {
    /// Mixed records, at most one per category.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mixed: Vec<MixedEntry>,
    /// Categories that always take the keyed action.
    #[serde(flatten)]
    pub lists: BTreeMap<Action, Vec<HandCategory>>,
}

impl RangeEntry {
    /// The mixed record for `category`, if any.
    pub fn mixed_for(&self, category: HandCategory) -> Option<&MixedEntry> {
        self.mixed.iter().find(|m| m.category == category)
    }

    /// The action list for `action` (empty when absent).
    pub fn list(&self, action: Action) -> &[HandCategory] {
        self.lists.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    fn validate(&self, context: DecisionContext, location: &str) -> Result<(), TableError> {
        let foreign = |action: Action| TableError::ForeignAction {
            context,
            location: location.to_string(),
            action,
        };

        if let Some(&action) = self.lists.keys().find(|&&a| !context.allows(a)) {
            return Err(foreign(action));
        }

        for (i, record) in self.mixed.iter().enumerate() {
            if self.mixed[..i].iter().any(|m| m.category == record.category) {
                return Err(TableError::DuplicateMixed {
                    context,
                    location: location.to_string(),
                    category: record.category,
                });
            }

            let mut sum = 0.0;
            for (&action, &value) in &record.frequencies {
                if !context.allows(action) {
                    return Err(foreign(action));
                }
                if value < 0.0 || !value.is_finite() {
                    return Err(TableError::NegativeFrequency {
                        context,
                        location: location.to_string(),
                        category: record.category,
                        action,
                        value,
                    });
                }
                sum += value;
            }

            if (sum - 1.0).abs() > FREQUENCY_TOLERANCE {
                return Err(TableError::FrequencySum {
                    context,
                    location: location.to_string(),
                    category: record.category,
                    sum,
                });
            }
        }

        Ok(())
    }
}

/// Category substitutions tried when a category has no entry of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryFallbacks(FxHashMap<HandCategory, HandCategory>);

impl CategoryFallbacks {
    /// No substitutions.
    pub fn none() -> Self {
        Self(FxHashMap::default())
    }

    /// Add or replace a substitution.
    pub fn with(mut self, from: HandCategory, to: HandCategory) -> Self {
        self.0.insert(from, to);
        self
    }

    /// Substitute for `category`, if any.
    pub fn get(&self, category: HandCategory) -> Option<HandCategory> {
        self.0.get(&category).copied()
    }
}

impl Default for CategoryFallbacks {
    fn default() -> Self {
        Self::none()
            .with(HandCategory::UnderpairHigh, HandCategory::SecondPair)
            .with(HandCategory::UnderpairLow, HandCategory::LowPair)
    }
}

// ============================================================================
// Tables
// ============================================================================

/// Flop table: spot → texture → entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyTable {
    spots: FxHashMap<String, FxHashMap<BoardTexture, RangeEntry>>,
}

impl StrategyTable {
    /// Insert or replace a cell.
    pub fn insert(&mut self, spot: &str, texture: BoardTexture, entry: RangeEntry) {
        self.spots.entry(spot.to_string()).or_default().insert(texture, entry);
    }

    /// Look up a cell.
    pub fn entry(
        &self,
        context: DecisionContext,
        spot: &str,
        texture: BoardTexture,
    ) -> Result<&RangeEntry, StrategyError> {
        let textures = self.spots.get(spot).ok_or_else(|| StrategyError::SpotNotFound {
            context,
            spot: spot.to_string(),
        })?;
        textures.get(&texture).ok_or_else(|| StrategyError::TextureNotFound {
            context,
            spot: spot.to_string(),
            texture,
        })
    }

    /// Spot names, sorted.
    pub fn spots(&self) -> Vec<&str> {
        let mut spots: Vec<&str> = self.spots.keys().map(String::as_str).collect();
        spots.sort_unstable();
        spots
    }

    fn validate(&self, context: DecisionContext) -> Result<(), TableError> {
        for (spot, textures) in &self.spots {
            for (texture, entry) in textures {
                entry.validate(context, &format!("{}/{}", spot, texture))?;
            }
        }
        Ok(())
    }
}

/// Turn table: spot → texture → transition → entry, with a default spot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnStrategyTable {
    /// Spot used when the requested spot has no table.
    pub default_spot: String,
    spots: FxHashMap<String, FxHashMap<BoardTexture, FxHashMap<TurnTransition, RangeEntry>>>,
}

impl TurnStrategyTable {
    /// Empty table with the given default spot.
    pub fn new(default_spot: &str) -> Self {
        Self {
            default_spot: default_spot.to_string(),
            spots: FxHashMap::default(),
        }
    }

    /// Insert or replace a cell.
    pub fn insert(
        &mut self,
        spot: &str,
        texture: BoardTexture,
        transition: TurnTransition,
        entry: RangeEntry,
    ) {
        self.spots
            .entry(spot.to_string())
            .or_default()
            .entry(texture)
            .or_default()
            .insert(transition, entry);
    }

    /// Look up a cell. A missing spot falls back to `default_spot` and a
    /// missing transition row falls back to `blank`.
    pub fn entry(
        &self,
        context: DecisionContext,
        spot: &str,
        texture: BoardTexture,
        transition: TurnTransition,
    ) -> Result<&RangeEntry, StrategyError> {
        let (spot, textures) = match self.spots.get(spot) {
            Some(textures) => (spot, textures),
            None => {
                let textures = self.spots.get(&self.default_spot).ok_or_else(|| {
                    StrategyError::SpotNotFound {
                        context,
                        spot: spot.to_string(),
                    }
                })?;
                warn!(
                    "{}: no table for spot {}, using {}",
                    context, spot, self.default_spot
                );
                (self.default_spot.as_str(), textures)
            }
        };

        let transitions = textures
            .get(&texture)
            .ok_or_else(|| StrategyError::TextureNotFound {
                context,
                spot: spot.to_string(),
                texture,
            })?;

        if let Some(entry) = transitions.get(&transition) {
            return Ok(entry);
        }
        let blank = transitions.get(&TurnTransition::Blank).ok_or_else(|| {
            StrategyError::TransitionNotFound {
                context,
                spot: spot.to_string(),
                texture,
                transition,
            }
        })?;
        warn!(
            "{}: no {} row for {}/{}, using blank",
            context, transition, spot, texture
        );
        Ok(blank)
    }

    /// Spot names, sorted.
    pub fn spots(&self) -> Vec<&str> {
        let mut spots: Vec<&str> = self.spots.keys().map(String::as_str).collect();
        spots.sort_unstable();
        spots
    }

    fn validate(&self, context: DecisionContext) -> Result<(), TableError> {
        if !self.spots.contains_key(&self.default_spot) {
            return Err(TableError::UnknownDefaultSpot {
                context,
                spot: self.default_spot.clone(),
            });
        }
        for (spot, textures) in &self.spots {
            for (texture, transitions) in textures {
                for (transition, entry) in transitions {
                    entry.validate(context, &format!("{}/{}/{}", spot, texture, transition))?;
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Book Loading and Validation
// ============================================================================

/// All strategy tables plus the shared category fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyBook {
    /// Format version of the book.
    pub version: String,
    /// Human-readable name.
    pub name: String,
    /// Category substitutions shared by every table.
    #[serde(default)]
    pub fallbacks: CategoryFallbacks,
    /// Preflop raiser on the flop.
    pub flop_bet: StrategyTable,
    /// Big blind facing a flop c-bet.
    pub facing_bet: StrategyTable,
    /// Preflop raiser on the turn.
    pub turn_barrel: TurnStrategyTable,
    /// Big blind facing a turn barrel.
    pub facing_double_barrel: TurnStrategyTable,
}

impl StrategyBook {
    /// The book compiled into the crate.
    pub fn builtin() -> Result<Self, TableError> {
        Self::from_json_str(BUILTIN_BOOK)
    }

    /// Load a book from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| TableError::IoError(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json_str(&content)
    }

    /// Parse and validate a book from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        let book: Self =
            serde_json::from_str(json).map_err(|e| TableError::ParseError(e.to_string()))?;
        book.validate()?;
        info!(
            "loaded strategy book '{}' v{} ({} flop spots, {} facing spots)",
            book.name,
            book.version,
            book.flop_bet.spots().len(),
            book.facing_bet.spots().len()
        );
        Ok(book)
    }

    /// Check every mixed record and action list against its context.
    pub fn validate(&self) -> Result<(), TableError> {
        self.flop_bet.validate(DecisionContext::FlopBet)?;
        self.facing_bet.validate(DecisionContext::FacingBet)?;
        self.turn_barrel.validate(DecisionContext::TurnBarrel)?;
        self.facing_double_barrel
            .validate(DecisionContext::FacingDoubleBarrel)?;
        Ok(())
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, TableError> {
        serde_json::to_string_pretty(self).map_err(|e| TableError::ParseError(e.to_string()))
    }

    /// Spot names available for a context, sorted.
    pub fn spots(&self, context: DecisionContext) -> Vec<&str> {
        match context {
            DecisionContext::FlopBet => self.flop_bet.spots(),
            DecisionContext::FacingBet => self.facing_bet.spots(),
            DecisionContext::TurnBarrel => self.turn_barrel.spots(),
            DecisionContext::FacingDoubleBarrel => self.facing_double_barrel.spots(),
        }
    }

    /// Find the entry for a decision.
    ///
    /// Flop contexts ignore `transition`; turn contexts use `blank` when it
    /// is `None`.
    pub fn lookup(
        &self,
        context: DecisionContext,
        spot: &str,
        texture: BoardTexture,
        transition: Option<TurnTransition>,
    ) -> Result<&RangeEntry, StrategyError> {
        let transition = transition.unwrap_or(TurnTransition::Blank);
        match context {
            DecisionContext::FlopBet => self.flop_bet.entry(context, spot, texture),
            DecisionContext::FacingBet => self.facing_bet.entry(context, spot, texture),
            DecisionContext::TurnBarrel => {
                self.turn_barrel.entry(context, spot, texture, transition)
            }
            DecisionContext::FacingDoubleBarrel => {
                self.facing_double_barrel
                    .entry(context, spot, texture, transition)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_BOOK: &str = r#"{
        "version": "test",
        "name": "small",
        "flop_bet": {
            "BTN_vs_BB": {
                "dry": {
                    "cbet": ["set", "top_pair_good"],
                    "check": ["nothing"],
                    "mixed": [{ "category": "second_pair", "cbet": 0.6, "check": 0.4 }]
                }
            }
        },
        "facing_bet": {
            "BB_vs_BTN": {
                "dry": { "raise": ["set"], "call": ["top_pair_good"], "fold": ["nothing"] }
            }
        },
        "turn_barrel": {
            "default_spot": "BTN_vs_BB",
            "spots": {
                "BTN_vs_BB": {
                    "dry": {
                        "blank": { "barrel": ["set"], "check": ["nothing"] },
                        "pairing": { "barrel": ["set"], "check": ["top_pair_good", "nothing"] }
                    }
                }
            }
        },
        "facing_double_barrel": {
            "default_spot": "BB_vs_BTN",
            "spots": {
                "BB_vs_BTN": {
                    "dry": { "pairing": { "call": ["set"], "fold": ["nothing"] } }
                }
            }
        }
    }"#;

    #[test]
    fn test_builtin_book_loads() {
        let book = StrategyBook::builtin().unwrap();
        assert_eq!(book.spots(DecisionContext::FlopBet), vec!["BTN_vs_BB", "CO_vs_BB", "SB_vs_BB"]);
        assert_eq!(book.spots(DecisionContext::FacingBet), vec!["BB_vs_BTN", "BB_vs_CO", "BB_vs_SB"]);
        assert_eq!(book.turn_barrel.default_spot, "BTN_vs_BB");
        assert_eq!(book.fallbacks.get(HandCategory::UnderpairHigh), Some(HandCategory::SecondPair));
    }

    #[test]
    fn test_builtin_book_covers_every_texture() {
        let book = StrategyBook::builtin().unwrap();
        for context in DecisionContext::ALL {
            for spot in book.spots(context) {
                for texture in BoardTexture::ALL {
                    assert!(
                        book.lookup(context, spot, texture, None).is_ok(),
                        "{} {} {}",
                        context,
                        spot,
                        texture
                    );
                }
            }
        }
    }

    #[test]
    fn test_parse_small_book() {
        let book = StrategyBook::from_json_str(SMALL_BOOK).unwrap();
        let entry = book
            .lookup(DecisionContext::FlopBet, "BTN_vs_BB", BoardTexture::Dry, None)
            .unwrap();
        assert_eq!(entry.list(Action::Cbet), &[HandCategory::Set, HandCategory::TopPairGood]);
        assert_eq!(entry.list(Action::Barrel), &[] as &[HandCategory]);
        let mixed = entry.mixed_for(HandCategory::SecondPair).unwrap();
        assert_eq!(mixed.frequencies[&Action::Cbet], 0.6);
        assert_eq!(book.fallbacks, CategoryFallbacks::default());
    }

    #[test]
    fn test_missing_flop_keys() {
        let book = StrategyBook::from_json_str(SMALL_BOOK).unwrap();
        assert!(matches!(
            book.lookup(DecisionContext::FlopBet, "UTG_vs_BB", BoardTexture::Dry, None),
            Err(StrategyError::SpotNotFound { .. })
        ));
        assert!(matches!(
            book.lookup(DecisionContext::FlopBet, "BTN_vs_BB", BoardTexture::Wet, None),
            Err(StrategyError::TextureNotFound { .. })
        ));
    }

    #[test]
    fn test_turn_fallbacks() {
        let book = StrategyBook::from_json_str(SMALL_BOOK).unwrap();
        let ctx = DecisionContext::TurnBarrel;

        let pairing = book
            .lookup(ctx, "CO_vs_BB", BoardTexture::Dry, Some(TurnTransition::Pairing))
            .unwrap();
        assert!(pairing.list(Action::Check).contains(&HandCategory::TopPairGood));

        let connected = book
            .lookup(ctx, "BTN_vs_BB", BoardTexture::Dry, Some(TurnTransition::Connected))
            .unwrap();
        assert_eq!(connected.list(Action::Check), &[HandCategory::Nothing]);

        let missing_blank = book.lookup(
            DecisionContext::FacingDoubleBarrel,
            "BB_vs_BTN",
            BoardTexture::Dry,
            Some(TurnTransition::Connected),
        );
        assert!(matches!(missing_blank, Err(StrategyError::TransitionNotFound { .. })));
    }

    #[test]
    fn test_rejects_bad_frequency_sum() {
        let json = SMALL_BOOK.replace("\"cbet\": 0.6, \"check\": 0.4", "\"cbet\": 0.6, \"check\": 0.5");
        match StrategyBook::from_json_str(&json) {
            Err(TableError::FrequencySum { category, sum, .. }) => {
                assert_eq!(category, HandCategory::SecondPair);
                assert!((sum - 1.1).abs() < 1e-9);
            }
            other => panic!("expected FrequencySum, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_negative_frequency() {
        let json = SMALL_BOOK.replace("\"cbet\": 0.6, \"check\": 0.4", "\"cbet\": 1.4, \"check\": -0.4");
        assert!(matches!(
            StrategyBook::from_json_str(&json),
            Err(TableError::NegativeFrequency { action: Action::Check, .. })
        ));
    }

    #[test]
    fn test_rejects_foreign_action() {
        let json = SMALL_BOOK.replace("\"raise\": [\"set\"]", "\"cbet\": [\"set\"]");
        assert!(matches!(
            StrategyBook::from_json_str(&json),
            Err(TableError::ForeignAction { context: DecisionContext::FacingBet, action: Action::Cbet, .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_mixed() {
        let json = SMALL_BOOK.replace(
            "\"mixed\": [{ \"category\": \"second_pair\", \"cbet\": 0.6, \"check\": 0.4 }]",
            "\"mixed\": [{ \"category\": \"second_pair\", \"cbet\": 0.6, \"check\": 0.4 }, { \"category\": \"second_pair\", \"cbet\": 0.5, \"check\": 0.5 }]",
        );
        assert!(matches!(
            StrategyBook::from_json_str(&json),
            Err(TableError::DuplicateMixed { category: HandCategory::SecondPair, .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_default_spot() {
        let json = SMALL_BOOK.replace("\"default_spot\": \"BB_vs_BTN\"", "\"default_spot\": \"BB_vs_UTG\"");
        assert!(matches!(
            StrategyBook::from_json_str(&json),
            Err(TableError::UnknownDefaultSpot { .. })
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(StrategyBook::from_json_str("{"), Err(TableError::ParseError(_))));
        let json = SMALL_BOOK.replace("\"pairing\"", "\"paired_up\"");
        assert!(matches!(StrategyBook::from_json_str(&json), Err(TableError::ParseError(_))));
        assert!(matches!(
            StrategyBook::from_json_file("/nonexistent/book.json"),
            Err(TableError::IoError(_))
        ));
    }

    #[test]
    fn test_tables_built_in_code() {
        let mut lists = BTreeMap::new();
        lists.insert(Action::Cbet, vec![HandCategory::Set]);
        let entry = RangeEntry {
            mixed: Vec::new(),
            lists,
        };

        let mut flop = StrategyTable::default();
        flop.insert("BTN_vs_BB", BoardTexture::Wet, entry.clone());
        let ctx = DecisionContext::FlopBet;
        assert_eq!(flop.entry(ctx, "BTN_vs_BB", BoardTexture::Wet), Ok(&entry));
        assert!(flop.entry(ctx, "BTN_vs_BB", BoardTexture::Dry).is_err());
        assert!(flop.validate(ctx).is_ok());

        let mut turn = TurnStrategyTable::new("BTN_vs_BB");
        assert!(matches!(
            turn.validate(DecisionContext::TurnBarrel),
            Err(TableError::UnknownDefaultSpot { .. })
        ));
        let mut lists = BTreeMap::new();
        lists.insert(Action::Barrel, vec![HandCategory::Set]);
        let barrel = RangeEntry {
            mixed: Vec::new(),
            lists,
        };
        turn.insert("BTN_vs_BB", BoardTexture::Wet, TurnTransition::Blank, RangeEntry::default());
        turn.insert("BTN_vs_BB", BoardTexture::Wet, TurnTransition::Pairing, barrel.clone());
        let ctx = DecisionContext::TurnBarrel;
        assert!(turn.validate(ctx).is_ok());
        assert_eq!(
            turn.entry(ctx, "CO_vs_BB", BoardTexture::Wet, TurnTransition::Pairing),
            Ok(&barrel)
        );
        assert_eq!(
            turn.entry(ctx, "BTN_vs_BB", BoardTexture::Wet, TurnTransition::Connected),
            Ok(&RangeEntry::default())
        );
        assert_eq!(turn.spots(), vec!["BTN_vs_BB"]);
    }

    #[test]
    fn test_json_round_trip() {
        let book = StrategyBook::from_json_str(SMALL_BOOK).unwrap();
        let json = book.to_json().unwrap();
        assert_eq!(StrategyBook::from_json_str(&json).unwrap(), book);
    }
}
