//! Trainer options.
//!
//! Controls which decisions are drilled, how weaknesses are detected and how
//! hard scenario generation tries to hit a target texture or category.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::classify::BoardTexture;
use crate::strategy::DecisionContext;

/// Errors raised while loading or validating trainer options.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("{context} is a turn context; drills start on the flop")]
    TurnContext { context: DecisionContext },
    #[error("weakness threshold {0} must be within (0, 1]")]
    InvalidThreshold(f64),
    #[error("{name} must be positive")]
    ZeroLimit { name: &'static str },
}

/// Configuration for a training run.
///
/// # Example
/// ```
/// use postflop_trainer::training::TrainerConfig;
/// use postflop_trainer::classify::BoardTexture;
///
/// let config = TrainerConfig::default()
///     .with_textures(vec![BoardTexture::Monotone])
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Flop decision being drilled (`flop_bet` or `facing_bet`). The turn
    /// follows as `turn_barrel` or `facing_double_barrel`.
    pub context: DecisionContext,

    /// Spots to draw from. Empty means every spot in the book.
    pub spots: Vec<String>,

    /// Textures to draw from. Empty means all five.
    pub textures: Vec<BoardTexture>,

    /// Attempts a stat needs before it can count as a weakness.
    pub weakness_min_attempts: u32,

    /// Success rate below which a stat counts as a weakness.
    pub weakness_threshold: f64,

    /// Number of mistakes kept, newest first.
    pub mistake_log_size: usize,

    /// Random flops tried before giving up on a target texture.
    pub texture_attempts: usize,

    /// Random deals tried before giving up on a target category.
    pub focus_attempts: usize,

    /// Random seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            context: DecisionContext::FlopBet,
            spots: Vec::new(),
            textures: Vec::new(),
            weakness_min_attempts: 3,
            weakness_threshold: 0.8,
            mistake_log_size: 10,
            texture_attempts: 100,
            focus_attempts: 50,
            seed: None,
        }
    }
}

impl TrainerConfig {
    /// Load options from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Parse options from a JSON string. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the flop decision context.
    pub fn with_context(mut self, context: DecisionContext) -> Self {
        self.context = context;
        self
    }

    /// Restrict the spots drawn.
    pub fn with_spots(mut self, spots: Vec<String>) -> Self {
        self.spots = spots;
        self
    }

    /// Restrict the textures drawn.
    pub fn with_textures(mut self, textures: Vec<BoardTexture>) -> Self {
        self.textures = textures;
        self
    }

    /// Set the mistake log size.
    pub fn with_mistake_log_size(mut self, size: usize) -> Self {
        self.mistake_log_size = size;
        self
    }

    /// Set the weakness detection rule.
    pub fn with_weakness(mut self, min_attempts: u32, threshold: f64) -> Self {
        self.weakness_min_attempts = min_attempts;
        self.weakness_threshold = threshold;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Textures to draw from, with the empty filter expanded.
    pub fn active_textures(&self) -> Vec<BoardTexture> {
        if self.textures.is_empty() {
            BoardTexture::ALL.to_vec()
        } else {
            self.textures.clone()
        }
    }

    /// Validate the options.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.context.is_turn() {
            return Err(ConfigError::TurnContext {
                context: self.context,
            });
        }
        if !(self.weakness_threshold > 0.0 && self.weakness_threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold(self.weakness_threshold));
        }
        if self.mistake_log_size == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "mistake_log_size",
            });
        }
        if self.texture_attempts == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "texture_attempts",
            });
        }
        if self.focus_attempts == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "focus_attempts",
            });
        }
        Ok(())
    }
}
