//! Drill loop support: options, grading, session state, scenario generation
//! and batch evaluation.
//!
//! ## Modules
//!
//! - `config`: Trainer options
//! - `grading`: Category weights and EV gain/loss of an answer
//! - `session`: Score, mistakes, per-situation stats and weaknesses
//! - `scenario`: Seedable random and focus-mode scenario generation
//! - `batch`: Parallel batch evaluation with rayon

pub mod batch;
pub mod config;
pub mod grading;
pub mod scenario;
pub mod session;

pub use batch::{evaluate_batch, evaluate_sample, BatchReport, Sample};
pub use config::{ConfigError, TrainerConfig};
pub use grading::{category_weight, grade, normalize_action, Grade};
pub use scenario::{Scenario, ScenarioError, ScenarioGenerator};
pub use session::{DetailedStat, Mistake, TrainingSession, Weakness};
