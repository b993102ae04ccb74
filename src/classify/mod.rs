//! Classifiers that turn a deal into the discrete keys used by the
//! strategy tables.
//!
//! ## Modules
//!
//! - `category`: Hand category of the hero's hole cards on a board
//! - `texture`: Flop texture and turn transition

pub mod category;
pub mod texture;

pub use category::{classify_hand_category, HandCategory};
pub use texture::{
    classify_board, classify_board_texture, classify_board_turn, classify_turn_transition,
    BoardTexture, TurnTransition,
};
