#![deny(missing_debug_implementations, missing_docs)]
//! This crate implements minimax search for two player Quoridor. You provide a 'scoring'
//! function that turns a [GameState] into an `i64`, where positive numbers are good for P2 and
//! negative numbers are good for P1, and the search picks the best complete turn for whoever
//! is to play.
//!
//! We lean on `quoridor-game-types` for the rules, and in particular on its
//! [Simulate](quoridor_game_types::simulate::Simulate) trait, which is used to generate the
//! next game states.

use quoridor_game_types::GameState;

pub mod score;
pub use score::{DistanceDifference, Scorable, WIN_SCORE};

pub mod search;
pub use search::{
    AbortedEarly, MinMaxReturn, QuoridorSearch, SearchOptions, SearchOutcome, SearchVariant,
};

mod task;
pub use task::{CancellationToken, SearchTask};

/// Score a state with the default evaluator
///
/// Shorthand for `DistanceDifference.score(state)`
pub fn evaluate(state: &GameState) -> i64 {
    DistanceDifference.score(state)
}
