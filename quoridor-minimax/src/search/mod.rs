//! Minimax over complete Quoridor turns.
//!
//! Every ply is a whole turn (a pawn move followed by a wall or a decline), so the maximizing
//! and minimizing roles simply alternate. Scores are seen from the point of view of the player
//! the search was started for, so the root is always a maximizing node.
//!
//! Two variants are available through [SearchVariant]: plain depth limited minimax, and the
//! same recursion with Alpha-Beta pruning. Pruning never changes the score that comes back.
//!
//! ```rust
//! use quoridor_game_types::GameState;
//! use quoridor_minimax::{DistanceDifference, QuoridorSearch, SearchOptions, SearchVariant};
//!
//! let options = SearchOptions {
//!     variant: SearchVariant::AlphaBeta,
//!     depth: 1,
//!     ..Default::default()
//! };
//!
//! let search = QuoridorSearch::new(GameState::new(), DistanceDifference, "doc-test", options);
//! let outcome = search.search().unwrap();
//!
//! // The opening position always has something to do
//! let (turn, next_state) = outcome.chosen.unwrap();
//! assert_eq!(turn.player, quoridor_game_types::PlayerId::P1);
//! assert_eq!(next_state.current_player(), quoridor_game_types::PlayerId::P2);
//! ```

mod eval;
pub use eval::{AbortedEarly, QuoridorSearch, SearchOptions, SearchVariant};

mod minimax_return;
pub use minimax_return::MinMaxReturn;

mod outcome;
pub use outcome::SearchOutcome;
