#![deny(missing_debug_implementations)]

//! Rules engine for two-player Quoridor on the standard 9x9 board.
//!
//! The crate owns everything that is "just the rules": board geometry, wall placement
//! legality, pawn movement (including jumps and diagonal side-steps), goal reachability, the
//! two-phase turn state machine and the JSON wire format used for saved games. Search and
//! session management live in other crates and only talk to the rules through [GameState] and
//! the [simulate::Simulate] trait.

pub mod connectivity;
mod display;
pub mod error;
pub mod geometry;
pub mod moves;
pub mod simulate;
pub mod state;
pub mod turn;
pub mod types;
pub mod walls;
pub mod wire_representation;

pub use error::{ActionError, LoadError, WallError};
pub use geometry::{Direction, Orientation, Position, Wall, WallSet};
pub use state::{GameState, TurnRecord};
pub use turn::{Action, Transition, TurnOutcome};
pub use types::{Phase, PlayerId, Positions, RemainingWalls};

/// Cells per side of the board
pub const BOARD_SIZE: u8 = 9;

/// Wall anchors per side. A wall anchored at `(r, c)` spans the grid-line between two pairs of
/// cells, so anchors stop one short of the board edge
pub const WALL_ANCHORS: u8 = BOARD_SIZE - 1;

/// Walls each player starts the game with
pub const WALLS_PER_PLAYER: u8 = 10;
