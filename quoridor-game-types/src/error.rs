use thiserror::Error;

use crate::{
    geometry::{Position, Wall},
    turn::Action,
    types::{Phase, PlayerId},
    WALLS_PER_PLAYER,
};

/// Why a wall can't go where it was asked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WallError {
    #[error("{0} is outside the 8x8 anchor grid")]
    OutOfBounds(Wall),
    #[error("{0} overlaps a wall that is already on the board")]
    Overlapping(Wall),
    #[error("{wall} would leave {player} with no path to their goal row")]
    BlocksPath { wall: Wall, player: PlayerId },
}

/// An action that was refused. The state it was applied to is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("the game is over, {winner} has already won")]
    GameOver { winner: PlayerId },
    #[error("{action:?} can't be played during the {phase} phase")]
    WrongPhase { phase: Phase, action: Action },
    #[error("{player} can't move to {to}")]
    IllegalMove { player: PlayerId, to: Position },
    #[error("{0} has no walls left")]
    NoWallsRemaining(PlayerId),
    #[error(transparent)]
    Wall(#[from] WallError),
}

/// A persisted state that failed validation and was not loaded
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("saved state is malformed")]
    Malformed(#[from] serde_json::Error),
    #[error("saved state has schema version {found}, newest supported is {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("{field} = {value} is out of range")]
    CoordinateOutOfRange { field: &'static str, value: i64 },
    #[error("{player} is at {position}, which is off the board")]
    PositionOutOfBounds { player: PlayerId, position: Position },
    #[error("both pawns are on {0}")]
    SharedCell(Position),
    #[error("{0} is outside the 8x8 anchor grid")]
    WallOutOfBounds(Wall),
    #[error("{0} overlaps another saved wall")]
    OverlappingWall(Wall),
    #[error("{player} has {remaining} walls left, more than the {max} they start with", max = WALLS_PER_PLAYER)]
    TooManyWalls { player: PlayerId, remaining: u8 },
    #[error("{placed} walls on the board but {remaining} still in hand, those should add up to {total}", total = 2 * WALLS_PER_PLAYER)]
    WallCountMismatch { placed: usize, remaining: u8 },
    #[error("{0} has no path to their goal row")]
    Disconnected(PlayerId),
}
