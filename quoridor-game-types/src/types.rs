use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::{geometry::Position, BOARD_SIZE, WALLS_PER_PLAYER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    P1,
    P2,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::P1, PlayerId::P2];

    pub fn opponent(self) -> Self {
        match self {
            PlayerId::P1 => PlayerId::P2,
            PlayerId::P2 => PlayerId::P1,
        }
    }

    /// The row this player has to reach to win
    pub fn goal_row(self) -> u8 {
        match self {
            PlayerId::P1 => BOARD_SIZE - 1,
            PlayerId::P2 => 0,
        }
    }

    pub fn start_position(self) -> Position {
        let middle = BOARD_SIZE / 2;
        match self {
            PlayerId::P1 => Position { row: 0, col: middle },
            PlayerId::P2 => Position {
                row: BOARD_SIZE - 1,
                col: middle,
            },
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::P1 => write!(f, "P1"),
            PlayerId::P2 => write!(f, "P2"),
        }
    }
}

/// Which half of the turn the current player is in. A turn is a pawn move followed by an
/// optional wall placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Move,
    Wall,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Move => write!(f, "move"),
            Phase::Wall => write!(f, "wall"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Positions {
    pub p1: Position,
    pub p2: Position,
}

impl Positions {
    pub fn initial() -> Self {
        Self {
            p1: PlayerId::P1.start_position(),
            p2: PlayerId::P2.start_position(),
        }
    }

    /// A copy with `player` moved to `to`
    pub fn with(&self, player: PlayerId, to: Position) -> Self {
        let mut next = *self;
        match player {
            PlayerId::P1 => next.p1 = to,
            PlayerId::P2 => next.p2 = to,
        }
        next
    }
}

impl Default for Positions {
    fn default() -> Self {
        Self::initial()
    }
}

impl Index<PlayerId> for Positions {
    type Output = Position;

    fn index(&self, player: PlayerId) -> &Self::Output {
        match player {
            PlayerId::P1 => &self.p1,
            PlayerId::P2 => &self.p2,
        }
    }
}

/// Walls each player still holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RemainingWalls {
    pub p1: u8,
    pub p2: u8,
}

impl RemainingWalls {
    pub fn total(&self) -> u8 {
        self.p1 + self.p2
    }

    pub(crate) fn spend(&mut self, player: PlayerId) {
        let count = match player {
            PlayerId::P1 => &mut self.p1,
            PlayerId::P2 => &mut self.p2,
        };
        *count = count.saturating_sub(1);
    }
}

impl Default for RemainingWalls {
    fn default() -> Self {
        Self {
            p1: WALLS_PER_PLAYER,
            p2: WALLS_PER_PLAYER,
        }
    }
}

impl Index<PlayerId> for RemainingWalls {
    type Output = u8;

    fn index(&self, player: PlayerId) -> &Self::Output {
        match player {
            PlayerId::P1 => &self.p1,
            PlayerId::P2 => &self.p2,
        }
    }
}
