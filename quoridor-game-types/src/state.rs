use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    connectivity::{can_reach_goal, shortest_path_length},
    error::LoadError,
    geometry::{Position, Wall, WallSet},
    types::{Phase, PlayerId, Positions, RemainingWalls},
    walls::is_overlapping,
    WALLS_PER_PLAYER,
};

/// What happened on the turn that produced a state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnRecord {
    pub player: PlayerId,
    /// Where the pawn moved to
    pub to: Position,
    /// The wall placed after the move, `None` if the player declined (or hasn't chosen yet)
    pub wall: Option<Wall>,
    pub won: bool,
}

impl fmt::Display for TurnRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.won {
            return write!(f, "{} won the game!", self.player);
        }

        write!(f, "{} moved to {}", self.player, self.to)?;
        if let Some(wall) = self.wall {
            write!(
                f,
                " and placed a {} wall at ({},{})",
                wall.orientation, wall.row, wall.col
            )?;
        }
        Ok(())
    }
}

/// A complete snapshot of a match.
///
/// States are never changed in place, [GameState::apply](crate::GameState::apply) hands back a
/// new one. Two states are equal when pawns, walls, turn, phase and wall counts all match, the
/// [TurnRecord] that produced them doesn't take part.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) positions: Positions,
    pub(crate) walls: WallSet,
    pub(crate) current_player: PlayerId,
    pub(crate) remaining_walls: RemainingWalls,
    pub(crate) phase: Phase,
    pub(crate) last_turn: Option<TurnRecord>,
}

impl GameState {
    /// Pawns on their start cells, no walls, ten walls each and P1 to move
    pub fn new() -> Self {
        Self {
            positions: Positions::initial(),
            walls: WallSet::new(),
            current_player: PlayerId::P1,
            remaining_walls: RemainingWalls::default(),
            phase: Phase::Move,
            last_turn: None,
        }
    }

    /// Build a state from its parts, refusing anything that couldn't have come out of a real
    /// game: pawns off the board or stacked, bad or overlapping walls, wall counts that don't
    /// add up, or a pawn that is already cut off from its goal.
    pub fn try_new(
        positions: Positions,
        walls: impl IntoIterator<Item = Wall>,
        current_player: PlayerId,
        remaining_walls: RemainingWalls,
        phase: Phase,
    ) -> Result<Self, LoadError> {
        for player in PlayerId::ALL {
            let position = positions[player];
            if !position.is_on_board() {
                return Err(LoadError::PositionOutOfBounds { player, position });
            }
        }
        if positions.p1 == positions.p2 {
            return Err(LoadError::SharedCell(positions.p1));
        }

        let mut wall_set = WallSet::new();
        for wall in walls {
            if !wall.in_bounds() {
                return Err(LoadError::WallOutOfBounds(wall));
            }
            if is_overlapping(&wall, &wall_set) {
                return Err(LoadError::OverlappingWall(wall));
            }
            wall_set.insert(wall);
        }

        for player in PlayerId::ALL {
            let remaining = remaining_walls[player];
            if remaining > WALLS_PER_PLAYER {
                return Err(LoadError::TooManyWalls { player, remaining });
            }
        }
        if wall_set.len() + remaining_walls.total() as usize != 2 * WALLS_PER_PLAYER as usize {
            return Err(LoadError::WallCountMismatch {
                placed: wall_set.len(),
                remaining: remaining_walls.total(),
            });
        }

        if let Some(player) = PlayerId::ALL
            .into_iter()
            .find(|player| !can_reach_goal(*player, &positions, &wall_set))
        {
            return Err(LoadError::Disconnected(player));
        }

        let state = Self {
            positions,
            walls: wall_set,
            current_player,
            remaining_walls,
            phase,
            last_turn: None,
        };
        debug!(walls = state.walls.len(), current_player = %current_player, "Built game state");

        Ok(state)
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    pub fn position(&self, player: PlayerId) -> Position {
        self.positions[player]
    }

    pub fn walls(&self) -> &WallSet {
        &self.walls
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn remaining_walls(&self) -> &RemainingWalls {
        &self.remaining_walls
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The turn that produced this state, `None` for a fresh or freshly loaded game
    pub fn last_turn(&self) -> Option<&TurnRecord> {
        self.last_turn.as_ref()
    }

    /// Human readable account of how we got here
    pub fn description(&self) -> String {
        match &self.last_turn {
            Some(turn) => turn.to_string(),
            None => "Initial state".to_owned(),
        }
    }

    /// The player standing on their goal row, if any
    pub fn winner(&self) -> Option<PlayerId> {
        if let Some(turn) = self.last_turn.filter(|turn| turn.won) {
            return Some(turn.player);
        }

        PlayerId::ALL
            .into_iter()
            .find(|player| self.positions[*player].row == player.goal_row())
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    pub fn shortest_path_length(&self, player: PlayerId) -> Option<u32> {
        shortest_path_length(player, &self.positions, &self.walls)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.positions == other.positions
            && self.walls == other.walls
            && self.current_player == other.current_player
            && self.remaining_walls == other.remaining_walls
            && self.phase == other.phase
    }
}

impl Eq for GameState {}

impl Hash for GameState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.positions.hash(state);
        self.walls.hash(state);
        self.current_player.hash(state);
        self.remaining_walls.hash(state);
        self.phase.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(row: u8, col: u8) -> Wall {
        Wall::horizontal(row, col).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::new();

        assert_eq!(state.position(PlayerId::P1), Position { row: 0, col: 4 });
        assert_eq!(state.position(PlayerId::P2), Position { row: 8, col: 4 });
        assert_eq!(state.current_player(), PlayerId::P1);
        assert_eq!(state.phase(), Phase::Move);
        assert_eq!(state.remaining_walls()[PlayerId::P1], 10);
        assert_eq!(state.remaining_walls()[PlayerId::P2], 10);
        assert_eq!(state.description(), "Initial state");
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn test_equality_ignores_history() {
        let mut moved = GameState::new();
        moved.last_turn = Some(TurnRecord {
            player: PlayerId::P2,
            to: Position { row: 8, col: 4 },
            wall: None,
            won: false,
        });

        assert_eq!(moved, GameState::new());
    }

    #[test]
    fn test_try_new_accepts_consistent_walls() {
        let state = GameState::try_new(
            Positions::initial(),
            [h(2, 2), h(5, 5)],
            PlayerId::P2,
            RemainingWalls { p1: 9, p2: 9 },
            Phase::Move,
        )
        .unwrap();

        assert_eq!(state.walls().len(), 2);
    }

    #[test]
    fn test_try_new_rejects_mismatched_counts() {
        let result = GameState::try_new(
            Positions::initial(),
            [h(2, 2)],
            PlayerId::P2,
            RemainingWalls::default(),
            Phase::Move,
        );

        assert!(matches!(
            result,
            Err(LoadError::WallCountMismatch {
                placed: 1,
                remaining: 20
            })
        ));
    }

    #[test]
    fn test_try_new_rejects_overlap_and_shared_cells() {
        let overlapping = GameState::try_new(
            Positions::initial(),
            [h(2, 2), h(2, 3)],
            PlayerId::P1,
            RemainingWalls { p1: 9, p2: 9 },
            Phase::Move,
        );
        assert!(matches!(overlapping, Err(LoadError::OverlappingWall(w)) if w == h(2, 3)));

        let stacked = GameState::try_new(
            Positions {
                p1: Position { row: 4, col: 4 },
                p2: Position { row: 4, col: 4 },
            },
            [],
            PlayerId::P1,
            RemainingWalls::default(),
            Phase::Move,
        );
        assert!(matches!(stacked, Err(LoadError::SharedCell(_))));
    }

    #[test]
    fn test_winner_is_derived_from_positions() {
        let state = GameState::try_new(
            Positions {
                p1: Position { row: 8, col: 2 },
                p2: Position { row: 5, col: 4 },
            },
            [],
            PlayerId::P1,
            RemainingWalls::default(),
            Phase::Move,
        )
        .unwrap();

        assert_eq!(state.winner(), Some(PlayerId::P1));
        assert!(state.is_over());
    }
}
