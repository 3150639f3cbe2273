use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::ActionError,
    geometry::{Position, Wall},
    moves::{legal_moves, MoveList},
    state::{GameState, TurnRecord},
    types::Phase,
    walls::{check_wall_placement, valid_wall_placements},
    PlayerId,
};

/// Something the current player wants to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Move the pawn, only during [Phase::Move]
    Move(Position),
    /// Place a wall, only during [Phase::Wall]
    PlaceWall(Wall),
    /// Skip the wall, only during [Phase::Wall]
    Decline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The move went through and the same player now decides on a wall
    Pending,
    /// The turn is over and it's the other player's go
    Passed,
    /// The move reached the goal row
    Won(PlayerId),
}

/// The result of successfully applying an [Action]
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: GameState,
    pub outcome: TurnOutcome,
}

impl GameState {
    /// Destinations open to the current player. Empty outside of the move phase and once the
    /// game is won
    pub fn legal_moves(&self) -> MoveList {
        if self.is_over() || self.phase != Phase::Move {
            return MoveList::new();
        }

        legal_moves(self.current_player, &self.positions, &self.walls)
    }

    /// Walls the current player may place. Empty outside of the wall phase, once the game is
    /// won, and when the player has run out of walls
    pub fn valid_walls(&self) -> Vec<Wall> {
        if self.is_over()
            || self.phase != Phase::Wall
            || self.remaining_walls[self.current_player] == 0
        {
            return vec![];
        }

        valid_wall_placements(&self.positions, &self.walls)
    }

    /// Apply `action` for the current player.
    ///
    /// Illegal actions are refused with an [ActionError] and `self` is left as it was.
    pub fn apply(&self, action: Action) -> Result<Transition, ActionError> {
        if let Some(winner) = self.winner() {
            return Err(ActionError::GameOver { winner });
        }

        let player = self.current_player;
        let transition = match (self.phase, action) {
            (Phase::Move, Action::Move(to)) => {
                if !self.legal_moves().contains(&to) {
                    debug!(%player, %to, "Rejected illegal move");
                    return Err(ActionError::IllegalMove { player, to });
                }
                self.move_pawn(to)
            }
            (Phase::Wall, Action::PlaceWall(wall)) => {
                if self.remaining_walls[player] == 0 {
                    debug!(%player, "Rejected wall, none left");
                    return Err(ActionError::NoWallsRemaining(player));
                }
                if let Err(e) = check_wall_placement(&wall, &self.positions, &self.walls) {
                    debug!(%player, %wall, error = %e, "Rejected wall");
                    return Err(e.into());
                }
                self.complete_turn(Some(wall))
            }
            (Phase::Wall, Action::Decline) => self.complete_turn(None),
            (phase, action) => return Err(ActionError::WrongPhase { phase, action }),
        };

        if let TurnOutcome::Won(winner) = transition.outcome {
            info!(%winner, "Game won");
        }

        Ok(transition)
    }

    /// Moves the current player's pawn without checking the destination
    pub(crate) fn move_pawn(&self, to: Position) -> Transition {
        let player = self.current_player;
        let won = to.row == player.goal_row();

        let mut state = self.clone();
        state.positions = self.positions.with(player, to);
        state.phase = if won { Phase::Move } else { Phase::Wall };
        state.last_turn = Some(TurnRecord {
            player,
            to,
            wall: None,
            won,
        });

        Transition {
            state,
            outcome: if won {
                TurnOutcome::Won(player)
            } else {
                TurnOutcome::Pending
            },
        }
    }

    /// Closes the wall phase, optionally placing `wall` without checking it, and hands the
    /// turn over
    pub(crate) fn complete_turn(&self, wall: Option<Wall>) -> Transition {
        let player = self.current_player;

        let mut state = self.clone();
        if let Some(wall) = wall {
            state.walls.insert(wall);
            state.remaining_walls.spend(player);
        }
        state.current_player = player.opponent();
        state.phase = Phase::Move;
        state.last_turn = Some(TurnRecord {
            player,
            to: self.positions[player],
            wall,
            won: false,
        });

        Transition {
            state,
            outcome: TurnOutcome::Passed,
        }
    }
}
