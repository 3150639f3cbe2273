use crate::{
    state::{GameState, TurnRecord},
    turn::TurnOutcome,
    types::Phase,
    walls::valid_wall_placements,
};

/// Games that can enumerate every complete turn available to the player whose go it is
pub trait Simulate: Sized {
    /// One entry per reachable successor, each paired with the turn that produces it.
    ///
    /// Empty once the game is over.
    fn simulate(&self) -> Vec<(TurnRecord, Self)>;
}

impl GameState {
    /// Every way of finishing the wall phase from here: declining first, then one entry per
    /// valid wall
    fn completions(&self) -> impl Iterator<Item = GameState> + '_ {
        let walls = if self.remaining_walls[self.current_player] > 0 {
            valid_wall_placements(&self.positions, &self.walls)
        } else {
            vec![]
        };

        std::iter::once(None)
            .chain(walls.into_iter().map(Some))
            .map(move |wall| self.complete_turn(wall).state)
    }
}

impl Simulate for GameState {
    fn simulate(&self) -> Vec<(TurnRecord, Self)> {
        if self.is_over() {
            return vec![];
        }

        let successors: Vec<GameState> = match self.phase {
            Phase::Move => self
                .legal_moves()
                .into_iter()
                .flat_map(|to| {
                    let moved = self.move_pawn(to);
                    match moved.outcome {
                        TurnOutcome::Won(_) => vec![moved.state],
                        _ => moved.state.completions().collect(),
                    }
                })
                .collect(),
            Phase::Wall => self.completions().collect(),
        };

        successors
            .into_iter()
            .filter_map(|state| state.last_turn.map(|turn| (turn, state)))
            .collect()
    }
}
