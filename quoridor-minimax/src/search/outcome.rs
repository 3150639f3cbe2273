use quoridor_game_types::{GameState, PlayerId, TurnRecord};

use super::MinMaxReturn;

/// Everything a finished search tells us
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The minimax value of the root, from the searching player's point of view
    pub score: i64,
    /// The turn we picked and the state it leads to
    ///
    /// `None` only when there was nothing to pick from: the depth was zero, the game was
    /// already over, or the player had no legal action
    pub chosen: Option<(TurnRecord, GameState)>,
    /// How many game states the search visited, the root included
    pub nodes: usize,
    /// The principal variation and the scores of the root's options
    pub tree: MinMaxReturn,
}

impl SearchOutcome {
    /// The state we picked
    pub fn chosen_state(&self) -> Option<&GameState> {
        self.chosen.as_ref().map(|(_, state)| state)
    }

    /// The turn we picked
    pub fn chosen_turn(&self) -> Option<&TurnRecord> {
        self.chosen.as_ref().map(|(turn, _)| turn)
    }

    /// Every turn along the line the search expects to be played, starting with ours
    pub fn route(&self) -> Vec<(PlayerId, TurnRecord)> {
        self.tree.chosen_route()
    }

    /// See [MinMaxReturn::to_text_tree]
    pub fn to_text_tree(&self) -> Option<String> {
        self.tree.to_text_tree()
    }
}
