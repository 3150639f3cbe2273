use std::iter;

use quoridor_game_types::{
    moves::MoveList, Action, ActionError, GameState, Phase, PlayerId, Transition, TurnOutcome,
    TurnRecord, Wall,
};
use quoridor_minimax::{
    AbortedEarly, DistanceDifference, QuoridorSearch, SearchOutcome, SearchTask,
};
use rand::seq::SliceRandom;
use tracing::{debug, error, info_span, warn};

use crate::{
    config::MatchConfig,
    error::{HistoryError, SessionError},
    history::{HistoryTree, NodeId},
};

/// Play `turn` from `state` through the reducer, one action at a time.
///
/// Starting in [Phase::Move] this is the pawn move and then, unless the move won, the wall or
/// the decline. Starting in [Phase::Wall] only the second half is played.
pub fn replay(state: &GameState, turn: &TurnRecord) -> Result<Vec<Transition>, ActionError> {
    let moved = match state.phase() {
        Phase::Move => {
            let moved = state.apply(Action::Move(turn.to))?;
            if moved.outcome != TurnOutcome::Pending {
                return Ok(vec![moved]);
            }
            Some(moved)
        }
        Phase::Wall => None,
    };

    let completion = turn.wall.map_or(Action::Decline, Action::PlaceWall);
    let completed = moved
        .as_ref()
        .map_or(state, |moved| &moved.state)
        .apply(completion)?;

    Ok(moved.into_iter().chain(iter::once(completed)).collect())
}

#[derive(Debug)]
struct PendingAiTurn {
    generation: u64,
    task: SearchTask,
}

/// One match: the history of everything played, who controls which pawn and the AI turn in
/// flight, if any.
///
/// Every reset or navigation starts a new generation. A search started in an older generation
/// is cancelled and its result is never applied.
#[derive(Debug)]
pub struct Session {
    config: MatchConfig,
    history: HistoryTree,
    generation: u64,
    pending_ai: Option<PendingAiTurn>,
}

impl Session {
    pub fn new(config: MatchConfig) -> Self {
        Self::from_state(GameState::new(), config)
    }

    /// Continue a loaded game. The loaded state becomes the root of the history.
    pub fn from_state(state: GameState, config: MatchConfig) -> Self {
        Self {
            config,
            history: HistoryTree::new(state),
            generation: 0,
            pending_ai: None,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryTree {
        &self.history
    }

    pub fn state(&self) -> &GameState {
        self.history.current_state()
    }

    pub fn legal_moves(&self) -> MoveList {
        self.state().legal_moves()
    }

    pub fn valid_walls(&self) -> Vec<Wall> {
        self.state().valid_walls()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.state().winner()
    }

    pub fn is_over(&self) -> bool {
        self.state().is_over()
    }

    /// Whether the side to play belongs to the AI
    pub fn is_ai_turn(&self) -> bool {
        !self.is_over() && self.config.mode.ai_player() == Some(self.state().current_player())
    }

    pub fn is_ai_thinking(&self) -> bool {
        self.pending_ai.is_some()
    }

    /// Play `action` for `player`, who has to be the human side whose turn it is
    pub fn submit(&mut self, player: PlayerId, action: Action) -> Result<TurnOutcome, SessionError> {
        let state = self.state();
        if let Some(winner) = state.winner() {
            debug!(%player, %winner, "Rejected action, the game is over");
            return Err(ActionError::GameOver { winner }.into());
        }

        let current = state.current_player();
        if player != current {
            debug!(%player, %current, "Rejected action out of turn");
            return Err(SessionError::NotYourTurn { player, current });
        }
        if self.config.mode.ai_player() == Some(player) {
            debug!(%player, "Rejected action for the AI's pawn");
            return Err(SessionError::AiControlled(player));
        }

        let transition = state.apply(action)?;
        Ok(self.commit(transition))
    }

    /// Throw the whole match away and start over from the initial state
    pub fn reset(&mut self) {
        self.abandon_ai_turn();
        self.history = HistoryTree::new(GameState::new());
    }

    /// Jump to any state in the history. Play continues from there, and whether the game is
    /// over is decided by that state alone.
    pub fn navigate(&mut self, id: NodeId) -> Result<&GameState, SessionError> {
        if self.history.state(id).is_none() {
            return Err(HistoryError::UnknownNode(id).into());
        }

        self.abandon_ai_turn();
        Ok(self.history.navigate(id)?)
    }

    /// Start searching for the AI's turn in the background, after the configured thinking
    /// delay. Pick the result up with [Session::poll_ai_turn] or [Session::wait_ai_turn].
    pub fn start_ai_turn(&mut self) -> Result<(), SessionError> {
        if self.pending_ai.is_some() {
            return Err(SessionError::AiAlreadyThinking);
        }

        let search = self.ai_search()?;
        let task = SearchTask::spawn(search, self.config.ai.thinking_delay());
        self.pending_ai = Some(PendingAiTurn {
            generation: self.generation,
            task,
        });

        Ok(())
    }

    /// Apply the AI's turn if its search has finished. `Ok(None)` means there is nothing to
    /// apply yet, or no AI turn was started.
    pub fn poll_ai_turn(&mut self) -> Result<Option<TurnOutcome>, SessionError> {
        let result = match &self.pending_ai {
            Some(pending) => pending.task.try_result(),
            None => return Ok(None),
        };
        let Some(result) = result else {
            return Ok(None);
        };
        let Some(pending) = self.pending_ai.take() else {
            return Ok(None);
        };

        self.finish_ai_turn(pending.generation, result).map(Some)
    }

    /// Block until the AI's search finishes and apply its turn
    pub fn wait_ai_turn(&mut self) -> Result<TurnOutcome, SessionError> {
        let pending = self.pending_ai.take().ok_or(SessionError::NotAiTurn)?;
        let generation = pending.generation;

        self.finish_ai_turn(generation, pending.task.wait())
    }

    /// Search and apply the AI's turn on this thread, skipping the thinking delay
    pub fn play_ai_turn(&mut self) -> Result<TurnOutcome, SessionError> {
        if self.pending_ai.is_some() {
            return Err(SessionError::AiAlreadyThinking);
        }

        let outcome = self
            .ai_search()?
            .search()
            .map_err(|AbortedEarly| SessionError::SearchCancelled)?;
        self.commit_ai_choice(outcome)
    }

    fn ai_search(&self) -> Result<QuoridorSearch<DistanceDifference>, SessionError> {
        if let Some(winner) = self.winner() {
            return Err(ActionError::GameOver { winner }.into());
        }
        if !self.is_ai_turn() {
            return Err(SessionError::NotAiTurn);
        }

        Ok(QuoridorSearch::new(
            self.state().clone(),
            DistanceDifference,
            "ai-turn",
            self.config.ai.search_options(),
        ))
    }

    fn abandon_ai_turn(&mut self) {
        self.generation += 1;
        if let Some(pending) = self.pending_ai.take() {
            debug!(generation = pending.generation, "Cancelling AI turn");
            pending.task.cancel();
        }
    }

    fn finish_ai_turn(
        &mut self,
        generation: u64,
        result: Result<SearchOutcome, AbortedEarly>,
    ) -> Result<TurnOutcome, SessionError> {
        if generation != self.generation {
            debug!(generation, current = self.generation, "Dropping stale AI turn");
            return Err(SessionError::SearchCancelled);
        }

        let outcome = result.map_err(|AbortedEarly| SessionError::SearchCancelled)?;
        self.commit_ai_choice(outcome)
    }

    fn commit_ai_choice(&mut self, outcome: SearchOutcome) -> Result<TurnOutcome, SessionError> {
        let player = self.state().current_player();
        let span = info_span!(
            "ai_turn",
            %player,
            nodes = outcome.nodes,
            chosen_score = tracing::field::Empty,
            chosen = tracing::field::Empty,
        );
        let _guard = span.enter();

        let transitions = match outcome.chosen_turn() {
            Some(turn) => {
                span.record("chosen_score", outcome.score);
                span.record("chosen", tracing::field::display(turn));
                replay(self.state(), turn)?
            }
            None => self.fallback_turn()?,
        };

        let mut last = None;
        for transition in transitions {
            last = Some(self.commit(transition));
        }

        last.ok_or(SessionError::NoLegalActions(player))
    }

    /// What the AI plays when the search didn't pick anything: a random legal move, and no
    /// wall
    fn fallback_turn(&self) -> Result<Vec<Transition>, SessionError> {
        let state = self.state();
        let player = state.current_player();

        if state.phase() == Phase::Wall {
            warn!(%player, "Search chose nothing, declining the wall");
            return Ok(vec![state.apply(Action::Decline)?]);
        }

        let moves = self.legal_moves();
        let Some(to) = moves.choose(&mut rand::thread_rng()).copied() else {
            error!(%player, "No legal move left to play");
            return Err(SessionError::NoLegalActions(player));
        };
        warn!(%player, %to, "Search chose nothing, playing a random move");

        Ok(replay(
            state,
            &TurnRecord {
                player,
                to,
                wall: None,
                won: false,
            },
        )?)
    }

    fn commit(&mut self, transition: Transition) -> TurnOutcome {
        self.history.append(transition.state);
        transition.outcome
    }
}
