use quoridor_game_types::{ActionError, LoadError, PlayerId};
use thiserror::Error;

use crate::history::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("there is no history node {0}")]
    UnknownNode(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("it is {current}'s turn, not {player}'s")]
    NotYourTurn { player: PlayerId, current: PlayerId },
    #[error("{0} is played by the AI")]
    AiControlled(PlayerId),
    #[error("it is not the AI's turn")]
    NotAiTurn,
    #[error("the AI is already thinking")]
    AiAlreadyThinking,
    #[error("the AI search was cancelled")]
    SearchCancelled,
    #[error("{0} has no legal action at all")]
    NoLegalActions(PlayerId),
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("couldn't access the save store")]
    Io(#[from] std::io::Error),
    #[error("couldn't encode the saved games")]
    Encode(#[source] serde_json::Error),
    #[error("stored game is invalid")]
    Load(#[from] LoadError),
}
