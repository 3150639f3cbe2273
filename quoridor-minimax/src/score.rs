//! Scoring game states

use quoridor_game_types::{GameState, PlayerId};

/// The score of a won game. P2 wins score `WIN_SCORE` and P1 wins score `-WIN_SCORE`, no
/// distance based score ever gets this far from zero
pub const WIN_SCORE: i64 = 1_000_000_000;

/// This trait is used to control something that can return a score from a game state
///
/// Scores are always from P2's point of view: bigger is better for P2. The search takes care of
/// flipping the sign when it is searching for P1.
pub trait Scorable<GameType, ScoreType> {
    /// Convert the given GameType into a ScoreType
    fn score(&self, game: &GameType) -> ScoreType;
}

impl<GameType, ScoreType, FnLike: Fn(&GameType) -> ScoreType> Scorable<GameType, ScoreType>
    for FnLike
{
    fn score(&self, game: &GameType) -> ScoreType {
        (self)(game)
    }
}

/// The standard evaluator: how many more steps P1 needs than P2.
///
/// A finished game saturates to [WIN_SCORE] for the winner. A player with no path at all (which
/// legal wall placement rules out) is treated as [WIN_SCORE] steps away.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceDifference;

impl Scorable<GameState, i64> for DistanceDifference {
    fn score(&self, game: &GameState) -> i64 {
        match game.winner() {
            Some(PlayerId::P2) => return WIN_SCORE,
            Some(PlayerId::P1) => return -WIN_SCORE,
            None => {}
        }

        let distance = |player| {
            game.shortest_path_length(player)
                .map_or(WIN_SCORE, i64::from)
        };

        distance(PlayerId::P1) - distance(PlayerId::P2)
    }
}
