use std::{fmt, str::FromStr, time::Instant};

use derivative::Derivative;
use quoridor_game_types::{simulate::Simulate, GameState, PlayerId, TurnRecord};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{score::Scorable, task::CancellationToken};

use super::{MinMaxReturn, SearchOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
/// Which flavour of minimax to run
pub enum SearchVariant {
    /// Minimax with Alpha-Beta pruning
    #[default]
    #[serde(rename = "alpha-beta")]
    AlphaBeta,
    /// Plain minimax that looks at every option down to the depth limit
    #[serde(rename = "limited-anticipation")]
    DepthLimited,
}

impl SearchVariant {
    /// Both variants
    pub const ALL: [SearchVariant; 2] = [SearchVariant::AlphaBeta, SearchVariant::DepthLimited];
}

impl fmt::Display for SearchVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchVariant::AlphaBeta => write!(f, "alpha-beta"),
            SearchVariant::DepthLimited => write!(f, "limited-anticipation"),
        }
    }
}

impl FromStr for SearchVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchVariant::ALL
            .into_iter()
            .find(|variant| variant.to_string() == s)
            .ok_or_else(|| {
                format!("unknown search variant `{s}`, expected alpha-beta or limited-anticipation")
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Optional properties that can be defined for a [QuoridorSearch]
///
/// The defaults (as implemented by [Default]) are as follows:
/// ```
/// use quoridor_minimax::{SearchOptions, SearchVariant};
///
/// let defaults: SearchOptions = Default::default();
///
/// assert_eq!(defaults.variant, SearchVariant::AlphaBeta);
/// assert_eq!(defaults.depth, 1);
/// assert!(!defaults.parallel);
/// ```
pub struct SearchOptions {
    /// Which minimax variant to run
    pub variant: SearchVariant,
    /// How many complete turns to look ahead
    ///
    /// Defaults to 1
    pub depth: usize,
    /// Score the options at the root on the rayon thread pool
    ///
    /// The root loses its pruning but the chosen turn is the same as a sequential search
    pub parallel: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            variant: SearchVariant::AlphaBeta,
            depth: 1,
            parallel: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// This type is used to represent that the search was cancelled through its
/// [CancellationToken] so we returned out of the current context
pub struct AbortedEarly;

#[derive(Derivative, Clone)]
#[derivative(Debug)]
/// This is the struct that wraps a game state and a scoring function and can be used to run
/// minimax for the player whose turn it is
///
/// It also outputs traces using the [tracing] crate.
pub struct QuoridorSearch<ScorableType> {
    /// The state we are searching from
    pub game: GameState,
    #[derivative(Debug = "ignore")]
    score_function: ScorableType,
    /// Used to tell searches apart in traces
    pub name: &'static str,
    options: SearchOptions,
    cancellation: CancellationToken,
}

impl<ScorableType> QuoridorSearch<ScorableType>
where
    ScorableType: Scorable<GameState, i64> + Send + Sync,
{
    /// Construct a new `QuoridorSearch`
    pub fn new(
        game: GameState,
        score_function: ScorableType,
        name: &'static str,
        options: SearchOptions,
    ) -> Self {
        Self {
            game,
            score_function,
            name,
            options,
            cancellation: CancellationToken::new(),
        }
    }

    /// Use an existing token, so whoever holds it can stop this search
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// The options this search runs with
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// A handle that stops this search when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// The player we are choosing a turn for
    pub fn player(&self) -> PlayerId {
        self.game.current_player()
    }

    /// Scores are stored from the searching player's point of view so the root always maximizes
    fn perspective_score(&self, node: &GameState) -> i64 {
        let score = self.score_function.score(node);
        match self.player() {
            PlayerId::P2 => score,
            PlayerId::P1 => score.saturating_neg(),
        }
    }

    /// Run the configured minimax variant from [QuoridorSearch::game]
    ///
    /// Returns [AbortedEarly] if the [CancellationToken] was cancelled before we finished.
    #[tracing::instrument(
        level = "info",
        skip_all,
        fields(
            name = self.name,
            variant = %self.options.variant,
            depth = self.options.depth,
            player = %self.player(),
            score = tracing::field::Empty,
            nodes = tracing::field::Empty,
        )
    )]
    pub fn search(&self) -> Result<SearchOutcome, AbortedEarly> {
        let started_at = Instant::now();
        let depth = self.options.depth;
        let mut nodes = 1;

        let children = if depth == 0 || self.game.is_over() {
            vec![]
        } else {
            self.game.simulate()
        };

        let tree = if self.options.parallel && !children.is_empty() {
            self.expand_parallel(&self.game, &children, depth, &mut nodes)?
        } else {
            self.expand(
                &self.game,
                &children,
                depth,
                i64::MIN,
                i64::MAX,
                true,
                &mut nodes,
            )?
        };

        let chosen = tree
            .chosen_index()
            .and_then(|index| children.get(index).cloned());

        let current_span = tracing::Span::current();
        current_span.record("score", tree.score());
        current_span.record("nodes", nodes);

        info!(
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            chosen = chosen
                .as_ref()
                .map(|(turn, _)| turn.to_string())
                .unwrap_or_default(),
            "Finished search"
        );

        Ok(SearchOutcome {
            score: tree.score(),
            chosen,
            nodes,
            tree,
        })
    }

    fn minimax(
        &self,
        node: &GameState,
        depth: usize,
        alpha: i64,
        beta: i64,
        is_maximizing: bool,
        nodes: &mut usize,
    ) -> Result<MinMaxReturn, AbortedEarly> {
        *nodes += 1;

        if depth == 0 || node.is_over() {
            return Ok(MinMaxReturn::Leaf {
                score: self.perspective_score(node),
            });
        }

        let children = node.simulate();
        self.expand(node, &children, depth, alpha, beta, is_maximizing, nodes)
    }

    #[allow(clippy::too_many_arguments)]
    fn expand(
        &self,
        node: &GameState,
        children: &[(TurnRecord, GameState)],
        depth: usize,
        mut alpha: i64,
        mut beta: i64,
        is_maximizing: bool,
        nodes: &mut usize,
    ) -> Result<MinMaxReturn, AbortedEarly> {
        let mut options = Vec::with_capacity(children.len());
        let mut best: Option<i64> = None;
        let mut alpha_beta_cutoff = false;

        for (turn, child) in children {
            if self.cancellation.is_cancelled() {
                return Err(AbortedEarly);
            }

            let result = self.minimax(child, depth - 1, alpha, beta, !is_maximizing, nodes)?;
            let value = result.score();
            options.push((*turn, result));

            let best_value = match best {
                Some(best_value) if !MinMaxReturn::improves(is_maximizing, value, best_value) => {
                    best_value
                }
                _ => value,
            };
            best = Some(best_value);

            if is_maximizing {
                alpha = alpha.max(best_value);
            } else {
                beta = beta.min(best_value);
            }

            if self.options.variant == SearchVariant::AlphaBeta && beta <= alpha {
                alpha_beta_cutoff = true;
                break;
            }
        }

        Ok(self.finish_node(node, is_maximizing, options, alpha_beta_cutoff))
    }

    /// Scores each root option on its own with a full window, then picks exactly like
    /// [QuoridorSearch::expand] would
    fn expand_parallel(
        &self,
        node: &GameState,
        children: &[(TurnRecord, GameState)],
        depth: usize,
        nodes: &mut usize,
    ) -> Result<MinMaxReturn, AbortedEarly> {
        let scored = children
            .par_iter()
            .map(|(turn, child)| {
                if self.cancellation.is_cancelled() {
                    return Err(AbortedEarly);
                }

                let mut child_nodes = 0;
                let result =
                    self.minimax(child, depth - 1, i64::MIN, i64::MAX, false, &mut child_nodes)?;
                Ok((*turn, result, child_nodes))
            })
            .collect::<Result<Vec<_>, AbortedEarly>>()?;

        *nodes += scored.iter().map(|(_, _, n)| n).sum::<usize>();
        debug!(options = scored.len(), "Scored root options in parallel");

        let options = scored
            .into_iter()
            .map(|(turn, result, _)| (turn, result))
            .collect();

        Ok(self.finish_node(node, true, options, false))
    }

    fn finish_node(
        &self,
        node: &GameState,
        is_maximizing: bool,
        options: Vec<(TurnRecord, MinMaxReturn)>,
        alpha_beta_cutoff: bool,
    ) -> MinMaxReturn {
        MinMaxReturn::node(
            node.current_player(),
            is_maximizing,
            options,
            alpha_beta_cutoff,
        )
        .unwrap_or_else(|| MinMaxReturn::Leaf {
            score: self.perspective_score(node),
        })
    }
}

#[cfg(test)]
mod tests {
    use quoridor_game_types::{Action, Phase, Position, Positions, RemainingWalls, Wall};

    use crate::{score::WIN_SCORE, DistanceDifference};

    use super::*;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col).unwrap()
    }

    /// All 20 walls are down, so every turn is just a pawn move. Each wall line only has a gap
    /// in column 4, which keeps the trees small enough to search a few turns deep
    fn walled_in_state(current_player: PlayerId, positions: Positions) -> GameState {
        let walls = [0, 2, 4, 6, 7].into_iter().flat_map(|row| {
            [0, 2, 5, 7]
                .into_iter()
                .map(move |col| Wall::horizontal(row, col).unwrap())
        });

        GameState::try_new(
            positions,
            walls,
            current_player,
            RemainingWalls { p1: 0, p2: 0 },
            Phase::Move,
        )
        .unwrap()
    }

    fn search(state: &GameState, variant: SearchVariant, depth: usize) -> SearchOutcome {
        QuoridorSearch::new(
            state.clone(),
            DistanceDifference,
            "test",
            SearchOptions {
                variant,
                depth,
                parallel: false,
            },
        )
        .search()
        .unwrap()
    }

    #[test]
    fn test_variant_names() {
        for variant in SearchVariant::ALL {
            assert_eq!(variant.to_string().parse::<SearchVariant>(), Ok(variant));
        }
        assert!("minimax".parse::<SearchVariant>().is_err());
    }

    #[test]
    fn test_depth_zero_just_scores() {
        let outcome = search(&GameState::new(), SearchVariant::AlphaBeta, 0);

        assert_eq!(outcome.score, 0);
        assert!(outcome.chosen.is_none());
        assert_eq!(outcome.nodes, 1);
    }

    #[test]
    fn test_finished_game_has_nothing_to_choose() {
        let state = GameState::try_new(
            Positions {
                p1: pos(4, 4),
                p2: pos(1, 4),
            },
            [],
            PlayerId::P2,
            RemainingWalls::default(),
            Phase::Move,
        )
        .unwrap()
        .apply(Action::Move(pos(0, 4)))
        .unwrap()
        .state;

        let outcome = search(&state, SearchVariant::DepthLimited, 2);

        // P2 is still the player on turn and it already won
        assert!(outcome.chosen.is_none());
        assert_eq!(outcome.score, WIN_SCORE);
    }

    #[test]
    fn test_takes_the_win_when_it_is_there() {
        let state = GameState::try_new(
            Positions {
                p1: pos(7, 0),
                p2: pos(3, 4),
            },
            [],
            PlayerId::P1,
            RemainingWalls::default(),
            Phase::Move,
        )
        .unwrap();

        for variant in SearchVariant::ALL {
            let outcome = search(&state, variant, 1);
            let (turn, next) = outcome.chosen.unwrap();

            assert!(turn.won);
            assert_eq!(turn.to, pos(8, 0));
            assert_eq!(next.winner(), Some(PlayerId::P1));
            assert_eq!(outcome.score, WIN_SCORE);
        }
    }

    #[test]
    fn test_chosen_score_matches_the_chosen_state() {
        let outcome = search(&GameState::new(), SearchVariant::AlphaBeta, 1);
        let (_, next) = outcome.chosen.clone().unwrap();

        // P1 is searching, so its scores are negated
        assert_eq!(outcome.score, -DistanceDifference.score(&next));
        assert_eq!(outcome.nodes, 1 + GameState::new().simulate().len());
    }

    #[test]
    fn test_pruning_never_changes_the_value() {
        let states = [
            walled_in_state(
                PlayerId::P1,
                Positions {
                    p1: pos(2, 4),
                    p2: pos(6, 4),
                },
            ),
            walled_in_state(
                PlayerId::P2,
                Positions {
                    p1: pos(4, 4),
                    p2: pos(5, 5),
                },
            ),
        ];

        for state in &states {
            for depth in 1..=3 {
                let pruned = search(state, SearchVariant::AlphaBeta, depth);
                let full = search(state, SearchVariant::DepthLimited, depth);

                assert_eq!(pruned.score, full.score, "depth {depth}\n{state}");
                assert!(pruned.nodes <= full.nodes);
                assert_eq!(
                    pruned.chosen.map(|(turn, _)| turn),
                    full.chosen.map(|(turn, _)| turn)
                );
            }
        }
    }

    #[test]
    fn test_pruning_matches_with_walls_in_hand() {
        let state = GameState::new()
            .apply(Action::Move(pos(1, 4)))
            .and_then(|t| t.state.apply(Action::Decline))
            .unwrap()
            .state;

        let pruned = search(&state, SearchVariant::AlphaBeta, 1);
        let full = search(&state, SearchVariant::DepthLimited, 1);

        assert_eq!(pruned.score, full.score);
    }

    #[test]
    fn test_parallel_root_picks_the_same_turn() {
        let state = walled_in_state(
            PlayerId::P1,
            Positions {
                p1: pos(2, 4),
                p2: pos(6, 4),
            },
        );
        let sequential = search(&state, SearchVariant::AlphaBeta, 3);
        let parallel = QuoridorSearch::new(
            state,
            DistanceDifference,
            "test",
            SearchOptions {
                variant: SearchVariant::AlphaBeta,
                depth: 3,
                parallel: true,
            },
        )
        .search()
        .unwrap();

        assert_eq!(parallel.score, sequential.score);
        assert_eq!(
            parallel.chosen.map(|(turn, _)| turn),
            sequential.chosen.map(|(turn, _)| turn)
        );
    }

    #[test]
    fn test_cancelled_search_aborts() {
        let search = QuoridorSearch::new(
            GameState::new(),
            DistanceDifference,
            "test",
            SearchOptions::default(),
        );
        search.cancellation_token().cancel();

        assert_eq!(search.search().unwrap_err(), AbortedEarly);
    }

    #[test]
    fn test_route_starts_with_the_chosen_turn() {
        let state = walled_in_state(
            PlayerId::P2,
            Positions {
                p1: pos(4, 4),
                p2: pos(5, 5),
            },
        );
        let outcome = search(&state, SearchVariant::AlphaBeta, 2);

        let route = outcome.route();
        assert_eq!(route.len(), 2);
        assert_eq!(route[0].0, PlayerId::P2);
        assert_eq!(route[1].0, PlayerId::P1);
        assert_eq!(Some(&route[0].1), outcome.chosen.as_ref().map(|(turn, _)| turn));
        assert!(outcome.to_text_tree().is_some());
    }
}
