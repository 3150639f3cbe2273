use quoridor_game_types::{PlayerId, TurnRecord};
use text_trees::StringTreeNode;

#[derive(Debug, Clone)]
/// This is returned from an iteration of the minimax algorithm
/// It contains what we learned about the game tree below a node
pub enum MinMaxReturn {
    /// This is a non-leaf node in the game tree
    /// We have the score of every option we looked at as well as the chosen one
    Node {
        /// Whether this node was a maximizing node or not
        is_maximizing: bool,
        /// Which player was taking their turn at this node
        moving_player: PlayerId,
        /// Every option we looked at, in the order they were generated
        ///
        /// Only the chosen option keeps its subtree, the rest are collapsed down to a
        /// [MinMaxReturn::Leaf] holding their score
        options: Vec<(TurnRecord, Self)>,
        /// Index into `options` of the first option with the best score
        chosen: usize,
        /// The chosen score
        /// This always matches the score of `options[chosen]`
        score: i64,
        /// Whether we stopped looking at options early because of Alpha-Beta pruning
        alpha_beta_cutoff: bool,
    },
    /// Represents a leaf node in the game tree
    /// This happens when we reach a won state, a state with no options, or the maximum depth.
    /// Also used for options that weren't chosen
    Leaf {
        #[allow(missing_docs)]
        score: i64,
    },
}

impl MinMaxReturn {
    /// Build a node from its explored options, picking the first option with the best score.
    ///
    /// Returns `None` when there are no options
    pub(crate) fn node(
        moving_player: PlayerId,
        is_maximizing: bool,
        mut options: Vec<(TurnRecord, Self)>,
        alpha_beta_cutoff: bool,
    ) -> Option<Self> {
        let (chosen, score) =
            options
                .iter()
                .enumerate()
                .fold(None, |best: Option<(usize, i64)>, (index, (_, option))| {
                    let value = option.score();
                    match best {
                        Some((_, best_value))
                            if !Self::improves(is_maximizing, value, best_value) =>
                        {
                            best
                        }
                        _ => Some((index, value)),
                    }
                })?;

        for (index, (_, option)) in options.iter_mut().enumerate() {
            if index != chosen {
                *option = MinMaxReturn::Leaf {
                    score: option.score(),
                };
            }
        }

        Some(MinMaxReturn::Node {
            is_maximizing,
            moving_player,
            options,
            chosen,
            score,
            alpha_beta_cutoff,
        })
    }

    /// Strict improvement, ties keep the earlier option
    pub(crate) fn improves(is_maximizing: bool, value: i64, best: i64) -> bool {
        if is_maximizing {
            value > best
        } else {
            value < best
        }
    }

    /// Returns the score for this node
    pub fn score(&self) -> i64 {
        match self {
            MinMaxReturn::Node { score, .. } => *score,
            MinMaxReturn::Leaf { score } => *score,
        }
    }

    /// Index of the chosen option, `None` for leaves
    pub fn chosen_index(&self) -> Option<usize> {
        match self {
            MinMaxReturn::Node { chosen, .. } => Some(*chosen),
            MinMaxReturn::Leaf { .. } => None,
        }
    }

    /// The chosen option and what we know about the tree below it
    pub fn chosen_option(&self) -> Option<&(TurnRecord, Self)> {
        match self {
            MinMaxReturn::Node {
                options, chosen, ..
            } => options.get(*chosen),
            MinMaxReturn::Leaf { .. } => None,
        }
    }

    /// Returns all the turns in the 'route' through the game tree that minimax took
    /// This is useful for debugging as it shows each of the turns we and our opponent made during
    /// the simulation
    pub fn chosen_route(&self) -> Vec<(PlayerId, TurnRecord)> {
        match self {
            MinMaxReturn::Leaf { .. } => vec![],
            MinMaxReturn::Node { moving_player, .. } => {
                if let Some((turn, next)) = self.chosen_option() {
                    let mut tail = next.chosen_route();
                    tail.insert(0, (*moving_player, *turn));
                    tail
                } else {
                    vec![]
                }
            }
        }
    }

    /// This returns a visual representation of the route minimax chose
    /// It shows the score at each level and the turn that leads to the next one
    pub fn to_text_tree(&self) -> Option<String> {
        let tree_node = self.to_text_tree_node("root".to_owned())?;
        Some(format!("{}", tree_node))
    }

    fn to_text_tree_node(&self, label: String) -> Option<StringTreeNode> {
        match self {
            MinMaxReturn::Leaf { .. } => None,
            MinMaxReturn::Node {
                options,
                score,
                alpha_beta_cutoff,
                ..
            } => {
                let cutoff = if *alpha_beta_cutoff { " (pruned)" } else { "" };
                let mut node = StringTreeNode::new(format!(
                    "{} {} [{} options{}]",
                    label,
                    score,
                    options.len(),
                    cutoff
                ));

                if let Some((turn, result)) = self.chosen_option() {
                    let label = turn.to_string();
                    let child = result.to_text_tree_node(label.clone()).unwrap_or_else(|| {
                        StringTreeNode::new(format!("{} {}", label, result.score()))
                    });
                    node.push_node(child);
                }

                Some(node)
            }
        }
    }
}
