use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result};
use colored::Colorize;
use quoridor_game_types::GameState;
use quoridor_minimax::{DistanceDifference, QuoridorSearch, SearchTask};
use quoridor_rs::{session::replay, HistoryTree};
use tracing::info;

use super::{load_game, SearchArgs};

#[derive(clap::Args, Debug)]
pub(crate) struct Selfplay {
    /// Start from this saved game instead of the initial position
    #[clap(short, long, value_parser)]
    load: Option<PathBuf>,

    /// Stop after this many complete turns even if nobody has won
    #[clap(long, value_parser, default_value_t = 200)]
    max_turns: usize,

    /// Print the history tree once the game is over
    #[clap(long, action)]
    history: bool,

    #[clap(flatten)]
    search: SearchArgs,
}

impl Selfplay {
    pub(crate) fn run(self) -> Result<()> {
        let ai = self.search.match_config()?.ai;
        let start = match &self.load {
            Some(path) => load_game(path)?,
            None => GameState::new(),
        };

        println!("{start}\n");
        let mut history = HistoryTree::new(start);

        for turn in 1..=self.max_turns {
            let state = history.current_state().clone();
            if state.is_over() {
                break;
            }

            let search = QuoridorSearch::new(
                state.clone(),
                DistanceDifference,
                "selfplay",
                ai.search_options(),
            );
            let outcome = SearchTask::spawn(search, ai.thinking_delay())
                .wait()
                .map_err(|_| eyre!("The search for turn {turn} was cancelled"))?;
            let chosen = outcome
                .chosen_turn()
                .ok_or_else(|| eyre!("{} had nothing to play", state.current_player()))?;

            for transition in replay(&state, chosen)? {
                history.append(transition.state);
            }

            info!(turn, score = outcome.score, nodes = outcome.nodes, "Played turn");
            println!("{turn}: {}", history.current_state().description().bold());
            println!("{}\n", history.current_state());
        }

        let last = history.current_state();
        match last.winner() {
            Some(winner) => println!("{}", format!("🏆 {winner} won").green()),
            None => println!(
                "{}",
                format!("⏳ No winner after {} turns", self.max_turns).yellow()
            ),
        }

        if self.history {
            println!("{}", history.to_text_tree());
        }

        Ok(())
    }
}
