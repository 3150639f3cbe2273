use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result};
use colored::Colorize;
use itertools::Itertools;
use quoridor_game_types::GameState;
use quoridor_minimax::{
    DistanceDifference, QuoridorSearch, SearchOptions, SearchOutcome, SearchVariant,
};

use super::{load_game, SearchArgs};

#[derive(clap::Args, Debug)]
pub(crate) struct Analyze {
    /// Saved game record or bare game state to analyze
    #[clap(value_parser)]
    file: PathBuf,

    /// Run both search variants and fail if they disagree on the value
    #[clap(long, action)]
    compare: bool,

    /// Also print the scores of every option at the root
    #[clap(long, action)]
    tree: bool,

    #[clap(flatten)]
    search: SearchArgs,
}

impl Analyze {
    pub(crate) fn run(self) -> Result<()> {
        let state = load_game(&self.file)?;
        let options = self.search.match_config()?.ai.search_options();

        println!("{state}\n");

        if !self.compare {
            let outcome = search(&state, options)?;
            self.report(options.variant, &outcome);

            return Ok(());
        }

        let outcomes = SearchVariant::ALL
            .into_iter()
            .map(|variant| {
                let options = SearchOptions { variant, ..options };
                search(&state, options).map(|outcome| (variant, outcome))
            })
            .collect::<Result<Vec<_>>>()?;

        for (variant, outcome) in &outcomes {
            self.report(*variant, outcome);
        }

        if let Some(((a, first), (b, second))) = outcomes
            .iter()
            .tuple_windows()
            .find(|((_, first), (_, second))| first.score != second.score)
        {
            return Err(eyre!(
                "{a} scored {} but {b} scored {}",
                first.score,
                second.score
            ));
        }
        println!("{}", "✅ Both variants agree".green());

        Ok(())
    }

    fn report(&self, variant: SearchVariant, outcome: &SearchOutcome) {
        println!("{}", format!("{variant}").bold());
        println!("score: {}, nodes searched: {}", outcome.score, outcome.nodes);

        match outcome.chosen_turn() {
            Some(turn) => println!("chosen: {turn}"),
            None => println!("{}", "nothing to choose".yellow()),
        }

        let route = outcome.route();
        if !route.is_empty() {
            println!(
                "expected line: {}",
                route.iter().map(|(_, turn)| turn).join(", then ")
            );
        }

        if self.tree {
            if let Some(tree) = outcome.to_text_tree() {
                println!("{tree}");
            }
        }
        println!();
    }
}

fn search(state: &GameState, options: SearchOptions) -> Result<SearchOutcome> {
    QuoridorSearch::new(state.clone(), DistanceDifference, "analyze", options)
        .search()
        .map_err(|_| eyre!("The {} search was cancelled", options.variant))
}
