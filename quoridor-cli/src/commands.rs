pub mod analyze;
pub mod selfplay;
pub mod validate;

use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use analyze::Analyze;
use selfplay::Selfplay;
use validate::Validate;

use clap::Subcommand;
use color_eyre::eyre::{Result, WrapErr};
use quoridor_game_types::{
    wire_representation::{SavedGameRecord, WireGameState},
    GameState, LoadError,
};
use quoridor_minimax::SearchVariant;
use quoridor_rs::MatchConfig;
use serde_json::Value;

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Let the AI play both sides
    Selfplay(Selfplay),
    /// Search a saved position and explain the chosen turn
    Analyze(Analyze),
    /// Check saved games against the rules
    Validate(Validate),
}

impl Command {
    pub fn run(self) -> Result<()> {
        match self {
            Command::Selfplay(s) => s.run()?,
            Command::Analyze(a) => a.run()?,
            Command::Validate(v) => v.run()?,
        }

        Ok(())
    }
}

/// Search settings shared by the commands that run the AI
#[derive(clap::Args, Debug, Clone, Default)]
pub(crate) struct SearchArgs {
    /// JSON match config to start from, the flags below override it
    #[clap(long, value_parser)]
    config: Option<PathBuf>,

    /// `alpha-beta` or `limited-anticipation`
    #[clap(long, value_parser)]
    variant: Option<SearchVariant>,

    /// Complete turns to look ahead
    #[clap(short, long, value_parser)]
    depth: Option<usize>,

    /// Score the first level of the search on all cores
    #[clap(long, action)]
    parallel: bool,

    /// Thinking delay before each AI turn
    #[clap(long, value_parser)]
    delay_ms: Option<u64>,
}

impl SearchArgs {
    pub(crate) fn match_config(&self) -> Result<MatchConfig> {
        let mut config = match &self.config {
            Some(path) => MatchConfig::from_json(&read_file(path)?)
                .wrap_err_with(|| format!("{} is not a valid match config", path.display()))?,
            None => MatchConfig::default(),
        };

        if let Some(variant) = self.variant {
            config.ai.variant = variant;
        }
        if let Some(depth) = self.depth {
            config.ai.depth = depth;
        }
        if self.parallel {
            config.ai.parallel = true;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.ai.thinking_delay_ms = delay_ms;
        }

        Ok(config)
    }
}

pub(crate) fn read_file(path: &Path) -> Result<String> {
    read_to_string(path).wrap_err_with(|| format!("Couldn't read {}", path.display()))
}

/// Parse either a saved game record or a bare game state
pub(crate) fn parse_game(value: Value) -> Result<GameState, LoadError> {
    if value.get("state").is_some() {
        serde_json::from_value::<SavedGameRecord>(value)?.game_state()
    } else {
        GameState::try_from(serde_json::from_value::<WireGameState>(value)?)
    }
}

pub(crate) fn load_game(path: &Path) -> Result<GameState> {
    let value: Value = serde_json::from_str(&read_file(path)?)
        .wrap_err_with(|| format!("{} is not JSON", path.display()))?;

    parse_game(value).wrap_err_with(|| format!("{} is not a playable game", path.display()))
}
