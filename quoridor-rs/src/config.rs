use std::time::Duration;

use quoridor_game_types::PlayerId;
use quoridor_minimax::{SearchOptions, SearchVariant};
use serde::{Deserialize, Serialize};

/// Who is playing who
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    /// Two people sharing the board
    #[default]
    PlayerVsPlayer,
    /// One side is played by the search
    PlayerVsAi {
        #[serde(rename = "aiPlayer", default = "default_ai_player")]
        ai_player: PlayerId,
    },
}

fn default_ai_player() -> PlayerId {
    PlayerId::P2
}

impl GameMode {
    /// The usual setup, the AI takes P2
    pub fn against_ai() -> Self {
        GameMode::PlayerVsAi {
            ai_player: default_ai_player(),
        }
    }

    pub fn ai_player(&self) -> Option<PlayerId> {
        match self {
            GameMode::PlayerVsPlayer => None,
            GameMode::PlayerVsAi { ai_player } => Some(*ai_player),
        }
    }
}

/// Named search depths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn depth(self) -> usize {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

/// How the AI plays
///
/// ```
/// use quoridor_rs::AiConfig;
///
/// let config: AiConfig = serde_json::from_str(r#"{"variant": "limited-anticipation", "depth": 2}"#).unwrap();
///
/// assert_eq!(config.depth, 2);
/// assert_eq!(config.thinking_delay_ms, 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiConfig {
    pub variant: SearchVariant,
    /// Complete turns to look ahead
    pub depth: usize,
    /// Score the first level of the search on all cores
    pub parallel: bool,
    /// How long the AI pretends to think before it starts searching
    pub thinking_delay_ms: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        let search = SearchOptions::default();

        Self {
            variant: search.variant,
            depth: search.depth,
            parallel: search.parallel,
            thinking_delay_ms: 500,
        }
    }
}

impl AiConfig {
    pub fn with_difficulty(self, difficulty: Difficulty) -> Self {
        Self {
            depth: difficulty.depth(),
            ..self
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            variant: self.variant,
            depth: self.depth,
            parallel: self.parallel,
        }
    }

    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchConfig {
    pub mode: GameMode,
    pub ai: AiConfig,
}

impl MatchConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
