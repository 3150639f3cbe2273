//! The JSON layout saved games are stored in.
//!
//! Field names follow the layout existing saves already use (`players.P1.row`,
//! `walls[].type`, `actionPhase` ...). A `version` field was added later, records without it
//! are treated as version 0 and load unchanged.

use serde::{Deserialize, Serialize};

use crate::{
    error::LoadError,
    geometry::{Orientation, Position, Wall},
    state::GameState,
    types::{Phase, PlayerId, Positions, RemainingWalls},
};

/// Newest schema version this crate reads and the one it writes
pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePosition {
    pub row: i64,
    pub col: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePlayers {
    #[serde(rename = "P1")]
    pub p1: WirePosition,
    #[serde(rename = "P2")]
    pub p2: WirePosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireWall {
    #[serde(rename = "type")]
    pub orientation: Orientation,
    pub row: i64,
    pub col: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRemainingWalls {
    #[serde(rename = "P1")]
    pub p1: i64,
    #[serde(rename = "P2")]
    pub p2: i64,
}

/// A game state as it appears on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGameState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    pub players: WirePlayers,
    pub walls: Vec<WireWall>,
    pub current_player: PlayerId,
    pub remaining_walls: WireRemainingWalls,
    pub action_phase: Phase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_description: Option<String>,
}

/// One entry in the saved game list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGameRecord {
    pub id: String,
    pub date: String,
    pub state: WireGameState,
}

impl SavedGameRecord {
    pub fn new(id: impl Into<String>, date: impl Into<String>, state: &GameState) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            state: state.into(),
        }
    }

    pub fn game_state(&self) -> Result<GameState, LoadError> {
        self.state.clone().try_into()
    }
}

fn coordinate(field: &'static str, value: i64) -> Result<u8, LoadError> {
    u8::try_from(value).map_err(|_| LoadError::CoordinateOutOfRange { field, value })
}

impl TryFrom<WirePosition> for Position {
    type Error = LoadError;

    fn try_from(value: WirePosition) -> Result<Self, Self::Error> {
        Ok(Position {
            row: coordinate("row", value.row)?,
            col: coordinate("col", value.col)?,
        })
    }
}

impl TryFrom<WireWall> for Wall {
    type Error = LoadError;

    fn try_from(value: WireWall) -> Result<Self, Self::Error> {
        Ok(Wall {
            orientation: value.orientation,
            row: coordinate("wall row", value.row)?,
            col: coordinate("wall col", value.col)?,
        })
    }
}

impl TryFrom<WireGameState> for GameState {
    type Error = LoadError;

    fn try_from(value: WireGameState) -> Result<Self, Self::Error> {
        let version = value.version.unwrap_or(0);
        if version > CURRENT_VERSION {
            return Err(LoadError::UnsupportedVersion {
                found: version,
                supported: CURRENT_VERSION,
            });
        }

        let positions = Positions {
            p1: value.players.p1.try_into()?,
            p2: value.players.p2.try_into()?,
        };
        let walls = value
            .walls
            .into_iter()
            .map(Wall::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let remaining_walls = RemainingWalls {
            p1: coordinate("remaining walls", value.remaining_walls.p1)?,
            p2: coordinate("remaining walls", value.remaining_walls.p2)?,
        };

        GameState::try_new(
            positions,
            walls,
            value.current_player,
            remaining_walls,
            value.action_phase,
        )
    }
}

impl From<&GameState> for WireGameState {
    fn from(state: &GameState) -> Self {
        let position = |p: Position| WirePosition {
            row: p.row.into(),
            col: p.col.into(),
        };

        Self {
            version: Some(CURRENT_VERSION),
            players: WirePlayers {
                p1: position(state.position(PlayerId::P1)),
                p2: position(state.position(PlayerId::P2)),
            },
            walls: state
                .walls()
                .iter()
                .map(|wall| WireWall {
                    orientation: wall.orientation,
                    row: wall.row.into(),
                    col: wall.col.into(),
                })
                .collect(),
            current_player: state.current_player(),
            remaining_walls: WireRemainingWalls {
                p1: state.remaining_walls().p1.into(),
                p2: state.remaining_walls().p2.into(),
            },
            action_phase: state.phase(),
            move_description: Some(state.description()),
        }
    }
}

impl GameState {
    /// Parse and validate a bare state from JSON
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let wire: WireGameState = serde_json::from_str(json)?;
        wire.try_into()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&WireGameState::from(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &str = r#"{
        "players": {"P1": {"row": 2, "col": 4}, "P2": {"row": 6, "col": 3}},
        "walls": [{"type": "horizontal", "row": 3, "col": 3}, {"type": "vertical", "row": 5, "col": 1}],
        "currentPlayer": "P2",
        "remainingWalls": {"P1": 9, "P2": 9},
        "actionPhase": "move",
        "moveDescription": "P1 moved to (2,4) and placed a vertical wall at (5,1)",
        "somethingNew": true
    }"#;

    #[test]
    fn test_legacy_record_loads() {
        let state = GameState::from_json(LEGACY).unwrap();

        assert_eq!(state.position(PlayerId::P1), Position { row: 2, col: 4 });
        assert_eq!(state.current_player(), PlayerId::P2);
        assert_eq!(state.walls().len(), 2);
        assert!(state.walls().contains(&Wall::vertical(5, 1).unwrap()));
    }

    #[test]
    fn test_written_state_reads_back_equal() {
        let state = GameState::from_json(LEGACY).unwrap();
        let json = state.to_json().unwrap();

        assert!(json.contains(r#""version":1"#));
        assert!(json.contains(r#""actionPhase":"move""#));
        assert_eq!(GameState::from_json(&json).unwrap(), state);
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let json = r#"{"players": {"P1": {"row": 0, "col": 4}, "P2": {"row": 8, "col": 4}}, "walls": []}"#;

        assert!(matches!(
            GameState::from_json(json),
            Err(LoadError::Malformed(_))
        ));
    }

    #[test]
    fn test_negative_coordinate_is_rejected() {
        let json = LEGACY.replace(r#""row": 2, "col": 4"#, r#""row": -1, "col": 4"#);

        assert!(matches!(
            GameState::from_json(&json),
            Err(LoadError::CoordinateOutOfRange { value: -1, .. })
        ));
    }

    #[test]
    fn test_off_board_position_is_rejected() {
        let json = LEGACY.replace(r#""row": 6, "col": 3"#, r#""row": 9, "col": 3"#);

        assert!(matches!(
            GameState::from_json(&json),
            Err(LoadError::PositionOutOfBounds {
                player: PlayerId::P2,
                ..
            })
        ));
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let json = LEGACY.replacen('{', r#"{"version": 7,"#, 1);

        assert!(matches!(
            GameState::from_json(&json),
            Err(LoadError::UnsupportedVersion {
                found: 7,
                supported: 1
            })
        ));
    }

    #[test]
    fn test_saved_record_layout() {
        let record = SavedGameRecord::new("1700000000000", "19/10/2026, 10:00:00", &GameState::new());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], "1700000000000");
        assert_eq!(json["state"]["players"]["P1"]["col"], 4);
        assert_eq!(json["state"]["remainingWalls"]["P2"], 10);
        assert_eq!(json["state"]["currentPlayer"], "P1");
        assert_eq!(record.game_state().unwrap(), GameState::new());
    }
}
