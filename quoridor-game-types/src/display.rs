use std::fmt;

use crate::{geometry::Position, state::GameState, types::PlayerId, BOARD_SIZE};

/// ASCII board: `1` and `2` are the pawns, `|` and `-` are wall segments
impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let walls = self.walls();

        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let here = Position { row, col };
                let cell = if here == self.position(PlayerId::P1) {
                    '1'
                } else if here == self.position(PlayerId::P2) {
                    '2'
                } else {
                    '.'
                };
                write!(f, "{cell}")?;

                if col + 1 < BOARD_SIZE {
                    let right = Position { row, col: col + 1 };
                    let edge = if walls.blocks(here, right) { '|' } else { ' ' };
                    write!(f, "{edge}")?;
                }
            }
            writeln!(f)?;

            if row + 1 < BOARD_SIZE {
                for col in 0..BOARD_SIZE {
                    let below = Position { row: row + 1, col };
                    let edge = if walls.blocks(Position { row, col }, below) {
                        '-'
                    } else {
                        ' '
                    };
                    write!(f, "{edge}")?;
                    if col + 1 < BOARD_SIZE {
                        write!(f, " ")?;
                    }
                }
                writeln!(f)?;
            }
        }

        write!(
            f,
            "{} to play ({} phase), walls left P1={} P2={}",
            self.current_player(),
            self.phase(),
            self.remaining_walls().p1,
            self.remaining_walls().p2
        )
    }
}
