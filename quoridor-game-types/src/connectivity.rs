//! Breadth first search over the board, with wall-crossed edges removed.
//!
//! Pawns never block each other here, only walls do.

use std::collections::VecDeque;

use crate::{
    geometry::{Direction, WallSet},
    types::{PlayerId, Positions},
    BOARD_SIZE,
};

const CELLS: usize = BOARD_SIZE as usize * BOARD_SIZE as usize;

/// Fewest steps `player` needs to reach their goal row, `None` when it can't be reached at all
pub fn shortest_path_length(
    player: PlayerId,
    positions: &Positions,
    walls: &WallSet,
) -> Option<u32> {
    let goal_row = player.goal_row();
    let start = positions[player];

    let mut visited = [false; CELLS];
    let mut queue = VecDeque::with_capacity(CELLS);

    visited[start.as_index()] = true;
    queue.push_back((start, 0));

    while let Some((current, distance)) = queue.pop_front() {
        if current.row == goal_row {
            return Some(distance);
        }

        for next in Direction::ALL.iter().filter_map(|dir| current.step(*dir)) {
            if visited[next.as_index()] || walls.blocks(current, next) {
                continue;
            }

            visited[next.as_index()] = true;
            queue.push_back((next, distance + 1));
        }
    }

    None
}

pub fn can_reach_goal(player: PlayerId, positions: &Positions, walls: &WallSet) -> bool {
    shortest_path_length(player, positions, walls).is_some()
}

#[cfg(test)]
mod tests {
    use crate::{Position, Wall};

    use super::*;

    #[test]
    fn test_empty_board_is_eight_steps() {
        let positions = Positions::initial();
        let walls = WallSet::new();

        assert_eq!(
            shortest_path_length(PlayerId::P1, &positions, &walls),
            Some(8)
        );
        assert_eq!(
            shortest_path_length(PlayerId::P2, &positions, &walls),
            Some(8)
        );
    }

    #[test]
    fn test_already_on_goal_row() {
        let positions = Positions {
            p1: Position { row: 8, col: 0 },
            p2: Position { row: 0, col: 8 },
        };

        assert_eq!(
            shortest_path_length(PlayerId::P1, &positions, &WallSet::new()),
            Some(0)
        );
    }

    #[test]
    fn test_detour_around_wall() {
        let positions = Positions::initial();
        let walls: WallSet = [Wall::horizontal(0, 3).unwrap()].into_iter().collect();

        // P1 on (0,4) has to side-step to column 5 before heading down
        assert_eq!(
            shortest_path_length(PlayerId::P1, &positions, &walls),
            Some(9)
        );
        assert_eq!(
            shortest_path_length(PlayerId::P2, &positions, &walls),
            Some(8)
        );
    }

    #[test]
    fn test_fully_walled_row_is_unreachable() {
        let positions = Positions::initial();
        // Four horizontal walls cover columns 0..=7, the vertical wall closes column 8 off
        // from the side
        let walls: WallSet = [
            Wall::horizontal(3, 0).unwrap(),
            Wall::horizontal(3, 2).unwrap(),
            Wall::horizontal(3, 4).unwrap(),
            Wall::horizontal(3, 6).unwrap(),
            Wall::vertical(3, 7).unwrap(),
            Wall::horizontal(4, 7).unwrap(),
        ]
        .into_iter()
        .collect();

        assert_eq!(shortest_path_length(PlayerId::P1, &positions, &walls), None);
        assert!(!can_reach_goal(PlayerId::P1, &positions, &walls));
        assert!(!can_reach_goal(PlayerId::P2, &positions, &walls));
    }
}
