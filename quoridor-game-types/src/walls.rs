use crate::{
    connectivity::can_reach_goal,
    error::WallError,
    geometry::{Orientation, Wall, WallSet},
    types::{PlayerId, Positions},
};

/// Two walls of the same orientation clash when they share a line and their anchors are within
/// one cell of each other. Crossing walls only clash when they share the exact anchor.
fn conflicts(a: &Wall, b: &Wall) -> bool {
    match (a.orientation, b.orientation) {
        (Orientation::Horizontal, Orientation::Horizontal) => {
            a.row == b.row && a.col.abs_diff(b.col) <= 1
        }
        (Orientation::Vertical, Orientation::Vertical) => {
            a.col == b.col && a.row.abs_diff(b.row) <= 1
        }
        _ => a.row == b.row && a.col == b.col,
    }
}

pub fn is_overlapping(candidate: &Wall, existing: &WallSet) -> bool {
    existing.iter().any(|wall| conflicts(candidate, wall))
}

/// Checks `candidate` against `walls` (which must not contain it yet), leaving `walls`
/// untouched on return
fn check_with_scratch(
    candidate: &Wall,
    positions: &Positions,
    walls: &mut WallSet,
) -> Result<(), WallError> {
    if !candidate.in_bounds() {
        return Err(WallError::OutOfBounds(*candidate));
    }
    if is_overlapping(candidate, walls) {
        return Err(WallError::Overlapping(*candidate));
    }

    walls.insert(*candidate);
    let cut_off = PlayerId::ALL
        .into_iter()
        .find(|player| !can_reach_goal(*player, positions, walls));
    walls.remove(candidate);

    match cut_off {
        Some(player) => Err(WallError::BlocksPath {
            wall: *candidate,
            player,
        }),
        None => Ok(()),
    }
}

/// Full legality check for a single wall: inside the anchor grid, no overlap, and both pawns
/// can still reach their goal rows afterwards
pub fn check_wall_placement(
    candidate: &Wall,
    positions: &Positions,
    existing: &WallSet,
) -> Result<(), WallError> {
    check_with_scratch(candidate, positions, &mut existing.clone())
}

/// Every wall that could legally be placed right now, in [Wall::all] order
pub fn valid_wall_placements(positions: &Positions, existing: &WallSet) -> Vec<Wall> {
    let mut scratch = existing.clone();

    Wall::all()
        .filter(|wall| check_with_scratch(wall, positions, &mut scratch).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::{connectivity::shortest_path_length, Position};

    use super::*;

    fn walls(list: &[Wall]) -> WallSet {
        list.iter().copied().collect()
    }

    fn h(row: u8, col: u8) -> Wall {
        Wall::horizontal(row, col).unwrap()
    }

    fn v(row: u8, col: u8) -> Wall {
        Wall::vertical(row, col).unwrap()
    }

    #[test]
    fn test_same_orientation_overlap() {
        let existing = walls(&[h(3, 3)]);

        assert!(is_overlapping(&h(3, 2), &existing));
        assert!(is_overlapping(&h(3, 3), &existing));
        assert!(is_overlapping(&h(3, 4), &existing));
        assert!(!is_overlapping(&h(3, 5), &existing));
        assert!(!is_overlapping(&h(4, 3), &existing));

        let existing = walls(&[v(3, 3)]);

        assert!(is_overlapping(&v(2, 3), &existing));
        assert!(is_overlapping(&v(4, 3), &existing));
        assert!(!is_overlapping(&v(5, 3), &existing));
        assert!(!is_overlapping(&v(3, 4), &existing));
    }

    #[test]
    fn test_cross_orientation_overlap_needs_same_anchor() {
        let existing = walls(&[h(3, 3)]);

        assert!(is_overlapping(&v(3, 3), &existing));
        assert!(!is_overlapping(&v(3, 4), &existing));
        assert!(!is_overlapping(&v(2, 3), &existing));
    }

    #[test]
    fn test_empty_board_allows_every_wall() {
        assert_eq!(
            valid_wall_placements(&Positions::initial(), &WallSet::new()).len(),
            128
        );
    }

    #[test]
    fn test_out_of_bounds_is_rejected() {
        let wall = Wall {
            orientation: Orientation::Horizontal,
            row: 8,
            col: 0,
        };

        assert_eq!(
            check_wall_placement(&wall, &Positions::initial(), &WallSet::new()),
            Err(WallError::OutOfBounds(wall))
        );
    }

    #[test]
    fn test_wall_closing_the_last_corridor_is_rejected() {
        let positions = Positions::initial();
        // Everything between rows 3 and 4 is closed apart from column 8
        let existing = walls(&[h(3, 0), h(3, 2), h(3, 4), h(3, 6)]);
        let closing = v(3, 7);
        let sealing = h(4, 7);

        assert!(check_wall_placement(&closing, &positions, &existing).is_ok());
        let existing = existing.with(closing);

        assert!(!is_overlapping(&sealing, &existing));
        assert_eq!(
            check_wall_placement(&sealing, &positions, &existing),
            Err(WallError::BlocksPath {
                wall: sealing,
                player: PlayerId::P1,
            })
        );
        assert!(!valid_wall_placements(&positions, &existing).contains(&sealing));
    }

    #[test]
    fn test_cutting_off_either_player_is_rejected() {
        let positions = Positions {
            p1: Position { row: 0, col: 4 },
            p2: Position { row: 2, col: 0 },
        };
        // P2 can only leave its pocket upwards through (1,0) -> (0,0)
        let existing = walls(&[v(1, 0), h(2, 0)]);
        assert_eq!(
            shortest_path_length(PlayerId::P2, &positions, &existing),
            Some(2)
        );

        assert_eq!(
            check_wall_placement(&h(0, 0), &positions, &existing),
            Err(WallError::BlocksPath {
                wall: h(0, 0),
                player: PlayerId::P2,
            })
        );
    }

    #[test]
    fn test_valid_placements_never_overlap_or_disconnect() {
        let positions = Positions::initial();
        let existing = walls(&[h(0, 3), v(1, 5), h(4, 4), v(6, 0)]);

        for wall in valid_wall_placements(&positions, &existing) {
            assert!(!is_overlapping(&wall, &existing), "{wall} overlaps");

            let after = existing.with(wall);
            for player in PlayerId::ALL {
                assert!(can_reach_goal(player, &positions, &after), "{wall} cuts off {player}");
            }
        }
    }
}
