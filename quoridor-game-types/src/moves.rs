use tinyvec::TinyVec;

use crate::{
    geometry::{Direction, Position, WallSet},
    types::{PlayerId, Positions},
};

/// Destinations a pawn can reach in one move. Four steps plus the odd diagonal is the most a
/// position can ever produce so this never spills onto the heap
pub type MoveList = TinyVec<[Position; 8]>;

/// Every cell `mover` can legally move its pawn to.
///
/// Plain steps go to any unblocked empty neighbour. Stepping into the opponent turns into a
/// jump over them, and if the jump is off the board or walled off the pawn can instead slide
/// to either side of the opponent, as long as no wall separates the opponent from that cell.
pub fn legal_moves(mover: PlayerId, positions: &Positions, walls: &WallSet) -> MoveList {
    let from = positions[mover];
    let opponent = positions[mover.opponent()];

    let mut moves = MoveList::new();
    let mut push = |to: Position| {
        if !moves.contains(&to) {
            moves.push(to);
        }
    };

    for dir in Direction::ALL {
        let Some(next) = from.step(dir) else {
            continue;
        };

        if walls.blocks(from, next) {
            continue;
        }

        if next != opponent {
            push(next);
            continue;
        }

        match next.step(dir).filter(|jump| !walls.blocks(opponent, *jump)) {
            Some(jump) => push(jump),
            None => {
                for side in dir.perpendicular() {
                    if let Some(diagonal) = opponent.step(side) {
                        if !walls.blocks(opponent, diagonal) {
                            push(diagonal);
                        }
                    }
                }
            }
        }
    }

    moves
}
