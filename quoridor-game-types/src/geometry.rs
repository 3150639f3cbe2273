use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{BOARD_SIZE, WALL_ANCHORS};

/// A cell on the board. `row` 0 is P1's home row and `row` 8 is P2's home row.
///
/// The fields are public for ergonomic construction; anything that accepts a position from the
/// outside world ([crate::GameState::try_new], [crate::GameState::apply]) checks that it is on
/// the board before trusting it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Build a position, returning `None` when it is off the board
    pub fn new(row: u8, col: u8) -> Option<Self> {
        let position = Self { row, col };
        position.is_on_board().then_some(position)
    }

    pub fn is_on_board(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// The neighbouring cell in `direction`, or `None` if that would leave the board
    pub fn step(&self, direction: Direction) -> Option<Self> {
        let (d_row, d_col) = direction.delta();
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;

        Self::new(row, col)
    }

    /// Orthogonal adjacency, diagonals don't count
    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }

    pub(crate) fn as_index(&self) -> usize {
        self.row as usize * BOARD_SIZE as usize + self.col as usize
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Every direction, in the order moves are generated
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(row, col)` offset of a single step
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// The two directions at right angles to this one
    pub fn perpendicular(self) -> [Direction; 2] {
        match self {
            Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
            Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::Vertical => write!(f, "vertical"),
        }
    }
}

/// A two-cell-long wall.
///
/// A horizontal wall anchored at `(r, c)` sits on the line between rows `r` and `r + 1` and
/// covers columns `c` and `c + 1`. A vertical wall anchored at `(r, c)` sits on the line
/// between columns `c` and `c + 1` and covers rows `r` and `r + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Wall {
    pub orientation: Orientation,
    pub row: u8,
    pub col: u8,
}

impl Wall {
    /// Build a wall, returning `None` when the anchor is outside the 8x8 anchor grid
    pub fn new(orientation: Orientation, row: u8, col: u8) -> Option<Self> {
        let wall = Self {
            orientation,
            row,
            col,
        };
        wall.in_bounds().then_some(wall)
    }

    pub fn horizontal(row: u8, col: u8) -> Option<Self> {
        Self::new(Orientation::Horizontal, row, col)
    }

    pub fn vertical(row: u8, col: u8) -> Option<Self> {
        Self::new(Orientation::Vertical, row, col)
    }

    pub fn in_bounds(&self) -> bool {
        self.row < WALL_ANCHORS && self.col < WALL_ANCHORS
    }

    /// All 128 anchored walls, row-major with horizontal before vertical at each anchor
    pub fn all() -> impl Iterator<Item = Wall> {
        (0..WALL_ANCHORS).flat_map(|row| {
            (0..WALL_ANCHORS).flat_map(move |col| {
                [Orientation::Horizontal, Orientation::Vertical]
                    .into_iter()
                    .map(move |orientation| Wall {
                        orientation,
                        row,
                        col,
                    })
            })
        })
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wall at ({},{})", self.orientation, self.row, self.col)
    }
}

/// The walls on the board.
///
/// Equality is by content, two sets holding the same walls compare equal no matter what order
/// they were placed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WallSet(BTreeSet<Wall>);

impl WallSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, wall: &Wall) -> bool {
        self.0.contains(wall)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Wall> + '_ {
        self.0.iter()
    }

    /// A copy of this set with `wall` added
    pub fn with(&self, wall: Wall) -> Self {
        let mut walls = self.clone();
        walls.insert(wall);
        walls
    }

    pub(crate) fn insert(&mut self, wall: Wall) -> bool {
        self.0.insert(wall)
    }

    pub(crate) fn remove(&mut self, wall: &Wall) -> bool {
        self.0.remove(wall)
    }

    /// Whether a wall sits on the edge between two orthogonally adjacent cells.
    ///
    /// Both cells must be on the board and adjacent, anything else is a caller bug.
    pub fn blocks(&self, from: Position, to: Position) -> bool {
        debug_assert!(from.is_adjacent(&to), "{from} and {to} are not adjacent");

        let anchored = |orientation, row, col| {
            self.contains(&Wall {
                orientation,
                row,
                col,
            })
        };

        if from.col == to.col {
            let row = from.row.min(to.row);
            anchored(Orientation::Horizontal, row, from.col)
                || from
                    .col
                    .checked_sub(1)
                    .map_or(false, |col| anchored(Orientation::Horizontal, row, col))
        } else {
            let col = from.col.min(to.col);
            anchored(Orientation::Vertical, from.row, col)
                || from
                    .row
                    .checked_sub(1)
                    .map_or(false, |row| anchored(Orientation::Vertical, row, col))
        }
    }
}

impl FromIterator<Wall> for WallSet {
    fn from_iter<T: IntoIterator<Item = Wall>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a WallSet {
    type Item = &'a Wall;
    type IntoIter = std::collections::btree_set::Iter<'a, Wall>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
