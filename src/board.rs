//! Board representation: cells, coordinates, the legal area and shrinking.
//!
//! The grid is a fixed `N x N` array indexed as `grid[col][row]`. Cells that
//! fall outside the playable area after a shrink hold [`Cell::OffBoard`], so
//! neighbour lookups never need to special-case the edge of the array beyond
//! a bounds check on the coordinate itself.
//!
//! A [`Board`] is a plain value. It derives `Clone` but not `Copy`: deriving a
//! successor position always goes through an explicit `clone()`, and no two
//! game states ever share a grid.

use std::fmt;
use std::str::FromStr;

use crate::constants::{
    BLACK_PLACE_ROWS, CHAR_BLACK, CHAR_CORNER, CHAR_EMPTY, CHAR_OFF_BOARD, CHAR_WHITE,
    INITIAL_CORNERS, MAX_SHRINKS, N, WHITE_PLACE_ROWS,
};
use crate::error::ParseBoardError;

/// One of the two players.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    White,
    Black,
}

impl Side {
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Inclusive row band this side may place into.
    pub fn place_rows(self) -> (usize, usize) {
        match self {
            Side::White => WHITE_PLACE_ROWS,
            Side::Black => BLACK_PLACE_ROWS,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}

/// Occupancy of a single square.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    /// Permanent marker at a corner of the playable area.
    Corner,
    Piece(Side),
    /// Square removed by a shrink.
    OffBoard,
}

impl Cell {
    #[inline]
    pub fn owner(self) -> Option<Side> {
        match self {
            Cell::Piece(side) => Some(side),
            _ => None,
        }
    }

    #[inline]
    pub fn is_piece(self) -> bool {
        matches!(self, Cell::Piece(_))
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => CHAR_EMPTY,
            Cell::Corner => CHAR_CORNER,
            Cell::Piece(Side::White) => CHAR_WHITE,
            Cell::Piece(Side::Black) => CHAR_BLACK,
            Cell::OffBoard => CHAR_OFF_BOARD,
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            CHAR_EMPTY => Some(Cell::Empty),
            CHAR_CORNER => Some(Cell::Corner),
            CHAR_WHITE => Some(Cell::Piece(Side::White)),
            CHAR_BLACK => Some(Cell::Piece(Side::Black)),
            CHAR_OFF_BOARD => Some(Cell::OffBoard),
            _ => None,
        }
    }
}

/// A square on the board, `(column, row)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub col: usize,
    pub row: usize,
}

impl Coord {
    #[inline]
    pub const fn new(col: usize, row: usize) -> Self {
        Coord { col, row }
    }

    /// Build a coordinate from signed components, rejecting anything off the
    /// 8x8 array.
    pub fn checked(col: i64, row: i64) -> Option<Coord> {
        let valid = 0..N as i64;
        if valid.contains(&col) && valid.contains(&row) {
            Some(Coord::new(col as usize, row as usize))
        } else {
            None
        }
    }

    /// The square `dist` steps away in `dir`, if it is on the array.
    #[inline]
    pub fn step(self, dir: Direction, dist: usize) -> Option<Coord> {
        let (dc, dr) = dir.delta();
        let d = dist as i64;
        Coord::checked(self.col as i64 + dc * d, self.row as i64 + dr * d)
    }

    /// The four orthogonal neighbours (up, down, left, right), skipping any
    /// that fall off the array.
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        Direction::ALL.into_iter().filter_map(move |d| self.step(d, 1))
    }

    #[inline]
    pub fn manhattan(self, other: Coord) -> usize {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }
}

impl From<(usize, usize)> for Coord {
    fn from((col, row): (usize, usize)) -> Self {
        Coord::new(col, row)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Orthogonal directions. Up is towards row 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Enumeration order used by move generation.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(d_col, d_row)` for one step.
    #[inline]
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// The currently playable rectangle and how many times it has shrunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LegalArea {
    pub min_col: usize,
    pub max_col: usize,
    pub min_row: usize,
    pub max_row: usize,
    pub shrinks: usize,
}

impl Default for LegalArea {
    fn default() -> Self {
        Self::new()
    }
}

impl LegalArea {
    /// The full, unshrunk board.
    pub const fn new() -> Self {
        LegalArea {
            min_col: 0,
            max_col: N - 1,
            min_row: 0,
            max_row: N - 1,
            shrinks: 0,
        }
    }

    /// The area after `shrinks` shrink events.
    pub fn with_shrinks(shrinks: usize) -> Self {
        let mut area = Self::new();
        for _ in 0..shrinks.min(MAX_SHRINKS) {
            area.shrink();
        }
        area
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        (self.min_col..=self.max_col).contains(&c.col) && (self.min_row..=self.max_row).contains(&c.row)
    }

    /// Corners in resolution order: top-left, bottom-left, bottom-right,
    /// top-right.
    pub fn corners(&self) -> [Coord; 4] {
        [
            Coord::new(self.min_col, self.min_row),
            Coord::new(self.min_col, self.max_row),
            Coord::new(self.max_col, self.max_row),
            Coord::new(self.max_col, self.min_row),
        ]
    }

    /// Tighten every bound by one. Returns false once fully shrunk.
    fn shrink(&mut self) -> bool {
        if self.shrinks >= MAX_SHRINKS {
            return false;
        }
        self.min_col += 1;
        self.max_col -= 1;
        self.min_row += 1;
        self.max_row -= 1;
        self.shrinks += 1;
        true
    }
}

/// Grid plus legal area. This is the whole physical state of a game.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    grid: [[Cell; N]; N],
    area: LegalArea,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board with the four initial corner markers.
    pub fn new() -> Self {
        let mut board = Board {
            grid: [[Cell::Empty; N]; N],
            area: LegalArea::new(),
        };
        for (col, row) in INITIAL_CORNERS {
            board.grid[col][row] = Cell::Corner;
        }
        board
    }

    #[inline]
    pub fn get(&self, c: Coord) -> Cell {
        self.grid[c.col][c.row]
    }

    #[inline]
    pub fn set(&mut self, c: Coord, cell: Cell) {
        self.grid[c.col][c.row] = cell;
    }

    #[inline]
    pub fn area(&self) -> &LegalArea {
        &self.area
    }

    #[inline]
    pub fn in_area(&self, c: Coord) -> bool {
        self.area.contains(c)
    }

    /// Cell at `c` if it is inside the playable area.
    #[inline]
    pub fn get_active(&self, c: Coord) -> Option<Cell> {
        self.in_area(c).then(|| self.get(c))
    }

    /// Every square inside the playable area, column by column.
    pub fn active_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        let a = self.area;
        (a.min_col..=a.max_col).flat_map(move |col| (a.min_row..=a.max_row).map(move |row| Coord::new(col, row)))
    }

    /// Squares holding a piece of `side`, column by column.
    pub fn pieces(&self, side: Side) -> Vec<Coord> {
        self.active_cells()
            .filter(|&c| self.get(c) == Cell::Piece(side))
            .collect()
    }

    pub fn count(&self, side: Side) -> usize {
        self.active_cells()
            .filter(|&c| self.get(c) == Cell::Piece(side))
            .count()
    }

    pub fn has_empty_cell(&self) -> bool {
        self.active_cells().any(|c| self.get(c) == Cell::Empty)
    }

    /// Shrink the playable area by one ring.
    ///
    /// The vacated ring becomes [`Cell::OffBoard`] (removing any piece on it)
    /// and corner markers are written at the new corners, removing any piece
    /// standing there. Returns the new corners in resolution order, or `None`
    /// if the board has already shrunk the maximum number of times.
    ///
    /// This does not resolve eliminations caused by the new corners; see
    /// [`crate::elimination::resolve_corners`].
    pub fn shrink(&mut self) -> Option<[Coord; 4]> {
        if !self.area.shrink() {
            return None;
        }
        for col in 0..N {
            for row in 0..N {
                let c = Coord::new(col, row);
                if !self.area.contains(c) {
                    if self.get(c).is_piece() {
                        log::trace!("shrink removes {:?} at {c}", self.get(c));
                    }
                    self.set(c, Cell::OffBoard);
                }
            }
        }
        let corners = self.area.corners();
        for c in corners {
            if self.get(c).is_piece() {
                log::trace!("new corner crushes {:?} at {c}", self.get(c));
            }
            self.set(c, Cell::Corner);
        }
        Some(corners)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for col in 0..N {
            write!(f, " {col}")?;
        }
        writeln!(f)?;
        for row in 0..N {
            write!(f, "{row}")?;
            for col in 0..N {
                write!(f, " {}", self.grid[col][row].to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parse the textual form produced by `Display`. The coordinate header
    /// and the leading row numbers are optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows: Vec<Vec<&str>> = s
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>())
            .filter(|tokens| !tokens.is_empty())
            .collect();

        // Header: all tokens are column numbers
        if rows
            .first()
            .is_some_and(|t| t.iter().all(|tok| tok.chars().all(|c| c.is_ascii_digit())))
        {
            rows.remove(0);
        }
        if rows.len() != N {
            return Err(ParseBoardError::RowCount {
                expected: N,
                found: rows.len(),
            });
        }

        let mut grid = [[Cell::Empty; N]; N];
        for (row, tokens) in rows.iter().enumerate() {
            let cells = if tokens.len() == N + 1 {
                if tokens[0] != row.to_string() {
                    return Err(ParseBoardError::RowLabel {
                        row,
                        found: tokens[0].to_string(),
                    });
                }
                &tokens[1..]
            } else {
                &tokens[..]
            };
            if cells.len() != N {
                return Err(ParseBoardError::CellCount {
                    row,
                    expected: N,
                    found: cells.len(),
                });
            }
            for (col, tok) in cells.iter().enumerate() {
                let mut chars = tok.chars();
                let cell = match (chars.next(), chars.next()) {
                    (Some(ch), None) => Cell::from_char(ch),
                    _ => None,
                };
                grid[col][row] = cell.ok_or_else(|| ParseBoardError::UnknownCell {
                    row,
                    cell: tok.to_string(),
                })?;
            }
        }

        // Each shrink vacates one whole ring, outermost first
        let ring = |col: usize, row: usize| col.min(row).min(N - 1 - col).min(N - 1 - row);
        let shrinks = (0..MAX_SHRINKS)
            .take_while(|&k| {
                (0..N).all(|col| (0..N).all(|row| ring(col, row) != k || grid[col][row] == Cell::OffBoard))
            })
            .count();

        let area = LegalArea::with_shrinks(shrinks);
        for col in 0..N {
            for row in 0..N {
                if area.contains(Coord::new(col, row)) && grid[col][row] == Cell::OffBoard {
                    return Err(ParseBoardError::StrayOffBoard { col, row });
                }
            }
        }

        Ok(Board { grid, area })
    }
}
