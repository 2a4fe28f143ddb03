//! Slide, jump and placement legality, and move generation.
//!
//! A piece may move one square orthogonally onto an empty square (a slide),
//! or hop over an adjacent piece of either colour onto the empty square just
//! beyond it (a jump). Both the square jumped over and the landing square
//! must lie inside the legal area.

use std::fmt;

use crate::board::{Board, Cell, Coord, Direction, Side};
use crate::error::InvalidAction;

/// A movement-phase move of one piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Coord,
    pub to: Coord,
}

impl Move {
    pub const fn new(from: Coord, to: Coord) -> Self {
        Move { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.from, self.to)
    }
}

/// Destination of the piece at `at` moving in `dir`, or `None`.
///
/// A slide onto an empty adjacent square takes precedence; otherwise the
/// piece may jump an adjacent piece if the square beyond is empty. Corner
/// markers can be neither slid onto nor jumped.
pub fn check_move(board: &Board, at: Coord, dir: Direction) -> Option<Coord> {
    let next = at.step(dir, 1)?;
    match board.get_active(next)? {
        Cell::Empty => Some(next),
        Cell::Piece(_) => {
            let landing = at.step(dir, 2)?;
            (board.get_active(landing)? == Cell::Empty).then_some(landing)
        }
        Cell::Corner | Cell::OffBoard => None,
    }
}

#[inline]
pub fn check_up(board: &Board, at: Coord) -> Option<Coord> {
    check_move(board, at, Direction::Up)
}

#[inline]
pub fn check_down(board: &Board, at: Coord) -> Option<Coord> {
    check_move(board, at, Direction::Down)
}

#[inline]
pub fn check_left(board: &Board, at: Coord) -> Option<Coord> {
    check_move(board, at, Direction::Left)
}

#[inline]
pub fn check_right(board: &Board, at: Coord) -> Option<Coord> {
    check_move(board, at, Direction::Right)
}

/// All legal moves for `side`: pieces in column-major order, and for each
/// piece the directions up, down, left, right.
pub fn generate_moves(board: &Board, side: Side) -> Vec<Move> {
    let mut moves = Vec::new();
    for from in board.pieces(side) {
        for dir in Direction::ALL {
            if let Some(to) = check_move(board, from, dir) {
                moves.push(Move::new(from, to));
            }
        }
    }
    moves
}

/// Number of legal moves for `side`, without building the list.
pub fn count_moves(board: &Board, side: Side) -> usize {
    board
        .pieces(side)
        .into_iter()
        .map(|from| {
            Direction::ALL
                .into_iter()
                .filter(|&dir| check_move(board, from, dir).is_some())
                .count()
        })
        .sum()
}

/// Validate a placement of a `side` piece at `at`.
pub fn validate_place(board: &Board, side: Side, at: Coord) -> Result<(), InvalidAction> {
    if !board.in_area(at) {
        return Err(InvalidAction::OffBoard(at));
    }
    let (min_row, max_row) = side.place_rows();
    if !(min_row..=max_row).contains(&at.row) {
        return Err(InvalidAction::OutsideBand { side, row: at.row });
    }
    if board.get(at) != Cell::Empty {
        return Err(InvalidAction::Occupied(at));
    }
    Ok(())
}

/// Validate a slide or jump of the `side` piece at `from` to `to`.
pub fn validate_move(board: &Board, side: Side, from: Coord, to: Coord) -> Result<Move, InvalidAction> {
    if !board.in_area(from) {
        return Err(InvalidAction::OffBoard(from));
    }
    if !board.in_area(to) {
        return Err(InvalidAction::OffBoard(to));
    }
    if board.get(from) != Cell::Piece(side) {
        return Err(InvalidAction::NotOwnPiece { side, at: from });
    }
    if Direction::ALL
        .into_iter()
        .any(|dir| check_move(board, from, dir) == Some(to))
    {
        Ok(Move::new(from, to))
    } else {
        Err(InvalidAction::Unreachable { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(pieces: &[((usize, usize), Side)]) -> Board {
        let mut board = Board::new();
        for &(c, side) in pieces {
            board.set(c.into(), Cell::Piece(side));
        }
        board
    }

    #[test]
    fn test_check_up_slide() {
        let board = board_with(&[((3, 3), Side::White)]);
        assert_eq!(check_up(&board, Coord::new(3, 3)), Some(Coord::new(3, 2)));
    }

    #[test]
    fn test_check_up_jump_over_enemy() {
        let board = board_with(&[((3, 3), Side::White), ((3, 2), Side::Black)]);
        assert_eq!(check_up(&board, Coord::new(3, 3)), Some(Coord::new(3, 1)));
    }

    #[test]
    fn test_check_up_jump_over_own_piece() {
        let board = board_with(&[((3, 3), Side::White), ((3, 2), Side::White)]);
        assert_eq!(check_up(&board, Coord::new(3, 3)), Some(Coord::new(3, 1)));
    }

    #[test]
    fn test_check_up_blocked() {
        let board = board_with(&[
            ((3, 3), Side::White),
            ((3, 2), Side::Black),
            ((3, 1), Side::Black),
        ]);
        assert_eq!(check_up(&board, Coord::new(3, 3)), None);
    }

    #[test]
    fn test_no_move_off_edge() {
        let board = board_with(&[((3, 0), Side::White), ((0, 4), Side::Black)]);
        assert_eq!(check_up(&board, Coord::new(3, 0)), None);
        assert_eq!(check_left(&board, Coord::new(0, 4)), None);
    }

    #[test]
    fn test_jump_needs_landing_square() {
        // Jumping from row 1 over row 0 would leave the board
        let board = board_with(&[((3, 1), Side::White), ((3, 0), Side::Black)]);
        assert_eq!(check_up(&board, Coord::new(3, 1)), None);
    }

    #[test]
    fn test_corner_blocks_slide_and_jump() {
        let board = board_with(&[((1, 0), Side::White), ((0, 1), Side::Black)]);
        assert_eq!(check_left(&board, Coord::new(1, 0)), None);
        assert_eq!(check_up(&board, Coord::new(0, 1)), None);
    }

    #[test]
    fn test_moves_respect_shrunk_area() {
        let mut board = board_with(&[((1, 3), Side::White), ((2, 4), Side::White)]);
        board.shrink();
        // (1, 3) is now on the left edge of the area
        assert_eq!(check_left(&board, Coord::new(1, 3)), None);
        board.set(Coord::new(1, 4), Cell::Piece(Side::Black));
        assert_eq!(check_left(&board, Coord::new(2, 4)), None);
    }

    #[test]
    fn test_generate_moves_order() {
        let board = board_with(&[((3, 3), Side::White), ((3, 2), Side::Black)]);
        let moves = generate_moves(&board, Side::White);
        assert_eq!(
            moves,
            vec![
                Move::new(Coord::new(3, 3), Coord::new(3, 1)),
                Move::new(Coord::new(3, 3), Coord::new(3, 4)),
                Move::new(Coord::new(3, 3), Coord::new(2, 3)),
                Move::new(Coord::new(3, 3), Coord::new(4, 3)),
            ]
        );
        assert_eq!(count_moves(&board, Side::White), 4);
        assert_eq!(count_moves(&board, Side::Black), 4);
    }

    #[test]
    fn test_validate_place() {
        let board = board_with(&[((4, 4), Side::Black)]);
        assert_eq!(validate_place(&board, Side::White, Coord::new(2, 5)), Ok(()));
        assert_eq!(
            validate_place(&board, Side::White, Coord::new(2, 6)),
            Err(InvalidAction::OutsideBand {
                side: Side::White,
                row: 6
            })
        );
        assert_eq!(
            validate_place(&board, Side::Black, Coord::new(2, 1)),
            Err(InvalidAction::OutsideBand {
                side: Side::Black,
                row: 1
            })
        );
        assert_eq!(
            validate_place(&board, Side::White, Coord::new(4, 4)),
            Err(InvalidAction::Occupied(Coord::new(4, 4)))
        );
        assert_eq!(
            validate_place(&board, Side::White, Coord::new(0, 0)),
            Err(InvalidAction::Occupied(Coord::new(0, 0)))
        );
    }

    #[test]
    fn test_validate_move() {
        let board = board_with(&[((3, 3), Side::White), ((3, 2), Side::Black)]);
        let from = Coord::new(3, 3);
        assert!(validate_move(&board, Side::White, from, Coord::new(3, 1)).is_ok());
        assert_eq!(
            validate_move(&board, Side::White, from, Coord::new(3, 2)),
            Err(InvalidAction::Unreachable {
                from,
                to: Coord::new(3, 2)
            })
        );
        assert_eq!(
            validate_move(&board, Side::Black, from, Coord::new(3, 4)),
            Err(InvalidAction::NotOwnPiece {
                side: Side::Black,
                at: from
            })
        );
    }
}
