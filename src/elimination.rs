//! Custodian capture.
//!
//! A piece is eliminated when, on either axis, both neighbours are an enemy
//! piece or a corner marker and at least one of the two is an enemy piece.
//! Corners flank for both sides, but two corners alone never capture. A
//! neighbour outside the legal area is never a flanker, so a piece on the
//! edge of the area can only be taken along the edge.
//!
//! Elimination is local: only the neighbourhood of the square that just
//! changed is examined. After a piece arrives, enemies around it are removed
//! first and only then is the arriving piece itself checked, so moving into
//! a flanked square is safe if it captures one of the flankers.
//!
//! Removing a piece can never complete a flank, so resolving the trigger
//! neighbourhoods is enough; nothing further cascades.

use crate::board::{Board, Cell, Coord, Direction, Side};

/// The two axes as pairs of opposite directions.
const AXES: [(Direction, Direction); 2] = [
    (Direction::Up, Direction::Down),
    (Direction::Left, Direction::Right),
];

#[derive(Copy, Clone, PartialEq, Eq)]
enum Flank {
    Enemy,
    Corner,
}

fn flank(board: &Board, c: Option<Coord>, side: Side) -> Option<Flank> {
    match board.get_active(c?)? {
        Cell::Piece(owner) if owner != side => Some(Flank::Enemy),
        Cell::Corner => Some(Flank::Corner),
        _ => None,
    }
}

/// Would a piece of `side` at `at` be flanked as the board stands?
///
/// Only the neighbours are inspected; the square itself may hold anything.
pub fn is_flanked(board: &Board, at: Coord, side: Side) -> bool {
    AXES.iter().any(|&(a, b)| {
        match (flank(board, at.step(a, 1), side), flank(board, at.step(b, 1), side)) {
            (Some(x), Some(y)) => x == Flank::Enemy || y == Flank::Enemy,
            _ => false,
        }
    })
}

/// Would a `side` piece arriving at `at` be eliminated, after it has taken
/// whatever it captures?
pub fn is_suicide(board: &Board, at: Coord, side: Side) -> bool {
    if !board.in_area(at) {
        return true;
    }
    let mut scratch = board.clone();
    scratch.set(at, Cell::Piece(side));
    resolve_action(&mut scratch, at);
    scratch.get(at) != Cell::Piece(side)
}

/// Resolve eliminations after a piece arrived at `at` (by placement or move).
///
/// Returns the captured squares, enemies first, then `at` itself if the
/// arriving piece was taken. Does nothing if `at` holds no piece.
pub fn resolve_action(board: &mut Board, at: Coord) -> Vec<Coord> {
    let Some(mover) = board.get(at).owner() else {
        return Vec::new();
    };
    let enemy = mover.opponent();

    let mut captured: Vec<Coord> = at
        .neighbors()
        .filter(|&n| board.get_active(n) == Some(Cell::Piece(enemy)) && is_flanked(board, n, enemy))
        .collect();
    for &c in &captured {
        board.set(c, Cell::Empty);
    }

    if is_flanked(board, at, mover) {
        board.set(at, Cell::Empty);
        captured.push(at);
    }

    if !captured.is_empty() {
        log::trace!("{mover} at {at} resolves captures {captured:?}");
    }
    captured
}

/// Resolve eliminations caused by freshly placed corner markers, in the
/// order given.
pub fn resolve_corners(board: &mut Board, corners: &[Coord]) -> Vec<Coord> {
    let mut captured = Vec::new();
    for &corner in corners {
        for n in corner.neighbors() {
            let Some(Cell::Piece(side)) = board.get_active(n) else {
                continue;
            };
            if is_flanked(board, n, side) {
                board.set(n, Cell::Empty);
                captured.push(n);
            }
        }
    }
    if !captured.is_empty() {
        log::trace!("corners {corners:?} capture {captured:?}");
    }
    captured
}
