//! Heuristic position evaluation.
//!
//! The score for a side is a weighted sum of three features:
//!
//! 1. piece difference (own minus enemy),
//! 2. the number of own pieces already standing on a goal tile,
//! 3. the inverse of the summed distance from every other own piece to its
//!    nearest goal tile.
//!
//! A goal tile is a square next to an enemy piece from which that piece can
//! be attacked: the square across the enemy on the same axis is not another
//! enemy (so it is empty, friendly or a corner), and a piece arriving on the
//! goal tile would survive.

use crate::board::{Board, Cell, Coord, Direction, Side};
use crate::constants::{EVAL_ALPHA, EVAL_BETA, EVAL_GAMMA};
use crate::elimination::is_suicide;

/// Feature weights for [`evaluate`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EvalWeights {
    /// Piece difference.
    pub alpha: f64,
    /// Pieces on goal tiles.
    pub beta: f64,
    /// Inverse distance to goal tiles.
    pub gamma: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        EvalWeights {
            alpha: EVAL_ALPHA,
            beta: EVAL_BETA,
            gamma: EVAL_GAMMA,
        }
    }
}

/// Squares from which `side` threatens an enemy piece.
///
/// Enemies on the edge of the legal area along an axis are skipped for that
/// axis, since they cannot be flanked across it. Duplicates are removed;
/// order follows the enemy pieces in column-major order.
pub fn find_goal_tiles(board: &Board, side: Side) -> Vec<Coord> {
    let enemy = Cell::Piece(side.opponent());
    let mut goals = Vec::new();

    for target in board.pieces(side.opponent()) {
        for (a, b) in [(Direction::Up, Direction::Down), (Direction::Left, Direction::Right)] {
            let (Some(p), Some(q)) = (target.step(a, 1), target.step(b, 1)) else {
                continue;
            };
            if !board.in_area(p) || !board.in_area(q) {
                continue;
            }
            for (tile, across) in [(p, q), (q, p)] {
                let standable = matches!(board.get(tile), Cell::Empty) || board.get(tile).owner() == Some(side);
                if standable
                    && board.get(across) != enemy
                    && !goals.contains(&tile)
                    && !is_suicide(board, tile, side)
                {
                    goals.push(tile);
                }
            }
        }
    }
    goals
}

/// `1 / sum` of the distances from each piece not on a goal to its nearest
/// goal; 0 when there are no goals or nothing left to move.
fn inverse_distance(pieces: &[Coord], goals: &[Coord]) -> f64 {
    if goals.is_empty() {
        return 0.0;
    }
    let total: usize = pieces
        .iter()
        .filter(|p| !goals.contains(p))
        .filter_map(|&p| goals.iter().map(|&g| p.manhattan(g)).min())
        .sum();
    if total == 0 { 0.0 } else { 1.0 / total as f64 }
}

/// Evaluate `board` from `side`'s point of view.
pub fn evaluate(board: &Board, side: Side, weights: &EvalWeights) -> f64 {
    let own = board.pieces(side);
    let diff = own.len() as f64 - board.count(side.opponent()) as f64;

    let goals = find_goal_tiles(board, side);
    let on_goal = own.iter().filter(|p| goals.contains(p)).count() as f64;
    let dist = inverse_distance(&own, &goals);

    weights.alpha * diff + weights.beta * on_goal + weights.gamma * dist
}
