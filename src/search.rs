//! Depth-limited adversarial search.
//!
//! This module implements:
//! - Alpha-beta search with a depth cutoff
//! - Plain minimax, the unpruned reference that alpha-beta must agree with
//! - A node/time budget that turns unexpanded nodes into leaves
//! - A seeded random fallback for when search has nothing to say
//!
//! Both searches maximise for the side to move at the root. Every leaf is
//! scored with [`evaluate`] from that side's point of view, so inner nodes
//! maximise on the root side's turns and minimise on the opponent's. Actions
//! are tried in enumeration order and the root keeps the first action with a
//! strictly better value, which makes the choice deterministic.

use std::time::{Duration, Instant};

use crate::action::Action;
use crate::board::Side;
use crate::constants::MAX_NODES;
use crate::evaluation::{EvalWeights, evaluate};
use crate::game::GameState;

/// Budget for one search call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchLimits {
    /// Nodes visited before the search stops expanding.
    pub max_nodes: usize,
    /// Wall-clock cutoff; `None` means no time limit.
    pub deadline: Option<Instant>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            max_nodes: MAX_NODES,
            deadline: None,
        }
    }
}

impl SearchLimits {
    /// No budget at all: only the depth bounds the search.
    pub fn unlimited() -> Self {
        SearchLimits {
            max_nodes: usize::MAX,
            deadline: None,
        }
    }

    /// The same node budget with a deadline `time` from now.
    pub fn with_time(self, time: Duration) -> Self {
        SearchLimits {
            deadline: Some(Instant::now() + time),
            ..self
        }
    }

    /// Has a search that visited `nodes` nodes run out of budget?
    pub fn exhausted(&self, nodes: usize) -> bool {
        nodes >= self.max_nodes || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Counters collected during one search call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States visited, root included.
    pub nodes: usize,
    /// States scored with the evaluation function.
    pub leaves: usize,
    /// Branches abandoned by alpha-beta pruning.
    pub cutoffs: usize,
    /// True if the budget ran out and some nodes were scored early.
    pub truncated: bool,
}

/// Outcome of a search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// Chosen root action; `None` when the root was not expanded.
    pub action: Option<Action>,
    /// Backed-up value of the chosen action for the root side.
    pub value: f64,
    pub stats: SearchStats,
}

impl SearchResult {
    /// The chosen action, or a forfeit when there is none.
    pub fn action_or_forfeit(&self) -> Action {
        self.action.unwrap_or(Action::Forfeit)
    }
}

struct Searcher<'a> {
    root_side: Side,
    weights: &'a EvalWeights,
    limits: &'a SearchLimits,
    prune: bool,
    stats: SearchStats,
}

impl Searcher<'_> {
    fn leaf(&mut self, state: &GameState) -> f64 {
        self.stats.leaves += 1;
        evaluate(state.board(), self.root_side, self.weights)
    }

    fn value(&mut self, state: &GameState, depth: usize, mut alpha: f64, mut beta: f64) -> f64 {
        self.stats.nodes += 1;
        if depth == 0 || state.is_terminal() {
            return self.leaf(state);
        }
        if self.limits.exhausted(self.stats.nodes) {
            self.stats.truncated = true;
            return self.leaf(state);
        }

        let maximizing = state.to_move() == self.root_side;
        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        for action in state.legal_actions() {
            let child = state.successor(action);
            let v = self.value(&child, depth - 1, alpha, beta);
            if maximizing {
                best = best.max(v);
                if self.prune {
                    if best >= beta {
                        self.stats.cutoffs += 1;
                        break;
                    }
                    alpha = alpha.max(best);
                }
            } else {
                best = best.min(v);
                if self.prune {
                    if best <= alpha {
                        self.stats.cutoffs += 1;
                        break;
                    }
                    beta = beta.min(best);
                }
            }
        }
        best
    }
}

fn search(state: &GameState, depth: usize, weights: &EvalWeights, limits: &SearchLimits, prune: bool) -> SearchResult {
    let mut searcher = Searcher {
        root_side: state.to_move(),
        weights,
        limits,
        prune,
        stats: SearchStats::default(),
    };
    searcher.stats.nodes = 1;

    if depth == 0 || state.is_terminal() {
        let value = searcher.leaf(state);
        return SearchResult {
            action: None,
            value,
            stats: searcher.stats,
        };
    }

    let mut best_action = None;
    let mut best_value = f64::NEG_INFINITY;
    for action in state.legal_actions() {
        let child = state.successor(action);
        let v = searcher.value(&child, depth - 1, best_value, f64::INFINITY);
        if v > best_value {
            best_value = v;
            best_action = Some(*action);
        }
    }

    let stats = searcher.stats;
    log::debug!(
        "{} depth {depth}: {} nodes, {} leaves, {} cutoffs{}, chose {} ({best_value:.3})",
        if prune { "alphabeta" } else { "minimax" },
        stats.nodes,
        stats.leaves,
        stats.cutoffs,
        if stats.truncated { ", truncated" } else { "" },
        best_action.unwrap_or(Action::Forfeit),
    );

    SearchResult {
        action: best_action,
        value: best_value,
        stats,
    }
}

/// Alpha-beta search to `depth` plies below `state`.
///
/// Depth 0 or a terminal root returns no action and the root's own
/// evaluation.
pub fn alphabeta_search(
    state: &GameState,
    depth: usize,
    weights: &EvalWeights,
    limits: &SearchLimits,
) -> SearchResult {
    search(state, depth, weights, limits, true)
}

/// Minimax without pruning or budget. Slow; meant as a reference.
pub fn minimax_search(state: &GameState, depth: usize, weights: &EvalWeights) -> SearchResult {
    search(state, depth, weights, &SearchLimits::unlimited(), false)
}

/// A uniformly random legal action, or a forfeit if there is none.
pub fn fallback_action(state: &GameState, rng: &mut fastrand::Rng) -> Action {
    let actions = state.legal_actions();
    if actions.is_empty() {
        Action::Forfeit
    } else {
        actions[rng.usize(..actions.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Cell, Coord};
    use crate::game::Phase;
    use crate::moves::Move;

    fn moving_state(pieces: &[((usize, usize), Side)], to_move: Side) -> GameState {
        let mut board = Board::new();
        for &(c, side) in pieces {
            board.set(c.into(), Cell::Piece(side));
        }
        GameState::from_board(board, to_move, Phase::Moving, 0)
    }

    #[test]
    fn test_depth_zero_returns_no_action() {
        let state = GameState::new();
        let result = alphabeta_search(&state, 0, &EvalWeights::default(), &SearchLimits::default());
        assert_eq!(result.action, None);
        assert_eq!(result.action_or_forfeit(), Action::Forfeit);
        assert_eq!(result.stats.nodes, 1);
        assert_eq!(result.stats.leaves, 1);
    }

    #[test]
    fn test_terminal_root_returns_no_action() {
        let state = moving_state(&[((3, 3), Side::White)], Side::White);
        assert!(state.is_terminal());
        let result = alphabeta_search(&state, 3, &EvalWeights::default(), &SearchLimits::default());
        assert_eq!(result.action, None);
    }

    #[test]
    fn test_finds_corner_capture() {
        let state = moving_state(&[((1, 0), Side::Black), ((3, 0), Side::White)], Side::White);
        let capture = Action::Move(Move::new(Coord::new(3, 0), Coord::new(2, 0)));
        for depth in 1..=2 {
            let ab = alphabeta_search(&state, depth, &EvalWeights::default(), &SearchLimits::default());
            assert_eq!(ab.action, Some(capture), "depth {depth}");
            let mm = minimax_search(&state, depth, &EvalWeights::default());
            assert_eq!(mm.action, ab.action);
            assert_eq!(mm.value, ab.value);
        }
    }

    #[test]
    fn test_stuck_root_chooses_forfeit() {
        let text = "\
X O O @ @ - - X
- @ @ - - - - -
- @ @ - - - - -
- - - - - - - -
- - - - - - - -
- - - - - - - -
- - - - - - - -
X - - - - - - X";
        let board: Board = text.parse().unwrap();
        let state = GameState::from_board(board, Side::White, Phase::Moving, 0);
        let result = alphabeta_search(&state, 2, &EvalWeights::default(), &SearchLimits::default());
        assert_eq!(result.action, Some(Action::Forfeit));
    }

    #[test]
    fn test_pruning_agrees_with_minimax() {
        let state = GameState::new();
        let weights = EvalWeights::default();
        let ab = alphabeta_search(&state, 2, &weights, &SearchLimits::unlimited());
        let mm = minimax_search(&state, 2, &weights);
        assert_eq!(ab.action, mm.action);
        assert_eq!(ab.value, mm.value);
        assert!(ab.stats.nodes <= mm.stats.nodes);
        assert_eq!(mm.stats.cutoffs, 0);
        assert!(!ab.stats.truncated);
    }

    #[test]
    fn test_node_budget_truncates() {
        let state = GameState::new();
        let limits = SearchLimits {
            max_nodes: 1,
            deadline: None,
        };
        let result = alphabeta_search(&state, 3, &EvalWeights::default(), &limits);
        assert!(result.stats.truncated);
        assert!(result.action.is_some());
        // Root plus one scored child per root action
        assert_eq!(result.stats.nodes, 1 + state.legal_actions().len());
    }

    #[test]
    fn test_expired_deadline_truncates() {
        let state = GameState::new();
        let limits = SearchLimits::unlimited().with_time(Duration::ZERO);
        let result = alphabeta_search(&state, 2, &EvalWeights::default(), &limits);
        assert!(result.stats.truncated);
        assert!(result.action.is_some());
    }

    #[test]
    fn test_fallback_action_is_legal() {
        let state = GameState::new();
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..20 {
            let action = fallback_action(&state, &mut rng);
            assert!(state.legal_actions().contains(&action));
        }

        let terminal = moving_state(&[((3, 3), Side::White)], Side::Black);
        assert_eq!(fallback_action(&terminal, &mut rng), Action::Forfeit);
    }
}
