//! Integration tests for search and bounded tree exploration.

use proptest::prelude::*;

use watch_your_back::action::Action;
use watch_your_back::board::{Board, Cell, Coord, Side};
use watch_your_back::evaluation::{EvalWeights, evaluate};
use watch_your_back::game::{GameState, Phase};
use watch_your_back::moves::Move;
use watch_your_back::search::{SearchLimits, alphabeta_search, fallback_action, minimax_search};
use watch_your_back::tree::{BoardTree, tree_search};

// =============================================================================
// Helper functions
// =============================================================================

fn moving_state(white: &[(usize, usize)], black: &[(usize, usize)], to_move: Side) -> GameState {
    let mut board = Board::new();
    for &c in white {
        board.set(c.into(), Cell::Piece(Side::White));
    }
    for &c in black {
        board.set(c.into(), Cell::Piece(Side::Black));
    }
    GameState::from_board(board, to_move, Phase::Moving, 0)
}

/// Seeded random play, as a source of varied positions.
fn random_state(seed: u64, plies: usize) -> GameState {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut state = GameState::new();
    for _ in 0..plies {
        if state.is_terminal() {
            break;
        }
        let action = fallback_action(&state, &mut rng);
        state = state.apply(&action).unwrap();
    }
    state
}

// =============================================================================
// Alpha-beta and minimax
// =============================================================================

#[test]
fn test_black_takes_capture_too() {
    // Black slides (7, 4) -> (7, 5) and takes White at (7, 6) against the
    // (7, 7) corner
    let state = moving_state(&[(7, 6), (2, 2)], &[(7, 4), (4, 4)], Side::Black);
    let capture = Action::Move(Move::new(Coord::new(7, 4), Coord::new(7, 5)));
    let result = alphabeta_search(&state, 1, &EvalWeights::default(), &SearchLimits::default());
    assert_eq!(result.action, Some(capture));
    assert_eq!(minimax_search(&state, 1, &EvalWeights::default()).action, Some(capture));
}

#[test]
fn test_avoids_walking_into_capture() {
    // Sliding up to (3, 2) lands between Black at (2, 2) and (4, 2)
    let state = moving_state(&[(3, 3)], &[(3, 1), (2, 2), (4, 2)], Side::White);
    let suicide = Action::Move(Move::new(Coord::new(3, 3), Coord::new(3, 2)));
    let result = alphabeta_search(&state, 1, &EvalWeights::default(), &SearchLimits::default());
    assert_ne!(result.action, Some(suicide));
    assert!(result.action.is_some());
}

#[test]
fn test_search_leaves_state_untouched() {
    let state = random_state(11, 30);
    let before = state.clone();
    alphabeta_search(&state, 2, &EvalWeights::default(), &SearchLimits::default());
    tree_search(&state, 2, 4, &EvalWeights::default(), &SearchLimits::default());
    assert_eq!(state, before);
}

#[test]
fn test_chosen_action_is_legal() {
    for seed in 0..5 {
        let state = random_state(seed, 30);
        if state.is_terminal() {
            continue;
        }
        let result = alphabeta_search(&state, 2, &EvalWeights::default(), &SearchLimits::default());
        let action = result.action_or_forfeit();
        assert!(state.apply(&action).is_ok(), "seed {seed}: {action}");
    }
}

#[test]
fn test_ties_keep_first_action() {
    // With zero weights every leaf scores 0, so nothing beats the first action
    let state = moving_state(&[(3, 3)], &[(5, 5)], Side::White);
    let weights = EvalWeights {
        alpha: 0.0,
        beta: 0.0,
        gamma: 0.0,
    };
    let first = Some(state.legal_actions()[0]);

    let ab = alphabeta_search(&state, 2, &weights, &SearchLimits::unlimited());
    assert_eq!(ab.action, first);
    assert_eq!(ab.value, 0.0);
    assert_eq!(minimax_search(&state, 2, &weights).action, first);
    assert_eq!(tree_search(&state, 2, 4, &weights, &SearchLimits::default()).action, first);
}

// =============================================================================
// Tree exploration
// =============================================================================

#[test]
fn test_tree_best_leaf_matches_result() {
    let state = random_state(3, 26);
    let weights = EvalWeights::default();
    let tree = BoardTree::build(state.clone(), 2, 4, &SearchLimits::default());
    assert!(!state.is_terminal());
    let (leaf, value) = tree.best_leaf(&weights).unwrap();

    assert_eq!(evaluate(tree.node(leaf).state.board(), state.to_move(), &weights), value);
    for &other in tree.leaves() {
        assert!(evaluate(tree.node(other).state.board(), state.to_move(), &weights) <= value);
    }

    let result = tree_search(&state, 2, 4, &weights, &SearchLimits::default());
    assert_eq!(result.action, tree.first_action(leaf));
    assert_eq!(result.value, value);
    assert_eq!(result.stats.nodes, tree.len());
}

#[test]
fn test_tree_paths_start_at_root() {
    let state = random_state(5, 30);
    let tree = BoardTree::build(state.clone(), 2, 3, &SearchLimits::default());
    for &leaf in tree.leaves() {
        if leaf == BoardTree::ROOT {
            continue;
        }
        let path = tree.path(leaf);
        assert_eq!(path[0], BoardTree::ROOT);
        for pair in path.windows(2) {
            assert_eq!(tree.node(pair[1]).parent, Some(pair[0]));
            assert_eq!(tree.node(pair[1]).depth, tree.node(pair[0]).depth + 1);
        }
        let first = tree.first_action(leaf).unwrap();
        assert!(state.legal_actions().iter().take(3).any(|&a| a == first));
    }
}

#[test]
fn test_tree_has_no_duplicate_boards() {
    let state = random_state(9, 40);
    let tree = BoardTree::build(state, 3, 6, &SearchLimits::default());
    let mut seen = std::collections::HashSet::new();
    for id in 0..tree.len() {
        assert!(seen.insert(tree.node(id).state.board().clone()), "node {id} repeats a board");
    }
}

// =============================================================================
// Property tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Pruning changes the work done, never the answer.
    #[test]
    fn prop_alphabeta_matches_minimax(seed in any::<u64>(), plies in 0usize..50, depth in 1usize..3) {
        let state = random_state(seed, plies);
        let weights = EvalWeights::default();
        let ab = alphabeta_search(&state, depth, &weights, &SearchLimits::unlimited());
        let mm = minimax_search(&state, depth, &weights);
        prop_assert_eq!(ab.action, mm.action);
        prop_assert_eq!(ab.value, mm.value);
        prop_assert!(ab.stats.nodes <= mm.stats.nodes);
    }

    /// Any weights, same agreement.
    #[test]
    fn prop_alphabeta_matches_minimax_weights(
        seed in any::<u64>(),
        plies in 24usize..50,
        alpha in -5.0f64..5.0,
        beta in -5.0f64..5.0,
        gamma in -5.0f64..5.0,
    ) {
        let state = random_state(seed, plies);
        let weights = EvalWeights { alpha, beta, gamma };
        let ab = alphabeta_search(&state, 2, &weights, &SearchLimits::unlimited());
        let mm = minimax_search(&state, 2, &weights);
        prop_assert_eq!(ab.action, mm.action);
        prop_assert_eq!(ab.value, mm.value);
    }
}
