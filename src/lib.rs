//! Watch Your Back!: rule engine and adversarial search.
//!
//! This crate implements the rules of Watch Your Back!, a two-player game on
//! an 8x8 board that shrinks twice during play, where pieces are taken by
//! custodian capture. On top of the rules it provides an evaluation function
//! and depth-limited search to pick moves.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions, rule schedule and search defaults
//! - [`board`] - Cells, coordinates, the shrinking legal area and the grid
//! - [`moves`] - Slide/jump legality and move generation
//! - [`elimination`] - Custodian capture after moves and shrinks
//! - [`action`] - Validated actions and their tuple encoding
//! - [`game`] - Immutable game states and transitions
//! - [`evaluation`] - Heuristic scoring of positions
//! - [`search`] - Alpha-beta and minimax with a depth cutoff
//! - [`tree`] - Bounded depth/breadth tree exploration
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use watch_your_back::action::RawAction;
//! use watch_your_back::evaluation::EvalWeights;
//! use watch_your_back::game::GameState;
//! use watch_your_back::search::{SearchLimits, alphabeta_search};
//!
//! // White places a piece at column 3, row 4
//! let state = GameState::new();
//! let state = state.play(Some(RawAction::Single((3, 4)))).unwrap();
//!
//! // Let the engine answer for Black
//! let result = alphabeta_search(&state, 1, &EvalWeights::default(), &SearchLimits::default());
//! println!("Black plays {}", result.action_or_forfeit());
//! ```

pub mod action;
pub mod board;
pub mod constants;
pub mod elimination;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod moves;
pub mod search;
pub mod tree;
