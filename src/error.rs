//! Error types for the rule engine.
//!
//! - [`InvalidAction`]: an external move description that is malformed or
//!   illegal in the current position. Callers are expected to recover.
//! - [`GameError`]: everything `GameState::apply` and friends can report,
//!   including the contract violation of applying an action that is not in
//!   the legal set.
//! - [`ParseBoardError`]: the textual board form could not be read.

use thiserror::Error;

use crate::action::Action;
use crate::board::{Coord, Side};
use crate::game::Phase;

/// A raw action that cannot be turned into a legal [`Action`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAction {
    #[error("malformed action description: {0:?}")]
    Malformed(String),

    #[error("({col}, {row}) is not a board coordinate")]
    OutOfRange { col: i64, row: i64 },

    #[error("{0} is outside the playable area")]
    OffBoard(Coord),

    #[error("{0} is not empty")]
    Occupied(Coord),

    #[error("{side} may not place on row {row}")]
    OutsideBand { side: Side, row: usize },

    #[error("no {side} piece at {at}")]
    NotOwnPiece { side: Side, at: Coord },

    #[error("{from} cannot slide or jump to {to}")]
    Unreachable { from: Coord, to: Coord },

    #[error("{action} is not allowed during the {phase} phase")]
    WrongPhase { action: Action, phase: Phase },
}

/// Errors raised by game state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    InvalidAction(#[from] InvalidAction),

    /// The action was never offered by `legal_actions`. This is a bug in the
    /// caller, not a recoverable input problem.
    #[error("illegal move attempt: {action} is not a legal action for {side}")]
    IllegalMoveAttempt { action: Action, side: Side },
}

/// Errors from parsing the textual board form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseBoardError {
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error("row {row}: expected {expected} cells, found {found}")]
    CellCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: unknown cell {cell:?}")]
    UnknownCell { row: usize, cell: String },

    #[error("row {row}: expected row label {row}, found {found:?}")]
    RowLabel { row: usize, found: String },

    #[error("({col}, {row}) is off the board but its ring has not shrunk")]
    StrayOffBoard { col: usize, row: usize },
}
