//! Actions and their external encoding.
//!
//! Outside the engine a turn is described by its shape: a single coordinate
//! `(col, row)` places a piece, a pair `((col, row), (col, row))` moves one,
//! and no value at all forfeits the turn. [`Action::build`] is the only
//! factory that turns such a description into an [`Action`], validating it
//! against the board on the way.

use std::fmt;
use std::str::FromStr;

use crate::board::{Board, Coord, Side};
use crate::error::InvalidAction;
use crate::moves::{Move, validate_move, validate_place};

/// Raw coordinate as received from outside; may be out of range.
pub type RawCoord = (i64, i64);

/// An unvalidated action description. Forfeit is the absence of one, so it
/// appears as `None` wherever an `Option<RawAction>` is expected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RawAction {
    Single(RawCoord),
    Pair(RawCoord, RawCoord),
}

/// A validated turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Place(Coord),
    Move(Move),
    Forfeit,
}

fn coord(raw: RawCoord) -> Result<Coord, InvalidAction> {
    Coord::checked(raw.0, raw.1).ok_or(InvalidAction::OutOfRange {
        col: raw.0,
        row: raw.1,
    })
}

impl Action {
    /// Validate an external description for `side` on `board`.
    ///
    /// A single coordinate must be a legal placement, a pair must be a legal
    /// slide or jump of one of `side`'s pieces, and `None` is a forfeit.
    /// Turn order and game phase are not checked here; see
    /// [`crate::game::GameState::play`].
    pub fn build(board: &Board, side: Side, raw: Option<RawAction>) -> Result<Action, InvalidAction> {
        match raw {
            None => Ok(Action::Forfeit),
            Some(RawAction::Single(at)) => {
                let at = coord(at)?;
                validate_place(board, side, at)?;
                Ok(Action::Place(at))
            }
            Some(RawAction::Pair(from, to)) => {
                let mv = validate_move(board, side, coord(from)?, coord(to)?)?;
                Ok(Action::Move(mv))
            }
        }
    }

    /// Validate the textual form (see [`parse_raw`]).
    pub fn parse(board: &Board, side: Side, text: &str) -> Result<Action, InvalidAction> {
        Self::build(board, side, parse_raw(text)?)
    }

    /// The external description of this action.
    pub fn to_raw(&self) -> Option<RawAction> {
        let raw = |c: Coord| (c.col as i64, c.row as i64);
        match *self {
            Action::Place(at) => Some(RawAction::Single(raw(at))),
            Action::Move(mv) => Some(RawAction::Pair(raw(mv.from), raw(mv.to))),
            Action::Forfeit => None,
        }
    }

    /// The square a piece arrives on, if any.
    pub fn destination(&self) -> Option<Coord> {
        match *self {
            Action::Place(at) => Some(at),
            Action::Move(mv) => Some(mv.to),
            Action::Forfeit => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Place(at) => write!(f, "{at}"),
            Action::Move(mv) => write!(f, "{mv}"),
            Action::Forfeit => write!(f, "None"),
        }
    }
}

/// Parse the tuple notation: `(3, 4)`, `((3, 4), (3, 5))`, or `None` / an
/// empty string for a forfeit. Whitespace is ignored.
pub fn parse_raw(text: &str) -> Result<Option<RawAction>, InvalidAction> {
    let s: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if s.is_empty() || s == "None" {
        return Ok(None);
    }
    let malformed = || InvalidAction::Malformed(text.trim().to_string());

    let inner = s
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(malformed)?;

    if inner.starts_with('(') {
        let (first, second) = inner.split_once("),(").ok_or_else(malformed)?;
        let first = first.strip_prefix('(').ok_or_else(malformed)?;
        let second = second.strip_suffix(')').ok_or_else(malformed)?;
        let from = parse_pair(first).ok_or_else(malformed)?;
        let to = parse_pair(second).ok_or_else(malformed)?;
        Ok(Some(RawAction::Pair(from, to)))
    } else {
        let at = parse_pair(inner).ok_or_else(malformed)?;
        Ok(Some(RawAction::Single(at)))
    }
}

fn parse_pair(s: &str) -> Option<RawCoord> {
    let (a, b) = s.split_once(',')?;
    Some((a.parse().ok()?, b.parse().ok()?))
}

impl FromStr for RawAction {
    type Err = InvalidAction;

    /// Parse a placement or move. Forfeits have no `RawAction`; use
    /// [`parse_raw`] to accept them too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_raw(s)?.ok_or_else(|| InvalidAction::Malformed(s.trim().to_string()))
    }
}
