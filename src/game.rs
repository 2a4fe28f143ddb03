//! Game states and the rules that connect them.
//!
//! A [`GameState`] is an immutable snapshot: side to move, board, phase and
//! turn counter, plus the legal actions computed when it was created. The
//! heuristic utility is cached on first use, under the evaluation weights the
//! state carries. Applying an action never touches the original; it clones
//! the board, plays the action on the copy and wraps the result in a new
//! state.
//!
//! The game has two phases. During placement the sides alternately drop
//! pieces (12 each, White first). The movement phase follows, again starting
//! with White, with its own turn counter from 0. After movement turns 127
//! and 191 the board shrinks by one ring.

use std::fmt;
use std::sync::OnceLock;

use crate::action::{Action, RawAction};
use crate::board::{Board, Cell, Side};
use crate::constants::{PLACEMENT_PLIES, SHRINK_TURNS};
use crate::elimination::{resolve_action, resolve_corners};
use crate::error::{GameError, InvalidAction};
use crate::evaluation::{EvalWeights, evaluate};
use crate::moves::{generate_moves, validate_place};

/// Which half of the game a state belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Placing,
    Moving,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Placing => write!(f, "placement"),
            Phase::Moving => write!(f, "movement"),
        }
    }
}

/// An immutable game position.
#[derive(Clone, Debug)]
pub struct GameState {
    to_move: Side,
    board: Board,
    phase: Phase,
    /// Plies played in the current phase.
    turn: u32,
    /// Legal actions for `to_move`, in enumeration order.
    actions: Vec<Action>,
    /// Weights behind `utility`; inherited by successors.
    weights: EvalWeights,
    /// Evaluation of the board for `to_move`, filled on first request.
    utility: OnceLock<f64>,
}

impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.to_move == other.to_move
            && self.board == other.board
            && self.phase == other.phase
            && self.turn == other.turn
            && self.actions == other.actions
            && self.weights == other.weights
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// The start of a game: empty board, White to place.
    pub fn new() -> Self {
        Self::from_board(Board::new(), Side::White, Phase::Placing, 0)
    }

    /// Wrap an arbitrary board, e.g. one parsed from text.
    ///
    /// The board is taken as is; no eliminations are resolved.
    pub fn from_board(board: Board, to_move: Side, phase: Phase, turn: u32) -> Self {
        let terminal = phase == Phase::Moving && is_terminal_board(&board);
        let actions = if terminal {
            Vec::new()
        } else {
            enumerate_actions(&board, to_move, phase)
        };
        GameState {
            to_move,
            board,
            phase,
            turn,
            actions,
            weights: EvalWeights::default(),
            utility: OnceLock::new(),
        }
    }

    /// The same position scored under `weights`.
    pub fn with_weights(self, weights: EvalWeights) -> Self {
        GameState {
            weights,
            utility: OnceLock::new(),
            ..self
        }
    }

    #[inline]
    pub fn to_move(&self) -> Side {
        self.to_move
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[inline]
    pub fn weights(&self) -> &EvalWeights {
        &self.weights
    }

    /// Heuristic value of the position for the side to move, under
    /// [`weights`](Self::weights). Computed once, on first call.
    pub fn utility(&self) -> f64 {
        *self
            .utility
            .get_or_init(|| evaluate(&self.board, self.to_move, &self.weights))
    }

    /// Legal actions for the side to move. Empty only for terminal states;
    /// otherwise a side with nothing else to do gets `[Forfeit]`.
    #[inline]
    pub fn legal_actions(&self) -> &[Action] {
        &self.actions
    }

    /// True during the movement phase once either side is wiped out or the
    /// legal area has no empty square left.
    pub fn is_terminal(&self) -> bool {
        self.phase == Phase::Moving && is_terminal_board(&self.board)
    }

    /// The side with more pieces on a terminal board. `None` while the game
    /// is running or on a draw.
    pub fn winner(&self) -> Option<Side> {
        if !self.is_terminal() {
            return None;
        }
        let white = self.board.count(Side::White);
        let black = self.board.count(Side::Black);
        match white.cmp(&black) {
            std::cmp::Ordering::Greater => Some(Side::White),
            std::cmp::Ordering::Less => Some(Side::Black),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Apply `action` and return the next state.
    ///
    /// The action must be one of [`legal_actions`](Self::legal_actions) (a
    /// forfeit is always accepted). Anything else is a caller bug and is
    /// reported as [`GameError::IllegalMoveAttempt`]; `self` is untouched
    /// either way.
    pub fn apply(&self, action: &Action) -> Result<GameState, GameError> {
        if *action != Action::Forfeit && !self.actions.contains(action) {
            return Err(GameError::IllegalMoveAttempt {
                action: *action,
                side: self.to_move,
            });
        }
        Ok(self.successor(action))
    }

    /// Validate an external description for the side to move and apply it.
    ///
    /// Shape, phase and board legality problems come back as
    /// [`GameError::InvalidAction`], which the caller can recover from.
    pub fn play(&self, raw: Option<RawAction>) -> Result<GameState, GameError> {
        let action = Action::build(&self.board, self.to_move, raw)?;
        let phase_ok = match action {
            Action::Place(_) => self.phase == Phase::Placing,
            Action::Move(_) => self.phase == Phase::Moving,
            Action::Forfeit => true,
        };
        if !phase_ok {
            return Err(InvalidAction::WrongPhase {
                action,
                phase: self.phase,
            }
            .into());
        }
        self.apply(&action)
    }

    /// Apply an action already known to be legal.
    pub(crate) fn successor(&self, action: &Action) -> GameState {
        let side = self.to_move;
        let mut board = self.board.clone();
        if let Action::Move(mv) = *action {
            board.set(mv.from, Cell::Empty);
        }
        if let Some(at) = action.destination() {
            board.set(at, Cell::Piece(side));
            resolve_action(&mut board, at);
        }

        let (phase, turn) = match self.phase {
            Phase::Placing if self.turn + 1 >= PLACEMENT_PLIES => (Phase::Moving, 0),
            Phase::Placing => (Phase::Placing, self.turn + 1),
            Phase::Moving => {
                if SHRINK_TURNS.contains(&self.turn) {
                    if let Some(corners) = board.shrink() {
                        log::trace!("shrinking after movement turn {}", self.turn);
                        resolve_corners(&mut board, &corners);
                    }
                }
                (Phase::Moving, self.turn + 1)
            }
        };

        GameState::from_board(board, side.opponent(), phase, turn).with_weights(self.weights)
    }
}

fn is_terminal_board(board: &Board) -> bool {
    board.count(Side::White) == 0 || board.count(Side::Black) == 0 || !board.has_empty_cell()
}

fn enumerate_actions(board: &Board, side: Side, phase: Phase) -> Vec<Action> {
    let actions: Vec<Action> = match phase {
        Phase::Placing => board
            .active_cells()
            .filter(|&c| validate_place(board, side, c).is_ok())
            .map(Action::Place)
            .collect(),
        Phase::Moving => generate_moves(board, side)
            .into_iter()
            .map(Action::Move)
            .collect(),
    };
    if actions.is_empty() {
        vec![Action::Forfeit]
    } else {
        actions
    }
}
